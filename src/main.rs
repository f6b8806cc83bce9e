use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand};
use location_app::location::providers::{DEFAULT_NOMINATIM_URL, DEFAULT_USER_AGENT};
use location_app::location::{NominatimConfig, NominatimGeocoder};
use location_app::map::MapRenderer;
use location_app::server;
use location_app::tasks::LocationApp;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Location App: place search, reverse geocoding and map rendering.
///
/// With no subcommand, serves the tasks locally over HTTP.
///
/// Examples:
///   location-app
///   location-app serve --port 9000
///   location-app search "New York"
///   location-app reverse --lat 40.7128 --lon -74.0060
///   location-app map --lat 40.7128 --lon -74.0060 --output map.html
#[derive(Parser)]
#[command(name = "location-app", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Identifying User-Agent sent to the geocoding provider.
    #[arg(long, env = "LOCATION_APP_USER_AGENT", default_value = DEFAULT_USER_AGENT, global = true)]
    user_agent: String,

    /// Base URL of the Nominatim instance.
    #[arg(long, env = "NOMINATIM_URL", default_value = DEFAULT_NOMINATIM_URL, global = true)]
    nominatim_url: String,

    /// Provider request timeout in seconds.
    #[arg(long, env = "NOMINATIM_TIMEOUT_SECS", default_value_t = 1, global = true)]
    timeout_secs: u64,

    /// Log filter used when RUST_LOG is unset.
    #[arg(long, env = "LOCATION_APP_LOG", default_value = "info", global = true)]
    log_level: String,
}

#[derive(Subcommand)]
enum Command {
    /// Serve the tasks over HTTP (default).
    Serve {
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
        #[arg(long, default_value_t = 8000)]
        port: u16,
    },
    /// Look up a place name and print its coordinates.
    Search {
        place: String,
    },
    /// Look up the address at a coordinate.
    Reverse {
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,
        #[arg(long, allow_hyphen_values = true)]
        lon: f64,
    },
    /// Render a map with a single marker.
    Map {
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,
        #[arg(long, allow_hyphen_values = true)]
        lon: f64,
        /// Write the markup here instead of stdout.
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },
}

fn init_tracing(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);

    let config = NominatimConfig {
        base_url: cli.nominatim_url,
        user_agent: cli.user_agent,
        timeout: Duration::from_secs(cli.timeout_secs),
    };
    let geocoder = NominatimGeocoder::new(&config);
    let renderer = MapRenderer::new().context("compiling map templates")?;
    let app = LocationApp::new(Box::new(geocoder), renderer);

    match cli.command.unwrap_or(Command::Serve {
        host: "127.0.0.1".into(),
        port: 8000,
    }) {
        Command::Serve { host, port } => {
            server::start(app, &host, port)
                .await
                .with_context(|| format!("serving on {}:{}", host, port))?;
        }
        Command::Search { place } => {
            let result = tokio::task::spawn_blocking(move || app.search_place(&place)).await?;
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        Command::Reverse { lat, lon } => {
            let result = tokio::task::spawn_blocking(move || app.get_location_info(lat, lon)).await?;
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        Command::Map { lat, lon, output } => {
            let markup = app.generate_map(lat, lon);
            match output {
                Some(path) => {
                    std::fs::write(&path, markup)
                        .with_context(|| format!("writing {}", path.display()))?;
                    tracing::info!(path = %path.display(), "map written");
                }
                None => println!("{}", markup),
            }
        }
    }

    Ok(())
}

//! Tera templates for the map markup.

pub const DOCUMENT_NAME: &str = "map.html";
pub const EMBED_NAME: &str = "embed.html";

pub const DOCUMENT_HTML: &str = r#"<!DOCTYPE html>
<html>
<head>
    <meta http-equiv="content-type" content="text/html; charset=UTF-8" />
    <meta name="viewport" content="width=device-width, initial-scale=1.0, maximum-scale=1.0, user-scalable=no" />
    <link rel="stylesheet" href="https://cdn.jsdelivr.net/npm/leaflet@1.9.3/dist/leaflet.css" />
    <script src="https://cdn.jsdelivr.net/npm/leaflet@1.9.3/dist/leaflet.js"></script>
    <style>
        html, body { width: 100%; height: 100%; margin: 0; padding: 0; }
        #{{ map_id }} { position: relative; width: 100%; height: 100%; left: 0; top: 0; }
    </style>
</head>
<body>
    <div class="map" id="{{ map_id }}"></div>
    <script>
        var {{ map_id }} = L.map("{{ map_id }}", {
            center: [{{ center.latitude }}, {{ center.longitude }}],
            zoom: {{ zoom }},
            zoomControl: true
        });
        L.tileLayer({{ tiles.url | json_encode() | safe }}, {
            attribution: {{ tiles.attribution | json_encode() | safe }},
            maxZoom: {{ tiles.max_zoom }}
        }).addTo({{ map_id }});
{%- for marker in markers %}
        L.marker([{{ marker.coordinate.latitude }}, {{ marker.coordinate.longitude }}]).bindPopup({{ marker.popup | json_encode() | safe }}).addTo({{ map_id }});
{%- endfor %}
    </script>
</body>
</html>
"#;

pub const EMBED_HTML: &str = r#"<div style="width:100%;"><div style="position:relative;width:100%;height:0;padding-bottom:60%;"><iframe srcdoc="{{ document }}" style="position:absolute;width:100%;height:100%;left:0;top:0;border:none !important;" allowfullscreen webkitallowfullscreen mozallowfullscreen></iframe></div></div>"#;

use crate::tasks::LocationApp;

pub struct AppState {
    pub app: LocationApp,
}

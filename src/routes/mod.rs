use axum::Router;

use crate::{Config, Telemetry};

mod health;

// ---

pub fn router(config: Config, telemetry: Telemetry) -> Router {
    // ---
    Router::new()
        .merge(health::router(&config.route))
        .with_state((config, telemetry))
}

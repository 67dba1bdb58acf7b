use axum::{
    extract::State,
    routing::{get, on},
    Json, Router,
};
use serde::Serialize;

pub mod v1;

use crate::{
    common::{route_not_found, METHOD_FILTER_ALL},
    WebState,
};

macro_rules! resource {
    ($($arg:tt)*) => {
        format!("/api{}", format_args!($($arg)*))
    };
}
pub(crate) use resource;

pub fn routes(state: WebState) -> Router {
    Router::new()
        .route("/ping", get(ping))
        .with_state(state.clone())
        .nest_service("/v1", v1::routes(state))
        .fallback_service(on(METHOD_FILTER_ALL, route_not_found))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Health {
    message: &'static str,
    version: &'static str,
    regions: usize,
    alert_radius_km: f64,
}

/// Liveness check. Does not touch the candidate store.
async fn ping(State(WebState { client }): State<WebState>) -> Json<Health> {
    Json(Health {
        message: "pong!",
        version: env!("CARGO_PKG_VERSION"),
        regions: client.regions().await.len(),
        alert_radius_km: client.config().alert_radius_km,
    })
}

use axum::{
    routing::{get, on},
    Router,
};

use crate::{
    common::{route_not_found, METHOD_FILTER_ALL},
    middleware::base_url::base_url_middleware,
    WebState,
};

mod alerts;
mod bus_stops;
mod entities;
mod incidents;
mod regions;
mod taxi_ranks;
mod users;

macro_rules! resource {
    ($($arg:tt)*) => {
        crate::api::resource!("/v1{}", format_args!($($arg)*))
    };
}
pub(crate) use resource;

pub(crate) fn routes(state: WebState) -> Router {
    Router::new()
        .route("/", get(route_not_found))
        .nest_service("/users", users::routes(state.clone()))
        .nest_service("/bus-stops", bus_stops::routes(state.clone()))
        .nest_service("/taxi-ranks", taxi_ranks::routes(state.clone()))
        .nest_service("/incidents", incidents::routes(state.clone()))
        .nest_service("/entities", entities::routes(state.clone()))
        .nest_service("/regions", regions::routes(state.clone()))
        .nest_service("/alerts", alerts::routes(state.clone()))
        .layer(axum::middleware::from_fn(base_url_middleware))
        .with_state(state)
        .fallback_service(on(METHOD_FILTER_ALL, route_not_found))
}

/// Query string pointing at a position, used in links.
pub(crate) fn at(latitude: f64, longitude: f64) -> String {
    format!("latitude={latitude}&longitude={longitude}")
}

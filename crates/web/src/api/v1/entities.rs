use std::{collections::HashSet, sync::Arc};

use axum::{
    extract::{OriginalUri, Query, State},
    http::Method,
    routing::{get, on},
    Extension, Router,
};
use model::{
    entity::{EntityKind, LocatedEntity},
    WithDistance,
};
use serde::Deserialize;
use utility::let_also::LetAlso;

use crate::{
    common::{
        route_not_found, schema, HateoasResult, RouteErrorResponse, VecResponse,
        METHOD_FILTER_ALL,
    },
    hateoas,
    middleware::base_url::BaseUrl,
    WebState,
};

macro_rules! resource {
    ($($arg:tt)*) => {
        crate::api::v1::resource!("/entities{}", format_args!($($arg)*))
    };
}
pub(crate) use resource;

pub(crate) fn routes(state: WebState) -> Router {
    Router::new()
        .route("/schema", get(schema::<LocatedEntity>))
        .route("/nearby", get(nearby))
        .with_state(state)
        .fallback_service(on(METHOD_FILTER_ALL, route_not_found))
}

#[derive(Deserialize)]
struct EntityQuery {
    kind: EntityKind,
    latitude: f64,
    longitude: f64,
    radius: Option<f64>,
    /// Comma separated ids.
    exclude: Option<String>,
}

impl EntityQuery {
    fn excluded(&self) -> HashSet<String> {
        self.exclude
            .iter()
            .flat_map(|ids| ids.split(','))
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(str::to_owned)
            .collect()
    }
}

async fn nearby(
    OriginalUri(original_uri): OriginalUri,
    State(WebState { client }): State<WebState>,
    Query(params): Query<EntityQuery>,
    Extension(base_url): Extension<Arc<BaseUrl>>,
) -> HateoasResult<VecResponse<WithDistance<LocatedEntity>>> {
    let origin = model::geo::GeoPoint {
        latitude: params.latitude,
        longitude: params.longitude,
    };
    let radius_km = params
        .radius
        .unwrap_or(client.config().discovery_radius_km);
    client
        .nearby_entities(params.kind, origin, radius_km, &params.excluded())
        .await
        .map(|entities| {
            VecResponse::new(entities).let_owned(|data| {
                hateoas::Response::builder(data, base_url)
                    .link(
                        "self",
                        resource!(
                            "/nearby?kind={}&{}",
                            params.kind.as_str(),
                            super::at(params.latitude, params.longitude)
                        ),
                    )
                    .debug_info("radiusKm", radius_km)
                    .build()
                    .json()
            })
        })
        .map_err(|why| {
            RouteErrorResponse::from(why)
                .with_method(&Method::GET)
                .with_uri(original_uri.path())
        })
}

use std::sync::Arc;

use axum::{
    extract::{OriginalUri, Query, State},
    http::Method,
    routing::{get, on},
    Extension, Router,
};
use model::{user::User, WithDistance, WithId};
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
        crate::api::v1::resource!("/users{}", format_args!($($arg)*))
    };
}
pub(crate) use resource;

pub(crate) fn routes(state: WebState) -> Router {
    Router::new()
        .route("/schema", get(schema::<User>))
        .route("/nearby", get(nearby))
        .with_state(state)
        .fallback_service(on(METHOD_FILTER_ALL, route_not_found))
}

#[derive(Deserialize)]
struct NearbyQuery {
    latitude: f64,
    longitude: f64,
    radius: Option<f64>,
    /// Usually the id of the user asking.
    exclude: Option<String>,
}

async fn nearby(
    OriginalUri(original_uri): OriginalUri,
    State(WebState { client }): State<WebState>,
    Query(params): Query<NearbyQuery>,
    Extension(base_url): Extension<Arc<BaseUrl>>,
) -> HateoasResult<VecResponse<hateoas::Response<WithDistance<WithId<User>>>>> {
    let origin = model::geo::GeoPoint {
        latitude: params.latitude,
        longitude: params.longitude,
    };
    client
        .nearby_users(origin, params.radius, params.exclude.as_deref())
        .await
        .map(|users| {
            users
                .into_iter()
                .map(|user| user_hateoas(user, base_url.clone()))
                .collect::<Vec<_>>()
                .let_owned(|data| {
                    hateoas::Response::builder(VecResponse::new(data), base_url.clone())
                        .link(
                            "self",
                            resource!("/nearby?{}", super::at(origin.latitude, origin.longitude)),
                        )
                        .debug_info(
                            "radiusKm",
                            params.radius.unwrap_or(client.config().discovery_radius_km),
                        )
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

fn user_hateoas(
    user: WithDistance<WithId<User>>,
    base_url: Arc<BaseUrl>,
) -> hateoas::Response<WithDistance<WithId<User>>> {
    let location = user.content.content.location;
    hateoas::Response::builder(user, base_url)
        .link_option(
            "regions",
            location.map(|location| {
                super::regions::resource!(
                    "/containing?{}",
                    super::at(location.latitude, location.longitude)
                )
            }),
        )
        .build()
}

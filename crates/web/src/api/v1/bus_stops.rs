use std::sync::Arc;

use axum::{
    extract::{OriginalUri, Query, State},
    http::Method,
    routing::{get, on},
    Extension, Router,
};
use model::{transit::BusStop, WithDistance, WithId};
use proximity::index::Ranking;
use utility::let_also::LetAlso;

use crate::{
    common::{
        route_not_found, schema, HateoasResult, PointQuery, RouteErrorResponse, VecResponse,
        METHOD_FILTER_ALL,
    },
    hateoas,
    middleware::base_url::BaseUrl,
    WebState,
};

macro_rules! resource {
    ($($arg:tt)*) => {
        crate::api::v1::resource!("/bus-stops{}", format_args!($($arg)*))
    };
}
pub(crate) use resource;

pub(crate) fn routes(state: WebState) -> Router {
    Router::new()
        .route("/schema", get(schema::<BusStop>))
        .route("/nearby", get(nearby))
        .route("/ranked", get(ranked))
        .with_state(state)
        .fallback_service(on(METHOD_FILTER_ALL, route_not_found))
}

async fn nearby(
    OriginalUri(original_uri): OriginalUri,
    State(WebState { client }): State<WebState>,
    Query(params): Query<PointQuery>,
    Extension(base_url): Extension<Arc<BaseUrl>>,
) -> HateoasResult<VecResponse<hateoas::Response<WithDistance<WithId<BusStop>>>>> {
    client
        .nearby_bus_stops(params.point(), params.radius)
        .await
        .map(|stops| {
            stops
                .into_iter()
                .map(|stop| stop_hateoas(stop, base_url.clone()))
                .collect::<Vec<_>>()
                .let_owned(|data| {
                    hateoas::Response::builder(VecResponse::new(data), base_url.clone())
                        .link(
                            "ranked",
                            resource!("/ranked?{}", super::at(params.latitude, params.longitude)),
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

/// Every stop, nearest first. Stops without a position come last.
async fn ranked(
    OriginalUri(original_uri): OriginalUri,
    State(WebState { client }): State<WebState>,
    Query(params): Query<PointQuery>,
    Extension(base_url): Extension<Arc<BaseUrl>>,
) -> HateoasResult<Ranking<WithId<BusStop>>> {
    client
        .rank_bus_stops(params.point())
        .await
        .map(|ranking| {
            hateoas::Response::builder(ranking, base_url)
                .link(
                    "nearby",
                    resource!("/nearby?{}", super::at(params.latitude, params.longitude)),
                )
                .build()
                .json()
        })
        .map_err(|why| {
            RouteErrorResponse::from(why)
                .with_method(&Method::GET)
                .with_uri(original_uri.path())
        })
}

fn stop_hateoas(
    stop: WithDistance<WithId<BusStop>>,
    base_url: Arc<BaseUrl>,
) -> hateoas::Response<WithDistance<WithId<BusStop>>> {
    let location = stop.content.content.location;
    hateoas::Response::builder(stop, base_url)
        .link_option(
            "taxiRanks",
            location.map(|location| {
                super::taxi_ranks::resource!(
                    "/nearby?{}",
                    super::at(location.latitude, location.longitude)
                )
            }),
        )
        .build()
}

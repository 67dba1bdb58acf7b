use std::sync::Arc;

use axum::{
    extract::{OriginalUri, Query, State},
    http::Method,
    routing::{get, on},
    Extension, Router,
};
use model::{transit::TaxiRank, WithDistance, WithId};
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
        crate::api::v1::resource!("/taxi-ranks{}", format_args!($($arg)*))
    };
}
pub(crate) use resource;

pub(crate) fn routes(state: WebState) -> Router {
    Router::new()
        .route("/schema", get(schema::<TaxiRank>))
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
) -> HateoasResult<VecResponse<hateoas::Response<WithDistance<WithId<TaxiRank>>>>> {
    client
        .nearby_taxi_ranks(params.point(), params.radius)
        .await
        .map(|ranks| {
            ranks
                .into_iter()
                .map(|rank| rank_hateoas(rank, base_url.clone()))
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

/// Every taxi rank, nearest first. Ranks without a position come last.
async fn ranked(
    OriginalUri(original_uri): OriginalUri,
    State(WebState { client }): State<WebState>,
    Query(params): Query<PointQuery>,
    Extension(base_url): Extension<Arc<BaseUrl>>,
) -> HateoasResult<Ranking<WithId<TaxiRank>>> {
    client
        .rank_taxi_ranks(params.point())
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

fn rank_hateoas(
    rank: WithDistance<WithId<TaxiRank>>,
    base_url: Arc<BaseUrl>,
) -> hateoas::Response<WithDistance<WithId<TaxiRank>>> {
    let location = rank.content.content.location;
    hateoas::Response::builder(rank, base_url)
        .link_option(
            "busStops",
            location.map(|location| {
                super::bus_stops::resource!(
                    "/nearby?{}",
                    super::at(location.latitude, location.longitude)
                )
            }),
        )
        .build()
}

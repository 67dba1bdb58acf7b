use std::sync::Arc;

use axum::{
    extract::{OriginalUri, Query, State},
    http::Method,
    routing::{get, on},
    Extension, Router,
};
use model::{incident::IncidentReport, WithDistance, WithId};
use serde::Serialize;
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
        crate::api::v1::resource!("/incidents{}", format_args!($($arg)*))
    };
}
pub(crate) use resource;

pub(crate) fn routes(state: WebState) -> Router {
    Router::new()
        .route("/schema", get(schema::<IncidentReport>))
        .route("/nearby", get(nearby))
        .with_state(state)
        .fallback_service(on(METHOD_FILTER_ALL, route_not_found))
}

/// An incident with its heatmap weight.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct IncidentDto {
    #[serde(flatten)]
    report: WithId<IncidentReport>,
    severity: u8,
}

async fn nearby(
    OriginalUri(original_uri): OriginalUri,
    State(WebState { client }): State<WebState>,
    Query(params): Query<PointQuery>,
    Extension(base_url): Extension<Arc<BaseUrl>>,
) -> HateoasResult<VecResponse<WithDistance<IncidentDto>>> {
    client
        .incidents_in_area(params.point(), params.radius)
        .await
        .map(|incidents| {
            incidents
                .into_iter()
                .map(|incident| {
                    incident.map(|report| IncidentDto {
                        severity: report.content.severity(),
                        report,
                    })
                })
                .collect::<Vec<_>>()
                .let_owned(|data| {
                    hateoas::Response::builder(VecResponse::new(data), base_url)
                        .link(
                            "self",
                            resource!("/nearby?{}", super::at(params.latitude, params.longitude)),
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

use std::sync::Arc;

use axum::{
    extract::{OriginalUri, State},
    http::Method,
    routing::{get, on, post},
    Extension, Json, Router,
};
use model::alert::SosAlert;
use proximity::fanout::DispatchReport;

use crate::{
    common::{
        route_not_found, schema, schema_no_example, HateoasResult, RouteErrorResponse,
        METHOD_FILTER_ALL,
    },
    hateoas,
    middleware::base_url::BaseUrl,
    WebState,
};

pub(crate) fn routes(state: WebState) -> Router {
    Router::new()
        .route("/schema", get(schema::<SosAlert>))
        .route("/report/schema", get(schema_no_example::<DispatchReport>))
        .route("/", post(dispatch))
        .with_state(state)
        .fallback_service(on(METHOD_FILTER_ALL, route_not_found))
}

/// Notifies everyone near the alert and reports what happened per recipient.
async fn dispatch(
    OriginalUri(original_uri): OriginalUri,
    State(WebState { client }): State<WebState>,
    Extension(base_url): Extension<Arc<BaseUrl>>,
    Json(alert): Json<SosAlert>,
) -> HateoasResult<DispatchReport> {
    log::info!("dispatching alert {} from user {}", alert.id, alert.user_id);
    client
        .dispatch_alert(&alert)
        .await
        .map(|report| {
            let location = alert.location;
            hateoas::Response::builder(report, base_url)
                .link(
                    "regions",
                    super::regions::resource!(
                        "/containing?{}",
                        super::at(location.latitude, location.longitude)
                    ),
                )
                .build()
                .json()
        })
        .map_err(|why| {
            RouteErrorResponse::from(why)
                .with_method(&Method::POST)
                .with_uri(original_uri.path())
        })
}

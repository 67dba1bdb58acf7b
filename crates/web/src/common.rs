use axum::{
    extract::{OriginalUri, Query, Request},
    http::{Method, StatusCode},
    response::IntoResponse,
    routing::MethodFilter,
    Json,
};
use model::ExampleData;
use proximity::{area::CatalogError, RequestError};
use schemars::{schema_for, schema_for_value, JsonSchema};
use serde::{Deserialize, Serialize};

use crate::hateoas;

pub type RouteResult<O> = Result<O, RouteErrorResponse>;
pub type HateoasResult<O> = RouteResult<Json<hateoas::Response<O>>>;

/// Used for fallbacks, so unknown routes answer 404 for any method.
pub(crate) const METHOD_FILTER_ALL: MethodFilter = MethodFilter::GET
    .or(MethodFilter::POST)
    .or(MethodFilter::PATCH)
    .or(MethodFilter::PUT)
    .or(MethodFilter::DELETE);

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VecResponse<T> {
    pub data: Vec<T>,
    pub total_items: usize,
}

impl<T> VecResponse<T> {
    pub fn new(data: Vec<T>) -> Self {
        Self {
            total_items: data.len(),
            data,
        }
    }
}

/// Query parameters shared by every position based route.
#[derive(Debug, Deserialize)]
pub(crate) struct PointQuery {
    pub latitude: f64,
    pub longitude: f64,
    pub radius: Option<f64>,
}

impl PointQuery {
    /// Not validated here; the proximity client rejects bad coordinates.
    pub fn point(&self) -> model::geo::GeoPoint {
        model::geo::GeoPoint {
            latitude: self.latitude,
            longitude: self.longitude,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SchemaParams {
    #[serde(default = "Default::default")]
    example_data: bool,
}

pub(crate) async fn schema<T: ExampleData + JsonSchema + Serialize>(
    Query(params): Query<SchemaParams>,
) -> impl IntoResponse {
    if params.example_data {
        Json(schema_for_value!(T::example_data()))
    } else {
        Json(schema_for!(T))
    }
}

pub(crate) async fn schema_no_example<T: JsonSchema>() -> impl IntoResponse {
    Json(schema_for!(T))
}

pub(crate) async fn route_not_found(
    OriginalUri(original_uri): OriginalUri,
    req: Request,
) -> impl IntoResponse {
    RouteErrorResponse::not_found(req.method(), original_uri.path())
}

/// Error body returned by every route. Which fields are set depends on the
/// error; the status code itself only goes into the response line.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteErrorResponse {
    #[serde(skip)]
    pub status_code: StatusCode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub http_method: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requested_uri: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detailed_information: Option<String>,
}

impl RouteErrorResponse {
    fn status(status_code: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status_code,
            message: Some(message.into()),
            ..Default::default()
        }
    }

    pub fn not_found(method: &Method, uri: impl Into<String>) -> Self {
        Self::status(StatusCode::NOT_FOUND, "Not Found")
            .with_method(method)
            .with_uri(uri)
    }

    pub fn with_method(self, method: &Method) -> Self {
        Self {
            http_method: Some(method.to_string()),
            ..self
        }
    }

    pub fn with_uri(self, uri: impl Into<String>) -> Self {
        Self {
            requested_uri: Some(uri.into()),
            ..self
        }
    }

    fn with_details(self, details: impl ToString) -> Self {
        Self {
            detailed_information: Some(details.to_string()),
            ..self
        }
    }
}

impl From<RequestError> for RouteErrorResponse {
    fn from(value: RequestError) -> Self {
        match value {
            RequestError::InvalidInput(why) => {
                Self::status(StatusCode::BAD_REQUEST, why.to_string())
            }
            RequestError::SourceUnavailable(why) => {
                log::error!("candidate source unavailable: {why}");
                Self::status(
                    StatusCode::SERVICE_UNAVAILABLE,
                    "Nearby results are unavailable right now.",
                )
                .with_details(why)
            }
        }
    }
}

impl From<CatalogError> for RouteErrorResponse {
    fn from(value: CatalogError) -> Self {
        log::error!("region catalog reload failed: {value}");
        Self::status(
            StatusCode::INTERNAL_SERVER_ERROR,
            "The region catalog could not be reloaded.",
        )
        .with_details(value)
    }
}

impl IntoResponse for RouteErrorResponse {
    fn into_response(self) -> axum::response::Response {
        (self.status_code, Json(self)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use proximity::SourceError;
    use utility::geo::GeoError;

    use super::*;

    #[test]
    fn request_errors_map_to_status_codes() {
        let invalid = RouteErrorResponse::from(RequestError::from(GeoError::InvalidLatitude(
            91.0,
        )));
        assert_eq!(invalid.status_code, StatusCode::BAD_REQUEST);

        let unavailable = RouteErrorResponse::from(RequestError::from(
            SourceError::Unreachable("timeout".to_owned()),
        ));
        assert_eq!(unavailable.status_code, StatusCode::SERVICE_UNAVAILABLE);
        assert!(unavailable.detailed_information.is_some());
    }

    #[test]
    fn not_found_names_the_request() {
        let response = RouteErrorResponse::not_found(&Method::DELETE, "/api/v1/regions/x");
        assert_eq!(response.status_code, StatusCode::NOT_FOUND);
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["httpMethod"], "DELETE");
        assert_eq!(json["requestedUri"], "/api/v1/regions/x");
        assert!(json.get("detailedInformation").is_none());
    }
}

use std::sync::Arc;

use axum::{
    extract::{OriginalUri, Path, Query, State},
    http::Method,
    routing::{get, on, post},
    Extension, Router,
};
use model::region::Region;
use proximity::client::RegionSelection;
use serde::{Deserialize, Serialize};

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
        crate::api::v1::resource!("/regions{}", format_args!($($arg)*))
    };
}
pub(crate) use resource;

pub(crate) fn routes(state: WebState) -> Router {
    Router::new()
        .route("/schema", get(schema::<Region>))
        .route("/", get(get_regions))
        .route("/containing", get(containing))
        .route("/reload", post(reload))
        .route("/:id", get(get_region))
        .with_state(state)
        .fallback_service(on(METHOD_FILTER_ALL, route_not_found))
}

async fn get_regions(
    State(WebState { client }): State<WebState>,
    Extension(base_url): Extension<Arc<BaseUrl>>,
) -> HateoasResult<VecResponse<hateoas::Response<Region>>> {
    let catalog = client.regions().await;
    let data = catalog
        .regions()
        .iter()
        .cloned()
        .map(|region| region_hateoas(region, base_url.clone()))
        .collect::<Vec<_>>();
    Ok(hateoas::Response::builder(VecResponse::new(data), base_url)
        .link("reload", resource!("/reload"))
        .build()
        .json())
}

async fn get_region(
    OriginalUri(original_uri): OriginalUri,
    Path(id): Path<String>,
    State(WebState { client }): State<WebState>,
    Extension(base_url): Extension<Arc<BaseUrl>>,
) -> HateoasResult<Region> {
    client
        .regions()
        .await
        .get(&id)
        .cloned()
        .map(|region| region_hateoas(region, base_url).json())
        .ok_or_else(|| RouteErrorResponse::not_found(&Method::GET, original_uri.path()))
}

#[derive(Deserialize)]
struct ContainingQuery {
    latitude: f64,
    longitude: f64,
    /// Region the user picked earlier, kept if it still contains the point.
    selected: Option<String>,
}

async fn containing(
    OriginalUri(original_uri): OriginalUri,
    State(WebState { client }): State<WebState>,
    Query(params): Query<ContainingQuery>,
    Extension(base_url): Extension<Arc<BaseUrl>>,
) -> HateoasResult<RegionSelection> {
    let point = model::geo::GeoPoint {
        latitude: params.latitude,
        longitude: params.longitude,
    };
    client
        .regions_at(point, params.selected.as_deref())
        .await
        .map(|selection| {
            let selected = selection.selected.as_ref().map(|region| region.id.raw());
            hateoas::Response::builder(selection, base_url)
                .link_option("selected", selected.map(|id| resource!("/{}", id)))
                .link(
                    "users",
                    super::users::resource!(
                        "/nearby?{}",
                        super::at(params.latitude, params.longitude)
                    ),
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

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ReloadDto {
    num_regions: usize,
}

async fn reload(
    OriginalUri(original_uri): OriginalUri,
    State(WebState { client }): State<WebState>,
    Extension(base_url): Extension<Arc<BaseUrl>>,
) -> HateoasResult<ReloadDto> {
    client
        .reload_regions()
        .await
        .map(|num_regions| {
            hateoas::Response::builder(ReloadDto { num_regions }, base_url)
                .link("regions", resource!(""))
                .build()
                .json()
        })
        .map_err(|why| {
            RouteErrorResponse::from(why)
                .with_method(&Method::POST)
                .with_uri(original_uri.path())
        })
}

fn region_hateoas(region: Region, base_url: Arc<BaseUrl>) -> hateoas::Response<Region> {
    let id = region.id.raw();
    let center = region.center;
    let radius_km = region.radius_km;
    hateoas::Response::builder(region, base_url)
        .link("self", resource!("/{}", id))
        .link(
            "users",
            super::users::resource!(
                "/nearby?{}&radius={}",
                super::at(center.latitude, center.longitude),
                radius_km
            ),
        )
        .build()
}

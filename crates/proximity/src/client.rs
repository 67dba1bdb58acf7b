use std::{collections::HashSet, sync::Arc};

use model::{
    alert::SosAlert,
    entity::{EntityKind, LocatedEntity},
    incident::IncidentReport,
    region::Region,
    transit::{BusStop, TaxiRank},
    user::User,
    WithDistance, WithId,
};
use schemars::JsonSchema;
use serde::Serialize;
use tokio::sync::RwLock;
use utility::geo::GeoPoint;

use crate::{
    area::{select_region, CatalogError, RegionCatalog},
    config::ProximityConfig,
    delivery::MessageDelivery,
    fanout::{self, DispatchReport},
    index::{self, Ranking, SearchArea},
    source::CandidateSource,
    RequestResult,
};

#[derive(Debug, Clone, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegionSelection {
    pub containing: Vec<Region>,
    pub selected: Option<Region>,
}

/// Entry point for every proximity query. The caller's position is always
/// passed in explicitly; the client keeps no notion of a current location.
#[derive(Clone)]
pub struct Client {
    source: Arc<dyn CandidateSource>,
    delivery: Arc<dyn MessageDelivery>,
    regions: Arc<RwLock<Arc<RegionCatalog>>>,
    config: Arc<ProximityConfig>,
}

impl Client {
    pub fn new(
        source: Arc<dyn CandidateSource>,
        delivery: Arc<dyn MessageDelivery>,
        regions: RegionCatalog,
        config: ProximityConfig,
    ) -> Self {
        Self {
            source,
            delivery,
            regions: Arc::new(RwLock::new(Arc::new(regions))),
            config: Arc::new(config),
        }
    }

    pub fn config(&self) -> &ProximityConfig {
        &self.config
    }

    fn search_area(&self, origin: GeoPoint, radius_km: f64) -> RequestResult<SearchArea> {
        Ok(SearchArea::new(origin, radius_km)?.with_limit(self.config.max_candidates))
    }

    fn warn_if_capped(&self, what: &str, fetched: usize) {
        if fetched >= self.config.max_candidates {
            log::warn!(
                "{what}: candidate cap of {} reached, results may be incomplete",
                self.config.max_candidates
            );
        }
    }

    pub async fn nearby_users(
        &self,
        origin: GeoPoint,
        radius_km: Option<f64>,
        exclude: Option<&str>,
    ) -> RequestResult<Vec<WithDistance<WithId<User>>>> {
        let area =
            self.search_area(origin, radius_km.unwrap_or(self.config.discovery_radius_km))?;
        let users = self.source.users(Some(&area)).await?;
        self.warn_if_capped("users", users.len());
        let exclude = exclude
            .map(|id| HashSet::from([id.to_owned()]))
            .unwrap_or_default();
        Ok(index::nearby(&area.center, area.radius_km, users, &exclude)?)
    }

    pub async fn nearby_bus_stops(
        &self,
        origin: GeoPoint,
        radius_km: Option<f64>,
    ) -> RequestResult<Vec<WithDistance<WithId<BusStop>>>> {
        let area = self.search_area(origin, radius_km.unwrap_or(self.config.transit_radius_km))?;
        let stops = self.source.bus_stops(Some(&area)).await?;
        self.warn_if_capped("bus stops", stops.len());
        Ok(index::nearby(&area.center, area.radius_km, stops, &HashSet::new())?)
    }

    pub async fn nearby_taxi_ranks(
        &self,
        origin: GeoPoint,
        radius_km: Option<f64>,
    ) -> RequestResult<Vec<WithDistance<WithId<TaxiRank>>>> {
        let area = self.search_area(origin, radius_km.unwrap_or(self.config.transit_radius_km))?;
        let ranks = self.source.taxi_ranks(Some(&area)).await?;
        self.warn_if_capped("taxi ranks", ranks.len());
        Ok(index::nearby(&area.center, area.radius_km, ranks, &HashSet::new())?)
    }

    pub async fn incidents_in_area(
        &self,
        origin: GeoPoint,
        radius_km: Option<f64>,
    ) -> RequestResult<Vec<WithDistance<WithId<IncidentReport>>>> {
        let area =
            self.search_area(origin, radius_km.unwrap_or(self.config.incident_radius_km))?;
        let incidents = self.source.incidents(Some(&area)).await?;
        self.warn_if_capped("incidents", incidents.len());
        Ok(index::nearby(&area.center, area.radius_km, incidents, &HashSet::new())?)
    }

    /// Kind-agnostic variant of the typed queries above.
    pub async fn nearby_entities(
        &self,
        kind: EntityKind,
        origin: GeoPoint,
        radius_km: f64,
        exclude: &HashSet<String>,
    ) -> RequestResult<Vec<WithDistance<LocatedEntity>>> {
        let area = self.search_area(origin, radius_km)?;
        let entities = self.source.located(kind, Some(&area)).await?;
        self.warn_if_capped(kind.as_str(), entities.len());
        Ok(index::nearby(&area.center, area.radius_km, entities, exclude)?)
    }

    /// Every bus stop, nearest first.
    pub async fn rank_bus_stops(
        &self,
        origin: GeoPoint,
    ) -> RequestResult<Ranking<WithId<BusStop>>> {
        let stops = self.source.bus_stops(None).await?;
        Ok(index::rank_all(&origin, stops)?)
    }

    /// Every taxi rank, nearest first.
    pub async fn rank_taxi_ranks(
        &self,
        origin: GeoPoint,
    ) -> RequestResult<Ranking<WithId<TaxiRank>>> {
        let ranks = self.source.taxi_ranks(None).await?;
        Ok(index::rank_all(&origin, ranks)?)
    }

    pub async fn regions(&self) -> Arc<RegionCatalog> {
        self.regions.read().await.clone()
    }

    pub async fn regions_at(
        &self,
        point: GeoPoint,
        requested: Option<&str>,
    ) -> RequestResult<RegionSelection> {
        let catalog = self.regions().await;
        let containing = catalog.containing(&point)?;
        let selected = select_region(&containing, requested).cloned();
        Ok(RegionSelection {
            containing,
            selected,
        })
    }

    /// Re-reads the configured catalog and swaps it in. Lookups already
    /// running keep the catalog they started with. On error the current
    /// catalog stays in place.
    pub async fn reload_regions(&self) -> Result<usize, CatalogError> {
        let catalog = RegionCatalog::load(self.config.region_catalog_path.as_deref())?;
        let len = catalog.len();
        *self.regions.write().await = Arc::new(catalog);
        log::info!("region catalog reloaded, {len} regions");
        Ok(len)
    }

    pub async fn dispatch_alert(&self, alert: &SosAlert) -> RequestResult<DispatchReport> {
        fanout::dispatch_alert(
            alert,
            self.config.alert_radius_km,
            self.source.as_ref(),
            self.delivery.as_ref(),
            Some(self.config.max_candidates),
            self.config.max_concurrent_deliveries,
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use model::user::EmergencyStatus;
    use utility::id::Id;

    use super::*;
    use crate::{delivery::LogDelivery, source::InMemorySource, RequestError};

    const CBD: (f64, f64) = (-26.2041, 28.0473);

    fn point(latitude: f64, longitude: f64) -> GeoPoint {
        GeoPoint::new(latitude, longitude).unwrap()
    }

    fn user(id: &str, location: GeoPoint) -> WithId<User> {
        WithId::new(
            Id::from(id),
            User {
                display_name: Some(id.to_owned()),
                email: None,
                location: Some(location),
                location_accuracy_m: None,
                location_updated: None,
                emergency_status: EmergencyStatus::Normal,
                push_token: None,
            },
        )
    }

    fn stop(id: &str, location: Option<GeoPoint>) -> WithId<BusStop> {
        WithId::new(
            Id::from(id),
            BusStop {
                name: id.to_owned(),
                location,
                routes: vec![],
            },
        )
    }

    fn client(source: InMemorySource) -> Client {
        Client::new(
            Arc::new(source),
            Arc::new(LogDelivery),
            RegionCatalog::builtin(),
            ProximityConfig::default(),
        )
    }

    #[tokio::test]
    async fn nearby_users_end_to_end() {
        let origin = point(CBD.0, CBD.1);
        let client = client(InMemorySource::new().with_users(vec![
            user("a", origin),
            user("b", point(-26.30, 28.10)),
            user("me", origin),
        ]));

        let result = client
            .nearby_users(origin, Some(1.0), Some("me"))
            .await
            .unwrap();

        assert_eq!(result.len(), 1);
        assert_eq!(result[0].content.id.raw(), "a");
        assert!(result[0].distance_km.abs() < 1e-9);
    }

    #[tokio::test]
    async fn invalid_origin_is_reported() {
        let client = client(InMemorySource::new());
        let result = client
            .nearby_users(
                GeoPoint {
                    latitude: -100.0,
                    longitude: 0.0,
                },
                None,
                None,
            )
            .await;
        assert!(matches!(result, Err(RequestError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn ranks_all_bus_stops() {
        let origin = point(CBD.0, CBD.1);
        let client = client(InMemorySource::new().with_bus_stops(vec![
            stop("far", Some(point(-26.30, 28.10))),
            stop("unknown", None),
            stop("near", Some(point(-26.2045, 28.0470))),
        ]));

        let ranking = client.rank_bus_stops(origin).await.unwrap();
        let located = ranking
            .located
            .iter()
            .map(|stop| stop.content.id.raw())
            .collect::<Vec<_>>();
        assert_eq!(located, vec!["near", "far"]);
        assert_eq!(ranking.unlocated.len(), 1);

        let nearby = client.nearby_bus_stops(origin, None).await.unwrap();
        assert_eq!(nearby.len(), 1);
    }

    #[tokio::test]
    async fn region_selection_prefers_requested() {
        let client = client(InMemorySource::new());
        let selection = client
            .regions_at(point(CBD.0, CBD.1), Some("newtown"))
            .await
            .unwrap();
        assert_eq!(selection.containing.len(), 3);
        assert_eq!(
            selection.selected.map(|region| region.id.raw()),
            Some("newtown".to_owned())
        );
    }

    #[tokio::test]
    async fn reload_keeps_builtin_without_path() {
        let client = client(InMemorySource::new());
        assert_eq!(client.reload_regions().await.unwrap(), 6);
        assert_eq!(client.regions().await.len(), 6);
    }

    #[tokio::test]
    async fn reload_swaps_catalog_and_keeps_it_on_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("regions.json");
        std::fs::write(
            &path,
            r#"[
                {
                    "id": "soweto",
                    "name": "Soweto",
                    "center": {"latitude": -26.2485, "longitude": 27.8540},
                    "radiusKm": 4.0
                }
            ]"#,
        )
        .unwrap();
        let client = Client::new(
            Arc::new(InMemorySource::new()),
            Arc::new(LogDelivery),
            RegionCatalog::builtin(),
            ProximityConfig {
                region_catalog_path: Some(path.clone()),
                ..ProximityConfig::default()
            },
        );
        let before = client.regions().await;

        assert_eq!(client.reload_regions().await.unwrap(), 1);
        let reloaded = client.regions().await;
        assert!(reloaded.get("soweto").is_some());
        assert!(reloaded.get("braamfontein").is_none());
        // snapshots taken before the reload are untouched
        assert_eq!(before.len(), 6);

        std::fs::write(&path, "[{ not json").unwrap();
        assert!(matches!(
            client.reload_regions().await,
            Err(CatalogError::Parse(_))
        ));
        let current = client.regions().await;
        assert_eq!(current.len(), 1);
        assert!(current.get("soweto").is_some());

        std::fs::remove_file(&path).unwrap();
        assert!(matches!(
            client.reload_regions().await,
            Err(CatalogError::Io(_))
        ));
        assert!(client.regions().await.get("soweto").is_some());
    }
}

use std::{fs, io, path::Path};

use itertools::Itertools;
use model::region::{default_regions, Region};
use thiserror::Error;
use utility::geo::{self, GeoError, GeoPoint};

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("could not read region catalog: {0}")]
    Io(#[from] io::Error),
    #[error("could not parse region catalog: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("region {id} has an invalid center: {why}")]
    InvalidCenter { id: String, why: GeoError },
    #[error("region {id} has an invalid radius {radius_km}")]
    InvalidRadius { id: String, radius_km: f64 },
    #[error("region id {0} appears more than once")]
    DuplicateId(String),
}

/// Every region whose circle contains `point`, in catalog order. Regions may
/// overlap, so a point can be in several of them.
pub fn regions_containing(point: &GeoPoint, catalog: &[Region]) -> Result<Vec<Region>, GeoError> {
    let point = point.validate()?;
    let mut result = vec![];
    for region in catalog {
        if geo::is_within_radius(&region.center, &point, region.radius_km)? {
            result.push(region.clone());
        }
    }
    Ok(result)
}

/// First in catalog order, not nearest center.
pub fn select_default(regions: &[Region]) -> Option<&Region> {
    regions.first()
}

/// The region the user asked for if they are inside it, otherwise the default.
pub fn select_region<'a>(regions: &'a [Region], requested: Option<&str>) -> Option<&'a Region> {
    requested
        .and_then(|requested| {
            regions
                .iter()
                .find(|region| region.id.raw_ref::<str>() == requested)
        })
        .or_else(|| select_default(regions))
}

/// Immutable, validated set of regions. Replaced as a whole on reload.
#[derive(Debug, Clone)]
pub struct RegionCatalog {
    regions: Vec<Region>,
}

impl RegionCatalog {
    pub fn new(regions: Vec<Region>) -> Result<Self, CatalogError> {
        if let Some(id) = regions.iter().map(|region| region.id.raw()).duplicates().next() {
            return Err(CatalogError::DuplicateId(id));
        }
        for region in &regions {
            let id = region.id.raw();
            region
                .center
                .validate()
                .map_err(|why| CatalogError::InvalidCenter {
                    id: id.clone(),
                    why,
                })?;
            if !region.radius_km.is_finite() || region.radius_km <= 0.0 {
                return Err(CatalogError::InvalidRadius {
                    id,
                    radius_km: region.radius_km,
                });
            }
        }
        Ok(Self { regions })
    }

    pub fn builtin() -> Self {
        Self {
            regions: default_regions(),
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self, CatalogError> {
        let regions: Vec<Region> = serde_json::from_str(json)?;
        Self::new(regions)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, CatalogError> {
        let json = fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Loads from `path` if given, falls back to the built-in catalog.
    pub fn load(path: Option<&Path>) -> Result<Self, CatalogError> {
        match path {
            Some(path) => {
                let catalog = Self::from_path(path)?;
                log::info!(
                    "loaded {} regions from {}",
                    catalog.len(),
                    path.display()
                );
                Ok(catalog)
            }
            None => Ok(Self::builtin()),
        }
    }

    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Region> {
        self.regions.iter().find(|region| region.id.raw_ref::<str>() == id)
    }

    pub fn containing(&self, point: &GeoPoint) -> Result<Vec<Region>, GeoError> {
        regions_containing(point, &self.regions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(latitude: f64, longitude: f64) -> GeoPoint {
        GeoPoint::new(latitude, longitude).unwrap()
    }

    fn ids(regions: &[Region]) -> Vec<String> {
        regions.iter().map(|region| region.id.raw()).collect()
    }

    #[test]
    fn point_in_overlapping_regions_keeps_catalog_order() {
        let catalog = RegionCatalog::builtin();
        let cbd = point(-26.2041, 28.0473);

        let containing = catalog.containing(&cbd).unwrap();

        assert_eq!(ids(&containing), vec!["braamfontein", "newtown", "joburg-cbd"]);
        assert_eq!(
            select_default(&containing).map(|region| region.id.raw()),
            Some("braamfontein".to_owned())
        );
    }

    #[test]
    fn point_outside_every_region() {
        let catalog = RegionCatalog::builtin();
        let containing = catalog.containing(&point(-26.30, 28.10)).unwrap();
        assert!(containing.is_empty());
        assert!(select_default(&containing).is_none());
    }

    #[test]
    fn boundary_point_is_contained() {
        let center = point(-26.1937, 28.0337);
        let edge = point(-26.2041, 28.0473);
        let radius = geo::distance_km(&center, &edge).unwrap();
        let catalog = vec![Region::new("edge", "Edge", center.latitude, center.longitude, radius)];

        assert_eq!(ids(&regions_containing(&edge, &catalog).unwrap()), vec!["edge"]);
    }

    #[test]
    fn requested_region_wins_only_if_containing() {
        let catalog = RegionCatalog::builtin();
        let containing = catalog.containing(&point(-26.2041, 28.0473)).unwrap();

        let chosen = select_region(&containing, Some("joburg-cbd")).unwrap();
        assert_eq!(chosen.id.raw(), "joburg-cbd");

        let fallback = select_region(&containing, Some("melville")).unwrap();
        assert_eq!(fallback.id.raw(), "braamfontein");
    }

    #[test]
    fn invalid_point_is_an_error() {
        let catalog = RegionCatalog::builtin();
        let bad = GeoPoint {
            latitude: 0.0,
            longitude: 200.0,
        };
        assert!(matches!(
            catalog.containing(&bad),
            Err(GeoError::InvalidLongitude(_))
        ));
    }

    #[test]
    fn catalog_parses_and_validates_json() {
        let catalog = RegionCatalog::from_json_str(
            r#"[
                {
                    "id": "a",
                    "name": "A",
                    "center": {"latitude": 1.0, "longitude": 2.0},
                    "radiusKm": 1.5
                }
            ]"#,
        )
        .unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.get("a").map(|region| region.radius_km), Some(1.5));

        let duplicate = RegionCatalog::new(vec![
            Region::new("a", "A", 0.0, 0.0, 1.0),
            Region::new("a", "A again", 1.0, 1.0, 1.0),
        ]);
        assert!(matches!(duplicate, Err(CatalogError::DuplicateId(id)) if id == "a"));

        let zero_radius = RegionCatalog::new(vec![Region::new("z", "Z", 0.0, 0.0, 0.0)]);
        assert!(matches!(zero_radius, Err(CatalogError::InvalidRadius { .. })));

        let bad_center = RegionCatalog::new(vec![Region::new("b", "B", 95.0, 0.0, 1.0)]);
        assert!(matches!(bad_center, Err(CatalogError::InvalidCenter { .. })));
    }

    #[test]
    fn missing_catalog_file_is_reported() {
        let result = RegionCatalog::load(Some(Path::new("/nonexistent/regions.json")));
        assert!(matches!(result, Err(CatalogError::Io(_))));
        assert_eq!(RegionCatalog::load(None).unwrap().len(), 6);
    }
}

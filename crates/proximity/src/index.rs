//! Distance filtering and ranking over pre-fetched candidates.
//!
//! Nothing here talks to a store. Candidates are expected to arrive already
//! narrowed down, typically by the bounding box of a [`SearchArea`]; fetching
//! a whole table and filtering it here is linear in the total population and
//! only acceptable for small data sets. Every result is re-checked with the
//! exact great-circle distance, so an over-inclusive pre-filter is harmless.

use std::collections::HashSet;

use model::{Locatable, WithDistance};
use schemars::JsonSchema;
use serde::Serialize;
use utility::geo::{self, BoundingBox, GeoError, GeoPoint};

/// What a candidate source is asked for: everything within `radius_km` of
/// `center`, at most `limit` records.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchArea {
    pub center: GeoPoint,
    pub radius_km: f64,
    pub limit: Option<usize>,
}

impl SearchArea {
    pub fn new(center: GeoPoint, radius_km: f64) -> geo::Result<Self> {
        Ok(Self {
            center: center.validate()?,
            radius_km: geo::validate_radius(radius_km)?,
            limit: None,
        })
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn bounding_box(&self) -> geo::Result<BoundingBox> {
        geo::calculate_bounding_box(&self.center, self.radius_km)
    }
}

/// Candidates within `radius_km` of `origin`, nearest first. Equal distances
/// are ordered by id so identical input always yields identical output.
pub fn nearby<T, I>(
    origin: &GeoPoint,
    radius_km: f64,
    candidates: I,
    exclude_ids: &HashSet<String>,
) -> Result<Vec<WithDistance<T>>, GeoError>
where
    T: Locatable,
    I: IntoIterator<Item = T>,
{
    let origin = origin.validate()?;
    let radius_km = geo::validate_radius(radius_km)?;

    let mut result = with_distances(&origin, candidates, exclude_ids)?
        .into_iter()
        .filter(|candidate| candidate.distance_km <= radius_km)
        .collect::<Vec<_>>();
    sort_by_distance(&mut result);
    Ok(result)
}

/// All candidates ranked by distance, without a radius cut.
#[derive(Debug, Clone, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Ranking<T> {
    pub located: Vec<WithDistance<T>>,
    /// Candidates without a usable position, ordered by id.
    pub unlocated: Vec<T>,
}

impl<T> Ranking<T> {
    pub fn len(&self) -> usize {
        self.located.len() + self.unlocated.len()
    }

    pub fn is_empty(&self) -> bool {
        self.located.is_empty() && self.unlocated.is_empty()
    }
}

pub fn rank_all<T, I>(origin: &GeoPoint, candidates: I) -> Result<Ranking<T>, GeoError>
where
    T: Locatable,
    I: IntoIterator<Item = T>,
{
    let origin = origin.validate()?;

    let mut located = vec![];
    let mut unlocated = vec![];
    for candidate in candidates {
        match usable_location(&candidate) {
            Some(location) => {
                let distance = geo::distance_km(&origin, &location)?;
                located.push(WithDistance::new(distance, candidate));
            }
            None => unlocated.push(candidate),
        }
    }
    sort_by_distance(&mut located);
    unlocated.sort_by(|a, b| a.entity_id().cmp(b.entity_id()));

    Ok(Ranking { located, unlocated })
}

fn with_distances<T, I>(
    origin: &GeoPoint,
    candidates: I,
    exclude_ids: &HashSet<String>,
) -> Result<Vec<WithDistance<T>>, GeoError>
where
    T: Locatable,
    I: IntoIterator<Item = T>,
{
    let mut result = vec![];
    for candidate in candidates {
        if exclude_ids.contains(candidate.entity_id()) {
            continue;
        }
        let Some(location) = usable_location(&candidate) else {
            continue;
        };
        let distance = geo::distance_km(origin, &location)?;
        result.push(WithDistance::new(distance, candidate));
    }
    Ok(result)
}

/// Stored positions are not trusted: a record with out-of-range coordinates
/// is treated like one without a position, and reported.
fn usable_location<T: Locatable>(candidate: &T) -> Option<GeoPoint> {
    let location = candidate.location()?;
    match location.validate() {
        Ok(location) => Some(location),
        Err(why) => {
            log::warn!(
                "ignoring candidate {} with unusable location: {}",
                candidate.entity_id(),
                why
            );
            None
        }
    }
}

fn sort_by_distance<T: Locatable>(values: &mut [WithDistance<T>]) {
    values.sort_by(|a, b| {
        a.distance_km
            .total_cmp(&b.distance_km)
            .then_with(|| a.content.entity_id().cmp(b.content.entity_id()))
    });
}

#[cfg(test)]
mod tests {
    use model::entity::{EntityKind, LocatedEntity};

    use super::*;

    fn point(latitude: f64, longitude: f64) -> GeoPoint {
        GeoPoint::new(latitude, longitude).unwrap()
    }

    fn user(id: &str, location: Option<GeoPoint>) -> LocatedEntity {
        LocatedEntity::new(id, EntityKind::User, location)
    }

    fn ids<T: Locatable>(values: &[WithDistance<T>]) -> Vec<&str> {
        values.iter().map(|v| v.content.entity_id()).collect()
    }

    const CBD: (f64, f64) = (-26.2041, 28.0473);

    #[test]
    fn keeps_only_candidates_within_radius() {
        let origin = point(CBD.0, CBD.1);
        let candidates = vec![
            user("a", Some(origin)),
            user("b", Some(point(-26.30, 28.10))),
        ];

        let result = nearby(&origin, 1.0, candidates, &HashSet::new()).unwrap();

        assert_eq!(ids(&result), vec!["a"]);
        assert!(result[0].distance_km.abs() < 1e-9);
    }

    #[test]
    fn never_returns_excluded_ids() {
        let origin = point(CBD.0, CBD.1);
        let candidates = vec![user("me", Some(origin)), user("you", Some(origin))];
        let exclude = HashSet::from(["me".to_owned()]);

        let result = nearby(&origin, 5.0, candidates, &exclude).unwrap();

        assert_eq!(ids(&result), vec!["you"]);
    }

    #[test]
    fn skips_candidates_without_usable_location() {
        let origin = point(CBD.0, CBD.1);
        let broken = GeoPoint {
            latitude: f64::NAN,
            longitude: 28.0,
        };
        let candidates = vec![
            user("missing", None),
            user("broken", Some(broken)),
            user("ok", Some(point(-26.2000, 28.0450))),
        ];

        let result = nearby(&origin, 5.0, candidates, &HashSet::new()).unwrap();

        assert_eq!(ids(&result), vec!["ok"]);
    }

    #[test]
    fn sorts_by_distance_then_id() {
        let origin = point(CBD.0, CBD.1);
        let near = point(-26.2050, 28.0473);
        let far = point(-26.2141, 28.0473);
        let candidates = vec![
            user("far", Some(far)),
            user("zulu", Some(near)),
            user("alpha", Some(near)),
        ];

        let first = nearby(&origin, 5.0, candidates.clone(), &HashSet::new()).unwrap();
        let mut reversed = candidates;
        reversed.reverse();
        let second = nearby(&origin, 5.0, reversed, &HashSet::new()).unwrap();

        assert_eq!(ids(&first), vec!["alpha", "zulu", "far"]);
        assert_eq!(ids(&first), ids(&second));
        assert!(first
            .windows(2)
            .all(|pair| pair[0].distance_km <= pair[1].distance_km));
    }

    #[test]
    fn boundary_distance_is_included() {
        let origin = point(CBD.0, CBD.1);
        let other = point(-26.1937, 28.0337);
        let exact = geo::distance_km(&origin, &other).unwrap();

        let result = nearby(&origin, exact, vec![user("edge", Some(other))], &HashSet::new())
            .unwrap();

        assert_eq!(ids(&result), vec!["edge"]);
    }

    #[test]
    fn rejects_invalid_origin_and_radius() {
        let bad_origin = GeoPoint {
            latitude: 91.0,
            longitude: 0.0,
        };
        let candidates: Vec<LocatedEntity> = vec![];
        assert!(matches!(
            nearby(&bad_origin, 1.0, candidates.clone(), &HashSet::new()),
            Err(GeoError::InvalidLatitude(_))
        ));
        assert!(matches!(
            nearby(&point(0.0, 0.0), f64::NAN, candidates, &HashSet::new()),
            Err(GeoError::InvalidRadius(_))
        ));
    }

    #[test]
    fn rank_all_lists_unlocated_last() {
        let origin = point(CBD.0, CBD.1);
        let candidates = vec![
            user("c", None),
            user("far", Some(point(-26.30, 28.10))),
            user("a", None),
            user("near", Some(origin)),
        ];

        let ranking = rank_all(&origin, candidates).unwrap();

        assert_eq!(ids(&ranking.located), vec!["near", "far"]);
        let unlocated = ranking
            .unlocated
            .iter()
            .map(|v| v.entity_id())
            .collect::<Vec<_>>();
        assert_eq!(unlocated, vec!["a", "c"]);
        assert_eq!(ranking.len(), 4);
    }

    #[test]
    fn search_area_box_contains_its_center() {
        let area = SearchArea::new(point(CBD.0, CBD.1), 2.0).unwrap().with_limit(10);
        let bbox = area.bounding_box().unwrap();
        assert!(bbox.contains(&area.center));
        assert_eq!(area.limit, Some(10));
        assert!(SearchArea::new(point(0.0, 0.0), -1.0).is_err());
    }
}

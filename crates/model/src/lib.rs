use std::fmt::Debug;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
pub use serde_with;
use utility::geo::GeoPoint;
use utility::id::{HasId, Id};

pub mod alert;
pub mod entity;
pub mod incident;
pub mod notification;
pub mod region;
pub mod transit;
pub mod user;

pub use utility::geo;

pub trait ExampleData {
    fn example_data() -> Self;
}

/// A record with its great-circle distance to the point a query was made
/// from. Produced fresh per query, never stored.
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct WithDistance<T> {
    pub distance_km: f64,
    #[serde(flatten)]
    pub content: T,
}

impl<T> WithDistance<T> {
    pub fn new(distance_km: f64, content: T) -> Self {
        Self {
            distance_km,
            content,
        }
    }

    pub fn map<U, F>(self, f: F) -> WithDistance<U>
    where
        F: FnOnce(T) -> U,
    {
        WithDistance::new(self.distance_km, f(self.content))
    }
}

#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct WithId<V>
where
    V: HasId,
    V::IdType: Serialize + Debug + Clone,
{
    pub id: Id<V>,
    #[serde(flatten)]
    pub content: V,
}

impl<V> WithId<V>
where
    V: HasId,
    V::IdType: Serialize + Debug + Clone,
{
    pub fn new(id: Id<V>, content: V) -> Self {
        Self { id, content }
    }
}

/// Anything the proximity layer can place on the map. Records without a
/// usable position return `None` and are skipped by every distance query.
pub trait Locatable {
    fn entity_id(&self) -> &str;
    fn location(&self) -> Option<GeoPoint>;
}

/// A located record that may receive push notifications.
pub trait Deliverable: Locatable {
    fn delivery_address(&self) -> Option<&str>;
}

/// Typed records which carry an optional position.
pub trait HasLocation {
    fn location(&self) -> Option<GeoPoint>;
}

impl<V> Locatable for WithId<V>
where
    V: HasId<IdType = String> + HasLocation,
{
    fn entity_id(&self) -> &str {
        self.id.inner()
    }

    fn location(&self) -> Option<GeoPoint> {
        self.content.location()
    }
}

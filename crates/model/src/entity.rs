use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use utility::{
    geo::GeoPoint,
    id::{HasId, Id},
};

use crate::{
    incident::IncidentReport,
    transit::{BusStop, TaxiRank},
    user::User,
    Deliverable, ExampleData, Locatable, WithId,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub enum EntityKind {
    User,
    BusStop,
    TaxiRank,
    Incident,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::BusStop => "busStop",
            Self::TaxiRank => "taxiRank",
            Self::Incident => "incident",
        }
    }
}

/// Read-only snapshot of a record owned by the store, reduced to what the
/// proximity layer needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct LocatedEntity {
    pub id: Id<LocatedEntity>,
    pub kind: EntityKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<GeoPoint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing, default)]
    pub delivery_address: Option<String>,
}

impl HasId for LocatedEntity {
    type IdType = String;
}

impl LocatedEntity {
    pub fn new<S: Into<String>>(id: S, kind: EntityKind, location: Option<GeoPoint>) -> Self {
        Self {
            id: Id::new(id.into()),
            kind,
            location,
            name: None,
            delivery_address: None,
        }
    }

    pub fn with_name<S: Into<String>>(mut self, name: S) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_delivery_address<S: Into<String>>(mut self, address: S) -> Self {
        self.delivery_address = Some(address.into());
        self
    }
}

impl Locatable for LocatedEntity {
    fn entity_id(&self) -> &str {
        self.id.inner()
    }

    fn location(&self) -> Option<GeoPoint> {
        self.location
    }
}

impl Deliverable for LocatedEntity {
    fn delivery_address(&self) -> Option<&str> {
        self.delivery_address.as_deref()
    }
}

impl Deliverable for WithId<User> {
    fn delivery_address(&self) -> Option<&str> {
        self.content.push_token.as_deref()
    }
}

impl From<WithId<User>> for LocatedEntity {
    fn from(user: WithId<User>) -> Self {
        Self {
            id: user.id.cast(),
            kind: EntityKind::User,
            location: user.content.location,
            name: user.content.display_name,
            delivery_address: user.content.push_token,
        }
    }
}

impl From<WithId<BusStop>> for LocatedEntity {
    fn from(stop: WithId<BusStop>) -> Self {
        Self {
            id: stop.id.cast(),
            kind: EntityKind::BusStop,
            location: stop.content.location,
            name: Some(stop.content.name),
            delivery_address: None,
        }
    }
}

impl From<WithId<TaxiRank>> for LocatedEntity {
    fn from(rank: WithId<TaxiRank>) -> Self {
        Self {
            id: rank.id.cast(),
            kind: EntityKind::TaxiRank,
            location: rank.content.location,
            name: Some(rank.content.name),
            delivery_address: None,
        }
    }
}

impl From<WithId<IncidentReport>> for LocatedEntity {
    fn from(report: WithId<IncidentReport>) -> Self {
        Self {
            id: report.id.cast(),
            kind: EntityKind::Incident,
            location: report.content.location,
            name: Some(report.content.kind.as_str().to_owned()),
            delivery_address: None,
        }
    }
}

impl ExampleData for LocatedEntity {
    fn example_data() -> Self {
        LocatedEntity::new(
            "bree-street-rank",
            EntityKind::TaxiRank,
            Some(GeoPoint {
                latitude: -26.2010,
                longitude: 28.0393,
            }),
        )
        .with_name("Bree Street Taxi Rank")
    }
}

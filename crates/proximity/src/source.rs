use async_trait::async_trait;
use model::{
    entity::{EntityKind, LocatedEntity},
    incident::IncidentReport,
    transit::{BusStop, TaxiRank},
    user::User,
    Locatable, WithId,
};
use tokio::sync::RwLock;

use crate::{index::SearchArea, SourceError};

pub type Result<T> = std::result::Result<T, SourceError>;

/// Read access to the records owned by the store.
///
/// `area` is a hint: implementations should use it to pre-filter (e.g. by
/// bounding box) and to cap the result size, but may return more than what
/// lies inside the circle. `None` asks for the complete snapshot. A failed
/// read must be reported as an error, never as an empty list.
#[async_trait]
pub trait CandidateSource: Send + Sync {
    async fn users(&self, area: Option<&SearchArea>) -> Result<Vec<WithId<User>>>;
    async fn bus_stops(&self, area: Option<&SearchArea>) -> Result<Vec<WithId<BusStop>>>;
    async fn taxi_ranks(&self, area: Option<&SearchArea>) -> Result<Vec<WithId<TaxiRank>>>;
    async fn incidents(&self, area: Option<&SearchArea>)
        -> Result<Vec<WithId<IncidentReport>>>;

    async fn located(
        &self,
        kind: EntityKind,
        area: Option<&SearchArea>,
    ) -> Result<Vec<LocatedEntity>> {
        Ok(match kind {
            EntityKind::User => into_located(self.users(area).await?),
            EntityKind::BusStop => into_located(self.bus_stops(area).await?),
            EntityKind::TaxiRank => into_located(self.taxi_ranks(area).await?),
            EntityKind::Incident => into_located(self.incidents(area).await?),
        })
    }
}

fn into_located<T: Into<LocatedEntity>>(values: Vec<T>) -> Vec<LocatedEntity> {
    values.into_iter().map(Into::into).collect()
}

/// A store held in process memory. Applies the same bounding box pre-filter
/// and cap a database backed source would.
#[derive(Debug, Default)]
pub struct InMemorySource {
    users: RwLock<Vec<WithId<User>>>,
    bus_stops: RwLock<Vec<WithId<BusStop>>>,
    taxi_ranks: RwLock<Vec<WithId<TaxiRank>>>,
    incidents: RwLock<Vec<WithId<IncidentReport>>>,
}

impl InMemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_users(self, users: Vec<WithId<User>>) -> Self {
        Self {
            users: RwLock::new(users),
            ..self
        }
    }

    pub fn with_bus_stops(self, bus_stops: Vec<WithId<BusStop>>) -> Self {
        Self {
            bus_stops: RwLock::new(bus_stops),
            ..self
        }
    }

    pub fn with_taxi_ranks(self, taxi_ranks: Vec<WithId<TaxiRank>>) -> Self {
        Self {
            taxi_ranks: RwLock::new(taxi_ranks),
            ..self
        }
    }

    pub fn with_incidents(self, incidents: Vec<WithId<IncidentReport>>) -> Self {
        Self {
            incidents: RwLock::new(incidents),
            ..self
        }
    }

    /// Inserts or replaces a user by id.
    pub async fn put_user(&self, user: WithId<User>) {
        let mut users = self.users.write().await;
        match users.iter_mut().find(|existing| existing.id == user.id) {
            Some(existing) => *existing = user,
            None => users.push(user),
        }
    }
}

fn select<T>(values: &[T], area: Option<&SearchArea>) -> Result<Vec<T>>
where
    T: Locatable + Clone,
{
    let Some(area) = area else {
        return Ok(values.to_vec());
    };
    let bbox = area.bounding_box().map_err(SourceError::other)?;
    let selected = values
        .iter()
        .filter(|value| {
            value
                .location()
                .map(|location| bbox.contains(&location))
                .unwrap_or(false)
        })
        .take(area.limit.unwrap_or(usize::MAX))
        .cloned()
        .collect();
    Ok(selected)
}

#[async_trait]
impl CandidateSource for InMemorySource {
    async fn users(&self, area: Option<&SearchArea>) -> Result<Vec<WithId<User>>> {
        select(&self.users.read().await, area)
    }

    async fn bus_stops(&self, area: Option<&SearchArea>) -> Result<Vec<WithId<BusStop>>> {
        select(&self.bus_stops.read().await, area)
    }

    async fn taxi_ranks(&self, area: Option<&SearchArea>) -> Result<Vec<WithId<TaxiRank>>> {
        select(&self.taxi_ranks.read().await, area)
    }

    async fn incidents(
        &self,
        area: Option<&SearchArea>,
    ) -> Result<Vec<WithId<IncidentReport>>> {
        select(&self.incidents.read().await, area)
    }
}

use model::transit::BusStop;
use sqlx::prelude::FromRow;
use utility::id::Id;

use super::{location_of, DatabaseRow};

#[derive(Debug, Clone, FromRow)]
pub struct BusStopRow {
    pub id: String,
    pub name: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub routes: Vec<String>,
}

impl DatabaseRow for BusStopRow {
    type Model = BusStop;

    fn get_id(&self) -> Id<Self::Model> {
        Id::new(self.id.clone())
    }

    fn to_model(self) -> Self::Model {
        BusStop {
            name: self.name,
            location: location_of(self.latitude, self.longitude),
            routes: self.routes,
        }
    }
}

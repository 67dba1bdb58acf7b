use model::transit::{FareEstimate, TaxiRank};
use sqlx::{prelude::FromRow, types::Json};
use utility::id::Id;

use super::{location_of, DatabaseRow};

#[derive(Debug, Clone, FromRow)]
pub struct TaxiRankRow {
    pub id: String,
    pub name: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub area: Option<String>,
    pub description: Option<String>,
    pub pickup_points: Vec<String>,
    pub fare_estimates: Json<Vec<FareEstimate>>,
}

impl DatabaseRow for TaxiRankRow {
    type Model = TaxiRank;

    fn get_id(&self) -> Id<Self::Model> {
        Id::new(self.id.clone())
    }

    fn to_model(self) -> Self::Model {
        TaxiRank {
            name: self.name,
            location: location_of(self.latitude, self.longitude),
            area: self.area,
            description: self.description,
            pickup_points: self.pickup_points,
            fare_estimates: self.fare_estimates.0,
        }
    }
}

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use utility::{geo::GeoPoint, id::HasId};

use crate::{ExampleData, HasLocation};

#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct BusStop {
    pub name: String,
    pub location: Option<GeoPoint>,
    #[serde(default)]
    pub routes: Vec<String>,
}

impl HasId for BusStop {
    type IdType = String;
}

impl HasLocation for BusStop {
    fn location(&self) -> Option<GeoPoint> {
        self.location
    }
}

impl ExampleData for BusStop {
    fn example_data() -> Self {
        Self {
            name: "Rea Vaya Library Gardens".to_owned(),
            location: Some(GeoPoint {
                latitude: -26.2039,
                longitude: 28.0436,
            }),
            routes: vec!["T1".to_owned(), "C4".to_owned()],
        }
    }
}

#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct FareEstimate {
    pub destination: String,
    pub fare: f64,
}

#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TaxiRank {
    pub name: String,
    pub location: Option<GeoPoint>,
    pub area: Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    pub pickup_points: Vec<String>,
    #[serde(default)]
    pub fare_estimates: Vec<FareEstimate>,
}

impl HasId for TaxiRank {
    type IdType = String;
}

impl HasLocation for TaxiRank {
    fn location(&self) -> Option<GeoPoint> {
        self.location
    }
}

impl ExampleData for TaxiRank {
    fn example_data() -> Self {
        Self {
            name: "Bree Street Taxi Rank".to_owned(),
            location: Some(GeoPoint {
                latitude: -26.2010,
                longitude: 28.0393,
            }),
            area: Some("Johannesburg CBD".to_owned()),
            description: None,
            pickup_points: vec!["Bree Street".to_owned()],
            fare_estimates: vec![FareEstimate {
                destination: "Soweto".to_owned(),
                fare: 18.0,
            }],
        }
    }
}

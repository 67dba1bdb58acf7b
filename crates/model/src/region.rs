use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use utility::{
    geo::GeoPoint,
    id::{HasId, Id},
};

use crate::ExampleData;

/// A named circular area, e.g. the scope of an area chat room.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Region {
    pub id: Id<Region>,
    pub name: String,
    pub center: GeoPoint,
    pub radius_km: f64,
}

impl HasId for Region {
    type IdType = String;
}

impl Region {
    pub fn new<I, N>(id: I, name: N, latitude: f64, longitude: f64, radius_km: f64) -> Self
    where
        I: Into<String>,
        N: Into<String>,
    {
        Self {
            id: Id::new(id.into()),
            name: name.into(),
            center: GeoPoint {
                latitude,
                longitude,
            },
            radius_km,
        }
    }
}

impl ExampleData for Region {
    fn example_data() -> Self {
        Region::new("braamfontein", "Braamfontein", -26.1937, 28.0337, 2.5)
    }
}

/// The built-in Johannesburg area rooms, in catalog order.
pub fn default_regions() -> Vec<Region> {
    vec![
        Region::new("braamfontein", "Braamfontein", -26.1937, 28.0337, 2.5),
        Region::new("parktown", "Parktown", -26.1833, 28.0333, 2.0),
        Region::new("hillbrow", "Hillbrow", -26.1885, 28.0432, 1.5),
        Region::new("newtown", "Newtown", -26.2038, 28.0366, 1.5),
        Region::new("joburg-cbd", "Johannesburg CBD", -26.2041, 28.0473, 3.0),
        Region::new("melville", "Melville", -26.1745, 27.9975, 2.0),
    ]
}

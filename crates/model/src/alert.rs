use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use utility::{
    geo::GeoPoint,
    id::{HasId, Id},
};

use crate::{user::User, ExampleData};

pub const ALERT_TITLE: &str = "🚨 SOS Alert Nearby!";
pub const ALERT_BODY: &str = "A user has activated an emergency alert in your vicinity. \
    Please check if you can assist.";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub enum AlertStatus {
    #[default]
    Active,
    Resolved,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SosAlert {
    pub id: Id<SosAlert>,
    pub user_id: Id<User>,
    pub location: GeoPoint,
    /// Milliseconds since the unix epoch on the wire.
    #[serde(with = "chrono::serde::ts_milliseconds")]
    #[schemars(with = "i64")]
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub status: AlertStatus,
}

impl HasId for SosAlert {
    type IdType = String;
}

impl SosAlert {
    pub fn is_active(&self) -> bool {
        self.status == AlertStatus::Active
    }

    pub fn payload(&self) -> AlertPayload {
        let data = BTreeMap::from([
            ("type".to_owned(), "sos_alert".to_owned()),
            ("alertId".to_owned(), self.id.raw()),
            ("userId".to_owned(), self.user_id.raw()),
            ("latitude".to_owned(), self.location.latitude.to_string()),
            ("longitude".to_owned(), self.location.longitude.to_string()),
            (
                "timestamp".to_owned(),
                self.timestamp.timestamp_millis().to_string(),
            ),
        ]);
        AlertPayload {
            title: ALERT_TITLE.to_owned(),
            body: ALERT_BODY.to_owned(),
            data,
        }
    }
}

impl ExampleData for SosAlert {
    fn example_data() -> Self {
        Self {
            id: Id::from("alert-1"),
            user_id: Id::from("u-42"),
            location: GeoPoint {
                latitude: -26.2041,
                longitude: 28.0473,
            },
            timestamp: DateTime::from_timestamp(1_700_000_000, 0).unwrap_or_default(),
            status: AlertStatus::Active,
        }
    }
}

/// The message handed to the delivery collaborator, identical for every
/// recipient of one alert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AlertPayload {
    pub title: String,
    pub body: String,
    pub data: BTreeMap<String, String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alert_reads_millisecond_timestamps() {
        let alert: SosAlert = serde_json::from_str(
            r#"{
                "id": "a1",
                "userId": "u1",
                "location": {"latitude": -26.2041, "longitude": 28.0473},
                "timestamp": 1700000000123
            }"#,
        )
        .unwrap();
        assert!(alert.is_active());
        assert_eq!(alert.timestamp.timestamp_millis(), 1_700_000_000_123);
    }

    #[test]
    fn payload_carries_alert_coordinates() {
        let alert = SosAlert::example_data();
        let payload = alert.payload();
        assert_eq!(payload.title, "🚨 SOS Alert Nearby!");
        assert_eq!(payload.data["type"], "sos_alert");
        assert_eq!(payload.data["alertId"], "alert-1");
        assert_eq!(payload.data["userId"], "u-42");
        assert_eq!(payload.data["latitude"], "-26.2041");
        assert_eq!(payload.data["timestamp"], "1700000000000");
    }
}

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use utility::{geo::GeoPoint, id::HasId};

use crate::{ExampleData, HasLocation};

/// Same spelling in JSON and in the store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum EmergencyStatus {
    #[default]
    Normal,
    SosActive,
}

impl EmergencyStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::SosActive => "sos-active",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "normal" => Some(Self::Normal),
            "sos-active" => Some(Self::SosActive),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<GeoPoint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location_accuracy_m: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location_updated: Option<DateTime<Utc>>,
    #[serde(default)]
    pub emergency_status: EmergencyStatus,
    /// Push messaging token. Never leaves the service.
    #[serde(skip_serializing, default)]
    pub push_token: Option<String>,
}

impl HasId for User {
    type IdType = String;
}

impl HasLocation for User {
    fn location(&self) -> Option<GeoPoint> {
        self.location
    }
}

impl ExampleData for User {
    fn example_data() -> Self {
        Self {
            display_name: Some("Thandi".to_owned()),
            email: None,
            location: Some(GeoPoint {
                latitude: -26.1937,
                longitude: 28.0337,
            }),
            location_accuracy_m: Some(12.0),
            location_updated: None,
            emergency_status: EmergencyStatus::Normal,
            push_token: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn emergency_status_uses_one_spelling() {
        for status in [EmergencyStatus::Normal, EmergencyStatus::SosActive] {
            let json = serde_json::to_value(status).unwrap();
            assert_eq!(json, status.as_str());
            assert_eq!(EmergencyStatus::from_name(status.as_str()), Some(status));
        }
        let user: User = serde_json::from_str(r#"{"emergencyStatus": "sos-active"}"#).unwrap();
        assert_eq!(user.emergency_status, EmergencyStatus::SosActive);
    }
}

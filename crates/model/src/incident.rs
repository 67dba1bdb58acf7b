use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use utility::{geo::GeoPoint, id::HasId};

use crate::{ExampleData, HasLocation};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub enum IncidentKind {
    Theft,
    Harassment,
    Suspicious,
    Accident,
    Unsafe,
    Other,
}

impl IncidentKind {
    /// Heatmap weight, 1 (least) to 5 (most severe).
    pub fn severity(&self) -> u8 {
        match self {
            Self::Theft => 3,
            Self::Harassment => 4,
            Self::Suspicious => 2,
            Self::Accident => 5,
            Self::Unsafe => 3,
            Self::Other => 1,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Theft => "theft",
            Self::Harassment => "harassment",
            Self::Suspicious => "suspicious",
            Self::Accident => "accident",
            Self::Unsafe => "unsafe",
            Self::Other => "other",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "theft" => Self::Theft,
            "harassment" => Self::Harassment,
            "suspicious" => Self::Suspicious,
            "accident" => Self::Accident,
            "unsafe" => Self::Unsafe,
            "other" => Self::Other,
            _ => return None,
        })
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub enum ReportStatus {
    #[default]
    Pending,
    Reviewed,
    Resolved,
}

impl ReportStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Reviewed => "reviewed",
            Self::Resolved => "resolved",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "pending" => Self::Pending,
            "reviewed" => Self::Reviewed,
            "resolved" => Self::Resolved,
            _ => return None,
        })
    }
}

#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct IncidentReport {
    pub user_id: String,
    pub kind: IncidentKind,
    pub description: String,
    pub location: Option<GeoPoint>,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub status: ReportStatus,
}

impl IncidentReport {
    pub fn severity(&self) -> u8 {
        self.kind.severity()
    }
}

impl HasId for IncidentReport {
    type IdType = String;
}

impl HasLocation for IncidentReport {
    fn location(&self) -> Option<GeoPoint> {
        self.location
    }
}

impl ExampleData for IncidentReport {
    fn example_data() -> Self {
        Self {
            user_id: "u-42".to_owned(),
            kind: IncidentKind::Theft,
            description: "Phone snatched near the station entrance".to_owned(),
            location: Some(GeoPoint {
                latitude: -26.1952,
                longitude: 28.0416,
            }),
            timestamp: DateTime::from_timestamp(1_700_000_000, 0).unwrap_or_default(),
            status: ReportStatus::Pending,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_follows_kind() {
        assert_eq!(IncidentKind::Accident.severity(), 5);
        assert_eq!(IncidentKind::Harassment.severity(), 4);
        assert_eq!(IncidentKind::Other.severity(), 1);
    }

    #[test]
    fn kind_uses_lowercase_names() {
        let kind: IncidentKind = serde_json::from_str("\"suspicious\"").unwrap();
        assert_eq!(kind, IncidentKind::Suspicious);
        assert_eq!(kind.as_str(), "suspicious");
        assert_eq!(IncidentKind::from_name("unsafe"), Some(IncidentKind::Unsafe));
        assert_eq!(IncidentKind::from_name("Unsafe"), None);
    }
}

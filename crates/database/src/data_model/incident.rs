use chrono::{DateTime, Utc};
use model::incident::{IncidentKind, IncidentReport, ReportStatus};
use sqlx::prelude::FromRow;
use utility::id::Id;

use super::{location_of, DatabaseRow};

#[derive(Debug, Clone, FromRow)]
pub struct IncidentRow {
    pub id: String,
    pub user_id: String,
    pub kind: String,
    pub description: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub reported_at: DateTime<Utc>,
    pub status: String,
}

impl DatabaseRow for IncidentRow {
    type Model = IncidentReport;

    fn get_id(&self) -> Id<Self::Model> {
        Id::new(self.id.clone())
    }

    fn to_model(self) -> Self::Model {
        let kind = IncidentKind::from_name(&self.kind).unwrap_or_else(|| {
            log::warn!("incident {}: unknown kind {:?}", self.id, self.kind);
            IncidentKind::Other
        });
        let status = ReportStatus::from_name(&self.status).unwrap_or_else(|| {
            log::warn!("incident {}: unknown status {:?}", self.id, self.status);
            ReportStatus::Pending
        });
        IncidentReport {
            user_id: self.user_id,
            kind,
            description: self.description,
            location: location_of(self.latitude, self.longitude),
            timestamp: self.reported_at,
            status,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_kind_falls_back_to_other() {
        let row = IncidentRow {
            id: "i-1".to_owned(),
            user_id: "u-1".to_owned(),
            kind: "vandalism".to_owned(),
            description: String::new(),
            latitude: None,
            longitude: None,
            reported_at: DateTime::from_timestamp(1_700_000_000, 0).unwrap(),
            status: "reviewed".to_owned(),
        };
        let report = row.to_model();
        assert_eq!(report.kind, IncidentKind::Other);
        assert_eq!(report.status, ReportStatus::Reviewed);
        assert!(report.location.is_none());
    }
}

use chrono::{DateTime, Utc};
use model::user::{EmergencyStatus, User};
use sqlx::prelude::FromRow;
use utility::id::Id;

use super::{location_of, DatabaseRow};

#[derive(Debug, Clone, FromRow)]
pub struct UserRow {
    pub id: String,
    pub display_name: Option<String>,
    pub email: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub location_accuracy_m: Option<f64>,
    pub location_updated: Option<DateTime<Utc>>,
    pub emergency_status: String,
    pub push_token: Option<String>,
}

impl DatabaseRow for UserRow {
    type Model = User;

    fn get_id(&self) -> Id<Self::Model> {
        Id::new(self.id.clone())
    }

    fn to_model(self) -> Self::Model {
        let emergency_status = EmergencyStatus::from_name(&self.emergency_status)
            .unwrap_or_else(|| {
                log::warn!(
                    "user {}: unknown emergency status {:?}",
                    self.id,
                    self.emergency_status
                );
                EmergencyStatus::Normal
            });
        User {
            display_name: self.display_name,
            email: self.email,
            location: location_of(self.latitude, self.longitude),
            location_accuracy_m: self.location_accuracy_m,
            location_updated: self.location_updated,
            emergency_status,
            push_token: self.push_token,
        }
    }
}

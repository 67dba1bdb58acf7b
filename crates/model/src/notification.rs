use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use utility::id::Id;

use crate::entity::LocatedEntity;

/// Result of one delivery attempt within a fanout.
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct NotificationOutcome {
    pub recipient_id: Id<LocatedEntity>,
    pub delivered: bool,
    pub error_reason: Option<String>,
}

impl NotificationOutcome {
    pub fn delivered(recipient_id: Id<LocatedEntity>) -> Self {
        Self {
            recipient_id,
            delivered: true,
            error_reason: None,
        }
    }

    pub fn failed<S: Into<String>>(recipient_id: Id<LocatedEntity>, reason: S) -> Self {
        Self {
            recipient_id,
            delivered: false,
            error_reason: Some(reason.into()),
        }
    }
}

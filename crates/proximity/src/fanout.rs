//! SOS fanout: find who is close to an alert and notify each of them.
//!
//! Deliveries run concurrently and are isolated from each other: a failed
//! send only shows up in that recipient's outcome. The call returns once every
//! delivery has settled. Dropping the returned future does not recall
//! messages that were already handed to the delivery collaborator.

use std::collections::HashSet;

use futures::{stream, StreamExt};
use itertools::Itertools;
use model::{
    alert::SosAlert, entity::LocatedEntity, notification::NotificationOutcome, Deliverable,
    Locatable, WithDistance,
};
use schemars::JsonSchema;
use serde::Serialize;
use utility::{geo::GeoError, id::Id};

use crate::{
    delivery::MessageDelivery,
    index::{self, SearchArea},
    source::CandidateSource,
    RequestResult,
};

#[derive(Debug, Clone, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DispatchReport {
    pub alert_id: Id<SosAlert>,
    pub radius_km: f64,
    /// Candidates inside the radius, originator excluded.
    pub in_range: usize,
    /// Of those, the ones with a delivery address.
    pub eligible: usize,
    pub outcomes: Vec<NotificationOutcome>,
}

impl DispatchReport {
    fn empty(alert: &SosAlert, radius_km: f64) -> Self {
        Self {
            alert_id: alert.id.clone(),
            radius_km,
            in_range: 0,
            eligible: 0,
            outcomes: vec![],
        }
    }

    pub fn delivered(&self) -> usize {
        self.outcomes.iter().filter(|outcome| outcome.delivered).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.delivered()
    }
}

/// Notifies every candidate within `radius_km` of the alert, except the
/// originator and candidates without a delivery address. Each recipient id is
/// sent at most one message, even if the candidate list repeats it.
pub async fn dispatch_to<T, D>(
    alert: &SosAlert,
    radius_km: f64,
    candidates: Vec<T>,
    delivery: &D,
    max_concurrent: usize,
) -> Result<DispatchReport, GeoError>
where
    T: Deliverable,
    D: MessageDelivery + ?Sized,
{
    let exclude = HashSet::from([alert.user_id.raw()]);
    // nearest first, so a repeated id keeps its nearest entry
    let in_range = index::nearby(&alert.location, radius_km, candidates, &exclude)?
        .into_iter()
        .unique_by(|candidate| candidate.content.entity_id().to_owned())
        .collect::<Vec<_>>();
    let num_in_range = in_range.len();

    let recipients = in_range
        .into_iter()
        .filter_map(|WithDistance { content, .. }| {
            let address = content
                .delivery_address()
                .filter(|address| !address.trim().is_empty())?
                .to_owned();
            Some((Id::<LocatedEntity>::new(content.entity_id().to_owned()), address))
        })
        .collect::<Vec<_>>();
    let eligible = recipients.len();

    let payload = alert.payload();
    let outcomes = stream::iter(recipients)
        .map(|(recipient_id, address)| {
            let payload = &payload;
            async move {
                match delivery.deliver(&address, payload).await {
                    Ok(()) => NotificationOutcome::delivered(recipient_id),
                    Err(why) => {
                        log::warn!(
                            "alert {}: delivery to {} failed: {}",
                            alert.id,
                            recipient_id,
                            why
                        );
                        NotificationOutcome::failed(recipient_id, why.to_string())
                    }
                }
            }
        })
        .buffered(max_concurrent.max(1))
        .collect::<Vec<_>>()
        .await;

    let report = DispatchReport {
        alert_id: alert.id.clone(),
        radius_km,
        in_range: num_in_range,
        eligible,
        outcomes,
    };
    log::info!(
        "alert {}: {} in range, {} eligible, {} delivered, {} failed",
        alert.id,
        report.in_range,
        report.eligible,
        report.delivered(),
        report.failed()
    );
    Ok(report)
}

/// Fetches candidates for the alert area and fans out. If the fetch fails
/// nothing is sent; dispatching to a partial candidate list would notify an
/// arbitrary subset.
pub async fn dispatch_alert<S, D>(
    alert: &SosAlert,
    radius_km: f64,
    source: &S,
    delivery: &D,
    max_candidates: Option<usize>,
    max_concurrent: usize,
) -> RequestResult<DispatchReport>
where
    S: CandidateSource + ?Sized,
    D: MessageDelivery + ?Sized,
{
    if !alert.is_active() {
        log::info!("alert {} is not active, skipping", alert.id);
        return Ok(DispatchReport::empty(alert, radius_km));
    }

    let mut area = SearchArea::new(alert.location, radius_km)?;
    if let Some(limit) = max_candidates {
        area = area.with_limit(limit);
    }
    let candidates = source.users(Some(&area)).await.map_err(|why| {
        log::error!("alert {}: could not fetch candidates: {}", alert.id, why);
        why
    })?;
    if max_candidates.is_some_and(|limit| candidates.len() >= limit) {
        log::warn!(
            "alert {}: candidate cap of {} reached, recall may be incomplete",
            alert.id,
            candidates.len()
        );
    }

    Ok(dispatch_to(alert, radius_km, candidates, delivery, max_concurrent).await?)
}

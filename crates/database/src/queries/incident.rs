use model::{incident::IncidentReport, WithId};
use proximity::{index::SearchArea, source::Result};
use sqlx::{Executor, Postgres};

use super::select_in_area;
use crate::data_model::{incident::IncidentRow, with_ids};

const COLUMNS: &[&str] = &[
    "id",
    "user_id",
    "kind",
    "description",
    "latitude",
    "longitude",
    "reported_at",
    "status",
];

pub async fn get_in_area<'c, E>(
    executor: E,
    area: Option<&SearchArea>,
) -> Result<Vec<WithId<IncidentReport>>>
where
    E: Executor<'c, Database = Postgres>,
{
    let rows: Vec<IncidentRow> =
        select_in_area(executor, "incident_reports", COLUMNS, area).await?;
    Ok(with_ids(rows))
}

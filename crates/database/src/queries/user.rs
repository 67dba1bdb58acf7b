use model::{user::User, WithId};
use proximity::{index::SearchArea, source::Result};
use sqlx::{Executor, Postgres};

use super::select_in_area;
use crate::data_model::{user::UserRow, with_ids};

const COLUMNS: &[&str] = &[
    "id",
    "display_name",
    "email",
    "latitude",
    "longitude",
    "location_accuracy_m",
    "location_updated",
    "emergency_status",
    "push_token",
];

pub async fn get_in_area<'c, E>(
    executor: E,
    area: Option<&SearchArea>,
) -> Result<Vec<WithId<User>>>
where
    E: Executor<'c, Database = Postgres>,
{
    let rows: Vec<UserRow> = select_in_area(executor, "users", COLUMNS, area).await?;
    Ok(with_ids(rows))
}

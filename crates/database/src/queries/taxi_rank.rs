use model::{transit::TaxiRank, WithId};
use proximity::{index::SearchArea, source::Result};
use sqlx::{Executor, Postgres};

use super::select_in_area;
use crate::data_model::{taxi_rank::TaxiRankRow, with_ids};

const COLUMNS: &[&str] = &[
    "id",
    "name",
    "latitude",
    "longitude",
    "area",
    "description",
    "pickup_points",
    "fare_estimates",
];

pub async fn get_in_area<'c, E>(
    executor: E,
    area: Option<&SearchArea>,
) -> Result<Vec<WithId<TaxiRank>>>
where
    E: Executor<'c, Database = Postgres>,
{
    let rows: Vec<TaxiRankRow> = select_in_area(executor, "taxi_ranks", COLUMNS, area).await?;
    Ok(with_ids(rows))
}

use model::{transit::BusStop, WithId};
use proximity::{index::SearchArea, source::Result};
use sqlx::{Executor, Postgres};

use super::select_in_area;
use crate::data_model::{bus_stop::BusStopRow, with_ids};

const COLUMNS: &[&str] = &["id", "name", "latitude", "longitude", "routes"];

pub async fn get_in_area<'c, E>(
    executor: E,
    area: Option<&SearchArea>,
) -> Result<Vec<WithId<BusStop>>>
where
    E: Executor<'c, Database = Postgres>,
{
    let rows: Vec<BusStopRow> = select_in_area(executor, "bus_stops", COLUMNS, area).await?;
    Ok(with_ids(rows))
}

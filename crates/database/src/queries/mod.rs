use proximity::{index::SearchArea, source::Result, SourceError};
use sqlx::{postgres::PgRow, Executor, FromRow, Postgres};

pub mod bus_stop;
pub mod incident;
pub mod taxi_rank;
pub mod user;

pub(crate) fn convert_error(why: sqlx::Error) -> SourceError {
    match why {
        sqlx::Error::Io(_)
        | sqlx::Error::Tls(_)
        | sqlx::Error::PoolTimedOut
        | sqlx::Error::PoolClosed => SourceError::Unreachable(why.to_string()),
        _ => SourceError::other(why),
    }
}

/// Rows of `table` whose position lies in the bounding box of `area`, at most
/// `area.limit` of them. Rows without a position never match. The exact
/// radius test happens in the proximity layer, not here.
pub(crate) async fn select_in_area<'c, E, R>(
    executor: E,
    table: &str,
    columns: &[&str],
    area: Option<&SearchArea>,
) -> Result<Vec<R>>
where
    E: Executor<'c, Database = Postgres>,
    for<'r> R: FromRow<'r, PgRow> + Send + Unpin,
{
    let columns = columns.join(", ");
    let Some(area) = area else {
        let query = format!("SELECT {columns} FROM {table} ORDER BY id;");
        return sqlx::query_as::<Postgres, R>(&query)
            .fetch_all(executor)
            .await
            .map_err(convert_error);
    };

    let bbox = area.bounding_box().map_err(SourceError::other)?;
    let limit = area.limit.map(|limit| i64::try_from(limit).unwrap_or(i64::MAX));
    let query = format!(
        "
        SELECT {columns}
        FROM {table}
        WHERE
            latitude BETWEEN $1 AND $2
            AND longitude BETWEEN $3 AND $4
        ORDER BY id
        LIMIT $5;
        "
    );
    sqlx::query_as::<Postgres, R>(&query)
        .bind(bbox.min_latitude)
        .bind(bbox.max_latitude)
        .bind(bbox.min_longitude)
        .bind(bbox.max_longitude)
        .bind(limit)
        .fetch_all(executor)
        .await
        .map_err(convert_error)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connection_failures_are_unreachable() {
        assert!(matches!(
            convert_error(sqlx::Error::PoolTimedOut),
            SourceError::Unreachable(_)
        ));
        assert!(matches!(
            convert_error(sqlx::Error::RowNotFound),
            SourceError::Other(_)
        ));
    }
}

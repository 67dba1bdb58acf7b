use std::{env, error::Error};

use async_trait::async_trait;
use model::{
    incident::IncidentReport,
    transit::{BusStop, TaxiRank},
    user::User,
    WithId,
};
use proximity::{
    index::SearchArea,
    source::{CandidateSource, Result},
};

pub mod data_model;
pub mod queries;

pub struct DatabaseConnectionInfo {
    pub username: String,
    pub password: String,
    pub hostname: String,
    pub port: u16,
    pub database: String,
}

impl DatabaseConnectionInfo {
    pub fn from_env() -> Option<Self> {
        let username = env::var("DATABASE_USER").ok()?;
        let password = env::var("DATABASE_PASSWORD").ok()?;
        let hostname = env::var("DATABASE_HOST").ok()?;
        let port: u16 = env::var("DATABASE_PORT").ok()?.parse().ok()?;
        let database = env::var("DATABASE_NAME").ok()?;
        Some(Self {
            username,
            password,
            hostname,
            port,
            database,
        })
    }

    pub(self) fn postgres_url(self) -> String {
        format!(
            "postgres://{}:{}@{}:{}/{}",
            self.username, self.password, self.hostname, self.port, self.database
        )
    }
}

/// Candidate source backed by PostgreSQL. Positions are plain latitude and
/// longitude columns with a composite index, which is enough for the bounding
/// box pre-filter.
#[derive(Clone)]
pub struct PgDatabase {
    connection: sqlx::PgPool,
}

impl PgDatabase {
    pub async fn connect(
        database_connection_info: DatabaseConnectionInfo,
    ) -> std::result::Result<Self, Box<dyn Error>> {
        log::info!(
            "connecting to database {} at {}:{}",
            database_connection_info.database,
            database_connection_info.hostname,
            database_connection_info.port
        );
        let url = database_connection_info.postgres_url();
        let pool = sqlx::postgres::PgPool::connect(&url).await?;

        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok(Self { connection: pool })
    }
}

#[async_trait]
impl CandidateSource for PgDatabase {
    async fn users(&self, area: Option<&SearchArea>) -> Result<Vec<WithId<User>>> {
        queries::user::get_in_area(&self.connection, area).await
    }

    async fn bus_stops(&self, area: Option<&SearchArea>) -> Result<Vec<WithId<BusStop>>> {
        queries::bus_stop::get_in_area(&self.connection, area).await
    }

    async fn taxi_ranks(&self, area: Option<&SearchArea>) -> Result<Vec<WithId<TaxiRank>>> {
        queries::taxi_rank::get_in_area(&self.connection, area).await
    }

    async fn incidents(
        &self,
        area: Option<&SearchArea>,
    ) -> Result<Vec<WithId<IncidentReport>>> {
        queries::incident::get_in_area(&self.connection, area).await
    }
}

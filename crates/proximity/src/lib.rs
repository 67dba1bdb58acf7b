use std::error;

use thiserror::Error;
use utility::geo::GeoError;

pub mod area;
pub mod client;
pub mod config;
pub mod delivery;
pub mod fanout;
pub mod index;
pub mod source;

/// Failure of a single read from the candidate store.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("store unreachable: {0}")]
    Unreachable(String),
    #[error(transparent)]
    Other(Box<dyn error::Error + Send + Sync>),
}

impl SourceError {
    pub fn other<T: error::Error + Send + Sync + 'static>(why: T) -> Self {
        Self::Other(Box::new(why))
    }
}

/// Failure of a single push delivery. Never fails a fanout as a whole.
#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("invalid delivery address")]
    InvalidAddress,
    #[error("rejected by gateway ({status}): {reason}")]
    Rejected { status: u16, reason: String },
    #[error(transparent)]
    Transport(Box<dyn error::Error + Send + Sync>),
}

impl DeliveryError {
    pub fn transport<T: error::Error + Send + Sync + 'static>(why: T) -> Self {
        Self::Transport(Box::new(why))
    }
}

#[derive(Debug, Error)]
pub enum RequestError {
    #[error("invalid input: {0}")]
    InvalidInput(#[from] GeoError),
    #[error("candidate source unavailable: {0}")]
    SourceUnavailable(#[from] SourceError),
}

pub type RequestResult<O> = Result<O, RequestError>;

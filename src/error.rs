//! Error types.
//!
//! Request-level failures ([`StoreError`], [`ApiError`]) end up as HTTP
//! responses. [`Error`] is for the process itself: binding a port, accepting
//! connections, reading or writing the persistence file.

use std::path::PathBuf;

use thiserror::Error;

use crate::blog::Field;

/// Failures of the store's CRUD contract.
#[derive(Debug, Error, Eq, PartialEq)]
pub enum StoreError {
    #[error("{}", missing_message(*field))]
    Validation { field: Field },

    #[error("blog {0} not found")]
    NotFound(u64),

    #[error("no blogs stored")]
    Empty,

    #[error("no blog ids left")]
    IdsExhausted,
}

fn missing_message(field: Field) -> String {
    match field {
        Field::Tags => "blog must contain at least one tag".to_owned(),
        other => format!("blog {other} is required"),
    }
}

/// Everything a request can fail with before or during a store call.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("invalid blog id `{0}`")]
    MalformedId(String),

    #[error("invalid request body: {0}")]
    InvalidBody(String),

    #[error("no route for this method and path")]
    RouteNotFound,
}

/// Reading or writing the on-disk copy of the store.
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("json: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Process-level failures.
#[derive(Debug, Error)]
pub enum Error {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    #[error("persistence: {0}")]
    Persistence(#[from] PersistenceError),
}

//! Transport layer: request signing and wire-format details (serialization/deserialization).

mod participants;
mod programs;
mod signing;
mod upsert;

use serde::Deserialize;

pub use participants::{decode_participants_json_response, encode_participants_query};
pub use programs::{
    decode_program_schema_json_response, decode_programs_json_response, encode_programs_query,
};
pub use signing::{Method, SignedRequest, format_timestamp, sign_request};
pub use upsert::{
    UpsertBody, UpsertBodyOptions, build_upsert_body, decode_job_status_json_response,
    encode_participants_csv,
};

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("could not write delimited text: {0}")]
    Csv(#[from] csv::Error),

    #[error("delimited text is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("an upsert table needs at least one column")]
    NoColumns,
}

/// Envelope SignalVine wraps list responses in.
#[derive(Debug, Clone, Deserialize)]
struct ItemsJson<T> {
    items: Vec<T>,
}

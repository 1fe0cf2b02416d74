//! Typed Rust client for the SignalVine SMS campaign API.
//!
//! The crate is split the usual way: a domain layer of strong types and pure
//! transforms (record flattening, schema conversion, tables), a transport layer
//! for request signing and wire formats, and a small client layer orchestrating
//! requests (pagination, bulk upsert with status polling).
//!
//! ```rust,no_run
//! use signalvine::{Credentials, ParticipantQuery, ProgramId, SignalVineClient};
//! use signalvine::{Table, UpsertJob, UpsertOptions, UpsertOutcome};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), signalvine::SignalVineError> {
//!     let client = SignalVineClient::new(Credentials::new("account", "token", "secret")?);
//!     let program = ProgramId::new("program-id")?;
//!
//!     let records = client
//!         .get_participants(&program, ParticipantQuery::default())
//!         .await?;
//!     println!("{} participants", records.len());
//!
//!     let mut table = Table::new(["customer_id", "first_name"]);
//!     table.push_row(["c-1", "Fred"])?;
//!     let job = UpsertJob::new(program, table, UpsertOptions::new("add"));
//!     if let UpsertOutcome::CompleteWithError(message) = client.upsert_participants(&job).await? {
//!         eprintln!("upsert rejected: {message}");
//!     }
//!     Ok(())
//! }
//! ```
#![forbid(unsafe_code)]

pub mod client;
pub mod domain;
mod transport;

pub use client::{
    Credentials, DEFAULT_POLL_ATTEMPTS, DEFAULT_POLL_INTERVAL, PollPolicy, SignalVineClient,
    SignalVineClientBuilder, SignalVineError,
};
pub use domain::{
    ChunkSize, FieldType, FlatRecord, JobStatus, Participant, ParticipantQuery, ProfileField,
    Program, ProgramId, SchemaEntry, Table, UpsertJob, UpsertOptions, UpsertOutcome,
    ValidationError, convert_schema, flatten_participant, flatten_participants,
};
pub use transport::{
    Method, SignedRequest, TransportError, UpsertBody, UpsertBodyOptions, build_upsert_body,
    encode_participants_csv, format_timestamp, sign_request,
};

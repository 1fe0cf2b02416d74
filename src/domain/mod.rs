//! Domain layer: strong types with validation and invariants (no I/O).

mod participant;
mod request;
mod response;
mod schema;
mod table;
mod validation;
mod value;

pub use participant::{
    AGGREGATE_PREFIX, Aggregates, FlatRecord, Participant, ProfileField, flatten_participant,
    flatten_participants,
};
pub use request::{ABSENT_POLICY, DEFAULT_MATCH_MODE, ParticipantQuery, UpsertJob, UpsertOptions};
pub use response::{JobStatus, Program, UpsertOutcome};
pub use schema::{FieldType, SchemaEntry, convert_schema};
pub use table::Table;
pub use validation::ValidationError;
pub use value::{AccountNumber, AccountSecret, AccountToken, ChunkSize, ProgramId};

use crate::domain::table::Table;
use crate::domain::value::{ChunkSize, ProgramId};

/// Match mode used when the caller does not choose one.
pub const DEFAULT_MATCH_MODE: &str = "tx";

/// Policy for schema fields a row does not mention: leave them untouched.
pub const ABSENT_POLICY: &str = "ignore";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParticipantQuery {
    pub chunk_size: ChunkSize,
    pub include_inactive: bool,
    pub include_aggregates: bool,
}

impl Default for ParticipantQuery {
    fn default() -> Self {
        Self {
            chunk_size: ChunkSize::default(),
            include_inactive: true,
            include_aggregates: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Options of a bulk upsert.
///
/// `new_policy` and `mode` are vendor-defined tokens passed through verbatim
/// (for example `"add"` and `"tx"`). The allow-list of existing fields is
/// always the table's own columns.
pub struct UpsertOptions {
    pub new_policy: String,
    pub mode: String,
}

impl UpsertOptions {
    pub fn new(new_policy: impl Into<String>) -> Self {
        Self {
            new_policy: new_policy.into(),
            mode: DEFAULT_MATCH_MODE.to_owned(),
        }
    }

    pub fn mode(mut self, mode: impl Into<String>) -> Self {
        self.mode = mode.into();
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// A bulk insert-or-update of participants into one program.
pub struct UpsertJob {
    program: ProgramId,
    options: UpsertOptions,
    table: Table,
}

impl UpsertJob {
    pub fn new(program: ProgramId, table: Table, options: UpsertOptions) -> Self {
        Self {
            program,
            options,
            table,
        }
    }

    pub fn program(&self) -> &ProgramId {
        &self.program
    }

    pub fn options(&self) -> &UpsertOptions {
        &self.options
    }

    pub fn table(&self) -> &Table {
        &self.table
    }
}

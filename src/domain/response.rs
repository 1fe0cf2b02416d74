#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Program {
    pub id: String,
    pub account_id: Option<String>,
    pub name: String,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
/// Snapshot of an asynchronous bulk job, as reported by its status location.
pub struct JobStatus {
    pub complete: bool,
    pub error: bool,
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Final result of submitting an upsert and polling it.
pub enum UpsertOutcome {
    /// The job finished without reporting an error.
    Complete,
    /// The job finished and reported an error message (empty when the vendor
    /// sent none).
    CompleteWithError(String),
    /// The poll budget ran out before the job reported completion.
    TimedOut { attempts: u32, last: JobStatus },
}

impl UpsertOutcome {
    pub(crate) fn from_complete(status: JobStatus) -> Self {
        if status.error {
            Self::CompleteWithError(status.message.unwrap_or_default())
        } else {
            Self::Complete
        }
    }

    /// The vendor's error message, if the job completed with one.
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::CompleteWithError(message) => Some(message.as_str()),
            Self::Complete | Self::TimedOut { .. } => None,
        }
    }
}

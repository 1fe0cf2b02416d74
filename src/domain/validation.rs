use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    Empty { field: &'static str },
    InvalidPathSegment { field: &'static str, input: String },
    OutOfRange { field: &'static str, min: u32, actual: u32 },
    RowWidth { expected: usize, actual: usize },
    MissingColumn { column: String },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty { field } => write!(f, "{field} must not be empty"),
            Self::InvalidPathSegment { field, input } => {
                write!(f, "{field} is not a valid path segment: {input}")
            }
            Self::OutOfRange { field, min, actual } => {
                write!(f, "{field} out of range: {actual} (expected at least {min})")
            }
            Self::RowWidth { expected, actual } => {
                write!(f, "row has {actual} values but the table has {expected} columns")
            }
            Self::MissingColumn { column } => write!(f, "row is missing column {column}"),
        }
    }
}

impl std::error::Error for ValidationError {}

#[cfg(test)]
mod tests {
    use super::ValidationError;

    #[test]
    fn display_messages_are_human_readable() {
        let err = ValidationError::Empty { field: "secret" };
        assert_eq!(err.to_string(), "secret must not be empty");

        let err = ValidationError::OutOfRange {
            field: "count",
            min: 1,
            actual: 0,
        };
        assert_eq!(
            err.to_string(),
            "count out of range: 0 (expected at least 1)"
        );

        let err = ValidationError::RowWidth {
            expected: 2,
            actual: 3,
        };
        assert_eq!(
            err.to_string(),
            "row has 3 values but the table has 2 columns"
        );

        let err = ValidationError::MissingColumn {
            column: "phone".to_owned(),
        };
        assert_eq!(err.to_string(), "row is missing column phone");
    }
}

use std::collections::BTreeMap;

use serde_json::Value;

use crate::domain::participant::FlatRecord;
use crate::domain::validation::ValidationError;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// In-memory table of string cells: ordered columns, ordered rows.
///
/// Invariant: every row has exactly one value per column.
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Append a row given positionally, in column order.
    pub fn push_row<I, S>(&mut self, row: I) -> Result<(), ValidationError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let row = row.into_iter().map(Into::into).collect::<Vec<String>>();
        if row.len() != self.columns.len() {
            return Err(ValidationError::RowWidth {
                expected: self.columns.len(),
                actual: row.len(),
            });
        }
        self.rows.push(row);
        Ok(())
    }

    /// Append a row given as `column -> value`. Extra keys are ignored.
    pub fn push_record(
        &mut self,
        record: &BTreeMap<String, String>,
    ) -> Result<(), ValidationError> {
        let row = self
            .columns
            .iter()
            .map(|column| {
                record
                    .get(column)
                    .cloned()
                    .ok_or_else(|| ValidationError::MissingColumn {
                        column: column.clone(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;
        self.rows.push(row);
        Ok(())
    }

    /// Build a table from flattened participants.
    ///
    /// Columns are the union of record keys in first-seen order. Nulls and
    /// keys a record lacks become empty cells.
    pub fn from_flat_records(records: &[FlatRecord]) -> Self {
        let mut columns = Vec::<String>::new();
        for record in records {
            for key in record.keys() {
                if !columns.iter().any(|it| it == key) {
                    columns.push(key.to_owned());
                }
            }
        }

        let rows = records
            .iter()
            .map(|record| {
                columns
                    .iter()
                    .map(|column| record.get(column).map(cell_text).unwrap_or_default())
                    .collect()
            })
            .collect();

        Self { columns, rows }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

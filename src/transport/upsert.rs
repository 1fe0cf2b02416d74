use serde::{Deserialize, Serialize};

use crate::domain::{ABSENT_POLICY, JobStatus, Table, UpsertJob};
use crate::transport::TransportError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
/// JSON body of a bulk upsert submission.
///
/// Field order is the wire order; the signature is computed over the exact
/// bytes of [`UpsertBody::to_json`].
pub struct UpsertBody {
    pub program: String,
    pub options: UpsertBodyOptions,
    pub participants: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpsertBodyOptions {
    pub new: String,
    pub mode: String,
    pub existing: Vec<String>,
    pub absent: String,
}

impl UpsertBody {
    /// Compact JSON, keys in declaration order.
    pub fn to_json(&self) -> Result<String, TransportError> {
        Ok(serde_json::to_string(self)?)
    }
}

#[derive(Debug, Clone, Deserialize)]
struct JobStatusJson {
    complete: bool,
    #[serde(default)]
    error: bool,
    #[serde(default)]
    message: Option<String>,
}

/// Serialize a table as comma-separated text with minimal quoting and a
/// trailing `\n`.
pub fn encode_participants_csv(table: &Table) -> Result<String, TransportError> {
    let mut writer = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Necessary)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer.write_record(table.columns())?;
    for row in table.rows() {
        writer.write_record(row)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|err| TransportError::Csv(err.into_error().into()))?;
    Ok(String::from_utf8(bytes)?)
}

pub fn build_upsert_body(job: &UpsertJob) -> Result<UpsertBody, TransportError> {
    let table = job.table();
    if table.columns().is_empty() {
        return Err(TransportError::NoColumns);
    }

    Ok(UpsertBody {
        program: job.program().as_str().to_owned(),
        options: UpsertBodyOptions {
            new: job.options().new_policy.clone(),
            mode: job.options().mode.clone(),
            existing: table.columns().to_vec(),
            absent: ABSENT_POLICY.to_owned(),
        },
        participants: encode_participants_csv(table)?,
    })
}

pub fn decode_job_status_json_response(json: &str) -> Result<JobStatus, TransportError> {
    let parsed: JobStatusJson = serde_json::from_str(json)?;
    Ok(JobStatus {
        complete: parsed.complete,
        error: parsed.error,
        message: parsed.message,
    })
}

#[cfg(test)]
mod tests {
    use crate::domain::{ProgramId, UpsertOptions};

    use super::*;

    fn steve_table() -> Table {
        let mut table = Table::new(["customer_id", "full_name"]);
        table.push_row(["1", "Taylor, Steve"]).unwrap();
        table
    }

    #[test]
    fn csv_quotes_only_fields_that_need_it() {
        let csv = encode_participants_csv(&steve_table()).unwrap();
        assert_eq!(csv, "customer_id,full_name\n1,\"Taylor, Steve\"\n");
    }

    #[test]
    fn csv_escapes_quotes_and_newlines() {
        let mut table = Table::new(["note", "plain"]);
        table.push_row(["say \"hi\"", "x"]).unwrap();
        table.push_row(["two\nlines", ""]).unwrap();

        let csv = encode_participants_csv(&table).unwrap();
        assert_eq!(
            csv,
            "note,plain\n\"say \"\"hi\"\"\",x\n\"two\nlines\",\n"
        );
    }

    #[test]
    fn csv_of_header_only_table() {
        let csv = encode_participants_csv(&Table::new(["phone"])).unwrap();
        assert_eq!(csv, "phone\n");
    }

    #[test]
    fn upsert_body_uses_defaults_and_column_order() {
        let job = UpsertJob::new(
            ProgramId::new("P1").unwrap(),
            steve_table(),
            UpsertOptions::new("add"),
        );
        let body = build_upsert_body(&job).unwrap();

        assert_eq!(body.program, "P1");
        assert_eq!(body.options.new, "add");
        assert_eq!(body.options.mode, "tx");
        assert_eq!(body.options.absent, "ignore");
        assert_eq!(body.options.existing, vec!["customer_id", "full_name"]);
        assert_eq!(body.participants, "customer_id,full_name\n1,\"Taylor, Steve\"\n");
    }

    #[test]
    fn upsert_body_serializes_in_wire_order() {
        let job = UpsertJob::new(
            ProgramId::new("P1").unwrap(),
            steve_table(),
            UpsertOptions::new("add"),
        );
        let json = build_upsert_body(&job).unwrap().to_json().unwrap();
        assert_eq!(
            json,
            r#"{"program":"P1","options":{"new":"add","mode":"tx","existing":["customer_id","full_name"],"absent":"ignore"},"participants":"customer_id,full_name\n1,\"Taylor, Steve\"\n"}"#
        );
    }

    #[test]
    fn upsert_body_rejects_table_without_columns() {
        let job = UpsertJob::new(
            ProgramId::new("P1").unwrap(),
            Table::default(),
            UpsertOptions::new("add"),
        );
        assert!(matches!(
            build_upsert_body(&job),
            Err(TransportError::NoColumns)
        ));
    }

    #[test]
    fn decode_job_status_variants() {
        let pending = decode_job_status_json_response(r#"{"complete": false}"#).unwrap();
        assert_eq!(pending, JobStatus::default());

        let failed = decode_job_status_json_response(
            r#"{"complete": true, "error": true, "message": "Could not parse 'sure why not' as Maybe (Boolean)"}"#,
        )
        .unwrap();
        assert!(failed.complete);
        assert!(failed.error);
        assert_eq!(
            failed.message.as_deref(),
            Some("Could not parse 'sure why not' as Maybe (Boolean)")
        );
    }
}

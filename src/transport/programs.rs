use std::collections::BTreeMap;

use serde::Deserialize;

use crate::domain::Program;
use crate::transport::{ItemsJson, TransportError};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProgramJson {
    id: String,
    #[serde(default)]
    account_id: Option<String>,
    name: String,
    #[serde(default)]
    active: bool,
}

#[derive(Debug, Clone, Deserialize)]
struct ProfileDefinitionJson {
    name: String,
    #[serde(rename = "type")]
    type_tag: String,
}

pub fn encode_programs_query(include_inactive: bool) -> Vec<(String, String)> {
    if include_inactive {
        vec![("active".to_owned(), "all".to_owned())]
    } else {
        Vec::new()
    }
}

pub fn decode_programs_json_response(json: &str) -> Result<Vec<Program>, TransportError> {
    let parsed: ItemsJson<ProgramJson> = serde_json::from_str(json)?;
    Ok(parsed
        .items
        .into_iter()
        .map(|program| Program {
            id: program.id,
            account_id: program.account_id,
            name: program.name,
            active: program.active,
        })
        .collect())
}

pub fn decode_program_schema_json_response(
    json: &str,
) -> Result<BTreeMap<String, String>, TransportError> {
    let parsed: ItemsJson<ProfileDefinitionJson> = serde_json::from_str(json)?;
    Ok(parsed
        .items
        .into_iter()
        .map(|field| (field.name, field.type_tag))
        .collect())
}

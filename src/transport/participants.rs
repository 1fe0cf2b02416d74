use serde::Deserialize;
use serde_json::Value;

use crate::domain::{Aggregates, ChunkSize, Participant, ProfileField};
use crate::transport::{ItemsJson, TransportError};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ParticipantJson {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    customer_id: Option<String>,
    profile: Vec<ProfileFieldJson>,
    #[serde(default)]
    received_count: Value,
    #[serde(default)]
    scheduled_count: Value,
    #[serde(default)]
    sent_count: Value,
}

#[derive(Debug, Clone, Deserialize)]
struct ProfileFieldJson {
    name: String,
    #[serde(default, rename = "type")]
    type_tag: Option<String>,
    #[serde(default)]
    value: Option<String>,
}

impl From<ParticipantJson> for Participant {
    fn from(value: ParticipantJson) -> Self {
        Self {
            id: value.id,
            customer_id: value.customer_id,
            profile: value
                .profile
                .into_iter()
                .map(|field| ProfileField::new(field.name, field.type_tag, field.value))
                .collect(),
            aggregates: Aggregates {
                received_count: value.received_count,
                scheduled_count: value.scheduled_count,
                sent_count: value.sent_count,
            },
        }
    }
}

pub fn encode_participants_query(
    chunk_size: ChunkSize,
    offset: u64,
    include_inactive: bool,
) -> Vec<(String, String)> {
    let mut params = vec![
        ("type".to_owned(), "full".to_owned()),
        (ChunkSize::FIELD.to_owned(), chunk_size.value().to_string()),
        ("offset".to_owned(), offset.to_string()),
    ];
    if include_inactive {
        params.push(("active".to_owned(), "all".to_owned()));
    }
    params
}

pub fn decode_participants_json_response(json: &str) -> Result<Vec<Participant>, TransportError> {
    let parsed: ItemsJson<ParticipantJson> = serde_json::from_str(json)?;
    Ok(parsed.items.into_iter().map(Participant::from).collect())
}

use serde::Serialize;
use serde_json::{Map, Value};

/// Key prefix for the aggregate counters appended by [`flatten_participant`].
pub const AGGREGATE_PREFIX: &str = "agg_";

#[derive(Debug, Clone, PartialEq, Eq)]
/// One named attribute of a participant's profile.
///
/// `value` is `None` both when the vendor omitted the value and when it sent
/// an empty string; the two are not distinguished.
pub struct ProfileField {
    pub name: String,
    pub type_tag: Option<String>,
    pub value: Option<String>,
}

impl ProfileField {
    pub fn new(
        name: impl Into<String>,
        type_tag: Option<String>,
        value: Option<String>,
    ) -> Self {
        Self {
            name: name.into(),
            type_tag,
            value: value.filter(|it| !it.is_empty()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
/// Message counters SignalVine keeps per participant, kept verbatim.
pub struct Aggregates {
    pub received_count: Value,
    pub scheduled_count: Value,
    pub sent_count: Value,
}

#[derive(Debug, Clone, PartialEq)]
/// A participant as returned by the `type=full` listing.
pub struct Participant {
    pub id: Option<String>,
    pub customer_id: Option<String>,
    pub profile: Vec<ProfileField>,
    pub aggregates: Aggregates,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
/// A participant reduced to `field name -> value`.
///
/// Keys keep vendor profile order. Profile values are strings or null;
/// aggregate counters (when requested) are appended last under `agg_*` keys.
pub struct FlatRecord(Map<String, Value>);

impl FlatRecord {
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_inner(self) -> Map<String, Value> {
        self.0
    }
}

/// Flatten one participant's profile into a [`FlatRecord`].
///
/// Values are copied without coercion, whatever the declared type tag says.
pub fn flatten_participant(participant: &Participant, include_aggregates: bool) -> FlatRecord {
    let mut fields = Map::new();
    for field in &participant.profile {
        let value = match field.value.as_deref() {
            Some(value) if !value.is_empty() => Value::String(value.to_owned()),
            _ => Value::Null,
        };
        fields.insert(field.name.clone(), value);
    }

    if include_aggregates {
        let aggregates = &participant.aggregates;
        fields.insert(
            format!("{AGGREGATE_PREFIX}receivedCount"),
            aggregates.received_count.clone(),
        );
        fields.insert(
            format!("{AGGREGATE_PREFIX}scheduledCount"),
            aggregates.scheduled_count.clone(),
        );
        fields.insert(
            format!("{AGGREGATE_PREFIX}sentCount"),
            aggregates.sent_count.clone(),
        );
    }

    FlatRecord(fields)
}

/// Flatten a batch of participants, preserving input order.
pub fn flatten_participants(
    participants: &[Participant],
    include_aggregates: bool,
) -> Vec<FlatRecord> {
    participants
        .iter()
        .map(|participant| flatten_participant(participant, include_aggregates))
        .collect()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn field(name: &str, tag: &str, value: Option<&str>) -> ProfileField {
        ProfileField {
            name: name.to_owned(),
            type_tag: Some(tag.to_owned()),
            value: value.map(str::to_owned),
        }
    }

    fn fred() -> Participant {
        Participant {
            id: Some("a1b2".to_owned()),
            customer_id: Some("08c95df1".to_owned()),
            profile: vec![
                field("first_name", "String", Some("Fred")),
                field("honors", "Maybe (Boolean)", Some("false")),
                field("gpa", "Maybe (Float)", Some("3.5")),
                field("email", "Maybe (String)", Some("")),
                field("target_group", "Maybe (String)", None),
            ],
            aggregates: Aggregates {
                received_count: json!(3),
                scheduled_count: json!(0),
                sent_count: json!(7),
            },
        }
    }

    #[test]
    fn flatten_copies_values_without_coercion() {
        let record = flatten_participant(&fred(), false);
        assert_eq!(record.get("first_name"), Some(&json!("Fred")));
        assert_eq!(record.get("honors"), Some(&json!("false")));
        assert_eq!(record.get("gpa"), Some(&json!("3.5")));
    }

    #[test]
    fn flatten_maps_empty_and_missing_values_to_null() {
        let record = flatten_participant(&fred(), false);
        assert_eq!(record.get("email"), Some(&Value::Null));
        assert_eq!(record.get("target_group"), Some(&Value::Null));
    }

    #[test]
    fn flatten_preserves_profile_order_and_skips_envelope() {
        let record = flatten_participant(&fred(), false);
        assert_eq!(
            record.keys().collect::<Vec<_>>(),
            vec!["first_name", "honors", "gpa", "email", "target_group"]
        );
        assert!(record.get("id").is_none());
        assert!(record.get("customerId").is_none());
    }

    #[test]
    fn aggregates_only_add_three_prefixed_keys() {
        let plain = flatten_participant(&fred(), false);
        let with_aggregates = flatten_participant(&fred(), true);

        assert_eq!(with_aggregates.len(), plain.len() + 3);
        for (key, value) in plain.iter() {
            assert_eq!(with_aggregates.get(key), Some(value));
        }
        assert_eq!(with_aggregates.get("agg_receivedCount"), Some(&json!(3)));
        assert_eq!(with_aggregates.get("agg_scheduledCount"), Some(&json!(0)));
        assert_eq!(with_aggregates.get("agg_sentCount"), Some(&json!(7)));
    }

    #[test]
    fn batch_flatten_keeps_input_order() {
        let mut wilma = fred();
        wilma.profile[0] = field("first_name", "String", Some("Wilma"));

        let records = flatten_participants(&[fred(), wilma], true);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].get("first_name"), Some(&json!("Fred")));
        assert_eq!(records[1].get("first_name"), Some(&json!("Wilma")));
        assert!(records.iter().all(|it| it.get("agg_sentCount").is_some()));
    }

    #[test]
    fn profile_field_constructor_drops_empty_values() {
        let field = ProfileField::new("email", None, Some(String::new()));
        assert_eq!(field.value, None);
    }

    #[test]
    fn flat_record_serializes_as_ordered_object() {
        let record = flatten_participant(&fred(), false);
        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(
            json,
            r#"{"first_name":"Fred","honors":"false","gpa":"3.5","email":null,"target_group":null}"#
        );
    }
}

use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// Normalized type of a profile field.
///
/// Dates are carried as [`FieldType::Str`]; they are never parsed.
pub enum FieldType {
    Str,
    Bool,
    Int,
    Float,
}

impl FieldType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Str => "str",
            Self::Bool => "bool",
            Self::Int => "int",
            Self::Float => "float",
        }
    }

    /// Map a bare SignalVine type tag. Unknown tags fall back to [`FieldType::Str`].
    fn from_tag(tag: &str) -> Self {
        match tag {
            "Boolean" => Self::Bool,
            "Numeric" => Self::Int,
            "Float" => Self::Float,
            _ => Self::Str,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SchemaEntry {
    pub field_type: FieldType,
    pub required: bool,
}

impl SchemaEntry {
    /// Parse a SignalVine type tag such as `"String"` or `"Maybe (Boolean)"`.
    ///
    /// Never fails: tags the crate does not know about become required strings.
    pub fn from_tag(tag: &str) -> Self {
        let tag = tag.trim();
        match tag
            .strip_prefix("Maybe")
            .map(str::trim_start)
            .and_then(|rest| rest.strip_prefix('('))
            .and_then(|rest| rest.strip_suffix(')'))
        {
            Some(inner) => Self {
                field_type: FieldType::from_tag(inner.trim()),
                required: false,
            },
            None => Self {
                field_type: FieldType::from_tag(tag),
                required: true,
            },
        }
    }
}

/// Convert a `field name -> SignalVine type tag` map into normalized entries.
pub fn convert_schema(tags: &BTreeMap<String, String>) -> BTreeMap<String, SchemaEntry> {
    tags.iter()
        .map(|(name, tag)| (name.clone(), SchemaEntry::from_tag(tag)))
        .collect()
}

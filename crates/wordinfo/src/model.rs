use serde::{Deserialize, Serialize};

/// Values a provider sends back when it has nothing useful for a field.
const INVALID_TOKENS: [&str; 4] = ["", "unknown", "n/a", "none"];

/// Returns whether a field value carries real content.
///
/// The value is trimmed and lowercased before checking it against the
/// invalid-token set, so `"  Unknown "` and `"N/A"` are both rejected.
pub fn is_valid(value: &str) -> bool {
    let normalized = value.trim().to_lowercase();
    !INVALID_TOKENS.contains(&normalized.as_str())
}

/// The six descriptive fields a provider is asked to fill in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Definition,
    RootOrigin,
    Usage,
    LanguageOrigin,
    PartsOfSpeech,
    AlternatePronunciation,
}

impl Field {
    pub const ALL: [Field; 6] = [
        Field::Definition,
        Field::RootOrigin,
        Field::Usage,
        Field::LanguageOrigin,
        Field::PartsOfSpeech,
        Field::AlternatePronunciation,
    ];

    /// The JSON key providers use for this field.
    pub fn key(self) -> &'static str {
        match self {
            Field::Definition => "definition",
            Field::RootOrigin => "rootOrigin",
            Field::Usage => "usage",
            Field::LanguageOrigin => "languageOrigin",
            Field::PartsOfSpeech => "partsOfSpeech",
            Field::AlternatePronunciation => "alternatePronunciation",
        }
    }
}

/// The six descriptive fields of a word, as one resolvable unit.
///
/// `FieldSet::default()` is the all-blank starting point; construct a fresh
/// one per resolution rather than sharing a template between calls.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FieldSet {
    pub definition: String,
    pub root_origin: String,
    pub usage: String,
    pub language_origin: String,
    pub parts_of_speech: String,
    pub alternate_pronunciation: String,
}

impl FieldSet {
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Definition => &self.definition,
            Field::RootOrigin => &self.root_origin,
            Field::Usage => &self.usage,
            Field::LanguageOrigin => &self.language_origin,
            Field::PartsOfSpeech => &self.parts_of_speech,
            Field::AlternatePronunciation => &self.alternate_pronunciation,
        }
    }

    pub fn set(&mut self, field: Field, value: String) {
        match field {
            Field::Definition => self.definition = value,
            Field::RootOrigin => self.root_origin = value,
            Field::Usage => self.usage = value,
            Field::LanguageOrigin => self.language_origin = value,
            Field::PartsOfSpeech => self.parts_of_speech = value,
            Field::AlternatePronunciation => self.alternate_pronunciation = value,
        }
    }

    /// Fields whose current value fails [`is_valid`].
    pub fn invalid_fields(&self) -> Vec<Field> {
        Field::ALL
            .into_iter()
            .filter(|field| !is_valid(self.get(*field)))
            .collect()
    }

    pub fn is_complete(&self) -> bool {
        Field::ALL.into_iter().all(|field| is_valid(self.get(field)))
    }

    /// Builds a field set from the JSON object a completion backend returned.
    ///
    /// Backends occasionally send `partsOfSpeech` as a list instead of a
    /// string; it is comma-joined here before the usual deserialization.
    pub fn from_completion(mut value: serde_json::Value) -> Result<FieldSet, serde_json::Error> {
        if let Some(parts) = value.get_mut(Field::PartsOfSpeech.key()) {
            if let Some(list) = parts.as_array() {
                let joined = list
                    .iter()
                    .filter_map(|entry| entry.as_str())
                    .collect::<Vec<&str>>()
                    .join(", ");
                *parts = serde_json::Value::String(joined);
            }
        }
        serde_json::from_value(value)
    }
}

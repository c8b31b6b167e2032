use async_trait::async_trait;
use thiserror::Error;

mod gemini;
mod model;
mod openai;

pub use gemini::GeminiProvider;
pub use model::{is_valid, Field, FieldSet};
pub use openai::OpenAiProvider;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("malformed completion: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("completion contained no JSON object")]
    MissingJson,
    #[error("completion missing the {0:?} key")]
    MissingKey(&'static str),
    #[error("backend returned no completion")]
    EmptyResponse,
}

/// One external text-generation backend that can describe a word.
///
/// Implementations are constructed once at startup and arranged into an
/// explicit ordered slice by the caller; the order is the cascade priority.
#[async_trait]
pub trait ContentProvider: Send + Sync {
    /// Short backend name, used in logs.
    fn name(&self) -> &str;

    /// Best-effort six-field description of `word` in the context of `topic`.
    async fn fetch_details(&self, word: &str, topic: &str) -> Result<FieldSet, ProviderError>;

    /// Focused single-field query, used to re-fetch one missing field without
    /// paying for a full six-field completion.
    async fn fetch_field(&self, field: Field, word: &str, topic: &str)
        -> Result<String, ProviderError>;

    /// A batch of topic-related headwords, avoiding the ones in `existing`.
    async fn fetch_word_list(
        &self,
        topic: &str,
        existing: &[String],
    ) -> Result<Vec<String>, ProviderError>;
}

/// The user-facing question for a focused single-field fetch.
pub(crate) fn field_query(field: Field, word: &str, topic: &str) -> String {
    match field {
        Field::Definition => format!(
            "Provide a simple definition within 7 words for the word \"{word}\" related to {topic}."
        ),
        Field::RootOrigin => format!(
            "Provide a short sentence within 7 words that describes the Etymology of the word \"{word}\" related to \"{topic}\"."
        ),
        Field::Usage => format!(
            "Please provide a short sentence using the word \"{word}\" that is related to the topic \"{topic}\"."
        ),
        Field::LanguageOrigin => format!(
            "What is the language of origin for the word \"{word}\" related to {topic}?"
        ),
        Field::PartsOfSpeech => format!(
            "Provide the parts of speech for the word \"{word}\" related to {topic}."
        ),
        Field::AlternatePronunciation => format!(
            "Provide the International Phonetic Alphabet (IPA) pronunciation of the word \"{word}\" related to {topic}."
        ),
    }
}

/// The JSON shape both backends are asked to fill for a full details fetch.
pub(crate) fn details_template(word: &str, topic: &str) -> String {
    format!(
        "The JSON response should be in the following format: \
         {{\"word\": \"{word}\", \
         \"definition\": \"simple definition within 7 words\", \
         \"rootOrigin\": \"the earliest reconstructed ancestral form of the word\", \
         \"usage\": \"a short sentence about {topic} that includes the word {word}\", \
         \"languageOrigin\": \"country or language where the word comes from\", \
         \"partsOfSpeech\": \"parts of speech\", \
         \"alternatePronunciation\": \"International Phonetic Alphabet (IPA) pronunciation of the word\"}}"
    )
}

/// Pulls `key` out of a parsed completion object as a string.
///
/// List values are comma-joined, matching how `partsOfSpeech` sometimes
/// comes back.
pub(crate) fn extract_key(
    object: &serde_json::Value,
    key: &'static str,
) -> Result<String, ProviderError> {
    match object.get(key) {
        Some(serde_json::Value::String(value)) => Ok(value.clone()),
        Some(serde_json::Value::Array(list)) => Ok(list
            .iter()
            .filter_map(|entry| entry.as_str())
            .collect::<Vec<&str>>()
            .join(", ")),
        _ => Err(ProviderError::MissingKey(key)),
    }
}

/// What the focused fetch asks the backend to act as, per field kind.
pub(crate) fn field_role(field: Field) -> &'static str {
    match field {
        Field::Definition => "a simple definition for a word",
        Field::RootOrigin => "the Etymology of a word",
        Field::Usage => "a sentence using a word",
        Field::LanguageOrigin => "the language of origin of a word",
        Field::PartsOfSpeech => "the parts of speech for a word",
        Field::AlternatePronunciation => {
            "the International Phonetic Alphabet (IPA) pronunciation of a word"
        }
    }
}

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::{
    details_template, extract_key, field_query, ContentProvider, Field, FieldSet, ProviderError,
};

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Adapter for generate-content backends speaking the Gemini API.
pub struct GeminiProvider {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content {
    parts: Vec<TextPart>,
}

#[derive(Serialize, Deserialize)]
struct TextPart {
    text: String,
}

#[derive(Serialize)]
struct GenerationConfig {
    temperature: f32,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Deserialize)]
struct CandidateContent {
    parts: Vec<TextPart>,
}

/// The substring from the first `{` to the last `}`, or `None`.
///
/// Gemini wraps its JSON answers in prose or code fences, so the object has
/// to be cut out of the surrounding text before parsing.
fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end >= start).then(|| &text[start..=end])
}

impl GeminiProvider {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: DEFAULT_BASE_URL.to_owned(),
            api_key: api_key.into(),
            model: model.into(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Runs one generation and returns the JSON object cut out of the answer.
    async fn generate(&self, prompt: String) -> Result<serde_json::Value, ProviderError> {
        let request = GenerateRequest {
            contents: vec![Content { parts: vec![TextPart { text: prompt }] }],
            generation_config: GenerationConfig { temperature: 0.0 },
        };
        let response: GenerateResponse = self
            .client
            .post(format!(
                "{}/models/{}:generateContent",
                self.base_url, self.model
            ))
            .query(&[("key", &self.api_key)])
            .json(&request)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        let text = response
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content.parts.into_iter().next())
            .map(|part| part.text)
            .ok_or(ProviderError::EmptyResponse)?;
        let object = extract_json_object(&text).ok_or(ProviderError::MissingJson)?;
        Ok(serde_json::from_str(object)?)
    }
}

#[async_trait]
impl ContentProvider for GeminiProvider {
    fn name(&self) -> &str {
        &self.model
    }

    async fn fetch_details(&self, word: &str, topic: &str) -> Result<FieldSet, ProviderError> {
        let prompt = format!(
            "The word \"{word}\" is related to the topic \"{topic}\". \
             Provide information about this word: \"{word}\". {}",
            details_template(word, topic)
        );
        let object = self.generate(prompt).await?;
        Ok(FieldSet::from_completion(object)?)
    }

    async fn fetch_field(
        &self,
        field: Field,
        word: &str,
        topic: &str,
    ) -> Result<String, ProviderError> {
        let key = field.key();
        let prompt = format!(
            "{} The JSON response should be in the following format: \
             {{\"{key}\": \"result here\"}}",
            field_query(field, word, topic)
        );
        let object = self.generate(prompt).await?;
        extract_key(&object, key)
    }

    async fn fetch_word_list(
        &self,
        topic: &str,
        existing: &[String],
    ) -> Result<Vec<String>, ProviderError> {
        let mut prompt = format!(
            "Provide spelling bee words in English without dialect/accent related to \
             the topic: {topic}. All words should be single words and not phrases, \
             without duplicates. The JSON response should be in the following format: \
             {{\"words\": [\"word1\", \"word2\", \"word3\"]}}"
        );
        if !existing.is_empty() {
            prompt.push_str(&format!(
                " Do not repeat any words from the following list: {}",
                existing.join(", ")
            ));
        }
        let object = self.generate(prompt).await?;
        let words = object
            .get("words")
            .and_then(|value| value.as_array())
            .ok_or(ProviderError::MissingKey("words"))?;
        Ok(words
            .iter()
            .filter_map(|entry| entry.as_str())
            .map(str::to_owned)
            .collect())
    }
}

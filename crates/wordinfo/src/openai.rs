use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::{
    details_template, extract_key, field_query, field_role, ContentProvider, Field, FieldSet,
    ProviderError,
};

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
const WORD_LIST_SIZE: usize = 30;
const EXTRA_WORD_LIST_SIZE: usize = 6;

/// Adapter for chat-completion backends speaking the OpenAI API.
pub struct OpenAiProvider {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [Message],
    response_format: ResponseFormat,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Serialize)]
struct Message {
    role: &'static str,
    content: String,
}

impl Message {
    fn system(content: impl Into<String>) -> Message {
        Message { role: "system", content: content.into() }
    }

    fn user(content: impl Into<String>) -> Message {
        Message { role: "user", content: content.into() }
    }
}

#[derive(Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: String,
}

impl OpenAiProvider {
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

    /// Runs one JSON-mode completion and returns the parsed message content.
    async fn complete(
        &self,
        messages: &[Message],
        temperature: Option<f32>,
    ) -> Result<serde_json::Value, ProviderError> {
        let request = ChatRequest {
            model: &self.model,
            messages,
            response_format: ResponseFormat { kind: "json_object" },
            temperature,
        };
        let response: ChatResponse = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        let content = response
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or(ProviderError::EmptyResponse)?;
        Ok(serde_json::from_str(&content)?)
    }
}

#[async_trait]
impl ContentProvider for OpenAiProvider {
    fn name(&self) -> &str {
        &self.model
    }

    async fn fetch_details(&self, word: &str, topic: &str) -> Result<FieldSet, ProviderError> {
        let messages = [
            Message::system("You are a helpful dictionary assistant designed to output JSON."),
            Message::system(details_template(word, topic)),
            Message::system("If you have no result for a key, leave it as \"Unknown\"."),
            Message::user(format!(
                "The word \"{word}\" is related to the topic \"{topic}\". \
                 Provide information about this word: \"{word}\"."
            )),
        ];
        let object = self.complete(&messages, None).await?;
        Ok(FieldSet::from_completion(object)?)
    }

    async fn fetch_field(
        &self,
        field: Field,
        word: &str,
        topic: &str,
    ) -> Result<String, ProviderError> {
        let key = field.key();
        let messages = [
            Message::system(format!(
                "You are a helpful dictionary assistant designed to output {}.",
                field_role(field)
            )),
            Message::system(format!(
                "The JSON response should be in the following format: {{\"{key}\": \"result here\"}}"
            )),
            Message::system(format!(
                "If you are unsure, try to provide the most likely {key} based on the word itself."
            )),
            Message::user(field_query(field, word, topic)),
        ];
        let object = self.complete(&messages, Some(0.0)).await?;
        extract_key(&object, key)
    }

    async fn fetch_word_list(
        &self,
        topic: &str,
        existing: &[String],
    ) -> Result<Vec<String>, ProviderError> {
        let count = if existing.is_empty() { WORD_LIST_SIZE } else { EXTRA_WORD_LIST_SIZE };
        let mut messages = vec![
            Message::system(
                "You are a helpful dictionary. You are asked to provide a list of words on a topic.",
            ),
            Message::system(
                "The JSON response should be in the following format: \
                 {\"words\": [\"word1\", \"word2\", \"word3\"]}",
            ),
            Message::system(
                "All words should be single words and not phrases, without duplicates, \
                 ordered by level of difficulty.",
            ),
            Message::user(format!(
                "Provide {count} spelling bee words in English without dialect/accent \
                 related to the topic: {topic}."
            )),
        ];
        if !existing.is_empty() {
            messages.push(Message::system(format!(
                "Do not repeat any words from the following list: {}",
                existing.join(", ")
            )));
        }
        let object = self.complete(&messages, None).await?;
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

use std::collections::HashSet;
use std::sync::Arc;

use tracing::{debug, warn};
use wordinfo::{
    is_valid, ContentProvider, Field, FieldSet, GeminiProvider, OpenAiProvider, ProviderError,
};

/// Resolves a word's six descriptive fields across unreliable providers.
///
/// Providers are tried highest-priority first. The resolver never fails: in
/// the worst case every provider and every re-fetch errors out and the
/// returned field set is still blank.
pub struct WordResolver {
    providers: Vec<Arc<dyn ContentProvider>>,
    refetch: Arc<dyn ContentProvider>,
    retry_count: u32,
}

impl WordResolver {
    /// `providers` is the cascade in priority order; `refetch` is the single
    /// default provider used for focused single-field queries.
    pub fn new(
        providers: Vec<Arc<dyn ContentProvider>>,
        refetch: Arc<dyn ContentProvider>,
        retry_count: u32,
    ) -> WordResolver {
        WordResolver { providers, refetch, retry_count }
    }

    /// The standard cascade: the fast Gemini backend first, then the two
    /// OpenAI models in increasing cost order. The cheaper OpenAI model
    /// doubles as the focused-fetch default.
    pub fn default_cascade(
        openai_key: &str,
        gemini_key: &str,
        retry_count: u32,
    ) -> WordResolver {
        let refetch = Arc::new(OpenAiProvider::new(openai_key, "gpt-3.5-turbo-1106"));
        let providers: Vec<Arc<dyn ContentProvider>> = vec![
            Arc::new(GeminiProvider::new(gemini_key, "gemini-pro")),
            refetch.clone(),
            Arc::new(OpenAiProvider::new(openai_key, "gpt-4-1106-preview")),
        ];
        WordResolver::new(providers, refetch, retry_count)
    }

    pub async fn resolve(&self, word: &str, topic: &str) -> FieldSet {
        let mut candidates = Vec::new();
        for provider in &self.providers {
            match provider.fetch_details(word, topic).await {
                Ok(details) => {
                    if details.is_complete() {
                        debug!(provider = provider.name(), word, "provider answered completely");
                        return details;
                    }
                    debug!(provider = provider.name(), word, "provider answered partially");
                    candidates.push(details);
                }
                Err(error) => {
                    warn!(provider = provider.name(), word, %error, "provider call failed");
                }
            }
        }
        let merged = merge_candidates(candidates);
        self.refetch_missing(merged, word, topic).await
    }

    /// Re-fetches still-invalid fields one focused query at a time, up to
    /// `retry_count` passes. Returned values are written back as-is, valid or
    /// not; a failed query leaves the field untouched for that pass.
    async fn refetch_missing(&self, mut merged: FieldSet, word: &str, topic: &str) -> FieldSet {
        for attempt in 0..self.retry_count {
            let missing = merged.invalid_fields();
            if missing.is_empty() {
                break;
            }
            debug!(word, attempt, missing = missing.len(), "re-fetching missing fields");
            for field in missing {
                match self.refetch.fetch_field(field, word, topic).await {
                    Ok(value) => merged.set(field, value),
                    Err(error) => {
                        warn!(word, ?field, %error, "focused fetch failed");
                    }
                }
            }
        }
        merged
    }
}

/// Last-valid-wins merge over the partial answers, in cascade order.
///
/// Every candidate may overwrite a field it has a valid value for, so later
/// providers fill blanks left by earlier ones and may correct them too.
fn merge_candidates(candidates: Vec<FieldSet>) -> FieldSet {
    let mut merged = FieldSet::default();
    for candidate in &candidates {
        for field in Field::ALL {
            if is_valid(candidate.get(field)) {
                merged.set(field, candidate.get(field).to_owned());
            }
        }
    }
    merged
}

/// Asks a provider for topic-related headwords, dropping duplicates and
/// words the list already contains.
pub async fn suggest_words(
    provider: &dyn ContentProvider,
    topic: &str,
    existing: &[String],
) -> Result<Vec<String>, ProviderError> {
    let fetched = provider.fetch_word_list(topic, existing).await?;
    let mut seen: HashSet<String> = existing.iter().map(|word| word.to_lowercase()).collect();
    Ok(fetched
        .into_iter()
        .filter(|word| seen.insert(word.to_lowercase()))
        .collect())
}

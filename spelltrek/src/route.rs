use std::ops::Range;
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info, warn};
use wordinfo::FieldSet;

use crate::config::PipelineConfig;
use crate::distributor::{distribute, DistributeError};
use crate::games::{generate_banks, GameVariant};
use crate::resolver::WordResolver;
use crate::word::Word;

/// One window of consecutive words advancing a word list through the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Route(pub u32);

impl Route {
    pub const FIRST: Route = Route(1);

    /// The word-list indices feeding this route.
    ///
    /// Routes are numbered from 1; an out-of-band `Route(0)` maps to the
    /// first window rather than underflowing.
    pub fn window(self, config: &PipelineConfig) -> Range<usize> {
        let start = (self.0 as usize).saturating_sub(1) * config.words_per_route;
        start..start + config.words_per_route
    }

    /// The following route, or `None` once the route budget is spent.
    pub fn next(self, config: &PipelineConfig) -> Option<Route> {
        (self.0 < config.max_routes_allowed).then(|| Route(self.0 + 1))
    }
}

/// The persisted form of one level: what the storage collaborator receives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Station {
    pub route: u32,
    pub level: u8,
    pub games: Vec<GameVariant>,
}

/// Builds the full station set for one route.
///
/// Words whose field sets are still incomplete are enriched first (lazy
/// enrichment; already-enriched words are left alone), then the generators
/// fan out over the batch and the distributor packs their banks into levels.
pub async fn build_route(
    resolver: &WordResolver,
    words: &[Word],
    topic: &str,
    route: Route,
    config: &PipelineConfig,
) -> Result<Vec<Station>, DistributeError> {
    let mut batch: Vec<Word> = words.to_vec();
    for word in &mut batch {
        if !word.is_enriched() {
            debug!(word = %word.word, topic, "enriching word before game generation");
            let details = resolver.resolve(&word.word, topic).await;
            word.apply_details(details);
        }
    }

    let mut rng = rand::thread_rng();
    let banks = generate_banks(&batch, &mut rng);
    let levels = distribute(banks, config.max_level, &mut rng)?;
    info!(route = route.0, levels = levels.len(), "assembled stations for route");
    Ok(levels
        .into_iter()
        .map(|(level, games)| Station { route: route.0, level, games })
        .collect())
}

/// Warms the enrichment of an upcoming word in the background.
///
/// Spawned after a level-completion event so the next route's words are
/// already described by the time they are needed. Failures only show up in
/// the logs; the caller never sees them.
pub fn spawn_prefetch(
    resolver: Arc<WordResolver>,
    word: String,
    topic: String,
) -> tokio::task::JoinHandle<FieldSet> {
    tokio::spawn(async move {
        let details = resolver.resolve(&word, &topic).await;
        if details.is_complete() {
            debug!(%word, "prefetched enrichment for upcoming word");
        } else {
            warn!(%word, "prefetch left some fields unresolved");
        }
        details
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use wordinfo::{ContentProvider, Field, ProviderError};

    struct CannedProvider {
        calls: AtomicUsize,
    }

    impl CannedProvider {
        fn new() -> Arc<CannedProvider> {
            Arc::new(CannedProvider { calls: AtomicUsize::new(0) })
        }
    }

    fn resolver_over(provider: &Arc<CannedProvider>) -> WordResolver {
        let providers: Vec<Arc<dyn ContentProvider>> = vec![provider.clone()];
        WordResolver::new(providers, provider.clone(), 3)
    }

    #[async_trait]
    impl ContentProvider for CannedProvider {
        fn name(&self) -> &str {
            "canned"
        }

        async fn fetch_details(&self, word: &str, _: &str) -> Result<FieldSet, ProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let mut details = FieldSet::default();
            for field in Field::ALL {
                details.set(field, format!("{word} {}", field.key()));
            }
            details.usage = format!("A sentence featuring {word} in it.");
            Ok(details)
        }

        async fn fetch_field(&self, _: Field, _: &str, _: &str) -> Result<String, ProviderError> {
            Err(ProviderError::EmptyResponse)
        }

        async fn fetch_word_list(
            &self,
            _: &str,
            _: &[String],
        ) -> Result<Vec<String>, ProviderError> {
            Ok(Vec::new())
        }
    }

    fn blank_words() -> Vec<Word> {
        ["lava", "magma", "crater", "eruption", "ash", "caldera"]
            .into_iter()
            .enumerate()
            .map(|(index, word)| {
                let mut entry = Word::new(index as i64 + 1, word, 1);
                entry.audio_url = format!("audio/word_{index}.mp3");
                entry
            })
            .collect()
    }

    #[test]
    fn windows_advance_in_word_batch_steps() {
        let config = PipelineConfig::default();
        assert_eq!(Route::FIRST.window(&config), 0..6);
        assert_eq!(Route(2).window(&config), 6..12);
        assert_eq!(Route::FIRST.next(&config), Some(Route(2)));
        assert_eq!(Route(5).next(&config), None);
    }

    #[test]
    fn route_zero_clamps_to_the_first_window() {
        let config = PipelineConfig::default();
        assert_eq!(Route(0).window(&config), 0..6);
    }

    #[tokio::test]
    async fn build_route_produces_a_full_station_set() {
        let provider = CannedProvider::new();
        let resolver = resolver_over(&provider);
        let config = PipelineConfig::default();

        let stations = build_route(&resolver, &blank_words(), "volcanoes", Route::FIRST, &config)
            .await
            .unwrap();

        assert_eq!(stations.len(), 8);
        let total: usize = stations.iter().map(|station| station.games.len()).sum();
        assert_eq!(total, config.required_variants());
        for station in &stations {
            assert_eq!(station.route, 1);
            assert_eq!(station.games.len(), station.level as usize);
        }
        // every blank word was enriched exactly once
        assert_eq!(provider.calls.load(Ordering::SeqCst), 6);
    }

    #[tokio::test]
    async fn already_enriched_words_are_not_re_resolved() {
        let provider = CannedProvider::new();
        let resolver = resolver_over(&provider);
        let config = PipelineConfig::default();

        let mut words = blank_words();
        for word in &mut words {
            let details = provider.fetch_details(&word.word, "volcanoes").await.unwrap();
            word.apply_details(details);
        }
        let before = provider.calls.load(Ordering::SeqCst);

        build_route(&resolver, &words, "volcanoes", Route::FIRST, &config)
            .await
            .unwrap();
        assert_eq!(provider.calls.load(Ordering::SeqCst), before);
    }

    #[tokio::test]
    async fn prefetch_resolves_without_surfacing_errors() {
        let provider = CannedProvider::new();
        let resolver = Arc::new(resolver_over(&provider));

        let details = spawn_prefetch(resolver, "lava".to_owned(), "volcanoes".to_owned())
            .await
            .unwrap();
        assert!(details.is_complete());
    }
}

//! Turns a topic's word list into enriched words and leveled spelling games.
//!
//! The pipeline runs in three stages per route:
//!
//! 1. [`WordResolver`] fills in the six descriptive fields of each word by
//!    cascading over unreliable content providers, merging partial answers
//!    and re-fetching single missing fields within a bounded budget.
//! 2. The generators in [`games`] fan out over the enriched batch and build
//!    one shuffled bank of playable variants per game kind.
//! 3. [`distribute`] packs the banks into levels 1..=8, popping each variant
//!    from its bank so no instance is ever placed twice, and [`build_route`]
//!    wraps the levels as stations for the persistence layer.
//!
//! Provider adapters live in the `wordinfo` crate; this crate never talks to
//! a backend directly.

mod config;
mod distributor;
pub mod games;
mod resolver;
mod route;
mod word;

pub use config::PipelineConfig;
pub use distributor::{distribute, DistributeError};
pub use games::{generate_banks, Banks, GameKind, GameVariant, WordPair};
pub use resolver::{suggest_words, WordResolver};
pub use route::{build_route, spawn_prefetch, Route, Station};
pub use word::Word;

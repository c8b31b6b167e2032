use std::collections::BTreeMap;

use rand::seq::{IteratorRandom, SliceRandom};
use rand::Rng;
use serde::Serialize;

use crate::word::Word;

/// How many wrong guesses a hangman round allows.
const HANGMAN_ATTEMPTS: u32 = 6;
/// Words per matching-pair board.
const PAIR_GROUP_SIZE: usize = 3;

/// Origins to draw quiz distractors from.
pub const LANGUAGE_ORIGINS: &[&str] = &[
    "Old English", "Latin", "Greek", "French", "Spanish", "Italian", "German",
    "Japanese", "Chinese", "Korean", "Arabic", "Hindi", "Russian", "Portuguese",
    "Dutch", "Swedish", "Norwegian", "Danish", "Finnish", "Turkish", "Hungarian",
    "Czech", "Polish", "Romanian", "Bulgarian", "Croatian", "Serbian", "Slovak",
    "Slovenian", "Ukrainian", "Belarusian", "Lithuanian", "Latvian", "Estonian",
    "Georgian", "Armenian", "Azerbaijani", "Kazakh", "Uzbek", "Turkmen", "Kyrgyz",
    "Tajik", "Mongolian", "Vietnamese", "Thai", "Burmese", "Khmer", "Lao",
    "Indonesian", "Malay", "Filipino", "Hawaiian", "Maori", "Samoan", "Tongan",
    "Fijian", "Tahitian", "Marquesan", "Rapa Nui", "Rarotongan",
];

/// The closed set of game kinds; also the bank key for the distributor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum GameKind {
    SpellWord,
    QuizOrigin,
    Hangman,
    FindMissingLetter,
    MatchingPair,
    ChooseSpokenWord,
    ChooseDefinition,
}

impl GameKind {
    pub const ALL: [GameKind; 7] = [
        GameKind::SpellWord,
        GameKind::QuizOrigin,
        GameKind::Hangman,
        GameKind::FindMissingLetter,
        GameKind::MatchingPair,
        GameKind::ChooseSpokenWord,
        GameKind::ChooseDefinition,
    ];

    pub fn title(self) -> &'static str {
        match self {
            GameKind::SpellWord => "Spell the Word",
            GameKind::QuizOrigin => "Quiz of Origin",
            GameKind::Hangman => "Guess the Word",
            GameKind::FindMissingLetter => "Find the Missing Letter",
            GameKind::MatchingPair => "Matching Pairs",
            GameKind::ChooseSpokenWord => "Choose the Spoken Word",
            GameKind::ChooseDefinition => "Choose the Definition",
        }
    }
}

/// One word matched with its pronunciation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WordPair {
    pub word: String,
    pub pronunciation: String,
}

/// One self-contained playable item: a prompt plus its correct answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "game", rename_all = "camelCase")]
pub enum GameVariant {
    #[serde(rename_all = "camelCase")]
    SpellWord { word: String, audio_url: String },
    #[serde(rename_all = "camelCase")]
    QuizOrigin {
        question: String,
        options: Vec<String>,
        correct_answer: String,
    },
    #[serde(rename_all = "camelCase")]
    Hangman {
        usage_with_blanks: String,
        default_attempts: u32,
        correct_answer: String,
    },
    #[serde(rename_all = "camelCase")]
    FindMissingLetter {
        word_with_missing_letter: String,
        correct_answer: char,
    },
    #[serde(rename_all = "camelCase")]
    MatchingPair {
        correct_pairs: Vec<WordPair>,
        shuffled_pairs: Vec<WordPair>,
    },
    #[serde(rename_all = "camelCase")]
    ChooseSpokenWord {
        audio_url: String,
        options: Vec<String>,
        correct_answer: String,
    },
    #[serde(rename_all = "camelCase")]
    ChooseDefinition {
        definition: String,
        options: Vec<String>,
        correct_answer: String,
    },
}

impl GameVariant {
    pub fn kind(&self) -> GameKind {
        match self {
            GameVariant::SpellWord { .. } => GameKind::SpellWord,
            GameVariant::QuizOrigin { .. } => GameKind::QuizOrigin,
            GameVariant::Hangman { .. } => GameKind::Hangman,
            GameVariant::FindMissingLetter { .. } => GameKind::FindMissingLetter,
            GameVariant::MatchingPair { .. } => GameKind::MatchingPair,
            GameVariant::ChooseSpokenWord { .. } => GameKind::ChooseSpokenWord,
            GameVariant::ChooseDefinition { .. } => GameKind::ChooseDefinition,
        }
    }

    pub fn title(&self) -> &'static str {
        self.kind().title()
    }
}

/// One shuffled pool of variants per game kind.
pub type Banks = BTreeMap<GameKind, Vec<GameVariant>>;

/// Runs every generator over the enriched word batch.
///
/// Words are handed to the generators longest first, matching the difficulty
/// ordering of the word lists they came from.
pub fn generate_banks<R: Rng>(words: &[Word], rng: &mut R) -> Banks {
    let mut batch: Vec<Word> = words.to_vec();
    batch.sort_by_key(|word| std::cmp::Reverse(word.word.len()));

    let mut banks = Banks::new();
    banks.insert(GameKind::SpellWord, spell_word(&batch, rng));
    banks.insert(GameKind::QuizOrigin, quiz_origin(&batch, rng));
    banks.insert(GameKind::Hangman, hangman(&batch, rng));
    banks.insert(GameKind::FindMissingLetter, find_missing_letter(&batch, rng));
    banks.insert(GameKind::MatchingPair, matching_pair(&batch, rng));
    banks.insert(GameKind::ChooseSpokenWord, choose_spoken_word(&batch, rng));
    banks.insert(GameKind::ChooseDefinition, choose_definition(&batch, rng));
    banks
}

pub fn spell_word<R: Rng>(words: &[Word], rng: &mut R) -> Vec<GameVariant> {
    let mut bank: Vec<GameVariant> = words
        .iter()
        .map(|word| GameVariant::SpellWord {
            word: word.word.clone(),
            audio_url: word.audio_url.clone(),
        })
        .collect();
    bank.shuffle(rng);
    bank
}

pub fn quiz_origin<R: Rng>(words: &[Word], rng: &mut R) -> Vec<GameVariant> {
    let mut bank = Vec::with_capacity(words.len());
    for word in words {
        let origin = word.details.language_origin.clone();
        // sample distractors from everything except the correct origin, then
        // insert it and shuffle, so no rejection loop is needed
        let mut options: Vec<String> = LANGUAGE_ORIGINS
            .iter()
            .filter(|candidate| !candidate.eq_ignore_ascii_case(&origin))
            .map(|candidate| (*candidate).to_owned())
            .choose_multiple(rng, 3);
        options.push(origin.clone());
        options.shuffle(rng);
        bank.push(GameVariant::QuizOrigin {
            question: format!("What is the origin of the word '{}'?", word.word),
            options,
            correct_answer: origin,
        });
    }
    bank.shuffle(rng);
    bank
}

pub fn hangman<R: Rng>(words: &[Word], rng: &mut R) -> Vec<GameVariant> {
    let mut bank = Vec::with_capacity(words.len());
    for word in words {
        let usage = word.details.usage.to_lowercase();
        let hidden = word.word.to_lowercase();
        let blanks = "_".repeat(word.word.chars().count());
        bank.push(GameVariant::Hangman {
            usage_with_blanks: capitalize(&usage.replace(&hidden, &blanks)),
            default_attempts: HANGMAN_ATTEMPTS,
            correct_answer: word.word.clone(),
        });
    }
    bank.shuffle(rng);
    bank
}

pub fn find_missing_letter<R: Rng>(words: &[Word], rng: &mut R) -> Vec<GameVariant> {
    let mut bank = Vec::with_capacity(words.len());
    for word in words {
        let positions: Vec<(usize, char)> = word
            .word
            .char_indices()
            .filter(|(_, letter)| *letter != ' ')
            .collect();
        let Some(&(blank_index, letter)) = positions.choose(rng) else {
            continue;
        };
        let with_blank: String = word
            .word
            .char_indices()
            .map(|(index, letter)| if index == blank_index { '_' } else { letter })
            .collect();
        bank.push(GameVariant::FindMissingLetter {
            word_with_missing_letter: with_blank,
            correct_answer: letter,
        });
    }
    bank.shuffle(rng);
    bank
}

pub fn matching_pair<R: Rng>(words: &[Word], rng: &mut R) -> Vec<GameVariant> {
    if words.is_empty() {
        return Vec::new();
    }
    let boards = (words.len() + PAIR_GROUP_SIZE - 1) / PAIR_GROUP_SIZE;
    let mut bank = Vec::with_capacity(boards);
    for _ in 0..boards {
        let group = words
            .iter()
            .choose_multiple(rng, PAIR_GROUP_SIZE.min(words.len()));
        let correct_pairs: Vec<WordPair> = group
            .iter()
            .map(|word| WordPair {
                word: word.word.clone(),
                pronunciation: word.details.alternate_pronunciation.clone(),
            })
            .collect();
        let mut shuffled_words: Vec<String> =
            group.iter().map(|word| word.word.clone()).collect();
        let mut shuffled_pronunciations: Vec<String> = group
            .iter()
            .map(|word| word.details.alternate_pronunciation.clone())
            .collect();
        shuffled_words.shuffle(rng);
        shuffled_pronunciations.shuffle(rng);
        let shuffled_pairs = shuffled_words
            .into_iter()
            .zip(shuffled_pronunciations)
            .map(|(word, pronunciation)| WordPair { word, pronunciation })
            .collect();
        bank.push(GameVariant::MatchingPair { correct_pairs, shuffled_pairs });
    }
    bank.shuffle(rng);
    bank
}

pub fn choose_spoken_word<R: Rng>(words: &[Word], rng: &mut R) -> Vec<GameVariant> {
    let mut bank = Vec::with_capacity(words.len());
    for word in words {
        let mut options: Vec<String> = words
            .iter()
            .filter(|other| other.id != word.id)
            .map(|other| other.word.clone())
            .choose_multiple(rng, 4);
        options.push(word.word.clone());
        options.shuffle(rng);
        bank.push(GameVariant::ChooseSpokenWord {
            audio_url: word.audio_url.clone(),
            options,
            correct_answer: word.word.clone(),
        });
    }
    bank.shuffle(rng);
    bank
}

pub fn choose_definition<R: Rng>(words: &[Word], rng: &mut R) -> Vec<GameVariant> {
    let mut bank = Vec::with_capacity(words.len());
    for word in words {
        let mut options: Vec<String> = words
            .iter()
            .filter(|other| other.id != word.id)
            .map(|other| other.word.clone())
            .choose_multiple(rng, 3);
        options.push(word.word.clone());
        options.shuffle(rng);
        bank.push(GameVariant::ChooseDefinition {
            definition: word.details.definition.clone(),
            options,
            correct_answer: word.word.clone(),
        });
    }
    bank.shuffle(rng);
    bank
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

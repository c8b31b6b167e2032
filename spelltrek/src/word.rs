use serde::{Deserialize, Serialize};
use wordinfo::FieldSet;

/// A headword from a word list, together with its descriptive fields.
///
/// Words start out with blank fields and are enriched lazily the first time
/// something needs the fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Word {
    pub id: i64,
    pub word: String,
    #[serde(flatten)]
    pub details: FieldSet,
    pub audio_url: String,
    pub is_ai_generated: bool,
    pub word_list_id: i64,
}

impl Word {
    pub fn new(id: i64, word: impl Into<String>, word_list_id: i64) -> Word {
        Word {
            id,
            word: word.into(),
            word_list_id,
            ..Word::default()
        }
    }

    /// True once all six descriptive fields hold real content.
    pub fn is_enriched(&self) -> bool {
        self.details.is_complete()
    }

    pub fn apply_details(&mut self, details: FieldSet) {
        self.details = details;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wordinfo::Field;

    #[test]
    fn new_words_are_not_enriched() {
        assert!(!Word::new(1, "lava", 7).is_enriched());
    }

    #[test]
    fn a_word_with_all_fields_filled_is_enriched() {
        let mut word = Word::new(1, "lava", 7);
        let mut details = FieldSet::default();
        for field in Field::ALL {
            details.set(field, "something".to_owned());
        }
        word.apply_details(details);
        assert!(word.is_enriched());
    }

    #[test]
    fn unknown_tokens_do_not_count_as_enrichment() {
        let mut word = Word::new(1, "lava", 7);
        let mut details = FieldSet::default();
        for field in Field::ALL {
            details.set(field, "Unknown".to_owned());
        }
        word.apply_details(details);
        assert!(!word.is_enriched());
    }

    #[test]
    fn details_serialize_flattened_onto_the_word() {
        let mut word = Word::new(3, "lava", 7);
        word.details.language_origin = "Italian".to_owned();
        let json = serde_json::to_value(&word).unwrap();
        assert_eq!(json["word"], "lava");
        assert_eq!(json["languageOrigin"], "Italian");
        assert_eq!(json["wordListId"], 7);
    }
}

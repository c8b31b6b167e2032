use std::collections::BTreeMap;

use rand::seq::IteratorRandom;
use rand::Rng;
use thiserror::Error;

use crate::games::{Banks, GameVariant};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DistributeError {
    #[error("not enough game variants to fill every level: {available} available, {required} required")]
    InsufficientVariants { available: usize, required: usize },
}

/// Packs the generator banks into levels 1..=`max_level`.
///
/// Level L receives exactly L variants, each popped from a uniformly chosen
/// non-empty bank. Popping on use is what guarantees no variant instance
/// lands in two levels.
///
/// The combined inventory must cover the triangular total up front;
/// otherwise this fails fast instead of under-filling trailing levels.
pub fn distribute<R: Rng>(
    banks: Banks,
    max_level: u8,
    rng: &mut R,
) -> Result<BTreeMap<u8, Vec<GameVariant>>, DistributeError> {
    let required: usize = (1..=max_level as usize).sum();
    let available: usize = banks.values().map(Vec::len).sum();
    if available < required {
        return Err(DistributeError::InsufficientVariants { available, required });
    }

    let mut pools: Vec<Vec<GameVariant>> = banks.into_values().collect();
    let mut levels = BTreeMap::new();
    for level in 1..=max_level {
        let mut games = Vec::with_capacity(level as usize);
        while games.len() < level as usize {
            let Some(pool) = pools.iter_mut().filter(|pool| !pool.is_empty()).choose(rng)
            else {
                // cannot happen: the inventory was checked above
                break;
            };
            if let Some(variant) = pool.pop() {
                games.push(variant);
            }
        }
        levels.insert(level, games);
    }
    Ok(levels)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::{generate_banks, GameKind};
    use crate::word::Word;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use wordinfo::Field;

    fn banks() -> Banks {
        let words: Vec<Word> = (0..6)
            .map(|index| {
                let mut word = Word::new(index, format!("word{index}"), 1);
                for field in Field::ALL {
                    word.details.set(field, format!("value-{index}"));
                }
                word
            })
            .collect();
        generate_banks(&words, &mut StdRng::seed_from_u64(7))
    }

    #[test]
    fn levels_grow_by_one_up_to_the_maximum() {
        let levels = distribute(banks(), 8, &mut StdRng::seed_from_u64(7)).unwrap();
        assert_eq!(levels.len(), 8);
        for (level, games) in &levels {
            assert_eq!(games.len(), *level as usize);
        }
        assert_eq!(levels.values().map(Vec::len).sum::<usize>(), 36);
    }

    #[test]
    fn distribution_draws_from_more_than_one_bank() {
        let levels = distribute(banks(), 8, &mut StdRng::seed_from_u64(7)).unwrap();
        let kinds: std::collections::BTreeSet<GameKind> = levels
            .values()
            .flatten()
            .map(GameVariant::kind)
            .collect();
        assert!(kinds.len() > 1);
    }

    #[test]
    fn consumption_never_exceeds_the_generated_inventory() {
        let banks = banks();
        let generated: usize = banks.values().map(Vec::len).sum();
        let levels = distribute(banks, 8, &mut StdRng::seed_from_u64(7)).unwrap();
        let placed: usize = levels.values().map(Vec::len).sum();
        assert!(placed <= generated);
        // six words yield 38 variants; 36 are placed, the rest is discarded
        assert_eq!(generated, 38);
        assert_eq!(placed, 36);
    }

    #[test]
    fn no_variant_is_placed_in_two_levels() {
        let levels = distribute(banks(), 8, &mut StdRng::seed_from_u64(7)).unwrap();
        let placed: Vec<&GameVariant> = levels.values().flatten().collect();
        for (index, variant) in placed.iter().enumerate() {
            for other in &placed[index + 1..] {
                assert_ne!(variant, other);
            }
        }
    }

    #[test]
    fn insufficient_inventory_fails_fast() {
        let mut banks = banks();
        for pool in banks.values_mut() {
            pool.truncate(1);
        }
        let result = distribute(banks, 8, &mut StdRng::seed_from_u64(7));
        assert_eq!(
            result,
            Err(DistributeError::InsufficientVariants { available: 7, required: 36 })
        );
    }

    #[test]
    fn a_single_level_needs_only_one_variant() {
        let mut banks = banks();
        for pool in banks.values_mut() {
            pool.truncate(1);
        }
        let levels = distribute(banks, 1, &mut StdRng::seed_from_u64(7)).unwrap();
        assert_eq!(levels.len(), 1);
        assert_eq!(levels[&1].len(), 1);
    }
}

//! Item bank: validated term/definition pairs and the shuffled working set.

use crate::{AnswerKey, Chapter, Item, ItemId, Slot, SlotId};
use derive_getters::Getters;
use derive_new::new;
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

/// A validated, trimmed term/definition pair.
#[derive(Debug, Clone, PartialEq, Eq, Getters, new, Serialize, Deserialize)]
pub struct Entry {
    /// Position of the entry in the chapter, after filtering.
    index: usize,
    /// The term (the answer).
    term: String,
    /// The definition (the prompt).
    definition: String,
}

/// Validated entries of one chapter.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct ItemBank {
    /// Chapter the entries came from.
    chapter_id: String,
    /// Usable entries, in chapter order unless limited.
    entries: Vec<Entry>,
}

impl ItemBank {
    /// Loads a chapter, dropping entries without a non-empty term and definition.
    ///
    /// An empty result is not an error here; callers treat it as
    /// "nothing to play".
    #[instrument(skip(chapter), fields(chapter_id = %chapter.chapter_id()))]
    pub fn load(chapter: &Chapter) -> Self {
        let entries: Vec<Entry> = chapter
            .term_definitions()
            .iter()
            .filter_map(|td| {
                let term = td.term.as_deref().map(str::trim).filter(|t| !t.is_empty())?;
                let definition = td
                    .definition
                    .as_deref()
                    .map(str::trim)
                    .filter(|d| !d.is_empty())?;
                Some((term.to_string(), definition.to_string()))
            })
            .enumerate()
            .map(|(index, (term, definition))| Entry::new(index, term, definition))
            .collect();

        let dropped = chapter.term_definitions().len() - entries.len();
        if entries.is_empty() {
            warn!(dropped, "Chapter has no usable entries");
        } else {
            debug!(usable = entries.len(), dropped, "Loaded chapter entries");
        }

        Self {
            chapter_id: chapter.chapter_id().clone(),
            entries,
        }
    }

    /// Loads a chapter, shuffles it and keeps at most `limit` entries.
    ///
    /// A limit above the number of usable entries keeps them all.
    #[instrument(skip(chapter, rng), fields(chapter_id = %chapter.chapter_id()))]
    pub fn load_limited<R: Rng + ?Sized>(
        chapter: &Chapter,
        limit: Option<usize>,
        rng: &mut R,
    ) -> Self {
        let mut bank = Self::load(chapter);
        let Some(limit) = limit else {
            return bank;
        };
        shuffle(&mut bank.entries, rng);
        if limit < bank.entries.len() {
            debug!(limit, available = bank.entries.len(), "Truncating to pair limit");
            bank.entries.truncate(limit);
        }
        bank
    }

    /// Number of usable entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the chapter had nothing to play.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Builds the fill-in-the-blank layout: one word per entry, one blank per entry.
    ///
    /// Keys are the term text, so entries sharing a term accept either word.
    pub fn fill_blank_layout(&self) -> (Vec<Item>, Vec<Slot>) {
        self.layout(|entry| AnswerKey::new(entry.term.clone()))
    }

    /// Builds the matching layout: term cards as items, definition cards as slots.
    ///
    /// Keys are the pair identity, so each term matches only its own definition.
    pub fn matching_layout(&self) -> (Vec<Item>, Vec<Slot>) {
        self.layout(|entry| AnswerKey::new(format!("pair-{}", entry.index)))
    }

    fn layout(&self, key: impl Fn(&Entry) -> AnswerKey) -> (Vec<Item>, Vec<Slot>) {
        self.entries
            .iter()
            .enumerate()
            .map(|(n, entry)| {
                let id = n as u32;
                let item = Item::new(ItemId(id), entry.term.clone(), key(entry));
                let slot = Slot::new(SlotId(id), entry.definition.clone(), key(entry));
                (item, slot)
            })
            .unzip()
    }
}

/// Shuffles `items` in place; every permutation is equally likely.
pub fn shuffle<T, R: Rng + ?Sized>(items: &mut [T], rng: &mut R) {
    items.shuffle(rng);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TermDefinition;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn chapter() -> Chapter {
        Chapter::new(
            "1",
            vec![
                TermDefinition::new("  Mitosis ", "Cell division"),
                TermDefinition::new("", "No term"),
                TermDefinition {
                    term: Some("No definition".into()),
                    definition: None,
                },
                TermDefinition::new("Osmosis", "   "),
                TermDefinition::new("Enzyme", "Biological catalyst"),
            ],
        )
    }

    #[test]
    fn test_load_filters_and_trims() {
        let bank = ItemBank::load(&chapter());
        assert_eq!(bank.len(), 2);
        assert_eq!(bank.entries()[0].term(), "Mitosis");
        assert_eq!(bank.entries()[1].index(), &1);
    }

    #[test]
    fn test_empty_chapter_loads_empty_bank() {
        let bank = ItemBank::load(&Chapter::new("x", vec![TermDefinition::default()]));
        assert!(bank.is_empty());
    }

    #[test]
    fn test_pair_limit_clamps_to_available() {
        let mut rng = StdRng::seed_from_u64(3);
        let bank = ItemBank::load_limited(&chapter(), Some(10), &mut rng);
        assert_eq!(bank.len(), 2);

        let bank = ItemBank::load_limited(&chapter(), Some(1), &mut rng);
        assert_eq!(bank.len(), 1);
    }

    #[test]
    fn test_shuffle_is_a_permutation() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut values: Vec<u32> = (0..50).collect();
        shuffle(&mut values, &mut rng);
        let mut sorted = values.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, (0..50).collect::<Vec<_>>());
    }

    #[test]
    fn test_shuffle_reaches_every_position() {
        // Every element should land in every position over enough runs.
        let mut rng = StdRng::seed_from_u64(9);
        let mut seen = [[false; 4]; 4];
        for _ in 0..500 {
            let mut values = [0usize, 1, 2, 3];
            shuffle(&mut values, &mut rng);
            for (pos, value) in values.iter().enumerate() {
                seen[*value][pos] = true;
            }
        }
        assert!(seen.iter().all(|row| row.iter().all(|hit| *hit)));
    }

    #[test]
    fn test_layout_keys() {
        let bank = ItemBank::load(&chapter());
        let (items, slots) = bank.fill_blank_layout();
        assert!(items[0].answers(&slots[0]));
        assert!(!items[0].answers(&slots[1]));

        let (items, slots) = bank.matching_layout();
        assert_eq!(slots[1].expected().as_str(), "pair-1");
        assert!(items[1].answers(&slots[1]));
    }
}

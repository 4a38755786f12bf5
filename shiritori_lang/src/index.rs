// Word index: lead character → set of canonical readings.
//
// Built once from the lexicon at startup and never mutated afterwards; the
// referee shares it read-only across all rooms with no locking.
//
// Construction consumes every entry exactly once:
// 1. keep entries whose part of speech is on the `PLAYABLE` allow-list and
//    whose reading is present (not `*`);
// 2. normalize the reading (`kana::to_canonical`);
// 3. drop readings that are shorter than two characters or whose last
//    effective character is the terminal sound;
// 4. insert into the bucket keyed by the reading's first character.
//
// Every reading in the index is therefore a legal engine move: long enough,
// and never one that would end the game. Buckets are `BTreeSet`s so that a
// seeded `GameRng` always draws from the same ordering.

use std::collections::{BTreeMap, BTreeSet};

use crate::kana;
use crate::types::LexEntry;

/// Minimum length, in characters, of an indexed reading.
pub const MIN_READING_LEN: usize = 2;

/// Immutable lookup of playable readings grouped by lead character.
#[derive(Debug, Clone, Default)]
pub struct WordIndex {
    buckets: BTreeMap<char, BTreeSet<String>>,
    len: usize,
}

impl WordIndex {
    /// Build the index from lexicon entries.
    pub fn build<'a>(entries: impl IntoIterator<Item = &'a LexEntry>) -> Self {
        let mut index = WordIndex::default();
        for entry in entries {
            if !entry.part_of_speech().is_playable() {
                continue;
            }
            let Some(raw) = entry.reading() else {
                continue;
            };
            let reading = kana::to_canonical(raw);
            if !is_indexable(&reading) {
                continue;
            }
            index.insert(reading);
        }
        index
    }

    fn insert(&mut self, reading: String) {
        let Some(lead) = kana::lead_char(&reading) else {
            return;
        };
        if self.buckets.entry(lead).or_default().insert(reading) {
            self.len += 1;
        }
    }

    /// Readings starting with `lead`. An absent bucket is just empty.
    pub fn candidates(&self, lead: char) -> Option<&BTreeSet<String>> {
        self.buckets.get(&lead)
    }

    /// Whether the exact canonical reading is indexed.
    pub fn contains(&self, reading: &str) -> bool {
        kana::lead_char(reading)
            .and_then(|lead| self.buckets.get(&lead))
            .is_some_and(|bucket| bucket.contains(reading))
    }

    /// Total number of distinct readings.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of distinct lead characters.
    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    /// Iterate all readings, bucket by bucket.
    pub fn readings(&self) -> impl Iterator<Item = &str> {
        self.buckets.values().flatten().map(String::as_str)
    }
}

/// Post-normalization exclusion rule.
pub fn is_indexable(reading: &str) -> bool {
    reading.chars().count() >= MIN_READING_LEN && !kana::ends_in_terminal_sound(reading)
}

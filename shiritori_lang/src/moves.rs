// Move selector: the engine's reply word.
//
// Given the character the next word must start with and the readings
// already played this game, materialize the set difference of the index
// bucket and the used set, then draw one element uniformly with the
// caller's `GameRng`. `None` means the engine has no legal move and loses.
//
// Uniformity is the only guarantee about which word comes back. Callers and
// tests may rely on the lead character and the exclusion, never on the
// particular word.

use std::collections::BTreeSet;

use shiritori_prng::GameRng;

use crate::index::WordIndex;

/// Draw an unused reading starting with `lead`, or `None` if exhausted.
pub fn select_move(
    index: &WordIndex,
    lead: char,
    used: &BTreeSet<String>,
    rng: &mut GameRng,
) -> Option<String> {
    let bucket = index.candidates(lead)?;
    let available: Vec<&String> = bucket.difference(used).collect();
    rng.choose(&available).map(|reading| (*reading).clone())
}

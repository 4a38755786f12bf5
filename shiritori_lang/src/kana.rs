// Kana normalization: the canonical phonetic form every comparison uses.
//
// Readings arrive in katakana (dictionary and analyzer output) or hiragana
// (players typing). Everything is folded into hiragana by a fixed code-point
// offset over the katakana block, then lower-cased. The long-vowel mark `ー`
// sits outside that block and survives normalization untouched, which is why
// `last_effective_char` exists: it is the one place that decides which
// character a word "ends" on, shared by human-word validation, engine-word
// chaining, and index construction.
//
// `render_surface` goes the other way (hiragana to katakana) for display. It
// is a mechanical alphabet swap, not a dictionary lookup, so it yields *a*
// plausible written form rather than the word's real spelling.

/// First katakana code point folded into hiragana (`ァ`).
const KATAKANA_FIRST: char = '\u{30A1}';
/// Last katakana code point folded into hiragana (`ヶ`).
const KATAKANA_LAST: char = '\u{30F6}';
/// First hiragana code point rendered back to katakana (`ぁ`).
const HIRAGANA_FIRST: char = '\u{3041}';
/// Last hiragana code point rendered back to katakana (`ゖ`).
const HIRAGANA_LAST: char = '\u{3096}';
/// Distance between the hiragana and katakana blocks.
const KANA_OFFSET: u32 = 0x60;

/// A word whose last effective character is this sound loses the game.
pub const TERMINAL_SOUND: char = 'ん';

/// Long-vowel (elongation) mark. Never counts as a word's final sound.
pub const LONG_VOWEL_MARK: char = 'ー';

/// Fold katakana into hiragana and lower-case the result.
///
/// Total and deterministic: characters outside the katakana block pass
/// through unchanged, and normalizing an already-canonical string is a no-op.
pub fn to_canonical(text: &str) -> String {
    text.chars()
        .map(|c| shift(c, KATAKANA_FIRST, KATAKANA_LAST, |cp| cp - KANA_OFFSET))
        .collect::<String>()
        .to_lowercase()
}

/// Render a canonical reading for display: hiragana to katakana, upper-cased.
pub fn render_surface(reading: &str) -> String {
    reading
        .chars()
        .map(|c| shift(c, HIRAGANA_FIRST, HIRAGANA_LAST, |cp| cp + KANA_OFFSET))
        .collect::<String>()
        .to_uppercase()
}

/// The character a word chains on.
///
/// If the word ends in the long-vowel mark and has more than one character,
/// the character before the mark is used instead; otherwise the literal
/// final character. `None` only for an empty string.
pub fn last_effective_char(reading: &str) -> Option<char> {
    let mut rev = reading.chars().rev();
    let last = rev.next()?;
    match rev.next() {
        Some(prev) if last == LONG_VOWEL_MARK => Some(prev),
        _ => Some(last),
    }
}

/// First character of a reading, i.e. its index bucket key.
pub fn lead_char(reading: &str) -> Option<char> {
    reading.chars().next()
}

/// True if the reading ends, effectively, in the terminal sound.
pub fn ends_in_terminal_sound(reading: &str) -> bool {
    last_effective_char(reading) == Some(TERMINAL_SOUND)
}

fn shift(c: char, first: char, last: char, f: impl Fn(u32) -> u32) -> char {
    if (first..=last).contains(&c) {
        char::from_u32(f(c as u32)).unwrap_or(c)
    } else {
        c
    }
}

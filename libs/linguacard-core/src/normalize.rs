//! Answer normalization for case, accent and punctuation insensitive checks.

use rand::seq::SliceRandom;
use rand::Rng;
use unicode_normalization::UnicodeNormalization;

/// Punctuation removed before comparing answers.
const STRIPPED_PUNCTUATION: &[char] = &[
    '.', ',', '/', '#', '!', '$', '%', '^', '&', '*', ';', ':', '{', '}', '=', '-', '_', '`', '~',
    '(', ')', '?',
];

/// Fewest words an answer needs to get a word-order hint.
const HINT_MIN_WORDS: usize = 3;

/// Canonical comparable form of `text`.
///
/// Lower-cases, decomposes to NFD and drops combining diacritical marks,
/// and strips [`STRIPPED_PUNCTUATION`]. Whitespace is kept as typed. The
/// result is a fixed point: normalizing it again returns it unchanged.
pub fn normalize_text(text: &str) -> String {
    text.to_lowercase()
        .nfd()
        .filter(|c| !is_diacritic(*c))
        .filter(|c| !STRIPPED_PUNCTUATION.contains(c))
        .collect()
}

/// Whether a typed or selected answer counts as the expected one.
pub fn answers_match(given: &str, expected: &str) -> bool {
    normalize_text(given) == normalize_text(expected)
}

/// Answer words in random order, for answers long enough to need a hint.
pub fn shuffled_words<R: Rng + ?Sized>(answer: &str, rng: &mut R) -> Option<Vec<String>> {
    let mut words: Vec<String> = answer.split(' ').map(str::to_string).collect();
    if words.len() < HINT_MIN_WORDS {
        return None;
    }
    words.shuffle(rng);
    Some(words)
}

fn is_diacritic(c: char) -> bool {
    ('\u{0300}'..='\u{036f}').contains(&c)
}

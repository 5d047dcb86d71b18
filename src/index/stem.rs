//! Coarse stemming for recall of inflected names.
//!
//! Session notes are written in Polish, so names show up declined
//! ("w Targowisku", "od Kowalskiego"). The stem key lower-cases, folds
//! diacritics and cuts one inflectional ending per word. It is deliberately
//! crude: it only needs to make variants of the same name collide.

/// Endings checked longest first. Diacritics are already folded.
const SUFFIXES: &[&str] = &[
    "owie", "iego", "iemu", "ami", "ach", "owi", "ego", "emu", "ich", "ych", "iem", "om", "em", "ie",
    "ej", "im", "ym", "es", "a", "e", "i", "o", "u", "y", "s",
];

const MIN_STEM_CHARS: usize = 3;

/// Stem key for a whole (possibly multi-word) name.
///
/// # Examples
///
/// ```
/// use chronicle::index::stem_key;
///
/// assert_eq!(stem_key("Targowisko"), stem_key("targowisku"));
/// assert_eq!(stem_key("Jan Kowalski"), stem_key("Jan Kowalskiego"));
/// ```
#[must_use]
pub fn stem_key(name: &str) -> String {
    name.split_whitespace()
        .map(|word| stem_word(&fold(word)))
        .collect::<Vec<_>>()
        .join(" ")
}

fn fold(word: &str) -> String {
    word.to_lowercase()
        .chars()
        .map(|c| match c {
            'ą' => 'a',
            'ć' => 'c',
            'ę' => 'e',
            'ł' => 'l',
            'ń' => 'n',
            'ó' => 'o',
            'ś' => 's',
            'ź' | 'ż' => 'z',
            other => other,
        })
        .collect()
}

fn stem_word(word: &str) -> String {
    let word = word
        .strip_suffix("'s")
        .or_else(|| word.strip_suffix('\''))
        .unwrap_or(word);
    let char_count = word.chars().count();

    for suffix in SUFFIXES {
        if let Some(stem) = word.strip_suffix(suffix) {
            if char_count - suffix.chars().count() >= MIN_STEM_CHARS {
                return stem.to_string();
            }
        }
    }
    word.to_string()
}

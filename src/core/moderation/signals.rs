// Signal extractors - pure measurements taken from a piece of text.
//
// Every function here is stateless: same text in, same signal out.
// The policy evaluator reads a SignalBundle and never looks at the text itself
// except for the length rules.

use super::lexicon::Lexicon;
use std::collections::HashMap;

/// Turkish letters that the character-class rules accept besides ASCII.
const TURKISH_LETTERS: &[char] = &['ğ', 'ü', 'ş', 'ı', 'ö', 'ç', 'Ğ', 'Ü', 'Ş', 'İ', 'Ö', 'Ç'];

/// Everything the rules need, computed in one pass over the input.
#[derive(Debug, Clone, PartialEq)]
pub struct SignalBundle {
    /// Lexicon terms found in the text, in lexicon order
    pub matched_terms: Vec<String>,
    pub uppercase_ratio: f64,
    pub exclamation_ratio: f64,
    pub question_ratio: f64,
    /// Most frequent token longer than the ignore threshold, with its count
    pub top_token: Option<(String, usize)>,
    pub longest_char_run: usize,
    pub numeric_only: bool,
    pub symbol_only: bool,
    pub has_letter: bool,
    pub nickname_charset: bool,
}

impl SignalBundle {
    pub fn extract(text: &str, lexicon: &Lexicon, ignored_token_chars: usize) -> Self {
        Self {
            matched_terms: matched_terms(text, lexicon),
            uppercase_ratio: uppercase_ratio(text),
            exclamation_ratio: char_ratio(text, '!'),
            question_ratio: char_ratio(text, '?'),
            top_token: top_token(text, ignored_token_chars),
            longest_char_run: longest_char_run(text),
            numeric_only: is_numeric_only(text),
            symbol_only: is_symbol_only(text),
            has_letter: has_letter(text),
            nickname_charset: is_nickname_charset(text),
        }
    }
}

/// Substring containment against the lowercased text.
///
/// There is no word-boundary check, so a short term also matches inside a
/// longer, unrelated word.
pub fn matched_terms(text: &str, lexicon: &Lexicon) -> Vec<String> {
    let lowered = text.to_lowercase();
    lexicon
        .lookup()
        .iter()
        .filter(|term| lowered.contains(term.as_str()))
        .cloned()
        .collect()
}

/// Uppercase letters over all alphabetic characters; 0 with no letters.
pub fn uppercase_ratio(text: &str) -> f64 {
    let mut upper = 0usize;
    let mut letters = 0usize;
    for c in text.chars().filter(|c| c.is_alphabetic()) {
        letters += 1;
        if c.is_uppercase() {
            upper += 1;
        }
    }
    if letters == 0 {
        0.0
    } else {
        upper as f64 / letters as f64
    }
}

/// Occurrences of `needle` over the total character count (whitespace included).
pub fn char_ratio(text: &str, needle: char) -> f64 {
    let total = text.chars().count();
    if total == 0 {
        return 0.0;
    }
    let hits = text.chars().filter(|&c| c == needle).count();
    hits as f64 / total as f64
}

/// Count lowercased whitespace-separated tokens longer than `ignored_chars`
/// and return the most frequent one. Ties go to the token seen first.
pub fn top_token(text: &str, ignored_chars: usize) -> Option<(String, usize)> {
    let lowered = text.to_lowercase();
    let mut counts: HashMap<&str, usize> = HashMap::new();
    let mut order: Vec<&str> = Vec::new();

    for token in lowered.split_whitespace() {
        if token.chars().count() <= ignored_chars {
            continue;
        }
        let count = counts.entry(token).or_insert(0);
        if *count == 0 {
            order.push(token);
        }
        *count += 1;
    }

    let mut best: Option<(&str, usize)> = None;
    for token in order {
        let count = counts[token];
        if best.map_or(true, |(_, c)| count > c) {
            best = Some((token, count));
        }
    }
    best.map(|(token, count)| (token.to_string(), count))
}

/// Longest run of one identical character. Line breaks end a run and never
/// count toward one.
pub fn longest_char_run(text: &str) -> usize {
    let mut longest = 0usize;
    let mut current = 0usize;
    let mut previous: Option<char> = None;

    for c in text.chars() {
        if is_line_terminator(c) {
            previous = None;
            current = 0;
            continue;
        }
        if previous == Some(c) {
            current += 1;
        } else {
            previous = Some(c);
            current = 1;
        }
        longest = longest.max(current);
    }
    longest
}

fn is_line_terminator(c: char) -> bool {
    matches!(c, '\n' | '\r' | '\u{2028}' | '\u{2029}')
}

fn without_whitespace(text: &str) -> impl Iterator<Item = char> + '_ {
    text.chars().filter(|c| !c.is_whitespace())
}

/// Only ASCII digits once whitespace is removed.
pub fn is_numeric_only(text: &str) -> bool {
    let mut chars = without_whitespace(text).peekable();
    chars.peek().is_some() && chars.all(|c| c.is_ascii_digit())
}

/// Only symbols once whitespace is removed: no letter, digit or underscore.
pub fn is_symbol_only(text: &str) -> bool {
    let mut chars = without_whitespace(text).peekable();
    chars.peek().is_some() && chars.all(|c| !c.is_alphanumeric() && c != '_')
}

/// True when at least one character is a letter or an underscore.
pub fn has_letter(text: &str) -> bool {
    text.chars().any(|c| c.is_alphabetic() || c == '_')
}

/// ASCII letters, Turkish letters, ASCII digits and underscore only.
pub fn is_nickname_charset(text: &str) -> bool {
    !text.is_empty()
        && text.chars().all(|c| {
            c.is_ascii_alphanumeric() || c == '_' || TURKISH_LETTERS.contains(&c)
        })
}

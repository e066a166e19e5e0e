// Policy evaluator - walks an ordered rule chain over the extracted signals.
//
// One chain per content class. The order is fixed at construction and the
// walk stops at the first rule that fires.

use super::moderation_models::{ContentClass, ModerationConfig, Violation};
use super::signals::SignalBundle;

/// How many lexicon hits a rejection reports.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TermReport {
    /// Only the first match (titles, nicknames)
    First,
    /// Up to N matches, comma-joined (bodies)
    UpTo(usize),
}

/// A single check in a chain.
#[derive(Debug, Clone, PartialEq)]
pub enum Rule {
    MinChars(usize),
    MaxChars(usize),
    Lexicon(TermReport),
    MaxUppercaseRatio(f64),
    MaxExclamationRatio(f64),
    MaxQuestionRatio(f64),
    /// A token may appear at most this many times
    MaxTokenRepeats(usize),
    /// Runs of one character at least this long are rejected
    MaxCharRun(usize),
    NotNumericOnly,
    NotSymbolOnly,
    RequiresLetter,
    NicknameCharset,
}

/// The text a chain is evaluated against, plus its signals.
pub struct Evaluation<'a> {
    /// Original, untrimmed input
    pub text: &'a str,
    pub signals: &'a SignalBundle,
}

impl Rule {
    /// Check this rule; `Some` when it fires.
    pub fn check(&self, eval: &Evaluation<'_>) -> Option<Violation> {
        let trimmed_chars = eval.text.trim().chars().count();
        let signals = eval.signals;

        match *self {
            Rule::MinChars(min) => (trimmed_chars < min).then_some(Violation::TooShort { min }),
            Rule::MaxChars(max) => (trimmed_chars > max).then_some(Violation::TooLong { max }),
            Rule::Lexicon(report) => {
                if signals.matched_terms.is_empty() {
                    return None;
                }
                let keep = match report {
                    TermReport::First => 1,
                    TermReport::UpTo(n) => n.max(1),
                };
                Some(Violation::InappropriateTerms {
                    terms: signals.matched_terms.iter().take(keep).cloned().collect(),
                })
            }
            Rule::MaxUppercaseRatio(max) => (signals.uppercase_ratio > max).then(|| {
                Violation::Shouting {
                    ratio: signals.uppercase_ratio,
                }
            }),
            Rule::MaxExclamationRatio(max) => (signals.exclamation_ratio > max).then(|| {
                Violation::ExcessiveExclamation {
                    ratio: signals.exclamation_ratio,
                }
            }),
            Rule::MaxQuestionRatio(max) => (signals.question_ratio > max).then(|| {
                Violation::ExcessiveQuestion {
                    ratio: signals.question_ratio,
                }
            }),
            Rule::MaxTokenRepeats(max) => match &signals.top_token {
                Some((word, count)) if *count > max => Some(Violation::RepeatedWord {
                    word: word.clone(),
                    count: *count,
                }),
                _ => None,
            },
            Rule::MaxCharRun(run) => (signals.longest_char_run >= run).then(|| {
                Violation::RepeatedCharacters {
                    run: signals.longest_char_run,
                }
            }),
            Rule::NotNumericOnly => signals.numeric_only.then_some(Violation::NumericOnly),
            Rule::NotSymbolOnly => signals.symbol_only.then_some(Violation::SymbolOnly),
            Rule::RequiresLetter => (!signals.has_letter).then_some(Violation::NoLetters),
            Rule::NicknameCharset => {
                (!signals.nickname_charset).then_some(Violation::InvalidCharacters)
            }
        }
    }
}

/// The ordered chain for one content class.
///
/// The "empty or not text" check is not part of the chain: it runs before
/// any signal is extracted, since there is no text to measure.
#[derive(Debug, Clone)]
pub struct RuleSet {
    pub class: ContentClass,
    pub rules: Vec<Rule>,
}

impl RuleSet {
    pub fn for_class(class: ContentClass, config: &ModerationConfig) -> Self {
        let rules = match class {
            ContentClass::Body => vec![
                Rule::MinChars(config.body_min_chars),
                Rule::MaxChars(config.body_max_chars),
                Rule::Lexicon(TermReport::UpTo(config.reported_terms)),
                Rule::MaxUppercaseRatio(config.max_uppercase_ratio),
                Rule::MaxExclamationRatio(config.max_exclamation_ratio),
                Rule::MaxQuestionRatio(config.max_question_ratio),
                Rule::MaxTokenRepeats(config.max_token_repeats),
                Rule::MaxCharRun(config.max_char_run),
                Rule::NotNumericOnly,
                Rule::NotSymbolOnly,
            ],
            ContentClass::Title => vec![
                Rule::MinChars(config.title_min_chars),
                Rule::MaxChars(config.title_max_chars),
                Rule::Lexicon(TermReport::First),
                Rule::RequiresLetter,
            ],
            ContentClass::Nickname => vec![
                Rule::MinChars(config.nickname_min_chars),
                Rule::MaxChars(config.nickname_max_chars),
                Rule::Lexicon(TermReport::First),
                Rule::NicknameCharset,
            ],
        };
        Self { class, rules }
    }

    /// First violation in chain order, if any.
    pub fn evaluate(&self, eval: &Evaluation<'_>) -> Option<Violation> {
        self.rules.iter().find_map(|rule| rule.check(eval))
    }

    /// Every violation, in chain order. Diagnostic only.
    pub fn evaluate_all(&self, eval: &Evaluation<'_>) -> Vec<Violation> {
        self.rules.iter().filter_map(|rule| rule.check(eval)).collect()
    }
}

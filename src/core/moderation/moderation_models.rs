// Moderation domain models - data structures for the content gate.
//
// These are pure domain types with no HTTP or storage dependencies.
// The HTTP layer converts a rejected result into a 400 with the reason text.

use serde::{Deserialize, Serialize};

/// Which kind of user text is being checked. Selects the rule chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentClass {
    /// Story title
    Title,
    /// Story segment text
    Body,
    /// Login nickname
    Nickname,
}

impl std::fmt::Display for ContentClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ContentClass::Title => write!(f, "title"),
            ContentClass::Body => write!(f, "body"),
            ContentClass::Nickname => write!(f, "nickname"),
        }
    }
}

/// Language used for the user-facing reason strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ReasonLocale {
    #[default]
    Turkish,
    English,
}

impl std::str::FromStr for ReasonLocale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "tr" | "turkish" => Ok(ReasonLocale::Turkish),
            "en" | "english" => Ok(ReasonLocale::English),
            other => Err(format!("unknown moderation locale: {other}")),
        }
    }
}

/// A single rule violation, carrying whatever the rule measured.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum Violation {
    /// Missing, non-text or empty input
    Empty,
    TooShort { min: usize },
    TooLong { max: usize },
    /// Lexicon hits, already truncated to what gets reported
    InappropriateTerms { terms: Vec<String> },
    Shouting { ratio: f64 },
    ExcessiveExclamation { ratio: f64 },
    ExcessiveQuestion { ratio: f64 },
    RepeatedWord { word: String, count: usize },
    RepeatedCharacters { run: usize },
    NumericOnly,
    SymbolOnly,
    /// Title made only of digits, whitespace and symbols
    NoLetters,
    /// Nickname contains something other than letters, digits or underscore
    InvalidCharacters,
}

impl Violation {
    /// Short machine-readable rule name, used in logs.
    pub fn rule_name(&self) -> &'static str {
        match self {
            Violation::Empty => "empty",
            Violation::TooShort { .. } => "too_short",
            Violation::TooLong { .. } => "too_long",
            Violation::InappropriateTerms { .. } => "inappropriate_terms",
            Violation::Shouting { .. } => "shouting",
            Violation::ExcessiveExclamation { .. } => "excessive_exclamation",
            Violation::ExcessiveQuestion { .. } => "excessive_question",
            Violation::RepeatedWord { .. } => "repeated_word",
            Violation::RepeatedCharacters { .. } => "repeated_characters",
            Violation::NumericOnly => "numeric_only",
            Violation::SymbolOnly => "symbol_only",
            Violation::NoLetters => "no_letters",
            Violation::InvalidCharacters => "invalid_characters",
        }
    }

    /// Render the user-facing message for this violation.
    pub fn describe(&self, class: ContentClass, locale: ReasonLocale) -> String {
        use ContentClass::*;
        use ReasonLocale::*;

        match (self, locale) {
            (Violation::Empty, Turkish) => match class {
                Body => "İçerik boş veya geçersiz".to_string(),
                Title => "Başlık boş veya geçersiz".to_string(),
                Nickname => "Kullanıcı adı boş olamaz".to_string(),
            },
            (Violation::Empty, English) => format!("{} is empty or invalid", subject_en(class)),

            (Violation::TooShort { min }, Turkish) => {
                format!("{} çok kısa (en az {} karakter olmalı)", subject_tr(class), min)
            }
            (Violation::TooShort { min }, English) => {
                format!("{} too short (minimum {} characters)", subject_en(class), min)
            }

            (Violation::TooLong { max }, Turkish) => {
                format!("{} çok uzun (en fazla {} karakter olabilir)", subject_tr(class), max)
            }
            (Violation::TooLong { max }, English) => {
                format!("{} too long (maximum {} characters)", subject_en(class), max)
            }

            (Violation::InappropriateTerms { terms }, Turkish) => match class {
                Body => format!("Uygunsuz kelimeler tespit edildi: {}", terms.join(", ")),
                Title => format!("Başlıkta uygunsuz kelime tespit edildi: {}", terms.join(", ")),
                Nickname => format!(
                    "Kullanıcı adında uygunsuz kelime tespit edildi: {}",
                    terms.join(", ")
                ),
            },
            (Violation::InappropriateTerms { terms }, English) => match class {
                Body => format!("Inappropriate words detected: {}", terms.join(", ")),
                _ => format!(
                    "Inappropriate word in {}: {}",
                    class,
                    terms.join(", ")
                ),
            },

            (Violation::Shouting { .. }, Turkish) => {
                "Çok fazla büyük harf kullanımı (bağırmak gibi)".to_string()
            }
            (Violation::Shouting { .. }, English) => "Excessive uppercase (shouting)".to_string(),

            (Violation::ExcessiveExclamation { .. }, Turkish) => {
                "Çok fazla ünlem işareti kullanımı".to_string()
            }
            (Violation::ExcessiveExclamation { .. }, English) => {
                "Excessive exclamation marks".to_string()
            }

            (Violation::ExcessiveQuestion { .. }, Turkish) => {
                "Çok fazla soru işareti kullanımı".to_string()
            }
            (Violation::ExcessiveQuestion { .. }, English) => {
                "Excessive question marks".to_string()
            }

            (Violation::RepeatedWord { word, .. }, Turkish) => {
                format!("Aynı kelime çok fazla tekrarlanıyor: \"{}\"", word)
            }
            (Violation::RepeatedWord { word, .. }, English) => {
                format!("Word repeated too many times: \"{}\"", word)
            }

            (Violation::RepeatedCharacters { .. }, Turkish) => {
                "Çok fazla tekrarlayan karakter var".to_string()
            }
            (Violation::RepeatedCharacters { .. }, English) => {
                "Too many repeated characters".to_string()
            }

            (Violation::NumericOnly, Turkish) => {
                format!("{} sadece sayılardan oluşamaz", subject_tr(class))
            }
            (Violation::NumericOnly, English) => {
                format!("{} cannot be only numbers", subject_en(class))
            }

            (Violation::SymbolOnly, Turkish) => {
                format!("{} sadece özel karakterlerden oluşamaz", subject_tr(class))
            }
            (Violation::SymbolOnly, English) => {
                format!("{} cannot be only symbols", subject_en(class))
            }

            (Violation::NoLetters, Turkish) => {
                format!("{} sadece sayı veya özel karakterlerden oluşamaz", subject_tr(class))
            }
            (Violation::NoLetters, English) => {
                format!("{} cannot be only numbers or symbols", subject_en(class))
            }

            (Violation::InvalidCharacters, Turkish) => {
                "Kullanıcı adında sadece harf, sayı ve alt çizgi kullanılabilir".to_string()
            }
            (Violation::InvalidCharacters, English) => {
                "Nickname may only contain letters, digits and underscores".to_string()
            }
        }
    }
}

fn subject_tr(class: ContentClass) -> &'static str {
    match class {
        ContentClass::Body => "İçerik",
        ContentClass::Title => "Başlık",
        ContentClass::Nickname => "Kullanıcı adı",
    }
}

fn subject_en(class: ContentClass) -> &'static str {
    match class {
        ContentClass::Body => "Content",
        ContentClass::Title => "Title",
        ContentClass::Nickname => "Nickname",
    }
}

fn acceptable_message(class: ContentClass, locale: ReasonLocale) -> String {
    match locale {
        ReasonLocale::Turkish => format!("{} uygun", subject_tr(class)),
        ReasonLocale::English => format!("{} is acceptable", subject_en(class)),
    }
}

/// Outcome of running text through the gate.
///
/// Exactly one reason is ever reported: the first violated rule's message,
/// or the fixed "acceptable" message for the class.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModerationResult {
    pub accepted: bool,
    pub reason: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub violation: Option<Violation>,
}

impl ModerationResult {
    /// Create an "accepted" result
    pub fn accept(class: ContentClass, locale: ReasonLocale) -> Self {
        Self {
            accepted: true,
            reason: acceptable_message(class, locale),
            violation: None,
        }
    }

    /// Create a rejection carrying the violated rule
    pub fn reject(violation: Violation, class: ContentClass, locale: ReasonLocale) -> Self {
        Self {
            accepted: false,
            reason: violation.describe(class, locale),
            violation: Some(violation),
        }
    }
}

/// Thresholds for every rule chain.
///
/// Defaults match the production limits; a JSON file can override any subset.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModerationConfig {
    pub body_min_chars: usize,
    pub body_max_chars: usize,
    pub title_min_chars: usize,
    pub title_max_chars: usize,
    pub nickname_min_chars: usize,
    pub nickname_max_chars: usize,
    /// How many matched terms a body rejection names
    pub reported_terms: usize,
    pub max_uppercase_ratio: f64,
    pub max_exclamation_ratio: f64,
    pub max_question_ratio: f64,
    /// Tokens at most this long are ignored by the repetition rule
    pub ignored_token_chars: usize,
    /// A token may appear this many times; one more is a violation
    pub max_token_repeats: usize,
    /// Shortest run of one character that counts as a violation
    pub max_char_run: usize,
}

impl Default for ModerationConfig {
    fn default() -> Self {
        Self {
            body_min_chars: 10,
            body_max_chars: 1000,
            title_min_chars: 3,
            title_max_chars: 100,
            nickname_min_chars: 2,
            nickname_max_chars: 20,
            reported_terms: 3,
            max_uppercase_ratio: 0.7,
            max_exclamation_ratio: 0.1,
            max_question_ratio: 0.1,
            ignored_token_chars: 2,
            max_token_repeats: 5,
            max_char_run: 5,
        }
    }
}

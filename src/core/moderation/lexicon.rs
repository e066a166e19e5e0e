// Lexicon - the fixed list of disallowed words and phrases.
//
// Terms are lowercased and deduplicated once, at construction. After that a
// lexicon is read-only and shared between requests behind an Arc.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// General profanity / violence / hate / adult / spam / personal info / link list.
const STANDARD_TERMS: &[&str] = &[
    // Küfür ve argo
    "küfür", "argo", "pislik", "bok", "siktir", "amk", "aq", "orospu", "pezevenk",
    "piç", "göt", "sik", "amına", "siktir git", "siktir ol", "siktir et",
    "amına koyayım", "amına koyim", "amına koyum",
    "götüne", "götünü", "götün", "götü", "götlük", "götlü", "götsüz",
    "sikik", "sikti", "siktin", "siktiğim", "siktiğin", "siktiğiniz", "siktiğimiz",
    "orospu çocuğu", "orospu evladı",
    "pezevenk çocuğu", "pezevenk evladı",
    "piç kurusu", "piç kurusu çocuğu", "piç kurusu evladı",
    "yavşak", "yavşak çocuğu", "yavşak evladı",
    "ibne", "ibne çocuğu", "ibne evladı",
    "gavat", "gavat çocuğu", "gavat evladı",
    "kaltak", "kaltak çocuğu", "kaltak evladı",
    "sürtük", "sürtük çocuğu", "sürtük evladı",
    "fahişe", "fahişe çocuğu", "fahişe evladı",
    "hayat kadını", "hayat kadını çocuğu", "hayat kadını evladı",
    "kancık", "kancık çocuğu", "kancık evladı",
    // Şiddet
    "öldür", "öldürme", "öldürür", "öldürürüm", "öldürürsün", "öldürürüz",
    "katlet", "katletme", "katleder", "katlederim", "katledersin",
    "vur", "vurma", "vurur", "vururum", "vurursun", "vururuz",
    "döv", "dövme", "döver", "döverim", "döversin", "döveriz",
    "patlat", "patlatma", "patlatır", "patlatırım", "patlatırsın",
    "bomba", "bomba patlat", "bomba patlatma", "bomba patlatır",
    "terör", "terörist", "teröristlik", "teröristlik yap",
    // Nefret söylemi
    "nefret", "nefret et", "nefret eder", "nefret ederim", "nefret edersin",
    "düşman", "düşmanlık", "düşmanlık et", "düşmanlık eder",
    "ırkçı", "ırkçılık", "ırkçılık yap", "ırkçılık eder",
    "ayrımcı", "ayrımcılık", "ayrımcılık yap", "ayrımcılık eder",
    // Uygunsuz içerik
    "porno", "pornografik", "pornografik içerik", "pornografik video",
    "seks", "seksüel", "seksüel içerik", "seksüel video",
    "çıplak", "çıplaklık", "çıplaklık içerik", "çıplaklık video",
    "mastürbasyon", "mastürbasyon yap", "mastürbasyon eder",
    "orgazm", "orgazm ol", "orgazm olur", "orgazm olurum",
    // Spam ve reklam
    "reklam", "reklam ver", "reklam verir", "reklam veririm",
    "satış", "satış yap", "satış yapar", "satış yaparım",
    "alışveriş", "alışveriş yap", "alışveriş yapar",
    "indirim", "indirim var", "indirim yap", "indirim yapar",
    "bedava", "bedava ver", "bedava verir", "bedava veririm",
    "ücretsiz", "ücretsiz ver", "ücretsiz verir", "ücretsiz veririm",
    // Kişisel bilgi
    "telefon", "telefon numarası", "telefon numarası ver",
    "adres", "adres ver", "adres verir", "adres veririm",
    "email", "e-mail", "email ver", "e-mail ver", "email verir",
    "tc", "tc kimlik", "tc kimlik no", "tc kimlik numarası",
    "kimlik", "kimlik no", "kimlik numarası", "kimlik ver",
    // Linkler
    "http://", "https://", "www.", ".com", ".net", ".org",
    "link", "link ver", "link verir", "link veririm",
    "site", "site ver", "site verir", "site veririm",
    "url", "url ver", "url verir", "url veririm",
];

/// Child-safety list: mild insults, violence verbs, spam verbs and anything
/// that asks a child for personal details.
const STRICT_TERMS: &[&str] = &[
    "kötü", "aptal", "salak", "gerizekalı", "ahmak",
    "öldür", "katlet", "vur", "saldır", "döv",
    "tehlikeli", "yasak", "gizli",
    "satın al", "indir", "ücretsiz", "kazan",
    "telefon", "adres", "okul", "ev", "anne", "baba",
];

const STRICT_PHRASES: &[&str] = &[
    "kişisel bilgi",
    "iletişim bilgisi",
    "adres bilgisi",
    "telefon numarası",
    "e-posta adresi",
];

/// Which built-in list to start from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LexiconVariant {
    #[default]
    Standard,
    Strict,
}

impl std::str::FromStr for LexiconVariant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "standard" => Ok(LexiconVariant::Standard),
            "strict" => Ok(LexiconVariant::Strict),
            other => Err(format!("unknown lexicon variant: {other}")),
        }
    }
}

/// An ordered, deduplicated, lowercased set of disallowed terms.
#[derive(Debug, Clone, Default)]
pub struct Lexicon {
    terms: Vec<String>,
}

impl Lexicon {
    /// Build a lexicon from arbitrary terms. Empty entries are dropped and
    /// only the first occurrence of a term (after lowercasing) is kept.
    pub fn from_terms<I, T>(terms: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        let mut lexicon = Self::default();
        lexicon.extend(terms);
        lexicon
    }

    pub fn standard() -> Self {
        Self::from_terms(STANDARD_TERMS)
    }

    pub fn strict() -> Self {
        Self::from_terms(STRICT_TERMS.iter().chain(STRICT_PHRASES))
    }

    pub fn for_variant(variant: LexiconVariant) -> Self {
        match variant {
            LexiconVariant::Standard => Self::standard(),
            LexiconVariant::Strict => Self::strict(),
        }
    }

    /// Append terms, keeping the dedup/lowercase invariants.
    /// Only used while building; the gate never mutates a lexicon.
    pub fn extend<I, T>(&mut self, terms: I)
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        let mut seen: HashSet<String> = self.terms.iter().cloned().collect();
        for term in terms {
            let term = term.as_ref().trim().to_lowercase();
            if term.is_empty() || !seen.insert(term.clone()) {
                continue;
            }
            self.terms.push(term);
        }
    }

    /// All terms in lexicon order.
    pub fn lookup(&self) -> &[String] {
        &self.terms
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_is_deduplicated() {
        let lexicon = Lexicon::standard();
        let unique: HashSet<&String> = lexicon.lookup().iter().collect();
        assert_eq!(unique.len(), lexicon.len());
        assert!(lexicon.lookup().iter().any(|t| t == "siktir git"));
    }

    #[test]
    fn test_from_terms_lowercases_and_keeps_first_order() {
        let lexicon = Lexicon::from_terms(["Bomba", "  ", "vur", "BOMBA", "ejder"]);
        assert_eq!(lexicon.lookup(), &["bomba", "vur", "ejder"]);
    }

    #[test]
    fn test_strict_includes_phrases() {
        let lexicon = Lexicon::strict();
        assert!(lexicon.lookup().iter().any(|t| t == "kişisel bilgi"));
        assert!(lexicon.lookup().iter().any(|t| t == "okul"));
    }

    #[test]
    fn test_variant_parsing() {
        assert_eq!("Strict".parse::<LexiconVariant>(), Ok(LexiconVariant::Strict));
        assert!("loose".parse::<LexiconVariant>().is_err());
    }
}

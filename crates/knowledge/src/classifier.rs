//! Text normalization and intent classification.
//!
//! `classify` is a pure function: same text, same intent, regardless of
//! keyword iteration order. Classification precedence is a fixed policy:
//! **domain anchors win over greeting tokens**, so "hola, ¿cuánto cuesta la
//! ruta?" routes to the fact-grounded template rather than the greeting one.
//! A bare "hola" still classifies as a greeting because it contains no
//! domain anchor.

use serde::{Deserialize, Serialize};

/// The intent category of an incoming question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Intent {
    /// A salutation with no domain content
    Greeting,
    /// A question anchored in the tourism domain
    Domain,
    /// Anything else
    General,
}

impl Intent {
    pub fn as_str(self) -> &'static str {
        match self {
            Intent::Greeting => "greeting",
            Intent::Domain => "domain",
            Intent::General => "general",
        }
    }
}

/// Greeting tokens, matched against whole words (and phrase prefixes for the
/// multi-word ones). Word-level matching keeps short tokens like "hi" from
/// firing inside unrelated words.
const GREETING_TOKENS: &[&str] = &[
    "hola",
    "buenos dias",
    "buenas tardes",
    "buenas noches",
    "que tal",
    "saludos",
    "hey",
    "hi",
    "hello",
    "good morning",
];

/// Domain anchors, matched by substring so inflected forms ("rutas",
/// "precios") still anchor.
const DOMAIN_ANCHORS: &[&str] = &[
    "explococora",
    "cocora",
    "condorito",
    "valle",
    "ruta",
    "sendero",
    "precio",
    "palma de cera",
    "quindio",
    "salento",
    "cabalgata",
    "tour",
];

/// Normalize text for matching: trim, lowercase, fold Spanish diacritics.
pub fn normalize(text: &str) -> String {
    text.trim().to_lowercase().chars().map(fold_char).collect()
}

fn fold_char(c: char) -> char {
    match c {
        'á' | 'à' | 'ä' | 'â' => 'a',
        'é' | 'è' | 'ë' | 'ê' => 'e',
        'í' | 'ì' | 'ï' | 'î' => 'i',
        'ó' | 'ò' | 'ö' | 'ô' => 'o',
        'ú' | 'ù' | 'ü' | 'û' => 'u',
        'ñ' => 'n',
        other => other,
    }
}

/// Classify a raw question into an intent category.
pub fn classify(question: &str) -> Intent {
    classify_normalized(&normalize(question))
}

/// Classify an already-normalized question.
pub fn classify_normalized(question: &str) -> Intent {
    if DOMAIN_ANCHORS.iter().any(|a| question.contains(a)) {
        Intent::Domain
    } else if GREETING_TOKENS.iter().any(|t| contains_token(question, t)) {
        Intent::Greeting
    } else {
        Intent::General
    }
}

/// Whether `text` contains `token` as a whole word (single-word tokens) or
/// as a substring (multi-word tokens).
fn contains_token(text: &str, token: &str) -> bool {
    if token.contains(' ') {
        return text.contains(token);
    }
    text.split(|c: char| !c.is_alphanumeric())
        .any(|word| word == token)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_folds_diacritics_and_case() {
        assert_eq!(normalize("  ¿Cuánto CUESTA la ruta? "), "¿cuanto cuesta la ruta?");
        assert_eq!(normalize("mañana"), "manana");
        assert_eq!(normalize("pingüino"), "pinguino");
    }

    #[test]
    fn bare_greeting_is_greeting() {
        assert_eq!(classify("hola"), Intent::Greeting);
        assert_eq!(classify("Buenos días, ¿cómo estás?"), Intent::Greeting);
        assert_eq!(classify("hello!"), Intent::Greeting);
    }

    #[test]
    fn domain_anchor_wins_over_greeting() {
        assert_eq!(classify("Hola, ¿cuánto cuesta la ruta corta?"), Intent::Domain);
        assert_eq!(classify("buenos días, quiero un tour"), Intent::Domain);
    }

    #[test]
    fn domain_questions() {
        assert_eq!(classify("¿Qué rutas ofrece ExploCocora?"), Intent::Domain);
        assert_eq!(classify("precios de la cabalgata"), Intent::Domain);
        assert_eq!(classify("¿dónde queda el Valle del Cocora?"), Intent::Domain);
    }

    #[test]
    fn unrelated_question_is_general() {
        assert_eq!(classify("¿Qué es la fotosíntesis?"), Intent::General);
        assert_eq!(classify(""), Intent::General);
    }

    #[test]
    fn short_greeting_tokens_do_not_fire_inside_words() {
        // "chico" contains "hi"; "heyday" contains "hey"
        assert_eq!(classify("ese chico canta"), Intent::General);
        assert_eq!(classify("the heyday of something"), Intent::General);
    }

    #[test]
    fn classification_is_deterministic() {
        let question = "hola, ¿qué tal?";
        let first = classify(question);
        for _ in 0..10 {
            assert_eq!(classify(question), first);
        }
    }
}

//! Knowledge-base value objects.
//!
//! Entries are immutable after load. The document format tolerates two
//! answer shapes (`"answer": "..."` and `"answer": {"text": "..."}`); both
//! are normalised into a single `String` at deserialization time so nothing
//! downstream has to branch on the answer's shape.

use serde::{Deserialize, Deserializer, Serialize};

/// One FAQ or metadata entry: one or more equivalent question phrasings,
/// one answer, optional alternate phrasings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FaqEntry {
    /// Equivalent question phrasings, in document order
    #[serde(default)]
    pub questions: Vec<String>,

    /// The answer text
    #[serde(deserialize_with = "deserialize_answer")]
    pub answer: String,

    /// Alternate phrasings of the same question
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub variations: Vec<String>,
}

impl FaqEntry {
    /// An entry with no question phrasings (e.g., a chunk of extracted
    /// document text). It can rank by category keywords but never
    /// direct-matches.
    pub fn text_only(answer: impl Into<String>) -> Self {
        Self {
            questions: Vec::new(),
            answer: answer.into(),
            variations: Vec::new(),
        }
    }

    /// All phrasings of this entry: questions first, then variations.
    pub fn phrasings(&self) -> impl Iterator<Item = &str> {
        self.questions
            .iter()
            .chain(self.variations.iter())
            .map(String::as_str)
    }
}

/// Accepts either a bare string or a structured object exposing a text field.
#[derive(Deserialize)]
#[serde(untagged)]
enum AnswerField {
    Text(String),
    Structured { text: String },
}

fn deserialize_answer<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match AnswerField::deserialize(deserializer)? {
        AnswerField::Text(text) => text,
        AnswerField::Structured { text } => text,
    })
}

/// The on-disk shape of the structured knowledge document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct KnowledgeDocument {
    /// Tourism FAQ entries
    #[serde(default)]
    pub faqs: Vec<FaqEntry>,

    /// Non-tourism facts (team, authorship) in the same shape
    #[serde(default)]
    pub metadata: Vec<FaqEntry>,
}

/// The closed set of topical categories used to group and rank entries.
///
/// Keyword lists are static and written in normalized form (lowercase,
/// diacritics folded) so they compare directly against normalized text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Category {
    Routes,
    Company,
    Activities,
    Pricing,
    Schedule,
    Safety,
    Accessibility,
    Services,
}

impl Category {
    /// Every category, in the fixed order used for grouped output.
    pub const ALL: [Category; 8] = [
        Category::Routes,
        Category::Company,
        Category::Activities,
        Category::Pricing,
        Category::Schedule,
        Category::Safety,
        Category::Accessibility,
        Category::Services,
    ];

    /// The category's keyword set.
    pub fn keywords(self) -> &'static [&'static str] {
        match self {
            Category::Routes => &[
                "ruta", "sendero", "caminata", "recorrido", "mirador", "kilometro", "trayecto",
            ],
            Category::Company => &[
                "explococora", "empresa", "condorito", "contacto", "quienes somos", "mision",
            ],
            Category::Activities => &[
                "actividad", "cabalgata", "caballo", "avistamiento", "aves", "fotografia",
                "camping", "picnic",
            ],
            Category::Pricing => &[
                "precio", "costo", "cuesta", "tarifa", "pago", "descuento", "pesos", "cop",
            ],
            Category::Schedule => &[
                "horario", "hora", "abre", "cierra", "reserva", "cupo", "temporada", "fecha",
            ],
            Category::Safety => &[
                "seguridad", "seguro", "riesgo", "emergencia", "clima", "recomendacion",
                "botiquin",
            ],
            Category::Accessibility => &[
                "accesibilidad", "accesible", "discapacidad", "movilidad", "silla de ruedas",
                "adulto mayor",
            ],
            Category::Services => &[
                "servicio", "guia", "transporte", "alimentacion", "almuerzo", "hospedaje", "bano",
            ],
        }
    }

    /// The category's display name (matches the document convention).
    pub fn name(self) -> &'static str {
        match self {
            Category::Routes => "ROUTES",
            Category::Company => "COMPANY",
            Category::Activities => "ACTIVITIES",
            Category::Pricing => "PRICING",
            Category::Schedule => "SCHEDULE",
            Category::Safety => "SAFETY",
            Category::Accessibility => "ACCESSIBILITY",
            Category::Services => "SERVICES",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

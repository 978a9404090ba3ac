//! Prompt composition: deterministic template assembly per intent.
//!
//! The composer combines the fixed Condorito persona, the matched knowledge
//! snippets, and the raw question into a single text block for the
//! completion model. Pure string interpolation; same inputs, same prompt.

use crate::classifier::Intent;
use crate::matcher::MatchResult;
use cocorabot_core::provider::GenerationSettings;

/// The fixed persona preamble.
pub const PERSONA: &str = "Eres Condorito, el asistente virtual de ExploCocora, una empresa de \
turismo ecológico en el Valle del Cocora, Quindío, Colombia. Hablas en español, con calidez, \
cercanía y orgullo por la región.";

/// At most this many top-ranked entries per category reach the prompt.
const MAX_ENTRIES_PER_CATEGORY: usize = 3;

/// A composed model prompt.
#[derive(Debug, Clone)]
pub struct ComposedPrompt {
    /// The full text block to send as the final user turn
    pub text: String,

    /// Whether any knowledge-base content was included (drives the
    /// response's `source` field)
    pub used_knowledge: bool,
}

/// Decoding parameters for the classified intent: factual settings for
/// domain replies, conversational settings otherwise.
pub fn generation_settings(intent: Intent) -> GenerationSettings {
    match intent {
        Intent::Domain => GenerationSettings::factual(),
        Intent::Greeting | Intent::General => GenerationSettings::default(),
    }
}

/// Assemble the model prompt for a classified question.
pub fn compose(intent: Intent, matches: &MatchResult<'_>, question: &str) -> ComposedPrompt {
    match intent {
        Intent::Greeting => compose_greeting(matches, question),
        // A domain question with nothing matched falls back to the
        // general-knowledge template.
        Intent::Domain if matches.is_empty() => compose_general(question),
        Intent::Domain => compose_domain(matches, question),
        Intent::General => compose_general(question),
    }
}

fn compose_greeting(matches: &MatchResult<'_>, question: &str) -> ComposedPrompt {
    let mut sections = vec![PERSONA.to_string()];
    let mut used_knowledge = false;

    if let Some(entry) = matches.direct.first() {
        sections.push(format!(
            "Saludo sugerido (úsalo como base si encaja):\n{}",
            entry.answer
        ));
        used_knowledge = true;
    }

    sections.push(
        "El usuario te está saludando. Responde de forma cálida, preséntate como Condorito, \
         el asistente de ExploCocora, y ofrece ayuda con rutas, precios, horarios y \
         actividades del Valle del Cocora."
            .to_string(),
    );
    sections.push(format!("Mensaje del usuario: {question}"));

    ComposedPrompt {
        text: sections.join("\n\n"),
        used_knowledge,
    }
}

fn compose_domain(matches: &MatchResult<'_>, question: &str) -> ComposedPrompt {
    let mut sections = vec![PERSONA.to_string()];
    let mut used_knowledge = false;

    if matches.has_direct_matches() {
        let facts: Vec<String> = matches
            .direct
            .iter()
            .map(|e| format!("- {}", e.answer))
            .collect();
        sections.push(format!(
            "Respuestas directas de la base de conocimiento:\n{}",
            facts.join("\n")
        ));
        used_knowledge = true;
    }

    for (category, ranked) in &matches.by_category {
        let facts: Vec<String> = ranked
            .iter()
            .take(MAX_ENTRIES_PER_CATEGORY)
            .map(|r| format!("- {}", r.entry.answer))
            .collect();
        sections.push(format!(
            "Información relacionada ({category}):\n{}",
            facts.join("\n")
        ));
        used_knowledge = true;
    }

    sections.push(
        "Instrucciones:\n\
         1. Prefiere siempre los datos suministrados arriba; no los contradigas.\n\
         2. Mantente en el personaje de Condorito y responde solo sobre ExploCocora \
         y el Valle del Cocora.\n\
         3. Usa un tono cálido y cercano, en español.\n\
         4. Solo si arriba no hay datos sobre lo preguntado, responde desde tu \
         conocimiento general y acláralo."
            .to_string(),
    );
    sections.push(format!("Pregunta: {question}"));

    ComposedPrompt {
        text: sections.join("\n\n"),
        used_knowledge,
    }
}

fn compose_general(question: &str) -> ComposedPrompt {
    let sections = [
        PERSONA.to_string(),
        "Responde desde tu conocimiento general, manteniéndote en el personaje y el tono \
         de Condorito. Evita opiniones y datos sensibles sobre personas identificables; \
         si la pregunta lo pide, declina con amabilidad."
            .to_string(),
        format!("Pregunta: {question}"),
    ];

    ComposedPrompt {
        text: sections.join("\n\n"),
        used_knowledge: false,
    }
}

//! Knowledge store loading and lifecycle.
//!
//! The store is loaded once at process start — either a structured JSON
//! document or a directory of text documents — and is read-only afterwards.
//! There is no reload-on-change.
//!
//! [`KnowledgeHandle`] is the injected, explicitly constructed view of the
//! store with a defined not-yet-ready state: requests that arrive before the
//! background load completes see an absent store and matching degrades to
//! empty results instead of blocking. A failed load degrades the same way;
//! it is logged and never aborts the process.

use crate::model::{FaqEntry, KnowledgeDocument};
use cocorabot_core::error::KnowledgeError;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};
use tracing::{info, warn};

/// The in-memory knowledge base. Immutable after construction.
#[derive(Debug, Clone, Default)]
pub struct KnowledgeBase {
    /// Tourism FAQ entries (or extracted document chunks)
    pub faqs: Vec<FaqEntry>,

    /// Non-tourism facts in the same shape
    pub metadata: Vec<FaqEntry>,
}

impl KnowledgeBase {
    /// An empty base: every lookup returns no matches.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_document(doc: KnowledgeDocument) -> Self {
        Self {
            faqs: doc.faqs,
            metadata: doc.metadata,
        }
    }

    /// Load from `path`: a `.json` structured document, or a directory of
    /// text documents handled by the [`TextExtractor`].
    pub fn load(path: &Path) -> Result<Self, KnowledgeError> {
        if path.is_dir() {
            return Self::load_dir(path, &TextExtractor);
        }

        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::load_json(path),
            other => Err(KnowledgeError::UnsupportedFormat(format!(
                "{} (extension {:?})",
                path.display(),
                other.unwrap_or("none")
            ))),
        }
    }

    fn load_json(path: &Path) -> Result<Self, KnowledgeError> {
        let content = std::fs::read_to_string(path).map_err(|e| KnowledgeError::Read {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        let doc: KnowledgeDocument =
            serde_json::from_str(&content).map_err(|e| KnowledgeError::Parse {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?;

        Ok(Self::from_document(doc))
    }

    /// Load every handled document in a directory, in file-name order, and
    /// chunk the extracted text into question-less entries.
    pub fn load_dir(
        dir: &Path,
        extractor: &dyn DocumentExtractor,
    ) -> Result<Self, KnowledgeError> {
        let mut paths: Vec<PathBuf> = std::fs::read_dir(dir)
            .map_err(|e| KnowledgeError::Read {
                path: dir.display().to_string(),
                reason: e.to_string(),
            })?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| p.is_file() && extractor.handles(p))
            .collect();
        // File-name order keeps entry encounter order (and therefore tie
        // breaking) deterministic across loads.
        paths.sort();

        let mut faqs = Vec::new();
        for path in &paths {
            match extractor.extract(path) {
                Ok(text) => {
                    faqs.extend(chunk_text(&text).map(FaqEntry::text_only));
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Skipping unreadable document");
                }
            }
        }

        Ok(Self {
            faqs,
            metadata: Vec::new(),
        })
    }

    /// All entries in document encounter order: FAQs first, then metadata.
    pub fn entries(&self) -> impl Iterator<Item = &FaqEntry> {
        self.faqs.iter().chain(self.metadata.iter())
    }

    pub fn len(&self) -> usize {
        self.faqs.len() + self.metadata.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Split extracted document text into trimmed paragraph chunks.
fn chunk_text(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split("\n\n")
        .map(str::trim)
        .filter(|chunk| !chunk.is_empty())
        .map(String::from)
}

/// The seam for pulling text out of source documents.
///
/// The shipped extractor reads plain text; richer formats (PDF) are external
/// collaborators that plug in behind this trait.
pub trait DocumentExtractor: Send + Sync {
    /// Whether this extractor handles the given file.
    fn handles(&self, path: &Path) -> bool;

    /// Extract the document's text content.
    fn extract(&self, path: &Path) -> Result<String, KnowledgeError>;
}

/// Plain-text extractor for `.txt` and `.md` documents.
pub struct TextExtractor;

impl DocumentExtractor for TextExtractor {
    fn handles(&self, path: &Path) -> bool {
        matches!(
            path.extension().and_then(|e| e.to_str()),
            Some("txt") | Some("md")
        )
    }

    fn extract(&self, path: &Path) -> Result<String, KnowledgeError> {
        std::fs::read_to_string(path).map_err(|e| KnowledgeError::Read {
            path: path.display().to_string(),
            reason: e.to_string(),
        })
    }
}

/// A shared, read-only view of the knowledge base with an explicit
/// not-yet-ready state.
///
/// Cloning is cheap; all clones observe the same load.
#[derive(Clone, Default)]
pub struct KnowledgeHandle {
    inner: Arc<OnceLock<Arc<KnowledgeBase>>>,
}

impl KnowledgeHandle {
    /// A handle that will never become ready on its own. Matching through it
    /// degrades to empty results.
    pub fn unready() -> Self {
        Self::default()
    }

    /// A handle that is ready immediately (tests, or no configured path).
    pub fn ready_with(base: KnowledgeBase) -> Self {
        let handle = Self::default();
        let _ = handle.inner.set(Arc::new(base));
        handle
    }

    /// Start loading `path` on a background task and return immediately.
    ///
    /// With no path configured the handle becomes ready with an empty base.
    /// A failed load is logged and also resolves to an empty base.
    pub fn spawn_load(path: Option<PathBuf>) -> Self {
        let Some(path) = path else {
            info!("No knowledge path configured; serving without a knowledge base");
            return Self::ready_with(KnowledgeBase::empty());
        };

        let handle = Self::default();
        let inner = handle.inner.clone();
        tokio::spawn(async move {
            let path_display = path.display().to_string();
            let loaded = tokio::task::spawn_blocking(move || KnowledgeBase::load(&path)).await;

            let base = match loaded {
                Ok(Ok(base)) => {
                    info!(path = %path_display, entries = base.len(), "Knowledge store loaded");
                    base
                }
                Ok(Err(e)) => {
                    warn!(path = %path_display, error = %e, "Knowledge load failed; matching degrades to empty results");
                    KnowledgeBase::empty()
                }
                Err(e) => {
                    warn!(path = %path_display, error = %e, "Knowledge load task failed; matching degrades to empty results");
                    KnowledgeBase::empty()
                }
            };

            let _ = inner.set(Arc::new(base));
        });
        handle
    }

    /// The loaded base, or `None` while the load is still in flight.
    pub fn get(&self) -> Option<Arc<KnowledgeBase>> {
        self.inner.get().cloned()
    }

    /// Whether the load has completed (successfully or degraded).
    pub fn ready(&self) -> bool {
        self.inner.get().is_some()
    }

    /// Entry count of the loaded base; 0 while unready.
    pub fn entry_count(&self) -> usize {
        self.inner.get().map(|b| b.len()).unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE_DOC: &str = r#"{
        "faqs": [
            {
                "questions": ["¿Cuánto cuesta la ruta corta?"],
                "answer": "La ruta corta cuesta 30.000 COP por persona.",
                "variations": ["precio ruta corta"]
            },
            {
                "questions": ["¿Qué rutas ofrecen?"],
                "answer": {"text": "Ofrecemos la ruta corta y la ruta larga por el valle."}
            }
        ],
        "metadata": [
            {
                "questions": ["¿Quién desarrolló este chatbot?"],
                "answer": "El equipo de desarrollo de ExploCocora."
            }
        ]
    }"#;

    fn write_sample() -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        file.write_all(SAMPLE_DOC.as_bytes()).unwrap();
        file
    }

    #[test]
    fn loads_json_document() {
        let file = write_sample();
        let base = KnowledgeBase::load(file.path()).unwrap();
        assert_eq!(base.faqs.len(), 2);
        assert_eq!(base.metadata.len(), 1);
        assert_eq!(base.len(), 3);
        // structured answer was flattened at load
        assert!(base.faqs[1].answer.contains("ruta larga"));
    }

    #[test]
    fn load_is_idempotent() {
        let file = write_sample();
        let first = KnowledgeBase::load(file.path()).unwrap();
        let second = KnowledgeBase::load(file.path()).unwrap();
        assert_eq!(first.len(), second.len());
        assert_eq!(first.faqs, second.faqs);
        assert_eq!(first.metadata, second.metadata);
    }

    #[test]
    fn entries_order_is_faqs_then_metadata() {
        let file = write_sample();
        let base = KnowledgeBase::load(file.path()).unwrap();
        let last = base.entries().last().unwrap();
        assert!(last.answer.contains("equipo de desarrollo"));
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        file.write_all(b"{ not json").unwrap();
        match KnowledgeBase::load(file.path()) {
            Err(KnowledgeError::Parse { .. }) => {}
            other => panic!("Expected Parse error, got: {other:?}"),
        }
    }

    #[test]
    fn unsupported_extension_is_rejected() {
        let file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        match KnowledgeBase::load(file.path()) {
            Err(KnowledgeError::UnsupportedFormat(_)) => {}
            other => panic!("Expected UnsupportedFormat, got: {other:?}"),
        }
    }

    #[test]
    fn directory_load_chunks_text_documents() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("a.txt"),
            "La ruta corta dura tres horas.\n\nEl precio incluye guía.\n\n",
        )
        .unwrap();
        std::fs::write(dir.path().join("b.md"), "Horario: 7am a 5pm.").unwrap();
        std::fs::write(dir.path().join("ignored.pdf"), "binary").unwrap();

        let base = KnowledgeBase::load(dir.path()).unwrap();
        assert_eq!(base.len(), 3);
        assert!(base.entries().all(|e| e.questions.is_empty()));
        // a.txt chunks come before b.md (file-name order)
        assert!(base.faqs[0].answer.contains("ruta corta"));
        assert!(base.faqs[2].answer.contains("Horario"));
    }

    #[tokio::test]
    async fn unready_handle_yields_none() {
        let handle = KnowledgeHandle::unready();
        assert!(!handle.ready());
        assert!(handle.get().is_none());
        assert_eq!(handle.entry_count(), 0);
    }

    #[tokio::test]
    async fn spawn_load_without_path_is_ready_and_empty() {
        let handle = KnowledgeHandle::spawn_load(None);
        assert!(handle.ready());
        assert!(handle.get().unwrap().is_empty());
    }

    #[tokio::test]
    async fn spawn_load_resolves_with_document() {
        let file = write_sample();
        let handle = KnowledgeHandle::spawn_load(Some(file.path().to_path_buf()));

        // Poll until the background task resolves.
        for _ in 0..100 {
            if handle.ready() {
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        }

        assert!(handle.ready());
        assert_eq!(handle.entry_count(), 3);
    }

    #[tokio::test]
    async fn failed_load_degrades_to_empty() {
        let handle = KnowledgeHandle::spawn_load(Some(PathBuf::from("/nonexistent/faq.json")));

        for _ in 0..100 {
            if handle.ready() {
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        }

        assert!(handle.ready());
        assert!(handle.get().unwrap().is_empty());
    }
}

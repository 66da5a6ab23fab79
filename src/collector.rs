//! Trend Collector
//!
//! The application controller: owns the configured language list, fires one
//! independent fetch per language, and folds the results into a session.
//!
//! The per-language fetches run as detached tokio tasks with no coordination
//! between them; each reports back over an mpsc channel and the collector
//! loop serializes all session updates. A session is terminal: it ends
//! `Ready` (every language stored) or `Error` (any fetch failed), and the
//! only way forward from either is a fresh session via [`Collector::refresh`].

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::{mpsc, RwLock};

use crate::github::{extract_counts, GraphqlTransport};
use crate::query::QueryDocument;
use crate::window::MonthWindow;

/// Twelve months of repository-creation counts for one language.
///
/// `month_labels` and `counts` are parallel, oldest-first, and always
/// length 12 once constructed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LanguageResult {
    pub language: String,
    pub month_labels: Vec<String>,
    pub counts: Vec<u64>,
}

/// Lifecycle of a collection session. `Ready` and `Error` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    Loading,
    Ready,
    Error,
}

/// One collection session: a month window plus the per-language results
/// accumulated against it.
#[derive(Debug, Clone)]
pub struct Session {
    /// Monotonic session counter; results from a superseded session are
    /// discarded on arrival.
    pub generation: u64,
    /// Configured languages, in display order.
    pub languages: Vec<String>,
    pub window: MonthWindow,
    pub status: SessionStatus,
    pub results: HashMap<String, LanguageResult>,
    /// First failure message, if any.
    pub error: Option<String>,
    pub started_at: DateTime<Utc>,
}

impl Session {
    /// Fresh session in the `Loading` state.
    pub fn loading(generation: u64, languages: Vec<String>, window: MonthWindow) -> Self {
        Self {
            generation,
            languages,
            window,
            status: SessionStatus::Loading,
            results: HashMap::new(),
            error: None,
            started_at: Utc::now(),
        }
    }

    /// Store one language's result. Flips `Loading` to `Ready` once every
    /// configured language has a result; never resurrects an errored session.
    pub fn store_result(&mut self, result: LanguageResult) {
        self.results.insert(result.language.clone(), result);

        let all_stored = self
            .languages
            .iter()
            .all(|language| self.results.contains_key(language));

        if self.status == SessionStatus::Loading && all_stored {
            self.status = SessionStatus::Ready;
        }
    }

    /// Record a failure. The session is errored from here on, whatever the
    /// other languages do; the first message is kept.
    pub fn mark_error(&mut self, message: String) {
        if self.error.is_none() {
            self.error = Some(message);
        }
        self.status = SessionStatus::Error;
    }

    pub fn is_ready(&self) -> bool {
        self.status == SessionStatus::Ready
    }
}

/// Fires the per-language fetches and owns the shared session state.
pub struct Collector {
    languages: Vec<String>,
    transport: Arc<dyn GraphqlTransport>,
    session: Arc<RwLock<Session>>,
}

impl Collector {
    /// Create a collector for the given languages. The language list is an
    /// explicit configuration value; the default set lives in
    /// [`crate::config::TrendsConfig`].
    pub fn new(languages: Vec<String>, transport: Arc<dyn GraphqlTransport>) -> Self {
        let session = Session::loading(0, languages.clone(), MonthWindow::current());
        Self {
            languages,
            transport,
            session: Arc::new(RwLock::new(session)),
        }
    }

    /// Languages this collector fetches, in display order.
    pub fn languages(&self) -> &[String] {
        &self.languages
    }

    /// Handle to the shared session state.
    pub fn session(&self) -> Arc<RwLock<Session>> {
        Arc::clone(&self.session)
    }

    /// Run the current session to completion: fetch every language, fold
    /// results in arrival order, settle on `Ready` or `Error`.
    pub async fn run(&self) {
        let (generation, window) = {
            let session = self.session.read().await;
            (session.generation, session.window.clone())
        };

        tracing::info!(
            generation,
            languages = ?self.languages,
            "starting collection over {} .. {}",
            window.query_months()[crate::window::WINDOW_MONTHS - 1],
            window.query_months()[0],
        );

        let (tx, mut rx) = mpsc::channel(self.languages.len().max(1));

        for language in &self.languages {
            let document = QueryDocument::build(language, window.query_months());
            let transport = Arc::clone(&self.transport);
            let tx = tx.clone();
            let language = language.clone();

            tokio::spawn(async move {
                let outcome = match transport.execute(&document).await {
                    Ok(data) => extract_counts(&data),
                    Err(e) => Err(e),
                };
                // Receiver gone means the collector stopped caring.
                let _ = tx.send((language, outcome)).await;
            });
        }
        drop(tx);

        while let Some((language, outcome)) = rx.recv().await {
            let mut session = self.session.write().await;
            if session.generation != generation {
                tracing::debug!(language = %language, "dropping result for superseded session");
                continue;
            }

            match outcome {
                Ok(counts) => {
                    session.store_result(language_result(&language, &window, counts));
                    tracing::info!(
                        language = %language,
                        status = ?session.status,
                        "stored monthly counts"
                    );
                }
                Err(e) => {
                    tracing::error!(language = %language, error = %e, "fetch failed");
                    session.mark_error(format!("{language}: {e}"));
                }
            }
        }
    }

    /// Start a fresh session (new month window, new fetches) and run it.
    /// The previous session's stragglers are discarded by generation check.
    pub async fn refresh(&self) {
        {
            let mut session = self.session.write().await;
            let next = session.generation + 1;
            *session = Session::loading(next, self.languages.clone(), MonthWindow::current());
        }
        self.run().await;
    }
}

/// Pair fetched counts with the window's display labels.
///
/// Counts arrive in alias order, newest month first; the labels read oldest
/// first, so the counts are reversed to line up index-for-index.
fn language_result(language: &str, window: &MonthWindow, mut counts: Vec<u64>) -> LanguageResult {
    counts.reverse();
    LanguageResult {
        language: language.to_string(),
        month_labels: window.display_months().to_vec(),
        counts,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::github::FetchError;
    use crate::query::ALIASES;
    use async_trait::async_trait;
    use chrono::TimeZone;
    use serde_json::{json, Value};

    struct MockTransport {
        responses: HashMap<String, Result<Value, FetchError>>,
    }

    impl MockTransport {
        fn new() -> Self {
            Self {
                responses: HashMap::new(),
            }
        }

        fn respond(mut self, language: &str, outcome: Result<Value, FetchError>) -> Self {
            self.responses.insert(language.to_string(), outcome);
            self
        }
    }

    #[async_trait]
    impl GraphqlTransport for MockTransport {
        async fn execute(&self, document: &QueryDocument) -> Result<Value, FetchError> {
            self.responses
                .get(document.language())
                .cloned()
                .unwrap_or_else(|| Err(FetchError::Transport("no mock response".into())))
        }
    }

    fn aliased_data(counts: [u64; 12]) -> Value {
        let mut data = serde_json::Map::new();
        for (alias, count) in ALIASES.iter().zip(counts) {
            data.insert(alias.to_string(), json!({ "repositoryCount": count }));
        }
        Value::Object(data)
    }

    fn languages() -> Vec<String> {
        ["python", "javascript", "java", "cpp"]
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    fn test_window() -> MonthWindow {
        let reference = Utc.with_ymd_and_hms(2023, 7, 1, 0, 0, 0).unwrap();
        MonthWindow::from_reference(reference)
    }

    #[test]
    fn counts_are_reversed_to_chronological_order() {
        let window = test_window();
        let result = language_result(
            "python",
            &window,
            vec![12, 11, 10, 9, 8, 7, 6, 5, 4, 3, 2, 1],
        );

        assert_eq!(result.counts, vec![1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12]);
        assert_eq!(result.month_labels, window.display_months());
        assert_eq!(result.counts.len(), result.month_labels.len());
    }

    #[test]
    fn session_becomes_ready_only_after_all_languages() {
        let mut session = Session::loading(0, languages(), test_window());
        let window = test_window();

        for language in ["python", "javascript", "java"] {
            session.store_result(language_result(language, &window, vec![0; 12]));
            assert_eq!(session.status, SessionStatus::Loading);
        }

        session.store_result(language_result("cpp", &window, vec![0; 12]));
        assert_eq!(session.status, SessionStatus::Ready);
    }

    #[test]
    fn error_is_terminal_even_when_others_succeed() {
        let mut session = Session::loading(0, languages(), test_window());
        let window = test_window();

        session.mark_error("java: transport error: connection reset".into());
        assert_eq!(session.status, SessionStatus::Error);

        for language in ["python", "javascript", "cpp"] {
            session.store_result(language_result(language, &window, vec![0; 12]));
        }

        // Successful languages are stored individually, but the session
        // never reports ready.
        assert_eq!(session.results.len(), 3);
        assert_eq!(session.status, SessionStatus::Error);
        assert!(session.error.is_some());
    }

    #[tokio::test]
    async fn run_collects_all_languages() {
        let mut transport = MockTransport::new();
        for language in languages() {
            transport = transport.respond(&language, Ok(aliased_data([3; 12])));
        }

        let collector = Collector::new(languages(), Arc::new(transport));
        collector.run().await;

        let session = collector.session();
        let session = session.read().await;
        assert_eq!(session.status, SessionStatus::Ready);
        assert_eq!(session.results.len(), 4);
        for language in languages() {
            assert_eq!(session.results[&language].counts, vec![3; 12]);
        }
    }

    #[tokio::test]
    async fn run_with_one_malformed_response_errors_the_session() {
        let mut bad = aliased_data([1; 12]);
        bad.as_object_mut().unwrap().remove("five");

        let transport = MockTransport::new()
            .respond("python", Ok(aliased_data([1; 12])))
            .respond("javascript", Ok(aliased_data([2; 12])))
            .respond("java", Ok(bad))
            .respond("cpp", Ok(aliased_data([4; 12])));

        let collector = Collector::new(languages(), Arc::new(transport));
        collector.run().await;

        let session = collector.session();
        let session = session.read().await;
        assert_eq!(session.status, SessionStatus::Error);
        assert_eq!(session.results.len(), 3);
        assert!(!session.results.contains_key("java"));
        assert!(session.error.as_deref().unwrap().contains("java"));
    }

    #[tokio::test]
    async fn refresh_starts_a_new_generation() {
        let mut transport = MockTransport::new();
        for language in languages() {
            transport = transport.respond(&language, Ok(aliased_data([7; 12])));
        }

        let collector = Collector::new(languages(), Arc::new(transport));
        collector.run().await;
        collector.refresh().await;

        let session = collector.session();
        let session = session.read().await;
        assert_eq!(session.generation, 1);
        assert_eq!(session.status, SessionStatus::Ready);
        assert_eq!(session.results.len(), 4);
    }
}

//! Hand-written test doubles shared by the unit tests in this crate.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use mendr_types::error::RepositoryError;
use mendr_types::feedback::FeedbackEntry;
use mendr_types::healing::InteractionLogEntry;
use mendr_types::llm::{
    CompletionRequest, CompletionResponse, LlmError, ProviderCapabilities, StopReason, Usage,
};

use crate::llm::provider::LlmProvider;
use crate::memory::embedder::Embedder;
use crate::repository::{FeedbackRepository, InteractionLogRepository};

/// One scripted provider reply.
#[derive(Debug, Clone)]
pub enum Reply {
    Text(&'static str),
    Fail(&'static str),
    /// Sleep before answering; used for deadline tests.
    Slow(Duration, &'static str),
}

/// Prompts a mock provider has received, shared with the test.
#[derive(Debug, Clone, Default)]
pub struct CallLog(Arc<Mutex<Vec<String>>>);

impl CallLog {
    pub fn count(&self) -> usize {
        self.0.lock().unwrap().len()
    }

    pub fn prompts(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }
}

/// Provider that replays a fixed script and records every prompt.
///
/// Once the script runs out every further call fails.
pub struct MockProvider {
    name: String,
    capabilities: ProviderCapabilities,
    script: Mutex<VecDeque<Reply>>,
    calls: CallLog,
}

impl MockProvider {
    pub fn scripted(name: &str, replies: Vec<Reply>) -> (Self, CallLog) {
        let calls = CallLog::default();
        let provider = Self {
            name: name.to_string(),
            capabilities: ProviderCapabilities {
                max_context_tokens: 8192,
                max_output_tokens: 1024,
            },
            script: Mutex::new(replies.into()),
            calls: calls.clone(),
        };
        (provider, calls)
    }
}

fn text_response(content: &str) -> CompletionResponse {
    CompletionResponse {
        id: "mock".to_string(),
        content: content.to_string(),
        model: "mock-model".to_string(),
        stop_reason: StopReason::EndTurn,
        usage: Usage::default(),
    }
}

impl LlmProvider for MockProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn capabilities(&self) -> &ProviderCapabilities {
        &self.capabilities
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse, LlmError> {
        self.calls.0.lock().unwrap().push(request.prompt.clone());

        let reply = self.script.lock().unwrap().pop_front();
        match reply {
            Some(Reply::Text(text)) => Ok(text_response(text)),
            Some(Reply::Fail(message)) => Err(LlmError::Provider {
                message: message.to_string(),
            }),
            Some(Reply::Slow(delay, text)) => {
                tokio::time::sleep(delay).await;
                Ok(text_response(text))
            }
            None => Err(LlmError::Provider {
                message: "script exhausted".to_string(),
            }),
        }
    }
}

/// Number of embed calls a mock embedder has served.
#[derive(Debug, Clone, Default)]
pub struct EmbedCalls(Arc<AtomicUsize>);

impl EmbedCalls {
    pub fn count(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}

enum EmbedMode {
    /// Letter histogram over a-z.
    Letters,
    /// Explicit vectors; unknown texts get an empty vector.
    Fixed(HashMap<String, Vec<f32>>),
    Failing,
}

/// Deterministic embedder for memory tests.
pub struct MockEmbedder {
    mode: EmbedMode,
    dimension: usize,
    delay: Option<Duration>,
    calls: EmbedCalls,
}

impl MockEmbedder {
    /// 26-dimensional letter counts. Identical texts map to identical vectors.
    pub fn letters() -> (Self, EmbedCalls) {
        let calls = EmbedCalls::default();
        let embedder = Self {
            mode: EmbedMode::Letters,
            dimension: 26,
            delay: None,
            calls: calls.clone(),
        };
        (embedder, calls)
    }

    /// Letter counts, but every call sleeps for `delay` first.
    pub fn slow(delay: Duration) -> (Self, EmbedCalls) {
        let (mut embedder, calls) = Self::letters();
        embedder.delay = Some(delay);
        (embedder, calls)
    }

    /// Known texts map to the given vectors.
    pub fn fixed(dimension: usize, vectors: &[(&str, Vec<f32>)]) -> (Self, EmbedCalls) {
        let calls = EmbedCalls::default();
        let table = vectors
            .iter()
            .map(|(text, vector)| (text.to_string(), vector.clone()))
            .collect();
        let embedder = Self {
            mode: EmbedMode::Fixed(table),
            dimension,
            delay: None,
            calls: calls.clone(),
        };
        (embedder, calls)
    }

    /// Every call fails.
    pub fn failing() -> Self {
        Self {
            mode: EmbedMode::Failing,
            dimension: 26,
            delay: None,
            calls: EmbedCalls::default(),
        }
    }

    fn vector_for(&self, text: &str) -> Result<Vec<f32>, RepositoryError> {
        match &self.mode {
            EmbedMode::Letters => {
                let mut vector = vec![0.0; 26];
                for byte in text.to_ascii_lowercase().bytes() {
                    if byte.is_ascii_lowercase() {
                        vector[(byte - b'a') as usize] += 1.0;
                    }
                }
                Ok(vector)
            }
            EmbedMode::Fixed(table) => Ok(table.get(text).cloned().unwrap_or_default()),
            EmbedMode::Failing => {
                Err(RepositoryError::Embedding("embedding service down".to_string()))
            }
        }
    }
}

impl Embedder for MockEmbedder {
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, RepositoryError> {
        self.calls.0.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        texts.iter().map(|text| self.vector_for(text)).collect()
    }

    fn model_name(&self) -> &str {
        "mock-embedder"
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}

/// In-memory append-only store that can be told to fail every write.
#[derive(Clone)]
pub struct RecordingStore<T> {
    entries: Arc<Mutex<Vec<T>>>,
    fail: bool,
}

impl<T: Clone> RecordingStore<T> {
    pub fn new() -> Self {
        Self {
            entries: Arc::new(Mutex::new(Vec::new())),
            fail: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            entries: Arc::new(Mutex::new(Vec::new())),
            fail: true,
        }
    }

    pub fn entries(&self) -> Vec<T> {
        self.entries.lock().unwrap().clone()
    }

    fn push(&self, entry: &T) -> Result<(), RepositoryError> {
        if self.fail {
            return Err(RepositoryError::Connection);
        }
        self.entries.lock().unwrap().push(entry.clone());
        Ok(())
    }

    fn newest(&self, limit: i64) -> Vec<T> {
        let entries = self.entries.lock().unwrap();
        entries
            .iter()
            .rev()
            .take(limit.max(0) as usize)
            .cloned()
            .collect()
    }
}

pub type RecordingLog = RecordingStore<InteractionLogEntry>;
pub type RecordingFeedback = RecordingStore<FeedbackEntry>;

impl InteractionLogRepository for RecordingLog {
    async fn append(&self, entry: &InteractionLogEntry) -> Result<(), RepositoryError> {
        self.push(entry)
    }

    async fn recent(&self, limit: i64) -> Result<Vec<InteractionLogEntry>, RepositoryError> {
        Ok(self.newest(limit))
    }
}

impl FeedbackRepository for RecordingFeedback {
    async fn append(&self, entry: &FeedbackEntry) -> Result<(), RepositoryError> {
        self.push(entry)
    }

    async fn recent(&self, limit: i64) -> Result<Vec<FeedbackEntry>, RepositoryError> {
        Ok(self.newest(limit))
    }
}

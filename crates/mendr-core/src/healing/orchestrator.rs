//! HealingOrchestrator -- the escalating retry loop behind `ask`.
//!
//! Three attempts, strictly in order:
//!
//! | attempt | prompt            | generator | counts as healing |
//! |---------|-------------------|-----------|-------------------|
//! | 0       | plain question    | primary   | no                |
//! | 1       | question + memory | primary   | yes               |
//! | 2       | question + memory | fallback  | yes               |
//!
//! The first acceptable answer wins and later attempts never run. A generator
//! error becomes placeholder text and the loop moves on without classifying
//! it, so an error message is never reported as a success. Every call ends
//! with exactly one interaction log entry, written after the loop.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{Instrument, Span, debug, field, info, info_span, warn};

use mendr_types::healing::{HealingResult, InteractionLogEntry};
use mendr_types::llm::LlmError;

use crate::llm::generator::LanguageGenerator;
use crate::memory::vector::{DEFAULT_MEMORY_K, VectorMemory};
use crate::repository::InteractionLogRepository;

use super::classifier::ResponseClassifier;
use super::prompt::{base_prompt, healing_prompt};

/// Total number of attempts per `ask` call, the plain one included.
pub const MAX_ATTEMPTS: u32 = 3;

/// Answer returned when every attempt failed and no text was produced.
pub const EXHAUSTED_ANSWER: &str = "I am unable to answer this question after multiple attempts.";

/// How a single attempt builds its prompt and which generator it uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptStrategy {
    /// Plain question to the primary generator.
    Plain,
    /// Question plus retrieved memories to the primary generator.
    Recall,
    /// Question plus retrieved memories to the fallback generator.
    Fallback,
}

impl AttemptStrategy {
    /// All strategies in execution order.
    pub const SEQUENCE: [AttemptStrategy; MAX_ATTEMPTS as usize] =
        [AttemptStrategy::Plain, AttemptStrategy::Recall, AttemptStrategy::Fallback];

    /// Whether running this attempt counts as a healing attempt.
    pub fn is_healing(self) -> bool {
        !matches!(self, AttemptStrategy::Plain)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            AttemptStrategy::Plain => "plain",
            AttemptStrategy::Recall => "recall",
            AttemptStrategy::Fallback => "fallback",
        }
    }
}

/// `1 - healing_attempts / MAX_ATTEMPTS`, used on success only.
pub fn confidence_for(healing_attempts: u32) -> f64 {
    1.0 - f64::from(healing_attempts) / f64::from(MAX_ATTEMPTS)
}

fn round_seconds(elapsed: Duration) -> f64 {
    (elapsed.as_secs_f64() * 100.0).round() / 100.0
}

/// Drives the attempts for one query and records the outcome.
///
/// Generic over the interaction log so tests can inject a recording double
/// and the service can pass `Option<_>` when persistence is unavailable.
pub struct HealingOrchestrator<L: InteractionLogRepository> {
    primary: LanguageGenerator,
    fallback: LanguageGenerator,
    memory: Arc<VectorMemory>,
    classifier: ResponseClassifier,
    log: L,
    memory_k: usize,
    deadline: Option<Duration>,
}

impl<L: InteractionLogRepository> HealingOrchestrator<L> {
    pub fn new(
        primary: LanguageGenerator,
        fallback: LanguageGenerator,
        memory: Arc<VectorMemory>,
        classifier: ResponseClassifier,
        log: L,
    ) -> Self {
        Self {
            primary,
            fallback,
            memory,
            classifier,
            log,
            memory_k: DEFAULT_MEMORY_K,
            deadline: None,
        }
    }

    /// Number of memories pulled into each healing prompt.
    pub fn with_memory_k(mut self, k: usize) -> Self {
        self.memory_k = k;
        self
    }

    /// Bound the whole call. Once the budget is spent the remaining attempts
    /// are skipped and the call ends on the exhaustion path.
    pub fn with_deadline(mut self, deadline: Option<Duration>) -> Self {
        self.deadline = deadline;
        self
    }

    pub fn memory(&self) -> &Arc<VectorMemory> {
        &self.memory
    }

    pub fn interaction_log(&self) -> &L {
        &self.log
    }

    /// Answer `query`, healing as needed. Never fails.
    pub async fn ask(&self, query: &str) -> HealingResult {
        let span = info_span!(
            "healing.ask",
            healing.query_chars = query.chars().count(),
            healing.attempts = field::Empty,
            healing.success = field::Empty,
        );
        self.run(query).instrument(span).await
    }

    async fn run(&self, query: &str) -> HealingResult {
        let started = Instant::now();
        let mut healing_attempts = 0u32;
        let mut response_text = String::new();

        for (attempt, strategy) in AttemptStrategy::SEQUENCE.into_iter().enumerate() {
            let budget = match self.deadline {
                Some(limit) => match limit.checked_sub(started.elapsed()) {
                    Some(remaining) if !remaining.is_zero() => Some(remaining),
                    _ => {
                        warn!(attempt, "Deadline reached, skipping remaining attempts");
                        break;
                    }
                },
                None => None,
            };

            if strategy.is_healing() {
                healing_attempts += 1;
            }
            info!(attempt, strategy = strategy.as_str(), "Running attempt");

            // Error text is kept as the best-so-far answer but never classified.
            match self.attempt(query, strategy, budget, started).await {
                Ok(text) => response_text = text,
                Err(e) => {
                    warn!(attempt, error = %e, "Generator call failed");
                    response_text = format!("An internal error occurred: {e}");
                    continue;
                }
            }

            if !self.classifier.is_unclear(&response_text) {
                let result = HealingResult {
                    answer: response_text,
                    healing_attempts,
                    confidence: confidence_for(healing_attempts),
                    duration_seconds: round_seconds(started.elapsed()),
                };
                self.finish(query, &result, true).await;
                return result;
            }
            debug!(attempt, "Response unclear, escalating");
        }

        let answer = if response_text.trim().is_empty() {
            EXHAUSTED_ANSWER.to_string()
        } else {
            response_text
        };
        let result = HealingResult {
            answer,
            healing_attempts,
            confidence: 0.0,
            duration_seconds: round_seconds(started.elapsed()),
        };
        self.finish(query, &result, false).await;
        result
    }

    async fn attempt(
        &self,
        query: &str,
        strategy: AttemptStrategy,
        budget: Option<Duration>,
        started: Instant,
    ) -> Result<String, LlmError> {
        // Memory retrieval and generation share the budget.
        let call = async {
            let (prompt, generator) = match strategy {
                AttemptStrategy::Plain => (base_prompt(query), &self.primary),
                AttemptStrategy::Recall | AttemptStrategy::Fallback => {
                    let memories = self.memory.get_relevant_memories(query, self.memory_k).await;
                    debug!(count = memories.len(), "Injecting memories into healing prompt");
                    let generator = if strategy == AttemptStrategy::Fallback {
                        &self.fallback
                    } else {
                        &self.primary
                    };
                    (healing_prompt(query, &memories), generator)
                }
            };
            generator.generate(&prompt).await
        };

        match budget {
            Some(remaining) => tokio::time::timeout(remaining, call).await.unwrap_or_else(|_| {
                Err(LlmError::Timeout {
                    elapsed_ms: started.elapsed().as_millis() as u64,
                })
            }),
            None => call.await,
        }
    }

    /// Record the outcome on the span and append the single log entry.
    async fn finish(&self, query: &str, result: &HealingResult, success: bool) {
        let span = Span::current();
        span.record("healing.attempts", result.healing_attempts);
        span.record("healing.success", success);

        info!(
            healing_attempts = result.healing_attempts,
            confidence = result.confidence,
            duration_seconds = result.duration_seconds,
            success,
            "Ask finished"
        );

        let entry = InteractionLogEntry::from_result(query, result, success);
        if let Err(e) = self.log.append(&entry).await {
            warn!(error = %e, "Failed to write interaction log");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::box_provider::BoxLlmProvider;
    use crate::memory::box_embedder::BoxEmbedder;
    use crate::testing::{CallLog, EmbedCalls, MockEmbedder, MockProvider, RecordingLog, Reply};

    const GOOD: &str = "A self-healing system recovers from failures automatically.";

    struct Harness {
        orchestrator: HealingOrchestrator<RecordingLog>,
        primary_calls: CallLog,
        fallback_calls: CallLog,
        embed_calls: EmbedCalls,
        log: RecordingLog,
    }

    fn generator(provider: MockProvider, temperature: f64) -> LanguageGenerator {
        LanguageGenerator::new(BoxLlmProvider::new(provider), "mock-model", temperature, 256)
    }

    async fn harness_with_log(
        primary: Vec<Reply>,
        fallback: Vec<Reply>,
        log: RecordingLog,
    ) -> Harness {
        let (primary, primary_calls) = MockProvider::scripted("primary", primary);
        let (fallback, fallback_calls) = MockProvider::scripted("fallback", fallback);
        let (embedder, embed_calls) = MockEmbedder::letters();

        let memory = Arc::new(VectorMemory::new(BoxEmbedder::new(embedder)));
        memory
            .seed(["A 'self-healing' system automatically detects and recovers from failures."])
            .await;

        let orchestrator = HealingOrchestrator::new(
            generator(primary, 0.7),
            generator(fallback, 0.9),
            memory,
            ResponseClassifier::new(),
            log.clone(),
        );

        Harness {
            orchestrator,
            primary_calls,
            fallback_calls,
            embed_calls,
            log,
        }
    }

    async fn harness(primary: Vec<Reply>, fallback: Vec<Reply>) -> Harness {
        harness_with_log(primary, fallback, RecordingLog::new()).await
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!((actual - expected).abs() < 1e-3, "expected {expected}, got {actual}");
    }

    #[test]
    fn test_confidence_formula() {
        assert_close(confidence_for(0), 1.0);
        assert_close(confidence_for(1), 0.667);
        assert_close(confidence_for(2), 0.333);
    }

    #[test]
    fn test_round_seconds() {
        assert_eq!(round_seconds(Duration::from_millis(1234)), 1.23);
        assert_eq!(round_seconds(Duration::from_millis(5)), 0.01);
    }

    #[tokio::test]
    async fn test_first_attempt_success_short_circuits() {
        let h = harness(vec![Reply::Text(GOOD)], vec![Reply::Text(GOOD)]).await;
        let embeds_after_seed = h.embed_calls.count();

        let result = h.orchestrator.ask("What is self-healing?").await;

        assert_eq!(result.answer, GOOD);
        assert_eq!(result.healing_attempts, 0);
        assert_close(result.confidence, 1.0);
        assert_eq!(h.primary_calls.count(), 1);
        assert_eq!(h.fallback_calls.count(), 0);
        // The plain attempt never touches memory.
        assert_eq!(h.embed_calls.count(), embeds_after_seed);
        assert!(h.primary_calls.prompts()[0].contains("Question: What is self-healing?"));
    }

    #[tokio::test]
    async fn test_second_attempt_uses_memory() {
        let h = harness(vec![Reply::Text("I don't know."), Reply::Text(GOOD)], vec![]).await;

        let result = h.orchestrator.ask("What is self-healing?").await;

        assert_eq!(result.answer, GOOD);
        assert_eq!(result.healing_attempts, 1);
        assert_close(result.confidence, 0.667);
        assert_eq!(h.primary_calls.count(), 2);
        assert_eq!(h.fallback_calls.count(), 0);

        let healing = &h.primary_calls.prompts()[1];
        assert!(healing.contains("Relevant Context from Memory:"));
        assert!(healing.contains("automatically detects and recovers"));
        assert!(healing.contains("Original Question: What is self-healing?"));
    }

    #[tokio::test]
    async fn test_third_attempt_uses_fallback() {
        let h = harness(
            vec![Reply::Fail("rate limited"), Reply::Text("Not sure")],
            vec![Reply::Text(GOOD)],
        )
        .await;

        let result = h.orchestrator.ask("What is self-healing?").await;

        assert_eq!(result.answer, GOOD);
        assert_eq!(result.healing_attempts, 2);
        assert_close(result.confidence, 0.333);
        assert_eq!(h.primary_calls.count(), 2);
        assert_eq!(h.fallback_calls.count(), 1);
        assert!(h.fallback_calls.prompts()[0].contains("Relevant Context from Memory:"));
    }

    #[tokio::test]
    async fn test_all_generators_failing_never_errors() {
        let h = harness(
            vec![Reply::Fail("down"), Reply::Fail("down")],
            vec![Reply::Fail("still down")],
        )
        .await;

        let result = h.orchestrator.ask("anything").await;

        assert_eq!(result.confidence, 0.0);
        assert_eq!(result.healing_attempts, 2);
        assert_eq!(
            result.answer,
            "An internal error occurred: provider error: still down"
        );
        assert!(result.duration_seconds >= 0.0);
    }

    #[tokio::test]
    async fn test_error_text_is_never_accepted() {
        let h = harness(
            vec![Reply::Fail("connection reset by peer"), Reply::Text(GOOD)],
            vec![],
        )
        .await;

        let result = h.orchestrator.ask("q").await;

        assert_eq!(result.answer, GOOD);
        assert_eq!(result.healing_attempts, 1);
        assert_eq!(h.primary_calls.count(), 2);
    }

    #[tokio::test]
    async fn test_exhaustion_returns_last_unclear_text() {
        let h = harness(
            vec![Reply::Text("I am not sure."), Reply::Text("I cannot say that.")],
            vec![Reply::Text("As an AI, I have no idea.")],
        )
        .await;

        let result = h.orchestrator.ask("Tell me the future").await;

        assert_eq!(result.answer, "As an AI, I have no idea.");
        assert_eq!(result.confidence, 0.0);
        assert_eq!(result.healing_attempts, 2);
    }

    #[tokio::test]
    async fn test_exhaustion_with_empty_text_uses_fixed_answer() {
        let h = harness(
            vec![Reply::Text(""), Reply::Text("")],
            vec![Reply::Text("   ")],
        )
        .await;

        let result = h.orchestrator.ask("?").await;

        assert_eq!(result.answer, EXHAUSTED_ANSWER);
        assert_eq!(result.confidence, 0.0);
    }

    #[tokio::test]
    async fn test_logs_exactly_once_per_call() {
        let h = harness(vec![Reply::Text(GOOD)], vec![]).await;
        h.orchestrator.ask("first").await;

        let entries = h.log.entries();
        assert_eq!(entries.len(), 1);
        assert!(entries[0].success);
        assert_eq!(entries[0].query, "first");
        assert_eq!(entries[0].response, GOOD);

        let h = harness(vec![Reply::Fail("x"), Reply::Fail("x")], vec![Reply::Fail("x")]).await;
        h.orchestrator.ask("second").await;

        let entries = h.log.entries();
        assert_eq!(entries.len(), 1);
        assert!(!entries[0].success);
        assert_eq!(entries[0].healing_attempts, 2);
        assert_eq!(entries[0].confidence, 0.0);
    }

    #[tokio::test]
    async fn test_log_failure_does_not_affect_result() {
        let h = harness_with_log(vec![Reply::Text(GOOD)], vec![], RecordingLog::failing()).await;

        let result = h.orchestrator.ask("q").await;
        assert_eq!(result.answer, GOOD);
        assert!(h.log.entries().is_empty());
    }

    #[tokio::test]
    async fn test_disconnected_log_is_a_no_op() {
        let (primary, _) = MockProvider::scripted("primary", vec![Reply::Text(GOOD)]);
        let (fallback, _) = MockProvider::scripted("fallback", vec![]);
        let (embedder, _) = MockEmbedder::letters();
        let orchestrator = HealingOrchestrator::new(
            generator(primary, 0.7),
            generator(fallback, 0.9),
            Arc::new(VectorMemory::new(BoxEmbedder::new(embedder))),
            ResponseClassifier::new(),
            None::<RecordingLog>,
        );

        let result = orchestrator.ask("q").await;
        assert_close(result.confidence, 1.0);
    }

    #[tokio::test]
    async fn test_empty_memory_still_heals() {
        let (primary, primary_calls) =
            MockProvider::scripted("primary", vec![Reply::Text("no"), Reply::Text(GOOD)]);
        let (fallback, _) = MockProvider::scripted("fallback", vec![]);
        let (embedder, embed_calls) = MockEmbedder::letters();
        let orchestrator = HealingOrchestrator::new(
            generator(primary, 0.7),
            generator(fallback, 0.9),
            Arc::new(VectorMemory::new(BoxEmbedder::new(embedder))),
            ResponseClassifier::new(),
            RecordingLog::new(),
        );

        let result = orchestrator.ask("q").await;
        assert_eq!(result.healing_attempts, 1);
        assert_eq!(embed_calls.count(), 0);
        assert!(primary_calls.prompts()[1].contains("Relevant Context from Memory:\n\n"));
    }

    #[tokio::test]
    async fn test_memory_k_limits_context() {
        let h = harness(vec![Reply::Text("no"), Reply::Text(GOOD)], vec![]).await;
        h.orchestrator.memory().add_memory("Second stored fact about healing.").await;
        let orchestrator = h.orchestrator.with_memory_k(1);

        orchestrator.ask("Second stored fact about healing.").await;

        let healing = &h.primary_calls.prompts()[1];
        assert!(healing.contains("Second stored fact about healing."));
        assert!(!healing.contains("automatically detects"));
    }

    #[tokio::test]
    async fn test_deadline_ends_on_exhaustion_path() {
        let h = harness(
            vec![Reply::Slow(Duration::from_secs(5), GOOD)],
            vec![Reply::Text(GOOD)],
        )
        .await;
        let orchestrator = h.orchestrator.with_deadline(Some(Duration::from_millis(50)));

        let result = orchestrator.ask("slow question").await;

        assert_eq!(result.confidence, 0.0);
        assert_eq!(result.healing_attempts, 0);
        assert!(result.answer.starts_with("An internal error occurred: generation timed out"));
        assert_eq!(h.primary_calls.count(), 1);
        assert_eq!(h.fallback_calls.count(), 0);
        assert_eq!(h.log.entries().len(), 1);
    }

    #[tokio::test]
    async fn test_deadline_covers_memory_retrieval() {
        let (primary, primary_calls) = MockProvider::scripted(
            "primary",
            vec![Reply::Text("no"), Reply::Slow(Duration::from_secs(5), GOOD)],
        );
        let (fallback, fallback_calls) =
            MockProvider::scripted("fallback", vec![Reply::Text(GOOD)]);
        let (embedder, embed_calls) = MockEmbedder::slow(Duration::from_millis(500));
        let memory = Arc::new(VectorMemory::new(BoxEmbedder::new(embedder)));
        memory.seed(["Self-healing systems recover on their own."]).await;
        let log = RecordingLog::new();
        let orchestrator = HealingOrchestrator::new(
            generator(primary, 0.7),
            generator(fallback, 0.9),
            memory,
            ResponseClassifier::new(),
            log.clone(),
        )
        .with_deadline(Some(Duration::from_millis(600)));

        let started = Instant::now();
        let result = orchestrator.ask("slow recall").await;

        assert!(started.elapsed() < Duration::from_millis(950), "{:?}", started.elapsed());
        assert_eq!(result.healing_attempts, 1);
        assert_eq!(result.confidence, 0.0);
        assert!(result.answer.starts_with("An internal error occurred: generation timed out"));
        assert_eq!(embed_calls.count(), 2);
        assert_eq!(primary_calls.count(), 2);
        assert_eq!(fallback_calls.count(), 0);
        assert_eq!(log.entries().len(), 1);
    }

    #[tokio::test]
    async fn test_generous_deadline_behaves_like_none() {
        let h = harness(vec![Reply::Text(GOOD)], vec![]).await;
        let orchestrator = h.orchestrator.with_deadline(Some(Duration::from_secs(30)));

        let result = orchestrator.ask("q").await;
        assert_close(result.confidence, 1.0);
    }
}

//! LLM provider abstraction.
//!
//! `LlmProvider` is an enum over concrete provider implementations.
//! Add a new variant + module in `providers/` for each additional backend.
//!
//! Provider instances are shared immutable capabilities — clone them freely.
//! Async is delegated to the underlying provider; the `complete` method is
//! `async fn` on the enum so callers need no trait-object machinery.

pub mod providers;

use thiserror::Error;

/// System prompt sent with every forwarded chat message.
pub const SYSTEM_PROMPT: &str = "You are a helpful assistant. When using math, \
    format with LaTeX: inline as $...$ and display as $$...$$. Do not emit HTML.";

// ── Error ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("unknown provider: {0}")]
    UnknownProvider(String),
    #[error("provider request failed: {0}")]
    Request(String),
}

// ── Provider enum ─────────────────────────────────────────────────────────────

/// All available provider backends.
///
/// Enum dispatch avoids `dyn` trait objects and the `async-trait` dependency.
/// Adding a backend = new module + new variant + new `complete` arm.
#[derive(Debug, Clone)]
pub enum LlmProvider {
    Dummy(providers::dummy::DummyProvider),
    OpenAiCompatible(providers::openai_compatible::OpenAiCompatibleProvider),
}

impl LlmProvider {
    /// Send `content` as the user message, with an optional system prompt,
    /// and return the provider's text reply.
    pub async fn complete(&self, content: &str, system: Option<&str>) -> Result<String, ProviderError> {
        match self {
            LlmProvider::Dummy(p) => p.complete(content).await,
            LlmProvider::OpenAiCompatible(p) => p.complete(content, system).await,
        }
    }
}

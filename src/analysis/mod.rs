//! AI recommendation for a submitted process.
//!
//! Prompts are assembled in [`prompt`]; the completion itself goes through
//! the [`CompletionClient`] trait so tests and test mode can swap in
//! [`MockCompletionClient`]. Clients are blocking; async callers wrap them
//! in `spawn_blocking`.

pub mod mock;
pub mod openai;
pub mod prompt;

use thiserror::Error;

pub use mock::MockCompletionClient;
pub use openai::OpenAiClient;
pub use prompt::{build_prompt, AnalysisDepth, CompanyContext};

pub const TEMPERATURE: f32 = 0.3;

#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("Cannot reach completion service at {0}")]
    Connection(String),

    #[error("Completion service returned {status}: {body}")]
    Provider { status: u16, body: String },

    #[error("HTTP client error: {0}")]
    HttpClient(String),

    #[error("Cannot parse completion response: {0}")]
    ResponseParsing(String),

    #[error("Completion service returned no content")]
    EmptyResponse,

    #[error("No API key configured for the completion service")]
    MissingApiKey,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub prompt: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

/// A chat-completion backend.
pub trait CompletionClient: Send + Sync {
    fn complete(&self, request: &CompletionRequest) -> Result<String, AnalysisError>;
}

/// Build the prompt for a process and ask `client` for a recommendation.
pub fn analyze_process(
    client: &dyn CompletionClient,
    title: &str,
    description: &str,
    depth: AnalysisDepth,
    company: &CompanyContext,
) -> Result<String, AnalysisError> {
    let request = CompletionRequest {
        prompt: build_prompt(title, description, depth, company),
        max_tokens: depth.max_tokens(),
        temperature: TEMPERATURE,
    };

    let started = std::time::Instant::now();
    let answer = client.complete(&request)?;
    if answer.trim().is_empty() {
        return Err(AnalysisError::EmptyResponse);
    }

    tracing::info!(
        depth = depth.as_str(),
        chars = answer.chars().count(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "Process analysed"
    );
    Ok(answer)
}

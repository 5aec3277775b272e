// Re-export modules
pub mod answer;
pub mod chunk;
pub mod config;
pub mod extract;
pub mod fetch;
pub mod history;
pub mod results;
pub mod validate;

// Re-export commonly used types for convenience
pub use results::{ChunkFailure, QueryOutcome, RawPage};

use answer::AnswerSource;
use fetch::PageFetcher;
use thiserror::Error;

/// Errors that stop a pipeline run before it can produce an outcome
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("invalid URL: {0} (include the protocol, e.g. https://)")]
    InvalidUrl(String),

    #[error("a question is required")]
    EmptyQuestion,

    #[error("fetch failed: {reason}")]
    Fetch {
        reason: String,
        /// Progress log from the failed fetch, kept for display
        log: Vec<String>,
    },
}

/// The fetch → extract → chunk → answer pipeline.
///
/// One call to [`Pipeline::run`] handles one query synchronously: the
/// page is fetched once, the cleaned text is chunked, and the answer
/// source is asked once per chunk in order. There is no retry logic
/// anywhere; a failure is terminal for its unit of work (the whole fetch,
/// or a single chunk) but never for the surrounding session.
pub struct Pipeline {
    fetcher: Box<dyn PageFetcher>,
    answers: Box<dyn AnswerSource>,
    max_chunk_chars: usize,
}

impl Pipeline {
    /// Create a pipeline with the default chunk ceiling
    pub fn new(fetcher: Box<dyn PageFetcher>, answers: Box<dyn AnswerSource>) -> Self {
        Self {
            fetcher,
            answers,
            max_chunk_chars: 4000,
        }
    }

    /// Set the maximum characters per chunk sent to the answer source
    pub fn with_max_chunk_chars(mut self, max_chunk_chars: usize) -> Self {
        self.max_chunk_chars = max_chunk_chars;
        self
    }

    /// Runs one query: validate, fetch, extract, chunk, answer.
    ///
    /// Input problems and fetch failures come back as errors before or
    /// with the fetch log. Per-chunk answer failures do not fail the run;
    /// they are listed in the outcome next to the answers that survived.
    pub async fn run(&self, url: &str, question: &str) -> Result<QueryOutcome, PipelineError> {
        let question = question.trim();
        if question.is_empty() {
            return Err(PipelineError::EmptyQuestion);
        }
        if !validate::is_valid_url(url) {
            return Err(PipelineError::InvalidUrl(url.to_string()));
        }

        let report = self.fetcher.fetch(url).await;
        let page = match report.result {
            Ok(page) => page,
            Err(e) => {
                return Err(PipelineError::Fetch {
                    reason: e.to_string(),
                    log: report.log,
                });
            }
        };

        let body = extract::extract_body(&page.html);
        let cleaned_text = extract::clean_text(&body);
        let chunks = chunk::chunk_text(&cleaned_text, self.max_chunk_chars);
        ::log::info!(
            "extracted {} chars of readable text into {} chunks",
            cleaned_text.len(),
            chunks.len()
        );

        let aggregate = answer::aggregate(self.answers.as_ref(), &chunks, question).await;

        Ok(QueryOutcome {
            log: report.log,
            raw_html: page.html,
            screenshot: page.screenshot,
            cleaned_text,
            answer: aggregate.answer,
            failures: aggregate.failures,
        })
    }
}

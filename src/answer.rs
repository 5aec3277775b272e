use crate::config::AnswerConfig;
use crate::results::ChunkFailure;
use async_trait::async_trait;
use serde_json::json;
use thiserror::Error;

/// System role for the extraction request
const SYSTEM_PROMPT: &str =
    "You are a helpful assistant that extracts specific information from given text content.";

/// Instruction template wrapped around the user's question. The response
/// contract matters downstream: matching data only, no commentary, and an
/// empty string when nothing matches.
const EXTRACTION_TEMPLATE: &str = "You are tasked with extracting specific information from the \
following text content. Please follow these instructions carefully:\n\n\
1. Extract Information: Only extract the information that directly matches the provided description.\n\
2. No Extra Content: Do not include any additional text, comments, or explanations in your response.\n\
3. Empty Response: If no information matches the description, return an empty string ('').\n\
4. Direct Data Only: Your output should contain only the data that is explicitly requested, with no other text.\n\n\
Description: ";

/// Errors from the answer collaborator
#[derive(Debug, Error)]
pub enum AnswerError {
    #[error("environment variable {0} is not set; it must hold the API key")]
    MissingApiKey(String),

    #[error("request to language model failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("language model response carried no message content")]
    MalformedResponse,
}

/// Answers a question against one chunk of page text.
///
/// An `Ok` empty string means the chunk held nothing relevant; `Err` is a
/// transport or API failure and says nothing about the other chunks.
#[async_trait]
pub trait AnswerSource: Send + Sync {
    async fn answer(&self, chunk: &str, question: &str) -> Result<String, AnswerError>;
}

/// Answer source backed by an OpenAI-compatible chat-completions endpoint
pub struct OpenAiAnswerSource {
    client: reqwest::Client,
    config: AnswerConfig,
    api_key: String,
}

impl OpenAiAnswerSource {
    /// Builds the source, resolving the API key from the configured
    /// environment variable. A missing key is a startup misconfiguration,
    /// not a per-call error.
    pub fn from_env(config: AnswerConfig) -> Result<Self, AnswerError> {
        let api_key = std::env::var(&config.api_key_env)
            .map_err(|_| AnswerError::MissingApiKey(config.api_key_env.clone()))?;

        Ok(Self {
            client: reqwest::Client::new(),
            config,
            api_key,
        })
    }
}

#[async_trait]
impl AnswerSource for OpenAiAnswerSource {
    async fn answer(&self, chunk: &str, question: &str) -> Result<String, AnswerError> {
        let prompt = format!("{}{}", EXTRACTION_TEMPLATE, question);
        let body = json!({
            "model": self.config.model,
            "messages": [
                { "role": "system", "content": SYSTEM_PROMPT },
                { "role": "user", "content": format!("Content: {}\n\nTask: {}", chunk, prompt) },
            ],
            "max_tokens": self.config.max_tokens,
            "temperature": self.config.temperature,
        });

        let response = self
            .client
            .post(format!("{}/chat/completions", self.config.api_base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?
            .error_for_status()?;

        let payload: serde_json::Value = response.json().await?;
        let content = payload["choices"][0]["message"]["content"]
            .as_str()
            .ok_or(AnswerError::MalformedResponse)?;

        Ok(content.trim().to_string())
    }
}

/// The joined answer plus the chunk failures that were isolated along
/// the way
#[derive(Debug)]
pub struct Aggregate {
    /// Non-empty per-chunk answers joined with newlines, in chunk order
    pub answer: String,

    /// Chunks whose request failed
    pub failures: Vec<ChunkFailure>,
}

/// Queries the answer source once per chunk, in order, and joins the
/// non-empty responses.
///
/// One chunk's failure never aborts the rest: it is logged, recorded in
/// the aggregate, and the remaining chunks are still processed. When
/// every response comes back empty the joined answer is the empty string,
/// which callers must read as "no relevant information found".
pub async fn aggregate(source: &dyn AnswerSource, chunks: &[String], question: &str) -> Aggregate {
    let mut answers: Vec<String> = Vec::new();
    let mut failures: Vec<ChunkFailure> = Vec::new();

    for (index, chunk) in chunks.iter().enumerate() {
        match source.answer(chunk, question).await {
            Ok(response) => {
                let trimmed = response.trim();
                if !trimmed.is_empty() {
                    answers.push(trimmed.to_string());
                }
            }
            Err(e) => {
                ::log::error!("answer request for chunk {}/{} failed: {}", index + 1, chunks.len(), e);
                failures.push(ChunkFailure {
                    chunk_index: index,
                    reason: e.to_string(),
                });
            }
        }
    }

    Aggregate {
        answer: answers.join("\n"),
        failures,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Scripted source: one canned result per chunk, checked in order
    struct ScriptedSource {
        responses: Vec<Result<String, ()>>,
    }

    #[async_trait]
    impl AnswerSource for ScriptedSource {
        async fn answer(&self, chunk: &str, _question: &str) -> Result<String, AnswerError> {
            let index: usize = chunk.parse().unwrap();
            match &self.responses[index] {
                Ok(text) => Ok(text.clone()),
                Err(()) => Err(AnswerError::MalformedResponse),
            }
        }
    }

    fn chunks(n: usize) -> Vec<String> {
        (0..n).map(|i| i.to_string()).collect()
    }

    #[tokio::test]
    async fn test_joins_non_empty_answers_in_order() {
        let source = ScriptedSource {
            responses: vec![
                Ok("first".to_string()),
                Ok("second".to_string()),
                Ok("third".to_string()),
            ],
        };
        let result = aggregate(&source, &chunks(3), "q").await;
        assert_eq!(result.answer, "first\nsecond\nthird");
        assert!(result.failures.is_empty());
    }

    #[tokio::test]
    async fn test_drops_empty_and_whitespace_answers() {
        let source = ScriptedSource {
            responses: vec![
                Ok("first".to_string()),
                Ok("".to_string()),
                Ok("   ".to_string()),
                Ok("last".to_string()),
            ],
        };
        let result = aggregate(&source, &chunks(4), "q").await;
        assert_eq!(result.answer, "first\nlast");
    }

    #[tokio::test]
    async fn test_all_empty_aggregates_to_empty_string() {
        let source = ScriptedSource {
            responses: vec![Ok("".to_string()), Ok("  \n ".to_string())],
        };
        let result = aggregate(&source, &chunks(2), "q").await;
        assert_eq!(result.answer, "");
        assert!(result.failures.is_empty());
    }

    #[tokio::test]
    async fn test_failed_chunk_is_isolated() {
        let source = ScriptedSource {
            responses: vec![Ok("first".to_string()), Err(()), Ok("third".to_string())],
        };
        let result = aggregate(&source, &chunks(3), "q").await;
        // The failing middle chunk does not disturb its neighbours
        assert_eq!(result.answer, "first\nthird");
        assert_eq!(result.failures.len(), 1);
        assert_eq!(result.failures[0].chunk_index, 1);
    }

    #[tokio::test]
    async fn test_no_chunks_yields_empty_answer() {
        let source = ScriptedSource { responses: vec![] };
        let result = aggregate(&source, &[], "q").await;
        assert_eq!(result.answer, "");
        assert!(result.failures.is_empty());
    }

    #[test]
    fn test_missing_api_key_is_startup_error() {
        let config = AnswerConfig {
            api_key_env: "ASK_PAGE_TEST_KEY_THAT_IS_NOT_SET".to_string(),
            ..AnswerConfig::default()
        };
        match OpenAiAnswerSource::from_env(config) {
            Err(AnswerError::MissingApiKey(var)) => {
                assert_eq!(var, "ASK_PAGE_TEST_KEY_THAT_IS_NOT_SET")
            }
            other => panic!("expected MissingApiKey, got {:?}", other.err()),
        }
    }
}

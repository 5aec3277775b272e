use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::fetch::FetchError;

/// A fetched page: the raw rendered markup plus the screenshot taken
/// alongside it (absent when the capture failed).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawPage {
    /// Raw page markup as reported by the browser
    pub html: String,

    /// Path of the screenshot written during the fetch
    pub screenshot: Option<PathBuf>,
}

/// What a fetch attempt produced: the progress log plus either the page
/// or the failure reason. The log is populated in both cases so callers
/// can always show what happened.
#[derive(Debug)]
pub struct FetchReport {
    /// Ordered human-readable progress lines
    pub log: Vec<String>,

    /// The page on success, the failure reason otherwise
    pub result: Result<RawPage, FetchError>,
}

/// A per-chunk answer failure that was isolated from the other chunks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkFailure {
    /// Zero-based index of the chunk that failed
    pub chunk_index: usize,

    /// Human-readable failure reason
    pub reason: String,
}

/// The full result of one pipeline run.
#[derive(Debug, Clone)]
pub struct QueryOutcome {
    /// The fetch progress log
    pub log: Vec<String>,

    /// Raw page markup, kept for optional display
    pub raw_html: String,

    /// Screenshot path, if one was captured
    pub screenshot: Option<PathBuf>,

    /// Readable text extracted from the page
    pub cleaned_text: String,

    /// Newline-joined non-empty per-chunk answers, in chunk order.
    /// Empty means no relevant information was found, not a failure.
    pub answer: String,

    /// Chunks whose answer request failed; the remaining chunks'
    /// answers are unaffected
    pub failures: Vec<ChunkFailure>,
}

impl QueryOutcome {
    /// Whether any chunk produced a non-empty answer
    pub fn found_answer(&self) -> bool {
        !self.answer.is_empty()
    }
}

/// Splits text into contiguous chunks of at most `max_chars` characters.
///
/// Chunks are non-overlapping and in document order, and concatenating
/// them reproduces the input exactly, whitespace and newlines included.
/// The limit counts characters rather than bytes so multi-byte input is
/// never split inside a character. Empty input yields an empty vector.
///
/// The limit is caller-supplied configuration sized to whatever request
/// ceiling the downstream consumer imposes.
pub fn chunk_text(text: &str, max_chars: usize) -> Vec<String> {
    assert!(max_chars > 0, "chunk size must be positive");

    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut count = 0;

    for ch in text.chars() {
        current.push(ch);
        count += 1;
        if count == max_chars {
            chunks.push(std::mem::take(&mut current));
            count = 0;
        }
    }

    if !current.is_empty() {
        chunks.push(current);
    }

    chunks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip() {
        let text = "line one\n  spaced line  \n\nline two";
        for max in [1, 2, 3, 7, 100] {
            let chunks = chunk_text(text, max);
            assert_eq!(chunks.concat(), text, "round trip failed for max {}", max);
            assert!(chunks.iter().all(|c| c.chars().count() <= max));
        }
    }

    #[test]
    fn test_empty_input_yields_no_chunks() {
        assert!(chunk_text("", 4000).is_empty());
    }

    #[test]
    fn test_exact_length_yields_single_chunk() {
        let text = "abcde";
        let chunks = chunk_text(text, 5);
        assert_eq!(chunks, vec!["abcde"]);
    }

    #[test]
    fn test_rechunking_a_chunk_is_identity() {
        let chunks = chunk_text("some page content here", 8);
        for chunk in &chunks {
            assert_eq!(chunk_text(chunk, 8), vec![chunk.clone()]);
        }
    }

    #[test]
    fn test_split_positions() {
        let chunks = chunk_text("abcdefgh", 3);
        assert_eq!(chunks, vec!["abc", "def", "gh"]);
    }

    #[test]
    fn test_multibyte_characters_round_trip() {
        let text = "héllo wörld — ünïcode";
        let chunks = chunk_text(text, 4);
        assert_eq!(chunks.concat(), text);
        assert!(chunks.iter().all(|c| c.chars().count() <= 4));
    }

    #[test]
    #[should_panic(expected = "chunk size must be positive")]
    fn test_zero_chunk_size_panics() {
        chunk_text("abc", 0);
    }
}

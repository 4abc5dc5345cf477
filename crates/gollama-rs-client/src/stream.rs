//! Newline-delimited JSON decoding for streamed responses.

use crate::{ClientError, GenerateResponse};

/// Incremental NDJSON decoder.
///
/// Network chunks may split a JSON line anywhere; bytes are buffered until a
/// newline arrives. Blank lines are skipped.
#[derive(Debug, Default)]
pub struct NdjsonDecoder {
    buffer: Vec<u8>,
}

impl NdjsonDecoder {
    /// Create an empty decoder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed raw bytes and return every complete object they finish.
    pub fn push(&mut self, bytes: &[u8]) -> Result<Vec<GenerateResponse>, ClientError> {
        self.buffer.extend_from_slice(bytes);
        let mut decoded = Vec::new();
        while let Some(pos) = self.buffer.iter().position(|byte| *byte == b'\n') {
            let line: Vec<u8> = self.buffer.drain(..=pos).collect();
            if let Some(chunk) = decode_line(&line)? {
                decoded.push(chunk);
            }
        }
        Ok(decoded)
    }

    /// Decode whatever is left once the body has ended.
    pub fn finish(&mut self) -> Result<Option<GenerateResponse>, ClientError> {
        let line = std::mem::take(&mut self.buffer);
        decode_line(&line)
    }
}

fn decode_line(line: &[u8]) -> Result<Option<GenerateResponse>, ClientError> {
    if line.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }
    let mut chunk: GenerateResponse =
        serde_json::from_slice(line).map_err(ClientError::request_failed)?;
    if let Some(error) = chunk.error.take() {
        return Err(ClientError::RequestFailed(error));
    }
    Ok(Some(chunk))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn reassembles_lines_split_across_chunks() {
        let mut decoder = NdjsonDecoder::new();
        let first = decoder
            .push(br#"{"response":"Hel"}"#.as_slice())
            .expect("push");
        assert!(first.is_empty());

        let second = decoder
            .push(b"\n{\"response\":\"lo\",\"done\":false}\n\n{\"resp")
            .expect("push");
        let texts: Vec<_> = second.iter().map(|chunk| chunk.response.as_str()).collect();
        assert_eq!(texts, vec!["Hel", "lo"]);

        let third = decoder.push(b"onse\":\"\",\"done\":true}").expect("push");
        assert!(third.is_empty());
        let last = decoder.finish().expect("finish").expect("trailing chunk");
        assert!(last.done);
    }

    #[test]
    fn malformed_line_is_a_request_failure() {
        let mut decoder = NdjsonDecoder::new();
        let err = decoder.push(b"not json\n").unwrap_err();
        assert!(matches!(err, ClientError::RequestFailed(_)));
    }

    #[test]
    fn daemon_error_object_is_surfaced() {
        let mut decoder = NdjsonDecoder::new();
        let err = decoder
            .push(b"{\"error\":\"model 'ghost' not found\"}\n")
            .unwrap_err();
        assert_eq!(err.to_string(), "request failed: model 'ghost' not found");
    }

    #[test]
    fn finish_on_empty_buffer_yields_nothing() {
        let mut decoder = NdjsonDecoder::new();
        assert_eq!(decoder.finish().expect("finish"), None);
    }
}

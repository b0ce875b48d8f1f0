//! Latency Log Parsing
//!
//! Parses benchmark latency logs: plain text, one integer measurement
//! per line. The logs are written by test scripts that interleave
//! incidental text (headers, blank lines, stray shell output) with the
//! measurements, so any line that is not an integer after
//! trailing-whitespace removal is filtered out rather than treated as
//! an error.

use std::io::BufRead;

use tracing::debug;

/// One parsed latency measurement.
pub type LatencySample = i64;

/// Ordered, filtered latency samples from one input stream.
#[derive(Debug, Clone, Default, serde::Serialize)]
pub struct LatencySequence {
    /// Samples in source-line order.
    pub samples: Vec<LatencySample>,
    /// Total lines consumed from the stream.
    pub lines_read: usize,
    /// Lines discarded because they did not parse as an integer.
    pub lines_skipped: usize,
}

impl LatencySequence {
    /// Number of samples that survived filtering.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Whether no line parsed as a sample.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

/// Parse a single log line into a sample.
///
/// Trailing whitespace (including any `\r` left by CRLF logs) is
/// stripped before the parse; leading content is left alone, so an
/// indented value is not a data line. Returns `None` for anything that
/// is not a base-10 integer with an optional leading sign.
pub fn parse_sample(line: &str) -> Option<LatencySample> {
    line.trim_end().parse::<LatencySample>().ok()
}

/// Consume a latency log stream into an ordered sequence.
///
/// Non-integer lines are skipped silently — that is the designed
/// filter for headers and blank lines, not an error path. Source-line
/// order is preserved for the samples that survive.
pub fn parse_sequence<R: BufRead>(reader: R) -> std::io::Result<LatencySequence> {
    let mut sequence = LatencySequence::default();

    for line in reader.lines() {
        let line = line?;
        sequence.lines_read += 1;

        match parse_sample(&line) {
            Some(sample) => sequence.samples.push(sample),
            None => {
                sequence.lines_skipped += 1;
                debug!(
                    line_no = sequence.lines_read,
                    content = %line,
                    "Skipping non-integer line"
                );
            }
        }
    }

    Ok(sequence)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_parse_sample_values() {
        assert_eq!(parse_sample("42"), Some(42));
        assert_eq!(parse_sample("-17"), Some(-17));
        assert_eq!(parse_sample("0"), Some(0));
        assert_eq!(parse_sample("42   "), Some(42));
        assert_eq!(parse_sample("42\r"), Some(42));
        assert_eq!(parse_sample(""), None);
        assert_eq!(parse_sample("latency (us)"), None);
        assert_eq!(parse_sample("3.14"), None);
        assert_eq!(parse_sample("  42"), None);
    }

    #[test]
    fn test_filters_and_preserves_order() {
        let input = Cursor::new("10\nx\n20\n");
        let seq = parse_sequence(input).unwrap();

        assert_eq!(seq.samples, vec![10, 20]);
        assert_eq!(seq.lines_read, 3);
        assert_eq!(seq.lines_skipped, 1);
    }

    #[test]
    fn test_blank_and_header_lines_skipped() {
        let input = Cursor::new("latency_us\n\n100\n\n200\nend of run\n");
        let seq = parse_sequence(input).unwrap();

        assert_eq!(seq.samples, vec![100, 200]);
        assert_eq!(seq.lines_skipped, 4);
    }

    #[test]
    fn test_negative_and_large_samples_pass_through() {
        let input = Cursor::new("-5\n9223372036854775807\n");
        let seq = parse_sequence(input).unwrap();

        assert_eq!(seq.samples, vec![-5, i64::MAX]);
    }

    #[test]
    fn test_missing_final_newline() {
        let input = Cursor::new("1\n2");
        let seq = parse_sequence(input).unwrap();

        assert_eq!(seq.samples, vec![1, 2]);
        assert_eq!(seq.lines_read, 2);
    }

    #[test]
    fn test_empty_stream() {
        let seq = parse_sequence(Cursor::new("")).unwrap();

        assert!(seq.is_empty());
        assert_eq!(seq.lines_read, 0);
        assert_eq!(seq.lines_skipped, 0);
    }
}

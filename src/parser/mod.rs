//! Latency extraction from raw ping output
//!
//! Ping output varies by platform and locale: per-reply lines
//! (`Reply from 8.8.8.8: bytes=32 time=14ms TTL=56`,
//! `64 bytes from 8.8.8.8: icmp_seq=1 ttl=56 time=14.2 ms`), localized
//! equivalents, and summary-only formats. The parser scans for reply
//! markers from a configurable table and falls back to the aggregate
//! statistics line when no per-reply line is present.

/// Reply marker phrases that indicate a per-reply line is present.
///
/// The table is configuration data: new locales are added here without
/// touching the scan logic.
pub const DEFAULT_REPLY_MARKERS: &[&str] = &[
    "reply from",
    "bytes from",
    "respuesta desde",
    "antwort von",
    "réponse de",
    "resposta de",
];

/// Tokens that must all appear for a line to count as a statistics summary
const SUMMARY_TOKENS: &[&str] = &["minimum", "average", "maximum"];

/// Configuration for the latency parser
#[derive(Debug, Clone)]
pub struct ParserConfig {
    /// Marker phrases indicating a per-reply line (matched case-insensitively)
    pub reply_markers: Vec<String>,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            reply_markers: DEFAULT_REPLY_MARKERS
                .iter()
                .map(|m| m.to_string())
                .collect(),
        }
    }
}

/// Extracts round-trip times from raw probe output
#[derive(Debug, Clone, Default)]
pub struct LatencyParser {
    config: ParserConfig,
}

impl LatencyParser {
    /// Create a parser with the default marker table
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a parser with a custom marker table
    pub fn with_config(config: ParserConfig) -> Self {
        Self { config }
    }

    /// Extract a round-trip time in milliseconds from raw ping output.
    ///
    /// Returns `None` when the output matches neither the per-reply pattern
    /// nor the summary-statistics fallback, or when the extracted text fails
    /// numeric parsing. A `None` is treated by callers as a missed reply.
    pub fn parse(&self, raw_output: &str) -> Option<f64> {
        let lowered = raw_output.to_lowercase();

        if self
            .config
            .reply_markers
            .iter()
            .any(|marker| lowered.contains(marker.as_str()))
            && lowered.contains("time=")
        {
            // A reply line with a time field is authoritative. If its value
            // does not parse, the output is malformed and the aggregate
            // summary must not stand in for a per-reply measurement.
            return Self::parse_reply_time(&lowered);
        }

        Self::parse_summary_line(&lowered)
    }

    /// Read the `time=` field up to the next `ms` unit marker.
    ///
    /// Characters that are not a digit, `.`, or `-` are stripped before
    /// parsing, which tolerates variants like `time=14.2 ms` and `time<1ms`
    /// separators across locales.
    fn parse_reply_time(lowered: &str) -> Option<f64> {
        let start = lowered.find("time=")?;
        let after_key = start + "time=".len();
        let end = lowered[after_key..].find("ms")? + after_key;
        if end <= after_key {
            return None;
        }

        let value: String = lowered[after_key..end]
            .chars()
            .filter(|ch| ch.is_ascii_digit() || *ch == '.' || *ch == '-')
            .collect();
        value.parse::<f64>().ok()
    }

    /// Fallback for summary-only output: the first whitespace-delimited token
    /// ending in `ms` that parses as a strictly positive number.
    ///
    /// Note: "first match" can pick the minimum rather than a representative
    /// latency depending on the summary layout. Kept for compatibility with
    /// every summary format observed so far.
    fn parse_summary_line(lowered: &str) -> Option<f64> {
        if !SUMMARY_TOKENS.iter().all(|tok| lowered.contains(tok)) {
            return None;
        }

        for token in lowered.split_whitespace() {
            if let Some(num) = token.strip_suffix("ms") {
                if let Ok(value) = num.parse::<f64>() {
                    if value > 0.0 {
                        return Some(value);
                    }
                }
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_windows_reply_line() {
        let parser = LatencyParser::new();
        let out = "Reply from 8.8.8.8: bytes=32 time=14ms TTL=56";
        assert_eq!(parser.parse(out), Some(14.0));
    }

    #[test]
    fn test_unix_reply_line_with_fraction() {
        let parser = LatencyParser::new();
        let out = "64 bytes from 8.8.8.8: icmp_seq=1 ttl=56 time=14.2 ms";
        assert_eq!(parser.parse(out), Some(14.2));
    }

    #[test]
    fn test_localized_reply_lines() {
        let parser = LatencyParser::new();
        let es = "Respuesta desde 8.8.8.8: bytes=32 time=23ms TTL=56";
        assert_eq!(parser.parse(es), Some(23.0));

        let de = "Antwort von 8.8.8.8: Bytes=32 time=9ms TTL=56";
        assert_eq!(parser.parse(de), Some(9.0));
    }

    #[test]
    fn test_timeout_yields_none() {
        let parser = LatencyParser::new();
        assert_eq!(parser.parse("Request timed out."), None);
        assert_eq!(parser.parse(""), None);
        assert_eq!(parser.parse("Destination host unreachable."), None);
    }

    #[test]
    fn test_summary_fallback() {
        let parser = LatencyParser::new();
        let out = "Ping statistics for 8.8.8.8:\n\
                   Packets: Sent = 4, Received = 4, Lost = 0 (0% loss),\n\
                   Approximate round trip times in milli-seconds:\n\
                   Minimum = 10ms, Maximum = 20ms, Average = 15ms";
        // Tokens "10ms," and "20ms," carry a trailing comma, so the first
        // clean ms-suffixed token is the average.
        assert_eq!(parser.parse(out), Some(15.0));
    }

    #[test]
    fn test_summary_requires_all_tokens() {
        let parser = LatencyParser::new();
        assert_eq!(parser.parse("minimum 10ms maximum 20ms"), None);
    }

    #[test]
    fn test_summary_ignores_non_positive() {
        let parser = LatencyParser::new();
        let out = "minimum average maximum 0ms 12ms";
        assert_eq!(parser.parse(out), Some(12.0));
    }

    #[test]
    fn test_reply_marker_without_time_field_falls_through() {
        let parser = LatencyParser::new();
        assert_eq!(parser.parse("Reply from 8.8.8.8: TTL expired"), None);
    }

    #[test]
    fn test_garbage_time_value_yields_none() {
        let parser = LatencyParser::new();
        assert_eq!(parser.parse("Reply from 8.8.8.8: time=--ms"), None);
    }

    #[test]
    fn test_garbage_time_value_not_rescued_by_summary() {
        let parser = LatencyParser::new();
        let out = "Reply from 8.8.8.8: bytes=32 time=--ms TTL=56\n\
                   Approximate round trip times in milli-seconds:\n\
                   Minimum = 10ms, Maximum = 20ms, Average = 15ms";
        assert_eq!(parser.parse(out), None);
    }

    #[test]
    fn test_custom_marker_table() {
        let parser = LatencyParser::with_config(ParserConfig {
            reply_markers: vec!["svar fra".to_string()],
        });
        let out = "Svar fra 8.8.8.8: byte=32 time=31ms TTL=56";
        assert_eq!(parser.parse(out), Some(31.0));

        // Default markers are gone in the custom table
        assert_eq!(parser.parse("Reply from 8.8.8.8: time=31ms"), None);
    }
}

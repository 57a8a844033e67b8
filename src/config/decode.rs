//! Configuration decoder: extracts the interval and color-list fields
//! from an inbound payload.
//!
//! This is deliberately not a general structured-data parser. The two
//! markers are located textually, in any order, and each field decodes
//! independently; a payload that happens to be well-formed JSON is
//! accepted only insofar as the markers are found. Malformed or missing
//! fields decode as absent rather than failing the message.

/// Marker preceding the decimal interval value, in whole seconds.
const INTERVAL_MARKER: &[u8] = b"\"interval_sec\":";

/// Marker preceding the quoted comma-separated color list.
const COLORS_MARKER: &[u8] = b"\"colors\":\"";

/// Cap on the quoted color list. A longer span decodes as absent.
pub const MAX_COLORS_LEN: usize = 100;

/// A transient, possibly-partial configuration change parsed from one
/// inbound message. `None` means "leave that field unchanged".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CandidateUpdate {
    /// Requested actuation interval, in whole seconds.
    pub interval_secs: Option<i64>,
    /// Requested comma-separated state-name list, unsplit.
    pub colors_csv: Option<String>,
}

impl CandidateUpdate {
    /// True when the message carried neither field (a no-op).
    pub fn is_empty(&self) -> bool {
        self.interval_secs.is_none() && self.colors_csv.is_none()
    }
}

/// Decodes a raw payload into a candidate update.
///
/// The scan is bounded by the slice length; the payload is never
/// assumed to be NUL-terminated or valid UTF-8 as a whole. Only the
/// captured color span must be UTF-8.
pub fn decode(payload: &[u8]) -> CandidateUpdate {
    CandidateUpdate {
        interval_secs: scan_interval(payload),
        colors_csv: scan_colors(payload),
    }
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

/// Decimal integer after the interval marker: optional ASCII whitespace,
/// optional sign, then digits. Anything else (including overflow) is
/// absent.
fn scan_interval(payload: &[u8]) -> Option<i64> {
    let value_start = find(payload, INTERVAL_MARKER)? + INTERVAL_MARKER.len();
    let rest = &payload[value_start..];

    let mut start = 0;
    while start < rest.len() && rest[start].is_ascii_whitespace() {
        start += 1;
    }

    let mut end = start;
    if end < rest.len() && (rest[end] == b'+' || rest[end] == b'-') {
        end += 1;
    }
    let digits_start = end;
    while end < rest.len() && rest[end].is_ascii_digit() {
        end += 1;
    }
    if end == digits_start {
        return None;
    }

    // Sign and digits only, so the span is valid UTF-8.
    std::str::from_utf8(&rest[start..end])
        .ok()
        .and_then(|text| text.parse::<i64>().ok())
}

/// Quoted span after the colors marker, terminated by the next unescaped
/// quote. Empty, over-cap, unterminated, or non-UTF-8 spans are absent.
fn scan_colors(payload: &[u8]) -> Option<String> {
    let span_start = find(payload, COLORS_MARKER)? + COLORS_MARKER.len();
    let rest = &payload[span_start..];

    let span = &rest[..closing_quote(rest)?];
    if span.is_empty() || span.len() > MAX_COLORS_LEN {
        return None;
    }

    std::str::from_utf8(span).ok().map(str::to_owned)
}

/// Position of the next quote not preceded by a backslash.
fn closing_quote(bytes: &[u8]) -> Option<usize> {
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b'"' => return Some(i),
            _ => i += 1,
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_both_fields() {
        let candidate = decode(br#"{"interval_sec":5,"colors":"red,green"}"#);
        assert_eq!(candidate.interval_secs, Some(5));
        assert_eq!(candidate.colors_csv.as_deref(), Some("red,green"));
    }

    #[test]
    fn test_decode_is_order_insensitive() {
        let candidate = decode(br#"{"colors":"blue","interval_sec":2}"#);
        assert_eq!(candidate.interval_secs, Some(2));
        assert_eq!(candidate.colors_csv.as_deref(), Some("blue"));
    }

    #[test]
    fn test_decode_interval_only() {
        let candidate = decode(br#"{"interval_sec":10}"#);
        assert_eq!(candidate.interval_secs, Some(10));
        assert_eq!(candidate.colors_csv, None);
    }

    #[test]
    fn test_decode_colors_only() {
        let candidate = decode(br#"{"colors":"blue"}"#);
        assert_eq!(candidate.interval_secs, None);
        assert_eq!(candidate.colors_csv.as_deref(), Some("blue"));
    }

    #[test]
    fn test_decode_no_markers_is_noop() {
        let candidate = decode(b"hello world");
        assert!(candidate.is_empty());
    }

    #[test]
    fn test_decode_tolerates_whitespace_before_number() {
        let candidate = decode(br#"{"interval_sec":   42}"#);
        assert_eq!(candidate.interval_secs, Some(42));
    }

    #[test]
    fn test_decode_negative_interval_parses() {
        // Range validation is the applier's job, not the decoder's.
        let candidate = decode(br#"{"interval_sec":-3}"#);
        assert_eq!(candidate.interval_secs, Some(-3));
    }

    #[test]
    fn test_decode_malformed_number_is_absent() {
        let candidate = decode(br#"{"interval_sec":abc,"colors":"red"}"#);
        assert_eq!(candidate.interval_secs, None);
        assert_eq!(candidate.colors_csv.as_deref(), Some("red"));
    }

    #[test]
    fn test_decode_overflowing_number_is_absent() {
        let candidate = decode(br#"{"interval_sec":99999999999999999999999}"#);
        assert_eq!(candidate.interval_secs, None);
    }

    #[test]
    fn test_decode_missing_closing_quote_is_absent() {
        let candidate = decode(br#"{"colors":"red,green"#);
        assert_eq!(candidate.colors_csv, None);
    }

    #[test]
    fn test_decode_empty_color_span_is_absent() {
        let candidate = decode(br#"{"colors":""}"#);
        assert_eq!(candidate.colors_csv, None);
    }

    #[test]
    fn test_decode_over_cap_color_span_is_absent() {
        let long = "x".repeat(MAX_COLORS_LEN + 1);
        let payload = format!(r#"{{"colors":"{}"}}"#, long);
        assert_eq!(decode(payload.as_bytes()).colors_csv, None);

        let exact = "y".repeat(MAX_COLORS_LEN);
        let payload = format!(r#"{{"colors":"{}"}}"#, exact);
        assert_eq!(decode(payload.as_bytes()).colors_csv.as_deref(), Some(exact.as_str()));
    }

    #[test]
    fn test_decode_escaped_quote_does_not_terminate() {
        let candidate = decode(br#"{"colors":"re\"d,green"}"#);
        assert_eq!(candidate.colors_csv.as_deref(), Some(r#"re\"d,green"#));
    }

    #[test]
    fn test_decode_non_utf8_color_span_is_absent() {
        let mut payload = br#"{"colors":""#.to_vec();
        payload.extend_from_slice(&[0xff, 0xfe]);
        payload.extend_from_slice(b"\"}");
        assert_eq!(decode(&payload).colors_csv, None);
    }

    #[test]
    fn test_decode_marker_without_value_is_absent() {
        assert_eq!(decode(br#"{"interval_sec":}"#).interval_secs, None);
        assert_eq!(decode(br#"{"interval_sec":"#).interval_secs, None);
    }

    #[test]
    fn test_decode_first_marker_occurrence_wins() {
        let candidate = decode(br#"{"interval_sec":1,"interval_sec":9}"#);
        assert_eq!(candidate.interval_secs, Some(1));
    }
}

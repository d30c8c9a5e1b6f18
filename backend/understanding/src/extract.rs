//! Reply extraction: pull the item record out of a vision model's free text.
//!
//! Models wrap their JSON in prose, markdown fences, or emit several objects.
//! Candidates are found with a balanced-brace scan that skips over string
//! literals, so a trailing `}` in unrelated text never widens the span.

use serde::Deserialize;
use stockaudit_core::{AuditError, AuditResult};

/// Fields a model may send back, depending on the prompt style.
#[derive(Debug, Deserialize)]
struct ModelReply {
    item: Option<String>,
    confidence: Option<String>,
    category: Option<String>,
}

/// Decode the first usable JSON object in `text` into an [`AuditResult`].
///
/// Candidates are tried in order. The first one naming an `item` wins; if
/// objects decode but none names an item, that is `MissingField`.
pub fn extract_audit_result(text: &str) -> Result<AuditResult, AuditError> {
    let raw = text.trim();
    let spans = balanced_spans(raw);

    let Some(first) = spans.first() else {
        return Err(match greedy_span(raw) {
            Some(span) => AuditError::MalformedJson {
                span: span.to_string(),
                reason: "unbalanced braces or unterminated string".to_string(),
            },
            None => AuditError::NoJsonFound { raw: raw.to_string() },
        });
    };

    let mut decode_error: Option<String> = None;
    let mut itemless: Option<&str> = None;

    for span in &spans {
        match serde_json::from_str::<ModelReply>(span) {
            Ok(reply) => match reply.item {
                Some(item) if !item.trim().is_empty() => {
                    let reasoning = reply.confidence.or(reply.category).unwrap_or_default();
                    return Ok(AuditResult { item, reasoning });
                }
                _ => {
                    if itemless.is_none() {
                        itemless = Some(*span);
                    }
                }
            },
            Err(e) => {
                if decode_error.is_none() {
                    decode_error = Some(e.to_string());
                }
            }
        }
    }

    if let Some(span) = itemless {
        return Err(AuditError::MissingField {
            field: "item".to_string(),
            span: span.to_string(),
        });
    }

    Err(AuditError::MalformedJson {
        span: first.to_string(),
        reason: decode_error.unwrap_or_default(),
    })
}

/// Outermost balanced `{...}` spans, left to right, in one pass.
///
/// Braces inside string literals are ignored. Quotes only open a string
/// once some `{` is pending, so prose before the JSON is never read as a
/// string. A `{` that never closes leaves the spans nested inside it intact.
fn balanced_spans(text: &str) -> Vec<&str> {
    let mut opens: Vec<usize> = Vec::new();
    let mut closed: Vec<(usize, usize)> = Vec::new();
    let mut in_string = false;
    let mut escaped = false;

    for (i, b) in text.bytes().enumerate() {
        if in_string {
            if escaped {
                escaped = false;
            } else if b == b'\\' {
                escaped = true;
            } else if b == b'"' {
                in_string = false;
            }
            continue;
        }
        match b {
            b'"' if !opens.is_empty() => in_string = true,
            b'{' => opens.push(i),
            b'}' => {
                if let Some(open) = opens.pop() {
                    // Spans closed earlier inside this one are no longer outermost.
                    while closed.last().is_some_and(|&(start, _)| start > open) {
                        closed.pop();
                    }
                    closed.push((open, i));
                }
            }
            _ => {}
        }
    }

    closed.into_iter().map(|(open, close)| &text[open..=close]).collect()
}

/// First `{` through last `}`, used only to report what looked like JSON.
fn greedy_span(text: &str) -> Option<&str> {
    let open = text.find('{')?;
    let close = text.rfind('}')?;
    (close > open).then(|| &text[open..=close])
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};

    #[test]
    fn decodes_plain_object() {
        let result = extract_audit_result(r#"{"item": "Laptop", "confidence": "clear"}"#).unwrap();
        assert_eq!(result.item, "Laptop");
        assert_eq!(result.reasoning, "clear");
    }

    #[test]
    fn no_braces_is_no_json_found() {
        let err = extract_audit_result("  I think this is a laptop.  ").unwrap_err();
        assert_eq!(
            err,
            AuditError::NoJsonFound { raw: "I think this is a laptop.".into() }
        );
    }

    #[test]
    fn close_before_open_is_no_json_found() {
        let err = extract_audit_result("} nothing here {").unwrap_err();
        assert_eq!(err.kind(), "NoJsonFound");
    }

    #[test]
    fn unquoted_keys_are_malformed() {
        let err = extract_audit_result("{item: laptop}").unwrap_err();
        assert_eq!(err.kind(), "MalformedJson");
        assert_eq!(err.raw(), "{item: laptop}");
    }

    #[test]
    fn wrong_field_type_is_malformed() {
        let err = extract_audit_result(r#"{"item": 42, "confidence": "sure"}"#).unwrap_err();
        assert_eq!(err.kind(), "MalformedJson");
    }

    #[test]
    fn missing_item_fails_fast() {
        let err = extract_audit_result(r#"{"confidence": "blurry photo"}"#).unwrap_err();
        assert_eq!(
            err,
            AuditError::MissingField {
                field: "item".into(),
                span: r#"{"confidence": "blurry photo"}"#.into(),
            }
        );
    }

    #[test]
    fn blank_item_counts_as_missing() {
        let err = extract_audit_result(r#"{"item": "  ", "category": "x"}"#).unwrap_err();
        assert_eq!(err.kind(), "MissingField");
    }

    #[test]
    fn prose_and_fences_are_skipped() {
        let text = "Sure! Here is the result:\n```json\n{\n  \"item\": \"mouse\",\n  \"confidence\": \"scroll wheel visible\"\n}\n```\nLet me know if you need more.";
        let result = extract_audit_result(text).unwrap();
        assert_eq!(result.item, "mouse");
        assert_eq!(result.reasoning, "scroll wheel visible");
    }

    #[test]
    fn picks_first_object_not_greedy_span() {
        let text = r#"{"item": "phone", "confidence": "screen"} and also {"item": "bottle"}"#;
        let result = extract_audit_result(text).unwrap();
        assert_eq!(result.item, "phone");
    }

    #[test]
    fn braces_inside_strings_do_not_end_span() {
        let text = r#"{"item": "keyboard", "confidence": "keys like } and { visible \" here"}"#;
        let result = extract_audit_result(text).unwrap();
        assert_eq!(result.item, "keyboard");
        assert_eq!(result.reasoning, r#"keys like } and { visible " here"#);
    }

    #[test]
    fn category_fills_reasoning() {
        let result = extract_audit_result(r#"{"item": "monitor", "category": "electronics"}"#).unwrap();
        assert_eq!(result.reasoning, "electronics");
    }

    #[test]
    fn reasoning_defaults_to_empty() {
        let result = extract_audit_result(r#"{"item": "bottle"}"#).unwrap();
        assert_eq!(result.reasoning, "");
    }

    #[test]
    fn skips_leading_non_json_braces() {
        let text = r#"Format is {item, confidence}. {"item": "laptop", "confidence": "hinge"}"#;
        let result = extract_audit_result(text).unwrap();
        assert_eq!(result.item, "laptop");
    }

    #[test]
    fn nested_objects_stay_in_one_span() {
        let text = r#"{"item": "phone", "confidence": "sure", "meta": {"angle": "front"}}"#;
        assert_eq!(extract_audit_result(text).unwrap().item, "phone");
    }

    #[test]
    fn unclosed_outer_brace_still_finds_inner_object() {
        let text = r#"{ note: {"item": "mouse", "confidence": "cable"}"#;
        assert_eq!(extract_audit_result(text).unwrap().item, "mouse");
    }

    #[test]
    fn unterminated_string_reports_greedy_span() {
        let err = extract_audit_result(r#"{"item": "laptop}"#).unwrap_err();
        assert_eq!(err.kind(), "MalformedJson");
        assert_eq!(err.raw(), r#"{"item": "laptop}"#);
    }

    #[test]
    fn long_runs_of_open_braces_scan_in_linear_time() {
        let start = Instant::now();
        let text = "{".repeat(40_000);
        let err = extract_audit_result(&text).unwrap_err();
        assert_eq!(err.kind(), "NoJsonFound");

        let quoted = format!("{{\"{}", "\"{ \"".repeat(32_000));
        let err = extract_audit_result(&quoted).unwrap_err();
        assert_eq!(err.kind(), "NoJsonFound");

        assert!(start.elapsed() < Duration::from_secs(1), "took {:?}", start.elapsed());
    }

    #[test]
    fn innermost_close_after_many_opens_is_one_span() {
        let text = format!("{}}}", "{".repeat(20_000));
        let err = extract_audit_result(&text).unwrap_err();
        assert_eq!(
            err,
            AuditError::MissingField { field: "item".into(), span: "{}".into() }
        );
    }
}

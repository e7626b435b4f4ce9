//! Model reply normalization.
//!
//! Vision models are asked for a JSON list of `{expr, result, assign}`
//! records but routinely wrap it in Markdown fences, use Python-style single
//! quotes, or leave keys unquoted. [`normalize`] recovers in tiers:
//!
//! 1. **Strict**: strip fences, parse as JSON.
//! 2. **Quoting repair**: strip fences from the original reply again, rewrite
//!    quotes and keys, parse as JSON.
//! 3. **Fallback**: an empty collection.
//!
//! The repair tier only runs after the strict parse fails, since its
//! rewrites can damage a reply that was already valid.
//!
//! Every transform is a pure string function and is public so each tier can
//! be exercised on its own.

use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::{CoreResult, ResultCollection};

/// Markdown code fence delimiter.
const FENCE: &str = "```";

/// A bare identifier used as an object key: `{expr:` or `, result :`.
static BARE_KEY: LazyLock<Regex> = LazyLock::new(|| {
    match Regex::new(r"([{,]\s*)([A-Za-z_][A-Za-z0-9_]*)(\s*:)") {
        Ok(regex) => regex,
        Err(err) => panic!("bare key regex is invalid: {err}"),
    }
});

/// A quoted value whose entire content is a JSON number.
static QUOTED_NUMBER: LazyLock<Regex> = LazyLock::new(|| {
    match Regex::new(r#":(\s*)"(-?(?:0|[1-9][0-9]*)(?:\.[0-9]+)?(?:[eE][+-]?[0-9]+)?)""#) {
        Ok(regex) => regex,
        Err(err) => panic!("quoted number regex is invalid: {err}"),
    }
});

/// Which tier produced a normalized reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecoveryTier {
    /// The reply parsed after fence stripping alone.
    Strict,
    /// The reply parsed after quote and key repair.
    QuotingRepair,
    /// Nothing parsed; the collection is empty.
    Fallback,
}

/// A normalized reply together with the tier that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct Normalized {
    /// Validated records.
    pub records: ResultCollection,
    /// Tier that succeeded.
    pub tier: RecoveryTier,
}

/// Turn a raw model reply into validated result records.
///
/// Total over all inputs: a reply that cannot be recovered yields an empty
/// collection and a warning in the log.
#[must_use]
pub fn normalize(raw: &str) -> ResultCollection {
    normalize_with_tier(raw).records
}

/// Like [`normalize`], also reporting which tier succeeded.
#[must_use]
pub fn normalize_with_tier(raw: &str) -> Normalized {
    let strict_err = match strict_tier(raw) {
        Ok(records) => {
            tracing::debug!(count = records.len(), "reply parsed strictly");
            return Normalized {
                records,
                tier: RecoveryTier::Strict,
            };
        }
        Err(err) => err,
    };
    tracing::debug!("strict parse failed, attempting quote repair: {strict_err}");

    match repair_tier(raw) {
        Ok(records) => {
            tracing::debug!(count = records.len(), "reply parsed after quote repair");
            Normalized {
                records,
                tier: RecoveryTier::QuotingRepair,
            }
        }
        Err(err) => {
            tracing::warn!("failed to parse model reply even after repair: {err}");
            Normalized {
                records: ResultCollection::empty(),
                tier: RecoveryTier::Fallback,
            }
        }
    }
}

/// Tier 1: fence stripping, then a strict parse.
///
/// # Errors
///
/// Returns an error if the stripped text is not a valid record list.
pub fn strict_tier(raw: &str) -> CoreResult<ResultCollection> {
    parse_records(strip_fences(raw))
}

/// Tier 2: fence stripping on the original text, quote and key repair, then a
/// strict parse.
///
/// # Errors
///
/// Returns an error if the repaired text is not a valid record list.
pub fn repair_tier(raw: &str) -> CoreResult<ResultCollection> {
    let text = normalize_quotes(strip_fences(raw));
    let text = quote_bare_keys(&text);
    let text = unquote_numbers(&text);
    tracing::trace!("repaired reply: {text}");
    parse_records(&text)
}

/// Strip a leading and a trailing Markdown code fence, and surrounding
/// whitespace.
///
/// The two strips are independent: a reply with only a trailing fence loses
/// it all the same. A leading fence may carry a language tag (` ```json `).
#[must_use]
pub fn strip_fences(text: &str) -> &str {
    let mut body = text.trim();
    if let Some(rest) = body.strip_prefix(FENCE) {
        let tag_len = rest
            .find(|c: char| !c.is_ascii_alphanumeric())
            .unwrap_or(rest.len());
        body = rest[tag_len..].trim_start();
    }
    if let Some(rest) = body.strip_suffix(FENCE) {
        body = rest;
    }
    body.trim()
}

/// Replace every single quote with a double quote.
#[must_use]
pub fn normalize_quotes(text: &str) -> String {
    text.replace('\'', "\"")
}

/// Quote bare identifier keys: `{expr: 1}` becomes `{"expr": 1}`.
#[must_use]
pub fn quote_bare_keys(text: &str) -> String {
    BARE_KEY.replace_all(text, r#"${1}"${2}"${3}"#).into_owned()
}

/// Unquote values that are entirely a number: `"result": "4"` becomes
/// `"result": 4`.
///
/// Only a complete JSON number between the quotes matches, so `"x1"` or
/// `"007"` stay strings.
#[must_use]
pub fn unquote_numbers(text: &str) -> String {
    QUOTED_NUMBER
        .replace_all(text, |caps: &Captures<'_>| {
            let number = &caps[2];
            // Out-of-range literals such as 1e400 would not parse as JSON.
            if number.parse::<f64>().is_ok_and(f64::is_finite) {
                format!(":{}{number}", &caps[1])
            } else {
                caps[0].to_string()
            }
        })
        .into_owned()
}

/// Parse text as a JSON list of result records.
///
/// # Errors
///
/// Returns an error if the text is not JSON or does not match the record
/// schema.
pub fn parse_records(text: &str) -> CoreResult<ResultCollection> {
    let value: serde_json::Value = serde_json::from_str(text)?;
    ResultCollection::from_value(&value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ResultRecord;

    #[test]
    fn fenced_json_parses_strictly() {
        let raw = "```json\n[{\"expr\": \"2+2\", \"result\": 4}]\n```";
        let normalized = normalize_with_tier(raw);
        assert_eq!(normalized.tier, RecoveryTier::Strict);
        assert_eq!(
            normalized.records.as_slice(),
            &[ResultRecord::new("2+2", 4, false)]
        );
    }

    #[test]
    fn single_quotes_are_repaired() {
        let raw = "[{'expr': 'x', 'result': 2, 'assign': true}]";
        let normalized = normalize_with_tier(raw);
        assert_eq!(normalized.tier, RecoveryTier::QuotingRepair);
        assert_eq!(
            normalized.records.as_slice(),
            &[ResultRecord::new("x", 2, true)]
        );
    }

    #[test]
    fn garbage_is_empty() {
        let normalized = normalize_with_tier("not json at all");
        assert_eq!(normalized.tier, RecoveryTier::Fallback);
        assert!(normalized.records.is_empty());
    }

    #[test]
    fn strip_fences_handles_each_position() {
        assert_eq!(strip_fences("[1]"), "[1]");
        assert_eq!(strip_fences("```\n[1]"), "[1]");
        assert_eq!(strip_fences("[1]\n```"), "[1]");
        assert_eq!(strip_fences("  ```python\n[1]\n```  "), "[1]");
        assert_eq!(strip_fences("```[1]```"), "[1]");
        assert_eq!(strip_fences("```"), "");
    }

    #[test]
    fn bare_keys_are_quoted() {
        assert_eq!(
            quote_bare_keys(r#"[{expr: "x", result: 2}]"#),
            r#"[{"expr": "x", "result": 2}]"#
        );
        assert_eq!(
            quote_bare_keys(r#"[{"expr": "x"}]"#),
            r#"[{"expr": "x"}]"#
        );
    }

    #[test]
    fn only_whole_numbers_are_unquoted() {
        assert_eq!(
            unquote_numbers(r#"{"result": "4", "b": "-2.5e3"}"#),
            r#"{"result": 4, "b": -2.5e3}"#
        );
        assert_eq!(unquote_numbers(r#"{"a": "x1"}"#), r#"{"a": "x1"}"#);
        assert_eq!(unquote_numbers(r#"{"a": "007"}"#), r#"{"a": "007"}"#);
        assert_eq!(unquote_numbers(r#"{"a": "12abc"}"#), r#"{"a": "12abc"}"#);
    }

    #[test]
    fn out_of_range_numbers_stay_quoted() {
        assert_eq!(
            unquote_numbers(r#"{"a": "1e400", "b": "7"}"#),
            r#"{"a": "1e400", "b": 7}"#
        );

        let normalized = normalize_with_tier("[{'expr': 'big', 'result': '1e400'}]");
        assert_eq!(normalized.tier, RecoveryTier::QuotingRepair);
        assert_eq!(
            normalized.records.as_slice(),
            &[ResultRecord::new("big", "1e400", false)]
        );
    }

    #[test]
    fn unquoted_keys_and_quoted_numbers_repair() {
        let raw = "```\n[{expr: 'y', result: '5', assign: true}]\n```";
        let records = normalize(raw);
        assert_eq!(records.as_slice(), &[ResultRecord::new("y", 5, true)]);
    }

    #[test]
    fn strict_tier_keeps_quoted_numbers_as_strings() {
        let records = normalize(r#"[{"expr": "a", "result": "4"}]"#);
        assert_eq!(records.as_slice(), &[ResultRecord::new("a", "4", false)]);
    }

    #[test]
    fn repair_starts_from_original_text() {
        let raw = "```json\n[{'expr': 'x', 'result': 'love'}]";
        let records = normalize(raw);
        assert_eq!(records.as_slice(), &[ResultRecord::new("x", "love", false)]);
    }

    #[test]
    fn non_array_reply_is_empty() {
        assert!(normalize(r#"{"expr": "x", "result": 1}"#).is_empty());
    }
}

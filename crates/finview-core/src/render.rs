//! Readable text rendering of schema-less JSON
//!
//! Analysis payloads mix structured fields with free-text narrative and are
//! sometimes double-encoded. [`render`] walks any [`Value`] and produces plain
//! text: nested objects become indented `Key: value` blocks, arrays become
//! paragraphs, JSON embedded in strings is decoded and rendered in place.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Map, Number, Value};

use crate::json_text;

/// Shown when a payload renders to nothing ("no displayable analysis result")
pub const NO_RESULT_PLACEHOLDER: &str = "暂无可显示的分析结果。";

const BLOCK_SEPARATOR: &str = "\n\n";
const INDENT: &str = "  ";
const TEXT_KEY: &str = "text";

static KEY_SEPARATORS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[_-]+").expect("separator pattern is valid"));
static WHITESPACE_RUNS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace pattern is valid"));

/// Render `value`, substituting [`NO_RESULT_PLACEHOLDER`] for blank output.
pub fn to_readable_text(value: &Value) -> String {
    let rendered = render(value);
    if rendered.trim().is_empty() {
        NO_RESULT_PLACEHOLDER.to_string()
    } else {
        rendered
    }
}

/// Render any JSON value as human-readable multi-line text.
///
/// Never fails; values with nothing to show render as an empty string.
pub fn render(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(text) => render_text(text),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => format_number(n),
        Value::Array(items) => join_blocks(items.iter().map(render)),
        Value::Object(map) => render_object(map),
    }
}

/// Turn an object key such as `price_data` or `risk-level` into `Price Data` / `Risk Level`.
pub fn prettify_key(key: &str) -> String {
    let spaced = KEY_SEPARATORS.replace_all(key, " ");
    let collapsed = WHITESPACE_RUNS.replace_all(&spaced, " ");
    capitalize_words(collapsed.trim())
}

fn render_text(text: &str) -> String {
    match json_text::decode(text) {
        Some(parsed) => render(&parsed),
        None => format_multiline(text),
    }
}

fn render_object(map: &Map<String, Value>) -> String {
    // Pre-rendered payloads carry their final text and nothing else matters
    if let Some(Value::String(text)) = map.get(TEXT_KEY) {
        return render_text(text);
    }
    join_blocks(map.iter().map(|(key, value)| format_entry(key, value)))
}

fn format_entry(key: &str, value: &Value) -> String {
    let rendered = render(value);
    if rendered.is_empty() {
        return String::new();
    }
    let label = prettify_key(key);
    if rendered.contains('\n') {
        format!("{label}:\n{}", indent_lines(&rendered))
    } else {
        format!("{label}: {rendered}")
    }
}

fn join_blocks(blocks: impl Iterator<Item = String>) -> String {
    blocks
        .filter(|block| !block.trim().is_empty())
        .collect::<Vec<_>>()
        .join(BLOCK_SEPARATOR)
}

fn indent_lines(text: &str) -> String {
    text.split('\n')
        .map(|line| {
            if line.trim().is_empty() {
                line.to_string()
            } else {
                format!("{INDENT}{line}")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Literal `\n` escapes left over from upstream serialization become real line breaks.
fn format_multiline(text: &str) -> String {
    text.replace("\\n", "\n").trim().to_string()
}

fn capitalize_words(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_word = false;
    for c in text.chars() {
        let is_word_char = c.is_ascii_alphanumeric() || c == '_';
        if is_word_char && !in_word {
            out.push(c.to_ascii_uppercase());
        } else {
            out.push(c);
        }
        in_word = is_word_char;
    }
    out
}

/// Numbers print the way JavaScript's `String(n)` does: plain decimals from
/// 1e-6 up to 1e21, exponent notation outside, and `-0` as `0`.
fn format_number(n: &Number) -> String {
    match n.as_f64() {
        Some(f) if n.is_f64() => format_float(f),
        _ => n.to_string(),
    }
}

fn format_float(f: f64) -> String {
    if f == 0.0 {
        return "0".to_string();
    }
    if !f.is_finite() {
        return f.to_string();
    }
    if f.is_sign_negative() {
        return format!("-{}", format_float(-f));
    }

    // `{:e}` yields the shortest round-trip digits, e.g. `1.2345e-7`
    let scientific = format!("{f:e}");
    let Some((mantissa, exponent)) = scientific.split_once('e') else {
        return scientific;
    };
    let Ok(exponent) = exponent.parse::<i32>() else {
        return scientific;
    };
    let digits: String = mantissa.chars().filter(char::is_ascii_digit).collect();
    let k = digits.len() as i32;
    // Decimal point position relative to the start of `digits`
    let n = exponent + 1;

    if k <= n && n <= 21 {
        format!("{digits}{}", "0".repeat((n - k) as usize))
    } else if 0 < n && n <= 21 {
        let (int, frac) = digits.split_at(n as usize);
        format!("{int}.{frac}")
    } else if -6 < n && n <= 0 {
        format!("0.{}{digits}", "0".repeat((-n) as usize))
    } else {
        let sign = if n - 1 < 0 { '-' } else { '+' };
        let (first, rest) = digits.split_at(1);
        if rest.is_empty() {
            format!("{first}e{sign}{}", (n - 1).abs())
        } else {
            format!("{first}.{rest}e{sign}{}", (n - 1).abs())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::envelope::{AnalysisEnvelope, extract_analysis};
    use serde_json::json;

    #[test]
    fn test_empty_values() {
        assert_eq!(render(&Value::Null), "");
        assert_eq!(render(&json!("")), "");
        assert_eq!(render(&json!("   ")), "");
        assert_eq!(render(&json!([])), "");
        assert_eq!(render(&json!({})), "");
        assert_eq!(to_readable_text(&Value::Null), NO_RESULT_PLACEHOLDER);
        assert_eq!(to_readable_text(&json!([null, "", {}])), NO_RESULT_PLACEHOLDER);
    }

    #[test]
    fn test_scalars() {
        assert_eq!(render(&json!(true)), "true");
        assert_eq!(render(&json!(42)), "42");
        assert_eq!(render(&json!(-3)), "-3");
        assert_eq!(render(&json!(10.0)), "10");
        assert_eq!(render(&json!(0.25)), "0.25");
        assert_eq!(render(&json!(123.456)), "123.456");
        assert_eq!(render(&json!("  spaced out  ")), "spaced out");
    }

    #[test]
    fn test_numbers_follow_js_string_conversion() {
        let rendered = |raw: &str| render(&serde_json::from_str::<Value>(raw).unwrap());
        assert_eq!(rendered("-0"), "0");
        assert_eq!(rendered("-0.0"), "0");
        assert_eq!(rendered("0.000001"), "0.000001");
        assert_eq!(rendered("0.0000001"), "1e-7");
        assert_eq!(rendered("0.00012345"), "0.00012345");
        assert_eq!(rendered("-1.5e-7"), "-1.5e-7");
        assert_eq!(rendered("123.0"), "123");
        assert_eq!(rendered("1e20"), "100000000000000000000");
        assert_eq!(rendered("1e21"), "1e+21");
        assert_eq!(rendered("1.5e300"), "1.5e+300");
        assert_eq!(rendered("-2.75"), "-2.75");
        assert_eq!(rendered("18446744073709551615"), "18446744073709551615");
    }

    #[test]
    fn test_json_array_string() {
        assert_eq!(render(&json!(r#"["a","b"]"#)), "a\n\nb");
    }

    #[test]
    fn test_invalid_json_like_string_falls_back_to_text() {
        assert_eq!(render(&json!("{not json}")), "{not json}");
        assert_eq!(render(&json!("[draft]\\nsecond line")), "[draft]\nsecond line");
    }

    #[test]
    fn test_literal_newlines_are_indented() {
        assert_eq!(
            render(&json!({"notes": "line1\\nline2"})),
            "Notes:\n  line1\n  line2"
        );
    }

    #[test]
    fn test_text_field_short_circuits() {
        let value = json!({"summary": "ignored", "text": "raw passthrough", "score": 7});
        assert_eq!(render(&value), "raw passthrough");

        // a non-string text field is just another entry
        let value = json!({"text": 5, "score": 7});
        assert_eq!(render(&value), "Text: 5\n\nScore: 7");
    }

    #[test]
    fn test_nested_objects() {
        let value = json!({
            "stock": "AAPL",
            "price_data": {"current_price": 189.5, "change-pct": "1.2%"},
            "risk_factors": ["supply chain", null, "", "regulation"],
            "empty_section": {}
        });
        let expected = "Stock: AAPL\n\n\
                        Price Data:\n  Current Price: 189.5\n\n  Change Pct: 1.2%\n\n\
                        Risk Factors:\n  supply chain\n\n  regulation";
        assert_eq!(render(&value), expected);
    }

    #[test]
    fn test_double_encoded_object_string() {
        let value = json!({"analysis": "{\"verdict\": \"hold\", \"confidence\": 0.6}"});
        assert_eq!(render(&value), "Analysis:\n  Verdict: hold\n\n  Confidence: 0.6");
    }

    #[test]
    fn test_prettify_key() {
        assert_eq!(prettify_key("price_data"), "Price Data");
        assert_eq!(prettify_key("__risk--level__"), "Risk Level");
        assert_eq!(prettify_key("  technical   analysis "), "Technical Analysis");
        assert_eq!(prettify_key("52_week_high"), "52 Week High");
        assert_eq!(prettify_key("peRatio"), "PeRatio");
        assert_eq!(prettify_key("价格_趋势"), "价格 趋势");
    }

    #[test]
    fn test_indent_keeps_blank_lines() {
        assert_eq!(indent_lines("a\n\nb"), "  a\n\n  b");
    }

    #[test]
    fn test_render_extracted_analysis_never_panics() {
        let payloads = [
            json!(null),
            json!([]),
            json!([{}]),
            json!({"extractedJson": {"stock": "AAPL", "notes": ["x", {"text": "y"}]}}),
            json!([{"extractedJson": "{\"deep\": [[[\"z\"]]]}"}]),
            json!({"stock": {"a": {"b": {"c": [1, 2.5, false]}}}}),
        ];
        for payload in payloads {
            let analysis = extract_analysis(&AnalysisEnvelope::from(payload));
            let _ = render(&Value::Object(analysis));
        }
    }
}

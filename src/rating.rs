use serde_json::Value;

/// Pulls the first run of ASCII digits out of a scraped text field.
///
/// Anything that is not a JSON string (missing, null, numbers, objects) yields 0,
/// as does text without a digit. Overlong digit runs saturate instead of failing.
pub fn extract_rating(value: Option<&Value>) -> u64 {
    match value {
        Some(Value::String(text)) => rating_from_text(text),
        _ => 0,
    }
}

/// Reads a count that may arrive as a JSON number or as text such as `"312"` or `"__"`.
pub fn extract_count(value: Option<&Value>) -> u64 {
    match value {
        Some(Value::Number(number)) => number
            .as_u64()
            .or_else(|| number.as_f64().filter(|n| n.is_finite() && *n > 0.0).map(|n| n as u64))
            .unwrap_or(0),
        other => extract_rating(other),
    }
}

/// First digit run of `text`, or 0.
pub fn rating_from_text(text: &str) -> u64 {
    let mut value: u64 = 0;
    let mut in_run = false;

    for byte in text.bytes() {
        if byte.is_ascii_digit() {
            in_run = true;
            value = value
                .saturating_mul(10)
                .saturating_add(u64::from(byte - b'0'));
        } else if in_run {
            break;
        }
    }

    value
}

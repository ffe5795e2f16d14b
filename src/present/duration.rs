//! Duration parsing and age formatting

use std::time::Duration;

use chrono::{DateTime, Utc};

/// Parse a Flux interval such as `1h30m` or `10m5s`
///
/// Sums every `<number><h|m|s>` pair; anything else is ignored, so an
/// unparseable string yields zero.
pub fn parse_duration(input: &str) -> Duration {
    let mut total = 0u64;
    let mut digits = String::new();

    for c in input.chars() {
        if c.is_ascii_digit() {
            digits.push(c);
            continue;
        }
        let multiplier = match c {
            'h' => Some(3600),
            'm' => Some(60),
            's' => Some(1),
            _ => None,
        };
        if let (Some(multiplier), Ok(value)) = (multiplier, digits.parse::<u64>()) {
            total = total.saturating_add(value.saturating_mul(multiplier));
        }
        digits.clear();
    }

    Duration::from_secs(total)
}

/// Compact age of `then` relative to `now`: `42s`, `5m`, `3h`, `12d`
pub fn time_ago(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let secs = (now - then).num_seconds().max(0);
    match secs {
        s if s < 60 => format!("{}s", s),
        s if s < 3600 => format!("{}m", s / 60),
        s if s < 86400 => format!("{}h", s / 3600),
        s => format!("{}d", s / 86400),
    }
}

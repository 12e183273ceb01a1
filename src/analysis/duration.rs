//! Declared duration strings (`M:SS`) to seconds and back

/// Parse a declared `M:SS` / `MM:SS` duration into seconds
///
/// Anything that is not exactly two `:`-separated integers yields `0.0`,
/// which callers treat as "no usable duration".
pub fn parse_declared_duration(value: &str) -> f64 {
    let parts: Vec<&str> = value.split(':').collect();
    if parts.len() != 2 {
        log::warn!("Invalid duration format: {:?}", value);
        return 0.0;
    }

    match (
        parts[0].trim().parse::<i64>(),
        parts[1].trim().parse::<i64>(),
    ) {
        (Ok(minutes), Ok(seconds)) => match minutes
            .checked_mul(60)
            .and_then(|m| m.checked_add(seconds))
        {
            Some(total) => total as f64,
            None => {
                log::warn!("Duration out of range: {:?}", value);
                0.0
            }
        },
        _ => {
            log::warn!("Could not parse duration: {:?}", value);
            0.0
        }
    }
}

/// Format seconds as `M:SS`, rounded to the nearest second
///
/// Unknown durations render as `0:00`.
pub fn format_duration(seconds: Option<f64>) -> String {
    let Some(seconds) = seconds else {
        return "0:00".to_string();
    };

    let total = (seconds + 0.5).floor().max(0.0) as u64;
    format!("{}:{:02}", total / 60, total % 60)
}

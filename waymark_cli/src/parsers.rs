use std::time::Duration;

use jiff::{SignedDuration, Span, SpanRelativeTo};

fn parse_signed_duration(input: &str) -> Option<SignedDuration> {
    input
        .parse::<SignedDuration>()
        .ok()
        .or_else(|| {
            input
                .parse::<Span>()
                .and_then(|span| span.to_duration(SpanRelativeTo::days_are_24_hours()))
                .ok()
        })
        .or_else(|| input.parse::<i64>().ok().map(SignedDuration::from_secs))
}

/// Parses request timeouts and simulation ticks: "200ms", "PT30S" or a
/// number of seconds. Both must be strictly positive.
pub fn parse_duration(input: &str) -> Result<Duration, String> {
    let duration = parse_signed_duration(input.trim())
        .ok_or_else(|| format!("Invalid duration \"{input}\""))?;

    if !duration.is_positive() {
        return Err(format!("Duration \"{input}\" must be greater than zero"));
    }

    Duration::try_from(duration).map_err(|err| err.to_string())
}

use crate::config::DisplayConfig;

/// Shown for every failed submission, whatever the underlying cause.
pub const FAILURE_MESSAGE: &str = "An error occurred while requesting the prediction.";

/// Rounds `value` to the nearest multiple of `step`, halves away from zero.
///
/// Stays in `f64` so predictions beyond the `i64` range keep their magnitude.
pub fn round_to_step(value: f64, step: u64) -> f64 {
    let step = step.max(1) as f64;
    // `+ 0.0` folds a negative zero into zero.
    (value / step).round() * step + 0.0
}

/// Formats a whole number with `,` between thousands groups.
pub fn group_thousands(value: f64) -> String {
    let digits = format!("{:.0}", value.abs());
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if value < 0.0 && digits != "0" {
        grouped.push('-');
    }

    let lead = digits.len() % 3;
    for (idx, ch) in digits.chars().enumerate() {
        if idx != 0 && (idx + 3 - lead) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

/// User-facing sentence for a successful prediction.
pub fn format_estimate(prediction: f64, config: &DisplayConfig) -> String {
    let amount = group_thousands(round_to_step(prediction, config.rounding));
    format!(
        "The estimated price is around {amount} {}",
        config.currency
    )
}

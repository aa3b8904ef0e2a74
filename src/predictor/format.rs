/// Renders minutes since midnight as a 12-hour clock, e.g. `390.0 -> "06:30 AM"`.
///
/// Both the hour and the minute use floored modulo, so negative inputs wrap
/// back into the previous day.
pub fn minutes_to_time(minutes: f64) -> String {
    if !minutes.is_finite() {
        return "Invalid time".to_string();
    }
    let hours = minutes.div_euclid(60.0).rem_euclid(24.0) as u32;
    let mins = minutes.rem_euclid(60.0) as u32;
    let period = if hours < 12 { "AM" } else { "PM" };
    let hours = match hours % 12 {
        0 => 12,
        h => h,
    };
    format!("{hours:02}:{mins:02} {period}")
}

/// One decimal place; non-finite values render as `nan`, `inf` and `-inf`.
pub fn one_decimal(value: f64) -> String {
    if value.is_nan() {
        "nan".to_string()
    } else {
        format!("{value:.1}")
    }
}

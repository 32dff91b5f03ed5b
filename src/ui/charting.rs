/// X (seconds) and Y (WPM) bounds for the results chart. An empty series
/// spans the time limit, or one second for untimed runs.
pub fn compute_chart_params(wpm_coords: &[(f64, f64)], time_limit: Option<f64>) -> (f64, f64) {
    let highest_wpm = wpm_coords
        .iter()
        .map(|&(_, wpm)| wpm)
        .fold(0.0_f64, f64::max);

    let overall_duration = wpm_coords
        .last()
        .map(|&(t, _)| t)
        .or(time_limit)
        .unwrap_or(1.0)
        .max(1.0);

    (overall_duration, highest_wpm.round())
}

/// Format a simple numeric label consistently
pub fn format_label(val: f64) -> String {
    if (val - val.round()).abs() < f64::EPSILON {
        format!("{}", val.round())
    } else {
        format!("{val:.2}")
    }
}

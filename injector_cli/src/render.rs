//! Text and JSON rendering of a characterization report.

use injector_core::{
    ChartPoint, Characterization, DisplayPrecision, RowReport, Summary, fmt_input, fmt_value,
};
use serde_json::{Value, json};

const HEADERS: [&str; 10] = [
    "id",
    "injections",
    "pw_ms",
    "mass_g",
    "fit",
    "mg/pulse",
    "model_mg",
    "err_%",
    "model_pw_ms",
    "adder_ms",
];

fn row_cells(r: &RowReport, p: DisplayPrecision) -> Vec<String> {
    let row = &r.row;
    let mut cells = vec![
        row.id.to_string(),
        fmt_input(row.injections),
        fmt_input(row.pulse_width_ms),
        fmt_input(row.total_mass_g),
        if row.include_in_fit { "yes" } else { "no" }.to_string(),
    ];
    match &r.metrics {
        Some(m) => cells.extend([
            fmt_value(m.actual_mass_per_pulse_mg, p.decimals),
            fmt_value(m.modeled_mass_per_pulse_mg, p.decimals),
            fmt_value(m.percent_error, p.decimals),
            fmt_value(m.modeled_pulse_width_ms, p.small_pulse_decimals),
            fmt_value(m.small_pulse_adder_ms, p.small_pulse_decimals),
        ]),
        None => cells.extend(std::iter::repeat_n(String::new(), 5)),
    }
    cells
}

/// Render the row table and the summary block as plain text.
pub fn table(rep: &Characterization, p: DisplayPrecision) -> String {
    let body: Vec<Vec<String>> = rep.rows.iter().map(|r| row_cells(r, p)).collect();
    let mut widths: Vec<usize> = HEADERS.iter().map(|h| h.len()).collect();
    for cells in &body {
        for (w, c) in widths.iter_mut().zip(cells) {
            *w = (*w).max(c.len());
        }
    }

    let line = |cells: &[String]| -> String {
        let padded: Vec<String> = cells
            .iter()
            .zip(&widths)
            .map(|(c, &w)| format!("{c:>w$}"))
            .collect();
        padded.join("  ").trim_end().to_string()
    };

    let mut out = String::new();
    let head: Vec<String> = HEADERS.iter().map(ToString::to_string).collect();
    out.push_str(&line(&head));
    out.push('\n');
    for cells in &body {
        out.push_str(&line(cells));
        out.push('\n');
    }
    out.push('\n');
    out.push_str(&summary(&rep.summary, p));
    out
}

pub fn summary(s: &Summary, p: DisplayPrecision) -> String {
    let d = p.decimals;
    format!(
        "flow rate: {} g/s ({} cc/min)\ndeadtime: {} ms\nrows in fit: {}\nrms residual: {} mg\n",
        fmt_value(s.flow_rate_g_per_s, d),
        fmt_value(s.flow_rate_cc_per_min, d),
        fmt_value(s.deadtime_ms, d),
        s.included_rows,
        fmt_value(s.rms_residual_mg, p.small_pulse_decimals),
    )
}

/// Finite numbers as JSON numbers, everything else as `null`.
fn num(v: f64) -> Value {
    if v.is_finite() { json!(v) } else { Value::Null }
}

fn opt(v: Option<f64>) -> Value {
    v.map_or(Value::Null, num)
}

fn points(ps: &[ChartPoint]) -> Value {
    Value::Array(
        ps.iter()
            .map(|pt| {
                json!({
                    "pulse_width_ms": num(pt.pulse_width_ms),
                    "mass_per_pulse_mg": num(pt.mass_per_pulse_mg),
                    "included": pt.included,
                })
            })
            .collect(),
    )
}

pub fn summary_json(s: &Summary) -> Value {
    json!({
        "flow_rate_g_per_s": num(s.flow_rate_g_per_s),
        "flow_rate_cc_per_min": num(s.flow_rate_cc_per_min),
        "deadtime_ms": num(s.deadtime_ms),
        "included_rows": s.included_rows,
        "rms_residual_mg": num(s.rms_residual_mg),
    })
}

/// Full report as one JSON document; undefined values are `null`.
pub fn report_json(rep: &Characterization) -> Value {
    let rows: Vec<Value> = rep
        .rows
        .iter()
        .map(|r| {
            let metrics = r.metrics.as_ref().map_or(Value::Null, |m| {
                json!({
                    "actual_mass_per_pulse_mg": num(m.actual_mass_per_pulse_mg),
                    "modeled_mass_per_pulse_mg": num(m.modeled_mass_per_pulse_mg),
                    "percent_error": num(m.percent_error),
                    "modeled_pulse_width_ms": num(m.modeled_pulse_width_ms),
                    "small_pulse_adder_ms": num(m.small_pulse_adder_ms),
                })
            });
            json!({
                "id": r.row.id.get(),
                "injections": opt(r.row.injections),
                "pulse_width_ms": opt(r.row.pulse_width_ms),
                "total_mass_g": opt(r.row.total_mass_g),
                "include_in_fit": r.row.include_in_fit,
                "metrics": metrics,
            })
        })
        .collect();
    json!({
        "rows": rows,
        "measured": points(&rep.measured),
        "fitted": points(&rep.fitted),
        "summary": summary_json(&rep.summary),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use injector_core::{Calibrator, Field};

    fn two_row_report() -> Characterization {
        let mut cal = Calibrator::new();
        for (pw, m) in [("2", "0.02"), ("4", "0.06")] {
            let id = cal.store().last_id();
            cal.update(id, Field::Injections, "10").unwrap();
            cal.update(id, Field::PulseWidthMs, pw).unwrap();
            cal.update(id, Field::TotalMassG, m).unwrap();
        }
        cal.report()
    }

    #[test]
    fn table_blanks_open_row_and_prints_summary() {
        let text = table(&two_row_report(), DisplayPrecision::default());
        assert!(!text.contains("NaN"));
        assert!(text.contains("flow rate: 2.0 g/s (166.7 cc/min)"));
        assert!(text.contains("deadtime: 1.0 ms"));
        // header + 3 rows, then blank line + summary
        let open_row = text.lines().nth(3).unwrap();
        assert!(open_row.trim_start().starts_with('2'));
        assert!(open_row.ends_with("yes"));
    }

    #[test]
    fn json_uses_null_for_undefined() {
        let rep = Calibrator::new().report();
        let v = report_json(&rep);
        assert!(v["summary"]["deadtime_ms"].is_null());
        assert!(v["rows"][0]["metrics"].is_null());
        assert!(v["rows"][0]["injections"].is_null());
        assert_eq!(v["fitted"].as_array().unwrap().len(), 0);

        let v = report_json(&two_row_report());
        assert!((v["summary"]["deadtime_ms"].as_f64().unwrap() - 1.0).abs() < 1e-9);
        assert_eq!(v["measured"].as_array().unwrap().len(), 2);
    }
}

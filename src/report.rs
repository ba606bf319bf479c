//! Static, shareable training artifacts: a JSON step trace for external
//! tooling and a single-file HTML report embedding the SVG charts.

use std::fmt::Write;

use crate::{params::ParamMap, training::StepState};

/// Serializes step snapshots as a pretty-printed JSON array.
///
/// Each element carries the step index, mean loss, post-update parameters,
/// and averaged gradients, with map keys in parameter insertion order.
///
/// # Errors
/// Returns the underlying `serde_json` error if serialization fails.
pub fn trace_json(states: &[StepState]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(states)
}

/// One trained scenario's contribution to the HTML report.
pub struct ReportSection {
    pub title: String,
    pub description: String,
    pub fit_svg: String,
    pub loss_svg: String,
    pub final_loss: Option<f64>,
    pub final_params: ParamMap,
}

fn params_inline(params: &ParamMap) -> String {
    let mut out = String::new();
    for (i, (name, value)) in params.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        let _ = write!(out, "{name} = {value:.4}");
    }
    out
}

/// Renders a standalone HTML page: a summary table of final losses and
/// parameters, then one section per scenario with its charts inlined.
pub fn render_report(title: &str, sections: &[ReportSection]) -> String {
    let mut rows = String::new();
    for section in sections {
        let final_loss = match section.final_loss {
            Some(loss) => format!("{loss:.6}"),
            None => "-".to_owned(),
        };
        let _ = write!(
            rows,
            "<tr><td>{}</td><td>{}</td><td>{}</td></tr>",
            section.title,
            final_loss,
            params_inline(&section.final_params)
        );
    }

    let mut body = String::new();
    for section in sections {
        let _ = write!(
            body,
            r#"<section>
<h2>{}</h2>
<p>{}</p>
<div class="charts">{}{}</div>
</section>
"#,
            section.title, section.description, section.fit_svg, section.loss_svg
        );
    }

    format!(
        r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>{title}</title>
<style>
body {{ font-family: sans-serif; max-width: 1400px; margin: 2em auto; padding: 0 1em; }}
table {{ border-collapse: collapse; margin-bottom: 2em; }}
td, th {{ border: 1px solid #999; padding: 4px 10px; text-align: left; }}
.charts {{ display: flex; flex-wrap: wrap; gap: 1em; }}
.charts svg {{ max-width: 100%; height: auto; flex: 1 1 480px; }}
</style>
</head>
<body>
<h1>{title}</h1>
<table>
<tr><th>scenario</th><th>final loss</th><th>final parameters</th></tr>
{rows}
</table>
{body}</body>
</html>
"#
    )
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::training::StepState;

    #[test]
    fn test_trace_json_round_trips_as_generic_json() {
        let states = vec![
            StepState::new(
                0,
                4.0,
                ParamMap::from([("w", 1.0), ("b", 0.5)]),
                ParamMap::from([("w", -2.0), ("b", -1.0)]),
            ),
            StepState::new(
                1,
                2.0,
                ParamMap::from([("w", 1.2), ("b", 0.6)]),
                ParamMap::from([("w", -1.0), ("b", -0.5)]),
            ),
        ];

        let json = trace_json(&states).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        let steps = value.as_array().unwrap();
        assert_eq!(steps.len(), 2);
        assert_eq!(steps[0]["step"], 0);
        assert_eq!(steps[0]["loss"], 4.0);
        assert_eq!(steps[1]["params"]["w"], 1.2);
        assert_eq!(steps[1]["grads"]["b"], -0.5);
    }

    #[test]
    fn test_report_embeds_charts_and_summary() {
        let sections = vec![ReportSection {
            title: "single_point".to_owned(),
            description: "Single point fit.".to_owned(),
            fit_svg: "<svg id=\"fit\"></svg>".to_owned(),
            loss_svg: "<svg id=\"loss\"></svg>".to_owned(),
            final_loss: Some(0.125),
            final_params: ParamMap::from([("w", 3.9), ("b", 1.9)]),
        }];

        let html = render_report("nanograd report", &sections);

        assert!(html.contains("<!DOCTYPE html>"));
        assert!(html.contains("nanograd report"));
        assert!(html.contains("<svg id=\"fit\">"));
        assert!(html.contains("<svg id=\"loss\">"));
        assert!(html.contains("0.125000"));
        assert!(html.contains("w = 3.9000, b = 1.9000"));
    }

    #[test]
    fn test_report_marks_missing_final_loss() {
        let sections = vec![ReportSection {
            title: "empty".to_owned(),
            description: String::new(),
            fit_svg: String::new(),
            loss_svg: String::new(),
            final_loss: None,
            final_params: ParamMap::new(),
        }];

        let html = render_report("report", &sections);
        assert!(html.contains("<td>-</td>"));
    }
}

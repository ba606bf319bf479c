//! SVG chart rendering for trained scenarios.
//!
//! Renderers are pure: they take data and parameters and return a standalone
//! SVG document as a `String`. Writing files is the caller's job, which keeps
//! the charts usable from tests, the CLI, and the HTML report alike.

use std::fmt::Write;

use crate::{
    params::{DataPoint, ParamMap},
    training::Predictor,
};

const WIDTH: f64 = 640.0;
const HEIGHT: f64 = 420.0;
const MARGIN: f64 = 52.0;
const LINE_SAMPLES: usize = 50;

const DATA_COLOR: &str = "#000000";
const INITIAL_COLOR: &str = "#1f77b4";
const TRAINED_COLOR: &str = "#ff7f0e";

/// Maps data coordinates into the SVG pixel frame (y axis flipped).
struct Frame {
    x_min: f64,
    x_max: f64,
    y_min: f64,
    y_max: f64,
}

impl Frame {
    fn new(x_range: (f64, f64), y_range: (f64, f64)) -> Self {
        Self {
            x_min: x_range.0,
            x_max: x_range.1,
            y_min: y_range.0,
            y_max: y_range.1,
        }
    }

    fn sx(&self, x: f64) -> f64 {
        MARGIN + (x - self.x_min) / (self.x_max - self.x_min) * (WIDTH - 2.0 * MARGIN)
    }

    fn sy(&self, y: f64) -> f64 {
        HEIGHT - MARGIN - (y - self.y_min) / (self.y_max - self.y_min) * (HEIGHT - 2.0 * MARGIN)
    }
}

/// Pads a value range by 20% so lines don't touch the plot edges, which
/// makes slopes and intercepts easier to read at a glance.
fn padded_range(values: impl IntoIterator<Item = f64>) -> (f64, f64) {
    let mut lo = f64::INFINITY;
    let mut hi = f64::NEG_INFINITY;
    for v in values {
        lo = lo.min(v);
        hi = hi.max(v);
    }
    if !lo.is_finite() || !hi.is_finite() {
        return (0.0, 1.0);
    }
    if lo == hi {
        lo -= 1.0;
        hi += 1.0;
    }
    let pad = 0.2 * (hi - lo);
    (lo - pad, hi + pad)
}

fn svg_open(svg: &mut String) {
    let _ = write!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {WIDTH} {HEIGHT}" font-family="sans-serif">"#
    );
    let _ = write!(
        svg,
        r#"<rect width="{WIDTH}" height="{HEIGHT}" fill="white"/>"#
    );
}

fn svg_axes(svg: &mut String, title: &str, x_label: &str, y_label: &str) {
    let x0 = MARGIN;
    let x1 = WIDTH - MARGIN;
    let y0 = HEIGHT - MARGIN;
    let y1 = MARGIN;
    let _ = write!(
        svg,
        r##"<line x1="{x0}" y1="{y0}" x2="{x1}" y2="{y0}" stroke="#333" stroke-width="1"/>"##
    );
    let _ = write!(
        svg,
        r##"<line x1="{x0}" y1="{y0}" x2="{x0}" y2="{y1}" stroke="#333" stroke-width="1"/>"##
    );
    let _ = write!(
        svg,
        r#"<text x="{}" y="28" text-anchor="middle" font-size="15">{title}</text>"#,
        WIDTH / 2.0
    );
    let _ = write!(
        svg,
        r#"<text x="{}" y="{}" text-anchor="middle" font-size="12">{x_label}</text>"#,
        WIDTH / 2.0,
        HEIGHT - 14.0
    );
    let _ = write!(
        svg,
        r#"<text x="16" y="{}" text-anchor="middle" font-size="12" transform="rotate(-90 16 {})">{y_label}</text>"#,
        HEIGHT / 2.0,
        HEIGHT / 2.0
    );
}

fn polyline(svg: &mut String, frame: &Frame, points: &[(f64, f64)], color: &str, dashed: bool) {
    let mut coords = String::new();
    for &(x, y) in points {
        let _ = write!(coords, "{:.2},{:.2} ", frame.sx(x), frame.sy(y));
    }
    let dash = if dashed {
        r#" stroke-dasharray="6 4""#
    } else {
        ""
    };
    let _ = write!(
        svg,
        r#"<polyline points="{}" fill="none" stroke="{color}" stroke-width="2"{dash}/>"#,
        coords.trim_end()
    );
}

fn legend_entry(svg: &mut String, slot: usize, color: &str, dashed: bool, label: &str) {
    let y = MARGIN + 8.0 + slot as f64 * 18.0;
    let x = WIDTH - MARGIN - 110.0;
    let dash = if dashed {
        r#" stroke-dasharray="6 4""#
    } else {
        ""
    };
    let _ = write!(
        svg,
        r#"<line x1="{x}" y1="{y}" x2="{}" y2="{y}" stroke="{color}" stroke-width="2"{dash}/>"#,
        x + 24.0
    );
    let _ = write!(
        svg,
        r#"<text x="{}" y="{}" font-size="12">{label}</text>"#,
        x + 30.0,
        y + 4.0
    );
}

fn sample_line<P: Predictor>(
    predict: &P,
    params: &ParamMap,
    x_min: f64,
    x_max: f64,
) -> Vec<(f64, f64)> {
    (0..LINE_SAMPLES)
        .map(|i| {
            let x = x_min + i as f64 * (x_max - x_min) / (LINE_SAMPLES - 1) as f64;
            (x, predict(x, params))
        })
        .collect()
}

/// Renders a scenario's data scatter with the model's prediction line before
/// (dashed) and after (solid) training.
pub fn fit_chart<P: Predictor>(
    title: &str,
    data: &[DataPoint],
    predict: P,
    initial: &ParamMap,
    trained: &ParamMap,
) -> String {
    let (x_min, x_max) = padded_range(data.iter().map(|&(x, _)| x));
    let initial_line = sample_line(&predict, initial, x_min, x_max);
    let trained_line = sample_line(&predict, trained, x_min, x_max);

    let y_range = padded_range(
        data.iter()
            .map(|&(_, y)| y)
            .chain(initial_line.iter().map(|&(_, y)| y))
            .chain(trained_line.iter().map(|&(_, y)| y)),
    );
    let frame = Frame::new((x_min, x_max), y_range);

    let mut svg = String::new();
    svg_open(&mut svg);
    svg_axes(&mut svg, title, "x", "y");
    polyline(&mut svg, &frame, &initial_line, INITIAL_COLOR, true);
    polyline(&mut svg, &frame, &trained_line, TRAINED_COLOR, false);
    for &(x, y) in data {
        let _ = write!(
            svg,
            r#"<circle cx="{:.2}" cy="{:.2}" r="4" fill="{DATA_COLOR}"/>"#,
            frame.sx(x),
            frame.sy(y)
        );
    }
    legend_entry(&mut svg, 0, INITIAL_COLOR, true, "initial");
    legend_entry(&mut svg, 1, TRAINED_COLOR, false, "trained");
    svg.push_str("</svg>");
    svg
}

/// Renders the per-step mean-loss history as a single polyline.
pub fn loss_chart(title: &str, history: &[f64]) -> String {
    let mut svg = String::new();
    svg_open(&mut svg);
    svg_axes(&mut svg, title, "step", "mean loss");

    if !history.is_empty() {
        let x_max = (history.len() - 1).max(1) as f64;
        // Anchor the y axis at zero so "how close to zero" stays readable.
        let (_, y_hi) = padded_range(history.iter().copied());
        let frame = Frame::new((0.0, x_max), (0.0, y_hi.max(1e-12)));

        let points: Vec<_> = history
            .iter()
            .enumerate()
            .map(|(i, &loss)| (i as f64, loss))
            .collect();
        polyline(&mut svg, &frame, &points, INITIAL_COLOR, false);

        let _ = write!(
            svg,
            r#"<text x="{}" y="{}" text-anchor="end" font-size="12">final loss = {:.4}</text>"#,
            WIDTH - MARGIN - 6.0,
            MARGIN + 16.0,
            history[history.len() - 1]
        );
    }

    svg.push_str("</svg>");
    svg
}

/// Renders the finite-difference trade-off picture: a smooth curve, a base
/// point x0, and one secant per `eps` value. Wide secants are visibly biased
/// by curvature; narrow ones hug the true tangent.
pub fn eps_secant_chart(eps_values: &[f64]) -> String {
    // A simple smooth function with visible curvature.
    let f = |x: f64| (x - 1.5).powi(2) + 1.0;
    let true_slope = |x: f64| 2.0 * (x - 1.5);
    let x0 = 1.0;

    let curve: Vec<_> = (0..=400)
        .map(|i| {
            let x = -0.5 + i as f64 / 100.0;
            (x, f(x))
        })
        .collect();

    let (x_min, x_max) = padded_range(curve.iter().map(|&(x, _)| x));
    let y_range = padded_range(curve.iter().map(|&(_, y)| y));
    let frame = Frame::new((x_min, x_max), y_range);

    let mut svg = String::new();
    svg_open(&mut svg);
    svg_axes(&mut svg, "Finite difference: eps trade-off", "x", "f(x)");
    polyline(&mut svg, &frame, &curve, DATA_COLOR, false);

    let colors = [TRAINED_COLOR, INITIAL_COLOR, "#2ca02c", "#d62728"];
    for (i, &eps) in eps_values.iter().enumerate() {
        let color = colors[i % colors.len()];
        let secant = [(x0, f(x0)), (x0 + eps, f(x0 + eps))];
        polyline(&mut svg, &frame, &secant, color, true);
        legend_entry(&mut svg, i, color, true, &format!("eps = {eps}"));
    }

    let _ = write!(
        svg,
        r##"<circle cx="{:.2}" cy="{:.2}" r="4" fill="#d62728"/>"##,
        frame.sx(x0),
        frame.sy(f(x0))
    );
    let _ = write!(
        svg,
        r#"<text x="{}" y="{}" font-size="12">true slope at x0 = {:.3}</text>"#,
        MARGIN + 6.0,
        HEIGHT - MARGIN - 8.0,
        true_slope(x0)
    );
    svg.push_str("</svg>");
    svg
}

#[cfg(test)]
mod test {
    use super::*;

    fn predict(x: f64, p: &ParamMap) -> f64 {
        p["w"] * x + p["b"]
    }

    #[test]
    fn test_fit_chart_draws_data_and_both_lines() {
        let data = [(0.0, 1.0), (1.0, 3.0), (2.0, 5.0)];
        let initial = ParamMap::from([("w", 0.0), ("b", 0.0)]);
        let trained = ParamMap::from([("w", 2.0), ("b", 1.0)]);

        let svg = fit_chart("with_bias", &data, predict, &initial, &trained);

        assert!(svg.starts_with("<svg"));
        assert!(svg.ends_with("</svg>"));
        assert_eq!(svg.matches("<circle").count(), data.len());
        assert_eq!(svg.matches("<polyline").count(), 2);
        assert!(svg.contains("stroke-dasharray"));
        assert!(svg.contains("with_bias"));
    }

    #[test]
    fn test_loss_chart_handles_empty_history() {
        let svg = loss_chart("empty", &[]);
        assert!(svg.starts_with("<svg"));
        assert!(!svg.contains("<polyline"));
    }

    #[test]
    fn test_loss_chart_plots_one_point_per_step() {
        let svg = loss_chart("loss", &[4.0, 2.0, 1.0]);
        assert!(svg.contains("<polyline"));
        assert!(svg.contains("final loss = 1.0000"));
    }

    #[test]
    fn test_eps_secant_chart_labels_every_eps() {
        let svg = eps_secant_chart(&[0.5, 0.1, 0.01]);
        for label in ["eps = 0.5", "eps = 0.1", "eps = 0.01"] {
            assert!(svg.contains(label), "missing {label}");
        }
    }
}

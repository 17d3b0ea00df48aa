use crate::engine::AnalysisReport;
use crate::metrics::ComparisonView;
use crate::report::{PresentError, Presenter};
use chrono::{Datelike, NaiveDate};
use std::path::PathBuf;
use tracing::info;

const WIDTH: f64 = 720.0;
const HEIGHT: f64 = 360.0;
const PADDING: f64 = 48.0;
const BENCHMARK_COLOR: &str = "#ff9933";
const STRATEGY_COLOR: &str = "#348dc1";

struct Line<'a> {
    label: &'a str,
    color: &'static str,
    values: &'a [f64],
}

fn extent(lines: &[Line<'_>]) -> Option<(f64, f64)> {
    let mut min_v = f64::INFINITY;
    let mut max_v = f64::NEG_INFINITY;

    for value in lines.iter().flat_map(|line| line.values.iter()) {
        if value.is_finite() {
            min_v = min_v.min(*value);
            max_v = max_v.max(*value);
        }
    }

    if !min_v.is_finite() || !max_v.is_finite() {
        return None;
    }

    //widen flat ranges
    if min_v == max_v {
        let adjust = if min_v == 0.0 { 1.0 } else { min_v.abs() * 0.1 };
        min_v -= adjust;
        max_v += adjust;
    }

    Some((min_v, max_v))
}

fn scale_y(value: f64, min_v: f64, max_v: f64) -> f64 {
    let inner = HEIGHT - 2.0 * PADDING;
    let norm = (value - min_v) / (max_v - min_v);
    PADDING + (1.0 - norm) * inner
}

fn x_positions(count: usize) -> Vec<f64> {
    let inner = WIDTH - 2.0 * PADDING;
    if count <= 1 {
        return vec![PADDING + inner / 2.0; count];
    }
    let step = inner / (count - 1) as f64;
    (0..count).map(|i| PADDING + i as f64 * step).collect()
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn time_axis(svg: &mut String, dates: &[NaiveDate], xs: &[f64]) {
    let axis_y = HEIGHT - PADDING + 5.0;
    svg.push_str(&format!(
        r##"<line x1="{x1:.2}" y1="{y:.2}" x2="{x2:.2}" y2="{y:.2}" stroke="#000" stroke-width="1" />"##,
        x1 = PADDING,
        x2 = WIDTH - PADDING,
        y = axis_y
    ));

    let mut last_month: Option<(i32, u32)> = None;
    for (date, x) in dates.iter().zip(xs) {
        let key = (date.year(), date.month());
        if last_month == Some(key) {
            continue;
        }
        last_month = Some(key);

        svg.push_str(&format!(
            r##"<line x1="{x:.2}" y1="{y1:.2}" x2="{x:.2}" y2="{y2:.2}" stroke="#dddddd" stroke-width="0.5" />"##,
            x = x,
            y1 = PADDING,
            y2 = HEIGHT - PADDING
        ));
        svg.push_str(&format!(
            r#"<text x="{x:.2}" y="{y:.2}" text-anchor="middle">{label}</text>"#,
            x = x,
            y = axis_y + 14.0,
            label = date.format("%Y-%m")
        ));
    }
}

fn value_axis(svg: &mut String, min_v: f64, max_v: f64) {
    for i in 0..=4 {
        let value = min_v + (max_v - min_v) * i as f64 / 4.0;
        let y = scale_y(value, min_v, max_v);
        svg.push_str(&format!(
            r#"<text x="{x:.2}" y="{y:.2}" text-anchor="end">{value:.1}</text>"#,
            x = PADDING - 6.0,
            y = y + 3.0,
            value = value
        ));
    }
}

fn legend(svg: &mut String, lines: &[Line<'_>]) {
    let x = PADDING + 10.0;
    let mut y = PADDING + 14.0;
    for line in lines {
        svg.push_str(&format!(
            r#"<line x1="{x1:.2}" y1="{y:.2}" x2="{x2:.2}" y2="{y:.2}" stroke="{color}" stroke-width="1.5" />"#,
            x1 = x,
            x2 = x + 20.0,
            y = y - 4.0,
            color = line.color
        ));
        svg.push_str(&format!(
            r##"<text x="{x:.2}" y="{y:.2}" text-anchor="start" fill="#333">{label}</text>"##,
            x = x + 26.0,
            y = y,
            label = escape(line.label)
        ));
        y += 16.0;
    }
}

//standalone svg line chart of both curves, empty for an empty view
pub fn render_chart(view: &ComparisonView, title: &str) -> String {
    if view.is_empty() {
        return String::new();
    }

    let lines = [
        Line {
            label: &view.benchmark_name,
            color: BENCHMARK_COLOR,
            values: &view.benchmark,
        },
        Line {
            label: &view.strategy_name,
            color: STRATEGY_COLOR,
            values: &view.strategy,
        },
    ];

    let Some((min_v, max_v)) = extent(&lines) else {
        return String::new();
    };
    let xs = x_positions(view.len());

    let mut svg = format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {w} {h}"><style>text{{font-family:Arial,sans-serif;font-size:10px;fill:#666}}</style>"#,
        w = WIDTH,
        h = HEIGHT
    );
    svg.push_str(&format!(
        r##"<text x="{x:.2}" y="{y:.2}" text-anchor="middle" font-size="13" fill="#222">{title}</text>"##,
        x = WIDTH / 2.0,
        y = PADDING / 2.0,
        title = escape(title)
    ));

    //where a zero return lands on the value axis
    let baseline = view.scaling.map_or(0.0, |s| s.baseline());
    if baseline >= min_v && baseline <= max_v {
        svg.push_str(&format!(
            r##"<line x1="{x1:.2}" y1="{y:.2}" x2="{x2:.2}" y2="{y:.2}" stroke="#bbbbbb" stroke-width="1" stroke-dasharray="4 3" />"##,
            x1 = PADDING,
            x2 = WIDTH - PADDING,
            y = scale_y(baseline, min_v, max_v)
        ));
    }

    for line in &lines {
        let points = line
            .values
            .iter()
            .zip(&xs)
            .filter(|(value, _)| value.is_finite())
            .map(|(value, x)| format!("{:.2},{:.2}", x, scale_y(*value, min_v, max_v)))
            .collect::<Vec<_>>()
            .join(" ");
        svg.push_str(&format!(
            r#"<polyline fill="none" stroke="{color}" stroke-width="1.5" points="{points}" />"#,
            color = line.color,
            points = points
        ));
    }

    time_axis(&mut svg, &view.dates, &xs);
    value_axis(&mut svg, min_v, max_v);
    legend(&mut svg, &lines);

    svg.push_str("</svg>");
    svg
}

//writes the comparison chart to an svg file
#[derive(Debug, Clone)]
pub struct SvgChartPresenter {
    path: PathBuf,
    title: String,
}

impl SvgChartPresenter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        SvgChartPresenter {
            path: path.into(),
            title: "Comparing benchmark and strategy".to_string(),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }
}

impl Presenter for SvgChartPresenter {
    fn present(&self, report: &AnalysisReport) -> Result<(), PresentError> {
        let Some(view) = report.comparison.view() else {
            info!("Nothing to chart to {:?}", self.path);
            return Ok(());
        };

        std::fs::write(&self.path, render_chart(view, &self.title)).map_err(|source| {
            PresentError::Io {
                path: self.path.clone(),
                source,
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::{AmountTransform, Scaling};

    fn view() -> ComparisonView {
        ComparisonView {
            benchmark_name: "Benchmark".to_string(),
            strategy_name: "Selected stocks".to_string(),
            dates: vec![
                NaiveDate::from_ymd_opt(2023, 11, 30).unwrap(),
                NaiveDate::from_ymd_opt(2023, 12, 1).unwrap(),
                NaiveDate::from_ymd_opt(2023, 12, 4).unwrap(),
            ],
            benchmark: vec![0.0, 1.0, 0.5],
            strategy: vec![0.0, 2.0, -1.0],
            scaling: None,
        }
    }

    #[test]
    fn chart_has_both_curves_and_month_labels() {
        let svg = render_chart(&view(), "M&M vs <index>");
        assert!(svg.starts_with("<svg"));
        assert!(svg.ends_with("</svg>"));
        assert_eq!(svg.matches("<polyline").count(), 2);
        assert!(svg.contains(">2023-11<"));
        assert!(svg.contains(">2023-12<"));
        assert!(svg.contains("Selected stocks"));
        assert!(svg.contains("M&amp;M vs &lt;index&gt;"));
    }

    #[test]
    fn empty_view_renders_nothing() {
        let mut empty = view();
        empty.dates.clear();
        empty.benchmark.clear();
        empty.strategy.clear();
        assert!(render_chart(&empty, "x").is_empty());
    }

    fn baseline_count(svg: &str) -> usize {
        svg.matches("stroke-dasharray").count()
    }

    #[test]
    fn baseline_sits_where_a_zero_return_lands() {
        let mut growth = view();
        growth.benchmark = vec![1000.0, 1010.0, 1005.0];
        growth.strategy = vec![1000.0, 1020.0, 990.0];
        growth.scaling = Some(Scaling {
            amount: 1000.0,
            transform: AmountTransform::Growth,
        });
        assert_eq!(baseline_count(&render_chart(&growth, "x")), 1);

        //magnify maps a zero return to 0, far below the principal
        let mut magnify = view();
        magnify.benchmark = vec![0.0, 1001.0, 500.5];
        magnify.strategy = vec![0.0, 2002.0, -1001.0];
        magnify.scaling = Some(Scaling {
            amount: 1000.0,
            transform: AmountTransform::Magnify,
        });
        let svg = render_chart(&magnify, "x");
        assert_eq!(baseline_count(&svg), 1);

        let dashed = svg
            .split("<line")
            .find(|element| element.contains("stroke-dasharray"))
            .unwrap();
        let zero_y = format!(r#"y1="{:.2}""#, scale_y(0.0, -1001.0, 2002.0));
        assert!(dashed.contains(&zero_y));
    }
}

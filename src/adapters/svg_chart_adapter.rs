//! SVG line chart of the strategy and buy-and-hold equity curves.

use crate::domain::backtest::BacktestResult;
use crate::domain::error::TurtleError;
use crate::domain::metrics::EquityPoint;
use crate::ports::report_port::ReportPort;
use std::fs;
use std::path::PathBuf;
use tracing::info;

const WIDTH: f64 = 960.0;
const HEIGHT: f64 = 480.0;
const PADDING: f64 = 56.0;

pub struct SvgChartAdapter {
    output_path: PathBuf,
}

impl SvgChartAdapter {
    pub fn new(output_path: PathBuf) -> Self {
        Self { output_path }
    }
}

fn polyline(curve: &[EquityPoint], min: f64, scale_x: f64, scale_y: f64) -> String {
    curve
        .iter()
        .enumerate()
        .map(|(i, p)| {
            let x = PADDING + i as f64 * scale_x;
            let y = HEIGHT - PADDING - (p.value - min) * scale_y;
            format!("{:.1},{:.1}", x, y)
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

pub fn render_equity_svg(
    strategy: &[EquityPoint],
    benchmark: &[EquityPoint],
    title: &str,
) -> String {
    let title = escape(title);
    if strategy.is_empty() && benchmark.is_empty() {
        return format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{WIDTH:.0}" height="{HEIGHT:.0}"><text x="{PADDING:.0}" y="{PADDING:.0}">{title}: no equity data available.</text></svg>
"#
        );
    }

    let values = || strategy.iter().chain(benchmark).map(|p| p.value);
    let min = values().fold(f64::INFINITY, f64::min);
    let max = values().fold(f64::NEG_INFINITY, f64::max);

    let plot_width = WIDTH - 2.0 * PADDING;
    let plot_height = HEIGHT - 2.0 * PADDING;

    let range = max - min;
    let scale_y = if range > 0.0 { plot_height / range } else { 1.0 };
    let steps = strategy.len().max(benchmark.len());
    let scale_x = if steps > 1 {
        plot_width / (steps - 1) as f64
    } else {
        0.0
    };

    let axis_bottom = HEIGHT - PADDING;
    let axis_right = WIDTH - PADDING;
    let start = strategy
        .first()
        .or(benchmark.first())
        .map(|p| p.date.to_string())
        .unwrap_or_default();
    let end = strategy
        .last()
        .or(benchmark.last())
        .map(|p| p.date.to_string())
        .unwrap_or_default();

    format!(
        r##"<svg xmlns="http://www.w3.org/2000/svg" width="{WIDTH:.0}" height="{HEIGHT:.0}" viewBox="0 0 {WIDTH:.0} {HEIGHT:.0}" font-family="sans-serif" font-size="12">
  <rect width="100%" height="100%" fill="white"/>
  <text x="{cx:.0}" y="24" text-anchor="middle" font-size="16">{title}</text>
  <line x1="{PADDING:.0}" y1="{PADDING:.0}" x2="{PADDING:.0}" y2="{axis_bottom:.0}" stroke="black"/>
  <line x1="{PADDING:.0}" y1="{axis_bottom:.0}" x2="{axis_right:.0}" y2="{axis_bottom:.0}" stroke="black"/>
  <text x="{label_x:.0}" y="{PADDING:.0}" text-anchor="end">{max:.2}</text>
  <text x="{label_x:.0}" y="{axis_bottom:.0}" text-anchor="end">{min:.2}</text>
  <text x="{PADDING:.0}" y="{date_y:.0}">{start}</text>
  <text x="{axis_right:.0}" y="{date_y:.0}" text-anchor="end">{end}</text>
  <polyline fill="none" stroke="#808080" stroke-width="1" stroke-dasharray="6,4" points="{bench}"/>
  <polyline fill="none" stroke="#1e90ff" stroke-width="2" points="{strat}"/>
  <g transform="translate({legend_x:.0},{legend_y:.0})">
    <line x1="0" y1="0" x2="24" y2="0" stroke="#1e90ff" stroke-width="2"/>
    <text x="30" y="4">Turtle Strategy</text>
    <line x1="0" y1="18" x2="24" y2="18" stroke="#808080" stroke-dasharray="6,4"/>
    <text x="30" y="22">Buy &amp; Hold</text>
  </g>
</svg>
"##,
        cx = WIDTH / 2.0,
        label_x = PADDING - 6.0,
        date_y = axis_bottom + 18.0,
        legend_x = PADDING + 12.0,
        legend_y = PADDING + 12.0,
        bench = polyline(benchmark, min, scale_x, scale_y),
        strat = polyline(strategy, min, scale_x, scale_y),
    )
}

impl ReportPort for SvgChartAdapter {
    fn write(&self, result: &BacktestResult, symbol: &str) -> Result<(), TurtleError> {
        let svg = render_equity_svg(
            &result.strategy_equity,
            &result.benchmark_equity,
            &format!("Turtle Trading Strategy vs Buy & Hold ({symbol})"),
        );
        fs::write(&self.output_path, svg).map_err(|e| TurtleError::Report {
            reason: format!("failed to write {}: {}", self.output_path.display(), e),
        })?;
        info!(path = %self.output_path.display(), "equity chart written");
        Ok(())
    }
}

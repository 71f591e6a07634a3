//! Bonus distribution charts using plotters.
//!
//! One PNG for the spare bonus and one for strikes with three stacked
//! panels (next roll, second roll, combined). Each histogram carries a
//! dashed line at the mean. Styling comes from chart_config.json.

use super::config::ChartConfig;
use super::statistics::{BonusReport, SeriesStats};
use anyhow::{Context, Result};
use plotters::coord::Shift;
use plotters::prelude::*;
use std::path::{Path, PathBuf};

fn rgb(c: [u8; 3]) -> RGBColor {
    RGBColor(c[0], c[1], c[2])
}

/// Non-empty histogram bins as (pin value, count).
fn histogram_bars(stats: &SeriesStats) -> Vec<(u32, usize)> {
    stats
        .histogram
        .iter()
        .enumerate()
        .filter(|&(_, &count)| count > 0)
        .map(|(value, &count)| (value as u32, count))
        .collect()
}

/// Top of the count axis: a little headroom above the tallest bar.
fn count_ceiling(stats: &SeriesStats) -> usize {
    let tallest = stats.histogram.iter().copied().max().unwrap_or(0);
    tallest + tallest / 10 + 1
}

/// Draws one histogram with its mean marker into `area`.
fn draw_histogram(
    area: &DrawingArea<BitMapBackend, Shift>,
    stats: &SeriesStats,
    bar_color: RGBColor,
    config: &ChartConfig,
) -> Result<()> {
    let grid_color = rgb(config.colors.grid_color);
    let mean_color = rgb(config.colors.mean_line);
    let x_max = stats.histogram.len() as f64;

    let caption = format!("{} (n = {})", stats.label, stats.count);
    let mut chart = ChartBuilder::on(area)
        .caption(caption, ("sans-serif", config.font.caption_size))
        .margin(config.layout.margin)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(0.0f64..x_max, 0usize..count_ceiling(stats))
        .context("Failed to build histogram")?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_desc("Pins")
        .y_desc("Count")
        .x_labels(stats.histogram.len())
        .x_label_formatter(&|x| format!("{:.0}", x.floor()))
        .label_style(("sans-serif", config.font.axis_label_size))
        .light_line_style(grid_color)
        .bold_line_style(grid_color.mix(0.8))
        .draw()
        .context("Failed to draw mesh")?;

    // Bar for value v spans [v, v + 1) with a small gap on each side
    chart.draw_series(histogram_bars(stats).into_iter().map(|(value, count)| {
        let x = f64::from(value);
        Rectangle::new([(x + 0.1, 0), (x + 0.9, count)], bar_color.filled())
    }))?;

    if stats.count > 0 {
        let mean_x = stats.mean + 0.5;
        let top = count_ceiling(stats);
        chart
            .draw_series(DashedLineSeries::new(
                vec![(mean_x, 0), (mean_x, top)],
                6,
                4,
                mean_color.stroke_width(2),
            ))?
            .label(format!("mean = {:.2}", stats.mean))
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], mean_color.stroke_width(2)));

        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperRight)
            .label_font(("sans-serif", config.font.legend_size))
            .background_style(WHITE.mix(0.8))
            .border_style(grid_color)
            .draw()
            .context("Failed to draw legend")?;
    }

    Ok(())
}

fn draw_title(area: &DrawingArea<BitMapBackend, Shift>, title: &str, config: &ChartConfig) -> Result<()> {
    let title_font = ("sans-serif", config.font.title_size)
        .into_font()
        .style(FontStyle::Bold);
    area.draw_text(title, &title_font.color(&BLACK), (20, 10))?;
    Ok(())
}

/// Histogram of the roll following each spare.
pub fn generate_spare_chart(report: &BonusReport, output_path: &Path, config: &ChartConfig) -> Result<()> {
    let root = BitMapBackend::new(
        output_path,
        (config.layout.chart_width, config.layout.chart_height),
    )
    .into_drawing_area();
    root.fill(&rgb(config.colors.background))
        .context("Failed to fill chart background")?;

    let (title_area, chart_area) = root.split_vertically(config.layout.title_height);
    draw_title(
        &title_area,
        &format!("Spare bonus ({} games)", report.games),
        config,
    )?;
    draw_histogram(&chart_area, &report.spare_bonus, rgb(config.colors.spare_bar), config)?;

    root.present().context("Failed to save chart")?;
    Ok(())
}

/// Three stacked histograms for the rolls following each strike.
pub fn generate_strike_chart(report: &BonusReport, output_path: &Path, config: &ChartConfig) -> Result<()> {
    let panels = [
        &report.strike_next,
        &report.strike_second,
        &report.strike_combined,
    ];
    let height = config.layout.title_height + config.layout.panel_height * panels.len() as u32;

    let root = BitMapBackend::new(output_path, (config.layout.chart_width, height)).into_drawing_area();
    root.fill(&rgb(config.colors.background))
        .context("Failed to fill chart background")?;

    let (title_area, chart_area) = root.split_vertically(config.layout.title_height);
    draw_title(
        &title_area,
        &format!("Strike bonus ({} games)", report.games),
        config,
    )?;

    let bar_color = rgb(config.colors.strike_bar);
    for (area, stats) in chart_area.split_evenly((panels.len(), 1)).iter().zip(panels) {
        draw_histogram(area, stats, bar_color, config)?;
    }

    root.present().context("Failed to save chart")?;
    Ok(())
}

/// Writes both charts into `output_dir` and returns their paths.
pub fn generate_all_charts(
    report: &BonusReport,
    output_dir: &Path,
    config: &ChartConfig,
) -> Result<Vec<PathBuf>> {
    let spare_path = output_dir.join("spare_bonus.png");
    generate_spare_chart(report, &spare_path, config)?;

    let strike_path = output_dir.join("strike_bonus.png");
    generate_strike_chart(report, &strike_path, config)?;

    Ok(vec![spare_path, strike_path])
}

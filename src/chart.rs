use std::{collections::BTreeMap, path::Path};

use plotters::prelude::*;

use crate::{
    config::ChartConfig,
    error::{PaperError, Result},
    model::Paper
};

/// (year, papers published that year), years ascending.
pub fn count_by_year<'a>(papers: impl IntoIterator<Item = &'a Paper>) -> Vec<(String, usize)> {
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for paper in papers {
        *counts.entry(paper.year().to_string()).or_default() += 1;
    }
    counts.into_iter().collect()
}

/// Line chart with triangle markers, one category per year.
pub fn draw_year_trend(path: &Path, counts: &[(String, usize)], style: &ChartConfig) -> Result<()> {
    draw(path, counts, style).map_err(|e| PaperError::Chart(e.to_string()))
}

fn draw(
    path: &Path,
    counts: &[(String, usize)],
    style: &ChartConfig
) -> std::result::Result<(), Box<dyn std::error::Error>> {
    let root = BitMapBackend::new(path, style.size()).into_drawing_area();
    root.fill(&WHITE)?;
    let pad = style.padding();
    let area = root.margin(pad, pad, pad, pad);

    let label_px = style.pixels(style.label_font_pt);
    let tick_px = style.pixels(style.tick_font_pt);
    let family = style.font_family.as_str();

    let segments = counts.len().max(1) as u32;
    let y_max = counts.iter().map(|(_, n)| *n as u32).max().unwrap_or(0);
    let y_top = y_max + (y_max / 10).max(1);

    let mut chart = ChartBuilder::on(&area)
        .x_label_area_size(label_px + tick_px * 2)
        .y_label_area_size(label_px + tick_px * 3)
        .build_cartesian_2d((0u32..segments).into_segmented(), 0u32..y_top)?;

    let year_label = |value: &SegmentValue<u32>| match value {
        SegmentValue::CenterOf(idx) => counts.get(*idx as usize)
            .map(|(year, _)| year.clone())
            .unwrap_or_default(),
        _ => String::new()
    };

    chart.configure_mesh()
        .disable_mesh()
        .x_desc("Year")
        .y_desc("#papers")
        .axis_desc_style((family, label_px as f64, FontStyle::Bold))
        .label_style((family, tick_px as f64))
        .x_labels(counts.len().max(1))
        .x_label_formatter(&year_label)
        .draw()?;

    let points = counts.iter()
        .enumerate()
        .map(|(idx, (_, n))| (SegmentValue::CenterOf(idx as u32), *n as u32))
        .collect::<Vec<_>>();
    let line_px = style.pixels(style.line_width_pt);
    let marker_px = style.pixels(style.marker_size_pt) as i32;

    chart.draw_series(LineSeries::new(points.clone(), BLACK.stroke_width(line_px)))?;
    chart.draw_series(points.into_iter()
        .map(|point| TriangleMarker::new(point, marker_px, BLACK.filled())))?;

    root.present()?;
    Ok(())
}

// Chart rendering - four fixed PNG charts per report, drawn with plotters
use crate::domain::error::ReportError;
use crate::domain::report::{ChartArtifact, ChartRole, ChartSet, LegendEntry};
use crate::domain::sensor::{SensorColumn, SensorRecord};
use crate::domain::statistics::BoxSummary;
use plotters::coord::Shift;
use plotters::prelude::*;
use std::path::Path;

/// 10 x 5 inches at 150 dpi
pub const CHART_SIZE: (u32, u32) = (1500, 750);

const FIGURE_BG: RGBColor = RGBColor(13, 13, 26);
const AXES_BG: RGBColor = RGBColor(26, 26, 46);
const SPINE: RGBColor = RGBColor(51, 51, 51);
const GRID: RGBColor = RGBColor(255, 255, 255);
const TEMPERATURE: RGBColor = RGBColor(255, 68, 68);
const HUMIDITY: RGBColor = RGBColor(68, 68, 255);
const GPI_LINE: RGBColor = RGBColor(0, 255, 0);

/// (lower, upper, colour, label) for the GPI severity bands
const GPI_BANDS: [(f64, f64, RGBColor, &str); 4] = [
    (0.0, 50.0, RGBColor(0, 128, 0), "Good (0-50)"),
    (50.0, 100.0, RGBColor(255, 255, 0), "Moderate (50-100)"),
    (100.0, 200.0, RGBColor(255, 165, 0), "Unhealthy (100-200)"),
    (200.0, 300.0, RGBColor(255, 0, 0), "Very Unhealthy (200-300)"),
];

type DrawResult<DB> = Result<(), DrawingAreaErrorKind<<DB as DrawingBackend>::ErrorType>>;

pub fn column_color(column: SensorColumn) -> RGBColor {
    match column {
        SensorColumn::Smoke => RGBColor(0, 255, 0),
        SensorColumn::Methane => RGBColor(0, 255, 255),
        SensorColumn::Co => RGBColor(255, 176, 0),
        SensorColumn::Air => RGBColor(255, 0, 255),
        SensorColumn::Gpi => GPI_LINE,
        SensorColumn::Temperature => TEMPERATURE,
        SensorColumn::Humidity => HUMIDITY,
    }
}

/// Upper bound of the GPI axis: always shows every band, plus headroom over the data
pub fn gpi_y_max(observed_max: f64) -> f64 {
    f64::max(300.0, observed_max + 20.0)
}

/// Render every chart into `dir`. Any failure aborts the whole set.
pub fn render_all(records: &[SensorRecord], dir: &Path) -> Result<ChartSet, ReportError> {
    if records.is_empty() {
        return Err(ReportError::Chart("no records to plot".to_string()));
    }
    if let Some(column) = SensorColumn::ALL
        .into_iter()
        .find(|c| records.iter().any(|r| !c.value(r).is_finite()))
    {
        return Err(ReportError::Chart(format!(
            "column '{}' holds a non-finite value",
            column.key()
        )));
    }

    let mut set = ChartSet::default();
    for role in ChartRole::ALL {
        let path = dir.join(role.file_name());
        tracing::debug!("Rendering {:?} chart to {}", role, path.display());

        render_png(&path, |area| {
            let drawn = match role {
                ChartRole::Sensors => draw_sensor_chart(area, records),
                ChartRole::GpiTrend => draw_gpi_chart(area, records),
                ChartRole::Environment => draw_environment_chart(area, records),
                ChartRole::Distribution => draw_distribution_chart(area, records),
            };
            drawn.map_err(|e| format!("{:?} chart: {:?}", role, e))
        })?;

        set.charts.push(ChartArtifact {
            role,
            path,
            legend: legend_for(role),
            caption: caption_for(role, records),
        });
    }

    Ok(set)
}

fn render_png<F>(path: &Path, draw: F) -> Result<(), ReportError>
where
    F: FnOnce(&DrawingArea<BitMapBackend<'_>, Shift>) -> Result<(), String>,
{
    let root = BitMapBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&FIGURE_BG).map_err(chart_error)?;
    draw(&root).map_err(ReportError::Chart)?;
    root.present().map_err(chart_error)?;
    Ok(())
}

fn chart_error<E: std::fmt::Debug>(e: E) -> ReportError {
    ReportError::Chart(format!("{:?}", e))
}

fn legend_for(role: ChartRole) -> Vec<LegendEntry> {
    let entry = |column: SensorColumn| {
        let RGBColor(r, g, b) = column_color(column);
        LegendEntry::new(column.label(), (r, g, b))
    };

    match role {
        ChartRole::Sensors | ChartRole::Distribution => {
            SensorColumn::GAS.into_iter().map(entry).collect()
        }
        ChartRole::GpiTrend => GPI_BANDS
            .iter()
            .map(|(_, _, RGBColor(r, g, b), label)| LegendEntry::new(*label, (*r, *g, *b)))
            .chain(std::iter::once(entry(SensorColumn::Gpi)))
            .collect(),
        ChartRole::Environment => vec![
            entry(SensorColumn::Temperature),
            entry(SensorColumn::Humidity),
        ],
    }
}

/// Axis scales in words; the rasters carry no tick labels
fn caption_for(role: ChartRole, records: &[SensorRecord]) -> String {
    let x_axis = format!("x: sample 0 to {:.0}", x_extent(records.len()));
    match role {
        ChartRole::Sensors => {
            let (lo, hi) = gas_range(records);
            format!("{}; y: ADC value {:.0} to {:.0}", x_axis, lo, hi)
        }
        ChartRole::GpiTrend => {
            let max = SensorColumn::Gpi
                .values(records)
                .into_iter()
                .fold(f64::NEG_INFINITY, f64::max);
            format!("{}; y: GPI 0 to {:.0}", x_axis, gpi_y_max(max))
        }
        ChartRole::Environment => {
            let (t_lo, t_hi) = column_range(SensorColumn::Temperature, records);
            let (h_lo, h_hi) = column_range(SensorColumn::Humidity, records);
            format!(
                "{}; left y: temperature {:.1} to {:.1} C; right y: humidity {:.1} to {:.1} %",
                x_axis, t_lo, t_hi, h_lo, h_hi
            )
        }
        ChartRole::Distribution => {
            let (lo, hi) = gas_range(records);
            format!(
                "y: ADC value {:.0} to {:.0}; box: quartiles and median; whiskers: 1.5 IQR",
                lo, hi
            )
        }
    }
}

/// Shared y range of the four gas sensors
fn gas_range(records: &[SensorRecord]) -> (f64, f64) {
    padded_range(SensorColumn::GAS.iter().flat_map(|c| c.values(records)))
}

fn column_range(column: SensorColumn, records: &[SensorRecord]) -> (f64, f64) {
    padded_range(column.values(records))
}

fn x_extent(len: usize) -> f64 {
    len.saturating_sub(1).max(1) as f64
}

/// Data range with 5% headroom; a flat series gets a unit band around it
fn padded_range(values: impl IntoIterator<Item = f64>) -> (f64, f64) {
    let (lo, hi) = values
        .into_iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
    if !lo.is_finite() || !hi.is_finite() {
        return (0.0, 1.0);
    }
    if (hi - lo).abs() < f64::EPSILON {
        return (lo - 1.0, hi + 1.0);
    }
    let pad = (hi - lo) * 0.05;
    (lo - pad, hi + pad)
}

fn indexed(values: Vec<f64>) -> Vec<(f64, f64)> {
    values
        .into_iter()
        .enumerate()
        .map(|(i, v)| (i as f64, v))
        .collect()
}

fn draw_sensor_chart<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    records: &[SensorRecord],
) -> DrawResult<DB> {
    let (y_min, y_max) = gas_range(records);

    let mut chart = ChartBuilder::on(area)
        .margin(20)
        .x_label_area_size(30)
        .y_label_area_size(50)
        .build_cartesian_2d(0f64..x_extent(records.len()), y_min..y_max)?;

    chart.plotting_area().fill(&AXES_BG)?;
    chart
        .configure_mesh()
        .bold_line_style(&GRID.mix(0.3))
        .light_line_style(&TRANSPARENT)
        .axis_style(&SPINE)
        .x_labels(0)
        .y_labels(0)
        .draw()?;

    for column in SensorColumn::GAS {
        chart.draw_series(LineSeries::new(
            indexed(column.values(records)),
            column_color(column).stroke_width(2),
        ))?;
    }

    Ok(())
}

fn draw_gpi_chart<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    records: &[SensorRecord],
) -> DrawResult<DB> {
    let gpi = indexed(SensorColumn::Gpi.values(records));
    let observed_max = gpi.iter().map(|(_, v)| *v).fold(f64::NEG_INFINITY, f64::max);
    let x_max = x_extent(records.len());

    let mut chart = ChartBuilder::on(area)
        .margin(20)
        .x_label_area_size(30)
        .y_label_area_size(50)
        .build_cartesian_2d(0f64..x_max, 0f64..gpi_y_max(observed_max))?;

    chart.plotting_area().fill(&AXES_BG)?;

    // Bands sit beneath the grid and the series
    chart.draw_series(GPI_BANDS.iter().map(|(lo, hi, color, _)| {
        Rectangle::new([(0.0, *lo), (x_max, *hi)], color.mix(0.2).filled())
    }))?;

    chart
        .configure_mesh()
        .bold_line_style(&GRID.mix(0.3))
        .light_line_style(&TRANSPARENT)
        .axis_style(&SPINE)
        .x_labels(0)
        .y_labels(0)
        .draw()?;

    chart.draw_series(AreaSeries::new(gpi.clone(), 0.0, GPI_LINE.mix(0.3).filled()))?;
    chart.draw_series(LineSeries::new(gpi.clone(), GPI_LINE.stroke_width(3)))?;
    chart.draw_series(
        gpi.iter()
            .map(|(x, y)| Circle::new((*x, *y), 4, GPI_LINE.filled())),
    )?;

    Ok(())
}

fn draw_environment_chart<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    records: &[SensorRecord],
) -> DrawResult<DB> {
    let temperature = SensorColumn::Temperature.values(records);
    let humidity = SensorColumn::Humidity.values(records);
    let (t_min, t_max) = column_range(SensorColumn::Temperature, records);
    let (h_min, h_max) = column_range(SensorColumn::Humidity, records);
    let x_max = x_extent(records.len());

    let mut chart = ChartBuilder::on(area)
        .margin(20)
        .x_label_area_size(30)
        .y_label_area_size(50)
        .right_y_label_area_size(50)
        .build_cartesian_2d(0f64..x_max, t_min..t_max)?
        .set_secondary_coord(0f64..x_max, h_min..h_max);

    chart.plotting_area().fill(&AXES_BG)?;
    chart
        .configure_mesh()
        .bold_line_style(&GRID.mix(0.3))
        .light_line_style(&TRANSPARENT)
        .axis_style(&TEMPERATURE)
        .x_labels(0)
        .y_labels(0)
        .draw()?;
    chart
        .configure_secondary_axes()
        .axis_style(&HUMIDITY)
        .x_labels(0)
        .y_labels(0)
        .draw()?;

    chart.draw_series(LineSeries::new(
        indexed(temperature),
        TEMPERATURE.stroke_width(2),
    ))?;
    chart.draw_secondary_series(LineSeries::new(
        indexed(humidity),
        HUMIDITY.stroke_width(2),
    ))?;

    Ok(())
}

fn draw_distribution_chart<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    records: &[SensorRecord],
) -> DrawResult<DB> {
    let (y_min, y_max) = gas_range(records);
    let half_width = 0.25;

    let mut chart = ChartBuilder::on(area)
        .margin(20)
        .x_label_area_size(30)
        .y_label_area_size(50)
        .build_cartesian_2d(0f64..SensorColumn::GAS.len() as f64, y_min..y_max)?;

    chart.plotting_area().fill(&AXES_BG)?;
    chart
        .configure_mesh()
        .disable_x_mesh()
        .bold_line_style(&GRID.mix(0.3))
        .light_line_style(&TRANSPARENT)
        .axis_style(&SPINE)
        .x_labels(0)
        .y_labels(0)
        .draw()?;

    for (i, column) in SensorColumn::GAS.into_iter().enumerate() {
        let values = column.values(records);
        let Some(summary) = BoxSummary::compute(&values) else {
            continue;
        };
        let color = column_color(column);
        let center = i as f64 + 0.5;
        let (left, right) = (center - half_width, center + half_width);
        let (cap_left, cap_right) = (center - half_width / 2.0, center + half_width / 2.0);

        chart.draw_series(std::iter::once(Rectangle::new(
            [(left, summary.q1), (right, summary.q3)],
            color.mix(0.6).filled(),
        )))?;
        chart.draw_series(std::iter::once(Rectangle::new(
            [(left, summary.q1), (right, summary.q3)],
            WHITE.stroke_width(1),
        )))?;

        let segments = [
            vec![(left, summary.median), (right, summary.median)],
            vec![(center, summary.q3), (center, summary.upper_whisker)],
            vec![(center, summary.q1), (center, summary.lower_whisker)],
            vec![(cap_left, summary.upper_whisker), (cap_right, summary.upper_whisker)],
            vec![(cap_left, summary.lower_whisker), (cap_right, summary.lower_whisker)],
        ];
        chart.draw_series(
            segments
                .into_iter()
                .map(|points| PathElement::new(points, WHITE.stroke_width(2))),
        )?;

        chart.draw_series(
            values
                .iter()
                .filter(|v| **v < summary.lower_whisker || **v > summary.upper_whisker)
                .map(|v| Circle::new((center, *v), 4, color.stroke_width(1))),
        )?;
    }

    Ok(())
}

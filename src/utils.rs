use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

use crate::error::GridError;

/// Hundredths of `value`, truncated toward zero.
pub fn centi(value: f64) -> i64 {
    (value * 100.0) as i64
}

/// Equal once both sides are truncated to two decimals.
pub fn same_centi(a: f64, b: f64) -> bool {
    centi(a) == centi(b)
}

fn plot_err<E: std::fmt::Display>(e: E) -> GridError {
    GridError::Plot(e.to_string())
}

/// Draw a rows x cols table of labels as a grid image, row 0 on top.
pub fn plot_grid(labels: &[Vec<String>], filename: &str, title: &str) -> Result<(), GridError> {
    let rows = labels.len();
    let cols = labels.iter().map(Vec::len).max().unwrap_or(0);
    if rows == 0 || cols == 0 {
        return Err(GridError::invalid("nothing to plot"));
    }

    let root = BitMapBackend::new(filename, (100 * cols as u32 + 40, 100 * rows as u32 + 80))
        .into_drawing_area();
    root.fill(&WHITE).map_err(plot_err)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 28).into_font())
        .margin(20)
        .build_cartesian_2d(0f64..cols as f64, 0f64..rows as f64)
        .map_err(plot_err)?;

    let cells = labels.iter().enumerate().flat_map(|(r, row)| {
        row.iter()
            .enumerate()
            .map(move |(c, label)| (c as f64, (rows - 1 - r) as f64, label))
    });

    chart
        .draw_series(cells.clone().map(|(x, y, _)| {
            Rectangle::new([(x, y), (x + 1.0, y + 1.0)], BLACK.stroke_width(2))
        }))
        .map_err(plot_err)?;

    let style = ("sans-serif", 22)
        .into_font()
        .color(&BLACK)
        .pos(Pos::new(HPos::Center, VPos::Center));
    chart
        .draw_series(
            cells.map(|(x, y, label)| Text::new(label.clone(), (x + 0.5, y + 0.5), style.clone())),
        )
        .map_err(plot_err)?;

    root.present().map_err(plot_err)?;
    log::info!("{:<32}{:<32}", "saved grid plot", filename);
    Ok(())
}

/// Per-round largest value change, as a line chart.
pub fn plot_deltas(deltas: &[f64], filename: &str, title: &str) -> Result<(), GridError> {
    let root = BitMapBackend::new(filename, (800, 600)).into_drawing_area();
    root.fill(&WHITE).map_err(plot_err)?;

    let max_delta = deltas.iter().cloned().fold(f64::MIN, f64::max).max(1.0); // 避免空图或全为 0

    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 32).into_font())
        .margin(30)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(0..deltas.len().max(1), 0f64..max_delta)
        .map_err(plot_err)?;

    chart
        .configure_mesh()
        .x_desc("Round")
        .y_desc("Max |dV|")
        .axis_desc_style(("sans-serif", 22))
        .label_style(("sans-serif", 18))
        .light_line_style(&WHITE.mix(0.3))
        .draw()
        .map_err(plot_err)?;

    chart
        .draw_series(LineSeries::new(
            deltas.iter().enumerate().map(|(i, d)| (i, *d)),
            &BLUE,
        ))
        .map_err(plot_err)?
        .label("Delta")
        .legend(|(x, y)| PathElement::new([(x, y), (x + 20, y)], &BLUE));

    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .label_font(("sans-serif", 18))
        .draw()
        .map_err(plot_err)?;

    root.present().map_err(plot_err)?;
    log::info!("{:<32}{:<32}", "saved convergence plot", filename);
    Ok(())
}

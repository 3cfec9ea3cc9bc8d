use eframe::egui::{Color32, Stroke, Ui};
use egui_plot::{
    Bar, BarChart, BoxElem, BoxPlot, BoxSpread, Legend, Line, Plot, PlotPoints, Points,
};

use super::format_money;
use crate::color::ramp;
use crate::data::aggregate::{HistogramBin, ScatterPoint, YearlyPoint};
use crate::data::chart::{ChartData, GenreBox};
use crate::state::AppState;

/// Score bands drawn as separate point series so each gets a colour.
const SCORE_BANDS: usize = 10;

// ---------------------------------------------------------------------------
// Chart (central panel)
// ---------------------------------------------------------------------------

/// Render the selected chart for the visible movies.
pub fn chart(ui: &mut Ui, state: &AppState) {
    ui.heading(state.chart_mode().label());
    if state.visible_indices.is_empty() {
        ui.label("No movies match the filters.");
        return;
    }

    let data = state.chart_data();
    if data.is_empty() {
        ui.label("Not enough data for this chart.");
        return;
    }
    match data {
        ChartData::BudgetVsGross(points) => budget_vs_gross(ui, points),
        ChartData::GrossByGenre(boxes) => gross_by_genre(ui, state, boxes),
        ChartData::YearlyTrends(years) => yearly_trends(ui, years),
        ChartData::ScoreDistribution(bins) => score_distribution(ui, bins),
    }
}

/// Log-log scatter, coloured by IMDB score.
fn budget_vs_gross(ui: &mut Ui, points: &[ScatterPoint]) {
    let mut bands: Vec<Vec<[f64; 2]>> = vec![Vec::new(); SCORE_BANDS];
    for p in points {
        let band = ((p.imdb_score / 10.0 * SCORE_BANDS as f64) as usize).min(SCORE_BANDS - 1);
        bands[band].push([p.budget.log10(), p.gross.log10()]);
    }

    Plot::new("budget_vs_gross")
        .legend(Legend::default())
        .x_axis_label("Budget ($, log)")
        .y_axis_label("Gross ($, log)")
        .x_axis_formatter(|mark, _range| format_money(10f64.powf(mark.value)))
        .y_axis_formatter(|mark, _range| format_money(10f64.powf(mark.value)))
        .show(ui, |plot_ui| {
            for (i, band) in bands.into_iter().enumerate() {
                if band.is_empty() {
                    continue;
                }
                let lo = i as f64 * 10.0 / SCORE_BANDS as f64;
                let hi = lo + 10.0 / SCORE_BANDS as f64;
                plot_ui.points(
                    Points::new(band)
                        .name(format!("score {lo:.0}–{hi:.0}"))
                        .color(ramp(i as f64 / (SCORE_BANDS - 1) as f64))
                        .radius(2.5),
                );
            }
        });
}

/// One box per genre, in order of frequency.
fn gross_by_genre(ui: &mut Ui, state: &AppState, boxes: &[GenreBox]) {
    let names: Vec<String> = boxes.iter().map(|b| b.genre.clone()).collect();

    Plot::new("gross_by_genre")
        .legend(Legend::default())
        .y_axis_label("Gross ($)")
        .y_axis_formatter(|mark, _range| format_money(mark.value))
        .x_axis_formatter(move |mark, _range| {
            let idx = mark.value.round();
            if (mark.value - idx).abs() > f64::EPSILON || idx < 0.0 {
                return String::new();
            }
            names.get(idx as usize).cloned().unwrap_or_default()
        })
        .show(ui, |plot_ui| {
            for (i, b) in boxes.iter().enumerate() {
                let colour = state.genre_colors.color_for(&b.genre);
                let spread = BoxSpread::new(
                    b.gross.lower_whisker,
                    b.gross.q1,
                    b.gross.median,
                    b.gross.q3,
                    b.gross.upper_whisker,
                );
                let elem = BoxElem::new(i as f64, spread)
                    .name(format!("{} ({} movies)", b.genre, b.movies))
                    .fill(colour.linear_multiply(0.3))
                    .stroke(Stroke::new(1.5, colour))
                    .box_width(0.6);
                plot_ui.box_plot(BoxPlot::new(vec![elem]).name(&b.genre));

                if !b.gross.outliers.is_empty() {
                    let outliers: Vec<[f64; 2]> =
                        b.gross.outliers.iter().map(|&g| [i as f64, g]).collect();
                    plot_ui.points(Points::new(outliers).color(colour).radius(1.5));
                }
            }
        });
}

/// Mean budget and gross per year.
fn yearly_trends(ui: &mut Ui, years: &[YearlyPoint]) {
    let budget: PlotPoints = years
        .iter()
        .map(|y| [y.year as f64, y.mean_budget])
        .collect();
    let gross: PlotPoints = years
        .iter()
        .map(|y| [y.year as f64, y.mean_gross])
        .collect();

    Plot::new("yearly_trends")
        .legend(Legend::default())
        .x_axis_label("Release year")
        .y_axis_label("Amount ($)")
        .y_axis_formatter(|mark, _range| format_money(mark.value))
        .show(ui, |plot_ui| {
            plot_ui.line(
                Line::new(budget)
                    .name("Mean budget")
                    .color(Color32::from_rgb(70, 110, 230))
                    .width(2.0),
            );
            plot_ui.line(
                Line::new(gross)
                    .name("Mean gross")
                    .color(Color32::from_rgb(240, 150, 40))
                    .width(2.0),
            );
        });
}

/// Histogram of IMDB scores.
fn score_distribution(ui: &mut Ui, bins: &[HistogramBin]) {
    let bars: Vec<Bar> = bins
        .iter()
        .map(|b| {
            Bar::new((b.start + b.end) / 2.0, b.count as f64)
                .width((b.end - b.start) * 0.95)
                .name(format!("{:.1}–{:.1}", b.start, b.end))
        })
        .collect();

    Plot::new("score_distribution")
        .x_axis_label("IMDB score")
        .y_axis_label("Movies")
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).color(Color32::from_rgb(0, 128, 128)));
        });
}

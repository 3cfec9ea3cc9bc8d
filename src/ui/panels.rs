use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};
use egui_extras::{Column, TableBuilder};

use super::format_money;
use crate::data::chart::ChartMode;
use crate::state::{AppState, NO_DATA};

/// Actor names listed at once in the sidebar; the search box narrows the rest.
const MAX_ACTORS_LISTED: usize = 200;

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            year_range(ui, state);
            ui.separator();

            genre_list(ui, state);
            actor_list(ui, state);
            ui.separator();

            ui.strong("Search by title");
            let mut query = state.filters.title_query.clone();
            if ui.text_edit_singleline(&mut query).changed() {
                state.set_title_query(&query);
            }
            ui.separator();

            ui.checkbox(&mut state.show_stats, "Show more statistics");

            ui.strong("Chart");
            let mut mode = state.chart_mode();
            egui::ComboBox::from_id_salt("chart_mode")
                .selected_text(mode.label())
                .show_ui(ui, |ui: &mut Ui| {
                    for option in ChartMode::ALL {
                        ui.selectable_value(&mut mode, option, option.label());
                    }
                });
            state.set_chart_mode(mode);
        });
}

fn year_range(ui: &mut Ui, state: &mut AppState) {
    ui.strong("Release year");
    let (lo, hi) = state.year_bounds;
    let (mut min, mut max) = state.filters.year_range;

    let from = ui.add(egui::Slider::new(&mut min, lo..=hi).text("from"));
    let to = ui.add(egui::Slider::new(&mut max, lo..=hi).text("to"));

    // Keep the range ordered: the slider being dragged pushes the other one.
    if from.changed() || to.changed() {
        if min > max {
            if from.changed() {
                max = min;
            } else {
                min = max;
            }
        }
        state.set_year_range(min, max);
    }
}

fn genre_list(ui: &mut Ui, state: &mut AppState) {
    let header = format!("Genres  ({})", selection_label(&state.filters.genres));
    let mut toggled: Option<String> = None;

    egui::CollapsingHeader::new(RichText::new(header).strong())
        .id_salt("genres")
        .default_open(false)
        .show(ui, |ui: &mut Ui| {
            for genre in &state.genre_options {
                let mut checked = state.filters.genres.contains(genre);
                let text = RichText::new(genre).color(state.genre_colors.color_for(genre));
                if ui.checkbox(&mut checked, text).changed() {
                    toggled = Some(genre.clone());
                }
            }
        });

    if let Some(genre) = toggled {
        state.toggle_genre(&genre);
    }
}

fn actor_list(ui: &mut Ui, state: &mut AppState) {
    let header = format!("Actors  ({})", selection_label(&state.filters.actors));
    let mut toggled: Option<String> = None;

    egui::CollapsingHeader::new(RichText::new(header).strong())
        .id_salt("actors")
        .default_open(false)
        .show(ui, |ui: &mut Ui| {
            ui.add(egui::TextEdit::singleline(&mut state.actor_search).hint_text("find actor…"));
            let needle = state.actor_search.to_lowercase();

            // Selected names first so they can always be unticked.
            let selected = state.filters.actors.iter();
            let matching = state
                .actor_options
                .iter()
                .filter(|a| !state.filters.actors.contains(*a))
                .filter(|a| needle.is_empty() || a.to_lowercase().contains(&needle))
                .take(MAX_ACTORS_LISTED);

            ScrollArea::vertical()
                .id_salt("actor_scroll")
                .max_height(240.0)
                .show(ui, |ui: &mut Ui| {
                    for actor in selected.chain(matching) {
                        let mut checked = state.filters.actors.contains(actor);
                        if ui.checkbox(&mut checked, actor.as_str()).changed() {
                            toggled = Some(actor.clone());
                        }
                    }
                });
        });

    if let Some(actor) = toggled {
        state.toggle_actor(&actor);
    }
}

fn selection_label(selected: &std::collections::BTreeSet<String>) -> String {
    match selected.len() {
        0 => "none".to_string(),
        1 => selected.iter().next().cloned().unwrap_or_default(),
        n => format!("{n} selected"),
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            let can_export = !state.visible_indices.is_empty();
            if ui
                .add_enabled(can_export, egui::Button::new("Export CSV…"))
                .clicked()
            {
                save_file_dialog(state);
                ui.close_menu();
            }
            if ui.button("Reset filters").clicked() {
                state.reset_filters();
                ui.close_menu();
            }
        });

        ui.separator();

        ui.label(format!(
            "{} movies loaded, {} visible",
            state.table.len(),
            state.visible_indices.len()
        ));

        if let Some(msg) = &state.status_message {
            ui.separator();
            let colour = if msg.starts_with("Error") {
                Color32::RED
            } else {
                Color32::GRAY
            };
            ui.label(RichText::new(msg).color(colour));
        }
    });
}

// ---------------------------------------------------------------------------
// Metrics and statistics
// ---------------------------------------------------------------------------

/// Count, mean score and median ROI side by side.
pub fn metrics_row(ui: &mut Ui, state: &AppState) {
    let metrics = state.metrics();
    ui.columns(3, |cols| {
        metric(&mut cols[0], "Movies", metrics.count.to_string());
        metric(&mut cols[1], "Mean IMDB score", metrics.mean_score_text());
        metric(&mut cols[2], "Median ROI", metrics.median_roi_text());
    });
}

fn metric(ui: &mut Ui, label: &str, value: String) {
    ui.label(RichText::new(label).weak());
    ui.label(RichText::new(value).size(26.0).strong());
}

pub fn extra_stats(ui: &mut Ui, state: &AppState) {
    if state.visible_indices.is_empty() {
        return;
    }
    let stats = state.extra_stats();
    let money = |v: Option<f64>| v.map_or_else(|| NO_DATA.to_string(), format_money);

    ui.heading("More statistics");
    egui::Grid::new("extra_stats").num_columns(2).show(ui, |ui: &mut Ui| {
        ui.strong("Most common genre:");
        ui.label(stats.top_genre.as_deref().unwrap_or(NO_DATA));
        ui.end_row();
        ui.strong("Most frequent actor:");
        ui.label(stats.top_actor.as_deref().unwrap_or(NO_DATA));
        ui.end_row();
        ui.strong("Mean budget:");
        ui.label(money(stats.mean_budget));
        ui.end_row();
        ui.strong("Mean gross:");
        ui.label(money(stats.mean_gross));
        ui.end_row();
    });
}

// ---------------------------------------------------------------------------
// Results table
// ---------------------------------------------------------------------------

/// The visible movies with the columns the dashboard lists.
pub fn results_table(ui: &mut Ui, state: &AppState) {
    ui.heading("Search results");
    if state.visible_indices.is_empty() {
        ui.label("No movies match the filters.");
        return;
    }
    ui.label(format!("Found {} movies", state.visible_indices.len()));

    let movies = &state.table.movies;
    let headers = [
        "Title", "Genres", "Actor 1", "Actor 2", "Actor 3", "IMDB", "Budget", "Gross",
    ];

    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .column(Column::initial(220.0).at_least(80.0))
        .column(Column::initial(180.0).at_least(60.0))
        .columns(Column::initial(120.0).at_least(60.0), 3)
        .column(Column::initial(50.0))
        .columns(Column::initial(110.0), 2)
        .header(20.0, |mut header| {
            for h in headers {
                header.col(|ui| {
                    ui.strong(h);
                });
            }
        })
        .body(|body| {
            body.rows(18.0, state.visible_indices.len(), |mut row| {
                let m = &movies[state.visible_indices[row.index()]];
                row.col(|ui| {
                    ui.label(m.title.as_str());
                });
                row.col(|ui| {
                    ui.label(m.genres.as_str());
                });
                for actor in &m.actors {
                    row.col(|ui| {
                        ui.label(actor.as_str());
                    });
                }
                row.col(|ui| {
                    ui.label(format!("{:.1}", m.imdb_score));
                });
                row.col(|ui| {
                    ui.label(format_money(m.budget));
                });
                row.col(|ui| {
                    ui.label(format_money(m.gross));
                });
            });
        });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn save_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Export filtered movies")
        .set_file_name(&state.config.export_file_name)
        .add_filter("CSV", &["csv"])
        .save_file();

    if let Some(path) = file {
        state.export_to(&path);
    }
}

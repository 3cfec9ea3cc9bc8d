use std::collections::BTreeSet;
use std::path::Path;
use std::sync::Arc;

use crate::color::CategoryColors;
use crate::config::DashboardConfig;
use crate::data::aggregate::{
    self, actor_options, genre_options, mean_budget, mean_gross, mean_score, most_frequent,
    roi_summary, year_bounds,
};
use crate::data::chart::{ChartData, ChartMode};
use crate::data::export::export_csv;
use crate::data::filter::{ALL, FALLBACK_YEAR_RANGE, FilterState, apply};
use crate::data::loader::LoadedTable;
use crate::data::model::{ACTOR_COLUMNS, GENRES, MovieTable, MovieView};
use crate::error::DashboardError;

/// Placeholder shown for metrics without data.
pub const NO_DATA: &str = "No data";

// ---------------------------------------------------------------------------
// Derived display values
// ---------------------------------------------------------------------------

/// Headline numbers for the metric row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Metrics {
    pub count: usize,
    pub mean_score: Option<f64>,
    pub median_roi: Option<f64>,
}

impl Metrics {
    pub fn mean_score_text(&self) -> String {
        self.mean_score
            .map_or_else(|| NO_DATA.to_string(), |s| format!("{s:.1}"))
    }

    pub fn median_roi_text(&self) -> String {
        self.median_roi
            .map_or_else(|| NO_DATA.to_string(), |r| format!("{r:.1}%"))
    }
}

/// The optional "more statistics" block.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtraStats {
    pub top_genre: Option<String>,
    pub top_actor: Option<String>,
    pub mean_budget: Option<f64>,
    pub mean_gross: Option<f64>,
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    pub config: DashboardConfig,

    /// Loaded table, shared with the process-wide cache.
    pub table: Arc<MovieTable>,

    /// Why the table is empty, if loading failed.
    pub load_error: Option<DashboardError>,

    /// Slider limits for the year range.
    pub year_bounds: (i32, i32),
    pub genre_options: Vec<String>,
    pub actor_options: Vec<String>,

    /// Current sidebar selections.
    pub filters: FilterState,

    /// Indices of movies passing the current filters (cached).
    pub visible_indices: Vec<usize>,

    /// Aggregates over `visible_indices`, rebuilt by `refilter`.
    metrics: Metrics,
    extra_stats: ExtraStats,
    /// Series for `chart_mode`, rebuilt on filter or mode change.
    chart: ChartData,

    chart_mode: ChartMode,
    pub show_stats: bool,

    /// Narrows the (long) actor list in the sidebar.
    pub actor_search: String,

    pub genre_colors: CategoryColors,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(config: DashboardConfig, loaded: &LoadedTable) -> Self {
        let table = Arc::clone(&loaded.table);
        let filters = FilterState::unrestricted(&table);
        let genre_options = genre_options(&table);
        let genre_colors = CategoryColors::new(genre_options.iter().skip(1));

        let mut state = AppState {
            config,
            year_bounds: year_bounds(&table).unwrap_or(FALLBACK_YEAR_RANGE),
            actor_options: actor_options(&table),
            genre_options,
            filters,
            visible_indices: Vec::new(),
            metrics: Metrics::default(),
            extra_stats: ExtraStats::default(),
            chart: ChartData::BudgetVsGross(Vec::new()),
            chart_mode: ChartMode::default(),
            show_stats: false,
            actor_search: String::new(),
            genre_colors,
            status_message: loaded.error.as_ref().map(ToString::to_string),
            load_error: loaded.error.clone(),
            table,
        };
        state.refilter();
        state
    }

    /// Whether there is anything to show at all.
    pub fn has_data(&self) -> bool {
        !self.table.is_empty()
    }

    /// The current filtered view.
    pub fn view(&self) -> MovieView<'_> {
        MovieView::new(&self.table, self.visible_indices.clone())
    }

    /// Recompute `visible_indices` and everything derived from them after a
    /// filter change.
    pub fn refilter(&mut self) {
        let table = Arc::clone(&self.table);
        let view = apply(&table.view(), &self.filters);

        self.metrics = Metrics {
            count: aggregate::count(&view),
            mean_score: mean_score(&view),
            median_roi: roi_summary(&view),
        };
        self.extra_stats = ExtraStats {
            top_genre: most_frequent(&view, &[GENRES]),
            top_actor: most_frequent(&view, &ACTOR_COLUMNS),
            mean_budget: mean_budget(&view),
            mean_gross: mean_gross(&view),
        };
        self.chart = self.chart_mode.build(&view, &self.config.chart_settings());
        self.visible_indices = view.rows().to_vec();
    }

    pub fn chart_mode(&self) -> ChartMode {
        self.chart_mode
    }

    pub fn set_chart_mode(&mut self, mode: ChartMode) {
        if mode == self.chart_mode {
            return;
        }
        self.chart_mode = mode;
        let chart = mode.build(&self.view(), &self.config.chart_settings());
        self.chart = chart;
    }

    pub fn set_year_range(&mut self, min: i32, max: i32) {
        self.filters.year_range = (min, max);
        self.refilter();
    }

    pub fn set_title_query(&mut self, query: &str) {
        self.filters.title_query = query.to_string();
        self.refilter();
    }

    pub fn toggle_genre(&mut self, genre: &str) {
        toggle_selection(&mut self.filters.genres, genre);
        self.refilter();
    }

    pub fn toggle_actor(&mut self, actor: &str) {
        toggle_selection(&mut self.filters.actors, actor);
        self.refilter();
    }

    /// Restore the unrestricted selection.
    pub fn reset_filters(&mut self) {
        self.filters = FilterState::unrestricted(&self.table);
        self.refilter();
    }

    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    pub fn extra_stats(&self) -> &ExtraStats {
        &self.extra_stats
    }

    pub fn chart_data(&self) -> &ChartData {
        &self.chart
    }

    /// Write the visible movies to `path`, reporting the outcome in the status line.
    pub fn export_to(&mut self, path: &Path) {
        match export_csv(&self.view(), path) {
            Ok(()) => {
                self.status_message = Some(format!(
                    "Exported {} movies to {}",
                    self.visible_indices.len(),
                    path.display()
                ));
            }
            Err(e) => {
                log::error!("{e}");
                self.status_message = Some(format!("Error: {e}"));
            }
        }
    }
}

/// Multi-select toggle where [`ALL`] and specific names exclude each other.
///
/// Choosing `All` replaces the selection; choosing a name drops `All`.
fn toggle_selection(selected: &mut BTreeSet<String>, value: &str) {
    if selected.remove(value) {
        return;
    }
    if value == ALL {
        selected.clear();
    } else {
        selected.remove(ALL);
    }
    selected.insert(value.to_string());
}

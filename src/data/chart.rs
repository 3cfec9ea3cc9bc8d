use super::aggregate::{
    GenreDistribution, HistogramBin, ScatterPoint, YearlyPoint, budget_gross_points,
    genre_distribution, quantile, score_histogram, yearly_trend,
};
use super::model::MovieView;

// ---------------------------------------------------------------------------
// Chart modes
// ---------------------------------------------------------------------------

/// The charts the dashboard can show, one at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChartMode {
    #[default]
    BudgetVsGross,
    GrossByGenre,
    YearlyTrends,
    ScoreDistribution,
}

impl ChartMode {
    pub const ALL: [ChartMode; 4] = [
        ChartMode::BudgetVsGross,
        ChartMode::GrossByGenre,
        ChartMode::YearlyTrends,
        ChartMode::ScoreDistribution,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ChartMode::BudgetVsGross => "Budget vs Gross (scatter)",
            ChartMode::GrossByGenre => "Gross by genre (box)",
            ChartMode::YearlyTrends => "Yearly trends (line)",
            ChartMode::ScoreDistribution => "Score distribution (histogram)",
        }
    }

    /// Compute the series this mode draws.
    pub fn build(self, view: &MovieView<'_>, settings: &ChartSettings) -> ChartData {
        match self {
            ChartMode::BudgetVsGross => ChartData::BudgetVsGross(budget_gross_points(view)),
            ChartMode::GrossByGenre => {
                let distribution = genre_distribution(view, settings.top_genres);
                ChartData::GrossByGenre(genre_boxes(view, &distribution))
            }
            ChartMode::YearlyTrends => ChartData::YearlyTrends(yearly_trend(view)),
            ChartMode::ScoreDistribution => {
                ChartData::ScoreDistribution(score_histogram(view, settings.histogram_bins))
            }
        }
    }
}

/// Parameters shared by the chart builders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChartSettings {
    pub top_genres: usize,
    pub histogram_bins: usize,
}

impl Default for ChartSettings {
    fn default() -> Self {
        ChartSettings {
            top_genres: 10,
            histogram_bins: 20,
        }
    }
}

/// Output shape of each [`ChartMode`].
#[derive(Debug, Clone, PartialEq)]
pub enum ChartData {
    BudgetVsGross(Vec<ScatterPoint>),
    GrossByGenre(Vec<GenreBox>),
    YearlyTrends(Vec<YearlyPoint>),
    ScoreDistribution(Vec<HistogramBin>),
}

impl ChartData {
    pub fn is_empty(&self) -> bool {
        match self {
            ChartData::BudgetVsGross(v) => v.is_empty(),
            ChartData::GrossByGenre(v) => v.is_empty(),
            ChartData::YearlyTrends(v) => v.is_empty(),
            ChartData::ScoreDistribution(v) => v.is_empty(),
        }
    }
}

// ---------------------------------------------------------------------------
// Box summaries
// ---------------------------------------------------------------------------

/// Five-number summary with whiskers at 1.5 × IQR.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxSummary {
    pub lower_whisker: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub upper_whisker: f64,
    pub outliers: Vec<f64>,
}

impl BoxSummary {
    pub fn from_values(mut values: Vec<f64>) -> Option<Self> {
        values.sort_by(f64::total_cmp);
        let q1 = quantile(&values, 0.25)?;
        let median = quantile(&values, 0.5)?;
        let q3 = quantile(&values, 0.75)?;
        let iqr = q3 - q1;
        let (lo_fence, hi_fence) = (q1 - 1.5 * iqr, q3 + 1.5 * iqr);

        let inside = || values.iter().copied().filter(|v| (lo_fence..=hi_fence).contains(v));
        let lower_whisker = inside().next().unwrap_or(q1);
        let upper_whisker = inside().last().unwrap_or(q3);
        let outliers = values
            .iter()
            .copied()
            .filter(|v| !(lo_fence..=hi_fence).contains(v))
            .collect();

        Some(BoxSummary {
            lower_whisker,
            q1,
            median,
            q3,
            upper_whisker,
            outliers,
        })
    }
}

/// Gross distribution of one genre.
#[derive(Debug, Clone, PartialEq)]
pub struct GenreBox {
    pub genre: String,
    pub movies: usize,
    pub gross: BoxSummary,
}

fn genre_boxes(view: &MovieView<'_>, distribution: &GenreDistribution) -> Vec<GenreBox> {
    let movies = &view.table().movies;
    distribution
        .genres
        .iter()
        .filter_map(|(genre, n)| {
            let gross: Vec<f64> = distribution
                .observations
                .iter()
                .filter(|o| &o.genre == genre)
                .map(|o| movies[o.row].gross)
                .collect();
            Some(GenreBox {
                genre: genre.clone(),
                movies: *n,
                gross: BoxSummary::from_values(gross)?,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{Movie, MovieTable};

    fn table() -> MovieTable {
        let movie = |genres: &str, year: i32, gross: f64, score: f64| Movie {
            genres: genres.into(),
            title_year: year,
            budget: 1_000_000.0,
            gross,
            imdb_score: score,
            ..Movie::default()
        };
        MovieTable::new(
            vec![],
            vec![
                movie("Action|Drama", 2001, 10.0, 6.0),
                movie("Comedy", 2002, 20.0, 7.0),
                movie("Action", 2002, 30.0, 8.0),
            ],
        )
    }

    #[test]
    fn test_each_mode_builds_its_shape() {
        let t = table();
        let v = t.view();
        let settings = ChartSettings::default();

        for mode in ChartMode::ALL {
            let data = mode.build(&v, &settings);
            let matches = match (mode, &data) {
                (ChartMode::BudgetVsGross, ChartData::BudgetVsGross(p)) => p.len() == 3,
                (ChartMode::GrossByGenre, ChartData::GrossByGenre(b)) => b.len() == 3,
                (ChartMode::YearlyTrends, ChartData::YearlyTrends(y)) => y.len() == 2,
                (ChartMode::ScoreDistribution, ChartData::ScoreDistribution(h)) => {
                    h.len() == settings.histogram_bins
                }
                _ => false,
            };
            assert!(matches, "{} produced {data:?}", mode.label());
        }
    }

    #[test]
    fn test_genre_boxes_follow_top_genres() {
        let t = table();
        let settings = ChartSettings {
            top_genres: 1,
            ..ChartSettings::default()
        };
        let ChartData::GrossByGenre(boxes) = ChartMode::GrossByGenre.build(&t.view(), &settings)
        else {
            panic!("expected genre boxes");
        };
        assert_eq!(boxes.len(), 1);
        assert_eq!(boxes[0].genre, "Action");
        assert_eq!(boxes[0].movies, 2);
        assert_eq!(boxes[0].gross.median, 20.0);
    }

    #[test]
    fn test_empty_view_gives_empty_charts() {
        let t = MovieTable::empty();
        for mode in ChartMode::ALL {
            assert!(mode.build(&t.view(), &ChartSettings::default()).is_empty());
        }
    }

    #[test]
    fn test_box_summary_flags_outliers() {
        let summary = BoxSummary::from_values(vec![1.0, 2.0, 3.0, 4.0, 5.0, 100.0]).unwrap();
        assert_eq!(summary.q1, 2.25);
        assert_eq!(summary.median, 3.5);
        assert_eq!(summary.q3, 4.75);
        assert_eq!(summary.lower_whisker, 1.0);
        assert_eq!(summary.upper_whisker, 5.0);
        assert_eq!(summary.outliers, vec![100.0]);
        assert!(BoxSummary::from_values(Vec::new()).is_none());
    }
}

use std::borrow::Cow;
use std::collections::{BTreeMap, BTreeSet};

use indexmap::IndexMap;

use super::filter::ALL;
use super::model::{GENRES, MovieTable, MovieView, UNKNOWN_YEAR};

/// Budgets below this are treated as placeholders and left out of ROI.
pub const MIN_VALID_BUDGET: f64 = 1000.0;

// ---------------------------------------------------------------------------
// Summary scalars
// ---------------------------------------------------------------------------

pub fn count(view: &MovieView<'_>) -> usize {
    view.len()
}

/// Arithmetic mean, `None` for no values or a non-finite result.
fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, n) = values.fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    if n == 0 {
        return None;
    }
    let m = sum / n as f64;
    m.is_finite().then_some(m)
}

pub fn mean_score(view: &MovieView<'_>) -> Option<f64> {
    mean(view.iter().map(|m| m.imdb_score))
}

pub fn mean_budget(view: &MovieView<'_>) -> Option<f64> {
    mean(view.iter().map(|m| m.budget))
}

pub fn mean_gross(view: &MovieView<'_>) -> Option<f64> {
    mean(view.iter().map(|m| m.gross))
}

/// Median return on investment in percent.
///
/// Only rows with `budget >= MIN_VALID_BUDGET` and a positive gross count;
/// zero budgets mean "unknown" and never enter the ratio.
pub fn roi_summary(view: &MovieView<'_>) -> Option<f64> {
    let mut ratios: Vec<f64> = view
        .iter()
        .filter(|m| m.budget >= MIN_VALID_BUDGET && m.gross > 0.0)
        .map(|m| (m.gross - m.budget) / m.budget)
        .collect();
    median(&mut ratios).map(|r| r * 100.0)
}

/// Median of `values` (sorted in place); `None` when empty.
pub fn median(values: &mut [f64]) -> Option<f64> {
    values.sort_by(f64::total_cmp);
    quantile(values, 0.5)
}

/// Linearly interpolated quantile of already sorted values.
pub fn quantile(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let pos = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * frac)
}

// ---------------------------------------------------------------------------
// Most frequent value
// ---------------------------------------------------------------------------

/// The most common value across the given columns, read column by column.
///
/// The `genres` column contributes one value per genre name. Ties go to
/// the value seen first.
pub fn most_frequent(view: &MovieView<'_>, columns: &[&str]) -> Option<String> {
    let mut counts: IndexMap<Cow<'_, str>, usize> = IndexMap::new();
    for &col in columns {
        for movie in view.iter() {
            if col == GENRES {
                for genre in movie.genre_tokens() {
                    *counts.entry(Cow::Borrowed(genre)).or_default() += 1;
                }
            } else if let Some(value) = movie.field_text(col) {
                *counts.entry(value).or_default() += 1;
            }
        }
    }
    first_max(counts).map(Cow::into_owned)
}

/// Highest count, earliest insertion on ties.
fn first_max<K>(counts: IndexMap<K, usize>) -> Option<K> {
    let mut best: Option<(K, usize)> = None;
    for (key, n) in counts {
        let better = match &best {
            None => true,
            Some((_, top)) => n > *top,
        };
        if better {
            best = Some((key, n));
        }
    }
    best.map(|(key, _)| key)
}

// ---------------------------------------------------------------------------
// Yearly trend
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct YearlyPoint {
    pub year: i32,
    pub mean_budget: f64,
    pub mean_gross: f64,
}

/// Mean budget and gross per release year, ascending, unknown year excluded.
pub fn yearly_trend(view: &MovieView<'_>) -> Vec<YearlyPoint> {
    let mut groups: BTreeMap<i32, (f64, f64, usize)> = BTreeMap::new();
    for m in view.iter().filter(|m| m.title_year != UNKNOWN_YEAR) {
        let entry = groups.entry(m.title_year).or_default();
        entry.0 += m.budget;
        entry.1 += m.gross;
        entry.2 += 1;
    }
    groups
        .into_iter()
        .map(|(year, (budget, gross, n))| YearlyPoint {
            year,
            mean_budget: budget / n as f64,
            mean_gross: gross / n as f64,
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Genre distribution
// ---------------------------------------------------------------------------

/// One (movie, genre) pair after splitting the genre list.
#[derive(Debug, Clone, PartialEq)]
pub struct GenreObservation {
    pub genre: String,
    /// Index into the table's movies.
    pub row: usize,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GenreDistribution {
    /// Retained genres with their observation counts, most frequent first.
    pub genres: Vec<(String, usize)>,
    /// Observations whose genre is among `genres`, in view order.
    pub observations: Vec<GenreObservation>,
}

/// Explode genre lists and keep the `top_n` most frequent genres.
///
/// A movie tagged `Action|Drama` counts once for each genre. Ties keep the
/// genre encountered first.
pub fn genre_distribution(view: &MovieView<'_>, top_n: usize) -> GenreDistribution {
    let exploded: Vec<(&str, usize)> = view
        .rows()
        .iter()
        .flat_map(|&row| {
            view.table().movies[row]
                .genre_tokens()
                .map(move |g| (g, row))
        })
        .collect();

    let mut counts: IndexMap<&str, usize> = IndexMap::new();
    for (genre, _) in &exploded {
        *counts.entry(*genre).or_default() += 1;
    }
    let mut ranked: Vec<(&str, usize)> = counts.into_iter().collect();
    // Stable sort keeps first-encountered order among equal counts.
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked.truncate(top_n);

    let keep: BTreeSet<&str> = ranked.iter().map(|(g, _)| *g).collect();
    let observations = exploded
        .into_iter()
        .filter(|(g, _)| keep.contains(g))
        .map(|(g, row)| GenreObservation {
            genre: g.to_string(),
            row,
        })
        .collect();

    GenreDistribution {
        genres: ranked
            .into_iter()
            .map(|(g, n)| (g.to_string(), n))
            .collect(),
        observations,
    }
}

// ---------------------------------------------------------------------------
// Score histogram and scatter
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct HistogramBin {
    pub start: f64,
    pub end: f64,
    pub count: usize,
}

/// Equal-width histogram of IMDB scores between the observed min and max.
/// The last bin is closed on the right.
pub fn score_histogram(view: &MovieView<'_>, bins: usize) -> Vec<HistogramBin> {
    let scores: Vec<f64> = view.iter().map(|m| m.imdb_score).collect();
    if bins == 0 || scores.is_empty() {
        return Vec::new();
    }
    let min = scores.iter().copied().fold(f64::INFINITY, f64::min);
    let max = scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let width = (max - min) / bins as f64;
    if width <= f64::EPSILON {
        return vec![HistogramBin {
            start: min - 0.5,
            end: min + 0.5,
            count: scores.len(),
        }];
    }

    let mut out: Vec<HistogramBin> = (0..bins)
        .map(|i| HistogramBin {
            start: min + width * i as f64,
            end: min + width * (i + 1) as f64,
            count: 0,
        })
        .collect();
    for s in scores {
        let idx = (((s - min) / width) as usize).min(bins - 1);
        out[idx].count += 1;
    }
    out
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScatterPoint {
    pub title: String,
    pub budget: f64,
    pub gross: f64,
    pub imdb_score: f64,
}

/// Budget/gross pairs for a log-log scatter; rows with a non-positive
/// budget or gross cannot be placed on a log axis and are skipped.
pub fn budget_gross_points(view: &MovieView<'_>) -> Vec<ScatterPoint> {
    view.iter()
        .filter(|m| m.budget > 0.0 && m.gross > 0.0)
        .map(|m| ScatterPoint {
            title: m.title.clone(),
            budget: m.budget,
            gross: m.gross,
            imdb_score: m.imdb_score,
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Sidebar option lists
// ---------------------------------------------------------------------------

/// Smallest and largest known release year.
pub fn year_bounds(table: &MovieTable) -> Option<(i32, i32)> {
    let years = table
        .movies
        .iter()
        .map(|m| m.title_year)
        .filter(|&y| y != UNKNOWN_YEAR);
    years.fold(None, |acc, y| match acc {
        None => Some((y, y)),
        Some((lo, hi)) => Some((lo.min(y), hi.max(y))),
    })
}

/// [`ALL`] followed by every genre name, sorted.
pub fn genre_options(table: &MovieTable) -> Vec<String> {
    let names: BTreeSet<&str> = table.movies.iter().flat_map(|m| m.genre_tokens()).collect();
    with_all(names)
}

/// [`ALL`] followed by every name from the three actor columns, sorted.
pub fn actor_options(table: &MovieTable) -> Vec<String> {
    let names: BTreeSet<&str> = table
        .movies
        .iter()
        .flat_map(|m| m.actors.iter().map(String::as_str))
        .collect();
    with_all(names)
}

fn with_all(names: BTreeSet<&str>) -> Vec<String> {
    std::iter::once(ALL)
        .chain(names)
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{ACTOR_COLUMNS, Movie};

    fn movie(genres: &str, year: i32, budget: f64, gross: f64, score: f64) -> Movie {
        Movie {
            title: format!("{genres} {year}"),
            genres: genres.into(),
            title_year: year,
            budget,
            gross,
            imdb_score: score,
            ..Movie::default()
        }
    }

    fn table(movies: Vec<Movie>) -> MovieTable {
        MovieTable::new(vec![], movies)
    }

    #[test]
    fn test_empty_view_yields_no_data() {
        let t = MovieTable::empty();
        let v = t.view();
        assert_eq!(count(&v), 0);
        assert_eq!(mean_score(&v), None);
        assert_eq!(mean_budget(&v), None);
        assert_eq!(roi_summary(&v), None);
        assert!(yearly_trend(&v).is_empty());
        assert_eq!(genre_distribution(&v, 10), GenreDistribution::default());
        assert_eq!(most_frequent(&v, &[GENRES]), None);
        assert!(score_histogram(&v, 20).is_empty());
        assert_eq!(year_bounds(&t), None);
    }

    #[test]
    fn test_mean_score() {
        let t = table(vec![
            movie("Drama", 2000, 0.0, 0.0, 7.0),
            movie("Drama", 2001, 0.0, 0.0, 8.0),
            movie("Drama", 2002, 0.0, 0.0, 6.0),
        ]);
        assert_eq!(mean_score(&t.view()), Some(7.0));
    }

    #[test]
    fn test_roi_is_median_over_valid_budgets() {
        let t = table(vec![
            movie("Drama", 2000, 100.0, 10_000.0, 7.0), // budget below threshold
            movie("Drama", 2000, 1000.0, 2000.0, 7.0),  // +100%
            movie("Drama", 2000, 2000.0, 1000.0, 7.0),  // -50%
            movie("Drama", 2000, 1000.0, 4000.0, 7.0),  // +300%
            movie("Drama", 2000, 5000.0, 0.0, 7.0),     // unknown gross
        ]);
        assert_eq!(roi_summary(&t.view()), Some(100.0));
    }

    #[test]
    fn test_roi_with_only_zero_budgets_is_no_data() {
        let t = table(vec![
            movie("Drama", 2000, 0.0, 5_000_000.0, 7.0),
            movie("Drama", 2001, 0.0, 1_000.0, 7.0),
        ]);
        assert_eq!(roi_summary(&t.view()), None);
    }

    #[test]
    fn test_median_even_count_interpolates() {
        let mut values = [4.0, 1.0, 3.0, 2.0];
        assert_eq!(median(&mut values), Some(2.5));
        assert_eq!(quantile(&values, 0.25), Some(1.75));
    }

    #[test]
    fn test_yearly_trend_skips_unknown_year() {
        let t = table(vec![
            movie("Drama", 2005, 100.0, 300.0, 7.0),
            movie("Drama", 0, 999.0, 999.0, 7.0),
            movie("Drama", 1999, 10.0, 20.0, 7.0),
            movie("Drama", 2005, 200.0, 100.0, 7.0),
        ]);
        assert_eq!(
            yearly_trend(&t.view()),
            vec![
                YearlyPoint { year: 1999, mean_budget: 10.0, mean_gross: 20.0 },
                YearlyPoint { year: 2005, mean_budget: 150.0, mean_gross: 200.0 },
            ]
        );
    }

    #[test]
    fn test_genre_distribution_top_two_breaks_ties_by_first_seen() {
        let t = table(vec![
            movie("Action|Drama", 2000, 0.0, 0.0, 7.0),
            movie("Comedy", 2000, 0.0, 0.0, 7.0),
            movie("Action", 2000, 0.0, 0.0, 7.0),
        ]);
        let dist = genre_distribution(&t.view(), 2);
        assert_eq!(
            dist.genres,
            vec![("Action".to_string(), 2), ("Drama".to_string(), 1)]
        );
        let rows: Vec<(&str, usize)> = dist
            .observations
            .iter()
            .map(|o| (o.genre.as_str(), o.row))
            .collect();
        assert_eq!(rows, [("Action", 0), ("Drama", 0), ("Action", 2)]);
    }

    #[test]
    fn test_genre_distribution_caps_distinct_genres() {
        let names = [
            "Action", "Adventure", "Animation", "Biography", "Comedy", "Crime",
            "Documentary", "Drama", "Family", "Fantasy", "History", "Horror",
        ];
        let movies = names
            .iter()
            .enumerate()
            .map(|(i, _)| movie(&names[..=i].join("|"), 2000, 0.0, 0.0, 7.0))
            .collect();
        let t = table(movies);
        let dist = genre_distribution(&t.view(), 10);

        assert_eq!(dist.genres.len(), 10);
        let kept: BTreeSet<&str> = dist.genres.iter().map(|(g, _)| g.as_str()).collect();
        assert!(dist.observations.iter().all(|o| kept.contains(o.genre.as_str())));
        assert!(!kept.contains("Horror"));
    }

    #[test]
    fn test_most_frequent_actor_across_columns() {
        let mut a = movie("Drama", 2000, 0.0, 0.0, 7.0);
        a.actors = ["Tom Hanks".into(), "Meg Ryan".into(), "Bill Pullman".into()];
        let mut b = movie("Comedy", 2000, 0.0, 0.0, 7.0);
        b.actors = ["Meg Ryan".into(), "Tom Hanks".into(), "Greg Kinnear".into()];
        let mut c = movie("Drama", 2000, 0.0, 0.0, 7.0);
        c.actors = ["Kevin Kline".into(), "Greg Kinnear".into(), "Meg Ryan".into()];
        let t = table(vec![a, b, c]);

        assert_eq!(
            most_frequent(&t.view(), &ACTOR_COLUMNS),
            Some("Meg Ryan".to_string())
        );
        assert_eq!(most_frequent(&t.view(), &[GENRES]), Some("Drama".to_string()));
    }

    #[test]
    fn test_most_frequent_tie_goes_to_first_seen() {
        let t = table(vec![
            movie("Western|Comedy", 2000, 0.0, 0.0, 7.0),
            movie("Comedy|Western", 2000, 0.0, 0.0, 7.0),
        ]);
        assert_eq!(most_frequent(&t.view(), &[GENRES]), Some("Western".to_string()));
    }

    #[test]
    fn test_score_histogram_bins() {
        let t = table(vec![
            movie("Drama", 2000, 0.0, 0.0, 2.0),
            movie("Drama", 2000, 0.0, 0.0, 4.0),
            movie("Drama", 2000, 0.0, 0.0, 7.0),
            movie("Drama", 2000, 0.0, 0.0, 10.0),
            movie("Drama", 2000, 0.0, 0.0, 9.5),
        ]);
        let bins = score_histogram(&t.view(), 4);
        assert_eq!(bins.len(), 4);
        assert_eq!(bins[0].start, 2.0);
        assert_eq!(bins[3].end, 10.0);
        let counts: Vec<usize> = bins.iter().map(|b| b.count).collect();
        assert_eq!(counts, [1, 1, 1, 2]);
    }

    #[test]
    fn test_budget_gross_points_skip_unknown_money() {
        let t = table(vec![
            movie("Drama", 2000, 0.0, 100.0, 7.0),
            movie("Drama", 2000, 50.0, 100.0, 7.5),
            movie("Drama", 2000, 50.0, 0.0, 7.0),
        ]);
        let points = budget_gross_points(&t.view());
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].imdb_score, 7.5);
    }

    #[test]
    fn test_options_lists() {
        let mut m = movie("Drama|Action", 1999, 0.0, 0.0, 7.0);
        m.actors = ["Zoe".into(), "Adam".into(), "Unknown".into()];
        let t = table(vec![m, movie("Comedy", 0, 0.0, 0.0, 7.0)]);

        assert_eq!(genre_options(&t), ["All", "Action", "Comedy", "Drama"]);
        assert_eq!(actor_options(&t), ["All", "Adam", "Unknown", "Zoe"]);
        assert_eq!(year_bounds(&t), Some((1999, 1999)));
    }
}

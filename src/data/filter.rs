use std::collections::BTreeSet;

use super::aggregate::year_bounds;
use super::model::{MovieTable, MovieView};
use crate::error::DashboardError;

/// Selection value that switches a multi-select filter off.
pub const ALL: &str = "All";

/// Year range offered when the table has no known years.
pub const FALLBACK_YEAR_RANGE: (i32, i32) = (1900, 2020);

// ---------------------------------------------------------------------------
// Filter predicate: the current sidebar selections
// ---------------------------------------------------------------------------

/// The user's current selections, validated by the UI before use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterState {
    /// Inclusive `(min, max)` release year.
    pub year_range: (i32, i32),
    /// Selected genre names; containing [`ALL`] or nothing disables the genre filter.
    pub genres: BTreeSet<String>,
    /// Selected actor names; containing [`ALL`] disables the actor filter.
    pub actors: BTreeSet<String>,
    /// Case-insensitive title substring; empty disables the title filter.
    pub title_query: String,
}

impl FilterState {
    /// Everything selected: full year bounds, all genres, all actors, no search.
    pub fn unrestricted(table: &MovieTable) -> Self {
        FilterState {
            year_range: year_bounds(table).unwrap_or(FALLBACK_YEAR_RANGE),
            genres: BTreeSet::from([ALL.to_string()]),
            actors: BTreeSet::from([ALL.to_string()]),
            title_query: String::new(),
        }
    }

    /// An empty genre selection keeps every row, unlike an empty actor selection.
    pub fn genre_filter_active(&self) -> bool {
        !self.genres.is_empty() && !self.genres.contains(ALL)
    }

    pub fn actor_filter_active(&self) -> bool {
        !self.actors.contains(ALL)
    }
}

/// Apply all active predicates, failing if the state cannot be evaluated.
///
/// Predicates run in order year, genre, actor, title and are conjunctive.
/// A row passes the genre filter when any selected name is a
/// case-insensitive substring of its genre string, and the actor filter when
/// any of its three actor cells equals a selected name.
pub fn try_apply<'a>(
    view: &MovieView<'a>,
    state: &FilterState,
) -> Result<MovieView<'a>, DashboardError> {
    let (min_year, max_year) = state.year_range;
    if min_year > max_year {
        return Err(DashboardError::FilterFailure(format!(
            "year range {min_year}..={max_year} is inverted"
        )));
    }
    if view.is_empty() {
        return Ok(view.clone());
    }

    let mut out = view.retain(|m| (min_year..=max_year).contains(&m.title_year));

    if state.genre_filter_active() {
        let needles: Vec<String> = state.genres.iter().map(|g| g.to_lowercase()).collect();
        out = out.retain(|m| {
            let haystack = m.genres.to_lowercase();
            needles.iter().any(|n| haystack.contains(n.as_str()))
        });
    }

    if state.actor_filter_active() {
        out = out.retain(|m| m.actors.iter().any(|a| state.actors.contains(a)));
    }

    if !state.title_query.is_empty() {
        let needle = state.title_query.to_lowercase();
        out = out.retain(|m| m.title.to_lowercase().contains(&needle));
    }

    Ok(out)
}

/// Apply the filters, falling back to the unfiltered view if they fail.
///
/// Load errors give an empty table but filter errors give everything; the
/// dashboard prefers showing data over showing nothing here.
pub fn apply<'a>(view: &MovieView<'a>, state: &FilterState) -> MovieView<'a> {
    match try_apply(view, state) {
        Ok(filtered) => filtered,
        Err(e) => {
            log::warn!("{e}; showing unfiltered data");
            view.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Movie;

    fn movie(title: &str, genres: &str, actors: [&str; 3], year: i32) -> Movie {
        Movie {
            title: title.into(),
            genres: genres.into(),
            actors: actors.map(String::from),
            title_year: year,
            ..Movie::default()
        }
    }

    fn sample_table() -> MovieTable {
        MovieTable::new(
            vec![],
            vec![
                movie("The Matrix", "Action|Sci-Fi", ["Keanu Reeves", "Laurence Fishburne", "Carrie-Anne Moss"], 1999),
                movie("Lost Reel", "Drama", ["Unknown", "Unknown", "Unknown"], 0),
                movie("Constantine", "Drama|Fantasy|Horror", ["Keanu Reeves", "Rachel Weisz", "Shia LaBeouf"], 2005),
                movie("The Matrix Reloaded", "Action|Sci-Fi", ["Keanu Reeves", "Hugo Weaving", "Jada Pinkett Smith"], 2003),
                movie("Mean Girls", "Comedy", ["Lindsay Lohan", "Rachel McAdams", "Tina Fey"], 2004),
            ],
        )
    }

    fn titles(view: &MovieView<'_>) -> Vec<String> {
        view.iter().map(|m| m.title.clone()).collect()
    }

    #[test]
    fn test_unrestricted_state_keeps_everything() {
        let table = sample_table();
        let state = FilterState::unrestricted(&table);
        assert_eq!(state.year_range, (1999, 2005));

        // Widen to cover the unknown-year row as well.
        let state = FilterState {
            year_range: (0, 2005),
            ..state
        };
        let all = table.view();
        assert_eq!(apply(&all, &state), all);
    }

    #[test]
    fn test_year_range_excludes_unknown_year() {
        let table = MovieTable::new(
            vec![],
            vec![
                movie("a", "Drama", ["x", "y", "z"], 1999),
                movie("b", "Drama", ["x", "y", "z"], 0),
                movie("c", "Drama", ["x", "y", "z"], 2005),
            ],
        );
        let mut state = FilterState::unrestricted(&table);
        state.year_range = (1999, 2005);
        let out = apply(&table.view(), &state);
        assert_eq!(out.rows(), &[0, 2]);

        state.year_range = (0, 2005);
        let out = apply(&table.view(), &state);
        assert_eq!(out.rows(), &[0, 1, 2]);
    }

    #[test]
    fn test_genre_filter_is_case_insensitive_substring() {
        let table = sample_table();
        let mut state = FilterState::unrestricted(&table);
        state.year_range = (0, 2100);
        state.genres = BTreeSet::from(["sci-fi".to_string(), "Horror".to_string()]);

        let out = apply(&table.view(), &state);
        assert_eq!(
            titles(&out),
            ["The Matrix", "Constantine", "The Matrix Reloaded"]
        );
    }

    #[test]
    fn test_all_disables_genre_filter_even_with_other_names() {
        let table = sample_table();
        let mut state = FilterState::unrestricted(&table);
        state.year_range = (0, 2100);
        state.genres = BTreeSet::from([ALL.to_string(), "Comedy".to_string()]);
        assert_eq!(apply(&table.view(), &state).len(), 5);
    }

    #[test]
    fn test_empty_genre_selection_keeps_everything() {
        let table = MovieTable::new(
            vec![],
            vec![movie("Heat", "Drama", ["Al Pacino", "Unknown", "Unknown"], 1995)],
        );
        let mut state = FilterState::unrestricted(&table);
        state.genres.clear();
        assert!(!state.genre_filter_active());
        assert_eq!(apply(&table.view(), &state).rows(), &[0]);
    }

    #[test]
    fn test_empty_actor_selection_matches_nothing() {
        let table = sample_table();
        let mut state = FilterState::unrestricted(&table);
        state.actors.clear();
        assert!(apply(&table.view(), &state).is_empty());
    }

    #[test]
    fn test_actor_filter_matches_any_actor_column() {
        let table = sample_table();
        let mut state = FilterState::unrestricted(&table);
        state.actors = BTreeSet::from(["Rachel Weisz".to_string(), "Tina Fey".to_string()]);

        let out = apply(&table.view(), &state);
        assert_eq!(titles(&out), ["Constantine", "Mean Girls"]);
    }

    #[test]
    fn test_actor_filter_requires_exact_name() {
        let table = sample_table();
        let mut state = FilterState::unrestricted(&table);
        state.actors = BTreeSet::from(["keanu reeves".to_string()]);
        assert!(apply(&table.view(), &state).is_empty());
    }

    #[test]
    fn test_title_search_and_conjunction() {
        let table = sample_table();
        let mut state = FilterState::unrestricted(&table);
        state.title_query = "MATRIX".into();
        state.year_range = (2000, 2005);

        let out = apply(&table.view(), &state);
        assert_eq!(titles(&out), ["The Matrix Reloaded"]);
    }

    #[test]
    fn test_apply_is_idempotent() {
        let table = sample_table();
        let mut state = FilterState::unrestricted(&table);
        state.genres = BTreeSet::from(["Action".to_string()]);
        state.title_query = "the".into();

        let once = apply(&table.view(), &state);
        let twice = apply(&once, &state);
        assert_eq!(once, twice);
        assert_eq!(once.len(), 2);
    }

    #[test]
    fn test_inverted_range_fails_open() {
        let table = sample_table();
        let mut state = FilterState::unrestricted(&table);
        state.year_range = (2005, 1999);
        state.title_query = "matrix".into();

        assert!(matches!(
            try_apply(&table.view(), &state),
            Err(DashboardError::FilterFailure(_))
        ));
        assert_eq!(apply(&table.view(), &state), table.view());
    }

    #[test]
    fn test_empty_table_passes_through() {
        let table = MovieTable::empty();
        let state = FilterState::unrestricted(&table);
        assert_eq!(state.year_range, FALLBACK_YEAR_RANGE);
        let out = apply(&table.view(), &state);
        assert!(out.is_empty());
    }
}

use std::borrow::Cow;
use std::collections::BTreeMap;

// ---------------------------------------------------------------------------
// Column names
// ---------------------------------------------------------------------------

/// Header used by the IMDB 5000 export for the movie title.
pub const MOVIE_TITLE: &str = "movie_title";
/// Alternative title header accepted at ingestion.
pub const TITLE: &str = "title";
pub const GENRES: &str = "genres";
pub const ACTOR_COLUMNS: [&str; 3] = ["actor_1_name", "actor_2_name", "actor_3_name"];
pub const TITLE_YEAR: &str = "title_year";
pub const BUDGET: &str = "budget";
pub const GROSS: &str = "gross";
pub const IMDB_SCORE: &str = "imdb_score";

/// Fill value for missing genre and actor cells.
pub const UNKNOWN: &str = "Unknown";

/// `title_year` value meaning "year not known".
pub const UNKNOWN_YEAR: i32 = 0;

/// Delimiter between genre names in the `genres` column.
pub const GENRE_SEPARATOR: char = '|';

// ---------------------------------------------------------------------------
// Movie – one row of the source table
// ---------------------------------------------------------------------------

/// A single movie with the interpreted columns typed and defaults applied.
#[derive(Debug, Clone, PartialEq)]
pub struct Movie {
    /// Canonical title, read from `movie_title` (or `title`).
    pub title: String,
    /// `|`-delimited genre list.
    pub genres: String,
    /// `actor_1_name`, `actor_2_name`, `actor_3_name`.
    pub actors: [String; 3],
    /// Release year, [`UNKNOWN_YEAR`] when absent.
    pub title_year: i32,
    pub budget: f64,
    pub gross: f64,
    pub imdb_score: f64,
    /// Every other source column, kept verbatim.
    pub extra: BTreeMap<String, String>,
}

impl Default for Movie {
    fn default() -> Self {
        Movie {
            title: String::new(),
            genres: UNKNOWN.to_string(),
            actors: [UNKNOWN.to_string(), UNKNOWN.to_string(), UNKNOWN.to_string()],
            title_year: UNKNOWN_YEAR,
            budget: 0.0,
            gross: 0.0,
            imdb_score: 0.0,
            extra: BTreeMap::new(),
        }
    }
}

impl Movie {
    /// Individual genre names, trimmed, empty tokens skipped.
    pub fn genre_tokens(&self) -> impl Iterator<Item = &str> {
        self.genres
            .split(GENRE_SEPARATOR)
            .map(str::trim)
            .filter(|g| !g.is_empty())
    }

    /// Text rendering of a column as it would appear in a CSV cell.
    ///
    /// Both title headers resolve to [`Movie::title`]. Unknown columns that
    /// are not among the pass-through values return `None`.
    pub fn field_text(&self, column: &str) -> Option<Cow<'_, str>> {
        // A second title header shadowed by the canonical one lives in `extra`.
        if let Some(raw) = self.extra.get(column) {
            return Some(Cow::Borrowed(raw.as_str()));
        }
        let text = match column {
            MOVIE_TITLE | TITLE => Cow::Borrowed(self.title.as_str()),
            GENRES => Cow::Borrowed(self.genres.as_str()),
            TITLE_YEAR => Cow::Owned(self.title_year.to_string()),
            BUDGET => Cow::Owned(self.budget.to_string()),
            GROSS => Cow::Owned(self.gross.to_string()),
            IMDB_SCORE => Cow::Owned(self.imdb_score.to_string()),
            other => match ACTOR_COLUMNS.iter().position(|c| *c == other) {
                Some(i) => Cow::Borrowed(self.actors[i].as_str()),
                None => return None,
            },
        };
        Some(text)
    }
}

// ---------------------------------------------------------------------------
// MovieTable – the complete loaded dataset
// ---------------------------------------------------------------------------

/// The full parsed table. Immutable once loaded.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MovieTable {
    /// Source header names in file order.
    pub columns: Vec<String>,
    pub movies: Vec<Movie>,
}

impl MovieTable {
    pub fn new(columns: Vec<String>, movies: Vec<Movie>) -> Self {
        MovieTable { columns, movies }
    }

    /// Table with no rows and no columns, the "no data" result of a failed load.
    pub fn empty() -> Self {
        MovieTable::default()
    }

    pub fn len(&self) -> usize {
        self.movies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.movies.is_empty()
    }

    /// A view selecting every row.
    pub fn view(&self) -> MovieView<'_> {
        MovieView::new(self, (0..self.len()).collect())
    }
}

// ---------------------------------------------------------------------------
// MovieView – a filtered selection over a table
// ---------------------------------------------------------------------------

/// Ordered row indices into a borrowed [`MovieTable`].
#[derive(Debug, Clone)]
pub struct MovieView<'a> {
    table: &'a MovieTable,
    rows: Vec<usize>,
}

impl<'a> MovieView<'a> {
    pub fn new(table: &'a MovieTable, rows: Vec<usize>) -> Self {
        MovieView { table, rows }
    }

    pub fn table(&self) -> &'a MovieTable {
        self.table
    }

    /// Indices into `table().movies`, in table order.
    pub fn rows(&self) -> &[usize] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a Movie> + '_ {
        let movies = &self.table.movies;
        self.rows.iter().map(move |&i| &movies[i])
    }

    /// Keep only the rows for which `keep` returns true.
    pub fn retain(&self, mut keep: impl FnMut(&Movie) -> bool) -> MovieView<'a> {
        let movies = &self.table.movies;
        let rows = self
            .rows
            .iter()
            .copied()
            .filter(|&i| keep(&movies[i]))
            .collect();
        MovieView::new(self.table, rows)
    }
}

impl PartialEq for MovieView<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.table, other.table) && self.rows == other.rows
    }
}

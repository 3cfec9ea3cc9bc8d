use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;
use std::sync::{Arc, OnceLock};

use anyhow::{Context, Result, bail};

use super::model::{
    ACTOR_COLUMNS, BUDGET, GENRES, GROSS, IMDB_SCORE, MOVIE_TITLE, Movie, MovieTable, TITLE,
    TITLE_YEAR, UNKNOWN,
};
use crate::error::DashboardError;

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load the movie table from a CSV file.
///
/// A missing file is [`DashboardError::DataSourceMissing`]; anything else that
/// stops the parse (I/O, malformed CSV, missing columns, non-numeric cells in
/// numeric columns) is [`DashboardError::DataLoadFailure`].
pub fn load_file(path: &Path) -> Result<MovieTable, DashboardError> {
    if !path.exists() {
        return Err(DashboardError::DataSourceMissing {
            path: path.to_path_buf(),
        });
    }
    let file = std::fs::File::open(path).map_err(|e| DashboardError::load_failure(path, e))?;
    parse_csv(file).map_err(|e| DashboardError::load_failure(path, format!("{e:#}")))
}

/// Result of a load that never fails: the table, or an empty one plus the
/// condition that caused it.
#[derive(Debug, Clone)]
pub struct LoadedTable {
    pub table: Arc<MovieTable>,
    pub error: Option<DashboardError>,
}

/// Load `path`, degrading to an empty table on any error.
pub fn load_or_empty(path: &Path) -> LoadedTable {
    match load_file(path) {
        Ok(table) => {
            log::info!(
                "Loaded {} movies with columns {:?} from {}",
                table.len(),
                table.columns,
                path.display()
            );
            LoadedTable {
                table: Arc::new(table),
                error: None,
            }
        }
        Err(e) => {
            log::error!("{e}");
            LoadedTable {
                table: Arc::new(MovieTable::empty()),
                error: Some(e),
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Process-wide cache
// ---------------------------------------------------------------------------

/// Holds the result of the first load for the rest of the process.
///
/// The source file is assumed static, so there is no invalidation and the
/// path given to later calls is ignored.
#[derive(Debug, Default)]
pub struct TableCache {
    cell: OnceLock<LoadedTable>,
}

impl TableCache {
    pub const fn new() -> Self {
        TableCache {
            cell: OnceLock::new(),
        }
    }

    pub fn get_or_load(&self, path: &Path) -> &LoadedTable {
        self.cell.get_or_init(|| load_or_empty(path))
    }
}

static SHARED: TableCache = TableCache::new();

/// The process-wide table, read from `path` on first use.
pub fn shared_table(path: &Path) -> &'static LoadedTable {
    SHARED.get_or_load(path)
}

// ---------------------------------------------------------------------------
// CSV parsing
// ---------------------------------------------------------------------------

/// Column positions of the interpreted fields within a header row.
struct Layout {
    title: usize,
    genres: usize,
    actors: [usize; 3],
    title_year: usize,
    budget: usize,
    gross: usize,
    imdb_score: usize,
}

impl Layout {
    fn from_headers(headers: &[String]) -> Result<Self> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h == name)
                .with_context(|| format!("CSV missing '{name}' column"))
        };
        let title = headers
            .iter()
            .position(|h| h == MOVIE_TITLE)
            .or_else(|| headers.iter().position(|h| h == TITLE))
            .with_context(|| format!("CSV missing '{MOVIE_TITLE}' or '{TITLE}' column"))?;

        Ok(Layout {
            title,
            genres: find(GENRES)?,
            actors: [
                find(ACTOR_COLUMNS[0])?,
                find(ACTOR_COLUMNS[1])?,
                find(ACTOR_COLUMNS[2])?,
            ],
            title_year: find(TITLE_YEAR)?,
            budget: find(BUDGET)?,
            gross: find(GROSS)?,
            imdb_score: find(IMDB_SCORE)?,
        })
    }

    fn is_interpreted(&self, idx: usize) -> bool {
        idx == self.title
            || idx == self.genres
            || self.actors.contains(&idx)
            || idx == self.title_year
            || idx == self.budget
            || idx == self.gross
            || idx == self.imdb_score
    }
}

/// Parse a movie CSV, applying the per-column defaults for missing cells.
///
/// Layout: a header row with at least the title (`movie_title` or `title`),
/// `genres`, `actor_{1,2,3}_name`, `title_year`, `budget`, `gross` and
/// `imdb_score` columns. Any further columns are carried through as text.
pub fn parse_csv<R: Read>(reader: R) -> Result<MovieTable> {
    // Short rows are padded with empty cells, which then take the defaults.
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let layout = Layout::from_headers(&headers)?;
    let extra_cols: Vec<(usize, &String)> = headers
        .iter()
        .enumerate()
        .filter(|(i, _)| !layout.is_interpreted(*i))
        .collect();

    let mut movies = Vec::new();

    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        let cell = |idx: usize| record.get(idx).unwrap_or("");

        let mut extra = BTreeMap::new();
        for (idx, name) in &extra_cols {
            extra.insert((*name).clone(), cell(*idx).to_string());
        }

        movies.push(Movie {
            title: cell(layout.title).trim().to_string(),
            genres: text_or_unknown(cell(layout.genres)),
            actors: layout.actors.map(|idx| text_or_unknown(cell(idx))),
            title_year: parse_year(cell(layout.title_year), row_no)?,
            budget: parse_number(cell(layout.budget), row_no, BUDGET)?,
            gross: parse_number(cell(layout.gross), row_no, GROSS)?,
            imdb_score: parse_number(cell(layout.imdb_score), row_no, IMDB_SCORE)?,
            extra,
        });
    }

    Ok(MovieTable::new(headers, movies))
}

fn text_or_unknown(s: &str) -> String {
    let s = s.trim();
    if s.is_empty() {
        UNKNOWN.to_string()
    } else {
        s.to_string()
    }
}

/// Empty and NaN cells become `0.0`.
fn parse_number(s: &str, row: usize, col: &str) -> Result<f64> {
    let s = s.trim();
    if s.is_empty() {
        return Ok(0.0);
    }
    let v = s
        .parse::<f64>()
        .with_context(|| format!("Row {row}, {col}: '{s}' is not a number"))?;
    Ok(if v.is_nan() { 0.0 } else { v })
}

/// Years may be written as `2009` or `2009.0`; missing years become the sentinel.
fn parse_year(s: &str, row: usize) -> Result<i32> {
    if let Ok(year) = s.trim().parse::<i32>() {
        return Ok(year);
    }
    let v = parse_number(s, row, TITLE_YEAR)?;
    if !v.is_finite() || v < i32::MIN as f64 || v > i32::MAX as f64 {
        bail!("Row {row}, {TITLE_YEAR}: {v} is not a valid year");
    }
    Ok(v.trunc() as i32)
}

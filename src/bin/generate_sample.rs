use std::path::Path;

use anyhow::{Context, Result};

const OUTPUT_PATH: &str = "data/movie_metadata.csv";
const MOVIES: usize = 600;

const HEADER: [&str; 12] = [
    "color",
    "director_name",
    "movie_title",
    "genres",
    "actor_1_name",
    "actor_2_name",
    "actor_3_name",
    "title_year",
    "budget",
    "gross",
    "imdb_score",
    "content_rating",
];

const GENRES: [&str; 14] = [
    "Action", "Adventure", "Animation", "Biography", "Comedy", "Crime", "Drama", "Family",
    "Fantasy", "Horror", "Mystery", "Romance", "Sci-Fi", "Thriller",
];

const FIRST_NAMES: [&str; 12] = [
    "Ava", "Ben", "Clara", "Dev", "Elena", "Felix", "Grace", "Hugo", "Iris", "Jonah", "Kira",
    "Leo",
];

const LAST_NAMES: [&str; 10] = [
    "Archer", "Blake", "Castro", "Dunn", "Ellis", "Fontaine", "Garcia", "Hale", "Ito", "Jensen",
];

const TITLE_WORDS: [&str; 16] = [
    "Night", "River", "Last", "Silent", "Empire", "Garden", "Storm", "Echo", "Iron", "Summer",
    "Shadow", "Crown", "Glass", "Harbor", "Wild", "Signal",
];

const RATINGS: [&str; 4] = ["G", "PG", "PG-13", "R"];

/// Columns that may be left empty: genres through gross.
const BLANKABLE: std::ops::Range<usize> = 3..10;

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }

    fn pick<'a>(&mut self, items: &[&'a str]) -> &'a str {
        items[(self.next_u64() % items.len() as u64) as usize]
    }

    /// True with probability `p`.
    fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }
}

fn person(rng: &mut SimpleRng) -> String {
    format!("{} {}", rng.pick(&FIRST_NAMES), rng.pick(&LAST_NAMES))
}

/// One CSV row in `HEADER` order. Roughly one optional cell in twenty is
/// left blank so the loader's default filling gets exercised.
fn movie_row(rng: &mut SimpleRng, n: usize) -> Vec<String> {
    let title = format!("{} {} {}", rng.pick(&TITLE_WORDS), rng.pick(&TITLE_WORDS), n);

    let mut genres: Vec<&str> = Vec::new();
    for _ in 0..1 + rng.next_u64() % 3 {
        let g = rng.pick(&GENRES);
        if !genres.contains(&g) {
            genres.push(g);
        }
    }

    let year = 1960 + (rng.next_u64() % 57) as i64;
    let budget = (rng.gauss(17.0, 1.2).exp()).round().max(0.0);
    // Later films earn more on average; log-normal spread around the budget.
    let gross = (budget * rng.gauss(0.0, 0.8).exp() * (1.0 + (year - 1960) as f64 / 60.0)).round();
    let score = rng.gauss(6.4, 1.0).clamp(1.6, 9.5);

    let color = rng.pick(&["Color", "Color", "Color", "Black and White"]);
    let director = person(rng);
    let [lead, second, third] = [person(rng), person(rng), person(rng)];

    let mut row = vec![
        color.to_string(),
        director,
        // The IMDB export pads titles with a trailing non-breaking space.
        format!("{title}\u{a0}"),
        genres.join("|"),
        lead,
        second,
        third,
        format!("{year}.0"),
        format!("{budget}"),
        format!("{gross}"),
        format!("{score:.1}"),
        rng.pick(&RATINGS).to_string(),
    ];
    for cell in &mut row[BLANKABLE] {
        if rng.chance(0.05) {
            cell.clear();
        }
    }
    row
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);

    let output_path = Path::new(OUTPUT_PATH);
    if let Some(dir) = output_path.parent() {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("creating {}", dir.display()))?;
    }

    let mut writer = csv::Writer::from_path(output_path)
        .with_context(|| format!("creating {OUTPUT_PATH}"))?;
    writer.write_record(HEADER).context("writing header")?;
    for n in 0..MOVIES {
        let row = movie_row(&mut rng, n);
        writer
            .write_record(&row)
            .with_context(|| format!("writing movie {n}"))?;
    }
    writer.flush().context("flushing output")?;

    println!("Wrote {MOVIES} movies to {OUTPUT_PATH}");
    Ok(())
}

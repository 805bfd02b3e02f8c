//! Approximate name matching over the Name Index.
//!
//! # Scoring
//!
//! Query and candidate are lowercased and compared character by character.
//! For every end position in the candidate, an approximate-substring
//! alignment (edit distance with free start, adjacent transpositions costing
//! one edit) gives the fewest `errors` and the `start` of the aligned span.
//! Each alignment is scored as
//!
//! ```text
//! score = errors / query_len + offset / distance
//! ```
//!
//! where `offset` is how far `start` lies from the beginning of its word.
//! A candidate's score is the lowest over all its alignments. `0.0` is a
//! perfect match. A candidate matches when its best score is at
//! or below `threshold`, so `distance` bounds how deep inside a word a match
//! may start before it is rejected.
//!
//! Results are ordered by score; equal scores keep corpus order.

use std::cmp::Ordering;

pub const DEFAULT_DISTANCE: usize = 45;
pub const DEFAULT_THRESHOLD: f64 = 0.4;

/// Matcher tuning.
#[derive(Debug, Clone, PartialEq)]
pub struct FuzzyOptions {
    /// Characters from a word start over which the location penalty grows
    /// from 0 to 1.
    pub distance: usize,
    /// Maximum accepted score, in `[0, 1]`.
    pub threshold: f64,
    /// Cap on the number of results, `None` for unbounded.
    pub max_results: Option<usize>,
}

impl Default for FuzzyOptions {
    fn default() -> Self {
        Self {
            distance: DEFAULT_DISTANCE,
            threshold: DEFAULT_THRESHOLD,
            max_results: None,
        }
    }
}

/// One accepted candidate.
#[derive(Debug, Clone, PartialEq)]
pub struct FuzzyMatch<'a> {
    /// Position of the item in the corpus.
    pub index: usize,
    pub item: &'a str,
    pub score: f64,
}

#[derive(Debug, Clone, Default)]
pub struct FuzzyMatcher {
    options: FuzzyOptions,
}

#[derive(Clone, Copy)]
struct Cell {
    errors: usize,
    start: usize,
}

impl FuzzyMatcher {
    pub fn new(options: FuzzyOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &FuzzyOptions {
        &self.options
    }

    /// Ranked names from `corpus` matching `query`. An empty query matches
    /// nothing.
    pub fn search<S: AsRef<str>>(&self, corpus: &[S], query: &str) -> Vec<String> {
        self.search_scored(corpus, query)
            .into_iter()
            .map(|m| m.item.to_string())
            .collect()
    }

    pub fn search_scored<'a, S: AsRef<str>>(
        &self,
        corpus: &'a [S],
        query: &str,
    ) -> Vec<FuzzyMatch<'a>> {
        let pattern = fold(query.trim());
        if pattern.is_empty() {
            return Vec::new();
        }

        let mut matches: Vec<FuzzyMatch<'a>> = corpus
            .iter()
            .enumerate()
            .filter_map(|(index, item)| {
                let item = item.as_ref();
                self.score(&pattern, &fold(item))
                    .map(|score| FuzzyMatch { index, item, score })
            })
            .collect();

        // Stable: ties stay in corpus order.
        matches.sort_by(|a, b| a.score.partial_cmp(&b.score).unwrap_or(Ordering::Equal));

        if let Some(max) = self.options.max_results {
            matches.truncate(max);
        }
        matches
    }

    fn score(&self, pattern: &[char], text: &[char]) -> Option<f64> {
        if pattern == text {
            return Some(0.0);
        }

        let penalties: Vec<f64> = (0..=text.len())
            .map(|start| self.location_penalty(start - word_start(text, start)))
            .collect();
        let cost = |cell: Cell| cell.errors as f64 / pattern.len() as f64 + penalties[cell.start];

        let best = alignments(pattern, text, &cost)
            .into_iter()
            .map(&cost)
            .fold(f64::INFINITY, f64::min);

        (best <= self.options.threshold).then_some(best)
    }

    fn location_penalty(&self, offset: usize) -> f64 {
        if offset == 0 {
            0.0
        } else if self.options.distance == 0 {
            1.0
        } else {
            offset as f64 / self.options.distance as f64
        }
    }
}

fn fold(s: &str) -> Vec<char> {
    s.chars().flat_map(char::to_lowercase).collect()
}

fn word_start(text: &[char], pos: usize) -> usize {
    let mut i = pos.min(text.len());
    while i > 0 && text[i - 1].is_alphanumeric() {
        i -= 1;
    }
    i
}

/// Best alignment of the whole pattern ending at each text position `1..=n`.
///
/// `cost` is the final score of an alignment. Edits add the same amount
/// whatever the start, so keeping the cheapest cell per position yields the
/// cheapest alignment overall. Ties prefer substitution, then
/// transposition, then skipping a pattern character, then skipping a text
/// character.
fn alignments(pattern: &[char], text: &[char], cost: impl Fn(Cell) -> f64) -> Vec<Cell> {
    let n = text.len();
    let mut before_prev: Vec<Cell> = Vec::new();
    let mut prev: Vec<Cell> = (0..=n).map(|j| Cell { errors: 0, start: j }).collect();

    for i in 1..=pattern.len() {
        let p = pattern[i - 1];
        let mut row = Vec::with_capacity(n + 1);
        row.push(Cell { errors: i, start: 0 });

        for j in 1..=n {
            let t = text[j - 1];
            let diag = prev[j - 1];
            let mut best = Cell {
                errors: diag.errors + usize::from(p != t),
                start: diag.start,
            };

            let mut consider = |from: Cell| {
                let candidate = Cell {
                    errors: from.errors + 1,
                    start: from.start,
                };
                if cost(candidate) < cost(best) {
                    best = candidate;
                }
            };

            if i > 1 && j > 1 && p != t && p == text[j - 2] && pattern[i - 2] == t {
                consider(before_prev[j - 2]);
            }
            consider(prev[j]);
            consider(row[j - 1]);

            row.push(best);
        }

        before_prev = std::mem::replace(&mut prev, row);
    }

    prev.into_iter().skip(1).collect()
}

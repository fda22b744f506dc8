//! Natural filename ordering.
//!
//! Project folders are exported from Rhino, Illustrator and phone cameras, so
//! filenames carry unpadded counters: `view_1.jpg`, `view_2.jpg`, `view_10.jpg`.
//! A plain byte sort puts `view_10` before `view_2`. The natural key splits
//! the stem into alternating text and digit runs:
//!
//! - digit runs compare numerically (`2 < 10`, `007 == 7`)
//! - text runs compare case-insensitively (`Plan < section`)
//!
//! ```text
//! img1.jpg, img10.jpg, img2.jpg   →   img1.jpg, img2.jpg, img10.jpg
//! ```
//!
//! Runs always alternate starting with a (possibly empty) text run, so two keys
//! never compare a number against text at the same position. Keys that tie
//! (`img01` vs `img1`, `Cover` vs `cover`) fall back to the full filename so the
//! ordering is total and deterministic across runs.

use std::cmp::Ordering;
use std::path::Path;

/// One run of a natural sort key.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum Run {
    /// Digit run as `(significant length, digits without leading zeros)`.
    /// Comparing the tuple compares the numbers without parsing, so arbitrarily
    /// long counters never overflow.
    Number(usize, String),
    /// Lower-cased text run.
    Text(String),
}

/// Build the natural sort key for a filename stem.
///
/// - `"img10"` → `[Text("img"), Number(2, "10"), Text("")]`
/// - `"007"` → `[Text(""), Number(1, "7"), Text("")]`
/// - `"Floor Plan"` → `[Text("floor plan")]`
pub fn natural_key(stem: &str) -> Vec<Run> {
    let mut runs = Vec::new();
    let mut text = String::new();
    let mut chars = stem.chars().peekable();

    while let Some(c) = chars.next() {
        if c.is_ascii_digit() {
            runs.push(Run::Text(std::mem::take(&mut text).to_lowercase()));
            let mut digits = String::from(c);
            while let Some(&d) = chars.peek() {
                if !d.is_ascii_digit() {
                    break;
                }
                digits.push(d);
                chars.next();
            }
            let significant = digits.trim_start_matches('0').to_string();
            runs.push(Run::Number(significant.len(), significant));
        } else {
            text.push(c);
        }
    }
    runs.push(Run::Text(text.to_lowercase()));
    runs
}

/// Compare two paths by the natural key of their file stems, then by filename.
pub fn natural_cmp(a: &Path, b: &Path) -> Ordering {
    let stem = |p: &Path| {
        p.file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default()
    };
    natural_key(&stem(a))
        .cmp(&natural_key(&stem(b)))
        .then_with(|| a.file_name().cmp(&b.file_name()))
}

/// Sort paths in place using [`natural_cmp`].
pub fn sort_natural<P: AsRef<Path>>(paths: &mut [P]) {
    paths.sort_by(|a, b| natural_cmp(a.as_ref(), b.as_ref()));
}

/// Sort paths in place by plain filename (byte order).
///
/// Used for preview directories whose converter output is already zero-padded.
pub fn sort_by_name<P: AsRef<Path>>(paths: &mut [P]) {
    paths.sort_by(|a, b| a.as_ref().file_name().cmp(&b.as_ref().file_name()));
}

#![forbid(unsafe_code)]

//! Word colors.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use wcloud_layout::PlacedWord;

/// Ten-color categorical palette.
pub const DEFAULT_COLORS: [&str; 10] = [
    "#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#e377c2", "#7f7f7f",
    "#bcbd22", "#17becf",
];

/// Owned copy of [`DEFAULT_COLORS`].
pub fn default_colors() -> Vec<String> {
    DEFAULT_COLORS.iter().map(|c| (*c).to_string()).collect()
}

/// Pick a color for each placed word.
///
/// Deterministic runs cycle through `colors` by placement index, so the same
/// layout is always colored the same way. Otherwise each word draws a random
/// entry, from `seed` when given. An empty `colors` falls back to
/// [`DEFAULT_COLORS`].
pub fn assign_colors<'c, S: AsRef<str>>(
    placed: &[PlacedWord],
    colors: &'c [S],
    deterministic: bool,
    seed: Option<u64>,
) -> Vec<&'c str> {
    let palette: Vec<&'c str> = if colors.is_empty() {
        DEFAULT_COLORS.to_vec()
    } else {
        colors.iter().map(AsRef::as_ref).collect()
    };

    if deterministic {
        return (0..placed.len())
            .map(|i| palette[i % palette.len()])
            .collect();
    }

    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_rng(&mut rand::rng()),
    };
    placed
        .iter()
        .map(|_| palette[rng.random_range(0..palette.len())])
        .collect()
}

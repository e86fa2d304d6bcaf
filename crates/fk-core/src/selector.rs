//! Seeded selection helpers.
//!
//! Every choice that looks random in a derivation goes through [`hash`], a
//! 32-bit rolling polynomial over UTF-16 code units with explicit signed
//! wraparound. The result depends on the input string only, so the same seed
//! yields the same choices on every run and platform.

use std::fmt;

pub const SEED_SEPARATOR: char = '|';

/// `h = h * 31 + unit` over the UTF-16 code units of `input`, wrapped to a
/// signed 32-bit integer, then made non-negative.
#[must_use]
pub fn hash(input: &str) -> u32 {
    let mut state: i32 = 0;
    for unit in input.encode_utf16() {
        state = state.wrapping_mul(31).wrapping_add(i32::from(unit));
    }
    state.unsigned_abs()
}

/// Index into a collection of `len` items, or `None` when it is empty.
#[must_use]
pub fn index(len: usize, key: &str) -> Option<usize> {
    if len == 0 {
        return None;
    }
    Some(hash(key) as usize % len)
}

#[must_use]
pub fn pick<'a, T>(items: &'a [T], key: &str) -> Option<&'a T> {
    index(items.len(), key).map(|position| &items[position])
}

/// Like [`pick`], but returns `fallback` for an empty pool.
#[must_use]
pub fn pick_or<T: Clone>(items: &[T], key: &str, fallback: T) -> T {
    pick(items, key).cloned().unwrap_or(fallback)
}

/// The ordered field values joined by [`SEED_SEPARATOR`].
#[derive(Clone, PartialEq, Eq)]
pub struct Seed(String);

impl Seed {
    #[must_use]
    pub fn from_values<S: AsRef<str>>(values: &[S]) -> Self {
        let mut seed = String::new();
        for (position, value) in values.iter().enumerate() {
            if position > 0 {
                seed.push(SEED_SEPARATOR);
            }
            seed.push_str(value.as_ref());
        }
        Self(seed)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Seed extended with a purpose tag, e.g. `"w1"` or `"numFallback"`.
    #[must_use]
    pub fn tagged(&self, tag: &str) -> String {
        format!("{}{tag}", self.0)
    }

    /// Seed extended with the token being transformed and a purpose tag.
    #[must_use]
    pub fn keyed(&self, token: &str, tag: &str) -> String {
        format!("{}{token}{tag}", self.0)
    }
}

impl fmt::Debug for Seed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Seed([REDACTED])")
    }
}

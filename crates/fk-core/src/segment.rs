//! Bounded-length segments and the per-segment transforms used by the
//! structured assembler.

use crate::selector::{self, Seed};

pub const LEET_TABLE: [(char, char); 7] = [
    ('a', '4'),
    ('e', '3'),
    ('o', '0'),
    ('i', '1'),
    ('s', '5'),
    ('l', '7'),
    ('t', '+'),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentShape {
    Prefix,
    Suffix,
    Middle,
}

const SHAPES: [SegmentShape; 3] = [
    SegmentShape::Prefix,
    SegmentShape::Suffix,
    SegmentShape::Middle,
];

/// Tokens longer than `threshold` characters are cut down to `length`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SegmentRule {
    pub threshold: usize,
    pub length: usize,
}

impl Default for SegmentRule {
    fn default() -> Self {
        Self {
            threshold: 6,
            length: 4,
        }
    }
}

#[must_use]
pub fn leet_substitute(ch: char) -> Option<char> {
    LEET_TABLE
        .iter()
        .find(|(from, _)| *from == ch)
        .map(|(_, to)| *to)
}

/// Cuts `token` to a segment. The shape, and the start offset of a middle
/// cut, are chosen from `seed + token + purpose`.
#[must_use]
pub fn extract_segment(token: &str, seed: &Seed, purpose: &str, rule: SegmentRule) -> String {
    let chars: Vec<char> = token.chars().collect();
    let count = chars.len();
    if count <= rule.threshold || rule.length >= count {
        return token.to_owned();
    }

    let key = seed.keyed(token, purpose);
    let window = match selector::pick_or(&SHAPES, &key, SegmentShape::Prefix) {
        SegmentShape::Prefix => &chars[..rule.length],
        SegmentShape::Suffix => &chars[count - rule.length..],
        SegmentShape::Middle => {
            let start = selector::index(count - rule.length + 1, &format!("{key}mid")).unwrap_or(0);
            &chars[start..start + rule.length]
        }
    };
    window.iter().collect()
}

#[must_use]
pub fn capitalize(segment: &str) -> String {
    let mut chars = segment.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Replaces one substitutable character, chosen from `key`, with its
/// [`LEET_TABLE`] counterpart. Segments without one come back unchanged.
#[must_use]
pub fn leetspeak(segment: &str, key: &str) -> String {
    let mut chars: Vec<char> = segment.chars().collect();
    let candidates: Vec<usize> = chars
        .iter()
        .enumerate()
        .filter(|(_, ch)| leet_substitute(**ch).is_some())
        .map(|(position, _)| position)
        .collect();

    if let Some(&position) = selector::pick(&candidates, key)
        && let Some(replacement) = leet_substitute(chars[position])
    {
        chars[position] = replacement;
    }
    chars.into_iter().collect()
}

#[must_use]
pub fn reverse(segment: &str) -> String {
    segment.chars().rev().collect()
}

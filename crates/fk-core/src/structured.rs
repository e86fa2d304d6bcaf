//! Structured mode: picks words and numbers out of the field values and
//! arranges them, with symbols, into a fixed template per length class.

use crate::derive::DeriveOptions;
use crate::direct;
use crate::segment::{self, SegmentRule};
use crate::selector::{self, Seed};
use crate::tokenizer::{Token, tokenize_all};

pub const SYMBOL_PALETTE: [char; 8] = ['!', '@', '#', '$', '%', '&', '*', '?'];

const WORD_TAGS: [&str; 3] = ["w1", "w2", "w3"];
const SEGMENT_TAGS: [&str; 3] = ["seg1", "seg2", "seg3"];
const SYMBOL_TAGS: [&str; 3] = ["sym1", "sym2", "sym3"];
const LEET_TAG: &str = "leet";
const NUMBER_TAG: &str = "num";
const NUMBER_FALLBACK_TAG: &str = "numFallback";

/// Template families, chosen by target length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LengthClass {
    /// Up to 8 characters.
    Short,
    /// 9 to 16 characters.
    Medium,
    /// Anything longer.
    Long,
}

impl LengthClass {
    #[must_use]
    pub fn of(target_length: usize) -> Self {
        match target_length {
            0..=8 => Self::Short,
            9..=16 => Self::Medium,
            _ => Self::Long,
        }
    }

    #[must_use]
    pub const fn number_digits(self) -> usize {
        match self {
            Self::Short => 2,
            Self::Medium | Self::Long => 3,
        }
    }
}

/// Words (deduplicated, first occurrence wins) and numbers from all values.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TokenPool {
    pub words: Vec<String>,
    pub numbers: Vec<String>,
}

impl TokenPool {
    #[must_use]
    pub fn from_values<S: AsRef<str>>(values: &[S], min_word_len: usize) -> Self {
        let mut pool = Self::default();
        for token in tokenize_all(values, min_word_len) {
            match token {
                Token::Word(word) => {
                    if !pool.words.contains(&word) {
                        pool.words.push(word);
                    }
                }
                Token::Number(number) => pool.numbers.push(number),
            }
        }
        pool
    }
}

/// The pieces a template is filled from.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Pieces {
    capitalized: String,
    leet: String,
    reversed: String,
    number: String,
    symbols: [char; 3],
}

/// Builds the structured buffer. Never longer than `target_length`. Falls
/// back to interleaving short prefixes of the raw values when no word token
/// survives tokenization.
#[must_use]
pub fn assemble<S: AsRef<str>>(
    values: &[S],
    seed: &Seed,
    target_length: usize,
    options: &DeriveOptions,
) -> Vec<char> {
    let pool = TokenPool::from_values(values, options.min_word_len);
    if pool.words.is_empty() {
        let prefixes: Vec<String> = values
            .iter()
            .map(|value| value.as_ref().chars().take(options.fallback_prefix_len).collect())
            .collect();
        return direct::interleave(&prefixes, target_length, false);
    }

    let class = LengthClass::of(target_length);
    let pieces = build_pieces(&pool, seed, class, options.segment_rule());
    fill_template(class, &pieces, target_length)
}

fn build_pieces(pool: &TokenPool, seed: &Seed, class: LengthClass, rule: SegmentRule) -> Pieces {
    let segments = choose_words(&pool.words, seed)
        .iter()
        .zip(SEGMENT_TAGS)
        .map(|(word, tag)| segment::extract_segment(word, seed, tag, rule))
        .collect::<Vec<_>>();

    Pieces {
        capitalized: segment::capitalize(&segments[0]),
        leet: segment::leetspeak(&segments[1], &seed.tagged(LEET_TAG)),
        reversed: segment::reverse(&segments[2]),
        number: numeric_fragment(&pool.numbers, seed, class.number_digits()),
        symbols: choose_symbols(seed),
    }
}

/// Up to three distinct words; a pool smaller than three repeats the first
/// choice.
fn choose_words(words: &[String], seed: &Seed) -> [String; 3] {
    let mut chosen: Vec<String> = Vec::with_capacity(WORD_TAGS.len());
    for tag in WORD_TAGS {
        let remaining: Vec<&String> = words.iter().filter(|word| !chosen.contains(word)).collect();
        let word = match selector::pick(&remaining, &seed.tagged(tag)) {
            Some(word) => (*word).clone(),
            None => chosen.first().cloned().unwrap_or_default(),
        };
        chosen.push(word);
    }
    let mut chosen = chosen.into_iter();
    [
        chosen.next().unwrap_or_default(),
        chosen.next().unwrap_or_default(),
        chosen.next().unwrap_or_default(),
    ]
}

fn numeric_fragment(numbers: &[String], seed: &Seed, digits: usize) -> String {
    if let Some(number) = selector::pick(numbers, &seed.tagged(NUMBER_TAG)) {
        return number.chars().take(digits).collect();
    }

    let modulus = 10_u32.pow(digits as u32);
    let synthesized = selector::hash(&seed.tagged(NUMBER_FALLBACK_TAG)) % modulus;
    format!("{synthesized:0digits$}")
}

fn choose_symbols(seed: &Seed) -> [char; 3] {
    let mut palette = SYMBOL_PALETTE.to_vec();
    let mut chosen = [SYMBOL_PALETTE[0]; 3];
    for (slot, tag) in chosen.iter_mut().zip(SYMBOL_TAGS) {
        if let Some(position) = selector::index(palette.len(), &seed.tagged(tag)) {
            *slot = palette.remove(position);
        }
    }
    chosen
}

/// Appends each group of the class template only if the whole group still
/// fits within `target_length`; groups that do not fit are skipped.
fn fill_template(class: LengthClass, pieces: &Pieces, target_length: usize) -> Vec<char> {
    let [sym1, sym2, sym3] = pieces.symbols.map(String::from);
    let (sym1, sym2, sym3) = (sym1.as_str(), sym2.as_str(), sym3.as_str());
    let capitalized = pieces.capitalized.as_str();
    let leet = pieces.leet.as_str();
    let reversed = pieces.reversed.as_str();
    let number = pieces.number.as_str();
    let groups: [[&str; 2]; 4] = match class {
        LengthClass::Short => [
            [capitalized, ""],
            [sym1, ""],
            [number, ""],
            [sym2, leet],
        ],
        LengthClass::Medium => [
            [capitalized, ""],
            [sym1, leet],
            [sym2, number],
            [sym3, reversed],
        ],
        LengthClass::Long => [
            [capitalized, ""],
            [sym1, leet],
            [sym2, reversed],
            [sym3, number],
        ],
    };

    let mut buffer: Vec<char> = Vec::with_capacity(target_length);
    for group in groups {
        let part: Vec<char> = group.concat().chars().collect();
        if buffer.len() + part.len() <= target_length {
            buffer.extend(part);
        }
    }
    buffer
}

//! Makes sure a buffer carries every character class.
//!
//! Missing classes are patched in [`CharClass::PATCH_ORDER`]. A patch
//! prefers mutating a character whose own class has a spare member, then
//! appending the class fallback while there is room, then overwriting a
//! redundant character near the end of the target window. No patch removes
//! the last member of a class, so with four or more slots every class ends
//! up present.

use std::fmt;

/// Below this many characters the four classes cannot all fit.
pub const MIN_GUARANTEED_LENGTH: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CharClass {
    Lowercase,
    Number,
    Special,
    Uppercase,
}

impl CharClass {
    /// Alphabetical by class name; independent of which classes are missing.
    pub const PATCH_ORDER: [Self; 4] = [
        Self::Lowercase,
        Self::Number,
        Self::Special,
        Self::Uppercase,
    ];

    #[must_use]
    pub fn of(ch: char) -> Self {
        if ch.is_ascii_uppercase() {
            Self::Uppercase
        } else if ch.is_ascii_lowercase() {
            Self::Lowercase
        } else if ch.is_ascii_digit() {
            Self::Number
        } else {
            Self::Special
        }
    }

    #[must_use]
    pub const fn fallback(self) -> char {
        match self {
            Self::Uppercase => 'A',
            Self::Lowercase => 'z',
            Self::Number => '1',
            Self::Special => '!',
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Lowercase => "lowercase",
            Self::Number => "number",
            Self::Special => "special",
            Self::Uppercase => "uppercase",
        }
    }

    const fn slot(self) -> usize {
        match self {
            Self::Lowercase => 0,
            Self::Number => 1,
            Self::Special => 2,
            Self::Uppercase => 3,
        }
    }

    /// The in-place rewrite of `ch` into this class, if there is one.
    fn transform(self, ch: char) -> Option<char> {
        match self {
            Self::Uppercase => ch.is_ascii_lowercase().then(|| ch.to_ascii_uppercase()),
            Self::Lowercase => ch.is_ascii_uppercase().then(|| ch.to_ascii_lowercase()),
            Self::Number if ch.is_ascii_alphabetic() => match ch.to_ascii_lowercase() {
                'a' => Some('4'),
                'e' => Some('3'),
                'o' => Some('0'),
                'i' => Some('1'),
                's' => Some('5'),
                'l' => Some('7'),
                _ => None,
            },
            Self::Special if ch.is_ascii_alphabetic() => match ch.to_ascii_lowercase() {
                'a' => Some('@'),
                's' => Some('$'),
                'i' => Some('!'),
                't' => Some('+'),
                _ => None,
            },
            Self::Number | Self::Special => None,
        }
    }
}

impl fmt::Display for CharClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-class character counts of a buffer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClassCounts([usize; 4]);

impl ClassCounts {
    #[must_use]
    pub fn of(buffer: &[char]) -> Self {
        let mut counts = Self::default();
        for &ch in buffer {
            counts.0[CharClass::of(ch).slot()] += 1;
        }
        counts
    }

    #[must_use]
    pub fn get(&self, class: CharClass) -> usize {
        self.0[class.slot()]
    }

    #[must_use]
    pub fn has(&self, class: CharClass) -> bool {
        self.get(class) > 0
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        CharClass::PATCH_ORDER.iter().all(|class| self.has(*class))
    }

    fn is_spare(&self, ch: char) -> bool {
        self.get(CharClass::of(ch)) >= 2
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatchKind {
    Transformed { index: usize },
    Appended,
    Replaced { index: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Patch {
    pub class: CharClass,
    pub kind: PatchKind,
}

/// Patches `buffer` until every class is present (when `target_length`
/// allows it) and returns what was changed, in order. Appending stops at
/// `target_length`.
pub fn normalize_complexity(buffer: &mut Vec<char>, target_length: usize) -> Vec<Patch> {
    let mut patches = Vec::new();
    let mut replaced: Vec<usize> = Vec::new();

    for class in CharClass::PATCH_ORDER {
        let counts = ClassCounts::of(buffer.as_slice());
        if counts.has(class) {
            continue;
        }

        let transformable = buffer.iter().enumerate().find_map(|(index, &ch)| {
            class
                .transform(ch)
                .filter(|_| counts.is_spare(ch))
                .map(|replacement| (index, replacement))
        });
        if let Some((index, replacement)) = transformable {
            buffer[index] = replacement;
            patches.push(Patch {
                class,
                kind: PatchKind::Transformed { index },
            });
            continue;
        }

        if buffer.len() < target_length {
            buffer.push(class.fallback());
            patches.push(Patch {
                class,
                kind: PatchKind::Appended,
            });
            continue;
        }

        let end = buffer.len().min(target_length);
        if end == 0 {
            continue;
        }
        let slot = (0..end)
            .rev()
            .find(|index| !replaced.contains(index) && counts.is_spare(buffer[*index]))
            .or_else(|| (end - 1).checked_sub(replaced.len()));
        let Some(index) = slot else {
            continue;
        };
        buffer[index] = class.fallback();
        replaced.push(index);
        patches.push(Patch {
            class,
            kind: PatchKind::Replaced { index },
        });
    }

    patches
}

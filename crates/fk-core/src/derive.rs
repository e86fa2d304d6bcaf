use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use zeroize::Zeroizing;

use crate::complexity::{MIN_GUARANTEED_LENGTH, normalize_complexity};
use crate::direct;
use crate::length::normalize_length;
use crate::segment::SegmentRule;
use crate::selector::Seed;
use crate::structured;
use crate::tokenizer::DEFAULT_MIN_WORD_LEN;

/// Target lengths offered to users. The core accepts any length.
pub const SUPPORTED_LENGTHS: [usize; 4] = [8, 12, 16, 20];
pub const DEFAULT_LENGTH: usize = 16;

#[must_use]
pub fn is_supported_length(length: usize) -> bool {
    SUPPORTED_LENGTHS.contains(&length)
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum DerivationMode {
    Direct,
    #[default]
    Structured,
}

impl DerivationMode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Direct => "direct",
            Self::Structured => "structured",
        }
    }
}

impl fmt::Display for DerivationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown derivation mode `{0}` (expected direct or structured)")]
pub struct UnknownMode(pub String);

impl FromStr for DerivationMode {
    type Err = UnknownMode;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "direct" => Ok(Self::Direct),
            "structured" => Ok(Self::Structured),
            _ => Err(UnknownMode(raw.to_owned())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeriveOptions {
    /// Direct mode only: reverse each value between its first and last
    /// character before interleaving.
    pub reverse_interior: bool,
    pub min_word_len: usize,
    pub segment_threshold: usize,
    pub segment_length: usize,
    /// Prefix length per value when structured mode finds no words.
    pub fallback_prefix_len: usize,
}

impl DeriveOptions {
    #[must_use]
    pub fn segment_rule(&self) -> SegmentRule {
        SegmentRule {
            threshold: self.segment_threshold,
            length: self.segment_length,
        }
    }
}

impl Default for DeriveOptions {
    fn default() -> Self {
        let rule = SegmentRule::default();
        Self {
            reverse_interior: false,
            min_word_len: DEFAULT_MIN_WORD_LEN,
            segment_threshold: rule.threshold,
            segment_length: rule.length,
            fallback_prefix_len: 5,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyInputReason {
    /// No field carries a non-blank value.
    NoValues,
    /// Some fields have values, but none of those is included.
    NoneIncluded,
}

impl fmt::Display for EmptyInputReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoValues => {
                f.write_str("no input values: provide values for some fields to derive a password")
            }
            Self::NoneIncluded => f.write_str(
                "no included fields with values: include fields with values, or provide values for included fields",
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeriveError {
    #[error("{0}")]
    EmptyInput(EmptyInputReason),
    #[error("too many fields: {count} (maximum is {max})")]
    TooManyFields { count: usize, max: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DerivationWarning {
    /// The target is too short to hold all four character classes.
    DegenerateComplexity { target_length: usize },
}

impl fmt::Display for DerivationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DegenerateComplexity { target_length } => write!(
                f,
                "length {target_length} is below {MIN_GUARANTEED_LENGTH}; not every character class can be present"
            ),
        }
    }
}

/// Derived password text. Wiped from memory on drop and redacted in `Debug`.
#[derive(Clone)]
pub struct DerivedPassword(Zeroizing<String>);

impl DerivedPassword {
    fn from_chars(chars: Vec<char>) -> Self {
        Self(Zeroizing::new(chars.into_iter().collect()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Length in characters.
    #[must_use]
    pub fn char_count(&self) -> usize {
        self.0.chars().count()
    }
}

impl PartialEq for DerivedPassword {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

impl Eq for DerivedPassword {}

impl fmt::Debug for DerivedPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("DerivedPassword([REDACTED])")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Derivation {
    pub password: DerivedPassword,
    pub warnings: Vec<DerivationWarning>,
}

/// Ordered, included, non-blank field values plus how to derive from them.
#[derive(Clone)]
pub struct DerivationRequest<'a> {
    pub values: Vec<&'a str>,
    pub mode: DerivationMode,
    pub target_length: usize,
    pub options: DeriveOptions,
}

impl<'a> DerivationRequest<'a> {
    pub fn new(
        values: impl IntoIterator<Item = &'a str>,
        mode: DerivationMode,
        target_length: usize,
    ) -> Self {
        Self {
            values: values.into_iter().collect(),
            mode,
            target_length,
            options: DeriveOptions::default(),
        }
    }

    #[must_use]
    pub fn with_options(mut self, options: DeriveOptions) -> Self {
        self.options = options;
        self
    }
}

impl fmt::Debug for DerivationRequest<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DerivationRequest")
            .field("values", &format_args!("[{} redacted]", self.values.len()))
            .field("mode", &self.mode)
            .field("target_length", &self.target_length)
            .field("options", &self.options)
            .finish()
    }
}

/// Runs the selected assembler, then the complexity and length passes.
///
/// Fails only when `request.values` is empty. Any non-empty input produces
/// exactly `target_length` characters; lengths below
/// [`MIN_GUARANTEED_LENGTH`] come with a [`DerivationWarning`].
pub fn derive(request: &DerivationRequest<'_>) -> Result<Derivation, DeriveError> {
    if request.values.is_empty() {
        return Err(DeriveError::EmptyInput(EmptyInputReason::NoValues));
    }

    let target_length = request.target_length;
    let seed = Seed::from_values(&request.values);
    let mut buffer = match request.mode {
        DerivationMode::Direct => direct::interleave(
            &request.values,
            target_length,
            request.options.reverse_interior,
        ),
        DerivationMode::Structured => {
            structured::assemble(&request.values, &seed, target_length, &request.options)
        }
    };

    let mut warnings = Vec::new();
    if target_length < MIN_GUARANTEED_LENGTH {
        warnings.push(DerivationWarning::DegenerateComplexity { target_length });
    }

    normalize_complexity(&mut buffer, target_length);
    normalize_length(&mut buffer, target_length, &request.values);

    Ok(Derivation {
        password: DerivedPassword::from_chars(buffer),
        warnings,
    })
}

/// [`derive`] with default options, returning only the password.
pub fn derive_password<S: AsRef<str>>(
    values: &[S],
    mode: DerivationMode,
    target_length: usize,
) -> Result<DerivedPassword, DeriveError> {
    let request = DerivationRequest::new(values.iter().map(AsRef::as_ref), mode, target_length);
    derive(&request).map(|derivation| derivation.password)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::complexity::ClassCounts;

    fn derived(values: &[&str], mode: DerivationMode, target_length: usize) -> String {
        derive_password(values, mode, target_length)
            .expect("non-empty input derives")
            .as_str()
            .to_owned()
    }

    #[test]
    fn direct_example_is_pinned() {
        assert_eq!(
            derived(&["example.com", "alice"], DerivationMode::Direct, 16),
            "3Axlaimcpele.com"
        );
    }

    #[test]
    fn structured_example_is_pinned_and_differs_from_direct() {
        let structured = derived(&["example.com", "alice"], DerivationMode::Structured, 16);
        assert_eq!(structured, "Alice$mpl3#049ex");
        assert_ne!(
            structured,
            derived(&["example.com", "alice"], DerivationMode::Direct, 16)
        );
    }

    #[test]
    fn single_short_value_pads_in_both_modes() {
        assert_eq!(derived(&["a"], DerivationMode::Direct, 8), "a1!Aaaaa");
        assert_eq!(derived(&["a"], DerivationMode::Structured, 8), "a1!Aaaaa");
    }

    #[test]
    fn field_order_changes_structured_output() {
        let forward = derived(&["Site Name", "Username"], DerivationMode::Structured, 20);
        let reversed = derived(&["Username", "Site Name"], DerivationMode::Structured, 20);
        assert_eq!(forward, "Name!u5er&etis*570Si");
        assert_eq!(reversed, "Site!n4me@anre*210Us");
        assert_ne!(forward, reversed);
    }

    #[test]
    fn every_supported_length_is_exact_and_complete() {
        for mode in [DerivationMode::Direct, DerivationMode::Structured] {
            for length in SUPPORTED_LENGTHS {
                let out = derived(&["example.com", "alice"], mode, length);
                let chars: Vec<char> = out.chars().collect();
                assert_eq!(chars.len(), length, "{mode} {length}");
                assert!(ClassCounts::of(&chars).is_complete(), "{mode} {length}: {out}");
            }
        }
    }

    #[test]
    fn empty_input_is_rejected_in_both_modes() {
        let none: [&str; 0] = [];
        for mode in [DerivationMode::Direct, DerivationMode::Structured] {
            assert_eq!(
                derive_password(&none, mode, 16),
                Err(DeriveError::EmptyInput(EmptyInputReason::NoValues))
            );
        }
    }

    #[test]
    fn short_targets_warn_but_succeed() {
        let request = DerivationRequest::new(["abc"], DerivationMode::Direct, 3);
        let derivation = derive(&request).expect("short target still derives");
        assert_eq!(derivation.password.as_str(), "4A!");
        assert_eq!(
            derivation.warnings,
            vec![DerivationWarning::DegenerateComplexity { target_length: 3 }]
        );

        let full = derive(&DerivationRequest::new(["abc"], DerivationMode::Direct, 4))
            .expect("derives");
        assert!(full.warnings.is_empty());
    }

    #[test]
    fn zero_length_yields_empty_password() {
        let derivation =
            derive(&DerivationRequest::new(["abc"], DerivationMode::Structured, 0)).expect("derives");
        assert_eq!(derivation.password.as_str(), "");
        assert_eq!(derivation.warnings.len(), 1);
    }

    #[test]
    fn reverse_interior_toggle_changes_direct_output() {
        let options = DeriveOptions {
            reverse_interior: true,
            ..DeriveOptions::default()
        };
        let request =
            DerivationRequest::new(["example.com", "alice"], DerivationMode::Direct, 16)
                .with_options(options);
        let derivation = derive(&request).expect("derives");
        assert_eq!(derivation.password.as_str(), "3Aocci.leelpmaxm");
    }

    #[test]
    fn blank_values_still_derive() {
        assert_eq!(derived(&["   "], DerivationMode::Direct, 8), "   z1A  ");
    }

    #[test]
    fn mode_parses_and_displays() {
        assert_eq!("Direct".parse::<DerivationMode>(), Ok(DerivationMode::Direct));
        assert_eq!(" structured ".parse::<DerivationMode>(), Ok(DerivationMode::Structured));
        assert!("charset".parse::<DerivationMode>().is_err());
        assert_eq!(DerivationMode::Structured.to_string(), "structured");
    }

    #[test]
    fn supported_lengths() {
        assert!(is_supported_length(16));
        assert!(!is_supported_length(10));
    }

    #[test]
    fn debug_output_never_contains_values() {
        let request = DerivationRequest::new(["hunter2"], DerivationMode::Direct, 8);
        assert!(!format!("{request:?}").contains("hunter2"));
        let derivation = derive(&request).expect("derives");
        assert!(!format!("{derivation:?}").contains(derivation.password.as_str()));
    }
}

//! Deterministic password derivation from ordered field values.
//!
//! The same ordered values, mode and length always produce the same
//! password. This is a reproducible generator, not a key derivation
//! function: the output is only as hard to guess as the field values.

pub mod complexity;
pub mod derive;
pub mod direct;
pub mod field;
pub mod length;
pub mod password;
pub mod segment;
pub mod selector;
pub mod structured;
pub mod tokenizer;

pub const APP_NAME: &str = "fk";

pub use complexity::{CharClass, ClassCounts, MIN_GUARANTEED_LENGTH};
pub use derive::{
    DEFAULT_LENGTH, Derivation, DerivationMode, DerivationRequest, DerivationWarning,
    DeriveError, DeriveOptions, DerivedPassword, EmptyInputReason, SUPPORTED_LENGTHS,
    UnknownMode, derive, derive_password, is_supported_length,
};
pub use field::{FieldInput, LayoutField, MAX_FIELDS, included_values};
pub use password::{ClassCoverage, StrengthAssessment, StrengthFeedback, assess_strength};

//! Caller-side field records and the filter that turns them into derivation
//! input.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::derive::{DeriveError, EmptyInputReason};

pub const MAX_FIELDS: usize = 10;

fn default_included() -> bool {
    true
}

/// One user field. Only `value`, `included` and position reach the
/// derivation; `label` is display metadata.
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FieldInput {
    #[serde(default)]
    pub label: String,
    pub value: String,
    #[serde(default = "default_included")]
    pub included: bool,
}

impl FieldInput {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
            included: true,
        }
    }

    #[must_use]
    pub fn excluded(mut self) -> Self {
        self.included = false;
        self
    }

    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.value.trim().is_empty()
    }

    /// The same field without its value.
    #[must_use]
    pub fn layout(&self) -> LayoutField {
        LayoutField {
            label: self.label.clone(),
            included: self.included,
        }
    }
}

impl fmt::Debug for FieldInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldInput")
            .field("label", &self.label)
            .field("value", &"[REDACTED]")
            .field("included", &self.included)
            .finish()
    }
}

/// Field layout as kept by presets: label and inclusion, never a value.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LayoutField {
    pub label: String,
    #[serde(default = "default_included")]
    pub included: bool,
}

impl LayoutField {
    #[must_use]
    pub fn into_field(self, value: impl Into<String>) -> FieldInput {
        FieldInput {
            label: self.label,
            value: value.into(),
            included: self.included,
        }
    }
}

/// Values of the included, non-blank fields, in field order.
///
/// An empty result is an error whose reason tells "nothing typed yet" apart
/// from "values present but all excluded".
pub fn included_values(fields: &[FieldInput]) -> Result<Vec<&str>, DeriveError> {
    if fields.len() > MAX_FIELDS {
        return Err(DeriveError::TooManyFields {
            count: fields.len(),
            max: MAX_FIELDS,
        });
    }

    let values: Vec<&str> = fields
        .iter()
        .filter(|field| field.included && !field.is_blank())
        .map(|field| field.value.as_str())
        .collect();

    if values.is_empty() {
        let reason = if fields.iter().any(|field| !field.is_blank()) {
            EmptyInputReason::NoneIncluded
        } else {
            EmptyInputReason::NoValues
        };
        return Err(DeriveError::EmptyInput(reason));
    }

    Ok(values)
}

use serde::{Deserialize, Serialize};
use zxcvbn::zxcvbn;

use crate::complexity::{CharClass, ClassCounts};

pub const STRONG_MIN_SCORE: u8 = 3;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct StrengthFeedback {
    pub warning: Option<String>,
    pub suggestions: Vec<String>,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ClassCoverage {
    pub uppercase: bool,
    pub lowercase: bool,
    pub number: bool,
    pub special: bool,
}

impl ClassCoverage {
    #[must_use]
    pub fn of(password: &str) -> Self {
        let chars: Vec<char> = password.chars().collect();
        let counts = ClassCounts::of(&chars);
        Self {
            uppercase: counts.has(CharClass::Uppercase),
            lowercase: counts.has(CharClass::Lowercase),
            number: counts.has(CharClass::Number),
            special: counts.has(CharClass::Special),
        }
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.uppercase && self.lowercase && self.number && self.special
    }
}

/// zxcvbn's view of a derived password. Informational; a high score says
/// nothing about how guessable the field values themselves are.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StrengthAssessment {
    pub score: u8,
    pub char_count: usize,
    pub classes: ClassCoverage,
    pub feedback: StrengthFeedback,
}

impl StrengthAssessment {
    #[must_use]
    pub fn meets_min_score(&self) -> bool {
        self.score >= STRONG_MIN_SCORE
    }

    #[must_use]
    pub fn summary(&self) -> String {
        let mut message = format!("strength: {}/4", self.score);

        if let Some(warning) = self.feedback.warning.as_deref() {
            let warning = warning.trim();
            if !warning.is_empty() {
                message.push_str(&format!("\nwarning: {warning}"));
            }
        }

        for suggestion in &self.feedback.suggestions {
            let suggestion = suggestion.trim();
            if suggestion.is_empty() {
                continue;
            }
            message.push_str(&format!("\n- {suggestion}"));
        }

        message
    }
}

/// Scores `password` with zxcvbn. `user_inputs` are the field values, so a
/// password that mostly echoes them scores lower.
#[must_use]
pub fn assess_strength(password: &str, user_inputs: &[&str]) -> StrengthAssessment {
    let entropy = zxcvbn(password, user_inputs);

    let feedback = entropy.feedback();
    let warning = feedback.and_then(|value| value.warning().map(|warning| warning.to_string()));
    let suggestions = feedback
        .map(|value| {
            value
                .suggestions()
                .iter()
                .map(|suggestion| suggestion.to_string())
                .collect()
        })
        .unwrap_or_default();

    StrengthAssessment {
        score: u8::from(entropy.score()),
        char_count: password.chars().count(),
        classes: ClassCoverage::of(password),
        feedback: StrengthFeedback {
            warning,
            suggestions,
        },
    }
}

use fk_core::{
    ClassCounts, DerivationMode, DerivationRequest, DerivationWarning, DeriveError,
    DeriveOptions, EmptyInputReason, FieldInput, SUPPORTED_LENGTHS, derive, derive_password,
    included_values,
};

const MODES: [DerivationMode; 2] = [DerivationMode::Direct, DerivationMode::Structured];

fn corpus() -> Vec<Vec<&'static str>> {
    vec![
        vec!["example.com", "alice"],
        vec!["a"],
        vec!["Site Name", "Username"],
        vec!["correct horse battery staple"],
        vec!["Hello World 42"],
        vec!["x"],
        vec!["1234567890"],
        vec!["!!!", "???"],
        vec!["ÄÖÜ straße", "日本語", "Ωmega-7"],
        vec!["my.bank.example", "john.doe@example.com", "1987", "blue"],
        vec![
            "one", "two", "three", "four", "five", "six", "seven", "eight", "nine", "ten",
        ],
        vec!["   padded   ", "tab\tseparated"],
        vec!["a-b_c/d.e@f,g h"],
        vec!["supercalifragilisticexpialidocious"],
    ]
}

fn chars_of(values: &[&str], mode: DerivationMode, target_length: usize) -> Vec<char> {
    derive_password(values, mode, target_length)
        .expect("non-empty input derives")
        .as_str()
        .chars()
        .collect()
}

#[test]
fn derivation_is_deterministic() {
    for values in corpus() {
        for mode in MODES {
            for length in SUPPORTED_LENGTHS {
                let first = derive_password(&values, mode, length).expect("derives");
                let second = derive_password(&values, mode, length).expect("derives");
                assert_eq!(first, second, "{values:?} {mode} {length}");
            }
        }
    }
}

#[test]
fn output_length_always_matches_target() {
    for values in corpus() {
        for mode in MODES {
            for length in 1..=24 {
                assert_eq!(
                    chars_of(&values, mode, length).len(),
                    length,
                    "{values:?} {mode} {length}"
                );
            }
        }
    }
}

#[test]
fn every_class_present_from_four_characters() {
    for values in corpus() {
        for mode in MODES {
            for length in 4..=24 {
                let chars = chars_of(&values, mode, length);
                assert!(
                    ClassCounts::of(&chars).is_complete(),
                    "{values:?} {mode} {length} -> {:?}",
                    chars.iter().collect::<String>()
                );
            }
        }
    }
}

#[test]
fn short_targets_warn_but_still_derive() {
    for length in 1..4 {
        let request = DerivationRequest::new(["example.com", "alice"], DerivationMode::Direct, length);
        let derivation = derive(&request).expect("derives");
        assert_eq!(derivation.password.char_count(), length);
        assert_eq!(
            derivation.warnings,
            vec![DerivationWarning::DegenerateComplexity {
                target_length: length
            }]
        );
    }

    let request = DerivationRequest::new(["example.com"], DerivationMode::Structured, 8);
    assert!(derive(&request).expect("derives").warnings.is_empty());
}

#[test]
fn field_order_matters() {
    for mode in MODES {
        let forward = derive_password(&["Site Name", "Username"], mode, 20).expect("derives");
        let reversed = derive_password(&["Username", "Site Name"], mode, 20).expect("derives");
        assert_ne!(forward, reversed, "{mode}");
    }
}

#[test]
fn modes_disagree_on_the_reference_input() {
    let direct = derive_password(&["example.com", "alice"], DerivationMode::Direct, 16)
        .expect("derives");
    let structured = derive_password(&["example.com", "alice"], DerivationMode::Structured, 16)
        .expect("derives");
    assert_eq!(direct.as_str(), "3Axlaimcpele.com");
    assert_eq!(structured.as_str(), "Alice$mpl3#049ex");
}

#[test]
fn empty_input_fails_in_both_modes() {
    let nothing: [&str; 0] = [];
    for mode in MODES {
        assert_eq!(
            derive_password(&nothing, mode, 16),
            Err(DeriveError::EmptyInput(EmptyInputReason::NoValues))
        );
    }
}

#[test]
fn options_change_output_without_breaking_invariants() {
    let values = ["example.com", "alice"];
    let reversed = DeriveOptions {
        reverse_interior: true,
        ..DeriveOptions::default()
    };
    let request = DerivationRequest::new(values, DerivationMode::Direct, 16).with_options(reversed);
    let derivation = derive(&request).expect("derives");
    assert_eq!(derivation.password.as_str(), "3Aocci.leelpmaxm");

    let long_words_only = DeriveOptions {
        min_word_len: 6,
        ..DeriveOptions::default()
    };
    for length in SUPPORTED_LENGTHS {
        let request = DerivationRequest::new(values, DerivationMode::Structured, length)
            .with_options(long_words_only);
        let chars: Vec<char> = derive(&request)
            .expect("derives")
            .password
            .as_str()
            .chars()
            .collect();
        assert_eq!(chars.len(), length);
        assert!(ClassCounts::of(&chars).is_complete());
    }
}

#[test]
fn fields_feed_derivation_through_included_values() {
    let fields = vec![
        FieldInput::new("Site Name", "example.com"),
        FieldInput::new("Secret Phrase", "never used").excluded(),
        FieldInput::new("Username", "alice"),
        FieldInput::new("Pet", "  "),
    ];
    let values = included_values(&fields).expect("has values");
    let password = derive_password(&values, DerivationMode::Direct, 16).expect("derives");
    assert_eq!(password.as_str(), "3Axlaimcpele.com");
}

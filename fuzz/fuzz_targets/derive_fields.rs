#![no_main]

use fk_core::{ClassCounts, DerivationMode, DerivationRequest, MAX_FIELDS, derive};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.len() < 2 || data.len() > 4096 {
        return;
    }

    let mode = if data[0] & 1 == 0 {
        DerivationMode::Direct
    } else {
        DerivationMode::Structured
    };
    let target_length = usize::from(data[1] % 64) + 1;
    let Ok(text) = std::str::from_utf8(&data[2..]) else {
        return;
    };

    let values: Vec<&str> = text.split('\n').take(MAX_FIELDS).collect();
    let request = DerivationRequest::new(values.iter().copied(), mode, target_length);
    let Ok(derivation) = derive(&request) else {
        return;
    };

    let chars: Vec<char> = derivation.password.as_str().chars().collect();
    assert_eq!(chars.len(), target_length);
    if target_length >= 4 {
        assert!(ClassCounts::of(&chars).is_complete());
    } else {
        assert!(!derivation.warnings.is_empty());
    }
});

//! Pads or truncates a buffer to exactly the target length.

/// Padding source used when the field values concatenate to nothing.
pub const PADDING_FALLBACK: &str = "FkSec#01";

/// Appends characters cycled from the concatenated `values` (or
/// [`PADDING_FALLBACK`]) until the buffer is `target_length` long, then drops
/// anything past it.
pub fn normalize_length<S: AsRef<str>>(buffer: &mut Vec<char>, target_length: usize, values: &[S]) {
    if buffer.len() < target_length {
        let mut source: Vec<char> = values
            .iter()
            .flat_map(|value| value.as_ref().chars())
            .collect();
        if source.is_empty() {
            source = PADDING_FALLBACK.chars().collect();
        }

        let mut counter = 0;
        while buffer.len() < target_length {
            buffer.push(source[counter % source.len()]);
            counter += 1;
        }
    }
    buffer.truncate(target_length);
}

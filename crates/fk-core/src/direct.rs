//! Direct mode: positional interleaving of the raw field values.

/// Takes one character at a time from each value in field order, then moves
/// to the next offset. Stops at `cap` characters or once every value is
/// exhausted.
#[must_use]
pub fn interleave<S: AsRef<str>>(values: &[S], cap: usize, reverse_interior: bool) -> Vec<char> {
    let columns: Vec<Vec<char>> = values
        .iter()
        .map(|value| {
            if reverse_interior {
                reversed_interior(value.as_ref())
            } else {
                value.as_ref().chars().collect()
            }
        })
        .collect();

    let mut buffer = Vec::with_capacity(cap);
    if cap == 0 {
        return buffer;
    }

    let mut offset = 0;
    loop {
        let mut took_any = false;
        for column in &columns {
            let Some(&ch) = column.get(offset) else {
                continue;
            };
            buffer.push(ch);
            took_any = true;
            if buffer.len() >= cap {
                return buffer;
            }
        }
        if !took_any {
            return buffer;
        }
        offset += 1;
    }
}

/// Keeps the first and last characters in place and reverses everything
/// between them.
#[must_use]
pub fn reversed_interior(value: &str) -> Vec<char> {
    let mut chars: Vec<char> = value.chars().collect();
    let len = chars.len();
    if len > 2 {
        chars[1..len - 1].reverse();
    }
    chars
}

//! Splits field values into word and number tokens.

pub const DELIMITERS: [char; 7] = [' ', ',', '-', '_', '/', '.', '@'];
pub const DEFAULT_MIN_WORD_LEN: usize = 2;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// Lowercased alphabetic run.
    Word(String),
    /// ASCII digit run, kept verbatim.
    Number(String),
}

impl Token {
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Word(value) | Self::Number(value) => value,
        }
    }

    #[must_use]
    pub fn is_word(&self) -> bool {
        matches!(self, Self::Word(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RunKind {
    Alphabetic,
    Digit,
}

impl RunKind {
    fn of(ch: char) -> Option<Self> {
        if ch.is_alphabetic() {
            Some(Self::Alphabetic)
        } else if ch.is_ascii_digit() {
            Some(Self::Digit)
        } else {
            None
        }
    }
}

/// Tokens of one value, left to right. Words shorter than `min_word_len`
/// characters are dropped; digit runs are always kept.
pub fn tokenize(value: &str, min_word_len: usize) -> impl Iterator<Item = Token> + '_ {
    value
        .split(DELIMITERS)
        .filter(|fragment| !fragment.is_empty())
        .flat_map(move |fragment| fragment_tokens(fragment, min_word_len))
}

/// Tokens of every value, in field order and then in value order.
pub fn tokenize_all<'a, S: AsRef<str>>(
    values: &'a [S],
    min_word_len: usize,
) -> impl Iterator<Item = Token> + 'a {
    values
        .iter()
        .flat_map(move |value| tokenize(value.as_ref(), min_word_len))
}

fn fragment_tokens(fragment: &str, min_word_len: usize) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut chars = fragment.char_indices().peekable();

    while let Some((start, ch)) = chars.next() {
        let Some(kind) = RunKind::of(ch) else {
            continue;
        };

        let mut end = start + ch.len_utf8();
        while let Some(&(position, next)) = chars.peek() {
            if RunKind::of(next) != Some(kind) {
                break;
            }
            end = position + next.len_utf8();
            chars.next();
        }

        let run = &fragment[start..end];
        match kind {
            RunKind::Alphabetic => {
                let word = run.to_lowercase();
                if word.chars().count() >= min_word_len {
                    tokens.push(Token::Word(word));
                }
            }
            RunKind::Digit => tokens.push(Token::Number(run.to_owned())),
        }
    }

    tokens
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(tokens: &[Token]) -> Vec<&str> {
        tokens
            .iter()
            .filter(|token| token.is_word())
            .map(Token::as_str)
            .collect()
    }

    #[test]
    fn splits_on_every_delimiter() {
        let tokens: Vec<_> = tokenize("Hello, World-2024_foo/bar.baz@x y", 2).collect();
        assert_eq!(
            tokens,
            vec![
                Token::Word("hello".to_owned()),
                Token::Word("world".to_owned()),
                Token::Number("2024".to_owned()),
                Token::Word("foo".to_owned()),
                Token::Word("bar".to_owned()),
                Token::Word("baz".to_owned()),
            ]
        );
    }

    #[test]
    fn separates_letter_and_digit_runs_inside_a_fragment() {
        let tokens: Vec<_> = tokenize("abc123def!!xy z", 2).collect();
        assert_eq!(
            tokens,
            vec![
                Token::Word("abc".to_owned()),
                Token::Number("123".to_owned()),
                Token::Word("def".to_owned()),
                Token::Word("xy".to_owned()),
            ]
        );
    }

    #[test]
    fn drops_short_words_but_keeps_single_digits() {
        let tokens: Vec<_> = tokenize("a 7 bc", 2).collect();
        assert_eq!(
            tokens,
            vec![Token::Number("7".to_owned()), Token::Word("bc".to_owned())]
        );

        let strict: Vec<_> = tokenize("a bc def", 3).collect();
        assert_eq!(words(&strict), vec!["def"]);
    }

    #[test]
    fn lowercases_unicode_words() {
        let tokens: Vec<_> = tokenize("Ünïcode STRASSE", 2).collect();
        assert_eq!(words(&tokens), vec!["ünïcode", "strasse"]);
    }

    #[test]
    fn empty_and_delimiter_only_values_yield_nothing() {
        assert_eq!(tokenize("", 2).count(), 0);
        assert_eq!(tokenize(" ,-_/.@ ", 2).count(), 0);
    }

    #[test]
    fn tokenize_all_preserves_field_order() {
        let tokens: Vec<_> = tokenize_all(&["example.com", "alice 99"], 2).collect();
        assert_eq!(words(&tokens), vec!["example", "com", "alice"]);
        assert_eq!(tokens.last(), Some(&Token::Number("99".to_owned())));
    }
}

use std::fmt;

use crate::EvaluationError;

/// A lexical token borrowed from the formula source.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Token<'src> {
    Number(f64),
    /// A name, possibly dotted (`np.sqrt`).
    Ident(&'src str),
    Plus,
    Minus,
    Star,
    Slash,
    /// Power, written `^` or `**`.
    Caret,
    LeftParen,
    RightParen,
    Comma,
}

impl fmt::Display for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Number(value) => write!(f, "number {value}"),
            Token::Ident(name) => write!(f, "name {name:?}"),
            Token::Plus => f.write_str("'+'"),
            Token::Minus => f.write_str("'-'"),
            Token::Star => f.write_str("'*'"),
            Token::Slash => f.write_str("'/'"),
            Token::Caret => f.write_str("'^'"),
            Token::LeftParen => f.write_str("'('"),
            Token::RightParen => f.write_str("')'"),
            Token::Comma => f.write_str("','"),
        }
    }
}

/// A token with the byte offset where it starts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Spanned<'src> {
    pub token: Token<'src>,
    pub offset: usize,
}

/// Splits formula source into tokens.
///
/// # Errors
///
/// Returns an error on the first character that cannot start a token, or on
/// a numeric literal that does not parse.
pub(crate) fn tokenize(source: &str) -> Result<Vec<Spanned<'_>>, EvaluationError> {
    let bytes = source.as_bytes();
    let mut tokens = Vec::new();
    let mut pos = 0;

    while pos < bytes.len() {
        let start = pos;
        let byte = bytes[pos];

        let token = match byte {
            b' ' | b'\t' | b'\n' | b'\r' => {
                pos += 1;
                continue;
            }
            b'+' => single(&mut pos, Token::Plus),
            b'-' => single(&mut pos, Token::Minus),
            b'/' => single(&mut pos, Token::Slash),
            b'^' => single(&mut pos, Token::Caret),
            b'(' => single(&mut pos, Token::LeftParen),
            b')' => single(&mut pos, Token::RightParen),
            b',' => single(&mut pos, Token::Comma),
            b'*' if bytes.get(pos + 1) == Some(&b'*') => {
                pos += 2;
                Token::Caret
            }
            b'*' => single(&mut pos, Token::Star),
            b'0'..=b'9' | b'.' => {
                pos = scan_number(bytes, pos);
                let text = &source[start..pos];
                let value = text
                    .parse::<f64>()
                    .ok()
                    .filter(|value| value.is_finite())
                    .ok_or_else(|| EvaluationError::InvalidNumber {
                        text: text.to_owned(),
                        offset: start,
                    })?;
                Token::Number(value)
            }
            b if is_ident_start(b) => {
                pos = scan_ident(bytes, pos);
                Token::Ident(&source[start..pos])
            }
            _ => {
                // Offsets always fall on a char boundary here.
                let found = source[start..].chars().next().unwrap_or('\u{fffd}');
                return Err(EvaluationError::UnexpectedChar {
                    found,
                    offset: start,
                });
            }
        };

        tokens.push(Spanned {
            token,
            offset: start,
        });
    }

    Ok(tokens)
}

fn single<'src>(pos: &mut usize, token: Token<'src>) -> Token<'src> {
    *pos += 1;
    token
}

fn is_ident_start(byte: u8) -> bool {
    byte.is_ascii_alphabetic() || byte == b'_'
}

fn is_ident_continue(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || byte == b'_'
}

/// Scans `digits [. digits] [e [+-] digits]` and returns the end offset.
///
/// An exponent marker is only consumed when digits follow it.
fn scan_number(bytes: &[u8], mut pos: usize) -> usize {
    while pos < bytes.len() && bytes[pos].is_ascii_digit() {
        pos += 1;
    }
    if pos < bytes.len() && bytes[pos] == b'.' {
        pos += 1;
        while pos < bytes.len() && bytes[pos].is_ascii_digit() {
            pos += 1;
        }
    }
    if pos < bytes.len() && matches!(bytes[pos], b'e' | b'E') {
        let mut exp = pos + 1;
        if exp < bytes.len() && matches!(bytes[exp], b'+' | b'-') {
            exp += 1;
        }
        if exp < bytes.len() && bytes[exp].is_ascii_digit() {
            pos = exp;
            while pos < bytes.len() && bytes[pos].is_ascii_digit() {
                pos += 1;
            }
        }
    }
    pos
}

/// Scans a name with optional dotted segments and returns the end offset.
fn scan_ident(bytes: &[u8], mut pos: usize) -> usize {
    loop {
        while pos < bytes.len() && is_ident_continue(bytes[pos]) {
            pos += 1;
        }
        let dotted = pos + 1 < bytes.len() && bytes[pos] == b'.' && is_ident_start(bytes[pos + 1]);
        if !dotted {
            return pos;
        }
        pos += 1;
    }
}

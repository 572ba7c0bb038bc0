// Recursive-descent parser for the textual nested-pair contract-call encoding.
//
// Contract call parameters arrive as text like:
//
//   Left (Left (Left (Pair "tz1..." (Pair "tz1..." 500000))))
//
// i.e. a tagged sum type encoded with Left/Right wrappers around nested
// pairs of string and integer literals. Whitespace is insignificant. This
// replaces shape matching on the raw string: a record that fails to parse
// is an explicit error rather than a silent miss.

use thiserror::Error;

// =============================================================================
// SYNTAX TREE
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Micheline {
    Left(Box<Micheline>),
    Right(Box<Micheline>),
    Pair(Box<Micheline>, Box<Micheline>),
    Str(String),
    Int(i64),
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum MichelineError {
    #[error("unexpected end of input")]
    UnexpectedEnd,

    #[error("unexpected character '{ch}' at byte {position}")]
    UnexpectedChar { ch: char, position: usize },

    #[error("unknown constructor '{0}'")]
    UnknownConstructor(String),

    #[error("unterminated string literal starting at byte {0}")]
    UnterminatedString(usize),

    #[error("integer literal out of range at byte {0}")]
    IntOutOfRange(usize),

    #[error("expected ')' at byte {0}")]
    ExpectedCloseParen(usize),

    #[error("trailing input after expression at byte {0}")]
    TrailingInput(usize),
}

// =============================================================================
// TOKENIZER
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    LParen,
    RParen,
    Ident(String),
    Str(String),
    Int(i64),
}

struct Tokenizer<'a> {
    input: &'a [u8],
    pos: usize,
}

impl<'a> Tokenizer<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            input: input.as_bytes(),
            pos: 0,
        }
    }

    fn skip_whitespace(&mut self) {
        while self.pos < self.input.len() && self.input[self.pos].is_ascii_whitespace() {
            self.pos += 1;
        }
    }

    /// Next token, or None at end of input
    fn next(&mut self) -> Result<Option<Token>, MichelineError> {
        self.skip_whitespace();
        if self.pos >= self.input.len() {
            return Ok(None);
        }

        let start = self.pos;
        match self.input[self.pos] {
            b'(' => {
                self.pos += 1;
                Ok(Some(Token::LParen))
            }
            b')' => {
                self.pos += 1;
                Ok(Some(Token::RParen))
            }
            b'"' => {
                self.pos += 1;
                let content_start = self.pos;
                while self.pos < self.input.len() && self.input[self.pos] != b'"' {
                    self.pos += 1;
                }
                if self.pos >= self.input.len() {
                    return Err(MichelineError::UnterminatedString(start));
                }
                let s = String::from_utf8_lossy(&self.input[content_start..self.pos]).into_owned();
                self.pos += 1; // closing quote
                Ok(Some(Token::Str(s)))
            }
            b'0'..=b'9' => {
                while self.pos < self.input.len() && self.input[self.pos].is_ascii_digit() {
                    self.pos += 1;
                }
                let digits = std::str::from_utf8(&self.input[start..self.pos])
                    .expect("digit run is valid utf-8");
                let value: i64 = digits
                    .parse()
                    .map_err(|_| MichelineError::IntOutOfRange(start))?;
                Ok(Some(Token::Int(value)))
            }
            c if c.is_ascii_alphabetic() || c == b'_' => {
                while self.pos < self.input.len()
                    && (self.input[self.pos].is_ascii_alphanumeric() || self.input[self.pos] == b'_')
                {
                    self.pos += 1;
                }
                let ident = std::str::from_utf8(&self.input[start..self.pos])
                    .expect("ident run is valid utf-8")
                    .to_string();
                Ok(Some(Token::Ident(ident)))
            }
            other => Err(MichelineError::UnexpectedChar {
                ch: other as char,
                position: self.pos,
            }),
        }
    }
}

// =============================================================================
// PARSER
// =============================================================================

struct Parser<'a> {
    tokenizer: Tokenizer<'a>,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            tokenizer: Tokenizer::new(input),
        }
    }

    fn expect_token(&mut self) -> Result<Token, MichelineError> {
        self.tokenizer.next()?.ok_or(MichelineError::UnexpectedEnd)
    }

    fn parse_expr(&mut self) -> Result<Micheline, MichelineError> {
        match self.expect_token()? {
            Token::LParen => {
                let inner = self.parse_expr()?;
                match self.expect_token()? {
                    Token::RParen => Ok(inner),
                    _ => Err(MichelineError::ExpectedCloseParen(self.tokenizer.pos)),
                }
            }
            Token::Ident(name) => match name.as_str() {
                "Left" => Ok(Micheline::Left(Box::new(self.parse_expr()?))),
                "Right" => Ok(Micheline::Right(Box::new(self.parse_expr()?))),
                "Pair" => {
                    let first = self.parse_expr()?;
                    let second = self.parse_expr()?;
                    Ok(Micheline::Pair(Box::new(first), Box::new(second)))
                }
                _ => Err(MichelineError::UnknownConstructor(name)),
            },
            Token::Str(s) => Ok(Micheline::Str(s)),
            Token::Int(n) => Ok(Micheline::Int(n)),
            Token::RParen => Err(MichelineError::UnexpectedChar {
                ch: ')',
                position: self.tokenizer.pos,
            }),
        }
    }
}

/// Parse one complete parameter expression; trailing input is an error.
pub fn parse(input: &str) -> Result<Micheline, MichelineError> {
    let mut parser = Parser::new(input);
    let expr = parser.parse_expr()?;
    match parser.tokenizer.next()? {
        None => Ok(expr),
        Some(_) => Err(MichelineError::TrailingInput(parser.tokenizer.pos)),
    }
}

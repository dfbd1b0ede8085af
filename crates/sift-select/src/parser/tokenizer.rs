//! [§ 4.3 Tokenizer Algorithms](https://www.w3.org/TR/css-syntax-3/#tokenizer-algorithms),
//! reduced to what selectors need.

use super::token::Token;

/// Tokenize a whole selector string. Comments are dropped.
pub(crate) fn tokenize(input: &str) -> Vec<Token> {
    let mut tokenizer = Tokenizer {
        input: input.chars().collect(),
        position: 0,
    };
    let mut tokens = Vec::new();
    while let Some(token) = tokenizer.consume_token() {
        tokens.push(token);
    }
    tokens
}

struct Tokenizer {
    input: Vec<char>,
    position: usize,
}

impl Tokenizer {
    /// [§ 4.3.1 Consume a token](https://www.w3.org/TR/css-syntax-3/#consume-token)
    ///
    /// Returns `None` at EOF.
    fn consume_token(&mut self) -> Option<Token> {
        // "Consume comments."
        self.consume_comments();

        let c = self.consume()?;
        let token = match c {
            c if is_whitespace(c) => {
                self.consume_whitespace();
                Token::Whitespace
            }
            '"' | '\'' => self.consume_string_token(c),
            // "If the next input code point is an ident code point or the next
            // two input code points are a valid escape..."
            '#' => {
                if self.peek().is_some_and(is_ident_code_point) || self.starts_with_valid_escape(0)
                {
                    // "If the next 3 input code points would start an ident
                    // sequence, set the <hash-token>'s type flag to 'id'."
                    let is_id = self.would_start_ident_sequence();
                    Token::Hash {
                        value: self.consume_ident_sequence(),
                        is_id,
                    }
                } else {
                    Token::Delim('#')
                }
            }
            '(' => Token::LeftParen,
            ')' => Token::RightParen,
            '[' => Token::LeftBracket,
            ']' => Token::RightBracket,
            ',' => Token::Comma,
            ':' => Token::Colon,
            '+' | '-' | '.' => {
                self.reconsume();
                if self.would_start_number() {
                    self.consume_numeric_token()
                } else if c == '-' && self.would_start_ident_sequence() {
                    self.consume_ident_like_token()
                } else {
                    let _ = self.consume();
                    Token::Delim(c)
                }
            }
            '\\' => {
                self.reconsume();
                if self.starts_with_valid_escape(0) {
                    self.consume_ident_like_token()
                } else {
                    // "This is a parse error."
                    let _ = self.consume();
                    Token::Delim('\\')
                }
            }
            c if c.is_ascii_digit() => {
                self.reconsume();
                self.consume_numeric_token()
            }
            c if is_ident_start_code_point(c) => {
                self.reconsume();
                self.consume_ident_like_token()
            }
            c => Token::Delim(c),
        };
        Some(token)
    }

    /// [§ 4.3.2 Consume comments](https://www.w3.org/TR/css-syntax-3/#consume-comment)
    fn consume_comments(&mut self) {
        while self.peek() == Some('/') && self.peek_at(1) == Some('*') {
            self.position += 2;
            loop {
                match self.consume() {
                    Some('*') if self.peek() == Some('/') => {
                        let _ = self.consume();
                        break;
                    }
                    Some(_) => {}
                    None => break,
                }
            }
        }
    }

    fn consume_whitespace(&mut self) {
        while self.peek().is_some_and(is_whitespace) {
            let _ = self.consume();
        }
    }

    /// [§ 4.3.4 Consume a string token](https://www.w3.org/TR/css-syntax-3/#consume-string-token)
    fn consume_string_token(&mut self, ending_code_point: char) -> Token {
        let mut value = String::new();
        loop {
            match self.consume() {
                Some(c) if c == ending_code_point => return Token::String(value),
                // "EOF: This is a parse error. Return the <string-token>."
                None => return Token::String(value),
                Some('\n') => {
                    self.reconsume();
                    return Token::BadString;
                }
                Some('\\') => match self.peek() {
                    None => {}
                    Some('\n') => {
                        let _ = self.consume();
                    }
                    Some(_) => value.push(self.consume_escaped_code_point()),
                },
                Some(c) => value.push(c),
            }
        }
    }

    /// [§ 4.3.5 Consume a numeric token](https://www.w3.org/TR/css-syntax-3/#consume-numeric-token)
    fn consume_numeric_token(&mut self) -> Token {
        let repr = self.consume_number();
        if self.would_start_ident_sequence() {
            let unit = self.consume_ident_sequence();
            Token::Dimension { repr, unit }
        } else if self.peek() == Some('%') {
            let _ = self.consume();
            Token::Percentage { repr }
        } else {
            Token::Number { repr }
        }
    }

    /// [§ 4.3.6 Consume an ident-like token](https://www.w3.org/TR/css-syntax-3/#consume-ident-like-token)
    ///
    /// `url(` gets no special treatment; it is just a function token here.
    fn consume_ident_like_token(&mut self) -> Token {
        let name = self.consume_ident_sequence();
        if self.peek() == Some('(') {
            let _ = self.consume();
            Token::Function(name)
        } else {
            Token::Ident(name)
        }
    }

    /// [§ 4.3.11 Consume an ident sequence](https://www.w3.org/TR/css-syntax-3/#consume-name)
    fn consume_ident_sequence(&mut self) -> String {
        let mut result = String::new();
        loop {
            match self.consume() {
                Some(c) if is_ident_code_point(c) => result.push(c),
                Some('\\') if self.peek() != Some('\n') => {
                    result.push(self.consume_escaped_code_point());
                }
                Some(_) => {
                    self.reconsume();
                    return result;
                }
                None => return result,
            }
        }
    }

    /// [§ 4.3.12 Consume a number](https://www.w3.org/TR/css-syntax-3/#consume-number)
    ///
    /// Only the representation is kept; nothing in a selector needs the value.
    fn consume_number(&mut self) -> String {
        let mut repr = String::new();
        if matches!(self.peek(), Some('+' | '-')) {
            self.push_next(&mut repr);
        }
        self.push_digits(&mut repr);

        if self.peek() == Some('.') && self.peek_at(1).is_some_and(|c| c.is_ascii_digit()) {
            self.push_next(&mut repr);
            self.push_digits(&mut repr);
        }

        if matches!(self.peek(), Some('e' | 'E')) {
            let has_sign = matches!(self.peek_at(1), Some('+' | '-'));
            let digit_pos = if has_sign { 2 } else { 1 };
            if self.peek_at(digit_pos).is_some_and(|c| c.is_ascii_digit()) {
                self.push_next(&mut repr);
                if has_sign {
                    self.push_next(&mut repr);
                }
                self.push_digits(&mut repr);
            }
        }
        repr
    }

    /// [§ 4.3.7 Consume an escaped code point](https://www.w3.org/TR/css-syntax-3/#consume-escaped-code-point)
    fn consume_escaped_code_point(&mut self) -> char {
        match self.consume() {
            Some(c) if c.is_ascii_hexdigit() => {
                let mut hex = c.to_string();
                // "Consume as many hex digits as possible, but no more than 5."
                while hex.len() < 6 && self.peek().is_some_and(|c| c.is_ascii_hexdigit()) {
                    self.push_next(&mut hex);
                }
                if self.peek().is_some_and(is_whitespace) {
                    let _ = self.consume();
                }
                u32::from_str_radix(&hex, 16)
                    .ok()
                    .filter(|&code_point| code_point != 0)
                    .and_then(char::from_u32)
                    .unwrap_or('\u{FFFD}')
            }
            // "EOF: This is a parse error. Return U+FFFD REPLACEMENT CHARACTER."
            None => '\u{FFFD}',
            Some(c) => c,
        }
    }

    /// [§ 4.3.8 Check if two code points are a valid escape](https://www.w3.org/TR/css-syntax-3/#starts-with-a-valid-escape)
    fn starts_with_valid_escape(&self, offset: usize) -> bool {
        self.peek_at(offset) == Some('\\') && self.peek_at(offset + 1) != Some('\n')
    }

    /// [§ 4.3.9 Check if three code points would start an ident sequence](https://www.w3.org/TR/css-syntax-3/#would-start-an-identifier)
    fn would_start_ident_sequence(&self) -> bool {
        match self.peek() {
            Some('-') => {
                self.peek_at(1)
                    .is_some_and(|c| is_ident_start_code_point(c) || c == '-')
                    || self.starts_with_valid_escape(1)
            }
            Some('\\') => self.starts_with_valid_escape(0),
            Some(c) => is_ident_start_code_point(c),
            None => false,
        }
    }

    /// [§ 4.3.10 Check if three code points would start a number](https://www.w3.org/TR/css-syntax-3/#starts-with-a-number)
    fn would_start_number(&self) -> bool {
        let is_digit = |offset| self.peek_at(offset).is_some_and(|c: char| c.is_ascii_digit());
        match self.peek() {
            Some('+' | '-') => is_digit(1) || (self.peek_at(1) == Some('.') && is_digit(2)),
            Some('.') => is_digit(1),
            Some(c) => c.is_ascii_digit(),
            None => false,
        }
    }

    fn push_next(&mut self, repr: &mut String) {
        if let Some(c) = self.consume() {
            repr.push(c);
        }
    }

    fn push_digits(&mut self, repr: &mut String) {
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.push_next(repr);
        }
    }

    fn consume(&mut self) -> Option<char> {
        let c = self.input.get(self.position).copied()?;
        self.position += 1;
        Some(c)
    }

    fn reconsume(&mut self) {
        self.position = self.position.saturating_sub(1);
    }

    fn peek(&self) -> Option<char> {
        self.peek_at(0)
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.input.get(self.position + offset).copied()
    }
}

/// [§ 4.2 Definitions - whitespace](https://www.w3.org/TR/css-syntax-3/#whitespace)
const fn is_whitespace(c: char) -> bool {
    matches!(c, '\n' | '\t' | ' ' | '\r' | '\x0C')
}

/// "A letter, a non-ASCII code point, or U+005F LOW LINE (_)."
const fn is_ident_start_code_point(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || !c.is_ascii()
}

/// "An ident-start code point, a digit, or U+002D HYPHEN-MINUS (-)."
const fn is_ident_code_point(c: char) -> bool {
    is_ident_start_code_point(c) || c.is_ascii_digit() || c == '-'
}

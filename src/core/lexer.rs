// lexer.rs

use thiserror::Error;
use unicode_normalization::UnicodeNormalization;

use crate::core::number::{parse_decimal, parse_hex_float, LiteralError};
use crate::core::token::{Token, TokenKind};

/// Lexer error types with detailed location.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LexerError {
    #[error("Illegal character '{ch}' at {line}:{column}")]
    IllegalCharacter { ch: char, line: usize, column: usize },
    #[error("Number too large, overflow occurred: '{literal}' at {line}:{column}")]
    NumericOverflow {
        literal: String,
        line: usize,
        column: usize,
    },
}

impl LexerError {
    pub fn position(&self) -> (usize, usize) {
        match self {
            LexerError::IllegalCharacter { line, column, .. }
            | LexerError::NumericOverflow { line, column, .. } => (*line, *column),
        }
    }

    pub fn overflow(token: &Token) -> Self {
        LexerError::NumericOverflow {
            literal: token.lexeme.clone(),
            line: token.line,
            column: token.column,
        }
    }
}

/// Lazy tokenizer over one input chunk. Each call to `Lexer::new` starts
/// fresh at line 1; no state is shared between inputs.
pub struct Lexer {
    source: String,
    pos: usize,
    line: usize,
    col: usize,
    // Last two significant tokens, to recognise filename positions.
    prev: Option<TokenKind>,
    prev2: Option<TokenKind>,
    consumed_eof: bool, // Prevent repeated EOF tokens
}

impl Lexer {
    pub fn new(input: &str) -> Self {
        Self {
            source: input.nfc().collect(),
            pos: 0,
            line: 1,
            col: 1,
            prev: None,
            prev2: None,
            consumed_eof: false,
        }
    }

    /// The NFC-normalized text the token offsets refer to.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Tokenizes the whole input. Illegal characters are returned separately
    /// and never stop the scan.
    pub fn tokenize(&mut self) -> (Vec<Token>, Vec<LexerError>) {
        let mut tokens = Vec::new();
        let mut errors = Vec::new();
        for item in self.by_ref() {
            match item {
                Ok(token) => tokens.push(token),
                Err(e) => errors.push(e),
            }
        }
        (tokens, errors)
    }

    #[inline]
    fn current(&self) -> Option<char> {
        self.source[self.pos..].chars().next()
    }

    #[inline]
    fn peek_char(&self) -> Option<char> {
        let mut it = self.source[self.pos..].chars();
        it.next();
        it.next()
    }

    #[inline]
    fn advance_char(&mut self) {
        if let Some(ch) = self.current() {
            self.pos += ch.len_utf8();
            if ch == '\n' {
                self.line += 1;
                self.col = 1;
            } else {
                self.col += 1;
            }
        }
    }

    fn advance_while(&mut self, pred: impl Fn(char) -> bool) {
        while let Some(ch) = self.current() {
            if !pred(ch) {
                break;
            }
            self.advance_char();
        }
    }

    fn make_token(&mut self, kind: TokenKind, start: usize, line: usize, column: usize) -> Token {
        self.prev2 = self.prev.take();
        self.prev = Some(kind.clone());
        Token::new(kind, self.source[start..self.pos].to_string(), line, column, start)
    }

    fn expects_filename(&self) -> bool {
        matches!(self.prev, Some(TokenKind::File))
            || (matches!(self.prev, Some(TokenKind::Equals))
                && matches!(self.prev2, Some(TokenKind::Output)))
    }

    fn skip_trivia(&mut self) {
        while let Some(ch) = self.current() {
            match ch {
                ' ' | '\t' | '\r' | '\n' | '\u{FEFF}' => self.advance_char(),
                '#' => self.advance_while(|c| c != '\n'),
                _ => break,
            }
        }
    }

    pub fn next_token(&mut self) -> Option<Result<Token, LexerError>> {
        if self.consumed_eof {
            return None;
        }
        self.skip_trivia();

        let (start, line, column) = (self.pos, self.line, self.col);
        let ch = match self.current() {
            Some(ch) => ch,
            None => {
                self.consumed_eof = true;
                return Some(Ok(Token::new(TokenKind::EOF, String::new(), line, column, start)));
            }
        };

        if self.expects_filename() {
            if let Some(kind) = self.lex_filename() {
                return Some(Ok(self.make_token(kind, start, line, column)));
            }
        }

        let kind = if ch.is_ascii_digit() {
            self.lex_number()
        } else if ch.is_ascii_alphabetic() || ch == '_' {
            self.lex_identifier()
        } else if let Some(kind) = self.match_two_char_operator(ch) {
            self.advance_char();
            self.advance_char();
            kind
        } else if let Some(kind) = match_single_char_token(ch) {
            self.advance_char();
            kind
        } else {
            self.advance_char();
            debug_log!("[lexer] illegal character {:?} at {}:{}", ch, line, column);
            return Some(Err(LexerError::IllegalCharacter { ch, line, column }));
        };
        Some(Ok(self.make_token(kind, start, line, column)))
    }

    /// A path ending in `.ext`. `.kdk` makes it an input script name.
    /// Leaves the position untouched when the text is not a file name.
    fn lex_filename(&mut self) -> Option<TokenKind> {
        let rest = &self.source[self.pos..];
        let len = rest
            .find(|c: char| !is_path_char(c))
            .unwrap_or(rest.len());
        let candidate = &rest[..len];
        let dot = candidate.rfind('.')?;
        let ext = &candidate[dot + 1..];
        if ext.is_empty() || !ext.chars().all(|c| c.is_ascii_alphabetic()) {
            return None;
        }
        let is_script = ext == "kdk";
        let name = candidate.to_string();
        for _ in 0..name.chars().count() {
            self.advance_char();
        }
        if is_script {
            Some(TokenKind::InputFileName(name))
        } else {
            Some(TokenKind::OutputFileName(name))
        }
    }

    fn lex_number(&mut self) -> TokenKind {
        let start = self.pos;
        if self.current() == Some('0') && matches!(self.peek_char(), Some('x') | Some('X')) {
            return self.lex_hex_float(start);
        }
        self.advance_while(|c| c.is_ascii_digit());
        if self.current() == Some('.') {
            self.advance_char();
            self.advance_while(|c| c.is_ascii_digit());
        }
        let text = &self.source[start..self.pos];
        match parse_decimal(text) {
            Ok(n) => TokenKind::Number(n),
            Err(LiteralError::Overflow) | Err(LiteralError::Malformed) => {
                debug_log!("[lexer] numeric overflow in literal {}", text);
                TokenKind::Overflow
            }
        }
    }

    fn lex_hex_float(&mut self, start: usize) -> TokenKind {
        self.advance_char(); // '0'
        self.advance_char(); // 'x'
        self.advance_while(|c| c.is_ascii_hexdigit());
        if self.current() == Some('.') && self.peek_char().is_some_and(|c| c.is_ascii_hexdigit()) {
            self.advance_char();
            self.advance_while(|c| c.is_ascii_hexdigit());
        }
        if matches!(self.current(), Some('p') | Some('P')) {
            let after = &self.source[self.pos + 1..];
            let digits_at = if after.starts_with('-') { 1 } else { 0 };
            if after[digits_at..].starts_with(|c: char| c.is_ascii_digit()) {
                self.advance_char();
                if digits_at == 1 {
                    self.advance_char();
                }
                self.advance_while(|c| c.is_ascii_digit());
            }
        }
        match parse_hex_float(&self.source[start..self.pos]) {
            Ok(n) => TokenKind::HexFloat(n.as_f64()),
            Err(_) => TokenKind::Overflow,
        }
    }

    fn lex_identifier(&mut self) -> TokenKind {
        let start = self.pos;
        self.advance_while(|c| c.is_ascii_alphanumeric() || c == '_');
        let ident = &self.source[start..self.pos];
        TokenKind::keyword(ident).unwrap_or_else(|| TokenKind::Identifier(ident.to_string()))
    }

    fn match_two_char_operator(&self, ch: char) -> Option<TokenKind> {
        match (ch, self.peek_char()) {
            ('<', Some('=')) => Some(TokenKind::LessEqual),
            ('>', Some('=')) => Some(TokenKind::GreaterEqual),
            _ => None,
        }
    }
}

impl Iterator for Lexer {
    type Item = Result<Token, LexerError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_token()
    }
}

fn match_single_char_token(ch: char) -> Option<TokenKind> {
    match ch {
        '+' => Some(TokenKind::Plus),
        '-' => Some(TokenKind::Minus),
        '*' => Some(TokenKind::Star),
        '/' => Some(TokenKind::Slash),
        '^' => Some(TokenKind::Caret),
        '=' => Some(TokenKind::Equals),
        '<' => Some(TokenKind::LessThan),
        '>' => Some(TokenKind::GreaterThan),
        '(' => Some(TokenKind::OpenParen),
        ')' => Some(TokenKind::CloseParen),
        '[' => Some(TokenKind::OpenBracket),
        ']' => Some(TokenKind::CloseBracket),
        ',' => Some(TokenKind::Comma),
        ';' => Some(TokenKind::Semicolon),
        _ => None,
    }
}

fn is_path_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || matches!(ch, '_' | '-' | '/' | '\\' | '(' | ')' | '.')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::number::NumberLiteral;

    fn kinds(src: &str) -> Vec<TokenKind> {
        let (tokens, errors) = Lexer::new(src).tokenize();
        assert!(errors.is_empty(), "unexpected lexer errors: {errors:?}");
        tokens.into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn keyword_prefix_stays_identifier() {
        assert_eq!(
            kinds("pavement Var"),
            vec![TokenKind::Identifier("pavement".into()), TokenKind::Var, TokenKind::EOF]
        );
    }

    #[test]
    fn newlines_and_comments_produce_no_tokens() {
        let (tokens, _) = Lexer::new("# header\n\npave # trailing\n;").tokenize();
        assert_eq!(tokens[0].kind, TokenKind::Pave);
        assert_eq!((tokens[0].line, tokens[0].column), (3, 1));
        assert_eq!(tokens[1].kind, TokenKind::Semicolon);
        assert_eq!(tokens[1].line, 4);
    }

    #[test]
    fn illegal_character_skips_one() {
        let (tokens, errors) = Lexer::new("pave $ ;").tokenize();
        assert_eq!(errors, vec![LexerError::IllegalCharacter { ch: '$', line: 1, column: 6 }]);
        assert_eq!(tokens.len(), 3);
    }

    #[test]
    fn number_forms() {
        assert_eq!(
            kinds("7 2.5 0x1p-1"),
            vec![
                TokenKind::Number(NumberLiteral::Integer(7)),
                TokenKind::Number(NumberLiteral::Real(2.5)),
                TokenKind::HexFloat(0.5),
                TokenKind::EOF
            ]
        );
    }

    #[test]
    fn filename_only_after_file_keyword() {
        assert_eq!(
            kinds("file models/box.kdk"),
            vec![TokenKind::File, TokenKind::InputFileName("models/box.kdk".into()), TokenKind::EOF]
        );
        assert_eq!(
            kinds("set output = out.txt"),
            vec![
                TokenKind::Set,
                TokenKind::Output,
                TokenKind::Equals,
                TokenKind::OutputFileName("out.txt".into()),
                TokenKind::EOF
            ]
        );
        // Without the keyword context a dotted word is not a file name.
        let (tokens, errors) = Lexer::new("x.txt").tokenize();
        assert_eq!(tokens[0].kind, TokenKind::Identifier("x".into()));
        assert_eq!(errors.len(), 1);
    }
}

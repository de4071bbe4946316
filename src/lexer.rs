//! Lexer for contract expressions using logos

use logos::{Lexer as LogosLexer, Logos};

#[derive(Logos, Debug, PartialEq, Clone)]
pub enum Token<'a> {
    // Delimiters
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token(",")]
    Comma,
    #[token("*")]
    Star,

    // Comparison operators (two-character forms before one-character forms)
    #[token("<=", priority = 8)]
    LessEq,
    #[token(">=", priority = 8)]
    GreaterEq,
    #[token("==", priority = 8)]
    EqEq,
    #[token("!=", priority = 8)]
    NotEq,
    #[token("<", priority = 7)]
    Less,
    #[token(">", priority = 7)]
    Greater,

    // Literals; the sign is part of the literal since '-' appears nowhere
    // else in the language
    #[regex(r"-?[0-9]+\.[0-9]+([eE][+-]?[0-9]+)?", priority = 6, callback = |lex| lex.slice().parse::<f64>().ok())]
    Float(f64),
    #[regex(r"-?[0-9]+", priority = 5, callback = |lex| lex.slice().parse::<i64>().ok())]
    Integer(i64),

    // A single uppercase letter is a size variable, never an identifier
    #[regex(r"[A-Z]", priority = 4, callback = |lex| lex.slice().chars().next())]
    SizeVar(char),

    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*", priority = 3)]
    Ident(&'a str),

    // Whitespace (automatically skipped)
    #[regex(r"[ \t\n\r]+", logos::skip)]
    // Error token
    Error,
}

#[derive(Clone)]
pub struct Lexer<'a> {
    inner: LogosLexer<'a, Token<'a>>,
    peeked: Option<(Token<'a>, std::ops::Range<usize>)>,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            inner: Token::lexer(source),
            peeked: None,
        }
    }

    pub fn next_token(&mut self) -> Option<Token<'a>> {
        if let Some((token, _)) = self.peeked.take() {
            Some(token)
        } else {
            self.inner.next().map(|r| r.unwrap_or(Token::Error))
        }
    }

    pub fn peek_token(&mut self) -> Option<&Token<'a>> {
        if self.peeked.is_none() {
            if let Some(r) = self.inner.next() {
                let token = r.unwrap_or(Token::Error);
                let span = self.inner.span();
                self.peeked = Some((token, span));
            }
        }
        self.peeked.as_ref().map(|(token, _)| token)
    }

    pub fn span(&self) -> std::ops::Range<usize> {
        if let Some((_, span)) = &self.peeked {
            span.clone()
        } else {
            self.inner.span()
        }
    }

    pub fn slice(&self) -> &'a str {
        self.inner.slice()
    }
}

//! Recursive-descent parser for contract expressions
//!
//! Grammar:
//!
//! ```text
//! expression  := clause (',' clause)*              conjunction if > 1
//! clause      := '*'
//!              | op signed-number                  op in < <= > >= == !=
//!              | 'tuple' '(' clause (',' clause)* ')'
//!              | 'list' lenspec? elemspec?
//!              | identifier                        builtin or registered name
//! lenspec     := '[' (integer | UPPERCASE-LETTER) ']'
//! elemspec    := '(' expression ')'
//! ```
//!
//! Identifiers resolve builtins first, then the registry; a registered name
//! is expanded inline as an independent copy of its definition.

use crate::contract::{CmpOp, LengthSpec, Number, Term};
use crate::errors::ParseError;
use crate::lexer::{Lexer, Token};
use crate::registry::Registry;
use crate::value::ValueKind;

/// Identifiers with built-in meaning; never registrable as contract names.
pub(crate) const RESERVED: &[&str] = &[
    "list", "tuple", "map", "dict", "int", "float", "number", "str", "string", "bool", "nil",
    "none", "anything",
];

pub(crate) fn is_reserved(name: &str) -> bool {
    RESERVED.contains(&name)
}

pub struct Parser<'a> {
    lexer: Lexer<'a>,
    current: Option<Token<'a>>,
    span: std::ops::Range<usize>,
    text: &'a str,
    registry: &'a Registry,
}

impl<'a> Parser<'a> {
    pub fn new(registry: &'a Registry, source: &'a str) -> Self {
        let mut parser = Self {
            lexer: Lexer::new(source),
            current: None,
            span: 0..0,
            text: "",
            registry,
        };
        parser.advance();
        parser
    }

    /// Parse the whole expression, rejecting trailing input
    pub fn parse(mut self) -> Result<Term, ParseError> {
        let term = self.parse_expression()?;
        if self.current.is_some() {
            return Err(ParseError::TrailingInput {
                position: self.span.start,
                found: self.text.to_string(),
            });
        }
        Ok(term)
    }

    fn advance(&mut self) {
        self.current = self.lexer.next_token();
        self.span = self.lexer.span();
        self.text = self.lexer.slice();
    }

    fn expect(&mut self, expected: Token<'a>) -> Result<(), ParseError> {
        match &self.current {
            Some(token) if *token == expected => {
                self.advance();
                Ok(())
            }
            Some(token) => Err(ParseError::UnexpectedToken {
                position: self.span.start,
                expected: format!("'{}'", token_text(&expected)),
                found: token_text(token),
            }),
            None => Err(ParseError::UnexpectedEof {
                expected: format!("'{}'", token_text(&expected)),
            }),
        }
    }

    fn parse_expression(&mut self) -> Result<Term, ParseError> {
        let mut clauses = vec![self.parse_clause()?];
        while matches!(self.current, Some(Token::Comma)) {
            self.advance();
            clauses.push(self.parse_clause()?);
        }
        if clauses.len() == 1 {
            Ok(clauses.pop().expect("one clause"))
        } else {
            Ok(Term::All(clauses))
        }
    }

    fn parse_clause(&mut self) -> Result<Term, ParseError> {
        match self.current.clone() {
            None => Err(ParseError::UnexpectedEof {
                expected: "a contract clause".to_string(),
            }),
            Some(Token::Star) => {
                self.advance();
                Ok(Term::Any)
            }
            Some(Token::Less) => self.parse_comparison(CmpOp::Lt),
            Some(Token::LessEq) => self.parse_comparison(CmpOp::Le),
            Some(Token::Greater) => self.parse_comparison(CmpOp::Gt),
            Some(Token::GreaterEq) => self.parse_comparison(CmpOp::Ge),
            Some(Token::EqEq) => self.parse_comparison(CmpOp::Eq),
            Some(Token::NotEq) => self.parse_comparison(CmpOp::Ne),
            Some(Token::Ident(name)) => self.parse_identifier(name),
            Some(Token::Error) => Err(ParseError::UnexpectedCharacter {
                position: self.span.start,
                found: self.text.to_string(),
            }),
            Some(other) => Err(ParseError::UnexpectedToken {
                position: self.span.start,
                expected: "a contract clause".to_string(),
                found: token_text(&other),
            }),
        }
    }

    fn parse_comparison(&mut self, op: CmpOp) -> Result<Term, ParseError> {
        self.advance();
        let bound = match self.current {
            Some(Token::Integer(i)) => Number::Int(i),
            Some(Token::Float(f)) => Number::Float(f),
            Some(ref other) => {
                return Err(ParseError::UnexpectedToken {
                    position: self.span.start,
                    expected: "a numeric bound".to_string(),
                    found: token_text(other),
                })
            }
            None => {
                return Err(ParseError::UnexpectedEof {
                    expected: "a numeric bound".to_string(),
                })
            }
        };
        self.advance();
        Ok(Term::Comparison { op, bound })
    }

    fn parse_identifier(&mut self, name: &'a str) -> Result<Term, ParseError> {
        match name {
            "tuple" => self.parse_tuple(),
            "list" => self.parse_list(),
            "int" => self.builtin(Term::Type(ValueKind::Integer.into())),
            "float" => self.builtin(Term::Type(ValueKind::Float.into())),
            "number" => self.builtin(Term::Number),
            "str" | "string" => self.builtin(Term::Type(ValueKind::String.into())),
            "bool" => self.builtin(Term::Type(ValueKind::Boolean.into())),
            "nil" | "none" => self.builtin(Term::Type(ValueKind::Nil.into())),
            "map" | "dict" => self.builtin(Term::Type(ValueKind::Map.into())),
            "anything" => self.builtin(Term::Any),
            _ => match self.registry.resolve(name) {
                Some(contract) => {
                    self.advance();
                    Ok(Term::Named {
                        name: name.to_string(),
                        body: Box::new(contract.term().clone()),
                    })
                }
                None => Err(ParseError::UnknownIdentifier {
                    name: name.to_string(),
                    position: self.span.start,
                }),
            },
        }
    }

    fn builtin(&mut self, term: Term) -> Result<Term, ParseError> {
        self.advance();
        Ok(term)
    }

    fn parse_tuple(&mut self) -> Result<Term, ParseError> {
        self.advance();
        // Bare `tuple` matches any tuple
        if !matches!(self.current, Some(Token::LParen)) {
            return Ok(Term::Type(ValueKind::Tuple.into()));
        }
        self.advance();
        let mut children = vec![self.parse_clause()?];
        while matches!(self.current, Some(Token::Comma)) {
            self.advance();
            children.push(self.parse_clause()?);
        }
        self.expect(Token::RParen)?;
        Ok(Term::Tuple(children))
    }

    fn parse_list(&mut self) -> Result<Term, ParseError> {
        self.advance();
        let length = if matches!(self.current, Some(Token::LBracket)) {
            self.advance();
            let length = match self.current {
                Some(Token::Integer(i)) if i >= 0 => LengthSpec::Literal(i as usize),
                Some(Token::Integer(_)) | Some(Token::Float(_)) => {
                    return Err(ParseError::InvalidLength {
                        position: self.span.start,
                        found: self.text.to_string(),
                    })
                }
                Some(Token::SizeVar(var)) => LengthSpec::Variable(var),
                Some(ref other) => {
                    return Err(ParseError::UnexpectedToken {
                        position: self.span.start,
                        expected: "an integer or uppercase size variable".to_string(),
                        found: token_text(other),
                    })
                }
                None => {
                    return Err(ParseError::UnexpectedEof {
                        expected: "an integer or uppercase size variable".to_string(),
                    })
                }
            };
            self.advance();
            self.expect(Token::RBracket)?;
            Some(length)
        } else {
            None
        };

        let element = if matches!(self.current, Some(Token::LParen)) {
            self.advance();
            let element = self.parse_expression()?;
            self.expect(Token::RParen)?;
            Some(Box::new(element))
        } else {
            None
        };

        Ok(Term::List { length, element })
    }
}

fn token_text(token: &Token<'_>) -> String {
    match token {
        Token::LParen => "(".to_string(),
        Token::RParen => ")".to_string(),
        Token::LBracket => "[".to_string(),
        Token::RBracket => "]".to_string(),
        Token::Comma => ",".to_string(),
        Token::Star => "*".to_string(),
        Token::Less => "<".to_string(),
        Token::LessEq => "<=".to_string(),
        Token::Greater => ">".to_string(),
        Token::GreaterEq => ">=".to_string(),
        Token::EqEq => "==".to_string(),
        Token::NotEq => "!=".to_string(),
        Token::Integer(i) => i.to_string(),
        Token::Float(f) => f.to_string(),
        Token::SizeVar(v) => v.to_string(),
        Token::Ident(s) => s.to_string(),
        Token::Error => "<invalid>".to_string(),
    }
}

//! Formula tokenizer.
//!
//! Splits formula text into parentheses, the four arithmetic operators,
//! variables (`A1`, `xy22`) and numeric literals (`3`, `2.`, `.5`,
//! `6.02e23`). Whitespace separates tokens and is dropped. Anything else
//! comes back as [`Lexeme::Invalid`] so the validator can report it.

use regex::Regex;
use std::sync::OnceLock;

/// Binary arithmetic operator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operator {
    Add,
    Sub,
    Mul,
    Div,
}

impl Operator {
    pub fn symbol(self) -> char {
        match self {
            Operator::Add => '+',
            Operator::Sub => '-',
            Operator::Mul => '*',
            Operator::Div => '/',
        }
    }

    fn from_symbol(c: char) -> Option<Operator> {
        match c {
            '+' => Some(Operator::Add),
            '-' => Some(Operator::Sub),
            '*' => Some(Operator::Mul),
            '/' => Some(Operator::Div),
            _ => None,
        }
    }

    /// `*` and `/` bind tighter than `+` and `-`.
    pub fn is_multiplicative(self) -> bool {
        matches!(self, Operator::Mul | Operator::Div)
    }
}

/// A raw token borrowed from the formula text.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Lexeme<'a> {
    LParen,
    RParen,
    Op(Operator),
    Variable(&'a str),
    Number(&'a str),
    Invalid(&'a str),
}

impl Lexeme<'_> {
    pub fn text(&self) -> String {
        match self {
            Lexeme::LParen => "(".to_string(),
            Lexeme::RParen => ")".to_string(),
            Lexeme::Op(op) => op.symbol().to_string(),
            Lexeme::Variable(s) | Lexeme::Number(s) | Lexeme::Invalid(s) => s.to_string(),
        }
    }
}

fn token_re() -> &'static Regex {
    static TOKEN_RE: OnceLock<Regex> = OnceLock::new();
    TOKEN_RE.get_or_init(|| {
        Regex::new(
            r"^(?:(?<paren>[()])|(?<op>[-+*/])|(?<var>[A-Za-z]+[0-9]+)|(?<num>(?:[0-9]+\.[0-9]*|[0-9]*\.[0-9]+|[0-9]+)(?:[eE][-+]?[0-9]+)?))",
        )
        .expect("token regex must compile")
    })
}

fn is_separator(c: char) -> bool {
    c.is_whitespace() || matches!(c, '(' | ')' | '+' | '-' | '*' | '/')
}

/// Split `formula` into lexemes.
pub fn tokenize(formula: &str) -> Vec<Lexeme<'_>> {
    let re = token_re();
    let mut out = Vec::new();
    let mut rest = formula.trim_start();

    while !rest.is_empty() {
        let consumed = match re.captures(rest) {
            Some(caps) => {
                if let Some(m) = caps.name("paren") {
                    out.push(if m.as_str() == "(" {
                        Lexeme::LParen
                    } else {
                        Lexeme::RParen
                    });
                    m.end()
                } else if let Some(m) = caps.name("op") {
                    let symbol = m.as_str().chars().next().and_then(Operator::from_symbol);
                    match symbol {
                        Some(op) => out.push(Lexeme::Op(op)),
                        None => out.push(Lexeme::Invalid(m.as_str())),
                    }
                    m.end()
                } else if let Some(m) = caps.name("var") {
                    out.push(Lexeme::Variable(m.as_str()));
                    m.end()
                } else if let Some(m) = caps.name("num") {
                    out.push(Lexeme::Number(m.as_str()));
                    m.end()
                } else {
                    0
                }
            }
            None => 0,
        };

        let consumed = if consumed > 0 {
            consumed
        } else {
            // Unrecognised run: everything up to the next separator.
            let end = rest
                .char_indices()
                .skip(1)
                .find(|(_, c)| is_separator(*c))
                .map(|(idx, _)| idx)
                .unwrap_or(rest.len());
            out.push(Lexeme::Invalid(&rest[..end]));
            end
        };

        rest = rest[consumed..].trim_start();
    }

    out
}

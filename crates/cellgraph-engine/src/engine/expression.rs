//! Validated arithmetic expressions.
//!
//! An [`Expression`] is built once from formula text and never changes.
//! Construction tokenizes, checks the grammar and rewrites every token
//! into canonical form (upper-cased variables, numbers re-rendered through
//! [`format_number`]). Two expressions are equal exactly when their
//! canonical texts are equal, so `x1 + 5.0` and `X1+5` are the same
//! expression.

use std::collections::HashSet;
use std::fmt;
use std::hash::{Hash, Hasher};

use super::cell_name::CellName;
use super::error::FormulaFormatError;
use super::eval::{FormulaError, evaluate};
use super::format::format_number;
use super::token::{Lexeme, Operator, tokenize};

/// A canonicalized token.
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Token {
    LParen,
    RParen,
    Op(Operator),
    Number(f64),
    Variable(CellName),
}

impl Token {
    fn write_canonical(&self, out: &mut String) {
        match self {
            Token::LParen => out.push('('),
            Token::RParen => out.push(')'),
            Token::Op(op) => out.push(op.symbol()),
            Token::Number(n) => out.push_str(&format_number(*n)),
            Token::Variable(name) => out.push_str(name.as_str()),
        }
    }
}

/// What the validator allows next.
#[derive(Clone, Copy, PartialEq, Eq)]
enum Expect {
    /// A number, variable or `(`: at the start, after `(` and after operators.
    Operand,
    /// An operator or `)`: after numbers, variables and `)`.
    Operator,
}

#[derive(Clone, Debug)]
pub struct Expression {
    tokens: Vec<Token>,
    canonical: String,
}

impl Expression {
    /// Parse and validate `formula`.
    pub fn new(formula: &str) -> Result<Expression, FormulaFormatError> {
        let lexemes = tokenize(formula);
        if lexemes.is_empty() {
            return Err(FormulaFormatError::new("The formula cannot be empty"));
        }

        let mut tokens = Vec::with_capacity(lexemes.len());
        let mut canonical = String::with_capacity(formula.len());
        let mut depth: usize = 0;
        let mut expect = Expect::Operand;
        let mut prev: Option<Lexeme<'_>> = None;

        for lexeme in &lexemes {
            let token = match *lexeme {
                Lexeme::Invalid(text) => {
                    return Err(FormulaFormatError::new(format!("Invalid token: {}", text)));
                }
                Lexeme::Number(text) => {
                    let n: f64 = text.parse().map_err(|_| {
                        FormulaFormatError::new(format!("Invalid number: {}", text))
                    })?;
                    if !n.is_finite() {
                        return Err(FormulaFormatError::new(format!(
                            "Number out of range: {}",
                            text
                        )));
                    }
                    Token::Number(n)
                }
                Lexeme::Variable(text) => Token::Variable(
                    CellName::new(text)
                        .map_err(|_| FormulaFormatError::new(format!("Invalid token: {}", text)))?,
                ),
                Lexeme::LParen => Token::LParen,
                Lexeme::RParen => Token::RParen,
                Lexeme::Op(op) => Token::Op(op),
            };

            expect = match (&token, expect) {
                (Token::Number(_) | Token::Variable(_), Expect::Operand) => Expect::Operator,
                (Token::LParen, Expect::Operand) => {
                    depth += 1;
                    Expect::Operand
                }
                (Token::RParen, Expect::Operand) if prev == Some(Lexeme::LParen) => {
                    return Err(FormulaFormatError::new("Empty parentheses are not allowed"));
                }
                (Token::RParen, Expect::Operator) => {
                    depth = depth.checked_sub(1).ok_or_else(|| {
                        FormulaFormatError::new("Mismatched parentheses: unexpected ')'")
                    })?;
                    Expect::Operator
                }
                (Token::Op(_), Expect::Operator) => Expect::Operand,
                (_, Expect::Operand) => {
                    return Err(match prev {
                        None => FormulaFormatError::new(format!(
                            "The formula cannot start with '{}'",
                            lexeme.text()
                        )),
                        Some(p) => FormulaFormatError::new(format!(
                            "Unexpected '{}' after '{}'",
                            lexeme.text(),
                            p.text()
                        )),
                    });
                }
                (_, Expect::Operator) => {
                    return Err(FormulaFormatError::new(format!(
                        "Unexpected '{}' after '{}': expected an operator or ')'",
                        lexeme.text(),
                        prev.map(|p| p.text()).unwrap_or_default()
                    )));
                }
            };

            token.write_canonical(&mut canonical);
            tokens.push(token);
            prev = Some(*lexeme);
        }

        if depth != 0 {
            return Err(FormulaFormatError::new("Unbalanced parentheses: missing ')'"));
        }
        if expect == Expect::Operand {
            let last = prev.map(|p| p.text()).unwrap_or_default();
            return Err(FormulaFormatError::new(format!(
                "The formula cannot end with '{}'",
                last
            )));
        }

        Ok(Expression { tokens, canonical })
    }

    /// Distinct variables referenced by the expression, upper-cased.
    pub fn variables(&self) -> HashSet<CellName> {
        self.tokens
            .iter()
            .filter_map(|token| match token {
                Token::Variable(name) => Some(name.clone()),
                _ => None,
            })
            .collect()
    }

    /// Canonical text: no whitespace, upper-cased variables, normalized numbers.
    pub fn as_str(&self) -> &str {
        &self.canonical
    }

    /// Evaluate with `lookup` resolving variables.
    ///
    /// `lookup` receives upper-cased names and returns `None` for anything it
    /// cannot supply. Evaluation never fails structurally: undefined variables
    /// and division by zero come back as a [`FormulaError`].
    pub fn evaluate<F>(&self, lookup: F) -> Result<f64, FormulaError>
    where
        F: FnMut(&str) -> Option<f64>,
    {
        evaluate(&self.tokens, lookup)
    }
}

impl std::str::FromStr for Expression {
    type Err = FormulaFormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Expression::new(s)
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical)
    }
}

impl PartialEq for Expression {
    fn eq(&self, other: &Self) -> bool {
        self.canonical == other.canonical
    }
}

impl Eq for Expression {}

impl Hash for Expression {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.canonical.hash(state);
    }
}

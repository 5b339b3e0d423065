//! Expression evaluation.
//!
//! A left-to-right scan over canonical tokens with an operator stack and a
//! value stack. `*` and `/` are applied as soon as their right operand is
//! known; `+` and `-` wait until the next `+`/`-`, a `)` or the end of the
//! expression. With only two precedence tiers this gives the usual
//! left-associative results.

use thiserror::Error;

use super::expression::Token;
use super::token::Operator;

/// A formula that could not produce a number.
///
/// This is a value, not a failure of the sheet: it is stored as the cell's
/// value and shown to the user.
#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub enum FormulaError {
    #[error("Division by zero")]
    DivisionByZero,

    #[error("Undefined variable: {0}")]
    UndefinedVariable(String),

    #[error("Numeric overflow")]
    Overflow,
}

impl FormulaError {
    /// Human-readable reason.
    pub fn reason(&self) -> String {
        self.to_string()
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Pending {
    Op(Operator),
    LParen,
}

#[derive(Default)]
struct Stacks {
    ops: Vec<Pending>,
    values: Vec<f64>,
}

impl Stacks {
    fn top_is(&self, pred: impl Fn(Operator) -> bool) -> bool {
        matches!(self.ops.last(), Some(Pending::Op(op)) if pred(*op))
    }

    fn pop_value(&mut self) -> f64 {
        self.values
            .pop()
            .expect("validated expression always has an operand on the stack")
    }

    /// Push an operand, folding it into a pending `*` or `/`.
    fn push_operand(&mut self, value: f64) -> Result<(), FormulaError> {
        if self.top_is(Operator::is_multiplicative) {
            let left = self.pop_value();
            let op = self.pop_op();
            self.values.push(apply(op, left, value)?);
        } else {
            self.values.push(value);
        }
        Ok(())
    }

    fn pop_op(&mut self) -> Operator {
        match self.ops.pop() {
            Some(Pending::Op(op)) => op,
            _ => unreachable!("caller checked the operator stack top"),
        }
    }

    /// Apply the operator on top of the stack to the two topmost values.
    fn reduce(&mut self) -> Result<(), FormulaError> {
        let right = self.pop_value();
        let left = self.pop_value();
        let op = self.pop_op();
        self.values.push(apply(op, left, right)?);
        Ok(())
    }

    fn reduce_additive(&mut self) -> Result<(), FormulaError> {
        if self.top_is(|op| !op.is_multiplicative()) {
            self.reduce()?;
        }
        Ok(())
    }
}

/// Apply one operator. Results that leave the finite range are an error.
fn apply(op: Operator, left: f64, right: f64) -> Result<f64, FormulaError> {
    let result = match op {
        Operator::Add => left + right,
        Operator::Sub => left - right,
        Operator::Mul => left * right,
        Operator::Div => {
            if right == 0.0 {
                return Err(FormulaError::DivisionByZero);
            }
            left / right
        }
    };
    if !result.is_finite() {
        return Err(FormulaError::Overflow);
    }
    Ok(result)
}

pub(crate) fn evaluate<F>(tokens: &[Token], mut lookup: F) -> Result<f64, FormulaError>
where
    F: FnMut(&str) -> Option<f64>,
{
    let mut stacks = Stacks::default();

    for token in tokens {
        match token {
            Token::Number(n) => stacks.push_operand(*n)?,
            Token::Variable(name) => {
                let value = lookup(name.as_str())
                    .ok_or_else(|| FormulaError::UndefinedVariable(name.to_string()))?;
                stacks.push_operand(value)?;
            }
            Token::Op(op) if op.is_multiplicative() => stacks.ops.push(Pending::Op(*op)),
            Token::Op(op) => {
                stacks.reduce_additive()?;
                stacks.ops.push(Pending::Op(*op));
            }
            Token::LParen => stacks.ops.push(Pending::LParen),
            Token::RParen => {
                stacks.reduce_additive()?;
                let open = stacks.ops.pop();
                debug_assert!(open == Some(Pending::LParen));
                if stacks.top_is(Operator::is_multiplicative) {
                    stacks.reduce()?;
                }
            }
        }
    }

    stacks.reduce_additive()?;
    Ok(stacks.pop_value())
}

use crate::error::DomainError;

use super::{Expr, Function, Operator, UnaryOp};

/// Rejects values that have left the real numbers.
fn real(value: f64) -> Result<f64, DomainError> {
    if value.is_nan() {
        Err(DomainError::NotANumber)
    } else if value.is_infinite() {
        Err(DomainError::Overflow)
    } else {
        Ok(value)
    }
}

impl Operator {
    /// Applies the binary operator, rejecting division by zero and results
    /// that are not finite real numbers.
    pub fn apply(self, l: f64, r: f64) -> Result<f64, DomainError> {
        let value = match self {
            Operator::Add => l + r,
            Operator::Sub => l - r,
            Operator::Mul => l * r,
            Operator::Div if r == 0.0 => return Err(DomainError::DivisionByZero),
            Operator::Div => l / r,
            Operator::Pow => l.powf(r),
        };
        real(value)
    }
}

impl UnaryOp {
    /// Sign changes cannot leave the reals, so this never fails
    pub fn apply(self, v: f64) -> f64 {
        match self {
            UnaryOp::Neg => -v,
            UnaryOp::Plus => v,
        }
    }
}

impl Function {
    /// Applies the function to exactly `arity()` arguments
    pub fn apply(self, args: &[f64]) -> Result<f64, DomainError> {
        let x = match args {
            [x] => *x,
            _ => return Err(DomainError::Arity(self, self.arity(), args.len())),
        };

        let value = match self {
            Function::Sin => x.to_radians().sin(),
            Function::Cos => x.to_radians().cos(),
            Function::Tan => x.to_radians().tan(),
            Function::Log if x <= 0.0 => return Err(DomainError::NonPositiveLog(x)),
            Function::Log => x.log10(),
            Function::Sqrt if x < 0.0 => return Err(DomainError::NegativeSqrt(x)),
            Function::Sqrt => x.sqrt(),
            Function::Exp => x.exp(),
            Function::Abs => x.abs(),
        };
        real(value)
    }
}

pub fn evaluate(expr: &Expr) -> Result<f64, DomainError> {
    match expr {
        Expr::Literal(v) => real(*v),
        Expr::Constant(c) => Ok(c.value()),
        Expr::UnaryOp(op, operand) => Ok(op.apply(evaluate(operand)?)),
        Expr::BinaryOp(op, l, r) => op.apply(evaluate(l)?, evaluate(r)?),
        Expr::Call(function, args) => {
            let values = args
                .iter()
                .map(evaluate)
                .collect::<Result<Vec<_>, _>>()?;
            function.apply(&values)
        }
    }
}

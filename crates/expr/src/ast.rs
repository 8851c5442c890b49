use std::fmt;

use crate::Function;

/// A node in a parsed formula.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// A numeric literal.
    Number(f64),

    /// The free variable `x`.
    Variable,

    /// A prefix `+` or `-`.
    Unary { op: UnaryOp, operand: Box<Expr> },

    /// An infix arithmetic operation.
    Binary {
        op: BinaryOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },

    /// A call to a whitelisted function.
    Call { function: Function, args: Vec<Expr> },
}

/// Prefix operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Plus,
    Neg,
}

/// Infix operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
}

impl BinaryOp {
    fn symbol(self) -> &'static str {
        match self {
            Self::Add => " + ",
            Self::Sub => " - ",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Pow => "^",
        }
    }

    fn precedence(self) -> u8 {
        match self {
            Self::Add | Self::Sub => 1,
            Self::Mul | Self::Div => 2,
            Self::Pow => 4,
        }
    }
}

const UNARY_PRECEDENCE: u8 = 3;
const ATOM_PRECEDENCE: u8 = 5;

impl Expr {
    /// Returns true if the variable appears anywhere in this expression.
    #[must_use]
    pub fn contains_variable(&self) -> bool {
        match self {
            Expr::Number(_) => false,
            Expr::Variable => true,
            Expr::Unary { operand, .. } => operand.contains_variable(),
            Expr::Binary { lhs, rhs, .. } => lhs.contains_variable() || rhs.contains_variable(),
            Expr::Call { args, .. } => args.iter().any(Expr::contains_variable),
        }
    }

    fn precedence(&self) -> u8 {
        match self {
            Expr::Number(_) | Expr::Variable | Expr::Call { .. } => ATOM_PRECEDENCE,
            Expr::Unary { .. } => UNARY_PRECEDENCE,
            Expr::Binary { op, .. } => op.precedence(),
        }
    }

    fn fmt_child(&self, f: &mut fmt::Formatter<'_>, parens: bool) -> fmt::Result {
        if parens {
            write!(f, "({self})")
        } else {
            write!(f, "{self}")
        }
    }
}

/// Formats the expression as source text that parses back to the same tree.
impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Number(value) => write!(f, "{value}"),
            Expr::Variable => f.write_str(crate::VARIABLE),
            Expr::Unary { op, operand } => {
                f.write_str(match op {
                    UnaryOp::Plus => "+",
                    UnaryOp::Neg => "-",
                })?;
                operand.fmt_child(f, operand.precedence() < UNARY_PRECEDENCE)
            }
            Expr::Binary { op, lhs, rhs } => {
                let prec = op.precedence();
                // Power groups to the right, everything else to the left.
                let (lhs_parens, rhs_parens) = if *op == BinaryOp::Pow {
                    (lhs.precedence() <= prec, rhs.precedence() < UNARY_PRECEDENCE)
                } else {
                    (lhs.precedence() < prec, rhs.precedence() <= prec)
                };
                lhs.fmt_child(f, lhs_parens)?;
                f.write_str(op.symbol())?;
                rhs.fmt_child(f, rhs_parens)
            }
            Expr::Call { function, args } => {
                write!(f, "{}(", function.name())?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{arg}")?;
                }
                f.write_str(")")
            }
        }
    }
}

//! Formula Abstract Syntax Tree types
//!
//! Formulas are assembled from references and operators, then serialized to
//! text with [`std::fmt::Display`]. Parentheses are inserted only where
//! operator precedence requires them.

use sigsheet_core::{quote_sheet_name, CellAddress};
use std::fmt;
use std::ops::{Add, Mul, Sub};

/// Formula expression AST
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormulaExpr {
    // === Literals ===
    /// Integer literal
    Number(i64),

    // === References ===
    /// Single cell reference
    CellRef(CellReference),
    /// Range reference
    RangeRef(RangeReference),

    // === Operators ===
    /// Binary operation
    BinaryOp {
        op: BinaryOperator,
        left: Box<FormulaExpr>,
        right: Box<FormulaExpr>,
    },

    // === Function call ===
    Function { name: String, args: Vec<FormulaExpr> },
}

/// Cell reference with optional sheet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellReference {
    pub sheet: Option<String>,
    pub address: CellAddress,
}

/// Range reference with optional sheet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeReference {
    pub sheet: Option<String>,
    pub start: CellAddress,
    pub end: CellAddress,
}

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    Add,
    Subtract,
    Multiply,
}

impl BinaryOperator {
    fn symbol(self) -> char {
        match self {
            BinaryOperator::Add => '+',
            BinaryOperator::Subtract => '-',
            BinaryOperator::Multiply => '*',
        }
    }

    fn precedence(self) -> u8 {
        match self {
            BinaryOperator::Add | BinaryOperator::Subtract => 1,
            BinaryOperator::Multiply => 2,
        }
    }
}

impl FormulaExpr {
    /// Reference to a single cell, sheet-qualified when `sheet` is given
    pub fn cell(sheet: Option<&str>, address: CellAddress) -> Self {
        FormulaExpr::CellRef(CellReference {
            sheet: sheet.map(str::to_string),
            address,
        })
    }

    /// Reference to a block of cells
    pub fn range(sheet: Option<&str>, start: CellAddress, end: CellAddress) -> Self {
        FormulaExpr::RangeRef(RangeReference {
            sheet: sheet.map(str::to_string),
            start,
            end,
        })
    }

    /// `SUM(...)` over the given arguments
    pub fn sum(args: Vec<FormulaExpr>) -> Self {
        FormulaExpr::Function {
            name: "SUM".into(),
            args,
        }
    }

    fn binary(op: BinaryOperator, left: FormulaExpr, right: FormulaExpr) -> Self {
        FormulaExpr::BinaryOp {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    fn precedence(&self) -> u8 {
        match self {
            FormulaExpr::BinaryOp { op, .. } => op.precedence(),
            _ => u8::MAX,
        }
    }

    /// Write `child` as an operand of `parent`, adding parentheses if needed
    fn fmt_operand(
        f: &mut fmt::Formatter<'_>,
        child: &FormulaExpr,
        parent: BinaryOperator,
        right_side: bool,
    ) -> fmt::Result {
        let needs_parens = child.precedence() < parent.precedence()
            || (right_side
                && parent == BinaryOperator::Subtract
                && child.precedence() == parent.precedence());
        if needs_parens {
            write!(f, "({})", child)
        } else {
            write!(f, "{}", child)
        }
    }
}

impl From<i64> for FormulaExpr {
    fn from(n: i64) -> Self {
        FormulaExpr::Number(n)
    }
}

impl Add for FormulaExpr {
    type Output = FormulaExpr;

    fn add(self, rhs: FormulaExpr) -> FormulaExpr {
        FormulaExpr::binary(BinaryOperator::Add, self, rhs)
    }
}

impl Sub for FormulaExpr {
    type Output = FormulaExpr;

    fn sub(self, rhs: FormulaExpr) -> FormulaExpr {
        FormulaExpr::binary(BinaryOperator::Subtract, self, rhs)
    }
}

impl Mul for FormulaExpr {
    type Output = FormulaExpr;

    fn mul(self, rhs: FormulaExpr) -> FormulaExpr {
        FormulaExpr::binary(BinaryOperator::Multiply, self, rhs)
    }
}

fn write_sheet(f: &mut fmt::Formatter<'_>, sheet: &Option<String>) -> fmt::Result {
    match sheet {
        Some(name) => write!(f, "{}!", quote_sheet_name(name)),
        None => Ok(()),
    }
}

impl fmt::Display for FormulaExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormulaExpr::Number(n) => write!(f, "{}", n),
            FormulaExpr::CellRef(r) => {
                write_sheet(f, &r.sheet)?;
                write!(f, "{}", r.address)
            }
            FormulaExpr::RangeRef(r) => {
                write_sheet(f, &r.sheet)?;
                write!(f, "{}:{}", r.start, r.end)
            }
            FormulaExpr::BinaryOp { op, left, right } => {
                Self::fmt_operand(f, left, *op, false)?;
                write!(f, "{}", op.symbol())?;
                Self::fmt_operand(f, right, *op, true)
            }
            FormulaExpr::Function { name, args } => {
                write!(f, "{}(", name)?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, "{}", arg)?;
                }
                write!(f, ")")
            }
        }
    }
}

//! Caller-contract checks.
//!
//! [`crate::compile`] renders whatever it is given. This pass is the opt-in
//! fail-fast side: it walks the program with the same slot numbering as the
//! renderer and reports the first reference that would render to a name the
//! target does not declare.
use std::collections::HashSet;
use std::fmt;
use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

use crate::ir::{Block, Expr, Op, Program, Stmt, Type};
use crate::naming::{self, Frame};

/// Swizzles in any one component set, or a structure member name.
static ACCESSOR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:[xyzw]{1,4}|[rgba]{1,4}|[stpq]{1,4}|M[0-9]+)$").expect("valid accessor regex")
});

/// Where in the program a problem was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Location {
    Globals,
    Func(usize),
    Vertex,
    Fragment,
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::Globals => f.write_str("global declarations"),
            Location::Func(index) => write!(f, "function {}", naming::func_name(*index)),
            Location::Vertex => f.write_str("vertex entry point"),
            Location::Fragment => f.write_str("fragment entry point"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("{at}: local slot {slot} is out of range ({in_scope} slot(s) in scope)")]
    LocalOutOfRange { at: Location, slot: usize, in_scope: usize },

    #[error("{at}: uniform {index} is out of range ({count} declared)")]
    UniformOutOfRange { at: Location, index: usize, count: usize },

    #[error("{at}: call to undeclared function index {index}")]
    UnknownFunction { at: Location, index: usize },

    #[error("function index {index} is declared more than once")]
    DuplicateFunction { index: usize },

    #[error("{at}: '{accessor}' is not a swizzle or member name")]
    BadAccessor { at: Location, accessor: String },

    #[error("{at}: float literal {value} has no finite representation")]
    NonFiniteFloat { at: Location, value: f32 },

    #[error("{at}: array of length 0")]
    ZeroLengthArray { at: Location },

    #[error("{at}: structure with no members")]
    EmptyStruct { at: Location },

    #[error("{at}: loop condition uses '{op}', which is not a comparison")]
    NonComparisonLoop { at: Location, op: Op },
}

pub type Result<T> = std::result::Result<T, ValidationError>;

/// Check that every reference in `program` resolves and every type is
/// declarable. Stops at the first problem.
pub fn validate(program: &Program) -> Result<()> {
    let globals = program.uniforms.iter()
        .chain(&program.attributes)
        .chain(&program.varyings);
    for t in globals {
        check_type(t, Location::Globals)?;
    }

    let mut seen = HashSet::new();
    for f in &program.funcs {
        if !seen.insert(f.index) {
            return Err(ValidationError::DuplicateFunction { index: f.index });
        }
    }

    let checker = Checker { program, funcs: seen };
    for f in &program.funcs {
        let at = Location::Func(f.index);
        let params = f.in_params.iter()
            .chain(&f.in_out_params)
            .chain(&f.out_params)
            .chain(&f.return_type);
        for t in params {
            check_type(t, at)?;
        }
        let frame = Frame::for_func(f);
        checker.block(&f.block, at, frame.first_local())?;
    }
    checker.block(&program.vertex_func.block, Location::Vertex, Frame::vertex(program).first_local())?;
    checker.block(&program.fragment_func.block, Location::Fragment, Frame::fragment(program).first_local())?;
    log::debug!("validate: ok ({} function(s))", program.funcs.len());
    Ok(())
}

fn check_type(t: &Type, at: Location) -> Result<()> {
    match t {
        Type::Array { len: 0, .. } => Err(ValidationError::ZeroLengthArray { at }),
        Type::Array { elem, .. } => check_type(elem, at),
        Type::Struct(members) if members.is_empty() => Err(ValidationError::EmptyStruct { at }),
        Type::Struct(members) => members.iter().try_for_each(|m| check_type(m, at)),
        _ => Ok(()),
    }
}

struct Checker<'a> {
    program: &'a Program,
    funcs: HashSet<usize>,
}

impl Checker<'_> {
    /// `next` mirrors the renderer's slot counter: it is also the number of
    /// slots visible at this point.
    fn block(&self, block: &Block, at: Location, mut next: usize) -> Result<()> {
        for t in &block.local_vars {
            check_type(t, at)?;
            next += 1;
        }
        for s in &block.stmts {
            match s {
                Stmt::Expr(e) => self.expr(e, at, next)?,
                Stmt::Assign { lhs, rhs } => {
                    self.expr(lhs, at, next)?;
                    self.expr(rhs, at, next)?;
                }
                Stmt::Block(b) => self.block(b, at, next)?,
                Stmt::If { cond, then, otherwise } => {
                    self.expr(cond, at, next)?;
                    self.block(then, at, next)?;
                    self.block(otherwise, at, next)?;
                }
                Stmt::For { op, body, .. } => {
                    if !op.is_comparison() {
                        return Err(ValidationError::NonComparisonLoop { at, op: *op });
                    }
                    next += 1;
                    self.block(body, at, next)?;
                }
                Stmt::Return(e) => {
                    if let Some(e) = e {
                        self.expr(e, at, next)?;
                    }
                }
                Stmt::Continue | Stmt::Break | Stmt::Discard => {}
            }
        }
        Ok(())
    }

    fn expr(&self, e: &Expr, at: Location, in_scope: usize) -> Result<()> {
        match e {
            Expr::Float(v) if !v.is_finite() => Err(ValidationError::NonFiniteFloat { at, value: *v }),
            Expr::Float(_) | Expr::Int(_) | Expr::Bool(_) | Expr::BuiltinFunc(_) => Ok(()),
            Expr::UniformVariable(index) => {
                let count = self.program.uniforms.len();
                if *index < count {
                    Ok(())
                } else {
                    Err(ValidationError::UniformOutOfRange { at, index: *index, count })
                }
            }
            Expr::LocalVariable(slot) => {
                if *slot < in_scope {
                    Ok(())
                } else {
                    Err(ValidationError::LocalOutOfRange { at, slot: *slot, in_scope })
                }
            }
            Expr::Function(index) => {
                if self.funcs.contains(index) {
                    Ok(())
                } else {
                    Err(ValidationError::UnknownFunction { at, index: *index })
                }
            }
            Expr::Swizzling(s) => {
                if ACCESSOR.is_match(s) {
                    Ok(())
                } else {
                    Err(ValidationError::BadAccessor { at, accessor: s.clone() })
                }
            }
            Expr::Unary { expr, .. } => self.expr(expr, at, in_scope),
            Expr::Binary { lhs, rhs, .. } => {
                self.expr(lhs, at, in_scope)?;
                self.expr(rhs, at, in_scope)
            }
            Expr::Selection { cond, then, otherwise } => {
                self.expr(cond, at, in_scope)?;
                self.expr(then, at, in_scope)?;
                self.expr(otherwise, at, in_scope)
            }
            Expr::Call { callee, args } => {
                self.expr(callee, at, in_scope)?;
                args.iter().try_for_each(|a| self.expr(a, at, in_scope))
            }
            Expr::FieldSelector { base, field } => {
                self.expr(base, at, in_scope)?;
                self.expr(field, at, in_scope)
            }
            Expr::Index { base, index } => {
                self.expr(base, at, in_scope)?;
                self.expr(index, at, in_scope)
            }
        }
    }
}

// ------------------------------- Tests ------------------------------------ //

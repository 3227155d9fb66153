use serde::{Deserialize, Serialize};
use super::{Expr, Op, Type};

/// Locals declared at the head of a scope, followed by its statements.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Block {
    #[serde(default)]
    pub local_vars: Vec<Type>,
    #[serde(default)]
    pub stmts: Vec<Stmt>,
}

impl Block {
    pub fn new(local_vars: Vec<Type>, stmts: Vec<Stmt>) -> Self {
        Self { local_vars, stmts }
    }
    pub fn is_empty(&self) -> bool {
        self.local_vars.is_empty() && self.stmts.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Stmt {
    Expr(Expr),
    Assign {
        lhs: Expr,
        rhs: Expr,
    },
    Block(Block),
    /// An empty `otherwise` block renders no else branch.
    If {
        cond: Expr,
        then: Block,
        #[serde(default)]
        otherwise: Block,
    },
    /// `for (int i = init; i <op> end; i += delta)`; the induction variable
    /// takes the next free local slot.
    For {
        init: i32,
        end: i32,
        op: Op,
        delta: i32,
        body: Block,
    },
    Return(Option<Expr>),
    Continue,
    Break,
    Discard,
}

impl Stmt {
    pub fn assign(lhs: Expr, rhs: Expr) -> Self {
        Stmt::Assign { lhs, rhs }
    }
    pub fn if_else(cond: Expr, then: Block, otherwise: Block) -> Self {
        Stmt::If { cond, then, otherwise }
    }
    pub fn for_loop(init: i32, end: i32, op: Op, delta: i32, body: Block) -> Self {
        Stmt::For { init, end, op, delta, body }
    }
}

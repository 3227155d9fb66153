use std::fmt;
use serde::{Deserialize, Serialize};

/// Expression tree. References to variables and functions are integer keys,
/// resolved at render time by the naming tables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expr {
    Float(f32),
    Int(i32),
    Bool(bool),
    /// Position of the uniform in `Program::uniforms`.
    UniformVariable(usize),
    /// Flattened slot index: parameters first, then block locals.
    LocalVariable(usize),
    BuiltinFunc(BuiltinFunc),
    /// Caller-assigned `Func::index` of the callee.
    Function(usize),
    Swizzling(String),
    Unary {
        op: UnaryOp,
        expr: Box<Expr>,
    },
    Binary {
        op: Op,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    Selection {
        cond: Box<Expr>,
        then: Box<Expr>,
        otherwise: Box<Expr>,
    },
    Call {
        callee: Box<Expr>,
        args: Vec<Expr>,
    },
    FieldSelector {
        base: Box<Expr>,
        field: Box<Expr>,
    },
    Index {
        base: Box<Expr>,
        index: Box<Expr>,
    },
}

impl Expr {
    pub fn local(slot: usize) -> Self {
        Expr::LocalVariable(slot)
    }
    pub fn uniform(index: usize) -> Self {
        Expr::UniformVariable(index)
    }
    pub fn function(index: usize) -> Self {
        Expr::Function(index)
    }
    pub fn swizzle(components: impl Into<String>) -> Self {
        Expr::Swizzling(components.into())
    }
    pub fn unary(op: UnaryOp, expr: Expr) -> Self {
        Expr::Unary { op, expr: Box::new(expr) }
    }
    pub fn binary(op: Op, lhs: Expr, rhs: Expr) -> Self {
        Expr::Binary { op, lhs: Box::new(lhs), rhs: Box::new(rhs) }
    }
    pub fn selection(cond: Expr, then: Expr, otherwise: Expr) -> Self {
        Expr::Selection {
            cond: Box::new(cond),
            then: Box::new(then),
            otherwise: Box::new(otherwise),
        }
    }
    pub fn call(callee: Expr, args: Vec<Expr>) -> Self {
        Expr::Call { callee: Box::new(callee), args }
    }
    pub fn field(base: Expr, field: Expr) -> Self {
        Expr::FieldSelector { base: Box::new(base), field: Box::new(field) }
    }
    pub fn index(base: Expr, index: Expr) -> Self {
        Expr::Index { base: Box::new(base), index: Box::new(index) }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Op {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    LeftShift,
    RightShift,
    LessThan,
    LessThanEqual,
    GreaterThan,
    GreaterThanEqual,
    Equal,
    NotEqual,
    And,
    Xor,
    Or,
    AndAnd,
    OrOr,
}

impl Op {
    pub fn as_str(self) -> &'static str {
        match self {
            Op::Add => "+",
            Op::Sub => "-",
            Op::Mul => "*",
            Op::Div => "/",
            Op::Mod => "%",
            Op::LeftShift => "<<",
            Op::RightShift => ">>",
            Op::LessThan => "<",
            Op::LessThanEqual => "<=",
            Op::GreaterThan => ">",
            Op::GreaterThanEqual => ">=",
            Op::Equal => "==",
            Op::NotEqual => "!=",
            Op::And => "&",
            Op::Xor => "^",
            Op::Or => "|",
            Op::AndAnd => "&&",
            Op::OrOr => "||",
        }
    }

    pub fn is_comparison(self) -> bool {
        matches!(
            self,
            Op::LessThan
                | Op::LessThanEqual
                | Op::GreaterThan
                | Op::GreaterThanEqual
                | Op::Equal
                | Op::NotEqual
        )
    }
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnaryOp {
    Neg,
    Not,
}

impl fmt::Display for UnaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            UnaryOp::Neg => "-",
            UnaryOp::Not => "!",
        })
    }
}

/// Target-provided functions, referenced by tag. Type constructors
/// (`vec4(...)` and friends) are callable builtins too.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BuiltinFunc {
    BoolF,
    IntF,
    FloatF,
    Vec2F,
    Vec3F,
    Vec4F,
    Mat2F,
    Mat3F,
    Mat4F,
    Radians,
    Degrees,
    Sin,
    Cos,
    Tan,
    Asin,
    Acos,
    Atan,
    Atan2,
    Pow,
    Exp,
    Log,
    Exp2,
    Log2,
    Sqrt,
    Inversesqrt,
    Abs,
    Sign,
    Floor,
    Ceil,
    Fract,
    Mod,
    Min,
    Max,
    Clamp,
    Mix,
    Step,
    Smoothstep,
    Length,
    Distance,
    Dot,
    Cross,
    Normalize,
    Faceforward,
    Reflect,
    Transpose,
    Texture2D,
    Dfdx,
    Dfdy,
    Fwidth,
}

impl BuiltinFunc {
    /// GLSL spelling. `Atan2` maps onto the two-argument `atan` overload.
    pub fn name(self) -> &'static str {
        use BuiltinFunc::*;
        match self {
            BoolF => "bool",
            IntF => "int",
            FloatF => "float",
            Vec2F => "vec2",
            Vec3F => "vec3",
            Vec4F => "vec4",
            Mat2F => "mat2",
            Mat3F => "mat3",
            Mat4F => "mat4",
            Radians => "radians",
            Degrees => "degrees",
            Sin => "sin",
            Cos => "cos",
            Tan => "tan",
            Asin => "asin",
            Acos => "acos",
            Atan | Atan2 => "atan",
            Pow => "pow",
            Exp => "exp",
            Log => "log",
            Exp2 => "exp2",
            Log2 => "log2",
            Sqrt => "sqrt",
            Inversesqrt => "inversesqrt",
            Abs => "abs",
            Sign => "sign",
            Floor => "floor",
            Ceil => "ceil",
            Fract => "fract",
            Mod => "mod",
            Min => "min",
            Max => "max",
            Clamp => "clamp",
            Mix => "mix",
            Step => "step",
            Smoothstep => "smoothstep",
            Length => "length",
            Distance => "distance",
            Dot => "dot",
            Cross => "cross",
            Normalize => "normalize",
            Faceforward => "faceforward",
            Reflect => "reflect",
            Transpose => "transpose",
            Texture2D => "texture2D",
            Dfdx => "dFdx",
            Dfdy => "dFdy",
            Fwidth => "fwidth",
        }
    }
}

impl fmt::Display for BuiltinFunc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

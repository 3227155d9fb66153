// Strongly-typed shader IR. Pure data: built by the caller, read by the
// renderer, never mutated during compilation.
pub mod ty;
pub mod expr;
pub mod stmt;

use serde::{Deserialize, Serialize};

pub use ty::Type;
pub use expr::{BuiltinFunc, Expr, Op, UnaryOp};
pub use stmt::{Block, Stmt};

/// A user-declared function.
///
/// Parameters and locals share one slot space: `in_params`, then
/// `in_out_params`, then `out_params`, then the body's locals.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Func {
    /// Caller-assigned key; names the function and is what `Expr::Function`
    /// refers to. Need not match the position in `Program::funcs`.
    pub index: usize,
    #[serde(default)]
    pub in_params: Vec<Type>,
    #[serde(default)]
    pub in_out_params: Vec<Type>,
    #[serde(default)]
    pub out_params: Vec<Type>,
    /// `None` renders as `void`.
    #[serde(default)]
    pub return_type: Option<Type>,
    #[serde(default)]
    pub block: Block,
}

impl Func {
    pub fn param_count(&self) -> usize {
        self.in_params.len() + self.in_out_params.len() + self.out_params.len()
    }
}

/// Vertex entry point. Its slots are implicit: attributes, then varyings,
/// then `gl_Position`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct VertexFunc {
    #[serde(default)]
    pub block: Block,
}

/// Fragment entry point. Its slots are implicit: varyings, then
/// `gl_FragCoord`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FragmentFunc {
    #[serde(default)]
    pub block: Block,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Program {
    #[serde(default)]
    pub uniforms: Vec<Type>,
    #[serde(default)]
    pub attributes: Vec<Type>,
    #[serde(default)]
    pub varyings: Vec<Type>,
    #[serde(default)]
    pub funcs: Vec<Func>,
    #[serde(default)]
    pub vertex_func: VertexFunc,
    #[serde(default)]
    pub fragment_func: FragmentFunc,
}

impl Program {
    /// Every distinct structure in the program, in first-encounter order:
    /// uniforms, attributes, varyings, then each function's parameters,
    /// return type and body, then the two entry points.
    pub fn structs(&self) -> Vec<Type> {
        let mut out = Vec::new();
        let globals = self.uniforms.iter()
            .chain(&self.attributes)
            .chain(&self.varyings);
        for t in globals {
            t.collect_structs(&mut out);
        }
        for f in &self.funcs {
            let params = f.in_params.iter()
                .chain(&f.in_out_params)
                .chain(&f.out_params)
                .chain(&f.return_type);
            for t in params {
                t.collect_structs(&mut out);
            }
            collect_block_structs(&f.block, &mut out);
        }
        collect_block_structs(&self.vertex_func.block, &mut out);
        collect_block_structs(&self.fragment_func.block, &mut out);
        out
    }
}

fn collect_block_structs(block: &Block, out: &mut Vec<Type>) {
    for t in &block.local_vars {
        t.collect_structs(out);
    }
    for s in &block.stmts {
        match s {
            Stmt::Block(b) => collect_block_structs(b, out),
            Stmt::If { then, otherwise, .. } => {
                collect_block_structs(then, out);
                collect_block_structs(otherwise, out);
            }
            Stmt::For { body, .. } => collect_block_structs(body, out),
            Stmt::Expr(_)
            | Stmt::Assign { .. }
            | Stmt::Return(_)
            | Stmt::Continue
            | Stmt::Break
            | Stmt::Discard => {}
        }
    }
}

// ------------------------------- Tests ------------------------------------ //

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn structs_follow_declaration_order() {
        let s0 = Type::Struct(vec![Type::Float]);
        let s1 = Type::Struct(vec![Type::Vec4, Type::Vec4]);
        let s2 = Type::Struct(vec![Type::Int]);
        let p = Program {
            uniforms: vec![s0.clone(), Type::Float],
            varyings: vec![s1.clone()],
            funcs: vec![Func {
                index: 0,
                in_params: vec![s0.clone()],
                block: Block::new(
                    vec![],
                    vec![Stmt::if_else(
                        Expr::Bool(true),
                        Block::new(vec![s2.clone()], vec![]),
                        Block::default(),
                    )],
                ),
                ..Func::default()
            }],
            ..Program::default()
        };
        assert_eq!(p.structs(), vec![s0, s1, s2]);
    }

    #[test]
    fn program_round_trips_through_json() {
        let p = Program {
            uniforms: vec![Type::array(Type::Vec2, 3)],
            funcs: vec![Func {
                index: 2,
                out_params: vec![Type::Float],
                block: Block::new(vec![], vec![Stmt::assign(Expr::local(0), Expr::Float(1.5))]),
                ..Func::default()
            }],
            ..Program::default()
        };
        let text = serde_json::to_string(&p).unwrap();
        let back: Program = serde_json::from_str(&text).unwrap();
        assert_eq!(p, back);
    }

    #[test]
    fn missing_sections_default_to_empty() {
        let p: Program = serde_json::from_value(serde_json::json!({
            "uniforms": ["Float"]
        })).unwrap();
        assert_eq!(p.uniforms, vec![Type::Float]);
        assert!(p.funcs.is_empty());
        assert!(p.vertex_func.block.is_empty());
    }
}

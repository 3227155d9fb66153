//! Shader IR and its GLSL backend.
//!
//! Build a [`Program`] (types, functions, statements, expressions) once and
//! lower it with [`compile`] into a single GLSL source text that serves both
//! the vertex and the fragment stage.
//!
//! ```
//! use shaderir::{Program, Type};
//!
//! let p = Program { uniforms: vec![Type::Float], ..Program::default() };
//! assert_eq!(shaderir::compile(&p), "uniform float U0;\n");
//! ```
pub mod ir;
pub mod naming;
pub mod glsl;
pub mod validate;
pub mod path_de;
pub mod cli;

pub use glsl::compile;
pub use ir::{Block, BuiltinFunc, Expr, FragmentFunc, Func, Op, Program, Stmt, Type, UnaryOp, VertexFunc};
pub use validate::{validate, ValidationError};

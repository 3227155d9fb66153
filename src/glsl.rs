//! GLSL lowering.
//!
//! Turns a [`Program`] into one GLSL source text that serves both stages:
//! shared declarations first, then each entry point wrapped in
//! `#if defined(COMPILING_VERTEX_SHADER)` / `COMPILING_FRAGMENT_SHADER`, so
//! the consumer picks a stage by defining one symbol before compiling.
//!
//! Every binary, ternary and call operand is parenthesized, so the output
//! never depends on the target's precedence rules.
use crate::ir::{Block, Expr, Func, Program, Stmt, Type};
use crate::naming::{self, Frame, Names, Slot};

pub const VERTEX_GUARD: &str = "COMPILING_VERTEX_SHADER";
pub const FRAGMENT_GUARD: &str = "COMPILING_FRAGMENT_SHADER";

/// Lower a program to GLSL. Pure and total: equal programs give
/// byte-identical output, and an empty program gives an empty string.
///
/// Malformed references (slots or uniforms out of range, unknown function
/// indices) still render, using names derived from the raw index; run
/// [`crate::validate::validate`] first to reject them.
pub fn compile(program: &Program) -> String {
    let cg = Codegen::new(program);
    let mut out = String::new();
    cg.emit_program(&mut out);
    out
}

impl Program {
    pub fn glsl(&self) -> String {
        compile(self)
    }
}

/// Read-only lowering context; output is threaded through explicitly.
struct Codegen<'a> {
    program: &'a Program,
    names: Names,
}

impl<'a> Codegen<'a> {
    fn new(program: &'a Program) -> Self {
        Codegen { program, names: Names::new(program) }
    }

    fn emit_program(&self, out: &mut String) {
        let p = self.program;
        log::debug!(
            "glsl: {} uniform(s), {} attribute(s), {} varying(s), {} function(s)",
            p.uniforms.len(),
            p.attributes.len(),
            p.varyings.len(),
            p.funcs.len(),
        );

        for (t, name) in self.names.structs() {
            let Type::Struct(members) = t else { continue };
            line(out, 0, format!("struct {name} {{"));
            for (j, m) in members.iter().enumerate() {
                line(out, 1, format!("{};", self.var_decl(m, &naming::member_name(j))));
            }
            line(out, 0, "};");
        }

        for (i, t) in p.uniforms.iter().enumerate() {
            line(out, 0, format!("uniform {};", self.var_decl(t, &naming::uniform_name(i))));
        }
        for (i, t) in p.attributes.iter().enumerate() {
            line(out, 0, format!("attribute {};", self.var_decl(t, &naming::attribute_name(i))));
        }
        for (i, t) in p.varyings.iter().enumerate() {
            line(out, 0, format!("varying {};", self.var_decl(t, &naming::varying_name(i))));
        }

        for f in &p.funcs {
            self.emit_func(out, f);
        }

        if !p.vertex_func.block.stmts.is_empty() {
            self.emit_entry_point(out, VERTEX_GUARD, &p.vertex_func.block, Frame::vertex(p));
        }
        if !p.fragment_func.block.stmts.is_empty() {
            self.emit_entry_point(out, FRAGMENT_GUARD, &p.fragment_func.block, Frame::fragment(p));
        }
    }

    fn emit_func(&self, out: &mut String, f: &Func) {
        log::trace!("glsl: lowering {}", naming::func_name(f.index));
        let frame = Frame::for_func(f);
        let groups = [
            ("in", &f.in_params),
            ("inout", &f.in_out_params),
            ("out", &f.out_params),
        ];
        let mut params = Vec::with_capacity(f.param_count());
        for (qualifier, types) in groups {
            for t in types {
                let slot = frame.resolve(params.len()).to_string();
                params.push(format!("{qualifier} {}", self.var_decl(t, &slot)));
            }
        }
        let params = if params.is_empty() { "void".to_string() } else { params.join(", ") };
        let ret = match &f.return_type {
            Some(t) => self.type_name(t),
            None => "void".to_string(),
        };

        line(out, 0, format!("{ret} {}({params}) {{", naming::func_name(f.index)));
        self.emit_block(out, &f.block, frame, 1, frame.first_local());
        line(out, 0, "}");
    }

    fn emit_entry_point(&self, out: &mut String, guard: &str, block: &Block, frame: Frame) {
        log::trace!("glsl: lowering entry point {guard}");
        line(out, 0, format!("#if defined({guard})"));
        line(out, 0, "void main(void) {");
        self.emit_block(out, block, frame, 1, frame.first_local());
        line(out, 0, "}");
        line(out, 0, "#endif");
    }

    /// `next` is the first free slot; nested blocks inherit it by value, so
    /// sibling scopes reuse the same numbers.
    fn emit_block(&self, out: &mut String, block: &Block, frame: Frame, depth: usize, mut next: usize) {
        for t in &block.local_vars {
            let name = frame.resolve(next).to_string();
            line(out, depth, format!("{};", self.var_decl(t, &name)));
            next += 1;
        }
        for s in &block.stmts {
            self.emit_stmt(out, s, frame, depth, &mut next);
        }
    }

    fn emit_stmt(&self, out: &mut String, stmt: &Stmt, frame: Frame, depth: usize, next: &mut usize) {
        match stmt {
            Stmt::Expr(e) => {
                line(out, depth, format!("{};", self.expr(e, frame)));
            }
            Stmt::Assign { lhs, rhs } => {
                line(out, depth, format!("{} = {};", self.expr(lhs, frame), self.expr(rhs, frame)));
            }
            Stmt::Block(b) => {
                line(out, depth, "{");
                self.emit_block(out, b, frame, depth + 1, *next);
                line(out, depth, "}");
            }
            Stmt::If { cond, then, otherwise } => {
                line(out, depth, format!("if ({}) {{", self.expr(cond, frame)));
                self.emit_block(out, then, frame, depth + 1, *next);
                // an else of bare declarations has no effect and is dropped
                if !otherwise.stmts.is_empty() {
                    line(out, depth, "} else {");
                    self.emit_block(out, otherwise, frame, depth + 1, *next);
                }
                line(out, depth, "}");
            }
            Stmt::For { init, end, op, delta, body } => {
                // the induction variable stays claimed for the rest of the enclosing block
                let v = frame.resolve(*next);
                *next += 1;
                line(out, depth, format!(
                    "for (int {v} = {init}; {v} {op} {end}; {}) {{",
                    for_step(v, *delta),
                ));
                self.emit_block(out, body, frame, depth + 1, *next);
                line(out, depth, "}");
            }
            Stmt::Return(None) => line(out, depth, "return;"),
            Stmt::Return(Some(e)) => {
                line(out, depth, format!("return {};", self.expr(e, frame)));
            }
            Stmt::Continue => line(out, depth, "continue;"),
            Stmt::Break => line(out, depth, "break;"),
            Stmt::Discard => line(out, depth, "discard;"),
        }
    }

    fn expr(&self, e: &Expr, frame: Frame) -> String {
        match e {
            Expr::Float(v) => format_float(*v),
            Expr::Int(v) => v.to_string(),
            Expr::Bool(v) => v.to_string(),
            Expr::UniformVariable(i) => naming::uniform_name(*i),
            Expr::LocalVariable(slot) => frame.resolve(*slot).to_string(),
            Expr::BuiltinFunc(b) => b.name().to_string(),
            Expr::Function(index) => naming::func_name(*index),
            Expr::Swizzling(s) => s.clone(),
            Expr::Unary { op, expr } => format!("{op}({})", self.expr(expr, frame)),
            Expr::Binary { op, lhs, rhs } => {
                format!("({}) {op} ({})", self.expr(lhs, frame), self.expr(rhs, frame))
            }
            Expr::Selection { cond, then, otherwise } => format!(
                "({}) ? ({}) : ({})",
                self.expr(cond, frame),
                self.expr(then, frame),
                self.expr(otherwise, frame),
            ),
            Expr::Call { callee, args } => {
                let args = args.iter().map(|a| self.expr(a, frame)).collect::<Vec<_>>();
                format!("({})({})", self.expr(callee, frame), args.join(", "))
            }
            Expr::FieldSelector { base, field } => {
                format!("({}).{}", self.expr(base, frame), self.expr(field, frame))
            }
            Expr::Index { base, index } => {
                format!("({})[{}]", self.expr(base, frame), self.expr(index, frame))
            }
        }
    }

    /// Spelling of a type in type position (return types, array elements).
    fn type_name(&self, t: &Type) -> String {
        match t {
            Type::Bool => "bool".into(),
            Type::Int => "int".into(),
            Type::Float => "float".into(),
            Type::Vec2 => "vec2".into(),
            Type::Vec3 => "vec3".into(),
            Type::Vec4 => "vec4".into(),
            Type::Mat2 => "mat2".into(),
            Type::Mat3 => "mat3".into(),
            Type::Mat4 => "mat4".into(),
            Type::Mat2x3 => "mat2x3".into(),
            Type::Mat3x4 => "mat3x4".into(),
            Type::Array { elem, len } => format!("{}[{len}]", self.type_name(elem)),
            Type::Struct(_) => self.names.struct_name(t),
        }
    }

    /// Declarator for a variable: array lengths follow the name.
    fn var_decl(&self, t: &Type, name: &str) -> String {
        let (base, lens) = t.split_array();
        let mut s = format!("{} {name}", self.type_name(base));
        for n in lens {
            s.push_str(&format!("[{n}]"));
        }
        s
    }
}

fn line(out: &mut String, depth: usize, text: impl AsRef<str>) {
    for _ in 0..depth {
        out.push('\t');
    }
    out.push_str(text.as_ref());
    out.push('\n');
}

fn for_step(v: Slot, delta: i32) -> String {
    match delta {
        1 => format!("{v}++"),
        -1 => format!("{v}--"),
        d if d < 0 => format!("{v} -= {}", d.unsigned_abs()),
        d => format!("{v} += {d}"),
    }
}

/// Nine-digit scientific notation with a signed, two-digit minimum exponent,
/// e.g. `1.500000000e+00`. Always carries a decimal point, so the target
/// reads it as a float. Non-finite values have no GLSL literal and come out
/// as Rust spells them.
pub fn format_float(v: f32) -> String {
    let s = format!("{v:.9e}");
    match s.split_once('e') {
        Some((mantissa, exp)) => {
            let (sign, digits) = match exp.strip_prefix('-') {
                Some(d) => ('-', d),
                None => ('+', exp),
            };
            format!("{mantissa}e{sign}{digits:0>2}")
        }
        None => s,
    }
}

// ------------------------------- Tests ------------------------------------ //

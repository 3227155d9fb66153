//! Naming & numbering.
//!
//! Every declared entity gets a short, order-derived identifier:
//!
//! | entity            | name        | key                                  |
//! |-------------------|-------------|--------------------------------------|
//! | uniform           | `U<i>`      | position in `Program::uniforms`      |
//! | attribute         | `A<i>`      | position in `Program::attributes`    |
//! | varying           | `V<i>`      | position in `Program::varyings`      |
//! | structure         | `S<i>`      | first-encounter order                |
//! | structure member  | `M<j>`      | member position                      |
//! | user function     | `F<index>`  | caller-assigned `Func::index`        |
//! | local / parameter | `l<n>`      | flattened slot, see [`Frame`]        |
//!
//! No symbol table is threaded through the tree walk: every reference is an
//! integer resolved against counts known before rendering starts.
use std::fmt;
use indexmap::IndexMap;

use crate::ir::{Func, Program, Type};

pub fn uniform_name(i: usize) -> String {
    format!("U{i}")
}

pub fn attribute_name(i: usize) -> String {
    format!("A{i}")
}

pub fn varying_name(i: usize) -> String {
    format!("V{i}")
}

pub fn func_name(index: usize) -> String {
    format!("F{index}")
}

pub fn member_name(j: usize) -> String {
    format!("M{j}")
}

/// Program-wide name tables, built once per compilation.
#[derive(Debug, Clone, Default)]
pub struct Names {
    /// Distinct structures in first-encounter order; position is the name.
    structs: IndexMap<Type, usize>,
}

impl Names {
    pub fn new(program: &Program) -> Self {
        let mut structs = IndexMap::new();
        for (i, t) in program.structs().into_iter().enumerate() {
            structs.insert(t, i);
        }
        log::trace!("naming: {} distinct structure(s)", structs.len());
        Self { structs }
    }

    /// Structures in declaration order.
    pub fn structs(&self) -> impl Iterator<Item = (&Type, String)> {
        self.structs.iter().map(|(t, i)| (t, format!("S{i}")))
    }

    /// Name of a structure type from the program this table was built for.
    ///
    /// # Panics
    /// If `t` never occurs in that program. The renderer only names types it
    /// reads out of the same program, and `Program::structs` visits them all.
    pub fn struct_name(&self, t: &Type) -> String {
        format!("S{}", self.structs[t])
    }
}

/// What a flattened slot index denotes inside one function body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    /// Parameter or block local, numbered from 0 within the function.
    Local(usize),
    Attribute(usize),
    Varying(usize),
    Position,
    FragCoord,
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Slot::Local(n) => write!(f, "l{n}"),
            Slot::Attribute(i) => write!(f, "A{i}"),
            Slot::Varying(i) => write!(f, "V{i}"),
            Slot::Position => f.write_str("gl_Position"),
            Slot::FragCoord => f.write_str("gl_FragCoord"),
        }
    }
}

/// Slot layout of the function currently being rendered.
///
/// - `Func`: parameters (in, inout, out) then locals, all `l<slot>`.
/// - `Vertex`: attributes, varyings, `gl_Position`, then locals.
/// - `Fragment`: varyings, `gl_FragCoord`, then locals.
///
/// Entry-point locals are renumbered from `l0` after the implicit slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Frame {
    Func { params: usize },
    Vertex { attributes: usize, varyings: usize },
    Fragment { varyings: usize },
}

impl Frame {
    pub fn for_func(f: &Func) -> Self {
        Frame::Func { params: f.param_count() }
    }

    pub fn vertex(program: &Program) -> Self {
        Frame::Vertex {
            attributes: program.attributes.len(),
            varyings: program.varyings.len(),
        }
    }

    pub fn fragment(program: &Program) -> Self {
        Frame::Fragment { varyings: program.varyings.len() }
    }

    /// Slot of the first local declared in the outermost body block.
    pub fn first_local(self) -> usize {
        match self {
            Frame::Func { params } => params,
            Frame::Vertex { .. } | Frame::Fragment { .. } => self.implicit_slots(),
        }
    }

    /// Slots occupied before any renamed local: zero for ordinary functions.
    fn implicit_slots(self) -> usize {
        match self {
            Frame::Func { .. } => 0,
            Frame::Vertex { attributes, varyings } => attributes + varyings + 1,
            Frame::Fragment { varyings } => varyings + 1,
        }
    }

    pub fn resolve(self, slot: usize) -> Slot {
        match self {
            Frame::Func { .. } => Slot::Local(slot),
            Frame::Vertex { attributes, varyings } => {
                if slot < attributes {
                    Slot::Attribute(slot)
                } else if slot < attributes + varyings {
                    Slot::Varying(slot - attributes)
                } else if slot == attributes + varyings {
                    Slot::Position
                } else {
                    Slot::Local(slot - self.implicit_slots())
                }
            }
            Frame::Fragment { varyings } => {
                if slot < varyings {
                    Slot::Varying(slot)
                } else if slot == varyings {
                    Slot::FragCoord
                } else {
                    Slot::Local(slot - self.implicit_slots())
                }
            }
        }
    }
}

// ------------------------------- Tests ------------------------------------ //

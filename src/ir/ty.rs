use serde::{Deserialize, Serialize};

/// Shape of every declared quantity: uniforms, attributes, varyings,
/// parameters and locals.
///
/// Equality is structural, so two `Struct` values with the same member list
/// are the same type and share one declaration in the output.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Type {
    Bool,
    Int,
    Float,
    Vec2,
    Vec3,
    Vec4,
    Mat2,
    Mat3,
    Mat4,
    Mat2x3,
    Mat3x4,
    Array {
        elem: Box<Type>,
        len: usize,
    },
    /// Members are named by position.
    Struct(Vec<Type>),
}

impl Type {
    pub fn array(elem: Type, len: usize) -> Self {
        Type::Array { elem: Box::new(elem), len }
    }

    pub fn is_struct(&self) -> bool {
        matches!(self, Type::Struct(_))
    }

    /// Collect the distinct structures reachable from `self`, members before
    /// the structure that contains them.
    ///
    /// Already-known structures are skipped, so calling this over every type
    /// of a program in order yields each structure exactly once, in
    /// first-encounter order.
    pub fn collect_structs(&self, out: &mut Vec<Type>) {
        match self {
            Type::Array { elem, .. } => elem.collect_structs(out),
            Type::Struct(members) => {
                if out.contains(self) {
                    return;
                }
                for m in members {
                    m.collect_structs(out);
                }
                out.push(self.clone());
            }
            _ => {}
        }
    }

    /// Innermost non-array type and the array lengths wrapped around it,
    /// outermost first.
    pub fn split_array(&self) -> (&Type, Vec<usize>) {
        let mut lens = Vec::new();
        let mut t = self;
        while let Type::Array { elem, len } = t {
            lens.push(*len);
            t = elem;
        }
        (t, lens)
    }
}

// ------------------------------- Tests ------------------------------------ //

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn structural_equality() {
        let a = Type::Struct(vec![Type::Float, Type::Vec2]);
        let b = Type::Struct(vec![Type::Float, Type::Vec2]);
        let c = Type::Struct(vec![Type::Vec2, Type::Float]);
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert!(a.is_struct());
        assert!(!Type::Mat4.is_struct());
    }

    #[test]
    fn nested_structs_come_before_their_container() {
        let inner = Type::Struct(vec![Type::Float]);
        let outer = Type::Struct(vec![inner.clone(), Type::array(inner.clone(), 3)]);
        let mut out = Vec::new();
        outer.collect_structs(&mut out);
        outer.collect_structs(&mut out);
        assert_eq!(out, vec![inner, outer]);
    }

    #[test]
    fn split_array_peels_outermost_first() {
        let t = Type::array(Type::array(Type::Vec3, 2), 4);
        let (base, lens) = t.split_array();
        assert_eq!(base, &Type::Vec3);
        assert_eq!(lens, vec![4, 2]);
    }
}

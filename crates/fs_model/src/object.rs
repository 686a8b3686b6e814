//! The evaluator's output value: a single primitive or a homogeneous array.

use crate::primitive::Primitive;
pub use crate::primitive::PrimitiveKind;
use fs_base::Span;

/// A fully evaluated value: either a lone primitive or an array of
/// primitives that all share the same [`PrimitiveKind`]. Nested arrays are
/// never constructed; the evaluator rejects them before an `Object` exists.
#[derive(Debug, Clone, PartialEq)]
pub enum Object {
    Scalar(Primitive),
    Array {
        kind: PrimitiveKind,
        elements: Vec<Primitive>,
        origin: Span,
    },
}

impl Object {
    pub fn scalar(p: Primitive) -> Self {
        Object::Scalar(p)
    }

    /// Builds an array object, asserting the homogeneity invariant the
    /// evaluator is responsible for upholding before calling this.
    pub fn array(elements: Vec<Primitive>, origin: Span) -> Option<Self> {
        let kind = elements.first()?.kind();
        if elements.iter().any(|e| e.kind() != kind) {
            return None;
        }
        Some(Object::Array { kind, elements, origin })
    }

    pub fn kind(&self) -> PrimitiveKind {
        match self {
            Object::Scalar(p) => p.kind(),
            Object::Array { kind, .. } => *kind,
        }
    }

    pub fn origin(&self) -> Span {
        match self {
            Object::Scalar(p) => p.origin(),
            Object::Array { origin, .. } => *origin,
        }
    }

    pub fn is_array(&self) -> bool {
        matches!(self, Object::Array { .. })
    }

    /// Returns this object's primitives as a slice regardless of whether it
    /// is a scalar (length 1) or an array.
    pub fn as_slice(&self) -> &[Primitive] {
        match self {
            Object::Scalar(p) => std::slice::from_ref(p),
            Object::Array { elements, .. } => elements,
        }
    }

    /// Re-originates this object at a reference site, the way `$name` usage
    /// copies a bound object while moving its "value origin" to the
    /// reference.
    pub fn with_origin(self, new_origin: Span) -> Self {
        match self {
            Object::Scalar(p) => Object::Scalar(p.with_origin(new_origin)),
            Object::Array { kind, elements, .. } => Object::Array { kind, elements, origin: new_origin },
        }
    }
}

/// An object plus the origin of the name that was bound to it, stored in
/// the symbol table's object map.
#[derive(Debug, Clone, PartialEq)]
pub struct NamedObject {
    pub object: Object,
    pub name_origin: Span,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitive::{FsString, Integer};

    #[test]
    fn array_requires_homogeneous_elements() {
        let ok = Object::array(
            vec![
                Primitive::Integer(Integer::new(1, Span::new(0, 1))),
                Primitive::Integer(Integer::new(2, Span::new(2, 3))),
            ],
            Span::new(0, 3),
        );
        assert!(ok.is_some());

        let mixed = Object::array(
            vec![
                Primitive::Integer(Integer::new(1, Span::new(0, 1))),
                Primitive::String(FsString::new("oops", Span::new(2, 6))),
            ],
            Span::new(0, 6),
        );
        assert!(mixed.is_none());
    }

    #[test]
    fn array_of_zero_elements_is_rejected() {
        assert!(Object::array(vec![], Span::new(0, 0)).is_none());
    }

    #[test]
    fn as_slice_treats_scalar_as_single_element() {
        let obj = Object::scalar(Primitive::Integer(Integer::new(7, Span::new(0, 1))));
        assert_eq!(obj.as_slice().len(), 1);
    }
}

//! Factory methods for synthesized nodes.
//!
//! The rewrite injects arguments into existing calls; every node it creates
//! is flagged `SYNTHESIZED` and carries the span of the call site it was
//! created for, so downstream consumers can still map it to a source
//! location without inventing one.

use crate::arena::NodeArena;
use crate::base::{NodeIndex, NodeList};
use crate::node::{
    AccessExprData, LiteralExprData, NodeFlags, PropertyAssignmentData,
};
use dit_common::TextRange;

impl NodeArena {
    fn mark_synthesized(&mut self, index: NodeIndex) {
        if let Some(node) = self.get_mut(index) {
            node.flags |= NodeFlags::SYNTHESIZED.bits();
        }
    }

    pub fn synth_identifier(&mut self, text: &str, range: TextRange) -> NodeIndex {
        let index = self.add_identifier(range.pos, range.end, text);
        self.mark_synthesized(index);
        index
    }

    /// The `undefined` placeholder used to left-pad optional argument slots.
    pub fn synth_undefined(&mut self, range: TextRange) -> NodeIndex {
        self.synth_identifier("undefined", range)
    }

    pub fn synth_string_literal(&mut self, text: impl Into<String>, range: TextRange) -> NodeIndex {
        let index = self.add_string_literal(range.pos, range.end, text);
        self.mark_synthesized(index);
        index
    }

    /// Build `expression.name` with a synthesized name identifier.
    pub fn synth_property_access(
        &mut self,
        expression: NodeIndex,
        name: &str,
        range: TextRange,
    ) -> NodeIndex {
        let name_index = self.synth_identifier(name, range);
        let index = self.add_property_access(
            range.pos,
            range.end,
            AccessExprData {
                expression,
                name: name_index,
            },
        );
        self.mark_synthesized(index);
        index
    }

    /// Build `name: initializer` with a synthesized name identifier.
    pub fn synth_property_assignment(
        &mut self,
        name: &str,
        initializer: NodeIndex,
        range: TextRange,
    ) -> NodeIndex {
        let name_index = self.synth_identifier(name, range);
        let index = self.add_property_assignment(
            range.pos,
            range.end,
            PropertyAssignmentData {
                name: name_index,
                initializer,
            },
        );
        self.mark_synthesized(index);
        index
    }

    pub fn synth_object_literal(&mut self, elements: Vec<NodeIndex>, range: TextRange) -> NodeIndex {
        let index = self.add_object_literal(
            range.pos,
            range.end,
            LiteralExprData {
                elements: NodeList::from_vec(elements),
                multi_line: false,
            },
        );
        self.mark_synthesized(index);
        index
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn synthesized_nodes_carry_flag_and_span() {
        let mut arena = NodeArena::new();
        let range = TextRange::new(17, 59);
        let undef = arena.synth_undefined(range);
        let node = arena.get(undef).unwrap();
        assert!(node.has_flag(NodeFlags::SYNTHESIZED));
        assert_eq!(node.pos, 17);
        assert_eq!(node.end, 59);
        assert_eq!(arena.identifier_text(undef), Some("undefined"));
    }

    #[test]
    fn synth_property_access_builds_both_nodes() {
        let mut arena = NodeArena::new();
        let range = TextRange::new(0, 7);
        let base = arena.synth_identifier("Foo", range);
        let access = arena.synth_property_access(base, "default", range);
        let node = arena.get(access).unwrap();
        assert!(node.has_flag(NodeFlags::SYNTHESIZED));
        let data = arena.get_access_expr(node).unwrap();
        assert_eq!(data.expression, base);
        assert_eq!(arena.identifier_text(data.name), Some("default"));
        assert_eq!(arena.parent(base), access);
    }

    #[test]
    fn synth_object_literal_owns_its_members() {
        let mut arena = NodeArena::new();
        let range = TextRange::new(3, 9);
        let value = arena.synth_string_literal("IFoo", range);
        let prop = arena.synth_property_assignment("identifier", value, range);
        let obj = arena.synth_object_literal(vec![prop], range);
        let data = arena.get_object_literal(arena.get(obj).unwrap()).unwrap();
        assert_eq!(data.elements.len(), 1);
        assert_eq!(arena.parent(prop), obj);
    }
}

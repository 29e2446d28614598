//! Shared readers and fixture pieces for the rewriter integration tests.

#![allow(dead_code)]

use dit_ast::node::{LiteralExprData, PropertyAssignmentData};
use dit_ast::{syntax_kind, NodeIndex, NodeList, Program, ProgramBuilder};

/// Renders an identifier, string, or property access the way it would read
/// in source, for asserting on synthesized references.
pub fn expr_text(program: &Program, expr: NodeIndex) -> String {
    let arena = &program.arena;
    let Some(node) = arena.get(expr) else {
        return "<none>".to_string();
    };
    match node.kind {
        syntax_kind::IDENTIFIER => arena
            .identifier_text(expr)
            .unwrap_or("<identifier>")
            .to_string(),
        syntax_kind::STRING_LITERAL => {
            format!("\"{}\"", arena.string_literal_text(expr).unwrap_or(""))
        }
        syntax_kind::PROPERTY_ACCESS_EXPRESSION => {
            let access = arena.get_access_expr(node).expect("access data");
            format!(
                "{}.{}",
                expr_text(program, access.expression),
                arena.identifier_text(access.name).unwrap_or("<name>")
            )
        }
        _ => "<expr>".to_string(),
    }
}

/// Argument list of a call.
pub fn call_args(program: &Program, call: NodeIndex) -> Vec<NodeIndex> {
    let arena = &program.arena;
    let data = arena
        .get_call_expr(arena.get(call).expect("call node"))
        .expect("call data");
    data.arguments
        .as_ref()
        .map(|list| list.nodes.clone())
        .unwrap_or_default()
}

pub fn type_args_cleared(program: &Program, call: NodeIndex) -> bool {
    let arena = &program.arena;
    arena
        .get_call_expr(arena.get(call).expect("call node"))
        .expect("call data")
        .type_arguments
        .is_none()
}

/// Reads the `{ identifier, implementation }` payload from the last argument
/// of a rewritten call: the interface string and the implementation
/// reference rendered as text.
pub fn payload(program: &Program, call: NodeIndex) -> (String, String) {
    let args = call_args(program, call);
    let last = *args.last().expect("rewritten call has no arguments");
    payload_of(program, last)
}

pub fn payload_of(program: &Program, object: NodeIndex) -> (String, String) {
    let arena = &program.arena;
    let literal = arena
        .get_object_literal(arena.get(object).expect("payload node"))
        .expect("payload is not an object literal");
    let mut identifier = None;
    let mut implementation = None;
    for element in literal.elements.iter() {
        let assignment = arena
            .get_property_assignment(arena.get(element).expect("payload member"))
            .expect("payload member is not a property assignment");
        match arena.identifier_text(assignment.name) {
            Some("identifier") => {
                identifier = arena
                    .string_literal_text(assignment.initializer)
                    .map(str::to_string);
            }
            Some("implementation") => {
                implementation = Some(expr_text(program, assignment.initializer));
            }
            other => panic!("unexpected payload property {other:?}"),
        }
    }
    (
        identifier.expect("payload has no identifier string"),
        implementation.expect("payload has no implementation reference"),
    )
}

pub fn is_undefined(program: &Program, expr: NodeIndex) -> bool {
    program.arena.identifier_text(expr) == Some("undefined")
}

/// `{ identifier: "<interface>", implementation: <local> }` shaped the way
/// the pass injects it, for idempotence fixtures.
pub fn injected_payload(b: &mut ProgramBuilder, interface: &str, local: &str) -> NodeIndex {
    let identifier_name = b.ident("identifier");
    let identifier_value = b.string(interface);
    let implementation_name = b.ident("implementation");
    let implementation_value = b.ident(local);
    let arena = &mut b.program.arena;
    let identifier = arena.add_property_assignment(
        0,
        0,
        PropertyAssignmentData {
            name: identifier_name,
            initializer: identifier_value,
        },
    );
    let implementation = arena.add_property_assignment(
        0,
        0,
        PropertyAssignmentData {
            name: implementation_name,
            initializer: implementation_value,
        },
    );
    arena.add_object_literal(
        0,
        0,
        LiteralExprData {
            elements: NodeList::from_vec(vec![identifier, implementation]),
            multi_line: false,
        },
    )
}

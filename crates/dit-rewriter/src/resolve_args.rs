//! Resolving a registration's two type arguments.
//!
//! The interface side must be a bare name (no generic instantiation) and
//! resolves to the *declared* name of the interface, alias-insensitive. The
//! implementation side resolves to an indexed class declaration, or to a
//! namespace import referenced directly.

use crate::errors::RewriteError;
use dit_ast::{syntax_kind, NodeArena, NodeIndex, Program};
use dit_binder::{
    declared_name, ClassDescriptor, ClassIndex, ModuleBindings, ResolvedType,
};
use dit_common::FileId;

/// A successfully resolved implementation type argument.
#[derive(Debug, Clone)]
pub enum ResolvedImplementation {
    Class(ClassDescriptor),
    /// The type argument names a namespace import directly; the reference
    /// passes the namespace identifier through.
    Namespace { local: String, source: FileId },
}

/// Resolve the interface type argument to its declared name.
pub fn resolve_interface_name(
    program: &Program,
    bindings: &ModuleBindings,
    file: FileId,
    type_arg: NodeIndex,
) -> Result<String, RewriteError> {
    let arena = &program.arena;

    // A generic instantiation is not a bare interface name.
    if let Some(type_ref) = arena.get(type_arg).and_then(|n| arena.get_type_ref(n))
        && type_ref
            .type_arguments
            .as_ref()
            .is_some_and(|args| !args.is_empty())
    {
        return Err(RewriteError::UnresolvableInterfaceType {
            written: written_description(arena, type_arg),
            detail: "a generic instantiation cannot be registered by name".to_string(),
        });
    }

    match bindings.resolve_type(program, file, type_arg) {
        Ok(ResolvedType::Declaration(decl)) => declared_name(arena, decl.node).ok_or_else(|| {
            RewriteError::UnresolvableInterfaceType {
                written: written_description(arena, type_arg),
                detail: "resolved declaration has no name".to_string(),
            }
        }),
        Ok(ResolvedType::NamespaceObject { local, .. }) => {
            Err(RewriteError::UnresolvableInterfaceType {
                written: local,
                detail: "a namespace import is not an interface".to_string(),
            })
        }
        Err(error) => Err(RewriteError::UnresolvableInterfaceType {
            written: written_description(arena, type_arg),
            detail: error.to_string(),
        }),
    }
}

/// Resolve the implementation type argument. Generic instantiations resolve
/// to the bare class; type arguments do not change the runtime value.
pub fn resolve_implementation(
    program: &Program,
    bindings: &ModuleBindings,
    class_index: &ClassIndex,
    file: FileId,
    type_arg: NodeIndex,
) -> Result<ResolvedImplementation, RewriteError> {
    let arena = &program.arena;
    match bindings.resolve_type(program, file, type_arg) {
        Ok(ResolvedType::Declaration(decl)) => match class_index.lookup(decl.node) {
            Some(descriptor) => Ok(ResolvedImplementation::Class(descriptor.clone())),
            None => Err(RewriteError::UnknownImplementationClass {
                written: written_description(arena, type_arg),
                detail: "resolved declaration is not a class".to_string(),
            }),
        },
        Ok(ResolvedType::NamespaceObject { local, source }) => {
            Ok(ResolvedImplementation::Namespace { local, source })
        }
        Err(error) => Err(RewriteError::UnknownImplementationClass {
            written: written_description(arena, type_arg),
            detail: error.to_string(),
        }),
    }
}

/// Describe a type argument for error messages, the way it was written.
fn written_description(arena: &NodeArena, type_arg: NodeIndex) -> String {
    let Some(node) = arena.get(type_arg) else {
        return "<missing>".to_string();
    };
    match node.kind {
        k if k == syntax_kind::TYPE_REFERENCE => {
            let Some(type_ref) = arena.get_type_ref(node) else {
                return "<type>".to_string();
            };
            let name = type_name_text(arena, type_ref.type_name);
            if type_ref
                .type_arguments
                .as_ref()
                .is_some_and(|args| !args.is_empty())
            {
                format!("{name}<...>")
            } else {
                name
            }
        }
        k if k == syntax_kind::UNION_TYPE => "<union type>".to_string(),
        k if k == syntax_kind::INTERSECTION_TYPE => "<intersection type>".to_string(),
        k if k == syntax_kind::TYPE_LITERAL => "<type literal>".to_string(),
        _ => "<type>".to_string(),
    }
}

fn type_name_text(arena: &NodeArena, name_node: NodeIndex) -> String {
    if let Some(text) = arena.identifier_text(name_node) {
        return text.to_string();
    }
    if let Some(qualified) = arena
        .get(name_node)
        .and_then(|n| arena.get_qualified_name(n))
        && let (Some(left), Some(right)) = (
            arena.identifier_text(qualified.left),
            arena.identifier_text(qualified.right),
        )
    {
        return format!("{left}.{right}");
    }
    "<name>".to_string()
}

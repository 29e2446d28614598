//! Finding registration call sites.
//!
//! Matching is open-world: anything that does not positively look like a
//! registration call on a known container is silently left alone. Traversal
//! covers top-level statements, descending into expression statements and
//! variable initializers; registration calls are statement-level in
//! practice.

use dit_ast::{syntax_kind, NodeArena, NodeIndex, Program};
use dit_binder::{ModuleBindings, TypeOrigin};
use dit_common::FileId;
use rustc_hash::FxHashSet;
use smallvec::SmallVec;
use tracing::trace;

/// One candidate registration call.
#[derive(Debug, Clone)]
pub struct CallSite {
    pub file: FileId,
    /// The call expression node; identity of the site.
    pub node: NodeIndex,
    pub receiver: NodeIndex,
    pub method: String,
    pub type_args: SmallVec<[NodeIndex; 2]>,
    pub args: Vec<NodeIndex>,
}

/// The injectable container surface.
///
/// A receiver matches when its declared type's name is in
/// `container_names`; when `module_specifiers` is non-empty, a type imported
/// from elsewhere must additionally come from one of the listed specifiers
/// (locally declared container types always pass).
#[derive(Debug, Clone)]
pub struct RegistrationApi {
    pub container_names: FxHashSet<String>,
    pub module_specifiers: FxHashSet<String>,
}

impl Default for RegistrationApi {
    fn default() -> Self {
        let mut container_names = FxHashSet::default();
        container_names.insert("DIContainer".to_string());
        RegistrationApi {
            container_names,
            module_specifiers: FxHashSet::default(),
        }
    }
}

impl RegistrationApi {
    pub fn new() -> RegistrationApi {
        RegistrationApi::default()
    }

    pub fn with_container(mut self, name: impl Into<String>) -> RegistrationApi {
        self.container_names.insert(name.into());
        self
    }

    pub fn with_module_specifier(mut self, specifier: impl Into<String>) -> RegistrationApi {
        self.module_specifiers.insert(specifier.into());
        self
    }

    pub fn is_container(&self, origin: &TypeOrigin) -> bool {
        if !self.container_names.contains(&origin.name) {
            return false;
        }
        if self.module_specifiers.is_empty() {
            return true;
        }
        match &origin.module_specifier {
            Some(specifier) => self.module_specifiers.contains(specifier),
            None => true,
        }
    }
}

pub struct CallSiteMatcher;

impl CallSiteMatcher {
    /// Scan the program for registration call sites, ordered by file order
    /// then source order.
    pub fn find_call_sites(
        program: &Program,
        bindings: &ModuleBindings,
        api: &RegistrationApi,
    ) -> Vec<CallSite> {
        let arena = &program.arena;
        let mut sites = Vec::new();

        for (file_id, file_node) in program.files() {
            let Some(source) = arena.get(file_node).and_then(|n| arena.get_source_file(n))
            else {
                continue;
            };
            for stmt in source.statements.iter() {
                let Some(node) = arena.get(stmt) else {
                    continue;
                };
                if node.kind == syntax_kind::EXPRESSION_STATEMENT {
                    if let Some(data) = arena.get_expr_statement(node) {
                        Self::match_expression(
                            program, bindings, api, file_id, data.expression, &mut sites,
                        );
                    }
                } else if node.kind == syntax_kind::VARIABLE_STATEMENT {
                    if let Some(var) = arena.get_variable(node) {
                        for decl_idx in var.declarations.iter() {
                            if let Some(decl) = arena
                                .get(decl_idx)
                                .and_then(|n| arena.get_variable_declaration(n))
                            {
                                Self::match_expression(
                                    program,
                                    bindings,
                                    api,
                                    file_id,
                                    decl.initializer,
                                    &mut sites,
                                );
                            }
                        }
                    }
                }
            }
        }

        sites
    }

    fn match_expression(
        program: &Program,
        bindings: &ModuleBindings,
        api: &RegistrationApi,
        file: FileId,
        expr: NodeIndex,
        sites: &mut Vec<CallSite>,
    ) {
        let arena = &program.arena;
        let Some(node) = arena.get(expr) else {
            return;
        };
        if node.kind != syntax_kind::CALL_EXPRESSION {
            return;
        }
        let Some(call) = arena.get_call_expr(node) else {
            return;
        };

        // Callee must be `receiver.method` with an identifier receiver.
        let Some(access_node) = arena.get(call.expression) else {
            return;
        };
        if access_node.kind != syntax_kind::PROPERTY_ACCESS_EXPRESSION {
            return;
        }
        let Some(access) = arena.get_access_expr(access_node) else {
            return;
        };
        if arena.kind(access.expression) != syntax_kind::IDENTIFIER {
            return;
        }
        let (Some(receiver_name), Some(method)) = (
            arena.identifier_text(access.expression),
            arena.identifier_text(access.name),
        ) else {
            return;
        };

        // Only calls that still carry explicit type arguments are eligible.
        let Some(type_args) = call.type_arguments.as_ref().filter(|l| !l.is_empty()) else {
            return;
        };

        // The receiver's declared type must be an injectable container.
        let Some(origin) = bindings.variable_type_origin(program, file, receiver_name) else {
            return;
        };
        if !api.is_container(&origin) {
            return;
        }

        let args: Vec<NodeIndex> = call
            .arguments
            .as_ref()
            .map(|a| a.nodes.clone())
            .unwrap_or_default();

        // A trailing payload from an earlier run means the site is done.
        if let Some(&last) = args.last()
            && is_injected_payload(arena, last)
        {
            trace!(
                file = program.file_name(file),
                method, "skipping already-rewritten call"
            );
            return;
        }

        sites.push(CallSite {
            file,
            node: expr,
            receiver: access.expression,
            method: method.to_string(),
            type_args: type_args.iter().collect(),
            args,
        });
    }
}

/// Structural check for the payload this pass injects: an object literal
/// whose properties are exactly `identifier` and `implementation`.
pub fn is_injected_payload(arena: &NodeArena, node: NodeIndex) -> bool {
    let Some(object) = arena.get(node).and_then(|n| arena.get_object_literal(n)) else {
        return false;
    };
    if object.elements.len() != 2 {
        return false;
    }
    let mut seen_identifier = false;
    let mut seen_implementation = false;
    for element in object.elements.iter() {
        let Some(assignment) = arena
            .get(element)
            .and_then(|n| arena.get_property_assignment(n))
        else {
            return false;
        };
        match arena.identifier_text(assignment.name) {
            Some("identifier") => seen_identifier = true,
            Some("implementation") => seen_implementation = true,
            _ => return false,
        }
    }
    seen_identifier && seen_implementation
}

//! Building binding tables from a program.

use crate::bindings::{ExportTarget, FileBindings, ImportKind, ImportRecord};
use dit_ast::node::ModifierFlags;
use dit_ast::{syntax_kind, NodeArena, NodeIndex, Program};
use dit_common::diagnostics::codes;
use dit_common::{Diagnostic, FileId};
use tracing::debug;

/// Binding tables for every file of a program, plus the diagnostics the
/// walk produced (unresolvable relative specifiers).
#[derive(Debug, Default)]
pub struct ModuleBindings {
    pub(crate) files: Vec<FileBindings>,
    pub diagnostics: Vec<Diagnostic>,
}

impl ModuleBindings {
    /// Walk every file and record declarations, imports, exports, and
    /// re-export edges. The program is not mutated.
    pub fn bind(program: &Program) -> ModuleBindings {
        let mut binder = Binder {
            program,
            files: Vec::with_capacity(program.file_count()),
            diagnostics: Vec::new(),
        };
        for (file_id, file_node) in program.files() {
            binder.bind_file(file_id, file_node);
        }
        ModuleBindings {
            files: binder.files,
            diagnostics: binder.diagnostics,
        }
    }

    pub fn file(&self, id: FileId) -> Option<&FileBindings> {
        self.files.get(id.index())
    }
}

struct Binder<'a> {
    program: &'a Program,
    files: Vec<FileBindings>,
    diagnostics: Vec<Diagnostic>,
}

impl<'a> Binder<'a> {
    fn arena(&self) -> &'a NodeArena {
        &self.program.arena
    }

    fn bind_file(&mut self, file_id: FileId, file_node: NodeIndex) {
        let mut bindings = FileBindings::default();
        let arena = self.arena();

        let statements = arena
            .get(file_node)
            .and_then(|node| arena.get_source_file(node))
            .map(|data| data.statements.clone())
            .unwrap_or_default();

        for stmt in statements.iter() {
            let Some(node) = arena.get(stmt) else {
                continue;
            };
            match node.kind {
                k if k == syntax_kind::IMPORT_DECLARATION => {
                    self.bind_import_declaration(file_id, stmt, &mut bindings);
                }
                k if k == syntax_kind::CLASS_DECLARATION => {
                    self.bind_class_declaration(stmt, &mut bindings);
                }
                k if k == syntax_kind::INTERFACE_DECLARATION => {
                    self.bind_interface_declaration(stmt, &mut bindings);
                }
                k if k == syntax_kind::TYPE_ALIAS_DECLARATION => {
                    self.bind_type_alias_declaration(stmt, &mut bindings);
                }
                k if k == syntax_kind::VARIABLE_STATEMENT => {
                    self.bind_variable_statement(stmt, &mut bindings);
                }
                k if k == syntax_kind::EXPORT_DECLARATION => {
                    self.bind_export_declaration(file_id, stmt, &mut bindings);
                }
                _ => {}
            }
        }

        debug!(
            file = self.program.file_name(file_id),
            imports = bindings.imports.len(),
            exports = bindings.exports.len(),
            "bound file"
        );
        self.files.push(bindings);
    }

    fn bind_import_declaration(
        &mut self,
        file_id: FileId,
        stmt: NodeIndex,
        bindings: &mut FileBindings,
    ) {
        let arena = self.arena();
        let Some(import) = arena.get(stmt).and_then(|n| arena.get_import_decl(n)) else {
            return;
        };

        let Some(specifier) = arena.string_literal_text(import.module_specifier) else {
            return;
        };
        let specifier = specifier.to_string();
        let source = self.resolve_specifier(file_id, import.module_specifier, &specifier);

        let Some(clause) = arena
            .get(import.import_clause)
            .and_then(|n| arena.get_import_clause(n))
        else {
            // Side-effect import; binds nothing.
            return;
        };
        let clause = *clause;

        // Default import: `import X from "mod"` resolves the module's
        // default export regardless of the local binding name.
        if clause.name.is_some()
            && let Some(local) = arena.identifier_text(clause.name)
        {
            push_import(
                bindings,
                ImportRecord {
                    local: local.to_string(),
                    kind: ImportKind::Default,
                    specifier: specifier.clone(),
                    source,
                    is_type_only: clause.is_type_only,
                    decl: clause.name,
                },
            );
        }

        let Some(bindings_node) = arena.get(clause.named_bindings) else {
            return;
        };

        if bindings_node.kind == syntax_kind::NAMESPACE_IMPORT {
            if let Some(named) = arena.get_named_imports(bindings_node)
                && let Some(local) = arena.identifier_text(named.name)
            {
                push_import(
                    bindings,
                    ImportRecord {
                        local: local.to_string(),
                        kind: ImportKind::Namespace,
                        specifier: specifier.clone(),
                        source,
                        is_type_only: clause.is_type_only,
                        decl: clause.named_bindings,
                    },
                );
            }
            return;
        }

        if let Some(named) = arena.get_named_imports(bindings_node) {
            for spec_idx in named.elements.iter() {
                let Some(spec) = arena.get(spec_idx).and_then(|n| arena.get_specifier(n)) else {
                    continue;
                };
                // `property_name` carries the exported name when the local
                // binding is an alias.
                let exported_node = if spec.property_name.is_some() {
                    spec.property_name
                } else {
                    spec.name
                };
                let (Some(exported), Some(local)) = (
                    arena.identifier_text(exported_node),
                    arena.identifier_text(spec.name),
                ) else {
                    continue;
                };
                push_import(
                    bindings,
                    ImportRecord {
                        local: local.to_string(),
                        kind: ImportKind::Named(exported.to_string()),
                        specifier: specifier.clone(),
                        source,
                        is_type_only: clause.is_type_only || spec.is_type_only,
                        decl: spec_idx,
                    },
                );
            }
        }
    }

    fn bind_class_declaration(&mut self, stmt: NodeIndex, bindings: &mut FileBindings) {
        let arena = self.arena();
        let Some(class) = arena.get(stmt).and_then(|n| arena.get_class(n)) else {
            return;
        };
        let Some(name) = arena.identifier_text(class.name) else {
            // Anonymous default-exported classes cannot be referenced by a
            // type argument; nothing to bind.
            return;
        };
        let name = name.to_string();
        bindings.types.insert(name.clone(), stmt);
        bindings.values.insert(name.clone(), stmt);
        self.bind_modifier_exports(stmt, &name, bindings);
    }

    fn bind_interface_declaration(&mut self, stmt: NodeIndex, bindings: &mut FileBindings) {
        let arena = self.arena();
        let Some(interface) = arena.get(stmt).and_then(|n| arena.get_interface(n)) else {
            return;
        };
        let Some(name) = arena.identifier_text(interface.name) else {
            return;
        };
        let name = name.to_string();
        bindings.types.insert(name.clone(), stmt);
        self.bind_modifier_exports(stmt, &name, bindings);
    }

    fn bind_type_alias_declaration(&mut self, stmt: NodeIndex, bindings: &mut FileBindings) {
        let arena = self.arena();
        let Some(alias) = arena.get(stmt).and_then(|n| arena.get_type_alias(n)) else {
            return;
        };
        let Some(name) = arena.identifier_text(alias.name) else {
            return;
        };
        let name = name.to_string();
        bindings.types.insert(name.clone(), stmt);
        self.bind_modifier_exports(stmt, &name, bindings);
    }

    fn bind_variable_statement(&mut self, stmt: NodeIndex, bindings: &mut FileBindings) {
        let arena = self.arena();
        let Some(var) = arena.get(stmt).and_then(|n| arena.get_variable(n)) else {
            return;
        };
        let exported = arena
            .modifier_flags(stmt)
            .contains(ModifierFlags::EXPORT);
        for decl_idx in var.declarations.clone().iter() {
            let Some(decl) = arena.get(decl_idx).and_then(|n| arena.get_variable_declaration(n))
            else {
                continue;
            };
            let Some(name) = arena.identifier_text(decl.name) else {
                continue;
            };
            bindings.values.insert(name.to_string(), decl_idx);
            if exported {
                bindings
                    .exports
                    .insert(name.to_string(), ExportTarget::Decl(decl_idx));
            }
        }
    }

    /// Record export entries implied by `export` / `export default`
    /// modifiers on a declaration.
    fn bind_modifier_exports(&mut self, stmt: NodeIndex, name: &str, bindings: &mut FileBindings) {
        let flags = self.arena().modifier_flags(stmt);
        if !flags.contains(ModifierFlags::EXPORT) {
            return;
        }
        if flags.contains(ModifierFlags::DEFAULT) {
            bindings
                .exports
                .insert("default".to_string(), ExportTarget::Decl(stmt));
        } else {
            bindings
                .exports
                .insert(name.to_string(), ExportTarget::Decl(stmt));
        }
    }

    fn bind_export_declaration(
        &mut self,
        file_id: FileId,
        stmt: NodeIndex,
        bindings: &mut FileBindings,
    ) {
        let arena = self.arena();
        let Some(export) = arena.get(stmt).and_then(|n| arena.get_export_decl(n)) else {
            return;
        };
        let export = *export;

        // `export default <identifier>`
        if export.is_default_export {
            if let Some(local) = arena.identifier_text(export.export_clause) {
                bindings
                    .exports
                    .insert("default".to_string(), ExportTarget::Local(local.to_string()));
            }
            return;
        }

        if export.module_specifier.is_some() {
            let Some(specifier) = arena.string_literal_text(export.module_specifier) else {
                return;
            };
            let specifier = specifier.to_string();
            let source = self.resolve_specifier(file_id, export.module_specifier, &specifier);

            if export.export_clause.is_none() {
                // `export * from "./mod"` (does not forward the default)
                if source.is_some() {
                    bindings.wildcard_reexports.push(source);
                }
                return;
            }

            let Some(clause_node) = arena.get(export.export_clause) else {
                return;
            };
            if let Some(named) = arena.get_named_imports(clause_node) {
                if named.name.is_some() {
                    // `export * as ns from "./mod"` is not modeled.
                    debug!(
                        file = self.program.file_name(file_id),
                        "skipping namespace re-export"
                    );
                    return;
                }
                for spec_idx in named.elements.iter() {
                    let Some(spec) = arena.get(spec_idx).and_then(|n| arena.get_specifier(n))
                    else {
                        continue;
                    };
                    // Export specifiers are oriented local-to-exported:
                    // `export { source as exported }`.
                    let source_node = if spec.property_name.is_some() {
                        spec.property_name
                    } else {
                        spec.name
                    };
                    let (Some(source_name), Some(exported)) = (
                        arena.identifier_text(source_node),
                        arena.identifier_text(spec.name),
                    ) else {
                        continue;
                    };
                    bindings.reexports.insert(
                        exported.to_string(),
                        (source, source_name.to_string()),
                    );
                }
            }
            return;
        }

        // `export { a, b as c }` over locals
        if let Some(clause_node) = arena.get(export.export_clause)
            && let Some(named) = arena.get_named_imports(clause_node)
        {
            for spec_idx in named.elements.iter() {
                let Some(spec) = arena.get(spec_idx).and_then(|n| arena.get_specifier(n)) else {
                    continue;
                };
                let local_node = if spec.property_name.is_some() {
                    spec.property_name
                } else {
                    spec.name
                };
                let (Some(local), Some(exported)) = (
                    arena.identifier_text(local_node),
                    arena.identifier_text(spec.name),
                ) else {
                    continue;
                };
                bindings
                    .exports
                    .insert(exported.to_string(), ExportTarget::Local(local.to_string()));
            }
        }
    }

    /// Resolve a module specifier to a program file. Relative specifiers
    /// that fail to resolve get a diagnostic; bare specifiers are external
    /// packages and resolve to `FileId::NONE` silently.
    fn resolve_specifier(&mut self, file_id: FileId, spec_node: NodeIndex, specifier: &str) -> FileId {
        if !is_relative_specifier(specifier) {
            return FileId::NONE;
        }
        let from = self.program.file_name(file_id).to_string();
        if let Some(target) = resolve_relative_specifier(self.program, &from, specifier) {
            return target;
        }
        let (pos, len) = self
            .arena()
            .get(spec_node)
            .map(|n| (n.pos, n.end.saturating_sub(n.pos)))
            .unwrap_or((0, 0));
        self.diagnostics.push(Diagnostic::error(
            from,
            pos,
            len,
            format!("Cannot find module '{specifier}'."),
            codes::CANNOT_FIND_MODULE,
        ));
        FileId::NONE
    }
}

fn push_import(bindings: &mut FileBindings, record: ImportRecord) {
    let index = bindings.imports.len();
    bindings
        .imports_by_local
        .entry(record.local.clone())
        .or_insert(index);
    bindings.imports.push(record);
}

pub(crate) fn is_relative_specifier(specifier: &str) -> bool {
    specifier == "."
        || specifier == ".."
        || specifier.starts_with("./")
        || specifier.starts_with("../")
}

/// Join a relative specifier against the importing file's directory and try
/// the TypeScript resolution candidates: the path itself, `.ts`, and the
/// directory index.
pub(crate) fn resolve_relative_specifier(
    program: &Program,
    from_file: &str,
    specifier: &str,
) -> Option<FileId> {
    let joined = join_relative(from_file, specifier);
    let candidates = [
        joined.clone(),
        format!("{joined}.ts"),
        format!("{joined}/index.ts"),
    ];
    candidates
        .iter()
        .find_map(|candidate| program.file_by_name(candidate))
}

fn join_relative(from_file: &str, specifier: &str) -> String {
    let mut segments: Vec<&str> = Vec::new();
    if let Some(dir_end) = from_file.rfind('/') {
        segments.extend(from_file[..dir_end].split('/').filter(|s| !s.is_empty()));
    }
    for part in specifier.split('/') {
        match part {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }
    segments.join("/")
}

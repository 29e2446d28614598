//! Resolution queries over bound modules: type references to declarations,
//! class declarations to runtime bindings, and receiver variables to the
//! type they were declared with.

use crate::bind::ModuleBindings;
use crate::bindings::{
    DeclarationRef, ExportTarget, ImportBinding, ImportBindingKind, ImportKind, ResolvedType,
    TypeOrigin, TypeResolveError,
};
use crate::class_index::{ClassDescriptor, ExportKind};
use dit_ast::{syntax_kind, NodeIndex, Program};
use dit_common::FileId;
use rustc_hash::FxHashSet;
use tracing::trace;

/// Cap on import-chain hops when tracing a receiver variable back to its
/// declared type. Chains deeper than this are treated as unresolved.
const MAX_IMPORT_HOPS: usize = 8;

impl ModuleBindings {
    /// Resolve a type node to the declaration it names, following import
    /// aliases and re-export chains across files.
    pub fn resolve_type(
        &self,
        program: &Program,
        file: FileId,
        type_node: NodeIndex,
    ) -> Result<ResolvedType, TypeResolveError> {
        let arena = &program.arena;
        let name_node = arena
            .get(type_node)
            .and_then(|n| arena.get_type_ref(n))
            .map(|t| t.type_name)
            .ok_or(TypeResolveError::NotATypeReference)?;
        let Some(name) = arena.get(name_node) else {
            return Err(TypeResolveError::NotATypeReference);
        };

        if name.kind == syntax_kind::IDENTIFIER {
            let Some(text) = arena.identifier_text(name_node) else {
                return Err(TypeResolveError::NotATypeReference);
            };
            return self.resolve_type_name(file, text);
        }

        if name.kind == syntax_kind::QUALIFIED_NAME {
            let Some(qualified) = arena.get_qualified_name(name) else {
                return Err(TypeResolveError::NotATypeReference);
            };
            let (Some(left), Some(member)) = (
                arena.identifier_text(qualified.left),
                arena.identifier_text(qualified.right),
            ) else {
                return Err(TypeResolveError::NotATypeReference);
            };
            return self.resolve_qualified_type(file, left, member);
        }

        Err(TypeResolveError::NotATypeReference)
    }

    /// Resolve a bare identifier used in type position. Local declarations
    /// shadow imports, matching scope order.
    fn resolve_type_name(&self, file: FileId, name: &str) -> Result<ResolvedType, TypeResolveError> {
        let bindings = self
            .file(file)
            .ok_or_else(|| TypeResolveError::UnresolvedName(name.to_string()))?;

        if let Some(&decl) = bindings.types.get(name) {
            return Ok(ResolvedType::Declaration(DeclarationRef { node: decl, file }));
        }

        let Some(record) = bindings.import_by_local(name) else {
            return Err(TypeResolveError::UnresolvedName(name.to_string()));
        };
        // Type-only imports are fine here: interfaces have no runtime
        // footprint, so `import type` is how they usually arrive.
        if record.source.is_none() {
            return Err(TypeResolveError::ExternalModule(name.to_string()));
        }
        match &record.kind {
            ImportKind::Named(exported) => self
                .resolve_export(record.source, exported)
                .map(ResolvedType::Declaration)
                .ok_or_else(|| TypeResolveError::UnresolvedName(name.to_string())),
            ImportKind::Default => self
                .resolve_export(record.source, "default")
                .map(ResolvedType::Declaration)
                .ok_or_else(|| TypeResolveError::UnresolvedName(name.to_string())),
            ImportKind::Namespace => Ok(ResolvedType::NamespaceObject {
                local: record.local.clone(),
                source: record.source,
            }),
        }
    }

    /// Resolve `Ns.Member` in type position. The left side must be a
    /// namespace import; the member resolves on the source module's export
    /// surface.
    fn resolve_qualified_type(
        &self,
        file: FileId,
        left: &str,
        member: &str,
    ) -> Result<ResolvedType, TypeResolveError> {
        let bindings = self
            .file(file)
            .ok_or_else(|| TypeResolveError::UnresolvedName(left.to_string()))?;
        let Some(record) = bindings.import_by_local(left) else {
            return Err(TypeResolveError::NotANamespace(left.to_string()));
        };
        if record.kind != ImportKind::Namespace {
            return Err(TypeResolveError::NotANamespace(left.to_string()));
        }
        if record.source.is_none() {
            return Err(TypeResolveError::ExternalModule(left.to_string()));
        }
        self.resolve_export(record.source, member)
            .map(ResolvedType::Declaration)
            .ok_or_else(|| TypeResolveError::UnresolvedMember {
                namespace: left.to_string(),
                member: member.to_string(),
            })
    }

    /// Resolve a name on a file's export surface to the declaration behind
    /// it, chasing `export { X } from` and `export *` edges.
    pub fn resolve_export(&self, file: FileId, name: &str) -> Option<DeclarationRef> {
        let mut visited = FxHashSet::default();
        self.resolve_export_guarded(file, name, &mut visited)
    }

    fn resolve_export_guarded(
        &self,
        file: FileId,
        name: &str,
        visited: &mut FxHashSet<(FileId, String)>,
    ) -> Option<DeclarationRef> {
        if file.is_none() || !visited.insert((file, name.to_string())) {
            return None;
        }
        let bindings = self.file(file)?;

        if let Some(target) = bindings.exports.get(name) {
            match target {
                ExportTarget::Decl(node) => {
                    return Some(DeclarationRef { node: *node, file });
                }
                ExportTarget::Local(local) => {
                    if let Some(&node) =
                        bindings.types.get(local).or_else(|| bindings.values.get(local))
                    {
                        return Some(DeclarationRef { node, file });
                    }
                    // `export { Foo }` where Foo is itself an import.
                    if let Some(record) = bindings.import_by_local(local) {
                        return match &record.kind {
                            ImportKind::Named(exported) => {
                                self.resolve_export_guarded(record.source, exported, visited)
                            }
                            ImportKind::Default => {
                                self.resolve_export_guarded(record.source, "default", visited)
                            }
                            ImportKind::Namespace => None,
                        };
                    }
                    return None;
                }
            }
        }

        if let Some((source, source_name)) = bindings.reexports.get(name) {
            return self.resolve_export_guarded(*source, source_name, visited);
        }

        // `export *` forwards everything except the default.
        if name != "default" {
            for &source in &bindings.wildcard_reexports {
                if let Some(found) = self.resolve_export_guarded(source, name, visited) {
                    return Some(found);
                }
            }
        }

        None
    }

    /// Find the runtime binding through which a consumer file can reference
    /// a class declared elsewhere. Walks the consumer's imports in
    /// declaration order and returns the first one that reaches the class.
    ///
    /// Returns `None` when no runtime binding exists, including when the
    /// only route is an `import type`.
    pub fn binding_for(
        &self,
        program: &Program,
        consumer: FileId,
        descriptor: &ClassDescriptor,
    ) -> Option<ImportBinding> {
        if descriptor.file == consumer {
            return Some(ImportBinding::same_file(descriptor.name.clone()));
        }
        let bindings = self.file(consumer)?;
        let target = DeclarationRef {
            node: descriptor.declaration,
            file: descriptor.file,
        };

        for record in &bindings.imports {
            if record.is_type_only || record.source.is_none() {
                continue;
            }
            match &record.kind {
                ImportKind::Named(exported) => {
                    if self.resolve_export(record.source, exported) == Some(target) {
                        return Some(ImportBinding {
                            local: record.local.clone(),
                            kind: ImportBindingKind::Named {
                                exported: exported.clone(),
                            },
                            requires_interop_helper: false,
                        });
                    }
                }
                ImportKind::Default => {
                    if self.resolve_export(record.source, "default") == Some(target) {
                        return Some(ImportBinding {
                            local: record.local.clone(),
                            kind: ImportBindingKind::Default,
                            requires_interop_helper: program
                                .options
                                .default_import_needs_interop(),
                        });
                    }
                }
                ImportKind::Namespace => {
                    let member = match &descriptor.export {
                        ExportKind::Named(name) => name.as_str(),
                        ExportKind::Default => "default",
                        ExportKind::None => continue,
                    };
                    if self.resolve_export(record.source, member) == Some(target) {
                        return Some(ImportBinding {
                            local: record.local.clone(),
                            kind: ImportBindingKind::Namespace,
                            requires_interop_helper: false,
                        });
                    }
                }
            }
        }

        trace!(
            class = %descriptor.name,
            consumer = consumer.index(),
            "no runtime binding reaches class"
        );
        None
    }

    /// Determine the declared type of a variable, for deciding whether a
    /// call receiver is a registration container. Follows a type annotation
    /// first, then a `new` initializer, then import chains up to
    /// [`MAX_IMPORT_HOPS`].
    pub fn variable_type_origin(
        &self,
        program: &Program,
        file: FileId,
        local: &str,
    ) -> Option<TypeOrigin> {
        self.variable_type_origin_hops(program, file, local, 0)
    }

    fn variable_type_origin_hops(
        &self,
        program: &Program,
        file: FileId,
        local: &str,
        hops: usize,
    ) -> Option<TypeOrigin> {
        if hops > MAX_IMPORT_HOPS {
            return None;
        }
        let bindings = self.file(file)?;

        if let Some(&decl) = bindings.values.get(local) {
            return self.value_decl_type_origin(program, file, decl, hops);
        }

        let record = bindings.import_by_local(local)?;
        if record.is_type_only {
            return None;
        }
        let exported = match &record.kind {
            ImportKind::Named(exported) => exported.clone(),
            ImportKind::Default => "default".to_string(),
            ImportKind::Namespace => return None,
        };
        // Follow the import to the declaring file when possible; the
        // declared type there is more precise than the specifier alone.
        if record.source.is_some()
            && let Some(found) = self
                .resolve_export(record.source, &exported)
                .and_then(|decl| {
                    self.value_decl_type_origin(program, decl.file, decl.node, hops + 1)
                })
        {
            return Some(found);
        }
        let name = match &record.kind {
            ImportKind::Named(exported) => exported.clone(),
            // A default import's exported name carries no signal; the local
            // binding name is the best available hint.
            _ => record.local.clone(),
        };
        Some(TypeOrigin {
            name,
            module_specifier: Some(record.specifier.clone()),
        })
    }

    fn value_decl_type_origin(
        &self,
        program: &Program,
        file: FileId,
        decl: NodeIndex,
        hops: usize,
    ) -> Option<TypeOrigin> {
        let arena = &program.arena;
        let node = arena.get(decl)?;

        if node.kind == syntax_kind::CLASS_DECLARATION {
            let class = arena.get_class(node)?;
            let name = arena.identifier_text(class.name)?;
            return Some(TypeOrigin {
                name: name.to_string(),
                module_specifier: None,
            });
        }

        let var = arena.get_variable_declaration(node)?;
        if var.type_annotation.is_some() {
            return self.type_node_origin(program, file, var.type_annotation);
        }
        if var.initializer.is_some() {
            return self.initializer_type_origin(program, file, var.initializer, hops);
        }
        None
    }

    /// The origin of an explicit type annotation: `const c: DIContainer`.
    fn type_node_origin(
        &self,
        program: &Program,
        file: FileId,
        type_node: NodeIndex,
    ) -> Option<TypeOrigin> {
        let arena = &program.arena;
        let name_node = arena
            .get(type_node)
            .and_then(|n| arena.get_type_ref(n))
            .map(|t| t.type_name)?;
        let name = arena.get(name_node)?;

        if name.kind == syntax_kind::IDENTIFIER {
            let text = arena.identifier_text(name_node)?;
            return Some(self.name_origin(file, text));
        }
        if name.kind == syntax_kind::QUALIFIED_NAME {
            let qualified = arena.get_qualified_name(name)?;
            let member = arena.identifier_text(qualified.right)?;
            let left = arena.identifier_text(qualified.left)?;
            return Some(self.namespace_member_origin(file, left, member));
        }
        None
    }

    /// The origin of a `new` initializer: `const c = new DIContainer()` or
    /// `const c = new di.DIContainer()`.
    fn initializer_type_origin(
        &self,
        program: &Program,
        file: FileId,
        initializer: NodeIndex,
        hops: usize,
    ) -> Option<TypeOrigin> {
        let arena = &program.arena;
        let node = arena.get(initializer)?;
        if node.kind != syntax_kind::NEW_EXPRESSION {
            // `const a = b` aliases another binding; follow it.
            if node.kind == syntax_kind::IDENTIFIER {
                let alias = arena.identifier_text(initializer)?;
                return self.variable_type_origin_hops(program, file, alias, hops + 1);
            }
            return None;
        }
        let call = arena.get_call_expr(node)?;
        let callee = arena.get(call.expression)?;

        if callee.kind == syntax_kind::IDENTIFIER {
            let text = arena.identifier_text(call.expression)?;
            return Some(self.name_origin(file, text));
        }
        if callee.kind == syntax_kind::PROPERTY_ACCESS_EXPRESSION {
            let access = arena.get_access_expr(callee)?;
            let member = arena.identifier_text(access.name)?;
            let left = arena.identifier_text(access.expression)?;
            return Some(self.namespace_member_origin(file, left, member));
        }
        None
    }

    /// Where a bare name used as a constructor or annotation comes from.
    fn name_origin(&self, file: FileId, name: &str) -> TypeOrigin {
        let record = self.file(file).and_then(|b| b.import_by_local(name));
        match record {
            Some(record) => {
                let surface = match &record.kind {
                    ImportKind::Named(exported) => exported.clone(),
                    _ => record.local.clone(),
                };
                TypeOrigin {
                    name: surface,
                    module_specifier: Some(record.specifier.clone()),
                }
            }
            None => TypeOrigin {
                name: name.to_string(),
                module_specifier: None,
            },
        }
    }

    fn namespace_member_origin(&self, file: FileId, left: &str, member: &str) -> TypeOrigin {
        let specifier = self
            .file(file)
            .and_then(|b| b.import_by_local(left))
            .filter(|record| record.kind == ImportKind::Namespace)
            .map(|record| record.specifier.clone());
        TypeOrigin {
            name: member.to_string(),
            module_specifier: specifier,
        }
    }
}

//! Program-wide index of class declarations.

use crate::bind::ModuleBindings;
use crate::bindings::{ExportTarget, ResolvedType};
use dit_ast::node::ModifierFlags;
use dit_ast::{syntax_kind, NodeArena, NodeIndex, Program};
use dit_common::FileId;
use rustc_hash::FxHashMap;
use tracing::debug;

/// How a class is visible on its file's export surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportKind {
    /// The file's default export.
    Default,
    /// Exported under a name, which can differ from the declared name
    /// (`export { Foo as Bar }` yields `Named("Bar")`).
    Named(String),
    /// Not exported; only reachable from its own file.
    None,
}

/// One class declaration with the facts reference synthesis needs.
#[derive(Debug, Clone)]
pub struct ClassDescriptor {
    pub declaration: NodeIndex,
    pub file: FileId,
    /// Declared class name.
    pub name: String,
    pub export: ExportKind,
    /// Declared names of the interfaces in the `implements` clause,
    /// resolved through imports where possible.
    pub implements: Vec<String>,
}

/// Index of every named class declaration in a program, keyed by the
/// declaring node.
#[derive(Debug, Default)]
pub struct ClassIndex {
    descriptors: Vec<ClassDescriptor>,
    by_decl: FxHashMap<NodeIndex, usize>,
}

impl ClassIndex {
    /// Walk every file and describe each named class declaration.
    /// Anonymous classes are skipped; a type argument cannot name them.
    pub fn build(program: &Program, bindings: &ModuleBindings) -> ClassIndex {
        let mut index = ClassIndex::default();
        let arena = &program.arena;

        for (file_id, file_node) in program.files() {
            let Some(statements) = arena
                .get(file_node)
                .and_then(|node| arena.get_source_file(node))
                .map(|data| data.statements.clone())
            else {
                continue;
            };
            for stmt in statements.iter() {
                let Some(node) = arena.get(stmt) else {
                    continue;
                };
                if node.kind != syntax_kind::CLASS_DECLARATION {
                    continue;
                }
                let Some(class) = arena.get_class(node) else {
                    continue;
                };
                let Some(name) = arena.identifier_text(class.name) else {
                    continue;
                };
                let descriptor = ClassDescriptor {
                    declaration: stmt,
                    file: file_id,
                    name: name.to_string(),
                    export: export_kind(program, bindings, file_id, stmt, name),
                    implements: implemented_interfaces(
                        program,
                        bindings,
                        file_id,
                        class.heritage_clauses.as_ref(),
                    ),
                };
                index.by_decl.insert(stmt, index.descriptors.len());
                index.descriptors.push(descriptor);
            }
        }

        debug!(classes = index.descriptors.len(), "built class index");
        index
    }

    pub fn lookup(&self, declaration: NodeIndex) -> Option<&ClassDescriptor> {
        self.by_decl
            .get(&declaration)
            .and_then(|&i| self.descriptors.get(i))
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ClassDescriptor> {
        self.descriptors.iter()
    }
}

/// Work out how a class leaves its file. Modifier flags cover the inline
/// forms; separate export statements show up in the file's export table as
/// entries naming the class.
fn export_kind(
    program: &Program,
    bindings: &ModuleBindings,
    file: FileId,
    declaration: NodeIndex,
    name: &str,
) -> ExportKind {
    let flags = program.arena.modifier_flags(declaration);
    if flags.contains(ModifierFlags::EXPORT) {
        if flags.contains(ModifierFlags::DEFAULT) {
            return ExportKind::Default;
        }
        return ExportKind::Named(name.to_string());
    }

    let Some(file_bindings) = bindings.file(file) else {
        return ExportKind::None;
    };
    let names_class = |target: &ExportTarget| match target {
        ExportTarget::Decl(node) => *node == declaration,
        ExportTarget::Local(local) => local == name,
    };

    if file_bindings
        .exports
        .get("default")
        .is_some_and(names_class)
    {
        return ExportKind::Default;
    }
    if file_bindings.exports.get(name).is_some_and(names_class) {
        return ExportKind::Named(name.to_string());
    }
    // Aliased export statement; pick the smallest key so rebuilds agree.
    let mut aliases: Vec<&String> = file_bindings
        .exports
        .iter()
        .filter(|(exported, target)| exported.as_str() != "default" && names_class(target))
        .map(|(exported, _)| exported)
        .collect();
    aliases.sort();
    match aliases.first() {
        Some(alias) => ExportKind::Named((*alias).clone()),
        None => ExportKind::None,
    }
}

/// Resolve the `implements` clause entries to interface names. Import
/// aliases resolve to the declared name; unresolvable entries keep their
/// written text so the descriptor stays informative.
fn implemented_interfaces(
    program: &Program,
    bindings: &ModuleBindings,
    file: FileId,
    heritage_clauses: Option<&dit_ast::NodeList>,
) -> Vec<String> {
    let arena = &program.arena;
    let mut names = Vec::new();
    let Some(clauses) = heritage_clauses else {
        return names;
    };
    for clause_idx in clauses.iter() {
        let Some(clause) = arena.get(clause_idx).and_then(|n| arena.get_heritage_clause(n))
        else {
            continue;
        };
        if clause.token != syntax_kind::IMPLEMENTS_KEYWORD {
            continue;
        }
        for type_idx in clause.types.iter() {
            match bindings.resolve_type(program, file, type_idx) {
                Ok(ResolvedType::Declaration(decl)) => {
                    if let Some(name) = declared_name(arena, decl.node) {
                        names.push(name);
                        continue;
                    }
                }
                Ok(ResolvedType::NamespaceObject { local, .. }) => {
                    names.push(local);
                    continue;
                }
                Err(_) => {}
            }
            if let Some(text) = written_type_name(arena, type_idx) {
                names.push(text);
            }
        }
    }
    names
}

/// Declared name of a named declaration node.
pub fn declared_name(arena: &NodeArena, declaration: NodeIndex) -> Option<String> {
    let node = arena.get(declaration)?;
    let name_node = match node.kind {
        k if k == syntax_kind::CLASS_DECLARATION => arena.get_class(node)?.name,
        k if k == syntax_kind::INTERFACE_DECLARATION => arena.get_interface(node)?.name,
        k if k == syntax_kind::TYPE_ALIAS_DECLARATION => arena.get_type_alias(node)?.name,
        _ => return None,
    };
    arena.identifier_text(name_node).map(str::to_string)
}

/// The type name as written at the use site, for fallback reporting.
fn written_type_name(arena: &NodeArena, type_idx: NodeIndex) -> Option<String> {
    let name_node = arena
        .get(type_idx)
        .and_then(|n| arena.get_type_ref(n))
        .map(|t| t.type_name)?;
    let node = arena.get(name_node)?;
    if node.kind == syntax_kind::IDENTIFIER {
        return arena.identifier_text(name_node).map(str::to_string);
    }
    if node.kind == syntax_kind::QUALIFIED_NAME {
        let qualified = arena.get_qualified_name(node)?;
        let (left, right) = (
            arena.identifier_text(qualified.left)?,
            arena.identifier_text(qualified.right)?,
        );
        return Some(format!("{left}.{right}"));
    }
    None
}

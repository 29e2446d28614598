//! Binding tables built per file.

use dit_ast::NodeIndex;
use dit_common::FileId;
use rustc_hash::FxHashMap;

/// A declaration pinned to the file that declares it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeclarationRef {
    pub node: NodeIndex,
    pub file: FileId,
}

/// How an import statement binds a name. The payload of `Named` is the
/// name on the source module's export surface, which can differ from the
/// local binding (`import { Bar as Foo }` records `Named("Bar")`, local
/// `Foo`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportKind {
    Named(String),
    Default,
    Namespace,
}

/// One import binding recorded while walking a file's import declarations.
#[derive(Debug, Clone)]
pub struct ImportRecord {
    pub local: String,
    pub kind: ImportKind,
    /// The literal module specifier as written.
    pub specifier: String,
    /// The program file the specifier resolves to; `FileId::NONE` for
    /// external packages and unresolvable specifiers.
    pub source: FileId,
    pub is_type_only: bool,
    /// Declaring node (specifier, clause, or namespace binding).
    pub decl: NodeIndex,
}

/// What an exported name points at inside its own file.
#[derive(Debug, Clone)]
pub enum ExportTarget {
    /// Declaration exported in place (`export class Foo`).
    Decl(NodeIndex),
    /// Export statement naming a local (`export { Foo }`,
    /// `export default Foo`). The local may itself be an import alias.
    Local(String),
}

/// Per-file binding tables.
#[derive(Debug, Default)]
pub struct FileBindings {
    /// Type declarations by declared name (interfaces, type aliases,
    /// classes).
    pub types: FxHashMap<String, NodeIndex>,
    /// Value declarations by declared name (classes, variables).
    pub values: FxHashMap<String, NodeIndex>,
    /// Import records in declaration order. Order is observable: when
    /// several bindings reach the same declaration, the first one wins.
    pub imports: Vec<ImportRecord>,
    pub imports_by_local: FxHashMap<String, usize>,
    /// Exported name -> target within this file.
    pub exports: FxHashMap<String, ExportTarget>,
    /// Exported name -> (source file, name on that file's surface) for
    /// `export { X } from "./y"` forms.
    pub reexports: FxHashMap<String, (FileId, String)>,
    /// Source files of `export * from "./y"` statements, in order.
    pub wildcard_reexports: Vec<FileId>,
}

impl FileBindings {
    pub fn import_by_local(&self, local: &str) -> Option<&ImportRecord> {
        self.imports_by_local
            .get(local)
            .and_then(|&i| self.imports.get(i))
    }
}

/// How a synthesized reference must address an implementation from a call
/// site's file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportBindingKind {
    /// Named import; payload is the name on the source module's surface.
    Named { exported: String },
    Default,
    Namespace,
    /// Declared in the call site's own file; no import involved.
    SameFile,
}

/// The binding a reference is synthesized from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportBinding {
    pub local: String,
    pub kind: ImportBindingKind,
    /// True when the binding is a default import that the emit wraps with
    /// the `__importDefault` interop helper under the active options.
    pub requires_interop_helper: bool,
}

impl ImportBinding {
    pub fn same_file(local: impl Into<String>) -> ImportBinding {
        ImportBinding {
            local: local.into(),
            kind: ImportBindingKind::SameFile,
            requires_interop_helper: false,
        }
    }
}

/// Result of resolving a type reference to its declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedType {
    Declaration(DeclarationRef),
    /// The reference names a namespace import directly (`import * as Foo`
    /// used as a type argument).
    NamespaceObject { local: String, source: FileId },
}

/// Why a type reference failed to resolve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeResolveError {
    /// The node is not a type reference naming a declaration.
    NotATypeReference,
    UnresolvedName(String),
    /// Qualified name whose left side is not a namespace import.
    NotANamespace(String),
    UnresolvedMember { namespace: String, member: String },
    /// The name is bound by an import of an external module; there is no
    /// program declaration to resolve to.
    ExternalModule(String),
}

impl std::fmt::Display for TypeResolveError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TypeResolveError::NotATypeReference => {
                write!(f, "type argument is not a reference to a named declaration")
            }
            TypeResolveError::UnresolvedName(name) => {
                write!(f, "cannot resolve name '{name}'")
            }
            TypeResolveError::NotANamespace(name) => {
                write!(f, "'{name}' is not a namespace import")
            }
            TypeResolveError::UnresolvedMember { namespace, member } => {
                write!(f, "namespace '{namespace}' has no exported member '{member}'")
            }
            TypeResolveError::ExternalModule(specifier) => {
                write!(f, "declaration lives in external module '{specifier}'")
            }
        }
    }
}

impl std::error::Error for TypeResolveError {}

/// The declared or constructed type of a local variable, used to decide
/// whether a call receiver is a registration container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeOrigin {
    /// The type's name on the surface it was taken from (exported name for
    /// imports, member name for namespace access, declared name locally).
    pub name: String,
    /// Module specifier the type was imported from, if any.
    pub module_specifier: Option<String>,
}

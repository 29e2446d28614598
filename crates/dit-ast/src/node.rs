//! Thin-node AST storage.
//!
//! Each node is a 16-byte header (kind, flags, span, data index) and the
//! kind-specific payload lives in a typed pool on the arena. The rewrite
//! walks a lot of nodes to find a few call sites, so keeping headers packed
//! four to a cache line matters more than per-node convenience.
//!
//! The `data_index` field points into the pool selected by `kind`;
//! `Node::NO_DATA` marks nodes with no payload (tokens, type literals).

use crate::base::{NodeIndex, NodeList};
use bitflags::bitflags;
use dit_common::Atom;
use serde::{Deserialize, Serialize};

/// A thin 16-byte node header.
///
/// Layout:
/// - `kind`: 2 bytes (syntax_kind value)
/// - `flags`: 2 bytes (packed NodeFlags)
/// - `pos` / `end`: 4 bytes each (character offsets; synthesized nodes carry
///   the span of the call site they were created for)
/// - `data_index`: 4 bytes (index into the kind's pool, u32::MAX = no data)
#[repr(C)]
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct Node {
    pub kind: u16,
    pub flags: u16,
    pub pos: u32,
    pub end: u32,
    pub data_index: u32,
}

impl Node {
    pub const NO_DATA: u32 = u32::MAX;

    /// Create a new thin node with no associated data.
    #[inline]
    pub fn new(kind: u16, pos: u32, end: u32) -> Node {
        Node {
            kind,
            flags: 0,
            pos,
            end,
            data_index: Self::NO_DATA,
        }
    }

    /// Create a new thin node with a data index.
    #[inline]
    pub fn with_data(kind: u16, pos: u32, end: u32, data_index: u32) -> Node {
        Node {
            kind,
            flags: 0,
            pos,
            end,
            data_index,
        }
    }

    #[inline]
    pub fn has_data(&self) -> bool {
        self.data_index != Self::NO_DATA
    }

    #[inline]
    pub fn has_flag(&self, flag: NodeFlags) -> bool {
        NodeFlags::from_bits_truncate(self.flags).contains(flag)
    }
}

bitflags! {
    /// Per-node flags packed into the 2-byte header slot.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct NodeFlags: u16 {
        const LET = 1 << 0;
        const CONST = 1 << 1;
        /// Node was created by the rewrite, not by a parser; its span is
        /// inherited from the call site it was synthesized for.
        const SYNTHESIZED = 1 << 2;
    }
}

bitflags! {
    /// Declaration modifiers, cached on the extended info record.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct ModifierFlags: u32 {
        const EXPORT = 1 << 0;
        const DEFAULT = 1 << 1;
        const DECLARE = 1 << 2;
        const ABSTRACT = 1 << 3;
    }
}

// =============================================================================
// Typed data pools
// =============================================================================

/// Data for identifier nodes. Text is interned in the arena's interner.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct IdentifierData {
    pub text: Atom,
}

/// Data for string literals (module specifiers, synthesized payload strings).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LiteralData {
    pub text: String,
}

/// Data for call and new expressions.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CallExprData {
    pub expression: NodeIndex,
    pub type_arguments: Option<NodeList>,
    pub arguments: Option<NodeList>,
}

/// Data for property access expressions.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct AccessExprData {
    pub expression: NodeIndex,
    pub name: NodeIndex,
}

/// Data for object literals (element list of property assignments).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LiteralExprData {
    pub elements: NodeList,
    pub multi_line: bool,
}

/// Data for `name: initializer` members of an object literal.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct PropertyAssignmentData {
    pub name: NodeIndex,
    pub initializer: NodeIndex,
}

/// Data for type references.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TypeRefData {
    pub type_name: NodeIndex,
    pub type_arguments: Option<NodeList>,
}

/// Data for qualified names (`ns.Name` in type position).
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct QualifiedNameData {
    pub left: NodeIndex,
    pub right: NodeIndex,
}

/// Data for union/intersection types.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CompositeTypeData {
    pub types: NodeList,
}

/// Data for class declarations.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ClassData {
    pub name: NodeIndex,
    pub heritage_clauses: Option<NodeList>,
}

/// Data for interface declarations.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct InterfaceData {
    pub name: NodeIndex,
}

/// Data for type alias declarations.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct TypeAliasData {
    pub name: NodeIndex,
    pub type_node: NodeIndex,
}

/// Data for heritage clauses.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HeritageData {
    pub token: u16, // EXTENDS_KEYWORD or IMPLEMENTS_KEYWORD
    pub types: NodeList,
}

/// Data for variable statements.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct VariableData {
    pub declarations: NodeList,
}

/// Data for individual variable declarations.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct VariableDeclarationData {
    pub name: NodeIndex,
    pub type_annotation: NodeIndex, // TypeNode (optional)
    pub initializer: NodeIndex,     // Expression (optional)
}

/// Data for expression statements.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct ExpressionStatementData {
    pub expression: NodeIndex,
}

/// Data for import declarations.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct ImportDeclData {
    pub import_clause: NodeIndex,
    pub module_specifier: NodeIndex,
}

/// Data for import clauses.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct ImportClauseData {
    pub is_type_only: bool,
    /// Default import local name (NONE when absent).
    pub name: NodeIndex,
    /// NAMED_IMPORTS or NAMESPACE_IMPORT node (NONE when absent).
    pub named_bindings: NodeIndex,
}

/// Data for namespace/named import and export groups.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NamedImportsData {
    pub name: NodeIndex,    // For namespace import/export
    pub elements: NodeList, // For named specifiers
}

/// Data for import/export specifiers.
///
/// Import specifiers follow TypeScript's orientation: `property_name` is the
/// original exported name and `name` the local alias. Export specifiers flip
/// it: `property_name` is the local name and `name` the exported alias.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct SpecifierData {
    pub is_type_only: bool,
    pub property_name: NodeIndex,
    pub name: NodeIndex,
}

/// Data for export declarations.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct ExportDeclData {
    pub is_type_only: bool,
    /// True if this is `export default <expression>`.
    pub is_default_export: bool,
    /// NAMED_EXPORTS node, namespace export, or the defaulted expression.
    pub export_clause: NodeIndex,
    /// STRING_LITERAL node for re-exports (NONE when absent).
    pub module_specifier: NodeIndex,
}

/// Data for source files.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SourceFileData {
    pub statements: NodeList,
    pub file_name: String,
}

/// Extended node info for fields that do not fit the 16-byte header.
/// One record per node, parallel to the node vector.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct ExtendedNodeInfo {
    pub parent: NodeIndex,
    pub modifier_flags: u32,
}

impl Default for ExtendedNodeInfo {
    fn default() -> Self {
        ExtendedNodeInfo {
            parent: NodeIndex::NONE,
            modifier_flags: 0,
        }
    }
}

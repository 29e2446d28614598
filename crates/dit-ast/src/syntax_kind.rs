//! Syntax kind constants for the node kinds this pipeline models.
//!
//! Kinds are plain u16s so the 16-byte node header stays flat. The numbering
//! is grouped by category and stable: tokens and names below 100, type nodes
//! in the 100s, expressions in the 200s, statements and declarations in the
//! 300s.

pub const UNKNOWN: u16 = 0;
pub const IDENTIFIER: u16 = 1;
pub const STRING_LITERAL: u16 = 2;
pub const NUMERIC_LITERAL: u16 = 3;

// Keyword tokens carried by heritage clauses
pub const EXTENDS_KEYWORD: u16 = 50;
pub const IMPLEMENTS_KEYWORD: u16 = 51;

// Type nodes
pub const TYPE_REFERENCE: u16 = 100;
pub const QUALIFIED_NAME: u16 = 101;
pub const TYPE_LITERAL: u16 = 102;
pub const UNION_TYPE: u16 = 103;
pub const INTERSECTION_TYPE: u16 = 104;

// Expressions
pub const CALL_EXPRESSION: u16 = 200;
pub const NEW_EXPRESSION: u16 = 201;
pub const PROPERTY_ACCESS_EXPRESSION: u16 = 202;
pub const OBJECT_LITERAL_EXPRESSION: u16 = 203;
pub const PROPERTY_ASSIGNMENT: u16 = 204;

// Statements and declarations
pub const SOURCE_FILE: u16 = 300;
pub const EXPRESSION_STATEMENT: u16 = 301;
pub const VARIABLE_STATEMENT: u16 = 302;
pub const VARIABLE_DECLARATION: u16 = 303;
pub const CLASS_DECLARATION: u16 = 304;
pub const INTERFACE_DECLARATION: u16 = 305;
pub const TYPE_ALIAS_DECLARATION: u16 = 306;
pub const HERITAGE_CLAUSE: u16 = 307;
pub const IMPORT_DECLARATION: u16 = 308;
pub const IMPORT_CLAUSE: u16 = 309;
pub const NAMESPACE_IMPORT: u16 = 310;
pub const NAMED_IMPORTS: u16 = 311;
pub const IMPORT_SPECIFIER: u16 = 312;
pub const EXPORT_DECLARATION: u16 = 313;
pub const NAMED_EXPORTS: u16 = 314;
pub const EXPORT_SPECIFIER: u16 = 315;

/// True for the declaration kinds a name can resolve to.
#[inline]
pub fn is_named_declaration(kind: u16) -> bool {
    matches!(
        kind,
        CLASS_DECLARATION | INTERFACE_DECLARATION | TYPE_ALIAS_DECLARATION | VARIABLE_DECLARATION
    )
}

/// True for type nodes that can appear as a registration type argument.
#[inline]
pub fn is_type_node(kind: u16) -> bool {
    matches!(
        kind,
        TYPE_REFERENCE | TYPE_LITERAL | UNION_TYPE | INTERSECTION_TYPE
    )
}

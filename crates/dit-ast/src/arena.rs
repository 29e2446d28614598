//! Node arena: creation methods and typed accessors.

use crate::base::{NodeIndex, NodeList};
use crate::node::*;
use crate::syntax_kind;
use dit_common::Interner;

/// Owns every node of a program plus the typed data pools the node headers
/// point into. Nodes are built bottom-up; children always exist before their
/// parent, which is what makes parent backfilling safe.
#[derive(Default)]
pub struct NodeArena {
    pub nodes: Vec<Node>,
    pub extended_info: Vec<ExtendedNodeInfo>,
    pub interner: Interner,

    // Typed data pools
    pub identifiers: Vec<IdentifierData>,
    pub literals: Vec<LiteralData>,
    pub call_exprs: Vec<CallExprData>,
    pub access_exprs: Vec<AccessExprData>,
    pub literal_exprs: Vec<LiteralExprData>,
    pub property_assignments: Vec<PropertyAssignmentData>,
    pub type_refs: Vec<TypeRefData>,
    pub qualified_names: Vec<QualifiedNameData>,
    pub composite_types: Vec<CompositeTypeData>,
    pub classes: Vec<ClassData>,
    pub interfaces: Vec<InterfaceData>,
    pub type_aliases: Vec<TypeAliasData>,
    pub heritage_clauses: Vec<HeritageData>,
    pub variables: Vec<VariableData>,
    pub variable_declarations: Vec<VariableDeclarationData>,
    pub expr_statements: Vec<ExpressionStatementData>,
    pub import_decls: Vec<ImportDeclData>,
    pub import_clauses: Vec<ImportClauseData>,
    pub named_imports: Vec<NamedImportsData>,
    pub specifiers: Vec<SpecifierData>,
    pub export_decls: Vec<ExportDeclData>,
    pub source_files: Vec<SourceFileData>,
}

impl NodeArena {
    pub fn new() -> NodeArena {
        let mut arena = NodeArena::default();
        arena.interner.intern_common();
        arena
    }

    /// Create an arena with pre-allocated capacity for the main pools.
    pub fn with_capacity(capacity: usize) -> NodeArena {
        let mut arena = NodeArena::new();
        arena.nodes = Vec::with_capacity(capacity);
        arena.extended_info = Vec::with_capacity(capacity);
        arena.identifiers = Vec::with_capacity(capacity / 4);
        arena.call_exprs = Vec::with_capacity(capacity / 8);
        arena.access_exprs = Vec::with_capacity(capacity / 8);
        arena.type_refs = Vec::with_capacity(capacity / 8);
        arena
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    // =========================================================================
    // Internal plumbing
    // =========================================================================

    fn push_node(&mut self, node: Node) -> NodeIndex {
        let index = NodeIndex(self.nodes.len() as u32);
        self.nodes.push(node);
        self.extended_info.push(ExtendedNodeInfo::default());
        index
    }

    fn set_parent(&mut self, child: NodeIndex, parent: NodeIndex) {
        if !child.is_none() {
            // Children are created before parents, so the slot exists.
            if let Some(info) = self.extended_info.get_mut(child.index()) {
                info.parent = parent;
            }
        }
    }

    fn set_parent_list(&mut self, list: &NodeList, parent: NodeIndex) {
        for child in list.iter() {
            self.set_parent(child, parent);
        }
    }

    fn set_parent_opt_list(&mut self, list: &Option<NodeList>, parent: NodeIndex) {
        if let Some(l) = list {
            self.set_parent_list(l, parent);
        }
    }

    fn set_modifier_flags(&mut self, index: NodeIndex, flags: ModifierFlags) {
        if let Some(info) = self.extended_info.get_mut(index.index()) {
            info.modifier_flags = flags.bits();
        }
    }

    // =========================================================================
    // Creation methods
    // =========================================================================

    /// Add a node with no payload (keyword tokens, type literals).
    pub fn add_token(&mut self, kind: u16, pos: u32, end: u32) -> NodeIndex {
        self.push_node(Node::new(kind, pos, end))
    }

    pub fn add_identifier(&mut self, pos: u32, end: u32, text: &str) -> NodeIndex {
        let atom = self.interner.intern(text);
        let data_index = self.identifiers.len() as u32;
        self.identifiers.push(IdentifierData { text: atom });
        self.push_node(Node::with_data(
            syntax_kind::IDENTIFIER,
            pos,
            end,
            data_index,
        ))
    }

    pub fn add_string_literal(&mut self, pos: u32, end: u32, text: impl Into<String>) -> NodeIndex {
        let data_index = self.literals.len() as u32;
        self.literals.push(LiteralData { text: text.into() });
        self.push_node(Node::with_data(
            syntax_kind::STRING_LITERAL,
            pos,
            end,
            data_index,
        ))
    }

    /// Add a call or new expression. `kind` selects between
    /// `CALL_EXPRESSION` and `NEW_EXPRESSION`; both share the pool.
    pub fn add_call_expr(&mut self, kind: u16, pos: u32, end: u32, data: CallExprData) -> NodeIndex {
        let expression = data.expression;
        let type_arguments = data.type_arguments.clone();
        let arguments = data.arguments.clone();

        let data_index = self.call_exprs.len() as u32;
        self.call_exprs.push(data);
        let index = self.push_node(Node::with_data(kind, pos, end, data_index));

        self.set_parent(expression, index);
        self.set_parent_opt_list(&type_arguments, index);
        self.set_parent_opt_list(&arguments, index);
        index
    }

    pub fn add_property_access(&mut self, pos: u32, end: u32, data: AccessExprData) -> NodeIndex {
        let expression = data.expression;
        let name = data.name;

        let data_index = self.access_exprs.len() as u32;
        self.access_exprs.push(data);
        let index = self.push_node(Node::with_data(
            syntax_kind::PROPERTY_ACCESS_EXPRESSION,
            pos,
            end,
            data_index,
        ));

        self.set_parent(expression, index);
        self.set_parent(name, index);
        index
    }

    pub fn add_object_literal(&mut self, pos: u32, end: u32, data: LiteralExprData) -> NodeIndex {
        let elements = data.elements.clone();

        let data_index = self.literal_exprs.len() as u32;
        self.literal_exprs.push(data);
        let index = self.push_node(Node::with_data(
            syntax_kind::OBJECT_LITERAL_EXPRESSION,
            pos,
            end,
            data_index,
        ));

        self.set_parent_list(&elements, index);
        index
    }

    pub fn add_property_assignment(
        &mut self,
        pos: u32,
        end: u32,
        data: PropertyAssignmentData,
    ) -> NodeIndex {
        let name = data.name;
        let initializer = data.initializer;

        let data_index = self.property_assignments.len() as u32;
        self.property_assignments.push(data);
        let index = self.push_node(Node::with_data(
            syntax_kind::PROPERTY_ASSIGNMENT,
            pos,
            end,
            data_index,
        ));

        self.set_parent(name, index);
        self.set_parent(initializer, index);
        index
    }

    pub fn add_type_ref(&mut self, pos: u32, end: u32, data: TypeRefData) -> NodeIndex {
        let type_name = data.type_name;
        let type_arguments = data.type_arguments.clone();

        let data_index = self.type_refs.len() as u32;
        self.type_refs.push(data);
        let index = self.push_node(Node::with_data(
            syntax_kind::TYPE_REFERENCE,
            pos,
            end,
            data_index,
        ));

        self.set_parent(type_name, index);
        self.set_parent_opt_list(&type_arguments, index);
        index
    }

    pub fn add_qualified_name(&mut self, pos: u32, end: u32, data: QualifiedNameData) -> NodeIndex {
        let left = data.left;
        let right = data.right;

        let data_index = self.qualified_names.len() as u32;
        self.qualified_names.push(data);
        let index = self.push_node(Node::with_data(
            syntax_kind::QUALIFIED_NAME,
            pos,
            end,
            data_index,
        ));

        self.set_parent(left, index);
        self.set_parent(right, index);
        index
    }

    /// Add a union or intersection type. `kind` selects the variant.
    pub fn add_composite_type(
        &mut self,
        kind: u16,
        pos: u32,
        end: u32,
        data: CompositeTypeData,
    ) -> NodeIndex {
        let types = data.types.clone();

        let data_index = self.composite_types.len() as u32;
        self.composite_types.push(data);
        let index = self.push_node(Node::with_data(kind, pos, end, data_index));

        self.set_parent_list(&types, index);
        index
    }

    pub fn add_class(
        &mut self,
        pos: u32,
        end: u32,
        data: ClassData,
        modifiers: ModifierFlags,
    ) -> NodeIndex {
        let name = data.name;
        let heritage = data.heritage_clauses.clone();

        let data_index = self.classes.len() as u32;
        self.classes.push(data);
        let index = self.push_node(Node::with_data(
            syntax_kind::CLASS_DECLARATION,
            pos,
            end,
            data_index,
        ));

        self.set_parent(name, index);
        self.set_parent_opt_list(&heritage, index);
        self.set_modifier_flags(index, modifiers);
        index
    }

    pub fn add_interface(
        &mut self,
        pos: u32,
        end: u32,
        data: InterfaceData,
        modifiers: ModifierFlags,
    ) -> NodeIndex {
        let name = data.name;

        let data_index = self.interfaces.len() as u32;
        self.interfaces.push(data);
        let index = self.push_node(Node::with_data(
            syntax_kind::INTERFACE_DECLARATION,
            pos,
            end,
            data_index,
        ));

        self.set_parent(name, index);
        self.set_modifier_flags(index, modifiers);
        index
    }

    pub fn add_type_alias(
        &mut self,
        pos: u32,
        end: u32,
        data: TypeAliasData,
        modifiers: ModifierFlags,
    ) -> NodeIndex {
        let name = data.name;
        let type_node = data.type_node;

        let data_index = self.type_aliases.len() as u32;
        self.type_aliases.push(data);
        let index = self.push_node(Node::with_data(
            syntax_kind::TYPE_ALIAS_DECLARATION,
            pos,
            end,
            data_index,
        ));

        self.set_parent(name, index);
        self.set_parent(type_node, index);
        self.set_modifier_flags(index, modifiers);
        index
    }

    pub fn add_heritage_clause(&mut self, pos: u32, end: u32, data: HeritageData) -> NodeIndex {
        let types = data.types.clone();

        let data_index = self.heritage_clauses.len() as u32;
        self.heritage_clauses.push(data);
        let index = self.push_node(Node::with_data(
            syntax_kind::HERITAGE_CLAUSE,
            pos,
            end,
            data_index,
        ));

        self.set_parent_list(&types, index);
        index
    }

    /// Add a variable statement. `flags` carries let/const-ness.
    pub fn add_variable_statement(
        &mut self,
        pos: u32,
        end: u32,
        data: VariableData,
        flags: NodeFlags,
        modifiers: ModifierFlags,
    ) -> NodeIndex {
        let declarations = data.declarations.clone();

        let data_index = self.variables.len() as u32;
        self.variables.push(data);
        let mut node = Node::with_data(syntax_kind::VARIABLE_STATEMENT, pos, end, data_index);
        node.flags = flags.bits();
        let index = self.push_node(node);

        self.set_parent_list(&declarations, index);
        self.set_modifier_flags(index, modifiers);
        index
    }

    pub fn add_variable_declaration(
        &mut self,
        pos: u32,
        end: u32,
        data: VariableDeclarationData,
    ) -> NodeIndex {
        let name = data.name;
        let type_annotation = data.type_annotation;
        let initializer = data.initializer;

        let data_index = self.variable_declarations.len() as u32;
        self.variable_declarations.push(data);
        let index = self.push_node(Node::with_data(
            syntax_kind::VARIABLE_DECLARATION,
            pos,
            end,
            data_index,
        ));

        self.set_parent(name, index);
        self.set_parent(type_annotation, index);
        self.set_parent(initializer, index);
        index
    }

    pub fn add_expression_statement(
        &mut self,
        pos: u32,
        end: u32,
        data: ExpressionStatementData,
    ) -> NodeIndex {
        let expression = data.expression;

        let data_index = self.expr_statements.len() as u32;
        self.expr_statements.push(data);
        let index = self.push_node(Node::with_data(
            syntax_kind::EXPRESSION_STATEMENT,
            pos,
            end,
            data_index,
        ));

        self.set_parent(expression, index);
        index
    }

    pub fn add_import_decl(&mut self, pos: u32, end: u32, data: ImportDeclData) -> NodeIndex {
        let import_clause = data.import_clause;
        let module_specifier = data.module_specifier;

        let data_index = self.import_decls.len() as u32;
        self.import_decls.push(data);
        let index = self.push_node(Node::with_data(
            syntax_kind::IMPORT_DECLARATION,
            pos,
            end,
            data_index,
        ));

        self.set_parent(import_clause, index);
        self.set_parent(module_specifier, index);
        index
    }

    pub fn add_import_clause(&mut self, pos: u32, end: u32, data: ImportClauseData) -> NodeIndex {
        let name = data.name;
        let named_bindings = data.named_bindings;

        let data_index = self.import_clauses.len() as u32;
        self.import_clauses.push(data);
        let index = self.push_node(Node::with_data(
            syntax_kind::IMPORT_CLAUSE,
            pos,
            end,
            data_index,
        ));

        self.set_parent(name, index);
        self.set_parent(named_bindings, index);
        index
    }

    /// Add a named/namespace import or export group. `kind` selects between
    /// `NAMED_IMPORTS`, `NAMESPACE_IMPORT`, and `NAMED_EXPORTS`.
    pub fn add_named_imports(
        &mut self,
        kind: u16,
        pos: u32,
        end: u32,
        data: NamedImportsData,
    ) -> NodeIndex {
        let name = data.name;
        let elements = data.elements.clone();

        let data_index = self.named_imports.len() as u32;
        self.named_imports.push(data);
        let index = self.push_node(Node::with_data(kind, pos, end, data_index));

        self.set_parent(name, index);
        self.set_parent_list(&elements, index);
        index
    }

    /// Add an import or export specifier. `kind` selects the variant.
    pub fn add_specifier(&mut self, kind: u16, pos: u32, end: u32, data: SpecifierData) -> NodeIndex {
        let property_name = data.property_name;
        let name = data.name;

        let data_index = self.specifiers.len() as u32;
        self.specifiers.push(data);
        let index = self.push_node(Node::with_data(kind, pos, end, data_index));

        self.set_parent(property_name, index);
        self.set_parent(name, index);
        index
    }

    pub fn add_export_decl(&mut self, pos: u32, end: u32, data: ExportDeclData) -> NodeIndex {
        let export_clause = data.export_clause;
        let module_specifier = data.module_specifier;

        let data_index = self.export_decls.len() as u32;
        self.export_decls.push(data);
        let index = self.push_node(Node::with_data(
            syntax_kind::EXPORT_DECLARATION,
            pos,
            end,
            data_index,
        ));

        self.set_parent(export_clause, index);
        self.set_parent(module_specifier, index);
        index
    }

    pub fn add_source_file(&mut self, pos: u32, end: u32, data: SourceFileData) -> NodeIndex {
        let statements = data.statements.clone();

        let data_index = self.source_files.len() as u32;
        self.source_files.push(data);
        let index = self.push_node(Node::with_data(
            syntax_kind::SOURCE_FILE,
            pos,
            end,
            data_index,
        ));

        self.set_parent_list(&statements, index);
        index
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Get a thin node by index.
    #[inline]
    pub fn get(&self, index: NodeIndex) -> Option<&Node> {
        if index.is_none() {
            None
        } else {
            self.nodes.get(index.index())
        }
    }

    /// Get a mutable thin node by index.
    #[inline]
    pub fn get_mut(&mut self, index: NodeIndex) -> Option<&mut Node> {
        if index.is_none() {
            None
        } else {
            self.nodes.get_mut(index.index())
        }
    }

    #[inline]
    pub fn kind(&self, index: NodeIndex) -> u16 {
        self.get(index).map(|n| n.kind).unwrap_or(syntax_kind::UNKNOWN)
    }

    #[inline]
    pub fn parent(&self, index: NodeIndex) -> NodeIndex {
        self.extended_info
            .get(index.index())
            .map(|info| info.parent)
            .unwrap_or(NodeIndex::NONE)
    }

    #[inline]
    pub fn modifier_flags(&self, index: NodeIndex) -> ModifierFlags {
        self.extended_info
            .get(index.index())
            .map(|info| ModifierFlags::from_bits_truncate(info.modifier_flags))
            .unwrap_or(ModifierFlags::empty())
    }

    #[inline]
    pub fn get_identifier(&self, node: &Node) -> Option<&IdentifierData> {
        if node.has_data() && node.kind == syntax_kind::IDENTIFIER {
            self.identifiers.get(node.data_index as usize)
        } else {
            None
        }
    }

    /// Resolve an identifier node straight to its text.
    pub fn identifier_text(&self, index: NodeIndex) -> Option<&str> {
        let node = self.get(index)?;
        let data = self.get_identifier(node)?;
        Some(self.interner.resolve(data.text))
    }

    #[inline]
    pub fn get_string_literal(&self, node: &Node) -> Option<&LiteralData> {
        if node.has_data() && node.kind == syntax_kind::STRING_LITERAL {
            self.literals.get(node.data_index as usize)
        } else {
            None
        }
    }

    /// Resolve a string literal node straight to its text.
    pub fn string_literal_text(&self, index: NodeIndex) -> Option<&str> {
        let node = self.get(index)?;
        let data = self.get_string_literal(node)?;
        Some(data.text.as_str())
    }

    #[inline]
    pub fn get_call_expr(&self, node: &Node) -> Option<&CallExprData> {
        use syntax_kind::{CALL_EXPRESSION, NEW_EXPRESSION};
        if node.has_data() && (node.kind == CALL_EXPRESSION || node.kind == NEW_EXPRESSION) {
            self.call_exprs.get(node.data_index as usize)
        } else {
            None
        }
    }

    /// Reattach a node beneath a new parent. In-place call rewrites splice
    /// synthesized arguments into an existing node's slots, which bypasses
    /// the creation-time parent backfill.
    pub fn reparent(&mut self, child: NodeIndex, parent: NodeIndex) {
        if child.is_none() {
            return;
        }
        if let Some(info) = self.extended_info.get_mut(child.index()) {
            info.parent = parent;
        }
    }

    /// Mutable access to a call expression's slots, for in-place rewriting.
    pub fn get_call_expr_mut(&mut self, index: NodeIndex) -> Option<&mut CallExprData> {
        use syntax_kind::{CALL_EXPRESSION, NEW_EXPRESSION};
        let node = *self.get(index)?;
        if node.has_data() && (node.kind == CALL_EXPRESSION || node.kind == NEW_EXPRESSION) {
            self.call_exprs.get_mut(node.data_index as usize)
        } else {
            None
        }
    }

    #[inline]
    pub fn get_access_expr(&self, node: &Node) -> Option<&AccessExprData> {
        if node.has_data() && node.kind == syntax_kind::PROPERTY_ACCESS_EXPRESSION {
            self.access_exprs.get(node.data_index as usize)
        } else {
            None
        }
    }

    #[inline]
    pub fn get_object_literal(&self, node: &Node) -> Option<&LiteralExprData> {
        if node.has_data() && node.kind == syntax_kind::OBJECT_LITERAL_EXPRESSION {
            self.literal_exprs.get(node.data_index as usize)
        } else {
            None
        }
    }

    #[inline]
    pub fn get_property_assignment(&self, node: &Node) -> Option<&PropertyAssignmentData> {
        if node.has_data() && node.kind == syntax_kind::PROPERTY_ASSIGNMENT {
            self.property_assignments.get(node.data_index as usize)
        } else {
            None
        }
    }

    #[inline]
    pub fn get_type_ref(&self, node: &Node) -> Option<&TypeRefData> {
        if node.has_data() && node.kind == syntax_kind::TYPE_REFERENCE {
            self.type_refs.get(node.data_index as usize)
        } else {
            None
        }
    }

    #[inline]
    pub fn get_qualified_name(&self, node: &Node) -> Option<&QualifiedNameData> {
        if node.has_data() && node.kind == syntax_kind::QUALIFIED_NAME {
            self.qualified_names.get(node.data_index as usize)
        } else {
            None
        }
    }

    #[inline]
    pub fn get_class(&self, node: &Node) -> Option<&ClassData> {
        if node.has_data() && node.kind == syntax_kind::CLASS_DECLARATION {
            self.classes.get(node.data_index as usize)
        } else {
            None
        }
    }

    #[inline]
    pub fn get_interface(&self, node: &Node) -> Option<&InterfaceData> {
        if node.has_data() && node.kind == syntax_kind::INTERFACE_DECLARATION {
            self.interfaces.get(node.data_index as usize)
        } else {
            None
        }
    }

    #[inline]
    pub fn get_type_alias(&self, node: &Node) -> Option<&TypeAliasData> {
        if node.has_data() && node.kind == syntax_kind::TYPE_ALIAS_DECLARATION {
            self.type_aliases.get(node.data_index as usize)
        } else {
            None
        }
    }

    #[inline]
    pub fn get_heritage_clause(&self, node: &Node) -> Option<&HeritageData> {
        if node.has_data() && node.kind == syntax_kind::HERITAGE_CLAUSE {
            self.heritage_clauses.get(node.data_index as usize)
        } else {
            None
        }
    }

    #[inline]
    pub fn get_variable(&self, node: &Node) -> Option<&VariableData> {
        if node.has_data() && node.kind == syntax_kind::VARIABLE_STATEMENT {
            self.variables.get(node.data_index as usize)
        } else {
            None
        }
    }

    #[inline]
    pub fn get_variable_declaration(&self, node: &Node) -> Option<&VariableDeclarationData> {
        if node.has_data() && node.kind == syntax_kind::VARIABLE_DECLARATION {
            self.variable_declarations.get(node.data_index as usize)
        } else {
            None
        }
    }

    #[inline]
    pub fn get_expr_statement(&self, node: &Node) -> Option<&ExpressionStatementData> {
        if node.has_data() && node.kind == syntax_kind::EXPRESSION_STATEMENT {
            self.expr_statements.get(node.data_index as usize)
        } else {
            None
        }
    }

    #[inline]
    pub fn get_import_decl(&self, node: &Node) -> Option<&ImportDeclData> {
        if node.has_data() && node.kind == syntax_kind::IMPORT_DECLARATION {
            self.import_decls.get(node.data_index as usize)
        } else {
            None
        }
    }

    #[inline]
    pub fn get_import_clause(&self, node: &Node) -> Option<&ImportClauseData> {
        if node.has_data() && node.kind == syntax_kind::IMPORT_CLAUSE {
            self.import_clauses.get(node.data_index as usize)
        } else {
            None
        }
    }

    #[inline]
    pub fn get_named_imports(&self, node: &Node) -> Option<&NamedImportsData> {
        use syntax_kind::{NAMED_EXPORTS, NAMED_IMPORTS, NAMESPACE_IMPORT};
        if node.has_data()
            && (node.kind == NAMED_IMPORTS
                || node.kind == NAMESPACE_IMPORT
                || node.kind == NAMED_EXPORTS)
        {
            self.named_imports.get(node.data_index as usize)
        } else {
            None
        }
    }

    #[inline]
    pub fn get_specifier(&self, node: &Node) -> Option<&SpecifierData> {
        use syntax_kind::{EXPORT_SPECIFIER, IMPORT_SPECIFIER};
        if node.has_data() && (node.kind == IMPORT_SPECIFIER || node.kind == EXPORT_SPECIFIER) {
            self.specifiers.get(node.data_index as usize)
        } else {
            None
        }
    }

    #[inline]
    pub fn get_export_decl(&self, node: &Node) -> Option<&ExportDeclData> {
        if node.has_data() && node.kind == syntax_kind::EXPORT_DECLARATION {
            self.export_decls.get(node.data_index as usize)
        } else {
            None
        }
    }

    #[inline]
    pub fn get_source_file(&self, node: &Node) -> Option<&SourceFileData> {
        if node.has_data() && node.kind == syntax_kind::SOURCE_FILE {
            self.source_files.get(node.data_index as usize)
        } else {
            None
        }
    }
}

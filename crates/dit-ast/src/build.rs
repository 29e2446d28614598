//! Ergonomic program construction.
//!
//! There is no parser in this pipeline; hosts hand the engine programs they
//! built from their own front end. `ProgramBuilder` wraps the arena's
//! creation methods into statement-level pieces so a program can be
//! assembled without tracking node indices for every leaf. Positions are
//! synthetic but strictly increasing, so span ordering matches statement
//! order.

use crate::base::{NodeIndex, NodeList};
use crate::node::{
    AccessExprData, CallExprData, ClassData, CompositeTypeData, ExportDeclData, HeritageData,
    ImportClauseData, ImportDeclData, InterfaceData, ModifierFlags, NamedImportsData, NodeFlags,
    QualifiedNameData, SourceFileData, SpecifierData, TypeAliasData, TypeRefData, VariableData,
    VariableDeclarationData,
};
use crate::program::Program;
use crate::syntax_kind;
use dit_common::options::EmitOptions;
use dit_common::FileId;

pub struct ProgramBuilder {
    pub program: Program,
    cursor: u32,
}

impl ProgramBuilder {
    pub fn new() -> ProgramBuilder {
        ProgramBuilder::with_options(EmitOptions::default())
    }

    pub fn with_options(options: EmitOptions) -> ProgramBuilder {
        ProgramBuilder {
            program: Program::new(options),
            cursor: 0,
        }
    }

    fn span(&mut self) -> (u32, u32) {
        let pos = self.cursor;
        self.cursor += 10;
        (pos, pos + 8)
    }

    // =====================================================================
    // Leaves
    // =====================================================================

    pub fn ident(&mut self, text: &str) -> NodeIndex {
        let (pos, end) = self.span();
        self.program.arena.add_identifier(pos, end, text)
    }

    pub fn string(&mut self, text: &str) -> NodeIndex {
        let (pos, end) = self.span();
        self.program.arena.add_string_literal(pos, end, text)
    }

    pub fn type_ref(&mut self, name: &str) -> NodeIndex {
        let type_name = self.ident(name);
        self.type_ref_node(type_name, None)
    }

    /// `Name<...args>` in type position.
    pub fn type_ref_with_args(&mut self, name: &str, args: Vec<NodeIndex>) -> NodeIndex {
        let type_name = self.ident(name);
        self.type_ref_node(type_name, Some(NodeList::from_vec(args)))
    }

    /// `Ns.Name` in type position.
    pub fn type_ref_qualified(&mut self, left: &str, right: &str) -> NodeIndex {
        let left = self.ident(left);
        let right = self.ident(right);
        let (pos, end) = self.span();
        let qualified = self
            .program
            .arena
            .add_qualified_name(pos, end, QualifiedNameData { left, right });
        self.type_ref_node(qualified, None)
    }

    fn type_ref_node(&mut self, type_name: NodeIndex, args: Option<NodeList>) -> NodeIndex {
        let (pos, end) = self.span();
        self.program.arena.add_type_ref(
            pos,
            end,
            TypeRefData {
                type_name,
                type_arguments: args,
            },
        )
    }

    /// An inline `{ ... }` type in type position. Carries no name, so it can
    /// never resolve to a declaration.
    pub fn type_literal(&mut self) -> NodeIndex {
        let (pos, end) = self.span();
        self.program.arena.add_composite_type(
            syntax_kind::TYPE_LITERAL,
            pos,
            end,
            CompositeTypeData {
                types: NodeList::new(),
            },
        )
    }

    /// `A | B` in type position.
    pub fn union_type(&mut self, members: Vec<NodeIndex>) -> NodeIndex {
        let (pos, end) = self.span();
        self.program.arena.add_composite_type(
            syntax_kind::UNION_TYPE,
            pos,
            end,
            CompositeTypeData {
                types: NodeList::from_vec(members),
            },
        )
    }

    // =====================================================================
    // Declarations
    // =====================================================================

    pub fn class(&mut self, name: &str, modifiers: ModifierFlags) -> NodeIndex {
        self.class_with_heritage(name, None, modifiers)
    }

    pub fn class_implementing(
        &mut self,
        name: &str,
        interfaces: &[&str],
        modifiers: ModifierFlags,
    ) -> NodeIndex {
        let types: Vec<NodeIndex> = interfaces.iter().map(|i| self.type_ref(i)).collect();
        let (pos, end) = self.span();
        let clause = self.program.arena.add_heritage_clause(
            pos,
            end,
            HeritageData {
                token: syntax_kind::IMPLEMENTS_KEYWORD,
                types: NodeList::from_vec(types),
            },
        );
        self.class_with_heritage(name, Some(NodeList::from_vec(vec![clause])), modifiers)
    }

    fn class_with_heritage(
        &mut self,
        name: &str,
        heritage_clauses: Option<NodeList>,
        modifiers: ModifierFlags,
    ) -> NodeIndex {
        // An empty name models an anonymous `export default class`.
        let name = if name.is_empty() {
            NodeIndex::NONE
        } else {
            self.ident(name)
        };
        let (pos, end) = self.span();
        self.program.arena.add_class(
            pos,
            end,
            ClassData {
                name,
                heritage_clauses,
            },
            modifiers,
        )
    }

    pub fn interface(&mut self, name: &str, modifiers: ModifierFlags) -> NodeIndex {
        let name = self.ident(name);
        let (pos, end) = self.span();
        self.program
            .arena
            .add_interface(pos, end, InterfaceData { name }, modifiers)
    }

    pub fn type_alias(&mut self, name: &str, target: &str, modifiers: ModifierFlags) -> NodeIndex {
        let name = self.ident(name);
        let type_node = self.type_ref(target);
        let (pos, end) = self.span();
        self.program
            .arena
            .add_type_alias(pos, end, TypeAliasData { name, type_node }, modifiers)
    }

    /// `const <name>: <type_name>;`
    pub fn const_annotated(&mut self, name: &str, type_name: &str) -> NodeIndex {
        let annotation = self.type_ref(type_name);
        self.const_decl(name, annotation, NodeIndex::NONE, ModifierFlags::empty())
    }

    /// `export const <name>: <type_name>;`
    pub fn const_annotated_exported(&mut self, name: &str, type_name: &str) -> NodeIndex {
        let annotation = self.type_ref(type_name);
        self.const_decl(name, annotation, NodeIndex::NONE, ModifierFlags::EXPORT)
    }

    /// `const <name> = new <class_name>();`
    pub fn const_new(&mut self, name: &str, class_name: &str) -> NodeIndex {
        let callee = self.ident(class_name);
        let initializer = self.new_expr(callee);
        self.const_decl(name, NodeIndex::NONE, initializer, ModifierFlags::empty())
    }

    /// `const <name> = new <ns>.<member>();`
    pub fn const_new_namespaced(&mut self, name: &str, ns: &str, member: &str) -> NodeIndex {
        let expression = self.ident(ns);
        let member = self.ident(member);
        let (pos, end) = self.span();
        let callee = self.program.arena.add_property_access(
            pos,
            end,
            AccessExprData {
                expression,
                name: member,
            },
        );
        let initializer = self.new_expr(callee);
        self.const_decl(name, NodeIndex::NONE, initializer, ModifierFlags::empty())
    }

    /// `const <name> = <initializer>;` for an already-built expression.
    pub fn const_init(&mut self, name: &str, initializer: NodeIndex) -> NodeIndex {
        self.const_decl(name, NodeIndex::NONE, initializer, ModifierFlags::empty())
    }

    fn new_expr(&mut self, callee: NodeIndex) -> NodeIndex {
        let (pos, end) = self.span();
        self.program.arena.add_call_expr(
            syntax_kind::NEW_EXPRESSION,
            pos,
            end,
            CallExprData {
                expression: callee,
                type_arguments: None,
                arguments: Some(NodeList::new()),
            },
        )
    }

    fn const_decl(
        &mut self,
        name: &str,
        type_annotation: NodeIndex,
        initializer: NodeIndex,
        modifiers: ModifierFlags,
    ) -> NodeIndex {
        let name = self.ident(name);
        let (pos, end) = self.span();
        let decl = self.program.arena.add_variable_declaration(
            pos,
            end,
            VariableDeclarationData {
                name,
                type_annotation,
                initializer,
            },
        );
        let (pos, end) = self.span();
        self.program.arena.add_variable_statement(
            pos,
            end,
            VariableData {
                declarations: NodeList::from_vec(vec![decl]),
            },
            NodeFlags::CONST,
            modifiers,
        )
    }

    // =====================================================================
    // Calls
    // =====================================================================

    /// `<receiver>.<method><type_args>(args);` as an expression statement.
    /// Returns `(statement, call expression)`.
    pub fn method_call(
        &mut self,
        receiver: &str,
        method: &str,
        type_args: Vec<NodeIndex>,
        args: Vec<NodeIndex>,
    ) -> (NodeIndex, NodeIndex) {
        let call = self.method_call_expr(receiver, method, type_args, args);
        let (pos, end) = self.span();
        let statement = self.program.arena.add_expression_statement(
            pos,
            end,
            crate::node::ExpressionStatementData { expression: call },
        );
        (statement, call)
    }

    /// The bare call expression, for use in initializer position.
    pub fn method_call_expr(
        &mut self,
        receiver: &str,
        method: &str,
        type_args: Vec<NodeIndex>,
        args: Vec<NodeIndex>,
    ) -> NodeIndex {
        let receiver = self.ident(receiver);
        let method = self.ident(method);
        let (pos, end) = self.span();
        let callee = self.program.arena.add_property_access(
            pos,
            end,
            AccessExprData {
                expression: receiver,
                name: method,
            },
        );
        let type_arguments = if type_args.is_empty() {
            None
        } else {
            Some(NodeList::from_vec(type_args))
        };
        let (pos, end) = self.span();
        self.program.arena.add_call_expr(
            syntax_kind::CALL_EXPRESSION,
            pos,
            end,
            CallExprData {
                expression: callee,
                type_arguments,
                arguments: Some(NodeList::from_vec(args)),
            },
        )
    }

    // =====================================================================
    // Imports and exports
    // =====================================================================

    /// `import { a, b as c } from "<from>";` where pairs are
    /// `(exported, local alias)`; a `None` alias binds the exported name.
    pub fn import_named(&mut self, bindings: &[(&str, Option<&str>)], from: &str) -> NodeIndex {
        self.import_named_with(bindings, from, false)
    }

    /// `import type { ... } from "<from>";`
    pub fn import_named_type_only(
        &mut self,
        bindings: &[(&str, Option<&str>)],
        from: &str,
    ) -> NodeIndex {
        self.import_named_with(bindings, from, true)
    }

    fn import_named_with(
        &mut self,
        bindings: &[(&str, Option<&str>)],
        from: &str,
        is_type_only: bool,
    ) -> NodeIndex {
        let mut elements = Vec::new();
        for (exported, alias) in bindings {
            let (property_name, name) = match alias {
                Some(alias) => (self.ident(exported), self.ident(alias)),
                None => (NodeIndex::NONE, self.ident(exported)),
            };
            let (pos, end) = self.span();
            elements.push(self.program.arena.add_specifier(
                syntax_kind::IMPORT_SPECIFIER,
                pos,
                end,
                SpecifierData {
                    is_type_only: false,
                    property_name,
                    name,
                },
            ));
        }
        let (pos, end) = self.span();
        let named = self.program.arena.add_named_imports(
            syntax_kind::NAMED_IMPORTS,
            pos,
            end,
            NamedImportsData {
                name: NodeIndex::NONE,
                elements: NodeList::from_vec(elements),
            },
        );
        self.import_decl(is_type_only, NodeIndex::NONE, named, from)
    }

    /// `import <local> from "<from>";`
    pub fn import_default(&mut self, local: &str, from: &str) -> NodeIndex {
        let name = self.ident(local);
        self.import_decl(false, name, NodeIndex::NONE, from)
    }

    /// `import * as <local> from "<from>";`
    pub fn import_namespace(&mut self, local: &str, from: &str) -> NodeIndex {
        let name = self.ident(local);
        let (pos, end) = self.span();
        let namespace = self.program.arena.add_named_imports(
            syntax_kind::NAMESPACE_IMPORT,
            pos,
            end,
            NamedImportsData {
                name,
                elements: NodeList::new(),
            },
        );
        self.import_decl(false, NodeIndex::NONE, namespace, from)
    }

    fn import_decl(
        &mut self,
        is_type_only: bool,
        default_name: NodeIndex,
        named_bindings: NodeIndex,
        from: &str,
    ) -> NodeIndex {
        let (pos, end) = self.span();
        let clause = self.program.arena.add_import_clause(
            pos,
            end,
            ImportClauseData {
                is_type_only,
                name: default_name,
                named_bindings,
            },
        );
        let module_specifier = self.string(from);
        let (pos, end) = self.span();
        self.program.arena.add_import_decl(
            pos,
            end,
            ImportDeclData {
                import_clause: clause,
                module_specifier,
            },
        )
    }

    /// `export { a, b as c };` where pairs are `(local, exported alias)`.
    pub fn export_named(&mut self, bindings: &[(&str, Option<&str>)]) -> NodeIndex {
        let clause = self.named_exports_clause(bindings);
        let (pos, end) = self.span();
        self.program.arena.add_export_decl(
            pos,
            end,
            ExportDeclData {
                is_type_only: false,
                is_default_export: false,
                export_clause: clause,
                module_specifier: NodeIndex::NONE,
            },
        )
    }

    /// `export { a, b as c } from "<from>";`
    pub fn export_named_from(
        &mut self,
        bindings: &[(&str, Option<&str>)],
        from: &str,
    ) -> NodeIndex {
        let clause = self.named_exports_clause(bindings);
        let module_specifier = self.string(from);
        let (pos, end) = self.span();
        self.program.arena.add_export_decl(
            pos,
            end,
            ExportDeclData {
                is_type_only: false,
                is_default_export: false,
                export_clause: clause,
                module_specifier,
            },
        )
    }

    /// `export * from "<from>";`
    pub fn export_star_from(&mut self, from: &str) -> NodeIndex {
        let module_specifier = self.string(from);
        let (pos, end) = self.span();
        self.program.arena.add_export_decl(
            pos,
            end,
            ExportDeclData {
                is_type_only: false,
                is_default_export: false,
                export_clause: NodeIndex::NONE,
                module_specifier,
            },
        )
    }

    /// `export default <local>;`
    pub fn export_default_name(&mut self, local: &str) -> NodeIndex {
        let clause = self.ident(local);
        let (pos, end) = self.span();
        self.program.arena.add_export_decl(
            pos,
            end,
            ExportDeclData {
                is_type_only: false,
                is_default_export: true,
                export_clause: clause,
                module_specifier: NodeIndex::NONE,
            },
        )
    }

    fn named_exports_clause(&mut self, bindings: &[(&str, Option<&str>)]) -> NodeIndex {
        let mut elements = Vec::new();
        for (local, alias) in bindings {
            let (property_name, name) = match alias {
                Some(alias) => (self.ident(local), self.ident(alias)),
                None => (NodeIndex::NONE, self.ident(local)),
            };
            let (pos, end) = self.span();
            elements.push(self.program.arena.add_specifier(
                syntax_kind::EXPORT_SPECIFIER,
                pos,
                end,
                SpecifierData {
                    is_type_only: false,
                    property_name,
                    name,
                },
            ));
        }
        let (pos, end) = self.span();
        self.program.arena.add_named_imports(
            syntax_kind::NAMED_EXPORTS,
            pos,
            end,
            NamedImportsData {
                name: NodeIndex::NONE,
                elements: NodeList::from_vec(elements),
            },
        )
    }

    // =====================================================================
    // Files
    // =====================================================================

    pub fn file(&mut self, name: &str, statements: Vec<NodeIndex>) -> FileId {
        let (pos, _) = self.span();
        let end = self.cursor;
        let file = self.program.arena.add_source_file(
            pos,
            end,
            SourceFileData {
                statements: NodeList::from_vec(statements),
                file_name: name.to_string(),
            },
        );
        self.program.add_file(file)
    }

    pub fn build(self) -> Program {
        self.program
    }
}

impl Default for ProgramBuilder {
    fn default() -> Self {
        ProgramBuilder::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_files_with_ordered_spans() {
        let mut b = ProgramBuilder::new();
        let class = b.class("Foo", ModifierFlags::EXPORT);
        let first = b.file("a.ts", vec![class]);
        let iface = b.interface("IBar", ModifierFlags::empty());
        let second = b.file("b.ts", vec![iface]);

        let program = b.build();
        assert_eq!(program.file_count(), 2);
        assert_eq!(program.file_name(first), "a.ts");
        assert_eq!(program.file_name(second), "b.ts");

        let class_node = program.arena.get(class).unwrap();
        let iface_node = program.arena.get(iface).unwrap();
        assert!(class_node.end <= iface_node.pos);
    }

    #[test]
    fn method_call_wires_receiver_and_type_args() {
        let mut b = ProgramBuilder::new();
        let t1 = b.type_ref("IFoo");
        let t2 = b.type_ref("Foo");
        let (stmt, call) = b.method_call("container", "registerSingleton", vec![t1, t2], vec![]);
        let program = b.build();

        let arena = &program.arena;
        let stmt_data = arena.get_expr_statement(arena.get(stmt).unwrap()).unwrap();
        assert_eq!(stmt_data.expression, call);

        let call_data = arena.get_call_expr(arena.get(call).unwrap()).unwrap();
        let access = arena.get_access_expr(arena.get(call_data.expression).unwrap()).unwrap();
        assert_eq!(arena.identifier_text(access.expression), Some("container"));
        assert_eq!(arena.identifier_text(access.name), Some("registerSingleton"));
        assert_eq!(call_data.type_arguments.as_ref().map(|l| l.len()), Some(2));
    }

    #[test]
    fn empty_type_args_produce_no_list() {
        let mut b = ProgramBuilder::new();
        let (_, call) = b.method_call("container", "get", vec![], vec![]);
        let program = b.build();
        let call_data = program
            .arena
            .get_call_expr(program.arena.get(call).unwrap())
            .unwrap();
        assert!(call_data.type_arguments.is_none());
    }
}

//! Class index coverage: descriptor facts and export-surface detection.

use dit_ast::node::ModifierFlags;
use dit_ast::ProgramBuilder;
use dit_binder::{ClassIndex, ExportKind, ModuleBindings};

#[test]
fn describes_exported_class_with_implements_clause() {
    let mut b = ProgramBuilder::new();
    let iface = b.interface("IFoo", ModifierFlags::empty());
    let class = b.class_implementing("Foo", &["IFoo"], ModifierFlags::EXPORT);
    let file = b.file("impl.ts", vec![iface, class]);

    let program = b.build();
    let bindings = ModuleBindings::bind(&program);
    let index = ClassIndex::build(&program, &bindings);

    assert_eq!(index.len(), 1);
    let descriptor = index.lookup(class).unwrap();
    assert_eq!(descriptor.name, "Foo");
    assert_eq!(descriptor.file, file);
    assert_eq!(descriptor.export, ExportKind::Named("Foo".to_string()));
    assert_eq!(descriptor.implements, vec!["IFoo".to_string()]);
}

#[test]
fn implements_resolves_through_import_alias() {
    let mut b = ProgramBuilder::new();
    let iface = b.interface("IFoo", ModifierFlags::EXPORT);
    b.file("types.ts", vec![iface]);

    let import = b.import_named(&[("IFoo", Some("Contract"))], "./types");
    let class = b.class_implementing("Foo", &["Contract"], ModifierFlags::EXPORT);
    b.file("impl.ts", vec![import, class]);

    let program = b.build();
    let bindings = ModuleBindings::bind(&program);
    let index = ClassIndex::build(&program, &bindings);

    // The descriptor carries the declared interface name, not the alias.
    let descriptor = index.lookup(class).unwrap();
    assert_eq!(descriptor.implements, vec!["IFoo".to_string()]);
}

#[test]
fn default_export_is_detected_from_modifiers_and_statements() {
    let mut b = ProgramBuilder::new();
    let inline = b.class("Foo", ModifierFlags::EXPORT | ModifierFlags::DEFAULT);
    b.file("inline.ts", vec![inline]);

    let separate = b.class("Bar", ModifierFlags::empty());
    let export_stmt = b.export_default_name("Bar");
    b.file("separate.ts", vec![separate, export_stmt]);

    let program = b.build();
    let bindings = ModuleBindings::bind(&program);
    let index = ClassIndex::build(&program, &bindings);

    assert_eq!(index.lookup(inline).unwrap().export, ExportKind::Default);
    assert_eq!(index.lookup(separate).unwrap().export, ExportKind::Default);
}

#[test]
fn aliased_export_statement_yields_the_alias() {
    let mut b = ProgramBuilder::new();
    let class = b.class("Foo", ModifierFlags::empty());
    let export_stmt = b.export_named(&[("Foo", Some("Renamed"))]);
    b.file("impl.ts", vec![class, export_stmt]);

    let program = b.build();
    let bindings = ModuleBindings::bind(&program);
    let index = ClassIndex::build(&program, &bindings);

    assert_eq!(
        index.lookup(class).unwrap().export,
        ExportKind::Named("Renamed".to_string())
    );
}

#[test]
fn unexported_class_is_marked_private() {
    let mut b = ProgramBuilder::new();
    let class = b.class("Hidden", ModifierFlags::empty());
    b.file("impl.ts", vec![class]);

    let program = b.build();
    let bindings = ModuleBindings::bind(&program);
    let index = ClassIndex::build(&program, &bindings);

    assert_eq!(index.lookup(class).unwrap().export, ExportKind::None);
}

#[test]
fn anonymous_classes_are_skipped() {
    let mut b = ProgramBuilder::new();
    let anonymous = b.class("", ModifierFlags::EXPORT | ModifierFlags::DEFAULT);
    let named = b.class("Foo", ModifierFlags::empty());
    b.file("impl.ts", vec![anonymous, named]);

    let program = b.build();
    let bindings = ModuleBindings::bind(&program);
    let index = ClassIndex::build(&program, &bindings);

    assert_eq!(index.len(), 1);
    assert!(index.lookup(anonymous).is_none());
    assert!(index.lookup(named).is_some());
}

#[test]
fn unresolvable_implements_entries_keep_written_text() {
    let mut b = ProgramBuilder::new();
    let class = b.class_implementing("Foo", &["IMissing"], ModifierFlags::empty());
    b.file("impl.ts", vec![class]);

    let program = b.build();
    let bindings = ModuleBindings::bind(&program);
    let index = ClassIndex::build(&program, &bindings);

    assert_eq!(
        index.lookup(class).unwrap().implements,
        vec!["IMissing".to_string()]
    );
}

//! Matcher coverage: which calls count as registration sites and which are
//! left alone.

mod util;

use dit_ast::node::ModifierFlags;
use dit_ast::ProgramBuilder;
use dit_binder::ModuleBindings;
use dit_rewriter::{CallSiteMatcher, RegistrationApi};

#[test]
fn finds_calls_on_an_imported_container() {
    let mut b = ProgramBuilder::new();
    let import = b.import_named(&[("DIContainer", None)], "@wessberg/di");
    let container = b.const_new("container", "DIContainer");
    let iface = b.interface("IFoo", ModifierFlags::empty());
    let class = b.class_implementing("Foo", &["IFoo"], ModifierFlags::empty());
    let t1 = b.type_ref("IFoo");
    let t2 = b.type_ref("Foo");
    let (stmt, call) = b.method_call("container", "registerSingleton", vec![t1, t2], vec![]);
    let file = b.file("main.ts", vec![import, container, iface, class, stmt]);
    let program = b.build();

    let bindings = ModuleBindings::bind(&program);
    let sites = CallSiteMatcher::find_call_sites(&program, &bindings, &RegistrationApi::default());

    assert_eq!(sites.len(), 1);
    let site = &sites[0];
    assert_eq!(site.file, file);
    assert_eq!(site.node, call);
    assert_eq!(site.method, "registerSingleton");
    assert_eq!(site.type_args.len(), 2);
    assert!(site.args.is_empty());
}

#[test]
fn finds_calls_on_an_annotated_receiver() {
    let mut b = ProgramBuilder::new();
    let container = b.const_annotated("container", "DIContainer");
    let t1 = b.type_ref("IFoo");
    let t2 = b.type_ref("Foo");
    let (stmt, call) = b.method_call("container", "registerTransient", vec![t1, t2], vec![]);
    b.file("main.ts", vec![container, stmt]);
    let program = b.build();

    let bindings = ModuleBindings::bind(&program);
    let sites = CallSiteMatcher::find_call_sites(&program, &bindings, &RegistrationApi::default());

    assert_eq!(sites.len(), 1);
    assert_eq!(sites[0].node, call);
    assert_eq!(sites[0].method, "registerTransient");
}

#[test]
fn matches_calls_in_initializer_position() {
    let mut b = ProgramBuilder::new();
    let container = b.const_annotated("container", "DIContainer");
    let t1 = b.type_ref("IFoo");
    let t2 = b.type_ref("Foo");
    let call = b.method_call_expr("container", "registerSingleton", vec![t1, t2], vec![]);
    let holder = b.const_init("handle", call);
    b.file("main.ts", vec![container, holder]);
    let program = b.build();

    let bindings = ModuleBindings::bind(&program);
    let sites = CallSiteMatcher::find_call_sites(&program, &bindings, &RegistrationApi::default());

    assert_eq!(sites.len(), 1);
    assert_eq!(sites[0].node, call);
}

#[test]
fn typed_calls_on_a_container_are_captured_for_dispatch() {
    // Method filtering happens at rewrite time; the matcher captures any
    // call that still carries type arguments on a container receiver.
    let mut b = ProgramBuilder::new();
    let container = b.const_annotated("container", "DIContainer");
    let t1 = b.type_ref("IFoo");
    let (stmt, call) = b.method_call("container", "get", vec![t1], vec![]);
    b.file("main.ts", vec![container, stmt]);
    let program = b.build();

    let bindings = ModuleBindings::bind(&program);
    let sites = CallSiteMatcher::find_call_sites(&program, &bindings, &RegistrationApi::default());

    assert_eq!(sites.len(), 1);
    assert_eq!(sites[0].node, call);
    assert_eq!(sites[0].method, "get");
}

#[test]
fn ignores_calls_without_type_arguments() {
    let mut b = ProgramBuilder::new();
    let container = b.const_annotated("container", "DIContainer");
    let (stmt, _) = b.method_call("container", "registerSingleton", vec![], vec![]);
    b.file("main.ts", vec![container, stmt]);
    let program = b.build();

    let bindings = ModuleBindings::bind(&program);
    let sites = CallSiteMatcher::find_call_sites(&program, &bindings, &RegistrationApi::default());

    assert!(sites.is_empty());
}

#[test]
fn ignores_receivers_that_are_not_containers() {
    let mut b = ProgramBuilder::new();
    let logger = b.const_annotated("logger", "Logger");
    let t1 = b.type_ref("IFoo");
    let t2 = b.type_ref("Foo");
    let (typed_stmt, _) = b.method_call("logger", "registerSingleton", vec![t1, t2], vec![]);
    // `ghost` is never declared at all.
    let t3 = b.type_ref("IFoo");
    let t4 = b.type_ref("Foo");
    let (ghost_stmt, _) = b.method_call("ghost", "registerSingleton", vec![t3, t4], vec![]);
    b.file("main.ts", vec![logger, typed_stmt, ghost_stmt]);
    let program = b.build();

    let bindings = ModuleBindings::bind(&program);
    let sites = CallSiteMatcher::find_call_sites(&program, &bindings, &RegistrationApi::default());

    assert!(sites.is_empty());
}

#[test]
fn custom_container_names_extend_the_surface() {
    let mut b = ProgramBuilder::new();
    let injector = b.const_annotated("injector", "Injector");
    let t1 = b.type_ref("IFoo");
    let t2 = b.type_ref("Foo");
    let (stmt, call) = b.method_call("injector", "registerSingleton", vec![t1, t2], vec![]);
    b.file("main.ts", vec![injector, stmt]);
    let program = b.build();

    let bindings = ModuleBindings::bind(&program);

    let default_api = RegistrationApi::default();
    assert!(CallSiteMatcher::find_call_sites(&program, &bindings, &default_api).is_empty());

    let extended = RegistrationApi::new().with_container("Injector");
    let sites = CallSiteMatcher::find_call_sites(&program, &bindings, &extended);
    assert_eq!(sites.len(), 1);
    assert_eq!(sites[0].node, call);
}

#[test]
fn module_specifier_restriction_filters_imported_containers() {
    let mut b = ProgramBuilder::new();

    let foreign_import = b.import_named(&[("DIContainer", None)], "other-di");
    let foreign = b.const_new("foreign", "DIContainer");
    let t1 = b.type_ref("IFoo");
    let t2 = b.type_ref("Foo");
    let (foreign_stmt, _) = b.method_call("foreign", "registerSingleton", vec![t1, t2], vec![]);
    b.file(
        "foreign.ts",
        vec![foreign_import, foreign, foreign_stmt],
    );

    let import = b.import_named(&[("DIContainer", None)], "@wessberg/di");
    let container = b.const_new("container", "DIContainer");
    let t3 = b.type_ref("IFoo");
    let t4 = b.type_ref("Foo");
    let (stmt, call) = b.method_call("container", "registerSingleton", vec![t3, t4], vec![]);
    b.file("main.ts", vec![import, container, stmt]);

    // Locally declared container types carry no specifier and always pass.
    let local = b.const_annotated("local", "DIContainer");
    let t5 = b.type_ref("IFoo");
    let t6 = b.type_ref("Foo");
    let (local_stmt, local_call) = b.method_call("local", "registerSingleton", vec![t5, t6], vec![]);
    b.file("local.ts", vec![local, local_stmt]);

    let program = b.build();
    let bindings = ModuleBindings::bind(&program);
    let api = RegistrationApi::new().with_module_specifier("@wessberg/di");
    let sites = CallSiteMatcher::find_call_sites(&program, &bindings, &api);

    let nodes: Vec<_> = sites.iter().map(|s| s.node).collect();
    assert_eq!(nodes, vec![call, local_call]);
}

#[test]
fn skips_calls_already_carrying_a_payload() {
    let mut b = ProgramBuilder::new();
    let container = b.const_annotated("container", "DIContainer");
    let payload = util::injected_payload(&mut b, "IFoo", "Foo");
    let t1 = b.type_ref("IFoo");
    let t2 = b.type_ref("Foo");
    let (stmt, _) = b.method_call("container", "registerSingleton", vec![t1, t2], vec![payload]);
    b.file("main.ts", vec![container, stmt]);
    let program = b.build();

    let bindings = ModuleBindings::bind(&program);
    let sites = CallSiteMatcher::find_call_sites(&program, &bindings, &RegistrationApi::default());

    assert!(sites.is_empty());
}

#[test]
fn an_unrelated_object_argument_is_not_a_payload() {
    let mut b = ProgramBuilder::new();
    let container = b.const_annotated("container", "DIContainer");
    // `{ identifier: "x" }` alone does not have the payload shape.
    let identifier_name = b.ident("identifier");
    let identifier_value = b.string("x");
    let arena = &mut b.program.arena;
    let prop = arena.add_property_assignment(
        0,
        0,
        dit_ast::node::PropertyAssignmentData {
            name: identifier_name,
            initializer: identifier_value,
        },
    );
    let object = arena.add_object_literal(
        0,
        0,
        dit_ast::node::LiteralExprData {
            elements: dit_ast::NodeList::from_vec(vec![prop]),
            multi_line: false,
        },
    );
    let t1 = b.type_ref("IFoo");
    let t2 = b.type_ref("Foo");
    let (stmt, call) = b.method_call("container", "registerSingleton", vec![t1, t2], vec![object]);
    b.file("main.ts", vec![container, stmt]);
    let program = b.build();

    let bindings = ModuleBindings::bind(&program);
    let sites = CallSiteMatcher::find_call_sites(&program, &bindings, &RegistrationApi::default());

    assert_eq!(sites.len(), 1);
    assert_eq!(sites[0].node, call);
    assert_eq!(sites[0].args.len(), 1);
}

#[test]
fn sites_come_back_in_file_then_source_order() {
    let mut b = ProgramBuilder::new();

    let container_a = b.const_annotated("container", "DIContainer");
    let t1 = b.type_ref("IFoo");
    let t2 = b.type_ref("Foo");
    let (first_stmt, first) = b.method_call("container", "registerSingleton", vec![t1, t2], vec![]);
    let t3 = b.type_ref("IBar");
    let t4 = b.type_ref("Bar");
    let (second_stmt, second) =
        b.method_call("container", "registerTransient", vec![t3, t4], vec![]);
    b.file("a.ts", vec![container_a, first_stmt, second_stmt]);

    let container_b = b.const_annotated("container", "DIContainer");
    let t5 = b.type_ref("IBaz");
    let t6 = b.type_ref("Baz");
    let (third_stmt, third) = b.method_call("container", "registerSingleton", vec![t5, t6], vec![]);
    b.file("b.ts", vec![container_b, third_stmt]);

    let program = b.build();
    let bindings = ModuleBindings::bind(&program);
    let sites = CallSiteMatcher::find_call_sites(&program, &bindings, &RegistrationApi::default());

    let nodes: Vec<_> = sites.iter().map(|s| s.node).collect();
    assert_eq!(nodes, vec![first, second, third]);
}

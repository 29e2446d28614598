//! Compile-time dependency injection transform for TypeScript registration
//! call sites.
//!
//! TypeScript DI containers are driven by type arguments, as in
//! `container.registerSingleton<IFoo, Foo>()`, and those erase at runtime.
//! This workspace rewrites such calls in place so the registration survives
//! emission: the interface's declared name travels as a string and the
//! implementation as a reference expression that is correct for the target
//! module format, the import kind (named, renamed, default, namespace), and
//! any re-export chain in between:
//!
//! ```text
//! container.registerSingleton<IFoo, Foo>()
//!   -> container.registerSingleton(undefined, { identifier: "IFoo", implementation: Foo.Foo })
//! ```
//!
//! The pipeline is split across member crates: `dit-ast` holds the arena
//! AST and the `Program` container, `dit-binder` builds per-file symbol
//! tables, import/export maps and the class index, and `dit-rewriter`
//! matches, resolves, and rewrites the call sites. Hosts either drive the
//! stages themselves (`ModuleBindings::bind` → `ClassIndex::build` →
//! `CallSiteMatcher::find_call_sites` → `RegistrationRewriter::update`) or
//! call [`transform`] to run them in order.

use tracing::debug;

pub mod tracing_config;

pub use dit_ast::{NodeArena, NodeIndex, Program, ProgramBuilder};
pub use dit_binder::{ClassDescriptor, ClassIndex, ExportKind, ImportBinding, ModuleBindings};
pub use dit_common::{Diagnostic, EmitOptions, FileId, ModuleKind, TextRange};
pub use dit_rewriter::{
    CallSite, CallSiteMatcher, EmitHelpers, InterfaceImplementationMap, PassError,
    RegistrationApi, RegistrationKind, RegistrationRewriter, RewriteError, RewriteOutcome,
    RewrittenSite, SkipReason, SkippedSite,
};

/// Everything a [`transform`] run produced.
#[derive(Debug)]
pub struct TransformResult {
    pub outcome: RewriteOutcome,
    /// Module-resolution diagnostics from the binding walk (unresolvable
    /// relative specifiers).
    pub binding_diagnostics: Vec<Diagnostic>,
}

impl TransformResult {
    /// Binding diagnostics followed by per-site rewrite diagnostics, in
    /// stable order.
    pub fn diagnostics(&self, program: &Program) -> Vec<Diagnostic> {
        let mut all = self.binding_diagnostics.clone();
        all.extend(self.outcome.diagnostics(program));
        all
    }

    /// The accumulated interface → implementation registry.
    pub fn interfaces(&self) -> &InterfaceImplementationMap {
        &self.outcome.interfaces
    }
}

/// Run the whole pipeline over a program: bind the module graph, index the
/// classes, find the registration call sites, and rewrite them in place.
///
/// `prior` seeds the registry; its entries win over registrations made
/// during this pass. Per-site failures are recorded in the outcome, never
/// returned as `Err`.
pub fn transform(
    program: &mut Program,
    api: &RegistrationApi,
    prior: InterfaceImplementationMap,
) -> Result<TransformResult, PassError> {
    let bindings = ModuleBindings::bind(program);
    let class_index = ClassIndex::build(program, &bindings);
    let call_sites = CallSiteMatcher::find_call_sites(program, &bindings, api);
    debug!(
        files = program.file_count(),
        classes = class_index.len(),
        call_sites = call_sites.len(),
        "transform input bound"
    );

    let outcome =
        RegistrationRewriter::update(program, &bindings, &call_sites, &class_index, prior)?;
    debug!(
        rewritten = outcome.rewritten.len(),
        skipped = outcome.skipped.len(),
        interfaces = outcome.interfaces.len(),
        "transform finished"
    );

    Ok(TransformResult {
        outcome,
        binding_diagnostics: bindings.diagnostics,
    })
}

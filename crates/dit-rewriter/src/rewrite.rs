//! The rewrite pass: payload construction, in-place call updates, and
//! registry accumulation.

use crate::errors::{PassError, RewriteError, SkipReason};
use crate::handlers::RegistrationKind;
use crate::matcher::{is_injected_payload, CallSite};
use crate::reference::{
    namespace_reference_helpers, plan_reference, synthesize_reference, EmitHelpers,
    ReferenceShape,
};
use crate::resolve_args::{resolve_implementation, resolve_interface_name, ResolvedImplementation};
use dit_ast::{NodeArena, NodeIndex, NodeList, Program};
use dit_binder::{ClassIndex, ModuleBindings};
use dit_common::{Diagnostic, FileId, TextRange};
use indexmap::IndexMap;
use rustc_hash::FxHashMap;
use serde::Serialize;
use tracing::debug;

/// Interface declared name → implementation name, in first-registration
/// order.
pub type InterfaceImplementationMap = IndexMap<String, String>;

/// A call the pass rewrote.
#[derive(Debug, Clone, Serialize)]
pub struct RewrittenSite {
    pub file: FileId,
    pub node: NodeIndex,
    pub span: TextRange,
    pub kind: RegistrationKind,
    pub interface: String,
    pub implementation: String,
}

/// A call the pass looked at and left alone.
#[derive(Debug, Clone)]
pub struct SkippedSite {
    pub file: FileId,
    pub span: TextRange,
    pub method: String,
    pub reason: SkipReason,
}

/// Everything a pass produced.
#[derive(Debug, Default)]
pub struct RewriteOutcome {
    /// Prior map entries plus this pass's registrations; earlier entries
    /// win conflicts.
    pub interfaces: InterfaceImplementationMap,
    pub rewritten: Vec<RewrittenSite>,
    pub skipped: Vec<SkippedSite>,
    /// Emit helpers each file needs because of synthesized references.
    pub helpers: FxHashMap<FileId, EmitHelpers>,
}

impl RewriteOutcome {
    /// Diagnostics for the per-site failures; no-op dispositions produce
    /// none.
    pub fn diagnostics(&self, program: &Program) -> Vec<Diagnostic> {
        self.skipped
            .iter()
            .filter_map(|site| {
                site.reason
                    .as_error()
                    .map(|error| error.to_diagnostic(program.file_name(site.file), site.span))
            })
            .collect()
    }
}

pub struct RegistrationRewriter;

impl RegistrationRewriter {
    /// Rewrite every eligible call site in place and accumulate the
    /// interface→implementation registry.
    ///
    /// Failures at individual sites are recorded in the outcome and never
    /// abort the pass; only an empty program does.
    pub fn update(
        program: &mut Program,
        bindings: &ModuleBindings,
        call_sites: &[CallSite],
        class_index: &ClassIndex,
        prior: InterfaceImplementationMap,
    ) -> Result<RewriteOutcome, PassError> {
        if program.is_empty() {
            return Err(PassError::EmptyProgram);
        }

        let mut outcome = RewriteOutcome {
            interfaces: prior,
            ..RewriteOutcome::default()
        };
        let options = program.options;

        for site in call_sites {
            let span = match program.arena.get(site.node) {
                Some(node) => TextRange::new(node.pos, node.end),
                None => {
                    outcome.skipped.push(SkippedSite {
                        file: site.file,
                        span: TextRange::EMPTY,
                        method: site.method.clone(),
                        reason: SkipReason::NotAMatch,
                    });
                    continue;
                }
            };
            let skip = |reason: SkipReason| SkippedSite {
                file: site.file,
                span,
                method: site.method.clone(),
                reason,
            };

            let kind = RegistrationKind::for_method(&site.method);
            if !kind.is_registration() || site.type_args.len() != kind.required_type_args() {
                outcome.skipped.push(skip(SkipReason::NotAMatch));
                continue;
            }

            // Hosts may hand the pass call sites it did not match itself;
            // re-check the trailing-payload guard before touching the call.
            if let Some(&last) = site.args.last()
                && is_injected_payload(&program.arena, last)
            {
                outcome.skipped.push(skip(SkipReason::AlreadyRewritten));
                continue;
            }

            let interface =
                match resolve_interface_name(program, bindings, site.file, site.type_args[0]) {
                    Ok(name) => name,
                    Err(error) => {
                        outcome.skipped.push(skip(SkipReason::Error(error)));
                        continue;
                    }
                };

            let implementation = match resolve_implementation(
                program,
                bindings,
                class_index,
                site.file,
                site.type_args[1],
            ) {
                Ok(resolved) => resolved,
                Err(error) => {
                    outcome.skipped.push(skip(SkipReason::Error(error)));
                    continue;
                }
            };

            let (shape, helpers, implementation_name) = match implementation {
                ResolvedImplementation::Class(descriptor) => {
                    let Some(binding) = bindings.binding_for(program, site.file, &descriptor)
                    else {
                        let error = RewriteError::MissingImportBinding {
                            class: descriptor.name.clone(),
                            declaring_file: program.file_name(descriptor.file).to_string(),
                        };
                        outcome.skipped.push(skip(SkipReason::Error(error)));
                        continue;
                    };
                    let (shape, helpers) = plan_reference(&binding, &descriptor.export, &options);
                    (shape, helpers, descriptor.name)
                }
                ResolvedImplementation::Namespace { local, .. } => {
                    let helpers = namespace_reference_helpers(&options);
                    (ReferenceShape::Local(local.clone()), helpers, local)
                }
            };

            // Write phase: synthesize the payload and update the call slots.
            rewrite_call(
                &mut program.arena,
                site,
                span,
                kind,
                &interface,
                &shape,
            );

            if !helpers.is_empty() {
                *outcome.helpers.entry(site.file).or_default() |= helpers;
            }
            if !outcome.interfaces.contains_key(&interface) {
                outcome
                    .interfaces
                    .insert(interface.clone(), implementation_name.clone());
            }
            debug!(
                interface = %interface,
                implementation = %implementation_name,
                method = %site.method,
                "rewrote registration"
            );
            outcome.rewritten.push(RewrittenSite {
                file: site.file,
                node: site.node,
                span,
                kind,
                interface,
                implementation: implementation_name,
            });
        }

        Ok(outcome)
    }
}

/// Build the payload and splice it into the call's argument list, clearing
/// the type arguments. The call node and its span survive unchanged.
fn rewrite_call(
    arena: &mut NodeArena,
    site: &CallSite,
    span: TextRange,
    kind: RegistrationKind,
    interface: &str,
    shape: &ReferenceShape,
) {
    let reference = synthesize_reference(arena, span, shape);
    let identifier_value = arena.synth_string_literal(interface, span);
    let identifier_prop = arena.synth_property_assignment("identifier", identifier_value, span);
    let implementation_prop = arena.synth_property_assignment("implementation", reference, span);
    let payload = arena.synth_object_literal(vec![identifier_prop, implementation_prop], span);

    let mut arguments = Vec::with_capacity(kind.leading_optional_slots() + site.args.len() + 1);
    let missing = kind
        .leading_optional_slots()
        .saturating_sub(site.args.len());
    for _ in 0..missing {
        arguments.push(arena.synth_undefined(span));
    }
    arguments.extend(site.args.iter().copied());
    arguments.push(payload);

    for &argument in &arguments {
        arena.reparent(argument, site.node);
    }
    if let Some(call) = arena.get_call_expr_mut(site.node) {
        call.type_arguments = None;
        call.arguments = Some(NodeList::from_vec(arguments));
    }
}

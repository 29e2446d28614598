//! Synthesizing the runtime reference to an implementation.
//!
//! Planning is a pure function of the binding, the class's export surface,
//! and the emit options; materialization writes the planned shape into the
//! arena with the call site's span. The two stages are split so the shape
//! logic is testable without an arena.

use bitflags::bitflags;
use dit_ast::{NodeArena, NodeIndex};
use dit_binder::{ExportKind, ImportBinding, ImportBindingKind};
use dit_common::{EmitOptions, TextRange};

bitflags! {
    /// Emit helpers a file needs because of references this pass created.
    /// The pass only marks; helper definitions are the emitter's job.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct EmitHelpers: u8 {
        const IMPORT_DEFAULT = 1 << 0;
        const IMPORT_STAR = 1 << 1;
    }
}

/// The shape of a reference expression before it is materialized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReferenceShape {
    /// A bare local identifier.
    Local(String),
    /// `receiver.property`.
    Property { receiver: String, property: String },
}

/// Decide how a reference must address the implementation from the call
/// site's file. Identical inputs produce identical shapes.
pub fn plan_reference(
    binding: &ImportBinding,
    export: &ExportKind,
    options: &EmitOptions,
) -> (ReferenceShape, EmitHelpers) {
    match &binding.kind {
        ImportBindingKind::SameFile => {
            (ReferenceShape::Local(binding.local.clone()), EmitHelpers::empty())
        }
        ImportBindingKind::Named { exported } => {
            // Module-object formats reach a named import as a property off
            // the local module binding; the property is the name on the
            // source module's surface, not the local alias.
            if options.module.uses_module_object() {
                (
                    ReferenceShape::Property {
                        receiver: binding.local.clone(),
                        property: exported.clone(),
                    },
                    EmitHelpers::empty(),
                )
            } else {
                (ReferenceShape::Local(binding.local.clone()), EmitHelpers::empty())
            }
        }
        ImportBindingKind::Default => {
            if binding.requires_interop_helper {
                (
                    ReferenceShape::Property {
                        receiver: binding.local.clone(),
                        property: "default".to_string(),
                    },
                    EmitHelpers::IMPORT_DEFAULT,
                )
            } else {
                (ReferenceShape::Local(binding.local.clone()), EmitHelpers::empty())
            }
        }
        ImportBindingKind::Namespace => {
            let property = match export {
                ExportKind::Default => "default".to_string(),
                ExportKind::Named(name) => name.clone(),
                // Unreachable through binding lookup; degrade to the bare
                // namespace object rather than fabricating a member.
                ExportKind::None => {
                    return (
                        ReferenceShape::Local(binding.local.clone()),
                        namespace_reference_helpers(options),
                    );
                }
            };
            (
                ReferenceShape::Property {
                    receiver: binding.local.clone(),
                    property,
                },
                namespace_reference_helpers(options),
            )
        }
    }
}

/// Helper marking for a reference through a namespace import binding.
pub fn namespace_reference_helpers(options: &EmitOptions) -> EmitHelpers {
    if options.es_module_interop && options.module.uses_module_object() {
        EmitHelpers::IMPORT_STAR
    } else {
        EmitHelpers::empty()
    }
}

/// Materialize a planned shape into the arena with the call site's span.
pub fn synthesize_reference(
    arena: &mut NodeArena,
    span: TextRange,
    shape: &ReferenceShape,
) -> NodeIndex {
    match shape {
        ReferenceShape::Local(name) => arena.synth_identifier(name, span),
        ReferenceShape::Property { receiver, property } => {
            let receiver = arena.synth_identifier(receiver, span);
            arena.synth_property_access(receiver, property, span)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dit_common::ModuleKind;

    fn named_binding(local: &str, exported: &str) -> ImportBinding {
        ImportBinding {
            local: local.to_string(),
            kind: ImportBindingKind::Named {
                exported: exported.to_string(),
            },
            requires_interop_helper: false,
        }
    }

    #[test]
    fn named_import_under_commonjs_uses_exported_property() {
        let binding = named_binding("Foo", "Bar");
        let options = EmitOptions::new(ModuleKind::CommonJS, false);
        let (shape, helpers) =
            plan_reference(&binding, &ExportKind::Named("Bar".to_string()), &options);
        assert_eq!(
            shape,
            ReferenceShape::Property {
                receiver: "Foo".to_string(),
                property: "Bar".to_string(),
            }
        );
        assert!(helpers.is_empty());
    }

    #[test]
    fn named_import_under_esm_stays_bare() {
        let binding = named_binding("Foo", "Bar");
        let options = EmitOptions::new(ModuleKind::ESNext, false);
        let (shape, helpers) =
            plan_reference(&binding, &ExportKind::Named("Bar".to_string()), &options);
        assert_eq!(shape, ReferenceShape::Local("Foo".to_string()));
        assert!(helpers.is_empty());
    }

    #[test]
    fn interop_default_marks_helper() {
        let binding = ImportBinding {
            local: "Foo".to_string(),
            kind: ImportBindingKind::Default,
            requires_interop_helper: true,
        };
        let options = EmitOptions::new(ModuleKind::CommonJS, true);
        let (shape, helpers) = plan_reference(&binding, &ExportKind::Default, &options);
        assert_eq!(
            shape,
            ReferenceShape::Property {
                receiver: "Foo".to_string(),
                property: "default".to_string(),
            }
        );
        assert_eq!(helpers, EmitHelpers::IMPORT_DEFAULT);
    }

    #[test]
    fn default_without_interop_stays_bare() {
        let binding = ImportBinding {
            local: "Foo".to_string(),
            kind: ImportBindingKind::Default,
            requires_interop_helper: false,
        };
        let options = EmitOptions::new(ModuleKind::UMD, false);
        let (shape, helpers) = plan_reference(&binding, &ExportKind::Default, &options);
        assert_eq!(shape, ReferenceShape::Local("Foo".to_string()));
        assert!(helpers.is_empty());
    }

    #[test]
    fn namespace_member_uses_export_name() {
        let binding = ImportBinding {
            local: "ns".to_string(),
            kind: ImportBindingKind::Namespace,
            requires_interop_helper: false,
        };
        let options = EmitOptions::new(ModuleKind::ESNext, false);

        let (shape, _) = plan_reference(&binding, &ExportKind::Named("Foo".to_string()), &options);
        assert_eq!(
            shape,
            ReferenceShape::Property {
                receiver: "ns".to_string(),
                property: "Foo".to_string(),
            }
        );

        let (shape, _) = plan_reference(&binding, &ExportKind::Default, &options);
        assert_eq!(
            shape,
            ReferenceShape::Property {
                receiver: "ns".to_string(),
                property: "default".to_string(),
            }
        );
    }

    #[test]
    fn namespace_reference_marks_import_star_only_under_interop() {
        let interop = EmitOptions::new(ModuleKind::CommonJS, true);
        assert_eq!(
            namespace_reference_helpers(&interop),
            EmitHelpers::IMPORT_STAR
        );
        let no_interop = EmitOptions::new(ModuleKind::CommonJS, false);
        assert!(namespace_reference_helpers(&no_interop).is_empty());
        let esm = EmitOptions::new(ModuleKind::ESNext, true);
        assert!(namespace_reference_helpers(&esm).is_empty());
    }
}

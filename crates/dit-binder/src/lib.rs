//! Module binding for registration call rewriting.
//!
//! The binder walks a program once and produces per-file tables of
//! declarations, imports, exports, and re-export edges
//! ([`ModuleBindings`]), plus a program-wide [`ClassIndex`]. The rewriter
//! queries these to resolve type arguments to declarations and to find the
//! runtime binding a synthesized reference must go through.

pub mod bind;
pub mod bindings;
pub mod class_index;
pub mod resolve;

pub use bind::ModuleBindings;
pub use bindings::{
    DeclarationRef, ExportTarget, FileBindings, ImportBinding, ImportBindingKind, ImportKind,
    ImportRecord, ResolvedType, TypeOrigin, TypeResolveError,
};
pub use class_index::{declared_name, ClassDescriptor, ClassIndex, ExportKind};

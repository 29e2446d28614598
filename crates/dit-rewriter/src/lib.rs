//! Registration call rewriting.
//!
//! TypeScript DI registrations like `container.registerSingleton<IFoo,
//! Foo>()` carry everything in type arguments, which vanish at runtime.
//! This pass rewrites each eligible call in place so the interface's
//! declared name and a correctly-addressed reference to the implementation
//! survive emission:
//!
//! ```text
//! container.registerSingleton<IFoo, Foo>()
//!   -> container.registerSingleton(undefined, { identifier: "IFoo", implementation: Foo })
//! ```
//!
//! The reference expression accounts for the target module format, import
//! aliasing, default exports, namespace imports, re-export chains, and the
//! esModuleInterop helpers. Hosts drive the pass as
//! [`CallSiteMatcher::find_call_sites`] followed by
//! [`RegistrationRewriter::update`].

pub mod errors;
pub mod handlers;
pub mod matcher;
pub mod reference;
pub mod resolve_args;
pub mod rewrite;

pub use errors::{PassError, RewriteError, SkipReason};
pub use handlers::RegistrationKind;
pub use matcher::{CallSite, CallSiteMatcher, RegistrationApi};
pub use reference::{plan_reference, synthesize_reference, EmitHelpers, ReferenceShape};
pub use resolve_args::{resolve_implementation, resolve_interface_name, ResolvedImplementation};
pub use rewrite::{
    InterfaceImplementationMap, RegistrationRewriter, RewriteOutcome, RewrittenSite, SkippedSite,
};

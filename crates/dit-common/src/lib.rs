//! Shared primitives for the dit transform pipeline.
//!
//! Everything here is independent of the AST and the rewrite engine: interned
//! strings, source spans, compile-target options, and the diagnostic types
//! that per-site failures are reported through.

pub mod diagnostics;
pub mod interner;
pub mod options;
pub mod span;

pub use diagnostics::{Diagnostic, DiagnosticCategory, DiagnosticRelatedInformation};
pub use interner::{Atom, Interner};
pub use options::{EmitOptions, ModuleKind};
pub use span::TextRange;

use serde::{Deserialize, Serialize};

/// Identifies a source file within a program.
///
/// FileIds are indices into the program's file list. `FileId::NONE` is the
/// sentinel for "no file" (unresolved module specifiers, synthesized nodes).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FileId(pub u32);

impl FileId {
    pub const NONE: FileId = FileId(u32::MAX);

    #[inline]
    pub fn is_none(self) -> bool {
        self == Self::NONE
    }

    #[inline]
    pub fn is_some(self) -> bool {
        self != Self::NONE
    }

    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

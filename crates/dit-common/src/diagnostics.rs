//! Diagnostic types for reporting per-site rewrite failures.
//!
//! The rewrite never aborts on a bad call site; failures are collected and
//! surfaced to the host as diagnostics against the offending span.

/// Stable diagnostic codes.
///
/// Module-resolution failures reuse the TypeScript code hosts already key
/// their tooling on; transform-specific failures live in the 9100 block.
pub mod codes {
    /// Cannot find module '{specifier}'.
    pub const CANNOT_FIND_MODULE: u32 = 2307;
    /// A registration's first type argument does not name an interface or
    /// type alias declaration.
    pub const UNRESOLVABLE_INTERFACE_TYPE: u32 = 9101;
    /// A registration's second type argument does not resolve to an indexed
    /// class declaration.
    pub const UNKNOWN_IMPLEMENTATION_CLASS: u32 = 9102;
    /// The implementation class is declared in another file but the call
    /// site's file has no import binding that reaches it.
    pub const MISSING_IMPORT_BINDING: u32 = 9103;
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DiagnosticCategory {
    Warning,
    Error,
    Suggestion,
    Message,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnosticRelatedInformation {
    pub category: DiagnosticCategory,
    pub code: u32,
    pub file: String,
    pub start: u32,
    pub length: u32,
    pub message_text: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub category: DiagnosticCategory,
    pub code: u32,
    pub file: String,
    pub start: u32,
    pub length: u32,
    pub message_text: String,
    pub related_information: Vec<DiagnosticRelatedInformation>,
}

impl Diagnostic {
    pub fn error(
        file: impl Into<String>,
        start: u32,
        length: u32,
        message: impl Into<String>,
        code: u32,
    ) -> Self {
        Self {
            category: DiagnosticCategory::Error,
            message_text: message.into(),
            code,
            file: file.into(),
            start,
            length,
            related_information: Vec::new(),
        }
    }

    pub fn warning(
        file: impl Into<String>,
        start: u32,
        length: u32,
        message: impl Into<String>,
        code: u32,
    ) -> Self {
        Self {
            category: DiagnosticCategory::Warning,
            message_text: message.into(),
            code,
            file: file.into(),
            start,
            length,
            related_information: Vec::new(),
        }
    }

    pub fn with_related(
        mut self,
        file: impl Into<String>,
        start: u32,
        length: u32,
        message: impl Into<String>,
    ) -> Self {
        self.related_information.push(DiagnosticRelatedInformation {
            category: DiagnosticCategory::Message,
            code: 0,
            file: file.into(),
            start,
            length,
            message_text: message.into(),
        });
        self
    }
}

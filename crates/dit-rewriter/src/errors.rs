//! Error types for the rewrite pass.
//!
//! Per-site failures never abort the pass; they are recorded as skip
//! dispositions and surfaced as diagnostics. Only precondition violations
//! return an error from the entry point.

use dit_common::diagnostics::codes;
use dit_common::{Diagnostic, TextRange};

/// Why a matched registration call could not be rewritten.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RewriteError {
    /// The first type argument does not name an interface, type alias, or
    /// class declaration.
    UnresolvableInterfaceType { written: String, detail: String },
    /// The second type argument does not resolve to an indexed class
    /// declaration or namespace import.
    UnknownImplementationClass { written: String, detail: String },
    /// The implementation class lives in another file and no runtime import
    /// binding in the call site's file reaches it. The transform never
    /// inserts imports.
    MissingImportBinding {
        class: String,
        declaring_file: String,
    },
}

impl RewriteError {
    pub fn code(&self) -> u32 {
        match self {
            RewriteError::UnresolvableInterfaceType { .. } => codes::UNRESOLVABLE_INTERFACE_TYPE,
            RewriteError::UnknownImplementationClass { .. } => codes::UNKNOWN_IMPLEMENTATION_CLASS,
            RewriteError::MissingImportBinding { .. } => codes::MISSING_IMPORT_BINDING,
        }
    }

    pub fn to_diagnostic(&self, file: impl Into<String>, span: TextRange) -> Diagnostic {
        Diagnostic::error(file, span.pos, span.len(), self.to_string(), self.code())
    }
}

impl std::fmt::Display for RewriteError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RewriteError::UnresolvableInterfaceType { written, detail } => {
                write!(
                    f,
                    "Type argument '{written}' does not name a registrable interface: {detail}"
                )
            }
            RewriteError::UnknownImplementationClass { written, detail } => {
                write!(
                    f,
                    "Type argument '{written}' does not resolve to a known implementation class: {detail}"
                )
            }
            RewriteError::MissingImportBinding {
                class,
                declaring_file,
            } => {
                write!(
                    f,
                    "Class '{class}' is declared in '{declaring_file}', but this file has no import binding that reaches it"
                )
            }
        }
    }
}

impl std::error::Error for RewriteError {}

/// Disposition of a call site the pass did not rewrite.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// Unknown method on a matched container, or a known method with the
    /// wrong type-argument count. Not an error.
    NotAMatch,
    /// The trailing argument is a previously-injected payload.
    AlreadyRewritten,
    Error(RewriteError),
}

impl SkipReason {
    pub fn as_error(&self) -> Option<&RewriteError> {
        match self {
            SkipReason::Error(error) => Some(error),
            _ => None,
        }
    }
}

/// Precondition violations that abort the pass before any site is visited.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PassError {
    /// The program has no files.
    EmptyProgram,
}

impl std::fmt::Display for PassError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PassError::EmptyProgram => write!(f, "program contains no source files"),
        }
    }
}

impl std::error::Error for PassError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn errors_map_to_stable_codes() {
        let interface = RewriteError::UnresolvableInterfaceType {
            written: "IFoo".to_string(),
            detail: "unresolved".to_string(),
        };
        assert_eq!(interface.code(), codes::UNRESOLVABLE_INTERFACE_TYPE);

        let class = RewriteError::UnknownImplementationClass {
            written: "Foo".to_string(),
            detail: "not indexed".to_string(),
        };
        assert_eq!(class.code(), codes::UNKNOWN_IMPLEMENTATION_CLASS);

        let binding = RewriteError::MissingImportBinding {
            class: "Foo".to_string(),
            declaring_file: "foo.ts".to_string(),
        };
        assert_eq!(binding.code(), codes::MISSING_IMPORT_BINDING);
    }

    #[test]
    fn diagnostic_carries_span_and_message() {
        let error = RewriteError::MissingImportBinding {
            class: "Foo".to_string(),
            declaring_file: "services/foo.ts".to_string(),
        };
        let diagnostic = error.to_diagnostic("main.ts", TextRange::new(10, 42));
        assert_eq!(diagnostic.code, codes::MISSING_IMPORT_BINDING);
        assert_eq!(diagnostic.file, "main.ts");
        assert_eq!(diagnostic.start, 10);
        assert_eq!(diagnostic.length, 32);
        assert!(diagnostic.message_text.contains("services/foo.ts"));
    }
}

//! Compile-target options the rewrite consults.
//!
//! Only the two switches that change reference synthesis are carried: the
//! target module format and whether default imports are wrapped by the
//! esModuleInterop helpers.

use serde::{Deserialize, Serialize};

/// Target module format for emitted code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ModuleKind {
    None,
    CommonJS,
    AMD,
    UMD,
    ES2015,
    #[default]
    ESNext,
}

impl ModuleKind {
    /// Formats that bind imported modules to a local namespace object
    /// (`var foo_1 = require("./foo")` and the AMD/UMD equivalents), so a
    /// named import is reached as a property off that object.
    #[inline]
    pub fn uses_module_object(self) -> bool {
        matches!(
            self,
            ModuleKind::CommonJS | ModuleKind::AMD | ModuleKind::UMD
        )
    }

    /// Formats that preserve ES module syntax, where import bindings are
    /// direct references.
    #[inline]
    pub fn is_es_module(self) -> bool {
        matches!(self, ModuleKind::ES2015 | ModuleKind::ESNext)
    }
}

/// Options governing how synthesized references address imported values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmitOptions {
    pub module: ModuleKind,
    /// When true, default imports from module-object formats go through the
    /// `__importDefault` wrapper and are reached as `local.default`.
    pub es_module_interop: bool,
}

impl Default for EmitOptions {
    fn default() -> Self {
        EmitOptions {
            module: ModuleKind::ESNext,
            es_module_interop: false,
        }
    }
}

impl EmitOptions {
    pub fn new(module: ModuleKind, es_module_interop: bool) -> Self {
        EmitOptions {
            module,
            es_module_interop,
        }
    }

    /// True when a default import binding must be unwrapped through the
    /// interop helper under these options.
    #[inline]
    pub fn default_import_needs_interop(&self) -> bool {
        self.es_module_interop && self.module.uses_module_object()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn module_object_formats() {
        assert!(ModuleKind::CommonJS.uses_module_object());
        assert!(ModuleKind::AMD.uses_module_object());
        assert!(ModuleKind::UMD.uses_module_object());
        assert!(!ModuleKind::ESNext.uses_module_object());
        assert!(!ModuleKind::None.uses_module_object());
    }

    #[test]
    fn interop_requires_module_object_format() {
        let esm = EmitOptions::new(ModuleKind::ESNext, true);
        assert!(!esm.default_import_needs_interop());
        let cjs = EmitOptions::new(ModuleKind::CommonJS, true);
        assert!(cjs.default_import_needs_interop());
        let cjs_no_interop = EmitOptions::new(ModuleKind::CommonJS, false);
        assert!(!cjs_no_interop.default_import_needs_interop());
    }
}

//! Dispatch from method names to registration handlers.

use once_cell::sync::Lazy;
use rustc_hash::FxHashMap;
use serde::Serialize;

/// The registration lifetimes the container API exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum RegistrationKind {
    /// `registerSingleton`: one instance per container.
    Singleton,
    /// `registerTransient`: a fresh instance per resolution.
    Transient,
    /// A method this pass does not handle. The call is left untouched.
    Unmatched,
}

static REGISTRATION_METHODS: Lazy<FxHashMap<&'static str, RegistrationKind>> = Lazy::new(|| {
    let mut methods = FxHashMap::default();
    methods.insert("registerSingleton", RegistrationKind::Singleton);
    methods.insert("registerTransient", RegistrationKind::Transient);
    methods
});

impl RegistrationKind {
    pub fn for_method(name: &str) -> RegistrationKind {
        REGISTRATION_METHODS
            .get(name)
            .copied()
            .unwrap_or(RegistrationKind::Unmatched)
    }

    #[inline]
    pub fn is_registration(self) -> bool {
        self != RegistrationKind::Unmatched
    }

    /// Both handled methods take `<Interface, Implementation>`.
    #[inline]
    pub fn required_type_args(self) -> usize {
        2
    }

    /// Leading optional argument slots before the injected payload: the
    /// instantiation-function parameter.
    #[inline]
    pub fn leading_optional_slots(self) -> usize {
        1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_methods_dispatch() {
        assert_eq!(
            RegistrationKind::for_method("registerSingleton"),
            RegistrationKind::Singleton
        );
        assert_eq!(
            RegistrationKind::for_method("registerTransient"),
            RegistrationKind::Transient
        );
    }

    #[test]
    fn unknown_methods_are_unmatched() {
        assert_eq!(
            RegistrationKind::for_method("registerWidget"),
            RegistrationKind::Unmatched
        );
        assert_eq!(RegistrationKind::for_method("get"), RegistrationKind::Unmatched);
        assert!(!RegistrationKind::Unmatched.is_registration());
    }
}

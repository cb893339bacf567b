use crate::errors::MabelError;

/// Either a valid value or the accumulated list of everything wrong with it.
///
/// The merge engine never stops at the first bad key: each independent
/// sub-combine reports its own errors and `map2` concatenates them, so a
/// single run surfaces every conflict at once. The `Invalid` list is
/// non-empty by construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Validated<T> {
    Valid(T),
    Invalid(Vec<MabelError>),
}

impl<T> Validated<T> {
    pub fn valid(value: T) -> Self {
        Validated::Valid(value)
    }

    pub fn invalid(error: MabelError) -> Self {
        Validated::Invalid(vec![error])
    }

    /// Wrap a list of errors. Callers must pass at least one.
    pub fn invalid_all(errors: Vec<MabelError>) -> Self {
        debug_assert!(!errors.is_empty(), "Invalid requires at least one error");
        Validated::Invalid(errors)
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, Validated::Valid(_))
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Validated<U> {
        match self {
            Validated::Valid(t) => Validated::Valid(f(t)),
            Validated::Invalid(errs) => Validated::Invalid(errs),
        }
    }

    /// Combine two validations, keeping errors from both sides.
    pub fn map2<U, V>(self, other: Validated<U>, f: impl FnOnce(T, U) -> V) -> Validated<V> {
        match (self, other) {
            (Validated::Valid(a), Validated::Valid(b)) => Validated::Valid(f(a, b)),
            (Validated::Invalid(mut a), Validated::Invalid(b)) => {
                a.extend(b);
                Validated::Invalid(a)
            }
            (Validated::Invalid(a), _) => Validated::Invalid(a),
            (_, Validated::Invalid(b)) => Validated::Invalid(b),
        }
    }

    pub fn into_result(self) -> Result<T, Vec<MabelError>> {
        match self {
            Validated::Valid(t) => Ok(t),
            Validated::Invalid(errs) => Err(errs),
        }
    }
}

impl<T> From<Result<T, MabelError>> for Validated<T> {
    fn from(result: Result<T, MabelError>) -> Self {
        match result {
            Ok(t) => Validated::Valid(t),
            Err(e) => Validated::invalid(e),
        }
    }
}

//! Typed outcome of device-originated queries

/// Outcome of a query whose result may come back in an unexpected shape
///
/// `Mismatch` still carries a value so callers that only want the plain
/// value (`into_value`) see the same thing as before: an empty key for a
/// failed lookup, the requested key for a reset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryOutcome<T> {
    /// The server answered with the expected result type
    Confirmed(T),
    /// The server answered with some other result type
    Mismatch(T),
}

/// Outcome of an access-key query
pub type AccessKeyOutcome = QueryOutcome<String>;

impl<T> QueryOutcome<T> {
    pub fn is_confirmed(&self) -> bool {
        matches!(self, Self::Confirmed(_))
    }

    pub fn value(&self) -> &T {
        match self {
            Self::Confirmed(value) | Self::Mismatch(value) => value,
        }
    }

    pub fn into_value(self) -> T {
        match self {
            Self::Confirmed(value) | Self::Mismatch(value) => value,
        }
    }
}

impl AccessKeyOutcome {
    pub fn key(&self) -> &str {
        self.value()
    }
}

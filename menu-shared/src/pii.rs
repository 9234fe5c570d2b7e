use serde::Deserialize;
use std::fmt;

/// Wraps a credential (plain password or bcrypt hash) so that it never shows
/// up in `Debug`/`Display` output, e.g. when a request body is traced.
///
/// No `Serialize` impl: secrets only flow inward.
#[derive(Clone, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct Masked<T>(pub T);

impl<T> fmt::Debug for Masked<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "********")
    }
}

impl<T> fmt::Display for Masked<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "********")
    }
}

impl<T> Masked<T> {
    pub fn expose(&self) -> &T {
        &self.0
    }

    pub fn into_inner(self) -> T {
        self.0
    }
}

impl Masked<String> {
    /// Empty strings count as "not provided" in request bodies.
    pub fn is_blank(&self) -> bool {
        self.0.is_empty()
    }
}

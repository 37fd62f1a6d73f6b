use facet::Facet;
use std::borrow::Borrow;
use std::fmt;

/// Canonical, uppercase name of an async resource type (`PROMISE`, `TIMEOUT`, ...).
///
/// The taxonomy is open-ended: any string is a valid tag. Construction
/// normalizes case so lookups are case-insensitive.
#[derive(Facet, Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeTag(String);

impl TypeTag {
    pub fn new(value: impl AsRef<str>) -> Self {
        Self(value.as_ref().to_uppercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Case-insensitive comparison against a raw, possibly non-canonical name.
    pub fn matches(&self, raw: &str) -> bool {
        self.0 == raw.to_uppercase()
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for TypeTag {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for TypeTag {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for TypeTag {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

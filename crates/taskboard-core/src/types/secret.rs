//! A string that never prints itself.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::value::SqlValue;

/// Sensitive text such as a password hash.
///
/// `Debug` and `Display` redact the content. The plain value only leaves
/// the wrapper through [`Secret::expose`] or when bound as a parameter.
#[derive(Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Secret(String);

impl Secret {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret(**********)")
    }
}

impl fmt::Display for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("**********")
    }
}

impl From<&Secret> for SqlValue {
    fn from(secret: &Secret) -> Self {
        SqlValue::Text(secret.0.clone())
    }
}

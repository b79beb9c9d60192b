//! Strongly-typed identifiers for backend jobs and their owners.
//!
//! The backend treats both as opaque strings. The only rules enforced here are
//! the ones that keep them safe to splice into a request path.

use core::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::error::IdError;

/// Identifier of a backend analysis job.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct JobId(String);

/// Identifier of the patient or practitioner that owns a job.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct OwnerId(String);

fn validate(kind: &'static str, value: &str) -> Result<(), IdError> {
    if value.trim().is_empty() {
        return Err(IdError::Empty(kind));
    }
    if value.contains('/') {
        return Err(IdError::IllegalCharacter {
            kind,
            value: value.to_string(),
        });
    }
    Ok(())
}

macro_rules! impl_string_newtype {
    ($t:ty, $name:literal) => {
        impl $t {
            /// Validate and wrap an identifier.
            pub fn new(value: impl Into<String>) -> Result<Self, IdError> {
                let value = value.into();
                validate($name, &value)?;
                Ok(Self(value))
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl core::fmt::Display for $t {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl AsRef<str> for $t {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl TryFrom<String> for $t {
            type Error = IdError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$t> for String {
            fn from(value: $t) -> Self {
                value.0
            }
        }

        impl FromStr for $t {
            type Err = IdError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::new(s)
            }
        }
    };
}

impl_string_newtype!(JobId, "JobId");
impl_string_newtype!(OwnerId, "OwnerId");

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn empty_and_blank_ids_are_rejected() {
        assert_eq!(JobId::new(""), Err(IdError::Empty("JobId")));
        assert_eq!(OwnerId::new("   "), Err(IdError::Empty("OwnerId")));
    }

    #[test]
    fn slash_is_rejected() {
        let err = JobId::new("a/b").unwrap_err();
        assert!(matches!(err, IdError::IllegalCharacter { kind: "JobId", .. }));
    }

    #[test]
    fn deserialize_validates() {
        let ok: JobId = serde_json::from_str("\"65f0c2\"").unwrap();
        assert_eq!(ok.as_str(), "65f0c2");

        let bad = serde_json::from_str::<JobId>("\"\"");
        assert!(bad.is_err());
    }

    proptest! {
        /// Any non-blank string without a slash is accepted verbatim.
        #[test]
        fn accepts_path_safe_strings(s in "[A-Za-z0-9_-]{1,40}") {
            let id = JobId::new(s.clone()).unwrap();
            prop_assert_eq!(id.to_string(), s);
        }
    }
}

//! Domain identifier types with validation
//!
//! Newtype wrappers for the identifiers the export subsystem passes around.
//! Each type rejects empty or whitespace-only values so an artifact GID can
//! never be confused with a group id or an operation id at compile time.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

macro_rules! identifier {
    ($(#[$meta:meta])* $name:ident, $label:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            #[doc = concat!("Creates a new `", stringify!($name), "`, rejecting empty values")]
            pub fn new(id: impl Into<String>) -> Result<Self, String> {
                let id = id.into();
                if id.trim().is_empty() {
                    return Err(concat!($label, " cannot be empty").to_string());
                }
                Ok(Self(id))
            }

            /// Returns the identifier as a string slice
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consumes self and returns the inner String
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::new(s)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl TryFrom<String> for $name {
            type Error = String;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }
    };
}

identifier!(
    /// Globally unique identifier of a stored artifact
    ///
    /// # Examples
    ///
    /// ```
    /// use satchel::domain::ids::Gid;
    ///
    /// let gid: Gid = "sim-001".parse().unwrap();
    /// assert_eq!(gid.as_str(), "sim-001");
    /// ```
    Gid,
    "GID"
);

identifier!(
    /// Type tag of an artifact (e.g. `TimeSeries`, `Connectivity`)
    ///
    /// The tag doubles as the type name embedded in export file names.
    TypeTag,
    "Type tag"
);

identifier!(
    /// Identifier of a homogeneous artifact group
    GroupId,
    "Group ID"
);

identifier!(
    /// Identifier of the operation that produced an artifact
    ///
    /// On disk this is the base name of the operation folder.
    OperationId,
    "Operation ID"
);

identifier!(
    /// Name of the project an artifact belongs to
    ProjectName,
    "Project name"
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gid_creation() {
        let gid = Gid::new("sim-001").unwrap();
        assert_eq!(gid.as_str(), "sim-001");
        assert_eq!(gid.to_string(), "sim-001");
    }

    #[test]
    fn test_empty_identifiers_fail() {
        assert!(Gid::new("").is_err());
        assert!(TypeTag::new("   ").is_err());
        assert!(GroupId::new("").is_err());
        assert!(OperationId::new("\t").is_err());
        assert!(ProjectName::new("").is_err());
    }

    #[test]
    fn test_error_message_names_the_identifier() {
        assert_eq!(Gid::new("").unwrap_err(), "GID cannot be empty");
        assert_eq!(GroupId::new(" ").unwrap_err(), "Group ID cannot be empty");
    }

    #[test]
    fn test_type_tag_from_str() {
        let tag: TypeTag = "TimeSeries".parse().unwrap();
        assert_eq!(tag.as_ref(), "TimeSeries");
    }

    #[test]
    fn test_serde_roundtrip_is_transparent() {
        let op = OperationId::new("17").unwrap();
        let json = serde_json::to_string(&op).unwrap();
        assert_eq!(json, "\"17\"");
        let back: OperationId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, op);
    }

    #[test]
    fn test_deserialize_rejects_empty() {
        assert!(serde_json::from_str::<Gid>("\"\"").is_err());
    }
}

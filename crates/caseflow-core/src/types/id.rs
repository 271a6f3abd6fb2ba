//! Newtype wrappers around opaque string identifiers.
//!
//! Session and user identifiers are assigned by the transport layer and
//! treated as opaque strings. Using distinct types prevents accidentally
//! passing a `SessionId` where a `UserId` is expected.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Macro to define a newtype ID wrapper around an opaque `String`.
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            /// Create an identifier from an existing string value.
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            /// Return the identifier as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Return the inner string value.
            pub fn into_string(self) -> String {
                self.0
            }

            /// Whether the identifier is empty.
            pub fn is_empty(&self) -> bool {
                self.0.is_empty()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> String {
                id.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

define_id!(
    /// Unique identifier for a staff user.
    UserId
);

define_id!(
    /// Unique identifier for one live client connection, assigned by the
    /// transport layer. A fresh id is expected per connection.
    SessionId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_id_display() {
        let id = SessionId::new("ws-4f2a");
        assert_eq!(id.to_string(), "ws-4f2a");
    }

    #[test]
    fn test_user_id_from_str() {
        let id: UserId = "agent-007".into();
        assert_eq!(id.as_str(), "agent-007");
    }

    #[test]
    fn test_is_empty() {
        assert!(SessionId::new("").is_empty());
        assert!(!SessionId::new("s1").is_empty());
    }

    #[test]
    fn test_serde_roundtrip() {
        let id = UserId::new("u-123");
        let json = serde_json::to_string(&id).expect("serialize");
        assert_eq!(json, "\"u-123\"");
        let parsed: UserId = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(id, parsed);
    }
}

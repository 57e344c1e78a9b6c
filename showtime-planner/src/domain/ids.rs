//! Identifier newtypes.
//!
//! Identities are opaque strings chosen by whoever records the entity. They
//! are kept distinct at the type level so an event's movie reference can't
//! be confused with its theater reference.

use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create an identifier from any string-like value.
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Returns the identifier as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }
    };
}

string_id!(
    /// Identity of a movie.
    MovieId
);

string_id!(
    /// Identity of a theater.
    TheaterId
);

string_id!(
    /// Identity of a recorded showtime.
    EventId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_and_debug() {
        let id = MovieId::new("m1");
        assert_eq!(id.to_string(), "m1");
        assert_eq!(format!("{id:?}"), "MovieId(m1)");
        assert_eq!(format!("{:?}", TheaterId::from("t9")), "TheaterId(t9)");
    }

    #[test]
    fn serializes_as_plain_string() {
        let id = EventId::new("e-42");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"e-42\"");

        let back: EventId = serde_json::from_str("\"e-42\"").unwrap();
        assert_eq!(back, id);
    }
}

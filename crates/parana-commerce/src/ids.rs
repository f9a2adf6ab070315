//! Newtype IDs for type-safe identifiers.
//!
//! Using newtypes prevents accidentally mixing up different ID types,
//! e.g., passing a ProductId where a SellerId is expected.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Macro to generate newtype ID structs over database row ids.
macro_rules! define_id {
    ($name:ident) => {
        /// A unique identifier.
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Create an ID from a raw row id.
            pub const fn new(id: i64) -> Self {
                Self(id)
            }

            /// Get the raw row id.
            pub const fn get(&self) -> i64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<i64> for $name {
            fn from(id: i64) -> Self {
                Self(id)
            }
        }
    };
}

// Define all ID types
define_id!(ShopperId);
define_id!(CategoryId);
define_id!(ProductId);
define_id!(SellerId);
define_id!(BasketId);
define_id!(OrderId);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_creation() {
        let id = ProductId::new(123);
        assert_eq!(id.get(), 123);
    }

    #[test]
    fn test_id_from_i64() {
        let id: ProductId = 456.into();
        assert_eq!(id.get(), 456);
    }

    #[test]
    fn test_id_display() {
        let id = BasketId::new(789);
        assert_eq!(format!("{}", id), "789");
    }

    #[test]
    fn test_id_equality() {
        let id1 = SellerId::new(7);
        let id2 = SellerId::new(7);
        let id3 = SellerId::new(8);

        assert_eq!(id1, id2);
        assert_ne!(id1, id3);
    }
}

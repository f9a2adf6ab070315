//! Shopper identity.

use crate::ids::ShopperId;
use serde::{Deserialize, Serialize};

/// A shopper. Looked up at session start, never mutated here.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Shopper {
    /// Unique shopper identifier.
    pub id: ShopperId,
    /// First name.
    pub first_name: String,
    /// Surname.
    pub surname: String,
}

impl Shopper {
    /// Full display name.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.surname)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_name() {
        let shopper = Shopper {
            id: ShopperId::new(1),
            first_name: "Alice".into(),
            surname: "Hargreaves".into(),
        };
        assert_eq!(shopper.full_name(), "Alice Hargreaves");
    }
}

//! Typed identifiers for type-safe entity references.
//!
//! Ledger identifiers are opaque strings issued by the upstream ERP
//! (e.g. `"FRN001"`). Wrapping them prevents passing an item id where a
//! counterparty id is expected.

use serde::{Deserialize, Serialize};

/// Macro to generate typed string identifier wrappers.
macro_rules! typed_id {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            /// Creates an ID from any string-like value.
            #[must_use]
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            /// Returns the identifier as a string slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Returns true if the identifier is empty or whitespace only.
            #[must_use]
            pub fn is_blank(&self) -> bool {
                self.0.trim().is_empty()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }
    };
}

typed_id!(ItemId, "Identifier of an outstanding ledger item.");
typed_id!(
    CounterpartyId,
    "Identifier of a counterparty (supplier or customer)."
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_detection() {
        assert!(CounterpartyId::new("").is_blank());
        assert!(CounterpartyId::new("   ").is_blank());
        assert!(!CounterpartyId::new("FRN001").is_blank());
    }

    #[test]
    fn test_serde_transparent() {
        let id = ItemId::from("INV-2024-001");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"INV-2024-001\"");

        let back: ItemId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn test_ordering_is_lexicographic() {
        let mut ids = vec![
            CounterpartyId::from("FRN010"),
            CounterpartyId::from("FRN002"),
            CounterpartyId::from("CLT001"),
        ];
        ids.sort();
        assert_eq!(
            ids.iter().map(CounterpartyId::as_str).collect::<Vec<_>>(),
            vec!["CLT001", "FRN002", "FRN010"]
        );
    }
}

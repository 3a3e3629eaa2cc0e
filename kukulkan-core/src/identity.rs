//! Identity
//!
//! Every node, attribute, graph and subscriber receives an identifier when it is
//! constructed. Identifiers are drawn from a single process-wide counter so
//! two objects never share one, whatever their type, and a value is never
//! handed out twice.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Counter shared by all identifier types.
static ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Generate the next raw identifier value.
fn next_raw() -> u64 {
    ID_COUNTER.fetch_add(1, Ordering::Relaxed)
}

macro_rules! identifier {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(u64);

        impl $name {
            /// Generate a new unique identifier.
            pub(crate) fn new() -> Self {
                Self(next_raw())
            }

            /// Get the raw identifier value.
            pub fn raw(&self) -> u64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "#{}", self.0)
            }
        }
    };
}

identifier!(
    /// Identifier of a [`Node`](crate::graph::Node).
    NodeId
);

identifier!(
    /// Identifier of an [`Attribute`](crate::graph::Attribute).
    AttributeId
);

identifier!(
    /// Identifier of a [`Graph`](crate::graph::Graph).
    GraphId
);

identifier!(
    /// Identifier of a change [`Subscriber`](crate::graph::Subscriber).
    SubscriberId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_unique_across_types() {
        let node = NodeId::new();
        let attribute = AttributeId::new();
        let graph = GraphId::new();

        assert_ne!(node.raw(), attribute.raw());
        assert_ne!(attribute.raw(), graph.raw());
        assert_ne!(node.raw(), graph.raw());

        let subscriber = SubscriberId::new();
        assert!(subscriber.raw() > graph.raw());
    }

    #[test]
    fn ids_are_never_reused() {
        let first = AttributeId::new();
        let second = AttributeId::new();
        assert!(second.raw() > first.raw());
    }

    #[test]
    fn display_uses_hash_prefix() {
        let id = NodeId(42);
        assert_eq!(id.to_string(), "#42");
    }
}

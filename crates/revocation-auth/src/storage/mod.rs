//! Storage traits for authorization rules.

pub mod memory;
pub mod rules;

pub use memory::InMemoryAuthorizationRulesStore;
pub use rules::AuthorizationRulesStore;

/// Type alias for a shareable rules store.
pub type DynRulesStore = std::sync::Arc<dyn AuthorizationRulesStore>;

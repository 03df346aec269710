//! Shared traits for console entities.

/// Trait for list items addressable by a stable identifier.
///
/// Every row the console manages (withdrawal, campaign, admin user) carries
/// a server-assigned id; optimistic list reconciliation targets rows by it.
pub trait HasId {
    fn id(&self) -> &str;
}

impl HasId for String {
    fn id(&self) -> &str {
        self
    }
}

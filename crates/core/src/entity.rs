//! Catalog records that carry a storage-assigned identity.

/// A record the data service identifies by id.
///
/// Ids are assigned on insert, so a record that has not been stored yet
/// reports `None`.
pub trait Entity {
    type Id: Copy + Eq + core::hash::Hash + core::fmt::Debug;

    fn id(&self) -> Option<Self::Id>;

    fn is_persisted(&self) -> bool {
        self.id().is_some()
    }
}

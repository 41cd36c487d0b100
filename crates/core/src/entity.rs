//! Entity trait: identity that survives state changes.

/// Entity marker + minimal interface.
///
/// Stores key records by `id()`; two entities with the same id are the same
/// record even if their other fields differ.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Copy + Eq + Ord + core::hash::Hash + core::fmt::Debug;

    /// Returns the entity identifier.
    fn id(&self) -> Self::Id;
}

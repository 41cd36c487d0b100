//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Value objects have **no identity**: two instances holding the same values
/// are equal and interchangeable. They are immutable; "changing" one means
/// building a new value.
///
/// ```ignore
/// #[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// struct Price(u64);
///
/// impl ValueObject for Price {}
///
/// assert_eq!(Price(150), Price(150));
/// ```
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}

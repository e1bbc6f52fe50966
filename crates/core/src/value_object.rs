//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Value objects have no identity of their own: two instances with the same
/// attribute values are interchangeable. Line-item attributes are the main
/// example here; they are copied wholesale whenever a unit is duplicated or a
/// group grows, so "the same" attributes must compare equal.
///
/// ```ignore
/// #[derive(Debug, Clone, PartialEq)]
/// struct Packaging {
///     unit: String,
///     per_case: u32,
/// }
///
/// impl ValueObject for Packaging {}
/// ```
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}

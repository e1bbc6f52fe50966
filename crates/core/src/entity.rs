//! Entity trait: identity + continuity across state changes.

/// Entity marker + minimal interface.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the entity identifier.
    fn id(&self) -> &Self::Id;
}

/// Returns the first identifier that occurs more than once in `entities`.
///
/// Used by callers that own an identity counter to assert their precondition
/// that no live identifier was handed out twice.
pub fn first_duplicate_id<'a, E>(entities: impl IntoIterator<Item = &'a E>) -> Option<E::Id>
where
    E: Entity + 'a,
{
    let mut seen = std::collections::HashSet::new();
    entities
        .into_iter()
        .map(|entity| entity.id())
        .find(|id| !seen.insert(*id))
        .cloned()
}

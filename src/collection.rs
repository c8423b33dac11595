use std::borrow::Cow;
use std::collections::HashSet;

use crate::model::Entity;

/// Prepends every candidate whose id is set and not yet present.
///
/// Candidates keep their given order and are deduplicated against each
/// other (first occurrence wins). Candidates without an id are dropped.
/// When nothing qualifies the input slice comes back as
/// `Cow::Borrowed`, so callers can tell "unchanged" apart from "rebuilt".
pub fn add_to_collection_if_missing<'a, 'c, E, I>(
    collection: &'a [E],
    candidates: I,
) -> Cow<'a, [E]>
where
    E: Entity,
    I: IntoIterator<Item = Option<&'c E>>,
{
    let mut seen: HashSet<i64> = collection.iter().filter_map(Entity::id).collect();

    let to_add: Vec<E> = candidates
        .into_iter()
        .flatten()
        .filter(|candidate| match candidate.id() {
            Some(id) => seen.insert(id),
            None => false,
        })
        .cloned()
        .collect();

    if to_add.is_empty() {
        return Cow::Borrowed(collection);
    }

    let mut merged = to_add;
    merged.extend_from_slice(collection);
    Cow::Owned(merged)
}

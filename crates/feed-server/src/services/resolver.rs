//! Reference resolution: an inline join between two collections

use crate::services::ServiceError;
use crate::storage::{Entity, Repository};

/// Inlines the referenced child document into each parent.
///
/// `key` names the child a parent references, `rebuild` produces the
/// denormalized parent. A parent whose reference does not resolve (the key
/// is absent, or the child was removed) is dropped from the result, so the
/// output may be shorter than the input.
///
/// Single pass over `parents`, one read per parent, no writes.
pub async fn inline_join<P, C, K, B>(
    parents: Vec<P>,
    children: &Repository<C>,
    key: K,
    rebuild: B,
) -> Result<Vec<P>, ServiceError>
where
    C: Entity,
    K: Fn(&P) -> Option<String>,
    B: Fn(P, C) -> P,
{
    let mut resolved = Vec::with_capacity(parents.len());

    for parent in parents {
        let Some(child_id) = key(&parent) else {
            continue;
        };
        if let Some(child) = children.find_by_id(&child_id).await? {
            resolved.push(rebuild(parent, child));
        }
    }

    Ok(resolved)
}

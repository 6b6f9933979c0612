//! Collection path resolution.
//!
//! Walks parent links from a collection up to its root, producing the path
//! segments for its directory in the mirror tree. The walk is iterative with
//! a visited-set guard: the parent graph comes from the library database and
//! is not trusted to be acyclic or fully resolvable.

use std::collections::{HashMap, HashSet};

use thiserror::Error;

use crate::catalog::Collection;

/// Errors raised when a collection's ancestry cannot be resolved.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PathError {
    /// A collection (or one of its ancestors) references a parent id that is
    /// not present in the loaded collection map.
    #[error("dangling collection reference: id {0} is not in the loaded library")]
    DanglingParent(i64),

    /// Following parent links revisited a collection.
    #[error("cyclic collection reference detected at id {0}")]
    ParentCycle(i64),
}

/// Resolves a collection's full path as segments ordered from the outermost
/// ancestor down to the collection itself.
///
/// # Errors
///
/// Returns [`PathError::DanglingParent`] if an id along the chain is missing
/// from `collections`, or [`PathError::ParentCycle`] if the chain loops.
pub fn resolve_collection_path(
    collection_id: i64,
    collections: &HashMap<i64, Collection>,
) -> Result<Vec<&str>, PathError> {
    let mut segments = Vec::new();
    let mut visited = HashSet::new();
    let mut current = Some(collection_id);

    while let Some(id) = current {
        if !visited.insert(id) {
            return Err(PathError::ParentCycle(id));
        }
        let collection = collections.get(&id).ok_or(PathError::DanglingParent(id))?;
        segments.push(collection.name.as_str());
        current = collection.parent_id;
    }

    segments.reverse();
    Ok(segments)
}

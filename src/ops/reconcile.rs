use crate::model::{Item, ItemKind, UNKNOWN_STATUS};

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ReconcileError {
    #[error("item index {index} out of range (have {len} items)")]
    OutOfRange { index: usize, len: usize },
}

/// What a reconciliation did to the collection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reconciled {
    Merged,
    Appended,
}

/// Merge a partial remote result into `items[index]`.
///
/// Only fields the remote actually reported are copied: lists when non-empty,
/// strings when non-empty, the issue number when nonzero. A status equal to
/// the `Unknown` placeholder is ignored. The target's `id` is never touched.
/// `index == items.len()` appends the partial item; anything beyond is
/// rejected without modifying the collection.
pub fn reconcile(items: &mut Vec<Item>, index: usize, partial: Item) -> Result<Reconciled, ReconcileError> {
    if index == items.len() {
        items.push(partial);
        return Ok(Reconciled::Appended);
    }
    let Some(target) = items.get_mut(index) else {
        return Err(ReconcileError::OutOfRange {
            index,
            len: items.len(),
        });
    };
    merge_into(target, partial);
    Ok(Reconciled::Merged)
}

fn merge_into(target: &mut Item, partial: Item) {
    if !partial.assignees.is_empty() {
        target.assignees = partial.assignees;
    }
    if !partial.labels.is_empty() {
        target.labels = partial.labels;
    }
    replace_if_set(&mut target.title, partial.title);
    if partial.status != UNKNOWN_STATUS {
        replace_if_set(&mut target.status, partial.status);
    }
    replace_if_set(&mut target.priority, partial.priority);
    replace_if_set(&mut target.repository, partial.repository);
    replace_if_set(&mut target.milestone, partial.milestone);
    replace_if_set(&mut target.description, partial.description);
    replace_if_set(&mut target.url, partial.url);
    replace_if_set(&mut target.content_id, partial.content_id);
    if partial.number != 0 {
        target.number = partial.number;
    }
    if partial.kind != ItemKind::Unknown {
        target.kind = partial.kind;
    }
    if partial.iteration.is_some() {
        target.iteration = partial.iteration;
    }
    for (name, values) in partial.field_values {
        if !values.is_empty() {
            target.field_values.insert(name, values);
        }
    }
    if partial.updated_at.is_some() {
        target.updated_at = partial.updated_at;
    }
}

fn replace_if_set(slot: &mut String, incoming: String) {
    if !incoming.is_empty() {
        *slot = incoming;
    }
}

//! Ordinal keys of owned collection elements.
//!
//! Elements are numbered from 1 in enumeration order. When any element
//! holds a persisted ordinal that no longer matches its position, every
//! element first gets a distinct negative placeholder, so no two elements
//! share an ordinal while the permanent numbers are handed out.

use super::{ChangeTracker, EntityState, EntryId};
use crate::metadata::Property;
use crate::native::{NativeValue, StaticType};

/// Renumbers `elements` and reports whether any of them is not
/// `Unchanged` afterwards.
pub(crate) fn reconcile<T>(tracker: &mut T, ordinal: Option<&Property>, elements: &[EntryId]) -> bool
where
    T: ChangeTracker + ?Sized,
{
    if let Some(ordinal) = ordinal {
        if has_stale_ordinal(tracker, ordinal, elements) {
            for (i, &element) in elements.iter().enumerate() {
                let placeholder = -(position(i));
                tracker.set_temporary_value(element, ordinal, ordinal_value(ordinal, placeholder));
            }
        }
    }

    let mut changed = false;
    for (i, &element) in elements.iter().enumerate() {
        if let Some(ordinal) = ordinal {
            if tracker.has_temporary_value(element, ordinal) {
                tracker.set_store_generated_value(element, ordinal, ordinal_value(ordinal, position(i)));
            }
        }
        changed |= tracker.state(element) != EntityState::Unchanged;
    }
    changed
}

/// Whether any element carries a non-temporary ordinal other than its
/// 1-based position.
fn has_stale_ordinal<T>(tracker: &T, ordinal: &Property, elements: &[EntryId]) -> bool
where
    T: ChangeTracker + ?Sized,
{
    elements.iter().enumerate().any(|(i, &element)| {
        !tracker.has_temporary_value(element, ordinal)
            && tracker.current_value(element, ordinal).as_i64() != Some(position(i))
    })
}

fn position(index: usize) -> i64 {
    i64::try_from(index).map_or(i64::MAX, |i| i.saturating_add(1))
}

fn ordinal_value(ordinal: &Property, value: i64) -> NativeValue {
    match ordinal.static_type().underlying() {
        StaticType::I64 => NativeValue::I64(value),
        _ => i32::try_from(value).map_or(NativeValue::I64(value), NativeValue::I32),
    }
}

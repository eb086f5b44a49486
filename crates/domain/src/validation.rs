//! Validator building blocks
//!
//! Every spec type implements [`Validate`]. `old` is `None` on create and the
//! previously accepted (defaulted) spec on update. Checks append to a
//! [`FieldErrors`] list and never stop early.

use crate::shared_kernel::{FieldError, FieldErrors, FieldPath};
use serde::Serialize;
use std::collections::HashSet;

pub trait Validate {
    fn validate(&self, old: Option<&Self>) -> FieldErrors;
}

/// Reports `path` when `new` differs from its previously accepted value
pub fn check_immutable<T>(errors: &mut FieldErrors, path: FieldPath, new: &T, old: &T)
where
    T: PartialEq + Serialize,
{
    if new != old {
        errors.push(FieldError::invalid(path, new, "field is immutable"));
    }
}

/// Names in a list must be non-empty and unique
pub fn check_unique_names<'a>(
    errors: &mut FieldErrors,
    list: &FieldPath,
    field: &str,
    names: impl IntoIterator<Item = &'a str>,
) {
    let mut seen = HashSet::new();
    for (i, name) in names.into_iter().enumerate() {
        let path = list.index(i).child(field);
        if name.is_empty() {
            errors.push(FieldError::required(path, "must be specified"));
        } else if !seen.insert(name) {
            errors.push(FieldError::duplicate(path, name));
        }
    }
}

/// Growth-only rule for lists of named elements.
///
/// A name that did not exist in the old list is tolerated as long as the
/// number of such names does not exceed the number of elements added;
/// past that count every unknown name is reported as a change.
pub fn check_named_list_growth<'a>(
    errors: &mut FieldErrors,
    list: &FieldPath,
    field: &str,
    new: &[&'a str],
    old: &[&'a str],
) {
    let known: HashSet<&str> = old.iter().copied().collect();
    let allowance = new.len().saturating_sub(old.len());
    let mut unknown = 0;

    for (i, name) in new.iter().enumerate() {
        if known.contains(name) {
            continue;
        }
        unknown += 1;
        if unknown > allowance {
            errors.push(FieldError::invalid(
                list.index(i).child(field),
                *name,
                "field is immutable",
            ));
        }
    }
}

/// Sub-fields that require a toggle, e.g. `rpcUsers` without `rpc`
pub fn check_requires(
    errors: &mut FieldErrors,
    path: FieldPath,
    present: bool,
    value: impl Serialize,
    toggle: &str,
    enabled: bool,
) {
    if present && !enabled {
        errors.push(FieldError::invalid(
            path,
            value,
            format!("must be none if {toggle} is not enabled"),
        ));
    }
}

/// `0x` followed by 40 hex digits
pub fn is_address(value: &str) -> bool {
    value
        .strip_prefix("0x")
        .is_some_and(|hex| hex.len() == 40 && hex.chars().all(|c| c.is_ascii_hexdigit()))
}

pub fn check_address(errors: &mut FieldErrors, path: FieldPath, value: &str) {
    if !is_address(value) {
        errors.push(FieldError::invalid(path, value, "must be a valid address"));
    }
}

/// `0x` followed by an even, non-zero number of hex digits
pub fn is_hex_string(value: &str) -> bool {
    value.strip_prefix("0x").is_some_and(|hex| {
        !hex.is_empty() && hex.len() % 2 == 0 && hex.chars().all(|c| c.is_ascii_hexdigit())
    })
}

/// `0x`-prefixed hex quantity, e.g. `0x47b760`
pub fn is_hex_number(value: &str) -> bool {
    value
        .strip_prefix("0x")
        .is_some_and(|hex| !hex.is_empty() && hex.chars().all(|c| c.is_ascii_hexdigit()))
}

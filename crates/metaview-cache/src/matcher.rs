//! Prefix/delimiter matching in the manner of object-store list APIs

/// Match `object_name` against a list request
///
/// Returns `None` when the name is not under `prefix`, or when it equals a
/// non-empty `prefix` (a directory is never listed as its own child).
/// Otherwise returns either the full name, or, when the part after the
/// prefix contains `delimiter`, the name cut just after the first delimiter
/// occurrence. An empty prefix or delimiter counts as none.
#[must_use]
pub fn match_list_prefix<'a>(
    prefix: Option<&str>,
    delimiter: Option<&str>,
    object_name: &'a str,
) -> Option<&'a str> {
    if object_name.is_empty() {
        return None;
    }
    let prefix = prefix.unwrap_or_default();
    let remainder = object_name.strip_prefix(prefix)?;
    if remainder.is_empty() {
        return None;
    }

    let cut = delimiter
        .filter(|d| !d.is_empty())
        .and_then(|d| remainder.find(d).map(|pos| pos + d.len()));
    match cut {
        Some(end) => Some(&object_name[..prefix.len() + end]),
        None => Some(object_name),
    }
}

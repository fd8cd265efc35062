//! Key helpers for the `/`-separated hierarchical key space.
//!
//! Service records live at `"/{srv_type}/{srv_no}"`; watching the parent
//! `"/{srv_type}"` subscribes to every record of that type.

/// Key of the node holding all records of one service type.
pub fn srv_type_key(srv_type: u32) -> String {
    format!("/{srv_type}")
}

/// Key of a single service record.
pub fn srv_key(
    srv_type: u32,
    srv_no: u32,
) -> String {
    format!("/{srv_type}/{srv_no}")
}

/// Splits a key into its path segments.
///
/// Keys of length <= 1 or keys not rooted at `/` yield an empty segment
/// list; callers treat that as an invalid (empty) path.
pub fn split_path(path: &str) -> Vec<&str> {
    if path.len() <= 1 || !path.starts_with('/') {
        return Vec::new();
    }

    path[1..].split('/').collect()
}

/// Parses a service key back into its `(srv_type, srv_no)` pair.
///
/// Returns `None` when the key has fewer than two segments or either
/// segment is not an integer.
pub fn srv_type_and_no(key: &str) -> Option<(u32, u32)> {
    let segments = split_path(key);
    if segments.len() < 2 {
        return None;
    }

    let srv_type = segments[0].parse::<u32>().ok()?;
    let srv_no = segments[1].parse::<u32>().ok()?;
    Some((srv_type, srv_no))
}

/// Parent of a key: the prefix up to (excluding) the last `/`.
///
/// Only keys whose last `/` sits at an index greater than zero have a
/// parent; top-level keys such as `"/7"` do not.
pub fn parent_key(key: &str) -> Option<&str> {
    match key.rfind('/') {
        Some(idx) if idx > 0 => Some(&key[..idx]),
        _ => None,
    }
}

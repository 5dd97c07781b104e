//! ROS graph name resolution
//!
//! Names come in three forms:
//! - absolute: `/chatter`
//! - relative: `chatter`, resolved against the namespace
//! - private: `~status`, resolved under the node's own name
//!
//! A resolved name maps onto a Zenoh key expression by prefixing the domain:
//! `/chatter` on domain 0 becomes `0/chatter`.

use crate::error::{ChatterError, ChatterResult};

/// Check that an absolute name is well formed
///
/// `/` alone is the root namespace. Every other name is one or more segments
/// of `[A-Za-z_][A-Za-z0-9_]*` separated by single slashes.
pub fn validate(name: &str) -> ChatterResult<()> {
    if name.is_empty() {
        return Err(ChatterError::invalid_topic(name, "name is empty"));
    }
    if !name.starts_with('/') {
        return Err(ChatterError::invalid_topic(name, "name is not absolute"));
    }
    if name == "/" {
        return Ok(());
    }

    for segment in name[1..].split('/') {
        let mut chars = segment.chars();
        let first = match chars.next() {
            Some(c) => c,
            None => return Err(ChatterError::invalid_topic(name, "empty segment")),
        };
        if !(first.is_ascii_alphabetic() || first == '_') {
            return Err(ChatterError::invalid_topic(
                name,
                format!("segment '{}' must start with a letter or '_'", segment),
            ));
        }
        if let Some(bad) = chars.find(|c| !(c.is_ascii_alphanumeric() || *c == '_')) {
            return Err(ChatterError::invalid_topic(
                name,
                format!("character '{}' is not allowed", bad),
            ));
        }
    }
    Ok(())
}

fn join(base: &str, name: &str) -> String {
    if base.ends_with('/') {
        format!("{}{}", base, name)
    } else {
        format!("{}/{}", base, name)
    }
}

/// Resolve `name` to an absolute, validated graph name
///
/// The root namespace `/` is not a topic, so it never resolves.
pub fn resolve(name: &str, namespace: &str, node_name: &str) -> ChatterResult<String> {
    if name.is_empty() {
        return Err(ChatterError::invalid_topic(name, "name is empty"));
    }
    let resolved = if name.starts_with('/') {
        name.to_string()
    } else if let Some(private) = name.strip_prefix('~') {
        let private = private.trim_start_matches('/');
        if private.is_empty() {
            return Err(ChatterError::invalid_topic(name, "private name has no base"));
        }
        join(&join(namespace, node_name), private)
    } else {
        join(namespace, name)
    };

    if resolved == "/" {
        return Err(ChatterError::invalid_topic(name, "root namespace is not a topic"));
    }
    validate(&resolved)?;
    Ok(resolved)
}

/// Zenoh key expression for a resolved topic on a domain
pub fn key_expr(domain_id: u32, resolved: &str) -> String {
    format!("{}/{}", domain_id, resolved.trim_start_matches('/'))
}

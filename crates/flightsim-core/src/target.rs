//! Target identifiers and display-host derivation.
//!
//! A target is an opaque string produced by a simulator: either a bare host
//! (`example.com`, `10.0.0.1`) or a `host:port` pair. The orchestrator only
//! ever looks inside it to decide which hostname to narrate.

/// Splits `host:port` into its parts.
///
/// Bracketed IPv6 literals (`[::1]:53`) are supported. Returns `None` when the
/// string has no port separator, has too many colons (a bare IPv6 address), or
/// has misplaced brackets.
pub fn split_host_port(target: &str) -> Option<(&str, &str)> {
    let (host, port) = if let Some(rest) = target.strip_prefix('[') {
        let end = rest.find(']')?;
        let after = &rest[end + 1..];
        let port = after.strip_prefix(':')?;
        if port.contains(':') {
            return None;
        }
        (&rest[..end], port)
    } else {
        let colon = target.rfind(':')?;
        let host = &target[..colon];
        if host.contains(':') {
            return None;
        }
        (host, &target[colon + 1..])
    };

    if host.contains('[') || host.contains(']') || port.contains('[') || port.contains(']') {
        return None;
    }
    Some((host, port))
}

/// Hostname shown in progress lines for a target.
///
/// Never fails: anything that does not split as `host:port` is returned whole.
pub fn display_host(target: &str) -> &str {
    match split_host_port(target) {
        Some((host, _)) => host,
        None => target,
    }
}

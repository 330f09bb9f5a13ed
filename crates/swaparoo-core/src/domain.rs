/// Canonical form of a block-list entry: trimmed, lowercase, no leading wildcard or dot
pub fn normalize_domain(domain: &str) -> Option<String> {
    let normalized = domain.trim().to_lowercase();
    let normalized = normalized
        .strip_prefix("*.")
        .unwrap_or(normalized.as_str())
        .trim_start_matches('.')
        .trim_end_matches('.');

    if normalized.is_empty() {
        None
    } else {
        Some(normalized.to_string())
    }
}

/// True when `hostname` equals a blocked entry or is a subdomain of one
pub fn is_domain_blocked(hostname: &str, blocked_domains: &[String]) -> bool {
    let hostname = hostname.trim().to_lowercase();
    let hostname = hostname.trim_end_matches('.');

    blocked_domains.iter().any(|blocked| {
        hostname == blocked
            || hostname
                .strip_suffix(blocked.as_str())
                .is_some_and(|prefix| prefix.ends_with('.'))
    })
}

use url::Url;

/// Returns true when `candidate` is an absolute URL whose host contains
/// `allowed_domain`. Anything that fails to parse is simply rejected.
pub fn is_allowed_url(candidate: &str, allowed_domain: &str) -> bool {
    let Ok(parsed) = Url::parse(candidate.trim()) else {
        return false;
    };
    match parsed.host_str() {
        Some(host) => host.contains(&allowed_domain.to_lowercase()),
        None => false,
    }
}

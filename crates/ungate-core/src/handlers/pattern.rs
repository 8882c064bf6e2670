//! URL matching rules for handler selection.

use regex::Regex;
use url::Url;

/// How a handler claims a page. Matching is deterministic and side-effect
/// free: the same address always matches the same way.
#[derive(Debug, Clone)]
pub enum UrlPattern {
    /// Regular expression over the full address.
    Regex(Regex),
    /// Host equals the suffix or is a subdomain of it.
    HostSuffix(&'static str),
}

impl UrlPattern {
    /// Pattern from a regex literal. Handler patterns are static; a bad one
    /// is a programming error caught on registry construction.
    pub fn regex(pattern: &str) -> Self {
        UrlPattern::Regex(Regex::new(pattern).expect("handler pattern must compile"))
    }

    pub fn matches(&self, address: &str) -> bool {
        match self {
            UrlPattern::Regex(re) => re.is_match(address),
            UrlPattern::HostSuffix(suffix) => Url::parse(address)
                .ok()
                .and_then(|u| u.host_str().map(|h| host_matches(h, suffix)))
                .unwrap_or(false),
        }
    }
}

fn host_matches(host: &str, suffix: &str) -> bool {
    host == suffix
        || host
            .strip_suffix(suffix)
            .is_some_and(|rest| rest.ends_with('.'))
}

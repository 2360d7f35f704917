//! Built-in defaults used when no configuration file is present.

use crate::dns::types::{ResolverEntry, ResolverList};

/// Default record type queried for every domain.
pub const DEFAULT_RECORD_TYPE: &str = "A";

/// Default per-query timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: f64 = 2.0;

/// Resolvers benchmarked when the user supplies none.
pub const DEFAULT_RESOLVERS: &[(&str, &str)] = &[
    ("Google DNS", "8.8.8.8"),
    ("Cloudflare DNS (unfiltered)", "1.1.1.1"),
];

/// Popular sites that most resolvers answer from cache or close to it.
pub const DEFAULT_DOMAINS: &[&str] = &[
    "google.com",
    "youtube.com",
    "facebook.com",
    "wikipedia.org",
    "amazon.com",
    "instagram.com",
    "whatsapp.com",
    "x.com",
    "linkedin.com",
    "netflix.com",
    "microsoft.com",
    "apple.com",
    "github.com",
    "reddit.com",
    "elpais.com",
    "marca.com",
    "rtve.es",
    "bbc.co.uk",
    "spiegel.de",
    "lemonde.fr",
];

/// The default resolver list.
#[must_use]
pub fn default_resolvers() -> ResolverList {
    ResolverList::from_entries(
        DEFAULT_RESOLVERS
            .iter()
            .map(|(label, address)| ResolverEntry::new(*label, *address))
            .collect(),
    )
}

/// The default domain list.
#[must_use]
pub fn default_domains() -> Vec<String> {
    DEFAULT_DOMAINS.iter().map(|d| (*d).to_string()).collect()
}

//! Probe engine: one bounded query per domain against one resolver.
//!
//! The engine never fails as a whole. Every domain yields exactly one
//! [`ProbeSample`], either a latency or a classified error, so a resolver
//! that cannot even be reached still produces a full sample vector.

#![allow(clippy::missing_errors_doc)]

use crate::dns::types::{ProbeErrorKind, ProbeSample};
use crate::error::{Error, Result};
use futures::future::BoxFuture;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::time::{Duration, Instant};
use trust_dns_resolver::config::{NameServerConfigGroup, ResolverConfig, ResolverOpts};
use trust_dns_resolver::error::{ResolveError, ResolveErrorKind};
use trust_dns_resolver::proto::error::ProtoErrorKind;
use trust_dns_resolver::proto::op::ResponseCode;
use trust_dns_resolver::proto::rr::RecordType;
use trust_dns_resolver::TokioAsyncResolver;

/// Port used when the address does not carry one.
pub const DEFAULT_DNS_PORT: u16 = 53;

/// Something that can measure a resolver against a list of domains.
///
/// Implementations must return exactly one sample per domain, in order.
pub trait Probe: Send + Sync {
    /// Query every domain once against `address`, bounded by `timeout`.
    fn probe<'a>(
        &'a self,
        address: &'a str,
        domains: &'a [String],
        record_type: RecordType,
        timeout: Duration,
    ) -> BoxFuture<'a, Vec<ProbeSample>>;
}

/// Probe backed by `trust-dns-resolver`.
///
/// A fresh resolver is built for every probe call, pinned to the single
/// name server under test, with caching and retries disabled.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResolverProbe;

impl ResolverProbe {
    /// Create a new `ResolverProbe`.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Build a resolver that only talks to `address`.
    fn build_resolver(address: &str, timeout: Duration) -> Result<TokioAsyncResolver> {
        let addr = parse_address(address)?;

        let config = ResolverConfig::from_parts(
            None,
            vec![],
            NameServerConfigGroup::from_ips_clear(&[addr.ip()], addr.port(), true),
        );

        let mut opts = ResolverOpts::default();
        opts.timeout = timeout;
        opts.attempts = 1;
        opts.cache_size = 0;
        opts.use_hosts_file = false;
        opts.num_concurrent_reqs = 1;

        Ok(TokioAsyncResolver::tokio(config, opts)?)
    }

    /// Issue a single query and turn its outcome into a sample.
    async fn query_once(
        resolver: &TokioAsyncResolver,
        domain: &str,
        record_type: RecordType,
        timeout: Duration,
    ) -> ProbeSample {
        let name = fully_qualified(domain);

        let start = Instant::now();
        let outcome = tokio::time::timeout(timeout, resolver.lookup(name.as_str(), record_type)).await;
        let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;

        match outcome {
            Ok(Ok(_lookup)) => ProbeSample::Latency(elapsed_ms),
            Ok(Err(e)) => {
                let kind = classify(&e);
                tracing::debug!("{domain} ({record_type}) failed as {kind}: {e}");
                ProbeSample::Error(kind)
            }
            Err(_) => ProbeSample::Error(ProbeErrorKind::Timeout),
        }
    }
}

impl Probe for ResolverProbe {
    fn probe<'a>(
        &'a self,
        address: &'a str,
        domains: &'a [String],
        record_type: RecordType,
        timeout: Duration,
    ) -> BoxFuture<'a, Vec<ProbeSample>> {
        Box::pin(async move {
            let resolver = match Self::build_resolver(address, timeout) {
                Ok(r) => r,
                Err(e) => {
                    tracing::warn!("Cannot probe resolver {address}: {e}");
                    return vec![ProbeSample::Error(ProbeErrorKind::Other); domains.len()];
                }
            };

            let mut samples = Vec::with_capacity(domains.len());
            for domain in domains {
                let sample = Self::query_once(&resolver, domain, record_type, timeout).await;
                tracing::debug!("{address} {domain}: {sample:?}");
                samples.push(sample);
            }
            samples
        })
    }
}

/// Map a resolver library error onto the probe error taxonomy.
#[must_use]
pub fn classify(err: &ResolveError) -> ProbeErrorKind {
    match err.kind() {
        // SERVFAIL, REFUSED and friends also arrive as NoRecordsFound
        ResolveErrorKind::NoRecordsFound { response_code, .. } => match *response_code {
            ResponseCode::NXDomain => ProbeErrorKind::NotFound,
            ResponseCode::NoError => ProbeErrorKind::NoAnswer,
            _ => ProbeErrorKind::Other,
        },
        ResolveErrorKind::Timeout => ProbeErrorKind::Timeout,
        ResolveErrorKind::Proto(proto) if matches!(proto.kind(), ProtoErrorKind::Timeout) => {
            ProbeErrorKind::Timeout
        }
        _ => ProbeErrorKind::Other,
    }
}

/// Parse a resolver address.
///
/// Accepts:
///   "1.1.1.1"              -- IPv4, default port 53
///   "1.1.1.1:5353"         -- IPv4 with explicit port
///   "2606:4700::1111"      -- bare IPv6, default port 53
///   "[2606:4700::1111]:53" -- bracketed IPv6 with port
pub fn parse_address(input: &str) -> Result<SocketAddr> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(Error::parse("empty resolver address"));
    }

    if let Ok(addr) = trimmed.parse::<SocketAddr>() {
        return Ok(addr);
    }

    trimmed
        .parse::<IpAddr>()
        .map(|ip| SocketAddr::new(ip, DEFAULT_DNS_PORT))
        .map_err(|e| Error::parse(format!("invalid resolver address '{trimmed}': {e}")))
}

/// Parse a record type name such as `"A"` or `"aaaa"`.
pub fn parse_record_type(input: &str) -> Result<RecordType> {
    let upper = input.trim().to_ascii_uppercase();
    match RecordType::from_str(&upper) {
        Ok(RecordType::Unknown(_)) | Err(_) => {
            Err(Error::parse(format!("unknown record type '{input}'")))
        }
        Ok(rt) => Ok(rt),
    }
}

/// Append the root label so the name is never expanded with search domains.
fn fully_qualified(domain: &str) -> String {
    if domain.ends_with('.') {
        domain.to_string()
    } else {
        format!("{domain}.")
    }
}

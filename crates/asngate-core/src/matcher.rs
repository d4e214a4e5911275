//! Request entry point: raw client address in, admission decision out.

use std::sync::Arc;

use crate::address::{parse_ip, split_host_port};
use crate::policy::{DenyReason, PolicyConfig, Verdict};
use crate::resolver::AsnSource;

/// Organization-based request matcher.
///
/// Constructed with its policy and an injected resolver. Every per-request
/// failure is logged and turned into a deny; callers only ever see a bool
/// (or the reasoned [`Verdict`] via [`AsnMatcher::check`]).
#[derive(Clone)]
pub struct AsnMatcher {
    policy: PolicyConfig,
    source: Arc<dyn AsnSource>,
}

impl AsnMatcher {
    pub fn new(policy: PolicyConfig, source: Arc<dyn AsnSource>) -> Self {
        Self { policy, source }
    }

    pub fn policy(&self) -> &PolicyConfig {
        &self.policy
    }

    /// Admit (`true`) or deny (`false`) a client given as `ip`, `ip:port`
    /// or `[ipv6]:port`.
    pub fn matches(&self, raw: &str) -> bool {
        self.check(raw).is_admit()
    }

    pub fn check(&self, raw: &str) -> Verdict {
        // An unconfigured matcher never admits.
        if self.policy.is_unconfigured() {
            return Verdict::Deny(DenyReason::Unconfigured);
        }

        let host = match split_host_port(raw) {
            Ok((host, _port)) => host,
            Err(e) => {
                tracing::warn!(address = %raw, error = %e, "cannot split IP address");
                raw
            }
        };

        let ip = match parse_ip(host) {
            Ok(ip) => ip,
            Err(_) => {
                tracing::warn!(address = %raw, "cannot parse IP address");
                return Verdict::Deny(DenyReason::Unparseable);
            }
        };

        let record = match self.source.lookup(ip) {
            Ok(record) => record.unwrap_or_default(),
            Err(e) => {
                tracing::warn!(address = %raw, error = %e, "cannot lookup IP address");
                return Verdict::Deny(DenyReason::LookupFailed);
            }
        };

        tracing::debug!(
            ip = %raw,
            autonomous_system_number = record.number,
            autonomous_system_organization = %record.organization,
            "detected ASN data"
        );

        let verdict = self.policy.evaluate(&record.organization);
        if !verdict.is_admit() {
            tracing::debug!(
                autonomous_system_organization = %record.organization,
                reason = verdict.reason(),
                "aso not allowed"
            );
        }
        verdict
    }
}

impl std::fmt::Debug for AsnMatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AsnMatcher")
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::error::{AsnGateError, Result};
    use crate::policy::AdmitReason;
    use crate::record::AsnRecord;
    use crate::resolver::StaticResolver;
    use std::net::IpAddr;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const NONE: [&str; 0] = [];

    /// Counts lookups; optionally fails every read.
    #[derive(Default)]
    struct CountingSource {
        calls: AtomicUsize,
        fail: bool,
    }

    impl AsnSource for CountingSource {
        fn lookup(&self, _ip: IpAddr) -> Result<Option<AsnRecord>> {
            self.calls.fetch_add(1, Ordering::Relaxed);
            if self.fail {
                return Err(AsnGateError::LookupFailed("corrupt search tree".into()));
            }
            Ok(Some(AsnRecord::new(64500, "Acme Cloud Services")))
        }
    }

    fn table() -> Arc<StaticResolver> {
        Arc::new(
            StaticResolver::new()
                .with_network("203.0.113.0/24", 64501, "Spam-ISP Networks")
                .unwrap()
                .with_network("198.51.100.0/24", 64502, "Acme Cloud Services")
                .unwrap()
                .with_network("192.0.2.0/24", 64503, "Acme Hosting")
                .unwrap()
                .with_network("2001:db8::/32", 15169, "GOOGLE LLC")
                .unwrap(),
        )
    }

    #[test]
    fn unconfigured_never_admits_and_skips_lookup() {
        let source = Arc::new(CountingSource::default());
        let m = AsnMatcher::new(PolicyConfig::new(NONE, NONE), source.clone());
        assert!(!m.matches("198.51.100.7:443"));
        assert!(!m.matches("garbage"));
        assert_eq!(m.check("1.1.1.1:1"), Verdict::Deny(DenyReason::Unconfigured));
        assert_eq!(source.calls.load(Ordering::Relaxed), 0);
    }

    #[test]
    fn deny_scenario() {
        let m = AsnMatcher::new(PolicyConfig::new(NONE, ["spam-isp"]), table());
        assert!(!m.matches("203.0.113.9:51000"));
        assert!(m.matches("198.51.100.9:51000"));
    }

    #[test]
    fn allow_scenarios() {
        let m = AsnMatcher::new(PolicyConfig::new(["cloud"], NONE), table());
        assert!(m.matches("198.51.100.9:80"));
        assert!(!m.matches("192.0.2.10:80"));
    }

    #[test]
    fn unresolved_address_is_admitted() {
        let m = AsnMatcher::new(PolicyConfig::new(["cloud"], NONE), table());
        assert_eq!(m.check("10.1.2.3:80"), Verdict::Admit(AdmitReason::Unresolved));
    }

    #[test]
    fn case_insensitive_over_ipv6() {
        let m = AsnMatcher::new(PolicyConfig::new(["google"], NONE), table());
        assert!(m.matches("[2001:db8::53]:443"));
    }

    #[test]
    fn malformed_address_is_denied() {
        let source = Arc::new(CountingSource::default());
        let m = AsnMatcher::new(PolicyConfig::new(NONE, ["spam"]), source.clone());
        assert_eq!(m.check("not-an-ip"), Verdict::Deny(DenyReason::Unparseable));
        assert_eq!(m.check(""), Verdict::Deny(DenyReason::Unparseable));
        assert_eq!(m.check("example.com:80"), Verdict::Deny(DenyReason::Unparseable));
        assert_eq!(source.calls.load(Ordering::Relaxed), 0);
    }

    #[test]
    fn split_failure_falls_back_to_bare_address() {
        let m = AsnMatcher::new(PolicyConfig::new(NONE, ["spam-isp"]), table());
        assert!(!m.matches("203.0.113.9"));
        assert!(m.matches("198.51.100.9"));
        let m = AsnMatcher::new(PolicyConfig::new(["google"], NONE), table());
        assert!(m.matches("2001:db8::1"));
    }

    #[test]
    fn lookup_error_is_denied() {
        let source = Arc::new(CountingSource { fail: true, ..CountingSource::default() });
        let m = AsnMatcher::new(PolicyConfig::new(["cloud"], NONE), source.clone());
        assert_eq!(m.check("198.51.100.1:80"), Verdict::Deny(DenyReason::LookupFailed));
        assert_eq!(source.calls.load(Ordering::Relaxed), 1);
    }
}

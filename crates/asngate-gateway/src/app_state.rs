//! Shared application state for the asnGate gateway.
//!
//! Owns the resolver lifecycle: opened once in [`AppState::provision`],
//! shared read-only by every request, closed once in [`AppState::cleanup`].

use std::sync::Arc;
use std::time::{Duration, Instant};

use asngate_core::error::{AsnGateError, Result};
use asngate_core::{AsnMatcher, AsnSource, MmdbResolver, Verdict};

use crate::config::GatewayConfig;
use crate::obs::metrics::GatewayMetrics;

const CLEANUP_POLL: Duration = Duration::from_millis(10);

#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    matcher: AsnMatcher,
    // None when the source was injected (tests, offline tables).
    resolver: Option<Arc<MmdbResolver>>,
    metrics: GatewayMetrics,
}

impl AppState {
    /// Validate config, open the ASN database, and build the matcher.
    /// A database that cannot be opened is fatal.
    pub fn provision(cfg: GatewayConfig) -> Result<Self> {
        cfg.validate()?;

        let resolver = Arc::new(MmdbResolver::open(&cfg.matcher.db_path)?);
        tracing::info!(
            db_path = %cfg.matcher.db_path,
            database_type = %resolver.database_type(),
            build_epoch = resolver.build_epoch(),
            "database opened"
        );

        let source: Arc<dyn AsnSource> = resolver.clone();
        Ok(Self::assemble(&cfg, source, Some(resolver)))
    }

    /// Build state around an already-constructed lookup source.
    pub fn with_source(cfg: GatewayConfig, source: Arc<dyn AsnSource>) -> Result<Self> {
        cfg.validate()?;
        Ok(Self::assemble(&cfg, source, None))
    }

    fn assemble(
        cfg: &GatewayConfig,
        source: Arc<dyn AsnSource>,
        resolver: Option<Arc<MmdbResolver>>,
    ) -> Self {
        let policy = cfg.matcher.policy();

        tracing::info!(
            db_path = %cfg.matcher.db_path,
            allowed_asos = policy.allow().len(),
            denied_asos = policy.deny().len(),
            "provisioned"
        );
        if policy.is_unconfigured() {
            tracing::warn!("allow_asos and deny_asos are both empty; every request will be denied");
        }

        Self {
            inner: Arc::new(AppStateInner {
                matcher: AsnMatcher::new(policy, source),
                resolver,
                metrics: GatewayMetrics::default(),
            }),
        }
    }

    pub fn metrics(&self) -> &GatewayMetrics {
        &self.inner.metrics
    }

    /// Decide one request and record the outcome.
    pub fn check(&self, peer: &str) -> Verdict {
        let started = Instant::now();
        let verdict = self.inner.matcher.check(peer);

        let metrics = &self.inner.metrics;
        metrics
            .decisions
            .inc(&[("verdict", verdict.as_str()), ("reason", verdict.reason())]);
        metrics.decision_duration.observe(&[], started.elapsed());

        verdict
    }

    /// Close the database once this is the last holder of the state.
    ///
    /// Connection tasks may still be releasing their router clones right
    /// after the server returns, so other holders get up to `grace` to go
    /// away before this fails with `CloseFailed`.
    pub async fn cleanup(self, grace: Duration) -> Result<()> {
        let deadline = tokio::time::Instant::now() + grace;
        let mut shared = self.inner;

        let inner = loop {
            match Arc::try_unwrap(shared) {
                Ok(inner) => break inner,
                Err(still_shared) => {
                    if tokio::time::Instant::now() >= deadline {
                        return Err(AsnGateError::CloseFailed(format!(
                            "application state still shared by {} other holder(s)",
                            Arc::strong_count(&still_shared) - 1
                        )));
                    }
                    shared = still_shared;
                    tokio::time::sleep(CLEANUP_POLL).await;
                }
            }
        };

        let AppStateInner { matcher, resolver, .. } = inner;
        drop(matcher);

        match resolver {
            Some(resolver) => MmdbResolver::close_shared(resolver),
            None => Ok(()),
        }
    }
}

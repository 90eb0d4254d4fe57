//! TCP readiness probing
//!
//! A probe is one bounded connect attempt. Failure of any kind is a normal
//! "not ready yet" answer and is reported as `false`, never as an error.

use crate::stack::ServiceKind;
use futures_util::future::join_all;
use std::collections::BTreeMap;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::time::{timeout, Instant, MissedTickBehavior};
use tracing::{debug, trace};

pub const DEFAULT_PROBE_HOST: &str = "127.0.0.1";
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(1);

/// Logical name of the application container.
pub const APP: &str = "app";

#[derive(Debug, Clone)]
pub struct ReadinessProber {
    host: String,
    timeout: Duration,
}

impl Default for ReadinessProber {
    fn default() -> Self {
        Self::new(DEFAULT_PROBE_HOST, DEFAULT_PROBE_TIMEOUT)
    }
}

impl ReadinessProber {
    pub fn new(host: impl Into<String>, timeout: Duration) -> Self {
        Self {
            host: host.into(),
            timeout,
        }
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Connects and immediately closes. True only if the connection was established in time.
    pub async fn probe_port(&self, port: u16) -> bool {
        let address = format!("{}:{}", self.host, port);
        match timeout(self.timeout, TcpStream::connect(&address)).await {
            Ok(Ok(_stream)) => true,
            Ok(Err(e)) => {
                trace!(address = %address, error = %e, "Probe refused");
                false
            }
            Err(_) => {
                trace!(address = %address, "Probe timed out");
                false
            }
        }
    }

    /// Probes a known infrastructure service. Unknown names are unreachable.
    pub async fn probe(&self, service: &str) -> bool {
        match ServiceKind::from_name(service) {
            Some(kind) => self.probe_port(kind.port()).await,
            None => false,
        }
    }

    /// Port a logical name resolves to. `app` needs a caller-supplied port.
    pub fn resolve(name: &str, app_port: Option<u16>) -> Option<u16> {
        if name == APP {
            return app_port;
        }
        ServiceKind::from_name(name).map(|kind| kind.port())
    }

    /// Probes every resolvable name concurrently. Unresolvable names are left
    /// out of the result.
    pub async fn check_all<S: AsRef<str>>(
        &self,
        services: &[S],
        app_port: Option<u16>,
    ) -> BTreeMap<String, bool> {
        let targets: Vec<(String, u16)> = services
            .iter()
            .map(|s| s.as_ref())
            .filter_map(|name| match Self::resolve(name, app_port) {
                Some(port) => Some((name.to_string(), port)),
                None => {
                    debug!(service = name, "Skipping unknown service");
                    None
                }
            })
            .collect();

        let results = join_all(targets.iter().map(|(_, port)| self.probe_port(*port))).await;

        targets
            .into_iter()
            .map(|(name, _)| name)
            .zip(results)
            .collect()
    }

    /// Polls [`check_all`](Self::check_all) every `interval` until everything
    /// is reachable or `deadline` elapses. Returns the last status map.
    pub async fn wait_until_ready<S: AsRef<str>>(
        &self,
        services: &[S],
        app_port: Option<u16>,
        interval: Duration,
        deadline: Duration,
    ) -> BTreeMap<String, bool> {
        let started = Instant::now();
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            let status = self.check_all(services, app_port).await;
            let pending: Vec<&str> = status
                .iter()
                .filter(|(_, ready)| !**ready)
                .map(|(name, _)| name.as_str())
                .collect();

            if pending.is_empty() {
                debug!(elapsed_ms = started.elapsed().as_millis() as u64, "All services ready");
                return status;
            }
            if started.elapsed() >= deadline {
                debug!(pending = ?pending, "Readiness deadline reached");
                return status;
            }
            debug!(pending = ?pending, "Waiting for services");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::net::TcpListener;

    async fn listener() -> (TcpListener, u16) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        (listener, port)
    }

    async fn closed_port() -> u16 {
        let (listener, port) = listener().await;
        drop(listener);
        port
    }

    #[test]
    fn test_resolve_known_names() {
        assert_eq!(ReadinessProber::resolve("postgres", None), Some(5432));
        assert_eq!(ReadinessProber::resolve("mongo", None), Some(27017));
        assert_eq!(ReadinessProber::resolve("mongodb", None), Some(27017));
        assert_eq!(ReadinessProber::resolve("app", Some(8000)), Some(8000));
        assert_eq!(ReadinessProber::resolve("app", None), None);
        assert_eq!(ReadinessProber::resolve("kafka", None), None);
    }

    #[tokio::test]
    async fn test_probe_listening_port() {
        let (_listener, port) = listener().await;
        assert!(ReadinessProber::default().probe_port(port).await);
    }

    #[tokio::test]
    async fn test_probe_closed_port_within_bound() {
        let port = closed_port().await;
        let prober = ReadinessProber::new("127.0.0.1", Duration::from_millis(500));

        let started = std::time::Instant::now();
        assert!(!prober.probe_port(port).await);
        assert!(started.elapsed() < Duration::from_secs(2));
    }

    #[tokio::test]
    async fn test_unknown_service_probe_is_false() {
        assert!(!ReadinessProber::default().probe("elasticsearch").await);
    }

    #[tokio::test]
    async fn test_check_all_skips_unknown_names() {
        let (_listener, port) = listener().await;
        let prober = ReadinessProber::default();

        let status = prober.check_all(&["app", "kafka"], Some(port)).await;

        assert_eq!(status.len(), 1);
        assert_eq!(status.get("app"), Some(&true));
    }

    #[tokio::test]
    async fn test_check_all_without_app_port() {
        let status = ReadinessProber::default().check_all(&["app"], None).await;
        assert!(status.is_empty());
    }

    #[tokio::test]
    async fn test_wait_until_ready_returns_at_deadline() {
        let port = closed_port().await;
        let prober = ReadinessProber::new("127.0.0.1", Duration::from_millis(100));

        let status = prober
            .wait_until_ready(
                &["app"],
                Some(port),
                Duration::from_millis(20),
                Duration::from_millis(100),
            )
            .await;

        assert_eq!(status.get("app"), Some(&false));
    }

    #[tokio::test]
    async fn test_wait_until_ready_returns_when_ready() {
        let (_listener, port) = listener().await;
        let prober = ReadinessProber::default();

        let status = prober
            .wait_until_ready(
                &[APP.to_string()],
                Some(port),
                Duration::from_millis(10),
                Duration::from_secs(5),
            )
            .await;

        assert_eq!(status.get("app"), Some(&true));
    }
}

use axum::extract::{ConnectInfo, FromRef, FromRequestParts};
use axum::http::request::Parts;
use dashmap::DashMap;
use std::collections::VecDeque;
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

// Time source, swapped out in tests
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

// Rate limit window - request timestamps per client inside the trailing window
#[derive(Default)]
pub struct RateWindow {
    pub hits: VecDeque<Instant>,
}

impl RateWindow {
    fn prune(&mut self, now: Instant, window: Duration) {
        while let Some(&oldest) = self.hits.front() {
            if now.duration_since(oldest) > window {
                self.hits.pop_front();
            } else {
                break;
            }
        }
    }
}

/// Sliding-window limiter keyed by client address.
///
/// Rejected attempts are not recorded, so they do not eat into the quota.
pub struct RateLimiter {
    windows: DashMap<String, RateWindow>,
    max_requests: usize,
    window: Duration,
    clock: Arc<dyn Clock>,
}

impl RateLimiter {
    pub fn new(max_requests: usize, window: Duration) -> Self {
        Self::with_clock(max_requests, window, Arc::new(SystemClock))
    }

    pub fn with_clock(max_requests: usize, window: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            windows: DashMap::new(),
            max_requests,
            window,
            clock,
        }
    }

    pub fn admit(&self, client_id: &str) -> bool {
        let now = self.clock.now();

        // entry() holds the shard write lock until `entry` drops, so
        // prune-check-append is one critical section per client
        let mut entry = self.windows.entry(client_id.to_string()).or_default();
        entry.prune(now, self.window);

        if entry.hits.len() >= self.max_requests {
            return false;
        }

        entry.hits.push_back(now);
        true
    }

    /// Drops clients with no hits left in the window. Returns how many were evicted.
    pub fn sweep(&self) -> usize {
        let now = self.clock.now();
        let before = self.windows.len();
        self.windows.retain(|_, w| {
            w.prune(now, self.window);
            !w.hits.is_empty()
        });
        before.saturating_sub(self.windows.len())
    }

    pub fn tracked_clients(&self) -> usize {
        self.windows.len()
    }

    pub fn max_requests(&self) -> usize {
        self.max_requests
    }

    pub fn window(&self) -> Duration {
        self.window
    }
}

// Periodic eviction of idle clients
pub async fn sweeper(limiter: Arc<RateLimiter>, every: Duration) {
    let mut interval = tokio::time::interval(every);
    tracing::info!(interval = ?every, "rate window sweeper started");

    loop {
        interval.tick().await;
        let evicted = limiter.sweep();
        if evicted > 0 {
            tracing::debug!(evicted, remaining = limiter.tracked_clients(), "evicted idle rate windows");
        }
    }
}

/// Whether `x-forwarded-for` / `x-real-ip` may name the client.
///
/// Only safe behind a reverse proxy that overwrites those headers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProxyTrust(pub bool);

/// Identifier used as the rate limit key.
///
/// The socket peer address by default. With [`ProxyTrust`] on, the first
/// `x-forwarded-for` hop wins, then `x-real-ip`, then the peer address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientId(pub String);

impl<S> FromRequestParts<S> for ClientId
where
    ProxyTrust: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let ProxyTrust(trusted) = ProxyTrust::from_ref(state);
        let header = |name: &str| {
            parts
                .headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.split(',').next())
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };

        let forwarded = if trusted {
            header("x-forwarded-for").or_else(|| header("x-real-ip"))
        } else {
            None
        };

        let id = forwarded
            .or_else(|| {
                parts
                    .extensions
                    .get::<ConnectInfo<SocketAddr>>()
                    .map(|ConnectInfo(addr)| addr.ip().to_string())
            })
            .unwrap_or_else(|| "unknown".to_string());

        Ok(ClientId(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;
    use std::sync::Mutex;

    struct ManualClock(Mutex<Instant>);

    impl ManualClock {
        fn new() -> Arc<Self> {
            Arc::new(Self(Mutex::new(Instant::now())))
        }

        fn advance(&self, by: Duration) {
            *self.0.lock().unwrap() += by;
        }
    }

    impl Clock for ManualClock {
        fn now(&self) -> Instant {
            *self.0.lock().unwrap()
        }
    }

    fn limiter(max: usize, clock: &Arc<ManualClock>) -> RateLimiter {
        RateLimiter::with_clock(max, Duration::from_secs(60), clock.clone())
    }

    #[test]
    fn admits_up_to_max_then_rejects() {
        let clock = ManualClock::new();
        let rl = limiter(3, &clock);
        assert!(rl.admit("ip1"));
        assert!(rl.admit("ip1"));
        assert!(rl.admit("ip1"));
        assert!(!rl.admit("ip1"));

        clock.advance(Duration::from_secs(61));
        assert!(rl.admit("ip1"));
    }

    #[test]
    fn clients_are_isolated() {
        let clock = ManualClock::new();
        let rl = limiter(3, &clock);
        for _ in 0..3 {
            assert!(rl.admit("ip1"));
        }
        assert!(!rl.admit("ip1"));
        assert!(rl.admit("ip2"));
    }

    #[test]
    fn rejections_do_not_consume_quota() {
        let clock = ManualClock::new();
        let rl = limiter(2, &clock);
        assert!(rl.admit("ip1"));
        clock.advance(Duration::from_secs(30));
        assert!(rl.admit("ip1"));
        for _ in 0..5 {
            assert!(!rl.admit("ip1"));
        }
        // the first hit leaves the window, only one slot frees up
        clock.advance(Duration::from_secs(31));
        assert!(rl.admit("ip1"));
        assert!(!rl.admit("ip1"));
    }

    #[test]
    fn window_slides_rather_than_resets() {
        let clock = ManualClock::new();
        let rl = limiter(2, &clock);
        assert!(rl.admit("ip1"));
        clock.advance(Duration::from_secs(50));
        assert!(rl.admit("ip1"));
        clock.advance(Duration::from_secs(20));
        // 70s after the first hit, 20s after the second
        assert!(rl.admit("ip1"));
        assert!(!rl.admit("ip1"));
    }

    #[test]
    fn hit_exactly_one_window_old_still_counts() {
        let clock = ManualClock::new();
        let rl = limiter(1, &clock);
        assert!(rl.admit("ip1"));

        clock.advance(Duration::from_secs(60));
        assert!(!rl.admit("ip1"));

        clock.advance(Duration::from_millis(1));
        assert!(rl.admit("ip1"));
    }

    #[test]
    fn sweep_evicts_idle_clients() {
        let clock = ManualClock::new();
        let rl = limiter(5, &clock);
        rl.admit("ip1");
        rl.admit("ip2");
        clock.advance(Duration::from_secs(40));
        rl.admit("ip2");
        clock.advance(Duration::from_secs(30));
        assert_eq!(rl.sweep(), 1);
        assert_eq!(rl.tracked_clients(), 1);
    }

    #[test]
    fn concurrent_admits_never_exceed_max() {
        let rl = Arc::new(RateLimiter::new(25, Duration::from_secs(60)));
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let rl = rl.clone();
                std::thread::spawn(move || (0..20).filter(|_| rl.admit("shared")).count())
            })
            .collect();
        let admitted: usize = handles.into_iter().map(|h| h.join().unwrap()).sum();
        assert_eq!(admitted, 25);
    }

    async fn client_id(req: Request<()>, trust: bool) -> String {
        let (mut parts, _) = req.into_parts();
        let ClientId(id) = ClientId::from_request_parts(&mut parts, &ProxyTrust(trust)).await.unwrap();
        id
    }

    fn from_peer(peer: [u8; 4]) -> axum::http::request::Builder {
        let mut builder = Request::builder();
        if let Some(ext) = builder.extensions_mut() {
            ext.insert(ConnectInfo(SocketAddr::from((peer, 5555))));
        }
        builder
    }

    #[tokio::test]
    async fn trusted_proxy_headers_name_the_client() {
        let req = from_peer([10, 0, 0, 1])
            .header("x-forwarded-for", "203.0.113.7, 10.0.0.1")
            .header("x-real-ip", "198.51.100.2")
            .body(())
            .unwrap();
        assert_eq!(client_id(req, true).await, "203.0.113.7");

        let req = from_peer([10, 0, 0, 1]).header("x-real-ip", "198.51.100.2").body(()).unwrap();
        assert_eq!(client_id(req, true).await, "198.51.100.2");
    }

    #[tokio::test]
    async fn forwarded_headers_ignored_unless_trusted() {
        let req = from_peer([192, 0, 2, 10])
            .header("x-forwarded-for", "203.0.113.7")
            .header("x-real-ip", "198.51.100.2")
            .body(())
            .unwrap();
        assert_eq!(client_id(req, false).await, "192.0.2.10");
    }

    #[tokio::test]
    async fn client_id_falls_back_to_peer_address() {
        let req = from_peer([192, 0, 2, 10]).body(()).unwrap();
        assert_eq!(client_id(req, true).await, "192.0.2.10");

        let req = Request::builder().body(()).unwrap();
        assert_eq!(client_id(req, false).await, "unknown");
    }
}

use std::num::NonZeroUsize;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use h3o::LatLng;
use lru::LruCache;

use super::{RouteError, RouteProvider, RouteResult, StraightLineRouteProvider};

/// Default number of cached origin/destination pairs.
pub const DEFAULT_ROUTE_CACHE_CAPACITY: usize = 512;

/// Cached routes expire after a day.
pub const DEFAULT_ROUTE_CACHE_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// Coordinates quantized to 1e-5 degrees (~1 m), directional.
type RouteKey = (i64, i64, i64, i64);

fn route_key(origin: LatLng, destination: LatLng) -> RouteKey {
    let q = |degrees: f64| (degrees * 100_000.0).round() as i64;
    (
        q(origin.lat()),
        q(origin.lng()),
        q(destination.lat()),
        q(destination.lng()),
    )
}

struct CachedRoute {
    stored_at: Instant,
    route: RouteResult,
}

/// LRU + TTL cache around any [`RouteProvider`].
///
/// On a miss the inner provider is queried; if it fails and `straight_line_fallback`
/// is set, a [`StraightLineRouteProvider`] estimate is returned instead. Fallback
/// estimates are not cached, so the real backend is tried again next time.
pub struct CachedRouteProvider {
    inner: Box<dyn RouteProvider>,
    cache: Mutex<LruCache<RouteKey, CachedRoute>>,
    ttl: Duration,
    straight_line_fallback: bool,
}

impl CachedRouteProvider {
    pub fn new(
        inner: Box<dyn RouteProvider>,
        capacity: usize,
        ttl: Duration,
        straight_line_fallback: bool,
    ) -> Self {
        let capacity = NonZeroUsize::new(capacity.max(1)).unwrap_or(NonZeroUsize::MIN);
        Self {
            inner,
            cache: Mutex::new(LruCache::new(capacity)),
            ttl,
            straight_line_fallback,
        }
    }

    fn lookup(&self, key: &RouteKey) -> Option<RouteResult> {
        let mut cache = self.cache.lock().ok()?;
        let fresh = cache
            .get(key)
            .map(|entry| entry.stored_at.elapsed() < self.ttl)?;
        if fresh {
            cache.get(key).map(|entry| entry.route.clone())
        } else {
            cache.pop(key);
            None
        }
    }
}

impl RouteProvider for CachedRouteProvider {
    fn route(&self, origin: LatLng, destination: LatLng) -> Result<RouteResult, RouteError> {
        let key = route_key(origin, destination);

        if let Some(route) = self.lookup(&key) {
            tracing::debug!(?key, "route cache hit");
            return Ok(route);
        }

        match self.inner.route(origin, destination) {
            Ok(route) => {
                if let Ok(mut cache) = self.cache.lock() {
                    cache.put(
                        key,
                        CachedRoute {
                            stored_at: Instant::now(),
                            route: route.clone(),
                        },
                    );
                }
                Ok(route)
            }
            Err(error) if self.straight_line_fallback => {
                tracing::warn!(%error, "routing backend failed, using straight-line estimate");
                StraightLineRouteProvider::default().route(origin, destination)
            }
            Err(error) => Err(error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct CountingProvider {
        calls: Arc<AtomicUsize>,
        fail: bool,
    }

    impl RouteProvider for CountingProvider {
        fn route(&self, _origin: LatLng, _destination: LatLng) -> Result<RouteResult, RouteError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(RouteError::Timeout);
            }
            Ok(RouteResult {
                distance_km: 5.0,
                duration_min: 12.0,
                polyline: Some("abc".to_string()),
            })
        }
    }

    fn points() -> (LatLng, LatLng) {
        (
            LatLng::new(9.0104, 38.7613).expect("valid"),
            LatLng::new(9.0184, 38.7674).expect("valid"),
        )
    }

    #[test]
    fn second_lookup_hits_cache() {
        let calls = Arc::new(AtomicUsize::new(0));
        let provider = CachedRouteProvider::new(
            Box::new(CountingProvider {
                calls: calls.clone(),
                fail: false,
            }),
            8,
            DEFAULT_ROUTE_CACHE_TTL,
            false,
        );
        let (from, to) = points();

        let first = provider.route(from, to).expect("route");
        let second = provider.route(from, to).expect("route");
        assert_eq!(first, second);
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        // Cache keys are directional.
        provider.route(to, from).expect("route");
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn expired_entries_are_refetched() {
        let calls = Arc::new(AtomicUsize::new(0));
        let provider = CachedRouteProvider::new(
            Box::new(CountingProvider {
                calls: calls.clone(),
                fail: false,
            }),
            8,
            Duration::ZERO,
            false,
        );
        let (from, to) = points();

        provider.route(from, to).expect("route");
        provider.route(from, to).expect("route");
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn failure_falls_back_to_straight_line_without_caching() {
        let calls = Arc::new(AtomicUsize::new(0));
        let provider = CachedRouteProvider::new(
            Box::new(CountingProvider {
                calls: calls.clone(),
                fail: true,
            }),
            8,
            DEFAULT_ROUTE_CACHE_TTL,
            true,
        );
        let (from, to) = points();

        let route = provider.route(from, to).expect("fallback route");
        assert!(route.polyline.is_none());
        assert!(route.distance_km > 0.0);

        provider.route(from, to).expect("fallback route");
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn failure_without_fallback_is_reported() {
        let provider = CachedRouteProvider::new(
            Box::new(CountingProvider {
                calls: Arc::new(AtomicUsize::new(0)),
                fail: true,
            }),
            8,
            DEFAULT_ROUTE_CACHE_TTL,
            false,
        );
        let (from, to) = points();
        assert_eq!(provider.route(from, to), Err(RouteError::Timeout));
    }
}

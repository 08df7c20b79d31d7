use std::env;
use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use sqlx::SqlitePool;
use tracing::{debug, error, info, trace, warn};

use crate::config::constant::{
    GEOCODE_BACKOFF_MS, GEOCODE_MAX_ATTEMPTS, GEOCODE_RESULT_LIMIT, GEOCODE_TIMEOUT_SECS,
};
use crate::database::cache::{lookup_cached_point, store_cached_point};
use crate::geocode::{GeocodeCandidate, GeocodeFailure, Geocoder};

const DEFAULT_BASE_URL: &str = "https://nominatim.openstreetmap.org/search";

#[derive(Debug, Deserialize)]
struct NominatimPlace {
    lat: String,
    lon: String,
    display_name: String,
}

/// OpenStreetMap Nominatim search client with a read-through SQLite cache
/// keyed by the normalized query string.
#[derive(Debug, Clone)]
pub struct NominatimGeocoder {
    client: Client,
    base_url: String,
    user_agent: String,
    cache: Option<SqlitePool>,
}

impl NominatimGeocoder {
    /// Build from environment. `NOMINATIM_BASE_URL` overrides the public
    /// endpoint; `CONTACT_EMAIL` goes into the User-Agent as the Nominatim
    /// usage policy asks.
    pub fn from_env(cache: Option<SqlitePool>) -> Self {
        let base_url =
            env::var("NOMINATIM_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        let user_agent = env::var("CONTACT_EMAIL")
            .map(|email| format!("multidrop-quoter/1.0 ({})", email.trim()))
            .unwrap_or_else(|_| "multidrop-quoter/1.0 (no-email-configured@example.com)".to_string());

        if base_url.contains("nominatim.openstreetmap.org") {
            info!("Using public Nominatim - User-Agent: {}", user_agent);
        } else {
            info!("Using self-hosted Nominatim at {}", base_url);
        }

        NominatimGeocoder::new(base_url, user_agent, cache)
    }

    pub fn new(base_url: String, user_agent: String, cache: Option<SqlitePool>) -> Self {
        NominatimGeocoder {
            client: Client::new(),
            base_url,
            user_agent,
            cache,
        }
    }

    async fn fetch_once(&self, query: &str) -> Result<Vec<GeocodeCandidate>, GeocodeFailure> {
        debug!("Sending GET to {} for '{}'", self.base_url, query);

        let limit = GEOCODE_RESULT_LIMIT.to_string();
        let response = self
            .client
            .get(&self.base_url)
            .query(&[("format", "json"), ("q", query), ("limit", limit.as_str())])
            .header("User-Agent", &self.user_agent)
            .timeout(Duration::from_secs(GEOCODE_TIMEOUT_SECS))
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    GeocodeFailure::Timeout(GEOCODE_TIMEOUT_SECS)
                } else {
                    GeocodeFailure::Transport(e)
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            error!("Nominatim returned HTTP {}", status);
            return Err(GeocodeFailure::MalformedResponse(format!("HTTP {}", status)));
        }

        let text = response.text().await.map_err(GeocodeFailure::Transport)?;
        trace!("Response size: {} bytes", text.len());

        let places: Vec<NominatimPlace> = serde_json::from_str(&text).map_err(|e| {
            let preview: String = text.chars().take(200).collect();
            error!("Failed to parse Nominatim JSON: {} (first 200 chars: {})", e, preview);
            GeocodeFailure::MalformedResponse(e.to_string())
        })?;

        let mut candidates = Vec::with_capacity(places.len());
        for place in places {
            let lat = place.lat.parse::<f64>().map_err(|e| {
                GeocodeFailure::MalformedResponse(format!("bad latitude '{}': {}", place.lat, e))
            })?;
            let lon = place.lon.parse::<f64>().map_err(|e| {
                GeocodeFailure::MalformedResponse(format!("bad longitude '{}': {}", place.lon, e))
            })?;
            candidates.push(GeocodeCandidate {
                lat,
                lon,
                display_name: place.display_name,
            });
        }
        Ok(candidates)
    }
}

impl Geocoder for NominatimGeocoder {
    /// Search with a bounded retry budget. Transport and timeout failures
    /// back off linearly and retry; malformed responses surface at once.
    async fn search(&self, query: &str) -> Result<Vec<GeocodeCandidate>, GeocodeFailure> {
        if let Some(pool) = &self.cache {
            if let Some((lat, lon)) = lookup_cached_point(pool, query).await {
                info!("Geocode cache hit for '{}'", query);
                return Ok(vec![GeocodeCandidate {
                    lat,
                    lon,
                    display_name: query.to_string(),
                }]);
            }
        }

        let mut last_failure = None;
        for attempt in 1..=GEOCODE_MAX_ATTEMPTS {
            match self.fetch_once(query).await {
                Ok(candidates) => {
                    if let (Some(pool), Some(best)) = (&self.cache, candidates.first()) {
                        store_cached_point(pool, query, best.lat, best.lon).await;
                    }
                    return Ok(candidates);
                }
                Err(failure @ GeocodeFailure::MalformedResponse(_)) => return Err(failure),
                Err(failure) => {
                    warn!(
                        "Geocode attempt {}/{} failed for '{}': {}",
                        attempt, GEOCODE_MAX_ATTEMPTS, query, failure
                    );
                    last_failure = Some(failure);
                    if attempt < GEOCODE_MAX_ATTEMPTS {
                        tokio::time::sleep(Duration::from_millis(
                            GEOCODE_BACKOFF_MS * attempt as u64,
                        ))
                        .await;
                    }
                }
            }
        }

        // Loop ran at least once, so a failure was recorded.
        Err(last_failure.unwrap_or_else(|| {
            GeocodeFailure::MalformedResponse("no attempts executed".to_string())
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// One-connection-at-a-time HTTP stub. Serves the canned replies in
    /// order, cycling; an empty reply means close without responding.
    /// Returns the base URL and a counter of accepted requests.
    async fn stub_server(replies: Vec<String>) -> (String, Arc<AtomicUsize>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&hits);
        tokio::spawn(async move {
            let mut replies = replies.into_iter().cycle();
            loop {
                let (mut socket, _) = match listener.accept().await {
                    Ok(conn) => conn,
                    Err(_) => break,
                };
                counter.fetch_add(1, Ordering::SeqCst);
                let mut buf = [0u8; 2048];
                let _ = socket.read(&mut buf).await;
                let reply = replies.next().unwrap();
                if !reply.is_empty() {
                    let _ = socket.write_all(reply.as_bytes()).await;
                }
            }
        });
        (format!("http://{}", addr), hits)
    }

    fn http_ok(body: &str) -> String {
        format!(
            "HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
            body.len(),
            body
        )
    }

    fn geocoder_for(base_url: String) -> NominatimGeocoder {
        NominatimGeocoder::new(base_url, "multidrop-quoter/1.0 (test)".to_string(), None)
    }

    #[test]
    fn test_place_deserialization() {
        let json = r#"[{"lat": "40.7608", "lon": "-111.8910", "display_name": "Salt Lake City"}]"#;
        let places: Vec<NominatimPlace> = serde_json::from_str(json).unwrap();
        assert_eq!(places.len(), 1);
        assert_eq!(places[0].lat, "40.7608");
        assert_eq!(places[0].display_name, "Salt Lake City");
    }

    #[tokio::test]
    async fn test_search_parses_candidates() {
        let body = r#"[{"lat": "40.7608", "lon": "-111.8910", "display_name": "Salt Lake City"}]"#;
        let (base_url, hits) = stub_server(vec![http_ok(body)]).await;

        let candidates = geocoder_for(base_url).search("salt lake").await.unwrap();
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].lat, 40.7608);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_malformed_response_is_not_retried() {
        let (base_url, hits) = stub_server(vec![http_ok("not json")]).await;

        let err = geocoder_for(base_url).search("anywhere").await.unwrap_err();
        assert!(matches!(err, GeocodeFailure::MalformedResponse(_)));
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_transport_failures_exhaust_the_retry_budget() {
        // Closing without a reply makes reqwest report a transport error.
        let (base_url, hits) = stub_server(vec![String::new()]).await;

        let err = geocoder_for(base_url).search("anywhere").await.unwrap_err();
        assert!(matches!(err, GeocodeFailure::Transport(_)));
        assert_eq!(hits.load(Ordering::SeqCst), GEOCODE_MAX_ATTEMPTS as usize);
    }

    #[tokio::test]
    async fn test_retry_recovers_after_transport_failure() {
        let body = r#"[{"lat": "40.6461", "lon": "-111.4980", "display_name": "Park City"}]"#;
        let (base_url, hits) = stub_server(vec![String::new(), http_ok(body)]).await;

        let candidates = geocoder_for(base_url).search("park city").await.unwrap();
        assert_eq!(candidates.len(), 1);
        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_multibyte_parse_error_surfaces_cleanly() {
        // Invalid JSON with a multi-byte char straddling byte 200, so the
        // logged preview must truncate on a char boundary.
        let body = format!("{}€€€€", "x".repeat(199));
        let (base_url, _) = stub_server(vec![http_ok(&body)]).await;
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();

        let err = geocoder_for(base_url).search("anywhere").await.unwrap_err();
        assert!(matches!(err, GeocodeFailure::MalformedResponse(_)));
    }
}

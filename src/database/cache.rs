use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{info, warn};

/// Look up a previously geocoded query. Cache misses and read errors both
/// come back as None; the caller falls through to the live geocoder.
pub async fn lookup_cached_point(pool: &SqlitePool, query: &str) -> Option<(f64, f64)> {
    let row: Option<(f64, f64)> =
        sqlx::query_as("SELECT lat, lon FROM geocode_cache WHERE query = ?")
            .bind(query)
            .fetch_optional(pool)
            .await
            .unwrap_or_else(|e| {
                warn!("Geocode cache read failed: {}", e);
                None
            });
    row
}

/// Store a geocoded result. Cache writes are best-effort; a failed insert
/// only costs a repeat lookup later.
pub async fn store_cached_point(pool: &SqlitePool, query: &str, lat: f64, lon: f64) {
    let result = sqlx::query(
        r#"
        INSERT OR REPLACE INTO geocode_cache (query, lat, lon, cached_at)
        VALUES (?, ?, ?, ?)
        "#,
    )
    .bind(query)
    .bind(lat)
    .bind(lon)
    .bind(Utc::now().timestamp())
    .execute(pool)
    .await;

    match result {
        Ok(_) => info!("Cached geocode result for '{}'", query),
        Err(e) => warn!("Geocode cache write failed: {}", e),
    }
}

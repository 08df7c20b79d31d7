pub mod constant {
    /// Flat fee to start a multi-drop route.
    pub(crate) const BASE_FEE: f64 = 25.0;
    /// Minimum fee per delivery, covers the first 5 miles from the origin.
    pub(crate) const PER_DROP_FEE: f64 = 8.0;
    /// Miles included in the per-drop fee before mileage is charged.
    pub(crate) const FREE_MILES: f64 = 5.0;
    /// Mileage tiers keyed by total origin-to-stop distance. The whole
    /// distance picks one tier; only the excess beyond FREE_MILES is charged.
    pub(crate) const MILEAGE_TIERS: [(f64, f64); 3] =
        [(5.0, 0.0), (30.0, 1.0), (f64::INFINITY, 5.0)];
    /// Dollars per 1000 ft of elevation gain across route legs.
    pub(crate) const ELEVATION_COST_PER_1000_FT: f64 = 3.0;

    /// Average speed assumed for the time estimate, in mph.
    pub(crate) const AVERAGE_SPEED_MPH: f64 = 25.0;
    /// Minutes added per delivery stop in the time estimate.
    pub(crate) const MINUTES_PER_STOP: usize = 10;

    /// Seed for the elevation-gain estimate so quotes are reproducible.
    pub(crate) const TERRAIN_SEED: u64 = 12345;

    /// Geocoder call budget: attempts and per-call timeout.
    pub(crate) const GEOCODE_MAX_ATTEMPTS: u32 = 3;
    pub(crate) const GEOCODE_TIMEOUT_SECS: u64 = 5;
    pub(crate) const GEOCODE_BACKOFF_MS: u64 = 500;
    pub(crate) const GEOCODE_RESULT_LIMIT: u8 = 5;
}

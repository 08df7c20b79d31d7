use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::debug;

use crate::domain::types::{TerrainInfo, TerrainType};
use crate::terrain::zones::TerrainTables;

/// Maps a pair of localities to a cost multiplier and an estimated
/// elevation gain. The tables are read-only; the RNG backing the elevation
/// estimate is seeded so repeated runs produce the same quotes.
#[derive(Debug)]
pub struct TerrainClassifier {
    tables: TerrainTables,
    rng: ChaCha8Rng,
}

impl TerrainClassifier {
    pub fn new(tables: TerrainTables, seed: u64) -> Self {
        TerrainClassifier {
            tables,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Classify the route between two localities.
    ///
    /// Zone matching keeps the maximum multiplier over all zones either
    /// locality falls in; an exact special-route pair (either direction)
    /// overrides that unconditionally. Always well-defined: defaults to a
    /// flat valley route at multiplier 1.0.
    pub fn classify(&mut self, from_city: &str, to_city: &str) -> TerrainInfo {
        let from_lower = from_city.to_lowercase();
        let to_lower = to_city.to_lowercase();

        let mut max_multiplier = 1.0;
        let mut terrain_type = TerrainType::Flat;
        let mut description = "Valley route - standard rates".to_string();

        for zone in &self.tables.zones {
            let matches_zone = zone
                .areas
                .iter()
                .any(|area| from_lower.contains(area) || to_lower.contains(area));

            if matches_zone && zone.multiplier > max_multiplier {
                max_multiplier = zone.multiplier;
                description = zone.description.to_string();

                if zone.multiplier >= 1.5 {
                    terrain_type = TerrainType::Mountainous;
                } else if zone.multiplier >= 1.15 {
                    terrain_type = TerrainType::Hilly;
                }
            }
        }

        // Known mountain-pass pairs take precedence over zone matching.
        for route in &self.tables.special_routes {
            let forward = from_lower.contains(route.from) && to_lower.contains(route.to);
            let reverse = from_lower.contains(route.to) && to_lower.contains(route.from);
            if forward || reverse {
                max_multiplier = route.multiplier;
                description = route.description.to_string();
                terrain_type = route.terrain_type;
                break;
            }
        }

        let elevation_gain_ft = self.estimate_elevation_gain(terrain_type);

        debug!(
            "Terrain {} -> {}: {:?} x{:.2}, ~{:.0}ft",
            from_city, to_city, terrain_type, max_multiplier, elevation_gain_ft
        );

        TerrainInfo {
            multiplier: max_multiplier,
            elevation_gain_ft,
            terrain_type,
            description,
        }
    }

    // Rough estimate within the band for the terrain type; no real
    // elevation data is consulted.
    fn estimate_elevation_gain(&mut self, terrain_type: TerrainType) -> f64 {
        let gain: f64 = match terrain_type {
            TerrainType::Mountainous => self.rng.gen_range(2000.0..3500.0),
            TerrainType::Hilly => self.rng.gen_range(500.0..1300.0),
            TerrainType::Flat => self.rng.gen_range(0.0..300.0),
        };
        gain.round()
    }
}

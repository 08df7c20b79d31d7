use crate::domain::types::TerrainType;

/// A named elevation band with the locality substrings that place an
/// address inside it.
#[derive(Debug, Clone)]
pub struct TerrainZone {
    pub name: &'static str,
    pub elevation_range_ft: (u32, u32),
    pub areas: &'static [&'static str],
    pub multiplier: f64,
    pub description: &'static str,
}

/// A known origin/destination locality pair whose multiplier overrides
/// whatever the zone match produced. Mountain-pass routes mostly.
#[derive(Debug, Clone)]
pub struct SpecialRoute {
    pub from: &'static str,
    pub to: &'static str,
    pub multiplier: f64,
    pub description: &'static str,
    pub terrain_type: TerrainType,
}

/// Read-only zone and special-route tables, built once at startup and shared
/// across all quote requests.
#[derive(Debug, Clone)]
pub struct TerrainTables {
    pub zones: Vec<TerrainZone>,
    pub special_routes: Vec<SpecialRoute>,
}

impl TerrainTables {
    /// Salt Lake City service-area tables. Zones are ordered valley to
    /// mountain; the classifier keeps the maximum multiplier that matches.
    pub fn builtin() -> Self {
        let zones = vec![
            TerrainZone {
                name: "valley",
                elevation_range_ft: (4200, 4400),
                areas: &[
                    "salt lake city",
                    "west valley",
                    "murray",
                    "midvale",
                    "south salt lake",
                    "taylorsville",
                ],
                multiplier: 1.0,
                description: "Valley floor - standard rates",
            },
            TerrainZone {
                name: "foothills",
                elevation_range_ft: (4400, 5200),
                areas: &[
                    "cottonwood heights",
                    "holladay",
                    "millcreek",
                    "east millcreek",
                    "sugar house",
                ],
                multiplier: 1.15,
                description: "Foothills - moderate elevation gain",
            },
            TerrainZone {
                name: "canyon",
                elevation_range_ft: (5200, 7000),
                areas: &["park city", "alta", "brighton", "solitude", "snowbird"],
                multiplier: 1.35,
                description: "Canyon routes - significant elevation gain",
            },
            TerrainZone {
                name: "mountain",
                elevation_range_ft: (7000, 9000),
                areas: &["deer valley", "canyons", "brian head", "sundance"],
                multiplier: 1.6,
                description: "Mountain communities - steep terrain",
            },
        ];

        let special_routes = vec![
            SpecialRoute {
                from: "salt lake city",
                to: "park city",
                multiplier: 1.45,
                description: "SLC to Park City - I-80 mountain pass (2,000ft elevation gain)",
                terrain_type: TerrainType::Mountainous,
            },
            SpecialRoute {
                from: "salt lake city",
                to: "alta",
                multiplier: 1.65,
                description: "SLC to Alta - Little Cottonwood Canyon (3,200ft elevation gain)",
                terrain_type: TerrainType::Mountainous,
            },
            SpecialRoute {
                from: "salt lake city",
                to: "brighton",
                multiplier: 1.6,
                description: "SLC to Brighton - Big Cottonwood Canyon (3,000ft elevation gain)",
                terrain_type: TerrainType::Mountainous,
            },
            SpecialRoute {
                from: "salt lake city",
                to: "snowbird",
                multiplier: 1.7,
                description: "SLC to Snowbird - Little Cottonwood Canyon (3,500ft elevation gain)",
                terrain_type: TerrainType::Mountainous,
            },
        ];

        TerrainTables {
            zones,
            special_routes,
        }
    }
}

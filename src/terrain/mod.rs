pub mod classifier;
pub mod zones;

pub use classifier::TerrainClassifier;
pub use zones::TerrainTables;

use std::collections::BTreeMap;
use std::path::Path;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::icons::power_names;

use super::system::{StarSystem, SystemRecord};

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("failed to read catalog: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse catalog: {0}")]
    Json(#[from] serde_json::Error),
}

/// Parses a JSON object mapping system ids to [`SystemRecord`]s.
///
/// Systems come back ordered by id.
pub fn parse_catalog(json: &str) -> Result<Vec<StarSystem>, CatalogError> {
    let records: BTreeMap<String, SystemRecord> = serde_json::from_str(json)?;
    Ok(records
        .into_iter()
        .map(|(id, record)| StarSystem::from_record(id, record))
        .collect())
}

pub fn load_catalog(path: impl AsRef<Path>) -> Result<Vec<StarSystem>, CatalogError> {
    let path = path.as_ref();
    let json = std::fs::read_to_string(path)?;
    let systems = parse_catalog(&json)?;
    log::info!("Loaded {} systems from {}", systems.len(), path.display());
    Ok(systems)
}

const SAMPLE_STATES: [&str; 6] = [
    "Stronghold",
    "Stronghold-Carrier",
    "Fortified",
    "Exploited",
    "Contested",
    "Unoccupied",
];

/// Generates a deterministic catalog of `count` systems scattered in a cube of
/// half-width `extent` around the origin.
pub fn sample_catalog(seed: u64, count: usize, extent: f32) -> Vec<StarSystem> {
    let mut rng = StdRng::seed_from_u64(seed);
    let extent = extent.abs().max(1.0);
    let powers = power_names();

    (0..count)
        .map(|i| {
            let state = SAMPLE_STATES[rng.random_range(0..SAMPLE_STATES.len())];
            let controlling_power = if state == "Unoccupied" {
                None
            } else {
                Some(powers[rng.random_range(0..powers.len())].to_owned())
            };
            let record = SystemRecord {
                name: Some(format!("Sample {i}")),
                x: Some(rng.random_range(-extent..extent)),
                // flatter disc, like a galactic plane
                y: Some(rng.random_range(-extent..extent) * 0.1),
                z: Some(rng.random_range(-extent..extent)),
                power_state: Some(state.to_owned()),
                controlling_power,
            };
            StarSystem::from_record(format!("sample-{i:05}"), record)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::icons::PowerState;
    use crate::models::Point3;

    #[test]
    fn test_parse_catalog() {
        let json = r#"{
            "Sol": { "x": 0.0, "y": 0.0, "z": 0.0, "powerState": "Stronghold", "controllingPower": "Jerome Archer" },
            "Achenar": { "name": "Achenar", "x": 67.5, "y": -119.5, "z": 24.8 },
            "Lost": { "y": 4.0 }
        }"#;

        let systems = parse_catalog(json).unwrap();
        assert_eq!(systems.len(), 3);

        // ordered by id
        assert_eq!(systems[0].id, "Achenar");
        assert_eq!(systems[0].position, Point3::new(24.8, -119.5, 67.5));
        assert_eq!(systems[0].power_state, PowerState::Unoccupied);

        assert_eq!(systems[1].id, "Lost");
        assert!(!systems[1].position.is_finite());

        assert_eq!(systems[2].id, "Sol");
        assert_eq!(systems[2].power_state, PowerState::Stronghold);
    }

    #[test]
    fn test_parse_catalog_rejects_malformed_json() {
        let result = parse_catalog("[1, 2, 3]");
        assert!(matches!(result, Err(CatalogError::Json(_))));
    }

    #[test]
    fn test_load_missing_file() {
        let result = load_catalog("/definitely/not/here/systems.json");
        assert!(matches!(result, Err(CatalogError::Io(_))));
    }

    #[test]
    fn test_sample_catalog_is_deterministic() {
        let a = sample_catalog(7, 200, 500.0);
        let b = sample_catalog(7, 200, 500.0);
        assert_eq!(a, b);
        assert_eq!(a.len(), 200);
        assert!(a.iter().all(|s| s.position.is_finite()));
        assert!(a
            .iter()
            .all(|s| s.position.x.abs() <= 500.0 && s.position.z.abs() <= 500.0));
    }
}

use serde::{Deserialize, Serialize};

use crate::icons::PowerState;

/// A position in map space (after ingestion).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Point3 {
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);

    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn distance_sq(self, other: Self) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.z - other.z;
        dx * dx + dy * dy + dz * dz
    }

    pub fn distance(self, other: Self) -> f32 {
        self.distance_sq(other).sqrt()
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

/// A star system as it appears in a catalog file.
///
/// Coordinates are in source order and may be missing; use
/// [`StarSystem::from_record`] to bring them into map space.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemRecord {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub x: Option<f32>,
    #[serde(default)]
    pub y: Option<f32>,
    #[serde(default)]
    pub z: Option<f32>,
    #[serde(default)]
    pub power_state: Option<String>,
    #[serde(default)]
    pub controlling_power: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StarSystem {
    pub id: String,
    pub name: Option<String>,
    pub position: Point3,
    pub power_state: PowerState,
    pub controlling_power: Option<String>,
}

impl StarSystem {
    /// Ingests a catalog record.
    ///
    /// The first and third source coordinates are swapped: record `(x, y, z)`
    /// lands at map position `(z, y, x)`. Missing coordinates become NaN.
    pub fn from_record(id: impl Into<String>, record: SystemRecord) -> Self {
        let x = record.x.unwrap_or(f32::NAN);
        let y = record.y.unwrap_or(f32::NAN);
        let z = record.z.unwrap_or(f32::NAN);
        let power_state = record
            .power_state
            .as_deref()
            .map(PowerState::from)
            .unwrap_or_default();

        Self {
            id: id.into(),
            name: record.name,
            position: Point3::new(z, y, x),
            power_state,
            controlling_power: record.controlling_power,
        }
    }

    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.id)
    }
}

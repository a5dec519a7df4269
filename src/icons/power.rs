use std::fmt;

/// Color used for every marker that doesn't get a power color.
pub const NEUTRAL_COLOR: &str = "#8c8c8c";

/// Occupation status of a system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PowerState {
    Stronghold,
    StrongholdCarrier,
    Fortified,
    Exploited,
    Contested,
    #[default]
    Unoccupied,
}

impl PowerState {
    pub const ALL: [PowerState; 6] = [
        PowerState::Stronghold,
        PowerState::StrongholdCarrier,
        PowerState::Fortified,
        PowerState::Exploited,
        PowerState::Contested,
        PowerState::Unoccupied,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            PowerState::Stronghold => "Stronghold",
            PowerState::StrongholdCarrier => "Stronghold-Carrier",
            PowerState::Fortified => "Fortified",
            PowerState::Exploited => "Exploited",
            PowerState::Contested => "Contested",
            PowerState::Unoccupied => "Unoccupied",
        }
    }

    /// States whose marker takes the controlling power's color.
    pub fn shows_power_color(self) -> bool {
        matches!(
            self,
            PowerState::Stronghold | PowerState::Fortified | PowerState::Exploited
        )
    }
}

/// Unknown strings parse as [`PowerState::Unoccupied`].
impl From<&str> for PowerState {
    fn from(value: &str) -> Self {
        match value {
            "Stronghold" => PowerState::Stronghold,
            "Stronghold-Carrier" => PowerState::StrongholdCarrier,
            "Fortified" => PowerState::Fortified,
            "Exploited" => PowerState::Exploited,
            "Contested" => PowerState::Contested,
            _ => PowerState::Unoccupied,
        }
    }
}

impl fmt::Display for PowerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

const POWER_COLORS: [(&str, &str); 12] = [
    ("Aisling Duval", "#0099ff"),
    ("Archon Delaine", "#ff0000"),
    ("Arissa Lavigny-Duval", "#7f00ff"),
    ("Denton Patreus", "#00ffff"),
    ("Edmund Mahon", "#00ff00"),
    ("Felicia Winters", "#ffc400"),
    ("Jerome Archer", "#df2f6b"),
    ("Li Yong-Rui", "#33ccbb"),
    ("Nakato Kaine", "#aaff00"),
    ("Pranav Antal", "#ffff00"),
    ("Yuri Grom", "#ff8000"),
    ("Zemina Torval", "#0040ff"),
];

/// Names of every power in the palette.
pub fn power_names() -> Vec<&'static str> {
    POWER_COLORS.iter().map(|(name, _)| *name).collect()
}

/// Palette color for a power, if it has one.
pub fn power_color(power: &str) -> Option<&'static str> {
    POWER_COLORS
        .iter()
        .find(|(name, _)| *name == power)
        .map(|(_, color)| *color)
}

/// Resolves the marker color for a system.
///
/// Only Stronghold, Fortified and Exploited systems with a controlling power
/// are colored; everything else is [`NEUTRAL_COLOR`].
pub fn resolve_color(state: PowerState, controlling_power: Option<&str>) -> &'static str {
    match controlling_power {
        Some(power) if state.shows_power_color() => power_color(power).unwrap_or(NEUTRAL_COLOR),
        _ => NEUTRAL_COLOR,
    }
}

/// Marker size multiplier for a power state.
pub fn resolve_scale(state: PowerState) -> f32 {
    match state {
        PowerState::Stronghold | PowerState::StrongholdCarrier => 2.0,
        PowerState::Fortified => 1.6,
        PowerState::Exploited => 1.3,
        PowerState::Contested => 1.15,
        PowerState::Unoccupied => 1.0,
    }
}

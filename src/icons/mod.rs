//! Power-state markers: color/scale lookup tables and a material cache.

mod factory;
mod power;

pub use factory::{IconFactory, MarkerIcon, MarkerMaterial, MARKER_RENDER_ORDER};
pub use power::{
    power_color, power_names, resolve_color, resolve_scale, PowerState, NEUTRAL_COLOR,
};

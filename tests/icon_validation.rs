use std::sync::Arc;

use starmap::icons::{
    power_names, resolve_color, resolve_scale, IconFactory, PowerState, NEUTRAL_COLOR,
};
use starmap::models::sample_catalog;

#[test]
fn test_contested_never_colored() {
    for power in power_names() {
        assert_eq!(resolve_color(PowerState::Contested, Some(power)), NEUTRAL_COLOR);
        assert_ne!(resolve_color(PowerState::Stronghold, Some(power)), NEUTRAL_COLOR);
    }
    assert_eq!(resolve_color(PowerState::Contested, Some("AnyPower")), NEUTRAL_COLOR);
}

#[test]
fn test_scale_ordering() {
    assert!(resolve_scale(PowerState::Stronghold) > resolve_scale(PowerState::Fortified));
    assert!(resolve_scale(PowerState::Fortified) > resolve_scale(PowerState::Exploited));
    assert!(resolve_scale(PowerState::Exploited) > resolve_scale(PowerState::Unoccupied));
    assert_eq!(
        resolve_scale(PowerState::from("Unknown")),
        resolve_scale(PowerState::Unoccupied)
    );
}

#[test]
fn test_catalog_markers_share_materials() {
    let ctx = egui::Context::default();
    let mut factory = IconFactory::new(&ctx);
    let systems = sample_catalog(5, 500, 300.0);

    let markers: Vec<_> = systems
        .iter()
        .map(|s| factory.create_icon(s.power_state, s.controlling_power.as_deref()))
        .collect();

    // one material per distinct color: at most every power plus neutral
    assert!(factory.cached_materials() <= power_names().len() + 1);

    for (a, sa) in markers.iter().zip(&systems) {
        for (b, sb) in markers.iter().zip(&systems).take(50) {
            let color_a = resolve_color(sa.power_state, sa.controlling_power.as_deref());
            let color_b = resolve_color(sb.power_state, sb.controlling_power.as_deref());
            assert_eq!(Arc::ptr_eq(&a.material, &b.material), color_a == color_b);
        }
    }

    let first = markers[0].material.clone();
    factory.release_cache();
    let again = factory.create_icon(
        systems[0].power_state,
        systems[0].controlling_power.as_deref(),
    );
    assert!(!Arc::ptr_eq(&first, &again.material));
}

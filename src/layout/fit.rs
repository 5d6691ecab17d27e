use eframe::egui::{Pos2, Rect, Vec2};

use super::config::FitConfig;
use super::viewport::Viewport;
use super::zone::Zone;

/// Viewport that frames every node (and, if configured, every zone disc) with
/// margin, centred on the content.
///
/// Returns `None` when there is nothing to frame or the result would not be a
/// usable viewport; callers keep their previous one in that case.
pub fn fit_viewport<I>(
    positions: I,
    zones: &[Zone],
    config: &FitConfig,
    container: Vec2,
) -> Option<Viewport>
where
    I: IntoIterator<Item = Vec2>,
{
    let node_padding = config.node_padding();
    let mut bounds = Rect::NOTHING;
    let mut any_node = false;
    for position in positions {
        if !(position.x.is_finite() && position.y.is_finite()) {
            return None;
        }
        any_node = true;
        bounds = bounds.union(Rect::from_center_size(
            Pos2::ZERO + position,
            node_padding * 2.0,
        ));
    }
    if !any_node {
        return None;
    }

    if config.include_zones {
        let zone_padding = config.zone_padding();
        for zone in zones {
            let extent = Vec2::splat(zone.radius) + zone_padding;
            bounds = bounds.union(Rect::from_center_size(Pos2::ZERO + zone.center, extent * 2.0));
        }
    }

    let container = if container.x.is_finite()
        && container.y.is_finite()
        && container.x > 0.0
        && container.y > 0.0
    {
        container
    } else {
        config.fallback_container()
    };

    let usable = container * (1.0 - config.margin);
    let scale = (bounds.width() / usable.x)
        .max(bounds.height() / usable.y)
        .max(config.min_scale);

    let viewport = Viewport::from_center(bounds.center(), container * scale);
    viewport.is_valid().then_some(viewport)
}

#[cfg(test)]
mod tests {
    use eframe::egui::{pos2, vec2};

    use super::*;

    #[test]
    fn tiny_graphs_are_not_blown_up() {
        let config = FitConfig::default();
        let viewport = fit_viewport([vec2(10.0, 20.0)], &[], &config, vec2(800.0, 600.0))
            .expect("one node frames");
        assert_eq!(viewport.size(), vec2(800.0, 600.0));
        assert_eq!(viewport.center(), pos2(10.0, 20.0));
    }

    #[test]
    fn wide_content_scales_the_view_out() {
        let config = FitConfig::default();
        let positions = [vec2(-1000.0, 0.0), vec2(1000.0, 0.0)];
        let viewport = fit_viewport(positions, &[], &config, vec2(800.0, 600.0))
            .expect("two nodes frame");

        // (2000 + 2 * 60) / (800 * 0.8)
        let scale = 2120.0 / 640.0;
        assert!((viewport.width - 800.0 * scale).abs() < 1e-2);
        assert!((viewport.height - 600.0 * scale).abs() < 1e-2);
        assert!(viewport.center().to_vec2().length() < 1e-3);
    }

    #[test]
    fn zero_container_falls_back_to_default_size() {
        let config = FitConfig::default();
        let viewport =
            fit_viewport([Vec2::ZERO], &[], &config, Vec2::ZERO).expect("fallback container");
        assert_eq!(viewport.size(), vec2(900.0, 700.0));
    }

    #[test]
    fn nothing_to_frame_keeps_the_previous_view() {
        let config = FitConfig::default();
        assert!(fit_viewport(Vec::<Vec2>::new(), &[], &config, vec2(800.0, 600.0)).is_none());
        assert!(fit_viewport([vec2(f32::NAN, 0.0)], &[], &config, vec2(800.0, 600.0)).is_none());
    }

    #[test]
    fn zones_widen_the_frame_when_included() {
        let config = FitConfig {
            include_zones: true,
            zone_padding: [120.0, 140.0],
            margin: 0.1,
            ..FitConfig::default()
        };
        let zone = Zone::new("Land", "Land", vec2(1500.0, 0.0), [0, 0, 0], 200.0);
        let with_zone = fit_viewport([Vec2::ZERO], &[zone], &config, vec2(800.0, 600.0))
            .expect("frames");
        let without = fit_viewport([Vec2::ZERO], &[], &config, vec2(800.0, 600.0))
            .expect("frames");
        assert!(with_zone.width > without.width);
        assert!(with_zone.center().x > 0.0);
    }

    #[test]
    fn refitting_the_same_positions_is_stable() {
        let config = FitConfig::default();
        let positions = [vec2(-300.0, 40.0), vec2(220.0, -180.0), vec2(10.0, 300.0)];
        let first = fit_viewport(positions, &[], &config, vec2(1024.0, 640.0));
        let second = fit_viewport(positions, &[], &config, vec2(1024.0, 640.0));
        assert_eq!(first, second);
    }
}

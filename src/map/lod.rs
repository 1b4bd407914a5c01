//! Zoom smoothing and tier level-of-detail.
//!
//! Input only moves the *target* scale. Every frame the current scale moves a
//! fixed fraction of the remaining distance toward it, and everything that
//! depends on zoom (earth and group scale, camera distance limits, tier
//! visibility) is recomputed from the new value.

use crate::config::{CameraConfig, GlobeConfig, Tier, TierConfig, ZoomConfig};
use crate::map::camera::{CameraConstraint, OrbitCamera};
use crate::map::scene::Scene;

/// Smoothed zoom scale and the value it is heading for
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ZoomState {
    pub scale: f64,
    pub target: f64,
}

impl Default for ZoomState {
    fn default() -> Self {
        Self {
            scale: 1.0,
            target: 1.0,
        }
    }
}

/// Result of one frame update
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameUpdate {
    pub scale: f64,
    pub constraint: CameraConstraint,
}

/// Visible iff enabled and `min_scale <= scale < max_scale`
pub fn tier_visible_at(entry: &TierConfig, scale: f64) -> bool {
    entry.enabled && scale >= entry.min_scale && entry.max_scale.is_none_or(|max| scale < max)
}

pub struct LodController {
    zoom: ZoomState,
    zoom_config: ZoomConfig,
    camera_config: CameraConfig,
    base_radius: f64,
    /// Ordered LOD table, iterated generically
    table: Vec<TierConfig>,
}

impl LodController {
    pub fn new(config: &GlobeConfig) -> Self {
        Self {
            zoom: ZoomState {
                scale: config.zoom.min_scale,
                target: config.zoom.min_scale,
            },
            zoom_config: config.zoom.clone(),
            camera_config: config.camera.clone(),
            base_radius: config.earth.radius,
            table: config.tiers.clone(),
        }
    }

    pub fn scale(&self) -> f64 {
        self.zoom.scale
    }

    pub fn target(&self) -> f64 {
        self.zoom.target
    }

    /// Wheel event: negative delta zooms in, positive zooms out.
    /// Magnitude is ignored.
    pub fn on_wheel(&mut self, delta: f64) {
        let step = self.zoom_config.wheel_step;
        if delta < 0.0 {
            self.set_target(self.zoom.target + step);
        } else if delta > 0.0 {
            self.set_target(self.zoom.target - step);
        }
    }

    pub fn zoom_in(&mut self) {
        self.on_wheel(-1.0);
    }

    pub fn zoom_out(&mut self) {
        self.on_wheel(1.0);
    }

    /// Set the target directly, clamped to the configured range
    pub fn set_target(&mut self, target: f64) {
        self.zoom.target = target.clamp(self.zoom_config.min_scale, self.zoom_config.max_scale);
    }

    /// Back to the un-zoomed state
    pub fn reset(&mut self) {
        self.zoom.scale = self.zoom_config.min_scale;
        self.zoom.target = self.zoom_config.min_scale;
    }

    /// One smoothing step toward the target
    pub fn advance(&mut self) -> f64 {
        self.zoom.scale += (self.zoom.target - self.zoom.scale) * self.zoom_config.smoothing;
        self.zoom.scale
    }

    /// Whether `tier` should show at `scale`. Tiers missing from the table never show.
    pub fn is_visible(&self, tier: Tier, scale: f64) -> bool {
        self.table
            .iter()
            .find(|entry| entry.tier == tier)
            .is_some_and(|entry| tier_visible_at(entry, scale))
    }

    /// Runs once per rendered frame.
    ///
    /// Advances the scale, applies it to the earth and every loaded group,
    /// recomputes the camera limits, and sets tier visibility. Tiers that
    /// are still loading are picked up on the first frame after they attach.
    pub fn frame_update(&mut self, scene: &mut Scene, camera: &mut OrbitCamera) -> FrameUpdate {
        let scale = self.advance();

        scene.earth.scale = scale;
        for group in scene.groups_mut() {
            group.scale = scale;
            group.visible = self.is_visible(group.tier, scale);
        }

        let constraint = CameraConstraint::for_scale(self.base_radius, scale, &self.camera_config);
        camera.set_constraint(constraint);

        FrameUpdate { scale, constraint }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Rgb;
    use crate::map::scene::{BoundaryGroup, Earth};

    fn controller() -> LodController {
        LodController::new(&GlobeConfig::default())
    }

    #[test]
    fn test_wheel_moves_target_only() {
        let mut lod = controller();
        lod.on_wheel(-120.0);
        assert!((lod.target() - 1.1).abs() < 1e-12);
        assert_eq!(lod.scale(), 1.0);

        lod.on_wheel(3.0);
        assert!((lod.target() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_zero_delta_is_ignored() {
        let mut lod = controller();
        lod.set_target(5.0);
        lod.on_wheel(0.0);
        assert_eq!(lod.target(), 5.0);
    }

    #[test]
    fn test_target_clamped_to_range() {
        let mut lod = controller();
        lod.set_target(30.0);
        assert_eq!(lod.target(), 20.0);
        for _ in 0..50 {
            lod.zoom_in();
            assert!(lod.target() <= 20.0);
        }
        assert_eq!(lod.target(), 20.0);

        for _ in 0..500 {
            lod.zoom_out();
        }
        assert_eq!(lod.target(), 1.0);
    }

    #[test]
    fn test_smoothing_converges_without_overshoot() {
        let mut lod = controller();
        lod.set_target(10.0);

        let mut prev = lod.scale();
        let mut steps = 0;
        while (lod.scale() - 10.0).abs() >= 0.01 {
            let next = lod.advance();
            assert!(next > prev, "scale must increase monotonically");
            assert!(next <= 10.0, "scale overshot target: {next}");
            prev = next;
            steps += 1;
            assert!(steps <= 25, "did not converge in time");
        }
        assert!(steps >= 10);
    }

    #[test]
    fn test_first_smoothing_step() {
        let mut lod = controller();
        lod.set_target(10.0);
        assert!((lod.advance() - (1.0 + 9.0 * 0.3)).abs() < 1e-12);
    }

    #[test]
    fn test_visibility_partition_at_threshold() {
        let lod = controller();
        assert!(lod.is_visible(Tier::Country, 3.9));
        assert!(!lod.is_visible(Tier::Province, 3.9));

        assert!(!lod.is_visible(Tier::Country, 4.0));
        assert!(lod.is_visible(Tier::Province, 4.0));

        assert!(lod.is_visible(Tier::Country, 1.0));
        assert!(lod.is_visible(Tier::Province, 20.0));
    }

    #[test]
    fn test_disabled_tiers_never_visible() {
        let lod = controller();
        for scale in [1.0, 8.0, 14.0, 20.0] {
            assert!(!lod.is_visible(Tier::City, scale));
            assert!(!lod.is_visible(Tier::County, scale));
        }
    }

    #[test]
    fn test_exactly_one_tier_visible_across_range() {
        let lod = controller();
        let mut scale = 1.0;
        while scale <= 20.0 {
            let visible = [Tier::Country, Tier::Province, Tier::City, Tier::County]
                .into_iter()
                .filter(|&tier| lod.is_visible(tier, scale))
                .count();
            assert_eq!(visible, 1, "scale {scale}");
            scale += 0.05;
        }
    }

    #[test]
    fn test_frame_update_applies_scale_visibility_and_camera() {
        let mut lod = controller();
        let config = GlobeConfig::default();
        let mut camera = OrbitCamera::new(&config.camera);
        let mut scene = Scene::new(Earth::new(1.0, None, Rgb(0, 0, 0)));
        scene.attach(BoundaryGroup::new(Tier::Country, Rgb::WHITE, Vec::new()));
        scene.attach(BoundaryGroup::new(Tier::Province, Rgb::ORANGE, Vec::new()));

        lod.set_target(20.0);
        let mut update = lod.frame_update(&mut scene, &mut camera);
        while update.scale < 4.0 {
            assert!(scene.tier_group(Tier::Country).unwrap().visible);
            assert!(!scene.tier_group(Tier::Province).unwrap().visible);
            update = lod.frame_update(&mut scene, &mut camera);
        }

        assert!(!scene.tier_group(Tier::Country).unwrap().visible);
        assert!(scene.tier_group(Tier::Province).unwrap().visible);
        assert_eq!(scene.earth.scale, update.scale);
        assert!(scene.groups().all(|g| g.scale == update.scale));
        assert!((update.constraint.min_distance - update.scale * 1.01).abs() < 1e-12);
        assert!((update.constraint.max_distance - update.scale * 20.0).abs() < 1e-12);
        assert!(camera.distance >= update.constraint.min_distance);
        assert!(camera.distance <= update.constraint.max_distance);
    }

    #[test]
    fn test_reset() {
        let mut lod = controller();
        lod.set_target(7.0);
        lod.advance();
        lod.reset();
        assert_eq!(lod.scale(), ZoomState::default().scale);
        assert_eq!(lod.target(), ZoomState::default().target);
    }
}

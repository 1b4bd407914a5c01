use crate::config::{Rgb, Tier};
use crate::data::LoadTask;
use crate::map::texture::EarthTexture;
use glam::DVec3;

/// A projected ring, ready to draw as an open polyline
#[derive(Clone, Debug)]
pub struct BoundaryLine {
    pub vertices: Vec<DVec3>,
    pub color: Rgb,
}

/// All lines of one tier, toggled and scaled together
#[derive(Clone, Debug)]
pub struct BoundaryGroup {
    pub tier: Tier,
    pub color: Rgb,
    pub lines: Vec<BoundaryLine>,
    pub visible: bool,
    pub scale: f64,
}

impl BoundaryGroup {
    pub fn new(tier: Tier, color: Rgb, lines: Vec<BoundaryLine>) -> Self {
        Self {
            tier,
            color,
            lines,
            visible: true,
            scale: 1.0,
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.lines.iter().map(|l| l.vertices.len()).sum()
    }
}

/// The base sphere
pub struct Earth {
    pub radius: f64,
    pub scale: f64,
    pub texture: Option<EarthTexture>,
    /// Used where no texture is available
    pub ocean_color: Rgb,
}

impl Earth {
    pub fn new(radius: f64, texture: Option<EarthTexture>, ocean_color: Rgb) -> Self {
        Self {
            radius,
            scale: 1.0,
            texture,
            ocean_color,
        }
    }

    /// Radius after the uniform zoom scale
    pub fn scaled_radius(&self) -> f64 {
        self.radius * self.scale
    }
}

/// Load state of one tier
pub enum TierSlot {
    /// Background load still running
    Pending(LoadTask),
    Loaded(BoundaryGroup),
    /// Load failed; the tier stays absent for the session
    Failed(String),
}

struct TierEntry {
    tier: Tier,
    slot: TierSlot,
}

/// Owns the earth and every boundary tier. Entries keep insertion order,
/// which is also the draw order.
pub struct Scene {
    pub earth: Earth,
    entries: Vec<TierEntry>,
}

impl Scene {
    pub fn new(earth: Earth) -> Self {
        Self {
            earth,
            entries: Vec::new(),
        }
    }

    /// Register a tier whose group is still loading
    pub fn add_pending(&mut self, tier: Tier, task: LoadTask) {
        self.set_slot(tier, TierSlot::Pending(task));
    }

    /// Insert a finished group, replacing whatever state its tier had.
    pub fn attach(&mut self, group: BoundaryGroup) {
        let tier = group.tier;
        self.set_slot(tier, TierSlot::Loaded(group));
    }

    fn set_slot(&mut self, tier: Tier, slot: TierSlot) {
        match self.entries.iter_mut().find(|e| e.tier == tier) {
            Some(entry) => entry.slot = slot,
            None => self.entries.push(TierEntry { tier, slot }),
        }
    }

    /// Check pending loads and attach the ones that finished.
    /// Returns the number of slots that changed state.
    pub fn poll_loads(&mut self) -> usize {
        let mut changed = 0;
        for entry in &mut self.entries {
            let ready = match &entry.slot {
                TierSlot::Pending(task) => task.poll(),
                _ => None,
            };
            let Some(result) = ready else { continue };

            changed += 1;
            entry.slot = match result {
                Ok(group) => {
                    tracing::info!(
                        tier = %entry.tier,
                        lines = group.lines.len(),
                        vertices = group.vertex_count(),
                        "Boundary tier attached"
                    );
                    TierSlot::Loaded(group)
                }
                Err(e) => {
                    tracing::warn!(tier = %entry.tier, error = %e, "Boundary tier unavailable");
                    TierSlot::Failed(e.to_string())
                }
            };
        }
        changed
    }

    /// Loaded group for a tier, if any
    pub fn tier_group(&self, tier: Tier) -> Option<&BoundaryGroup> {
        self.groups().find(|g| g.tier == tier)
    }

    pub fn slot(&self, tier: Tier) -> Option<&TierSlot> {
        self.entries.iter().find(|e| e.tier == tier).map(|e| &e.slot)
    }

    /// Loaded groups in draw order
    pub fn groups(&self) -> impl Iterator<Item = &BoundaryGroup> {
        self.entries.iter().filter_map(|e| match &e.slot {
            TierSlot::Loaded(group) => Some(group),
            _ => None,
        })
    }

    pub fn groups_mut(&mut self) -> impl Iterator<Item = &mut BoundaryGroup> {
        self.entries.iter_mut().filter_map(|e| match &mut e.slot {
            TierSlot::Loaded(group) => Some(group),
            _ => None,
        })
    }

    /// Any tier still waiting on its background load
    pub fn is_loading(&self) -> bool {
        self.entries.iter().any(|e| matches!(e.slot, TierSlot::Pending(_)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LoadError;
    use std::path::PathBuf;

    fn earth() -> Earth {
        Earth::new(1.0, None, Rgb(0, 0, 0))
    }

    fn group(tier: Tier) -> BoundaryGroup {
        let line = BoundaryLine {
            vertices: vec![DVec3::X, DVec3::Y],
            color: Rgb::WHITE,
        };
        BoundaryGroup::new(tier, Rgb::WHITE, vec![line])
    }

    #[test]
    fn test_attach_replaces_tier_slot() {
        let mut scene = Scene::new(earth());
        scene.add_pending(Tier::Country, LoadTask::ready(Tier::Country, Ok(group(Tier::Country))));
        scene.attach(group(Tier::Country));

        assert!(!scene.is_loading());
        assert_eq!(scene.groups().count(), 1);
        assert_eq!(scene.tier_group(Tier::Country).unwrap().vertex_count(), 2);
    }

    #[test]
    fn test_pending_tier_has_no_group_until_polled() {
        let mut scene = Scene::new(earth());
        scene.add_pending(Tier::Province, LoadTask::ready(Tier::Province, Ok(group(Tier::Province))));
        assert!(scene.is_loading());
        assert!(scene.tier_group(Tier::Province).is_none());

        assert_eq!(scene.poll_loads(), 1);
        assert!(!scene.is_loading());
        assert!(scene.tier_group(Tier::Province).is_some());

        // Nothing left to do
        assert_eq!(scene.poll_loads(), 0);
    }

    #[test]
    fn test_failed_load_leaves_no_group() {
        let mut scene = Scene::new(earth());
        let err = LoadError::NotFeatureCollection {
            path: PathBuf::from("bad.geojson"),
        };
        scene.add_pending(Tier::Country, LoadTask::ready(Tier::Country, Err(err)));
        scene.poll_loads();

        assert!(matches!(scene.slot(Tier::Country), Some(TierSlot::Failed(_))));
        assert_eq!(scene.groups().count(), 0);
    }

    #[test]
    fn test_draw_order_follows_insertion() {
        let mut scene = Scene::new(earth());
        scene.attach(group(Tier::Province));
        scene.attach(group(Tier::Country));
        let tiers: Vec<Tier> = scene.groups().map(|g| g.tier).collect();
        assert_eq!(tiers, vec![Tier::Province, Tier::Country]);
    }
}

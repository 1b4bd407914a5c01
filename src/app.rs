use crate::config::{GlobeConfig, Tier};
use crate::data::{BoundarySource, LoadTask};
use crate::geo::sphere_to_geo;
use crate::map::{EarthTexture, Earth, FrameUpdate, LodController, OrbitCamera, Scene, TierSlot};

/// Rotation per terminal cell of drag or key pan at scale 1, in radians
const ROTATE_PER_CELL: f64 = 0.03;

/// Cells moved per arrow-key press
const KEY_PAN_CELLS: i32 = 4;

/// What the status bar shows for a tier
#[derive(Clone, Debug, PartialEq)]
pub enum TierStatus {
    Disabled,
    Loading,
    Shown,
    Hidden,
    Failed(String),
}

/// Application state
pub struct App {
    pub config: GlobeConfig,
    pub scene: Scene,
    pub camera: OrbitCamera,
    pub lod: LodController,
    pub should_quit: bool,
    /// Last mouse position for drag tracking
    pub last_mouse: Option<(u16, u16)>,
    /// Globe area in character cells
    width: usize,
    height: usize,
}

impl App {
    /// Build the scene and start loading every enabled tier.
    /// `width`/`height` are the terminal size in cells.
    pub fn new(config: GlobeConfig, width: usize, height: usize) -> Self {
        let texture = match EarthTexture::load(&config.earth.texture_path) {
            Ok(texture) => Some(texture),
            Err(e) => {
                tracing::warn!(
                    path = %config.earth.texture_path.display(),
                    error = %e,
                    "Earth texture unavailable, using flat colour"
                );
                None
            }
        };

        let mut scene = Scene::new(Earth::new(config.earth.radius, texture, config.earth.ocean_color));
        let radius = config.earth.boundary_radius();
        for entry in config.tiers.iter().filter(|t| t.enabled) {
            scene.add_pending(entry.tier, LoadTask::spawn(BoundarySource::for_tier(entry), radius));
        }

        Self::with_scene(config, scene, width, height)
    }

    /// Wrap an already-built scene
    pub fn with_scene(config: GlobeConfig, scene: Scene, width: usize, height: usize) -> Self {
        let camera = OrbitCamera::new(&config.camera);
        let lod = LodController::new(&config);
        let mut app = Self {
            config,
            scene,
            camera,
            lod,
            should_quit: false,
            last_mouse: None,
            width: 0,
            height: 0,
        };
        app.resize(width, height);
        app
    }

    /// Update globe size when the terminal resizes
    pub fn resize(&mut self, width: usize, height: usize) {
        // Border takes 2 columns; border plus status bar take 3 rows
        self.width = width.saturating_sub(2);
        self.height = height.saturating_sub(3);
        if self.width > 0 && self.height > 0 {
            // Braille dots are 2x4 per cell
            self.camera
                .set_aspect((self.width * 2) as f64 / (self.height * 4) as f64);
        }
    }

    /// Globe area in cells
    pub fn globe_size(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    /// One frame: attach finished loads, apply inertia, run the LOD controller
    pub fn tick(&mut self) -> FrameUpdate {
        self.scene.poll_loads();
        self.camera.update();
        self.lod.frame_update(&mut self.scene, &mut self.camera)
    }

    pub fn on_wheel(&mut self, delta: f64) {
        self.lod.on_wheel(delta);
    }

    pub fn zoom_in(&mut self) {
        self.lod.zoom_in();
    }

    pub fn zoom_out(&mut self) {
        self.lod.zoom_out();
    }

    /// Pan the view by cells: positive dx looks further east, positive dy further south
    pub fn pan(&mut self, dx: i32, dy: i32) {
        let step = ROTATE_PER_CELL / self.lod.scale();
        self.camera.rotate(dx as f64 * step, -(dy as f64) * step);
    }

    pub fn pan_left(&mut self) {
        self.pan(-KEY_PAN_CELLS, 0);
    }

    pub fn pan_right(&mut self) {
        self.pan(KEY_PAN_CELLS, 0);
    }

    pub fn pan_up(&mut self) {
        self.pan(0, -KEY_PAN_CELLS);
    }

    pub fn pan_down(&mut self) {
        self.pan(0, KEY_PAN_CELLS);
    }

    /// Mouse drag: the surface follows the cursor and keeps spinning after release
    pub fn handle_drag(&mut self, x: u16, y: u16) {
        if let Some((last_x, last_y)) = self.last_mouse {
            let dx = x as i32 - last_x as i32;
            let dy = y as i32 - last_y as i32;
            let step = ROTATE_PER_CELL / self.lod.scale();
            self.camera.drag(-(dx as f64) * step, dy as f64 * step);
        }
        self.last_mouse = Some((x, y));
    }

    pub fn start_drag(&mut self, x: u16, y: u16) {
        self.camera.stop();
        self.last_mouse = Some((x, y));
    }

    pub fn end_drag(&mut self) {
        self.last_mouse = None;
    }

    /// Back to the starting camera and zoom; loaded tiers stay loaded
    pub fn reset_view(&mut self) {
        let (width, height) = (self.width + 2, self.height + 3);
        self.camera = OrbitCamera::new(&self.config.camera);
        self.lod.reset();
        self.resize(width, height);
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    /// Current and target scale
    pub fn zoom_level(&self) -> String {
        format!("{:.2}x → {:.1}x", self.lod.scale(), self.lod.target())
    }

    /// Geographic point under the screen centre
    pub fn center_coords(&self) -> String {
        let center = sphere_to_geo(self.camera.eye());
        format!(
            "{:.1}°{}, {:.1}°{}",
            center.lat.abs(),
            if center.lat >= 0.0 { "N" } else { "S" },
            center.lon.abs(),
            if center.lon >= 0.0 { "E" } else { "W" }
        )
    }

    /// Status for every configured tier, in table order
    pub fn tier_statuses(&self) -> Vec<(Tier, TierStatus)> {
        self.config
            .tiers
            .iter()
            .map(|entry| {
                let status = if !entry.enabled {
                    TierStatus::Disabled
                } else {
                    match self.scene.slot(entry.tier) {
                        None => TierStatus::Disabled,
                        Some(TierSlot::Pending(_)) => TierStatus::Loading,
                        Some(TierSlot::Loaded(group)) if group.visible => TierStatus::Shown,
                        Some(TierSlot::Loaded(_)) => TierStatus::Hidden,
                        Some(TierSlot::Failed(reason)) => TierStatus::Failed(reason.clone()),
                    }
                };
                (entry.tier, status)
            })
            .collect()
    }
}

use crate::braille::BrailleCanvas;
use crate::config::{LightingConfig, Rgb, Tier};
use crate::geo::sphere_to_geo;
use crate::map::camera::OrbitCamera;
use crate::map::geometry::draw_polyline;
use crate::map::scene::{BoundaryGroup, Earth, Scene};
use glam::{DMat4, DVec3, IVec2};
use rayon::prelude::*;

/// One tier's rasterised lines
pub struct TierLayer {
    pub tier: Tier,
    pub color: Rgb,
    pub canvas: BrailleCanvas,
}

/// Everything needed to paint one frame, in character cells
pub struct GlobeLayers {
    pub width: usize,
    pub height: usize,
    /// Shaded sphere colour per cell, row-major; `None` is space
    pub surface: Vec<Option<Rgb>>,
    /// Boundary layers back to front
    pub tiers: Vec<TierLayer>,
}

impl GlobeLayers {
    pub fn surface_at(&self, cx: usize, cy: usize) -> Option<Rgb> {
        if cx >= self.width || cy >= self.height {
            return None;
        }
        self.surface[cy * self.width + cx]
    }
}

/// Render the scene as seen from `camera` into a `width` x `height` cell grid.
/// The camera's aspect should already match the grid's dot aspect.
pub fn render_scene(
    scene: &Scene,
    camera: &OrbitCamera,
    lighting: &LightingConfig,
    width: usize,
    height: usize,
) -> GlobeLayers {
    let surface = render_surface(&scene.earth, camera, lighting, width, height);

    let view_proj = camera.view_proj();
    let eye = camera.eye();
    let tiers = scene
        .groups()
        .filter(|group| group.visible)
        .map(|group| {
            let mut canvas = BrailleCanvas::new(width, height);
            draw_group(&mut canvas, group, camera, &view_proj, eye);
            TierLayer {
                tier: group.tier,
                color: group.color,
                canvas,
            }
        })
        .collect();

    GlobeLayers {
        width,
        height,
        surface,
        tiers,
    }
}

/// Ray-cast the earth sphere once per cell
fn render_surface(
    earth: &Earth,
    camera: &OrbitCamera,
    lighting: &LightingConfig,
    width: usize,
    height: usize,
) -> Vec<Option<Rgb>> {
    let eye = camera.eye();
    let radius = earth.scaled_radius();
    let light = DVec3::from_array(lighting.position).normalize_or_zero();
    let pixel_w = (width * 2) as f64;
    let pixel_h = (height * 4) as f64;

    (0..width * height)
        .into_par_iter()
        .map(|idx| {
            let (cx, cy) = (idx % width, idx / width);
            // Centre of the cell in dot coordinates
            let px = cx as f64 * 2.0 + 1.0;
            let py = cy as f64 * 4.0 + 2.0;
            let ndc_x = px / pixel_w * 2.0 - 1.0;
            let ndc_y = 1.0 - py / pixel_h * 2.0;

            let dir = camera.ray_dir(ndc_x, ndc_y);
            let hit = ray_sphere(eye, dir, radius)?;
            let normal = hit / radius;

            let base = match &earth.texture {
                Some(texture) => {
                    let (u, v) = sphere_to_geo(hit).uv();
                    texture.sample(u, v)
                }
                None => earth.ocean_color,
            };
            let brightness = lighting.ambient + lighting.diffuse * normal.dot(light).max(0.0);
            Some(base.shade(brightness))
        })
        .collect()
}

/// Nearest intersection in front of `origin`, if any
fn ray_sphere(origin: DVec3, dir: DVec3, radius: f64) -> Option<DVec3> {
    let b = origin.dot(dir);
    let c = origin.length_squared() - radius * radius;
    let disc = b * b - c;
    if disc < 0.0 {
        return None;
    }
    let t = -b - disc.sqrt();
    (t > 0.0).then(|| origin + dir * t)
}

fn draw_group(
    canvas: &mut BrailleCanvas,
    group: &BoundaryGroup,
    camera: &OrbitCamera,
    view_proj: &DMat4,
    eye: DVec3,
) {
    let pixel_w = canvas.pixel_width() as f64;
    let pixel_h = canvas.pixel_height() as f64;

    for line in &group.lines {
        let points = line.vertices.iter().map(|&v| {
            let world = v * group.scale;
            // Far side of the globe is hidden behind it
            if world.dot(eye - world) <= 0.0 {
                return None;
            }
            let ndc = camera.project(view_proj, world)?;
            let x = (ndc.x + 1.0) * 0.5 * pixel_w;
            let y = (1.0 - ndc.y) * 0.5 * pixel_h;
            if !x.is_finite() || !y.is_finite() || x.abs() > i32::MAX as f64 / 4.0 || y.abs() > i32::MAX as f64 / 4.0
            {
                return None;
            }
            Some(IVec2::new(x.floor() as i32, y.floor() as i32))
        });
        draw_polyline(canvas, points);
    }
}

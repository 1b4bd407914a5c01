use crate::config::CameraConfig;
use glam::{DMat4, DVec2, DVec3, DVec4};

/// Distance limits derived from the current zoom scale
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraConstraint {
    pub min_distance: f64,
    pub max_distance: f64,
}

impl CameraConstraint {
    /// Both limits grow linearly with `scale`.
    pub fn for_scale(base_radius: f64, scale: f64, config: &CameraConfig) -> Self {
        Self {
            min_distance: base_radius * scale * config.min_distance_factor,
            max_distance: base_radius * scale * config.max_distance_factor,
        }
    }
}

/// Perspective camera orbiting the origin, +Y up.
///
/// Only rotation is user driven; zoom happens by scaling the scene and
/// letting the distance limits push the camera along.
#[derive(Clone, Debug)]
pub struct OrbitCamera {
    /// Rotation around +Y; 0 looks down -Z from the +Z side
    pub yaw: f64,
    /// Elevation above the equatorial plane
    pub pitch: f64,
    pub distance: f64,
    pub fov_y: f64,
    pub aspect: f64,
    pub near: f64,
    pub far: f64,
    pub min_distance: f64,
    pub max_distance: f64,
    /// Angular velocity (yaw, pitch) per frame, decays by `damping`
    velocity: DVec2,
    damping: f64,
}

const PITCH_LIMIT: f64 = std::f64::consts::FRAC_PI_2 - 0.017;
const REST_VELOCITY: f64 = 1e-5;

impl OrbitCamera {
    pub fn new(config: &CameraConfig) -> Self {
        Self {
            yaw: 0.0,
            pitch: 0.0,
            distance: config.initial_distance,
            fov_y: config.fov_y_deg.to_radians(),
            aspect: 1.0,
            near: config.near,
            far: config.far,
            min_distance: 0.0,
            max_distance: f64::INFINITY,
            velocity: DVec2::ZERO,
            damping: config.damping.clamp(0.0, 1.0),
        }
    }

    pub fn eye(&self) -> DVec3 {
        let (sin_yaw, cos_yaw) = self.yaw.sin_cos();
        let (sin_pitch, cos_pitch) = self.pitch.sin_cos();
        DVec3::new(
            self.distance * cos_pitch * sin_yaw,
            self.distance * sin_pitch,
            self.distance * cos_pitch * cos_yaw,
        )
    }

    pub fn view_proj(&self) -> DMat4 {
        let view = DMat4::look_at_rh(self.eye(), DVec3::ZERO, DVec3::Y);
        let proj = DMat4::perspective_rh(self.fov_y, self.aspect.max(1e-3), self.near, self.far);
        proj * view
    }

    /// Project a world point to normalized device coordinates.
    /// `None` for points behind the near plane.
    pub fn project(&self, view_proj: &DMat4, p: DVec3) -> Option<DVec3> {
        let clip: DVec4 = *view_proj * p.extend(1.0);
        if clip.w <= self.near {
            return None;
        }
        Some(clip.truncate() / clip.w)
    }

    /// Unit ray direction through an NDC position
    pub fn ray_dir(&self, ndc_x: f64, ndc_y: f64) -> DVec3 {
        let eye = self.eye();
        let forward = (-eye).normalize();
        let right = forward.cross(DVec3::Y).normalize();
        let up = right.cross(forward);
        let tan_half = (self.fov_y * 0.5).tan();
        (forward + right * (ndc_x * tan_half * self.aspect) + up * (ndc_y * tan_half)).normalize()
    }

    pub fn set_aspect(&mut self, aspect: f64) {
        if aspect.is_finite() && aspect > 0.0 {
            self.aspect = aspect;
        }
    }

    /// Install new distance limits and pull the camera inside them
    pub fn set_constraint(&mut self, constraint: CameraConstraint) {
        self.min_distance = constraint.min_distance;
        self.max_distance = constraint.max_distance;
        self.distance = self.distance.clamp(self.min_distance, self.max_distance);
    }

    /// Rotate immediately by the given angles (radians)
    pub fn rotate(&mut self, d_yaw: f64, d_pitch: f64) {
        self.yaw = (self.yaw + d_yaw).rem_euclid(std::f64::consts::TAU);
        self.pitch = (self.pitch + d_pitch).clamp(-PITCH_LIMIT, PITCH_LIMIT);
    }

    /// Drag delta (radians); keeps spinning after release until damped out
    pub fn drag(&mut self, d_yaw: f64, d_pitch: f64) {
        self.rotate(d_yaw, d_pitch);
        self.velocity = DVec2::new(d_yaw, d_pitch);
    }

    /// Per-frame inertia
    pub fn update(&mut self) {
        if self.velocity.length_squared() < REST_VELOCITY * REST_VELOCITY {
            self.velocity = DVec2::ZERO;
            return;
        }
        self.rotate(self.velocity.x, self.velocity.y);
        self.velocity *= 1.0 - self.damping;
    }

    pub fn stop(&mut self) {
        self.velocity = DVec2::ZERO;
    }
}

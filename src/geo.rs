use glam::DVec3;
use std::f64::consts::PI;

/// A geographic coordinate in degrees
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GeoPoint {
    /// Longitude (-180 to 180)
    pub lon: f64,
    /// Latitude (-90 to 90)
    pub lat: f64,
}

/// One polygon boundary path. Drawn in order, never implicitly closed.
pub type Ring = Vec<GeoPoint>;

impl GeoPoint {
    pub const fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }

    /// Build from a GeoJSON position (`[lon, lat, ...]`).
    /// Positions with fewer than two values are rejected.
    pub fn from_position(position: &[f64]) -> Option<Self> {
        match position {
            [lon, lat, ..] => Some(Self::new(*lon, *lat)),
            _ => None,
        }
    }

    /// Equirectangular texture coordinate matching [`geo_to_sphere`]'s orientation.
    /// u runs west to east from the antimeridian, v runs north to south.
    #[inline]
    pub fn uv(&self) -> (f64, f64) {
        let u = ((self.lon + 180.0) / 360.0).rem_euclid(1.0);
        let v = ((90.0 - self.lat) / 180.0).clamp(0.0, 1.0);
        (u, v)
    }
}

/// Project lon/lat (degrees) onto a sphere of the given radius.
///
/// Polar angle is measured from the north pole and the azimuth is offset by
/// 180°, with +Y up. Boundary lines only line up with the earth texture under
/// exactly this orientation.
#[inline(always)]
pub fn geo_to_sphere(lon: f64, lat: f64, radius: f64) -> DVec3 {
    let phi = (90.0 - lat) * (PI / 180.0);
    let theta = (lon + 180.0) * (PI / 180.0);
    let (sin_phi, cos_phi) = phi.sin_cos();
    let (sin_theta, cos_theta) = theta.sin_cos();
    DVec3::new(
        -radius * sin_phi * cos_theta,
        radius * cos_phi,
        radius * sin_phi * sin_theta,
    )
}

/// Inverse of [`geo_to_sphere`] for any non-zero point.
pub fn sphere_to_geo(p: DVec3) -> GeoPoint {
    let r = p.length();
    if r == 0.0 {
        return GeoPoint::new(0.0, 0.0);
    }
    let phi = (p.y / r).clamp(-1.0, 1.0).acos();
    let theta = p.z.atan2(-p.x);
    let lat = 90.0 - phi.to_degrees();
    let mut lon = theta.to_degrees() - 180.0;
    if lon < -180.0 {
        lon += 360.0;
    }
    GeoPoint::new(lon, lat)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn test_projected_length_equals_radius() {
        for r in [0.5, 1.0, 1.001, 6371.0] {
            let mut lat = -90.0;
            while lat <= 90.0 {
                let mut lon = -180.0;
                while lon <= 180.0 {
                    let p = geo_to_sphere(lon, lat, r);
                    assert!((p.length() - r).abs() < EPS * r.max(1.0), "{lon},{lat},{r}");
                    lon += 15.0;
                }
                lat += 7.5;
            }
        }
    }

    #[test]
    fn test_projection_is_pure() {
        let a = geo_to_sphere(116.4, 39.9, 1.001);
        let b = geo_to_sphere(116.4, 39.9, 1.001);
        assert_eq!(a, b);
    }

    #[test]
    fn test_orientation_convention() {
        // North pole is +Y
        let north = geo_to_sphere(0.0, 90.0, 1.0);
        assert!((north - DVec3::Y).length() < EPS);

        // Prime meridian on the equator faces +X
        let prime = geo_to_sphere(0.0, 0.0, 1.0);
        assert!((prime - DVec3::X).length() < EPS);

        // 90°E faces -Z
        let east = geo_to_sphere(90.0, 0.0, 1.0);
        assert!((east + DVec3::Z).length() < EPS);
    }

    #[test]
    fn test_sphere_to_geo_recovers_point() {
        for &(lon, lat) in &[(0.0, 0.0), (116.4, 39.9), (-74.0, 40.7), (151.2, -33.9), (-179.5, 10.0)] {
            let g = sphere_to_geo(geo_to_sphere(lon, lat, 2.5));
            assert!((g.lon - lon).abs() < 1e-9, "lon {lon} -> {}", g.lon);
            assert!((g.lat - lat).abs() < 1e-9, "lat {lat} -> {}", g.lat);
        }
    }

    #[test]
    fn test_from_position() {
        assert_eq!(GeoPoint::from_position(&[1.0, 2.0]), Some(GeoPoint::new(1.0, 2.0)));
        assert_eq!(GeoPoint::from_position(&[1.0, 2.0, 30.0]), Some(GeoPoint::new(1.0, 2.0)));
        assert_eq!(GeoPoint::from_position(&[1.0]), None);
    }

    #[test]
    fn test_uv_corners() {
        assert_eq!(GeoPoint::new(-180.0, 90.0).uv(), (0.0, 0.0));
        let (u, v) = GeoPoint::new(0.0, 0.0).uv();
        assert!((u - 0.5).abs() < EPS && (v - 0.5).abs() < EPS);
    }
}

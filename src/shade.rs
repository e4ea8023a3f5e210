use nalgebra::{vector, Vector3};

use crate::geometry::normalize;
use crate::picture::Rgb;
use crate::polytope::Polytope;
use crate::ray::Hit;

/// Normal used when a hit has no entry face, i.e. the eye is inside the solid.
pub const FALLBACK_NORMAL: Vector3<f64> = vector![0.0, 0.0, 1.0];

pub const BACKGROUND_COLOR: Rgb = Rgb::GREEN;

/// A directional light plus the color painted where nothing is hit.
#[derive(Clone, Debug)]
pub struct Lighting {
    direction: Vector3<f64>,
    pub background: Rgb,
}

impl Lighting {
    /// `direction` points from the surface towards the light and need not be
    /// normalized.
    pub fn new(direction: Vector3<f64>, background: Rgb) -> Self {
        Lighting { direction: normalize(direction), background }
    }

    pub fn direction(&self) -> &Vector3<f64> {
        &self.direction
    }

    /// Lambert term in `[0, 1]`.
    pub fn diffuse(&self, normal: &Vector3<f64>) -> f64 {
        normal.dot(&self.direction).clamp(0.0, 1.0)
    }

    pub fn shade(&self, hit: Option<&Hit>, polytope: &Polytope) -> Rgb {
        let Some(hit) = hit else {
            return self.background;
        };
        let normal = hit.face
            .map(|face| polytope.planes()[face].normal)
            .unwrap_or(FALLBACK_NORMAL);
        Rgb::gray(to_level(self.diffuse(&normal)))
    }
}

impl Default for Lighting {
    fn default() -> Self {
        Lighting::new(vector![1.0, 1.0, -1.0], BACKGROUND_COLOR)
    }
}

fn to_level(intensity: f64) -> u8 {
    (intensity.clamp(0.0, 1.0) * 255.0) as u8
}

#[cfg(test)]
mod tests {
    use crate::polytope::Plane;
    use crate::ray::Side;

    use super::*;

    fn single_face(normal: Vector3<f64>) -> Polytope {
        Polytope::new(vec![Plane::new(normal, 1.0)], 1e-6)
    }

    #[test]
    fn miss_paints_background() {
        let lighting = Lighting::default();
        assert_eq!(lighting.shade(None, &single_face(FALLBACK_NORMAL)), Rgb::GREEN);
    }

    #[test]
    fn face_towards_light_is_white() {
        let lighting = Lighting::new(vector![0.0, 0.0, -3.0], Rgb::GREEN);
        let polytope = single_face(vector![0.0, 0.0, -1.0]);
        let hit = Hit { t: 1.0, side: Side::Entry, face: Some(0) };
        assert_eq!(lighting.shade(Some(&hit), &polytope), Rgb::gray(255));
    }

    #[test]
    fn face_away_from_light_is_black() {
        let lighting = Lighting::default();
        let polytope = single_face(-lighting.direction());
        let hit = Hit { t: 1.0, side: Side::Entry, face: Some(0) };
        assert_eq!(lighting.shade(Some(&hit), &polytope), Rgb::BLACK);
    }

    #[test]
    fn exit_hit_uses_fallback_normal() {
        let lighting = Lighting::new(vector![0.0, 0.0, 1.0], Rgb::GREEN);
        let polytope = single_face(vector![1.0, 0.0, 0.0]);
        let hit = Hit { t: 1.0, side: Side::Exit, face: None };
        assert_eq!(lighting.shade(Some(&hit), &polytope), Rgb::gray(255));
    }

    #[test]
    fn intensity_truncates_to_level() {
        assert_eq!(to_level(0.187_592_474_085_079_9), 47);
        assert_eq!(to_level(1.5), 255);
        assert_eq!(to_level(-0.2), 0);
    }
}

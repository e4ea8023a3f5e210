use nalgebra::{point, vector, Point3};

use crate::geometry::normalize;
use crate::ray::Ray;

/// Pinhole camera looking down +z.
#[derive(Clone, Debug, PartialEq)]
pub struct Camera {
    pub position: Point3<f64>,
    /// Pixels per world unit on the image plane.
    pub screen_scale: f64,
    /// Distance from the eye to the image plane, in image-plane units.
    pub focal_depth: f64,
}

impl Default for Camera {
    fn default() -> Self {
        Camera {
            position: point![0.0, 0.0, -5.0],
            screen_scale: 300.0,
            focal_depth: 5.0,
        }
    }
}

impl Camera {
    pub fn new(position: Point3<f64>) -> Self {
        Camera { position, ..Default::default() }
    }

    pub fn viewport(&self, width: u32, height: u32) -> Viewport {
        Viewport {
            origin: self.position,
            half_width: width as f64 / 2.0,
            half_height: height as f64 / 2.0,
            screen_scale: self.screen_scale,
            focal_depth: self.focal_depth,
        }
    }
}

/// A camera bound to a picture size.
pub struct Viewport {
    pub origin: Point3<f64>,
    pub half_width: f64,
    pub half_height: f64,
    pub screen_scale: f64,
    pub focal_depth: f64,
}

impl Viewport {
    /// The ray through pixel `(x, y)`, with `y` growing downwards.
    pub fn emit_ray(&self, x: u32, y: u32) -> Ray {
        let u = (x as f64 - self.half_width) / self.screen_scale;
        let v = (self.half_height - y as f64) / self.screen_scale;
        Ray::new(self.origin, normalize(vector![u, v, self.focal_depth]))
    }
}

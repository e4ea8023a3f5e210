use log::trace;
use nalgebra::{Point3, Vector3};
use rayon::prelude::*;

use crate::camera::{Camera, Viewport};
use crate::picture::{Picture, Rgb};
use crate::polytope::Polytope;
use crate::ray::cast;
use crate::shade::{Lighting, BACKGROUND_COLOR};

/// Rows handed to one rayon task.
const LINES_PER_WORK: usize = 50;

/// Color of pixel `(x, y)` against an already rotated polytope.
pub fn render_pixel(x: u32, y: u32, viewport: &Viewport, rotated: &Polytope, lighting: &Lighting) -> Rgb {
    let ray = viewport.emit_ray(x, y);
    lighting.shade(cast(&ray, rotated).as_ref(), rotated)
}

/// Renders `polytope` tumbled by `angle` into `picture`.
///
/// The rotated planes are computed once up front and shared read-only by
/// every task; each task owns a disjoint band of rows.
pub fn render_into(
    mut picture: Picture<&mut [Rgb]>,
    polytope: &Polytope,
    angle: f64,
    camera: &Camera,
    lighting: &Lighting,
) {
    let width = picture.width();
    let viewport = camera.viewport(width, picture.height());
    let rotated = polytope.rotated(angle);

    let band_len = width as usize * LINES_PER_WORK;
    if band_len == 0 {
        return;
    }
    picture.buffer_mut()
        .par_chunks_mut(band_len)
        .enumerate()
        .for_each(|(band, pixels)| {
            let first_row = band * LINES_PER_WORK;
            trace!(target: "render", "Rendering rows {}..{}", first_row, first_row + pixels.len() / width as usize);
            for (i, pixel) in pixels.iter_mut().enumerate() {
                let x = (i % width as usize) as u32;
                let y = (first_row + i / width as usize) as u32;
                *pixel = render_pixel(x, y, &viewport, &rotated, lighting);
            }
        });
}

/// Renders one frame into a fresh row-major buffer of `width * height`
/// pixels, using the default screen mapping and background.
pub fn render_frame(
    polytope: &Polytope,
    angle: f64,
    camera_position: Point3<f64>,
    light_direction: Vector3<f64>,
    width: u32,
    height: u32,
) -> Vec<Rgb> {
    let camera = Camera::new(camera_position);
    let lighting = Lighting::new(light_direction, BACKGROUND_COLOR);
    let mut pixels = vec![BACKGROUND_COLOR; width as usize * height as usize];
    render_into(Picture::new(pixels.as_mut_slice(), (width, height)), polytope, angle, &camera, &lighting);
    pixels
}

#[cfg(test)]
mod tests {
    use nalgebra::{point, vector};

    use crate::polytope::build_polytope;
    use crate::solid::Solid;

    use super::*;

    fn dodecahedron(scale: f64) -> Polytope {
        build_polytope(&Solid::Dodecahedron.vertices(scale), 30)
    }

    #[test]
    fn frame_has_one_pixel_per_cell() {
        let pixels = render_frame(&dodecahedron(0.5), 0.3, point![0.0, 0.0, -5.0], vector![1.0, 1.0, -1.0], 64, 48);
        assert_eq!(pixels.len(), 64 * 48);
    }

    #[test]
    fn parallel_pass_matches_pixel_by_pixel() {
        let polytope = dodecahedron(0.5);
        let camera = Camera { screen_scale: 40.0, ..Camera::default() };
        let lighting = Lighting::default();
        let (width, height) = (97, 131);
        let mut pixels = vec![Rgb::BLACK; width as usize * height as usize];
        render_into(Picture::new(pixels.as_mut_slice(), (width, height)), &polytope, 0.8, &camera, &lighting);

        let viewport = camera.viewport(width, height);
        let rotated = polytope.rotated(0.8);
        let picture = Picture::new(pixels.as_slice(), (width, height));
        for y in 0..height {
            for x in 0..width {
                assert_eq!(*picture.pixel(x, y), render_pixel(x, y, &viewport, &rotated, &lighting), "({x}, {y})");
            }
        }
    }

    #[test]
    fn zero_sized_frame_is_empty() {
        let pixels = render_frame(&dodecahedron(0.5), 0.0, point![0.0, 0.0, -5.0], vector![1.0, 1.0, -1.0], 0, 10);
        assert!(pixels.is_empty());
    }
}

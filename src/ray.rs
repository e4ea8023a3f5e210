use nalgebra::{Point3, Vector3};

use crate::polytope::Polytope;

pub struct Ray {
    pub origin: Point3<f64>,
    pub direction: Vector3<f64>,
}

impl Ray {
    pub fn new(origin: Point3<f64>, direction: Vector3<f64>) -> Self {
        Self { origin, direction }
    }

    pub fn at(&self, t: f64) -> Point3<f64> {
        self.origin + self.direction * t
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
    /// The ray started outside and enters the solid.
    Entry,
    /// The ray started inside and leaves the solid.
    Exit,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Hit {
    pub t: f64,
    pub side: Side,
    /// Index of the plane the ray entered through. Only entry hits carry one.
    pub face: Option<usize>,
}

/// Intersects `ray` with the solid bounded by `polytope`.
///
/// Each plane clips the ray's parameter range `[t_near, t_far]`: planes facing
/// the ray raise `t_near`, planes facing away lower `t_far`. Planes the ray
/// runs parallel to are ignored.
pub fn cast(ray: &Ray, polytope: &Polytope) -> Option<Hit> {
    let eps = polytope.epsilon();
    let mut t_near = f64::NEG_INFINITY;
    let mut t_far = f64::INFINITY;
    let mut entry_face = None;

    for (i, plane) in polytope.planes().iter().enumerate() {
        let denom = plane.normal.dot(&ray.direction);
        if denom.abs() < eps {
            continue;
        }
        let t = (plane.offset - plane.normal.dot(&ray.origin.coords)) / denom;
        if denom < 0.0 {
            if t > t_near {
                t_near = t;
                entry_face = Some(i);
            }
        } else if t < t_far {
            t_far = t;
        }
    }

    if t_near > t_far || t_far < 0.0 {
        return None;
    }
    if t_near >= 0.0 {
        Some(Hit { t: t_near, side: Side::Entry, face: entry_face })
    } else {
        Some(Hit { t: t_far, side: Side::Exit, face: None })
    }
}

#[cfg(test)]
mod tests {
    use nalgebra::{point, vector};

    use crate::polytope::build_polytope;
    use crate::solid::Solid;

    use super::*;

    fn dodecahedron() -> Polytope {
        build_polytope(&Solid::Dodecahedron.vertices(0.5), 30)
    }

    #[test]
    fn ray_at_center_enters_through_a_face() {
        let polytope = dodecahedron();
        let ray = Ray::new(point![0.0, 0.0, -5.0], vector![0.0, 0.0, 1.0]);
        let hit = cast(&ray, &polytope).expect("hit");
        assert_eq!(hit.side, Side::Entry);
        assert!(hit.t >= 0.0);
        let face = hit.face.expect("entry face");
        assert!(face < polytope.len());
        // the entry point lies on the reported face
        let plane = polytope.planes()[face];
        let point = ray.at(hit.t);
        assert!(plane.signed_distance(&point).abs() < 1e-9);
        assert!(polytope.contains(&point));
    }

    #[test]
    fn ray_aimed_away_misses() {
        let polytope = dodecahedron();
        let ray = Ray::new(point![0.0, 0.0, -5.0], vector![0.0, 0.0, -1.0]);
        assert_eq!(cast(&ray, &polytope), None);
    }

    #[test]
    fn ray_passing_beside_misses() {
        let polytope = dodecahedron();
        let ray = Ray::new(point![2.0, 0.0, -5.0], vector![0.0, 0.0, 1.0]);
        assert_eq!(cast(&ray, &polytope), None);
    }

    #[test]
    fn opposite_axis_cameras_see_the_same_distance() {
        let polytope = dodecahedron();
        let axes = [vector![1.0, 0.0, 0.0], vector![0.0, 1.0, 0.0], vector![0.0, 0.0, 1.0]];
        for axis in axes {
            let from_minus = cast(&Ray::new(Point3::origin() - axis * 5.0, axis), &polytope)
                .expect("hit from minus side");
            let from_plus = cast(&Ray::new(Point3::origin() + axis * 5.0, -axis), &polytope)
                .expect("hit from plus side");
            assert!((from_minus.t - from_plus.t).abs() < 1e-9, "{axis:?}");
            // 5 minus the inradius over the cosine to the nearest face
            assert!((from_minus.t - 4.190_983_005_625_052).abs() < 1e-9, "{axis:?}");
        }
    }

    #[test]
    fn origin_inside_reports_exit_without_face() {
        let polytope = dodecahedron();
        let ray = Ray::new(Point3::origin(), vector![0.0, 0.0, 1.0]);
        let hit = cast(&ray, &polytope).expect("exit hit");
        assert_eq!(hit.side, Side::Exit);
        assert_eq!(hit.face, None);
        assert!((hit.t - 0.809_016_994_374_947_3).abs() < 1e-9);
    }

    #[test]
    fn solid_behind_the_origin_is_missed() {
        let polytope = dodecahedron();
        let ray = Ray::new(point![0.0, 0.0, 5.0], vector![0.0, 0.0, 1.0]);
        assert_eq!(cast(&ray, &polytope), None);
    }

    #[test]
    fn parallel_planes_are_skipped() {
        let polytope = build_polytope(&Solid::Cube.vertices(1.0), 30);
        // runs along +z, parallel to four of the six faces
        let ray = Ray::new(point![0.5, 0.25, -4.0], vector![0.0, 0.0, 1.0]);
        let hit = cast(&ray, &polytope).expect("hit");
        assert!((hit.t - 3.0).abs() < 1e-12);
        let face = polytope.planes()[hit.face.expect("entry face")];
        assert!((face.normal - vector![0.0, 0.0, -1.0]).magnitude() < 1e-12);
    }

    #[test]
    fn empty_polytope_never_produces_an_entry() {
        let polytope = Polytope::new(Vec::new(), 1e-6);
        let ray = Ray::new(point![0.0, 0.0, -5.0], vector![0.0, 0.0, 1.0]);
        let hit = cast(&ray, &polytope).expect("unbounded range");
        assert_eq!(hit.side, Side::Exit);
        assert_eq!(hit.face, None);
    }
}

//! Half-space representation of a convex solid, derived straight from its
//! vertices.
//!
//! Extraction is brute force: every vertex triple proposes a plane and every
//! vertex votes on it, O(n⁴) in total. At the sizes rendered here (20 points,
//! ~76k dot products once at startup) this is instant; it stops being a good
//! idea somewhere in the hundreds of points.

use std::fmt;

use log::{debug, warn};
use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};

use crate::geometry::{normalize, tumble, DEDUP_EPSILON, DEGENERACY_EPSILON};

/// Both tolerances used while building and casting against a polytope.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Tolerances {
    /// Collinearity, parallel rays and the on-plane band.
    pub degeneracy: f64,
    /// Maximum normal/offset difference for two planes to count as one face.
    pub dedup: f64,
}

impl Default for Tolerances {
    fn default() -> Self {
        Tolerances {
            degeneracy: DEGENERACY_EPSILON,
            dedup: DEDUP_EPSILON,
        }
    }
}

/// The half-space `{p : normal · p <= offset}` with an outward unit normal.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Plane {
    pub normal: Vector3<f64>,
    pub offset: f64,
}

impl Plane {
    pub fn new(normal: Vector3<f64>, offset: f64) -> Self {
        Plane { normal, offset }
    }

    /// Positive outside the half-space, negative inside.
    pub fn signed_distance(&self, p: &Point3<f64>) -> f64 {
        self.normal.dot(&p.coords) - self.offset
    }

    fn same_face(&self, other: &Plane, tolerance: f64) -> bool {
        (self.normal.dot(&other.normal) - 1.0).abs() < tolerance
            && (self.offset - other.offset).abs() < tolerance
    }
}

#[derive(Clone, Debug)]
pub struct Polytope {
    planes: Vec<Plane>,
    epsilon: f64,
}

impl Polytope {
    pub fn new(planes: Vec<Plane>, epsilon: f64) -> Self {
        Polytope { planes, epsilon }
    }

    pub fn planes(&self) -> &[Plane] {
        &self.planes
    }

    pub fn len(&self) -> usize {
        self.planes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.planes.is_empty()
    }

    /// The degeneracy tolerance the planes were extracted with; the ray caster
    /// reuses it for its parallel test.
    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    pub fn contains(&self, p: &Point3<f64>) -> bool {
        self.planes.iter().all(|plane| plane.signed_distance(p) <= self.epsilon)
    }

    /// A copy with every normal tumbled by `angle` and every offset kept.
    ///
    /// Offsets survive because the solid is centered on the origin, which the
    /// rotation leaves fixed.
    pub fn rotated(&self, angle: f64) -> Polytope {
        let rotation = tumble(angle);
        let planes = self.planes.iter()
            .map(|plane| Plane::new(rotation * plane.normal, plane.offset))
            .collect();
        Polytope::new(planes, self.epsilon)
    }

    /// Compares the face count against what the input solid should produce.
    /// A mismatch is logged and handed back; it never stops rendering.
    pub fn check_face_count(&self, expected: usize) -> Result<(), FaceCountMismatch> {
        if self.planes.len() == expected {
            return Ok(());
        }
        let mismatch = FaceCountMismatch { expected, found: self.planes.len() };
        warn!(target: "hull", "{}", mismatch);
        Err(mismatch)
    }
}

/// Extraction found a different number of faces than the solid has.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FaceCountMismatch {
    pub expected: usize,
    pub found: usize,
}

impl fmt::Display for FaceCountMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "expected {} planes, but got {}", self.expected, self.found)
    }
}

impl std::error::Error for FaceCountMismatch {}

/// What happened to the triples examined during one extraction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ExtractionStats {
    pub triples: usize,
    pub collinear: usize,
    pub interior: usize,
    pub duplicates: usize,
    /// Hull triples thrown away because the capacity was already reached. A
    /// face that never made it in is counted once per triple on it.
    pub over_capacity: usize,
}

/// Builds the polytope of `vertices` with the default tolerances.
pub fn build_polytope(vertices: &[Point3<f64>], max_faces: usize) -> Polytope {
    extract_planes(vertices, max_faces, &Tolerances::default()).0
}

/// Finds every face plane of the convex hull of `vertices`.
///
/// Triples are visited in lexicographic `(i, j, k)` order and accepted planes
/// keep that order. Once `max_faces` planes are held, further faces are
/// counted in the stats but not stored.
pub fn extract_planes(
    vertices: &[Point3<f64>],
    max_faces: usize,
    tolerances: &Tolerances,
) -> (Polytope, ExtractionStats) {
    let eps = tolerances.degeneracy;
    let mut planes: Vec<Plane> = Vec::with_capacity(max_faces);
    let mut stats = ExtractionStats::default();

    let n = vertices.len();
    for i in 0..n {
        for j in i + 1..n {
            for k in j + 1..n {
                stats.triples += 1;
                let Some(plane) = candidate_plane(vertices, [i, j, k], eps) else {
                    stats.collinear += 1;
                    continue;
                };

                let mut all_below = true;
                let mut all_above = true;
                for v in vertices {
                    let side = plane.signed_distance(v);
                    if side > eps {
                        all_below = false;
                    }
                    if side < -eps {
                        all_above = false;
                    }
                }
                if !all_below && !all_above {
                    stats.interior += 1;
                    continue;
                }
                let plane = if all_below {
                    plane
                } else {
                    Plane::new(-plane.normal, -plane.offset)
                };

                if planes.iter().any(|p| p.same_face(&plane, tolerances.dedup)) {
                    stats.duplicates += 1;
                } else if planes.len() < max_faces {
                    planes.push(plane);
                } else {
                    stats.over_capacity += 1;
                }
            }
        }
    }

    debug!(
        target: "hull",
        "Extracted {} planes from {} vertices ({} triples, {} collinear, {} interior, {} duplicate)",
        planes.len(), n, stats.triples, stats.collinear, stats.interior, stats.duplicates,
    );
    if stats.over_capacity > 0 {
        warn!(target: "hull", "Plane capacity {} reached, {} hull triples dropped", max_faces, stats.over_capacity);
    }

    (Polytope::new(planes, eps), stats)
}

/// The plane through three vertices, unoriented, or `None` if they are
/// collinear.
fn candidate_plane(vertices: &[Point3<f64>], [i, j, k]: [usize; 3], eps: f64) -> Option<Plane> {
    let edge1 = vertices[j] - vertices[i];
    let edge2 = vertices[k] - vertices[i];
    let normal = edge1.cross(&edge2);
    if normal.magnitude() < eps {
        return None;
    }
    let normal = normalize(normal);
    Some(Plane::new(normal, normal.dot(&vertices[i].coords)))
}

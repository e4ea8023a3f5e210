use nalgebra::{point, Point3};
use serde::{Deserialize, Serialize};

const PHI: f64 = 1.618_033_988_749_895;
const INV_PHI: f64 = 1.0 / PHI;

/// Canonical vertex sets the renderer knows how to show, each centered on the
/// origin.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Solid {
    Dodecahedron,
    Cube,
    Octahedron,
    Icosahedron,
}

impl Solid {
    /// Number of faces the hull extractor should find for this solid.
    pub fn expected_faces(&self) -> usize {
        match self {
            Solid::Dodecahedron => 12,
            Solid::Cube => 6,
            Solid::Octahedron => 8,
            Solid::Icosahedron => 20,
        }
    }

    pub fn vertices(&self, scale: f64) -> Vec<Point3<f64>> {
        let base: &[[f64; 3]] = match self {
            Solid::Dodecahedron => &DODECAHEDRON,
            Solid::Cube => &CUBE,
            Solid::Octahedron => &OCTAHEDRON,
            Solid::Icosahedron => &ICOSAHEDRON,
        };
        base.iter()
            .map(|[x, y, z]| point![x * scale, y * scale, z * scale])
            .collect()
    }
}

const DODECAHEDRON: [[f64; 3]; 20] = [
    [-1.0, -1.0, -1.0], [-1.0, -1.0, 1.0], [-1.0, 1.0, -1.0], [-1.0, 1.0, 1.0],
    [1.0, -1.0, -1.0], [1.0, -1.0, 1.0], [1.0, 1.0, -1.0], [1.0, 1.0, 1.0],
    [0.0, -INV_PHI, -PHI], [0.0, -INV_PHI, PHI],
    [0.0, INV_PHI, -PHI], [0.0, INV_PHI, PHI],
    [-PHI, 0.0, -INV_PHI], [-PHI, 0.0, INV_PHI],
    [PHI, 0.0, -INV_PHI], [PHI, 0.0, INV_PHI],
    [-INV_PHI, -PHI, 0.0], [-INV_PHI, PHI, 0.0],
    [INV_PHI, -PHI, 0.0], [INV_PHI, PHI, 0.0],
];

const CUBE: [[f64; 3]; 8] = [
    [-1.0, -1.0, -1.0], [-1.0, -1.0, 1.0], [-1.0, 1.0, -1.0], [-1.0, 1.0, 1.0],
    [1.0, -1.0, -1.0], [1.0, -1.0, 1.0], [1.0, 1.0, -1.0], [1.0, 1.0, 1.0],
];

const OCTAHEDRON: [[f64; 3]; 6] = [
    [1.0, 0.0, 0.0], [-1.0, 0.0, 0.0],
    [0.0, 1.0, 0.0], [0.0, -1.0, 0.0],
    [0.0, 0.0, 1.0], [0.0, 0.0, -1.0],
];

// cyclic permutations of (0, ±1, ±φ)
const ICOSAHEDRON: [[f64; 3]; 12] = [
    [0.0, -1.0, -PHI], [0.0, -1.0, PHI], [0.0, 1.0, -PHI], [0.0, 1.0, PHI],
    [-1.0, -PHI, 0.0], [-1.0, PHI, 0.0], [1.0, -PHI, 0.0], [1.0, PHI, 0.0],
    [-PHI, 0.0, -1.0], [PHI, 0.0, -1.0], [-PHI, 0.0, 1.0], [PHI, 0.0, 1.0],
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phi_is_golden_ratio() {
        assert!((PHI - (1.0 + 5f64.sqrt()) / 2.0).abs() < 1e-15);
    }

    #[test]
    fn dodecahedron_vertices_share_one_radius() {
        let vertices = Solid::Dodecahedron.vertices(0.5);
        assert_eq!(vertices.len(), 20);
        let radius = 0.5 * 3f64.sqrt();
        for v in vertices {
            assert!((v.coords.magnitude() - radius).abs() < 1e-12, "{v:?}");
        }
    }

    #[test]
    fn icosahedron_vertices_share_one_radius() {
        let radius = (1.0 + PHI * PHI).sqrt();
        for v in Solid::Icosahedron.vertices(1.0) {
            assert!((v.coords.magnitude() - radius).abs() < 1e-12, "{v:?}");
        }
    }

    #[test]
    fn solids_are_centered() {
        for solid in [Solid::Dodecahedron, Solid::Cube, Solid::Octahedron, Solid::Icosahedron] {
            let sum = solid.vertices(2.0).iter()
                .fold(nalgebra::Vector3::zeros(), |acc, v| acc + v.coords);
            assert!(sum.magnitude() < 1e-12, "{solid:?} centroid {sum:?}");
        }
    }
}

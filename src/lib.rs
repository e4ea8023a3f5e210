//! Renders a convex solid from nothing but its vertices.
//!
//! The face planes of the hull are found once by brute force over vertex
//! triples; each frame then tumbles those planes and casts one ray per pixel
//! against the half-spaces they bound, shading hits with a single diffuse
//! light. There is no mesh and no rasterizer.
//!
//! Windowing and presentation live in the binary; this library only fills
//! pixel buffers.

pub mod camera;
pub mod config;
pub mod geometry;
pub mod picture;
pub mod polytope;
pub mod ray;
pub mod render;
pub mod shade;
pub mod solid;

pub use polytope::{build_polytope, Plane, Polytope};
pub use render::render_frame;

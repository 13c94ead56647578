//! Sine-wave vertex clouds for point-cloud viewers.
//!
//! A [`VertexCloud`] serialises as `{ "vertices": [x, y, z, ...], "size": n }`,
//! the flat layout a GPU position buffer expects.

use glam::Vec3;
use rand::Rng;
use serde::{Deserialize, Serialize};

pub const DEFAULT_SIZE: usize = 20;
pub const DEFAULT_AMPLITUDE: f32 = 1.0;
pub const DEFAULT_FREQUENCY: f32 = 0.1;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VertexCloud {
    pub vertices: Vec<f32>,
    pub size: usize,
}

impl Default for VertexCloud {
    fn default() -> Self {
        Self::generate(DEFAULT_SIZE, DEFAULT_AMPLITUDE, DEFAULT_FREQUENCY)
    }
}

impl VertexCloud {
    /// Samples `z = amplitude * sin(f * x) * cos(f * y)` on a `size` x `size` grid.
    ///
    /// Both axes span `[-size / 2, size / 2]` with `size` evenly spaced
    /// samples. Vertices are emitted with `x` in the outer loop.
    pub fn generate(size: usize, amplitude: f32, frequency: f32) -> Self {
        let axis = linspace(-(size as f32) / 2.0, size as f32 / 2.0, size);
        let mut vertices = Vec::with_capacity(size * size * 3);

        for &x in &axis {
            for &y in &axis {
                let z = amplitude * (frequency * x).sin() * (frequency * y).cos();
                vertices.extend([x, y, z]);
            }
        }

        Self { vertices, size }
    }

    /// Generates a cloud with randomised shape parameters.
    ///
    /// Amplitude is drawn from `[0.5, 2.0]`, frequency from `[0.05, 0.2]`
    /// and size from `[15, 30]`.
    pub fn shuffled(rng: &mut impl Rng) -> Self {
        let amplitude = rng.random_range(0.5..=2.0);
        let frequency = rng.random_range(0.05..=0.2);
        let size = rng.random_range(15..=30);
        Self::generate(size, amplitude, frequency)
    }

    /// Iterates the vertices as points.
    pub fn positions(&self) -> impl Iterator<Item = Vec3> + '_ {
        self.vertices
            .chunks_exact(3)
            .map(|c| Vec3::new(c[0], c[1], c[2]))
    }
}

fn linspace(start: f32, end: f32, n: usize) -> Vec<f32> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (n - 1) as f32;
            (0..n).map(|i| start + step * i as f32).collect()
        }
    }
}

//! Gradient noise evaluated over a [`VectorField`] and sampled at a fixed density.
//!
//! A layer owns its field and keeps a materialized altitude matrix of
//! `(field.height - 1) * density` rows by `(field.width - 1) * density`
//! columns. The matrix is recomputed whenever the field or density changes.

use glam::DVec2;
use noise::NoiseFn;
use rayon::prelude::*;

use crate::context::GenerationContext;
use crate::error::TerrainError;
use crate::grid::Grid;
use crate::neighbors::Neighbors;
use crate::vector_field::{SkippedGraft, VectorField};

/// Largest altitude matrix a layer may materialize, in samples.
pub const MAX_LAYER_SAMPLES: usize = 1 << 24;

/// Smoothstep `3w^2 - 2w^3`, clamped to `[0, 1]` outside the unit interval.
pub fn smoothstep(w: f64) -> f64 {
    if w <= 0.0 {
        0.0
    } else if w >= 1.0 {
        1.0
    } else {
        w * w * (3.0 - 2.0 * w)
    }
}

/// Blend `a0` toward `a1` by the smoothstep of `w`.
pub fn interpolate(a0: f64, a1: f64, w: f64) -> f64 {
    a0 + (a1 - a0) * smoothstep(w)
}

/// One octave of gradient noise.
#[derive(Clone, Debug, PartialEq)]
pub struct NoiseLayer {
    field: VectorField,
    density: usize,
    altitude: Grid<f64>,
}

impl NoiseLayer {
    /// Wrap an existing field and materialize it at `density`.
    pub fn new(field: VectorField, density: usize) -> Result<Self, TerrainError> {
        check_density(&field, density)?;
        let altitude = materialize(&field, density);
        Ok(Self {
            field,
            density,
            altitude,
        })
    }

    /// Generate a fresh `grid_width x grid_height` field, grafted onto the
    /// fields of any neighboring layers, and materialize it.
    pub fn generate(
        grid_width: usize,
        grid_height: usize,
        density: usize,
        neighbors: Neighbors<&NoiseLayer>,
        ctx: &mut GenerationContext,
    ) -> Result<(Self, Vec<SkippedGraft>), TerrainError> {
        if density <= 1 {
            return Err(TerrainError::InvalidDensity(density));
        }
        let fields = neighbors.filter_map(|layer| Some(layer.field()));
        let (field, skipped) = VectorField::generate(grid_width, grid_height, fields, ctx)?;
        Ok((Self::new(field, density)?, skipped))
    }

    /// Change the sampling density and recompute the altitude.
    pub fn set_density(&mut self, density: usize) -> Result<(), TerrainError> {
        check_density(&self.field, density)?;
        self.altitude = materialize(&self.field, density);
        self.density = density;
        Ok(())
    }

    /// Swap in a new field, recompute the altitude and return the old field.
    pub fn replace_field(&mut self, field: VectorField) -> VectorField {
        self.altitude = materialize(&field, self.density);
        std::mem::replace(&mut self.field, field)
    }

    /// Noise value at fractional lattice coordinates, `x` along rows and `y`
    /// along columns. `None` outside `[0, height-1] x [0, width-1]`.
    pub fn evaluate(&self, x: f64, y: f64) -> Option<f64> {
        evaluate(&self.field, x, y)
    }

    /// The underlying vector field.
    pub fn field(&self) -> &VectorField {
        &self.field
    }

    /// Samples per lattice cell.
    pub fn density(&self) -> usize {
        self.density
    }

    /// Materialized width in samples.
    pub fn width(&self) -> usize {
        self.altitude.width()
    }

    /// Materialized height in samples.
    pub fn height(&self) -> usize {
        self.altitude.height()
    }

    /// The materialized altitude matrix.
    pub fn altitude(&self) -> &Grid<f64> {
        &self.altitude
    }
}

impl NoiseFn<f64, 2> for NoiseLayer {
    /// Points outside the field sample as 0.
    fn get(&self, point: [f64; 2]) -> f64 {
        self.evaluate(point[0], point[1]).unwrap_or(0.0)
    }
}

fn check_density(field: &VectorField, density: usize) -> Result<(), TerrainError> {
    if density <= 1 {
        return Err(TerrainError::InvalidDensity(density));
    }
    let samples = (field.width() - 1)
        .checked_mul(density)
        .zip((field.height() - 1).checked_mul(density))
        .and_then(|(width, height)| width.checked_mul(height));
    match samples {
        Some(samples) if samples <= MAX_LAYER_SAMPLES => Ok(()),
        _ => Err(TerrainError::LayerTooLarge {
            grid_width: field.width(),
            grid_height: field.height(),
            density,
        }),
    }
}

/// Evaluate gradient noise over `field` at `(x, y)`.
pub fn evaluate(field: &VectorField, x: f64, y: f64) -> Option<f64> {
    let max_x = (field.height() - 1) as f64;
    let max_y = (field.width() - 1) as f64;
    if !(0.0..=max_x).contains(&x) || !(0.0..=max_y).contains(&y) {
        return None;
    }
    let x0 = (x.floor() as usize).min(field.height() - 2);
    let y0 = (y.floor() as usize).min(field.width() - 2);
    Some(perlin(field, x, y, x0, y0))
}

fn perlin(field: &VectorField, x: f64, y: f64, x0: usize, y0: usize) -> f64 {
    let corner = |ix: usize, iy: usize| -> f64 {
        let gradient = field.get(ix, iy).unwrap_or(DVec2::ZERO);
        DVec2::new(x - ix as f64, y - iy as f64).dot(gradient)
    };
    let sx = x - x0 as f64;
    let sy = y - y0 as f64;
    let top = interpolate(corner(x0, y0), corner(x0 + 1, y0), sx);
    let bottom = interpolate(corner(x0, y0 + 1), corner(x0 + 1, y0 + 1), sx);
    interpolate(top, bottom, sy)
}

fn sample(field: &VectorField, density: usize, row: usize, col: usize) -> f64 {
    let d = density as f64;
    let x = row as f64 / d;
    let y = col as f64 / d;
    perlin(field, x, y, row / density, col / density)
}

fn materialize(field: &VectorField, density: usize) -> Grid<f64> {
    let width = (field.width() - 1) * density;
    let height = (field.height() - 1) * density;
    let mut altitude = Grid::filled(width, height, 0.0);
    altitude
        .cells_mut()
        .par_chunks_mut(width)
        .enumerate()
        .for_each(|(row, out)| fill_row(field, density, row, out));
    altitude
}

fn fill_row(field: &VectorField, density: usize, row: usize, out: &mut [f64]) {
    for (col, value) in out.iter_mut().enumerate() {
        *value = sample(field, density, row, col);
    }
}

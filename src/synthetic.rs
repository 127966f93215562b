//! Synthetic test fields.
//!
//! A broad two-dimensional Gaussian bump on a `(2n+1) x (2n+1)` grid, with
//! optional seeded Gaussian noise. Used by the demo subcommand and the tests.

use ndarray::Array2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Peak value of the bump
pub const PEAK: f64 = 2.0;

/// Factor applied to unit-variance noise before it is added to the bump
pub const NOISE_SCALE: f64 = 0.2;

/// `exp(-(x^2/n + y^2/n) / 100) * 2` for `x, y` in `-n..=n`.
///
/// Rows run along `x` and columns along `y`; the peak sits at `[n, n]`.
pub fn gaussian_field(n: usize) -> Array2<f64> {
    let m = 2 * n + 1;
    let scale = n.max(1) as f64;
    Array2::from_shape_fn((m, m), |(i, j)| {
        let x = i as f64 - n as f64;
        let y = j as f64 - n as f64;
        (-(x * x / scale + y * y / scale) / 100.0).exp() * PEAK
    })
}

/// Normally distributed samples drawn with the Box-Muller transform.
pub fn gaussian_noise(shape: (usize, usize), mean: f64, std: f64, seed: u64) -> Array2<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    Array2::from_shape_simple_fn(shape, || {
        // gen() is in [0, 1); 1 - u keeps the logarithm finite
        let u1: f64 = 1.0 - rng.gen::<f64>();
        let u2: f64 = rng.gen::<f64>();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std * z
    })
}

/// The Gaussian bump plus `NOISE_SCALE` times zero-mean noise of deviation `std`.
pub fn noisy_gaussian_field(n: usize, std: f64, seed: u64) -> Array2<f64> {
    let field = gaussian_field(n);
    let noise = gaussian_noise(field.dim(), 0.0, std, seed);
    field + noise * NOISE_SCALE
}

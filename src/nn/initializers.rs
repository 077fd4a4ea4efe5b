use crate::error::{GraphError, Result};
use crate::tensor::Tensor;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand_distr::{Distribution, Normal};

/// Produces the initial value of a variable.
pub trait Initializer {
    fn initialize(&self, shape: &[usize]) -> Result<Tensor>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Zeros;

impl Initializer for Zeros {
    fn initialize(&self, shape: &[usize]) -> Result<Tensor> {
        Ok(Tensor::zeros(shape))
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Ones;

impl Initializer for Ones {
    fn initialize(&self, shape: &[usize]) -> Result<Tensor> {
        Ok(Tensor::ones(shape))
    }
}

/// Normal distribution truncated at two standard deviations.
/// Samples falling further than `2 * stddev` from the mean are redrawn.
/// The RNG is reseeded from `seed` on every call, so equal shapes get equal values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TruncatedNormal {
    pub mean: f32,
    pub stddev: f32,
    pub seed: u64,
}

impl TruncatedNormal {
    pub fn new(mean: f32, stddev: f32, seed: u64) -> Self {
        Self { mean, stddev, seed }
    }
}

impl Initializer for TruncatedNormal {
    fn initialize(&self, shape: &[usize]) -> Result<Tensor> {
        let total_size: usize = shape.iter().product();
        if total_size == 0 {
            return Ok(Tensor::zeros(shape));
        }

        let normal = Normal::new(self.mean, self.stddev).map_err(|e| {
            GraphError::InvalidArgument(format!(
                "truncated normal with stddev {}: {}",
                self.stddev, e
            ))
        })?;
        let mut rng = StdRng::seed_from_u64(self.seed);
        let bound = 2.0 * self.stddev;

        let data = (0..total_size)
            .map(|_| loop {
                let value: f32 = normal.sample(&mut rng);
                if (value - self.mean).abs() <= bound {
                    break value;
                }
            })
            .collect();
        Tensor::from_vec(data, shape)
    }
}

/// He (Kaiming) initialization for ReLU layers: truncated normal with stddev sqrt(2 / dim_in).
pub fn he_truncated_normal(dim_in: usize, seed: u64) -> TruncatedNormal {
    TruncatedNormal::new(0.0, (2.0 / dim_in as f32).sqrt(), seed)
}

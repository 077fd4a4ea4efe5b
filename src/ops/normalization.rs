// normalization.rs
// Batch normalization as a single graph operator.
// The operator switches on a boolean input: in training mode it normalizes with batch statistics and
// queues an exponential-moving-average update of the population statistics, in inference mode it
// normalizes with the population statistics and leaves them untouched.

use crate::error::{GraphError, Result};
use crate::graph::NodeId;
use crate::ops::{ExecContext, Operator, expect_inputs};
use crate::tensor::{DType, Tensor, TensorSpec};
use ndarray::{Array1, ArrayView1, ArrayView2, Axis, Ix1, Ix2};

/// Inputs, in order: `[x, gamma, beta, moving_mean, moving_variance, training]`.
/// `x` is `[batch, features]`, the four statistics/parameters are `[features]`, `training` is a Bool scalar.
///
/// Both the normalization and the moving variance update use the biased batch variance.
#[derive(Debug, Clone)]
pub struct BatchNormOp {
    pub epsilon: f32,
    pub momentum: f32,
    pub moving_mean: NodeId,
    pub moving_variance: NodeId,
}

impl BatchNormOp {
    pub fn new(epsilon: f32, momentum: f32, moving_mean: NodeId, moving_variance: NodeId) -> Self {
        Self {
            epsilon,
            momentum,
            moving_mean,
            moving_variance,
        }
    }

    fn update(&self, moving: ArrayView1<'_, f32>, batch: &Array1<f32>) -> Tensor {
        let decayed = moving.mapv(|m| m * self.momentum);
        Tensor::new((decayed + batch * (1.0 - self.momentum)).into_dyn())
    }
}

fn vector<'a>(t: &'a Tensor, what: &str) -> Result<ArrayView1<'a, f32>> {
    t.data()
        .view()
        .into_dimensionality::<Ix1>()
        .map_err(|_| GraphError::shape("BatchNormOp", format!("{} must be a vector, got {:?}", what, t.shape())))
}

impl Operator for BatchNormOp {
    fn compute(&self, inputs: &[&Tensor], ctx: &mut ExecContext<'_>) -> Result<Tensor> {
        expect_inputs("BatchNormOp", inputs, 6)?;
        let x: ArrayView2<'_, f32> = inputs[0]
            .data()
            .view()
            .into_dimensionality::<Ix2>()
            .map_err(|_| GraphError::shape("BatchNormOp", format!("input must be a matrix, got {:?}", inputs[0].shape())))?;
        let gamma = vector(inputs[1], "gamma")?;
        let beta = vector(inputs[2], "beta")?;
        let moving_mean = vector(inputs[3], "moving_mean")?;
        let moving_variance = vector(inputs[4], "moving_variance")?;
        let training = inputs[5].to_bool()?;

        let features = x.ncols();
        for (what, v) in [("gamma", &gamma), ("beta", &beta), ("moving_mean", &moving_mean), ("moving_variance", &moving_variance)] {
            if v.len() != features {
                return Err(GraphError::shape(
                    "BatchNormOp",
                    format!("{} has {} entries for {} features", what, v.len(), features),
                ));
            }
        }

        let (mean, variance) = if training {
            let mean = x.mean_axis(Axis(0)).ok_or_else(|| {
                GraphError::InvalidArgument("batch normalization needs a non-empty batch in training mode".to_string())
            })?;
            let variance = x.var_axis(Axis(0), 0.0);

            ctx.assign(self.moving_mean, self.update(moving_mean, &mean));
            ctx.assign(self.moving_variance, self.update(moving_variance, &variance));

            (mean, variance)
        } else {
            (moving_mean.to_owned(), moving_variance.to_owned())
        };

        let inv_std = variance.mapv(|v| 1.0 / (v + self.epsilon).sqrt());
        let scale = &inv_std * &gamma;
        let normalized = (&x - &mean) * &scale + &beta;
        Ok(Tensor::new(normalized.into_dyn()))
    }

    fn infer(&self, inputs: &[&TensorSpec]) -> Result<TensorSpec> {
        expect_inputs("BatchNormOp", inputs, 6)?;
        let x = inputs[0];
        x.expect_dtype("BatchNormOp", DType::Float32)?;
        if x.shape.rank() != 2 {
            return Err(GraphError::shape(
                "BatchNormOp",
                format!("input must be [batch, features], got {}", x.shape),
            ));
        }

        for stat in &inputs[1..5] {
            stat.expect_dtype("BatchNormOp", DType::Float32)?;
            let matches = stat.shape.rank() == 1
                && match (x.shape.dim(1), stat.shape.dim(0)) {
                    (Some(a), Some(b)) => a == b,
                    _ => true,
                };
            if !matches {
                return Err(GraphError::shape(
                    "BatchNormOp",
                    format!("statistics shape {} does not match input {}", stat.shape, x.shape),
                ));
            }
        }

        let flag = inputs[5];
        flag.expect_dtype("BatchNormOp", DType::Bool)?;
        if !flag.shape.is_scalar() {
            return Err(GraphError::shape(
                "BatchNormOp",
                format!("training flag must be a scalar, got {}", flag.shape),
            ));
        }

        Ok(x.clone())
    }

    fn num_inputs(&self) -> usize {
        6
    }

    fn clone_op(&self) -> Box<dyn Operator> {
        Box::new(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use crate::error::GraphError;
    use crate::tensor::{DType, Shape, Tensor};

    #[test]
    fn test_from_vec_checks_element_count() {
        let tensor = Tensor::from_vec(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], &[2, 3]).unwrap();
        assert_eq!(tensor.shape(), &[2, 3]);
        assert_eq!(tensor.dtype(), DType::Float32);

        let err = Tensor::from_vec(vec![1.0, 2.0, 3.0], &[2, 2]).unwrap_err();
        assert!(matches!(err, GraphError::InvalidShape(_)));
    }

    #[test]
    fn test_scalar_roundtrip() {
        assert_eq!(Tensor::scalar(0.25).to_scalar().unwrap(), 0.25);
        assert!(Tensor::scalar_bool(true).to_bool().unwrap());
        assert!(!Tensor::scalar_bool(false).to_bool().unwrap());

        // Float tensors are not booleans even when they hold 0/1.
        assert!(Tensor::scalar(1.0).to_bool().is_err());
        assert!(Tensor::zeros(&[2]).to_scalar().is_err());
    }

    #[test]
    fn test_shape_compatibility() {
        let shape = Shape::batched(4);
        assert!(shape.is_compatible_with(&[1, 4]));
        assert!(shape.is_compatible_with(&[128, 4]));
        assert!(!shape.is_compatible_with(&[128, 3]));
        assert!(!shape.is_compatible_with(&[4]));
        assert!(Shape::scalar().is_compatible_with(&[]));
        assert_eq!(shape.to_string(), "[?, 4]");
    }

    #[test]
    fn test_shape_broadcast() {
        let batch = Shape::batched(3);
        let row = Shape::known(&[3]);
        assert_eq!(batch.broadcast(&row, "Add").unwrap(), Shape::batched(3));
        assert_eq!(
            batch.broadcast(&Shape::scalar(), "Mul").unwrap(),
            Shape::batched(3)
        );
        assert_eq!(
            Shape::new(vec![None, Some(1)])
                .broadcast(&Shape::new(vec![None, Some(5)]), "Sub")
                .unwrap(),
            Shape::new(vec![None, Some(5)])
        );

        let err = batch.broadcast(&Shape::known(&[4]), "Add").unwrap_err();
        assert!(matches!(err, GraphError::ShapeMismatch { .. }));
    }
}

#[cfg(test)]
mod tests {

    use crate::error::GraphError;
    use crate::graph::{FeedDict, Graph, GraphVisualizer, NodeId, Session};
    use crate::ops::BatchNormOp;
    use crate::summary::MemorySink;
    use crate::tensor::{DType, Shape, Tensor};
    use approx::assert_abs_diff_eq;

    fn matrix(data: Vec<f32>, rows: usize, cols: usize) -> Tensor {
        Tensor::from_vec(data, &[rows, cols]).unwrap()
    }

    #[test]
    fn test_ids_follow_creation_order() {
        let mut graph = Graph::new();
        let x = graph.placeholder("x", DType::Float32, Shape::batched(2));
        let w = graph
            .variable("w", Tensor::ones(&[2, 3]), true)
            .unwrap();
        let y = graph.matmul(x, w).unwrap();

        assert_eq!((x, w, y), (NodeId(0), NodeId(1), NodeId(2)));
        assert_eq!(graph.len(), 3);
        assert_eq!(graph.node(y).unwrap().inputs(), &[x, w]);
        assert_eq!(graph.spec(y).unwrap().shape, Shape::batched(3));
    }

    #[test]
    fn test_scopes_and_unique_names() {
        let mut graph = Graph::new();
        let first = graph
            .name_scope("dense_relu", |g| g.variable("kernel", Tensor::ones(&[2, 2]), true))
            .unwrap();
        let second = graph
            .name_scope("dense_relu", |g| g.variable("kernel", Tensor::ones(&[2, 2]), true))
            .unwrap();
        let nested = graph
            .name_scope("outer", |g| {
                g.name_scope("dense_relu", |g| Ok(g.scalar(1.0)))
            })
            .unwrap();

        assert_eq!(graph.node(first).unwrap().name, "dense_relu/kernel");
        assert_eq!(graph.node(second).unwrap().name, "dense_relu_1/kernel");
        assert_eq!(graph.node(nested).unwrap().name, "outer/dense_relu/Const");
        assert_eq!(graph.node_by_name("dense_relu_1/kernel"), Some(second));
        assert_eq!(graph.current_scope(), "");
    }

    #[test]
    fn test_scope_is_left_on_error() {
        let mut graph = Graph::new();
        let result: crate::error::Result<NodeId> = graph.name_scope("broken", |g| {
            g.variable("kernel", Tensor::zeros(&[0, 3]), true)
        });

        assert!(matches!(result, Err(GraphError::InvalidShape(_))));
        assert_eq!(graph.current_scope(), "");
        assert!(graph.is_empty());
    }

    #[test]
    fn test_invalid_operations_are_rejected() {
        let mut graph = Graph::new();
        let x = graph.placeholder("x", DType::Float32, Shape::batched(2));
        let w = graph.variable("w", Tensor::ones(&[3, 4]), true).unwrap();

        assert!(matches!(
            graph.matmul(x, w),
            Err(GraphError::ShapeMismatch { .. })
        ));
        assert!(matches!(
            graph.relu(NodeId(42)),
            Err(GraphError::NodeNotFound(NodeId(42)))
        ));
        assert!(matches!(
            graph.apply_operation(Box::new(crate::ops::Add), vec![x]),
            Err(GraphError::InvalidArity { expected: 2, actual: 1, .. })
        ));
        assert_eq!(graph.len(), 2);
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut graph = Graph::new();
        let x = graph.placeholder("x", DType::Float32, Shape::batched(2));
        let m = graph.mean(x).unwrap();
        graph.add_scalar_summary("mean", m).unwrap();

        graph.reset();
        assert!(graph.is_empty());
        assert!(graph.summaries().is_empty());

        let again = graph.placeholder("x", DType::Float32, Shape::batched(2));
        assert_eq!(again, NodeId(0));
        assert_eq!(graph.node(again).unwrap().name, "x");
    }

    #[test]
    fn test_parameter_count_and_variables() {
        let mut graph = Graph::new();
        graph.variable("kernel", Tensor::ones(&[4, 3]), true).unwrap();
        graph.variable("bias", Tensor::zeros(&[3]), true).unwrap();
        graph.variable("moving_mean", Tensor::zeros(&[3]), false).unwrap();

        assert_eq!(graph.parameter_count(), 15);
        assert_eq!(graph.variables().len(), 3);
        assert_eq!(graph.trainable_variables().len(), 2);
    }

    #[test]
    fn test_session_evaluates_dense_layer() {
        let mut graph = Graph::new();
        let x = graph.placeholder("x", DType::Float32, Shape::batched(2));
        let w = graph
            .variable("w", matrix(vec![1.0, -1.0, 2.0, 0.5], 2, 2), true)
            .unwrap();
        let b = graph
            .variable("b", Tensor::from_vec(vec![0.5, -3.0], &[2]).unwrap(), true)
            .unwrap();
        let xw = graph.matmul(x, w).unwrap();
        let z = graph.add(xw, b).unwrap();
        let y = graph.relu(z).unwrap();

        let feeds = FeedDict::new().with(x, matrix(vec![1.0, 2.0, -1.0, 0.0], 2, 2));
        let mut session = Session::with_seed(&graph, 0);
        let out = session.run_one(y, &feeds).unwrap();

        // [1, 2] -> [5.5, -3.0]; [-1, 0] -> [-0.5, -2.0]
        assert_eq!(out.shape(), &[2, 2]);
        assert_eq!(out.to_vec(), vec![5.5, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_missing_and_mismatched_feeds() {
        let mut graph = Graph::new();
        let x = graph.placeholder("x", DType::Float32, Shape::batched(3));
        let flag = graph.placeholder("flag", DType::Bool, Shape::scalar());
        let m = graph.mean(x).unwrap();
        let mut session = Session::with_seed(&graph, 0);

        assert!(matches!(
            session.run(&[m], &FeedDict::new()),
            Err(GraphError::MissingFeed(name)) if name == "x"
        ));

        let wrong_width = FeedDict::new().with(x, Tensor::ones(&[2, 2]));
        assert!(matches!(
            session.run(&[m], &wrong_width),
            Err(GraphError::FeedMismatch { .. })
        ));

        let wrong_dtype = FeedDict::new().with(flag, Tensor::scalar(1.0));
        assert!(matches!(
            session.run(&[flag], &wrong_dtype),
            Err(GraphError::FeedMismatch { .. })
        ));

        // Unused placeholders need no feed.
        let feeds = FeedDict::new().with(x, Tensor::ones(&[5, 3]));
        assert_abs_diff_eq!(session.run_one(m, &feeds).unwrap().to_scalar().unwrap(), 1.0);
    }

    #[test]
    fn test_feeding_an_intermediate_node_cuts_its_inputs() {
        let mut graph = Graph::new();
        let x = graph.placeholder("x", DType::Float32, Shape::batched(2));
        let sq = graph.square(x).unwrap();
        let m = graph.mean(sq).unwrap();

        let feeds = FeedDict::new().with(sq, matrix(vec![1.0, 2.0, 3.0, 6.0], 2, 2));
        let mut session = Session::with_seed(&graph, 0);
        assert_abs_diff_eq!(session.run_one(m, &feeds).unwrap().to_scalar().unwrap(), 3.0);
    }

    #[test]
    fn test_batch_norm_updates_moving_statistics_after_run() {
        let mut graph = Graph::new();
        let x = graph.placeholder("x", DType::Float32, Shape::batched(1));
        let training = graph.placeholder("training", DType::Bool, Shape::scalar());
        let gamma = graph.variable("gamma", Tensor::ones(&[1]), true).unwrap();
        let beta = graph.variable("beta", Tensor::zeros(&[1]), true).unwrap();
        let mm = graph.variable("moving_mean", Tensor::zeros(&[1]), false).unwrap();
        let mv = graph.variable("moving_variance", Tensor::ones(&[1]), false).unwrap();
        let bn = graph
            .apply_operation(
                Box::new(BatchNormOp::new(1e-3, 0.99, mm, mv)),
                vec![x, gamma, beta, mm, mv, training],
            )
            .unwrap();

        let batch = matrix(vec![1.0, 3.0], 2, 1);
        let mut session = Session::with_seed(&graph, 0);

        let inference = FeedDict::new()
            .with(x, batch.clone())
            .with(training, Tensor::scalar_bool(false));
        session.run(&[bn], &inference).unwrap();
        assert_eq!(session.variable(mm).unwrap().to_vec(), vec![0.0]);

        let train = FeedDict::new()
            .with(x, batch)
            .with(training, Tensor::scalar_bool(true));
        session.run(&[bn], &train).unwrap();
        assert_abs_diff_eq!(session.variable(mm).unwrap().to_vec()[0], 0.02, epsilon = 1e-6);
        // Biased variance of [1, 3] is 1, so the moving variance stays at 1.
        assert_abs_diff_eq!(session.variable(mv).unwrap().to_vec()[0], 1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_dependencies_stop_at_cut_nodes() {
        let mut graph = Graph::new();
        let x = graph.placeholder("x", DType::Float32, Shape::batched(2));
        let sq = graph.square(x).unwrap();
        let m = graph.mean(sq).unwrap();
        let unrelated = graph.abs(x).unwrap();

        let all = graph.dependencies(&[m], |_| false).unwrap();
        assert_eq!(all.into_iter().collect::<Vec<_>>(), vec![x, sq, m]);
        assert!(!graph.dependencies(&[m], |_| false).unwrap().contains(&unrelated));

        let cut = graph.dependencies(&[m], |id| id == sq).unwrap();
        assert_eq!(cut.into_iter().collect::<Vec<_>>(), vec![sq, m]);

        assert!(matches!(
            graph.dependencies(&[NodeId(99)], |_| false),
            Err(GraphError::NodeNotFound(NodeId(99)))
        ));
    }

    #[test]
    fn test_write_summaries() {
        let mut graph = Graph::new();
        let x = graph.placeholder("x", DType::Float32, Shape::batched(2));
        let m = graph.mean(x).unwrap();
        let sq = graph.square(x).unwrap();
        let ms = graph.mean(sq).unwrap();
        graph.add_scalar_summary("mean", m).unwrap();
        graph.add_scalar_summary("mean_square", ms).unwrap();
        assert!(matches!(
            graph.add_scalar_summary("not_scalar", sq),
            Err(GraphError::InvalidShape(_))
        ));

        let feeds = FeedDict::new().with(x, matrix(vec![1.0, 2.0, 3.0, 4.0], 2, 2));
        let mut session = Session::with_seed(&graph, 0);
        let mut sink = MemorySink::new();
        session.write_summaries(7, &feeds, &mut sink).unwrap();

        assert_eq!(sink.records.len(), 2);
        assert_eq!(sink.records[0].0, 7);
        assert_abs_diff_eq!(sink.latest("mean").unwrap(), 2.5);
        assert_abs_diff_eq!(sink.latest("mean_square").unwrap(), 7.5);
    }

    #[test]
    fn test_dot_output() {
        let mut graph = Graph::new();
        let x = graph.placeholder("inputs", DType::Float32, Shape::batched(2));
        let y = graph
            .name_scope("dense_relu", |g| {
                let w = g.variable("kernel", Tensor::ones(&[2, 2]), true)?;
                let xw = g.matmul(x, w)?;
                g.relu(xw)
            })
            .unwrap();

        let visualizer = GraphVisualizer::new();
        let dot = visualizer.to_dot(&graph);
        assert!(dot.starts_with("digraph ComputationalGraph {"));
        assert!(dot.contains("label=\"dense_relu\""));
        assert!(dot.contains("n0 -> n2;"));
        assert!(dot.contains("n2 -> n3;"));
        assert!(dot.contains("[?, 2]"));

        let unused = graph.name_scope("loss", |g| g.mean(y)).unwrap();
        let partial = visualizer.to_dot_for(&graph, &[y]).unwrap();
        assert!(partial.contains("label=\"dense_relu\""));
        assert!(!partial.contains("label=\"loss\""));
        assert!(!partial.contains(&format!("n{} ", unused.0)));
        let full = visualizer.to_dot(&graph);
        assert!(full.contains("label=\"loss\""));

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("graph.dot");
        visualizer.save_dot(&graph, &path).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), full);
    }
}

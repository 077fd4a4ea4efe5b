//! Builds a dense regression network, feeds it synthetic data and logs the metrics.
//!
//! Usage:
//!   densegraph --features 10 --layers 64,32 --labels 1 --batch 128 --dot graph.dot
//!   densegraph --topology topology.json --training --keep-prob 0.8

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand_distr::{Distribution, Uniform};
use tracing::info;
use tracing_subscriber::EnvFilter;

use densegraph::graph::{GraphVisualizer, Session};
use densegraph::nn::NetworkTopology;
use densegraph::summary::TracingSink;
use densegraph::tensor::Tensor;

#[derive(Parser)]
#[command(author, version, about = "Assemble and run a dense feed-forward regression network")]
struct Args {
    /// JSON topology file; overrides --features, --layers, --labels and --seed
    #[arg(short, long)]
    topology: Option<String>,

    /// Number of input features
    #[arg(short, long, default_value = "10")]
    features: usize,

    /// Hidden layer widths, comma separated
    #[arg(short, long, value_delimiter = ',', default_value = "64,32")]
    layers: Vec<usize>,

    /// Number of regression targets
    #[arg(long, default_value = "1")]
    labels: usize,

    /// Seed for the kernel initializers and the synthetic data
    #[arg(short, long, default_value = "0")]
    seed: u64,

    /// Rows of synthetic data to feed
    #[arg(short, long, default_value = "128")]
    batch: usize,

    /// Dropout keep probability
    #[arg(short, long, default_value = "1.0")]
    keep_prob: f32,

    /// Run in training mode (batch statistics, moving averages updated)
    #[arg(long)]
    training: bool,

    /// Write the graph in DOT format to this path
    #[arg(long)]
    dot: Option<String>,
}

fn synthetic(rows: usize, cols: usize, low: f32, high: f32, rng: &mut StdRng) -> Result<Tensor> {
    let uniform = Uniform::new(low, high).map_err(|e| anyhow!("invalid data range: {}", e))?;
    let data = (0..rows * cols).map(|_| uniform.sample(rng)).collect();
    Ok(Tensor::from_vec(data, &[rows, cols])?)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();

    let topology = match &args.topology {
        Some(path) => NetworkTopology::from_json_file(path)
            .with_context(|| format!("loading topology from {}", path))?,
        None => NetworkTopology::new(args.features, args.layers.clone(), args.labels, args.seed),
    };
    info!(?topology, "building network");

    let (graph, bundle) = topology.build().context("assembling network")?;

    if let Some(path) = &args.dot {
        GraphVisualizer::new()
            .save_dot(&graph, path)
            .with_context(|| format!("writing {}", path))?;
        info!(%path, "graph written");
    }

    let mut rng = StdRng::seed_from_u64(topology.seed);
    let inputs = synthetic(args.batch, topology.feature_count, -1.0, 1.0, &mut rng)?;
    // Labels away from zero so the relative error stays finite.
    let labels = synthetic(args.batch, topology.label_count, 0.5, 1.5, &mut rng)?;
    let feeds = bundle.feed(inputs, labels, args.keep_prob, args.training)?;

    let mut session = Session::with_seed(&graph, topology.seed);
    let outputs = session.run(&bundle.fetches(), &feeds)?;
    info!(
        predictions = ?outputs[0].shape(),
        loss = outputs[1].to_scalar()?,
        err_2pc = outputs[2].to_scalar()?,
        err_1pc = outputs[3].to_scalar()?,
        "forward pass"
    );

    session.write_summaries(0, &feeds, &mut TracingSink)?;
    Ok(())
}

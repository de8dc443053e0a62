use arbor::{CenterPolicy, Graph};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// The sample tree: a hub hanging off one side of the centre and a deeper branch off the other.
const EDGES: [(i32, i32); 15] = [
    (1, 4),
    (2, 4),
    (3, 4),
    (4, 5),
    (5, 6),
    (6, 7),
    (7, 8),
    (7, 9),
    (6, 10),
    (10, 11),
    (11, 12),
    (11, 13),
    (12, 14),
    (13, 15),
    (13, 16),
];

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Set `RUST_LOG=arbor=debug` to follow the peeling.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "arbor=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut graph = Graph::from_edges(EDGES)?;

    print!("{graph}");

    println!("Center: {}", graph.center()?);
    println!(
        "Center (collapsed): {}",
        graph.center_with(CenterPolicy::Collapse)?
    );
    println!("Radius: {}", graph.radius().unwrap_or_default());

    Ok(())
}

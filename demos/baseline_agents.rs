// Demonstration: run the stop, shortest and random baselines and score them.
//
// With a config file the environment and evaluator load everything it names:
//   cargo run --example baseline_agents -- --config env.json --out results/
//
// Without one, a small synthetic scan is generated in a temporary directory.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use r2rnav::agent::{rollout, Agent, RandomAgent, ShortestAgent, StopAgent};
use r2rnav::dataset::DatasetRecord;
use r2rnav::env::{EnvConfig, NavEnvironment};
use r2rnav::eval::{write_submission, EvalConfig, Evaluation};
use r2rnav::features::FeatureSource;
use r2rnav::geometry::Position3;
use r2rnav::graph::ConnectivityRecord;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args: Vec<String> = env::args().collect();
    let max_steps: usize = arg_value(&args, "--max-steps")
        .and_then(|s| s.parse().ok())
        .unwrap_or(30);
    let seed: u64 = arg_value(&args, "--seed")
        .and_then(|s| s.parse().ok())
        .unwrap_or(10);

    let scratch = tempfile::tempdir()?;
    let config = match arg_value(&args, "--config") {
        Some(path) => serde_json::from_str::<EnvConfig>(&fs::read_to_string(path)?)?,
        None => synthetic_config(scratch.path())?,
    };
    let out_dir = arg_value(&args, "--out").map(PathBuf::from);
    let eval_config = EvalConfig {
        splits: config.splits.clone(),
        data_dir: config.data_dir.clone(),
        connectivity_dir: config.connectivity_dir.clone(),
        ..EvalConfig::default()
    };

    let mut nav = NavEnvironment::from_config(&config, None)?;
    let evaluation = Evaluation::from_config(&eval_config)?;

    let mut agents: Vec<Box<dyn Agent>> = vec![
        Box::new(StopAgent),
        Box::new(ShortestAgent),
        Box::new(RandomAgent::new(seed)),
    ];
    for agent in agents.iter_mut() {
        let submission = rollout(&mut nav, agent.as_mut(), max_steps, None)?;
        if let Some(dir) = &out_dir {
            fs::create_dir_all(dir)?;
            let file = dir.join(format!("{}_{}_agent.json", config.splits.join("+"), agent.name()));
            write_submission(&file, &submission)?;
        }
        let (summary, _) = evaluation.score(&submission)?;
        println!("\n=== {} agent ===", agent.name());
        println!("{}", summary);
    }
    Ok(())
}

/// Writes a five-viewpoint scan, a two-path split and a key table under `dir`.
fn synthetic_config(dir: &Path) -> Result<EnvConfig, Box<dyn std::error::Error>> {
    let nodes = [
        ("hall", Position3::new(0.0, 0.0, 0.0)),
        ("kitchen", Position3::new(0.0, 2.5, 0.0)),
        ("dining", Position3::new(2.5, 2.5, 0.0)),
        ("stairs", Position3::new(2.5, 4.5, 1.0)),
        ("study", Position3::new(4.5, 4.5, 1.5)),
    ];
    let edges = [
        ("hall", "kitchen"),
        ("kitchen", "dining"),
        ("dining", "stairs"),
        ("stairs", "study"),
    ];
    let records: Vec<ConnectivityRecord> = nodes
        .iter()
        .map(|(id, pos)| {
            let unobstructed = nodes
                .iter()
                .map(|(other, _)| edges.iter().any(|e| *e == (*id, *other) || *e == (*other, *id)))
                .collect();
            ConnectivityRecord::at(*id, *pos, unobstructed)
        })
        .collect();
    fs::write(dir.join("demo_connectivity.json"), serde_json::to_string(&records)?)?;

    let dataset = vec![
        DatasetRecord {
            path_id: 1,
            scan: "demo".into(),
            path: vec!["hall".into(), "kitchen".into(), "dining".into(), "stairs".into()],
            heading: 0.0,
            instructions: vec![
                "Walk through the kitchen and stop at the foot of the stairs.".into(),
                "Go past the dining table to the stairs.".into(),
            ],
            distance: None,
        },
        DatasetRecord {
            path_id: 2,
            scan: "demo".into(),
            path: vec!["study".into(), "stairs".into(), "dining".into()],
            heading: 4.7,
            instructions: vec!["Leave the study and head down to the dining room.".into()],
            distance: None,
        },
    ];
    fs::write(dir.join("R2R_demo.json"), serde_json::to_string_pretty(&dataset)?)?;

    let keys: String = nodes
        .iter()
        .map(|(id, _)| format!("demo\t{}\t640\t480\t60\t\n", id))
        .collect();
    fs::write(dir.join("keys.tsv"), keys)?;

    Ok(EnvConfig {
        batch_size: 2,
        splits: vec!["demo".to_string()],
        data_dir: dir.to_path_buf(),
        connectivity_dir: dir.to_path_buf(),
        features: FeatureSource::Procedural {
            path: dir.join("keys.tsv"),
            dim: 16,
        },
        ..EnvConfig::default()
    })
}

fn arg_value<'a>(args: &'a [String], key: &str) -> Option<&'a str> {
    args.iter()
        .position(|a| a == key)
        .and_then(|i| args.get(i + 1))
        .map(|s| s.as_str())
}

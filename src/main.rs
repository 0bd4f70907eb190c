use std::env;
use std::process;

use instrument_cluster::{Cluster, ClusterConfig, CONTROLS_HELP};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = match ClusterConfig::from_args(env::args()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            eprintln!("Usage: instrument-cluster [--title T] [--fps N] [--line-width W] [--fuel-sweep S] [--temp-sweep S] [--demo [SEED]]");
            process::exit(2);
        }
    };

    println!("Controls:");
    for (key, action) in CONTROLS_HELP {
        println!("  {:<12} {}", key, action);
    }

    if let Err(e) = Cluster::new(config).run() {
        log::error!("Cluster exited with error: {}", e);
        process::exit(1);
    }
}

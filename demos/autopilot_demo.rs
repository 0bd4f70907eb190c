use instrument_cluster::{Cluster, ClusterConfig, GaugeLayout, GaugeStyle, SweepType};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();

    // Secondary-styled main dials and a random autopilot seed
    let seed = rand::random::<u64>();
    let config = ClusterConfig::builder()
        .title("Instrument Cluster (autopilot)".to_string())
        .line_width(2.0)
        .speedometer(GaugeLayout::new(-250.0, -50.0, 120.0, SweepType::FullCircle, GaugeStyle::Secondary))
        .tachometer(GaugeLayout::new(250.0, -50.0, 120.0, SweepType::FullCircle, GaugeStyle::Secondary))
        .demo_seed(seed)
        .build();

    println!("Driving on autopilot with seed {}", seed);
    println!("Press ESC to exit");

    Cluster::new(config).run()?;
    Ok(())
}

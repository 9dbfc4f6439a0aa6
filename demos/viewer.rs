//! Open a floor plan and measure it interactively.
//!
//! Usage: `cargo run --example viewer -- plan.png`
//! (without an argument, use File → Open plan… in the app)

use planmeter::{run_planmeter_with_config, PlanMeterConfig};

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let mut config = PlanMeterConfig::default();
    if let Some(path) = std::env::args().nth(1) {
        config.plan_path = Some(path.into());
    }
    run_planmeter_with_config(config)
}

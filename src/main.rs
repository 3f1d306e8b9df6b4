use flsim::{relax, CancelToken, Scenario, ScenarioConfig};

use anyhow::Result;
use clap::Parser;

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::PathBuf;

#[derive(Parser, Debug)]
struct Args {
    #[arg(short, default_value = "showcase.yaml")]
    file_name: String,

    #[arg(short, default_value = "layout.json")]
    out_name: String,
}

// load here to keep main clean
fn load_scenario_from_yaml(file_name: &str) -> Result<ScenarioConfig> {
    let config_path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("scenarios")
        .join(file_name);
    let file = File::open(&config_path)?;
    let reader = BufReader::new(file);
    let scenario_cfg: ScenarioConfig = serde_yaml::from_reader(reader)?;

    Ok(scenario_cfg)
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let scenario_cfg = load_scenario_from_yaml(&args.file_name)?;
    let mut scenario = Scenario::build(scenario_cfg)?;

    let report = relax(&mut scenario, &CancelToken::new())?;
    log::info!(
        "{:?} after {} steps, residual {:.6}",
        report.status,
        report.steps,
        report.residual
    );

    let records = report.records(&scenario.system);
    let out = File::create(&args.out_name)?;
    serde_json::to_writer_pretty(BufWriter::new(out), &records)?;
    println!(
        "{:?}: wrote {} records to {}",
        report.status,
        records.len(),
        args.out_name
    );

    Ok(())
}

use std::{
    collections::{BTreeMap, BTreeSet},
    path::PathBuf,
};

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use canopy::{
    scenario::{Scenario, ScenarioLoader},
    simulation::Simulation,
    snapshot::SnapshotWriter,
    web::{self, WebServerConfig},
};

#[derive(Debug, Parser)]
#[command(author, version, about = "Canopy climate trajectory runner")]
struct Cli {
    /// Log filter used when RUST_LOG is not set
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Compute the trajectory once and print a summary
    Run {
        #[command(flatten)]
        scenario: ScenarioArgs,

        /// Directory for the JSON snapshot (skipped when omitted)
        #[arg(long)]
        snapshot_dir: Option<PathBuf>,
    },
    /// Serve the live session over HTTP
    Serve {
        #[command(flatten)]
        scenario: ScenarioArgs,

        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        #[arg(long, default_value_t = 8080)]
        port: u16,
    },
}

#[derive(Debug, Args)]
struct ScenarioArgs {
    /// Path to the scenario YAML file
    #[arg(long, default_value = "scenarios/tropical_belt.yaml")]
    scenario: PathBuf,

    /// Override the yearly emission growth rate (percent)
    #[arg(long, allow_hyphen_values = true)]
    growth_rate: Option<f64>,

    /// Override the yearly reforestation (hectares)
    #[arg(long)]
    reforestation_rate: Option<f64>,

    /// Override the viewed year
    #[arg(long)]
    year: Option<u32>,
}

impl ScenarioArgs {
    fn load(&self) -> Result<Scenario> {
        let loader = ScenarioLoader::new(".");
        let mut scenario = loader.load(&self.scenario)?;
        if let Some(rate) = self.growth_rate {
            scenario.parameters.co2_growth_rate = rate;
        }
        if let Some(rate) = self.reforestation_rate {
            scenario.parameters.reforestation_rate = rate;
        }
        if let Some(year) = self.year {
            scenario.parameters.year = year;
        }
        Ok(scenario)
    }
}

fn init_tracing(default_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);

    match cli.command {
        Command::Run {
            scenario,
            snapshot_dir,
        } => {
            let scenario = scenario.load()?;
            let simulation = scenario.build_simulation()?;
            print_summary(&scenario, &simulation);
            if let Some(dir) = snapshot_dir {
                let path = SnapshotWriter::new(dir).write(&simulation, &scenario.name)?;
                info!(path = %path.display(), "snapshot written");
            }
        }
        Command::Serve {
            scenario,
            host,
            port,
        } => {
            let scenario = scenario.load()?;
            let simulation = scenario.build_simulation()?;
            web::run(WebServerConfig {
                scenario_name: scenario.name.clone(),
                simulation,
                host,
                port,
            })
            .await?;
        }
    }
    Ok(())
}

fn print_summary(scenario: &Scenario, simulation: &Simulation) {
    let params = simulation.parameters();
    println!(
        "Scenario '{}': growth {:+.2}%/yr, reforestation {:.0} ha/yr",
        scenario.name, params.co2_growth_rate, params.reforestation_rate
    );

    let trajectory = simulation.trajectory();
    if let Some((year, last)) = trajectory.last() {
        println!(
            "{year}: co2 {:.3e} t, emissions {:.3e} t/yr, reforested {:.0} ha, +{:.3} °C",
            last.co2, last.global_emissions, last.total_reforested_area, last.temperature_increase
        );
    }

    println!("Tipping points:");
    for crossing in simulation.tipping_points() {
        let names: Vec<&str> = crossing
            .tipping_points
            .iter()
            .map(|tp| tp.name.as_str())
            .collect();
        match crossing.year {
            Some(year) => println!("  {:.1} °C reached in {year}: {}", crossing.threshold, names.join(", ")),
            None => println!("  {:.1} °C not reached: {}", crossing.threshold, names.join(", ")),
        }
    }

    let current = simulation.current();
    println!(
        "Viewed year {}: +{:.3} °C, {} tree units placed ({} unallocated)",
        params.year,
        current.temperature_increase,
        simulation.tree_allocation().allocated(),
        simulation.tree_allocation().unallocated
    );
    for line in country_lines(simulation.temperatures(), simulation.emissions_per_capita()) {
        println!("  {line}");
    }
}

/// One line per country that has either baseline.
fn country_lines(
    temperatures: &BTreeMap<String, f64>,
    emissions: &BTreeMap<String, f64>,
) -> Vec<String> {
    let countries: BTreeSet<&String> = temperatures.keys().chain(emissions.keys()).collect();
    countries
        .into_iter()
        .map(|iso| {
            let temperature = temperatures
                .get(iso)
                .map(|value| format!("{value:.2} °C"))
                .unwrap_or_else(|| "n/a".to_string());
            let per_capita = emissions
                .get(iso)
                .map(|value| format!("{value:.2} t/cap"))
                .unwrap_or_else(|| "n/a".to_string());
            format!("{iso}: {temperature}, {per_capita}")
        })
        .collect()
}

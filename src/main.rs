use clap::{Parser, Subcommand};
use dotenv::dotenv;
use switchyard_rs::component::value_to_text;
use switchyard_rs::workflow::branch::{evaluate_condition, Operator, Route};
use switchyard_rs::workflow::builder::Builder;
use switchyard_rs::workflow::graph::RunnerConfig;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run a graph from a file
    Run {
        /// Path to the graph file
        #[arg(short, long)]
        file: String,

        /// Input to the graph
        #[arg(short, long)]
        input: String,

        /// Node invocations allowed before the run is cut off
        #[arg(long)]
        max_steps: Option<usize>,

        /// Print the full run report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Evaluate a single router condition
    Eval {
        /// Text to inspect
        #[arg(short, long)]
        input: String,

        /// Text to compare against
        #[arg(short, long = "match")]
        match_text: String,

        /// One of: equals, not equals, contains, starts with, ends with
        #[arg(short, long, default_value = "equals")]
        operator: String,

        #[arg(long)]
        case_sensitive: bool,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    dotenv().ok();
    env_logger::init();

    let args = Args::parse();

    match args.command {
        Commands::Run {
            file,
            input,
            max_steps,
            json,
        } => {
            let mut config = RunnerConfig::from_env()?;
            if let Some(max_steps) = max_steps {
                config.max_steps = max_steps;
            }
            log::info!("Running {} with step limit {}", file, config.max_steps);

            let runner = Builder::new(config).build_graph(&file)?;
            let report = runner.run(input).await?;

            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!("Run {} of {}", report.run_id, runner.name());
                if !runner.description().is_empty() {
                    println!("{}", runner.description());
                }
                for (node, value) in &report.outputs {
                    println!("{}: {}", node, value_to_text(value));
                }
                if report.truncated {
                    eprintln!("Run stopped after {} steps", report.steps);
                }
            }
        }
        Commands::Eval {
            input,
            match_text,
            operator,
            case_sensitive,
        } => {
            let operator = Operator::from(operator);
            if let Operator::Unrecognized(label) = &operator {
                log::warn!("'{}' is not a known operator, result will be false", label);
            }
            let result = evaluate_condition(&input, &match_text, &operator, case_sensitive);
            println!("{}", Route::from_result(result));
        }
    }

    Ok(())
}

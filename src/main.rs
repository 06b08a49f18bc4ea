use std::io::Read;

use clap::Parser;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "plantsql", about = "Generate MySQL CREATE TABLE statements from PlantUML entity diagrams")]
struct Cli {
    /// Input file (reads from stdin if not provided)
    file: Option<std::path::PathBuf>,

    /// Schema the tables are created in
    #[arg(long, short = 's', default_value = plantsql::DEFAULT_SCHEMA)]
    schema: String,

    /// Options appended to every table; pass an empty string to omit them
    #[arg(long, default_value = plantsql::DEFAULT_TABLE_OPTIONS)]
    table_options: String,

    /// Fail when any column produced a warning
    #[arg(long)]
    deny_warnings: bool,

    /// Log parsing and resolution details
    #[arg(long, short = 'v')]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let options = plantsql::Options {
        schema: cli.schema,
        table_options: cli.table_options,
    };

    let result = match cli.file {
        Some(path) => plantsql::generate_file(&path, &options),
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf).unwrap_or_else(|e| {
                eprintln!("ERROR: failed to read stdin: {e}");
                std::process::exit(1);
            });
            plantsql::generate(&buf, &options)
        }
    };

    match result {
        Ok(generated) if cli.deny_warnings && !generated.warnings.is_empty() => {
            for warning in &generated.warnings {
                eprintln!("ERROR: {warning}");
            }
            std::process::exit(1);
        }
        Ok(generated) => println!("{}", generated.sql),
        Err(e) => {
            eprintln!("ERROR: {e}");
            std::process::exit(1);
        }
    }
}

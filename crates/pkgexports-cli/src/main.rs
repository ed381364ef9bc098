#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::struct_excessive_bools)]
#![allow(clippy::needless_pass_by_value)]

mod commands;
mod logging;

use clap::Parser;
use miette::Result;
use pkgexports_core::ResolveOptions;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "pkgexports")]
#[command(author, version, about = "Resolve entries through a package.json exports map", long_about = None)]
struct Cli {
    /// Increase logging verbosity (-v for DEBUG, -vv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Emit JSON formatted output (stable, machine-readable)
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Print version information
    Version,

    /// Resolve one or more entries (e.g. "." or "./utils") to target paths
    Resolve {
        /// Path to the package.json to read
        package_json: PathBuf,

        /// Entry specifiers to resolve
        #[arg(required = true)]
        entries: Vec<String>,

        /// Extra conditions to activate (repeatable, e.g. -c node -c browser)
        #[arg(short = 'c', long = "condition", value_name = "NAME")]
        conditions: Vec<String>,

        /// Activate "production" instead of "development"
        #[arg(long)]
        production: bool,

        /// Activate "require" instead of "import"
        #[arg(long)]
        require: bool,

        /// Fail when an entry is not exported or no condition matches
        #[arg(long)]
        strict: bool,

        /// Show each resolution step
        #[arg(long)]
        trace: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    logging::init(cli.verbose, cli.json);

    match cli.command {
        Commands::Version => commands::version::run(),
        Commands::Resolve {
            package_json,
            entries,
            conditions,
            production,
            require,
            strict,
            trace,
        } => {
            let options = ResolveOptions::new()
                .with_conditions(conditions)
                .with_production(production)
                .with_require(require)
                .with_assert_match(strict);
            commands::resolve::run(&package_json, &entries, &options, trace, cli.json)
        }
    }
}

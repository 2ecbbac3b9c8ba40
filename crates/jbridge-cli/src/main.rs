use clap::Parser;
use clap_verbosity_flag::Verbosity;
use std::path::PathBuf;

mod commands;
mod error;
mod io;

use commands::generate::EmitFormat;

#[derive(Parser, Debug)]
#[command(name = "jbridge")]
#[command(about = "Closure and async interop binding generator", long_about = None)]
struct Args {
    #[command(flatten)]
    verbose: Verbosity,

    #[clap(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand, Debug)]
enum Command {
    /// Generate binding descriptors for a declaration file
    Generate {
        /// Declaration source file
        #[arg(value_name = "FILE")]
        file: PathBuf,
        /// Generator configuration (TOML)
        #[arg(short, long, value_name = "CONFIG")]
        config: Option<PathBuf>,
        /// Module name scoping free functions
        #[arg(short, long)]
        module: Option<String>,
        /// Output format
        #[arg(short, long, value_enum, default_value_t = EmitFormat::Summary)]
        emit: EmitFormat,
        /// Output file (defaults to stdout)
        #[arg(short, long, value_name = "OUT")]
        output: Option<PathBuf>,
    },

    /// Check that every closure in a declaration file can be bridged
    Check {
        /// Declaration source file
        #[arg(value_name = "FILE")]
        file: PathBuf,
        /// Generator configuration (TOML)
        #[arg(short, long, value_name = "CONFIG")]
        config: Option<PathBuf>,
        /// Module name scoping free functions
        #[arg(short, long)]
        module: Option<String>,
    },

    /// Show the strategy and target shape for one closure type
    Classify {
        /// Closure type, e.g. "@escaping (Int64) async -> Int64"
        #[arg(value_name = "TYPE")]
        ty: String,
    },
}

fn main() -> miette::Result<()> {
    let args = Args::parse();
    env_logger::Builder::new()
        .filter_level(args.verbose.log_level_filter())
        .init();

    match args.command {
        Command::Generate {
            file,
            config,
            module,
            emit,
            output,
        } => {
            let config = commands::load_config(config.as_deref(), module)?;
            commands::generate::handle_generate(file, config, emit, output.as_deref())?;
        }
        Command::Check {
            file,
            config,
            module,
        } => {
            let config = commands::load_config(config.as_deref(), module)?;
            commands::check::handle_check(file, config)?;
        }
        Command::Classify { ty } => {
            commands::classify::handle_classify(&ty, &Default::default())?;
        }
    }
    Ok(())
}

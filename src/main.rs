// CLI binary entry point for ferrotag

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};

mod cli;

use cli::{commands, OutputFormatter};

/// Ferrotag - ID3v2 tag CLI tool
#[derive(Parser, Debug)]
#[command(name = "ferrotag")]
#[command(about = "Read, write, update and remove ID3v2 tags", long_about = None)]
#[command(version)]
struct Config {
    /// Output format
    #[arg(short, long, value_enum, default_value = "pretty")]
    format: OutputFormatArg,

    /// Quiet mode (suppress progress messages)
    #[arg(short, long)]
    quiet: bool,

    /// Subcommand
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Read tags from audio file(s)
    Read {
        /// Audio file path(s), glob patterns allowed
        files: Vec<String>,

        /// Output to file instead of stdout
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Write tags to a file, replacing any existing tag
    Write {
        /// Audio file path
        file: String,

        /// Tags as inline JSON
        #[arg(short, long)]
        tags: Option<String>,

        /// Read tags from a JSON file
        #[arg(long)]
        from_file: Option<String>,
    },
    /// Merge tags into a file's existing tag
    Update {
        /// Audio file path
        file: String,

        /// Tags as inline JSON
        #[arg(short, long)]
        tags: Option<String>,

        /// Read tags from a JSON file
        #[arg(long)]
        from_file: Option<String>,
    },
    /// Remove tags from audio file(s)
    Remove {
        /// Audio file path(s), glob patterns allowed
        files: Vec<String>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
enum OutputFormatArg {
    #[default]
    Pretty,
    Json,
}

impl From<OutputFormatArg> for cli::OutputFormat {
    fn from(format: OutputFormatArg) -> Self {
        match format {
            OutputFormatArg::Pretty => cli::OutputFormat::Pretty,
            OutputFormatArg::Json => cli::OutputFormat::Json,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let config = Config::parse();
    let formatter = OutputFormatter::new(config.format.into(), config.quiet);

    match config.command {
        Commands::Read { files, output } => {
            commands::command_read(files, output, &formatter).context("reading tags failed")?;
        }
        Commands::Write {
            file,
            tags,
            from_file,
        } => {
            commands::command_write(file, tags, from_file, &formatter)
                .context("writing tags failed")?;
        }
        Commands::Update {
            file,
            tags,
            from_file,
        } => {
            commands::command_update(file, tags, from_file, &formatter)
                .context("updating tags failed")?;
        }
        Commands::Remove { files } => {
            commands::command_remove(files, &formatter).context("removing tags failed")?;
        }
    }

    Ok(())
}

// Output formatting for CLI

use std::io::Write;

use crate::cli::CliResult;

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Pretty,
    Json,
}

/// Format and output tag data
pub struct OutputFormatter {
    format: OutputFormat,
    quiet: bool,
}

impl OutputFormatter {
    pub fn new(format: OutputFormat, quiet: bool) -> Self {
        Self { format, quiet }
    }

    /// Output a decoded tag
    pub fn output_tag(&self, tag: &serde_json::Value, writer: &mut (impl Write + ?Sized)) -> CliResult<()> {
        match self.format {
            OutputFormat::Pretty => {
                writeln!(writer, "{}", serde_json::to_string_pretty(tag)?)?;
            }
            OutputFormat::Json => {
                writeln!(writer, "{}", serde_json::to_string(tag)?)?;
            }
        }
        Ok(())
    }

    /// Print success message
    pub fn print_success(&self, message: &str) {
        if !self.quiet {
            println!("✓ {}", message);
        }
    }

    /// Print error message
    pub fn print_error(&self, message: &str) {
        eprintln!("✗ {}", message);
    }

    /// Print info message
    pub fn print_info(&self, message: &str) {
        if !self.quiet {
            println!("  {}", message);
        }
    }
}

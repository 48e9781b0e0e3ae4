//! CLI argument definitions for the hassfest runner.
//!
//! Kept apart from the entrypoint so the binary only orchestrates.

use camino::Utf8PathBuf;
use clap::Parser;
use hassfest_common::Config;

/// Validate the integrations of a Home Assistant checkout.
#[derive(Parser, Debug, Clone)]
#[command(name = "hassfest")]
#[command(version, about)]
#[command(after_help = concat!(
    "EXAMPLES:\n",
    "  Validate the checkout in the current directory:\n",
    "    $ hassfest\n\n",
    "  Report only selected integrations as JSON:\n",
    "    $ hassfest --root ~/src/core -i sonos -i hue --json\n",
))]
pub struct Cli {
    /// Repository root to validate.
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub root: Utf8PathBuf,

    /// Configuration file [default: <root>/hassfest.toml].
    #[arg(long, value_name = "FILE")]
    pub config: Option<Utf8PathBuf>,

    /// Limit the report to an integration (can be repeated).
    #[arg(short, long = "integration", value_name = "NAME")]
    pub integrations: Vec<String>,

    /// Output in JSON format for scripting.
    #[arg(long)]
    pub json: bool,

    /// Increase log verbosity (repeatable: -v, -vv).
    #[arg(
        short,
        long = "verbose",
        action = clap::ArgAction::Count,
        conflicts_with = "quiet"
    )]
    pub verbosity: u8,

    /// Only log errors.
    #[arg(short, long, conflicts_with = "verbosity")]
    pub quiet: bool,
}

impl Default for Cli {
    /// Validates the current directory with default settings.
    fn default() -> Self {
        Self {
            root: Utf8PathBuf::from("."),
            config: None,
            integrations: Vec::new(),
            json: false,
            verbosity: 0,
            quiet: false,
        }
    }
}

impl Cli {
    /// Builds the run configuration from the arguments.
    ///
    /// # Examples
    ///
    /// ```
    /// use hassfest_cli::cli::Cli;
    ///
    /// let cli = Cli {
    ///     integrations: vec!["sonos".to_owned()],
    ///     ..Cli::default()
    /// };
    /// let config = cli.run_config();
    /// assert!(config.is_reported("sonos"));
    /// assert!(!config.is_reported("hue"));
    /// ```
    #[must_use]
    pub fn run_config(&self) -> Config {
        let mut config = Config::new(self.root.clone());
        if !self.integrations.is_empty() {
            config.specific_integrations = Some(self.integrations.clone());
        }
        config
    }

    /// Returns the default log filter for the requested verbosity.
    #[must_use]
    pub const fn log_filter(&self) -> &'static str {
        if self.quiet {
            return "error";
        }
        match self.verbosity {
            0 => "warn",
            1 => "info",
            _ => "debug",
        }
    }
}

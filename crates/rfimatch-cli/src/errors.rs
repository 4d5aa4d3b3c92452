use console::style;
use rfimatch_core::RfiMatchError;
use std::fmt;

/// Error with remediation hints, shown when a command fails
pub struct CliError {
    pub message: String,
    pub context: Option<String>,
    pub suggestions: Vec<String>,
    pub help_command: Option<String>,
}

impl CliError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            context: None,
            suggestions: Vec::new(),
            help_command: None,
        }
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }

    pub fn with_help(mut self, command: impl Into<String>) -> Self {
        self.help_command = Some(command.into());
        self
    }

    pub fn display(&self) {
        eprintln!("{} {}\n", style("✗").red().bold(), style(&self.message).red().bold());

        if let Some(ref context) = self.context {
            eprintln!("{}", context);
            eprintln!();
        }

        if !self.suggestions.is_empty() {
            eprintln!("{}", style("To fix this:").yellow().bold());
            for (i, suggestion) in self.suggestions.iter().enumerate() {
                eprintln!("  {}. {}", i + 1, suggestion);
            }
            eprintln!();
        }

        if let Some(ref help_cmd) = self.help_command {
            eprintln!("{} {}", style("Need help?").cyan(), style(help_cmd).cyan().bold());
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl fmt::Debug for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

/// Map a command failure to a user-facing error
///
/// The first [`RfiMatchError`] in the cause chain decides the hints.
pub fn from_anyhow(error: &anyhow::Error) -> CliError {
    let detail = format!("{:#}", error);

    let Some(cause) = error.chain().find_map(|e| e.downcast_ref::<RfiMatchError>()) else {
        return CliError::new(error.to_string()).with_context(format!("Error: {}", detail));
    };

    let base = CliError::new(error.to_string()).with_context(format!("Error: {}", detail));
    match cause {
        RfiMatchError::Credential { .. } => base
            .with_suggestion("Refresh the archive token and write it to the token file")
            .with_suggestion("Or point at another token file: --token-path tokens.json")
            .with_help("Run: rfimatch config"),
        RfiMatchError::RegistryUnavailable { .. } => base
            .with_suggestion("Check the registry CSV path: --registry observatories.csv")
            .with_suggestion("Or drop --registry to use the built-in registry")
            .with_help("Run: rfimatch config"),
        RfiMatchError::FilterSyntax { .. } | RfiMatchError::SortSyntax { .. } => base
            .with_suggestion("Filters look like Band=L or from=2024-04-15")
            .with_suggestion("Sort tokens look like StartTime:desc")
            .with_help("Run: rfimatch query --help"),
        RfiMatchError::TransportQuery { .. } => base
            .with_suggestion("Check the archive URL: --archive-url https://archive.sarao.ac.za")
            .with_suggestion("Retry later if the archive is under maintenance"),
        RfiMatchError::CandidateLookup { .. } | RfiMatchError::Ephemeris { .. } => base
            .with_suggestion("Check that the satellite service is running")
            .with_suggestion("Or point at another one: --satellite-service http://host:8080"),
        RfiMatchError::Cancelled => CliError::new("Interrupted"),
        e if e.is_configuration() => base
            .with_suggestion("Check rfimatch.toml and RFIMATCH_* environment variables")
            .with_help("Run: rfimatch config"),
        _ => base,
    }
}

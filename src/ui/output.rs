//! Output verbosity.

/// Output verbosity mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// Stream every installer line to the console.
    Verbose,
    /// Show progress on a spinner and status lines.
    #[default]
    Normal,
    /// Show only the final status and errors.
    Quiet,
}

impl OutputMode {
    /// Check if this mode shows installer output line by line.
    pub fn shows_command_output(&self) -> bool {
        matches!(self, Self::Verbose)
    }

    /// Check if this mode shows informational messages.
    pub fn shows_status(&self) -> bool {
        !matches!(self, Self::Quiet)
    }
}

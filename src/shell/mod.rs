//! External command execution and platform details.

pub mod command;
pub mod mock;
pub mod platform;

pub use command::{
    display_command, CommandResult, CommandRunner, CommandStream, OutputLine, SystemRunner,
};
pub use mock::{MockResponse, MockRunner};
pub use platform::{is_ci, platform_summary};

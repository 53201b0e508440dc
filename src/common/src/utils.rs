pub mod command;
pub mod env;
pub mod hostname;

pub use command::{CommandError, CommandOutput, CommandRunner, CommandSpec, SystemCommandRunner};

//! CLI command implementations

pub mod get;
pub mod list;
pub mod palette;

pub use get::GetArgs;
pub use list::{ListArgs, ResolveUrlArgs};
pub use palette::run_palette_command;

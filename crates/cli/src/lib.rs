pub mod app;
pub mod bootstrap;
pub mod cli;
pub mod cmd_check;
pub mod cmd_families;
pub mod color;
pub mod config;
pub mod discovery;
pub mod dispatch;
pub mod error;
pub mod exclude;
pub mod exec;
pub mod family;
pub mod longpath;
pub mod orchestrator;
pub mod output;
pub mod report;
pub mod scan;
pub mod verbose;
pub mod walker;

pub use cli::{Cli, Command, FamiliesArgs, OutputFormat, RunArgs};
pub use error::{Error, ExitCode, Result};
pub use family::{FamilyId, LinterFamily, Mode, REGISTRY};
pub use orchestrator::{Orchestrator, Phase, RunOptions};
pub use report::{FamilyStatus, RunReport};
pub use walker::{FileWalker, WalkStats, WalkedFile, WalkerConfig};

#[cfg(test)]
pub mod test_utils;

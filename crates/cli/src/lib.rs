pub mod cli;
pub mod codegen;
pub mod config;
pub mod env;
pub mod error;
pub mod hotswap;
pub mod jit;
pub mod pattern;
pub mod reader;
pub mod scan;

pub use cli::{Cli, Mode};
pub use config::{Config, Settings};
pub use error::{Error, ExitCode, Result};
pub use hotswap::ActiveMatcher;
pub use jit::{Backend, BackendKind, CompileError, OptLevel};
pub use pattern::{LineMatcher, Pattern};
pub use reader::FileReader;
pub use scan::{ScanError, ScanStats, scan};

#[cfg(test)]
pub mod test_utils;

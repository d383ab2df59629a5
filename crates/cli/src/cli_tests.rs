#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use super::*;
use clap::CommandFactory;
use yare::parameterized;

#[test]
fn verify_cli() {
    Cli::command().debug_assert();
}

#[test]
fn parse_pattern_and_file() {
    let cli = Cli::try_parse_from(["jgrep", "^abc", "input.txt"]).unwrap();
    assert_eq!(cli.pattern, "^abc");
    assert_eq!(cli.file, PathBuf::from("input.txt"));
    assert!(!cli.dump_ir);
}

#[test]
fn missing_file_is_usage_error() {
    assert!(Cli::try_parse_from(["jgrep", "abc"]).is_err());
}

#[test]
fn missing_pattern_is_usage_error() {
    assert!(Cli::try_parse_from(["jgrep"]).is_err());
}

#[parameterized(
    concurrent = { "concurrent", Mode::Concurrent },
    jit = { "jit", Mode::Jit },
    interp = { "interp", Mode::Interp },
)]
fn parse_mode(value: &str, expected: Mode) {
    let cli = Cli::try_parse_from(["jgrep", "--mode", value, "a", "f"]).unwrap();
    assert_eq!(cli.mode, Some(expected));
}

#[parameterized(
    cranelift = { "cranelift", BackendKind::Cranelift },
    graph = { "graph", BackendKind::Graph },
    none = { "none", BackendKind::None },
)]
fn parse_backend(value: &str, expected: BackendKind) {
    let cli = Cli::try_parse_from(["jgrep", "--backend", value, "a", "f"]).unwrap();
    assert_eq!(cli.backend, Some(expected));
}

#[parameterized(
    none = { "none", OptLevel::None },
    speed = { "speed", OptLevel::Speed },
    speed_and_size = { "speed-and-size", OptLevel::SpeedAndSize },
)]
fn parse_opt_level(value: &str, expected: OptLevel) {
    let cli = Cli::try_parse_from(["jgrep", "--opt-level", value, "a", "f"]).unwrap();
    assert_eq!(cli.opt_level, Some(expected));
}

#[test]
fn rejects_unknown_backend() {
    assert!(Cli::try_parse_from(["jgrep", "--backend", "llvm", "a", "f"]).is_err());
}

#[test]
fn parse_config_and_dump_ir() {
    let cli = Cli::try_parse_from(["jgrep", "-C", "jgrep.toml", "--dump-ir", "a", "f"]).unwrap();
    assert_eq!(cli.config, Some(PathBuf::from("jgrep.toml")));
    assert!(cli.dump_ir);
}

#[test]
fn pattern_may_start_with_caret_or_star() {
    let cli = Cli::try_parse_from(["jgrep", "*a", "f"]).unwrap();
    assert_eq!(cli.pattern, "*a");
}

// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use yare::parameterized;

fn not_found() -> std::io::Error {
    std::io::Error::new(std::io::ErrorKind::NotFound, "No such file or directory")
}

#[test]
fn config_error_display() {
    let err = Error::Config {
        message: "unsupported config version 2".into(),
        path: Some(PathBuf::from("jgrep.toml")),
    };
    assert_eq!(
        err.to_string(),
        "config error: unsupported config version 2"
    );
}

#[test]
fn io_error_names_the_path() {
    let err = Error::Io {
        path: PathBuf::from("missing.txt"),
        source: not_found(),
    };
    assert_eq!(
        err.to_string(),
        "io error: missing.txt: No such file or directory"
    );
}

#[parameterized(
    config = { Error::Config { message: "x".into(), path: None }, ExitCode::ConfigError },
    argument = { Error::Argument("x".into()), ExitCode::ConfigError },
    io = { Error::Io { path: PathBuf::from("x"), source: not_found() }, ExitCode::InputError },
    output = { Error::Output(not_found()), ExitCode::InternalError },
    internal = { Error::Internal("x".into()), ExitCode::InternalError },
)]
fn exit_code_mapping(err: Error, expected: ExitCode) {
    assert_eq!(ExitCode::from(&err), expected);
}

#[test]
fn exit_code_values() {
    assert_eq!(ExitCode::Success as i32, 0);
    assert_eq!(ExitCode::InputError as i32, 1);
    assert_eq!(ExitCode::ConfigError as i32, 2);
    assert_eq!(ExitCode::InternalError as i32, 3);
}

use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use log::error;

mod hazel;

use hazel::{Environment, Node, ScopeRef};

const USAGE: &str = "\
usage: hazel [-i <dir>]... [file]

  -i, --include <dir>  add a directory to the module search path; the
                       current directory and the source file's directory
                       are searched by default
  -h, --help           print this help

with no file argument an interactive session is started";

fn main() -> ExitCode {
	env_logger::Builder::new()
		.filter_level(log::LevelFilter::Warn)
		.filter_module("hazel", log::LevelFilter::Info)
		.init();

	let mut include_dirs = vec![];
	let mut file = None;
	let mut args = std::env::args().skip(1);
	while let Some(arg) = args.next() {
		match arg.as_str() {
			"-h" | "--help" => {
				println!("{}", USAGE);
				return ExitCode::SUCCESS;
			},
			"-i" | "--include" => match args.next() {
				Some(dir) => include_dirs.push(PathBuf::from(dir)),
				None => {
					error!("{} needs a directory argument", arg);
					return ExitCode::FAILURE;
				},
			},
			_ if file.is_none() => file = Some(PathBuf::from(arg)),
			_ => {
				error!("unexpected argument: {}", arg);
				return ExitCode::FAILURE;
			},
		}
	}
	include_dirs.push(PathBuf::from("."));

	match file {
		Some(path) => run_file(&path, include_dirs),
		None => run_repl(&include_dirs),
	}
}

fn run_file(path: &Path, mut include_dirs: Vec<PathBuf>) -> ExitCode {
	if let Some(dir) = path.parent() {
		include_dirs.push(dir.to_path_buf());
	}
	let text = match fs::read_to_string(path) {
		Ok(text) => text,
		Err(err) => {
			error!("cannot read {}: {}", path.display(), err);
			return ExitCode::FAILURE;
		},
	};
	let env = Environment::new_ref(None);
	match hazel::interpret(&text, &env, &include_dirs) {
		Ok(result) => {
			if !result.is_null() {
				println!("{}", result);
			}
			ExitCode::SUCCESS
		},
		Err(err) => {
			println!("{}", err);
			ExitCode::FAILURE
		},
	}
}

fn run_repl(include_dirs: &[PathBuf]) -> ExitCode {
	println!("press ^D to quit, use an underscore to refer to the last result");
	let env = Environment::new_ref(None);
	let stdin = io::stdin();
	loop {
		print!(">>> ");
		if io::stdout().flush().is_err() {
			return ExitCode::FAILURE;
		}
		let mut line = String::new();
		match stdin.lock().read_line(&mut line) {
			Ok(0) | Err(_) => return ExitCode::SUCCESS,
			Ok(_) => {},
		}
		if line.trim().is_empty() {
			continue;
		}
		// one failed line leaves the session environment intact
		match hazel::interpret(&line, &env, include_dirs) {
			Ok(result) => {
				if !result.is_null() {
					println!("{}", result);
				}
				if !matches!(result, Node::Error(_)) {
					remember_last(&env, result);
				}
			},
			Err(err) => println!("{}", err),
		}
	}
}

fn remember_last(env: &ScopeRef, result: Node) {
	env.borrow_mut().put("_", result);
}

// Copyright 2018-2026 the Deno authors. MIT license.

mod flags;
mod logger;
mod tsc_config;

use std::env;
use std::io::Read;
use std::io::Write;
use std::path::Path;

use anyhow::Context;
use log::debug;
use ts_transpiler::CompilerOptions;
use ts_transpiler::LoaderOptions;
use ts_transpiler::TranspilerDir;
use ts_transpiler::TypeScript;

use crate::flags::Flags;
use crate::flags::flags_from_vec;

fn main() {
  let args: Vec<_> = env::args_os().collect();
  let flags = match flags_from_vec(args) {
    Ok(flags) => flags,
    Err(err) => err.exit(),
  };

  logger::init(flags.log_level);

  if let Err(err) = run(flags) {
    eprintln!("error: {err:?}");
    std::process::exit(1);
  }
}

fn run(flags: Flags) -> Result<(), anyhow::Error> {
  let transpiler_dir = TranspilerDir::new(flags.cache_dir.clone())?;
  let loader_options = LoaderOptions {
    cache_root: transpiler_dir.root,
    source: flags.source.clone(),
    cache_setting: flags.cache_setting,
  };
  debug!("Compiler cache: {}", loader_options.cache_path().display());

  let compiler_options = resolve_compiler_options(&flags)?;

  let mut ts = TypeScript::load(&loader_options)
    .context("Failed loading the TypeScript compiler")?;
  if flags.print_ts_version {
    println!("{}", ts.version());
    return Ok(());
  }
  debug!("TypeScript {}", ts.version());

  let source = read_input(flags.input.as_deref())?;
  let output = ts.transpile(&source, &compiler_options)?;
  write_output(flags.output.as_deref(), &output)
}

fn resolve_compiler_options(
  flags: &Flags,
) -> Result<CompilerOptions, anyhow::Error> {
  let mut compiler_options = match &flags.config_path {
    Some(path) => tsc_config::read_compiler_options(path)?,
    None => CompilerOptions::new(),
  };
  if let Some(inline) = &flags.compiler_options {
    compiler_options.extend(inline.clone());
  }
  Ok(compiler_options)
}

fn read_input(maybe_path: Option<&Path>) -> Result<String, anyhow::Error> {
  match maybe_path {
    Some(path) => std::fs::read_to_string(path)
      .with_context(|| format!("Failed reading '{}'", path.display())),
    None => {
      let mut source = String::new();
      std::io::stdin()
        .read_to_string(&mut source)
        .context("Failed reading stdin")?;
      Ok(source)
    }
  }
}

fn write_output(
  maybe_path: Option<&Path>,
  output: &str,
) -> Result<(), anyhow::Error> {
  match maybe_path {
    Some(path) => std::fs::write(path, output)
      .with_context(|| format!("Failed writing '{}'", path.display())),
    None => write_to_stdout_ignore_sigpipe(output.as_bytes())
      .context("Failed writing to stdout"),
  }
}

fn write_to_stdout_ignore_sigpipe(bytes: &[u8]) -> std::io::Result<()> {
  use std::io::ErrorKind;

  match std::io::stdout().write_all(bytes) {
    Ok(()) => Ok(()),
    Err(e) => match e.kind() {
      ErrorKind::BrokenPipe => Ok(()),
      _ => Err(e),
    },
  }
}

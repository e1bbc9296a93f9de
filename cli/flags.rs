// Copyright 2018-2026 the Deno authors. MIT license.

use std::ffi::OsString;
use std::path::PathBuf;
use std::time::Duration;

use clap::Arg;
use clap::ArgAction;
use clap::ArgMatches;
use clap::ColorChoice;
use clap::Command;
use clap::builder::styling::AnsiColor;
use clap::value_parser;
use log::Level;
use ts_transpiler::CacheSetting;
use ts_transpiler::CompilerOptions;
use ts_transpiler::CompilerSource;
use ts_transpiler::V8Engine;
use url::Url;

use crate::tsc_config::parse_inline_compiler_options;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Flags {
  /// TypeScript file to transpile, `None` reads stdin.
  pub input: Option<PathBuf>,
  pub output: Option<PathBuf>,
  pub cache_dir: Option<PathBuf>,
  pub source: CompilerSource,
  pub cache_setting: CacheSetting,
  pub config_path: Option<PathBuf>,
  pub compiler_options: Option<CompilerOptions>,
  pub print_ts_version: bool,
  pub log_level: Option<Level>,
}

static LONG_VERSION: std::sync::LazyLock<String> =
  std::sync::LazyLock::new(|| {
    format!(
      "{}\nv8 {}",
      env!("CARGO_PKG_VERSION"),
      V8Engine::v8_version()
    )
  });

pub fn clap_root() -> Command {
  Command::new("tstranspile")
    .bin_name("tstranspile")
    .about("Transpile TypeScript to JavaScript with the official TypeScript compiler")
    .styles(
      clap::builder::Styles::styled()
        .header(AnsiColor::Yellow.on_default())
        .usage(AnsiColor::White.on_default())
        .literal(AnsiColor::Green.on_default())
        .placeholder(AnsiColor::Green.on_default()),
    )
    .color(ColorChoice::Auto)
    .version(env!("CARGO_PKG_VERSION"))
    .long_version(LONG_VERSION.as_str())
    .arg(
      Arg::new("file")
        .value_name("FILE")
        .value_parser(value_parser!(PathBuf))
        .help("TypeScript file to transpile, reads stdin when omitted or '-'"),
    )
    .arg(
      Arg::new("output")
        .short('o')
        .long("output")
        .value_name("FILE")
        .value_parser(value_parser!(PathBuf))
        .help("Write the JavaScript output to this file instead of stdout"),
    )
    .arg(
      Arg::new("cache-dir")
        .long("cache-dir")
        .value_name("DIR")
        .value_parser(value_parser!(PathBuf))
        .help("Cache root directory [default: $TS_TRANSPILER_DIR or the OS cache directory]"),
    )
    .arg(
      Arg::new("ts-version")
        .long("ts-version")
        .value_name("VERSION")
        .conflicts_with("source-url")
        .help("Use a released TypeScript compiler, e.g. 5.6.2"),
    )
    .arg(
      Arg::new("source-url")
        .long("source-url")
        .value_name("URL")
        .value_parser(value_parser!(Url))
        .help("Download typescript.js from this url"),
    )
    .arg(
      Arg::new("reload")
        .short('r')
        .long("reload")
        .action(ArgAction::SetTrue)
        .conflicts_with_all(["cached-only", "max-age"])
        .help("Download the compiler again even if it is cached"),
    )
    .arg(
      Arg::new("cached-only")
        .long("cached-only")
        .action(ArgAction::SetTrue)
        .conflicts_with("max-age")
        .help("Require the compiler to be cached, never download it"),
    )
    .arg(
      Arg::new("max-age")
        .long("max-age")
        .value_name("SECONDS")
        .value_parser(value_parser!(u64))
        .help("Download the compiler again once the cached copy is older"),
    )
    .arg(
      Arg::new("config")
        .short('c')
        .long("config")
        .value_name("FILE")
        .value_parser(value_parser!(PathBuf))
        .help("Read compilerOptions from a tsconfig.json style file"),
    )
    .arg(
      Arg::new("compiler-options")
        .long("compiler-options")
        .value_name("JSON")
        .value_parser(parse_inline_compiler_options)
        .help("Compiler options as a JSON object, applied over --config"),
    )
    .arg(
      Arg::new("print-ts-version")
        .long("print-ts-version")
        .action(ArgAction::SetTrue)
        .help("Print the version of the loaded TypeScript compiler and exit"),
    )
    .arg(
      Arg::new("log-level")
        .short('L')
        .long("log-level")
        .help("Set log level")
        .value_parser(["trace", "debug", "info"]),
    )
    .arg(
      Arg::new("quiet")
        .short('q')
        .long("quiet")
        .action(ArgAction::SetTrue)
        .help("Suppress diagnostic output"),
    )
}

/// Main entry point for parsing tstranspile's command line flags.
pub fn flags_from_vec(args: Vec<OsString>) -> clap::error::Result<Flags> {
  let mut matches = clap_root().try_get_matches_from(args)?;
  let mut flags = Flags::default();

  if matches.get_flag("quiet") {
    flags.log_level = Some(Level::Error);
  } else if let Some(log_level) = matches.get_one::<String>("log-level") {
    flags.log_level = match log_level.as_str() {
      "trace" => Some(Level::Trace),
      "debug" => Some(Level::Debug),
      "info" => Some(Level::Info),
      _ => unreachable!(),
    };
  }

  flags.input = matches
    .remove_one::<PathBuf>("file")
    .filter(|path| path.as_os_str() != "-");
  flags.output = matches.remove_one::<PathBuf>("output");
  flags.cache_dir = matches.remove_one::<PathBuf>("cache-dir");
  flags.config_path = matches.remove_one::<PathBuf>("config");
  flags.compiler_options =
    matches.remove_one::<CompilerOptions>("compiler-options");
  flags.print_ts_version = matches.get_flag("print-ts-version");
  source_arg_parse(&mut flags, &mut matches);
  cache_setting_arg_parse(&mut flags, &mut matches);

  Ok(flags)
}

fn source_arg_parse(flags: &mut Flags, matches: &mut ArgMatches) {
  if let Some(version) = matches.remove_one::<String>("ts-version") {
    flags.source = CompilerSource::Version(version);
  } else if let Some(url) = matches.remove_one::<Url>("source-url") {
    flags.source = CompilerSource::Url(url);
  }
}

fn cache_setting_arg_parse(flags: &mut Flags, matches: &mut ArgMatches) {
  flags.cache_setting = if matches.get_flag("reload") {
    CacheSetting::ReloadAll
  } else if matches.get_flag("cached-only") {
    CacheSetting::Only
  } else if let Some(seconds) = matches.remove_one::<u64>("max-age") {
    CacheSetting::MaxAge(Duration::from_secs(seconds))
  } else {
    CacheSetting::Use
  };
}

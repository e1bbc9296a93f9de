// Copyright 2018-2026 the Deno authors. MIT license.

use std::io::Write;

pub fn init(maybe_level: Option<log::Level>) {
  let log_level = maybe_level.unwrap_or(log::Level::Info);
  let logger = env_logger::Builder::from_env(
    env_logger::Env::new()
      // Use `TS_TRANSPILER_LOG` and `TS_TRANSPILER_LOG_STYLE` instead of
      // `RUST_` prefix
      .filter_or("TS_TRANSPILER_LOG", log_level.to_level_filter().to_string())
      .write_style("TS_TRANSPILER_LOG_STYLE"),
  )
  .filter_module("rustls", log::LevelFilter::Off)
  // swc_ecma_codegen's `srcmap!` macro emits error-level spans only on debug
  // build.
  .filter_module("swc_ecma_codegen", log::LevelFilter::Off)
  .filter_module("swc_ecma_parser", log::LevelFilter::Error)
  .format(|buf, record| {
    let mut target = record.target().to_string();
    if let Some(line_no) = record.line() {
      target.push(':');
      target.push_str(&line_no.to_string());
    }
    if record.level() <= log::Level::Info {
      // Print ERROR, WARN, INFO logs as they are
      writeln!(buf, "{}", record.args())
    } else {
      // Add prefix to DEBUG or TRACE logs
      writeln!(
        buf,
        "{} RS - {} - {}",
        record.level(),
        target,
        record.args()
      )
    }
  })
  .build();

  let max_level = logger.filter();
  if log::set_boxed_logger(Box::new(logger)).is_ok() {
    log::set_max_level(max_level);
  }
}

// Copyright 2018-2026 the Deno authors. MIT license.

use std::time::Duration;

const BYTE_UNITS: [&str; 5] = ["B", "KiB", "MiB", "GiB", "TiB"];

/// Formats a byte count for log output, e.g. `8.61MiB`.
pub fn human_size(byte_count: u64) -> String {
  if byte_count < 1024 {
    return format!("{byte_count}B");
  }
  let mut size = byte_count as f64;
  let mut unit = 0;
  while size >= 1024.0 && unit < BYTE_UNITS.len() - 1 {
    size /= 1024.0;
    unit += 1;
  }
  let pretty = format!("{size:.2}");
  let pretty = pretty.trim_end_matches('0').trim_end_matches('.');
  format!("{}{}", pretty, BYTE_UNITS[unit])
}

/// Formats an elapsed time for log output, e.g. `850ms`, `3s` or `1m12s`.
pub fn human_elapsed(elapsed: Duration) -> String {
  let millis = elapsed.as_millis();
  if millis < 1_000 {
    return format!("{millis}ms");
  }
  let seconds = millis / 1_000;
  if seconds < 60 {
    return format!("{seconds}s");
  }
  let minutes = seconds / 60;
  let seconds_remainder = seconds % 60;
  format!("{minutes}m{seconds_remainder}s")
}

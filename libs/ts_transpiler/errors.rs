// Copyright 2018-2026 the Deno authors. MIT license.

use std::path::PathBuf;

use url::Url;

/// Every way loading the compiler or transpiling through it can fail.
///
/// Each step of the cache-or-fetch sequence has its own variant so callers
/// can tell "network unreachable" apart from "interpreter binding mismatch".
#[derive(Debug, thiserror::Error)]
pub enum TranspilerError {
  #[error("Could not resolve a cache directory. Set $TS_TRANSPILER_DIR or pass an explicit cache root.")]
  CacheDirUnavailable,
  #[error("Invalid TypeScript compiler source url: {0}")]
  InvalidSourceUrl(String),
  #[error("Failed fetching TypeScript compiler from '{url}'")]
  Network {
    url: Url,
    #[source]
    source: Box<dyn std::error::Error + Send + Sync + 'static>,
  },
  #[error("Fetching TypeScript compiler from '{url}' failed with status {status}")]
  HttpStatus { url: Url, status: u16 },
  #[error("Failed reading response body from '{url}'")]
  BodyRead {
    url: Url,
    #[source]
    source: Box<dyn std::error::Error + Send + Sync + 'static>,
  },
  #[error("Could not create TypeScript compiler cache location: {}\nCheck the permission of the directory.", path.display())]
  CreateCacheDir {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },
  #[error("Failed writing cached compiler to '{}'", path.display())]
  WriteCache {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },
  #[error("Failed reading cached compiler from '{}'", path.display())]
  ReadCache {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },
  #[error("TypeScript compiler is not cached at '{}' and network access is disabled (--cached-only)", path.display())]
  NotCached { path: PathBuf },
  #[error("Failed minifying '{specifier}': {message}")]
  Minify { specifier: String, message: String },
  #[error("Failed compiling '{specifier}': {message}")]
  Compile { specifier: String, message: String },
  #[error("Uncaught error while executing '{specifier}': {message}")]
  Execute { specifier: String, message: String },
  #[error("Invalid TypeScript compiler binding: {0}")]
  Binding(String),
  #[error("Uncaught error in '{method}': {message}")]
  Call { method: String, message: String },
  #[error("Transpile failed: {0}")]
  Transpile(String),
}

impl TranspilerError {
  /// A short machine readable name for the failure kind.
  pub fn kind(&self) -> &'static str {
    match self {
      TranspilerError::CacheDirUnavailable => "CacheDirUnavailable",
      TranspilerError::InvalidSourceUrl(_) => "InvalidSourceUrl",
      TranspilerError::Network { .. } => "Network",
      TranspilerError::HttpStatus { .. } => "HttpStatus",
      TranspilerError::BodyRead { .. } => "BodyRead",
      TranspilerError::CreateCacheDir { .. } => "CreateCacheDir",
      TranspilerError::WriteCache { .. } => "WriteCache",
      TranspilerError::ReadCache { .. } => "ReadCache",
      TranspilerError::NotCached { .. } => "NotCached",
      TranspilerError::Minify { .. } => "Minify",
      TranspilerError::Compile { .. } => "Compile",
      TranspilerError::Execute { .. } => "Execute",
      TranspilerError::Binding(_) => "Binding",
      TranspilerError::Call { .. } => "Call",
      TranspilerError::Transpile(_) => "Transpile",
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn http_status_message() {
    let err = TranspilerError::HttpStatus {
      url: Url::parse("https://example.com/typescript.js").unwrap(),
      status: 404,
    };
    assert_eq!(err.kind(), "HttpStatus");
    assert_eq!(
      err.to_string(),
      "Fetching TypeScript compiler from 'https://example.com/typescript.js' failed with status 404"
    );
  }

  #[test]
  fn io_errors_keep_their_source() {
    use std::error::Error;

    let err = TranspilerError::ReadCache {
      path: PathBuf::from("/tmp/typescript.js"),
      source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
    };
    assert_eq!(err.kind(), "ReadCache");
    assert_eq!(err.source().unwrap().to_string(), "gone");
  }
}

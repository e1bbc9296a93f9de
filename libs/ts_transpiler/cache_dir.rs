// Copyright 2018-2026 the Deno authors. MIT license.

use std::ffi::OsString;
use std::path::PathBuf;

use crate::disk_cache::DiskCache;
use crate::errors::TranspilerError;

/// Environment variable overriding the default cache root.
pub const CACHE_DIR_ENV_VAR: &str = "TS_TRANSPILER_DIR";

/// Folder below the cache root holding the compiler scripts.
pub const CACHE_FOLDER_NAME: &str = "golang_typescript";

/// `TranspilerDir` resolves the cache root that can be controlled with
/// `$TS_TRANSPILER_DIR`, falling back to the OS cache directory.
#[derive(Debug, Clone)]
pub struct TranspilerDir {
  // Example: /Users/rld/Library/Caches/
  pub root: PathBuf,
}

impl TranspilerDir {
  pub fn new(
    maybe_custom_root: Option<PathBuf>,
  ) -> Result<Self, TranspilerError> {
    Self::resolve(
      maybe_custom_root,
      std::env::var_os(CACHE_DIR_ENV_VAR),
      dirs::cache_dir(),
    )
  }

  fn resolve(
    maybe_custom_root: Option<PathBuf>,
    maybe_env_root: Option<OsString>,
    maybe_os_cache_dir: Option<PathBuf>,
  ) -> Result<Self, TranspilerError> {
    let root = maybe_custom_root
      .or_else(|| {
        maybe_env_root
          .filter(|v| !v.is_empty())
          .map(PathBuf::from)
      })
      .or(maybe_os_cache_dir)
      .ok_or(TranspilerError::CacheDirUnavailable)?;

    let root = if root.is_absolute() {
      root
    } else {
      std::env::current_dir()
        .map_err(|_| TranspilerError::CacheDirUnavailable)?
        .join(root)
    };
    Ok(Self { root })
  }

  /// The cache holding downloaded compiler scripts.
  pub fn compiler_cache(&self) -> DiskCache {
    DiskCache::new(&self.root.join(CACHE_FOLDER_NAME))
  }
}

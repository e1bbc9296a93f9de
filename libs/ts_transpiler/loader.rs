// Copyright 2018-2026 the Deno authors. MIT license.

use std::path::Path;
use std::path::PathBuf;
use std::time::Duration;
use std::time::Instant;
use std::time::SystemTime;

use log::debug;
use log::info;
use url::Url;

use crate::cache_dir::CACHE_FOLDER_NAME;
use crate::disk_cache::DiskCache;
use crate::display::human_elapsed;
use crate::display::human_size;
use crate::engine::V8Engine;
use crate::errors::TranspilerError;
use crate::http_util::BlockingHttpClient;
use crate::http_util::HttpClient;
use crate::minify::minify_js;
use crate::typescript::TypeScript;

pub const TYPESCRIPT_SOURCE_ONLINE: &str =
  "https://raw.githubusercontent.com/microsoft/TypeScript/main/lib/typescript.js";

/// Where the compiler script is downloaded from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CompilerSource {
  /// The latest compiler from the TypeScript main branch.
  #[default]
  Upstream,
  /// A tagged TypeScript release, e.g. `5.6.2`.
  Version(String),
  Url(Url),
}

impl CompilerSource {
  pub fn url(&self) -> Result<Url, TranspilerError> {
    let url = match self {
      CompilerSource::Upstream => TYPESCRIPT_SOURCE_ONLINE.to_string(),
      CompilerSource::Version(version) => {
        if version.is_empty() || !version.chars().all(is_version_char) {
          return Err(TranspilerError::InvalidSourceUrl(format!(
            "invalid TypeScript version '{version}'"
          )));
        }
        format!(
          "https://raw.githubusercontent.com/microsoft/TypeScript/v{version}/lib/typescript.js"
        )
      }
      CompilerSource::Url(url) => return Ok(url.clone()),
    };
    Url::parse(&url).map_err(|err| {
      TranspilerError::InvalidSourceUrl(format!("{url}: {err}"))
    })
  }

  /// Path of the cached script relative to the compiler cache folder.
  pub fn cache_filename(&self) -> PathBuf {
    match self {
      CompilerSource::Upstream => PathBuf::from("typescript.js"),
      CompilerSource::Version(version) => {
        let version: String = version
          .chars()
          .map(|c| if is_version_char(c) { c } else { '_' })
          .collect();
        PathBuf::from(format!("typescript-{version}.js"))
      }
      CompilerSource::Url(url) => DiskCache::get_cache_filename(url),
    }
  }
}

fn is_version_char(c: char) -> bool {
  c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_')
}

/// Controls when a cached compiler script is refreshed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CacheSetting {
  /// Use the cached script if there is one, it is never refreshed.
  #[default]
  Use,
  /// Always download and overwrite the cached script.
  ReloadAll,
  /// Only use the cached script; never touch the network.
  Only,
  /// Download again once the cached script is older than the given age.
  MaxAge(Duration),
}

#[derive(Debug, Clone)]
pub struct LoaderOptions {
  /// Root of the cache, e.g. the OS cache directory. Scripts are stored in
  /// a `golang_typescript` folder below it.
  pub cache_root: PathBuf,
  pub source: CompilerSource,
  pub cache_setting: CacheSetting,
}

impl LoaderOptions {
  pub fn new(cache_root: impl Into<PathBuf>) -> Self {
    Self {
      cache_root: cache_root.into(),
      source: CompilerSource::default(),
      cache_setting: CacheSetting::default(),
    }
  }

  pub fn compiler_cache(&self) -> DiskCache {
    DiskCache::new(&self.cache_root.join(CACHE_FOLDER_NAME))
  }

  /// Absolute location of the cached compiler script.
  pub fn cache_path(&self) -> PathBuf {
    self.compiler_cache().path(&self.source.cache_filename())
  }
}

impl TypeScript<V8Engine> {
  /// Loads the compiler from the cache, downloading it first if needed.
  pub fn load(options: &LoaderOptions) -> Result<Self, TranspilerError> {
    load_typescript(options, &BlockingHttpClient::new())
  }
}

/// Loads the compiler script with [`fetch_or_read_cached`] and binds it in a
/// fresh V8 engine.
pub fn load_typescript(
  options: &LoaderOptions,
  client: &dyn HttpClient,
) -> Result<TypeScript<V8Engine>, TranspilerError> {
  let source = fetch_or_read_cached(options, client)?;
  TypeScript::from_source(V8Engine::new(), &source)
}

/// Returns the cached compiler script, downloading and minifying it into
/// the cache first when `options.cache_setting` asks for it.
pub fn fetch_or_read_cached(
  options: &LoaderOptions,
  client: &dyn HttpClient,
) -> Result<String, TranspilerError> {
  // reject unusable sources before any cached file is read
  let url = options.source.url()?;
  let cache = options.compiler_cache();
  let filename = options.source.cache_filename();
  let path = cache.path(&filename);

  if needs_download(&cache, &filename, &path, options.cache_setting)? {
    if cache.exists(&filename) {
      info!("Refreshing '{}' from '{}'", path.display(), url);
    } else {
      info!(
        "File '{}' not found - downloading from '{}'",
        path.display(),
        url
      );
    }

    let start = Instant::now();
    let body = client.download(&url)?;
    info!(
      "Successfully downloaded typescript source ({} - {})",
      human_size(body.len() as u64),
      human_elapsed(start.elapsed())
    );

    let text =
      String::from_utf8(body).map_err(|err| TranspilerError::BodyRead {
        url: url.clone(),
        source: Box::new(err),
      })?;
    let minified = minify_js(url.as_str(), &text)?;
    cache.set(&filename, minified.as_bytes())?;
    info!(
      "Successfully saved minified typescript source ({})",
      human_size(minified.len() as u64)
    );
  } else {
    debug!("Using cached typescript source '{}'", path.display());
  }

  cache.get(&filename)
}

fn needs_download(
  cache: &DiskCache,
  filename: &Path,
  path: &Path,
  cache_setting: CacheSetting,
) -> Result<bool, TranspilerError> {
  let exists = cache.exists(filename);
  Ok(match cache_setting {
    CacheSetting::Use => !exists,
    CacheSetting::ReloadAll => true,
    CacheSetting::Only => {
      if !exists {
        return Err(TranspilerError::NotCached {
          path: path.to_owned(),
        });
      }
      false
    }
    CacheSetting::MaxAge(max_age) => match cache.modified(filename) {
      Some(modified) if exists => SystemTime::now()
        .duration_since(modified)
        .map(|age| age > max_age)
        .unwrap_or(false),
      _ => !exists,
    },
  })
}

// Copyright 2018-2026 the Deno authors. MIT license.

use std::fs;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::time::SystemTime;

use url::Url;

use crate::checksum;
use crate::errors::TranspilerError;

/// A flat directory of cached compiler scripts.
#[derive(Debug, Clone)]
pub struct DiskCache {
  pub location: PathBuf,
}

impl DiskCache {
  pub fn new(location: &Path) -> Self {
    Self {
      location: location.to_owned(),
    }
  }

  /// Ensures the location of the cache.
  pub fn ensure_dir_exists(&self, path: &Path) -> Result<(), TranspilerError> {
    if path.is_dir() {
      return Ok(());
    }
    fs::create_dir_all(path).map_err(|source| {
      TranspilerError::CreateCacheDir {
        path: path.to_owned(),
        source,
      }
    })
  }

  /// Maps a remote script url onto a relative cache path, e.g.
  /// `http://localhost:4545/lib/typescript.js` becomes
  /// `remote/http/localhost_PORT4545/<sha256 of "/lib/typescript.js">`.
  pub fn get_cache_filename(url: &Url) -> PathBuf {
    let mut out = PathBuf::from("remote");
    out.push(url.scheme());
    if let Some(host) = url.host_str() {
      // Windows doesn't support ":" in filenames, so we represent port using a
      // special string.
      match url.port() {
        Some(port) => out.push(format!("{host}_PORT{port}")),
        None => out.push(host),
      }
    }

    let mut rest_str = url.path().to_string();
    if let Some(query) = url.query() {
      rest_str.push('?');
      rest_str.push_str(query);
    }
    // fragments are not part of the key
    out.push(checksum::gen(&[rest_str.as_bytes()]));
    out
  }

  pub fn path(&self, filename: &Path) -> PathBuf {
    self.location.join(filename)
  }

  pub fn exists(&self, filename: &Path) -> bool {
    self.path(filename).is_file()
  }

  pub fn modified(&self, filename: &Path) -> Option<SystemTime> {
    fs::metadata(self.path(filename))
      .and_then(|m| m.modified())
      .ok()
  }

  pub fn get(&self, filename: &Path) -> Result<String, TranspilerError> {
    let path = self.path(filename);
    fs::read_to_string(&path)
      .map_err(|source| TranspilerError::ReadCache { path, source })
  }

  /// Writes `data` through a temporary sibling file that is renamed into
  /// place, so readers never observe a partially written script.
  pub fn set(&self, filename: &Path, data: &[u8]) -> Result<(), TranspilerError> {
    let path = self.path(filename);
    if let Some(parent) = path.parent() {
      self.ensure_dir_exists(parent)?;
    }
    atomic_write_file(&path, data)
      .map_err(|source| TranspilerError::WriteCache { path, source })
  }
}

fn atomic_write_file(filename: &Path, data: &[u8]) -> std::io::Result<()> {
  let rand: String = (0..4)
    .map(|_| format!("{:02x}", rand::random::<u8>()))
    .collect();
  let extension = match filename.extension() {
    Some(ext) => format!("{}.{}.tmp", ext.to_string_lossy(), rand),
    None => format!("{rand}.tmp"),
  };
  let tmp_file = filename.with_extension(extension);
  let write_result = fs::File::create(&tmp_file).and_then(|mut file| {
    file.write_all(data)?;
    file.sync_all()
  });
  if let Err(err) = write_result.and_then(|_| fs::rename(&tmp_file, filename))
  {
    let _ = fs::remove_file(&tmp_file);
    return Err(err);
  }
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;
  use pretty_assertions::assert_eq;
  use tempfile::TempDir;

  #[test]
  fn test_get_cache_filename() {
    let test_cases = [
      (
        "https://raw.githubusercontent.com/microsoft/TypeScript/main/lib/typescript.js",
        "remote/https/raw.githubusercontent.com/8b6ac82782b03a06b1fa60dffa26fcff737d25c5bc35d4a1d9c89ef800b5a934",
      ),
      (
        "http://localhost:4545/lib/typescript.js",
        "remote/http/localhost_PORT4545/7e7641e4c52e7eabe4badb5c9e9e9928ed8560629f33de4c5f902929d0f46b5e",
      ),
      (
        "http://localhost:4545/lib/typescript.js#main",
        "remote/http/localhost_PORT4545/7e7641e4c52e7eabe4badb5c9e9e9928ed8560629f33de4c5f902929d0f46b5e",
      ),
      (
        "http://localhost:4545/lib/typescript.js?v=1",
        "remote/http/localhost_PORT4545/ba73bcc64cbcc4e8b4151bc943c83a9ec3dd66533b85d3a9f71d2aa3af9e6500",
      ),
      (
        "http://localhost:4545/lib/typescript.js?v=2",
        "remote/http/localhost_PORT4545/4163528a6cad050445723a3944d49ae19ee3bd2a8c068e09188c1782c9c10584",
      ),
      (
        "http://127.0.0.1:8000/ts/",
        "remote/http/127.0.0.1_PORT8000/aee42b7d14224a03c2864cefd7990cefdf31acc16bacb64845fc4293025210c1",
      ),
      (
        "http://127.0.0.1:8000",
        "remote/http/127.0.0.1_PORT8000/8a5edab282632443219e051e4ade2d1d5bbc671c781051bf1437897cbdfea0f1",
      ),
    ];

    for (url, expected) in test_cases.iter() {
      let url = Url::parse(url).unwrap();
      assert_eq!(DiskCache::get_cache_filename(&url), PathBuf::from(expected));
    }
  }

  #[test]
  fn test_path_less_url_does_not_shadow_other_urls() {
    let temp_dir = TempDir::new().unwrap();
    let cache = DiskCache::new(temp_dir.path());
    let root = DiskCache::get_cache_filename(
      &Url::parse("http://example.com/").unwrap(),
    );
    let nested = DiskCache::get_cache_filename(
      &Url::parse("http://example.com/lib/typescript.js").unwrap(),
    );
    cache.set(&root, b"root").unwrap();
    cache.set(&nested, b"nested").unwrap();
    assert_eq!(cache.get(&root).unwrap(), "root");
    assert_eq!(cache.get(&nested).unwrap(), "nested");
  }

  #[test]
  fn test_set_creates_parents_and_roundtrips() {
    let temp_dir = TempDir::new().unwrap();
    let cache = DiskCache::new(&temp_dir.path().join("a").join("b"));
    let filename = Path::new("nested/typescript.js");

    assert!(!cache.exists(filename));
    cache.set(filename, b"var ts={}").unwrap();
    assert!(cache.exists(filename));
    assert!(cache.modified(filename).is_some());
    assert_eq!(cache.get(filename).unwrap(), "var ts={}");

    // no temp files are left behind
    let entries: Vec<_> = fs::read_dir(cache.path(Path::new("nested")))
      .unwrap()
      .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
      .collect();
    assert_eq!(entries, vec!["typescript.js".to_string()]);
  }

  #[test]
  fn test_set_overwrites() {
    let temp_dir = TempDir::new().unwrap();
    let cache = DiskCache::new(temp_dir.path());
    let filename = Path::new("typescript.js");
    cache.set(filename, b"first").unwrap();
    cache.set(filename, b"second").unwrap();
    assert_eq!(cache.get(filename).unwrap(), "second");
  }

  #[test]
  fn test_get_missing_is_read_error() {
    let temp_dir = TempDir::new().unwrap();
    let cache = DiskCache::new(temp_dir.path());
    let err = cache.get(Path::new("typescript.js")).unwrap_err();
    assert_eq!(err.kind(), "ReadCache");
  }

  #[test]
  fn test_ensure_dir_exists_fails_on_file() {
    let temp_dir = TempDir::new().unwrap();
    let blocker = temp_dir.path().join("blocker");
    fs::write(&blocker, "").unwrap();
    let cache = DiskCache::new(&blocker.join("cache"));
    let err = cache.set(Path::new("typescript.js"), b"x").unwrap_err();
    assert_eq!(err.kind(), "CreateCacheDir");
  }
}

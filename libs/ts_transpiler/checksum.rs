// Copyright 2018-2026 the Deno authors. MIT license.

use sha2::Digest;
use sha2::Sha256;

/// Generate a SHA256 checksum of a slice of byte-slice-like things.
pub fn gen(v: &[impl AsRef<[u8]>]) -> String {
  let mut hasher = Sha256::new();
  for src in v {
    hasher.update(src.as_ref());
  }
  faster_hex::hex_string(hasher.finalize().as_slice())
}

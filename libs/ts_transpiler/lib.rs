// Copyright 2018-2026 the Deno authors. MIT license.

//! Transpile TypeScript to JavaScript with the official TypeScript compiler
//! running inside an embedded V8 engine.
//!
//! The compiler script is downloaded once, minified and kept in a cache
//! directory; later loads read it from disk.
//!
//! ```no_run
//! use ts_transpiler::CompilerOptions;
//! use ts_transpiler::LoaderOptions;
//! use ts_transpiler::TypeScript;
//!
//! let options = LoaderOptions::new("/tmp/ts_cache");
//! let mut ts = TypeScript::load(&options).unwrap();
//! let js = ts
//!   .transpile("const a: number = 1;", &CompilerOptions::new())
//!   .unwrap();
//! println!("{} -> {}", ts.version(), js);
//! ```

mod cache_dir;
mod checksum;
mod disk_cache;
mod display;
mod engine;
mod errors;
mod http_util;
mod loader;
mod minify;
mod typescript;

pub use cache_dir::CACHE_DIR_ENV_VAR;
pub use cache_dir::CACHE_FOLDER_NAME;
pub use cache_dir::TranspilerDir;
pub use disk_cache::DiskCache;
pub use display::human_elapsed;
pub use display::human_size;
pub use engine::ScriptEngine;
pub use engine::V8Engine;
pub use errors::TranspilerError;
pub use http_util::BlockingHttpClient;
pub use http_util::HttpClient;
pub use loader::CacheSetting;
pub use loader::CompilerSource;
pub use loader::LoaderOptions;
pub use loader::TYPESCRIPT_SOURCE_ONLINE;
pub use loader::fetch_or_read_cached;
pub use loader::load_typescript;
pub use minify::minify_js;
pub use typescript::CompilerOptions;
pub use typescript::TS_GLOBAL;
pub use typescript::TYPESCRIPT_SPECIFIER;
pub use typescript::TypeScript;

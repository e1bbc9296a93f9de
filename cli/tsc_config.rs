// Copyright 2018-2026 the Deno authors. MIT license.

use std::path::Path;

use anyhow::Context;
use anyhow::bail;
use serde::Deserialize;
use serde_json::Value;
use ts_transpiler::CompilerOptions;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TsConfigJson {
  compiler_options: Option<Value>,
}

/// Reads the `compilerOptions` of a tsconfig style JSONC file.
pub fn read_compiler_options(
  path: &Path,
) -> Result<CompilerOptions, anyhow::Error> {
  let config_text = std::fs::read_to_string(path)
    .with_context(|| format!("Failed reading config file '{}'", path.display()))?;
  parse_config(&config_text)
    .with_context(|| format!("Invalid config file '{}'", path.display()))
}

/// Take a string of JSONC, parse it and return its `compilerOptions`.
pub fn parse_config(config_text: &str) -> Result<CompilerOptions, anyhow::Error> {
  let Some(jsonc) =
    jsonc_parser::parse_to_serde_value(config_text, &Default::default())?
  else {
    return Ok(CompilerOptions::new());
  };
  if !jsonc.is_object() {
    bail!("config file must contain a JSON object");
  }
  let config: TsConfigJson = serde_json::from_value(jsonc)?;
  match config.compiler_options {
    None => Ok(CompilerOptions::new()),
    Some(Value::Object(options)) => Ok(options),
    Some(_) => bail!("\"compilerOptions\" must be an object"),
  }
}

/// Parses `--compiler-options` JSON.
pub fn parse_inline_compiler_options(
  text: &str,
) -> Result<CompilerOptions, String> {
  match serde_json::from_str::<Value>(text) {
    Ok(Value::Object(options)) => Ok(options),
    Ok(_) => Err("compiler options must be a JSON object".to_string()),
    Err(err) => Err(format!("invalid JSON: {err}")),
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use pretty_assertions::assert_eq;
  use serde_json::json;

  #[test]
  fn test_parse_config() {
    let config_text = r#"{
      // comments are allowed
      "compilerOptions": {
        "target": "ES2017",
        "strict": true, /* so are trailing commas */
      },
      "include": ["src"]
    }"#;
    let options = parse_config(config_text).unwrap();
    assert_eq!(
      Value::Object(options),
      json!({ "target": "ES2017", "strict": true })
    );
  }

  #[test]
  fn test_parse_config_without_compiler_options() {
    assert!(parse_config(r#"{ "include": [] }"#).unwrap().is_empty());
    assert!(parse_config("").unwrap().is_empty());
  }

  #[test]
  fn test_parse_config_errors() {
    assert!(parse_config("[]").is_err());
    assert!(parse_config(r#"{ "compilerOptions": true }"#).is_err());
    assert!(parse_config(r#"{ "compilerOptions": "#).is_err());
  }

  #[test]
  fn test_read_compiler_options() {
    let temp_dir = tempfile::TempDir::new().unwrap();
    let path = temp_dir.path().join("tsconfig.json");
    std::fs::write(&path, r#"{ "compilerOptions": { "module": "commonjs" } }"#)
      .unwrap();
    let options = read_compiler_options(&path).unwrap();
    assert_eq!(options.get("module"), Some(&json!("commonjs")));

    let err = read_compiler_options(&temp_dir.path().join("missing.json"))
      .unwrap_err();
    assert!(err.to_string().contains("Failed reading config file"));
  }

  #[test]
  fn test_parse_inline_compiler_options() {
    let options =
      parse_inline_compiler_options(r#"{"removeComments":true}"#).unwrap();
    assert_eq!(options.get("removeComments"), Some(&json!(true)));
    assert!(parse_inline_compiler_options("[1]").is_err());
    assert!(parse_inline_compiler_options("{").is_err());
  }
}

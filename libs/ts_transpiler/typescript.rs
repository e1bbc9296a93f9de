// Copyright 2018-2026 the Deno authors. MIT license.

use serde_json::Value;

use crate::engine::ScriptEngine;
use crate::engine::V8Engine;
use crate::errors::TranspilerError;

/// Name the compiler script is compiled and reported under.
pub const TYPESCRIPT_SPECIFIER: &str = "typescript.js";

/// Global the compiler script defines its namespace on.
pub const TS_GLOBAL: &str = "ts";

/// Compiler options forwarded verbatim to `ts.transpile`.
pub type CompilerOptions = serde_json::Map<String, Value>;

/// A loaded TypeScript compiler.
///
/// Holds the engine the compiler script ran in together with a reference to
/// its global `ts` namespace, so callers can reach further compiler APIs
/// through [`TypeScript::call`].
pub struct TypeScript<E: ScriptEngine = V8Engine> {
  // Declared before `engine` so the handle is released while the engine is
  // still alive.
  namespace: E::Object,
  version: String,
  engine: E,
}

impl<E: ScriptEngine> TypeScript<E> {
  /// Compiles and runs `source` in `engine` and binds the resulting `ts`
  /// namespace.
  pub fn from_source(
    mut engine: E,
    source: &str,
  ) -> Result<Self, TranspilerError> {
    let program = engine.compile(TYPESCRIPT_SPECIFIER, source)?;
    engine.run(TYPESCRIPT_SPECIFIER, &program)?;
    drop(program);

    let namespace = engine.global(TS_GLOBAL).ok_or_else(|| {
      TranspilerError::Binding(format!(
        "global '{TS_GLOBAL}' is missing or not an object"
      ))
    })?;
    if !engine.is_function(&namespace, "transpile") {
      return Err(TranspilerError::Binding(format!(
        "'{TS_GLOBAL}.transpile' is missing or not a function"
      )));
    }
    let version =
      engine.get_string(&namespace, "version").ok_or_else(|| {
        TranspilerError::Binding(format!(
          "'{TS_GLOBAL}.version' is missing or not a string"
        ))
      })?;

    log::debug!("Bound TypeScript compiler {}", version);
    Ok(Self {
      namespace,
      version,
      engine,
    })
  }

  /// The compiler's `ts.version`.
  pub fn version(&self) -> &str {
    &self.version
  }

  /// The global `ts` namespace object.
  pub fn namespace(&self) -> &E::Object {
    &self.namespace
  }

  pub fn engine_mut(&mut self) -> &mut E {
    &mut self.engine
  }

  /// Transpiles TypeScript `source` into JavaScript by calling
  /// `ts.transpile(source, options)`.
  pub fn transpile(
    &mut self,
    source: &str,
    options: &CompilerOptions,
  ) -> Result<String, TranspilerError> {
    let args = [
      Value::String(source.to_string()),
      Value::Object(options.clone()),
    ];
    let result = self.call("transpile", &args).map_err(|err| match err {
      TranspilerError::Call { method, message } => {
        TranspilerError::Transpile(format!("'{method}' threw: {message}"))
      }
      err => err,
    })?;
    match result {
      Value::String(output) => Ok(output),
      other => Err(TranspilerError::Binding(format!(
        "'{TS_GLOBAL}.transpile' returned {} instead of a string",
        json_type_name(&other)
      ))),
    }
  }

  /// Calls `ts[method](...args)`.
  pub fn call(
    &mut self,
    method: &str,
    args: &[Value],
  ) -> Result<Value, TranspilerError> {
    self.engine.call_method(&self.namespace, method, args)
  }
}

fn json_type_name(value: &Value) -> &'static str {
  match value {
    Value::Null => "null",
    Value::Bool(_) => "a boolean",
    Value::Number(_) => "a number",
    Value::String(_) => "a string",
    Value::Array(_) => "an array",
    Value::Object(_) => "an object",
  }
}

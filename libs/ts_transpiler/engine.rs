// Copyright 2018-2026 the Deno authors. MIT license.

use deno_core::JsRuntime;
use deno_core::RuntimeOptions;
use deno_core::serde_v8;
use deno_core::v8;
use serde_json::Value;

use crate::errors::TranspilerError;

/// A JavaScript execution capability: compile a classic script, run it, and
/// reach into the global object it leaves behind.
pub trait ScriptEngine {
  /// A compiled, not yet executed script.
  type Program;
  /// A handle to a JavaScript object owned by the engine.
  type Object;

  fn compile(
    &mut self,
    specifier: &str,
    source: &str,
  ) -> Result<Self::Program, TranspilerError>;

  fn run(
    &mut self,
    specifier: &str,
    program: &Self::Program,
  ) -> Result<(), TranspilerError>;

  /// Looks up `name` on the global object. Returns `None` when the property
  /// is missing or not an object.
  fn global(&mut self, name: &str) -> Option<Self::Object>;

  /// Reads `object[key]` if it is a string.
  fn get_string(
    &mut self,
    object: &Self::Object,
    key: &str,
  ) -> Option<String>;

  /// Whether `object[key]` is callable.
  fn is_function(&mut self, object: &Self::Object, key: &str) -> bool;

  /// Calls `object[key](...args)` with `object` as the receiver.
  fn call_method(
    &mut self,
    object: &Self::Object,
    key: &str,
    args: &[Value],
  ) -> Result<Value, TranspilerError>;
}

/// [`ScriptEngine`] backed by a fresh V8 isolate.
pub struct V8Engine {
  runtime: JsRuntime,
}

impl V8Engine {
  pub fn new() -> Self {
    Self {
      runtime: JsRuntime::new(RuntimeOptions::default()),
    }
  }

  pub fn v8_version() -> &'static str {
    v8::V8::get_version()
  }
}

impl Default for V8Engine {
  fn default() -> Self {
    Self::new()
  }
}

impl ScriptEngine for V8Engine {
  type Program = v8::Global<v8::Script>;
  type Object = v8::Global<v8::Object>;

  fn compile(
    &mut self,
    specifier: &str,
    source: &str,
  ) -> Result<Self::Program, TranspilerError> {
    let scope = &mut self.runtime.handle_scope();
    let tc_scope = &mut v8::TryCatch::new(scope);
    let Some(code) = v8::String::new(tc_scope, source) else {
      return Err(TranspilerError::Compile {
        specifier: specifier.to_string(),
        message: "source exceeds the maximum V8 string length".to_string(),
      });
    };
    match v8::Script::compile(tc_scope, code, None) {
      Some(script) => Ok(v8::Global::new(tc_scope, script)),
      None => Err(TranspilerError::Compile {
        specifier: specifier.to_string(),
        message: exception_message(tc_scope),
      }),
    }
  }

  fn run(
    &mut self,
    specifier: &str,
    program: &Self::Program,
  ) -> Result<(), TranspilerError> {
    let scope = &mut self.runtime.handle_scope();
    let script = v8::Local::new(scope, program);
    let tc_scope = &mut v8::TryCatch::new(scope);
    match script.run(tc_scope) {
      Some(_) => Ok(()),
      None => Err(TranspilerError::Execute {
        specifier: specifier.to_string(),
        message: exception_message(tc_scope),
      }),
    }
  }

  fn global(&mut self, name: &str) -> Option<Self::Object> {
    let scope = &mut self.runtime.handle_scope();
    let context = scope.get_current_context();
    let global = context.global(scope);
    let tc_scope = &mut v8::TryCatch::new(scope);
    let key = v8::String::new(tc_scope, name)?;
    let value = global.get(tc_scope, key.into())?;
    let object = v8::Local::<v8::Object>::try_from(value).ok()?;
    Some(v8::Global::new(tc_scope, object))
  }

  fn get_string(
    &mut self,
    object: &Self::Object,
    key: &str,
  ) -> Option<String> {
    let scope = &mut self.runtime.handle_scope();
    let object = v8::Local::new(scope, object);
    let tc_scope = &mut v8::TryCatch::new(scope);
    let key = v8::String::new(tc_scope, key)?;
    let value = object.get(tc_scope, key.into())?;
    if value.is_string() {
      Some(value.to_rust_string_lossy(tc_scope))
    } else {
      None
    }
  }

  fn is_function(&mut self, object: &Self::Object, key: &str) -> bool {
    let scope = &mut self.runtime.handle_scope();
    let object = v8::Local::new(scope, object);
    let tc_scope = &mut v8::TryCatch::new(scope);
    let Some(key) = v8::String::new(tc_scope, key) else {
      return false;
    };
    object
      .get(tc_scope, key.into())
      .is_some_and(|value| value.is_function())
  }

  fn call_method(
    &mut self,
    object: &Self::Object,
    key: &str,
    args: &[Value],
  ) -> Result<Value, TranspilerError> {
    let scope = &mut self.runtime.handle_scope();
    let receiver = v8::Local::new(scope, object);
    let tc_scope = &mut v8::TryCatch::new(scope);

    let function = v8::String::new(tc_scope, key)
      .and_then(|name| receiver.get(tc_scope, name.into()))
      .and_then(|value| v8::Local::<v8::Function>::try_from(value).ok())
      .ok_or_else(|| {
        TranspilerError::Binding(format!("'{key}' is not a function"))
      })?;

    let mut v8_args = Vec::with_capacity(args.len());
    for arg in args {
      let value = serde_v8::to_v8(tc_scope, arg).map_err(|err| {
        TranspilerError::Binding(format!(
          "could not pass argument to '{key}': {err}"
        ))
      })?;
      v8_args.push(value);
    }

    let Some(result) = function.call(tc_scope, receiver.into(), &v8_args)
    else {
      return Err(TranspilerError::Call {
        method: key.to_string(),
        message: exception_message(tc_scope),
      });
    };

    serde_v8::from_v8::<Value>(tc_scope, result).map_err(|err| {
      TranspilerError::Binding(format!(
        "could not read return value of '{key}': {err}"
      ))
    })
  }
}

fn exception_message(tc_scope: &mut v8::TryCatch<v8::HandleScope>) -> String {
  let Some(exception) = tc_scope.exception() else {
    return "execution terminated".to_string();
  };
  let message = exception.to_rust_string_lossy(tc_scope);
  match tc_scope
    .message()
    .and_then(|msg| msg.get_line_number(tc_scope))
  {
    Some(line) => format!("{message} (line {line})"),
    None => message,
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use pretty_assertions::assert_eq;
  use serde_json::json;

  fn run_script(engine: &mut V8Engine, source: &str) {
    let program = engine.compile("test.js", source).unwrap();
    engine.run("test.js", &program).unwrap();
  }

  #[test]
  fn globals_and_properties() {
    let mut engine = V8Engine::new();
    run_script(
      &mut engine,
      "var lib = { name: 'lib', count: 3, hello: function () { return 1; } };",
    );

    let lib = engine.global("lib").unwrap();
    assert_eq!(engine.get_string(&lib, "name"), Some("lib".to_string()));
    assert_eq!(engine.get_string(&lib, "count"), None);
    assert_eq!(engine.get_string(&lib, "missing"), None);
    assert!(engine.is_function(&lib, "hello"));
    assert!(!engine.is_function(&lib, "name"));
    assert!(engine.global("missing").is_none());
  }

  #[test]
  fn primitive_global_is_not_an_object() {
    let mut engine = V8Engine::new();
    run_script(&mut engine, "var answer = 42;");
    assert!(engine.global("answer").is_none());
  }

  #[test]
  fn call_method_uses_receiver_and_converts_values() {
    let mut engine = V8Engine::new();
    run_script(
      &mut engine,
      r#"var obj = {
        prefix: ">",
        join: function (a, opts) { return this.prefix + a + ":" + opts.sep; },
        list: function () { return ["one", "two", null]; },
        nothing: function () {}
      };"#,
    );
    let obj = engine.global("obj").unwrap();

    let value = engine
      .call_method(&obj, "join", &[json!("x"), json!({ "sep": "," })])
      .unwrap();
    assert_eq!(value, json!(">x:,"));
    let value = engine.call_method(&obj, "list", &[]).unwrap();
    assert_eq!(value, json!(["one", "two", null]));
    let value = engine.call_method(&obj, "nothing", &[]).unwrap();
    assert_eq!(value, Value::Null);
  }

  #[test]
  fn call_method_errors() {
    let mut engine = V8Engine::new();
    run_script(
      &mut engine,
      "var obj = { boom: function () { throw new TypeError('kaboom'); } };",
    );
    let obj = engine.global("obj").unwrap();

    let err = engine.call_method(&obj, "missing", &[]).unwrap_err();
    assert_eq!(err.kind(), "Binding");
    let err = engine.call_method(&obj, "boom", &[]).unwrap_err();
    assert_eq!(err.kind(), "Call");
    assert!(err.to_string().contains("TypeError: kaboom"), "{err}");
  }

  #[test]
  fn compile_error() {
    let mut engine = V8Engine::new();
    let err = engine.compile("broken.js", "var = ;").unwrap_err();
    match err {
      TranspilerError::Compile { specifier, message } => {
        assert_eq!(specifier, "broken.js");
        assert!(message.contains("SyntaxError"), "{message}");
      }
      err => panic!("unexpected error {err:?}"),
    }
  }

  #[test]
  fn execute_error() {
    let mut engine = V8Engine::new();
    let program = engine
      .compile("throws.js", "var a = 1;\nthrow new Error('nope');")
      .unwrap();
    let err = engine.run("throws.js", &program).unwrap_err();
    match err {
      TranspilerError::Execute { specifier, message } => {
        assert_eq!(specifier, "throws.js");
        assert!(message.contains("Error: nope"), "{message}");
        assert!(message.contains("(line 2)"), "{message}");
      }
      err => panic!("unexpected error {err:?}"),
    }
  }
}

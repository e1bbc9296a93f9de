// Copyright 2018-2026 the Deno authors. MIT license.

use swc_common::FileName;
use swc_common::SourceMap;
use swc_common::Spanned;
use swc_common::sync::Lrc;
use swc_ecma_ast::EsVersion;
use swc_ecma_codegen::Config;
use swc_ecma_codegen::Emitter;
use swc_ecma_codegen::Node;
use swc_ecma_codegen::text_writer::JsWriter;
use swc_ecma_codegen::text_writer::omit_trailing_semi;
use swc_ecma_parser::Parser;
use swc_ecma_parser::StringInput;
use swc_ecma_parser::Syntax;
use swc_ecma_parser::error::Error as ParseError;
use swc_ecma_parser::lexer::Lexer;

use crate::errors::TranspilerError;

/// Minifies a classic (non-module) JavaScript script.
///
/// The script is parsed with swc and printed back in minify mode, which drops
/// comments and all insignificant whitespace. Identifiers are left as is, so
/// globals like `ts` keep their names.
pub fn minify_js(
  specifier: &str,
  source: &str,
) -> Result<String, TranspilerError> {
  let cm: Lrc<SourceMap> = Default::default();
  let fm = cm.new_source_file(
    FileName::Custom(specifier.to_string()),
    source.to_string(),
  );
  let lexer = Lexer::new(
    Syntax::default(),
    EsVersion::EsNext,
    StringInput::from(&*fm),
    None,
  );
  let mut parser = Parser::new_from(lexer);
  let script = parser
    .parse_script()
    .map_err(|err| parse_error(&cm, specifier, err))?;
  if let Some(err) = parser.take_errors().into_iter().next() {
    return Err(parse_error(&cm, specifier, err));
  }

  let mut cfg = Config::default();
  cfg.minify = true;
  cfg.target = EsVersion::EsNext;

  let mut buf = vec![];
  {
    let writer = JsWriter::new(cm.clone(), "\n", &mut buf, None);
    let mut emitter = Emitter {
      cfg,
      cm: cm.clone(),
      comments: None,
      wr: omit_trailing_semi(writer),
    };
    script
      .emit_with(&mut emitter)
      .map_err(|err| TranspilerError::Minify {
        specifier: specifier.to_string(),
        message: err.to_string(),
      })?;
  }

  String::from_utf8(buf).map_err(|err| TranspilerError::Minify {
    specifier: specifier.to_string(),
    message: err.to_string(),
  })
}

fn parse_error(
  cm: &SourceMap,
  specifier: &str,
  err: ParseError,
) -> TranspilerError {
  let loc = cm.lookup_char_pos(err.span().lo);
  TranspilerError::Minify {
    specifier: specifier.to_string(),
    message: format!(
      "{} at {}:{}",
      err.kind().msg(),
      loc.line,
      loc.col_display + 1
    ),
  }
}

// Copyright 2018-2026 the Deno authors. MIT license.

use reqwest::StatusCode;
use reqwest::blocking::Client;
use reqwest::header::HeaderMap;
use reqwest::header::HeaderValue;
use reqwest::header::USER_AGENT;
use std::time::Duration;

use url::Url;

use crate::errors::TranspilerError;

pub static USER_AGENT_VALUE: &str =
  concat!("ts_transpiler/", env!("CARGO_PKG_VERSION"));

/// Something that can download the compiler script.
pub trait HttpClient {
  /// Performs a single GET request and returns the full body of a
  /// `200 OK` response.
  fn download(&self, url: &Url) -> Result<Vec<u8>, TranspilerError>;
}

/// Blocking reqwest client. The underlying client is only built once a
/// download is actually needed, so cache hits never start its runtime.
#[derive(Debug, Clone, Default)]
pub struct BlockingHttpClient;

impl BlockingHttpClient {
  pub fn new() -> Self {
    Self
  }

  fn create_client() -> Result<Client, reqwest::Error> {
    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));
    // the blocking client defaults to a 30s total timeout
    Client::builder()
      .default_headers(headers)
      .timeout(None::<Duration>)
      .use_rustls_tls()
      .build()
  }
}

impl HttpClient for BlockingHttpClient {
  fn download(&self, url: &Url) -> Result<Vec<u8>, TranspilerError> {
    let network_error = |err: reqwest::Error| TranspilerError::Network {
      url: url.clone(),
      source: Box::new(err),
    };
    let client = Self::create_client().map_err(network_error)?;
    let response = client.get(url.clone()).send().map_err(network_error)?;

    let status = response.status();
    if status != StatusCode::OK {
      return Err(TranspilerError::HttpStatus {
        url: url.clone(),
        status: status.as_u16(),
      });
    }

    let body = response.bytes().map_err(|err| TranspilerError::BodyRead {
      url: url.clone(),
      source: Box::new(err),
    })?;
    Ok(body.to_vec())
  }
}

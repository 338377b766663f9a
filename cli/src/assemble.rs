#![deny(missing_docs)]

//! # Assemble Command
//!
//! Loads an OpenAPI document, picks one operation and prints the assembled
//! request as HAR-shaped JSON.
//!
//! 1. **Load**: Document (JSON or YAML) and the optional options file.
//! 2. **Prepare**: Operation lookup, server selection and scheme credentials.
//! 3. **Assemble**: Flags override the options file, then the request is built.

use crate::config::AssemblyOptions;
use crate::error::{CliError, CliResult};
use reqgen_core::oas::models::Server;
use reqgen_core::{AssembledRequest, OpenApiDocument, RequestAssembler, RequestContext};
use serde_json::Value as JsonValue;
use std::fs;
use std::path::PathBuf;

/// Arguments for the assemble command.
#[derive(clap::Args, Debug, Clone)]
pub struct AssembleArgs {
    /// Path to the OpenAPI document (JSON or YAML).
    #[clap(long)]
    pub document: PathBuf,

    /// Path template of the operation, e.g. `/users/{id}`.
    #[clap(long)]
    pub path: String,

    /// HTTP method of the operation.
    #[clap(long, default_value = "get")]
    pub method: String,

    /// Options file (YAML). See `AssemblyOptions`.
    #[clap(long, env = "REQGEN_CONFIG")]
    pub config: Option<PathBuf>,

    /// Media type to encode the body as.
    #[clap(long)]
    pub content_type: Option<String>,

    /// Named example to use for parameters and body.
    #[clap(long)]
    pub example: Option<String>,

    /// Body value as JSON. Wins over every example in the document.
    #[clap(long)]
    pub body: Option<String>,

    /// Server URL to use instead of the first server declared for the operation.
    #[clap(long)]
    pub server: Option<String>,

    /// Skip the `Accept` and `Content-Type` defaults.
    #[clap(long)]
    pub no_default_headers: bool,

    /// Print only the full URL, query string included.
    #[clap(long)]
    pub url_only: bool,
}

/// Applies command line overrides on top of the loaded options.
fn effective_options(args: &AssembleArgs) -> CliResult<AssemblyOptions> {
    let mut options = match &args.config {
        Some(path) => AssemblyOptions::load(path)?,
        None => AssemblyOptions::default(),
    };
    if args.content_type.is_some() {
        options.content_type = args.content_type.clone();
    }
    if args.example.is_some() {
        options.example_key = args.example.clone();
    }
    if args.no_default_headers {
        options.include_default_headers = false;
    }
    Ok(options)
}

/// Builds the request for the selected operation.
pub fn assemble(args: &AssembleArgs) -> CliResult<AssembledRequest> {
    let content = fs::read_to_string(&args.document)?;
    let document: OpenApiDocument = content.parse()?;
    let options = effective_options(args)?;

    let operation = document.find_operation(&args.path, &args.method)?;
    let schemes = document.security_schemes_for(&operation, &options.secrets);
    let server = match &args.server {
        Some(url) => Some(Server::new(url.as_str())),
        None => document
            .servers_for(&args.path, &args.method)
            .into_iter()
            .next(),
    };
    let body: Option<JsonValue> = match &args.body {
        Some(raw) => Some(
            serde_json::from_str(raw)
                .map_err(|e| CliError::General(format!("Invalid --body JSON: {}", e)))?,
        ),
        None => None,
    };

    let mut ctx = RequestContext::new(&operation, &args.method, &args.path);
    ctx.server = server.as_ref();
    ctx.content_type = options.content_type.as_deref();
    ctx.example_key = options.example_key.as_deref();
    ctx.body_example = body.as_ref();
    ctx.security_schemes = &schemes;
    ctx.include_default_headers = options.include_default_headers;
    ctx.global_cookies = &options.global_cookies;
    ctx.disabled_cookies = Some(&options.disabled_cookies);

    tracing::debug!(
        "Assembling {} {} against {:?}",
        args.method,
        args.path,
        server.as_ref().map(|s| s.url.as_str())
    );

    let assembler = RequestAssembler::standard().with_generator(document.example_generator());
    Ok(assembler.assemble(&ctx))
}

/// Executes the assemble command and returns the text to print.
pub fn execute(args: &AssembleArgs) -> CliResult<String> {
    let request = assemble(args)?;
    if args.url_only {
        return Ok(request.full_url());
    }
    serde_json::to_string_pretty(&request)
        .map_err(|e| CliError::General(format!("Failed to render request: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use tempfile::{tempdir, TempDir};

    const DOCUMENT: &str = r#"
openapi: 3.1.0
info: { title: Store, version: "1" }
servers:
  - url: https://store.example.com
paths:
  /orders/{id}:
    put:
      security:
        - bearerAuth: []
      parameters:
        - name: id
          in: path
          required: true
          example: 42
        - name: dryRun
          in: query
          example: true
      requestBody:
        content:
          application/json:
            example: { status: shipped }
components:
  securitySchemes:
    bearerAuth:
      type: http
      scheme: bearer
"#;

    fn write(dir: &TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        File::create(&path)
            .unwrap()
            .write_all(content.as_bytes())
            .unwrap();
        path
    }

    fn args(document: PathBuf) -> AssembleArgs {
        AssembleArgs {
            document,
            path: "/orders/{id}".into(),
            method: "put".into(),
            config: None,
            content_type: None,
            example: None,
            body: None,
            server: None,
            no_default_headers: false,
            url_only: false,
        }
    }

    #[test]
    fn test_assemble_from_files() {
        let dir = tempdir().unwrap();
        let doc = write(&dir, "store.yaml", DOCUMENT);
        let config = write(&dir, "options.yaml", "secrets:\n  bearerAuth:\n    token: t0k\n");

        let mut args = args(doc);
        args.config = Some(config);
        let request = assemble(&args).unwrap();

        assert_eq!(request.method, "put");
        assert_eq!(request.url, "https://store.example.com/orders/42");
        assert_eq!(request.query_string[0].value, "true");
        assert_eq!(request.header("Accept").unwrap().value, "*/*");
        assert_eq!(request.header("Authorization").unwrap().value, "Bearer t0k");
        assert_eq!(
            request.body.unwrap().text.as_deref(),
            Some(r#"{"status":"shipped"}"#)
        );
    }

    #[test]
    fn test_flags_override_document() {
        let dir = tempdir().unwrap();
        let mut args = args(write(&dir, "store.yaml", DOCUMENT));
        args.server = Some("http://localhost:8080".into());
        args.body = Some(r#"{"status":"cancelled"}"#.into());
        args.no_default_headers = true;

        let request = assemble(&args).unwrap();
        assert_eq!(request.url, "http://localhost:8080/orders/42");
        assert!(request.header("Accept").is_none());
        assert_eq!(
            request.header("Authorization").unwrap().value,
            "Bearer YOUR_SECRET_TOKEN"
        );
        assert_eq!(
            request.body.unwrap().text.as_deref(),
            Some(r#"{"status":"cancelled"}"#)
        );
    }

    #[test]
    fn test_url_only_output() {
        let dir = tempdir().unwrap();
        let mut args = args(write(&dir, "store.yaml", DOCUMENT));
        args.url_only = true;
        assert_eq!(
            execute(&args).unwrap(),
            "https://store.example.com/orders/42?dryRun=true"
        );
    }

    #[test]
    fn test_errors() {
        let dir = tempdir().unwrap();
        let mut missing = args(dir.path().join("nope.yaml"));
        assert!(matches!(assemble(&missing), Err(CliError::Io(_))));

        missing.document = write(&dir, "store.yaml", DOCUMENT);
        missing.method = "delete".into();
        assert!(matches!(assemble(&missing), Err(CliError::Core(_))));

        let mut bad_body = args(write(&dir, "store2.yaml", DOCUMENT));
        bad_body.body = Some("{".into());
        assert!(matches!(assemble(&bad_body), Err(CliError::General(_))));
    }
}

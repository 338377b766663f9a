//! End-to-end compilation of OpenAPI operations into requests.

use indexmap::IndexMap;
use pretty_assertions::assert_eq;
use reqgen_core::har::cookies::GlobalCookie;
use reqgen_core::har::models::{PostData, SerializedEntry};
use reqgen_core::har::security::{SchemeCredentials, SecuritySchemeSecret};
use reqgen_core::oas::models::{ParameterDefinition, ParameterLocation, ParameterStyle};
use reqgen_core::{OpenApiDocument, Operation, RequestAssembler, RequestContext};
use serde_json::json;

const USERS_API: &str = r##"
openapi: 3.1.0
info:
  title: Users
  version: "1.0"
servers:
  - url: https://{region}.example.com/v1/
    variables:
      region:
        default: eu
        enum: [eu, us]
security:
  - apiKey: []
paths:
  /api/users{;color}:
    get:
      operationId: listUsersByColor
      parameters:
        - name: color
          in: path
          required: true
          style: matrix
          explode: false
          schema:
            type: array
            items:
              type: string
          example: [blue, black, brown]
  /api/search:
    get:
      operationId: search
      parameters:
        - name: color
          in: query
          style: deepObject
          explode: true
          schema:
            type: object
          example:
            R: 100
            G: 200
            B: 150
        - name: X-Tags
          in: header
          explode: true
          schema:
            type: array
          example: [a, b, c]
  /api/users:
    post:
      operationId: createUser
      security:
        - basicAuth: []
      requestBody:
        content:
          application/json:
            schema:
              type: object
              properties:
                name:
                  type: string
                  example: John Doe
                age:
                  type: number
                  example: 30
            examples:
              admin:
                value:
                  name: Root
                  age: 99
            example:
              name: Inline
              age: 1
          application/x-www-form-urlencoded:
            schema:
              $ref: '#/components/schemas/User'
  /api/users/{id}:
    get:
      operationId: getUser
      security: []
      parameters:
        - name: id
          in: path
          required: true
          schema:
            type: integer
components:
  schemas:
    User:
      type: object
      properties:
        id:
          type: integer
          readOnly: true
        name:
          type: string
          example: Jane
  securitySchemes:
    apiKey:
      type: apiKey
      name: X-API-Key
      in: header
    basicAuth:
      type: http
      scheme: basic
"##;

fn document() -> OpenApiDocument {
    USERS_API.parse().unwrap()
}

fn assemble(operation: &Operation, method: &str, path: &str) -> reqgen_core::AssembledRequest {
    RequestAssembler::standard().assemble(&RequestContext::new(operation, method, path))
}

#[test]
fn matrix_path_without_explode() {
    let doc = document();
    let op = doc.find_operation("/api/users{;color}", "get").unwrap();
    let request = assemble(&op, "GET", "/api/users{;color}");
    assert_eq!(request.url, "/api/users;color=blue,black,brown");
}

#[test]
fn deep_object_query() {
    let doc = document();
    let op = doc.find_operation("/api/search", "get").unwrap();
    let request = assemble(&op, "GET", "/api/search");
    assert_eq!(
        request.query_string,
        vec![
            SerializedEntry::new("color[R]", "100"),
            SerializedEntry::new("color[G]", "200"),
            SerializedEntry::new("color[B]", "150"),
        ]
    );
    assert_eq!(request.headers, vec![SerializedEntry::new("X-Tags", "a,b,c")]);
}

#[test]
fn json_body_from_schema_examples() {
    let schema = json!({
        "type": "object",
        "properties": {
            "name": { "type": "string", "example": "John Doe" },
            "age": { "type": "number", "example": 30 }
        }
    });
    let op: Operation = serde_json::from_value(json!({
        "requestBody": { "content": { "application/json": { "schema": schema } } }
    }))
    .unwrap();
    let request = assemble(&op, "POST", "/api/users");
    assert_eq!(
        request.body,
        Some(PostData {
            mime_type: "application/json".into(),
            text: Some(r#"{"name":"John Doe","age":30}"#.into()),
            params: None,
        })
    );
    assert_eq!(request.body_size, 28);
}

#[test]
fn api_key_placeholder_from_document_security() {
    let doc = document();
    let op = doc.find_operation("/api/search", "get").unwrap();
    let schemes = doc.security_schemes_for(&op, &IndexMap::new());
    let mut ctx = RequestContext::new(&op, "GET", "/api/search");
    ctx.security_schemes = &schemes;
    let request = RequestAssembler::standard().assemble(&ctx);
    assert_eq!(
        request.header("x-api-key"),
        Some(&SerializedEntry::new("X-API-Key", "YOUR_SECRET_TOKEN"))
    );
}

#[test]
fn basic_auth_placeholder_and_credentials() {
    let doc = document();
    let op = doc.find_operation("/api/users", "post").unwrap();

    let schemes = doc.security_schemes_for(&op, &IndexMap::new());
    let mut ctx = RequestContext::new(&op, "POST", "/api/users");
    ctx.security_schemes = &schemes;
    let request = RequestAssembler::standard().assemble(&ctx);
    assert_eq!(
        request.header("Authorization").map(|h| h.value.as_str()),
        Some("Basic username:password")
    );

    let mut credentials = IndexMap::new();
    credentials.insert(
        "basicAuth".to_string(),
        SchemeCredentials {
            username: Some("testuser".into()),
            password: Some("testpass".into()),
            ..Default::default()
        },
    );
    let schemes = doc.security_schemes_for(&op, &credentials);
    ctx.security_schemes = &schemes;
    let request = RequestAssembler::standard().assemble(&ctx);
    assert_eq!(
        request.header("Authorization").map(|h| h.value.as_str()),
        Some("Basic dGVzdHVzZXI6dGVzdHBhc3M=")
    );
}

#[test]
fn empty_operation_security_overrides_document() {
    let doc = document();
    let op = doc.find_operation("/api/users/{id}", "get").unwrap();
    assert_eq!(op.security, Some(Vec::new()));
    assert!(doc.security_schemes_for(&op, &IndexMap::new()).is_empty());
}

#[test]
fn body_example_priority() {
    let doc = document();
    let op = doc.find_operation("/api/users", "post").unwrap();
    let text = |ctx: &RequestContext<'_>| {
        RequestAssembler::standard()
            .assemble(ctx)
            .body
            .and_then(|b| b.text)
            .unwrap()
    };

    let mut ctx = RequestContext::new(&op, "POST", "/api/users");
    assert_eq!(text(&ctx), r#"{"name":"Root","age":99}"#);

    ctx.example_key = Some("admin");
    assert_eq!(text(&ctx), r#"{"name":"Root","age":99}"#);

    let explicit = json!({ "name": "Caller" });
    ctx.body_example = Some(&explicit);
    assert_eq!(text(&ctx), r#"{"name":"Caller"}"#);
}

#[test]
fn form_body_resolves_schema_refs_in_write_mode() {
    let doc = document();
    let op = doc.find_operation("/api/users", "post").unwrap();
    let mut ctx = RequestContext::new(&op, "POST", "/api/users");
    ctx.content_type = Some("application/x-www-form-urlencoded");
    let request = RequestAssembler::standard()
        .with_generator(doc.example_generator())
        .assemble(&ctx);
    let body = request.body.unwrap();
    assert_eq!(body.mime_type, "application/x-www-form-urlencoded");
    assert_eq!(body.params, Some(vec![SerializedEntry::new("name", "Jane")]));
    assert_eq!(request.body_size, -1);
}

#[test]
fn server_variables_and_placeholders() {
    let doc = document();
    let servers = doc.servers_for("/api/users/{id}", "get");
    let op = doc.find_operation("/api/users/{id}", "get").unwrap();
    let mut ctx = RequestContext::new(&op, "GET", "/api/users/{id}");
    ctx.server = servers.first();
    let request = RequestAssembler::standard().assemble(&ctx);
    assert_eq!(request.url, "https://eu.example.com/v1/api/users/1");
}

#[test]
fn assembling_twice_is_identical() {
    let doc = document();
    let op = doc.find_operation("/api/search", "get").unwrap();
    let schemes = doc.security_schemes_for(&op, &IndexMap::new());
    let cookies = vec![GlobalCookie::new("session", "abc")];
    let servers = doc.servers_for("/api/search", "get");

    let mut ctx = RequestContext::new(&op, "GET", "/api/search");
    ctx.security_schemes = &schemes;
    ctx.global_cookies = &cookies;
    ctx.server = servers.first();
    ctx.include_default_headers = true;

    let assembler = RequestAssembler::standard().with_generator(doc.example_generator());
    let first = assembler.assemble(&ctx);
    let second = assembler.assemble(&ctx);
    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[test]
fn serialized_shape_uses_har_field_names() {
    let op: Operation = serde_json::from_value(json!({
        "requestBody": { "content": { "text/plain": { "example": "hello" } } }
    }))
    .unwrap();
    let request = assemble(&op, "POST", "/echo");
    let value = serde_json::to_value(&request).unwrap();
    assert_eq!(value["httpVersion"], "HTTP/1.1");
    assert_eq!(value["postData"]["mimeType"], "text/plain");
    assert_eq!(value["postData"]["text"], "hello");
    assert_eq!(value["bodySize"], 5);
    assert_eq!(value["headersSize"], "Content-Type: text/plain\r\n".len());
    assert!(value.get("queryString").is_some());
}

#[test]
fn cookie_style_is_forced_to_form() {
    let op = Operation {
        parameters: vec![ParameterDefinition {
            example: Some(json!(["a", "b"])),
            ..ParameterDefinition::new("pref", ParameterLocation::Cookie)
                .with_style(ParameterStyle::Simple)
        }],
        ..Default::default()
    };
    let request = assemble(&op, "GET", "/");
    assert_eq!(
        request.cookies,
        vec![
            SerializedEntry::new("pref", "a"),
            SerializedEntry::new("pref", "b"),
        ]
    );
}

#[test]
fn form_query_object_explode_and_not() {
    let value = json!({ "R": 100, "G": 200, "B": 150 });
    let param = |explode: bool| ParameterDefinition {
        example: Some(value.clone()),
        ..ParameterDefinition::new("color", ParameterLocation::Query).with_explode(explode)
    };

    let exploded = Operation {
        parameters: vec![param(true)],
        ..Default::default()
    };
    assert_eq!(
        assemble(&exploded, "GET", "/").query_string,
        vec![
            SerializedEntry::new("R", "100"),
            SerializedEntry::new("G", "200"),
            SerializedEntry::new("B", "150"),
        ]
    );

    let joined = Operation {
        parameters: vec![param(false)],
        ..Default::default()
    };
    assert_eq!(
        assemble(&joined, "GET", "/").query_string,
        vec![SerializedEntry::new("color", "R,100,G,200,B,150")]
    );
}

#[test]
fn no_security_schemes_add_nothing() {
    let op = Operation::default();
    let schemes: Vec<SecuritySchemeSecret> = Vec::new();
    let mut ctx = RequestContext::new(&op, "GET", "/");
    ctx.security_schemes = &schemes;
    let request = RequestAssembler::standard().assemble(&ctx);
    assert!(request.headers.is_empty());
    assert!(request.query_string.is_empty());
    assert!(request.cookies.is_empty());
}

use std::sync::Arc;

use axum::response::{Html, IntoResponse};
use axum::routing::get;
use axum::Router;
use serde::Serialize;
use serde_json::{json, Map, Value};

use crate::models::{User, UserPayload};

/// Metadata about a single route, from which the OpenAPI document is built.
#[derive(Debug, Clone, Serialize)]
pub struct RouteInfo {
    pub path: String,
    pub method: String,
    pub operation_id: String,
    pub summary: Option<String>,
    pub params: Vec<ParamInfo>,
    pub request_body_type: Option<String>,
    pub request_body_schema: Option<Value>,
    pub response_type: Option<String>,
    pub response_schema: Option<Value>,
    /// The success response is a JSON array of `response_type`.
    pub response_list: bool,
    pub response_status: u16,
    pub failures: Vec<FailureInfo>,
}

/// Metadata about a route parameter.
#[derive(Debug, Clone, Serialize)]
pub struct ParamInfo {
    pub name: String,
    pub location: ParamLocation,
    pub param_type: String,
    pub required: bool,
}

/// Where a parameter is located in the HTTP request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamLocation {
    Path,
    Query,
}

/// A documented failure response of a route.
#[derive(Debug, Clone, Serialize)]
pub struct FailureInfo {
    pub status: u16,
    pub description: String,
}

impl FailureInfo {
    pub fn new(status: u16, description: &str) -> Self {
        Self {
            status,
            description: description.to_string(),
        }
    }
}

/// Configuration for the generated OpenAPI document.
pub struct OpenApiConfig {
    pub title: String,
    pub version: String,
    pub description: Option<String>,
    pub docs_ui: bool,
}

impl OpenApiConfig {
    pub fn new(title: &str, version: &str) -> Self {
        Self {
            title: title.to_string(),
            version: version.to_string(),
            description: None,
            docs_ui: false,
        }
    }

    pub fn with_description(mut self, desc: &str) -> Self {
        self.description = Some(desc.to_string());
        self
    }

    pub fn with_docs_ui(mut self, enabled: bool) -> Self {
        self.docs_ui = enabled;
        self
    }
}

fn schema_of<T: schemars::JsonSchema>() -> Option<Value> {
    serde_json::to_value(schemars::schema_for!(T)).ok()
}

fn id_param() -> ParamInfo {
    ParamInfo {
        name: "id".to_string(),
        location: ParamLocation::Path,
        param_type: "integer".to_string(),
        required: true,
    }
}

/// The user routes as data, mirroring what `controllers::user_controller`
/// mounts.
pub fn route_metadata() -> Vec<RouteInfo> {
    let user_schema = schema_of::<User>();
    let payload_schema = schema_of::<UserPayload>();

    vec![
        RouteInfo {
            path: "/".to_string(),
            method: "GET".to_string(),
            operation_id: "list_users".to_string(),
            summary: Some("List users, optionally filtered by a name substring".to_string()),
            params: vec![ParamInfo {
                name: "name".to_string(),
                location: ParamLocation::Query,
                param_type: "string".to_string(),
                required: false,
            }],
            request_body_type: None,
            request_body_schema: None,
            response_type: Some("User".to_string()),
            response_schema: user_schema.clone(),
            response_list: true,
            response_status: 200,
            failures: vec![],
        },
        RouteInfo {
            path: "/".to_string(),
            method: "POST".to_string(),
            operation_id: "create_user".to_string(),
            summary: Some("Create a user".to_string()),
            params: vec![],
            request_body_type: Some("UserPayload".to_string()),
            request_body_schema: payload_schema.clone(),
            response_type: Some("User".to_string()),
            response_schema: user_schema.clone(),
            response_list: false,
            response_status: 201,
            failures: vec![FailureInfo::new(400, "Invalid body or failed validation")],
        },
        RouteInfo {
            path: "/{id}".to_string(),
            method: "GET".to_string(),
            operation_id: "get_user".to_string(),
            summary: Some("Fetch a single user by id".to_string()),
            params: vec![id_param()],
            request_body_type: None,
            request_body_schema: None,
            response_type: Some("User".to_string()),
            response_schema: user_schema.clone(),
            response_list: false,
            response_status: 200,
            failures: vec![FailureInfo::new(404, "The user does not exist")],
        },
        RouteInfo {
            path: "/update-users/{id}".to_string(),
            method: "PUT".to_string(),
            operation_id: "update_user".to_string(),
            summary: Some("Replace a user's name and email".to_string()),
            params: vec![id_param()],
            request_body_type: Some("UserPayload".to_string()),
            request_body_schema: payload_schema,
            response_type: Some("User".to_string()),
            response_schema: user_schema,
            response_list: false,
            response_status: 200,
            failures: vec![
                FailureInfo::new(400, "Invalid body or failed validation"),
                FailureInfo::new(404, "The user does not exist"),
            ],
        },
        RouteInfo {
            path: "/delete-users/{id}".to_string(),
            method: "DELETE".to_string(),
            operation_id: "delete_user".to_string(),
            summary: Some("Delete a user".to_string()),
            params: vec![id_param()],
            request_body_type: None,
            request_body_schema: None,
            response_type: None,
            response_schema: None,
            response_list: false,
            response_status: 204,
            failures: vec![
                FailureInfo::new(404, "The user does not exist"),
                FailureInfo::new(500, "The user could not be deleted"),
            ],
        },
    ]
}

/// Recursively rewrite `$ref` paths from schemars format to OpenAPI components format.
///
/// schemars 1.x generates JSON Schema Draft 2020-12 using `$defs` and
/// `$ref: "#/$defs/X"`. OpenAPI 3.1.0 expects schemas under `#/components/schemas/X`.
fn sanitize_schema(value: &mut Value) {
    match value {
        Value::Object(obj) => {
            if let Some(Value::String(ref_str)) = obj.get_mut("$ref") {
                if ref_str.starts_with("#/$defs/") {
                    *ref_str = ref_str.replace("#/$defs/", "#/components/schemas/");
                }
            }

            for (_, v) in obj.iter_mut() {
                sanitize_schema(v);
            }
        }
        Value::Array(arr) => {
            for v in arr.iter_mut() {
                sanitize_schema(v);
            }
        }
        _ => {}
    }
}

/// Insert a schema into the schemas map, promoting `$defs` to top-level components.
fn insert_schema(
    schemas: &mut Map<String, Value>,
    extra_definitions: &mut Vec<(String, Value)>,
    type_name: &str,
    root_schema: &Option<Value>,
) {
    if let Some(ref root) = root_schema {
        let mut schema = root.clone();
        if let Some(obj) = schema.as_object_mut() {
            obj.remove("$schema");
            if let Some(Value::Object(defs)) = obj.remove("$defs") {
                for (def_name, def_schema) in defs {
                    extra_definitions.push((def_name, def_schema));
                }
            }
        }
        sanitize_schema(&mut schema);
        schemas.insert(type_name.to_string(), schema);
    } else {
        schemas.insert(type_name.to_string(), json!({ "type": "object" }));
    }
}

/// Build an OpenAPI 3.1.0 JSON spec from config and route metadata.
pub fn build_spec(config: &OpenApiConfig, routes: &[RouteInfo]) -> Value {
    let mut paths: Map<String, Value> = Map::new();

    for route in routes {
        let method_lower = route.method.to_lowercase();

        let mut operation: Map<String, Value> = Map::new();
        operation.insert("operationId".into(), json!(route.operation_id));

        if let Some(ref summary) = route.summary {
            operation.insert("summary".into(), json!(summary));
        }

        let params: Vec<Value> = route
            .params
            .iter()
            .map(|p| {
                let location = match p.location {
                    ParamLocation::Path => "path",
                    ParamLocation::Query => "query",
                };
                json!({
                    "name": p.name,
                    "in": location,
                    "required": p.required,
                    "schema": { "type": p.param_type }
                })
            })
            .collect();

        if !params.is_empty() {
            operation.insert("parameters".into(), json!(params));
        }

        if let Some(ref body_type) = route.request_body_type {
            operation.insert(
                "requestBody".into(),
                json!({
                    "required": true,
                    "content": {
                        "application/json": {
                            "schema": { "$ref": format!("#/components/schemas/{body_type}") }
                        }
                    }
                }),
            );
        }

        let status_key = route.response_status.to_string();
        let status_desc = match route.response_status {
            201 => "Created",
            204 => "No content",
            _ => "Successful response",
        };
        let mut responses: Map<String, Value> = Map::new();

        if route.response_status == 204 {
            // 204 No Content carries no documented body
            responses.insert(status_key, json!({ "description": status_desc }));
        } else if let Some(ref resp_type) = route.response_type {
            let reference = json!({ "$ref": format!("#/components/schemas/{resp_type}") });
            let schema = if route.response_list {
                json!({ "type": "array", "items": reference })
            } else {
                reference
            };
            responses.insert(
                status_key,
                json!({
                    "description": status_desc,
                    "content": {
                        "application/json": { "schema": schema }
                    }
                }),
            );
        } else {
            responses.insert(status_key, json!({ "description": status_desc }));
        }

        for failure in &route.failures {
            responses.insert(
                failure.status.to_string(),
                json!({ "description": failure.description }),
            );
        }

        operation.insert("responses".into(), Value::Object(responses));

        let path_entry = paths.entry(route.path.clone()).or_insert_with(|| json!({}));

        if let Some(obj) = path_entry.as_object_mut() {
            obj.insert(method_lower, Value::Object(operation));
        }
    }

    let mut info: Map<String, Value> = Map::new();
    info.insert("title".into(), json!(config.title));
    info.insert("version".into(), json!(config.version));
    if let Some(ref desc) = config.description {
        info.insert("description".into(), json!(desc));
    }

    // Collect all referenced types (request body + response) into
    // components/schemas.
    //
    // schemars 1.x generates JSON Schema Draft 2020-12 (aligned with OpenAPI
    // 3.1.0). We strip `$schema`, promote `$defs` entries to
    // components/schemas, and rewrite `$ref` paths accordingly.
    let mut schemas: Map<String, Value> = Map::new();
    let mut extra_definitions: Vec<(String, Value)> = Vec::new();

    for route in routes {
        if let Some(ref body_type) = route.request_body_type {
            if !schemas.contains_key(body_type) {
                insert_schema(
                    &mut schemas,
                    &mut extra_definitions,
                    body_type,
                    &route.request_body_schema,
                );
            }
        }

        if let Some(ref resp_type) = route.response_type {
            if !schemas.contains_key(resp_type) {
                insert_schema(
                    &mut schemas,
                    &mut extra_definitions,
                    resp_type,
                    &route.response_schema,
                );
            }
        }
    }

    for (def_name, mut def_schema) in extra_definitions {
        sanitize_schema(&mut def_schema);
        schemas.entry(def_name).or_insert(def_schema);
    }

    let mut components: Map<String, Value> = Map::new();
    if !schemas.is_empty() {
        components.insert("schemas".into(), Value::Object(schemas));
    }

    json!({
        "openapi": "3.1.0",
        "info": info,
        "paths": paths,
        "components": components
    })
}

struct OpenApiState {
    spec_json: String,
}

/// Build an `axum::Router` that serves `/openapi.json` and optionally `/docs`.
pub fn openapi_routes<T: Clone + Send + Sync + 'static>(
    config: OpenApiConfig,
    routes: &[RouteInfo],
) -> Router<T> {
    let spec = build_spec(&config, routes);
    let spec_json = serde_json::to_string_pretty(&spec).unwrap_or_else(|_| "{}".to_string());
    let docs_ui = config.docs_ui;

    let state = Arc::new(OpenApiState { spec_json });

    let state_clone = state.clone();
    let mut router = Router::<T>::new().route(
        "/openapi.json",
        get(move || {
            let json = state_clone.spec_json.clone();
            async move { ([("content-type", "application/json")], json).into_response() }
        }),
    );

    if docs_ui {
        router = router.route("/docs", get(|| async { Html(SWAGGER_HTML).into_response() }));
    }

    router
}

const SWAGGER_HTML: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>API Documentation</title>
    <link rel="stylesheet" href="https://unpkg.com/swagger-ui-dist@5/swagger-ui.css">
</head>
<body>
    <div id="swagger-ui"></div>
    <script src="https://unpkg.com/swagger-ui-dist@5/swagger-ui-bundle.js"></script>
    <script>
        window.onload = () => {
            SwaggerUIBundle({
                url: "/openapi.json",
                dom_id: "#swagger-ui",
            });
        };
    </script>
</body>
</html>"##;

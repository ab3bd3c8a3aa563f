// Consistency rules for an OpenAPI document held as JSON. Works on any
// document, not only the built-in one, so the client can check a file or a
// running server with the same rules.

use serde_json::{Map, Value};
use thiserror::Error;

const HTTP_METHODS: [&str; 8] = [
    "get", "put", "post", "delete", "options", "head", "patch", "trace",
];
const COMPONENTS_REF_PREFIX: &str = "#/components/";
const MAX_REF_DEPTH: usize = 32;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContractViolation {
    #[error("document is missing the top-level `{0}` key")]
    MissingTopLevelKey(&'static str),

    #[error("unsupported OpenAPI version `{0}`")]
    UnsupportedVersion(String),

    #[error("`{reference}` at {pointer} does not resolve")]
    UnresolvedReference { reference: String, pointer: String },

    #[error("{method} {path} uses undeclared tag `{tag}`")]
    UndeclaredTag {
        method: String,
        path: String,
        tag: String,
    },

    #[error("required parameter `{name}` of {method} {path} has no example")]
    MissingParameterExample {
        method: String,
        path: String,
        name: String,
    },

    #[error("required property `{property}` at {pointer} is not declared")]
    UndeclaredRequiredProperty { property: String, pointer: String },

    #[error("required property `{property}` at {pointer} has no example")]
    MissingPropertyExample { property: String, pointer: String },

    #[error("response {status} of {method} {path} has no description")]
    MissingResponseDescription {
        method: String,
        path: String,
        status: String,
    },

    #[error("{method} {path} requires unknown security scheme `{scheme}`")]
    UnknownSecurityScheme {
        method: String,
        path: String,
        scheme: String,
    },
}

/// Runs every rule over `document` and returns all violations found. An
/// empty result means the document is consistent.
pub fn validate(document: &Value) -> Vec<ContractViolation> {
    let mut violations = Vec::new();

    check_top_level(document, &mut violations);
    check_references(document, document, None, String::new(), &mut violations);
    check_operations(document, &mut violations);
    check_component_schemas(document, &mut violations);

    violations
}

fn check_top_level(document: &Value, violations: &mut Vec<ContractViolation>) {
    for key in ["openapi", "info", "paths", "components"] {
        if document.get(key).is_none() {
            violations.push(ContractViolation::MissingTopLevelKey(key));
        }
    }

    if let Some(version) = document.get("openapi") {
        let supported = version.as_str().is_some_and(|v| v.starts_with("3."));
        if !supported {
            let version = version
                .as_str()
                .map(str::to_owned)
                .unwrap_or_else(|| version.to_string());
            violations.push(ContractViolation::UnsupportedVersion(version));
        }
    }
}

// `parent_key` tells maps keyed by names (properties, component schemas) apart
// from keyword objects. Example payloads are free-form data and are not walked.
fn check_references(
    document: &Value,
    node: &Value,
    parent_key: Option<&str>,
    pointer: String,
    violations: &mut Vec<ContractViolation>,
) {
    match node {
        Value::Object(map) => {
            check_reference_at(document, map, &pointer, violations);

            let keywords = !matches!(
                parent_key,
                Some("properties" | "patternProperties" | "schemas" | "$defs")
            );
            for (key, child) in map {
                let child_pointer = format!("{pointer}/{}", escape_pointer_token(key));
                match (keywords, key.as_str(), child) {
                    (true, "example", _) | (true, "examples", Value::Array(_)) => {}
                    (true, "examples", Value::Object(entries)) => {
                        for (name, entry) in entries {
                            if let Some(entry) = entry.as_object() {
                                let entry_pointer =
                                    format!("{child_pointer}/{}", escape_pointer_token(name));
                                check_reference_at(document, entry, &entry_pointer, violations);
                            }
                        }
                    }
                    _ => check_references(
                        document,
                        child,
                        Some(key.as_str()),
                        child_pointer,
                        violations,
                    ),
                }
            }
        }
        Value::Array(items) => {
            for (index, child) in items.iter().enumerate() {
                check_references(
                    document,
                    child,
                    None,
                    format!("{pointer}/{index}"),
                    violations,
                );
            }
        }
        _ => {}
    }
}

fn check_reference_at(
    document: &Value,
    map: &Map<String, Value>,
    pointer: &str,
    violations: &mut Vec<ContractViolation>,
) {
    if let Some(Value::String(reference)) = map.get("$ref")
        && resolve(document, reference).is_none()
    {
        violations.push(ContractViolation::UnresolvedReference {
            reference: reference.clone(),
            pointer: pointer.to_owned(),
        });
    }
}

fn check_operations(document: &Value, violations: &mut Vec<ContractViolation>) {
    let Some(paths) = document.get("paths").and_then(Value::as_object) else {
        return;
    };

    let declared_tags: Vec<&str> = document
        .get("tags")
        .and_then(Value::as_array)
        .map(|tags| {
            tags.iter()
                .filter_map(|t| t.get("name").and_then(Value::as_str))
                .collect()
        })
        .unwrap_or_default();
    let security_schemes = document
        .pointer("/components/securitySchemes")
        .and_then(Value::as_object);

    for (path, item) in paths {
        let shared_parameters = item.get("parameters").and_then(Value::as_array);

        for key in HTTP_METHODS {
            let Some(operation) = item.get(key) else {
                continue;
            };
            let method = key.to_uppercase();
            let pointer = format!("/paths/{}/{key}", escape_pointer_token(path));

            for tag in string_items(operation.get("tags")) {
                if !declared_tags.contains(&tag) {
                    violations.push(ContractViolation::UndeclaredTag {
                        method: method.clone(),
                        path: path.clone(),
                        tag: tag.to_owned(),
                    });
                }
            }

            let parameters = shared_parameters
                .into_iter()
                .flatten()
                .chain(operation.get("parameters").and_then(Value::as_array).into_iter().flatten());
            for parameter in parameters {
                let parameter = resolve_node(document, parameter);
                let required = parameter.get("required").and_then(Value::as_bool) == Some(true);
                if required && !parameter_has_example(document, parameter) {
                    violations.push(ContractViolation::MissingParameterExample {
                        method: method.clone(),
                        path: path.clone(),
                        name: parameter
                            .get("name")
                            .and_then(Value::as_str)
                            .unwrap_or_default()
                            .to_owned(),
                    });
                }
            }

            if let Some(responses) = operation.get("responses").and_then(Value::as_object) {
                for (status, response) in responses {
                    let response = resolve_node(document, response);
                    let described = response
                        .get("description")
                        .and_then(Value::as_str)
                        .is_some_and(|d| !d.trim().is_empty());
                    if !described {
                        violations.push(ContractViolation::MissingResponseDescription {
                            method: method.clone(),
                            path: path.clone(),
                            status: status.clone(),
                        });
                    }
                    for (media_pointer, schema) in media_schemas(response) {
                        check_required_examples(
                            document,
                            schema,
                            None,
                            format!("{pointer}/responses/{status}{media_pointer}"),
                            violations,
                        );
                    }
                }
            }

            if let Some(body) = operation.get("requestBody") {
                for (media_pointer, schema) in media_schemas(resolve_node(document, body)) {
                    check_required_examples(
                        document,
                        schema,
                        None,
                        format!("{pointer}/requestBody{media_pointer}"),
                        violations,
                    );
                }
            }

            for requirement in operation
                .get("security")
                .or_else(|| document.get("security"))
                .and_then(Value::as_array)
                .into_iter()
                .flatten()
                .filter_map(Value::as_object)
            {
                for scheme in requirement.keys() {
                    let known = security_schemes.is_some_and(|s| s.contains_key(scheme));
                    if !known {
                        violations.push(ContractViolation::UnknownSecurityScheme {
                            method: method.clone(),
                            path: path.clone(),
                            scheme: scheme.clone(),
                        });
                    }
                }
            }
        }
    }
}

fn check_component_schemas(document: &Value, violations: &mut Vec<ContractViolation>) {
    let Some(schemas) = document
        .pointer("/components/schemas")
        .and_then(Value::as_object)
    else {
        return;
    };

    for (name, schema) in schemas {
        check_required_examples(
            document,
            schema,
            None,
            format!("/components/schemas/{}", escape_pointer_token(name)),
            violations,
        );
    }
}

/// Walks an inline schema tree. `$ref` targets are not followed here, each
/// component is checked on its own.
fn check_required_examples(
    document: &Value,
    schema: &Value,
    parent_example: Option<&Value>,
    pointer: String,
    violations: &mut Vec<ContractViolation>,
) {
    let Some(map) = schema.as_object() else {
        return;
    };
    if map.contains_key("$ref") {
        return;
    }

    let properties = map.get("properties").and_then(Value::as_object);
    let own_example = map.get("example").or(parent_example);

    for property in string_items(map.get("required")) {
        let Some(property_schema) = properties.and_then(|p| p.get(property)) else {
            violations.push(ContractViolation::UndeclaredRequiredProperty {
                property: property.to_owned(),
                pointer: pointer.clone(),
            });
            continue;
        };

        let covered_by_parent = own_example
            .and_then(|e| e.get(property))
            .is_some();
        if !covered_by_parent && !is_exemplified(document, property_schema, 0) {
            violations.push(ContractViolation::MissingPropertyExample {
                property: property.to_owned(),
                pointer: pointer.clone(),
            });
        }
    }

    if let Some(properties) = properties {
        for (name, child) in properties {
            check_required_examples(
                document,
                child,
                own_example.and_then(|e| e.get(name)),
                format!("{pointer}/properties/{}", escape_pointer_token(name)),
                violations,
            );
        }
    }
    if let Some(items) = map.get("items") {
        let first_example = own_example.and_then(|e| e.get(0));
        check_required_examples(document, items, first_example, format!("{pointer}/items"), violations);
    }
    for keyword in ["allOf", "oneOf", "anyOf"] {
        for (index, child) in map
            .get(keyword)
            .and_then(Value::as_array)
            .into_iter()
            .flatten()
            .enumerate()
        {
            check_required_examples(
                document,
                child,
                own_example,
                format!("{pointer}/{keyword}/{index}"),
                violations,
            );
        }
    }
}

/// A schema is exemplified when it carries an example, or when everything it
/// is made of does.
fn is_exemplified(document: &Value, schema: &Value, depth: usize) -> bool {
    if depth > MAX_REF_DEPTH {
        return false;
    }
    let Some(map) = schema.as_object() else {
        return false;
    };

    if has_own_example(map) {
        return true;
    }
    if let Some(reference) = map.get("$ref").and_then(Value::as_str) {
        return resolve(document, reference).is_some_and(|t| is_exemplified(document, t, depth + 1));
    }
    if let Some(items) = map.get("items") {
        return is_exemplified(document, items, depth + 1);
    }
    for keyword in ["allOf", "oneOf", "anyOf"] {
        if let Some(variants) = map.get(keyword).and_then(Value::as_array) {
            return variants
                .iter()
                .filter(|v| v.get("type").and_then(Value::as_str) != Some("null"))
                .any(|v| is_exemplified(document, v, depth + 1));
        }
    }
    match map.get("properties").and_then(Value::as_object) {
        Some(properties) if !properties.is_empty() => properties
            .values()
            .all(|p| is_exemplified(document, p, depth + 1)),
        _ => false,
    }
}

fn parameter_has_example(document: &Value, parameter: &Value) -> bool {
    let Some(map) = parameter.as_object() else {
        return false;
    };
    if has_own_example(map) {
        return true;
    }
    map.get("schema")
        .map(|s| resolve_node(document, s))
        .and_then(Value::as_object)
        .is_some_and(has_own_example)
}

fn has_own_example(map: &Map<String, Value>) -> bool {
    if map.contains_key("example") {
        return true;
    }
    match map.get("examples") {
        Some(Value::Array(examples)) => !examples.is_empty(),
        Some(Value::Object(examples)) => !examples.is_empty(),
        _ => false,
    }
}

fn media_schemas(node: &Value) -> Vec<(String, &Value)> {
    node.get("content")
        .and_then(Value::as_object)
        .map(|content| {
            content
                .iter()
                .filter_map(|(media_type, media)| {
                    media.get("schema").map(|schema| {
                        (
                            format!("/content/{}/schema", escape_pointer_token(media_type)),
                            schema,
                        )
                    })
                })
                .collect()
        })
        .unwrap_or_default()
}

/// Resolves a local reference into any `components` section. Remote and
/// non-component references never resolve.
pub fn resolve<'a>(document: &'a Value, reference: &str) -> Option<&'a Value> {
    let component = reference.strip_prefix(COMPONENTS_REF_PREFIX)?;
    if component.is_empty() {
        return None;
    }

    document.pointer(&reference[1..])
}

/// Follows `$ref` chains on parameters, responses and bodies. Dangling
/// references leave the node as is; they are reported by the reference rule.
fn resolve_node<'a>(document: &'a Value, node: &'a Value) -> &'a Value {
    let mut current = node;
    for _ in 0..MAX_REF_DEPTH {
        match current
            .get("$ref")
            .and_then(Value::as_str)
            .and_then(|r| resolve(document, r))
        {
            Some(target) => current = target,
            None => break,
        }
    }
    current
}

fn string_items(node: Option<&Value>) -> impl Iterator<Item = &str> {
    node.and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(Value::as_str)
}

fn escape_pointer_token(token: &str) -> String {
    token.replace('~', "~0").replace('/', "~1")
}

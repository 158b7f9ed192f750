//! Endpoint catalog, search, tags, security and dependency correlation.
//!
//! Everything here is a pure function of the document tree: the catalog is
//! recomputed fresh on every call, search and correlation consume the
//! catalog pass, nothing is cached.

use serde_json::{Map, Value};

use crate::document::{for_each_operation, response_schema};

/// One catalog entry: an HTTP method bound to a path template.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct Endpoint {
    /// Uppercase HTTP method.
    pub method: String,
    /// The path template as declared.
    pub path: String,
    /// Base-path-prefixed path, present only when it differs from `path`.
    pub full_path: Option<String>,
    /// Operation summary, falling back to description, then `"No summary"`.
    pub summary: String,
}

impl Endpoint {
    /// The path to show a user: the prefixed one when available.
    #[must_use]
    pub fn display_path(&self) -> &str {
        self.full_path.as_deref().unwrap_or(&self.path)
    }
}

/// Normalized base path from `servers[0].url` (v3) or `basePath` (v2).
///
/// Relative server paths are kept as-is; absolute URLs are reduced to their
/// path component; a malformed URL falls back to an empty base path. A
/// trailing slash is stripped.
#[must_use]
pub fn base_path(doc: &Value) -> String {
    let declared = doc
        .get("servers")
        .and_then(|s| s.get(0))
        .and_then(|s| s.get("url"))
        .and_then(Value::as_str)
        .or_else(|| doc.get("basePath").and_then(Value::as_str))
        .unwrap_or("");

    let mut base = if declared.is_empty() || declared.starts_with('/') {
        declared.to_string()
    } else {
        match url::Url::parse(declared) {
            Ok(parsed) => parsed.path().to_string(),
            Err(error) => {
                tracing::warn!(url = declared, %error, "malformed server url, using empty base path");
                String::new()
            }
        }
    };

    if base.ends_with('/') {
        base.pop();
    }
    base
}

/// Extract the full endpoint catalog in document order.
#[must_use]
pub fn endpoints(doc: &Value) -> Vec<Endpoint> {
    let base = base_path(doc);
    let mut out = Vec::new();
    for_each_operation(doc, |path, method, op| {
        let full = format!("{base}{path}");
        out.push(Endpoint {
            method: method.to_ascii_uppercase(),
            path: path.to_string(),
            full_path: (full != path).then_some(full),
            summary: summary_of(op),
        });
    });
    out
}

fn summary_of(op: &Map<String, Value>) -> String {
    op.get("summary")
        .or_else(|| op.get("description"))
        .and_then(Value::as_str)
        .unwrap_or("No summary")
        .to_string()
}

/// Search behavior switches.
#[derive(Debug, Clone, Copy, Default)]
pub struct SearchOptions {
    /// Also match a token through its verb synonyms (`"remove"` matches a
    /// `DELETE` summary saying "delete"). Off by default.
    pub synonyms: bool,
}

/// Verb synonym groups for the opt-in expansion mode.
const SYNONYMS: &[&[&str]] = &[
    &["create", "add", "new", "post"],
    &["delete", "remove", "destroy"],
    &["get", "fetch", "list", "retrieve", "read"],
    &["update", "edit", "modify", "patch", "put"],
];

/// Conjunctive keyword search over method + path + summary.
///
/// The query splits on whitespace into lowercase tokens; an endpoint matches
/// only if every token matches. Results keep catalog order; there is no
/// ranking.
#[must_use]
pub fn search(doc: &Value, query: &str) -> Vec<Endpoint> {
    search_with(doc, query, SearchOptions::default())
}

/// [`search`] with explicit options.
#[must_use]
pub fn search_with(doc: &Value, query: &str, options: SearchOptions) -> Vec<Endpoint> {
    let tokens: Vec<String> = query.split_whitespace().map(str::to_lowercase).collect();

    endpoints(doc)
        .into_iter()
        .filter(|e| {
            // Matches the declared template, not the base-path-prefixed path,
            // so a base segment like `api` cannot match every endpoint.
            let haystack = format!("{} {} {}", e.method, e.path, e.summary).to_lowercase();
            tokens
                .iter()
                .all(|token| token_matches(&haystack, token, options))
        })
        .collect()
}

fn token_matches(haystack: &str, token: &str, options: SearchOptions) -> bool {
    if haystack.contains(token) {
        return true;
    }
    if !options.synonyms {
        return false;
    }
    SYNONYMS
        .iter()
        .filter(|group| group.contains(&token))
        .any(|group| group.iter().any(|alt| haystack.contains(alt)))
}

/// A tag name with its (possibly empty) description.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct Tag {
    /// Tag name.
    pub name: String,
    /// Declared description, empty for derived tags.
    pub description: String,
}

/// Document tags: declared top-level tags when present and non-empty,
/// otherwise the unique tag names referenced by any operation, in first-seen
/// order with empty descriptions.
#[must_use]
pub fn tags(doc: &Value) -> Vec<Tag> {
    if let Some(declared) = doc.get("tags").and_then(Value::as_array) {
        if !declared.is_empty() {
            return declared
                .iter()
                .map(|t| Tag {
                    name: t
                        .get("name")
                        .and_then(Value::as_str)
                        .unwrap_or_default()
                        .to_string(),
                    description: t
                        .get("description")
                        .and_then(Value::as_str)
                        .unwrap_or_default()
                        .to_string(),
                })
                .collect();
        }
    }

    let mut seen = Vec::new();
    for_each_operation(doc, |_, _, op| {
        for tag in op
            .get("tags")
            .and_then(Value::as_array)
            .into_iter()
            .flatten()
            .filter_map(Value::as_str)
        {
            if !seen.iter().any(|s: &String| s == tag) {
                seen.push(tag.to_string());
            }
        }
    });
    seen.into_iter()
        .map(|name| Tag {
            name,
            description: String::new(),
        })
        .collect()
}

/// Catalog entries whose operation carries `tag`.
#[must_use]
pub fn endpoints_by_tag(doc: &Value, tag: &str) -> Vec<Endpoint> {
    let base = base_path(doc);
    let mut out = Vec::new();
    for_each_operation(doc, |path, method, op| {
        let tagged = op
            .get("tags")
            .and_then(Value::as_array)
            .into_iter()
            .flatten()
            .filter_map(Value::as_str)
            .any(|t| t == tag);
        if tagged {
            let full = format!("{base}{path}");
            out.push(Endpoint {
                method: method.to_ascii_uppercase(),
                path: path.to_string(),
                full_path: (full != path).then_some(full),
                summary: summary_of(op),
            });
        }
    });
    out
}

/// Security schemes plus the requirements in effect for one endpoint (its
/// own `security` override, or the document-wide list).
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct SecurityDetails {
    /// `components.securitySchemes` (or `securityDefinitions` in v2).
    pub schemes: Value,
    /// The requirement list in effect.
    pub required: Value,
}

/// Extract security details, scoped to `path` + `method` when given.
#[must_use]
pub fn security_details(doc: &Value, path: Option<&str>, method: Option<&str>) -> SecurityDetails {
    let schemes = doc
        .get("components")
        .and_then(|c| c.get("securitySchemes"))
        .or_else(|| doc.get("securityDefinitions"))
        .cloned()
        .unwrap_or_else(|| Value::Object(Map::new()));

    let endpoint_security = match (path, method) {
        (Some(path), Some(method)) => doc
            .get("paths")
            .and_then(|paths| paths.get(path))
            .and_then(|item| item.get(method.to_ascii_lowercase().as_str()))
            .and_then(|op| op.get("security"))
            .cloned(),
        _ => None,
    };

    let required = endpoint_security
        .or_else(|| doc.get("security").cloned())
        .unwrap_or_else(|| Value::Array(Vec::new()));

    SecurityDetails { schemes, required }
}

/// An endpoint whose success response exposes an identifier field.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct ProviderEdge {
    /// Uppercase HTTP method.
    pub method: String,
    /// Path template.
    pub path: String,
    /// The identifier-marked response property.
    pub field: String,
    /// Resource name derived from the field (or the path for a bare `id`).
    pub resource: String,
}

/// An endpoint that takes an identifier as a parameter.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct ConsumerEdge {
    /// Uppercase HTTP method.
    pub method: String,
    /// Path template.
    pub path: String,
    /// The identifier-marked parameter name.
    pub parameter: String,
    /// Parameter location (`path`, `query`, `header`).
    pub location: String,
    /// Resource name derived from the parameter (or the path for a bare `id`).
    pub resource: String,
}

/// Provider and consumer edges inferred from identifier naming.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct DependencyMap {
    /// Endpoints that return identifiers.
    pub providers: Vec<ProviderEdge>,
    /// Endpoints that require identifiers.
    pub consumers: Vec<ConsumerEdge>,
}

/// Correlate identifier providers with identifier consumers.
///
/// Providers come from the success response (`200`, falling back to `201`)
/// whose schema is an object or an array of objects; consumers from declared
/// parameters. `resource_filter` narrows both lists to edges whose derived
/// resource name contains the filter, case-insensitively.
#[must_use]
pub fn map_dependencies(doc: &Value, resource_filter: Option<&str>) -> DependencyMap {
    let mut map = DependencyMap::default();

    for_each_operation(doc, |path, method, op| {
        let method = method.to_ascii_uppercase();

        let properties = response_schema(op, "200").and_then(|schema| {
            schema
                .get("properties")
                .or_else(|| schema.get("items").and_then(|items| items.get("properties")))
                .and_then(Value::as_object)
        });
        for field in properties.into_iter().flat_map(Map::keys) {
            if has_id_marker(field) {
                map.providers.push(ProviderEdge {
                    method: method.clone(),
                    path: path.to_string(),
                    field: field.clone(),
                    resource: resource_name(field, path),
                });
            }
        }

        for param in op
            .get("parameters")
            .and_then(Value::as_array)
            .into_iter()
            .flatten()
        {
            let Some(name) = param.get("name").and_then(Value::as_str) else {
                continue;
            };
            if has_id_marker(name) {
                map.consumers.push(ConsumerEdge {
                    method: method.clone(),
                    path: path.to_string(),
                    parameter: name.to_string(),
                    location: param
                        .get("in")
                        .and_then(Value::as_str)
                        .unwrap_or("query")
                        .to_string(),
                    resource: resource_name(name, path),
                });
            }
        }
    });

    if let Some(filter) = resource_filter {
        let filter = filter.to_lowercase();
        map.providers
            .retain(|p| p.resource.to_lowercase().contains(&filter));
        map.consumers
            .retain(|c| c.resource.to_lowercase().contains(&filter));
    }
    map
}

/// Literal suffix rule: the name is `id` or ends in `id`, case-insensitive.
/// Kept as-is for compatibility; it will false-positive on names like
/// "android" that merely end in the marker.
fn has_id_marker(name: &str) -> bool {
    name.to_lowercase().ends_with("id")
}

/// Derive a resource name: strip the trailing identifier suffix, or for a
/// bare `id` singularize the path's last static segment.
fn resource_name(field: &str, path: &str) -> String {
    if field.eq_ignore_ascii_case("id") {
        return path_resource(path);
    }
    field[..field.len() - 2].to_string()
}

/// Last path segment that is not a `{template}` and not a version segment
/// (`v1`, `v2`, ...), with a trailing `s` stripped.
fn path_resource(path: &str) -> String {
    let segment = path
        .split('/')
        .filter(|s| !s.is_empty() && !s.starts_with('{') && !is_version_segment(s))
        .last()
        .unwrap_or("resource");
    segment.strip_suffix('s').unwrap_or(segment).to_string()
}

fn is_version_segment(segment: &str) -> bool {
    let mut chars = segment.chars();
    matches!(chars.next(), Some('v' | 'V'))
        && !segment[1..].is_empty()
        && segment[1..].chars().all(|c| c.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    fn users_doc() -> Value {
        json!({
            "servers": [{ "url": "https://api.example.com/v1/" }],
            "paths": {
                "/users": {
                    "get": { "summary": "List users", "tags": ["users"] },
                    "post": { "summary": "Create a user", "tags": ["users"] }
                },
                "/health": {
                    "get": { "description": "Liveness probe" }
                }
            }
        })
    }

    #[test]
    fn catalog_keeps_document_order_and_prefixes_base_path() {
        let listed = endpoints(&users_doc());
        let shown: Vec<String> = listed
            .iter()
            .map(|e| format!("{} {} - {}", e.method, e.display_path(), e.summary))
            .collect();
        assert_eq!(
            shown,
            vec![
                "GET /v1/users - List users",
                "POST /v1/users - Create a user",
                "GET /v1/health - Liveness probe",
            ]
        );
    }

    #[test]
    fn relative_server_path_is_kept_and_trailing_slash_stripped() {
        let doc = json!({ "servers": [{ "url": "/api/" }] });
        assert_eq!(base_path(&doc), "/api");
    }

    #[test]
    fn v2_base_path_is_used() {
        let doc = json!({ "basePath": "/v2" });
        assert_eq!(base_path(&doc), "/v2");
    }

    #[test]
    fn malformed_server_url_falls_back_to_empty() {
        let doc = json!({ "servers": [{ "url": "::not a url::" }] });
        assert_eq!(base_path(&doc), "");
    }

    #[test]
    fn root_server_url_yields_no_full_path() {
        let doc = json!({
            "servers": [{ "url": "https://api.example.com/" }],
            "paths": { "/users": { "get": {} } }
        });
        let listed = endpoints(&doc);
        assert_eq!(listed[0].full_path, None);
        assert_eq!(listed[0].display_path(), "/users");
    }

    #[test]
    fn search_is_conjunctive() {
        let doc = users_doc();
        let hits = search(&doc, "create user");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].method, "POST");

        let hits = search(&doc, "users");
        assert_eq!(hits.len(), 2);
    }

    #[test]
    fn search_ignores_the_base_path_prefix() {
        let doc = json!({
            "servers": [{ "url": "https://example.com/api" }],
            "paths": {
                "/users": { "get": { "summary": "List users" } },
                "/albums": { "get": { "summary": "List albums" } }
            }
        });
        // "api" only appears in the base path, never in a declared template
        assert!(search(&doc, "api").is_empty());
    }

    #[test]
    fn search_matches_method_token() {
        let hits = search(&users_doc(), "post");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].path, "/users");
    }

    #[test]
    fn synonym_expansion_is_opt_in() {
        let doc = json!({
            "paths": {
                "/users/{id}": { "delete": { "summary": "Delete a user" } }
            }
        });
        assert!(search(&doc, "remove user").is_empty());

        let hits = search_with(&doc, "remove user", SearchOptions { synonyms: true });
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].method, "DELETE");
    }

    #[test]
    fn declared_tags_win_over_derived() {
        let doc = json!({
            "tags": [{ "name": "pets", "description": "Everything about pets" }],
            "paths": { "/users": { "get": { "tags": ["users"] } } }
        });
        assert_eq!(
            tags(&doc),
            vec![Tag {
                name: "pets".to_string(),
                description: "Everything about pets".to_string()
            }]
        );
    }

    #[test]
    fn derived_tags_are_unique_first_seen() {
        let doc = json!({
            "paths": {
                "/a": { "get": { "tags": ["beta", "alpha"] } },
                "/b": { "get": { "tags": ["alpha"] } }
            }
        });
        let listed = tags(&doc);
        let names: Vec<&str> = listed.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["beta", "alpha"]);
    }

    #[test]
    fn by_tag_filters_the_catalog() {
        let listed = endpoints_by_tag(&users_doc(), "users");
        assert_eq!(listed.len(), 2);
        assert!(endpoints_by_tag(&users_doc(), "payments").is_empty());
    }

    #[test]
    fn endpoint_security_overrides_global() {
        let doc = json!({
            "security": [{ "apiKey": [] }],
            "components": {
                "securitySchemes": {
                    "apiKey": { "type": "apiKey", "in": "header", "name": "X-Key" }
                }
            },
            "paths": {
                "/public": { "get": { "security": [] } },
                "/private": { "get": {} }
            }
        });

        let scoped = security_details(&doc, Some("/public"), Some("GET"));
        assert_eq!(scoped.required, json!([]));

        let fallback = security_details(&doc, Some("/private"), Some("GET"));
        assert_eq!(fallback.required, json!([{ "apiKey": [] }]));
        assert!(fallback.schemes.get("apiKey").is_some());
    }

    fn albums_doc() -> Value {
        json!({
            "paths": {
                "/albums": {
                    "get": {
                        "responses": {
                            "200": {
                                "content": {
                                    "application/json": {
                                        "schema": {
                                            "type": "object",
                                            "properties": {
                                                "albumId": { "type": "integer" },
                                                "title": { "type": "string" }
                                            }
                                        }
                                    }
                                }
                            }
                        }
                    }
                },
                "/photos": {
                    "get": {
                        "parameters": [
                            { "name": "albumId", "in": "query" }
                        ]
                    }
                }
            }
        })
    }

    #[test]
    fn providers_and_consumers_are_correlated() {
        let map = map_dependencies(&albums_doc(), None);
        assert_eq!(
            map.providers,
            vec![ProviderEdge {
                method: "GET".to_string(),
                path: "/albums".to_string(),
                field: "albumId".to_string(),
                resource: "album".to_string(),
            }]
        );
        assert_eq!(
            map.consumers,
            vec![ConsumerEdge {
                method: "GET".to_string(),
                path: "/photos".to_string(),
                parameter: "albumId".to_string(),
                location: "query".to_string(),
                resource: "album".to_string(),
            }]
        );
    }

    #[test]
    fn resource_filter_narrows_both_lists() {
        let both = map_dependencies(&albums_doc(), Some("album"));
        assert_eq!(both.providers.len(), 1);
        assert_eq!(both.consumers.len(), 1);

        let neither = map_dependencies(&albums_doc(), Some("user"));
        assert!(neither.providers.is_empty());
        assert!(neither.consumers.is_empty());
    }

    #[test]
    fn array_of_objects_response_provides() {
        let doc = json!({
            "paths": {
                "/users": {
                    "get": {
                        "responses": {
                            "200": {
                                "content": {
                                    "application/json": {
                                        "schema": {
                                            "type": "array",
                                            "items": {
                                                "type": "object",
                                                "properties": { "userId": { "type": "integer" } }
                                            }
                                        }
                                    }
                                }
                            }
                        }
                    }
                }
            }
        });
        let map = map_dependencies(&doc, None);
        assert_eq!(map.providers[0].field, "userId");
        assert_eq!(map.providers[0].resource, "user");
    }

    #[test]
    fn bare_id_derives_resource_from_the_path() {
        let doc = json!({
            "paths": {
                "/v1/users/{id}": {
                    "get": {
                        "parameters": [{ "name": "id", "in": "path" }]
                    }
                }
            }
        });
        let map = map_dependencies(&doc, None);
        assert_eq!(map.consumers[0].resource, "user");
        assert_eq!(map.consumers[0].location, "path");
    }

    #[test]
    fn literal_suffix_rule_false_positives_are_kept() {
        let doc = json!({
            "paths": {
                "/devices": {
                    "get": {
                        "parameters": [{ "name": "android", "in": "query" }]
                    }
                }
            }
        });
        let map = map_dependencies(&doc, None);
        assert_eq!(map.consumers[0].parameter, "android");
        assert_eq!(map.consumers[0].resource, "andro");
    }
}

//! Client-snippet backend: endpoint + schemas → callable request code.
//!
//! Three target styles: a plain `fetch` call, an `axios` call, and a
//! declarative TanStack Query hook. Request/response types are embedded
//! through the TypeScript backend under `<Operation>Request` /
//! `<Operation>Response` names.
//!
//! Path parameters are substituted textually (`{id}` → `${data.id}`) into a
//! template literal; the substitution is purely syntactic and does not check
//! that every path parameter is supplied.

use serde_json::{Map, Value};

use crate::document::{request_schema, response_schema};
use crate::emit::typescript;

/// Snippet target style.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum Framework {
    /// Plain `fetch` call with query-parameter pass-through.
    Fetch,
    /// `axios` call; body-bearing methods send the payload as the body,
    /// others as query parameters.
    Axios,
    /// TanStack Query hook; mutations invalidate the cache, queries retry
    /// once.
    TanstackQuery,
}

/// Derive an identifier-safe human name for an operation.
///
/// Prefers `operationId` with non-alphanumeric characters replaced by `_`;
/// otherwise synthesizes `<method>_<lastPathSegment>` and camel-cases it.
#[must_use]
pub fn human_name(op: &Map<String, Value>, method: &str, path: &str) -> String {
    if let Some(id) = op.get("operationId").and_then(Value::as_str) {
        return id
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
            .collect();
    }

    let resource = last_static_segment(path).unwrap_or("resource");
    camelize(&format!("{}_{resource}", method.to_ascii_lowercase()))
}

/// Generate a snippet for one endpoint in the requested style.
#[must_use]
pub fn generate(path: &str, method: &str, op: &Map<String, Value>, framework: Framework) -> String {
    match framework {
        Framework::Fetch => fetch_snippet(path, method, op),
        Framework::Axios => axios_snippet(path, method, op),
        Framework::TanstackQuery => tanstack_snippet(path, method, op),
    }
}

/// Plain `fetch` call: query-parameter pass-through block plus a JSON body
/// for body-bearing methods.
#[must_use]
pub fn fetch_snippet(path: &str, method: &str, op: &Map<String, Value>) -> String {
    let method = method.to_ascii_uppercase();
    let has_body = is_body_method(&method);
    let query_params = query_parameter_names(op);

    let mut code = String::from("async function callApi(data) {\n");
    code.push_str(&format!("  const url = new URL('{path}', 'YOUR_BASE_URL');\n"));
    if !query_params.is_empty() {
        code.push_str("  // Query parameters\n");
        for name in &query_params {
            code.push_str(&format!(
                "  if (data.{name}) url.searchParams.append('{name}', data.{name});\n"
            ));
        }
    }
    code.push_str("\n  const response = await fetch(url.toString(), {\n");
    code.push_str(&format!("    method: '{method}',\n"));
    code.push_str("    headers: {\n      'Content-Type': 'application/json',\n    },\n");
    if has_body {
        code.push_str("    body: JSON.stringify(data),\n");
    }
    code.push_str("  });\n\n  return response.json();\n}");
    code
}

fn axios_snippet(path: &str, method: &str, op: &Map<String, Value>) -> String {
    let name = human_name(op, method, path);
    let names = TypeNames::for_operation(&name, op);
    let method_lower = method.to_ascii_lowercase();
    let payload = if is_body_method(&method_lower.to_ascii_uppercase()) {
        "data,"
    } else {
        "params: data,"
    };

    format!(
        "{types}import axios from 'axios';\n\n\
         export const {name} = async (data: {req}): Promise<{res}> => {{\n\
         \x20 try {{\n\
         \x20   const response = await axios({{\n\
         \x20     method: '{method_lower}',\n\
         \x20     url: `{url}`,\n\
         \x20     {payload}\n\
         \x20   }});\n\
         \x20   return response.data;\n\
         \x20 }} catch (error) {{\n\
         \x20   console.error('Error in {name}:', error);\n\
         \x20   throw error;\n\
         \x20 }}\n\
         }};",
        types = names.declarations,
        req = names.request,
        res = names.response,
        url = interpolate_path(path, "data"),
    )
}

fn tanstack_snippet(path: &str, method: &str, op: &Map<String, Value>) -> String {
    let name = human_name(op, method, path);
    let operation = pascal_case(&name);
    let names = TypeNames::for_operation(&name, op);
    let method_upper = method.to_ascii_uppercase();
    let method_lower = method.to_ascii_lowercase();

    // Body-bearing methods and DELETE mutate server state
    let is_mutation = is_body_method(&method_upper) || method_upper == "DELETE";

    if is_mutation {
        format!(
            "{types}import {{ useMutation, useQueryClient }} from '@tanstack/react-query';\n\
             import axios from 'axios';\n\n\
             export const use{operation} = () => {{\n\
             \x20 const queryClient = useQueryClient();\n\
             \x20 return useMutation<{res}, Error, {req}>({{\n\
             \x20   mutationFn: async (data) => {{\n\
             \x20     const response = await axios.{method_lower}(`{url}`, data);\n\
             \x20     return response.data;\n\
             \x20   }},\n\
             \x20   onSuccess: (data) => {{\n\
             \x20     queryClient.invalidateQueries();\n\
             \x20   }},\n\
             \x20   onError: (error) => {{\n\
             \x20     console.error('Mutation failed:', error);\n\
             \x20   }}\n\
             \x20 }});\n\
             }};\n",
            types = names.declarations,
            req = names.request,
            res = names.response,
            url = interpolate_path(path, "data"),
        )
    } else {
        format!(
            "{types}import {{ useQuery }} from '@tanstack/react-query';\n\
             import axios from 'axios';\n\n\
             export const use{operation} = (params: {req}) => {{\n\
             \x20 return useQuery<{res}, Error>({{\n\
             \x20   queryKey: ['{name}', params],\n\
             \x20   queryFn: async () => {{\n\
             \x20     const response = await axios.get(`{url}`, {{ params }});\n\
             \x20     return response.data;\n\
             \x20   }},\n\
             \x20   retry: 1,\n\
             \x20 }});\n\
             }};\n",
            types = names.declarations,
            req = names.request,
            res = names.response,
            url = interpolate_path(path, "params"),
        )
    }
}

/// Request/response type names plus their embedded declarations.
struct TypeNames {
    declarations: String,
    request: String,
    response: String,
}

impl TypeNames {
    fn for_operation(name: &str, op: &Map<String, Value>) -> Self {
        let operation = pascal_case(name);
        let req_schema = request_schema(op);
        let res_schema = response_schema(op, "200");

        let mut declarations = String::new();
        if let Some(schema) = req_schema {
            declarations.push_str(&typescript::declaration(
                Some(schema),
                &format!("{operation}Request"),
            ));
            declarations.push('\n');
        }
        if let Some(schema) = res_schema {
            declarations.push_str(&typescript::declaration(
                Some(schema),
                &format!("{operation}Response"),
            ));
            declarations.push('\n');
        }

        Self {
            declarations,
            request: req_schema
                .map_or_else(|| "any".to_string(), |_| format!("{operation}Request")),
            response: res_schema
                .map_or_else(|| "any".to_string(), |_| format!("{operation}Response")),
        }
    }
}

fn is_body_method(method: &str) -> bool {
    matches!(method, "POST" | "PUT" | "PATCH")
}

fn query_parameter_names(op: &Map<String, Value>) -> Vec<String> {
    op.get("parameters")
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter(|p| p.get("in").and_then(Value::as_str) == Some("query"))
        .filter_map(|p| p.get("name").and_then(Value::as_str))
        .map(str::to_string)
        .collect()
}

/// `{param}` → `${<binding>.param}` template-literal substitution.
fn interpolate_path(path: &str, binding: &str) -> String {
    let mut out = String::with_capacity(path.len());
    let mut rest = path;
    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let after = &rest[start + 1..];
        let Some(end) = after.find('}') else {
            out.push_str(&rest[start..]);
            return out;
        };
        out.push_str(&format!("${{{binding}.{}}}", &after[..end]));
        rest = &after[end + 1..];
    }
    out.push_str(rest);
    out
}

fn last_static_segment(path: &str) -> Option<&str> {
    path.split('/')
        .filter(|s| !s.is_empty() && !s.starts_with('{'))
        .last()
}

/// `_x` → `X` for lowercase letters (other characters after `_` are kept).
fn camelize(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '_' {
            if let Some(&next) = chars.peek() {
                if next.is_ascii_lowercase() {
                    out.push(next.to_ascii_uppercase());
                    chars.next();
                    continue;
                }
            }
        }
        out.push(c);
    }
    out
}

fn pascal_case(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
        None => String::new(),
    }
}

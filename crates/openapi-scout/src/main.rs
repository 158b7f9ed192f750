//! CLI for `openapi-scout`.
//!
//! One subcommand per operation, all reading the spec from `--spec` (or the
//! `OPENAPI_SCOUT_SPEC` environment variable), which may be a file path or
//! an http(s) URL.
//!
//! ```text
//! openapi-scout endpoints --spec api/openapi.yaml
//! openapi-scout search --spec https://example.com/openapi.json "create user"
//! openapi-scout types --spec api/openapi.yaml --path /users --method post
//! openapi-scout mock --spec api/openapi.yaml --path /users --method get --seed 7
//! openapi-scout deps --spec api/openapi.yaml --resource album
//! openapi-scout validate --spec api/openapi.yaml --path /users --method get --data out.json
//! ```

#![forbid(unsafe_code)]

use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use serde_json::Value;

use openapi_scout::emit::mock::Mock;
use openapi_scout::emit::snippet::{self, Framework};
use openapi_scout::emit::{typescript, zod};
use openapi_scout::{analyzer, document, validate, Document};

/// Inspect an `OpenAPI`/Swagger document and generate downstream artifacts.
#[derive(Parser)]
#[command(name = "openapi-scout", version, about)]
enum Cli {
    /// List every endpoint in the document.
    Endpoints(SpecArgs),

    /// Keyword search over method + path + summary (every token must match).
    Search(SearchArgs),

    /// List document tags (declared, or derived from operations).
    Tags(SpecArgs),

    /// List endpoints carrying one tag.
    ByTag(ByTagArgs),

    /// Print the raw operation object for one endpoint.
    Info(EndpointArgs),

    /// Print the JSON request-body schema for one endpoint.
    RequestSchema(EndpointArgs),

    /// Print the JSON response schema for one endpoint and status.
    ResponseSchema(StatusArgs),

    /// Generate TypeScript request/response types for one endpoint.
    Types(EndpointArgs),

    /// Generate a Zod validator for one endpoint's request or response.
    Zod(ZodArgs),

    /// Generate mock data from one endpoint's success response schema.
    Mock(MockArgs),

    /// Generate a client code snippet for one endpoint.
    Snippet(SnippetArgs),

    /// Map identifier providers and consumers across endpoints.
    Deps(DepsArgs),

    /// Print security schemes and effective requirements.
    Security(SecurityArgs),

    /// Check a JSON value against one endpoint's response contract.
    Validate(ValidateArgs),
}

#[derive(Parser)]
struct SpecArgs {
    /// Spec location: a file path or an http(s) URL.
    #[arg(short, long, env = "OPENAPI_SCOUT_SPEC")]
    spec: String,

    /// Inline internal `$ref` pointers before processing.
    #[arg(long)]
    deref: bool,
}

impl SpecArgs {
    fn load(&self) -> anyhow::Result<Document> {
        let mut doc = if self.spec.starts_with("http://") || self.spec.starts_with("https://") {
            Document::fetch(&self.spec)
                .with_context(|| format!("Failed to fetch spec from {}", self.spec))?
        } else {
            Document::from_file(self.spec.as_ref())
                .with_context(|| format!("Failed to load spec from {}", self.spec))?
        };
        if self.deref {
            doc.dereference();
        }
        Ok(doc)
    }
}

#[derive(Parser)]
struct SearchArgs {
    #[command(flatten)]
    spec: SpecArgs,

    /// Free-text query; whitespace-separated tokens are ANDed.
    query: String,

    /// Also match verb synonyms (e.g. "remove" matches "delete").
    #[arg(long)]
    synonyms: bool,
}

#[derive(Parser)]
struct ByTagArgs {
    #[command(flatten)]
    spec: SpecArgs,

    /// Tag name to filter by.
    tag: String,
}

#[derive(Parser)]
struct EndpointArgs {
    #[command(flatten)]
    spec: SpecArgs,

    /// Path template, e.g. `/users/{id}`.
    #[arg(short, long)]
    path: String,

    /// HTTP method.
    #[arg(short, long)]
    method: String,
}

#[derive(Parser)]
struct StatusArgs {
    #[command(flatten)]
    endpoint: EndpointArgs,

    /// Response status code (`200` falls back to `201`).
    #[arg(long, default_value = "200")]
    status: String,
}

#[derive(Parser)]
struct ZodArgs {
    #[command(flatten)]
    endpoint: EndpointArgs,

    /// Which schema to turn into a validator.
    #[arg(long, value_enum, default_value = "request")]
    target: ZodTarget,

    /// Response status code (used with `--target response`).
    #[arg(long, default_value = "200")]
    status: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
enum ZodTarget {
    Request,
    Response,
}

#[derive(Parser)]
struct MockArgs {
    #[command(flatten)]
    endpoint: EndpointArgs,

    /// Seed for reproducible sampling. Without it output is deterministic
    /// (first enum value, single-element arrays).
    #[arg(long, conflicts_with = "random")]
    seed: Option<u64>,

    /// Fresh entropy per run.
    #[arg(long)]
    random: bool,
}

#[derive(Parser)]
struct SnippetArgs {
    #[command(flatten)]
    endpoint: EndpointArgs,

    /// Snippet style.
    #[arg(long, value_enum, default_value = "fetch")]
    framework: Framework,
}

#[derive(Parser)]
struct DepsArgs {
    #[command(flatten)]
    spec: SpecArgs,

    /// Narrow both lists to this resource name (substring match).
    #[arg(long)]
    resource: Option<String>,
}

#[derive(Parser)]
struct SecurityArgs {
    #[command(flatten)]
    spec: SpecArgs,

    /// Scope to this path template (with `--method`).
    #[arg(short, long)]
    path: Option<String>,

    /// Scope to this HTTP method (with `--path`).
    #[arg(short, long)]
    method: Option<String>,
}

#[derive(Parser)]
struct ValidateArgs {
    #[command(flatten)]
    status: StatusArgs,

    /// Path to a JSON file holding the value to check.
    #[arg(short, long)]
    data: PathBuf,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    match Cli::parse() {
        Cli::Endpoints(args) => {
            let doc = args.load()?;
            println!("{}", render_endpoints(&analyzer::endpoints(doc.as_value())));
        }
        Cli::Search(args) => {
            let doc = args.spec.load()?;
            let options = analyzer::SearchOptions {
                synonyms: args.synonyms,
            };
            let hits = analyzer::search_with(doc.as_value(), &args.query, options);
            if hits.is_empty() {
                println!("No endpoints matched your search.");
            } else {
                println!("{}", render_endpoints(&hits));
            }
        }
        Cli::Tags(args) => {
            let doc = args.load()?;
            println!("{}", render_tags(&analyzer::tags(doc.as_value())));
        }
        Cli::ByTag(args) => {
            let doc = args.spec.load()?;
            let hits = analyzer::endpoints_by_tag(doc.as_value(), &args.tag);
            if hits.is_empty() {
                println!("No endpoints found for tag: {}", args.tag);
            } else {
                println!("{}", render_endpoints(&hits));
            }
        }
        Cli::Info(args) => {
            let doc = args.spec.load()?;
            let op = doc.operation(&args.path, &args.method)?;
            println!("{}", serde_json::to_string_pretty(op)?);
        }
        Cli::RequestSchema(args) => {
            let doc = args.spec.load()?;
            let op = doc.operation(&args.path, &args.method)?;
            match document::request_schema(op) {
                Some(schema) => println!("{}", serde_json::to_string_pretty(schema)?),
                None => println!("No JSON request body schema found."),
            }
        }
        Cli::ResponseSchema(args) => {
            let doc = args.endpoint.spec.load()?;
            let op = doc.operation(&args.endpoint.path, &args.endpoint.method)?;
            match document::response_schema(op, &args.status) {
                Some(schema) => println!("{}", serde_json::to_string_pretty(schema)?),
                None => println!("No JSON schema found for status {}.", args.status),
            }
        }
        Cli::Types(args) => {
            let doc = args.spec.load()?;
            let op = doc.operation(&args.path, &args.method)?;
            let mut out = String::new();
            if let Some(schema) = document::request_schema(op) {
                out.push_str(&typescript::declaration(Some(schema), "Request"));
                out.push_str("\n\n");
            }
            if let Some(schema) = document::response_schema(op, "200") {
                out.push_str(&typescript::declaration(Some(schema), "Response"));
            }
            if out.is_empty() {
                println!("No JSON schemas found for this endpoint.");
            } else {
                println!("{out}");
            }
        }
        Cli::Zod(args) => {
            let doc = args.endpoint.spec.load()?;
            let op = doc.operation(&args.endpoint.path, &args.endpoint.method)?;
            let schema = match args.target {
                ZodTarget::Request => document::request_schema(op),
                ZodTarget::Response => document::response_schema(op, &args.status),
            };
            match schema {
                Some(schema) => println!("{}", zod::module(Some(schema))),
                None => {
                    let target = match args.target {
                        ZodTarget::Request => "request",
                        ZodTarget::Response => "response",
                    };
                    println!("No JSON schema found for {target}.");
                }
            }
        }
        Cli::Mock(args) => {
            let doc = args.endpoint.spec.load()?;
            let op = doc.operation(&args.endpoint.path, &args.endpoint.method)?;
            match document::response_schema(op, "200") {
                Some(schema) => {
                    let mut mock = if args.random {
                        Mock::randomized()
                    } else if let Some(seed) = args.seed {
                        Mock::seeded(seed)
                    } else {
                        Mock::deterministic()
                    };
                    let value = mock.generate(Some(schema));
                    println!("{}", serde_json::to_string_pretty(&value)?);
                }
                None => println!("No success response schema found."),
            }
        }
        Cli::Snippet(args) => {
            let doc = args.endpoint.spec.load()?;
            let op = doc.operation(&args.endpoint.path, &args.endpoint.method)?;
            println!(
                "{}",
                snippet::generate(&args.endpoint.path, &args.endpoint.method, op, args.framework)
            );
        }
        Cli::Deps(args) => {
            let doc = args.spec.load()?;
            let map = analyzer::map_dependencies(doc.as_value(), args.resource.as_deref());
            print!("{}", render_deps(&map));
        }
        Cli::Security(args) => {
            let doc = args.spec.load()?;
            let details = analyzer::security_details(
                doc.as_value(),
                args.path.as_deref(),
                args.method.as_deref(),
            );
            println!("{}", serde_json::to_string_pretty(&details)?);
        }
        Cli::Validate(args) => {
            let doc = args.status.endpoint.spec.load()?;
            let op = doc.operation(&args.status.endpoint.path, &args.status.endpoint.method)?;
            let Some(schema) = document::response_schema(op, &args.status.status) else {
                anyhow::bail!(
                    "No response schema found for {} {} ({}).",
                    args.status.endpoint.method.to_uppercase(),
                    args.status.endpoint.path,
                    args.status.status
                );
            };
            let data: Value = serde_json::from_str(
                &fs::read_to_string(&args.data)
                    .with_context(|| format!("Failed to read {}", args.data.display()))?,
            )
            .with_context(|| format!("Failed to parse {} as JSON", args.data.display()))?;

            let report = validate::check(schema, &data)?;
            print!("{}", render_report(&report, schema));
            if !report.compliant {
                std::process::exit(1);
            }
        }
    }
    Ok(())
}

fn render_endpoints(endpoints: &[analyzer::Endpoint]) -> String {
    endpoints
        .iter()
        .map(|e| format!("{} {} - {}", e.method, e.display_path(), e.summary))
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_tags(tags: &[analyzer::Tag]) -> String {
    tags.iter()
        .map(|t| {
            if t.description.is_empty() {
                t.name.clone()
            } else {
                format!("{}: {}", t.name, t.description)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_deps(map: &analyzer::DependencyMap) -> String {
    let mut text = String::from("### Data Providers (Endpoints that return IDs):\n");
    for p in &map.providers {
        text.push_str(&format!("- {} {} (Provides: {})\n", p.method, p.path, p.field));
    }
    text.push_str("\n### Data Consumers (Endpoints that require IDs):\n");
    for c in &map.consumers {
        text.push_str(&format!(
            "- {} {} (Consumes: {} in {})\n",
            c.method, c.path, c.parameter, c.location
        ));
    }
    text
}

fn render_report(report: &validate::ContractReport, schema: &Value) -> String {
    if report.compliant {
        return "Response complies with the contract.\n".to_string();
    }
    let mut text = String::from("Contract violations:\n");
    for v in &report.violations {
        text.push_str(&format!("- {} {} ({})\n", v.location, v.message, v.constraint));
    }
    text.push_str(&format!(
        "\nExpected schema:\n{}\n",
        serde_json::to_string_pretty(schema).unwrap_or_default()
    ));
    text
}

//! End-to-end tests over one realistic document: a photo-album service in
//! the JSONPlaceholder style, exercising the catalog, search, schema
//! extraction, all four generation backends, the dependency correlator, and
//! contract checking together.

use indoc::indoc;
use pretty_assertions::assert_eq;
use serde_json::json;

use openapi_scout::emit::mock::Mock;
use openapi_scout::emit::snippet::{self, Framework};
use openapi_scout::emit::{typescript, zod};
use openapi_scout::{analyzer, document, validate, Document, Error};

fn album_service() -> Document {
    Document::from_json(include_str!("fixtures/album-service.json")).expect("fixture parses")
}

#[test]
fn catalog_follows_document_order() {
    let doc = album_service();
    let listed = analyzer::endpoints(doc.as_value());
    let shown: Vec<String> = listed
        .iter()
        .map(|e| format!("{} {}", e.method, e.display_path()))
        .collect();
    assert_eq!(
        shown,
        vec![
            "GET /api/users",
            "POST /api/users",
            "GET /api/albums",
            "GET /api/albums/{albumId}",
            "DELETE /api/albums/{albumId}",
            "GET /api/photos",
        ]
    );
}

#[test]
fn search_is_conjunctive_over_method_path_and_summary() {
    let doc = album_service();

    let hits = analyzer::search(doc.as_value(), "create user");
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].method, "POST");
    assert_eq!(hits[0].path, "/users");

    let hits = analyzer::search(doc.as_value(), "users");
    assert_eq!(hits.len(), 2);
}

#[test]
fn missing_operation_is_a_descriptive_error() {
    let doc = album_service();
    let err = doc.operation("/users", "put").unwrap_err();
    assert!(matches!(err, Error::EndpointNotFound { .. }));
    assert_eq!(err.to_string(), "endpoint PUT /users not found in the document");
}

#[test]
fn status_200_falls_back_to_201_but_404_does_not() {
    let doc = album_service();
    let op = doc.operation("/users", "post").unwrap();
    // POST /users only declares 201
    assert!(document::response_schema(op, "200").is_some());
    assert!(document::response_schema(op, "404").is_none());
}

#[test]
fn typescript_output_is_balanced_and_marks_optionality() {
    let doc = album_service();
    let op = doc.operation("/albums/{albumId}", "get").unwrap();
    let schema = document::response_schema(op, "200").unwrap();

    let ts = typescript::declaration(Some(schema), "Album");
    assert_eq!(
        ts,
        indoc! {"
            export interface Album {
              albumId: number;
              userId: number;
              title?: string;
              cover?: {
                url?: string;
                caption?: string;
              };
            }"}
    );
    assert_eq!(ts.matches('{').count(), ts.matches('}').count());
}

#[test]
fn zod_enum_short_circuits() {
    let doc = album_service();
    let op = doc.operation("/photos", "get").unwrap();
    let schema = document::response_schema(op, "200").unwrap();

    let module = zod::module(Some(schema));
    assert!(module.starts_with("import { z } from 'zod';"));
    assert!(module.contains("z.enum(['thumbnail', 'full'])"));
    // The enum field never gets the generic string chain
    assert!(!module.contains("size: z.string()"));
}

#[test]
fn mock_round_trips_through_the_contract_checker() {
    let doc = album_service();
    let op = doc.operation("/albums/{albumId}", "get").unwrap();
    let schema = document::response_schema(op, "200").unwrap();

    for seed in [1_u64, 7, 42] {
        let value = Mock::seeded(seed).generate(Some(schema));
        let report = validate::check(schema, &value).expect("schema compiles");
        assert!(
            report.compliant,
            "seed {seed} produced violations: {:?}",
            report.violations
        );
    }

    let value = Mock::deterministic().generate(Some(schema));
    let report = validate::check(schema, &value).unwrap();
    assert!(report.compliant);
}

#[test]
fn dependency_map_links_albums_to_photos() {
    let doc = album_service();
    let map = analyzer::map_dependencies(doc.as_value(), None);

    let provider = map
        .providers
        .iter()
        .find(|p| p.path == "/albums" && p.field == "albumId")
        .expect("GET /albums provides albumId");
    assert_eq!(provider.method, "GET");
    assert_eq!(provider.resource, "album");

    let consumer = map
        .consumers
        .iter()
        .find(|c| c.path == "/photos" && c.parameter == "albumId")
        .expect("GET /photos consumes albumId");
    assert_eq!(consumer.location, "query");
    assert_eq!(consumer.resource, "album");
}

#[test]
fn dependency_filter_narrows_by_derived_resource() {
    let doc = album_service();

    let albums = analyzer::map_dependencies(doc.as_value(), Some("album"));
    assert!(albums.providers.iter().all(|p| p.resource.contains("album")));
    assert!(!albums.providers.is_empty());
    assert!(!albums.consumers.is_empty());

    let users = analyzer::map_dependencies(doc.as_value(), Some("user"));
    assert!(users.providers.iter().all(|p| p.resource == "user"));
    assert!(users.consumers.iter().all(|c| c.resource == "user"));
    assert!(users
        .consumers
        .iter()
        .all(|c| c.path != "/photos" || c.parameter != "albumId"));
}

#[test]
fn snippet_embeds_generated_types() {
    let doc = album_service();
    let op = doc.operation("/users", "post").unwrap();

    let code = snippet::generate("/users", "post", op, Framework::Axios);
    assert!(code.contains("export interface CreateUserRequest {"));
    assert!(code.contains("export interface CreateUserResponse {"));
    assert!(code.contains("export const createUser = async (data: CreateUserRequest)"));

    let hook = snippet::generate(
        "/albums/{albumId}",
        "delete",
        doc.operation("/albums/{albumId}", "delete").unwrap(),
        Framework::TanstackQuery,
    );
    assert!(hook.contains("useMutation"));
    assert!(hook.contains("`/albums/${data.albumId}`"));
}

#[test]
fn tags_and_tag_filtering() {
    let doc = album_service();
    let names: Vec<String> = analyzer::tags(doc.as_value())
        .into_iter()
        .map(|t| t.name)
        .collect();
    assert_eq!(names, vec!["users", "albums", "photos"]);

    let albums = analyzer::endpoints_by_tag(doc.as_value(), "albums");
    assert_eq!(albums.len(), 3);
    assert!(analyzer::endpoints_by_tag(doc.as_value(), "payments").is_empty());
}

#[test]
fn contract_violations_are_reported_not_raised() {
    let doc = album_service();
    let op = doc.operation("/albums/{albumId}", "get").unwrap();
    let schema = document::response_schema(op, "200").unwrap();

    let bad = json!({ "albumId": "not-a-number" });
    let report = validate::check(schema, &bad).expect("check itself succeeds");
    assert!(!report.compliant);
    assert!(report
        .violations
        .iter()
        .any(|v| v.location == "/albumId" && v.constraint.contains("type")));
    // userId is required and missing
    assert!(report.violations.iter().any(|v| v.constraint.contains("required")));
}

#[test]
fn dereference_makes_component_schemas_usable() {
    let mut doc = Document::from_json(
        &json!({
            "components": {
                "schemas": {
                    "User": {
                        "type": "object",
                        "required": ["userId"],
                        "properties": {
                            "userId": { "type": "integer" },
                            "email": { "type": "string", "format": "email" }
                        }
                    }
                }
            },
            "paths": {
                "/me": {
                    "get": {
                        "responses": {
                            "200": {
                                "content": {
                                    "application/json": {
                                        "schema": { "$ref": "#/components/schemas/User" }
                                    }
                                }
                            }
                        }
                    }
                }
            }
        })
        .to_string(),
    )
    .unwrap();
    doc.dereference();

    let op = doc.operation("/me", "get").unwrap();
    let schema = document::response_schema(op, "200").unwrap();
    let ts = typescript::declaration(Some(schema), "Me");
    assert!(ts.contains("userId: number;"));
    assert!(ts.contains("email?: string;"));

    let value = Mock::deterministic().generate(Some(schema));
    assert_eq!(value["email"], "dev.architect@example.com");
}

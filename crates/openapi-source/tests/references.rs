//! Following references across files on disk.

use openapi_source::{ReferenceError, SourceCollection, SourceInput};
use serde_json::json;
use std::fs;

#[test]
fn test_reference_chain_across_files() {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir(dir.path().join("schemas")).unwrap();
    fs::write(
        dir.path().join("openapi.yaml"),
        "openapi: 3.0.0\ncomponents:\n  schemas:\n    Pet:\n      $ref: schemas/pet.yaml#/Pet\n",
    )
    .unwrap();
    fs::write(
        dir.path().join("schemas/pet.yaml"),
        "Pet:\n  type: object\n  properties:\n    owner:\n      $ref: ../people.json#/Person\n",
    )
    .unwrap();
    fs::write(
        dir.path().join("people.json"),
        r#"{ "Person": { "type": "object", "required": ["name"] } }"#,
    )
    .unwrap();

    let sources = SourceCollection::load(SourceInput::file(dir.path().join("openapi.yaml"))).unwrap();
    let root = sources.root_location();
    assert_eq!(root.data().unwrap()["openapi"], json!("3.0.0"));

    let pet = sources
        .resolve_reference("schemas/pet.yaml#/Pet", &root.next_field("components"))
        .unwrap();
    assert_eq!(pet.location.to_string(), "schemas/pet.yaml#/Pet");

    // Relative to the file the reference appears in, not the root
    let owner_ref = pet.location.next_field("properties").next_field("owner");
    let person = sources
        .resolve_reference("../people.json#/Person", &owner_ref)
        .unwrap();
    assert_eq!(person.location.to_string(), "people.json#/Person");
    assert_eq!(person.data["required"], json!(["name"]));
    assert_eq!(sources.len(), 3);
}

#[test]
fn test_reference_to_whole_file() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("openapi.yaml"), "info:\n  $ref: info.yaml\n").unwrap();
    fs::write(dir.path().join("info.yaml"), "title: Pets\nversion: 1.0.0\n").unwrap();

    let sources = SourceCollection::load(SourceInput::file(dir.path().join("openapi.yaml"))).unwrap();
    let info = sources
        .resolve_reference("info.yaml", &sources.root_location().next_field("info"))
        .unwrap();

    assert_eq!(info.data, json!({ "title": "Pets", "version": "1.0.0" }));
    assert_eq!(info.location.to_string(), "info.yaml#/");
}

#[test]
fn test_reference_to_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("openapi.yaml"), "openapi: 3.0.0\n").unwrap();

    let sources = SourceCollection::load(SourceInput::file(dir.path().join("openapi.yaml"))).unwrap();
    let error = sources
        .resolve_reference("missing.yaml#/Pet", &sources.root_location())
        .unwrap_err();

    assert!(matches!(error, ReferenceError::SourceUnavailable { .. }));
    assert_eq!(error.reference(), "missing.yaml#/Pet");
}

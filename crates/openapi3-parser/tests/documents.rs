use openapi3_parser::{Document, SourceInput};
use serde_json::json;
use std::fs;
use std::path::Path;

const PETSTORE: &str = r##"
openapi: "3.0.0"
info:
  version: 1.0.0
  title: Swagger Petstore
  license:
    name: MIT
    url: https://opensource.org/licenses/MIT
servers:
  - url: http://petstore.swagger.io/v1
security:
  - petstore_auth: [read:pets]
tags:
  - name: pets
paths:
  /pets:
    get:
      summary: List all pets
      operationId: listPets
      tags: [pets]
      parameters:
        - name: limit
          in: query
          description: How many items to return at one time (max 100)
          required: false
          schema:
            type: integer
            format: int32
            maximum: 100
      responses:
        200:
          description: A paged array of pets
          headers:
            x-next:
              description: A link to the next page of responses
              schema:
                type: string
          content:
            application/json:
              schema:
                $ref: "#/components/schemas/Pets"
        default:
          $ref: "#/components/responses/Error"
    post:
      summary: Create a pet
      operationId: createPets
      tags: [pets]
      requestBody:
        required: true
        content:
          application/json:
            schema:
              $ref: "#/components/schemas/Pet"
      responses:
        201:
          description: Null response
        default:
          $ref: "#/components/responses/Error"
  /pets/{petId}:
    parameters:
      - name: petId
        in: path
        required: true
        description: The id of the pet to retrieve
        schema:
          type: string
    get:
      summary: Info for a specific pet
      operationId: showPetById
      servers:
        - url: http://pets.example.com
      responses:
        200:
          description: Expected response to a valid request
          content:
            application/json:
              schema:
                $ref: "#/components/schemas/Pet"
        default:
          $ref: "#/components/responses/Error"
components:
  schemas:
    Pet:
      type: object
      required: [id, name]
      properties:
        id:
          type: integer
          format: int64
        name:
          type: string
        tag:
          type: string
    Pets:
      type: array
      items:
        $ref: "#/components/schemas/Pet"
    Error:
      type: object
      required: [code, message]
      properties:
        code:
          type: integer
          format: int32
        message:
          type: string
  responses:
    Error:
      description: unexpected error
      content:
        application/json:
          schema:
            $ref: "#/components/schemas/Error"
  securitySchemes:
    petstore_auth:
      type: oauth2
      flows:
        implicit:
          authorizationUrl: https://petstore.swagger.io/oauth/dialog
          scopes:
            write:pets: modify pets in your account
            read:pets: read your pets
"##;

fn write(dir: &Path, name: &str, contents: &str) {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, contents).unwrap();
}

fn rendered_errors(document: &Document) -> String {
    document
        .errors()
        .iter()
        .map(|error| format!("{}: {} [{}]", error.location, error.message(), error.error_code()))
        .collect::<Vec<_>>()
        .join("\n")
}

#[test]
fn test_petstore() {
    let document = Document::from_str_with_path(PETSTORE, "petstore.yaml").unwrap();
    assert!(document.is_valid(), "{}", rendered_errors(&document));
    assert!(document.warnings().is_empty());

    let root = document.root().unwrap();
    assert_eq!(root.openapi(), "3.0.0");
    let info = root.info().unwrap().unwrap();
    assert_eq!(info.title(), "Swagger Petstore");
    assert_eq!(info.license().unwrap().unwrap().name(), "MIT");

    let paths = root.paths().unwrap().unwrap();
    assert_eq!(paths.keys().collect::<Vec<_>>(), ["/pets", "/pets/{petId}"]);

    let pets = paths.get("/pets").unwrap().unwrap();
    let methods: Vec<&str> = pets.operations().unwrap().into_iter().map(|(m, _)| m).collect();
    assert_eq!(methods, ["get", "post"]);

    let list = pets.get().unwrap().unwrap();
    assert_eq!(list.operation_id(), Some("listPets"));
    let limit = list.parameters().unwrap().unwrap().get(0).unwrap().unwrap();
    assert_eq!(limit.name(), "limit");
    assert_eq!(limit.style(), "form");
    assert!(limit.explode());
    assert_eq!(limit.schema().unwrap().unwrap().maximum(), Some(100.0));

    // Servers come down from the root unless an operation has its own
    let servers = list.servers().unwrap().unwrap().to_vec().unwrap();
    assert_eq!(servers[0].url(), "http://petstore.swagger.io/v1");

    let responses = list.responses().unwrap().unwrap();
    assert_eq!(responses.keys().collect::<Vec<_>>(), ["200", "default"]);
    let ok = responses.get("200").unwrap().unwrap();
    let headers = ok.headers().unwrap().unwrap();
    let next = headers.get("x-next").unwrap().unwrap();
    assert_eq!(next.style(), "simple");
    let schema = ok
        .content()
        .unwrap()
        .unwrap()
        .get("application/json")
        .unwrap()
        .unwrap()
        .schema()
        .unwrap()
        .unwrap();
    assert_eq!(schema.node_context().source_location().to_string(), "#/components/schemas/Pets");
    let pet = schema.items().unwrap().unwrap();
    assert!(pet.requires("name"));
    assert!(!pet.requires("tag"));

    let error = responses.get("default").unwrap().unwrap();
    assert_eq!(error.description(), "unexpected error");

    let by_id = paths.get("/pets/{petId}").unwrap().unwrap();
    let pet_id = by_id.parameters().unwrap().unwrap().get(0).unwrap().unwrap();
    assert_eq!(pet_id.location(), "path");
    assert_eq!(pet_id.style(), "simple");
    assert!(!pet_id.explode());
    let show = by_id.get().unwrap().unwrap();
    let servers = show.servers().unwrap().unwrap().to_vec().unwrap();
    assert_eq!(servers[0].url(), "http://pets.example.com");

    let security = root.security().unwrap().unwrap().to_vec().unwrap();
    let scopes = security[0].get("petstore_auth").unwrap().unwrap().to_vec().unwrap();
    assert_eq!(scopes, ["read:pets"]);

    let schemes = root.components().unwrap().unwrap().security_schemes().unwrap().unwrap();
    let auth = schemes.get("petstore_auth").unwrap().unwrap();
    let flow = auth.flows().unwrap().unwrap().implicit().unwrap().unwrap();
    assert_eq!(
        flow.scopes().unwrap().unwrap().keys().collect::<Vec<_>>(),
        ["write:pets", "read:pets"]
    );
}

#[test]
fn test_rendered_errors() {
    let document = Document::from_value(json!({
        "openapi": "3.0.0",
        "info": {
            "title": "Broken",
            "version": "1",
            "contact": { "email": "not-an-email" }
        },
        "paths": {
            "/pets": {
                "get": { "responses": { "200": {} } },
                "parameters": [{ "name": "id", "in": "path" }]
            }
        },
        "components": {
            "schemas": { "Pet": { "$ref": "#/components/schemas/Missing" } }
        },
        "extra": true
    }))
    .unwrap();

    assert!(!document.is_valid());
    insta::assert_snapshot!(rendered_errors(&document), @r###"
    #/info/contact/email: "not-an-email" is not a valid email address [OAS-1-13]
    #/paths/~1pets/get/responses/200: Missing required field: description [OAS-1-11]
    #/paths/~1pets/parameters/0/required: Must be included and true for a path parameter [OAS-1-13]
    #/components/schemas/Pet/$ref: #/components/schemas/Missing was not found [OAS-1-15]
    #/: Unexpected field: extra [OAS-1-12]
    "###);
}

#[test]
fn test_references_across_files() {
    let dir = tempfile::tempdir().unwrap();
    write(
        dir.path(),
        "openapi.yaml",
        "openapi: 3.0.0\ninfo:\n  title: Split\n  version: '1'\npaths:\n  /pets:\n    $ref: paths/pets.yaml\n",
    );
    write(
        dir.path(),
        "paths/pets.yaml",
        r#"
get:
  responses:
    '200':
      description: ok
      content:
        application/json:
          schema:
            $ref: '../schemas/pet.yaml#/Pet'
"#,
    );
    write(
        dir.path(),
        "schemas/pet.yaml",
        r#"
Pet:
  type: object
  properties:
    tag:
      $ref: '#/Tag'
    owners:
      type: array
      items:
        type: string
Tag:
  type: string
"#,
    );

    let document = Document::load(SourceInput::file(dir.path().join("openapi.yaml"))).unwrap();
    assert!(document.is_valid(), "{}", rendered_errors(&document));

    let root = document.root().unwrap();
    let pets = root.paths().unwrap().unwrap().get("/pets").unwrap().unwrap();
    assert_eq!(pets.node_context().source_location().to_string(), "paths/pets.yaml#/");
    assert_eq!(pets.node_context().document_location().to_string(), "#/paths/~1pets");

    let tag = document
        .node_at("#/paths/~1pets/get/responses/200/content/application~1json/schema/properties/tag")
        .unwrap()
        .unwrap();
    let tag = tag.as_object().unwrap();
    assert_eq!(tag.string("type"), Some("string"));
    assert_eq!(tag.node_context().source_location().to_string(), "schemas/pet.yaml#/Tag");
    assert_eq!(document.sources().len(), 3);
}

#[test]
fn test_errors_in_referenced_files() {
    let dir = tempfile::tempdir().unwrap();
    write(
        dir.path(),
        "openapi.yaml",
        r#"
openapi: 3.0.0
info:
  title: Split
  version: '1'
paths: {}
components:
  schemas:
    Pet:
      $ref: 'schemas/pet.yaml#/Pet'
    Owner:
      $ref: 'schemas/pet.yaml#/Pet/properties/owners'
    Lost:
      $ref: 'missing.yaml#/Lost'
"#,
    );
    write(
        dir.path(),
        "schemas/pet.yaml",
        "Pet:\n  type: object\n  properties:\n    owners:\n      type: array\n",
    );

    let document = Document::load(SourceInput::file(dir.path().join("openapi.yaml"))).unwrap();
    let errors: Vec<String> = document.errors().iter().map(|e| e.to_string()).collect();
    assert_eq!(errors.len(), 2, "{:?}", errors);

    // Reached twice, reported once
    assert_eq!(
        errors[0],
        "schemas/pet.yaml#/Pet/properties/owners: items must be defined for a type of array"
    );
    assert!(
        errors[1].starts_with("#/components/schemas/Lost/$ref: missing.yaml#/Lost could not be resolved"),
        "{}",
        errors[1]
    );
}

#[test]
fn test_unreadable_root() {
    let dir = tempfile::tempdir().unwrap();
    let result = Document::load(SourceInput::file(dir.path().join("nothing-here.yaml")));
    assert!(matches!(result, Err(openapi3_parser::Error::Source(_))));
}

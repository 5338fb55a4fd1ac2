//! Integration tests for the clone engine.
//!
//! Source and target share one scripted transport. The engine only reads
//! from the source and only writes to the target, so GET routes script the
//! source and POST/PATCH/DELETE routes script the target. The tokio clock is
//! paused: pacing and cooldowns elapse instantly but stay measurable.

use std::sync::Arc;
use std::time::Duration;

use appwrite_client::{ApiError, ErrorBody, Method, MockTransport, Pacing, RecordedCall};
use appwrite_clone::{
    CloneEngine, Config, ConflictPolicy, Dependencies, RunLog, RUN_END_MARKER, RUN_START_MARKER,
};
use appwrite_types::{Collection, Endpoint, Team, User};
use serde_json::{json, Value};

const TARGET_PROJECT: &str = "dst";

fn engine(mock: &Arc<MockTransport>, override_existing: bool) -> CloneEngine {
    let config = Config {
        source: Endpoint::new("https://source.example.io", "src", "src-key"),
        target: Endpoint::new("https://target.example.io", TARGET_PROJECT, "dst-key"),
        policy: ConflictPolicy::new(override_existing),
        pacing: Pacing::default(),
        http_timeout: Duration::from_secs(30),
        selectors: Vec::new(),
    };
    Dependencies::with_transport(&config, mock.clone()).engine
}

fn target_calls(mock: &MockTransport) -> Vec<RecordedCall> {
    mock.calls()
        .into_iter()
        .filter(|c| c.project_id == TARGET_PROJECT)
        .collect()
}

fn target_log(mock: &MockTransport) -> Vec<String> {
    target_calls(mock)
        .iter()
        .map(|c| format!("{} {}", c.method, c.path))
        .collect()
}

fn collection_gets(mock: &MockTransport) -> usize {
    mock.call_log()
        .iter()
        .filter(|c| *c == "GET /v1/databases/db1/collections")
        .count()
}

fn posts_collection() -> Vec<Collection> {
    vec![serde_json::from_value(json!({"$id": "c1", "name": "Posts"})).unwrap()]
}

fn conflict(error_type: &str) -> ApiError {
    ApiError::status(409, ErrorBody::new(409, error_type, "already exists"))
}

/// Source with one database `db1` holding `c1` (Posts) and `c2` (Authors)
/// joined by a two-way relationship, no users and no teams.
fn script_source(mock: &MockTransport) {
    mock.respond_ok(
        Method::Get,
        "/v1/databases",
        json!({"total": 1, "databases": [{"$id": "db1", "name": "Main"}]}),
    );
    mock.respond_ok(
        Method::Get,
        "/v1/databases/db1/collections",
        json!({"total": 2, "collections": [
            {"$id": "c1", "name": "Posts", "$databaseId": "db1",
             "$permissions": ["read(\"any\")"], "documentSecurity": false},
            {"$id": "c2", "name": "Authors", "$databaseId": "db1"}
        ]}),
    );
    mock.respond_ok(Method::Get, "/v1/users", json!({"total": 0, "users": []}));
    mock.respond_ok(Method::Get, "/v1/teams", json!({"total": 0, "teams": []}));
    mock.respond_ok(
        Method::Get,
        "/v1/databases/db1/collections/c1/attributes",
        json!({"total": 2, "attributes": [
            {"key": "title", "type": "string", "status": "available", "required": true,
             "size": 255},
            {"key": "author", "type": "relationship", "status": "available", "required": false,
             "relatedCollection": "c2", "relationType": "manyToOne", "twoWay": false,
             "twoWayKey": "posts", "onDelete": "setNull", "side": "parent"}
        ]}),
    );
    mock.respond_ok(
        Method::Get,
        "/v1/databases/db1/collections/c1/documents",
        json!({"total": 1, "documents": [{
            "$id": "p1",
            "$databaseId": "db1",
            "$collectionId": "c1",
            "$permissions": [],
            "$createdAt": "2024-01-01T00:00:00.000+00:00",
            "$updatedAt": "2024-01-01T00:00:00.000+00:00",
            "title": "Hello",
            "author": {
                "$id": "a1",
                "$databaseId": "db1",
                "$collectionId": "c2",
                "$permissions": [],
                "$createdAt": "2024-01-01T00:00:00.000+00:00",
                "$updatedAt": "2024-01-01T00:00:00.000+00:00",
                "name": "Ada"
            }
        }]}),
    );
    mock.respond_ok(
        Method::Get,
        "/v1/databases/db1/collections/c2/attributes",
        json!({"total": 2, "attributes": [
            {"key": "name", "type": "string", "status": "available", "required": true, "size": 64},
            {"key": "posts", "type": "relationship", "status": "available", "required": false,
             "relatedCollection": "c1", "relationType": "oneToMany", "twoWay": true,
             "twoWayKey": "author", "onDelete": "setNull", "side": "child"}
        ]}),
    );
    mock.respond_ok(
        Method::Get,
        "/v1/databases/db1/collections/c2/documents",
        json!({"total": 0, "documents": []}),
    );
}

/// Target accepting every database, collection and attribute write.
fn script_target_schema(mock: &MockTransport) {
    mock.respond_ok(Method::Post, "/v1/databases", json!({"$id": "db1"}));
    mock.respond_ok(Method::Post, "/v1/databases/db1/collections", json!({"$id": "c"}));
    for path in [
        "/v1/databases/db1/collections/c1/attributes/string",
        "/v1/databases/db1/collections/c1/attributes/relationship",
        "/v1/databases/db1/collections/c2/attributes/string",
        "/v1/databases/db1/collections/c2/attributes/relationship",
    ] {
        mock.respond_ok(Method::Post, path, json!({"status": "processing"}));
    }
}

#[tokio::test(start_paused = true)]
async fn catalog_lists_databases_then_users_and_teams() {
    let mock = Arc::new(MockTransport::new());
    script_source(&mock);

    let mut log = RunLog::new();
    let catalog = engine(&mock, false).fetch_catalog(&mut log).await.unwrap();

    let ids: Vec<&str> = catalog.tree.nodes().iter().map(|n| n.id.as_str()).collect();
    assert_eq!(ids, vec!["db1", "_users_", "_teams_"]);
    assert_eq!(catalog.tree.nodes()[0].children.as_ref().unwrap().len(), 2);
    assert_eq!(catalog.tree.nodes()[1].name, "Users (0 items)");
    assert!(catalog.tree.checked_roots().next().is_none());
    assert_eq!(
        log.lines(),
        [
            "Fetching source databases...".to_string(),
            "Found 3 databases, 0 users and 0 teams".to_string(),
        ]
    );
    assert!(target_calls(&mock).is_empty());
}

#[tokio::test(start_paused = true)]
async fn catalog_summary_counts_fetched_entities() {
    let mock = Arc::new(MockTransport::new());
    mock.respond_ok(Method::Get, "/v1/databases", json!({"total": 0, "databases": []}));
    mock.respond_ok(
        Method::Get,
        "/v1/users",
        json!({"total": 5, "users": [{"$id": "u1", "email": "ada@example.com"}]}),
    );
    mock.respond_ok(Method::Get, "/v1/teams", json!({"total": 2, "teams": []}));

    let mut log = RunLog::new();
    let catalog = engine(&mock, false).fetch_catalog(&mut log).await.unwrap();

    assert_eq!(catalog.tree.nodes()[0].name, "Users (5 items)");
    assert_eq!(catalog.users.len(), 1);
    assert!(log.contains("Found 2 databases, 1 users and 0 teams"));
}

#[tokio::test(start_paused = true)]
async fn catalog_failure_is_returned() {
    let mock = Arc::new(MockTransport::new());
    mock.respond_err(
        Method::Get,
        "/v1/databases",
        ApiError::status(401, ErrorBody::new(401, "general_unauthorized_scope", "missing scope")),
    );

    let mut log = RunLog::new();
    let err = engine(&mock, false).fetch_catalog(&mut log).await.unwrap_err();

    assert!(err.is_unauthorized());
    assert_eq!(mock.call_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn nothing_checked_means_no_calls() {
    let mock = Arc::new(MockTransport::new());
    script_source(&mock);
    let engine = engine(&mock, true);

    let mut fetch_log = RunLog::new();
    let catalog = engine.fetch_catalog(&mut fetch_log).await.unwrap();
    let calls_before = mock.call_count();

    let mut log = RunLog::new();
    engine.run(&catalog, &mut log).await;

    assert_eq!(mock.call_count(), calls_before);
    assert_eq!(
        log.lines(),
        [RUN_START_MARKER.to_string(), RUN_END_MARKER.to_string()]
    );
}

#[tokio::test(start_paused = true)]
async fn relationship_database_clones_in_stage_order() {
    let mock = Arc::new(MockTransport::new());
    script_source(&mock);
    script_target_schema(&mock);
    mock.respond_err(
        Method::Post,
        "/v1/databases/db1/collections/c1/documents",
        ApiError::status(401, ErrorBody::new(401, "user_unauthorized", "not authorized")),
    );
    mock.respond_ok(
        Method::Post,
        "/v1/databases/db1/collections/c1/documents",
        json!({"$id": "p1"}),
    );
    let engine = engine(&mock, false);

    let mut log = RunLog::new();
    let mut catalog = engine.fetch_catalog(&mut log).await.unwrap();
    assert!(catalog.tree.apply_selectors(["db1/c1"]).is_empty());
    engine.run(&catalog, &mut log).await;

    assert_eq!(
        target_log(&mock),
        vec![
            "POST /v1/databases",
            "POST /v1/databases/db1/collections",
            "POST /v1/databases/db1/collections/c1/attributes/string",
            "POST /v1/databases/db1/collections/c1/attributes/relationship",
            "POST /v1/databases/db1/collections/c1/documents",
            "POST /v1/databases/db1/collections/c1/documents",
        ]
    );

    let calls = target_calls(&mock);
    assert_eq!(
        calls[1].body,
        Some(json!({
            "collectionId": "c1",
            "name": "Posts",
            "permissions": ["read(\"any\")"],
            "documentSecurity": false
        }))
    );
    assert_eq!(
        calls[3].body,
        Some(json!({
            "key": "author",
            "required": false,
            "relatedCollectionId": "c2",
            "type": "manyToOne",
            "twoWay": false,
            "twoWayKey": "posts",
            "onDelete": "setNull"
        }))
    );
    assert_eq!(
        calls[4].body.as_ref().unwrap()["data"],
        json!({"title": "Hello", "author": {"name": "Ada"}})
    );
    assert_eq!(
        calls[5].body,
        Some(json!({
            "databaseId": "db1",
            "collectionId": "c1",
            "documentId": "p1",
            "data": {"title": "Hello", "author": "a1"},
            "permissions": []
        }))
    );

    let run: Vec<&str> = log
        .lines()
        .iter()
        .skip_while(|l| *l != RUN_START_MARKER)
        .map(String::as_str)
        .collect();
    assert_eq!(
        run,
        vec![
            RUN_START_MARKER,
            "Clone Main...",
            "Created database Main",
            "Cloning database Main's collections",
            "Created collection Posts",
            "Document p1 created with flattened relationships",
            "Finished cloning collection Posts (1 documents)",
            "Finished cloning database Main",
            RUN_END_MARKER,
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn every_collection_exists_before_any_attribute() {
    let mock = Arc::new(MockTransport::new());
    script_source(&mock);
    script_target_schema(&mock);
    mock.respond_ok(
        Method::Post,
        "/v1/databases/db1/collections/c1/documents",
        json!({"$id": "p1"}),
    );
    let engine = engine(&mock, false);

    let mut log = RunLog::new();
    let mut catalog = engine.fetch_catalog(&mut log).await.unwrap();
    catalog.tree.toggle("db1", true);
    engine.run(&catalog, &mut log).await;

    let writes = target_log(&mock);
    let child_side = "POST /v1/databases/db1/collections/c2/attributes/relationship";
    assert!(writes.iter().all(|c| c != child_side));
    let last_collection = writes
        .iter()
        .rposition(|c| c == "POST /v1/databases/db1/collections")
        .unwrap();
    let first_attribute = writes.iter().position(|c| c.contains("/attributes/")).unwrap();
    let last_attribute = writes.iter().rposition(|c| c.contains("/attributes/")).unwrap();
    let first_document = writes.iter().position(|c| c.ends_with("/documents")).unwrap();

    assert_eq!(writes.iter().filter(|c| c.ends_with("/collections")).count(), 2);
    assert!(last_collection < first_attribute);
    assert!(last_attribute < first_document);
    assert!(log.contains("Finished cloning collection Authors (0 documents)"));
}

#[tokio::test(start_paused = true)]
async fn run_uses_collections_from_the_catalog() {
    let mock = Arc::new(MockTransport::new());
    script_source(&mock);
    script_target_schema(&mock);
    mock.respond_ok(
        Method::Post,
        "/v1/databases/db1/collections/c1/documents",
        json!({"$id": "p1"}),
    );
    let engine = engine(&mock, false);

    let mut log = RunLog::new();
    let mut catalog = engine.fetch_catalog(&mut log).await.unwrap();
    assert_eq!(collection_gets(&mock), 1);
    catalog.tree.toggle("db1", true);
    engine.run(&catalog, &mut log).await;

    assert_eq!(collection_gets(&mock), 1);
    assert!(log.contains("Created collection Authors"));
}

#[tokio::test(start_paused = true)]
async fn child_side_is_created_when_its_parent_is_not_cloned() {
    let mock = Arc::new(MockTransport::new());
    script_source(&mock);
    script_target_schema(&mock);
    let engine = engine(&mock, false);

    let mut log = RunLog::new();
    let mut catalog = engine.fetch_catalog(&mut log).await.unwrap();
    assert!(catalog.tree.apply_selectors(["db1/c2"]).is_empty());
    engine.run(&catalog, &mut log).await;

    assert_eq!(
        target_log(&mock),
        vec![
            "POST /v1/databases",
            "POST /v1/databases/db1/collections",
            "POST /v1/databases/db1/collections/c2/attributes/string",
            "POST /v1/databases/db1/collections/c2/attributes/relationship",
        ]
    );
    let body = target_calls(&mock)[3].body.clone().unwrap();
    assert_eq!(body["key"], "posts");
    assert_eq!(body["relatedCollectionId"], "c1");
    assert_eq!(body["type"], "oneToMany");
    assert!(log.contains("Finished cloning collection Authors (0 documents)"));
}

#[tokio::test(start_paused = true)]
async fn user_override_deletes_waits_and_recreates() {
    let mock = Arc::new(MockTransport::new());
    mock.respond_err(Method::Post, "/v1/users/argon2", conflict("user_already_exists"));
    mock.respond_ok(Method::Post, "/v1/users/argon2", json!({"$id": "u1"}));
    mock.respond_ok(Method::Delete, "/v1/users/u1", Value::Null);

    let user: User = serde_json::from_value(json!({
        "$id": "u1",
        "email": "ada@example.com",
        "name": "Ada",
        "password": "$argon2id$v=19$m=2048,t=3,p=3$abc",
        "hash": "argon2"
    }))
    .unwrap();

    let mut log = RunLog::new();
    engine(&mock, true).clone_users(&[user], &mut log).await;

    let calls = target_calls(&mock);
    assert_eq!(
        target_log(&mock),
        vec![
            "POST /v1/users/argon2",
            "DELETE /v1/users/u1",
            "POST /v1/users/argon2",
        ]
    );
    assert!(calls[2].at - calls[1].at >= Duration::from_secs(2));
    assert_eq!(
        log.lines(),
        [
            "Cloning users...".to_string(),
            "Cloned user ada@example.com".to_string(),
            "Finished cloning users".to_string(),
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn existing_team_without_override_is_left_alone() {
    let mock = Arc::new(MockTransport::new());
    mock.respond_err(
        Method::Post,
        "/v1/teams",
        ApiError::status(500, ErrorBody::new(500, "general_unknown", "Server Error")),
    );
    mock.respond_ok(
        Method::Post,
        "/v1/teams/t1/memberships",
        json!({"$id": "m9", "userEmail": "ada@example.com"}),
    );
    let team: Team = serde_json::from_value(json!({
        "$id": "t1",
        "name": "Core",
        "memberships": [
            {"$id": "m1", "userEmail": "ada@example.com", "roles": ["owner"]}
        ]
    }))
    .unwrap();

    let mut log = RunLog::new();
    engine(&mock, false).clone_teams(&[team], &mut log).await;

    assert!(target_calls(&mock).iter().all(|c| c.method != Method::Delete));
    assert_eq!(
        log.lines(),
        [
            "Cloning teams...".to_string(),
            "Team Core existed".to_string(),
            "Cloning team memberships...".to_string(),
            "Cloned team membership ada@example.com".to_string(),
            "Finished cloning team memberships".to_string(),
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn failed_document_does_not_stop_the_batch() {
    let mock = Arc::new(MockTransport::new());
    mock.respond_ok(
        Method::Get,
        "/v1/databases/db1/collections/c1/attributes",
        json!({"total": 0, "attributes": []}),
    );
    mock.respond_ok(
        Method::Get,
        "/v1/databases/db1/collections/c1/documents",
        json!({"total": 3, "documents": [
            {"$id": "d1", "$databaseId": "db1", "$collectionId": "c1", "title": 1},
            {"$id": "d2", "$databaseId": "db1", "$collectionId": "c1", "title": "ok"},
            {"$id": "d3", "$databaseId": "db1", "$collectionId": "c1", "title": "again"}
        ]}),
    );
    mock.respond_err(
        Method::Post,
        "/v1/databases",
        conflict("database_already_exists"),
    );
    mock.respond_ok(Method::Post, "/v1/databases/db1/collections", json!({"$id": "c1"}));

    let documents = "/v1/databases/db1/collections/c1/documents";
    mock.respond_err(
        Method::Post,
        documents,
        ApiError::status(
            400,
            ErrorBody::new(400, "document_invalid_structure", "Invalid document structure"),
        ),
    );
    mock.respond_ok(Method::Post, documents, json!({"$id": "d2"}));
    mock.respond_err(Method::Post, documents, conflict("document_already_exists"));
    mock.respond_ok(Method::Patch, &format!("{}/d3", documents), json!({"$id": "d3"}));

    let node = appwrite_types::SelectionNode {
        id: "db1".to_string(),
        name: "Main".to_string(),
        checked: true,
        children: Some(vec![appwrite_types::SelectionNode {
            id: "c1".to_string(),
            name: "Posts".to_string(),
            checked: true,
            children: None,
        }]),
    };

    let mut log = RunLog::new();
    engine(&mock, true).clone_database(&node, &posts_collection(), &mut log).await;

    assert_eq!(
        log.lines(),
        [
            "Clone Main...".to_string(),
            "Database Main existed".to_string(),
            "Cloning database Main's collections".to_string(),
            "Created collection Posts".to_string(),
            "Document d1 - Invalid document structure".to_string(),
            "Document d3 updated".to_string(),
            "Finished cloning collection Posts (3 documents)".to_string(),
            "Finished cloning database Main".to_string(),
        ]
    );
    assert!(target_calls(&mock).iter().all(|c| c.method != Method::Delete));
}

#[tokio::test(start_paused = true)]
async fn unreadable_documents_skip_only_that_stage() {
    let mock = Arc::new(MockTransport::new());
    mock.respond_ok(
        Method::Get,
        "/v1/databases/db1/collections/c1/attributes",
        json!({"total": 0, "attributes": []}),
    );
    mock.respond_ok(Method::Post, "/v1/databases", json!({"$id": "db1"}));
    mock.respond_ok(Method::Post, "/v1/databases/db1/collections", json!({"$id": "c1"}));

    let mut node = appwrite_types::SelectionNode::with_children(
        "db1",
        "Main",
        vec![appwrite_types::SelectionNode::leaf("c1", "Posts")],
    );
    node.checked = true;
    if let Some(children) = node.children.as_mut() {
        children[0].checked = true;
    }

    let mut log = RunLog::new();
    engine(&mock, false).clone_database(&node, &posts_collection(), &mut log).await;

    let expected = "Could not read documents of Posts - \
        route not mocked: GET /v1/databases/db1/collections/c1/documents";
    assert!(log.contains(expected));
    assert_eq!(collection_gets(&mock), 0);
    assert_eq!(
        log.lines().last().map(String::as_str),
        Some("Finished cloning database Main")
    );
}

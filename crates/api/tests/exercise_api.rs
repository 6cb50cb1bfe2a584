//! HTTP-level tests for `/api/v1/exercises` and their nested muscle
//! activations.

mod common;

use axum::http::StatusCode;
use common::{
    body_json, create_ok, delete_auth, get, patch_json_auth, post_json_auth, put_json_auth,
    register_and_login,
};
use serde_json::json;
use sqlx::PgPool;

async fn seed_groups(app: &axum::Router, token: &str) -> (i64, i64) {
    let chest = create_ok(app, "/api/v1/muscle-groups", json!({ "name": "Chest" }), token).await;
    let triceps = create_ok(app, "/api/v1/muscle-groups", json!({ "name": "Triceps" }), token).await;
    (chest, triceps)
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn create_then_get_returns_expanded_activations(pool: PgPool) {
    let app = common::build_test_app(pool);
    let token = register_and_login(&app, "ada").await;
    let (chest, triceps) = seed_groups(&app, &token).await;

    let id = create_ok(
        &app,
        "/api/v1/exercises",
        json!({
            "name": "Bench Press",
            "description": "Flat barbell",
            "muscle_activations": [
                { "muscle_group_id": chest, "activation_level": "H" },
                { "muscle_group_id": triceps },
            ],
        }),
        &token,
    )
    .await;

    let response = get(app, &format!("/api/v1/exercises/{id}")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["name"], "Bench Press");
    assert_eq!(json["description"], "Flat barbell");

    let activations = json["muscle_activations"].as_array().unwrap();
    assert_eq!(activations.len(), 2);
    let by_group = |group: i64| {
        activations
            .iter()
            .find(|a| a["muscle_group"]["id"] == group)
            .unwrap()
    };
    assert_eq!(by_group(chest)["activation_level"], "H");
    assert_eq!(by_group(chest)["activation_level_display"], "High");
    assert_eq!(by_group(chest)["muscle_group"]["name"], "Chest");
    assert_eq!(by_group(triceps)["activation_level"], "M");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn duplicate_muscle_group_is_rejected_and_nothing_persisted(pool: PgPool) {
    let app = common::build_test_app(pool);
    let token = register_and_login(&app, "ada").await;
    let (chest, _) = seed_groups(&app, &token).await;

    let response = post_json_auth(
        app.clone(),
        "/api/v1/exercises",
        json!({
            "name": "Push-up",
            "muscle_activations": [
                { "muscle_group_id": chest, "activation_level": "H" },
                { "muscle_group_id": chest, "activation_level": "L" },
            ],
        }),
        &token,
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert!(json["fields"]["muscle_activations[1].muscle_group_id"].is_array());

    let list = body_json(get(app, "/api/v1/exercises").await).await;
    assert!(list.as_array().unwrap().iter().all(|e| e["name"] != "Push-up"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn unknown_level_and_missing_group_are_field_errors(pool: PgPool) {
    let app = common::build_test_app(pool);
    let token = register_and_login(&app, "ada").await;

    let response = post_json_auth(
        app.clone(),
        "/api/v1/exercises",
        json!({
            "name": "Dip",
            "muscle_activations": [{ "muscle_group_id": 1, "activation_level": "X" }],
        }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(
        json["fields"]["muscle_activations[0].activation_level"][0],
        "\"X\" is not a valid choice."
    );

    let response = post_json_auth(
        app,
        "/api/v1/exercises",
        json!({
            "name": "Dip",
            "muscle_activations": [{ "muscle_group_id": 987654 }],
        }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(
        json["fields"]["muscle_activations[0].muscle_group_id"][0],
        "Invalid pk \"987654\" - object does not exist."
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn put_replaces_activations_and_patch_keeps_them(pool: PgPool) {
    let app = common::build_test_app(pool);
    let token = register_and_login(&app, "ada").await;
    let (chest, triceps) = seed_groups(&app, &token).await;
    let id = create_ok(
        &app,
        "/api/v1/exercises",
        json!({
            "name": "Dip",
            "muscle_activations": [{ "muscle_group_id": chest }],
        }),
        &token,
    )
    .await;
    let uri = format!("/api/v1/exercises/{id}");

    let response = put_json_auth(
        app.clone(),
        &uri,
        json!({
            "name": "Dip",
            "muscle_activations": [{ "muscle_group_id": triceps, "activation_level": "H" }],
        }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let activations = json["muscle_activations"].as_array().unwrap();
    assert_eq!(activations.len(), 1);
    assert_eq!(activations[0]["muscle_group"]["id"], triceps);

    let response = patch_json_auth(
        app.clone(),
        &uri,
        json!({ "description": "Parallel bars" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["description"], "Parallel bars");
    assert_eq!(json["muscle_activations"].as_array().unwrap().len(), 1);

    let response = patch_json_auth(app, &uri, json!({ "description": null }), &token).await;
    assert!(body_json(response).await["description"].is_null());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn deleting_a_muscle_group_drops_its_activations(pool: PgPool) {
    let app = common::build_test_app(pool);
    let token = register_and_login(&app, "ada").await;
    let (chest, triceps) = seed_groups(&app, &token).await;
    let id = create_ok(
        &app,
        "/api/v1/exercises",
        json!({
            "name": "Bench Press",
            "muscle_activations": [
                { "muscle_group_id": chest },
                { "muscle_group_id": triceps },
            ],
        }),
        &token,
    )
    .await;

    let response =
        delete_auth(app.clone(), &format!("/api/v1/muscle-groups/{chest}"), &token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let json = body_json(get(app, &format!("/api/v1/exercises/{id}")).await).await;
    let activations = json["muscle_activations"].as_array().unwrap();
    assert_eq!(activations.len(), 1);
    assert_eq!(activations[0]["muscle_group"]["id"], triceps);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn writes_require_auth_but_reads_do_not(pool: PgPool) {
    let app = common::build_test_app(pool);

    let response = post_json_auth(
        app.clone(),
        "/api/v1/exercises",
        json!({ "name": "Squat" }),
        "not-a-token",
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = get(app, "/api/v1/exercises/").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!([]));
}

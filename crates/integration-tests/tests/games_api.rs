//! End-to-end tests for the games REST API.

use reqwest::StatusCode;
use serde_json::{Value, json};

use retro_games_api::services::import_csv;
use retro_games_integration_tests::TestContext;

fn game(title: &str, release_year: i32) -> Value {
    json!({
        "title": title,
        "release_year": release_year,
        "platform": "SNES",
        "date_acquired": "2024-01-15",
        "condition": "vgc"
    })
}

#[tokio::test]
async fn test_health_endpoints() {
    let ctx = TestContext::start().await.expect("Failed to start server");

    let resp = ctx.client.get(ctx.url("/health")).send().await.expect("request");
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.text().await.expect("body"), "ok");

    let resp = ctx
        .client
        .get(ctx.url("/health/ready"))
        .send()
        .await
        .expect("request");
    assert_eq!(resp.status(), StatusCode::OK);

    let root: Value = ctx
        .client
        .get(ctx.url("/"))
        .send()
        .await
        .expect("request")
        .json()
        .await
        .expect("json");
    assert_eq!(root["message"], "Retro Games API");
}

#[tokio::test]
async fn test_game_crud_round_trip() {
    let ctx = TestContext::start().await.expect("Failed to start server");

    let resp = ctx
        .client
        .post(ctx.url("/games"))
        .json(&game("Super Mario World", 1990))
        .send()
        .await
        .expect("create");
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created: Value = resp.json().await.expect("json");
    let id = created["id"].as_i64().expect("id");

    let mut changed = game("Super Mario World", 1990);
    changed["condition"] = json!("used");
    let resp = ctx
        .client
        .put(ctx.url(&format!("/games/{id}")))
        .json(&changed)
        .send()
        .await
        .expect("update");
    assert_eq!(resp.status(), StatusCode::OK);
    let updated: Value = resp.json().await.expect("json");
    assert_eq!(updated["condition"], "used");
    assert_eq!(updated["id"], id);

    let resp = ctx
        .client
        .delete(ctx.url(&format!("/games/{id}")))
        .send()
        .await
        .expect("delete");
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let resp = ctx
        .client
        .get(ctx.url(&format!("/games/{id}")))
        .send()
        .await
        .expect("get");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = resp.json().await.expect("json");
    assert_eq!(body["detail"], format!("Game with ID {id} not found"));
}

#[tokio::test]
async fn test_validation_errors_are_422() {
    let ctx = TestContext::start().await.expect("Failed to start server");

    let mut blank = game("", 1990);
    blank["title"] = json!("   ");
    for body in [blank, game("Pong", 1969), game(&"x".repeat(501), 1990)] {
        let resp = ctx
            .client
            .post(ctx.url("/games"))
            .json(&body)
            .send()
            .await
            .expect("create");
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    let resp = ctx
        .client
        .get(ctx.url("/games?page_size=500"))
        .send()
        .await
        .expect("list");
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_imported_games_are_served_paginated() {
    let ctx = TestContext::start().await.expect("Failed to start server");

    let mut csv = String::from("title,release_year,platform,date_acquired,condition\n");
    for year in 1980..2010 {
        csv.push_str(&format!("Game {year},{year},NES,2020-01-01,gc\n"));
    }
    let csv_path = ctx.database_path.with_file_name("import.csv");
    std::fs::write(&csv_path, csv).expect("write csv");

    let summary = import_csv(&ctx.pool, &csv_path).await.expect("import");
    assert_eq!(summary.imported, 30);

    let page: Value = ctx
        .client
        .get(ctx.url("/games?page=2"))
        .send()
        .await
        .expect("list")
        .json()
        .await
        .expect("json");

    assert_eq!(page["total"], 30);
    assert_eq!(page["page_size"], 25);
    assert_eq!(page["total_pages"], 2);
    let games = page["games"].as_array().expect("games");
    assert_eq!(games.len(), 5);
    // Newest release year first, so page 2 holds the oldest five.
    assert_eq!(games[0]["release_year"], 1984);
    assert_eq!(games[4]["release_year"], 1980);
}

//! Game catalog JSON endpoints.

use axum::{
    Json, Router,
    extract::{Path, Query, State, rejection::QueryRejection},
    http::StatusCode,
    routing::get,
};
use serde::Deserialize;

use retro_games_core::{GameId, NewGame};

use crate::db::GameRepository;
use crate::error::{AppError, Result};
use crate::models::game::{Game, GamePage};
use crate::state::AppState;

/// Page size when the client does not ask for one.
pub const DEFAULT_PAGE_SIZE: i64 = 25;
/// Largest page size a client may request.
pub const MAX_PAGE_SIZE: i64 = 100;

/// Create the games router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/games", get(list_games).post(create_game))
        .route(
            "/games/{id}",
            get(get_game).put(update_game).delete(delete_game),
        )
}

/// Paging query parameters.
#[derive(Debug, Deserialize)]
pub struct PageParams {
    page: Option<i64>,
    page_size: Option<i64>,
}

impl PageParams {
    /// Resolve defaults and enforce bounds.
    fn resolve(&self) -> Result<(i64, i64)> {
        let page = self.page.unwrap_or(1);
        let page_size = self.page_size.unwrap_or(DEFAULT_PAGE_SIZE);

        if page < 1 {
            return Err(AppError::Validation("page must be at least 1".to_owned()));
        }
        if !(1..=MAX_PAGE_SIZE).contains(&page_size) {
            return Err(AppError::Validation(format!(
                "page_size must be between 1 and {MAX_PAGE_SIZE}"
            )));
        }
        Ok((page, page_size))
    }
}

fn not_found(id: GameId) -> AppError {
    AppError::NotFound(format!("Game with ID {id} not found"))
}

/// `POST /games`
async fn create_game(
    State(state): State<AppState>,
    Json(game): Json<NewGame>,
) -> Result<(StatusCode, Json<Game>)> {
    game.validate()?;

    let created = GameRepository::new(state.pool()).create(&game).await?;
    tracing::info!(game_id = %created.id, title = %created.title, "Game created");

    Ok((StatusCode::CREATED, Json(created)))
}

/// `GET /games`
async fn list_games(
    State(state): State<AppState>,
    params: std::result::Result<Query<PageParams>, QueryRejection>,
) -> Result<Json<GamePage>> {
    let Query(params) = params.map_err(|e| AppError::Validation(e.body_text()))?;
    let (page, page_size) = params.resolve()?;

    let repo = GameRepository::new(state.pool());
    let total = repo.count().await?;
    let games = repo.list_page(page, page_size).await?;

    Ok(Json(GamePage::new(games, total, page, page_size)))
}

/// `GET /games/{id}`
async fn get_game(State(state): State<AppState>, Path(id): Path<GameId>) -> Result<Json<Game>> {
    GameRepository::new(state.pool())
        .get_by_id(id)
        .await?
        .map(Json)
        .ok_or_else(|| not_found(id))
}

/// `PUT /games/{id}`
async fn update_game(
    State(state): State<AppState>,
    Path(id): Path<GameId>,
    Json(game): Json<NewGame>,
) -> Result<Json<Game>> {
    game.validate()?;

    let updated = GameRepository::new(state.pool())
        .update(id, &game)
        .await?
        .ok_or_else(|| not_found(id))?;
    tracing::info!(game_id = %id, "Game updated");

    Ok(Json(updated))
}

/// `DELETE /games/{id}`
async fn delete_game(State(state): State<AppState>, Path(id): Path<GameId>) -> Result<StatusCode> {
    if GameRepository::new(state.pool()).delete(id).await? {
        tracing::info!(game_id = %id, "Game deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found(id))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::body::Body;
    use axum::http::{Request, header};
    use http_body_util::BodyExt;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use crate::db::memory_pool;
    use crate::routes::build_router;
    use crate::state::AppState;

    use super::*;

    async fn app() -> Router {
        build_router(AppState::new(memory_pool().await))
    }

    async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut request = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(value) => {
                request = request.header(header::CONTENT_TYPE, "application/json");
                Body::from(value.to_string())
            }
            None => Body::empty(),
        };

        let response = app
            .clone()
            .oneshot(request.body(body).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                Value::String(String::from_utf8_lossy(&bytes).into_owned())
            })
        };
        (status, value)
    }

    fn mario() -> Value {
        json!({
            "title": "Super Mario World",
            "release_year": 1990,
            "platform": "SNES",
            "date_acquired": "2024-01-15",
            "condition": "vgc"
        })
    }

    #[tokio::test]
    async fn test_create_then_get() {
        let app = app().await;

        let (status, created) = send(&app, "POST", "/games", Some(mario())).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["title"], "Super Mario World");
        assert_eq!(created["date_acquired"], "2024-01-15");

        let id = created["id"].as_i64().unwrap();
        let (status, fetched) = send(&app, "GET", &format!("/games/{id}"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(fetched, created);
    }

    #[tokio::test]
    async fn test_create_rejects_invalid_fields() {
        let app = app().await;

        let mut body = mario();
        body["release_year"] = json!(1960);
        let (status, error) = send(&app, "POST", "/games", Some(body)).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(error["detail"].as_str().unwrap().contains("release year"));

        let mut body = mario();
        body["condition"] = json!("pristine");
        let (status, _) = send(&app, "POST", "/games", Some(body)).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_missing_game_is_404() {
        let app = app().await;

        let (status, error) = send(&app, "GET", "/games/42", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(error, json!({ "detail": "Game with ID 42 not found" }));

        let (status, _) = send(&app, "PUT", "/games/42", Some(mario())).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = send(&app, "DELETE", "/games/42", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let app = app().await;

        let (_, created) = send(&app, "POST", "/games", Some(mario())).await;
        let id = created["id"].as_i64().unwrap();

        let mut body = mario();
        body["title"] = json!("Super Mario World 2");
        body["condition"] = Value::Null;
        let (status, updated) = send(&app, "PUT", &format!("/games/{id}"), Some(body)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["title"], "Super Mario World 2");
        assert_eq!(updated["condition"], Value::Null);

        let (status, _) = send(&app, "DELETE", &format!("/games/{id}"), None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (status, _) = send(&app, "GET", &format!("/games/{id}"), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_pagination() {
        let app = app().await;

        for year in 1990..1995 {
            let mut body = mario();
            body["release_year"] = json!(year);
            send(&app, "POST", "/games", Some(body)).await;
        }

        let (status, page) = send(&app, "GET", "/games?page=2&page_size=2", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(page["total"], 5);
        assert_eq!(page["page"], 2);
        assert_eq!(page["page_size"], 2);
        assert_eq!(page["total_pages"], 3);
        let years: Vec<i64> = page["games"]
            .as_array()
            .unwrap()
            .iter()
            .map(|g| g["release_year"].as_i64().unwrap())
            .collect();
        assert_eq!(years, vec![1992, 1991]);

        let (_, defaults) = send(&app, "GET", "/games", None).await;
        assert_eq!(defaults["page"], 1);
        assert_eq!(defaults["page_size"], 25);
        assert_eq!(defaults["total_pages"], 1);
    }

    #[tokio::test]
    async fn test_pagination_bounds() {
        let app = app().await;

        for uri in [
            "/games?page=0",
            "/games?page_size=0",
            "/games?page_size=101",
            "/games?page=abc",
        ] {
            let (status, _) = send(&app, "GET", uri, None).await;
            assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "{uri}");
        }
    }

    #[tokio::test]
    async fn test_huge_page_number_returns_empty_page() {
        let app = app().await;
        let (status, _) = send(&app, "POST", "/games", Some(mario())).await;
        assert_eq!(status, StatusCode::CREATED);

        let uri = format!("/games?page={}&page_size=100", i64::MAX);
        let (status, page) = send(&app, "GET", &uri, None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(page["games"], json!([]));
        assert_eq!(page["total"], 1);
        assert_eq!(page["page"], i64::MAX);
        assert_eq!(page["total_pages"], 1);
    }

    #[tokio::test]
    async fn test_root_and_health() {
        let app = app().await;

        let (status, root) = send(&app, "GET", "/", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(root["message"], "Retro Games API");

        let (status, body) = send(&app, "GET", "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, Value::String("ok".to_owned()));

        let (status, _) = send(&app, "GET", "/health/ready", None).await;
        assert_eq!(status, StatusCode::OK);
    }
}

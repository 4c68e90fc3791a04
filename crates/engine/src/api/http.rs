//! HTTP routes.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;
use wayfarer_domain::{DomainError, ErrorKind, LocationId, PlayerId, WorldError, WorldId};
use wayfarer_shared::{
    ActionKind, ActionRequest, ActionResponse, CreateGameResponse, CreatePlayerRequest,
    GameStateResponse, PlayerCreatedResponse,
};

use super::auth::BearerToken;
use super::dto::{location_data, player_data};
use super::events::stream_events;
use crate::app::App;
use crate::stores::SessionError;
use crate::use_cases::{ActionError, LobbyError, PlayerAction};

/// Create all HTTP routes.
pub fn routes() -> Router<Arc<App>> {
    Router::new()
        .route("/health", get(health))
        .route("/games", post(create_game))
        .route("/games/{game_id}", get(get_game))
        .route("/games/{game_id}/players", post(create_player))
        .route("/games/{game_id}/actions", post(perform_action))
        .route("/games/{game_id}/events", get(stream_events))
}

async fn health() -> &'static str {
    "OK"
}

async fn create_game(State(app): State<Arc<App>>) -> (StatusCode, Json<CreateGameResponse>) {
    let game = app.use_cases.lobby.create.execute().await;
    (
        StatusCode::CREATED,
        Json(CreateGameResponse {
            game_id: game.world_id.to_string(),
            locations: game.locations.iter().map(location_data).collect(),
            message: "Game created successfully".to_string(),
        }),
    )
}

async fn get_game(
    State(app): State<Arc<App>>,
    Path(game_id): Path<String>,
) -> Result<Json<GameStateResponse>, ApiError> {
    let game = app
        .use_cases
        .lobby
        .get
        .execute(&WorldId::new(game_id))
        .await?;
    Ok(Json(GameStateResponse {
        game_id: game.world_id.to_string(),
        locations: game.locations.iter().map(location_data).collect(),
        players: game.players.iter().map(player_data).collect(),
    }))
}

async fn create_player(
    State(app): State<Arc<App>>,
    Path(game_id): Path<String>,
    body: Result<Json<CreatePlayerRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<PlayerCreatedResponse>), ApiError> {
    let world_id = WorldId::new(game_id);
    if app.games.get(&world_id).is_none() {
        return Err(ApiError::NotFound("Game not found".to_string()));
    }
    let Json(request) = body.map_err(|_| ApiError::BadRequest("Invalid request body".to_string()))?;

    let joined = app
        .use_cases
        .lobby
        .join
        .execute(&world_id, request.name)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(PlayerCreatedResponse {
            player: player_data(&joined.player),
            token: joined.token,
            message: "Player created successfully.".to_string(),
        }),
    ))
}

async fn perform_action(
    State(app): State<Arc<App>>,
    Path(game_id): Path<String>,
    token: Result<BearerToken, ApiError>,
    body: Result<Json<ActionRequest>, JsonRejection>,
) -> Result<Json<ActionResponse>, ApiError> {
    let world_id = WorldId::new(game_id);
    if app.games.get(&world_id).is_none() {
        return Err(ApiError::NotFound("Game not found".to_string()));
    }
    let BearerToken(token) = token?;
    let claims = app.sessions.validate(&token, &world_id)?;
    let Json(request) = body.map_err(|_| ApiError::BadRequest("Invalid request body".to_string()))?;

    let action = match request.action {
        ActionKind::Move => PlayerAction::Move {
            target: LocationId::new(request.target),
        },
        ActionKind::Attack => PlayerAction::Attack {
            target: PlayerId::new(request.target),
        },
        ActionKind::Unknown => return Err(ApiError::BadRequest("Unknown action".to_string())),
    };

    let message = app
        .use_cases
        .actions
        .perform
        .execute(&world_id, &claims.player_id, action)
        .await?;
    Ok(Json(ActionResponse::success(message)))
}

// =============================================================================
// Errors
// =============================================================================

/// Error returned by handlers; rendered as a plain-text body.
#[derive(Debug)]
pub enum ApiError {
    NotFound(String),
    BadRequest(String),
    Unauthorized(String),
    Forbidden(String),
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg).into_response(),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg).into_response(),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg).into_response(),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg).into_response(),
            ApiError::Internal(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal error").into_response()
            }
        }
    }
}

impl From<WorldError> for ApiError {
    fn from(e: WorldError) -> Self {
        match e.kind() {
            ErrorKind::NotFound => ApiError::NotFound(e.to_string()),
            ErrorKind::InvalidTransition | ErrorKind::StateConflict => {
                ApiError::BadRequest(e.to_string())
            }
            ErrorKind::ResourceExhausted => ApiError::Internal(e.to_string()),
        }
    }
}

impl From<DomainError> for ApiError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::Validation(msg) => ApiError::BadRequest(msg),
        }
    }
}

impl From<SessionError> for ApiError {
    fn from(e: SessionError) -> Self {
        match e {
            SessionError::WrongWorld => ApiError::Forbidden(e.to_string()),
            SessionError::MissingToken
            | SessionError::MalformedHeader
            | SessionError::InvalidToken => {
                tracing::warn!(error = %e, "Rejected authentication");
                ApiError::Unauthorized(e.to_string())
            }
        }
    }
}

impl From<LobbyError> for ApiError {
    fn from(e: LobbyError) -> Self {
        match e {
            LobbyError::GameNotFound(_) => ApiError::NotFound("Game not found".to_string()),
            LobbyError::Validation(e) => e.into(),
            LobbyError::World(e) => e.into(),
        }
    }
}

impl From<ActionError> for ApiError {
    fn from(e: ActionError) -> Self {
        match e {
            ActionError::GameNotFound(_) => ApiError::NotFound("Game not found".to_string()),
            ActionError::World(e) => e.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::clock::{FixedClock, FixedRandom};
    use crate::infrastructure::settings::EngineConfig;
    use axum::body::Body;
    use axum::http::{header, Request};
    use chrono::Utc;
    use futures_util::StreamExt;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    /// Router over an app where every player joins the same location.
    fn router() -> Router {
        router_with(&[])
    }

    fn router_with(overrides: &[(&str, &str)]) -> Router {
        let mut vars = vec![("WORLD_SIZE".to_string(), "4".to_string())];
        vars.extend(overrides.iter().map(|(k, v)| (k.to_string(), v.to_string())));
        let config = EngineConfig::from_lookup(move |key| {
            vars.iter()
                .rev()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.clone())
        })
        .unwrap();
        let app = App::with_ports(
            &config,
            Arc::new(FixedClock(Utc::now())),
            Arc::new(FixedRandom::new(0)),
        );
        routes().with_state(Arc::new(app))
    }

    async fn send(
        router: &Router,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Vec<u8>) {
        let mut request = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            request = request.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let body = match body {
            Some(value) => {
                request = request.header(header::CONTENT_TYPE, "application/json");
                Body::from(value.to_string())
            }
            None => Body::empty(),
        };
        let response = router
            .clone()
            .oneshot(request.body(body).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, bytes.to_vec())
    }

    fn json_body(bytes: &[u8]) -> Value {
        serde_json::from_slice(bytes).unwrap()
    }

    async fn create_game(router: &Router) -> Value {
        let (status, body) = send(router, "POST", "/games", None, None).await;
        assert_eq!(status, StatusCode::CREATED);
        json_body(&body)
    }

    async fn join(router: &Router, game_id: &str, name: &str) -> Value {
        let (status, body) = send(
            router,
            "POST",
            &format!("/games/{game_id}/players"),
            None,
            Some(json!({ "name": name })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        json_body(&body)
    }

    #[tokio::test]
    async fn health_is_ok() {
        let (status, body) = send(&router(), "GET", "/health", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, b"OK");
    }

    #[tokio::test]
    async fn create_then_inspect_game() {
        let router = router();
        let game = create_game(&router).await;
        let game_id = game["game_id"].as_str().unwrap();
        assert_eq!(game["locations"].as_array().unwrap().len(), 4);
        assert_eq!(game["message"], "Game created successfully");

        let player = join(&router, game_id, "Arwen").await;
        assert_eq!(player["player"]["health"], 100);
        assert_eq!(player["message"], "Player created successfully.");
        assert!(player["token"].as_str().is_some());

        let (status, body) = send(&router, "GET", &format!("/games/{game_id}"), None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json_body(&body)["players"].as_array().unwrap().len(), 1);

        let (status, _) = send(&router, "GET", "/games/nothere", None, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn empty_name_is_bad_request() {
        let router = router();
        let game = create_game(&router).await;
        let uri = format!("/games/{}/players", game["game_id"].as_str().unwrap());

        let (status, body) = send(&router, "POST", &uri, None, Some(json!({ "name": "" }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, b"Name is required");

        let (status, _) = send(&router, "POST", &uri, None, Some(json!({}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn attack_and_move_actions() {
        let router = router();
        let game = create_game(&router).await;
        let game_id = game["game_id"].as_str().unwrap();
        let alpha = join(&router, game_id, "Alpha").await;
        let beta = join(&router, game_id, "Beta").await;
        let token = alpha["token"].as_str().unwrap();
        let uri = format!("/games/{game_id}/actions");

        let (status, body) = send(
            &router,
            "POST",
            &uri,
            Some(token),
            Some(json!({ "action": "attack", "target": beta["player"]["id"] })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            json_body(&body),
            json!({ "status": "success", "message": "Attack executed" })
        );

        let here = alpha["player"]["current_location"].as_str().unwrap();
        let (status, body) = send(
            &router,
            "POST",
            &uri,
            Some(token),
            Some(json!({ "action": "move", "target": here })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json_body(&body)["message"], format!("Player moved to {here}"));

        let (status, _) = send(
            &router,
            "POST",
            &uri,
            Some(token),
            Some(json!({ "action": "move", "target": "nowhere" })),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, body) = send(
            &router,
            "POST",
            &uri,
            Some(token),
            Some(json!({ "action": "dance", "target": "" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, b"Unknown action");
    }

    #[tokio::test]
    async fn actions_require_a_token_for_this_game() {
        let router = router();
        let first = create_game(&router).await;
        let second = create_game(&router).await;
        let first_id = first["game_id"].as_str().unwrap();
        let second_id = second["game_id"].as_str().unwrap();
        let player = join(&router, first_id, "Eomer").await;
        let token = player["token"].as_str().unwrap();
        let action = json!({ "action": "move", "target": "x" });

        let (status, _) = send(
            &router,
            "POST",
            &format!("/games/{first_id}/actions"),
            None,
            Some(action.clone()),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, _) = send(
            &router,
            "POST",
            &format!("/games/{first_id}/actions"),
            Some("forged"),
            Some(action.clone()),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, body) = send(
            &router,
            "POST",
            &format!("/games/{second_id}/actions"),
            Some(token),
            Some(action),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body, b"Token not valid for this game");
    }

    #[tokio::test]
    async fn event_stream_opens_with_welcome() {
        let router = router();
        let game = create_game(&router).await;
        let game_id = game["game_id"].as_str().unwrap();
        let player = join(&router, game_id, "Legolas").await;
        let token = player["token"].as_str().unwrap();

        let request = Request::builder()
            .uri(format!("/games/{game_id}/events"))
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .body(Body::empty())
            .unwrap();
        let response = router.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "text/event-stream"
        );

        let mut body = response.into_body().into_data_stream();
        let frame = body.next().await.unwrap().unwrap();
        let frame = String::from_utf8(frame.to_vec()).unwrap();
        assert!(frame.starts_with("data: "), "{frame}");
        assert!(frame.contains("\"type\":\"connected\""));
        assert!(frame.contains("Connected to game. You are in "));

        // A join elsewhere is global and reaches the open stream
        join(&router, game_id, "Gimli").await;
        let frame = body.next().await.unwrap().unwrap();
        let frame = String::from_utf8(frame.to_vec()).unwrap();
        assert!(frame.contains("Gimli joined the game"), "{frame}");
    }

    #[tokio::test]
    async fn event_stream_rejects_missing_token() {
        let router = router();
        let game = create_game(&router).await;
        let uri = format!("/games/{}/events", game["game_id"].as_str().unwrap());

        let (status, _) = send(&router, "GET", &uri, None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn event_stream_ends_when_subscriber_is_evicted() {
        let router = router_with(&[("SUBSCRIBER_QUEUE_CAPACITY", "1")]);
        let game = create_game(&router).await;
        let game_id = game["game_id"].as_str().unwrap();
        let player = join(&router, game_id, "Pippin").await;
        let token = player["token"].as_str().unwrap();

        let request = Request::builder()
            .uri(format!("/games/{game_id}/events"))
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .body(Body::empty())
            .unwrap();
        let response = router.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        // Nobody reads the stream: the first join fills the queue, the second evicts
        for name in ["Merry", "Sam", "Frodo"] {
            join(&router, game_id, name).await;
        }

        let frames: Vec<String> = tokio::time::timeout(
            std::time::Duration::from_secs(5),
            response
                .into_body()
                .into_data_stream()
                .map(|frame| String::from_utf8(frame.unwrap().to_vec()).unwrap())
                .collect(),
        )
        .await
        .expect("stream did not end after eviction");

        assert_eq!(frames.len(), 2, "{frames:?}");
        assert!(frames[0].contains("\"type\":\"connected\""));
        assert!(frames[1].contains("Merry joined the game"));
    }

    #[tokio::test]
    async fn unknown_game_wins_over_missing_token() {
        let router = router();
        let action = json!({ "action": "move", "target": "x" });

        let (status, body) = send(&router, "POST", "/games/nope/actions", None, Some(action)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, b"Game not found");

        let (status, _) = send(&router, "GET", "/games/nope/events", None, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}

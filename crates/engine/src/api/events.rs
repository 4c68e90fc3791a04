//! Event streaming over SSE.
//!
//! One subscription per open stream. The first frame is the welcome event,
//! then every event delivered to the subscription in arrival order. The
//! stream ends when the subscription is evicted; a client disconnect drops
//! it, which unsubscribes.

use axum::{
    extract::{Path, State},
    response::sse::{Event, KeepAlive, Sse},
};
use futures_util::future;
use futures_util::stream::{self, Stream, StreamExt};
use serde::Serialize;
use std::convert::Infallible;
use std::sync::Arc;
use wayfarer_domain::{GameEvent, WorldId};

use super::auth::BearerToken;
use super::dto::server_event;
use super::http::ApiError;
use crate::app::App;

/// Stream a player's events via SSE
pub async fn stream_events(
    State(app): State<Arc<App>>,
    Path(game_id): Path<String>,
    token: Result<BearerToken, ApiError>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, ApiError> {
    let world_id = WorldId::new(game_id);
    if app.games.get(&world_id).is_none() {
        return Err(ApiError::NotFound("Game not found".to_string()));
    }
    let BearerToken(token) = token?;
    let claims = app.sessions.validate(&token, &world_id)?;

    let (welcome, subscription) = app
        .use_cases
        .actions
        .stream
        .execute(&world_id, &claims.player_id)
        .await?;

    let stream = stream::iter(sse_event(&welcome))
        .chain(subscription.filter_map(|event| future::ready(sse_event(&event))))
        .map(Ok);

    Ok(Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(app.world_config.keepalive)
            .text("keepalive"),
    ))
}

fn sse_event(event: &GameEvent) -> Option<Event> {
    data_frame(&server_event(event))
}

/// JSON `data:` frame, or `None` (logged) when the payload fails to serialize.
fn data_frame(payload: &impl Serialize) -> Option<Event> {
    match serde_json::to_string(payload) {
        Ok(json) => Some(Event::default().data(json)),
        Err(error) => {
            tracing::error!(error = %error, "Failed to serialize event, skipping frame");
            None
        }
    }
}

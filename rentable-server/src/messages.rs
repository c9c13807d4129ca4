use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json,
};
use log::debug;

use crate::{
    auth::Session,
    context::ServerContext,
    errors::ServerResult,
    schemas::{PostMessageSchema, ValidatedJson},
    serialized::{Message, ToSerialized},
    Router,
};

async fn thread(
    _session: Session,
    State(context): State<ServerContext>,
    Path(item_id): Path<i64>,
) -> ServerResult<Json<Vec<Message>>> {
    // 404 for threads on items that don't exist
    context.market.catalog.item(item_id).await?;

    let thread = context.market.messaging.thread(item_id).await?;
    debug!("item {} thread has {} message(s)", item_id, thread.len());

    Ok(Json(thread.to_serialized()))
}

async fn post_message(
    session: Session,
    State(context): State<ServerContext>,
    Path(item_id): Path<i64>,
    ValidatedJson(body): ValidatedJson<PostMessageSchema>,
) -> ServerResult<StatusCode> {
    context.market.catalog.item(item_id).await?;

    let posted = context
        .market
        .messaging
        .post(item_id, session.username(), &body.text)
        .await?;

    // Blank text is accepted and dropped rather than rejected
    match posted {
        Some(_) => Ok(StatusCode::CREATED),
        None => Ok(StatusCode::NO_CONTENT),
    }
}

pub fn router() -> Router {
    Router::new()
        .route("/:id/messages", get(thread))
        .route("/:id/messages", post(post_message))
}

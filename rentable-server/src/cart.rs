use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, patch, post},
    Json,
};
use rentable_market::clamp_days;

use crate::{
    auth::Session,
    context::ServerContext,
    errors::{ServerError, ServerResult},
    schemas::{AddToCartSchema, UpdateCartSchema, ValidatedJson},
    serialized::{CartSummary, ToSerialized},
    Router,
};

/// The session was valid at extraction but disappeared before the cart
/// access. Logging out in parallel does this.
fn session_gone() -> ServerError {
    ServerError::NotFound {
        resource: "session",
        identifier: "token",
    }
}

async fn view_cart(
    session: Session,
    State(context): State<ServerContext>,
) -> ServerResult<Json<CartSummary>> {
    let items = context.market.catalog.list_all().await?;

    let view = context
        .market
        .sessions
        .with_cart(session.token(), |cart| cart.view(&items))
        .ok_or_else(session_gone)?;

    Ok(Json(view.to_serialized()))
}

async fn add_to_cart(
    session: Session,
    State(context): State<ServerContext>,
    ValidatedJson(body): ValidatedJson<AddToCartSchema>,
) -> ServerResult<StatusCode> {
    // Adding something that doesn't exist is rejected up front; the cart
    // itself never checks.
    let item = context.market.catalog.item(body.item_id).await?;
    let days = clamp_days(body.days);

    context
        .market
        .sessions
        .with_cart(session.token(), |cart| cart.add(item.id, days))
        .ok_or_else(session_gone)?;

    Ok(StatusCode::NO_CONTENT)
}

async fn remove_from_cart(
    session: Session,
    State(context): State<ServerContext>,
    Path(item_id): Path<i64>,
) -> ServerResult<StatusCode> {
    context
        .market
        .sessions
        .with_cart(session.token(), |cart| cart.remove(item_id))
        .ok_or_else(session_gone)?;

    Ok(StatusCode::NO_CONTENT)
}

async fn clear_cart(
    session: Session,
    State(context): State<ServerContext>,
) -> ServerResult<StatusCode> {
    context
        .market
        .sessions
        .with_cart(session.token(), |cart| cart.clear())
        .ok_or_else(session_gone)?;

    Ok(StatusCode::NO_CONTENT)
}

async fn update_cart(
    session: Session,
    State(context): State<ServerContext>,
    ValidatedJson(body): ValidatedJson<UpdateCartSchema>,
) -> ServerResult<StatusCode> {
    context
        .market
        .sessions
        .with_cart(session.token(), |cart| cart.update_days(&body.days))
        .ok_or_else(session_gone)?;

    Ok(StatusCode::NO_CONTENT)
}

pub fn router() -> Router {
    Router::new()
        .route("/", get(view_cart))
        .route("/", patch(update_cart))
        .route("/items", post(add_to_cart))
        .route("/items/:id", delete(remove_from_cart))
        .route("/clear", post(clear_cart))
}

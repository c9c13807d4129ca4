use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json,
};
use rentable_market::{clamp_days, ReclaimItem};

use crate::{
    auth::Session,
    context::ServerContext,
    errors::ServerResult,
    schemas::{ConfirmReturnSchema, RentSchema, ValidatedJson},
    serialized::{Item, Rental, ToSerialized},
    Router,
};

async fn rent(
    session: Session,
    State(context): State<ServerContext>,
    Path(item_id): Path<i64>,
    ValidatedJson(body): ValidatedJson<RentSchema>,
) -> ServerResult<Json<Rental>> {
    let days = clamp_days(body.days);

    let rental = context
        .market
        .ledger
        .rent(item_id, session.username(), days)
        .await?;

    Ok(Json(rental.to_serialized()))
}

async fn return_item(
    _session: Session,
    State(context): State<ServerContext>,
    Path(item_id): Path<i64>,
) -> ServerResult<Json<Item>> {
    let item = context.market.ledger.return_by_owner(item_id).await?;
    Ok(Json(item.to_serialized()))
}

async fn full_log(
    _session: Session,
    State(context): State<ServerContext>,
) -> ServerResult<Json<Vec<Rental>>> {
    let log = context.market.ledger.history().await?;
    Ok(Json(log.to_serialized()))
}

async fn my_rentals(
    session: Session,
    State(context): State<ServerContext>,
) -> ServerResult<Json<Vec<Rental>>> {
    let log = context
        .market
        .ledger
        .history_for(session.username())
        .await?;

    Ok(Json(log.to_serialized()))
}

async fn confirm_return(
    session: Session,
    State(context): State<ServerContext>,
    ValidatedJson(body): ValidatedJson<ConfirmReturnSchema>,
) -> ServerResult<Json<Item>> {
    // body.rental_date is accepted but ignored; the match is purely on the
    // descriptive fields
    let item = context
        .market
        .ledger
        .confirm_return(ReclaimItem {
            item_name: body.item_name,
            description: body.description,
            confirmed_by: session.username().to_string(),
        })
        .await?;

    Ok(Json(item.to_serialized()))
}

pub fn item_router() -> Router {
    Router::new()
        .route("/:id/rent", post(rent))
        .route("/:id/return", post(return_item))
}

pub fn router() -> Router {
    Router::new()
        .route("/", get(full_log))
        .route("/mine", get(my_rentals))
        .route("/confirm-return", post(confirm_return))
}

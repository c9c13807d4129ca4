use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post, put},
    Json,
};
use rentable_market::{Category, NewListing};

use crate::{
    auth::Session,
    context::ServerContext,
    errors::{ServerError, ServerResult},
    schemas::{FavoriteSchema, NewItemSchema, ValidatedJson},
    serialized::{Favorites, Item, ToSerialized},
    Router,
};

async fn list_items(State(context): State<ServerContext>) -> ServerResult<Json<Vec<Item>>> {
    let items = context.market.catalog.list_all().await?;
    Ok(Json(items.to_serialized()))
}

async fn item(
    State(context): State<ServerContext>,
    Path(item_id): Path<i64>,
) -> ServerResult<Json<Item>> {
    let item = context.market.catalog.item(item_id).await?;
    Ok(Json(item.to_serialized()))
}

async fn create_item(
    session: Session,
    State(context): State<ServerContext>,
    ValidatedJson(body): ValidatedJson<NewItemSchema>,
) -> ServerResult<(StatusCode, Json<Item>)> {
    let category = Category::from_slug(&body.category)?;

    let item = context
        .market
        .catalog
        .add(
            NewListing {
                name: body.name,
                description: body.description,
                daily_price: body.daily_price,
                category,
            },
            session.username(),
        )
        .await?;

    Ok((StatusCode::CREATED, Json(item.to_serialized())))
}

async fn list_categories() -> Json<Vec<&'static str>> {
    Json(Category::ALL.iter().map(|c| c.slug()).collect())
}

async fn items_in_category(
    State(context): State<ServerContext>,
    Path(slug): Path<String>,
) -> ServerResult<Json<Vec<Item>>> {
    // An unknown category in the path reads as a missing page, not bad input
    let category = Category::from_slug(&slug).map_err(|_| ServerError::NotFound {
        resource: "category",
        identifier: "slug",
    })?;

    let items = context.market.catalog.list_by_category(category).await?;
    Ok(Json(items.to_serialized()))
}

async fn favorites(
    State(context): State<ServerContext>,
    session: Option<Session>,
) -> ServerResult<Json<Favorites>> {
    let selected = session
        .and_then(|s| context.market.sessions.favorite_category(s.token()));

    let items = match selected {
        Some(category) => context
            .market
            .catalog
            .list_by_category(category)
            .await?
            .to_serialized(),
        None => vec![],
    };

    Ok(Json(Favorites {
        selected_category: selected.map(|c| c.slug().to_string()),
        items,
    }))
}

async fn set_favorite(
    session: Session,
    State(context): State<ServerContext>,
    ValidatedJson(body): ValidatedJson<FavoriteSchema>,
) -> ServerResult<StatusCode> {
    let category = Category::from_slug(&body.category)?;

    context
        .market
        .sessions
        .set_favorite_category(session.token(), category);

    Ok(StatusCode::NO_CONTENT)
}

pub fn item_router() -> Router {
    Router::new()
        .route("/", get(list_items))
        .route("/", post(create_item))
        .route("/:id", get(item))
}

pub fn category_router() -> Router {
    Router::new()
        .route("/", get(list_categories))
        .route("/:slug/items", get(items_in_category))
}

pub fn favorites_router() -> Router {
    Router::new()
        .route("/", get(favorites))
        .route("/", put(set_favorite))
}

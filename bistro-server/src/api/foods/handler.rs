//! Food API Handlers

use axum::{
    Json,
    extract::{Query, State},
};
use serde_json::Value;
use shared::error::ErrorCode;
use shared::models::{Food, FoodCreate, FoodUpdate};
use shared::util::normalize_price;

use crate::AppResult;
use crate::api::crud::{self, CreateContext, Creatable, Reference, Resource, Updatable};
use crate::api::menus::Menus;
use crate::core::ServerState;
use crate::db::collections::FOODS;
use crate::services::pagination::{PageQuery, PageRequest, paginate};

pub struct Foods;

impl Resource for Foods {
    const RESOURCE: &'static str = "food";
    const COLLECTION: &'static str = FOODS;
    const ID_FIELD: &'static str = "food_id";
    const NOT_FOUND: ErrorCode = ErrorCode::FoodNotFound;
    type Record = Food;
}

impl Creatable for Foods {
    type Create = FoodCreate;

    fn create_references(payload: &FoodCreate) -> Vec<Reference> {
        payload
            .menu_id
            .iter()
            .map(|id| Reference::to::<Menus>(id.clone()))
            .collect()
    }

    /// 价格在创建时保留两位小数
    fn build(payload: FoodCreate, ctx: &CreateContext) -> AppResult<Food> {
        Ok(Food {
            food_id: ctx.id.clone(),
            name: crud::required(payload.name, "name")?,
            price: normalize_price(crud::required(payload.price, "price")?, "price")?,
            food_image: crud::required(payload.food_image, "food_image")?,
            menu_id: crud::required(payload.menu_id, "menu_id")?,
            created_at: ctx.now,
            updated_at: ctx.now,
        })
    }
}

/// Price is stored as sent; only creation rounds it.
impl Updatable for Foods {
    type Update = FoodUpdate;

    fn update_references(payload: &FoodUpdate) -> Vec<Reference> {
        payload
            .menu_id
            .iter()
            .map(|id| Reference::to::<Menus>(id.clone()))
            .collect()
    }
}

/// GET /foods?recordPerPage=&page= - 分页获取菜品
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<Value>> {
    let page = paginate::<Food>(state.store(), FOODS, PageRequest::from(&query)).await?;
    Ok(Json(page.into_body("food_items")?))
}

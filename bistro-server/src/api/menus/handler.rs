//! Menu API Handlers

use chrono::{DateTime, Utc};
use shared::error::ErrorCode;
use shared::models::{Menu, MenuCreate, MenuUpdate, is_window_acceptable};

use crate::api::crud::{self, CreateContext, Creatable, Resource, Updatable};
use crate::db::collections::MENUS;
use crate::{AppError, AppResult};

pub struct Menus;

impl Resource for Menus {
    const RESOURCE: &'static str = "menu";
    const COLLECTION: &'static str = MENUS;
    const ID_FIELD: &'static str = "menu_id";
    const NOT_FOUND: ErrorCode = ErrorCode::MenuNotFound;
    type Record = Menu;
}

impl Creatable for Menus {
    type Create = MenuCreate;

    fn build(payload: MenuCreate, ctx: &CreateContext) -> AppResult<Menu> {
        Ok(Menu {
            menu_id: ctx.id.clone(),
            name: crud::required(payload.name, "name")?,
            category: crud::required(payload.category, "category")?,
            start_date: payload.start_date,
            end_date: payload.end_date,
            created_at: ctx.now,
            updated_at: ctx.now,
        })
    }
}

impl Updatable for Menus {
    type Update = MenuUpdate;

    /// 同时提供开始与结束时间时，窗口必须尚未开始且结束晚于开始
    fn check_update(payload: &MenuUpdate, now: DateTime<Utc>) -> AppResult<()> {
        match payload.window() {
            Some((start, end)) if !is_window_acceptable(start, end, now) => {
                tracing::debug!(%start, %end, "Menu window rejected");
                Err(AppError::new(ErrorCode::MenuWindowInvalid))
            }
            _ => Ok(()),
        }
    }
}

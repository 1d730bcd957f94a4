//! User API Handlers
//!
//! Handles signup, login and user listing. Responses always go through
//! [`UserView`], so the password hash never leaves the store.

use axum::{
    Json,
    extract::{Query, State},
};
use serde_json::Value;
use shared::error::ErrorCode;
use shared::models::{LoginRequest, SignupRequest, User, UserView};
use shared::util::{new_record_id, now_seconds};

use crate::api::crud::{self, Resource};
use crate::auth::extractor::ValidJson;
use crate::auth::{hash_password, verify_password};
use crate::core::ServerState;
use crate::db::collections::USERS;
use crate::db::{Document, Filter};
use crate::security_log;
use crate::services::pagination::{PageQuery, PageRequest, paginate};
use crate::{AppError, AppResult};

pub struct Users;

/// Reads decode straight into [`UserView`]; the stored hash is skipped.
impl Resource for Users {
    const RESOURCE: &'static str = "user";
    const COLLECTION: &'static str = USERS;
    const ID_FIELD: &'static str = "user_id";
    const NOT_FOUND: ErrorCode = ErrorCode::UserNotFound;
    type Record = UserView;
}

/// GET /users?recordPerPage=&page= - 分页获取用户
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<Value>> {
    let page = paginate::<UserView>(state.store(), USERS, PageRequest::from(&query)).await?;
    Ok(Json(page.into_body("user_items")?))
}

/// POST /users/signup - 注册
///
/// 邮箱或手机号已存在时拒绝 (400)。
pub async fn signup(
    State(state): State<ServerState>,
    ValidJson(req): ValidJson<SignupRequest>,
) -> AppResult<Json<UserView>> {
    let store = state.store();
    let email = crud::required(req.email, "email")?;
    let phone = crud::required(req.phone, "phone")?;

    let email_count = store.count(USERS, &Filter::eq("email", email.clone())).await?;
    let phone_count = store.count(USERS, &Filter::eq("phone", phone.clone())).await?;
    if email_count > 0 || phone_count > 0 {
        security_log!(
            "WARN",
            "signup_rejected",
            email = email.as_str(),
            email_taken = email_count > 0,
            phone_taken = phone_count > 0
        );
        return Err(AppError::new(ErrorCode::UserEmailOrPhoneExists));
    }

    let password = hash_password(&crud::required(req.password, "password")?)?;
    let now = now_seconds();
    let mut user = User {
        user_id: new_record_id(),
        first_name: crud::required(req.first_name, "first_name")?,
        last_name: crud::required(req.last_name, "last_name")?,
        password,
        email,
        phone,
        avatar: req.avatar,
        token: None,
        refresh_token: None,
        created_at: now,
        updated_at: now,
    };

    let tokens = state.jwt_service().issue(
        &user.email,
        &user.first_name,
        &user.last_name,
        &user.user_id,
    )?;
    user.token = Some(tokens.token);
    user.refresh_token = Some(tokens.refresh_token);

    store.insert(USERS, &user).await?;

    tracing::info!(user_id = %user.user_id, "User signed up");
    Ok(Json(UserView::from(user)))
}

/// POST /users/login - 登录
///
/// 邮箱不存在与密码错误返回同一个错误，不区分两者。
pub async fn login(
    State(state): State<ServerState>,
    ValidJson(req): ValidJson<LoginRequest>,
) -> AppResult<Json<UserView>> {
    let store = state.store();
    let email = crud::required(req.email, "email")?;
    let password = crud::required(req.password, "password")?;

    let user: Option<User> = store
        .find_one_as(USERS, &Filter::eq("email", email.clone()))
        .await?;

    let mut user = match user {
        Some(user) if verify_password(&password, &user.password) => user,
        Some(user) => {
            security_log!(
                "WARN",
                "login_failed",
                reason = "invalid_password",
                user_id = user.user_id.as_str()
            );
            return Err(AppError::invalid_credentials());
        }
        None => {
            security_log!(
                "WARN",
                "login_failed",
                reason = "user_not_found",
                email = email.as_str()
            );
            return Err(AppError::invalid_credentials());
        }
    };

    let tokens = state.jwt_service().issue(
        &user.email,
        &user.first_name,
        &user.last_name,
        &user.user_id,
    )?;
    let now = now_seconds();

    let mut changes = Document::new();
    changes.insert("token".to_string(), Value::String(tokens.token.clone()));
    changes.insert(
        "refresh_token".to_string(),
        Value::String(tokens.refresh_token.clone()),
    );
    changes.insert("updated_at".to_string(), crud::timestamp(now));
    store
        .update_one(
            USERS,
            &Filter::eq(Users::ID_FIELD, user.user_id.clone()),
            changes,
            true,
        )
        .await?;

    user.token = Some(tokens.token);
    user.refresh_token = Some(tokens.refresh_token);
    user.updated_at = now;

    security_log!("INFO", "login_success", user_id = user.user_id.as_str());
    Ok(Json(UserView::from(user)))
}

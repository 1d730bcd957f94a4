//! HTTP tests over the in-memory store

use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use bistro_server::auth::JwtConfig;
use bistro_server::db::collections::{ORDER_ITEMS, ORDERS};
use bistro_server::db::{
    Document, Filter, MemoryStore, RecordStore, StoreError, StoreResult, UpdateOutcome,
};
use bistro_server::{Config, ServerState, Store, build_app};
use http::{Method, Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

const SECRET: &str = "integration-secret-integration-secret-42";

fn app() -> Router {
    app_with_store(Store::in_memory())
}

fn app_with_store(store: Store) -> Router {
    let config = Config::in_memory(JwtConfig::with_secret(SECRET));
    build_app(ServerState::with_store(config, store))
}

/// Memory engine whose bulk insert into `order_items` always fails
#[derive(Default)]
struct BrokenItemWrites {
    inner: MemoryStore,
}

#[async_trait]
impl RecordStore for BrokenItemWrites {
    fn engine(&self) -> &'static str {
        "broken-item-writes"
    }

    async fn find(&self, collection: &str, filter: &Filter) -> StoreResult<Vec<Document>> {
        self.inner.find(collection, filter).await
    }

    async fn insert_one(&self, collection: &str, doc: Document) -> StoreResult<()> {
        self.inner.insert_one(collection, doc).await
    }

    async fn insert_many(&self, collection: &str, docs: Vec<Document>) -> StoreResult<()> {
        if collection == ORDER_ITEMS {
            return Err(StoreError::Backend("disk full".to_string()));
        }
        self.inner.insert_many(collection, docs).await
    }

    async fn update_one(
        &self,
        collection: &str,
        filter: &Filter,
        changes: Document,
        upsert: bool,
    ) -> StoreResult<UpdateOutcome> {
        self.inner.update_one(collection, filter, changes, upsert).await
    }
}

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("token", token);
    }
    let request = match body {
        Some(body) => builder
            .header(http::header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

fn signup_body(email: &str, phone: &str) -> Value {
    json!({
        "first_name": "Ada",
        "last_name": "Lovelace",
        "password": "secret123",
        "email": email,
        "phone": phone
    })
}

/// Sign up one user and return its access token
async fn token_for(app: &Router) -> String {
    let (status, body) = send(
        app,
        Method::POST,
        "/users/signup",
        None,
        Some(signup_body("chef@bistro.test", "555-0001")),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    body["token"].as_str().unwrap().to_string()
}

async fn create(app: &Router, token: &str, uri: &str, body: Value) -> Value {
    let (status, created) = send(app, Method::POST, uri, Some(token), Some(body)).await;
    assert_eq!(status, StatusCode::OK, "{created}");
    created
}

#[tokio::test]
async fn test_health_is_public() {
    let app = app();
    let (status, body) = send(&app, Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_protected_routes_need_a_token() {
    let app = app();

    let (status, body) = send(&app, Method::GET, "/foods", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], 1001);

    let (status, _) = send(&app, Method::GET, "/foods", Some("not-a-jwt"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let app = app();

    let (status, body) = send(&app, Method::GET, "/no-such-route", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], 3);
    assert_eq!(body["message"], "route not found");

    let token = token_for(&app).await;
    let (status, _) = send(&app, Method::GET, "/no-such-route", Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_signup_login_and_user_reads() {
    let app = app();

    let (status, user) = send(
        &app,
        Method::POST,
        "/users/signup",
        None,
        Some(signup_body("ada@bistro.test", "555-0100")),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(user.get("password").is_none());
    assert!(user["refresh_token"].is_string());

    // same email, different phone
    let (status, body) = send(
        &app,
        Method::POST,
        "/users/signup",
        None,
        Some(signup_body("ada@bistro.test", "555-0199")),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "this email or phone number already exists");

    // fresh email, same phone
    let (status, body) = send(
        &app,
        Method::POST,
        "/users/signup",
        None,
        Some(signup_body("grace@bistro.test", "555-0100")),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 8002);

    let (status, body) = send(
        &app,
        Method::POST,
        "/users/login",
        None,
        Some(json!({"email": "ada@bistro.test", "password": "wrong-password"})),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["message"], "email or password is incorrect");

    let (status, login) = send(
        &app,
        Method::POST,
        "/users/login",
        None,
        Some(json!({"email": "ada@bistro.test", "password": "secret123"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let token = login["token"].as_str().unwrap();
    let user_id = login["user_id"].as_str().unwrap();

    let (status, fetched) = send(
        &app,
        Method::GET,
        &format!("/users/{user_id}"),
        Some(token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["email"], "ada@bistro.test");
    assert_eq!(fetched["token"], login["token"]);
    assert!(fetched.get("password").is_none());

    let (status, page) = send(&app, Method::GET, "/users", Some(token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["total_count"], 1);
    assert_eq!(page["user_items"].as_array().unwrap().len(), 1);
    assert!(page["user_items"][0].get("password").is_none());

    // refresh tokens are not access tokens
    let refresh = login["refresh_token"].as_str().unwrap();
    let (status, _) = send(&app, Method::GET, "/users", Some(refresh), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_signup_validation_failure() {
    let app = app();
    let (status, body) = send(
        &app,
        Method::POST,
        "/users/signup",
        None,
        Some(json!({
            "first_name": "A",
            "last_name": "Lovelace",
            "password": "123",
            "email": "nope",
            "phone": "555"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let fields = body["details"]["fields"].as_object().unwrap();
    assert!(fields.contains_key("first_name"));
    assert!(fields.contains_key("password"));
    assert!(fields.contains_key("email"));
}

#[tokio::test]
async fn test_food_lifecycle() {
    let app = app();
    let token = token_for(&app).await;

    let menu = create(
        &app,
        &token,
        "/menus",
        json!({"name": "Dinner", "category": "mains"}),
    )
    .await;
    let menu_id = menu["menu_id"].as_str().unwrap();

    let food = create(
        &app,
        &token,
        "/foods",
        json!({"name": "Ramen", "price": 9.999, "food_image": "ramen.png", "menu_id": menu_id}),
    )
    .await;
    let food_id = food["food_id"].as_str().unwrap();

    let (status, fetched) = send(
        &app,
        Method::GET,
        &format!("/foods/{food_id}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["price"], 10.0);
    assert_eq!(fetched["menu_id"], menu_id);

    // update keeps the price as sent
    let (status, updated) = send(
        &app,
        Method::PATCH,
        &format!("/foods/{food_id}"),
        Some(&token),
        Some(json!({"price": 12.345})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["price"], 12.345);
    assert_eq!(updated["name"], "Ramen");

    let (status, body) = send(
        &app,
        Method::POST,
        "/foods",
        Some(&token),
        Some(json!({"name": "Soba", "price": 8.0, "food_image": "soba.png", "menu_id": "missing"})),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["message"], "menu not found");

    let (status, body) = send(
        &app,
        Method::POST,
        "/foods",
        Some(&token),
        Some(json!({"name": "S", "price": 8.0, "food_image": "soba.png", "menu_id": menu_id})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["details"]["fields"]["name"].is_array());

    let request = Request::builder()
        .method(Method::POST)
        .uri("/foods")
        .header("token", token.as_str())
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, Method::GET, "/foods/unknown", Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_out_of_range_prices_are_rejected() {
    let app = app();
    let token = token_for(&app).await;

    let menu = create(
        &app,
        &token,
        "/menus",
        json!({"name": "Dinner", "category": "mains"}),
    )
    .await;
    let menu_id = menu["menu_id"].as_str().unwrap();
    let food = create(
        &app,
        &token,
        "/foods",
        json!({"name": "Bread", "price": 1.0, "food_image": "bread.png", "menu_id": menu_id}),
    )
    .await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/foods",
        Some(&token),
        Some(json!({"name": "Caviar", "price": 1e307, "food_image": "c.png", "menu_id": menu_id})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["details"]["fields"]["price"].is_array());

    let (status, _) = send(
        &app,
        Method::PATCH,
        &format!("/foods/{}", food["food_id"].as_str().unwrap()),
        Some(&token),
        Some(json!({"price": 1e307})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, page) = send(&app, Method::GET, "/foods", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["total_count"], 1);
    assert_eq!(page["food_items"][0]["price"], 1.0);

    let table = create(
        &app,
        &token,
        "/tables",
        json!({"number_of_guests": 2, "table_number": 3}),
    )
    .await;
    let (status, _) = send(
        &app,
        Method::POST,
        "/order-items",
        Some(&token),
        Some(json!({
            "table_id": table["table_id"],
            "order_items": [{"food_id": food["food_id"], "quantity": 1, "unit_price": 1e307}]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, items) = send(&app, Method::GET, "/order-items", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(items, json!([]));
}

#[tokio::test]
async fn test_food_pagination() {
    let app = app();
    let token = token_for(&app).await;

    let (status, empty) = send(&app, Method::GET, "/foods", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(empty, json!({"total_count": 0, "food_items": []}));

    let menu = create(
        &app,
        &token,
        "/menus",
        json!({"name": "Lunch", "category": "mains"}),
    )
    .await;
    for n in 0..5 {
        create(
            &app,
            &token,
            "/foods",
            json!({
                "name": format!("Dish {n}"),
                "price": 5.0,
                "food_image": "dish.png",
                "menu_id": menu["menu_id"]
            }),
        )
        .await;
    }

    let (status, page) = send(
        &app,
        Method::GET,
        "/foods?recordPerPage=2&page=2",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["total_count"], 5);
    let names: Vec<&str> = page["food_items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Dish 2", "Dish 3"]);

    let (_, page) = send(
        &app,
        Method::GET,
        "/foods?recordPerPage=zero&page=-1",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(page["food_items"].as_array().unwrap().len(), 5);
}

#[tokio::test]
async fn test_menu_window_check() {
    let app = app();
    let token = token_for(&app).await;

    let menu = create(
        &app,
        &token,
        "/menus",
        json!({"name": "Brunch", "category": "weekend"}),
    )
    .await;
    let uri = format!("/menus/{}", menu["menu_id"].as_str().unwrap());
    let now = chrono::Utc::now();

    let (status, body) = send(
        &app,
        Method::PATCH,
        &uri,
        Some(&token),
        Some(json!({
            "start_date": now - chrono::Duration::hours(1),
            "end_date": now + chrono::Duration::hours(1)
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "kindly retype the time");

    let (status, body) = send(
        &app,
        Method::PATCH,
        &uri,
        Some(&token),
        Some(json!({
            "name": "Late Brunch",
            "start_date": now + chrono::Duration::hours(1),
            "end_date": now + chrono::Duration::hours(2)
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Late Brunch");
    assert_eq!(body["category"], "weekend");
    assert!(body["start_date"].is_string());
}

#[tokio::test]
async fn test_order_batch_aggregation_and_invoice() {
    let app = app();
    let token = token_for(&app).await;

    let table = create(
        &app,
        &token,
        "/tables",
        json!({"number_of_guests": 4, "table_number": 7}),
    )
    .await;
    let menu = create(
        &app,
        &token,
        "/menus",
        json!({"name": "Dinner", "category": "mains"}),
    )
    .await;
    let ramen = create(
        &app,
        &token,
        "/foods",
        json!({"name": "Ramen", "price": 10.0, "food_image": "r.png", "menu_id": menu["menu_id"]}),
    )
    .await;
    let gyoza = create(
        &app,
        &token,
        "/foods",
        json!({"name": "Gyoza", "price": 15.5, "food_image": "g.png", "menu_id": menu["menu_id"]}),
    )
    .await;

    let placed = create(
        &app,
        &token,
        "/order-items",
        json!({
            "table_id": table["table_id"],
            "order_items": [
                {"food_id": ramen["food_id"], "quantity": 3, "unit_price": 10.004},
                {"food_id": gyoza["food_id"], "quantity": 2, "unit_price": 15.5}
            ]
        }),
    )
    .await;
    let order_id = placed["order"]["order_id"].as_str().unwrap().to_string();
    assert_eq!(placed["order"]["table_id"], table["table_id"]);
    assert_eq!(placed["order_items"][0]["unit_price"], 10.0);

    let (status, groups) = send(
        &app,
        Method::GET,
        &format!("/order-items/order/{order_id}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(groups.as_array().unwrap().len(), 1);
    assert_eq!(groups[0]["payment_due"], 25.5);
    assert_eq!(groups[0]["total_count"], 2);
    assert_eq!(groups[0]["table_number"], 7);

    let invoice = create(
        &app,
        &token,
        "/invoices",
        json!({"order_id": order_id, "payment_status": "PENDING"}),
    )
    .await;

    let order_created: chrono::DateTime<chrono::Utc> =
        serde_json::from_value(placed["order"]["created_at"].clone()).unwrap();
    let due: chrono::DateTime<chrono::Utc> =
        serde_json::from_value(invoice["payment_due_date"].clone()).unwrap();
    assert_eq!(due - order_created, chrono::Duration::days(1));

    let (status, view) = send(
        &app,
        Method::GET,
        &format!("/invoices/{}", invoice["invoice_id"].as_str().unwrap()),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(view["payment_method"], "null");
    assert_eq!(view["payment_status"], "PENDING");
    assert_eq!(view["payment_due"], 25.5);
    assert_eq!(view["table_number"], 7);
    assert_eq!(view["order_details"].as_array().unwrap().len(), 2);

    let (status, body) = send(
        &app,
        Method::POST,
        "/invoices",
        Some(&token),
        Some(json!({"order_id": "missing", "payment_status": "PAID"})),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["message"], "order not found");
}

#[tokio::test]
async fn test_invalid_batch_writes_nothing() {
    let app = app();
    let token = token_for(&app).await;

    let table = create(
        &app,
        &token,
        "/tables",
        json!({"number_of_guests": 2, "table_number": 1}),
    )
    .await;

    let (status, _) = send(
        &app,
        Method::POST,
        "/order-items",
        Some(&token),
        Some(json!({
            "table_id": table["table_id"],
            "order_items": [
                {"food_id": "f-1", "quantity": 1, "unit_price": 3.0},
                {"food_id": "f-2", "quantity": 0, "unit_price": 3.0}
            ]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(
        &app,
        Method::POST,
        "/order-items",
        Some(&token),
        Some(json!({
            "table_id": "no-such-table",
            "order_items": [{"food_id": "f-1", "quantity": 1, "unit_price": 3.0}]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["message"], "table not found");

    let (status, orders) = send(&app, Method::GET, "/orders", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(orders, json!([]));

    let (status, items) = send(&app, Method::GET, "/order-items", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(items, json!([]));
}

#[tokio::test]
async fn test_failed_item_write_leaves_the_order() {
    let backend = Arc::new(BrokenItemWrites::default());
    let store = Store::new(backend.clone(), Store::DEFAULT_TIMEOUT);
    let app = app_with_store(store);
    let token = token_for(&app).await;

    let table = create(
        &app,
        &token,
        "/tables",
        json!({"number_of_guests": 4, "table_number": 9}),
    )
    .await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/order-items",
        Some(&token),
        Some(json!({
            "table_id": table["table_id"],
            "order_items": [{"food_id": "f-1", "quantity": 2, "unit_price": 3.0}]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["code"], 9002);

    let orders = backend.find(ORDERS, &Filter::all()).await.unwrap();
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0]["table_id"], table["table_id"]);
    assert!(backend.find(ORDER_ITEMS, &Filter::all()).await.unwrap().is_empty());

    let (status, listed) = send(&app, Method::GET, "/orders", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed.as_array().unwrap().len(), 1);
}

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use printshop_api::{app, AppState};
use printshop_order::StatusPolicy;
use printshop_store::{BusinessRules, EventBus, MemoryStore};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::util::ServiceExt;

fn test_app(policy: StatusPolicy) -> Router {
    let rules = BusinessRules {
        status_policy: policy,
        ..BusinessRules::default()
    };
    let state = AppState::in_memory(Arc::new(MemoryStore::new()), rules, EventBus::new(16));
    app(state)
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

/// Money fields go over the wire as decimal strings
fn money(value: &Value) -> Decimal {
    match value {
        Value::String(s) => s.parse().unwrap(),
        Value::Number(n) => n.to_string().parse().unwrap(),
        other => panic!("not a money value: {}", other),
    }
}

async fn create_client(app: &Router) -> String {
    let (status, body) = send(
        app,
        "POST",
        "/v1/clients",
        Some(json!({
            "name": "João Silva",
            "email": "joao.silva@email.com",
            "phone": "(11) 98765-4321",
            "company": "Empresa ABC Ltda",
            "address": "Rua das Flores, 123",
            "city": "São Paulo",
            "state": "sp",
            "zipcode": "01234-567"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["id"].as_str().unwrap().to_string()
}

async fn create_order(app: &Router, client_id: &str) -> String {
    let (status, body) = send(
        app,
        "POST",
        "/v1/orders",
        Some(json!({
            "client_id": client_id,
            "items": [
                { "product": "Banner Lona 440g", "quantity": 2, "unit_price": 150 },
                { "product": "Cartão de Visita", "quantity": 5, "unit_price": 45 }
            ],
            "discount": 25
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["number"], "PED-001");
    assert_eq!(money(&body["total"]), dec!(500));
    body["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_health() {
    let app = test_app(StatusPolicy::Open);
    let (status, body) = send(&app, "GET", "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_client_crud_and_status_toggle() {
    let app = test_app(StatusPolicy::Open);
    let id = create_client(&app).await;

    let (status, body) = send(&app, "GET", &format!("/v1/clients/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["state"], "SP");
    assert_eq!(body["status"], "active");
    assert_eq!(
        body["full_address"],
        "Rua das Flores, 123, São Paulo/SP, CEP 01234-567"
    );

    let (status, body) = send(&app, "PUT", &format!("/v1/clients/{}/status", id), Some(json!({}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "inactive");

    let (_, body) = send(&app, "GET", "/v1/clients?status=inactive", None).await;
    assert_eq!(body.as_array().unwrap().len(), 1);
    let (_, body) = send(&app, "GET", "/v1/clients?status=all&search=abc", None).await;
    assert_eq!(body.as_array().unwrap().len(), 1);

    let (status, _) = send(&app, "DELETE", &format!("/v1/clients/{}", id), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, body) = send(&app, "GET", &format!("/v1/clients/{}", id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].as_str().unwrap().contains("not found"));
}

#[tokio::test]
async fn test_client_validation() {
    let app = test_app(StatusPolicy::Open);
    let (status, body) = send(
        &app,
        "POST",
        "/v1/clients",
        Some(json!({ "name": "Maria", "email": "not-an-email", "phone": "(21) 98765-4321" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_slug_preview_and_duplicate_category() {
    let app = test_app(StatusPolicy::Open);

    let (status, body) = send(&app, "GET", "/v1/categories/slug?name=Impress%C3%A3o%20Digital", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["slug"], "impresso-digital");

    let category = json!({ "name": "Impressão Digital" });
    let (status, body) = send(&app, "POST", "/v1/categories", Some(category.clone())).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["slug"], "impresso-digital");

    let (status, _) = send(&app, "POST", "/v1/categories", Some(category)).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_quote_totals_accept_text_inputs() {
    let app = test_app(StatusPolicy::Open);
    let client_id = create_client(&app).await;

    let (status, body) = send(
        &app,
        "POST",
        "/v1/quotes",
        Some(json!({
            "client_id": client_id,
            "items": [
                { "product": "Banner Lona 440g", "quantity": "2", "unit_price": "150" },
                { "product": "Cartão de Visita", "quantity": 5, "unit_price": "45,00" }
            ],
            "discount": "25"
        })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["number"], "ORC-001");
    assert_eq!(body["status"], "pending");
    assert_eq!(body["status_label"], "Pendente");
    assert_eq!(body["client_name"], "João Silva");
    assert_eq!(money(&body["subtotal"]), dec!(525));
    assert_eq!(money(&body["total"]), dec!(500));
}

#[tokio::test]
async fn test_discount_above_subtotal_goes_negative() {
    let app = test_app(StatusPolicy::Open);
    let client_id = create_client(&app).await;

    let (status, body) = send(
        &app,
        "POST",
        "/v1/quotes",
        Some(json!({
            "client_id": client_id,
            "items": [{ "product": "Adesivo", "quantity": 1, "unit_price": 50 }],
            "discount": 80
        })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(money(&body["total"]), dec!(-30));
}

#[tokio::test]
async fn test_negative_quantity_is_rejected() {
    let app = test_app(StatusPolicy::Open);
    let client_id = create_client(&app).await;

    let (status, _) = send(
        &app,
        "POST",
        "/v1/quotes",
        Some(json!({
            "client_id": client_id,
            "items": [{ "product": "Adesivo", "quantity": -3, "unit_price": 50 }]
        })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_quote_for_unknown_client_is_rejected() {
    let app = test_app(StatusPolicy::Open);
    let (status, _) = send(
        &app,
        "POST",
        "/v1/quotes",
        Some(json!({ "client_id": uuid::Uuid::new_v4(), "items": [] })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_convert_quote_to_order() {
    let app = test_app(StatusPolicy::Open);
    let client_id = create_client(&app).await;

    let (_, quote) = send(
        &app,
        "POST",
        "/v1/quotes",
        Some(json!({
            "client_id": client_id,
            "items": [
                { "product": "Banner Lona 440g", "quantity": 2, "unit_price": 150 },
                { "product": "Cartão de Visita", "quantity": 5, "unit_price": 45 }
            ],
            "discount": 25
        })),
    )
    .await;
    let quote_id = quote["id"].as_str().unwrap();

    let (status, order) = send(&app, "POST", &format!("/v1/quotes/{}/order", quote_id), Some(json!({}))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(order["number"], "PED-001");
    assert_eq!(order["status"], "new");
    assert_eq!(order["quote_id"], quote_id);
    assert_eq!(money(&order["total"]), dec!(500));

    let (_, quote) = send(&app, "GET", &format!("/v1/quotes/{}", quote_id), None).await;
    assert_eq!(quote["status"], "approved");

    let (_, orders) = send(&app, "GET", "/v1/orders?status=all&payment_status=pending", None).await;
    assert_eq!(orders.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_rejected_quote_cannot_be_converted() {
    let app = test_app(StatusPolicy::Open);
    let client_id = create_client(&app).await;

    let (_, quote) = send(&app, "POST", "/v1/quotes", Some(json!({ "client_id": client_id }))).await;
    let quote_id = quote["id"].as_str().unwrap();

    let (status, _) = send(
        &app,
        "PUT",
        &format!("/v1/quotes/{}/status", quote_id),
        Some(json!({ "status": "rejected" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&app, "POST", &format!("/v1/quotes/{}/order", quote_id), Some(json!({}))).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_open_policy_allows_any_status() {
    let app = test_app(StatusPolicy::Open);
    let client_id = create_client(&app).await;
    let order_id = create_order(&app, &client_id).await;
    let uri = format!("/v1/orders/{}/status", order_id);

    let (status, body) = send(&app, "PUT", &uri, Some(json!({ "status": "canceled", "user": "Ana" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status_label"], "Cancelado");

    let (status, body) = send(&app, "PUT", &uri, Some(json!({ "status": "production" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "production");

    let (status, timeline) = send(&app, "GET", &format!("/v1/orders/{}/timeline", order_id), None).await;
    assert_eq!(status, StatusCode::OK);
    let timeline = timeline.as_array().unwrap();
    assert_eq!(timeline.len(), 3);
    let users: Vec<&str> = timeline.iter().filter_map(|e| e["user"].as_str()).collect();
    assert!(users.contains(&"Ana"));
    assert!(users.contains(&"Sistema"));
}

#[tokio::test]
async fn test_guarded_policy_rejects_leaving_canceled() {
    let app = test_app(StatusPolicy::Guarded);
    let client_id = create_client(&app).await;
    let order_id = create_order(&app, &client_id).await;
    let uri = format!("/v1/orders/{}/status", order_id);

    let (status, _) = send(&app, "PUT", &uri, Some(json!({ "status": "canceled" }))).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&app, "PUT", &uri, Some(json!({ "status": "production" }))).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["error"].as_str().unwrap().contains("canceled"));
}

#[tokio::test]
async fn test_payments_settle_order() {
    let app = test_app(StatusPolicy::Open);
    let client_id = create_client(&app).await;
    let order_id = create_order(&app, &client_id).await;
    let uri = format!("/v1/orders/{}/payments", order_id);

    let (status, body) = send(&app, "POST", &uri, Some(json!({ "amount": 250, "method": "PIX" }))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["payment_status"], "partial");
    assert_eq!(money(&body["balance"]), dec!(250));

    let (status, body) = send(&app, "POST", &uri, Some(json!({ "amount": "250.00", "method": "Dinheiro" }))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["payment_status"], "paid");
    assert_eq!(money(&body["total_paid"]), dec!(500));
    assert_eq!(body["payments"].as_array().unwrap().len(), 2);

    let (_, order) = send(&app, "GET", &format!("/v1/orders/{}", order_id), None).await;
    assert_eq!(order["payment_status_label"], "Pago");
    assert_eq!(money(&order["balance"]), dec!(0));
}

#[tokio::test]
async fn test_zero_payment_is_rejected() {
    let app = test_app(StatusPolicy::Open);
    let client_id = create_client(&app).await;
    let order_id = create_order(&app, &client_id).await;

    let (status, _) = send(
        &app,
        "POST",
        &format!("/v1/orders/{}/payments", order_id),
        Some(json!({ "amount": 0, "method": "PIX" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_unknown_order_is_not_found() {
    let app = test_app(StatusPolicy::Open);
    let id = uuid::Uuid::new_v4();

    let (status, _) = send(&app, "GET", &format!("/v1/orders/{}", id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(
        &app,
        "PUT",
        &format!("/v1/orders/{}/status", id),
        Some(json!({ "status": "production" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_invalid_filter_is_rejected() {
    let app = test_app(StatusPolicy::Open);
    let (status, _) = send(&app, "GET", "/v1/orders?status=shipped", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_dashboard_counts() {
    let app = test_app(StatusPolicy::Open);
    let client_id = create_client(&app).await;
    create_order(&app, &client_id).await;

    let (status, body) = send(&app, "GET", "/v1/dashboard", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["counts"]["clients"], 1);
    assert_eq!(body["counts"]["open_orders"], 1);
    assert_eq!(money(&body["revenue"]), dec!(500));
    assert_eq!(body["recent_orders"].as_array().unwrap().len(), 1);
}

async fn create_product(app: &Router, body: Value) -> Value {
    let (status, product) = send(app, "POST", "/v1/products", Some(body)).await;
    assert_eq!(status, StatusCode::CREATED);
    product
}

#[tokio::test]
async fn test_product_crud() {
    let app = test_app(StatusPolicy::Open);
    let product = create_product(
        &app,
        json!({
            "name": "Papel Couché 150g",
            "sku": "PAP-150",
            "product_type": "product",
            "price": 100,
            "cost": 60,
            "stock": 50,
            "min_stock": 10
        }),
    )
    .await;
    let id = product["id"].as_str().unwrap();
    assert_eq!(money(&product["margin"]), dec!(40));
    assert_eq!(product["stock_level"], "in_stock");

    let (status, body) = send(
        &app,
        "PUT",
        &format!("/v1/products/{}", id),
        Some(json!({
            "name": "Papel Couché 170g",
            "sku": "PAP-170",
            "product_type": "product",
            "price": 120,
            "cost": 60,
            "stock": 5,
            "min_stock": 10
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Papel Couché 170g");
    assert_eq!(money(&body["margin"]), dec!(50));
    assert_eq!(body["stock_level"], "low_stock");

    let (_, list) = send(&app, "GET", "/v1/products?stock=low_stock", None).await;
    assert_eq!(list.as_array().unwrap().len(), 1);

    let (status, _) = send(&app, "DELETE", &format!("/v1/products/{}", id), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = send(&app, "GET", &format!("/v1/products/{}", id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_service_drops_submitted_stock() {
    let app = test_app(StatusPolicy::Open);
    let service = create_product(
        &app,
        json!({
            "name": "Criação de Arte",
            "sku": "SRV-ART",
            "product_type": "service",
            "price": 120,
            "stock": 30,
            "min_stock": 5
        }),
    )
    .await;

    assert_eq!(service["stock"], Value::Null);
    assert_eq!(service["min_stock"], 0);
    assert_eq!(service["stock_level"], "not_tracked");
    assert_eq!(money(&service["margin"]), dec!(100));

    let (status, _) = send(
        &app,
        "POST",
        &format!("/v1/products/{}/stock", service["id"].as_str().unwrap()),
        Some(json!({ "kind": "in", "quantity": 5 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_variation_routes() {
    let app = test_app(StatusPolicy::Open);
    let product = create_product(
        &app,
        json!({ "name": "Cartão de Visita", "sku": "CV-001", "product_type": "product", "price": 45, "stock": 100 }),
    )
    .await;
    let uri = format!("/v1/products/{}/variations", product["id"].as_str().unwrap());

    let (status, variation) = send(
        &app,
        "POST",
        &uri,
        Some(json!({ "name": "Verniz Localizado", "price": 80, "cost": 40 })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(money(&variation["margin"]), dec!(50));
    let variation_uri = format!("{}/{}", uri, variation["id"].as_str().unwrap());

    let (status, body) = send(
        &app,
        "PUT",
        &variation_uri,
        Some(json!({ "name": "Verniz Total", "price": 100, "cost": 40 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Verniz Total");
    assert_eq!(money(&body["margin"]), dec!(60));

    let (status, list) = send(&app, "GET", &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list.as_array().unwrap().len(), 1);

    let (status, _) = send(&app, "DELETE", &variation_uri, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (_, list) = send(&app, "GET", &uri, None).await;
    assert!(list.as_array().unwrap().is_empty());

    let (status, _) = send(&app, "DELETE", &variation_uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_stock_movements() {
    let app = test_app(StatusPolicy::Open);
    let product = create_product(
        &app,
        json!({ "name": "Lona 440g", "sku": "LON-440", "product_type": "product", "price": 60, "stock": 20, "min_stock": 10 }),
    )
    .await;
    let uri = format!("/v1/products/{}/stock", product["id"].as_str().unwrap());

    let (status, body) = send(&app, "POST", &uri, Some(json!({ "kind": "out", "quantity": 15, "reason": "Pedido PED-001" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["movement"]["stock_before"], 20);
    assert_eq!(body["movement"]["stock_after"], 5);
    assert_eq!(body["product"]["stock_level"], "low_stock");

    let (status, _) = send(&app, "POST", &uri, Some(json!({ "kind": "out", "quantity": 6 }))).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, body) = send(&app, "POST", &uri, Some(json!({ "kind": "adjustment", "quantity": 30 }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["product"]["stock"], 30);

    let (status, history) = send(&app, "GET", &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    let history = history.as_array().unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0]["kind"], "adjustment");
}

#[tokio::test]
async fn test_sized_price() {
    let app = test_app(StatusPolicy::Open);
    let product = create_product(
        &app,
        json!({
            "name": "Banner Lona 440g",
            "sku": "BAN-440",
            "product_type": "product",
            "price": 150,
            "stock": 10,
            "pricing": { "width": true, "height": true, "unit": "m²", "base_price": 75 }
        }),
    )
    .await;
    let uri = format!("/v1/products/{}/price", product["id"].as_str().unwrap());

    let (status, body) = send(&app, "GET", &format!("{}?width=2&height=1.5", uri), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(money(&body["measure"]), dec!(3));
    assert_eq!(money(&body["price"]), dec!(225));

    let (status, _) = send(&app, "GET", &format!("{}?width=-1", uri), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_product_statistics_count_order_lines() {
    let app = test_app(StatusPolicy::Open);
    let client_id = create_client(&app).await;
    let product = create_product(
        &app,
        json!({ "name": "Adesivo Vinil", "sku": "ADV-001", "product_type": "product", "price": 45, "cost": 15, "stock": 100 }),
    )
    .await;
    let product_id = product["id"].as_str().unwrap();

    let (status, _) = send(
        &app,
        "POST",
        "/v1/orders",
        Some(json!({
            "client_id": client_id,
            "items": [
                { "product_id": product_id, "quantity": 4 },
                { "product": "Outro Item", "quantity": 1, "unit_price": 10 }
            ]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, stats) = send(&app, "GET", &format!("/v1/products/{}/statistics", product_id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stats["name"], "Adesivo Vinil");
    assert_eq!(stats["units_sold"], 4);
    assert_eq!(stats["order_count"], 1);
    assert_eq!(money(&stats["revenue"]), dec!(180));
}

#[tokio::test]
async fn test_print_views_and_notes() {
    let app = test_app(StatusPolicy::Open);
    let client_id = create_client(&app).await;

    let (_, quote) = send(
        &app,
        "POST",
        "/v1/quotes",
        Some(json!({
            "client_id": client_id,
            "items": [{ "product": "Banner Lona 440g", "quantity": 2, "unit_price": 150 }]
        })),
    )
    .await;
    let (status, doc) = send(&app, "GET", &format!("/v1/quotes/{}/print", quote["id"].as_str().unwrap()), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(doc["title"], "Orçamento");
    assert_eq!(doc["number"], "ORC-001");
    assert_eq!(doc["client"]["name"], "João Silva");
    assert_eq!(doc["lines"].as_array().unwrap().len(), 1);

    let order_id = create_order(&app, &client_id).await;
    let (status, doc) = send(&app, "GET", &format!("/v1/orders/{}/print", order_id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(doc["title"], "Pedido");
    assert_eq!(doc["number"], "PED-001");
    let labels: Vec<&str> = doc["fields"].as_array().unwrap().iter().filter_map(|f| f["label"].as_str()).collect();
    assert!(labels.contains(&"Valor pago"));

    let notes = format!("/v1/orders/{}/notes", order_id);
    let (status, note) = send(&app, "POST", &notes, Some(json!({ "text": "Cliente pediu urgência", "user": "Ana" }))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(note["kind"], "note");
    assert_eq!(note["user"], "Ana");

    let (status, _) = send(&app, "POST", &notes, Some(json!({ "text": "" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, timeline) = send(&app, "GET", &format!("/v1/orders/{}/timeline", order_id), None).await;
    assert!(timeline.as_array().unwrap().iter().any(|e| e["kind"] == "note"));
}

#[tokio::test]
async fn test_overdue_range_is_rejected_for_quotes() {
    let app = test_app(StatusPolicy::Open);

    let (status, body) = send(&app, "GET", "/v1/quotes?date_range=overdue", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("orders"));

    let (status, _) = send(&app, "GET", "/v1/quotes?date_range=month", None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = send(&app, "GET", "/v1/orders?date_range=overdue", None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_editing_items_updates_payment_status() {
    let app = test_app(StatusPolicy::Open);
    let client_id = create_client(&app).await;
    let order_id = create_order(&app, &client_id).await;

    let (_, body) = send(
        &app,
        "POST",
        &format!("/v1/orders/{}/payments", order_id),
        Some(json!({ "amount": 500, "method": "PIX" })),
    )
    .await;
    assert_eq!(body["payment_status"], "paid");

    let (status, order) = send(
        &app,
        "PUT",
        &format!("/v1/orders/{}", order_id),
        Some(json!({
            "client_id": client_id,
            "items": [
                { "product": "Banner Lona 440g", "quantity": 4, "unit_price": 150 },
                { "product": "Cartão de Visita", "quantity": 5, "unit_price": 45 }
            ],
            "discount": 25
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(money(&order["total"]), dec!(800));
    assert_eq!(order["payment_status"], "partial");
    assert_eq!(money(&order["balance"]), dec!(300));
}

#[tokio::test]
async fn test_out_of_range_quote_is_rejected() {
    let app = test_app(StatusPolicy::Open);
    let client_id = create_client(&app).await;

    let (status, body) = send(
        &app,
        "POST",
        "/v1/quotes",
        Some(json!({
            "client_id": client_id,
            "items": [{ "product": "Banner", "quantity": "9000000000000000000", "unit_price": "100000000000" }]
        })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
    let (_, quotes) = send(&app, "GET", "/v1/quotes", None).await;
    assert!(quotes.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_out_of_range_payments_are_rejected() {
    let app = test_app(StatusPolicy::Open);
    let client_id = create_client(&app).await;
    let order_id = create_order(&app, &client_id).await;
    let uri = format!("/v1/orders/{}/payments", order_id);
    let amount = json!({ "amount": "50000000000000000000000000000", "method": "PIX" });

    let (status, _) = send(&app, "POST", &uri, Some(amount.clone())).await;
    assert_eq!(status, StatusCode::CREATED);
    let (status, _) = send(&app, "POST", &uri, Some(amount)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(&app, "GET", &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["payments"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_receiving_past_the_stock_limit_is_rejected() {
    let app = test_app(StatusPolicy::Open);
    let product = create_product(
        &app,
        json!({ "name": "Papel A4", "sku": "PAP-A4", "product_type": "product", "price": 30, "stock": 1 }),
    )
    .await;
    let uri = format!("/v1/products/{}/stock", product["id"].as_str().unwrap());

    let (status, _) = send(&app, "POST", &uri, Some(json!({ "kind": "in", "quantity": i64::MAX }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, history) = send(&app, "GET", &uri, None).await;
    assert!(history.as_array().unwrap().is_empty());
}

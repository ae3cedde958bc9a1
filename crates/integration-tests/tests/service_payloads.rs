//! Integration tests pinning request and response shapes on the wire.

#![allow(clippy::unwrap_used)]

use folio_client::{BookQuery, OrderInput, OrderItem, PaymentResult, ShippingAddress};
use folio_core::{BookId, CategoryId, OrderId, OrderStatus, Role};
use folio_integration_tests::TestContext;
use rust_decimal::Decimal;
use serde_json::json;
use wiremock::matchers::{body_json, header, header_exists, method, path, query_param};
use wiremock::{Mock, ResponseTemplate};

const DUNE: &str = "665f1c2e9b1d8c3a5e7f0b01";
const ORDER: &str = "665f1c2e9b1d8c3a5e7f0c01";

fn shipping_address() -> ShippingAddress {
    ShippingAddress {
        name: "Ada Lovelace".to_string(),
        street: "12 Byron Row".to_string(),
        city: "London".to_string(),
        state: "LDN".to_string(),
        zip_code: "NW1 8XY".to_string(),
        country: "UK".to_string(),
    }
}

fn order_json() -> serde_json::Value {
    json!({
        "_id": ORDER,
        "user": "665f1c2e9b1d8c3a5e7f0a12",
        "orderItems": [
            {
                "book": DUNE,
                "title": "Dune",
                "image": "/images/book.jpg",
                "price": 13.49,
                "quantity": 2
            }
        ],
        "shippingAddress": {
            "name": "Ada Lovelace",
            "street": "12 Byron Row",
            "city": "London",
            "state": "LDN",
            "zipCode": "NW1 8XY",
            "country": "UK"
        },
        "paymentMethod": "PayPal",
        "itemsPrice": 26.98,
        "taxPrice": 2.7,
        "shippingPrice": 4.99,
        "totalPrice": 34.67,
        "isPaid": false,
        "isDelivered": false,
        "status": "pending",
        "createdAt": "2026-01-05T10:00:00.000Z",
        "updatedAt": "2026-01-05T10:00:00.000Z"
    })
}

// =============================================================================
// Transport Headers and Query Strings
// =============================================================================

#[tokio::test]
async fn test_requests_carry_a_request_id_and_the_bearer_token() {
    let ctx = TestContext::start().await;
    ctx.seed_session("T1", "R1", 3600);

    Mock::given(method("GET"))
        .and(path("/users/profile"))
        .and(header("authorization", "Bearer T1"))
        .and(header_exists("x-request-id"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "_id": "665f1c2e9b1d8c3a5e7f0a12",
            "name": "Ada Lovelace",
            "email": "ada@example.com",
            "role": "customer"
        })))
        .expect(1)
        .mount(&ctx.server)
        .await;

    let profile = ctx.client.account().profile().await.unwrap();
    assert_eq!(profile.name, "Ada Lovelace");
}

#[tokio::test]
async fn test_search_sends_every_filter_as_query_params() {
    let ctx = TestContext::start().await;

    Mock::given(method("GET"))
        .and(path("/books"))
        .and(query_param("keyword", "dune"))
        .and(query_param("category", "cat1"))
        .and(query_param("bestseller", "true"))
        .and(query_param("newRelease", "true"))
        .and(query_param("specialOffer", "true"))
        .and(query_param("pageNumber", "3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "books": [],
            "page": 3,
            "pages": 7
        })))
        .expect(1)
        .mount(&ctx.server)
        .await;

    let query = BookQuery {
        keyword: Some("dune".to_string()),
        category: Some(CategoryId::new("cat1")),
        bestseller: true,
        new_release: true,
        special_offer: true,
        page: Some(3),
    };
    let page = ctx.client.books().search(&query).await.unwrap();

    assert!(page.books.is_empty());
    assert_eq!(page.page, 3);
    assert_eq!(page.pages, 7);
}

#[tokio::test]
async fn test_user_listing_filters_by_role() {
    let ctx = TestContext::start().await;
    ctx.seed_session("T1", "R1", 3600);

    Mock::given(method("GET"))
        .and(path("/users"))
        .and(query_param("role", "admin"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "_id": "665f1c2e9b1d8c3a5e7f0a20",
                "name": "Store Staff",
                "email": "staff@example.com",
                "role": "admin",
                "isAdmin": true
            }
        ])))
        .expect(1)
        .mount(&ctx.server)
        .await;

    let users = ctx.client.users().list(Some(Role::Admin)).await.unwrap();

    assert_eq!(users.len(), 1);
    assert_eq!(users[0].role, Some(Role::Admin));
}

// =============================================================================
// Order Lifecycle Payloads
// =============================================================================

#[tokio::test]
async fn test_placing_an_order_sends_the_full_payload() {
    let ctx = TestContext::start().await;
    ctx.seed_session("T1", "R1", 3600);

    Mock::given(method("POST"))
        .and(path("/orders"))
        .and(body_json(json!({
            "orderItems": [
                {
                    "book": DUNE,
                    "title": "Dune",
                    "image": "/images/book.jpg",
                    "price": 13.49,
                    "quantity": 2
                }
            ],
            "shippingAddress": {
                "name": "Ada Lovelace",
                "street": "12 Byron Row",
                "city": "London",
                "state": "LDN",
                "zipCode": "NW1 8XY",
                "country": "UK"
            },
            "paymentMethod": "PayPal",
            "itemsPrice": 26.98,
            "taxPrice": 2.7,
            "shippingPrice": 4.99,
            "totalPrice": 34.67
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(order_json()))
        .expect(1)
        .mount(&ctx.server)
        .await;

    let input = OrderInput {
        order_items: vec![OrderItem {
            book: BookId::new(DUNE),
            title: "Dune".to_string(),
            image: Some("/images/book.jpg".to_string()),
            price: Decimal::new(1349, 2),
            quantity: 2,
        }],
        shipping_address: shipping_address(),
        payment_method: "PayPal".to_string(),
        items_price: Some(Decimal::new(2698, 2)),
        tax_price: Some(Decimal::new(270, 2)),
        shipping_price: Some(Decimal::new(499, 2)),
        total_price: Decimal::new(3467, 2),
    };
    let order = ctx.client.orders().create(&input).await.unwrap();

    assert_eq!(order.id, OrderId::new(ORDER));
    assert_eq!(order.status, OrderStatus::Pending);
    assert_eq!(order.total_price, Decimal::new(3467, 2));
}

#[tokio::test]
async fn test_marking_an_order_paid_posts_the_payment_result() {
    let ctx = TestContext::start().await;
    ctx.seed_session("T1", "R1", 3600);

    let mut paid = order_json();
    paid["isPaid"] = json!(true);
    paid["paidAt"] = json!("2026-01-05T11:00:00.000Z");
    paid["paymentResult"] = json!({
        "id": "PAYID-123",
        "status": "COMPLETED",
        "update_time": "2026-01-05T11:00:00Z",
        "email_address": "ada@example.com"
    });

    Mock::given(method("PUT"))
        .and(path(format!("/orders/{ORDER}/pay")))
        .and(body_json(json!({
            "id": "PAYID-123",
            "status": "COMPLETED",
            "update_time": "2026-01-05T11:00:00Z",
            "email_address": "ada@example.com"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(paid))
        .expect(1)
        .mount(&ctx.server)
        .await;

    let payment = PaymentResult {
        id: "PAYID-123".to_string(),
        status: "COMPLETED".to_string(),
        update_time: Some("2026-01-05T11:00:00Z".to_string()),
        email_address: Some("ada@example.com".to_string()),
    };
    let order = ctx
        .client
        .orders()
        .pay(&OrderId::new(ORDER), &payment)
        .await
        .unwrap();

    assert!(order.is_paid);
    assert!(order.paid_at.is_some());
}

#[tokio::test]
async fn test_status_updates_send_the_lowercase_status() {
    let ctx = TestContext::start().await;
    ctx.seed_session("T1", "R1", 3600);

    let mut shipped = order_json();
    shipped["status"] = json!("shipped");

    Mock::given(method("PUT"))
        .and(path(format!("/orders/{ORDER}/status")))
        .and(body_json(json!({ "status": "shipped" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(shipped))
        .expect(1)
        .mount(&ctx.server)
        .await;

    let order = ctx
        .client
        .orders()
        .set_status(&OrderId::new(ORDER), OrderStatus::Shipped)
        .await
        .unwrap();

    assert_eq!(order.status, OrderStatus::Shipped);
}

// =============================================================================
// Dashboard Decoding
// =============================================================================

#[tokio::test]
async fn test_dashboard_stats_decode_change_labels() {
    let ctx = TestContext::start().await;
    ctx.seed_session("T1", "R1", 3600);

    Mock::given(method("GET"))
        .and(path("/dashboard/stats"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "books": { "count": 128, "change": "+12%" },
            "users": { "count": 54, "change": "+4%" },
            "orders": { "count": 201, "change": "-2%" },
            "revenue": { "total": 8123.5, "change": "+9%" }
        })))
        .expect(1)
        .mount(&ctx.server)
        .await;

    let stats = ctx.client.dashboard().stats().await.unwrap();

    assert_eq!(stats.books.count, 128);
    assert_eq!(stats.orders.change, "-2%");
    assert_eq!(stats.revenue.total, Decimal::new(81235, 1));
    assert_eq!(stats.revenue.change, "+9%");
}

//! Orders and fulfilment.

use folio_core::{OrderId, OrderStatus};
use tracing::instrument;

use crate::error::ApiError;
use crate::transport::{ApiRequest, Transport};
use crate::types::{Order, OrderInput, PaymentResult};

/// Placing orders and walking them through payment and delivery.
#[derive(Clone)]
pub struct OrdersService {
    transport: Transport,
}

impl OrdersService {
    pub(crate) fn new(transport: Transport) -> Self {
        Self { transport }
    }

    /// Place an order.
    ///
    /// # Errors
    ///
    /// Returns an error if the caller is not authenticated or the
    /// request fails.
    #[instrument(skip_all, fields(lines = input.order_items.len()))]
    pub async fn create(&self, input: &OrderInput) -> Result<Order, ApiError> {
        let request = ApiRequest::post("/orders").json(serde_json::to_value(input)?);
        self.transport.send(request).await
    }

    /// All orders on the platform. Admin only.
    ///
    /// # Errors
    ///
    /// Returns an error if the caller is not an admin or the request
    /// fails.
    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<Order>, ApiError> {
        self.transport.send(ApiRequest::get("/orders")).await
    }

    /// The signed-in user's own orders.
    ///
    /// # Errors
    ///
    /// Returns an error if the caller is not authenticated or the
    /// request fails.
    #[instrument(skip(self))]
    pub async fn mine(&self) -> Result<Vec<Order>, ApiError> {
        self.transport
            .send(ApiRequest::get("/orders/myorders"))
            .await
    }

    /// Fetch one order.
    ///
    /// # Errors
    ///
    /// Returns an error if the order does not exist or the request
    /// fails.
    #[instrument(skip(self), fields(order = %id))]
    pub async fn get(&self, id: &OrderId) -> Result<Order, ApiError> {
        self.transport
            .send(ApiRequest::get(format!("/orders/{id}")))
            .await
    }

    /// Record a payment against an order.
    ///
    /// # Errors
    ///
    /// Returns an error if the order does not exist or the request
    /// fails.
    #[instrument(skip_all, fields(order = %id))]
    pub async fn pay(&self, id: &OrderId, payment: &PaymentResult) -> Result<Order, ApiError> {
        let request =
            ApiRequest::put(format!("/orders/{id}/pay")).json(serde_json::to_value(payment)?);
        self.transport.send(request).await
    }

    /// Mark an order delivered. Admin only.
    ///
    /// # Errors
    ///
    /// Returns an error if the order does not exist, the caller is not
    /// an admin, or the request fails.
    #[instrument(skip(self), fields(order = %id))]
    pub async fn deliver(&self, id: &OrderId) -> Result<Order, ApiError> {
        self.transport
            .send(ApiRequest::put(format!("/orders/{id}/deliver")))
            .await
    }

    /// Move an order to a new fulfilment status. Admin only.
    ///
    /// # Errors
    ///
    /// Returns an error if the order does not exist, the caller is not
    /// an admin, or the request fails.
    #[instrument(skip(self), fields(order = %id, status = %status))]
    pub async fn set_status(&self, id: &OrderId, status: OrderStatus) -> Result<Order, ApiError> {
        let request = ApiRequest::put(format!("/orders/{id}/status"))
            .json(serde_json::json!({ "status": status }));
        self.transport.send(request).await
    }
}

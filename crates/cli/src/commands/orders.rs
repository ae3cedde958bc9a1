//! Order commands.
//!
//! # Usage
//!
//! ```bash
//! folio orders checkout --name "Jane Doe" --street "1 Main St" \
//!     --city Springfield --state IL --zip 62704 --country USA
//! folio orders mine
//! folio orders show 665f1c2e9b1d8c3a5e7f0a14
//! ```

use folio_client::{ApiError, Client, OrderInput, OrderItem, ShippingAddress, StorageError};
use folio_core::{BookId, OrderId};
use rust_decimal::Decimal;
use thiserror::Error;

/// Errors that can occur while placing an order.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// Nothing in the cart to check out.
    #[error("Cart is empty; add books before checking out")]
    EmptyCart,

    /// A cart line points at a book the backend no longer has.
    #[error("Book {0} is no longer listed; remove it from the cart")]
    Unavailable(BookId),

    /// The backend rejected the order or a lookup failed.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Reading or clearing the cart failed.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Place an order from the current cart, then empty the cart.
///
/// Prices each line at the backend's current price. Shipping is free
/// over $35 (otherwise $4.99) and tax is 10%, matching the storefront.
///
/// # Errors
///
/// Returns an error if the cart is empty, a book is gone, or the
/// order is rejected.
pub async fn checkout(
    client: &Client,
    address: ShippingAddress,
    payment: &str,
) -> Result<(), CheckoutError> {
    let items = client.cart().items()?;
    if items.is_empty() {
        return Err(CheckoutError::EmptyCart);
    }

    let mut order_items = Vec::with_capacity(items.len());
    for item in &items {
        let book = match client.books().get(&item.book_id).await {
            Ok(book) => book,
            Err(ApiError::Api { status, .. }) if status.as_u16() == 404 => {
                return Err(CheckoutError::Unavailable(item.book_id.clone()));
            }
            Err(error) => return Err(error.into()),
        };
        order_items.push(OrderItem {
            book: book.id,
            title: book.title,
            image: Some(book.image),
            price: book.price,
            quantity: item.quantity,
        });
    }

    let items_price: Decimal = order_items
        .iter()
        .map(|item| item.price * Decimal::from(item.quantity))
        .sum();
    let shipping_price = if items_price > Decimal::from(35) {
        Decimal::ZERO
    } else {
        Decimal::new(499, 2)
    };
    let tax_price = (items_price * Decimal::new(1, 1)).round_dp(2);
    let total_price = items_price + shipping_price + tax_price;

    let order = client
        .orders()
        .create(&OrderInput {
            order_items,
            shipping_address: address,
            payment_method: payment.to_owned(),
            items_price: Some(items_price),
            tax_price: Some(tax_price),
            shipping_price: Some(shipping_price),
            total_price,
        })
        .await?;

    client.cart().clear()?;

    tracing::info!("Order {} placed", order.id);
    tracing::info!("  Items: {}", order.order_items.len());
    tracing::info!("  Subtotal: {}", items_price);
    tracing::info!("  Shipping: {}", shipping_price);
    tracing::info!("  Tax: {}", tax_price);
    tracing::info!("  Total: {}", order.total_price);
    Ok(())
}

/// List the signed-in user's orders.
///
/// # Errors
///
/// Returns an error if the caller is not signed in or the request fails.
pub async fn mine(client: &Client) -> Result<(), ApiError> {
    let orders = client.orders().mine().await?;

    if orders.is_empty() {
        tracing::info!("No orders yet");
        return Ok(());
    }

    for order in &orders {
        tracing::info!(
            "  {} - {} on {} ({}, {})",
            order.id,
            order.total_price,
            order.created_at.format("%Y-%m-%d"),
            order.status,
            if order.is_paid { "paid" } else { "unpaid" }
        );
    }
    Ok(())
}

/// Show one order in full.
///
/// # Errors
///
/// Returns an error if the order does not exist or the request fails.
pub async fn show(client: &Client, id: &str) -> Result<(), ApiError> {
    let order = client.orders().get(&OrderId::new(id)).await?;

    tracing::info!("Order {}", order.id);
    tracing::info!("  Placed: {}", order.created_at);
    tracing::info!("  Status: {}", order.status);
    tracing::info!(
        "  Payment: {} ({})",
        order.payment_method,
        if order.is_paid { "paid" } else { "unpaid" }
    );
    if order.is_delivered {
        tracing::info!("  Delivered: yes");
    }
    let address = &order.shipping_address;
    tracing::info!(
        "  Ship to: {}, {}, {}, {} {}, {}",
        address.name,
        address.street,
        address.city,
        address.state,
        address.zip_code,
        address.country
    );
    for item in &order.order_items {
        tracing::info!("  {} x{} @ {}", item.title, item.quantity, item.price);
    }
    tracing::info!("  Total: {}", order.total_price);
    Ok(())
}

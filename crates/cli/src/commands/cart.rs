//! Local cart commands.
//!
//! The cart lives in client-side storage; only `show` talks to the
//! backend, to price the lines.
//!
//! # Usage
//!
//! ```bash
//! folio cart add 665f1c2e9b1d8c3a5e7f0a13 -q 2
//! folio cart show
//! folio cart clear
//! ```

use folio_client::{ApiError, CartItem, Client, StorageError};
use folio_core::BookId;
use rust_decimal::Decimal;

/// Add copies of a book to the cart.
///
/// # Errors
///
/// Returns an error if cart storage fails.
pub fn add(client: &Client, id: &str, quantity: u32) -> Result<(), StorageError> {
    let items = client.cart().add(&BookId::new(id), quantity)?;

    tracing::info!("Added {} x {}", quantity, id);
    summarize(&items);
    Ok(())
}

/// Remove a book from the cart.
///
/// # Errors
///
/// Returns an error if cart storage fails.
pub fn remove(client: &Client, id: &str) -> Result<(), StorageError> {
    let items = client.cart().remove(&BookId::new(id))?;

    tracing::info!("Removed {}", id);
    summarize(&items);
    Ok(())
}

/// Set the quantity of a cart line. Zero removes the line.
///
/// # Errors
///
/// Returns an error if cart storage fails.
pub fn set(client: &Client, id: &str, quantity: u32) -> Result<(), StorageError> {
    let items = client.cart().set_quantity(&BookId::new(id), quantity)?;

    if quantity == 0 {
        tracing::info!("Removed {}", id);
    } else {
        tracing::info!("Set {} to {} copies", id, quantity);
    }
    summarize(&items);
    Ok(())
}

/// Empty the cart.
///
/// # Errors
///
/// Returns an error if cart storage fails.
pub fn clear(client: &Client) -> Result<(), StorageError> {
    client.cart().clear()?;
    tracing::info!("Cart cleared");
    Ok(())
}

/// Show the cart with current prices.
///
/// Books that no longer exist on the backend are flagged and left out
/// of the subtotal.
///
/// # Errors
///
/// Returns an error if cart storage fails or a price lookup fails for
/// a reason other than the book being gone.
pub async fn show(client: &Client) -> Result<(), ApiError> {
    let items = client.cart().items()?;

    if items.is_empty() {
        tracing::info!("Cart is empty");
        return Ok(());
    }

    let mut subtotal = Decimal::ZERO;
    for item in &items {
        match client.books().get(&item.book_id).await {
            Ok(book) => {
                let line = book.price * Decimal::from(item.quantity);
                subtotal += line;
                tracing::info!(
                    "  {} x{} @ {} = {}",
                    book.title,
                    item.quantity,
                    book.price,
                    line
                );
            }
            Err(ApiError::Api { status, .. }) if status.as_u16() == 404 => {
                tracing::warn!(
                    "Book {} is no longer listed; run `folio cart remove {}`",
                    item.book_id,
                    item.book_id
                );
            }
            Err(error) => return Err(error),
        }
    }
    tracing::info!("Subtotal: {}", subtotal);
    Ok(())
}

fn summarize(items: &[CartItem]) {
    let copies: u32 = items.iter().map(|item| item.quantity).sum();
    tracing::info!("  Cart: {} lines, {} copies", items.len(), copies);
}

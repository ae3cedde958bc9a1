//! Catalog browsing commands.
//!
//! # Usage
//!
//! ```bash
//! folio books search --keyword tolkien --page 2
//! folio books show 665f1c2e9b1d8c3a5e7f0a13
//! folio books top
//! ```

use folio_client::{ApiError, Book, BookQuery, Client};
use folio_core::BookId;

/// Search the catalog and list one result page.
///
/// # Errors
///
/// Returns an error if the request fails.
pub async fn search(client: &Client, query: &BookQuery) -> Result<(), ApiError> {
    let page = client.books().search(query).await?;

    if page.books.is_empty() {
        tracing::info!("No books matched");
        return Ok(());
    }

    tracing::info!("Page {} of {}", page.page, page.pages);
    for book in &page.books {
        summarize(book);
    }
    Ok(())
}

/// Show one book in full.
///
/// # Errors
///
/// Returns an error if the book does not exist or the request fails.
pub async fn show(client: &Client, id: &str) -> Result<(), ApiError> {
    let book = client.books().get(&BookId::new(id)).await?;

    tracing::info!("{} by {}", book.title, book.author);
    tracing::info!("  Id: {}", book.id);
    tracing::info!("  Category: {}", category_label(&book));
    match book.original_price() {
        Some(original) => tracing::info!(
            "  Price: {} (was {}, {}% off)",
            book.price,
            original,
            book.discount_percentage
        ),
        None => tracing::info!("  Price: {}", book.price),
    }
    tracing::info!("  Rating: {:.1} ({} reviews)", book.rating, book.num_reviews);
    tracing::info!("  Format: {}", book.format);
    if let Some(language) = &book.language {
        tracing::info!("  Language: {}", language);
    }
    if let Some(pages) = book.pages {
        tracing::info!("  Pages: {}", pages);
    }
    if let Some(isbn) = &book.isbn {
        tracing::info!("  ISBN: {}", isbn);
    }
    tracing::info!("  In stock: {}", book.count_in_stock);
    tracing::info!("");
    tracing::info!("{}", book.description);
    Ok(())
}

/// Show the five highest rated books.
///
/// # Errors
///
/// Returns an error if the request fails.
pub async fn top(client: &Client) -> Result<(), ApiError> {
    let books = client.books().top().await?;

    for book in &books {
        summarize(book);
    }
    Ok(())
}

fn summarize(book: &Book) {
    tracing::info!(
        "  {} - {} by {} ({}, {} in stock)",
        book.id,
        book.title,
        book.author,
        book.price,
        book.count_in_stock
    );
}

fn category_label(book: &Book) -> &str {
    book.category
        .name()
        .unwrap_or_else(|| book.category.id().as_str())
}

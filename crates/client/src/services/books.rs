//! The book catalog.
//!
//! Reads are cached for 5 minutes. Any mutation empties the cache so the
//! next read sees the backend's view.

use std::time::Duration;

use folio_core::BookId;
use moka::future::Cache;
use tracing::{debug, instrument};

use crate::cache::{CacheKey, CacheValue};
use crate::error::ApiError;
use crate::transport::{ApiRequest, Transport};
use crate::types::{Book, BookInput, BookPage, BookQuery, BookUpdate, ReviewInput};

/// Catalog lookups and admin-side listing management.
#[derive(Clone)]
pub struct BooksService {
    transport: Transport,
    cache: Cache<CacheKey, CacheValue>,
}

impl BooksService {
    pub(crate) fn new(transport: Transport) -> Self {
        let cache = Cache::builder()
            .max_capacity(1000)
            .time_to_live(Duration::from_secs(300)) // 5 minutes
            .build();

        Self { transport, cache }
    }

    /// Search the catalog. Unauthenticated and customer callers only see
    /// approved books; admins see everything.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn search(&self, query: &BookQuery) -> Result<BookPage, ApiError> {
        let params = query.params();
        let cache_key = CacheKey::Books(
            params
                .iter()
                .map(|(key, value)| format!("{key}={value}"))
                .collect::<Vec<_>>()
                .join("&"),
        );

        if let Some(CacheValue::Books(page)) = self.cache.get(&cache_key).await {
            debug!("Cache hit for book search");
            return Ok(page);
        }

        let mut request = ApiRequest::get("/books");
        for (key, value) in params {
            request = request.query(key, value);
        }
        let page: BookPage = self.transport.send(request).await?;

        self.cache
            .insert(cache_key, CacheValue::Books(page.clone()))
            .await;

        Ok(page)
    }

    /// Fetch one book with its reviews.
    ///
    /// # Errors
    ///
    /// Returns an error if the book does not exist or the request fails.
    #[instrument(skip(self), fields(book = %id))]
    pub async fn get(&self, id: &BookId) -> Result<Book, ApiError> {
        let cache_key = CacheKey::Book(id.as_str().to_string());

        if let Some(CacheValue::Book(book)) = self.cache.get(&cache_key).await {
            debug!("Cache hit for book");
            return Ok(*book);
        }

        let book: Book = self
            .transport
            .send(ApiRequest::get(format!("/books/{id}")))
            .await?;

        self.cache
            .insert(cache_key, CacheValue::Book(Box::new(book.clone())))
            .await;

        Ok(book)
    }

    /// The highest rated books.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn top(&self) -> Result<Vec<Book>, ApiError> {
        if let Some(CacheValue::BookList(books)) = self.cache.get(&CacheKey::TopBooks).await {
            debug!("Cache hit for top books");
            return Ok(books);
        }

        let books: Vec<Book> = self.transport.send(ApiRequest::get("/books/top")).await?;

        self.cache
            .insert(CacheKey::TopBooks, CacheValue::BookList(books.clone()))
            .await;

        Ok(books)
    }

    /// Listings awaiting super admin approval. Never cached.
    ///
    /// # Errors
    ///
    /// Returns an error if the caller is not a super admin or the
    /// request fails.
    #[instrument(skip(self))]
    pub async fn pending_approval(&self) -> Result<Vec<Book>, ApiError> {
        self.transport
            .send(ApiRequest::get("/books/pending-approval"))
            .await
    }

    /// List a new book.
    ///
    /// # Errors
    ///
    /// Returns an error if the caller is not an admin or the request
    /// fails.
    #[instrument(skip_all, fields(title = %input.title))]
    pub async fn create(&self, input: &BookInput) -> Result<Book, ApiError> {
        let request = ApiRequest::post("/books").json(serde_json::to_value(input)?);
        let book: Book = self.transport.send(request).await?;
        self.cache.invalidate_all();
        Ok(book)
    }

    /// Update an existing book.
    ///
    /// # Errors
    ///
    /// Returns an error if the book does not exist, the caller is not an
    /// admin, or the request fails.
    #[instrument(skip_all, fields(book = %id))]
    pub async fn update(&self, id: &BookId, update: &BookUpdate) -> Result<Book, ApiError> {
        let request =
            ApiRequest::put(format!("/books/{id}")).json(serde_json::to_value(update)?);
        let book: Book = self.transport.send(request).await?;
        self.cache.invalidate_all();
        Ok(book)
    }

    /// Delete a book.
    ///
    /// # Errors
    ///
    /// Returns an error if the book does not exist, the caller is not an
    /// admin, or the request fails.
    #[instrument(skip(self), fields(book = %id))]
    pub async fn remove(&self, id: &BookId) -> Result<(), ApiError> {
        let _: serde_json::Value = self
            .transport
            .send(ApiRequest::delete(format!("/books/{id}")))
            .await?;
        self.cache.invalidate_all();
        Ok(())
    }

    /// Review a book. One review per customer; the backend recomputes
    /// the aggregate rating.
    ///
    /// # Errors
    ///
    /// Returns an error if the caller already reviewed this book or the
    /// request fails.
    #[instrument(skip_all, fields(book = %id))]
    pub async fn add_review(&self, id: &BookId, review: &ReviewInput) -> Result<(), ApiError> {
        let request =
            ApiRequest::post(format!("/books/{id}/reviews")).json(serde_json::to_value(review)?);
        let _: serde_json::Value = self.transport.send(request).await?;
        self.cache.invalidate_all();
        Ok(())
    }

    /// Approve a pending listing for sale.
    ///
    /// # Errors
    ///
    /// Returns an error if the caller is not a super admin or the
    /// request fails.
    #[instrument(skip(self), fields(book = %id))]
    pub async fn approve(&self, id: &BookId) -> Result<Book, ApiError> {
        let book: Book = self
            .transport
            .send(ApiRequest::put(format!("/books/{id}/approve")))
            .await?;
        self.cache.invalidate_all();
        Ok(book)
    }

    /// Reject a pending listing. The backend removes it outright.
    ///
    /// # Errors
    ///
    /// Returns an error if the caller is not a super admin or the
    /// request fails.
    #[instrument(skip(self), fields(book = %id))]
    pub async fn reject(&self, id: &BookId) -> Result<(), ApiError> {
        let _: serde_json::Value = self
            .transport
            .send(ApiRequest::put(format!("/books/{id}/reject")))
            .await?;
        self.cache.invalidate_all();
        Ok(())
    }
}

//! Cache types for catalog responses.

use crate::types::{Book, BookPage, Category};

/// Cache key for catalog lookups.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub(crate) enum CacheKey {
    Book(String),
    /// One page of a search, keyed by its canonical query string.
    Books(String),
    TopBooks,
    Categories,
    FeaturedCategories,
    Category(String),
    CategoryBySlug(String),
}

/// Cached value types.
#[derive(Debug, Clone)]
pub(crate) enum CacheValue {
    Book(Box<Book>),
    Books(BookPage),
    BookList(Vec<Book>),
    Categories(Vec<Category>),
    Category(Box<Category>),
}

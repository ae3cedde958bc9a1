//! Catalog categories.
//!
//! Reads are cached for 5 minutes. Any mutation empties the cache.

use std::time::Duration;

use folio_core::CategoryId;
use moka::future::Cache;
use tracing::{debug, instrument};

use crate::cache::{CacheKey, CacheValue};
use crate::error::ApiError;
use crate::transport::{ApiRequest, Transport};
use crate::types::{Category, CategoryInput, CategoryUpdate};

/// Category lookups and admin-side management.
#[derive(Clone)]
pub struct CategoriesService {
    transport: Transport,
    cache: Cache<CacheKey, CacheValue>,
}

impl CategoriesService {
    pub(crate) fn new(transport: Transport) -> Self {
        let cache = Cache::builder()
            .max_capacity(1000)
            .time_to_live(Duration::from_secs(300)) // 5 minutes
            .build();

        Self { transport, cache }
    }

    /// All categories.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<Category>, ApiError> {
        if let Some(CacheValue::Categories(categories)) =
            self.cache.get(&CacheKey::Categories).await
        {
            debug!("Cache hit for categories");
            return Ok(categories);
        }

        let categories: Vec<Category> =
            self.transport.send(ApiRequest::get("/categories")).await?;

        self.cache
            .insert(
                CacheKey::Categories,
                CacheValue::Categories(categories.clone()),
            )
            .await;

        Ok(categories)
    }

    /// Categories flagged for the storefront landing page.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn featured(&self) -> Result<Vec<Category>, ApiError> {
        if let Some(CacheValue::Categories(categories)) =
            self.cache.get(&CacheKey::FeaturedCategories).await
        {
            debug!("Cache hit for featured categories");
            return Ok(categories);
        }

        let categories: Vec<Category> = self
            .transport
            .send(ApiRequest::get("/categories/featured"))
            .await?;

        self.cache
            .insert(
                CacheKey::FeaturedCategories,
                CacheValue::Categories(categories.clone()),
            )
            .await;

        Ok(categories)
    }

    /// Fetch a category by its URL slug.
    ///
    /// # Errors
    ///
    /// Returns an error if no category carries the slug or the request
    /// fails.
    #[instrument(skip(self), fields(slug = %slug))]
    pub async fn by_slug(&self, slug: &str) -> Result<Category, ApiError> {
        let cache_key = CacheKey::CategoryBySlug(slug.to_string());

        if let Some(CacheValue::Category(category)) = self.cache.get(&cache_key).await {
            debug!("Cache hit for category");
            return Ok(*category);
        }

        let category: Category = self
            .transport
            .send(ApiRequest::get(format!("/categories/slug/{slug}")))
            .await?;

        self.cache
            .insert(cache_key, CacheValue::Category(Box::new(category.clone())))
            .await;

        Ok(category)
    }

    /// Fetch a category by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the category does not exist or the request
    /// fails.
    #[instrument(skip(self), fields(category = %id))]
    pub async fn get(&self, id: &CategoryId) -> Result<Category, ApiError> {
        let cache_key = CacheKey::Category(id.as_str().to_string());

        if let Some(CacheValue::Category(category)) = self.cache.get(&cache_key).await {
            debug!("Cache hit for category");
            return Ok(*category);
        }

        let category: Category = self
            .transport
            .send(ApiRequest::get(format!("/categories/{id}")))
            .await?;

        self.cache
            .insert(cache_key, CacheValue::Category(Box::new(category.clone())))
            .await;

        Ok(category)
    }

    /// Create a category. Slugs are unique; a duplicate is rejected.
    ///
    /// # Errors
    ///
    /// Returns an error if the caller is not an admin, the slug is
    /// taken, or the request fails.
    #[instrument(skip_all, fields(slug = %input.slug))]
    pub async fn create(&self, input: &CategoryInput) -> Result<Category, ApiError> {
        let request = ApiRequest::post("/categories").json(serde_json::to_value(input)?);
        let category: Category = self.transport.send(request).await?;
        self.cache.invalidate_all();
        Ok(category)
    }

    /// Update a category.
    ///
    /// # Errors
    ///
    /// Returns an error if the category does not exist, the new slug is
    /// taken, or the request fails.
    #[instrument(skip_all, fields(category = %id))]
    pub async fn update(
        &self,
        id: &CategoryId,
        update: &CategoryUpdate,
    ) -> Result<Category, ApiError> {
        let request =
            ApiRequest::put(format!("/categories/{id}")).json(serde_json::to_value(update)?);
        let category: Category = self.transport.send(request).await?;
        self.cache.invalidate_all();
        Ok(category)
    }

    /// Delete a category.
    ///
    /// # Errors
    ///
    /// Returns an error if the category does not exist or the request
    /// fails.
    #[instrument(skip(self), fields(category = %id))]
    pub async fn remove(&self, id: &CategoryId) -> Result<(), ApiError> {
        let _: serde_json::Value = self
            .transport
            .send(ApiRequest::delete(format!("/categories/{id}")))
            .await?;
        self.cache.invalidate_all();
        Ok(())
    }
}

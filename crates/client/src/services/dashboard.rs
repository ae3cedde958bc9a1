//! Admin dashboard reporting.

use tracing::instrument;

use crate::error::ApiError;
use crate::transport::{ApiRequest, Transport};
use crate::types::{
    AdminSales, Book, DashboardStats, Order, PendingApprovals, PlatformStats, ProfitPoint,
    RevenuePoint,
};

/// Reporting window for revenue and profit series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportPeriod {
    #[default]
    Monthly,
    Weekly,
}

impl ReportPeriod {
    fn as_str(self) -> &'static str {
        match self {
            Self::Monthly => "monthly",
            Self::Weekly => "weekly",
        }
    }
}

/// Aggregated numbers for admin and super admin dashboards.
#[derive(Clone)]
pub struct DashboardService {
    transport: Transport,
}

impl DashboardService {
    pub(crate) fn new(transport: Transport) -> Self {
        Self { transport }
    }

    /// Headline counts and total revenue. Admin only.
    ///
    /// # Errors
    ///
    /// Returns an error if the caller is not an admin or the request
    /// fails.
    #[instrument(skip(self))]
    pub async fn stats(&self) -> Result<DashboardStats, ApiError> {
        self.transport
            .send(ApiRequest::get("/dashboard/stats"))
            .await
    }

    /// The most recent orders, newest first. Admin only.
    ///
    /// # Errors
    ///
    /// Returns an error if the caller is not an admin or the request
    /// fails.
    #[instrument(skip(self))]
    pub async fn recent_orders(&self, limit: Option<u32>) -> Result<Vec<Order>, ApiError> {
        let mut request = ApiRequest::get("/dashboard/recent-orders");
        if let Some(limit) = limit {
            request = request.query("limit", limit.to_string());
        }
        self.transport.send(request).await
    }

    /// Books running low on stock, lowest first. Admin only.
    ///
    /// # Errors
    ///
    /// Returns an error if the caller is not an admin or the request
    /// fails.
    #[instrument(skip(self))]
    pub async fn low_stock(
        &self,
        threshold: Option<u32>,
        limit: Option<u32>,
    ) -> Result<Vec<Book>, ApiError> {
        let mut request = ApiRequest::get("/dashboard/low-stock");
        if let Some(threshold) = threshold {
            request = request.query("threshold", threshold.to_string());
        }
        if let Some(limit) = limit {
            request = request.query("limit", limit.to_string());
        }
        self.transport.send(request).await
    }

    /// Revenue per period, oldest first. Admin only.
    ///
    /// # Errors
    ///
    /// Returns an error if the caller is not an admin or the request
    /// fails.
    #[instrument(skip(self))]
    pub async fn revenue(&self, period: ReportPeriod) -> Result<Vec<RevenuePoint>, ApiError> {
        let request = ApiRequest::get("/dashboard/revenue").query("period", period.as_str());
        self.transport.send(request).await
    }

    /// Sales broken down by the admin who listed the books. Super admin
    /// only.
    ///
    /// # Errors
    ///
    /// Returns an error if the caller is not a super admin or the
    /// request fails.
    #[instrument(skip(self))]
    pub async fn admin_sales(&self) -> Result<Vec<AdminSales>, ApiError> {
        self.transport
            .send(ApiRequest::get("/dashboard/admin-sales"))
            .await
    }

    /// Revenue, cost, and profit per period, oldest first. Super admin
    /// only.
    ///
    /// # Errors
    ///
    /// Returns an error if the caller is not a super admin or the
    /// request fails.
    #[instrument(skip(self))]
    pub async fn profit_analysis(
        &self,
        period: ReportPeriod,
    ) -> Result<Vec<ProfitPoint>, ApiError> {
        let request =
            ApiRequest::get("/dashboard/profit-analysis").query("period", period.as_str());
        self.transport.send(request).await
    }

    /// How many listings await approval. Super admin only.
    ///
    /// # Errors
    ///
    /// Returns an error if the caller is not a super admin or the
    /// request fails.
    #[instrument(skip(self))]
    pub async fn pending_approvals(&self) -> Result<PendingApprovals, ApiError> {
        self.transport
            .send(ApiRequest::get("/dashboard/pending-approvals"))
            .await
    }

    /// Platform-wide totals. Super admin only.
    ///
    /// # Errors
    ///
    /// Returns an error if the caller is not a super admin or the
    /// request fails.
    #[instrument(skip(self))]
    pub async fn platform_stats(&self) -> Result<PlatformStats, ApiError> {
        self.transport
            .send(ApiRequest::get("/dashboard/platform-stats"))
            .await
    }
}

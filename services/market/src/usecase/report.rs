use chrono::Utc;
use uuid::Uuid;

use bazaar_domain::pagination::PageRequest;

use crate::domain::repository::{ProductRepository, ReportRepository};
use crate::domain::types::{MAX_REPORT_REASON_LEN, Report, within_len};
use crate::error::MarketError;

// ── CreateReport ─────────────────────────────────────────────────────────────

pub struct CreateReportInput {
    pub reporter_id: Uuid,
    pub product_id: Uuid,
    pub reason: String,
}

pub struct CreateReportUseCase<P, R>
where
    P: ProductRepository,
    R: ReportRepository,
{
    pub products: P,
    pub reports: R,
}

impl<P, R> CreateReportUseCase<P, R>
where
    P: ProductRepository,
    R: ReportRepository,
{
    pub async fn execute(&self, input: CreateReportInput) -> Result<Report, MarketError> {
        if !within_len(&input.reason, MAX_REPORT_REASON_LEN) {
            return Err(MarketError::Validation("reason must be 1-500 characters"));
        }
        self.products
            .find_by_id(input.product_id)
            .await?
            .ok_or(MarketError::ProductNotFound)?;

        let report = Report {
            id: Uuid::now_v7(),
            reporter_id: input.reporter_id,
            product_id: input.product_id,
            reason: input.reason.trim().to_owned(),
            created_at: Utc::now(),
        };
        self.reports.create(&report).await?;
        tracing::info!(
            report_id = %report.id,
            product_id = %report.product_id,
            "listing reported"
        );
        Ok(report)
    }
}

// ── ListReports ──────────────────────────────────────────────────────────────

pub struct ListReportsUseCase<R: ReportRepository> {
    pub reports: R,
}

impl<R: ReportRepository> ListReportsUseCase<R> {
    pub async fn execute(&self, page: PageRequest) -> Result<Vec<Report>, MarketError> {
        self.reports.list(page.clamped()).await
    }
}

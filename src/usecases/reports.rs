use crate::common::context::Context;
use crate::common::error::{AppError, ServiceResult, unexpected};
use crate::models::reports::Report;
use crate::repositories::reports::{self, ReportColumn};

pub async fn create<C: Context>(
    ctx: &C,
    user_id: i64,
    reported_id: i64,
    message: String,
    position: String,
    state: i64,
) -> ServiceResult<Report> {
    match reports::create(ctx, user_id, reported_id, message, position, state).await {
        Ok(report) => Ok(Report::from(report)),
        Err(e) => unexpected(e),
    }
}

pub async fn fetch_one<C: Context>(ctx: &C, report_id: i64) -> ServiceResult<Report> {
    match reports::fetch_one(ctx, report_id).await {
        Ok(Some(report)) => Ok(Report::from(report)),
        Ok(None) => Err(AppError::ReportsNotFound),
        Err(e) => unexpected(e),
    }
}

pub async fn fetch_all<C: Context>(ctx: &C) -> ServiceResult<Vec<Report>> {
    match reports::fetch_all(ctx).await {
        Ok(reports) => Ok(reports.into_iter().map(Report::from).collect()),
        Err(e) => unexpected(e),
    }
}

pub async fn fetch_by_state<C: Context>(ctx: &C, state: i64) -> ServiceResult<Vec<Report>> {
    match reports::fetch_by_state(ctx, state).await {
        Ok(reports) => Ok(reports.into_iter().map(Report::from).collect()),
        Err(e) => unexpected(e),
    }
}

pub async fn set_state<C: Context>(ctx: &C, report_id: i64, state: i64) -> ServiceResult<()> {
    match reports::set_value(ctx, ReportColumn::State, state, ReportColumn::ReportId, report_id)
        .await
    {
        Ok(true) => Ok(()),
        Ok(false) => Err(AppError::ReportsNotFound),
        Err(e) => unexpected(e),
    }
}

pub async fn delete<C: Context>(ctx: &C, report_id: i64) -> ServiceResult<()> {
    match reports::delete_value(ctx, ReportColumn::ReportId, report_id).await {
        Ok(true) => Ok(()),
        Ok(false) => Err(AppError::ReportsNotFound),
        Err(e) => unexpected(e),
    }
}

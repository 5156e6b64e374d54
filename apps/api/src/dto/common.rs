use chrono::{DateTime, SecondsFormat, Utc};
use rolegate_core::PageRequest;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Health response payload.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/health-response.ts"
)]
pub struct HealthResponse {
    pub status: String,
}

/// Single-resource envelope.
#[derive(Debug, Serialize)]
pub struct DataResponse<T> {
    pub data: T,
}

impl<T> DataResponse<T> {
    pub fn new(data: T) -> Self {
        Self { data }
    }
}

/// Pagination metadata attached to list responses.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/page-meta-response.ts"
)]
pub struct PageMetaResponse {
    pub page: u32,
    pub limit: u32,
    #[ts(type = "number")]
    pub total: u64,
}

impl PageMetaResponse {
    pub fn new(page: PageRequest, total: u64) -> Self {
        Self {
            page: page.page(),
            limit: page.limit(),
            total,
        }
    }
}

/// Raw `page` and `limit` query parameters.
///
/// Values that do not parse as integers fall back to the defaults.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
}

impl PageQuery {
    pub fn page_request(&self) -> PageRequest {
        PageRequest::new(
            parse_lenient(self.page.as_deref()),
            parse_lenient(self.limit.as_deref()),
        )
    }
}

fn parse_lenient(value: Option<&str>) -> Option<i64> {
    value.and_then(|value| value.trim().parse::<i64>().ok())
}

pub(super) fn format_timestamp(value: DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Millis, true)
}

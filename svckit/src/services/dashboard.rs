use std::sync::Arc;

use crate::errors::Result;
use crate::http::{ApiClient, ApiRequest};
use crate::types::AnalyticsSnapshot;

#[derive(Clone)]
pub struct DashboardService {
    client: Arc<ApiClient>,
}

impl DashboardService {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    pub async fn get_dashboard_analytics(&self) -> Result<AnalyticsSnapshot> {
        self.client.fetch(ApiRequest::get("/dashboard/analytics")).await
    }
}

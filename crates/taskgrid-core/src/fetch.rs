use std::time::Duration;

use anyhow::Context;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use tracing::debug;

use crate::config::Config;
use crate::sort::SortOrder;
use crate::task::TaskPage;

pub const REQUESTED_WITH_VALUE: &str = "XMLHttpRequest";

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
}

impl ApiClient {
    /// One client per embedding: the programmatic-request marker header on
    /// every call, a cookie jar standing in for same-origin credentials,
    /// and a configurable timeout. `request.timeout = 0` disables the
    /// timeout entirely; a hung request then holds its loading marker
    /// forever.
    pub fn new(cfg: &Config) -> anyhow::Result<Self> {
        let timeout_secs: u64 = cfg
            .get("request.timeout")
            .unwrap_or_else(|| "30".to_string())
            .parse()
            .context("invalid request.timeout; expected whole seconds")?;

        let mut default_headers = HeaderMap::new();
        default_headers.insert(
            HeaderName::from_static("x-requested-with"),
            HeaderValue::from_static(REQUESTED_WITH_VALUE),
        );

        let mut builder = reqwest::Client::builder()
            .default_headers(default_headers)
            .cookie_store(true);
        if timeout_secs > 0 {
            builder = builder.timeout(Duration::from_secs(timeout_secs));
        }

        let http = builder
            .build()
            .context("failed building HTTP client for task sorting")?;

        Ok(Self { http })
    }

    #[tracing::instrument(skip(self))]
    pub async fn fetch_sorted(
        &self,
        api_url: &str,
        sort_by: &str,
        sort_order: SortOrder,
    ) -> anyhow::Result<TaskPage> {
        let response = self
            .http
            .get(api_url)
            .query(&[("sort_by", sort_by), ("sort_order", sort_order.as_str())])
            .send()
            .await
            .with_context(|| format!("failed requesting sorted tasks from {api_url}"))?;

        let response = response
            .error_for_status()
            .with_context(|| format!("task endpoint returned an error status: {api_url}"))?;

        let page: TaskPage = response
            .json()
            .await
            .context("task endpoint returned a malformed body")?;

        debug!(
            tasks = page.tasks.len(),
            sort_by,
            sort_order = sort_order.as_str(),
            "fetched sorted tasks"
        );

        Ok(page)
    }
}

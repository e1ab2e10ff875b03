//! Metric source adapters: fetch named statistics from CloudWatch-style
//! and HTTP-JSON sources into the alias-keyed environment the expression
//! evaluator and planner consume.

mod cloudwatch;
mod http_json;

use std::collections::HashMap;

use async_trait::async_trait;
use models::{CloudWatchParams, HttpJsonParams, MetricSourcesConfig};
use reqwest::Client as HttpClient;

use crate::clients::CloudWatchClient;
use crate::error::AutoscaleError;

pub use cloudwatch::fetch_cloudwatch;
pub use http_json::fetch_http_json;

/// A pluggable metric source: fetches one configured request's statistics
/// into an alias→value map. `NAME` is the key a cluster's
/// `metric_sources` map registers this source under; a new source is
/// added to the system by implementing this trait and wiring its `NAME`
/// into [`collect`], without touching the shipped two.
#[async_trait]
trait MetricSource {
    type Params;
    const NAME: &'static str;

    async fn fetch(&self, params: &Self::Params) -> Result<HashMap<String, Option<f64>>, AutoscaleError>;
}

struct CloudWatchSource<'a> {
    client: &'a dyn CloudWatchClient,
}

#[async_trait]
impl<'a> MetricSource for CloudWatchSource<'a> {
    type Params = CloudWatchParams;
    const NAME: &'static str = "cloudwatch";

    async fn fetch(&self, params: &CloudWatchParams) -> Result<HashMap<String, Option<f64>>, AutoscaleError> {
        fetch_cloudwatch(self.client, params).await
    }
}

struct HttpJsonSource<'a> {
    client: &'a HttpClient,
}

#[async_trait]
impl<'a> MetricSource for HttpJsonSource<'a> {
    type Params = HttpJsonParams;
    const NAME: &'static str = "third_party";

    async fn fetch(&self, params: &HttpJsonParams) -> Result<HashMap<String, Option<f64>>, AutoscaleError> {
        fetch_http_json(self.client, params).await
    }
}

/// Fetches every metric source configured for a service and merges the
/// results into one alias→value map. Sources are evaluated in
/// declaration order (`CloudWatchSource::NAME` entries, then
/// `HttpJsonSource::NAME` entries); later entries overwrite earlier ones
/// on alias collision, matching the original's plain dict-update merge.
pub async fn collect(
    config: &MetricSourcesConfig,
    cw_client: &dyn CloudWatchClient,
    http_client: &HttpClient,
) -> Result<HashMap<String, Option<f64>>, AutoscaleError> {
    let mut metrics = HashMap::new();

    let cloudwatch_source = CloudWatchSource { client: cw_client };
    for params in &config.cloudwatch {
        metrics.extend(cloudwatch_source.fetch(params).await?);
    }

    let http_json_source = HttpJsonSource { client: http_client };
    for params in &config.third_party {
        metrics.extend(http_json_source.fetch(params).await?);
    }

    Ok(metrics)
}

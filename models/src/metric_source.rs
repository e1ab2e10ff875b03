use serde::Deserialize;

/// The two shipped metric source adapters, keyed exactly as they appear
/// under a service's `metric_sources` map in configuration. Additional
/// sources register in the adapter registry (see `autoscaler::metrics`)
/// by name; the config shape here covers the two the system ships with.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MetricSourcesConfig {
    #[serde(default)]
    pub cloudwatch: Vec<CloudWatchParams>,
    #[serde(default)]
    pub third_party: Vec<HttpJsonParams>,
}

fn default_metric_name() -> String {
    "MemoryUtilization".to_string()
}

fn default_namespace() -> String {
    "AWS/ECS".to_string()
}

fn default_period_seconds() -> i64 {
    300
}

#[derive(Debug, Clone, Deserialize)]
pub struct CloudWatchParams {
    #[serde(default = "default_metric_name")]
    pub metric_name: String,
    #[serde(default = "default_namespace")]
    pub namespace: String,
    #[serde(default)]
    pub dimensions: Vec<Dimension>,
    #[serde(default = "default_period_seconds")]
    pub period_seconds: i64,
    #[serde(default)]
    pub statistics: Vec<StatisticAlias>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Dimension {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HttpJsonParams {
    pub url: String,
    #[serde(default)]
    pub method: HttpMethod,
    #[serde(default)]
    pub payload: Option<serde_json::Value>,
    #[serde(default)]
    pub statistics: Vec<StatisticAlias>,
}

#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    #[default]
    Get,
    Post,
}

/// One requested statistic: the alias it is bound to in the metric
/// environment, and the source-specific name used to look it up
/// (a CloudWatch statistic name, or a dotted JSON path).
#[derive(Debug, Clone, Deserialize)]
pub struct StatisticAlias {
    pub alias: String,
    pub name: String,
}

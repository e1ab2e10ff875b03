use std::collections::BTreeMap;

use serde::Deserialize;

use crate::metric_source::MetricSourcesConfig;

/// A cluster's declarative scaling policy, loaded from `<cluster-name>.yml`.
#[derive(Debug, Clone, Deserialize)]
pub struct ClusterDefinition {
    #[serde(default, skip_deserializing)]
    pub name: String,
    pub enabled: bool,
    pub autoscale_group: String,
    pub min: i64,
    pub max: i64,
    #[serde(default)]
    pub cpu_buffer: i64,
    #[serde(default)]
    pub mem_buffer: i64,
    #[serde(default)]
    pub services: BTreeMap<String, ServiceDefinition>,
}

fn default_max_tasks() -> i64 {
    5
}

/// A single service's scaling policy within a cluster.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceDefinition {
    pub enabled: bool,
    #[serde(default)]
    pub min: i64,
    #[serde(default = "default_max_tasks")]
    pub max: i64,
    #[serde(default)]
    pub events: Vec<Event>,
    #[serde(default)]
    pub metric_sources: MetricSourcesConfig,
}

/// A threshold rule: when `metric` falls in `(min, max)`, apply `action` to
/// the service's task count.
#[derive(Debug, Clone, Deserialize)]
pub struct Event {
    pub metric: String,
    #[serde(default)]
    pub min: Option<f64>,
    #[serde(default)]
    pub max: Option<f64>,
    pub action: i64,
}

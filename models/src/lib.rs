//! Shared data model for the cluster autoscaler: cluster and service
//! configuration as loaded from YAML, and the runtime state gathered
//! for a single run (node inventory, per-service scaling state).

pub mod cluster;
pub mod metric_source;
pub mod node;
pub mod service;

pub use cluster::{ClusterDefinition, Event, ServiceDefinition};
pub use metric_source::{
    CloudWatchParams, Dimension, HttpMethod, HttpJsonParams, MetricSourcesConfig, StatisticAlias,
};
pub use node::{Node, NodeGroupState, NodeStatus};
pub use service::ServiceRuntime;

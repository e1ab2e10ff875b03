//! Cloud collaborator traits. The coordinator and metric adapters depend
//! only on these; no decision logic lives here. `live` wraps the AWS SDK
//! crates behind them — thin translation, matching the spec's
//! characterization of these collaborators as uninteresting.

mod live;

pub use live::{LiveAutoScalingClient, LiveCloudWatchClient, LiveEcsClient};

use async_trait::async_trait;

use crate::error::AutoscaleError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstanceStatus {
    Active,
    Draining,
}

#[derive(Debug, Clone)]
pub struct ContainerInstance {
    pub container_instance_arn: String,
    pub ec2_instance_id: String,
    pub status: InstanceStatus,
    pub registered_cpu: i64,
    pub registered_mem: i64,
    pub remaining_cpu: i64,
    pub remaining_mem: i64,
    pub running_task_count: i64,
    pub pending_task_count: i64,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TaskResources {
    pub cpu: i64,
    pub memory: i64,
}

#[derive(Debug, Clone)]
pub struct ServiceDescription {
    pub service_name: String,
    pub task_definition: String,
    pub desired_count: i64,
    pub running_count: i64,
}

#[derive(Debug, Clone)]
pub struct AutoScalingGroupDescription {
    pub name: String,
    pub desired_capacity: i64,
    pub min_size: i64,
    pub max_size: i64,
    pub instance_ids: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct CloudWatchRequest {
    pub namespace: String,
    pub metric_name: String,
    pub dimensions: Vec<models::Dimension>,
    pub period_seconds: i64,
    pub statistics: Vec<String>,
}

/// One datapoint's requested statistics, keyed by the CloudWatch
/// statistic name (`"Average"`, `"Sum"`, ...) exactly as requested.
#[derive(Debug, Clone, Default)]
pub struct Datapoint {
    pub values: std::collections::HashMap<String, f64>,
}

#[async_trait]
pub trait EcsClient: Send + Sync {
    async fn list_clusters(&self) -> Result<Vec<String>, AutoscaleError>;
    async fn list_container_instances(
        &self,
        cluster: &str,
        status: InstanceStatus,
    ) -> Result<Vec<String>, AutoscaleError>;
    async fn describe_container_instances(
        &self,
        cluster: &str,
        arns: &[String],
    ) -> Result<Vec<ContainerInstance>, AutoscaleError>;
    async fn describe_task_definition(
        &self,
        task_def: &str,
    ) -> Result<TaskResources, AutoscaleError>;
    async fn describe_services(
        &self,
        cluster: &str,
        names: &[String],
    ) -> Result<Vec<ServiceDescription>, AutoscaleError>;
    async fn update_service(
        &self,
        cluster: &str,
        service: &str,
        desired_count: i64,
    ) -> Result<(), AutoscaleError>;
    async fn update_container_instance_state(
        &self,
        cluster: &str,
        instance_arn: &str,
        status: InstanceStatus,
    ) -> Result<(), AutoscaleError>;
}

#[async_trait]
pub trait AutoScalingClient: Send + Sync {
    async fn describe_auto_scaling_groups(
        &self,
    ) -> Result<Vec<AutoScalingGroupDescription>, AutoscaleError>;
    async fn set_desired_capacity(&self, group: &str, desired: i64) -> Result<(), AutoscaleError>;
    async fn update_bounds(&self, group: &str, min: i64, max: i64) -> Result<(), AutoscaleError>;
    async fn terminate_instance(
        &self,
        instance_id: &str,
        decrement_desired: bool,
    ) -> Result<(), AutoscaleError>;
}

#[async_trait]
pub trait CloudWatchClient: Send + Sync {
    async fn get_metric_statistics(
        &self,
        req: CloudWatchRequest,
    ) -> Result<Vec<Datapoint>, AutoscaleError>;
}

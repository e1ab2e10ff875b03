use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_autoscaling::Client as AsgSdkClient;
use aws_sdk_cloudwatch::Client as CloudWatchSdkClient;
use aws_sdk_ecs::Client as EcsSdkClient;

use crate::error::AutoscaleError;

use super::{
    AutoScalingClient, AutoScalingGroupDescription, CloudWatchClient, CloudWatchRequest,
    ContainerInstance, Datapoint, EcsClient, InstanceStatus, ServiceDescription, TaskResources,
};

fn cloud(context: &str, err: impl std::fmt::Display) -> AutoscaleError {
    AutoscaleError::Cloud(format!("{context}: {err}"))
}

pub struct LiveEcsClient {
    client: EcsSdkClient,
}

impl LiveEcsClient {
    pub async fn new() -> Self {
        let config = aws_config::defaults(BehaviorVersion::latest()).load().await;
        Self {
            client: EcsSdkClient::new(&config),
        }
    }
}

#[async_trait]
impl EcsClient for LiveEcsClient {
    async fn list_clusters(&self) -> Result<Vec<String>, AutoscaleError> {
        let mut arns = Vec::new();
        let mut next_token = None;
        loop {
            let mut req = self.client.list_clusters();
            if let Some(token) = next_token.take() {
                req = req.next_token(token);
            }
            let resp = req.send().await.map_err(|e| cloud("list_clusters", e))?;
            arns.extend(resp.cluster_arns().to_vec());
            match resp.next_token() {
                Some(token) => next_token = Some(token.to_string()),
                None => break,
            }
        }
        Ok(arns)
    }

    async fn list_container_instances(
        &self,
        cluster: &str,
        status: InstanceStatus,
    ) -> Result<Vec<String>, AutoscaleError> {
        let desired = match status {
            InstanceStatus::Active => aws_sdk_ecs::types::ContainerInstanceStatus::Active,
            InstanceStatus::Draining => aws_sdk_ecs::types::ContainerInstanceStatus::Draining,
        };
        let mut arns = Vec::new();
        let mut next_token = None;
        loop {
            let mut req = self
                .client
                .list_container_instances()
                .cluster(cluster)
                .status(desired.clone());
            if let Some(token) = next_token.take() {
                req = req.next_token(token);
            }
            let resp = req
                .send()
                .await
                .map_err(|e| cloud("list_container_instances", e))?;
            arns.extend(resp.container_instance_arns().to_vec());
            match resp.next_token() {
                Some(token) => next_token = Some(token.to_string()),
                None => break,
            }
        }
        Ok(arns)
    }

    async fn describe_container_instances(
        &self,
        cluster: &str,
        arns: &[String],
    ) -> Result<Vec<ContainerInstance>, AutoscaleError> {
        let resp = self
            .client
            .describe_container_instances()
            .cluster(cluster)
            .set_container_instances(Some(arns.to_vec()))
            .send()
            .await
            .map_err(|e| cloud("describe_container_instances", e))?;

        resp.container_instances()
            .iter()
            .map(|ci| {
                let registered = ci.registered_resources();
                let remaining = ci.remaining_resources();
                let find = |resources: &[aws_sdk_ecs::types::Resource], name: &str| {
                    resources
                        .iter()
                        .find(|r| r.name() == Some(name))
                        .and_then(|r| r.integer_value())
                };
                Ok(ContainerInstance {
                    container_instance_arn: ci
                        .container_instance_arn()
                        .unwrap_or_default()
                        .to_string(),
                    ec2_instance_id: ci.ec2_instance_id().unwrap_or_default().to_string(),
                    status: if ci.status() == Some("DRAINING") {
                        InstanceStatus::Draining
                    } else {
                        InstanceStatus::Active
                    },
                    registered_cpu: find(registered, "CPU")
                        .ok_or(AutoscaleError::MissingResource("CPU"))?
                        as i64,
                    registered_mem: find(registered, "MEMORY")
                        .ok_or(AutoscaleError::MissingResource("MEMORY"))?
                        as i64,
                    remaining_cpu: find(remaining, "CPU")
                        .ok_or(AutoscaleError::MissingResource("CPU"))?
                        as i64,
                    remaining_mem: find(remaining, "MEMORY")
                        .ok_or(AutoscaleError::MissingResource("MEMORY"))?
                        as i64,
                    running_task_count: ci.running_tasks_count() as i64,
                    pending_task_count: ci.pending_tasks_count() as i64,
                })
            })
            .collect()
    }

    async fn describe_task_definition(
        &self,
        task_def: &str,
    ) -> Result<TaskResources, AutoscaleError> {
        let resp = self
            .client
            .describe_task_definition()
            .task_definition(task_def)
            .send()
            .await
            .map_err(|e| cloud("describe_task_definition", e))?;

        let def = resp
            .task_definition()
            .ok_or_else(|| AutoscaleError::Cloud(format!("task definition {task_def} missing")))?;

        let mut cpu = def.cpu().and_then(|v| v.parse::<i64>().ok()).unwrap_or(0);
        let mut memory = def
            .memory()
            .and_then(|v| v.parse::<i64>().ok())
            .unwrap_or(0);

        if cpu == 0 || memory == 0 {
            for container in def.container_definitions() {
                cpu += container.cpu() as i64;
                memory += container.memory().unwrap_or(0) as i64;
            }
        }

        Ok(TaskResources { cpu, memory })
    }

    async fn describe_services(
        &self,
        cluster: &str,
        names: &[String],
    ) -> Result<Vec<ServiceDescription>, AutoscaleError> {
        let resp = self
            .client
            .describe_services()
            .cluster(cluster)
            .set_services(Some(names.to_vec()))
            .send()
            .await
            .map_err(|e| cloud("describe_services", e))?;

        Ok(resp
            .services()
            .iter()
            .map(|svc| ServiceDescription {
                service_name: svc.service_name().unwrap_or_default().to_string(),
                task_definition: svc.task_definition().unwrap_or_default().to_string(),
                desired_count: svc.desired_count() as i64,
                running_count: svc.running_count() as i64,
            })
            .collect())
    }

    async fn update_service(
        &self,
        cluster: &str,
        service: &str,
        desired_count: i64,
    ) -> Result<(), AutoscaleError> {
        self.client
            .update_service()
            .cluster(cluster)
            .service(service)
            .desired_count(desired_count as i32)
            .send()
            .await
            .map_err(|e| cloud("update_service", e))?;
        Ok(())
    }

    async fn update_container_instance_state(
        &self,
        cluster: &str,
        instance_arn: &str,
        status: InstanceStatus,
    ) -> Result<(), AutoscaleError> {
        let target = match status {
            InstanceStatus::Active => aws_sdk_ecs::types::ContainerInstanceStatus::Active,
            InstanceStatus::Draining => aws_sdk_ecs::types::ContainerInstanceStatus::Draining,
        };
        self.client
            .update_container_instances_state()
            .cluster(cluster)
            .container_instances(instance_arn)
            .status(target)
            .send()
            .await
            .map_err(|e| cloud("update_container_instance_state", e))?;
        Ok(())
    }
}

pub struct LiveAutoScalingClient {
    client: AsgSdkClient,
}

impl LiveAutoScalingClient {
    pub async fn new() -> Self {
        let config = aws_config::defaults(BehaviorVersion::latest()).load().await;
        Self {
            client: AsgSdkClient::new(&config),
        }
    }
}

#[async_trait]
impl AutoScalingClient for LiveAutoScalingClient {
    async fn describe_auto_scaling_groups(
        &self,
    ) -> Result<Vec<AutoScalingGroupDescription>, AutoscaleError> {
        let mut groups = Vec::new();
        let mut next_token = None;
        loop {
            let mut req = self.client.describe_auto_scaling_groups();
            if let Some(token) = next_token.take() {
                req = req.next_token(token);
            }
            let resp = req
                .send()
                .await
                .map_err(|e| cloud("describe_auto_scaling_groups", e))?;
            for group in resp.auto_scaling_groups() {
                groups.push(AutoScalingGroupDescription {
                    name: group.auto_scaling_group_name().unwrap_or_default().to_string(),
                    desired_capacity: group.desired_capacity().unwrap_or(0) as i64,
                    min_size: group.min_size().unwrap_or(0) as i64,
                    max_size: group.max_size().unwrap_or(0) as i64,
                    instance_ids: group
                        .instances()
                        .iter()
                        .filter_map(|i| i.instance_id())
                        .map(str::to_string)
                        .collect(),
                });
            }
            match resp.next_token() {
                Some(token) => next_token = Some(token.to_string()),
                None => break,
            }
        }
        Ok(groups)
    }

    async fn set_desired_capacity(&self, group: &str, desired: i64) -> Result<(), AutoscaleError> {
        self.client
            .set_desired_capacity()
            .auto_scaling_group_name(group)
            .desired_capacity(desired as i32)
            .send()
            .await
            .map_err(|e| cloud("set_desired_capacity", e))?;
        Ok(())
    }

    async fn update_bounds(&self, group: &str, min: i64, max: i64) -> Result<(), AutoscaleError> {
        self.client
            .update_auto_scaling_group()
            .auto_scaling_group_name(group)
            .min_size(min as i32)
            .max_size(max as i32)
            .send()
            .await
            .map_err(|e| cloud("update_auto_scaling_group", e))?;
        Ok(())
    }

    async fn terminate_instance(
        &self,
        instance_id: &str,
        decrement_desired: bool,
    ) -> Result<(), AutoscaleError> {
        self.client
            .terminate_instance_in_auto_scaling_group()
            .instance_id(instance_id)
            .should_decrement_desired_capacity(decrement_desired)
            .send()
            .await
            .map_err(|e| cloud("terminate_instance_in_auto_scaling_group", e))?;
        Ok(())
    }
}

pub struct LiveCloudWatchClient {
    client: CloudWatchSdkClient,
}

impl LiveCloudWatchClient {
    pub async fn new() -> Self {
        let config = aws_config::defaults(BehaviorVersion::latest()).load().await;
        Self {
            client: CloudWatchSdkClient::new(&config),
        }
    }
}

#[async_trait]
impl CloudWatchClient for LiveCloudWatchClient {
    async fn get_metric_statistics(
        &self,
        req: CloudWatchRequest,
    ) -> Result<Vec<Datapoint>, AutoscaleError> {
        use aws_sdk_cloudwatch::types::{Dimension as SdkDimension, Statistic};

        let end_time = aws_smithy_types::DateTime::from_secs(chrono::Utc::now().timestamp());
        let start_time = aws_smithy_types::DateTime::from_secs(
            chrono::Utc::now().timestamp() - req.period_seconds,
        );

        let dimensions: Vec<SdkDimension> = req
            .dimensions
            .iter()
            .map(|d| {
                SdkDimension::builder()
                    .name(d.name.clone())
                    .value(d.value.clone())
                    .build()
            })
            .collect();

        let statistics: Vec<Statistic> = req
            .statistics
            .iter()
            .map(|s| match s.as_str() {
                "Minimum" => Statistic::Minimum,
                "Maximum" => Statistic::Maximum,
                "SampleCount" => Statistic::SampleCount,
                "Sum" => Statistic::Sum,
                _ => Statistic::Average,
            })
            .collect();

        let resp = self
            .client
            .get_metric_statistics()
            .namespace(req.namespace)
            .metric_name(req.metric_name)
            .set_dimensions(Some(dimensions))
            .start_time(start_time)
            .end_time(end_time)
            .period(req.period_seconds as i32)
            .set_statistics(Some(statistics))
            .send()
            .await
            .map_err(|e| cloud("get_metric_statistics", e))?;

        Ok(resp
            .datapoints()
            .iter()
            .map(|dp| {
                let mut values = std::collections::HashMap::new();
                if let Some(v) = dp.average() {
                    values.insert("Average".to_string(), v);
                }
                if let Some(v) = dp.sum() {
                    values.insert("Sum".to_string(), v);
                }
                if let Some(v) = dp.minimum() {
                    values.insert("Minimum".to_string(), v);
                }
                if let Some(v) = dp.maximum() {
                    values.insert("Maximum".to_string(), v);
                }
                if let Some(v) = dp.sample_count() {
                    values.insert("SampleCount".to_string(), v);
                }
                Datapoint { values }
            })
            .collect())
    }
}

//! Per-cluster orchestration: reconcile capacity bounds, terminate
//! drained nodes, check for scale-up or scale-down, then apply service
//! deltas. Owns the three-way precedence described by the state machine
//! in the component design.

use models::{ClusterDefinition, Node, NodeGroupState, NodeStatus, ServiceRuntime};
use reqwest::Client as HttpClient;
use tracing::{info, warn};

use crate::clients::{AutoScalingClient, CloudWatchClient, EcsClient, InstanceStatus};
use crate::error::AutoscaleError;
use crate::inventory;
use crate::metrics;
use crate::placement::{can_evacuate, place_task};
use crate::planner::{plan, PlanOutcome};

#[derive(Debug, Clone, Default)]
pub struct ClusterOutcome {
    pub cluster: String,
    pub aborted_max_zero: bool,
    pub terminated: Vec<String>,
    pub scaled_up: bool,
    pub scaled_down: Option<String>,
    pub service_updates: Vec<(String, i64)>,
}

pub struct ClusterCoordinator<'a> {
    pub ecs: &'a dyn EcsClient,
    pub asg: &'a dyn AutoScalingClient,
    pub cloudwatch: &'a dyn CloudWatchClient,
    pub http: &'a HttpClient,
    pub is_test_run: bool,
}

impl<'a> ClusterCoordinator<'a> {
    pub async fn run_once(
        &self,
        def: &ClusterDefinition,
    ) -> Result<ClusterOutcome, AutoscaleError> {
        let mut outcome = ClusterOutcome {
            cluster: def.name.clone(),
            ..Default::default()
        };

        let mut group = self.reconcile_bounds(def).await?;
        if def.max == 0 {
            info!(cluster = %def.name, "max capacity is zero, aborting cluster");
            outcome.aborted_max_zero = true;
            return Ok(outcome);
        }

        let mut nodes = self.fetch_nodes(&def.name).await?;
        self.terminate_empty_draining(&def.name, &mut nodes, &mut group, &mut outcome)
            .await?;

        let mut services = self.gather_services(def).await?;

        let active: Vec<Node> = nodes
            .iter()
            .filter(|n| n.status == NodeStatus::Active)
            .cloned()
            .collect();

        if group.desired < group.max {
            self.check_scale_up(&def.autoscale_group, &active, &services, &mut group, &mut outcome)
                .await?;
        }

        if !outcome.scaled_up && group.desired > group.min {
            self.check_scale_down(&def.name, &active, &services, &mut group, &mut outcome)
                .await?;
        }

        // Only one structural change is issued per cluster per run (grow,
        // drain, terminate, or adjust task counts). A scale-up or
        // scale-down this run means desired capacity is still catching up
        // to demand, so service deltas are deferred to the next run rather
        // than issued against capacity that isn't there yet.
        if !outcome.scaled_up && outcome.scaled_down.is_none() {
            self.apply_service_deltas(&def.name, &mut services, &mut outcome)
                .await?;
        }

        Ok(outcome)
    }

    async fn reconcile_bounds(&self, def: &ClusterDefinition) -> Result<NodeGroupState, AutoscaleError> {
        let groups = self.asg.describe_auto_scaling_groups().await?;
        let found = groups
            .into_iter()
            .find(|g| g.name == def.autoscale_group)
            .ok_or_else(|| AutoscaleError::NodeGroupUnknown(def.autoscale_group.clone()))?;

        let mut group = NodeGroupState {
            desired: found.desired_capacity,
            min: found.min_size,
            max: found.max_size,
        };

        if group.min != def.min || group.max != def.max {
            if !self.is_test_run {
                self.asg.update_bounds(&def.autoscale_group, def.min, def.max).await?;
            }
            group.min = def.min;
            group.max = def.max;
        }

        Ok(group)
    }

    async fn fetch_nodes(&self, cluster: &str) -> Result<Vec<Node>, AutoscaleError> {
        let mut arns = self.ecs.list_container_instances(cluster, InstanceStatus::Active).await?;
        arns.extend(
            self.ecs
                .list_container_instances(cluster, InstanceStatus::Draining)
                .await?,
        );
        if arns.is_empty() {
            return Ok(Vec::new());
        }
        let instances = self.ecs.describe_container_instances(cluster, &arns).await?;
        Ok(instances
            .into_iter()
            .map(|ci| Node {
                id: ci.ec2_instance_id,
                container_instance_arn: ci.container_instance_arn,
                status: match ci.status {
                    InstanceStatus::Active => NodeStatus::Active,
                    InstanceStatus::Draining => NodeStatus::Draining,
                },
                registered_cpu: ci.registered_cpu,
                registered_mem: ci.registered_mem,
                remaining_cpu: ci.remaining_cpu,
                remaining_mem: ci.remaining_mem,
                running_task_count: ci.running_task_count,
                pending_task_count: ci.pending_task_count,
            })
            .collect())
    }

    async fn terminate_empty_draining(
        &self,
        cluster: &str,
        nodes: &mut Vec<Node>,
        group: &mut NodeGroupState,
        outcome: &mut ClusterOutcome,
    ) -> Result<(), AutoscaleError> {
        let mut remaining = Vec::with_capacity(nodes.len());
        for node in nodes.drain(..) {
            if node.status == NodeStatus::Draining && node.is_empty() {
                info!(%cluster, node = %node.id, "terminating empty draining node");
                if !self.is_test_run {
                    self.asg.terminate_instance(&node.id, true).await?;
                }
                group.desired -= 1;
                outcome.terminated.push(node.id.clone());
            } else {
                remaining.push(node);
            }
        }
        *nodes = remaining;
        Ok(())
    }

    /// Builds the runtime service list: task counts and sizes from ECS,
    /// evaluated metrics, and the planner's per-service decision. Only
    /// services that came back actionable are kept, plus the buffer
    /// pseudo-service when the cluster declares non-zero buffers.
    async fn gather_services(
        &self,
        def: &ClusterDefinition,
    ) -> Result<Vec<ServiceRuntime>, AutoscaleError> {
        let enabled: Vec<(&String, &models::ServiceDefinition)> = def
            .services
            .iter()
            .filter(|(_, svc)| svc.enabled)
            .collect();

        let names: Vec<String> = enabled.iter().map(|(name, _)| (*name).clone()).collect();
        let descriptions = if names.is_empty() {
            Vec::new()
        } else {
            self.ecs.describe_services(&def.name, &names).await?
        };

        // Per-service task-definition and metric fetches are independent
        // I/O waits; dispatch them concurrently but keep the result
        // vector in declared-service order so downstream event
        // evaluation and apply-order sorting stay deterministic.
        let fetches = enabled.iter().map(|(service_name, service_def)| {
            let description = descriptions.iter().find(|d| &d.service_name == *service_name);
            async move {
                let (task_count, task_def) = match description {
                    Some(d) => (d.running_count, d.task_definition.clone()),
                    None => return None,
                };

                let resources = self.ecs.describe_task_definition(&task_def).await.ok()?;
                let metrics = metrics::collect(&service_def.metric_sources, self.cloudwatch, self.http)
                    .await
                    .ok()?;

                Some(ServiceRuntime {
                    name: Some((*service_name).clone()),
                    task_count,
                    task_cpu: resources.cpu,
                    task_mem: resources.memory,
                    min_tasks: service_def.min,
                    max_tasks: service_def.max,
                    events: service_def.events.clone(),
                    metrics,
                    desired_tasks: task_count,
                    task_diff: 0,
                })
            }
        });
        let fetched = futures_util::future::join_all(fetches).await;

        let mut runtimes = Vec::new();
        for (runtime, (service_name, _)) in fetched.into_iter().zip(enabled.iter()) {
            let Some(mut runtime) = runtime else {
                warn!(cluster = %def.name, service = %service_name, "skipping service: not found or metrics unavailable");
                continue;
            };

            match plan(&runtime) {
                PlanOutcome::Act { desired, diff } => {
                    runtime.desired_tasks = desired;
                    runtime.task_diff = diff;
                    runtimes.push(runtime);
                }
                PlanOutcome::NoAct => {}
            }
        }

        if def.cpu_buffer > 0 || def.mem_buffer > 0 {
            runtimes.push(ServiceRuntime::buffer(def.cpu_buffer, def.mem_buffer));
        }

        Ok(runtimes)
    }

    async fn check_scale_up(
        &self,
        group_name: &str,
        active: &[Node],
        services: &[ServiceRuntime],
        group: &mut NodeGroupState,
        outcome: &mut ClusterOutcome,
    ) -> Result<(), AutoscaleError> {
        let mut pairs = inventory::available_pairs(active)?;

        for service in services {
            if service.task_diff <= 0 {
                continue;
            }
            for _ in 0..service.task_diff {
                if !place_task(&mut pairs, service.task_cpu, service.task_mem) {
                    info!(cluster = group_name, "scale-up triggered, growing node group");
                    if !self.is_test_run {
                        self.asg.set_desired_capacity(group_name, group.desired + 1).await?;
                    }
                    group.desired += 1;
                    outcome.scaled_up = true;
                    return Ok(());
                }
            }
        }
        Ok(())
    }

    async fn check_scale_down(
        &self,
        cluster: &str,
        active: &[Node],
        services: &[ServiceRuntime],
        _group: &mut NodeGroupState,
        outcome: &mut ClusterOutcome,
    ) -> Result<(), AutoscaleError> {
        if active.len() < 2 {
            return Ok(());
        }

        let up_scaling: Vec<ServiceRuntime> =
            services.iter().filter(|s| s.task_diff > 0).cloned().collect();

        for selector in [min_mem_node, min_cpu_node] {
            let Some(candidate) = selector(active) else {
                continue;
            };
            let candidate_used = inventory::used_pair(candidate)?;
            let others: Vec<(i64, i64)> = active
                .iter()
                .filter(|n| n.id != candidate.id)
                .map(|n| (n.remaining_cpu, n.remaining_mem))
                .collect();

            if can_evacuate(candidate_used, others, &up_scaling) {
                info!(%cluster, node = %candidate.id, "draining node for scale-down");
                if !self.is_test_run {
                    self.ecs
                        .update_container_instance_state(
                            cluster,
                            &candidate.container_instance_arn,
                            InstanceStatus::Draining,
                        )
                        .await?;
                }
                outcome.scaled_down = Some(candidate.id.clone());
                return Ok(());
            }
        }

        Ok(())
    }

    async fn apply_service_deltas(
        &self,
        cluster: &str,
        services: &mut [ServiceRuntime],
        outcome: &mut ClusterOutcome,
    ) -> Result<(), AutoscaleError> {
        services.sort_by_key(|s| s.task_diff);

        for service in services.iter() {
            if service.is_buffer() || service.task_diff == 0 {
                continue;
            }
            let name = service.name.as_ref().unwrap();
            info!(%cluster, service = %name, diff = service.task_diff, "applying service update");
            if !self.is_test_run {
                self.ecs
                    .update_service(cluster, name, service.desired_tasks)
                    .await?;
            }
            outcome.service_updates.push((name.clone(), service.task_diff));
        }

        Ok(())
    }
}

fn min_mem_node(nodes: &[Node]) -> Option<&Node> {
    nodes.iter().min_by_key(|n| n.mem_used())
}

fn min_cpu_node(nodes: &[Node]) -> Option<&Node> {
    nodes.iter().min_by_key(|n| n.cpu_used())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(id: &str, remaining_cpu: i64, remaining_mem: i64) -> Node {
        Node {
            id: id.to_string(),
            container_instance_arn: format!("arn:aws:ecs:instance/{id}"),
            status: NodeStatus::Active,
            registered_cpu: 100,
            registered_mem: 200,
            remaining_cpu,
            remaining_mem,
            running_task_count: 1,
            pending_task_count: 0,
        }
    }

    #[test]
    fn min_mem_node_picks_lowest_used_memory() {
        let nodes = vec![node("a", 90, 180), node("b", 100, 200)];
        assert_eq!(min_mem_node(&nodes).unwrap().id, "b");
    }

    #[test]
    fn min_cpu_node_picks_lowest_used_cpu() {
        let nodes = vec![node("a", 90, 180), node("b", 100, 200)];
        assert_eq!(min_cpu_node(&nodes).unwrap().id, "b");
    }

    mod end_to_end {
        use super::*;
        use crate::clients::{
            AutoScalingGroupDescription, ContainerInstance, ServiceDescription, TaskResources,
        };
        use async_trait::async_trait;
        use models::{MetricSourcesConfig, ServiceDefinition};
        use std::collections::BTreeMap;
        use std::sync::Mutex;

        #[derive(Default)]
        struct FakeEcs {
            active: Vec<ContainerInstance>,
            draining: Vec<ContainerInstance>,
            services: Vec<ServiceDescription>,
            task_resources: std::collections::HashMap<String, TaskResources>,
            updated_services: Mutex<Vec<(String, i64)>>,
            drained: Mutex<Vec<String>>,
        }

        #[async_trait]
        impl EcsClient for FakeEcs {
            async fn list_clusters(&self) -> Result<Vec<String>, AutoscaleError> {
                Ok(vec!["test-cluster".to_string()])
            }

            async fn list_container_instances(
                &self,
                _cluster: &str,
                status: InstanceStatus,
            ) -> Result<Vec<String>, AutoscaleError> {
                let source = match status {
                    InstanceStatus::Active => &self.active,
                    InstanceStatus::Draining => &self.draining,
                };
                Ok(source.iter().map(|ci| ci.container_instance_arn.clone()).collect())
            }

            async fn describe_container_instances(
                &self,
                _cluster: &str,
                arns: &[String],
            ) -> Result<Vec<ContainerInstance>, AutoscaleError> {
                Ok(self
                    .active
                    .iter()
                    .chain(self.draining.iter())
                    .filter(|ci| arns.contains(&ci.container_instance_arn))
                    .cloned()
                    .collect())
            }

            async fn describe_task_definition(
                &self,
                task_def: &str,
            ) -> Result<TaskResources, AutoscaleError> {
                Ok(self.task_resources.get(task_def).copied().unwrap_or_default())
            }

            async fn describe_services(
                &self,
                _cluster: &str,
                _names: &[String],
            ) -> Result<Vec<ServiceDescription>, AutoscaleError> {
                Ok(self.services.clone())
            }

            async fn update_service(
                &self,
                _cluster: &str,
                service: &str,
                desired_count: i64,
            ) -> Result<(), AutoscaleError> {
                self.updated_services
                    .lock()
                    .unwrap()
                    .push((service.to_string(), desired_count));
                Ok(())
            }

            async fn update_container_instance_state(
                &self,
                _cluster: &str,
                instance_arn: &str,
                _status: InstanceStatus,
            ) -> Result<(), AutoscaleError> {
                self.drained.lock().unwrap().push(instance_arn.to_string());
                Ok(())
            }
        }

        struct FakeAsg {
            group: Mutex<AutoScalingGroupDescription>,
            set_desired: Mutex<Vec<i64>>,
            terminated: Mutex<Vec<String>>,
        }

        #[async_trait]
        impl AutoScalingClient for FakeAsg {
            async fn describe_auto_scaling_groups(
                &self,
            ) -> Result<Vec<AutoScalingGroupDescription>, AutoscaleError> {
                Ok(vec![self.group.lock().unwrap().clone()])
            }

            async fn set_desired_capacity(
                &self,
                _group: &str,
                desired: i64,
            ) -> Result<(), AutoscaleError> {
                self.set_desired.lock().unwrap().push(desired);
                Ok(())
            }

            async fn update_bounds(
                &self,
                _group: &str,
                _min: i64,
                _max: i64,
            ) -> Result<(), AutoscaleError> {
                Ok(())
            }

            async fn terminate_instance(
                &self,
                instance_id: &str,
                _decrement_desired: bool,
            ) -> Result<(), AutoscaleError> {
                self.terminated.lock().unwrap().push(instance_id.to_string());
                Ok(())
            }
        }

        #[derive(Default)]
        struct FakeCloudWatch;

        #[async_trait]
        impl CloudWatchClient for FakeCloudWatch {
            async fn get_metric_statistics(
                &self,
                _req: crate::clients::CloudWatchRequest,
            ) -> Result<Vec<crate::clients::Datapoint>, AutoscaleError> {
                Ok(Vec::new())
            }
        }

        fn active_instance(id: &str, remaining_cpu: i64, remaining_mem: i64) -> ContainerInstance {
            ContainerInstance {
                container_instance_arn: format!("arn:aws:ecs:instance/{id}"),
                ec2_instance_id: id.to_string(),
                status: InstanceStatus::Active,
                registered_cpu: 100,
                registered_mem: 200,
                remaining_cpu,
                remaining_mem,
                running_task_count: 1,
                pending_task_count: 0,
            }
        }

        fn cluster_def(min: i64, max: i64, service: ServiceDefinition) -> ClusterDefinition {
            let mut services = BTreeMap::new();
            services.insert("web".to_string(), service);
            ClusterDefinition {
                name: "test-cluster".to_string(),
                enabled: true,
                autoscale_group: "test-asg".to_string(),
                min,
                max,
                cpu_buffer: 0,
                mem_buffer: 0,
                services,
            }
        }

        fn service_def(min: i64, max: i64) -> ServiceDefinition {
            ServiceDefinition {
                enabled: true,
                min,
                max,
                events: Vec::new(),
                metric_sources: MetricSourcesConfig::default(),
            }
        }

        fn service_description(task_cpu: i64, task_mem: i64) -> (ServiceDescription, TaskResources) {
            (
                ServiceDescription {
                    service_name: "web".to_string(),
                    task_definition: "web-taskdef".to_string(),
                    desired_count: 0,
                    running_count: 0,
                },
                TaskResources {
                    cpu: task_cpu,
                    memory: task_mem,
                },
            )
        }

        /// Scenario 1: pure up-scale, task fits. One node with plenty of
        /// headroom; current task count is below min, so the planner wants
        /// one more task and it fits without growing the node group.
        #[tokio::test]
        async fn scenario_1_up_scale_task_fits() {
            let (svc_desc, task_res) = service_description(10, 20);
            let mut task_resources = std::collections::HashMap::new();
            task_resources.insert("web-taskdef".to_string(), task_res);

            let ecs = FakeEcs {
                active: vec![active_instance("i-1", 100, 200)],
                services: vec![svc_desc],
                task_resources,
                ..Default::default()
            };
            let asg = FakeAsg {
                group: Mutex::new(AutoScalingGroupDescription {
                    name: "test-asg".to_string(),
                    desired_capacity: 1,
                    min_size: 0,
                    max_size: 5,
                    instance_ids: vec!["i-1".to_string()],
                }),
                set_desired: Mutex::new(Vec::new()),
                terminated: Mutex::new(Vec::new()),
            };
            let cw = FakeCloudWatch;
            let http = HttpClient::new();

            let coordinator = ClusterCoordinator {
                ecs: &ecs,
                asg: &asg,
                cloudwatch: &cw,
                http: &http,
                is_test_run: false,
            };

            let def = cluster_def(0, 5, service_def(1, 5));
            let outcome = coordinator.run_once(&def).await.unwrap();

            assert!(!outcome.scaled_up);
            assert!(outcome.scaled_down.is_none());
            assert_eq!(outcome.service_updates, vec![("web".to_string(), 1)]);
            assert_eq!(
                ecs.updated_services.lock().unwrap().as_slice(),
                &[("web".to_string(), 1)]
            );
            assert!(asg.set_desired.lock().unwrap().is_empty());
        }

        /// Scenario 2: pure up-scale, task does not fit. The only node is
        /// too small, so the coordinator grows the node group instead of
        /// applying the service update this run.
        #[tokio::test]
        async fn scenario_2_up_scale_task_does_not_fit() {
            let (svc_desc, task_res) = service_description(200, 20);
            let mut task_resources = std::collections::HashMap::new();
            task_resources.insert("web-taskdef".to_string(), task_res);

            let ecs = FakeEcs {
                active: vec![active_instance("i-1", 100, 200)],
                services: vec![svc_desc],
                task_resources,
                ..Default::default()
            };
            let asg = FakeAsg {
                group: Mutex::new(AutoScalingGroupDescription {
                    name: "test-asg".to_string(),
                    desired_capacity: 1,
                    min_size: 0,
                    max_size: 5,
                    instance_ids: vec!["i-1".to_string()],
                }),
                set_desired: Mutex::new(Vec::new()),
                terminated: Mutex::new(Vec::new()),
            };
            let cw = FakeCloudWatch;
            let http = HttpClient::new();

            let coordinator = ClusterCoordinator {
                ecs: &ecs,
                asg: &asg,
                cloudwatch: &cw,
                http: &http,
                is_test_run: false,
            };

            let def = cluster_def(0, 5, service_def(1, 5));
            let outcome = coordinator.run_once(&def).await.unwrap();

            assert!(outcome.scaled_up);
            assert_eq!(asg.set_desired.lock().unwrap().as_slice(), &[2]);
            assert!(ecs.updated_services.lock().unwrap().is_empty());
        }

        /// Scenario 5: terminate an empty draining node; local desired
        /// capacity decrements and no other structural action is taken this
        /// run (the one remaining node has no up-scaling demand).
        #[tokio::test]
        async fn scenario_5_terminate_empty_draining() {
            let draining = ContainerInstance {
                container_instance_arn: "arn:aws:ecs:instance/i-drain".to_string(),
                ec2_instance_id: "i-drain".to_string(),
                status: InstanceStatus::Draining,
                registered_cpu: 100,
                registered_mem: 200,
                remaining_cpu: 100,
                remaining_mem: 200,
                running_task_count: 0,
                pending_task_count: 0,
            };
            let ecs = FakeEcs {
                active: vec![active_instance("i-1", 100, 200)],
                draining: vec![draining],
                services: Vec::new(),
                task_resources: std::collections::HashMap::new(),
                ..Default::default()
            };
            let asg = FakeAsg {
                group: Mutex::new(AutoScalingGroupDescription {
                    name: "test-asg".to_string(),
                    desired_capacity: 2,
                    min_size: 0,
                    max_size: 5,
                    instance_ids: vec!["i-1".to_string(), "i-drain".to_string()],
                }),
                set_desired: Mutex::new(Vec::new()),
                terminated: Mutex::new(Vec::new()),
            };
            let cw = FakeCloudWatch;
            let http = HttpClient::new();

            let coordinator = ClusterCoordinator {
                ecs: &ecs,
                asg: &asg,
                cloudwatch: &cw,
                http: &http,
                is_test_run: false,
            };

            let mut services = BTreeMap::new();
            let def = ClusterDefinition {
                name: "test-cluster".to_string(),
                enabled: true,
                autoscale_group: "test-asg".to_string(),
                min: 0,
                max: 5,
                cpu_buffer: 0,
                mem_buffer: 0,
                services: {
                    services.insert("web".to_string(), service_def(0, 5));
                    services
                },
            };

            let outcome = coordinator.run_once(&def).await.unwrap();

            assert_eq!(outcome.terminated, vec!["i-drain".to_string()]);
            assert_eq!(asg.terminated.lock().unwrap().as_slice(), &["i-drain".to_string()]);
            assert!(!outcome.scaled_up);
            assert!(outcome.scaled_down.is_none());
        }

        /// max=0 short-circuits the cluster after reconcile, per the
        /// `ABORTED_MAX_ZERO` terminal state.
        #[tokio::test]
        async fn max_zero_aborts_cluster() {
            let ecs = FakeEcs::default();
            let asg = FakeAsg {
                group: Mutex::new(AutoScalingGroupDescription {
                    name: "test-asg".to_string(),
                    desired_capacity: 0,
                    min_size: 0,
                    max_size: 0,
                    instance_ids: Vec::new(),
                }),
                set_desired: Mutex::new(Vec::new()),
                terminated: Mutex::new(Vec::new()),
            };
            let cw = FakeCloudWatch;
            let http = HttpClient::new();

            let coordinator = ClusterCoordinator {
                ecs: &ecs,
                asg: &asg,
                cloudwatch: &cw,
                http: &http,
                is_test_run: false,
            };

            let def = cluster_def(0, 0, service_def(0, 5));
            let outcome = coordinator.run_once(&def).await.unwrap();
            assert!(outcome.aborted_max_zero);
        }

        #[tokio::test]
        async fn dry_run_issues_no_mutating_calls() {
            let (svc_desc, task_res) = service_description(200, 20);
            let mut task_resources = std::collections::HashMap::new();
            task_resources.insert("web-taskdef".to_string(), task_res);

            let ecs = FakeEcs {
                active: vec![active_instance("i-1", 100, 200)],
                services: vec![svc_desc],
                task_resources,
                ..Default::default()
            };
            let asg = FakeAsg {
                group: Mutex::new(AutoScalingGroupDescription {
                    name: "test-asg".to_string(),
                    desired_capacity: 1,
                    min_size: 2,
                    max_size: 5,
                    instance_ids: vec!["i-1".to_string()],
                }),
                set_desired: Mutex::new(Vec::new()),
                terminated: Mutex::new(Vec::new()),
            };
            let cw = FakeCloudWatch;
            let http = HttpClient::new();

            let coordinator = ClusterCoordinator {
                ecs: &ecs,
                asg: &asg,
                cloudwatch: &cw,
                http: &http,
                is_test_run: true,
            };

            // min/max mismatch would normally trigger update_bounds; diff
            // would trigger set_desired_capacity or update_service. None of
            // these mutating calls should reach the fakes' recorders.
            let def = cluster_def(0, 5, service_def(1, 5));
            let outcome = coordinator.run_once(&def).await.unwrap();

            assert!(outcome.scaled_up);
            assert!(asg.set_desired.lock().unwrap().is_empty());
            assert!(ecs.updated_services.lock().unwrap().is_empty());
            assert!(asg.terminated.lock().unwrap().is_empty());
        }
    }
}

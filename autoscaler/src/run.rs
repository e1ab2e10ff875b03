//! Top-level run: loads configuration, lists clusters, and invokes the
//! Cluster Scaling Coordinator for each enabled one inside an isolated
//! failure boundary.

use std::path::Path;

use reqwest::Client as HttpClient;
use tracing::{error, info};

use crate::clients::{AutoScalingClient, CloudWatchClient, EcsClient};
use crate::config::load_cluster_defs;
use crate::coordinator::{ClusterCoordinator, ClusterOutcome};
use crate::error::AutoscaleError;

#[derive(Debug, Default)]
pub struct RunSummary {
    pub succeeded: Vec<ClusterOutcome>,
    pub failed: Vec<(String, String)>,
    pub skipped_disabled: Vec<String>,
}

pub struct RunCoordinator<'a> {
    pub ecs: &'a dyn EcsClient,
    pub asg: &'a dyn AutoScalingClient,
    pub cloudwatch: &'a dyn CloudWatchClient,
    pub http: &'a HttpClient,
    pub clusters_dir: &'a Path,
}

impl<'a> RunCoordinator<'a> {
    /// Never returns an `Err`: every cluster-level failure is folded
    /// into the summary and logged, matching the invocation surface's
    /// "exceptions are logged but do not propagate" contract.
    pub async fn run(&self, is_test_run: bool) -> RunSummary {
        let mut summary = RunSummary::default();

        let defs = match load_cluster_defs(self.clusters_dir) {
            Ok(defs) => defs,
            Err(err) => {
                error!(error = %err, "configuration load failed, aborting run");
                summary.failed.push(("<config>".to_string(), err.to_string()));
                return summary;
            }
        };

        let known_clusters = match self.ecs.list_clusters().await {
            Ok(names) => names,
            Err(err) => {
                error!(error = %err, "failed to list clusters, aborting run");
                summary.failed.push(("<clusters>".to_string(), err.to_string()));
                return summary;
            }
        };

        let coordinator = ClusterCoordinator {
            ecs: self.ecs,
            asg: self.asg,
            cloudwatch: self.cloudwatch,
            http: self.http,
            is_test_run,
        };

        for (name, def) in &defs {
            if !def.enabled {
                summary.skipped_disabled.push(name.clone());
                continue;
            }

            if let Err(err) = self.ensure_cluster_known(name, &known_clusters) {
                error!(cluster = %name, error = %err, "cluster failed, skipping");
                summary.failed.push((name.clone(), err.to_string()));
                continue;
            }

            match coordinator.run_once(def).await {
                Ok(outcome) => {
                    info!(cluster = %name, "cluster run complete");
                    summary.succeeded.push(outcome);
                }
                Err(err) => {
                    error!(cluster = %name, error = %err, "cluster failed, skipping");
                    summary.failed.push((name.clone(), err.to_string()));
                }
            }
        }

        summary
    }

    fn ensure_cluster_known(
        &self,
        name: &str,
        known_clusters: &[String],
    ) -> Result<(), AutoscaleError> {
        if known_clusters.iter().any(|c| c.ends_with(name)) {
            Ok(())
        } else {
            Err(AutoscaleError::ClusterUnknown(name.to_string()))
        }
    }
}

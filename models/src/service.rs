use std::collections::HashMap;

use crate::cluster::Event;

/// A service's scaling state for the current run. `name` is `None` only
/// for the synthetic buffer pseudo-service, which reserves headroom on the
/// cluster but is never scaled through the task-update API.
#[derive(Debug, Clone)]
pub struct ServiceRuntime {
    pub name: Option<String>,
    pub task_count: i64,
    pub task_cpu: i64,
    pub task_mem: i64,
    pub min_tasks: i64,
    pub max_tasks: i64,
    pub events: Vec<Event>,
    pub metrics: HashMap<String, Option<f64>>,
    pub desired_tasks: i64,
    pub task_diff: i64,
}

impl ServiceRuntime {
    /// Builds the reserved-headroom pseudo-service. Mirrors the buffer
    /// task the coordinator injects when a cluster declares a non-zero
    /// `cpu_buffer` or `mem_buffer`: it always wants exactly one more slot
    /// and never goes through event evaluation.
    pub fn buffer(cpu_buffer: i64, mem_buffer: i64) -> Self {
        Self {
            name: None,
            task_count: 1,
            task_cpu: cpu_buffer,
            task_mem: mem_buffer,
            min_tasks: 1,
            max_tasks: 2,
            events: Vec::new(),
            metrics: HashMap::new(),
            desired_tasks: 2,
            task_diff: 1,
        }
    }

    pub fn is_buffer(&self) -> bool {
        self.name.is_none()
    }
}

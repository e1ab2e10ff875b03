//! Normalizes node capacity descriptors into the pairs the placement
//! engine scans, and the used-capacity pairs the eviction check needs.

use models::Node;

use crate::error::AutoscaleError;

/// `(cpu_free, mem_free)` for every active node, in the order given.
pub fn available_pairs(nodes: &[Node]) -> Result<Vec<(i64, i64)>, AutoscaleError> {
    nodes
        .iter()
        .map(|node| {
            if node.registered_cpu < 0 || node.remaining_cpu < 0 {
                return Err(AutoscaleError::MissingResource("CPU"));
            }
            if node.registered_mem < 0 || node.remaining_mem < 0 {
                return Err(AutoscaleError::MissingResource("MEMORY"));
            }
            Ok((node.remaining_cpu, node.remaining_mem))
        })
        .collect()
}

/// `(cpu_used, mem_used)` for a single node, used when evacuating it.
pub fn used_pair(node: &Node) -> Result<(i64, i64), AutoscaleError> {
    if node.registered_cpu < 0 || node.remaining_cpu < 0 {
        return Err(AutoscaleError::MissingResource("CPU"));
    }
    if node.registered_mem < 0 || node.remaining_mem < 0 {
        return Err(AutoscaleError::MissingResource("MEMORY"));
    }
    Ok((node.cpu_used(), node.mem_used()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use models::NodeStatus;

    fn node(remaining_cpu: i64, remaining_mem: i64) -> Node {
        Node {
            id: "i-1".to_string(),
            container_instance_arn: "arn:aws:ecs:instance/i-1".to_string(),
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
    fn available_pairs_reflect_remaining_capacity() {
        let nodes = vec![node(90, 180), node(100, 200)];
        assert_eq!(available_pairs(&nodes).unwrap(), vec![(90, 180), (100, 200)]);
    }

    #[test]
    fn used_pair_is_registered_minus_remaining() {
        let n = node(90, 180);
        assert_eq!(used_pair(&n).unwrap(), (10, 20));
    }

    #[test]
    fn negative_remaining_is_missing_resource() {
        let mut n = node(90, 180);
        n.remaining_cpu = -1;
        assert!(matches!(
            available_pairs(&[n]).unwrap_err(),
            AutoscaleError::MissingResource("CPU")
        ));
    }
}

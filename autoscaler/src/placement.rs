//! The two-dimensional first-fit bin packer: deciding whether pending
//! tasks fit on existing nodes, and whether a node's load can be
//! re-homed onto its peers while still leaving room to scale up.

use models::ServiceRuntime;

/// Scans `pairs` in order for the first `(cpu_free, mem_free)` that
/// strictly exceeds `(need_cpu, need_mem)` on both axes, deducts the
/// requested amount, and returns `true`. Exact fits are rejected.
pub fn place_task(pairs: &mut [(i64, i64)], need_cpu: i64, need_mem: i64) -> bool {
    for pair in pairs.iter_mut() {
        if pair.0 > need_cpu && pair.1 > need_mem {
            pair.0 -= need_cpu;
            pair.1 -= need_mem;
            return true;
        }
    }
    false
}

/// Identical scan using strict `<` on the candidate side. Semantically
/// equivalent to [`place_task`]; kept separate to mirror the two call
/// sites' distinct intent (placing a new task vs. allocating evacuated
/// load into remaining headroom).
pub fn allocate(pairs: &mut [(i64, i64)], need_cpu: i64, need_mem: i64) -> bool {
    for pair in pairs.iter_mut() {
        if need_cpu < pair.0 && need_mem < pair.1 {
            pair.0 -= need_cpu;
            pair.1 -= need_mem;
            return true;
        }
    }
    false
}

/// For every up-scaling service (`task_diff > 0`), calls [`place_task`]
/// `task_diff` times. Fails on the first task that does not fit;
/// `pairs` is still mutated up to that point (callers operate on a
/// scratch copy, never the live node list).
pub fn fit_services_on(pairs: &mut [(i64, i64)], services: &[ServiceRuntime]) -> bool {
    for service in services {
        if service.task_diff <= 0 {
            continue;
        }
        for _ in 0..service.task_diff {
            if !place_task(pairs, service.task_cpu, service.task_mem) {
                return false;
            }
        }
    }
    true
}

/// Checks whether `candidate`'s used load can be re-homed onto
/// `other_pairs`, and whether every up-scaling service's pending tasks
/// still fit afterward. `other_pairs` is consumed; callers pass a
/// scratch copy built from every active node but `candidate`.
pub fn can_evacuate(
    candidate_used: (i64, i64),
    mut other_pairs: Vec<(i64, i64)>,
    services: &[ServiceRuntime],
) -> bool {
    if other_pairs.is_empty() {
        return false;
    }
    if !allocate(&mut other_pairs, candidate_used.0, candidate_used.1) {
        return false;
    }
    fit_services_on(&mut other_pairs, services)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn service(name: &str, task_cpu: i64, task_mem: i64, task_diff: i64) -> ServiceRuntime {
        ServiceRuntime {
            name: Some(name.to_string()),
            task_count: 1,
            task_cpu,
            task_mem,
            min_tasks: 0,
            max_tasks: 5,
            events: Vec::new(),
            metrics: HashMap::new(),
            desired_tasks: 1 + task_diff,
            task_diff,
        }
    }

    #[test]
    fn place_task_rejects_exact_fit() {
        let mut pairs = vec![(10, 20)];
        assert!(!place_task(&mut pairs, 10, 20));
        assert_eq!(pairs, vec![(10, 20)]);
    }

    #[test]
    fn place_task_deducts_from_first_fitting_pair() {
        let mut pairs = vec![(5, 5), (100, 200)];
        assert!(place_task(&mut pairs, 10, 20));
        assert_eq!(pairs, vec![(5, 5), (90, 180)]);
    }

    #[test]
    fn fit_services_on_sums_deductions() {
        let mut pairs = vec![(100, 200)];
        let services = vec![service("web", 10, 20, 2)];
        assert!(fit_services_on(&mut pairs, &services));
        assert_eq!(pairs, vec![(80, 160)]);
    }

    #[test]
    fn fit_services_on_fails_when_any_task_does_not_fit() {
        let mut pairs = vec![(15, 30)];
        let services = vec![service("web", 10, 20, 2)];
        assert!(!fit_services_on(&mut pairs, &services));
    }

    #[test]
    fn can_evacuate_scenario_3() {
        // A(used 10/20), B(free 100/200), no up-scaling services.
        let candidate_used = (10, 20);
        let other_pairs = vec![(100, 200)];
        assert!(can_evacuate(candidate_used, other_pairs, &[]));
    }

    #[test]
    fn can_evacuate_scenario_4_blocked_by_demand() {
        let candidate_used = (10, 20);
        let other_pairs = vec![(100, 200)];
        let services = vec![service("web", 95, 190, 1)];
        assert!(!can_evacuate(candidate_used, other_pairs, &services));
    }

    #[test]
    fn can_evacuate_fails_with_no_other_nodes() {
        assert!(!can_evacuate((10, 20), vec![], &[]));
    }
}

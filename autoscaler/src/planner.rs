//! Per-service scaling decisions: clamps against configured bounds first,
//! then falls through to the service's ordered event list.

use models::ServiceRuntime;

use crate::expr::{evaluate, ExpressionError};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlanOutcome {
    Act { desired: i64, diff: i64 },
    NoAct,
}

/// Decides whether `service` should scale this run. Never returns an
/// error: an expression failure or an absent alias simply yields
/// [`PlanOutcome::NoAct`], matching the coordinator's "non-actionable
/// service" handling for this class of failure.
pub fn plan(service: &ServiceRuntime) -> PlanOutcome {
    if service.task_count < service.min_tasks {
        let desired = service.min_tasks;
        return PlanOutcome::Act {
            desired,
            diff: desired - service.task_count,
        };
    }

    if service.task_count > service.max_tasks {
        // Preserves the source's sign convention: positive, not
        // desired - current, so over-capacity corrections sort after
        // ordinary scale-ups in the coordinator's ascending apply order.
        return PlanOutcome::Act {
            desired: service.max_tasks,
            diff: service.task_count - service.max_tasks,
        };
    }

    for event in &service.events {
        let metric = match evaluate(&event.metric, &service.metrics) {
            Ok(value) => value,
            Err(ExpressionError::AbsentAlias(_)) => return PlanOutcome::NoAct,
            Err(_) => return PlanOutcome::NoAct,
        };

        if let Some(upper) = event.max {
            if metric > upper {
                continue;
            }
        }
        if let Some(lower) = event.min {
            if metric < lower {
                continue;
            }
        }

        let candidate = service.task_count + event.action;
        let clamped = candidate.clamp(service.min_tasks, service.max_tasks);
        if clamped == service.task_count {
            continue;
        }

        return PlanOutcome::Act {
            desired: clamped,
            diff: clamped - service.task_count,
        };
    }

    PlanOutcome::NoAct
}

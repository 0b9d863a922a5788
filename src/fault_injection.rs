use std::{
    collections::HashMap,
    sync::{Mutex, OnceLock},
};

use crate::errors::GraphError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FaultPoint {
    NodeRecordBeforeCommit,
    EdgeRecordBeforeCommit,
}

struct FaultEntry {
    /// Successful passes left before the fault fires.
    skip: usize,
    remaining: usize,
}

fn registry() -> &'static Mutex<HashMap<FaultPoint, FaultEntry>> {
    static REGISTRY: OnceLock<Mutex<HashMap<FaultPoint, FaultEntry>>> = OnceLock::new();
    REGISTRY.get_or_init(|| Mutex::new(HashMap::new()))
}

pub fn reset_faults() {
    registry()
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
        .clear();
}

pub fn configure_fault(point: FaultPoint, failures: usize) {
    configure_fault_after(point, 0, failures);
}

/// Lets `skip` checks of `point` pass, then fails the next `failures` checks.
pub fn configure_fault_after(point: FaultPoint, skip: usize, failures: usize) {
    let mut guard = registry()
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    if failures == 0 {
        guard.remove(&point);
    } else {
        guard.insert(
            point,
            FaultEntry {
                skip,
                remaining: failures,
            },
        );
    }
}

pub(crate) fn check_fault(point: FaultPoint) -> Result<(), GraphError> {
    let mut guard = registry()
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    if let Some(entry) = guard.get_mut(&point) {
        if entry.skip > 0 {
            entry.skip -= 1;
            return Ok(());
        }
        if entry.remaining > 0 {
            entry.remaining -= 1;
            if entry.remaining == 0 {
                guard.remove(&point);
            }
            return Err(GraphError::fault_injection(format!("{point:?}")));
        }
    }
    Ok(())
}

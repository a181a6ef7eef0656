//! In-memory simulated device
//!
//! Properties live in a table keyed by `Pid`; each one is readable and
//! optionally writable. Actions are declared up front and every invocation
//! is recorded, so the simulator can be inspected after a session.

use crate::handlers::DeviceHandlers;
use parking_lot::RwLock;
use std::collections::{BTreeMap, BTreeSet};
use xiot_core::{ActionOperation, Aid, OperationStatus, Pid, PropertyOperation, PropertyValue};

#[derive(Debug, Clone)]
struct PropertySlot {
    value: PropertyValue,
    writable: bool,
}

/// Simulated device backed by a property table
#[derive(Debug, Default)]
pub struct SimulatedDevice {
    properties: RwLock<BTreeMap<Pid, PropertySlot>>,
    actions: RwLock<BTreeSet<Aid>>,
    invocations: RwLock<Vec<ActionOperation>>,
}

impl SimulatedDevice {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a property with its initial value
    pub fn with_property(self, pid: Pid, value: impl Into<PropertyValue>, writable: bool) -> Self {
        self.properties.write().insert(
            pid,
            PropertySlot {
                value: value.into(),
                writable,
            },
        );
        self
    }

    /// Declare an action
    pub fn with_action(self, aid: Aid) -> Self {
        self.actions.write().insert(aid);
        self
    }

    /// Current value of a property
    pub fn property(&self, pid: Pid) -> Option<PropertyValue> {
        self.properties.read().get(&pid).map(|slot| slot.value.clone())
    }

    /// Actions invoked so far, oldest first, as the device left them
    pub fn invocations(&self) -> Vec<ActionOperation> {
        self.invocations.read().clone()
    }

    fn service_exists(&self, siid: u16) -> bool {
        self.properties.read().keys().any(|pid| pid.siid == siid)
            || self.actions.read().iter().any(|aid| aid.siid == siid)
    }

    fn missing_property_status(&self, pid: Pid) -> OperationStatus {
        if self.service_exists(pid.siid) {
            OperationStatus::PropertyNotFound
        } else {
            OperationStatus::ServiceNotFound
        }
    }
}

/// Check that `new` may replace `current`; ints are accepted for floats
fn coerce(current: &PropertyValue, new: &PropertyValue) -> Option<PropertyValue> {
    match (current, new) {
        (PropertyValue::Bool(_), PropertyValue::Bool(_))
        | (PropertyValue::Int(_), PropertyValue::Int(_))
        | (PropertyValue::Float(_), PropertyValue::Float(_))
        | (PropertyValue::String(_), PropertyValue::String(_)) => Some(new.clone()),
        (PropertyValue::Float(_), PropertyValue::Int(v)) => Some(PropertyValue::Float(*v as f64)),
        _ => None,
    }
}

impl DeviceHandlers for SimulatedDevice {
    fn get_property(&self, operation: &mut PropertyOperation) {
        let slot = self.properties.read().get(&operation.pid).cloned();
        match slot {
            Some(slot) => {
                operation.value = Some(slot.value);
                operation.status = OperationStatus::Completed;
            }
            None => {
                operation.value = None;
                operation.status = self.missing_property_status(operation.pid);
            }
        }
        log::debug!("get {} -> {}", operation.pid, operation.status);
    }

    fn set_property(&self, operation: &mut PropertyOperation) {
        let status = {
            let mut properties = self.properties.write();
            match (properties.get_mut(&operation.pid), operation.value.as_ref()) {
                (None, _) => None,
                (Some(slot), _) if !slot.writable => Some(OperationStatus::PropertyCannotWrite),
                (Some(_), None) => Some(OperationStatus::InvalidValue),
                (Some(slot), Some(value)) => match coerce(&slot.value, value) {
                    Some(value) => {
                        slot.value = value;
                        Some(OperationStatus::Completed)
                    }
                    None => Some(OperationStatus::InvalidValue),
                },
            }
        };
        operation.status = status.unwrap_or_else(|| self.missing_property_status(operation.pid));
        log::debug!("set {} -> {}", operation.pid, operation.status);
    }

    fn invoke_action(&self, operation: &mut ActionOperation) {
        operation.status = if self.actions.read().contains(&operation.aid) {
            OperationStatus::Completed
        } else if self.service_exists(operation.aid.siid) {
            OperationStatus::ActionNotFound
        } else {
            OperationStatus::ServiceNotFound
        };
        log::debug!("invoke {} -> {}", operation.aid, operation.status);
        self.invocations.write().push(operation.clone());
    }
}

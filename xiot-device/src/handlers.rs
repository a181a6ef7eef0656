//! Device callbacks invoked for inbound queries

use xiot_core::{ActionOperation, PropertyOperation};

/// Device-specific effects behind the three inbound query kinds
///
/// Each callback works on the operation in place: it performs the effect
/// and records the outcome in the operation's `status` (and `value` for
/// reads, `arguments_out` for actions). The session adapter then answers
/// the query with whatever the operations hold.
pub trait DeviceHandlers: Send + Sync {
    /// Read one property into `operation.value`
    fn get_property(&self, operation: &mut PropertyOperation);

    /// Write `operation.value` to one property
    fn set_property(&self, operation: &mut PropertyOperation);

    /// Invoke one action
    fn invoke_action(&self, operation: &mut ActionOperation);
}

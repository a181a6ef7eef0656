//! Core types and utilities for the xiot device session protocol
//!
//! This crate provides the error type, the session lifecycle status, the
//! device specification types (property/action/event ids and operations)
//! and the IQ messages used throughout the workspace.

pub mod error;
pub mod message;
pub mod spec;
pub mod status;

pub use error::{XiotError, XiotResult};
pub use message::{IqError, IqQuery, IqReply, IqResult, QueryKind, ResultKind};
pub use spec::{
    ActionOperation, Aid, Argument, Eid, EventOperation, OperationStatus, Pid, PropertyOperation,
    PropertyValue,
};
pub use status::Status;

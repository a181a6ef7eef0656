//! Device specification types
//!
//! A device is described as services (`siid`) holding properties (`piid`),
//! actions (`aiid`) and events (`eiid`). Property and action operations
//! travel inside queries; the device fills in their values and statuses.

use crate::error::{XiotError, XiotResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Property identifier (`siid.piid`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Pid {
    pub siid: u16,
    pub piid: u16,
}

impl Pid {
    pub fn new(siid: u16, piid: u16) -> Self {
        Self { siid, piid }
    }

    /// Parse a property id from its `siid.piid` form
    pub fn from_string(s: &str) -> XiotResult<Self> {
        let (siid, piid) = parse_pair(s)?;
        Ok(Self { siid, piid })
    }
}

impl fmt::Display for Pid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.siid, self.piid)
    }
}

/// Action identifier (`siid.aiid`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Aid {
    pub siid: u16,
    pub aiid: u16,
}

impl Aid {
    pub fn new(siid: u16, aiid: u16) -> Self {
        Self { siid, aiid }
    }

    /// Parse an action id from its `siid.aiid` form
    pub fn from_string(s: &str) -> XiotResult<Self> {
        let (siid, aiid) = parse_pair(s)?;
        Ok(Self { siid, aiid })
    }
}

impl fmt::Display for Aid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.siid, self.aiid)
    }
}

/// Event identifier (`siid.eiid`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Eid {
    pub siid: u16,
    pub eiid: u16,
}

impl Eid {
    pub fn new(siid: u16, eiid: u16) -> Self {
        Self { siid, eiid }
    }
}

impl fmt::Display for Eid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.siid, self.eiid)
    }
}

fn parse_pair(s: &str) -> XiotResult<(u16, u16)> {
    let (left, right) = s
        .split_once('.')
        .ok_or_else(|| XiotError::InvalidData(format!("Expected <siid>.<iid>: {}", s)))?;
    let parse = |part: &str| {
        part.trim()
            .parse::<u16>()
            .map_err(|_| XiotError::InvalidData(format!("Invalid id value: {}", part)))
    };
    Ok((parse(left)?, parse(right)?))
}

/// Value carried by a property or an argument
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(v) => write!(f, "{}", v),
            Self::Int(v) => write!(f, "{}", v),
            Self::Float(v) => write!(f, "{}", v),
            Self::String(v) => write!(f, "{:?}", v),
        }
    }
}

impl From<bool> for PropertyValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for PropertyValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<f64> for PropertyValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

/// Outcome of a single property/action operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(into = "i32", try_from = "i32")]
pub enum OperationStatus {
    Completed,
    ToBeExecuted,
    /// Status not determined (also used for malformed queries)
    #[default]
    Undefined,
    ServiceNotFound,
    PropertyNotFound,
    PropertyCannotRead,
    PropertyCannotWrite,
    ActionNotFound,
    InvalidValue,
}

impl OperationStatus {
    /// Get status code
    pub const fn code(&self) -> i32 {
        match self {
            Self::Completed => 0,
            Self::ToBeExecuted => 1,
            Self::Undefined => -4000,
            Self::ServiceNotFound => -4001,
            Self::PropertyNotFound => -4002,
            Self::PropertyCannotRead => -4003,
            Self::PropertyCannotWrite => -4004,
            Self::ActionNotFound => -4005,
            Self::InvalidValue => -4006,
        }
    }

    /// Get status from code
    pub fn from_code(code: i32) -> XiotResult<Self> {
        match code {
            0 => Ok(Self::Completed),
            1 => Ok(Self::ToBeExecuted),
            -4000 => Ok(Self::Undefined),
            -4001 => Ok(Self::ServiceNotFound),
            -4002 => Ok(Self::PropertyNotFound),
            -4003 => Ok(Self::PropertyCannotRead),
            -4004 => Ok(Self::PropertyCannotWrite),
            -4005 => Ok(Self::ActionNotFound),
            -4006 => Ok(Self::InvalidValue),
            _ => Err(XiotError::InvalidData(format!("Invalid operation status: {}", code))),
        }
    }

    pub const fn is_ok(&self) -> bool {
        matches!(self, Self::Completed | Self::ToBeExecuted)
    }
}

impl From<OperationStatus> for i32 {
    fn from(status: OperationStatus) -> Self {
        status.code()
    }
}

impl TryFrom<i32> for OperationStatus {
    type Error = XiotError;

    fn try_from(code: i32) -> Result<Self, Self::Error> {
        Self::from_code(code)
    }
}

impl fmt::Display for OperationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}({})", self, self.code())
    }
}

/// Read or write of one property
///
/// A read arrives without a value; the device fills `value` and `status`.
/// A write arrives with the value to store; the device fills `status`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyOperation {
    pub pid: Pid,
    pub value: Option<PropertyValue>,
    pub status: OperationStatus,
}

impl PropertyOperation {
    /// Operation reading `pid`
    pub fn read(pid: Pid) -> Self {
        Self {
            pid,
            value: None,
            status: OperationStatus::Undefined,
        }
    }

    /// Operation writing `value` to `pid`
    pub fn write(pid: Pid, value: impl Into<PropertyValue>) -> Self {
        Self {
            pid,
            value: Some(value.into()),
            status: OperationStatus::Undefined,
        }
    }
}

/// Action argument
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Argument {
    pub piid: u16,
    pub value: PropertyValue,
}

impl Argument {
    pub fn new(piid: u16, value: impl Into<PropertyValue>) -> Self {
        Self {
            piid,
            value: value.into(),
        }
    }
}

/// Invocation of one action
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionOperation {
    pub aid: Aid,
    pub arguments_in: Vec<Argument>,
    pub arguments_out: Vec<Argument>,
    pub status: OperationStatus,
}

impl ActionOperation {
    pub fn new(aid: Aid, arguments_in: Vec<Argument>) -> Self {
        Self {
            aid,
            arguments_in,
            arguments_out: Vec::new(),
            status: OperationStatus::Undefined,
        }
    }
}

/// Occurrence of one event, reported by the device
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventOperation {
    pub eid: Eid,
    pub arguments: Vec<Argument>,
    pub status: OperationStatus,
}

impl EventOperation {
    pub fn new(eid: Eid, arguments: Vec<Argument>) -> Self {
        Self {
            eid,
            arguments,
            status: OperationStatus::Undefined,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pid_from_string() {
        let pid = Pid::from_string("2.1").unwrap();
        assert_eq!(pid, Pid::new(2, 1));
        assert_eq!(pid.to_string(), "2.1");
    }

    #[test]
    fn test_pid_from_string_rejects_garbage() {
        assert!(Pid::from_string("2").is_err());
        assert!(Pid::from_string("a.1").is_err());
        assert!(Pid::from_string("2.70000").is_err());
    }

    #[test]
    fn test_aid_from_string() {
        assert_eq!(Aid::from_string("3.1").unwrap(), Aid::new(3, 1));
    }

    #[test]
    fn test_operation_status_codes() {
        for status in [
            OperationStatus::Completed,
            OperationStatus::Undefined,
            OperationStatus::PropertyCannotWrite,
            OperationStatus::InvalidValue,
        ] {
            assert_eq!(OperationStatus::from_code(status.code()).unwrap(), status);
        }
        assert!(OperationStatus::from_code(42).is_err());
    }

    #[test]
    fn test_property_operation_constructors() {
        let read = PropertyOperation::read(Pid::new(2, 1));
        assert!(read.value.is_none());
        assert_eq!(read.status, OperationStatus::Undefined);

        let write = PropertyOperation::write(Pid::new(2, 1), true);
        assert_eq!(write.value, Some(PropertyValue::Bool(true)));
    }
}

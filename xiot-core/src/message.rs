//! IQ (info/query) messages exchanged with the xiot server
//!
//! Every exchange is a query answered by either a result or an error that
//! carries the same id. Queries flow both ways: the server asks the device
//! to read/write properties and invoke actions, the device asks the server
//! for pings, access keys, and change/event notifications.

use crate::spec::{ActionOperation, EventOperation, OperationStatus, PropertyOperation};
use serde::{Deserialize, Serialize};
use std::fmt;

pub const GET_PROPERTIES_METHOD: &str = "get-properties";
pub const SET_PROPERTIES_METHOD: &str = "set-properties";
pub const INVOKE_ACTION_METHOD: &str = "invoke-action";
pub const PING_METHOD: &str = "ping";
pub const GET_ACCESS_KEY_METHOD: &str = "get-access-key";
pub const SET_ACCESS_KEY_METHOD: &str = "set-access-key";
pub const PROPERTIES_CHANGED_METHOD: &str = "properties-changed";
pub const EVENT_OCCURRED_METHOD: &str = "event-occurred";

/// Decoded body of a query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "kebab-case")]
pub enum QueryKind {
    GetProperties { properties: Vec<PropertyOperation> },
    SetProperties { properties: Vec<PropertyOperation> },
    InvokeAction { operation: ActionOperation },
    Ping,
    GetAccessKey,
    SetAccessKey { key: String },
    PropertiesChanged { properties: Vec<PropertyOperation> },
    EventOccurred { event: EventOperation },
    /// The client received a method it could not decode into a known shape
    #[serde(skip)]
    Unknown { method: String },
}

impl QueryKind {
    /// Wire method name
    pub fn method(&self) -> &str {
        match self {
            Self::GetProperties { .. } => GET_PROPERTIES_METHOD,
            Self::SetProperties { .. } => SET_PROPERTIES_METHOD,
            Self::InvokeAction { .. } => INVOKE_ACTION_METHOD,
            Self::Ping => PING_METHOD,
            Self::GetAccessKey => GET_ACCESS_KEY_METHOD,
            Self::SetAccessKey { .. } => SET_ACCESS_KEY_METHOD,
            Self::PropertiesChanged { .. } => PROPERTIES_CHANGED_METHOD,
            Self::EventOccurred { .. } => EVENT_OCCURRED_METHOD,
            Self::Unknown { method } => method,
        }
    }
}

/// A query, correlated with its answer by `id`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IqQuery {
    pub id: String,
    #[serde(flatten)]
    pub kind: QueryKind,
}

impl IqQuery {
    pub fn new(id: impl Into<String>, kind: QueryKind) -> Self {
        Self {
            id: id.into(),
            kind,
        }
    }

    pub fn method(&self) -> &str {
        self.kind.method()
    }

    /// Result answering this query, built from its current contents
    ///
    /// Property and action operations are carried over as they are, so a
    /// device that filled in values and statuses is reflected in the result.
    /// A get-access-key result starts with an empty key.
    pub fn result(&self) -> IqResult {
        let kind = match &self.kind {
            QueryKind::GetProperties { properties } => ResultKind::GetProperties {
                properties: properties.clone(),
            },
            QueryKind::SetProperties { properties } => ResultKind::SetProperties {
                properties: properties.clone(),
            },
            QueryKind::InvokeAction { operation } => ResultKind::InvokeAction {
                operation: operation.clone(),
            },
            QueryKind::Ping => ResultKind::Pong,
            QueryKind::GetAccessKey => ResultKind::GetAccessKey { key: String::new() },
            QueryKind::SetAccessKey { .. } => ResultKind::SetAccessKey,
            QueryKind::PropertiesChanged { properties } => ResultKind::PropertiesChanged {
                properties: properties.clone(),
            },
            QueryKind::EventOccurred { .. } => ResultKind::EventOccurred,
            QueryKind::Unknown { method } => ResultKind::Unknown {
                method: method.clone(),
            },
        };
        IqResult::new(self.id.clone(), kind)
    }

    /// Error answering this query
    pub fn error(&self, status: OperationStatus, description: impl Into<String>) -> IqError {
        IqError {
            id: self.id.clone(),
            status,
            description: description.into(),
        }
    }
}

/// Decoded body of a result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "kebab-case")]
pub enum ResultKind {
    GetProperties { properties: Vec<PropertyOperation> },
    SetProperties { properties: Vec<PropertyOperation> },
    InvokeAction { operation: ActionOperation },
    #[serde(rename = "ping")]
    Pong,
    GetAccessKey { key: String },
    SetAccessKey,
    PropertiesChanged { properties: Vec<PropertyOperation> },
    EventOccurred,
    #[serde(skip)]
    Unknown { method: String },
}

impl ResultKind {
    pub fn method(&self) -> &str {
        match self {
            Self::GetProperties { .. } => GET_PROPERTIES_METHOD,
            Self::SetProperties { .. } => SET_PROPERTIES_METHOD,
            Self::InvokeAction { .. } => INVOKE_ACTION_METHOD,
            Self::Pong => PING_METHOD,
            Self::GetAccessKey { .. } => GET_ACCESS_KEY_METHOD,
            Self::SetAccessKey => SET_ACCESS_KEY_METHOD,
            Self::PropertiesChanged { .. } => PROPERTIES_CHANGED_METHOD,
            Self::EventOccurred => EVENT_OCCURRED_METHOD,
            Self::Unknown { method } => method,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IqResult {
    pub id: String,
    #[serde(flatten)]
    pub kind: ResultKind,
}

impl IqResult {
    pub fn new(id: impl Into<String>, kind: ResultKind) -> Self {
        Self {
            id: id.into(),
            kind,
        }
    }

    pub fn method(&self) -> &str {
        self.kind.method()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IqError {
    pub id: String,
    pub status: OperationStatus,
    pub description: String,
}

impl fmt::Display for IqError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.id, self.status, self.description)
    }
}

/// Payload handed to the client's send-result
///
/// An invoke-action query is answered by echoing the query itself, with the
/// operation as the device left it, instead of a separately built result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IqReply {
    Result(IqResult),
    Query(IqQuery),
}

impl IqReply {
    pub fn id(&self) -> &str {
        match self {
            Self::Result(result) => &result.id,
            Self::Query(query) => &query.id,
        }
    }
}

impl From<IqResult> for IqReply {
    fn from(result: IqResult) -> Self {
        Self::Result(result)
    }
}

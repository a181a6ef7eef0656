//! Lifecycle status of a device session
//!
//! ```text
//! Uninitialized -> Initializing -> Initialized -> Connecting -> Connected
//!                       |                            ^            |
//!                       v                            |            v
//!               InitializeFailed               Disconnected <- Disconnecting
//! ```
//!
//! `connect` may be issued again from `Connected` or `Disconnected`; there is
//! no terminal state.

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};

/// Lifecycle status of a device session
///
/// The status always records the last lifecycle step attempted, not the
/// last one that succeeded: a failed connect leaves the session `Connecting`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    /// No client has been created yet
    #[default]
    Uninitialized,
    /// Key material and client are being set up
    Initializing,
    /// Client created, handlers registered, not connected
    Initialized,
    /// Client construction failed
    InitializeFailed,
    /// Connect issued, waiting for the client
    Connecting,
    /// Session established, keepalive running
    Connected,
    /// Disconnect issued
    Disconnecting,
    /// Session closed; a new connect is allowed
    Disconnected,
}

impl Status {
    /// Wire/display name of the status
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Uninitialized => "uninitialized",
            Self::Initializing => "initializing",
            Self::Initialized => "initialized",
            Self::InitializeFailed => "initialize_failed",
            Self::Connecting => "connecting",
            Self::Connected => "connected",
            Self::Disconnecting => "disconnecting",
            Self::Disconnected => "disconnected",
        }
    }

    /// Check if a protocol client exists in this status
    #[must_use]
    pub const fn has_client(&self) -> bool {
        matches!(
            self,
            Self::Initialized
                | Self::Connecting
                | Self::Connected
                | Self::Disconnecting
                | Self::Disconnected
        )
    }

    #[must_use]
    pub const fn is_connected(&self) -> bool {
        matches!(self, Self::Connected)
    }

    /// Check if the status is a transitional one
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        matches!(self, Self::Initializing | Self::Connecting | Self::Disconnecting)
    }
}

impl Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! The contract every registrable capability implements.
//!
//! A **service** is a long-lived subsystem (audio manager, input manager,
//! save system) stored in the [`ServiceRegistry`](crate::ServiceRegistry)
//! and shared across the codebase as an `Arc`. The registry owns teardown:
//! when an entry is removed, explicitly or by a scene sweep, the
//! instance's [`dispose`](Service::dispose) hook runs exactly once.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// Error type for service teardown.
///
/// Returned by [`Service::dispose`]. The registry catches and logs these;
/// a failing teardown never propagates to the caller that triggered the
/// removal and never blocks removal of the other entries in the same sweep.
#[derive(Debug)]
pub enum DisposeError {
    /// The service failed to release one of its resources.
    ResourceRelease(String),
    /// A domain-specific error occurred during teardown.
    TeardownFailed(Box<dyn std::error::Error + Send + Sync>),
}

impl fmt::Display for DisposeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DisposeError::ResourceRelease(msg) => {
                write!(f, "Failed to release resource: {msg}")
            }
            DisposeError::TeardownFailed(e) => write!(f, "Service teardown failed: {e}"),
        }
    }
}

impl std::error::Error for DisposeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DisposeError::TeardownFailed(e) => Some(e.as_ref()),
            _ => None,
        }
    }
}

/// How long a registered service lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Lifetime {
    /// Persists for the life of the process, or until explicitly
    /// unregistered.
    #[default]
    Singleton,
    /// Torn down automatically at the next scene-boundary sweep.
    Scene,
}

impl fmt::Display for Lifetime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Lifetime::Singleton => write!(f, "Singleton"),
            Lifetime::Scene => write!(f, "Scene"),
        }
    }
}

/// Base trait for all services managed by the registry.
///
/// Implementations provide two things:
///
/// - **Teardown** via [`dispose`](Service::dispose), invoked by the registry
///   when the instance is removed. The default is a no-op for services that
///   hold nothing needing explicit release.
/// - **Typed retrieval** via [`as_any_arc`](Service::as_any_arc), which
///   upcasts the shared handle so the registry can hand back `Arc<S>`
///   clones. The implementation is always the same one-liner:
///
/// ```rust
/// use agora_core::service::Service;
/// use std::any::Any;
/// use std::sync::Arc;
///
/// struct SaveSystem;
///
/// impl Service for SaveSystem {
///     fn as_any_arc(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
///         self
///     }
/// }
/// ```
pub trait Service: Send + Sync + 'static {
    /// Teardown hook invoked when the registry discards this instance.
    ///
    /// Errors are reported through the logging channel and suppressed;
    /// see [`DisposeError`].
    fn dispose(&self) -> Result<(), DisposeError> {
        Ok(())
    }

    /// Upcasts the shared handle for downcasting to the concrete type.
    fn as_any_arc(self: Arc<Self>) -> Arc<dyn Any + Send + Sync>;
}

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

//! Explicit lifecycle state machine for hosted services.
//!
//! Engine object lifecycles (create/destroy callbacks) are modelled here
//! as an explicit state machine driven by [`ServiceHost::activate`] and
//! [`ServiceHost::destroy`]. The host touches the registry only through
//! register/unregister; it never inspects registry internals, and the
//! registry never inspects host state.
//!
//! ## Lifecycle
//!
//! ```text
//! Uninitialized  →  activate()  →  Active  →  destroy()  →  Destroyed
//! ```
//!
//! Transitions out of order are rejected with a [`HostError`]. A
//! destroyed host is terminal; build a new host to bring the service
//! back.

use agora_core::{Lifetime, Service, ServiceRegistry};
use std::any::type_name;
use std::fmt;
use std::sync::Arc;

/// Error type for lifecycle transitions.
#[derive(Debug, PartialEq, Eq)]
pub enum HostError {
    /// `activate` was called on a host that is not `Uninitialized`.
    AlreadyStarted {
        /// The state the host was actually in.
        state: ServiceState,
    },
    /// `destroy` was called on a host that is not `Active`.
    NotActive {
        /// The state the host was actually in.
        state: ServiceState,
    },
}

impl fmt::Display for HostError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HostError::AlreadyStarted { state } => {
                write!(f, "Cannot activate a host in state {state}")
            }
            HostError::NotActive { state } => {
                write!(f, "Cannot destroy a host in state {state}")
            }
        }
    }
}

impl std::error::Error for HostError {}

/// Lifecycle states for a hosted service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceState {
    /// Built but not yet registered; hooks have not run.
    Uninitialized,
    /// Registered and live in a registry.
    Active,
    /// Unregistered after teardown; terminal.
    Destroyed,
}

impl fmt::Display for ServiceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceState::Uninitialized => write!(f, "Uninitialized"),
            ServiceState::Active => write!(f, "Active"),
            ServiceState::Destroyed => write!(f, "Destroyed"),
        }
    }
}

/// Hooks invoked as a hosted service crosses lifecycle boundaries.
///
/// Both hooks default to no-ops; services only override what they need.
/// `on_create` runs after the instance is registered, `on_destroy` runs
/// before it is unregistered (and before its dispose hook, which the
/// registry fires during removal).
pub trait Lifecycle: Service {
    /// Called once when the host activates, after registration.
    fn on_create(&self) {}

    /// Called once when the host is destroyed, before unregistration.
    fn on_destroy(&self) {}
}

/// Owns a service instance and walks it through its lifecycle.
///
/// The host pairs an `Arc<S>` with its [`ServiceState`] and the
/// [`Lifetime`] it registers under. Engine bootstrap code builds hosts
/// for scene objects and drives the transitions at well-defined points
/// (scene load, scene unload, shutdown).
pub struct ServiceHost<S: Lifecycle> {
    service: Arc<S>,
    lifetime: Lifetime,
    state: ServiceState,
}

impl<S: Lifecycle> ServiceHost<S> {
    /// Creates a host in the `Uninitialized` state.
    pub fn new(service: Arc<S>, lifetime: Lifetime) -> Self {
        Self {
            service,
            lifetime,
            state: ServiceState::Uninitialized,
        }
    }

    /// Returns the current lifecycle state.
    pub fn state(&self) -> ServiceState {
        self.state
    }

    /// Returns a handle to the hosted service.
    pub fn service(&self) -> Arc<S> {
        Arc::clone(&self.service)
    }

    /// Registers the service and runs its `on_create` hook.
    ///
    /// Only valid from `Uninitialized`.
    pub fn activate(&mut self, registry: &mut ServiceRegistry) -> Result<(), HostError> {
        if self.state != ServiceState::Uninitialized {
            return Err(HostError::AlreadyStarted { state: self.state });
        }

        log::info!("ServiceHost: Activating {}", type_name::<S>());
        registry.register(Arc::clone(&self.service), self.lifetime);
        self.state = ServiceState::Active;
        self.service.on_create();
        Ok(())
    }

    /// Runs the service's `on_destroy` hook and unregisters it.
    ///
    /// Only valid from `Active`. The registry disposes the instance as
    /// part of unregistration.
    pub fn destroy(&mut self, registry: &mut ServiceRegistry) -> Result<(), HostError> {
        if self.state != ServiceState::Active {
            return Err(HostError::NotActive { state: self.state });
        }

        log::info!("ServiceHost: Destroying {}", type_name::<S>());
        self.service.on_destroy();
        registry.unregister::<S>();
        self.state = ServiceState::Destroyed;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::any::Any;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct TrackedInput {
        created: AtomicUsize,
        destroyed: AtomicUsize,
    }

    impl Service for TrackedInput {
        fn as_any_arc(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
            self
        }
    }

    impl Lifecycle for TrackedInput {
        fn on_create(&self) {
            self.created.fetch_add(1, Ordering::SeqCst);
        }

        fn on_destroy(&self) {
            self.destroyed.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn activate_registers_and_fires_on_create() {
        let mut registry = ServiceRegistry::new();
        let input = Arc::new(TrackedInput::default());
        let mut host = ServiceHost::new(Arc::clone(&input), Lifetime::Singleton);

        assert_eq!(host.state(), ServiceState::Uninitialized);
        host.activate(&mut registry).expect("fresh host activates");

        assert_eq!(host.state(), ServiceState::Active);
        assert_eq!(input.created.load(Ordering::SeqCst), 1);

        let resolved = registry.resolve::<TrackedInput>().expect("host registered");
        assert!(Arc::ptr_eq(&resolved, &input));
    }

    #[test]
    fn destroy_unregisters_and_fires_on_destroy() {
        let mut registry = ServiceRegistry::new();
        let input = Arc::new(TrackedInput::default());
        let mut host = ServiceHost::new(Arc::clone(&input), Lifetime::Singleton);

        host.activate(&mut registry).expect("fresh host activates");
        host.destroy(&mut registry).expect("active host destroys");

        assert_eq!(host.state(), ServiceState::Destroyed);
        assert_eq!(input.destroyed.load(Ordering::SeqCst), 1);
        assert!(registry.resolve::<TrackedInput>().is_none());
    }

    #[test]
    fn out_of_order_transitions_are_rejected() {
        let mut registry = ServiceRegistry::new();
        let mut host = ServiceHost::new(Arc::new(TrackedInput::default()), Lifetime::Singleton);

        assert_eq!(
            host.destroy(&mut registry),
            Err(HostError::NotActive {
                state: ServiceState::Uninitialized
            })
        );

        host.activate(&mut registry).expect("fresh host activates");
        assert_eq!(
            host.activate(&mut registry),
            Err(HostError::AlreadyStarted {
                state: ServiceState::Active
            })
        );

        host.destroy(&mut registry).expect("active host destroys");
        assert_eq!(
            host.activate(&mut registry),
            Err(HostError::AlreadyStarted {
                state: ServiceState::Destroyed
            }),
            "a destroyed host is terminal"
        );
    }

    #[test]
    fn hooks_do_not_fire_on_rejected_transitions() {
        let mut registry = ServiceRegistry::new();
        let input = Arc::new(TrackedInput::default());
        let mut host = ServiceHost::new(Arc::clone(&input), Lifetime::Singleton);

        let _ = host.destroy(&mut registry);
        assert_eq!(input.destroyed.load(Ordering::SeqCst), 0);

        host.activate(&mut registry).expect("fresh host activates");
        let _ = host.activate(&mut registry);
        assert_eq!(input.created.load(Ordering::SeqCst), 1);
    }
}

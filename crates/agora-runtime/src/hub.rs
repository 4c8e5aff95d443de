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

//! The process-wide service hub.
//!
//! Holds exactly one [`ServiceRegistry`] so producers and consumers across
//! the codebase can reach it without being handed a reference. The
//! registry sits behind a single mutex: sweeps and resolves are mutually
//! exclusive critical sections, which is all the serialization the
//! single-threaded cooperative model needs when a worker thread joins in.
//!
//! Prefer private [`ServiceRegistry`] instances in tests; the hub exists
//! for production wiring, and [`reset`] is the escape hatch for the few
//! tests that must go through it.

use agora_core::{Lifetime, Service, ServiceRegistry};
use once_cell::sync::Lazy;
use std::sync::{Arc, Mutex, PoisonError};

static HUB: Lazy<Mutex<ServiceRegistry>> = Lazy::new(|| Mutex::new(ServiceRegistry::new()));

/// Runs `f` against the process-wide registry.
///
/// The hub lock is held for the duration of `f`; keep the closure short
/// and never call back into the hub from inside it.
pub fn with<R>(f: impl FnOnce(&mut ServiceRegistry) -> R) -> R {
    let mut registry = HUB.lock().unwrap_or_else(PoisonError::into_inner);
    f(&mut registry)
}

/// Resolves `S` from the shared registry.
pub fn resolve<S: Service>() -> Option<Arc<S>> {
    with(|registry| registry.resolve::<S>())
}

/// Registers `instance` in the shared registry.
pub fn register<S: Service>(instance: Arc<S>, lifetime: Lifetime) {
    with(|registry| {
        registry.register(instance, lifetime);
    });
}

/// Binds a factory in the shared registry.
pub fn bind<S, F>(factory: F, lifetime: Lifetime)
where
    S: Service,
    F: Fn() -> Arc<S> + Send + Sync + 'static,
{
    with(|registry| {
        registry.bind(factory, lifetime);
    });
}

/// Unregisters `S` from the shared registry.
pub fn unregister<S: Service>() {
    with(|registry| registry.unregister::<S>());
}

/// Fully unbinds `S` from the shared registry.
pub fn unbind<S: Service>() {
    with(|registry| registry.unbind::<S>());
}

/// Replaces the shared registry with a fresh one.
///
/// The outgoing registry runs its normal teardown on drop. Intended for
/// test isolation and full application restarts.
pub fn reset() {
    log::info!("Hub: Resetting the process-wide service registry.");
    with(|registry| *registry = ServiceRegistry::new());
}

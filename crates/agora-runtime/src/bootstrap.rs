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

//! Startup registration list.
//!
//! Every capability-producing module contributes an explicit registration
//! closure; the bootstrapper applies them in order against a registry at
//! startup, and again after a scene load if the application wants
//! re-registration (register and bind overwrite, so re-applying is
//! idempotent). There is no runtime type scanning: what is not listed
//! here does not exist.

use agora_core::ServiceRegistry;

use crate::hub;

type Registration = Box<dyn Fn(&mut ServiceRegistry) + Send + Sync>;

/// Ordered list of service registrations applied at startup.
///
/// ```rust
/// use agora_core::{Lifetime, Service, ServiceRegistry};
/// use agora_runtime::Bootstrapper;
/// use std::any::Any;
/// use std::sync::Arc;
///
/// struct InputManager;
///
/// impl Service for InputManager {
///     fn as_any_arc(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
///         self
///     }
/// }
///
/// let bootstrapper = Bootstrapper::new()
///     .with(|registry| {
///         registry.register(Arc::new(InputManager), Lifetime::Singleton);
///     });
///
/// let mut registry = ServiceRegistry::new();
/// bootstrapper.apply(&mut registry);
/// assert!(registry.contains::<InputManager>());
/// ```
#[derive(Default)]
pub struct Bootstrapper {
    registrations: Vec<Registration>,
}

impl Bootstrapper {
    /// Creates an empty bootstrapper.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a registration step.
    ///
    /// Steps run in the order they were added, so later steps may rely on
    /// earlier ones being resolvable.
    pub fn with(mut self, registration: impl Fn(&mut ServiceRegistry) + Send + Sync + 'static) -> Self {
        self.registrations.push(Box::new(registration));
        self
    }

    /// Returns the number of registration steps.
    pub fn len(&self) -> usize {
        self.registrations.len()
    }

    /// Returns `true` if no steps were added.
    pub fn is_empty(&self) -> bool {
        self.registrations.is_empty()
    }

    /// Applies every registration step, in order, to `registry`.
    pub fn apply(&self, registry: &mut ServiceRegistry) {
        log::info!(
            "Bootstrapper: Applying {} registration steps",
            self.registrations.len()
        );
        for registration in &self.registrations {
            registration(registry);
        }
    }

    /// Applies every registration step to the process-wide hub.
    pub fn apply_shared(&self) {
        hub::with(|registry| self.apply(registry));
    }
}

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

//! A generic, type-safe service registry and locator for runtime subsystems.
//!
//! The [`ServiceRegistry`] is a type-map with a two-tier lifetime model:
//! `Singleton` entries live until explicitly removed, `Scene` entries are
//! torn down on every scene-boundary sweep. Entries are created eagerly
//! with [`register`](ServiceRegistry::register) or lazily with
//! [`bind`](ServiceRegistry::bind), and looked up from anywhere with
//! [`resolve`](ServiceRegistry::resolve).
//!
//! # Design
//!
//! This follows the **Service Locator** pattern: producers register
//! capabilities under their concrete type, consumers fetch only the
//! services they need, and adding a new service never changes a shared
//! context struct. The registry owns teardown; consumers hold plain `Arc`
//! clones and never dispose anything themselves.

use crate::event::{SceneChannel, SceneTransition};
use crate::service::{Lifetime, Service};
use std::any::{type_name, TypeId};
use std::collections::HashMap;
use std::sync::Arc;

/// Type-erased constructor stored by [`ServiceRegistry::bind`].
type ServiceFactory = Box<dyn Fn() -> Arc<dyn Service> + Send + Sync>;

struct ResolvedEntry {
    instance: Arc<dyn Service>,
    type_name: &'static str,
    /// Monotonic registration stamp, drives reverse-order teardown.
    seq: u64,
}

struct FactoryEntry {
    produce: ServiceFactory,
    type_name: &'static str,
}

/// A service registry keyed by [`TypeId`], with scene-scoped teardown.
///
/// Services are stored as `Arc<dyn Service>` and retrieved by their
/// concrete type via [`resolve`](ServiceRegistry::resolve). A key may hold
/// a cached instance, a pending factory, or both; resolution prefers the
/// cached instance and memoizes factory output on first access.
///
/// # Example
///
/// ```rust
/// use agora_core::registry::ServiceRegistry;
/// use agora_core::service::{Lifetime, Service};
/// use std::any::Any;
/// use std::sync::Arc;
///
/// struct AudioService {
///     volume: f32,
/// }
///
/// impl Service for AudioService {
///     fn as_any_arc(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
///         self
///     }
/// }
///
/// let mut registry = ServiceRegistry::new();
/// registry.register(Arc::new(AudioService { volume: 0.8 }), Lifetime::Singleton);
///
/// let audio = registry.resolve::<AudioService>().unwrap();
/// assert_eq!(audio.volume, 0.8);
/// ```
#[derive(Default)]
pub struct ServiceRegistry {
    resolved: HashMap<TypeId, ResolvedEntry>,
    factories: HashMap<TypeId, FactoryEntry>,
    /// Scene-scoped keys in tagging order; swept back-to-front.
    scene_scoped: Vec<TypeId>,
    scene_events: Option<flume::Receiver<SceneTransition>>,
    next_seq: u64,
}

impl ServiceRegistry {
    /// Creates an empty service registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a factory for `S`, invoked on the first
    /// [`resolve`](ServiceRegistry::resolve) after each removal.
    ///
    /// A prior factory for the same key is replaced. An already-resolved
    /// instance is NOT evicted: resolution keeps returning the cached
    /// instance until the key is unbound or unregistered.
    ///
    /// With [`Lifetime::Scene`] the key joins the scene-scope index and
    /// its instances are torn down at every scene boundary. Rebinding a
    /// scene-scoped key as `Singleton` does not demote it; unbind first.
    ///
    /// Returns `&mut Self` so multiple binds can be chained.
    pub fn bind<S, F>(&mut self, factory: F, lifetime: Lifetime) -> &mut Self
    where
        S: Service,
        F: Fn() -> Arc<S> + Send + Sync + 'static,
    {
        let key = TypeId::of::<S>();
        let name = type_name::<S>();

        let produce: ServiceFactory = Box::new(move || {
            let instance: Arc<dyn Service> = factory();
            instance
        });
        self.factories.insert(
            key,
            FactoryEntry {
                produce,
                type_name: name,
            },
        );
        log::info!("ServiceRegistry: Bound factory for {name} ({lifetime})");

        self.tag_lifetime(key, name, lifetime);
        self
    }

    /// Stores `instance` as the resolved entry for `S`.
    ///
    /// A previously resolved instance for the same key is replaced without
    /// being disposed; teardown only runs on explicit removal, sweeps,
    /// [`clear`](ServiceRegistry::clear), and drop. Scene tagging works as
    /// in [`bind`](ServiceRegistry::bind).
    ///
    /// Returns `&mut Self` so multiple registrations can be chained.
    pub fn register<S: Service>(&mut self, instance: Arc<S>, lifetime: Lifetime) -> &mut Self {
        let key = TypeId::of::<S>();
        let name = type_name::<S>();

        if self.resolved.contains_key(&key) {
            log::debug!("ServiceRegistry: Replacing resolved {name} (previous not disposed)");
        }
        self.insert_resolved(key, instance, name);
        log::info!("ServiceRegistry: Registered {name} ({lifetime})");

        self.tag_lifetime(key, name, lifetime);
        self
    }

    /// Retrieves the service registered under `S`, materializing it from
    /// the bound factory on first access.
    ///
    /// Returns `None` if the key holds neither an instance nor a factory.
    /// Absence is a normal outcome: callers routinely probe for optional
    /// capabilities.
    ///
    /// The factory for a key is invoked at most once between any two
    /// removals of that key.
    pub fn resolve<S: Service>(&mut self) -> Option<Arc<S>> {
        let key = TypeId::of::<S>();

        if let Some(entry) = self.resolved.get(&key) {
            return downcast::<S>(Arc::clone(&entry.instance));
        }

        let factory = self.factories.get(&key)?;
        let instance = (factory.produce)();
        let name = factory.type_name;
        log::debug!("ServiceRegistry: Materialized {name}");
        self.insert_resolved(key, Arc::clone(&instance), name);
        downcast::<S>(instance)
    }

    /// Fully forgets the capability `S`: removes the factory, disposes and
    /// removes any resolved instance, and drops the scene tag.
    ///
    /// Calling this on an absent key is a no-op.
    pub fn unbind<S: Service>(&mut self) {
        let key = TypeId::of::<S>();
        if self.factories.remove(&key).is_some() {
            log::debug!("ServiceRegistry: Unbound factory for {}", type_name::<S>());
        }
        self.scene_scoped.retain(|tagged| *tagged != key);
        self.remove_and_dispose(key);
    }

    /// Disposes and removes the resolved instance for `S` and drops the
    /// scene tag. A bound factory survives, so the next resolve
    /// re-materializes a fresh instance.
    ///
    /// Calling this on an absent key is a no-op.
    pub fn unregister<S: Service>(&mut self) {
        let key = TypeId::of::<S>();
        self.scene_scoped.retain(|tagged| *tagged != key);
        self.remove_and_dispose(key);
    }

    /// Tears down the resolved instance of every scene-scoped key, in
    /// reverse tagging order.
    ///
    /// Factories and scene tags survive the sweep: a still-bound key is
    /// rebuilt lazily in the next scene and swept again at the next
    /// boundary. Driven by the scene-transition notification (see
    /// [`pump_scene_events`](ServiceRegistry::pump_scene_events)), not by
    /// application code.
    pub fn sweep(&mut self) {
        if !self.scene_scoped.is_empty() {
            log::debug!(
                "ServiceRegistry: Sweeping {} scene-scoped entries",
                self.scene_scoped.len()
            );
        }
        let keys: Vec<TypeId> = self.scene_scoped.iter().rev().copied().collect();
        for key in keys {
            self.remove_and_dispose(key);
        }
    }

    /// Disposes and removes every entry: scene-scoped instances first,
    /// then the rest in reverse registration order, then all factories
    /// and tags.
    ///
    /// Invoked from `Drop` as well, so an owned registry going out of
    /// scope is a controlled shutdown.
    pub fn clear(&mut self) {
        self.sweep();

        let mut remaining: Vec<(u64, TypeId)> = self
            .resolved
            .iter()
            .map(|(key, entry)| (entry.seq, *key))
            .collect();
        remaining.sort_unstable_by(|a, b| b.0.cmp(&a.0));
        for (_, key) in remaining {
            self.remove_and_dispose(key);
        }

        self.factories.clear();
        self.scene_scoped.clear();
    }

    /// Subscribes this registry to a scene-boundary channel.
    ///
    /// Replaces any previous subscription.
    pub fn subscribe(&mut self, channel: &SceneChannel) {
        self.scene_events = Some(channel.receiver().clone());
    }

    /// Drains pending scene-transition notifications, running one
    /// [`sweep`](ServiceRegistry::sweep) per notification.
    ///
    /// Returns the number of transitions processed. Call this from the
    /// main loop; without a subscription it is a no-op.
    pub fn pump_scene_events(&mut self) -> usize {
        let receiver = match self.scene_events.clone() {
            Some(receiver) => receiver,
            None => return 0,
        };

        let mut transitions = 0;
        while receiver.try_recv().is_ok() {
            self.sweep();
            transitions += 1;
        }
        transitions
    }

    /// Returns `true` if `S` can currently be resolved, either from a
    /// cached instance or a bound factory.
    #[must_use]
    pub fn contains<S: Service>(&self) -> bool {
        let key = TypeId::of::<S>();
        self.resolved.contains_key(&key) || self.factories.contains_key(&key)
    }

    /// Returns the number of live (resolved) service instances.
    #[must_use]
    pub fn len(&self) -> usize {
        self.resolved.len()
    }

    /// Returns `true` if no service instance is currently live.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.resolved.is_empty()
    }

    /// Returns the type names of all live service instances, sorted.
    #[must_use]
    pub fn service_names(&self) -> Vec<&'static str> {
        let mut names: Vec<&'static str> =
            self.resolved.values().map(|entry| entry.type_name).collect();
        names.sort_unstable();
        names
    }

    /// Logs a summary of live services and pending factories at debug
    /// level.
    pub fn dump(&self) {
        let mut report = format!("Service registry dump\nAlive services: {}", self.len());
        for name in self.service_names() {
            report.push_str("\n\t");
            report.push_str(name);
        }
        report.push_str(&format!("\nPending factories: {}", self.factories.len()));
        log::debug!("{report}");
    }

    fn insert_resolved(&mut self, key: TypeId, instance: Arc<dyn Service>, name: &'static str) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.resolved.insert(
            key,
            ResolvedEntry {
                instance,
                type_name: name,
                seq,
            },
        );
    }

    fn tag_lifetime(&mut self, key: TypeId, name: &'static str, lifetime: Lifetime) {
        match lifetime {
            Lifetime::Scene => {
                if !self.scene_scoped.contains(&key) {
                    self.scene_scoped.push(key);
                }
            }
            Lifetime::Singleton => {
                // No automatic demotion: the tag only leaves with an
                // explicit unbind/unregister.
                if self.scene_scoped.contains(&key) {
                    log::warn!(
                        "ServiceRegistry: {name} stays scene-scoped; unbind before rebinding as Singleton"
                    );
                }
            }
        }
    }

    /// Pops the resolved instance for `key` and runs its teardown hook.
    ///
    /// A failing teardown is logged and suppressed; the entry is removed
    /// regardless, and the failure never reaches the caller.
    fn remove_and_dispose(&mut self, key: TypeId) {
        let entry = match self.resolved.remove(&key) {
            Some(entry) => entry,
            None => return,
        };
        log::info!("ServiceRegistry: Discarding {}", entry.type_name);
        if let Err(e) = entry.instance.dispose() {
            log::error!(
                "ServiceRegistry: Disposal of {} failed: {e}. Entry removed regardless.",
                entry.type_name
            );
        }
    }
}

impl Drop for ServiceRegistry {
    fn drop(&mut self) {
        if !self.resolved.is_empty() {
            log::info!(
                "ServiceRegistry: Dropped with {} live services, running teardown.",
                self.resolved.len()
            );
        }
        self.clear();
    }
}

fn downcast<S: Service>(instance: Arc<dyn Service>) -> Option<Arc<S>> {
    instance.as_any_arc().downcast::<S>().ok()
}

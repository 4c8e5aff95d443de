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

//! # Agora Core
//!
//! Foundational crate for the Agora service registry: the service contract,
//! the type-indexed registry/locator, and the scene-boundary notification
//! channel that drives scoped teardown.

#![warn(missing_docs)]

pub mod event;
pub mod registry;
pub mod service;

pub use event::{SceneChannel, SceneNotifier, SceneTransition};
pub use registry::ServiceRegistry;
pub use service::{DisposeError, Lifetime, Service};

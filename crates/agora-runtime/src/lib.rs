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

//! # Agora Runtime
//!
//! Process-wide wiring above the core registry: the shared hub reachable
//! from anywhere, the hosted-service lifecycle state machine, and the
//! startup bootstrapper that replaces reflection-driven discovery with an
//! explicit registration list.

#![warn(missing_docs)]

pub mod bootstrap;
pub mod host;
pub mod hub;

pub use bootstrap::Bootstrapper;
pub use host::{HostError, Lifecycle, ServiceHost, ServiceState};

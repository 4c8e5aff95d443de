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

//! Scene-boundary notification primitives.
//!
//! The host application owns a [`SceneChannel`] and hands out cloneable
//! [`SceneNotifier`] handles to whatever code drives scene changes (the
//! engine's scene loader, a level-complete screen, a test harness). The
//! [`ServiceRegistry`](crate::ServiceRegistry) subscribes to the channel
//! and sweeps its scene-scoped entries once per received notification.
//!
//! Outside a game engine the same channel models any "invalidate scope"
//! trigger: end of a request, end of a level, end of a test case.

mod channel;

pub use self::channel::{SceneChannel, SceneNotifier, SceneTransition};

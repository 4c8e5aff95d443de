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

use log;

/// Notification that a scene boundary was crossed.
///
/// Carries no payload: subscribers only need to know that a transition
/// occurred, not which scene is involved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SceneTransition;

/// Manages the scene-boundary notification channel.
///
/// One `SceneChannel` exists per registry lifetime, owned by the host
/// application's main loop. Producers signal through [`SceneNotifier`]
/// handles; the consumer drains the receiver (the registry does this in
/// `pump_scene_events`).
#[derive(Debug)]
pub struct SceneChannel {
    sender: flume::Sender<SceneTransition>,
    receiver: flume::Receiver<SceneTransition>,
}

impl SceneChannel {
    /// Creates a new channel with unbounded capacity.
    ///
    /// Transitions are rare and the payload is zero-sized, so backpressure
    /// is not a concern.
    pub fn new() -> Self {
        let (sender, receiver) = flume::unbounded();
        log::info!("SceneChannel initialized.");
        Self { sender, receiver }
    }

    /// Returns a notifier handle for signalling scene transitions.
    ///
    /// Handles are cheap to clone and may outlive the code that created
    /// them; notifying after the channel is gone is logged and dropped.
    pub fn notifier(&self) -> SceneNotifier {
        SceneNotifier {
            sender: self.sender.clone(),
        }
    }

    /// Returns a reference to the receiver end of the channel.
    ///
    /// Intended for the registry (or any other consumer) to drain pending
    /// notifications.
    pub fn receiver(&self) -> &flume::Receiver<SceneTransition> {
        &self.receiver
    }
}

impl Default for SceneChannel {
    fn default() -> Self {
        Self::new()
    }
}

/// Cloneable handle for signalling that a scene boundary was crossed.
#[derive(Debug, Clone)]
pub struct SceneNotifier {
    sender: flume::Sender<SceneTransition>,
}

impl SceneNotifier {
    /// Signals one scene transition.
    pub fn notify(&self) {
        log::trace!("Scene transition signalled.");

        if let Err(e) = self.sender.send(SceneTransition) {
            log::error!("Failed to signal scene transition: {e}. Receiver likely disconnected.");
        }
    }
}

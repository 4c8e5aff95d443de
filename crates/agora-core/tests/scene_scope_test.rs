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

use agora_core::{DisposeError, Lifetime, SceneChannel, Service, ServiceRegistry};
use std::any::Any;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

// --- FAKE SUBSYSTEMS FOR THIS TEST ---

#[derive(Default)]
struct AudioService {
    disposed: AtomicUsize,
}

impl Service for AudioService {
    fn dispose(&self) -> Result<(), DisposeError> {
        self.disposed.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn as_any_arc(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
        self
    }
}

struct SaveSystem;

impl Service for SaveSystem {
    fn as_any_arc(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
        self
    }
}

#[test]
fn scene_scoped_audio_is_rebuilt_each_level() {
    let _ = env_logger::builder().is_test(true).try_init();

    // --- 1. ARRANGE ---
    // Level start: the audio factory is bound scene-scoped, the save
    // system is a process-lifetime singleton.
    let mut registry = ServiceRegistry::new();
    let channel = SceneChannel::new();
    let level_complete = channel.notifier();
    registry.subscribe(&channel);

    let factory_runs = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&factory_runs);
    registry
        .bind(
            move || {
                counter.fetch_add(1, Ordering::SeqCst);
                Arc::new(AudioService::default())
            },
            Lifetime::Scene,
        )
        .register(Arc::new(SaveSystem), Lifetime::Singleton);

    // --- 2. ACT: play through the level ---
    // Three resolves within the level share one materialized instance.
    let in_level = registry.resolve::<AudioService>().expect("factory bound");
    for _ in 0..2 {
        let again = registry.resolve::<AudioService>().expect("still cached");
        assert!(Arc::ptr_eq(&again, &in_level));
    }
    assert_eq!(factory_runs.load(Ordering::SeqCst), 1);

    let save_before = registry.resolve::<SaveSystem>().expect("singleton up");

    // Level complete: the engine fires the scene boundary.
    level_complete.notify();
    let transitions = registry.pump_scene_events();

    // --- 3. ASSERT ---
    assert_eq!(transitions, 1, "one boundary, one sweep");
    assert_eq!(
        in_level.disposed.load(Ordering::SeqCst),
        1,
        "the level's audio instance was disposed by the sweep"
    );

    let next_level = registry
        .resolve::<AudioService>()
        .expect("the factory survives the sweep");
    assert!(
        !Arc::ptr_eq(&next_level, &in_level),
        "the next level gets a freshly constructed audio service"
    );
    assert_eq!(factory_runs.load(Ordering::SeqCst), 2);

    let save_after = registry.resolve::<SaveSystem>().expect("singleton survives");
    assert!(
        Arc::ptr_eq(&save_after, &save_before),
        "singletons are never swept"
    );
}

#[test]
fn explicit_sweep_works_without_a_channel() {
    let _ = env_logger::builder().is_test(true).try_init();

    // Embeddings without an engine loop call sweep directly at whatever
    // boundary they define (end of request, end of test case).
    let mut registry = ServiceRegistry::new();
    let audio = Arc::new(AudioService::default());
    registry.register(Arc::clone(&audio), Lifetime::Scene);

    registry.sweep();

    assert_eq!(audio.disposed.load(Ordering::SeqCst), 1);
    assert!(registry.resolve::<AudioService>().is_none());
}

//! In-memory home of every browser's `UploadForm`.
//!
//! The cookie session only carries a form id; the form itself, including
//! the selected file's bytes, lives here and is never written anywhere else.

use crate::models::UploadForm;
use dashmap::DashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use uuid::Uuid;

struct Entry {
    form: UploadForm,
    touched: Instant,
}

#[derive(Clone, Default)]
pub struct FormStore {
    forms: Arc<DashMap<Uuid, Entry>>,
}

impl FormStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of the form for rendering. Unknown ids read as an empty form.
    pub fn snapshot(&self, id: Uuid) -> UploadForm {
        self.forms
            .get(&id)
            .map(|entry| entry.form.clone())
            .unwrap_or_default()
    }

    /// Apply `f` to the form under the map's shard lock, creating it if
    /// needed. `f` must not block; never call this across an `.await`.
    pub fn update<R>(&self, id: Uuid, f: impl FnOnce(&mut UploadForm) -> R) -> R {
        let mut entry = self.forms.entry(id).or_insert_with(|| Entry {
            form: UploadForm::new(),
            touched: Instant::now(),
        });
        entry.touched = Instant::now();
        f(&mut entry.form)
    }

    pub fn len(&self) -> usize {
        self.forms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.forms.is_empty()
    }

    /// Drop forms untouched for longer than `max_idle`. Forms with a request
    /// in flight are kept. Returns how many were dropped.
    pub fn sweep_idle(&self, max_idle: Duration) -> usize {
        let before = self.forms.len();
        let now = Instant::now();
        self.forms.retain(|_, entry| {
            entry.form.is_loading() || now.duration_since(entry.touched) < max_idle
        });
        before.saturating_sub(self.forms.len())
    }

    /// Periodically evict idle forms for as long as the runtime lives.
    pub fn spawn_sweeper(&self, max_idle: Duration) -> tokio::task::JoinHandle<()> {
        let store = self.clone();
        let period = (max_idle / 4).max(Duration::from_secs(1));

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                let evicted = store.sweep_idle(max_idle);
                if evicted > 0 {
                    tracing::debug!(evicted, remaining = store.len(), "Evicted idle upload forms");
                }
            }
        })
    }
}

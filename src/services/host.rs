//! Host capability surface for interactive API key selection
//!
//! Some host environments expose a key-picker dialog that must be completed
//! before paid image calls are made. The surface is injectable so that hosts
//! without a picker (the common case) fall back to a no-op that never blocks
//! a call.

use async_trait::async_trait;

/// Capabilities optionally provided by the embedding host
#[async_trait]
pub trait HostCapabilities: Send + Sync {
    /// Whether the user has already selected an API key
    async fn has_selected_api_key(&self) -> bool;

    /// Open the interactive key picker and wait for it to close
    async fn open_select_key(&self);
}

/// Default surface for hosts without a key picker
///
/// Reports the key as selected so gated operations proceed; absence of the
/// picker is normal and never fails a call.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopHost;

#[async_trait]
impl HostCapabilities for NoopHost {
    async fn has_selected_api_key(&self) -> bool {
        true
    }

    async fn open_select_key(&self) {}
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    use super::*;

    /// Scriptable host surface for gate tests
    #[derive(Debug, Default)]
    pub struct ScriptedHost {
        selected: AtomicBool,
        /// Whether completing the picker selects a key
        select_on_open: bool,
        pub open_calls: AtomicUsize,
    }

    impl ScriptedHost {
        pub fn declining() -> Self {
            Self::default()
        }

        pub fn accepting() -> Self {
            Self {
                select_on_open: true,
                ..Self::default()
            }
        }
    }

    #[async_trait]
    impl HostCapabilities for ScriptedHost {
        async fn has_selected_api_key(&self) -> bool {
            self.selected.load(Ordering::SeqCst)
        }

        async fn open_select_key(&self) {
            self.open_calls.fetch_add(1, Ordering::SeqCst);
            if self.select_on_open {
                self.selected.store(true, Ordering::SeqCst);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_noop_host_reports_selected() {
        tokio_test::block_on(async {
            let host = NoopHost;
            assert!(host.has_selected_api_key().await);
            host.open_select_key().await;
        });
    }
}

use parking_lot::Mutex;
use std::sync::Arc;

/// The region whose HTML a lookup replaces.
///
/// Writes take `&self` so several in-flight lookups can share one container;
/// the last write wins.
pub trait Container: Send + Sync {
    fn replace(&self, html: String);
}

/// In-memory container. Clones share the same content.
#[derive(Debug, Clone, Default)]
pub struct MemoryContainer {
    html: Arc<Mutex<String>>,
}

impl MemoryContainer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with some content already shown.
    pub fn with_content(html: impl Into<String>) -> Self {
        Self { html: Arc::new(Mutex::new(html.into())) }
    }

    pub fn contents(&self) -> String {
        self.html.lock().clone()
    }
}

impl Container for MemoryContainer {
    fn replace(&self, html: String) {
        *self.html.lock() = html;
    }
}

// ABOUTME: Tracks which images are known to exist per host.
// ABOUTME: Process-lifetime memo owned by the manager, no eviction.

use super::translate::DEFAULT_IMAGE;
use parking_lot::Mutex;
use std::collections::HashSet;

/// Images already pulled, keyed `host/image`.
///
/// The source system kept this in a hidden process-wide static; owning it on
/// the manager keeps instances independent and tests hermetic.
#[derive(Default)]
pub struct ImageCache {
    pulled: Mutex<HashSet<String>>,
}

impl ImageCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, host: &str, image: &str) -> bool {
        self.pulled.lock().contains(&key(host, image))
    }

    pub fn record(&self, host: &str, image: &str) {
        self.pulled.lock().insert(key(host, image));
    }
}

fn key(host: &str, image: &str) -> String {
    format!("{}/{}", host, image)
}

/// Normalize an image reference for pulling: blank falls back to the default
/// image, and a reference without a `:` gets `:latest` appended.
pub(crate) fn normalize_image(image: Option<&str>) -> String {
    let reference = image
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(DEFAULT_IMAGE);
    if reference.contains(':') {
        reference.to_string()
    } else {
        format!("{}:latest", reference)
    }
}

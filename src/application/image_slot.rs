//! Per-element image slot with a local loading guard.

use std::sync::Arc;

use crate::domain::entities::{ImageKey, ImageStatus, LoadSource, LoadedImage};

/// Holds one UI element's decoded image and its loading state.
///
/// The guard is local to this slot: it stops one element from issuing two
/// requests for its own URL, not different elements from racing on the same
/// URL (the loader's in-flight registry handles that). Until an image
/// arrives, the element renders its placeholder; a failed load leaves the
/// placeholder in place and re-arms the slot so a later appearance retries.
#[derive(Debug, Clone)]
pub struct ImageSlot {
    key: ImageKey,
    url: String,
    image: Option<Arc<image::DynamicImage>>,
    status: ImageStatus,
}

impl ImageSlot {
    /// Creates a slot for a source URL.
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        let url = url.into();
        Self {
            key: ImageKey::from_url(&url),
            url,
            image: None,
            status: ImageStatus::NotStarted,
        }
    }

    /// Begins a load if one is warranted, returning the request to queue.
    ///
    /// Returns `None` while a request is in flight or once the image is
    /// ready; a previously failed slot may start again.
    pub fn start(&mut self) -> Option<(ImageKey, String)> {
        if self.status.is_loading() || self.status.is_ready() {
            return None;
        }
        self.status = ImageStatus::Loading;
        Some((self.key.clone(), self.url.clone()))
    }

    /// Applies a load result for this slot's key.
    ///
    /// Results for other keys are ignored so one event channel can fan out
    /// across many slots.
    pub fn apply(&mut self, key: &ImageKey, result: &Result<LoadedImage, String>) {
        if *key != self.key {
            return;
        }
        match result {
            Ok(loaded) => {
                self.image = Some(loaded.image.clone());
                self.status = ImageStatus::Ready;
            }
            Err(message) => {
                self.image = None;
                self.status = ImageStatus::Failed(message.clone());
            }
        }
    }

    /// Directly marks the slot ready, e.g. after a synchronous cache hit.
    pub fn set_ready(&mut self, image: Arc<image::DynamicImage>) {
        self.image = Some(image);
        self.status = ImageStatus::Ready;
    }

    /// The slot's cache key.
    #[must_use]
    pub fn key(&self) -> &ImageKey {
        &self.key
    }

    /// The source URL.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// The decoded image, if ready.
    #[must_use]
    pub fn image(&self) -> Option<&Arc<image::DynamicImage>> {
        self.image.as_ref()
    }

    /// Current loading status.
    #[must_use]
    pub fn status(&self) -> &ImageStatus {
        &self.status
    }

    /// Returns true if the placeholder should still be shown.
    #[must_use]
    pub fn shows_placeholder(&self) -> bool {
        self.image.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const URL: &str = "https://example.com/photos/small.jpg";

    fn loaded(key: &ImageKey) -> LoadedImage {
        LoadedImage {
            key: key.clone(),
            image: Arc::new(image::DynamicImage::new_rgb8(10, 10)),
            source: LoadSource::Network,
        }
    }

    #[test]
    fn test_start_transitions_to_loading() {
        let mut slot = ImageSlot::new(URL);
        assert!(slot.shows_placeholder());

        let request = slot.start().unwrap();
        assert_eq!(request.0, ImageKey::from_url(URL));
        assert_eq!(request.1, URL);
        assert!(slot.status().is_loading());
    }

    #[test]
    fn test_guard_blocks_second_start() {
        let mut slot = ImageSlot::new(URL);
        assert!(slot.start().is_some());
        assert!(slot.start().is_none());
    }

    #[test]
    fn test_success_clears_guard_and_placeholder() {
        let mut slot = ImageSlot::new(URL);
        let key = slot.key().clone();
        slot.start();

        slot.apply(&key, &Ok(loaded(&key)));
        assert!(slot.status().is_ready());
        assert!(!slot.shows_placeholder());
        // Ready slots do not reload.
        assert!(slot.start().is_none());
    }

    #[test]
    fn test_failure_keeps_placeholder_and_allows_retry() {
        let mut slot = ImageSlot::new(URL);
        let key = slot.key().clone();
        slot.start();

        slot.apply(&key, &Err("connection refused".to_string()));
        assert!(slot.status().is_failed());
        assert!(slot.shows_placeholder());
        assert!(slot.start().is_some());
    }

    #[test]
    fn test_ignores_events_for_other_keys() {
        let mut slot = ImageSlot::new(URL);
        slot.start();

        let other = ImageKey::from_url("https://example.com/other.jpg");
        slot.apply(&other, &Ok(loaded(&other)));
        assert!(slot.status().is_loading());
        assert!(slot.shows_placeholder());
    }
}

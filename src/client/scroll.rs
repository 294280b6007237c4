use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Distance from the bottom, in pixels, at which the next page is requested.
pub const SCROLL_THRESHOLD_PX: f64 = 200.0;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScrollPosition {
    pub scroll_top: f64,
    pub client_height: f64,
    pub scroll_height: f64,
}

impl ScrollPosition {
    pub fn new(scroll_top: f64, client_height: f64, scroll_height: f64) -> Self {
        Self {
            scroll_top,
            client_height,
            scroll_height,
        }
    }

    pub fn near_bottom(&self) -> bool {
        self.scroll_top + self.client_height >= self.scroll_height - SCROLL_THRESHOLD_PX
    }
}

/// A paged view that grows as the user scrolls.
#[async_trait]
pub trait InfiniteFeed: Send + Sync + 'static {
    /// Returns whether a next page was loaded.
    async fn on_scroll(&self, position: ScrollPosition) -> bool;
}

/// Feeds scroll positions into a feed until dropped.
#[derive(Debug)]
pub struct ScrollListener {
    task: JoinHandle<()>,
}

impl ScrollListener {
    pub fn attach<F: InfiniteFeed>(
        feed: Arc<F>,
        mut positions: watch::Receiver<ScrollPosition>,
    ) -> Self {
        let task = tokio::spawn(async move {
            while positions.changed().await.is_ok() {
                let position = *positions.borrow_and_update();
                feed.on_scroll(position).await;
            }
        });
        Self { task }
    }

    pub fn is_attached(&self) -> bool {
        !self.task.is_finished()
    }
}

impl Drop for ScrollListener {
    fn drop(&mut self) {
        self.task.abort();
    }
}

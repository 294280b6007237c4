use crate::client::accumulator::ResultAccumulator;
use crate::client::request::{RequestTracker, Ticket};
use crate::client::{ClientError, MediaSummary, ResultPage};

/// What a paged view renders.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PagedSnapshot {
    pub results: Vec<MediaSummary>,
    pub page: u32,
    pub total_pages: u32,
    pub total_results: u64,
    pub loading: bool,
    pub error: Option<String>,
}

impl PagedSnapshot {
    pub fn has_more(&self) -> bool {
        self.page < self.total_pages
    }
}

/// Shared page bookkeeping of the search and discover views.
#[derive(Debug, Default)]
pub(crate) struct PagedFeed {
    results: ResultAccumulator<MediaSummary>,
    page: u32,
    total_pages: u32,
    total_results: u64,
    loading: bool,
    error: Option<String>,
    tracker: RequestTracker,
}

impl PagedFeed {
    /// Starts loading `page`. Page 1 starts a new result set.
    pub fn begin(&mut self, page: u32) -> Ticket {
        if page <= 1 {
            self.results.clear();
            self.page = 0;
            self.total_pages = 0;
            self.total_results = 0;
        }
        self.loading = true;
        self.error = None;
        self.tracker.begin()
    }

    /// The page to request when scrolled to the bottom, if any.
    pub fn next_page(&self) -> Option<u32> {
        if !self.loading && self.page >= 1 && self.page < self.total_pages {
            Some(self.page + 1)
        } else {
            None
        }
    }

    /// Applies the response to `requested`. A failed first page clears the
    /// view; a failed later page keeps what was already shown and leaves
    /// the page counter where it was so the user can scroll again.
    pub fn commit(
        &mut self,
        ticket: &Ticket,
        requested: u32,
        result: Result<ResultPage<MediaSummary>, ClientError>,
    ) -> bool {
        if !self.tracker.is_current(ticket) {
            tracing::debug!(page = requested, "Discarding superseded page");
            return false;
        }
        self.loading = false;
        match result {
            Ok(page) => {
                if requested <= 1 {
                    self.results.replace(page.results);
                } else {
                    self.results.push_page(page.results);
                }
                self.page = requested;
                self.total_pages = page.total_pages;
                self.total_results = page.total_results;
            }
            Err(err) => {
                tracing::warn!(page = requested, "Loading page failed: {}", err);
                if requested <= 1 {
                    self.results.clear();
                }
                self.error = Some(err.to_string());
            }
        }
        true
    }

    pub fn reset(&mut self) {
        self.tracker.cancel();
        self.results.clear();
        self.page = 0;
        self.total_pages = 0;
        self.total_results = 0;
        self.loading = false;
        self.error = None;
    }

    pub fn snapshot(&self) -> PagedSnapshot {
        PagedSnapshot {
            results: self.results.items().to_vec(),
            page: self.page,
            total_pages: self.total_pages,
            total_results: self.total_results,
            loading: self.loading,
            error: self.error.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn page(number: u32, ids: &[u64], total_pages: u32) -> ResultPage<MediaSummary> {
        serde_json::from_value(json!({
            "page": number,
            "results": ids.iter().map(|id| json!({"id": id})).collect::<Vec<_>>(),
            "total_pages": total_pages,
            "total_results": total_pages * 20
        }))
        .unwrap()
    }

    fn ids(snapshot: &PagedSnapshot) -> Vec<u64> {
        snapshot.results.iter().map(|item| item.id).collect()
    }

    #[test]
    fn failed_later_page_keeps_results_and_counter() {
        let mut feed = PagedFeed::default();
        let ticket = feed.begin(1);
        feed.commit(&ticket, 1, Ok(page(1, &[1, 2], 3)));
        assert_eq!(feed.next_page(), Some(2));

        let ticket = feed.begin(2);
        assert_eq!(feed.next_page(), None);
        feed.commit(
            &ticket,
            2,
            Err(ClientError::Status {
                status: 500,
                message: "Error searching".into(),
            }),
        );

        let snapshot = feed.snapshot();
        assert_eq!(ids(&snapshot), vec![1, 2]);
        assert_eq!(snapshot.page, 1);
        assert_eq!(snapshot.error.as_deref(), Some("Error searching"));
        assert_eq!(feed.next_page(), Some(2));
    }

    #[test]
    fn failed_first_page_clears() {
        let mut feed = PagedFeed::default();
        let ticket = feed.begin(1);
        feed.commit(&ticket, 1, Ok(page(1, &[1, 2], 3)));

        let ticket = feed.begin(1);
        feed.commit(&ticket, 1, Err(ClientError::Cancelled));
        assert!(feed.snapshot().results.is_empty());
        assert_eq!(feed.next_page(), None);
    }

    #[test]
    fn last_page_stops_paging() {
        let mut feed = PagedFeed::default();
        let ticket = feed.begin(1);
        feed.commit(&ticket, 1, Ok(page(1, &[1], 1)));
        assert_eq!(feed.next_page(), None);
        assert!(!feed.snapshot().has_more());
    }

    #[test]
    fn reset_refuses_in_flight_page() {
        let mut feed = PagedFeed::default();
        let ticket = feed.begin(1);
        feed.reset();
        assert!(!feed.commit(&ticket, 1, Ok(page(1, &[1], 1))));
        assert!(feed.snapshot().results.is_empty());
    }
}

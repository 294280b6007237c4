use std::collections::HashSet;

use super::MediaSummary;

pub trait Identified {
    fn id(&self) -> u64;
}

impl Identified for MediaSummary {
    fn id(&self) -> u64 {
        self.id
    }
}

/// Results of consecutive pages. Every page is kept as received, while
/// `items` holds each id once in first-seen order. The providers shift
/// their rankings between page requests, so the same id regularly shows
/// up on two pages.
#[derive(Debug, Clone)]
pub struct ResultAccumulator<T> {
    pages: Vec<Vec<T>>,
    seen: HashSet<u64>,
    unique: Vec<T>,
}

impl<T> Default for ResultAccumulator<T> {
    fn default() -> Self {
        Self {
            pages: Vec::new(),
            seen: HashSet::new(),
            unique: Vec::new(),
        }
    }
}

impl<T: Identified + Clone> ResultAccumulator<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn replace(&mut self, page: Vec<T>) {
        self.clear();
        self.push_page(page);
    }

    pub fn push_page(&mut self, page: Vec<T>) {
        for item in &page {
            if self.seen.insert(item.id()) {
                self.unique.push(item.clone());
            }
        }
        self.pages.push(page);
    }

    pub fn clear(&mut self) {
        self.pages.clear();
        self.seen.clear();
        self.unique.clear();
    }

    pub fn items(&self) -> &[T] {
        &self.unique
    }

    pub fn pages(&self) -> &[Vec<T>] {
        &self.pages
    }

    /// Count including duplicates.
    pub fn raw_len(&self) -> usize {
        self.pages.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Item(u64, &'static str);

    impl Identified for Item {
        fn id(&self) -> u64 {
            self.0
        }
    }

    #[test]
    fn later_pages_skip_known_ids() {
        let mut results = ResultAccumulator::new();
        results.replace(vec![Item(1, "a"), Item(2, "b")]);
        results.push_page(vec![Item(2, "b again"), Item(3, "c")]);

        assert_eq!(
            results.items(),
            &[Item(1, "a"), Item(2, "b"), Item(3, "c")]
        );
        assert_eq!(results.raw_len(), 4);
        assert_eq!(results.pages().len(), 2);
    }

    #[test]
    fn replace_starts_over() {
        let mut results = ResultAccumulator::new();
        results.replace(vec![Item(1, "a")]);
        results.push_page(vec![Item(2, "b")]);
        results.replace(vec![Item(2, "fresh")]);

        assert_eq!(results.items(), &[Item(2, "fresh")]);
        assert_eq!(results.pages().len(), 1);
    }
}

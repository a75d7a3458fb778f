// src/menu/cache.rs

use std::collections::HashMap;

use crate::models::{id::ObjectId, subject::SubjectPage};

/// The last fetched subject page per exam.
///
/// Entries are only ever written under the exam the request was made for,
/// never under whichever exam happens to be open when the response lands.
#[derive(Debug, Default, Clone)]
pub struct SubjectCache {
    pages: HashMap<ObjectId, SubjectPage>,
}

impl SubjectCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, exam: &ObjectId) -> Option<&SubjectPage> {
        self.pages.get(exam)
    }

    pub fn contains(&self, exam: &ObjectId) -> bool {
        self.pages.contains_key(exam)
    }

    pub fn store(&mut self, exam: ObjectId, page: SubjectPage) {
        self.pages.insert(exam, page);
    }

    pub fn exams(&self) -> impl Iterator<Item = &ObjectId> {
        self.pages.keys()
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// The page to request next from `exam` in direction `step`, or `None`
    /// when nothing is cached or the move would leave `[1, total_pages]`.
    pub fn neighbour(&self, exam: &ObjectId, step: i64) -> Option<u32> {
        let current = self.pages.get(exam)?;
        let target = i64::from(current.page) + step;
        if target < 1 || target > i64::from(current.total_pages) {
            return None;
        }
        u32::try_from(target).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(page: u32, total_pages: u32) -> SubjectPage {
        SubjectPage {
            subjects: vec![],
            total: u64::from(total_pages) * 10,
            page,
            total_pages,
        }
    }

    #[test]
    fn neighbour_stays_inside_bounds() {
        let exam = ObjectId::new();
        let mut cache = SubjectCache::new();
        assert_eq!(cache.neighbour(&exam, 1), None);

        cache.store(exam, page(1, 3));
        assert_eq!(cache.neighbour(&exam, -1), None);
        assert_eq!(cache.neighbour(&exam, 1), Some(2));

        cache.store(exam, page(3, 3));
        assert_eq!(cache.neighbour(&exam, 1), None);
        assert_eq!(cache.neighbour(&exam, -1), Some(2));
    }

    #[test]
    fn empty_exam_has_no_neighbours() {
        let exam = ObjectId::new();
        let mut cache = SubjectCache::new();
        cache.store(exam, page(1, 0));
        assert_eq!(cache.neighbour(&exam, 1), None);
        assert_eq!(cache.neighbour(&exam, -1), None);
    }
}

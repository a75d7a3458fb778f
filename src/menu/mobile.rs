// src/menu/mobile.rs

use std::collections::HashSet;
use std::sync::Arc;

use tokio::sync::mpsc;

use super::{MenuLink, MenuSource, MenuTimings, SubjectCache, source::MenuError, subject_actions};
use crate::models::{
    exam::ExamSummary,
    id::ObjectId,
    subject::{SortDirection, Subject, SubjectPage},
};

/// Whatever owns the page scroll behind the drawer.
pub trait ScrollHost: Send + Sync {
    fn suppress_scroll(&self);
    fn restore_scroll(&self);
}

/// Suppresses background scrolling for as long as it lives.
pub struct ScrollLock {
    host: Arc<dyn ScrollHost>,
}

impl ScrollLock {
    pub fn acquire(host: Arc<dyn ScrollHost>) -> Self {
        host.suppress_scroll();
        Self { host }
    }
}

impl Drop for ScrollLock {
    fn drop(&mut self) {
        self.host.restore_scroll();
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum MobileLevel {
    Root,
    Exam(ExamSummary),
    Subject(ExamSummary, Subject),
}

/// A finished fetch, tagged with the drawer session that started it.
enum Completion {
    Exams {
        session: u64,
        result: Result<Vec<ExamSummary>, MenuError>,
    },
    Subjects {
        session: u64,
        exam: ObjectId,
        result: Result<SubjectPage, MenuError>,
    },
}

/// Tap-driven drill-down menu: exams, then subjects, then actions.
///
/// Every transition is immediate. Fetches run as background tasks and report
/// back on a channel; [`MobileDrawer::next_update`] or
/// [`MobileDrawer::apply_pending`] fold them into the per-exam cache. Each
/// open starts a new session at [`MobileLevel::Root`], and completions from
/// an earlier session or for a closed drawer are dropped. The scroll lock is
/// held exactly while the drawer is open.
pub struct MobileDrawer {
    source: Arc<dyn MenuSource>,
    scroll_host: Arc<dyn ScrollHost>,
    timings: MenuTimings,
    exams: Vec<ExamSummary>,
    level: MobileLevel,
    cache: SubjectCache,
    in_flight: HashSet<ObjectId>,
    lock: Option<ScrollLock>,
    session: u64,
    completions_tx: mpsc::UnboundedSender<Completion>,
    completions: mpsc::UnboundedReceiver<Completion>,
}

impl MobileDrawer {
    pub fn new(
        source: Arc<dyn MenuSource>,
        scroll_host: Arc<dyn ScrollHost>,
        timings: MenuTimings,
    ) -> Self {
        let (completions_tx, completions) = mpsc::unbounded_channel();
        Self {
            source,
            scroll_host,
            timings,
            exams: Vec::new(),
            level: MobileLevel::Root,
            cache: SubjectCache::new(),
            in_flight: HashSet::new(),
            lock: None,
            session: 0,
            completions_tx,
            completions,
        }
    }

    pub fn is_open(&self) -> bool {
        self.lock.is_some()
    }

    pub fn level(&self) -> &MobileLevel {
        &self.level
    }

    pub fn exams(&self) -> &[ExamSummary] {
        &self.exams
    }

    /// True while a subject fetch for `exam` is outstanding.
    pub fn is_loading(&self, exam: &ObjectId) -> bool {
        self.in_flight.contains(exam)
    }

    /// Opens at the root and starts loading the exam list if it is not loaded yet.
    pub fn open(&mut self) {
        if !self.is_open() {
            self.session += 1;
            self.lock = Some(ScrollLock::acquire(self.scroll_host.clone()));
        }
        self.level = MobileLevel::Root;

        if self.exams.is_empty() {
            let source = self.source.clone();
            let tx = self.completions_tx.clone();
            let session = self.session;
            tokio::spawn(async move {
                let result = source.list_exams().await;
                let _ = tx.send(Completion::Exams { session, result });
            });
        }
    }

    pub fn close(&mut self) {
        self.level = MobileLevel::Root;
        self.lock = None;
        self.in_flight.clear();
    }

    pub fn toggle(&mut self) {
        if self.is_open() {
            self.close();
        } else {
            self.open();
        }
    }

    /// Drills into an exam at once; its first subject page loads in the
    /// background if it is not cached.
    pub fn select_exam(&mut self, exam: ExamSummary) {
        if !self.is_open() {
            return;
        }

        if !self.cache.contains(&exam.id) {
            self.fetch(exam.id, 1);
        }
        self.level = MobileLevel::Exam(exam);
    }

    pub fn select_subject(&mut self, subject: Subject) {
        if let MobileLevel::Exam(exam) = &self.level {
            self.level = MobileLevel::Subject(exam.clone(), subject);
        }
    }

    /// One level up. At the root this does nothing.
    pub fn back(&mut self) {
        self.level = match std::mem::replace(&mut self.level, MobileLevel::Root) {
            MobileLevel::Subject(exam, _) => MobileLevel::Exam(exam),
            MobileLevel::Exam(_) | MobileLevel::Root => MobileLevel::Root,
        };
    }

    pub fn next_page(&mut self) {
        self.turn_page(1);
    }

    pub fn prev_page(&mut self) {
        self.turn_page(-1);
    }

    /// Subjects of the exam currently shown.
    pub fn subjects(&self) -> Option<&SubjectPage> {
        match &self.level {
            MobileLevel::Exam(exam) => self.cache.get(&exam.id),
            _ => None,
        }
    }

    pub fn actions(&self) -> Vec<MenuLink> {
        match &self.level {
            MobileLevel::Subject(exam, subject) => subject_actions(&exam.id, &subject.id),
            _ => Vec::new(),
        }
    }

    /// Navigating away closes the drawer.
    pub fn follow_link(&mut self, link: &MenuLink) -> String {
        self.close();
        link.href.clone()
    }

    /// Waits for the next fetch to finish and applies it.
    pub async fn next_update(&mut self) {
        if let Some(completion) = self.completions.recv().await {
            self.apply(completion);
        }
    }

    /// Applies every fetch that has already finished. Returns how many there were.
    pub fn apply_pending(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(completion) = self.completions.try_recv() {
            self.apply(completion);
            applied += 1;
        }
        applied
    }

    fn apply(&mut self, completion: Completion) {
        match completion {
            Completion::Exams { session, result } => {
                if session != self.session || !self.is_open() {
                    return;
                }
                match result {
                    Ok(exams) => self.exams = exams,
                    Err(e) => tracing::warn!("Failed to load exams for drawer: {}", e),
                }
            }
            Completion::Subjects {
                session,
                exam,
                result,
            } => {
                if session != self.session || !self.is_open() {
                    tracing::debug!(%exam, "Dropping subjects for a closed drawer");
                    return;
                }
                self.in_flight.remove(&exam);
                match result {
                    Ok(page) => self.cache.store(exam, page),
                    Err(e) => tracing::warn!(%exam, "Failed to load subjects: {}", e),
                }
            }
        }
    }

    fn turn_page(&mut self, step: i64) {
        let MobileLevel::Exam(exam) = &self.level else {
            return;
        };
        let exam = exam.id;
        if let Some(page) = self.cache.neighbour(&exam, step) {
            self.fetch(exam, page);
        }
    }

    fn fetch(&mut self, exam: ObjectId, page: u32) {
        if !self.in_flight.insert(exam) {
            return;
        }

        let source = self.source.clone();
        let tx = self.completions_tx.clone();
        let session = self.session;
        let limit = self.timings.page_size;
        tokio::spawn(async move {
            let result = source
                .list_subjects(&exam, page, limit, SortDirection::Asc)
                .await;
            let _ = tx.send(Completion::Subjects {
                session,
                exam,
                result,
            });
        });
    }
}

// src/menu/hover.rs

use std::collections::HashSet;
use std::sync::Arc;

use serde::Serialize;
use tokio::{
    sync::{mpsc, oneshot},
    task::JoinHandle,
};

use super::{
    MenuLink, MenuSource, MenuTimings, SubjectCache, TimerSlot, source::MenuError,
    subject_actions,
};
use crate::models::{
    exam::ExamSummary,
    id::ObjectId,
    subject::{SortDirection, SubjectPage},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum HoverState {
    Idle,
    ExamOpen { exam: ObjectId },
    SubjectOpen { exam: ObjectId, subject: ObjectId },
}

impl HoverState {
    pub fn exam(&self) -> Option<ObjectId> {
        match self {
            Self::Idle => None,
            Self::ExamOpen { exam } | Self::SubjectOpen { exam, .. } => Some(*exam),
        }
    }
}

/// What the desktop menu would render right now.
#[derive(Debug, Clone, Serialize)]
pub struct HoverSnapshot {
    pub state: HoverState,
    pub exams: Vec<ExamSummary>,
    /// Cached page for the open exam, if any.
    pub subjects: Option<SubjectPage>,
    /// Actions for the open subject; empty unless a subject is open.
    pub actions: Vec<MenuLink>,
    pub cached_exams: Vec<ObjectId>,
}

enum Event {
    PointerEnterExam(ObjectId),
    PointerLeaveExam,
    PointerEnterSubject(ObjectId),
    NextPage,
    PrevPage,
    OpenElapsed { generation: u64, exam: ObjectId },
    CloseElapsed { generation: u64 },
    ExamsLoaded(Result<Vec<ExamSummary>, MenuError>),
    SubjectsLoaded {
        exam: ObjectId,
        result: Result<SubjectPage, MenuError>,
    },
    Snapshot(oneshot::Sender<HoverSnapshot>),
    Shutdown,
}

/// Desktop dropdown state machine.
///
/// Runs as one task that owns every piece of menu state. Pointer events,
/// timer firings and fetch results all arrive on the same channel, so they
/// are applied strictly one at a time. Timers and fetches only hold a weak
/// sender: once the menu stops, their late deliveries go nowhere.
///
/// Entering an exam schedules its opening after `open_debounce`. Leaving the
/// exam before that elapses cancels the pending open, so a pointer that only
/// passes over an exam never opens it. Leaving the menu closes it after
/// `close_linger` unless the pointer comes back first.
pub struct HoverMenu {
    source: Arc<dyn MenuSource>,
    timings: MenuTimings,
    state: HoverState,
    exams: Vec<ExamSummary>,
    cache: SubjectCache,
    in_flight: HashSet<ObjectId>,
    open_timer: TimerSlot,
    close_timer: TimerSlot,
    events: mpsc::WeakUnboundedSender<Event>,
}

impl HoverMenu {
    /// Starts the menu and begins loading the exam list.
    pub fn spawn(source: Arc<dyn MenuSource>, timings: MenuTimings) -> HoverMenuHandle {
        let (tx, rx) = mpsc::unbounded_channel();
        let menu = HoverMenu {
            source,
            timings,
            state: HoverState::Idle,
            exams: Vec::new(),
            cache: SubjectCache::new(),
            in_flight: HashSet::new(),
            open_timer: TimerSlot::new(),
            close_timer: TimerSlot::new(),
            events: tx.downgrade(),
        };
        let task = tokio::spawn(menu.run(rx));

        HoverMenuHandle {
            tx,
            task: Some(task),
        }
    }

    async fn run(mut self, mut rx: mpsc::UnboundedReceiver<Event>) {
        self.load_exams();

        while let Some(event) = rx.recv().await {
            if !self.apply(event) {
                break;
            }
        }

        self.open_timer.cancel();
        self.close_timer.cancel();
        tracing::debug!("Hover menu stopped");
    }

    /// Returns false when the menu should stop.
    fn apply(&mut self, event: Event) -> bool {
        match event {
            Event::PointerEnterExam(exam) => {
                self.close_timer.cancel();
                let events = self.events.clone();
                self.open_timer
                    .schedule(self.timings.open_debounce, move |generation| {
                        emit(&events, Event::OpenElapsed { generation, exam });
                    });
            }
            Event::PointerLeaveExam => {
                // The pointer left before the debounce elapsed: nothing opens.
                self.open_timer.cancel();
                let events = self.events.clone();
                self.close_timer
                    .schedule(self.timings.close_linger, move |generation| {
                        emit(&events, Event::CloseElapsed { generation });
                    });
            }
            Event::PointerEnterSubject(subject) => {
                self.close_timer.cancel();
                if let Some(exam) = self.state.exam() {
                    self.state = HoverState::SubjectOpen { exam, subject };
                }
            }
            Event::NextPage => self.turn_page(1),
            Event::PrevPage => self.turn_page(-1),
            Event::OpenElapsed { generation, exam } => {
                if !self.open_timer.complete(generation) {
                    return true;
                }
                self.open_exam(exam);
            }
            Event::CloseElapsed { generation } => {
                if self.close_timer.complete(generation) {
                    self.state = HoverState::Idle;
                }
            }
            Event::ExamsLoaded(Ok(exams)) => self.exams = exams,
            Event::ExamsLoaded(Err(e)) => {
                tracing::warn!("Failed to load exams for menu: {}", e);
            }
            Event::SubjectsLoaded { exam, result } => {
                self.in_flight.remove(&exam);
                match result {
                    Ok(page) => self.cache.store(exam, page),
                    Err(e) => tracing::warn!(%exam, "Failed to load subjects: {}", e),
                }
            }
            Event::Snapshot(reply) => {
                let _ = reply.send(self.snapshot());
            }
            Event::Shutdown => return false,
        }
        true
    }

    fn open_exam(&mut self, exam: ObjectId) {
        // Re-opening the exam that is already open keeps its subject.
        if self.state.exam() != Some(exam) {
            self.state = HoverState::ExamOpen { exam };
        }
        if !self.cache.contains(&exam) {
            self.fetch(exam, 1);
        }
    }

    fn turn_page(&mut self, step: i64) {
        let Some(exam) = self.state.exam() else {
            return;
        };
        if let Some(page) = self.cache.neighbour(&exam, step) {
            self.fetch(exam, page);
        }
    }

    fn load_exams(&self) {
        let source = self.source.clone();
        let events = self.events.clone();
        tokio::spawn(async move {
            let result = source.list_exams().await;
            emit(&events, Event::ExamsLoaded(result));
        });
    }

    fn fetch(&mut self, exam: ObjectId, page: u32) {
        if !self.in_flight.insert(exam) {
            return;
        }

        let source = self.source.clone();
        let events = self.events.clone();
        let limit = self.timings.page_size;
        tokio::spawn(async move {
            let result = source
                .list_subjects(&exam, page, limit, SortDirection::Asc)
                .await;
            emit(&events, Event::SubjectsLoaded { exam, result });
        });
    }

    fn snapshot(&self) -> HoverSnapshot {
        let subjects = self
            .state
            .exam()
            .and_then(|exam| self.cache.get(&exam).cloned());
        let actions = match self.state {
            HoverState::SubjectOpen { exam, subject } => subject_actions(&exam, &subject),
            _ => Vec::new(),
        };
        let mut cached_exams: Vec<ObjectId> = self.cache.exams().copied().collect();
        cached_exams.sort();

        HoverSnapshot {
            state: self.state,
            exams: self.exams.clone(),
            subjects,
            actions,
            cached_exams,
        }
    }
}

fn emit(events: &mpsc::WeakUnboundedSender<Event>, event: Event) {
    if let Some(tx) = events.upgrade() {
        let _ = tx.send(event);
    }
}

/// Owner handle for a running [`HoverMenu`]. Dropping it stops the menu.
pub struct HoverMenuHandle {
    tx: mpsc::UnboundedSender<Event>,
    task: Option<JoinHandle<()>>,
}

impl HoverMenuHandle {
    pub fn pointer_enter_exam(&self, exam: ObjectId) {
        self.send(Event::PointerEnterExam(exam));
    }

    pub fn pointer_leave_exam(&self) {
        self.send(Event::PointerLeaveExam);
    }

    pub fn pointer_enter_subject(&self, subject: ObjectId) {
        self.send(Event::PointerEnterSubject(subject));
    }

    pub fn next_page(&self) {
        self.send(Event::NextPage);
    }

    pub fn prev_page(&self) {
        self.send(Event::PrevPage);
    }

    /// `None` once the menu has stopped.
    pub async fn snapshot(&self) -> Option<HoverSnapshot> {
        let (reply, rx) = oneshot::channel();
        self.tx.send(Event::Snapshot(reply)).ok()?;
        rx.await.ok()
    }

    /// Stops the menu and waits for it to finish. Pending timers are cancelled.
    pub async fn shutdown(mut self) {
        self.send(Event::Shutdown);
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                tracing::error!("Hover menu task failed: {}", e);
            }
        }
    }

    fn send(&self, event: Event) {
        if self.tx.send(event).is_err() {
            tracing::debug!("Hover menu already stopped");
        }
    }
}

impl Drop for HoverMenuHandle {
    fn drop(&mut self) {
        let _ = self.tx.send(Event::Shutdown);
    }
}

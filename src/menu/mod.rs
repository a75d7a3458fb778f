// src/menu/mod.rs

//! Client-side exam → subject → action navigation.
//!
//! Two independent front ends share the same data source and link targets:
//!
//! * [`HoverMenu`]: the desktop dropdown, driven by pointer events with a
//!   debounced open and a lingering close. It runs as a single actor task so
//!   all state changes happen sequentially, in event order.
//! * [`MobileDrawer`]: the tap-driven drill-down with an explicit back
//!   control and a scroll lock held while the drawer is open.
//!
//! Both fetch subject pages lazily through a [`MenuSource`] and cache them
//! per exam.

use std::time::Duration;

use serde::Serialize;

use crate::models::id::ObjectId;

pub mod cache;
pub mod hover;
pub mod mobile;
pub mod source;
pub mod timer;

pub use cache::SubjectCache;
pub use hover::{HoverMenu, HoverMenuHandle, HoverSnapshot, HoverState};
pub use mobile::{MobileDrawer, MobileLevel, ScrollHost, ScrollLock};
pub use source::{HttpMenuSource, MenuError, MenuSource};
pub use timer::TimerSlot;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MenuTimings {
    /// Delay between pointer-enter on an exam and opening its submenu.
    pub open_debounce: Duration,
    /// Delay between pointer-leave and closing the menu.
    pub close_linger: Duration,
    pub page_size: u32,
}

impl Default for MenuTimings {
    fn default() -> Self {
        Self {
            open_debounce: Duration::from_millis(100),
            close_linger: Duration::from_millis(150),
            page_size: 10,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MenuLink {
    pub label: &'static str,
    pub href: String,
}

/// The static action menu shown for a subject.
pub fn subject_actions(exam: &ObjectId, subject: &ObjectId) -> Vec<MenuLink> {
    [
        ("Chapters", "chapters"),
        ("Previous Year Questions", "previous-year"),
        ("Info", "info"),
    ]
    .into_iter()
    .map(|(label, leaf)| MenuLink {
        label,
        href: format!("/exam/{}/{}/{}", exam, subject, leaf),
    })
    .collect()
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subject_actions_point_at_the_three_pages() {
        let exam = ObjectId::parse("000000000000000000000001").unwrap();
        let subject = ObjectId::parse("000000000000000000000002").unwrap();
        let hrefs: Vec<String> = subject_actions(&exam, &subject)
            .into_iter()
            .map(|l| l.href)
            .collect();
        assert_eq!(
            hrefs,
            vec![
                "/exam/000000000000000000000001/000000000000000000000002/chapters",
                "/exam/000000000000000000000001/000000000000000000000002/previous-year",
                "/exam/000000000000000000000001/000000000000000000000002/info",
            ]
        );
    }
}

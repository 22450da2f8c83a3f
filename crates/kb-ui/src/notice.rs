//! Modal notices (load results, validation and persistence errors)

use std::collections::VecDeque;

use egui::{Align2, Context, RichText, Window};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub title: String,
    pub message: String,
}

impl Notice {
    pub fn info(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Info,
            title: title.into(),
            message: message.into(),
        }
    }

    pub fn error(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            title: title.into(),
            message: message.into(),
        }
    }
}

/// Queue of notices shown one at a time until acknowledged
#[derive(Debug, Default)]
pub struct Notices {
    queue: VecDeque<Notice>,
}

impl Notices {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, notice: Notice) {
        match notice.kind {
            NoticeKind::Info => tracing::info!("{}: {}", notice.title, notice.message),
            NoticeKind::Error => tracing::warn!("{}: {}", notice.title, notice.message),
        }
        self.queue.push_back(notice);
    }

    pub fn current(&self) -> Option<&Notice> {
        self.queue.front()
    }

    /// Acknowledge the notice on screen
    pub fn dismiss(&mut self) -> Option<Notice> {
        self.queue.pop_front()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Draw the current notice. Returns true while one is open, in which
    /// case the rest of the UI should ignore input.
    pub fn show(&mut self, ctx: &Context) -> bool {
        let Some(notice) = self.current() else {
            return false;
        };

        let color = match notice.kind {
            NoticeKind::Info => ctx.style().visuals.hyperlink_color,
            NoticeKind::Error => ctx.style().visuals.error_fg_color,
        };

        let mut acknowledged = false;
        Window::new(RichText::new(&notice.title).color(color))
            .id(egui::Id::new("notice_window"))
            .collapsible(false)
            .resizable(false)
            .anchor(Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.label(&notice.message);
                ui.add_space(8.0);
                if ui.button("OK").clicked() {
                    acknowledged = true;
                }
            });

        if acknowledged || ctx.input(|i| i.key_pressed(egui::Key::Enter) || i.key_pressed(egui::Key::Escape)) {
            self.dismiss();
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notices_are_fifo() {
        let mut notices = Notices::new();
        assert!(notices.current().is_none());

        notices.push(Notice::info("Loaded file", "sales.csv (3 rows)"));
        notices.push(Notice::error("Invalid KPI", "KPI name is required"));
        assert_eq!(notices.len(), 2);
        assert_eq!(notices.current().map(|n| n.kind), Some(NoticeKind::Info));

        let first = notices.dismiss().unwrap();
        assert_eq!(first.message, "sales.csv (3 rows)");
        assert_eq!(notices.current().map(|n| n.message.as_str()), Some("KPI name is required"));

        notices.dismiss();
        assert!(notices.is_empty());
        assert!(notices.dismiss().is_none());
    }
}

//! User interface components for the KPI board
//!
//! The sidebar form, modal notices and the application theme.

pub mod notice;
pub mod sidebar;
pub mod theme;

pub use notice::{Notice, NoticeKind, Notices};
pub use sidebar::{sidebar_form, SidebarAction};
pub use theme::{apply_theme, Palette, Theme};

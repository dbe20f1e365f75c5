//! Per-screen view state
//!
//! Each view owns the data it fetched and is driven through
//! [`TutorApi`](crate::api::TutorApi), so it can be tested without a server.

pub mod chapters;
pub mod navigator;
pub mod questions;
pub mod subjects;
pub mod text_input;

pub use chapters::ChapterListView;
pub use navigator::TopicNavigator;
pub use questions::QuestionLog;
pub use subjects::SubjectListView;
pub use text_input::TextInput;

/// Move a list selection by `delta`, clamped to `len`
pub(crate) fn step_selection(selected: usize, len: usize, delta: isize) -> usize {
    if len == 0 {
        return 0;
    }
    selected.saturating_add_signed(delta).min(len - 1)
}

//! Application state definitions

use crate::views::{ChapterListView, QuestionLog, SubjectListView, TextInput, TopicNavigator};

/// Which screen is currently displayed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Screen {
    /// Subject grid
    #[default]
    Subjects,
    /// Chapters of the selected subject
    Chapters,
    /// Topic reader for one chapter
    Chapter,
}

/// Which part of the screen receives keys
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Focus {
    #[default]
    Main,
    /// Typing into the question box
    Questions,
}

/// Scroll state for the topic content area
#[derive(Debug, Clone, Default)]
pub struct ContentState {
    /// Current scroll position (lines from top)
    pub scroll_offset: usize,
    /// Total rendered lines (updated on render)
    pub total_lines: usize,
    /// Visible height in lines (updated on render)
    pub visible_height: usize,
}

impl ContentState {
    /// Get the maximum allowed scroll offset
    pub fn max_scroll(&self) -> usize {
        self.total_lines.saturating_sub(self.visible_height / 2)
    }

    /// Clamp scroll offset to valid range
    pub fn clamp_scroll(&mut self) {
        self.scroll_offset = self.scroll_offset.min(self.max_scroll());
    }

    pub fn scroll_by(&mut self, delta: isize) {
        self.scroll_offset = self.scroll_offset.saturating_add_signed(delta);
        self.clamp_scroll();
    }

    pub fn half_page(&self) -> isize {
        (self.visible_height / 2).max(1) as isize
    }
}

/// Command line mode
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CommandMode {
    /// Command line shows status messages
    #[default]
    Normal,
    /// Accepting `:` commands
    Command,
}

/// State for the command line input
#[derive(Debug, Clone, Default)]
pub struct CommandLineState {
    pub mode: CommandMode,
    pub input: TextInput,
    /// Status/error message to display (when not in input mode)
    pub message: Option<String>,
    pub is_error: bool,
}

impl CommandLineState {
    /// Start command mode
    pub fn enter_command_mode(&mut self) {
        self.mode = CommandMode::Command;
        self.input.clear();
        self.message = None;
    }

    /// Exit input mode
    pub fn exit_input_mode(&mut self) {
        self.mode = CommandMode::Normal;
        self.input.clear();
    }

    pub fn set_error(&mut self, msg: impl Into<String>) {
        self.message = Some(msg.into());
        self.is_error = true;
    }

    pub fn clear_message(&mut self) {
        self.message = None;
    }

    pub fn is_input_mode(&self) -> bool {
        self.mode == CommandMode::Command
    }
}

/// Full application state
#[derive(Debug, Default)]
pub struct AppState {
    /// Current screen
    pub screen: Screen,

    pub focus: Focus,

    pub subjects: SubjectListView,

    pub chapters: ChapterListView,

    pub reader: TopicNavigator,

    /// Question log of the current screen
    pub questions: QuestionLog,

    /// Whether the questions panel is shown
    pub show_questions: bool,

    pub content: ContentState,

    /// Shown over the current screen
    pub show_help: bool,

    /// Label of the request in flight
    pub loading: Option<String>,

    pub command_line: CommandLineState,
}

impl AppState {
    /// Show a freshly loaded screen, discarding the previous question log
    pub fn enter(&mut self, screen: Screen) {
        self.screen = screen;
        self.questions = QuestionLog::default();
        self.show_questions = false;
        self.focus = Focus::Main;
        self.content = ContentState::default();
    }
}

//! Key handling and request execution
//!
//! Key handling is synchronous and only decides what to do. Anything that
//! needs the backend comes back as a [`Request`], which the event loop runs
//! after drawing a loading indicator.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::debug;

use super::command::{Command, ParseResult, parse_command};
use super::input::{Action, key_to_action};
use super::state::{AppState, Focus, Screen};
use crate::api::{QuestionContext, ResourceId, Subject, TutorApi};
use crate::ui::subjects::COLUMNS;

/// What the event loop should do after a key
#[derive(Debug)]
pub enum Outcome {
    Continue,
    Quit,
    Fetch(Request),
}

/// Topic movement on the chapter screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TopicMove {
    Next,
    Previous,
    /// 1-based topic number
    Number(usize),
}

/// Work that needs the backend
#[derive(Debug, Clone, PartialEq)]
pub enum Request {
    Subjects,
    OpenSubject(Subject),
    Chapters(ResourceId),
    ReloadChapters,
    Chapter(ResourceId),
    /// A chapter whose title is already known from a list or an earlier load
    OpenChapter { id: ResourceId, title: String },
    Topic(TopicMove),
    Ask { question: String, context: Option<QuestionContext> },
}

impl Request {
    /// Text shown while the request is in flight
    pub fn label(&self) -> &'static str {
        match self {
            Request::Subjects => "Loading subjects...",
            Request::OpenSubject(_) | Request::Chapters(_) | Request::ReloadChapters => {
                "Loading chapters..."
            }
            Request::Chapter(_) | Request::OpenChapter { .. } => "Loading chapter...",
            Request::Topic(_) => "Loading topic...",
            Request::Ask { .. } => "Getting answer...",
        }
    }
}

/// Handle a key press
pub fn handle_key(state: &mut AppState, key: KeyEvent, vim_mode: bool) -> Outcome {
    if state.command_line.is_input_mode() {
        return handle_command_key(state, key);
    }
    if state.focus == Focus::Questions {
        return handle_question_key(state, key);
    }
    if state.show_help {
        state.show_help = false;
        return Outcome::Continue;
    }

    let Some(action) = key_to_action(key.code, key.modifiers, vim_mode) else {
        return Outcome::Continue;
    };

    match action {
        Action::Quit => return Outcome::Quit,
        Action::Command => {
            state.command_line.enter_command_mode();
            return Outcome::Continue;
        }
        Action::Help => {
            state.show_help = true;
            return Outcome::Continue;
        }
        Action::Ask => {
            state.show_questions = true;
            state.focus = Focus::Questions;
            return Outcome::Continue;
        }
        Action::Back if state.show_questions => {
            state.show_questions = false;
            return Outcome::Continue;
        }
        _ => {}
    }

    state.command_line.clear_message();
    match state.screen {
        Screen::Subjects => subjects_action(state, action),
        Screen::Chapters => chapters_action(state, action),
        Screen::Chapter => chapter_action(state, action),
    }
}

fn subjects_action(state: &mut AppState, action: Action) -> Outcome {
    let view = &mut state.subjects;
    match action {
        Action::Right => view.select_next(),
        Action::Left => view.select_previous(),
        Action::Down => view.select_row(COLUMNS, true),
        Action::Up => view.select_row(COLUMNS, false),
        Action::Select => {
            if let Some(subject) = view.selected_subject() {
                return Outcome::Fetch(Request::OpenSubject(subject.clone()));
            }
        }
        Action::Reload => return Outcome::Fetch(Request::Subjects),
        _ => {}
    }
    Outcome::Continue
}

fn chapters_action(state: &mut AppState, action: Action) -> Outcome {
    let view = &mut state.chapters;
    match action {
        Action::Down => view.select_next(),
        Action::Up => view.select_previous(),
        Action::Select | Action::Right => {
            if let Some(chapter) = view.selected_chapter() {
                return Outcome::Fetch(Request::OpenChapter {
                    id: chapter.id.clone(),
                    title: chapter.title.clone(),
                });
            }
        }
        Action::Back | Action::Left => return Outcome::Fetch(Request::Subjects),
        Action::Reload => return Outcome::Fetch(Request::ReloadChapters),
        _ => {}
    }
    Outcome::Continue
}

fn chapter_action(state: &mut AppState, action: Action) -> Outcome {
    let content = &mut state.content;
    match action {
        Action::Down => content.scroll_by(1),
        Action::Up => content.scroll_by(-1),
        Action::HalfPageDown => content.scroll_by(content.half_page()),
        Action::HalfPageUp => content.scroll_by(-content.half_page()),
        Action::PageDown => content.scroll_by(content.half_page() * 2),
        Action::PageUp => content.scroll_by(-content.half_page() * 2),
        Action::Top => content.scroll_offset = 0,
        Action::Bottom => content.scroll_offset = content.max_scroll(),
        Action::Right | Action::NextTopic => return topic_move(state, TopicMove::Next),
        Action::Left | Action::PreviousTopic => return topic_move(state, TopicMove::Previous),
        Action::Back => return back_from_chapter(state),
        Action::Reload => return reload_chapter(state),
        _ => {}
    }
    Outcome::Continue
}

fn reload_chapter(state: &AppState) -> Outcome {
    match state.reader.chapter_id() {
        Some(id) => Outcome::Fetch(Request::OpenChapter {
            id: id.clone(),
            title: state.reader.title().to_string(),
        }),
        None => Outcome::Continue,
    }
}

fn back_from_chapter(state: &AppState) -> Outcome {
    if state.chapters.subject_id().is_some() {
        Outcome::Fetch(Request::ReloadChapters)
    } else {
        Outcome::Fetch(Request::Subjects)
    }
}

/// Request a topic change, or nothing at the boundaries
fn topic_move(state: &mut AppState, step: TopicMove) -> Outcome {
    if state.screen != Screen::Chapter {
        state.command_line.set_error("Open a chapter first");
        return Outcome::Continue;
    }
    let reader = &state.reader;
    let allowed = match step {
        TopicMove::Next => reader.can_go_next(),
        TopicMove::Previous => reader.can_go_previous(),
        TopicMove::Number(n) => (1..=reader.topics().len()).contains(&n),
    };
    if allowed {
        Outcome::Fetch(Request::Topic(step))
    } else {
        if let TopicMove::Number(n) = step {
            state.command_line.set_error(format!("No topic {}", n));
        }
        Outcome::Continue
    }
}

/// Context attached to questions asked from the current screen
fn question_context(state: &AppState) -> Option<QuestionContext> {
    match state.screen {
        Screen::Chapter => state.reader.question_context(),
        Screen::Subjects | Screen::Chapters => None,
    }
}

fn handle_question_key(state: &mut AppState, key: KeyEvent) -> Outcome {
    let input = &mut state.questions.input;
    match key.code {
        KeyCode::Esc => state.focus = Focus::Main,
        KeyCode::Enter => {
            if let Some(question) = state.questions.begin() {
                let context = question_context(state);
                return Outcome::Fetch(Request::Ask { question, context });
            }
        }
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            return Outcome::Quit;
        }
        KeyCode::Char(c) => input.insert_char(c),
        KeyCode::Backspace => input.delete_back(),
        KeyCode::Delete => input.delete_forward(),
        KeyCode::Left => input.move_left(),
        KeyCode::Right => input.move_right(),
        KeyCode::Home => input.move_start(),
        KeyCode::End => input.move_end(),
        KeyCode::Up => input.history_up(),
        KeyCode::Down => input.history_down(),
        _ => {}
    }
    Outcome::Continue
}

fn handle_command_key(state: &mut AppState, key: KeyEvent) -> Outcome {
    let command_line = &mut state.command_line;
    match key.code {
        KeyCode::Esc => command_line.exit_input_mode(),
        KeyCode::Enter => {
            let text = command_line.input.text().to_string();
            command_line.input.remember(&text);
            command_line.exit_input_mode();
            return run_command(state, &text);
        }
        KeyCode::Backspace if command_line.input.text().is_empty() => {
            command_line.exit_input_mode()
        }
        KeyCode::Backspace => command_line.input.delete_back(),
        KeyCode::Delete => command_line.input.delete_forward(),
        KeyCode::Left => command_line.input.move_left(),
        KeyCode::Right => command_line.input.move_right(),
        KeyCode::Home => command_line.input.move_start(),
        KeyCode::End => command_line.input.move_end(),
        KeyCode::Up => command_line.input.history_up(),
        KeyCode::Down => command_line.input.history_down(),
        KeyCode::Char(c) => command_line.input.insert_char(c),
        _ => {}
    }
    Outcome::Continue
}

/// Execute a `:` command line
pub fn run_command(state: &mut AppState, text: &str) -> Outcome {
    let command = match parse_command(text) {
        ParseResult::Ok(command) => command,
        ParseResult::UnknownCommand(cmd) => {
            state.command_line.set_error(format!("Unknown command: {}", cmd));
            return Outcome::Continue;
        }
        ParseResult::MissingArgument(cmd) => {
            state.command_line.set_error(format!(":{} needs an argument", cmd));
            return Outcome::Continue;
        }
        ParseResult::InvalidArgument { command, argument } => {
            state
                .command_line
                .set_error(format!("Invalid argument for :{}: {}", command, argument));
            return Outcome::Continue;
        }
    };
    debug!("Running command {:?}", command);

    match command {
        Command::Ask(question) => {
            let context = question_context(state);
            Outcome::Fetch(Request::Ask { question, context })
        }
        Command::Subjects => Outcome::Fetch(Request::Subjects),
        Command::Chapters(id) => Outcome::Fetch(Request::Chapters(id.into())),
        Command::Chapter(id) => Outcome::Fetch(Request::Chapter(id.into())),
        Command::Topic(n) => topic_move(state, TopicMove::Number(n)),
        Command::Next => topic_move(state, TopicMove::Next),
        Command::Previous => topic_move(state, TopicMove::Previous),
        Command::Reload => match state.screen {
            Screen::Subjects => Outcome::Fetch(Request::Subjects),
            Screen::Chapters => Outcome::Fetch(Request::ReloadChapters),
            Screen::Chapter => reload_chapter(state),
        },
        Command::Quit => Outcome::Quit,
        Command::Help => {
            state.show_help = true;
            Outcome::Continue
        }
        Command::Nop => {
            state.command_line.clear_message();
            Outcome::Continue
        }
    }
}

/// Run a backend request and apply its result
pub async fn perform(state: &mut AppState, api: &dyn TutorApi, request: Request) {
    match request {
        Request::Subjects => {
            state.enter(Screen::Subjects);
            state.subjects.load(api).await;
        }
        Request::OpenSubject(subject) => {
            state.enter(Screen::Chapters);
            state.chapters.load_subject(api, &subject).await;
        }
        Request::Chapters(subject_id) => {
            state.enter(Screen::Chapters);
            state.chapters.load(api, &subject_id).await;
        }
        Request::ReloadChapters => {
            state.enter(Screen::Chapters);
            state.chapters.reload(api).await;
        }
        Request::Chapter(chapter_id) => {
            state.enter(Screen::Chapter);
            state.reader.load(api, &chapter_id).await;
        }
        Request::OpenChapter { id, title } => {
            state.enter(Screen::Chapter);
            state.reader.open(api, &id, Some(&title)).await;
        }
        Request::Topic(step) => {
            let reader = &mut state.reader;
            match step {
                TopicMove::Next => reader.next(api).await,
                TopicMove::Previous => reader.previous(api).await,
                TopicMove::Number(n) => reader.goto(api, n).await,
            }
            state.content.scroll_offset = 0;
        }
        Request::Ask { question, context } => {
            state.show_questions = true;
            state.questions.ask(api, question, context).await;
        }
    }
    state.loading = None;
}

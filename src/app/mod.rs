//! Application state and event handling

pub mod command;
pub mod handler;
pub mod input;
pub mod state;

use std::io::{self, Stdout};

use anyhow::{Context, Result};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::info;

use crate::api::{TutorApi, TutorClient};
use crate::config::Config;
use crate::theme::Theme;
use crate::ui;
use handler::{Outcome, Request};
use state::AppState;

/// The main application
pub struct App {
    /// Application configuration
    config: Config,

    theme: Theme,

    /// Tutor backend
    api: Box<dyn TutorApi>,

    /// Current application state
    state: AppState,

    /// Terminal backend
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl App {
    /// Create a new application talking to the configured API
    pub fn new(config: Config) -> Result<Self> {
        let client = TutorClient::new(&config.api_url)
            .with_context(|| format!("Invalid API URL {:?}", config.api_url))?;
        Self::with_api(config, Box::new(client))
    }

    /// Create an application with a specific backend
    pub fn with_api(config: Config, api: Box<dyn TutorApi>) -> Result<Self> {
        let terminal = Self::setup_terminal()?;
        let theme = config.active_theme();

        Ok(Self { config, theme, api, state: AppState::default(), terminal })
    }

    /// Set up the terminal for TUI rendering
    fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;
        Ok(terminal)
    }

    /// Restore the terminal to its original state
    fn restore_terminal(&mut self) -> Result<()> {
        disable_raw_mode()?;
        execute!(self.terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
        self.terminal.show_cursor()?;
        Ok(())
    }

    fn draw(&mut self) -> Result<()> {
        self.terminal.draw(|frame| {
            ui::draw(frame, &mut self.state, &self.theme);
        })?;
        Ok(())
    }

    /// Show the loading state, then wait for the request to finish
    async fn execute(&mut self, request: Request) -> Result<()> {
        self.state.loading = Some(request.label().to_string());
        self.draw()?;
        handler::perform(&mut self.state, self.api.as_ref(), request).await;
        Ok(())
    }

    /// Run the application main loop
    pub async fn run(&mut self) -> Result<()> {
        // Set up panic hook to restore terminal
        let original_hook = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |panic_info| {
            let _ = disable_raw_mode();
            let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture);
            original_hook(panic_info);
        }));

        info!("Starting with API {}", self.config.api_url);
        self.execute(Request::Subjects).await?;

        loop {
            self.draw()?;

            if event::poll(std::time::Duration::from_millis(16))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        match handler::handle_key(&mut self.state, key, self.config.vim_mode) {
                            Outcome::Quit => break,
                            Outcome::Continue => {}
                            Outcome::Fetch(request) => {
                                if let Err(e) = self.execute(request).await {
                                    tracing::error!("Error handling key: {}", e);
                                }
                            }
                        }
                    }
                }
            }
        }

        self.restore_terminal()?;
        Ok(())
    }
}

impl Drop for App {
    fn drop(&mut self) {
        let _ = self.restore_terminal();
    }
}

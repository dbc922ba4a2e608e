//! Console front end
//!
//! Parses one line of input at a time and dispatches it to the mounted
//! screen. Opening a screen drops the previous one, which ends its lifetime
//! and discards any result still in flight for it. Errors are printed and
//! never stop the console.

mod command;

pub use command::{Command, CommandError, ScreenKind, HELP};

use std::sync::Arc;

use crate::client::{CourseStatusApi, CrudApi, ListApi};
use crate::config::UiConfig;
use crate::lifetime::Lifetime;
use crate::modal::ClickTarget;
use crate::models::{Blog, Course, News, Student};
use crate::notify::{Toast, ToastLevel, ToastQueue};
use crate::screens::{CrudScreen, Dashboard, Screen, ScreenError, StudentsScreen};

/// Everything the console needs from the backend
pub trait Backend:
    CrudApi<Course> + CrudApi<Blog> + CrudApi<News> + ListApi<Student> + CourseStatusApi + 'static
{
}

impl<T> Backend for T where
    T: CrudApi<Course> + CrudApi<Blog> + CrudApi<News> + ListApi<Student> + CourseStatusApi + 'static
{
}

/// Error types for console commands
#[derive(Debug, thiserror::Error)]
pub enum ConsoleError {
    #[error(transparent)]
    Command(#[from] CommandError),

    #[error(transparent)]
    Screen(#[from] ScreenError),
}

/// What the caller should do after a line was handled
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Flow {
    /// Print this and read the next line
    Continue(String),
    Quit,
}

pub struct Console<B: Backend> {
    backend: Arc<B>,
    ui: UiConfig,
    toasts: Arc<ToastQueue>,
    lifetime: Lifetime,
    current: ScreenKind,
    screen: Box<dyn Screen>,
}

fn format_toast(toast: &Toast) -> String {
    let mark = match toast.level {
        ToastLevel::Pending => "…",
        ToastLevel::Success => "✓",
        ToastLevel::Error => "✗",
    };
    format!("{} {}\n", mark, toast.message)
}

impl<B: Backend> Console<B> {
    /// A console showing the dashboard. Call [`Console::start`] to load it.
    pub fn new(backend: Arc<B>, ui: UiConfig) -> Self {
        let toasts = Arc::new(ToastQueue::new());
        let lifetime = Lifetime::new();
        let screen = Self::mount(&backend, &ui, &toasts, &lifetime, ScreenKind::Dashboard);
        Self {
            backend,
            ui,
            toasts,
            lifetime,
            current: ScreenKind::Dashboard,
            screen,
        }
    }

    fn mount(
        backend: &Arc<B>,
        ui: &UiConfig,
        toasts: &Arc<ToastQueue>,
        lifetime: &Lifetime,
        kind: ScreenKind,
    ) -> Box<dyn Screen> {
        match kind {
            ScreenKind::Dashboard => Box::new(Dashboard::new(
                backend.clone(),
                backend.clone(),
                backend.clone(),
                backend.clone(),
                lifetime,
            )),
            ScreenKind::Courses => Box::new(
                CrudScreen::<Course, B>::new("Courses", backend.clone(), toasts.clone(), ui, false, lifetime)
                    .with_status_toggle(),
            ),
            ScreenKind::Blogs => Box::new(CrudScreen::<Blog, B>::new(
                "Blogs",
                backend.clone(),
                toasts.clone(),
                ui,
                true,
                lifetime,
            )),
            ScreenKind::News => Box::new(CrudScreen::<News, B>::new(
                "News",
                backend.clone(),
                toasts.clone(),
                ui,
                false,
                lifetime,
            )),
            ScreenKind::Students => Box::new(StudentsScreen::new(backend.clone(), ui, lifetime)),
        }
    }

    pub fn current(&self) -> ScreenKind {
        self.current
    }

    pub fn screen(&self) -> &dyn Screen {
        self.screen.as_ref()
    }

    /// Load the initial screen and return its rendering
    pub async fn start(&mut self) -> String {
        self.screen.refresh().await;
        self.screen.render()
    }

    /// Replace the mounted screen and load the new one
    pub async fn open(&mut self, kind: ScreenKind) {
        tracing::info!(screen = %kind, "opening screen");
        self.screen = Self::mount(&self.backend, &self.ui, &self.toasts, &self.lifetime, kind);
        self.current = kind;
        self.screen.refresh().await;
    }

    /// Handle one input line
    pub async fn execute(&mut self, line: &str) -> Flow {
        let command = match line.parse::<Command>() {
            Ok(Command::Quit) => return Flow::Quit,
            Ok(command) => command,
            Err(CommandError::Empty) => return Flow::Continue(String::new()),
            Err(e) => return Flow::Continue(format!("error: {}\n", ConsoleError::from(e))),
        };

        let mut out = String::new();
        let redraw = match self.dispatch(command).await {
            Ok((message, redraw)) => {
                if let Some(message) = message.filter(|m| !m.is_empty()) {
                    out.push_str(&message);
                    out.push('\n');
                }
                redraw
            }
            Err(e) => {
                tracing::debug!(error = %e, "command failed");
                out.push_str(&format!("error: {}\n", e));
                false
            }
        };

        for toast in self.toasts.drain_settled() {
            out.push_str(&format_toast(&toast));
        }
        if redraw {
            out.push_str(&self.screen.render());
        }
        Flow::Continue(out)
    }

    /// Returns an optional message and whether the screen should be redrawn
    async fn dispatch(&mut self, command: Command) -> Result<(Option<String>, bool), ConsoleError> {
        if let Command::Open(kind) = command {
            self.open(kind).await;
            return Ok((None, true));
        }

        let screen = &mut self.screen;
        let result = match command {
            Command::Refresh => {
                screen.refresh().await;
                (None, true)
            }
            Command::Next => {
                screen.next_page()?;
                screen.refresh().await;
                (None, true)
            }
            Command::Prev => {
                screen.prev_page()?;
                screen.refresh().await;
                (None, true)
            }
            Command::Add => {
                screen.add()?;
                (None, true)
            }
            Command::Row(action, row) => {
                screen.row_action(row, action)?;
                (None, true)
            }
            Command::Confirm => (Some(screen.confirm().await?), true),
            Command::Cancel => (None, screen.cancel()),
            Command::Escape => (None, screen.escape()),
            Command::Backdrop => (None, screen.click(ClickTarget::Backdrop)),
            Command::ClickBody => (None, screen.click(ClickTarget::Body)),
            Command::Set { field, value } => {
                screen.set_field(&field, &value)?;
                (None, true)
            }
            Command::Submit => (Some(screen.submit().await?), true),
            Command::Toggle(row) => (Some(screen.toggle(row).await?), true),
            Command::Show => (None, true),
            Command::Help => (Some(HELP.to_string()), false),
            Command::Open(_) | Command::Quit => (None, false),
        };
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_toast() {
        let toast = Toast {
            id: 1,
            level: ToastLevel::Error,
            message: "Failed to delete blog!".to_string(),
        };
        assert_eq!(format_toast(&toast), "✗ Failed to delete blog!\n");
    }
}

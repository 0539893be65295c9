//! The read-eval-print loop over a `StoreClient`.

use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use todo_core::{ApiError, StoreClient, Transport};
use uuid::Uuid;

use crate::command::{Command, HELP};
use crate::render::render;

/// What the loop should do after a line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Flow {
    Continue(String),
    Quit,
}

pub struct Repl<T> {
    app: StoreClient<T>,
}

impl<T: Transport> Repl<T> {
    pub fn new(app: StoreClient<T>) -> Self {
        Self { app }
    }

    pub fn app_mut(&mut self) -> &mut StoreClient<T> {
        &mut self.app
    }

    /// Initial load, then the first rendering.
    pub async fn start(&mut self) -> String {
        let result = self.app.refresh().await;
        self.report(result)
    }

    pub async fn handle_line(&mut self, line: &str) -> Flow {
        let command = match line.parse::<Command>() {
            Ok(command) => command,
            Err(err) => return Flow::Continue(format!("{err}\n")),
        };

        let result = match command {
            Command::Quit => return Flow::Quit,
            Command::Help => return Flow::Continue(format!("{HELP}\n")),
            Command::List => Ok(()),
            Command::Refresh => self.app.refresh().await,
            Command::Add(text) => {
                self.app.store_mut().set_input(text);
                self.app.add_input().await
            }
            Command::Toggle(n) => match self.resolve(n) {
                Ok(id) => self.app.toggle(id).await,
                Err(msg) => return Flow::Continue(msg),
            },
            Command::Edit { position, text } => {
                let (id, current) = match self.resolve(position) {
                    Ok(id) => match self.app.store().get(id) {
                        Some(todo) => (id, todo.text.clone()),
                        None => return Flow::Continue(no_such(position)),
                    },
                    Err(msg) => return Flow::Continue(msg),
                };
                self.app.start_edit(id, current);
                match text {
                    Some(text) => {
                        self.app.store_mut().set_edit_buffer(text);
                        self.app.save_edit().await
                    }
                    None => Ok(()),
                }
            }
            Command::Text(text) => {
                self.app.store_mut().set_edit_buffer(text);
                Ok(())
            }
            Command::Save => self.app.save_edit().await,
            Command::Cancel => {
                self.app.cancel_edit();
                Ok(())
            }
            Command::Remove(n) => match self.resolve(n) {
                Ok(id) => self.app.remove(id).await,
                Err(msg) => return Flow::Continue(msg),
            },
            Command::ClearCompleted => self.app.clear_completed().await,
            Command::Filter(filter) => {
                self.app.set_filter(filter);
                Ok(())
            }
        };
        Flow::Continue(self.report(result))
    }

    /// Feed every line of `input` through [`Repl::handle_line`], passing
    /// each output to `emit`, until EOF or `quit`.
    pub async fn run<R, F>(&mut self, input: R, mut emit: F) -> std::io::Result<()>
    where
        R: AsyncBufRead + Unpin,
        F: FnMut(&str),
    {
        let mut lines = input.lines();
        emit("> ");
        while let Some(line) = lines.next_line().await? {
            match self.handle_line(&line).await {
                Flow::Continue(out) => {
                    emit(&out);
                    emit("> ");
                }
                Flow::Quit => break,
            }
        }
        Ok(())
    }

    fn resolve(&self, position: usize) -> Result<Uuid, String> {
        self.app
            .store()
            .visible()
            .get(position - 1)
            .map(|todo| todo.id)
            .ok_or_else(|| no_such(position))
    }

    /// The list as it now stands, preceded by the error if there was one.
    fn report(&self, result: Result<(), ApiError>) -> String {
        let list = render(self.app.store());
        match result {
            Ok(()) => list,
            Err(err) => format!("error: {err}\n{list}"),
        }
    }
}

fn no_such(position: usize) -> String {
    format!("no todo #{position} in this view\n")
}

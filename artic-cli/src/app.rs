//! Interactive table loop.

use std::io::Write;
use std::time::Duration;

use tokio::io::AsyncBufReadExt;
use tokio::io::BufReader;

use artic_lib::ArticClient;
use artic_lib::BulkSelectOutcome;
use artic_lib::BulkSelectRequest;
use artic_lib::BulkSelectTask;
use artic_lib::TableController;
use artic_lib::cache::CacheConfig;
use artic_lib::error::Error;
use artic_lib::rate_limit::RetryConfig;

use crate::args::Args;
use crate::command::Command;
use crate::command::HELP;
use crate::view;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Artic(#[from] Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Could not start logging: {0}")]
    Logger(#[from] log::SetLoggerError),
}

type Table = TableController<ArticClient>;

/// Something the loop reacts to.
enum Event {
    Line(Option<String>),
    BulkDone(Result<BulkSelectOutcome, Error>),
}

pub struct App {
    table: Table,
    pending: Option<BulkSelectTask>,
}

impl App {
    pub fn new(args: &Args) -> Result<Self, AppError> {
        let mut builder = ArticClient::builder()
            .url(&args.url)
            .page_size(args.page_size)
            .timeout(Duration::from_secs(args.timeout));
        if let Some(agent) = &args.user_agent {
            builder = builder.user_agent(agent);
        }
        let client = builder.build()?;

        let config = if args.no_cache || args.cache_ttl == 0 {
            CacheConfig::no_cache()
        } else {
            CacheConfig::new().with_page_ttl(Duration::from_secs(args.cache_ttl))
        };
        let retry = RetryConfig::default().max_retries(args.retries);

        log::info!(
            "source {} ({} rows per page, cache ttl {}s, {} retries)",
            client.base_url(),
            client.page_size(),
            args.cache_ttl,
            args.retries
        );

        let table = TableController::new(client)
            .with_cache_config(config)
            .with_retry(retry);
        Ok(Self {
            table,
            pending: None,
        })
    }

    /// Reads commands from stdin until `quit` or end of input.
    pub async fn run(mut self) -> Result<(), AppError> {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();

        println!("{}", HELP);
        self.show_page().await;

        loop {
            prompt()?;

            let event = match self.pending.as_mut() {
                Some(task) => tokio::select! {
                    line = lines.next_line() => Event::Line(line?),
                    result = task.join() => Event::BulkDone(result),
                },
                None => Event::Line(lines.next_line().await?),
            };

            let line = match event {
                Event::BulkDone(result) => {
                    self.pending = None;
                    println!();
                    self.report(result);
                    continue;
                }
                Event::Line(None) => break,
                Event::Line(Some(line)) => line,
            };

            let command = match Command::parse(&line) {
                Ok(Some(command)) => command,
                Ok(None) => continue,
                Err(e) => {
                    println!("{}", e);
                    continue;
                }
            };

            if command == Command::Quit {
                break;
            }
            self.handle(command).await;
        }

        if self.table.cancel_bulk_select() {
            log::info!("cancelled running bulk select on exit");
        }
        Ok(())
    }

    async fn handle(&mut self, command: Command) {
        match command {
            Command::Next => self.navigate(|t| t.next_page()).await,
            Command::Previous => self.navigate(|t| t.previous_page()).await,
            Command::Goto(page) => self.navigate(|t| t.set_current_page(page)).await,
            Command::Toggle { id, state } => {
                let on = state.unwrap_or(!self.table.is_selected(id));
                self.table.toggle_selection(id, on);
                self.show_cached();
            }
            Command::Select(request) => self.bulk_select(request).await,
            Command::Cancel => {
                if self.table.cancel_bulk_select() {
                    println!("cancelling...");
                } else {
                    println!("no select is running");
                }
            }
            Command::List => {
                let mut ids: Vec<_> = self.table.selected_ids().into_iter().collect();
                ids.sort_unstable();
                if ids.is_empty() {
                    println!("nothing selected");
                } else {
                    let ids: Vec<String> = ids.iter().map(ToString::to_string).collect();
                    println!("{} selected: {}", ids.len(), ids.join(", "));
                }
            }
            Command::Clear => {
                self.table.clear_selection();
                self.show_cached();
            }
            Command::Refresh => {
                self.table.pages().invalidate(self.table.current_page());
                self.show_page().await;
            }
            Command::Help => println!("{}", HELP),
            Command::Quit => {}
        }
    }

    async fn navigate(
        &mut self,
        step: impl FnOnce(&mut Table) -> Result<(), artic_lib::error::ValidationError>,
    ) {
        match step(&mut self.table) {
            Ok(()) => self.show_page().await,
            Err(e) => println!("{}", e),
        }
    }

    async fn bulk_select(&mut self, request: BulkSelectRequest) {
        if let Some(mut previous) = self.pending.take() {
            previous.cancel();
            self.report(previous.join().await);
        }

        match self.table.request_bulk_select(request).await {
            Ok(task) => {
                println!(
                    "selecting {} rows from page {}...",
                    request.count(),
                    self.table.current_page()
                );
                self.pending = Some(task);
            }
            Err(e) => println!("{}", view::error(e)),
        }
    }

    fn report(&self, result: Result<BulkSelectOutcome, Error>) {
        match result {
            Ok(outcome) => {
                println!("{}", view::outcome(&outcome));
                self.show_cached();
            }
            Err(Error::BulkSelect {
                page,
                progress,
                source,
            }) => {
                println!(
                    "{}",
                    view::error(format_args!("could not load page {}: {}", page, source))
                );
                println!(
                    "{} of {} rows were selected before the failure",
                    progress.taken.len(),
                    progress.requested
                );
                self.show_cached();
            }
            Err(e) => println!("{}", view::error(e)),
        }
    }

    /// Fetches and prints the current page.
    async fn show_page(&mut self) {
        println!("{}", view::LOADING);
        if let Err(e) = self.table.get_current_page_data().await {
            log::error!("page {} failed: {}", self.table.current_page(), e);
            println!("{}", view::error(e));
            return;
        }
        self.show_cached();
    }

    /// Reprints the last fetched page with the current selection.
    fn show_cached(&self) {
        let Some(page) = self.table.current_data() else {
            return;
        };
        let footer = view::Footer {
            page: page.number(),
            total_pages: self.table.total_pages().unwrap_or(0),
            selected: self.table.selected_count(),
            cached_until: self.table.current_cached_until(),
        };
        let text = view::render_page(page, &footer, |id| self.table.is_selected(id));
        println!("{}", text);
    }
}

fn prompt() -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    write!(stdout, "> ")?;
    stdout.flush()
}

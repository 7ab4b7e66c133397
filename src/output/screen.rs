use std::io::Write;
use std::time::Duration;

use chrono::Utc;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

use super::{render_header, render_json, render_status, render_table, OutputFormat, PageView};
use crate::session::Screen;

/// Draws the attendee screen on stdout, with a spinner while loading.
pub struct TerminalScreen {
    format: OutputFormat,
    interactive: bool,
    spinner: Option<ProgressBar>,
    header_shown: bool,
}

impl TerminalScreen {
    pub fn new(format: OutputFormat, interactive: bool) -> Self {
        Self {
            format,
            interactive,
            spinner: None,
            header_shown: false,
        }
    }

    fn write(&self, bytes: &[u8]) {
        let mut stdout = std::io::stdout().lock();
        let _ = stdout.write_all(bytes);
        let _ = stdout.flush();
    }

    fn prompt(&self, view: &PageView) {
        let search = if view.search.is_empty() {
            "Search attendee".dimmed().to_string()
        } else {
            view.search.green().to_string()
        };
        println!(
            "{} {}    {}",
            "search:".bold(),
            search,
            "(/text search, f p n l, g N, b fw, r, q)".dimmed()
        );
    }
}

impl Screen for TerminalScreen {
    fn loading(&mut self, active: bool) {
        if !active {
            if let Some(spinner) = self.spinner.take() {
                spinner.finish_and_clear();
            }
            return;
        }
        if self.spinner.is_some() || self.format == OutputFormat::Json {
            return;
        }
        let spinner = ProgressBar::new_spinner();
        spinner.set_draw_target(ProgressDrawTarget::stderr());
        spinner.set_style(
            ProgressStyle::with_template("{spinner:.green} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        spinner.set_message("Loading attendees");
        spinner.enable_steady_tick(Duration::from_millis(120));
        self.spinner = Some(spinner);
    }

    fn draw(&mut self, view: &PageView) {
        if self.format == OutputFormat::Json {
            self.write(&render_json(view));
            return;
        }

        let mut out = String::new();
        if !self.header_shown {
            out.push_str(&render_header());
            out.push('\n');
            self.header_shown = true;
        }
        out.push_str(&render_table(view, Utc::now()));
        if let Some(status) = render_status(&view.status) {
            out.push_str(&status);
        }

        match self.spinner.as_ref() {
            Some(spinner) => spinner.suspend(|| self.write(out.as_bytes())),
            None => self.write(out.as_bytes()),
        }
        if self.interactive {
            self.prompt(view);
        }
    }

    fn notice(&mut self, message: &str) {
        eprintln!(
            "{}{}{} {}",
            "[".bold().white(),
            "WRN".bold().yellow(),
            "]".bold().white(),
            message
        );
    }
}

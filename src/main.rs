use std::process::exit;

use colored::Colorize;

fn main() {
    if let Err(e) = attendee_list::app::run_cli() {
        eprintln!("{} {}", "[ERR]".bold().red(), e.trim_end());
        exit(1);
    }
}

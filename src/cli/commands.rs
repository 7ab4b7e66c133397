use crate::session::Input;

pub const HELP: &str = "\
Commands:
  /text        type into the search box (debounced), '/' alone clears it
  f, first     first page
  p, prev      previous page
  n, next      next page
  l, last      last page
  g N          go to page N
  b, back      previous entry in page history
  fw, forward  next entry in page history
  r, refresh   reload the current page
  h, help      show this help
  q, quit      exit
";

/// What one line typed at the prompt asks for.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Input(Input),
    Help,
    Nothing,
}

pub fn parse_command(line: &str) -> Result<Command, String> {
    let line = line.trim_end_matches(['\r', '\n']);
    if let Some(text) = line.strip_prefix('/') {
        return Ok(Command::Input(Input::Search(text.to_string())));
    }

    let mut parts = line.split_whitespace();
    let Some(word) = parts.next() else {
        return Ok(Command::Nothing);
    };
    let input = match word.to_lowercase().as_str() {
        "f" | "first" => Input::First,
        "p" | "prev" | "previous" => Input::Previous,
        "n" | "next" => Input::Next,
        "l" | "last" => Input::Last,
        "b" | "back" => Input::Back,
        "fw" | "forward" => Input::Forward,
        "r" | "refresh" => Input::Refresh,
        "q" | "quit" | "exit" => Input::Quit,
        "h" | "help" | "?" => return Ok(Command::Help),
        "g" | "goto" => {
            let raw = parts
                .next()
                .ok_or_else(|| "goto needs a page number".to_string())?;
            let page = raw
                .parse::<u32>()
                .map_err(|_| format!("invalid page '{raw}'"))?;
            Input::GoTo(page)
        }
        other => return Err(format!("unknown command '{other}', type 'h' for help")),
    };
    Ok(Command::Input(input))
}

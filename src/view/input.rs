#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserAction {
    /// Start/Pause.
    Toggle,
    Reset,
    Stop,
    /// Delete the history row with this 1-based number.
    Delete(usize),
    Help,
    Quit,
}

pub const HELP: &str = "Enter or t: start/pause | r: reset | s: stop | d N: delete row N | q: quit";

/// Parses one line of input. An empty line toggles the timer.
pub fn parse_action(line: &str) -> Option<UserAction> {
    let mut parts = line.split_whitespace();
    let Some(command) = parts.next() else {
        return Some(UserAction::Toggle);
    };

    let action = match command.to_ascii_lowercase().as_str() {
        "t" | "toggle" | "start" | "pause" => UserAction::Toggle,
        "r" | "reset" => UserAction::Reset,
        "s" | "stop" => UserAction::Stop,
        "d" | "delete" => {
            let number = parts.next()?.parse::<usize>().ok().filter(|n| *n > 0)?;
            UserAction::Delete(number)
        }
        "h" | "help" | "?" => UserAction::Help,
        "q" | "quit" | "exit" => UserAction::Quit,
        _ => return None,
    };

    if parts.next().is_some() {
        return None;
    }
    Some(action)
}

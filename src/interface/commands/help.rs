//! # Help Command
//!
//! Handles `help`. Displays the command reference to the user.

pub fn handle_help(bot_name: &str) -> String {
    crate::strings::help::usage(bot_name)
}

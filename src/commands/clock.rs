//! Clock pack: a minimal selection-prompt example command.
//!
//! `time` asks an A-or-B question and prints the wall-clock time once a
//! choice is made. Mostly a template for commands that need an answer
//! before they can produce output.

use chrono::Local;

use crate::command::CommandSpec;
use crate::registry::CommandSet;
use crate::style::ColorCode;

pub fn command_set() -> CommandSet {
    let mut set = CommandSet::new();
    set.insert(
        "time".to_string(),
        CommandSpec::simple("prints the current time", ColorCode::Yellow, |_args, io| {
            io.prompt_select(
                "A or B",
                vec!["A".to_string(), "B".to_string()],
                Box::new(|_choice, io| {
                    io.append_history(Local::now().format("%a %b %d %Y %T").to_string());
                }),
            );
            Ok(())
        }),
    );
    set
}

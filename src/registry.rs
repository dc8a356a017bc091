//! Command registry: name → spec mapping with merge and builtin regeneration.
//!
//! The registry is per-frame state: spawning swaps in a child registry and
//! quitting reinstates the parent's verbatim, so command names added inside
//! a child never leak back out.

use crate::command::{Builtin, CommandSpec};
use crate::style::ColorCode;
use std::collections::BTreeMap;

/// Ordered contribution of commands. Later merges override earlier entries
/// on name collision.
pub type CommandSet = BTreeMap<String, CommandSpec>;

#[derive(Clone, Default)]
pub struct Registry {
    commands: CommandSet,
}

impl Registry {
    /// The root registry: built-ins (`help`, `clear`, `setName`) plus the
    /// host-contributed set, which wins on collision.
    pub fn root(contributed: CommandSet) -> Self {
        let mut commands = CommandSet::new();
        commands.insert(
            "help".to_string(),
            CommandSpec::builtin("displays this prompt", ColorCode::Blue, Builtin::Help),
        );
        commands.insert(
            "clear".to_string(),
            CommandSpec::simple("clears the terminal", ColorCode::Red, |_args, io| {
                io.clear_history();
                Ok(())
            }),
        );
        commands.insert("setName".to_string(), set_name_spec());
        commands.extend(contributed);
        Self { commands }
    }

    /// A spawned frame's registry: the process's command set plus a
    /// synthesized `quit` and a `help` scoped to the merged set. The
    /// synthesized entries win over same-named contributions.
    pub fn child(mut set: CommandSet) -> Self {
        set.insert(
            "quit".to_string(),
            CommandSpec::builtin("exit the current process", ColorCode::Red, Builtin::Quit),
        );
        set.insert(
            "help".to_string(),
            CommandSpec::builtin("shows this prompt", ColorCode::Green, Builtin::Help),
        );
        Self { commands: set }
    }

    pub fn get(&self, name: &str) -> Option<&CommandSpec> {
        self.commands.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.commands.contains_key(name)
    }

    /// Registered names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.commands.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// The `help` output: every command with its help text, sorted by name.
    pub fn help_listing(&self) -> String {
        self.commands
            .iter()
            .map(|(name, spec)| format!("{name}: {}", spec.help))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

fn set_name_spec() -> CommandSpec {
    CommandSpec::simple(
        "set your username. usage: setName [username]",
        ColorCode::Blue,
        |args, io| {
            let name = args.first().map(String::as_str).unwrap_or("");
            if name.is_empty() {
                io.append_error("username cannot be empty");
            } else if args.len() > 1 {
                io.append_error("username cannot contain spaces");
            } else if name.chars().count() > 20 {
                io.append_error("username must be less than 20 characters long");
            } else {
                io.append_success(&format!("username set to {name}"));
                io.set_name(name);
            }
            Ok(())
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::CommandKind;

    fn noop(help: &str) -> CommandSpec {
        CommandSpec::simple(help, ColorCode::Blue, |_args, _io| Ok(()))
    }

    #[test]
    fn root_always_carries_builtins() {
        let reg = Registry::root(CommandSet::new());
        for name in ["help", "clear", "setName"] {
            assert!(reg.contains(name), "missing builtin {name}");
        }
    }

    #[test]
    fn later_contributions_win_on_collision() {
        let mut set = CommandSet::new();
        set.insert("clear".to_string(), noop("host clear"));
        let reg = Registry::root(set);
        assert_eq!(reg.get("clear").unwrap().help, "host clear");
    }

    #[test]
    fn child_registry_gains_quit_and_scoped_help() {
        let mut set = CommandSet::new();
        set.insert("roll".to_string(), noop("roll the dice"));
        let reg = Registry::child(set);
        assert!(reg.contains("quit"));
        assert!(matches!(
            reg.get("help").unwrap().kind,
            CommandKind::Builtin(Builtin::Help)
        ));
        assert!(!reg.contains("clear"));
    }

    #[test]
    fn help_listing_is_sorted() {
        let mut set = CommandSet::new();
        set.insert("zz".to_string(), noop("last"));
        set.insert("aa".to_string(), noop("first"));
        let reg = Registry::child(set);
        let listing = reg.help_listing();
        let lines: Vec<&str> = listing.lines().collect();
        assert_eq!(lines.first(), Some(&"aa: first"));
        assert!(lines.contains(&"quit: exit the current process"));
        let mut sorted = lines.clone();
        sorted.sort();
        assert_eq!(lines, sorted);
    }
}

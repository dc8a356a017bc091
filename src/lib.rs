//! In-process command shell core.
//!
//! An embeddable, event-driven shell: the host owns the screen and the
//! keyboard, feeds [`Key`] events into [`Shell::handle_key`], and renders
//! the [`Shell::transcript`], prompt and input line after each event. The
//! core handles line editing, history recall, tab completion, command
//! dispatch, interactive prompts and nested process contexts.
//!
//! # Architecture
//!
//! - `line.rs` - Input line buffer with a character cursor
//! - `history.rs` - Submitted-line log with arrow-key recall
//! - `complete.rs` - Common-prefix completion resolution
//! - `command.rs` - Command descriptors and the [`Process`] contract
//! - `registry.rs` - Name → command mapping, per frame
//! - `overlay.rs` - Pending text/selection prompts
//! - `shell.rs` - Key dispatch, execution and the frame stack
//! - `commands/` - Stock command packs (filesystem, dice game, clock)
//!
//! # Adding a New Command
//!
//! 1. Build a [`CommandSpec`] with [`CommandSpec::simple`] (inline handler)
//!    or [`CommandSpec::spawn`] (a [`Process`] with its own sub-commands)
//! 2. Insert it into a [`CommandSet`] under its invocation name
//! 3. Pass the set to [`Shell::new`], or merge it into
//!    [`commands::default_set`]

pub mod command;
pub mod commands;
pub mod complete;
pub mod error;
pub mod history;
pub mod line;
pub mod overlay;
pub mod registry;
pub mod shell;
pub mod style;

pub use command::{Builtin, CommandKind, CommandSpec, CompleteFn, Process, SimpleHandler};
pub use complete::Completion;
pub use error::ShellResult;
pub use history::HistoryLog;
pub use line::LineBuffer;
pub use overlay::{OverlayChannel, SelectCont, TextCont};
pub use registry::{CommandSet, Registry};
pub use shell::{Io, Key, Shell};
pub use style::ColorCode;

//! Command descriptors and the spawning-process contract.
//!
//! A command is either `Simple` (runs inline and returns) or `Spawn` (enters
//! a nested shell context with its own prompt name, registry and history).
//! The discriminant is an explicit enum, never the presence or absence of
//! optional fields. Built-ins the shell core itself interprets (`help`,
//! `quit`) get their own variant so per-frame regeneration stays trivial.

use std::any::Any;
use std::rc::Rc;

use crate::error::ShellResult;
use crate::registry::CommandSet;
use crate::shell::Io;
use crate::style::ColorCode;

/// Inline handler. Errors are reported on the shell's `err` channel; they
/// never abort the input loop.
pub type SimpleHandler = Rc<dyn Fn(&[String], &mut Io<'_>) -> ShellResult<()>>;

/// Argument-candidate producer for tab-completion. Must be pure and fast:
/// no I/O, a finite ordered list.
pub type CompleteFn = Rc<dyn Fn(&[String]) -> Vec<String>>;

#[derive(Clone)]
pub struct CommandSpec {
    /// One-line help text shown by `help`.
    pub help: String,
    /// Color the command name is painted with in echoed lines.
    pub style: ColorCode,
    pub kind: CommandKind,
    /// Optional argument completion.
    pub complete: Option<CompleteFn>,
}

#[derive(Clone)]
pub enum CommandKind {
    Simple(SimpleHandler),
    Spawn(Rc<dyn Process>),
    Builtin(Builtin),
}

/// Commands resolved by the shell core itself because they need access to
/// the registry or the frame stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Builtin {
    /// List every registered command of the live frame.
    Help,
    /// Pop the current frame and restore its parent.
    Quit,
}

impl CommandSpec {
    pub fn simple<F>(help: &str, style: ColorCode, handler: F) -> Self
    where
        F: Fn(&[String], &mut Io<'_>) -> ShellResult<()> + 'static,
    {
        Self {
            help: help.to_string(),
            style,
            kind: CommandKind::Simple(Rc::new(handler)),
            complete: None,
        }
    }

    pub fn spawn(help: &str, style: ColorCode, process: Rc<dyn Process>) -> Self {
        Self {
            help: help.to_string(),
            style,
            kind: CommandKind::Spawn(process),
            complete: None,
        }
    }

    pub(crate) fn builtin(help: &str, style: ColorCode, builtin: Builtin) -> Self {
        Self {
            help: help.to_string(),
            style,
            kind: CommandKind::Builtin(builtin),
            complete: None,
        }
    }

    pub fn with_complete<F>(mut self, complete: F) -> Self
    where
        F: Fn(&[String]) -> Vec<String> + 'static,
    {
        self.complete = Some(Rc::new(complete));
        self
    }
}

/// Contract for a spawning command.
///
/// `run` returns an opaque context owned by the process; the shell never
/// inspects it, only hands it back to `commands` and `quit`. Processes that
/// share state with their child command closures typically return an
/// `Rc<RefCell<..>>` and clone it into each closure.
pub trait Process {
    /// Prompt name installed while the process is live.
    fn spawn_name(&self) -> &str;

    /// Start the process. Output lands in the fresh child transcript.
    fn run(&self, args: &[String], io: &mut Io<'_>) -> Box<dyn Any>;

    /// Build the child command set around the context `run` returned.
    /// `quit` and a scoped `help` are merged in by the shell afterwards.
    fn commands(&self, ctx: &dyn Any, io: &mut Io<'_>) -> CommandSet;

    /// Release resources. Runs before the parent frame is restored.
    fn quit(&self, ctx: Box<dyn Any>, io: &mut Io<'_>) {
        let _ = (ctx, io);
    }
}

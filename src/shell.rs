//! The shell driver: key dispatch, command execution, process stack.
//!
//! All mutation happens in response to discrete key events, processed one
//! at a time to completion. Enter resolves an armed overlay request before
//! anything else; otherwise the line is echoed, logged to command history
//! and dispatched against the live registry. Spawning commands push the
//! live frame onto a stack and install a child context; `quit` pops it and
//! restores the parent verbatim.

use std::any::Any;
use std::rc::Rc;

use log::{debug, warn};

use crate::command::{Builtin, CommandKind, Process};
use crate::complete::{self, Completion};
use crate::history::HistoryLog;
use crate::line::LineBuffer;
use crate::overlay::{Overlay, OverlayChannel, SelectCont, TextCont};
use crate::registry::{CommandSet, Registry};
use crate::style::{self, ColorCode, DEFAULT_NAME};

/// Discrete key events fed by the embedding host. The host is responsible
/// for keyboard capture and for suppressing its own Tab focus-navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Char(char),
    Enter,
    Backspace,
    Tab,
    Left,
    Right,
    Up,
    Down,
}

/// Live per-frame state: everything a spawn snapshots and a quit restores,
/// minus the registry (kept beside it on the shell).
struct Session {
    name: String,
    transcript: Vec<String>,
    command_history: HistoryLog,
    line: LineBuffer,
    selection: usize,
    overlay: OverlayChannel,
}

impl Session {
    fn new() -> Self {
        Self {
            name: DEFAULT_NAME.to_string(),
            transcript: Vec::new(),
            command_history: HistoryLog::new(),
            line: LineBuffer::new(),
            selection: 0,
            overlay: OverlayChannel::default(),
        }
    }
}

/// Capability handle passed into every command invocation.
///
/// Commands receive exactly this instead of closing over shared mutable
/// state: transcript output, the error channel, prompt renaming, input
/// seeding and overlay arming all go through here.
pub struct Io<'a> {
    session: &'a mut Session,
}

impl Io<'_> {
    /// Append a pre-rendered line to the transcript.
    pub fn append_history(&mut self, line: impl Into<String>) {
        self.session.transcript.push(line.into());
    }

    /// Append a line on the styled error channel.
    pub fn append_error(&mut self, msg: &str) {
        self.session.transcript.push(style::error_line(msg));
    }

    /// Append a line with the styled success tag.
    pub fn append_success(&mut self, msg: &str) {
        self.session.transcript.push(style::success_line(msg));
    }

    /// Empty the transcript. Command history is untouched.
    pub fn clear_history(&mut self) {
        self.session.transcript.clear();
    }

    pub fn name(&self) -> &str {
        &self.session.name
    }

    pub fn set_name(&mut self, name: &str) {
        self.session.name = name.to_string();
    }

    /// Seed the input line, cursor at end-of-text.
    pub fn set_input(&mut self, text: &str) {
        self.session.line.set(text);
    }

    /// Reposition the cursor, clamped to the input bounds.
    pub fn set_cursor(&mut self, pos: usize) {
        self.session.line.set_cursor(pos);
    }

    /// Ask the user a free-text question. The next Enter delivers the input
    /// line to `cont` instead of dispatching it. Returns false (and keeps
    /// the outstanding request) if a request is already armed.
    pub fn prompt_text(&mut self, prompt: &str, cont: TextCont) -> bool {
        let armed = self.session.overlay.arm_text(cont);
        if armed {
            self.session.transcript.push(prompt.to_string());
        }
        armed
    }

    /// Ask the user to pick one of `choices`. Up/Down move the highlight
    /// with wrap-around; Enter delivers the chosen index to `cont`.
    pub fn prompt_select(&mut self, prompt: &str, choices: Vec<String>, cont: SelectCont) -> bool {
        let armed = self.session.overlay.arm_select(choices, cont);
        if armed {
            self.session.selection = 0;
            self.session.transcript.push(prompt.to_string());
        }
        armed
    }
}

/// A saved parent context plus the child process that replaced it. Pops
/// unwind in strict LIFO order.
struct Frame {
    name: String,
    transcript: Vec<String>,
    command_history: Vec<String>,
    registry: Registry,
    process: Rc<dyn Process>,
    context: Box<dyn Any>,
}

pub struct Shell {
    session: Session,
    registry: Registry,
    stack: Vec<Frame>,
}

impl Shell {
    /// Build a shell over the built-in registry merged with `contributed`
    /// (later contributors win on name collision).
    pub fn new(contributed: CommandSet) -> Self {
        Self {
            session: Session::new(),
            registry: Registry::root(contributed),
            stack: Vec::new(),
        }
    }

    /// Feed one key event. Mutations run to completion before this returns.
    pub fn handle_key(&mut self, key: Key) {
        match key {
            Key::Char(c) if c.is_ascii_graphic() || c == ' ' => self.session.line.insert(c),
            Key::Char(_) => {}
            Key::Backspace => self.session.line.delete_back(),
            Key::Left => self.session.line.move_cursor(-1),
            Key::Right => self.session.line.move_cursor(1),
            Key::Up => self.recall_or_select(true),
            Key::Down => self.recall_or_select(false),
            Key::Tab => self.complete(),
            Key::Enter => self.submit(),
        }
    }

    fn recall_or_select(&mut self, up: bool) {
        // a selection prompt captures Up/Down entirely; recall state is
        // untouched while it is armed
        if let Some(choices) = self.session.overlay.choices() {
            let len = choices.len();
            self.session.selection = if up {
                (self.session.selection + len - 1) % len
            } else {
                (self.session.selection + 1) % len
            };
            return;
        }

        let loaded = if up {
            self.session.command_history.recall_older().map(str::to_string)
        } else {
            self.session.command_history.recall_newer().map(str::to_string)
        };
        match loaded {
            Some(text) => self.session.line.set(&text),
            None => self.session.line.reset(),
        }
    }

    fn submit(&mut self) {
        match self.session.overlay.take() {
            Some(Overlay::Select { choices, cont }) => {
                let index = self.session.selection.min(choices.len() - 1);
                let echo = style::paint(ColorCode::Cyan, &format!(">  {}", choices[index]));
                self.session.transcript.push(echo);
                self.session.selection = 0;
                cont(index, &mut Io { session: &mut self.session });
            }
            Some(Overlay::Text { cont }) => {
                let reply = self.session.line.take();
                self.session.transcript.push(reply.clone());
                cont(&reply, &mut Io { session: &mut self.session });
            }
            None => self.exec(),
        }
    }

    /// Echo, log and dispatch the current input line.
    fn exec(&mut self) {
        let input = self.session.line.take();
        let echo = self.colorized_line(&input);
        self.session.transcript.push(echo);
        self.session.command_history.push(input.clone());

        let mut parts = input.splitn(2, ' ');
        let command = parts.next().unwrap_or("").to_string();
        let args: Vec<String> = parts
            .next()
            .unwrap_or("")
            .split_whitespace()
            .map(String::from)
            .collect();
        if command.is_empty() {
            return;
        }

        let Some(spec) = self.registry.get(&command) else {
            let line = style::error_line(&format!("unknown command {command}"));
            self.session.transcript.push(line);
            return;
        };

        debug!("dispatch {command} {args:?}");
        match spec.kind.clone() {
            CommandKind::Simple(run) => {
                let mut io = Io { session: &mut self.session };
                if let Err(err) = run(&args, &mut io) {
                    io.append_error(&format!("{err:#}"));
                }
            }
            CommandKind::Spawn(process) => self.spawn(process, &args),
            CommandKind::Builtin(Builtin::Help) => {
                let listing = self.registry.help_listing();
                self.session.transcript.push(listing);
            }
            CommandKind::Builtin(Builtin::Quit) => self.quit(),
        }
    }

    /// Push the live frame and enter the process's child context. The
    /// snapshot is taken after the invocation echo, so the parent replays
    /// with the spawning line in place.
    fn spawn(&mut self, process: Rc<dyn Process>, args: &[String]) {
        debug!("spawn {} {args:?}", process.spawn_name());

        let name = std::mem::replace(&mut self.session.name, process.spawn_name().to_string());
        let transcript = std::mem::take(&mut self.session.transcript);
        let command_history = self.session.command_history.take_entries();
        self.session.line.reset();
        self.session.selection = 0;

        let context = process.run(args, &mut Io { session: &mut self.session });
        let set = process.commands(&*context, &mut Io { session: &mut self.session });
        let registry = std::mem::replace(&mut self.registry, Registry::child(set));

        self.stack.push(Frame {
            name,
            transcript,
            command_history,
            registry,
            process,
            context,
        });
    }

    /// Pop the current frame: run the process's cleanup, then restore every
    /// saved field verbatim. The root frame cannot be quit.
    fn quit(&mut self) {
        let Some(frame) = self.stack.pop() else {
            warn!("quit ignored: already at the root frame");
            return;
        };
        debug!("quit {} -> {}", self.session.name, frame.name);

        frame
            .process
            .quit(frame.context, &mut Io { session: &mut self.session });

        self.session.name = frame.name;
        self.session.transcript = frame.transcript;
        self.session.command_history.replace(frame.command_history);
        self.registry = frame.registry;
        self.session.line.reset();
        self.session.selection = 0;
    }

    /// One Tab press: narrow first, list only when narrowing is exhausted.
    fn complete(&mut self) {
        let input = self.session.line.text().to_string();
        if input.is_empty() {
            return;
        }

        let resolved = if !input.contains(' ') {
            // first token: candidates are registry names (already sorted)
            let names: Vec<String> = self
                .registry
                .names()
                .filter(|n| n.starts_with(&input))
                .map(String::from)
                .collect();
            complete::resolve(&input, &names, &names)
        } else {
            let (command, rest) = input.split_once(' ').unwrap_or((input.as_str(), ""));
            let Some(completer) = self.registry.get(command).and_then(|s| s.complete.clone())
            else {
                return;
            };
            let args: Vec<String> = rest.split_whitespace().map(String::from).collect();
            let raw = completer(&args);
            let mut full: Vec<String> = raw.iter().map(|s| format!("{command} {s}")).collect();
            full.sort();
            full.retain(|cand| cand.starts_with(&input));
            complete::resolve(&input, &full, &raw)
        };

        match resolved {
            Completion::None => {}
            Completion::Replace(text) => self.session.line.set(&text),
            Completion::List(labels) => {
                let echo = self.colorized_line(&input);
                self.session.transcript.push(echo);
                self.session.transcript.push(labels.join(" "));
            }
        }
    }

    /// Prompt plus the input with registered command words colorized.
    fn colorized_line(&self, input: &str) -> String {
        let words: Vec<String> = input
            .split(' ')
            .map(|word| match self.registry.get(word) {
                Some(spec) => style::paint(spec.style, word),
                None => word.to_string(),
            })
            .collect();
        format!("{} {}", style::prompt_line(&self.session.name), words.join(" "))
    }

    // ---- host-facing surface ------------------------------------------

    /// Rendered transcript lines (pre-colorized; entries may span multiple
    /// display lines via embedded newlines).
    pub fn transcript(&self) -> &[String] {
        &self.session.transcript
    }

    /// The prompt segment painted before the input line.
    pub fn prompt(&self) -> String {
        style::prompt_line(&self.session.name)
    }

    pub fn name(&self) -> &str {
        &self.session.name
    }

    pub fn input(&self) -> &str {
        self.session.line.text()
    }

    /// Character index to highlight as the cursor.
    pub fn cursor(&self) -> usize {
        self.session.line.cursor()
    }

    /// Choice labels and the highlighted index while a selection prompt is
    /// armed; the host paints this instead of the input line.
    pub fn selection(&self) -> Option<(&[String], usize)> {
        self.session
            .overlay
            .choices()
            .map(|choices| (choices, self.session.selection))
    }

    /// Whether an overlay request is outstanding.
    pub fn awaiting_input(&self) -> bool {
        self.session.overlay.is_armed()
    }

    /// Submitted lines of the live frame.
    pub fn command_history(&self) -> &[String] {
        self.session.command_history.entries()
    }

    /// Registered command names of the live frame, sorted.
    pub fn command_names(&self) -> Vec<String> {
        self.registry.names().map(String::from).collect()
    }

    /// Nesting depth: 0 at the root frame.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Late output delivery for work finishing after further keystrokes,
    /// or after the frame that started it was popped: lines always land in
    /// the transcript of whatever frame is live now.
    pub fn append_history(&mut self, line: impl Into<String>) {
        self.session.transcript.push(line.into());
    }

    /// Late error delivery; same targeting rule as [`Shell::append_history`].
    pub fn append_error(&mut self, msg: &str) {
        self.session.transcript.push(style::error_line(msg));
    }
}

impl Default for Shell {
    /// A shell with the stock command packs (filesystem, dice game, clock).
    fn default() -> Self {
        Self::new(crate::commands::default_set())
    }
}

//! The REPL controller: key events in, terminal sequences out.
//!
//! [`ReplController`] owns the line being edited, the history and the
//! command tree, and writes to a [`TerminalSink`]. It never runs commands
//! itself. Submitting a line yields a [`PendingCommand`]; the host runs it
//! and reports back through [`ReplController::finish_command`].
//!
//! Key events are only accepted while the controller is [`ReplState::Idle`].
//! Anything arriving during a pending write or a running command is dropped.

use std::rc::Rc;

use crate::config::{builtins, ReplOptions, CANDIDATE_INDENT};
use crate::core::autocomplete::{complete, Completion};
use crate::core::error::{CommandError, SpecError};
use crate::core::history::HistoryStore;
use crate::core::line::LineBuffer;
use crate::core::terminal::{FlushStatus, TerminalSink};
use crate::models::{ArgGroup, CommandGroup, CommandLeaf, CommandSpec, KeyCode, KeyEvent};
use crate::utils::{paint_error, to_terminal_text, welcome_banner};

/// Erases the character left of the cursor.
const ERASE: &str = "\u{8} \u{8}";

/// Where the controller is in its cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReplState {
    /// Accepting key events.
    #[default]
    Idle,
    /// A replaced line is on its way to the screen.
    WritingLine,
    /// A submitted command has not finished yet.
    RunningCommand,
}

/// A submitted line waiting to be run by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingCommand {
    pub args: Vec<String>,
    /// Terminal width at submission time.
    pub columns: u16,
}

pub struct ReplController<S: TerminalSink> {
    sink: S,
    root: Rc<CommandGroup>,
    line: LineBuffer,
    history: HistoryStore,
    state: ReplState,
    options: ReplOptions,
    /// Builtins added to the root by the controller itself.
    builtins: Vec<&'static str>,
    /// Command descriptions rejected at construction, reported on start.
    load_errors: Vec<SpecError>,
}

impl<S: TerminalSink> ReplController<S> {
    pub fn new(root: CommandGroup, sink: S, options: ReplOptions) -> Self {
        Self::with_commands(root, sink, options, std::iter::empty::<&str>())
    }

    /// Like [`ReplController::new`], also loading JSON command descriptions
    /// into the root group.
    ///
    /// Descriptions that fail to parse, or that reuse an existing name, are
    /// skipped and reported on the error path by [`ReplController::start`].
    pub fn with_commands<I, P>(
        root: CommandGroup,
        sink: S,
        options: ReplOptions,
        payloads: I,
    ) -> Self
    where
        I: IntoIterator<Item = P>,
        P: AsRef<str>,
    {
        let mut root = root;
        if !options.description.is_empty() {
            root.description = options.description.clone();
        }

        let mut load_errors = Vec::new();
        for payload in payloads {
            match load_command(&root, payload.as_ref()) {
                Ok(leaf) => {
                    tracing::debug!(command = %leaf.name, "loaded command description");
                    root = root.child(leaf);
                }
                Err(e) => {
                    tracing::warn!(error = %e, "rejected command description");
                    load_errors.push(e);
                }
            }
        }

        let mut added = Vec::new();
        if options.builtins {
            for (name, leaf) in builtin_leaves() {
                if !root.is_taken(name) {
                    root = root.child(leaf);
                    added.push(name);
                }
            }
        }

        let history = HistoryStore::seeded(&options.history, options.history_capacity);

        Self {
            sink,
            root: Rc::new(root),
            line: LineBuffer::new(),
            history,
            state: ReplState::Idle,
            options,
            builtins: added,
            load_errors,
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn state(&self) -> ReplState {
        self.state
    }

    pub fn line(&self) -> &LineBuffer {
        &self.line
    }

    pub fn history(&self) -> &HistoryStore {
        &self.history
    }

    pub fn root(&self) -> &CommandGroup {
        &self.root
    }

    /// Shared handle to the command tree, for executors that walk it.
    pub fn root_handle(&self) -> Rc<CommandGroup> {
        Rc::clone(&self.root)
    }

    pub fn options(&self) -> &ReplOptions {
        &self.options
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn columns(&self) -> u16 {
        self.sink.columns()
    }

    // ========================================================================
    // Lifecycle
    // ========================================================================

    /// Print the welcome banner and the first prompt.
    ///
    /// With an initial command configured the banner is skipped and the
    /// command is submitted right away.
    pub fn start(&mut self) -> Option<PendingCommand> {
        let initial = self.options.initial_command.clone();
        if initial.is_none() {
            let banner = welcome_banner(self.columns());
            self.print(&banner);
        }

        for error in std::mem::take(&mut self.load_errors) {
            self.print_error(&format!("Error: {}", error));
        }

        match initial {
            Some(command) => {
                self.line = LineBuffer::with_value(&command, command.chars().count());
                self.prompt();
                self.run_current_line()
            }
            None => {
                self.prompt();
                None
            }
        }
    }

    /// Handle one key press.
    ///
    /// Returns the command to run when the key submitted a line.
    pub fn handle_key(&mut self, event: &KeyEvent) -> Option<PendingCommand> {
        if self.state != ReplState::Idle {
            tracing::debug!(state = ?self.state, code = event.code, "dropped key event");
            return None;
        }

        match event.key_code() {
            KeyCode::Backspace => {
                if self.line.delete() {
                    self.sink.write(ERASE);
                }
            }
            KeyCode::Tab => self.autocomplete(),
            KeyCode::Enter => return self.run_current_line(),
            KeyCode::ArrowLeft => {
                if self.line.move_previous() {
                    self.sink.write(&event.key);
                }
            }
            KeyCode::ArrowRight => {
                if self.line.move_next() {
                    self.sink.write(&event.key);
                }
            }
            KeyCode::ArrowUp => {
                let value = self.history.previous(&self.line.value());
                self.set_line(&value);
            }
            KeyCode::ArrowDown => {
                let value = self.history.next(&self.line.value());
                self.set_line(&value);
            }
            KeyCode::Other(_) => {
                if !event.has_modifiers() {
                    self.add_to_line(&event.key);
                }
            }
        }
        None
    }

    /// The terminal has applied the last line replacement.
    pub fn flush_completed(&mut self) {
        if self.state == ReplState::WritingLine {
            self.state = ReplState::Idle;
        } else {
            tracing::debug!(state = ?self.state, "flush without pending write");
        }
    }

    /// The command returned by the last submission has finished.
    ///
    /// Failures are printed on the error path. Either way the line is
    /// cleared and a fresh prompt is shown.
    pub fn finish_command(&mut self, result: Result<(), CommandError>) {
        if self.state != ReplState::RunningCommand {
            tracing::warn!(state = ?self.state, "finish_command without a running command");
            return;
        }

        if let Err(e) = result {
            self.print_error(&format!("Error: {}", e));
        }

        self.line.reset();
        self.state = ReplState::Idle;
        tracing::debug!("command finished");
        self.prompt();
    }

    /// Replace the line with `args` joined by spaces and submit it.
    pub fn set_and_run_args<A: AsRef<str>>(&mut self, args: &[A]) -> Option<PendingCommand> {
        if self.state != ReplState::Idle {
            tracing::debug!(state = ?self.state, "ignored set_and_run_args while busy");
            return None;
        }

        let line = args.iter().map(AsRef::as_ref).collect::<Vec<_>>().join(" ");
        let sequence = self.line.set_value(&line);
        self.sink.write(&sequence);
        self.run_current_line()
    }

    // ========================================================================
    // Output
    // ========================================================================

    /// Write `value` as one or more full lines.
    pub fn print(&mut self, value: &str) {
        self.sink.write(&to_terminal_text(value));
    }

    /// Like [`ReplController::print`], painted as an error.
    pub fn print_error(&mut self, value: &str) {
        tracing::debug!(error = value, "error output");
        self.sink.write(&to_terminal_text(&paint_error(value)));
    }

    /// Draw the prompt followed by the current line.
    pub fn prompt(&mut self) {
        let sequence = format!("{}{}", self.options.prompt(), self.line.render());
        self.sink.write(&sequence);
    }

    // ========================================================================
    // Line Editing
    // ========================================================================

    fn run_current_line(&mut self) -> Option<PendingCommand> {
        self.sink.write("\r\n");
        self.history.submit(&self.line.value());

        let args = match self.line.split_args().into_result() {
            Ok(args) => args,
            Err(e) => {
                self.print_error(&format!("Error: {}", e));
                self.prompt();
                return None;
            }
        };

        if args.is_empty() {
            self.line.reset();
            self.prompt();
            return None;
        }

        if let [command] = args.as_slice()
            && self.run_builtin(command)
        {
            self.line.reset();
            self.prompt();
            return None;
        }

        self.state = ReplState::RunningCommand;
        tracing::debug!(?args, "dispatching command");
        Some(PendingCommand {
            args,
            columns: self.columns(),
        })
    }

    /// Run a builtin the controller handles on its own. Returns whether
    /// `command` was one.
    fn run_builtin(&mut self, command: &str) -> bool {
        if !self.builtins.iter().any(|name| *name == command) {
            return false;
        }

        match command {
            builtins::CLEAR => {
                self.sink.clear();
                true
            }
            builtins::HISTORY => {
                let listing = self
                    .history
                    .list()
                    .iter()
                    .enumerate()
                    .map(|(i, line)| format!("{:>4}  {}", i + 1, line))
                    .collect::<Vec<_>>()
                    .join("\n");
                self.print(&listing);
                true
            }
            _ => false,
        }
    }

    fn set_line(&mut self, value: &str) {
        self.state = ReplState::WritingLine;
        let sequence = self.line.set_value(value);
        if self.sink.write_and_flush(&sequence) == FlushStatus::Flushed {
            self.state = ReplState::Idle;
        }
    }

    fn add_to_line(&mut self, text: &str) {
        let sequence = self.line.insert(text);
        self.sink.write(&sequence);
    }

    fn autocomplete(&mut self) {
        let split = self.line.split_args_up_to_cursor();
        let candidates = complete(&self.root, &split.args, &split.search);

        match Completion::from_candidates(candidates) {
            Completion::None => {}
            Completion::Insert(candidate) => {
                // Close a still-open quote before moving on to the next arg.
                let text = match (candidate.strip_suffix(' '), split.open_quote) {
                    (Some(stem), Some(quote)) => format!("{}{} ", stem, quote.as_char()),
                    _ => candidate,
                };
                self.add_to_line(&text);
            }
            Completion::List(candidates) => {
                self.print("");
                for candidate in candidates {
                    let entry = format!("{}{}{}", CANDIDATE_INDENT, split.search, candidate);
                    self.print(&entry);
                }
                self.prompt();
            }
        }
    }
}

fn load_command(root: &CommandGroup, payload: &str) -> Result<CommandLeaf, SpecError> {
    let spec = CommandSpec::from_json(payload)?;
    if let Some(taken) = std::iter::once(&spec.name)
        .chain(&spec.aliases)
        .find(|name| root.is_taken(name))
    {
        return Err(SpecError::DuplicateName(taken.clone()));
    }
    Ok(spec.into_leaf())
}

fn builtin_leaves() -> [(&'static str, CommandLeaf); 3] {
    [
        (
            builtins::CLEAR,
            CommandLeaf::new(builtins::CLEAR, "Clears the terminal"),
        ),
        (
            builtins::HELP,
            CommandLeaf::new(builtins::HELP, "Lists the commands available for you to use")
                .positional(ArgGroup::new("[command...]").optional()),
        ),
        (
            builtins::HISTORY,
            CommandLeaf::new(builtins::HISTORY, "Lists previously run commands"),
        ),
    ]
}

// ============================================================================
// Tests
// ============================================================================

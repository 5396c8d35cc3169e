//! Async driver tying a [`ReplController`] to a [`CommandExecutor`].
//!
//! The controller is shared through `Rc<RefCell<_>>` so the executor's logger
//! can write to the terminal while a command runs. No borrow is held across
//! an `.await`.

use std::cell::RefCell;
use std::rc::Rc;

use crate::core::executor::{CommandExecutor, Invocation};
use crate::core::repl::{PendingCommand, ReplController, ReplState};
use crate::core::terminal::{Logger, TerminalSink};
use crate::models::KeyEvent;

pub struct Session<S: TerminalSink, E: CommandExecutor> {
    controller: Rc<RefCell<ReplController<S>>>,
    executor: E,
}

impl<S: TerminalSink, E: CommandExecutor> Session<S, E> {
    pub fn new(controller: ReplController<S>, executor: E) -> Self {
        Self {
            controller: Rc::new(RefCell::new(controller)),
            executor,
        }
    }

    pub fn controller(&self) -> &Rc<RefCell<ReplController<S>>> {
        &self.controller
    }

    /// Start the controller and run its initial command, if any.
    pub async fn start(&self) {
        let pending = self.controller.borrow_mut().start();
        self.dispatch(pending).await;
    }

    /// Feed one key event, running the command it submits.
    pub async fn handle_key(&self, event: &KeyEvent) {
        let pending = self.controller.borrow_mut().handle_key(event);
        self.dispatch(pending).await;
    }

    /// Replace the line with `args` and run it.
    pub async fn run_args<A: AsRef<str>>(&self, args: &[A]) {
        let pending = self.controller.borrow_mut().set_and_run_args(args);
        self.dispatch(pending).await;
    }

    /// Whether the controller would accept a key event right now.
    pub fn is_idle(&self) -> bool {
        self.controller
            .try_borrow()
            .is_ok_and(|controller| controller.state() == ReplState::Idle)
    }

    pub fn flush_completed(&self) {
        self.controller.borrow_mut().flush_completed();
    }

    async fn dispatch(&self, pending: Option<PendingCommand>) {
        let Some(PendingCommand { args, columns }) = pending else {
            return;
        };

        let root = self.controller.borrow().root_handle();
        let logger = SessionLogger {
            controller: &self.controller,
        };
        let result = self
            .executor
            .run(Invocation {
                args: &args,
                root: &root,
                logger: &logger,
                columns,
            })
            .await;

        if let Err(e) = &result {
            tracing::debug!(error = %e, ?args, "command failed");
        }
        self.controller.borrow_mut().finish_command(result);
    }
}

/// Routes command output into the controller.
struct SessionLogger<'a, S: TerminalSink> {
    controller: &'a RefCell<ReplController<S>>,
}

impl<S: TerminalSink> Logger for SessionLogger<'_, S> {
    fn log(&self, value: &str) {
        match self.controller.try_borrow_mut() {
            Ok(mut controller) => controller.print(value),
            Err(_) => tracing::warn!(value, "dropped log output, controller busy"),
        }
    }

    fn error(&self, value: &str) {
        match self.controller.try_borrow_mut() {
            Ok(mut controller) => controller.print_error(value),
            Err(_) => tracing::warn!(value, "dropped error output, controller busy"),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::future::Future;

    use super::*;
    use crate::config::{ReplOptions, PROMPT};
    use crate::core::error::CommandError;
    use crate::core::terminal::MemoryTerminal;
    use crate::models::{CommandGroup, CommandLeaf};

    #[derive(Default)]
    struct Recording {
        runs: RefCell<Vec<Vec<String>>>,
    }

    impl CommandExecutor for Recording {
        fn run<'a>(
            &'a self,
            invocation: Invocation<'a>,
        ) -> impl Future<Output = Result<(), CommandError>> + 'a {
            async move {
                self.runs.borrow_mut().push(invocation.args.to_vec());
                match invocation.args[0].as_str() {
                    "fail" => Err(CommandError::Failed("nope".into())),
                    _ => {
                        invocation.logger.log("ran");
                        Ok(())
                    }
                }
            }
        }
    }

    fn session() -> Session<MemoryTerminal, Recording> {
        let root = CommandGroup::new("", "")
            .child(CommandLeaf::new("ok", ""))
            .child(CommandLeaf::new("fail", ""));
        let controller = ReplController::new(root, MemoryTerminal::default(), ReplOptions::default());
        Session::new(controller, Recording::default())
    }

    async fn type_line(session: &Session<MemoryTerminal, Recording>, line: &str) {
        for c in line.chars() {
            session.handle_key(&KeyEvent::char(c)).await;
        }
        session.handle_key(&KeyEvent::enter()).await;
    }

    #[tokio::test]
    async fn test_command_output_and_prompt() {
        let session = session();
        session.start().await;
        session.controller().borrow_mut().sink_mut().take_output();

        type_line(&session, "ok").await;
        assert_eq!(session.executor.runs.borrow().clone(), vec![vec!["ok".to_string()]]);

        let controller = session.controller().borrow();
        assert_eq!(controller.state(), ReplState::Idle);
        assert_eq!(controller.sink().output(), format!("ok\r\nran\r\n{}", PROMPT));
    }

    #[tokio::test]
    async fn test_failure_returns_to_idle() {
        let session = session();
        session.start().await;
        type_line(&session, "fail").await;

        let controller = session.controller().borrow();
        assert_eq!(controller.state(), ReplState::Idle);
        assert!(controller.sink().output().contains("Error: nope"));
    }

    #[tokio::test]
    async fn test_run_args() {
        let session = session();
        session.start().await;
        session.run_args(&["ok", "now"]).await;
        assert_eq!(
            session.executor.runs.borrow().clone(),
            vec![vec!["ok".to_string(), "now".to_string()]]
        );
    }

    #[test]
    fn test_is_idle_tracks_running_command() {
        let session = session();
        assert!(session.is_idle());

        let pending = session.controller().borrow_mut().set_and_run_args(&["ok"]);
        assert!(pending.is_some());
        assert!(!session.is_idle());

        session.controller().borrow_mut().finish_command(Ok(()));
        assert!(session.is_idle());

        let _guard = session.controller().borrow_mut();
        assert!(!session.is_idle());
    }

    #[test]
    fn test_logger_while_borrowed_is_dropped() {
        let session = session();
        let guard = session.controller().borrow_mut();
        let logger = SessionLogger {
            controller: session.controller(),
        };
        logger.log("lost");
        drop(guard);
        assert_eq!(session.controller().borrow().sink().output(), "");
    }
}

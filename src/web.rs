//! Browser bridge for xterm.js-style terminals.
//!
//! Exposes [`WebRepl`] to JavaScript. The terminal and the command runner
//! are plain JS values reached through the `Reflect` API, so any object with
//! `write(data, callback?)`, `clear()`, `cols` and `onKey(handler)` works.

use std::cell::RefCell;
use std::future::Future;
use std::rc::Rc;

use js_sys::{Array, Function, Object, Promise, Reflect};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys::KeyboardEvent;

use crate::config::ReplOptions;
use crate::core::{
    CommandError, CommandExecutor, FlushStatus, Invocation, ReplController, Session, TerminalSink,
};
use crate::models::{CommandGroup, KeyEvent, Modifiers};

const DEFAULT_COLUMNS: u16 = 80;

/// Called once the terminal has applied a write.
type FlushHook = Rc<RefCell<Option<Box<dyn Fn()>>>>;

type WebSession = Session<XtermSink, JsExecutor>;

/// Look up `target[name]` as a function.
fn method(target: &Object, name: &str) -> Result<Function, JsValue> {
    Reflect::get(target, &name.into())?
        .dyn_into::<Function>()
        .map_err(|_| JsValue::from_str(&format!("terminal.{} is not a function", name)))
}

/// Best-effort text for a thrown JS value.
fn describe(value: &JsValue) -> String {
    if let Some(text) = value.as_string() {
        return text;
    }
    match value.dyn_ref::<js_sys::Error>() {
        Some(error) => String::from(error.message()),
        None => format!("{:?}", value),
    }
}

// ============================================================================
// Terminal Sink
// ============================================================================

struct XtermSink {
    terminal: Object,
    write: Function,
    clear: Function,
    on_flush: FlushHook,
}

impl XtermSink {
    fn new(terminal: Object, on_flush: FlushHook) -> Result<Self, JsValue> {
        let write = method(&terminal, "write")?;
        let clear = method(&terminal, "clear")?;
        Ok(Self {
            terminal,
            write,
            clear,
            on_flush,
        })
    }
}

impl TerminalSink for XtermSink {
    fn write(&mut self, data: &str) {
        if let Err(e) = self.write.call1(&self.terminal, &data.into()) {
            web_sys::console::error_2(&"terminal write failed:".into(), &e);
        }
    }

    fn write_and_flush(&mut self, data: &str) -> FlushStatus {
        let hook = Rc::clone(&self.on_flush);
        let callback = Closure::once_into_js(move || {
            if let Some(notify) = hook.borrow().as_ref() {
                notify();
            }
        });

        match self.write.call2(&self.terminal, &data.into(), &callback) {
            Ok(_) => FlushStatus::Pending,
            Err(e) => {
                web_sys::console::error_2(&"terminal write failed:".into(), &e);
                FlushStatus::Flushed
            }
        }
    }

    fn columns(&self) -> u16 {
        Reflect::get(&self.terminal, &"cols".into())
            .ok()
            .and_then(|cols| cols.as_f64())
            .map(|cols| cols as u16)
            .unwrap_or(DEFAULT_COLUMNS)
    }

    fn clear(&mut self) {
        if let Err(e) = self.clear.call0(&self.terminal) {
            web_sys::console::error_2(&"terminal clear failed:".into(), &e);
        }
    }
}

// ============================================================================
// Executor
// ============================================================================

/// Forwards commands to a JS `runCommand(args, columns)` function.
///
/// The function may return a string, a Promise of one, or nothing. Any text
/// it produces is printed; a throw or rejection becomes a command error.
struct JsExecutor {
    run_command: Function,
}

impl CommandExecutor for JsExecutor {
    fn run<'a>(
        &'a self,
        invocation: Invocation<'a>,
    ) -> impl Future<Output = Result<(), CommandError>> + 'a {
        async move {
            let args: Array = invocation.args.iter().map(|arg| JsValue::from_str(arg)).collect();
            let columns = JsValue::from(invocation.columns);

            let returned = self
                .run_command
                .call2(&JsValue::NULL, &args, &columns)
                .map_err(|e| host_error(&e))?;

            let value = match returned.dyn_into::<Promise>() {
                Ok(promise) => JsFuture::from(promise).await.map_err(|e| host_error(&e))?,
                Err(value) => value,
            };

            if let Some(text) = value.as_string()
                && !text.is_empty()
            {
                invocation.logger.log(&text);
            }
            Ok(())
        }
    }
}

fn host_error(value: &JsValue) -> CommandError {
    web_sys::console::error_1(value);
    CommandError::Host(describe(value))
}

// ============================================================================
// WebRepl
// ============================================================================

fn read_key_event(event: &JsValue) -> Option<(KeyEvent, KeyboardEvent)> {
    let key = Reflect::get(event, &"key".into()).ok()?.as_string()?;
    let dom_event = Reflect::get(event, &"domEvent".into())
        .ok()?
        .dyn_into::<KeyboardEvent>()
        .ok()?;

    let mut modifiers = Modifiers::empty();
    modifiers.set(Modifiers::ALT, dom_event.alt_key());
    modifiers.set(Modifiers::CTRL, dom_event.ctrl_key());
    modifiers.set(Modifiers::META, dom_event.meta_key());

    let key = KeyEvent::new(key, dom_event.key_code()).with_modifiers(modifiers);
    Some((key, dom_event))
}

/// A REPL attached to a browser terminal.
#[wasm_bindgen]
pub struct WebRepl {
    terminal: Object,
    session: Rc<WebSession>,
}

#[wasm_bindgen]
impl WebRepl {
    /// `options` is a plain object matching [`ReplOptions`]; `commands` holds
    /// JSON command descriptions to add to the tree.
    #[wasm_bindgen(constructor)]
    pub fn new(
        terminal: Object,
        run_command: Function,
        options: JsValue,
        commands: Option<Vec<String>>,
    ) -> Result<WebRepl, JsValue> {
        console_error_panic_hook::set_once();

        let options: ReplOptions = if options.is_undefined() || options.is_null() {
            ReplOptions::default()
        } else {
            serde_wasm_bindgen::from_value(options)?
        };

        let on_flush: FlushHook = Rc::default();
        let sink = XtermSink::new(terminal.clone(), Rc::clone(&on_flush))?;
        let root = CommandGroup::new("", options.description.clone());
        let controller =
            ReplController::with_commands(root, sink, options, commands.unwrap_or_default());
        let session = Rc::new(Session::new(controller, JsExecutor { run_command }));

        // Flushes arrive from the terminal's own callback; defer them so the
        // controller is never borrowed twice.
        let weak = Rc::downgrade(&session);
        *on_flush.borrow_mut() = Some(Box::new(move || {
            let weak = weak.clone();
            spawn_local(async move {
                if let Some(session) = weak.upgrade() {
                    session.flush_completed();
                }
            });
        }));

        Ok(WebRepl { terminal, session })
    }

    /// Subscribe to key events and show the first prompt.
    pub fn start(&self) -> Result<(), JsValue> {
        let session = Rc::clone(&self.session);
        let on_key = Closure::wrap(Box::new(move |event: JsValue| {
            let Some((key, dom_event)) = read_key_event(&event) else {
                return;
            };
            // Busy keys are dropped by the controller and keep their browser default.
            if !session.is_idle() {
                return;
            }
            dom_event.prevent_default();
            let session = Rc::clone(&session);
            spawn_local(async move {
                session.handle_key(&key).await;
            });
        }) as Box<dyn Fn(JsValue)>);

        method(&self.terminal, "onKey")?.call1(&self.terminal, on_key.as_ref())?;
        // Lives as long as the page.
        on_key.forget();

        let session = Rc::clone(&self.session);
        spawn_local(async move {
            session.start().await;
        });
        Ok(())
    }

    /// Replace the line with `args` and run it, as if typed.
    #[wasm_bindgen(js_name = setAndRunArgs)]
    pub fn set_and_run_args(&self, args: Vec<String>) {
        let session = Rc::clone(&self.session);
        spawn_local(async move {
            session.run_args(&args).await;
        });
    }
}

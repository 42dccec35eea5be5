#![forbid(unsafe_code)]

//! Program runtime: single-threaded event loop with deferred effects.
//!
//! The loop transitions exactly one message at a time, so a [`Model`] never
//! needs locks. Deferred work requested via [`Cmd::Task`] runs on a spawned
//! thread; its single resulting message re-enters the loop through an mpsc
//! channel drained between input polls. Quitting stops transition processing
//! immediately; task results still in flight are discarded with the channel.
//!
//! Input arrives through the [`EventSource`] seam: [`CrosstermEventSource`]
//! owns the real terminal session, [`ScriptedEventSource`] feeds queued
//! events so tests can drive the loop headlessly.

use std::collections::VecDeque;
use std::io::{self, Stdout, Write};
use std::sync::mpsc;
use std::time::Duration;

use fable_core::event::Event;
use fable_core::terminal_session::{SessionOptions, TerminalSession};
use tracing::{debug, info};

use crate::terminal_writer::TerminalWriter;

/// The Model trait defines application state and behavior.
pub trait Model: Sized {
    /// The message type for this model.
    ///
    /// Messages represent actions that update the model state. Must be
    /// convertible from terminal events.
    type Message: From<Event> + Send + 'static;

    /// Initialize the model with startup commands.
    ///
    /// Called once when the program starts, before the first frame.
    fn init(&mut self) -> Cmd<Self::Message> {
        Cmd::none()
    }

    /// Update the model in response to a message.
    ///
    /// This is the core state transition function. Returns a command for
    /// any side effect the transition requests.
    fn update(&mut self, msg: Self::Message) -> Cmd<Self::Message>;

    /// Render the current state as one multi-line text frame.
    fn view(&self) -> String;
}

/// Commands represent side effects to be executed by the runtime.
#[derive(Default)]
pub enum Cmd<M> {
    /// No operation.
    #[default]
    None,

    /// Quit the application; no further transitions are processed.
    Quit,

    /// Send a message back to the model.
    Msg(M),

    /// Execute a blocking operation on a background thread.
    ///
    /// The closure runs on a spawned thread and its return value is sent
    /// back to the model as a message.
    Task(Box<dyn FnOnce() -> M + Send>),
}

impl<M: std::fmt::Debug> std::fmt::Debug for Cmd<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::None => write!(f, "None"),
            Self::Quit => write!(f, "Quit"),
            Self::Msg(m) => f.debug_tuple("Msg").field(m).finish(),
            Self::Task(_) => write!(f, "Task(...)"),
        }
    }
}

impl<M> Cmd<M> {
    /// Create a no-op command.
    #[inline]
    pub fn none() -> Self {
        Self::None
    }

    /// Create a quit command.
    #[inline]
    pub fn quit() -> Self {
        Self::Quit
    }

    /// Create a message command.
    #[inline]
    pub fn msg(m: M) -> Self {
        Self::Msg(m)
    }

    /// Create a background task command.
    ///
    /// The closure runs on a spawned thread. When it completes, the
    /// returned message is delivered to the model's `update()`.
    pub fn task<F>(f: F) -> Self
    where
        F: FnOnce() -> M + Send + 'static,
    {
        Self::Task(Box::new(f))
    }

    /// True for [`Cmd::None`].
    #[must_use]
    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }
}

/// Configuration for the program runtime.
#[derive(Debug, Clone)]
pub struct ProgramConfig {
    /// Run on the alternate screen buffer.
    pub alternate_screen: bool,

    /// Input poll timeout; also bounds how long a pending task result can
    /// sit in the channel before the loop notices it.
    pub poll_timeout: Duration,
}

impl Default for ProgramConfig {
    fn default() -> Self {
        Self {
            alternate_screen: true,
            poll_timeout: Duration::from_millis(100),
        }
    }
}

impl ProgramConfig {
    /// Set the input poll timeout.
    #[must_use]
    pub fn with_poll_timeout(mut self, timeout: Duration) -> Self {
        self.poll_timeout = timeout;
        self
    }
}

/// Source of input events for the loop.
pub trait EventSource {
    /// Current viewport size (columns, rows).
    fn size(&self) -> io::Result<(u16, u16)>;

    /// Poll for an event with a timeout.
    ///
    /// Returns `Ok(true)` if an event is available, `Ok(false)` on timeout.
    fn poll_event(&mut self, timeout: Duration) -> io::Result<bool>;

    /// Read the next available event.
    ///
    /// Returns `Ok(None)` when the underlying event has no canonical
    /// representation.
    fn read_event(&mut self) -> io::Result<Option<Event>>;
}

/// Event source backed by a live terminal session.
///
/// Owns the [`TerminalSession`], so dropping the program restores the
/// terminal.
#[derive(Debug)]
pub struct CrosstermEventSource {
    session: TerminalSession,
}

impl CrosstermEventSource {
    /// Enter a terminal session with the given options.
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal cannot be configured.
    pub fn new(options: SessionOptions) -> io::Result<Self> {
        Ok(Self {
            session: TerminalSession::new(options)?,
        })
    }
}

impl EventSource for CrosstermEventSource {
    fn size(&self) -> io::Result<(u16, u16)> {
        self.session.size()
    }

    fn poll_event(&mut self, timeout: Duration) -> io::Result<bool> {
        self.session.poll_event(timeout)
    }

    fn read_event(&mut self) -> io::Result<Option<Event>> {
        self.session.read_event()
    }
}

/// Scripted event source for headless loop runs.
///
/// Serves queued events in order; an optional idle-poll budget makes the
/// source report "no input" first, giving in-flight task results time to
/// land before the script continues. Once the queue is empty every poll
/// reports false, so scripts must end with an event that quits the model.
#[derive(Debug)]
pub struct ScriptedEventSource {
    events: VecDeque<Event>,
    size: (u16, u16),
    idle_polls: u32,
}

impl ScriptedEventSource {
    /// Create a source serving the given events in order.
    #[must_use]
    pub fn new(events: Vec<Event>) -> Self {
        Self {
            events: events.into(),
            size: (80, 24),
            idle_polls: 0,
        }
    }

    /// Set the size reported to the program.
    #[must_use]
    pub fn with_size(mut self, width: u16, height: u16) -> Self {
        self.size = (width, height);
        self
    }

    /// Report "no input" for the first `polls` polls (each sleeping up to
    /// 1ms) before serving the queue.
    #[must_use]
    pub fn with_idle_polls(mut self, polls: u32) -> Self {
        self.idle_polls = polls;
        self
    }
}

impl EventSource for ScriptedEventSource {
    fn size(&self) -> io::Result<(u16, u16)> {
        Ok(self.size)
    }

    fn poll_event(&mut self, timeout: Duration) -> io::Result<bool> {
        if self.idle_polls > 0 {
            self.idle_polls -= 1;
            std::thread::sleep(timeout.min(Duration::from_millis(1)));
            return Ok(false);
        }
        Ok(!self.events.is_empty())
    }

    fn read_event(&mut self) -> io::Result<Option<Event>> {
        Ok(self.events.pop_front())
    }
}

/// The program runtime: owns the model, the event source, and the writer.
pub struct Program<M: Model, E: EventSource = CrosstermEventSource, W: Write = Stdout> {
    /// The application model.
    model: M,
    /// Input event source.
    events: E,
    /// Frame presenter.
    writer: TerminalWriter<W>,
    /// Whether the loop is running.
    running: bool,
    /// Whether the UI needs to be redrawn.
    dirty: bool,
    /// Last known terminal width.
    width: u16,
    /// Last known terminal height.
    height: u16,
    /// Poll timeout per loop iteration.
    poll_timeout: Duration,
    /// Channel for receiving messages from background tasks.
    task_sender: mpsc::Sender<M::Message>,
    /// Receiving end drained once per loop iteration.
    task_receiver: mpsc::Receiver<M::Message>,
    /// Join handles for background tasks; reaped opportunistically.
    task_handles: Vec<std::thread::JoinHandle<()>>,
}

impl<M: Model> Program<M, CrosstermEventSource, Stdout> {
    /// Create a program on the real terminal with default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal cannot be configured.
    pub fn new(model: M) -> io::Result<Self> {
        Self::with_config(model, ProgramConfig::default())
    }

    /// Create a program on the real terminal with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal cannot be configured.
    pub fn with_config(model: M, config: ProgramConfig) -> io::Result<Self> {
        let events = CrosstermEventSource::new(SessionOptions {
            alternate_screen: config.alternate_screen,
        })?;
        Ok(Self::with_source(model, events, io::stdout(), config))
    }
}

impl<M: Model, E: EventSource, W: Write> Program<M, E, W> {
    /// Create a program from explicit parts. This is the headless path:
    /// any event source, any byte sink.
    pub fn with_source(model: M, events: E, sink: W, config: ProgramConfig) -> Self {
        let (width, height) = events.size().unwrap_or((80, 24));
        let (task_sender, task_receiver) = mpsc::channel();
        Self {
            model,
            events,
            writer: TerminalWriter::new(sink),
            running: true,
            dirty: true,
            width,
            height,
            poll_timeout: config.poll_timeout,
            task_sender,
            task_receiver,
            task_handles: Vec::new(),
        }
    }

    /// The application model.
    pub fn model(&self) -> &M {
        &self.model
    }

    /// Mutable access to the application model.
    pub fn model_mut(&mut self) -> &mut M {
        &mut self.model
    }

    /// The writer's underlying sink, for inspecting emitted frames.
    pub fn sink(&self) -> &W {
        self.writer.sink()
    }

    /// Run the event loop until the model quits.
    ///
    /// # Errors
    ///
    /// Propagates any failure of the underlying event source or frame
    /// writer unchanged.
    pub fn run(&mut self) -> io::Result<()> {
        info!("program started");
        let cmd = self.model.init();
        self.execute_cmd(cmd);

        if self.running {
            // The first frame must see the real viewport, so a synthetic
            // resize runs through the normal transition before the initial
            // render.
            let (width, height) = (self.width, self.height);
            self.handle_event(Event::Resize { width, height })?;
            self.render_frame()?;
        }

        while self.running {
            if self.events.poll_event(self.poll_timeout)? {
                // Drain all pending events before rendering.
                loop {
                    if let Some(event) = self.events.read_event()? {
                        self.handle_event(event)?;
                    }
                    if !self.running || !self.events.poll_event(Duration::ZERO)? {
                        break;
                    }
                }
            }

            self.process_task_results();
            self.reap_finished_tasks();

            if self.running && self.dirty {
                self.render_frame()?;
            }
        }

        self.reap_finished_tasks();
        info!("program stopped");
        Ok(())
    }

    fn handle_event(&mut self, event: Event) -> io::Result<()> {
        if let Event::Resize { width, height } = event {
            debug!(width, height, "terminal resized");
            self.width = width;
            self.height = height;
            self.writer.invalidate();
        }

        let msg = M::Message::from(event);
        let cmd = self.model.update(msg);
        self.dirty = true;
        self.execute_cmd(cmd);
        Ok(())
    }

    /// Drain results delivered by finished background tasks.
    fn process_task_results(&mut self) {
        while self.running {
            let Ok(msg) = self.task_receiver.try_recv() else {
                break;
            };
            let cmd = self.model.update(msg);
            self.dirty = true;
            self.execute_cmd(cmd);
        }
    }

    fn execute_cmd(&mut self, cmd: Cmd<M::Message>) {
        match cmd {
            Cmd::None => {}
            Cmd::Quit => {
                debug!("quit requested");
                self.running = false;
            }
            Cmd::Msg(m) => {
                let cmd = self.model.update(m);
                self.dirty = true;
                self.execute_cmd(cmd);
            }
            Cmd::Task(f) => {
                let sender = self.task_sender.clone();
                let handle = std::thread::spawn(move || {
                    let msg = f();
                    // Send fails only when the loop already exited; the
                    // result is discarded by design.
                    let _ = sender.send(msg);
                });
                self.task_handles.push(handle);
            }
        }
    }

    fn reap_finished_tasks(&mut self) {
        if self.task_handles.is_empty() {
            return;
        }

        let mut remaining = Vec::with_capacity(self.task_handles.len());
        for handle in self.task_handles.drain(..) {
            if handle.is_finished() {
                let _ = handle.join();
            } else {
                remaining.push(handle);
            }
        }
        self.task_handles = remaining;
    }

    fn render_frame(&mut self) -> io::Result<()> {
        let frame = self.model.view();
        self.writer.present(&frame)?;
        self.dirty = false;
        Ok(())
    }
}

//! Console host: interpreter, scrollback, and input line in one place.
//!
//! Everything here runs on the host's frame thread. Background work never
//! touches the scrollback directly; it sends lines through a
//! [`BackgroundJob`] and the host drains them in [`Console::update`].

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};

use devcon_scrollback::{ScrollbackBuffer, TextMeasure, VisibleRow};
use devcon_types::{ConsoleConfig, ConsoleError, InputBuffer, Result};

use crate::handler::HandlerRef;
use crate::interpreter::{CommandInterpreter, Interpreter};

/// Message from background work to the frame thread.
enum Deferred {
    Line(String),
    Done,
}

/// Cloneable handle for appending output from any thread.
///
/// Lines are queued and only reach the scrollback on the next
/// [`Console::update`].
#[derive(Clone)]
pub struct OutputSender {
    tx: Sender<Deferred>,
}

impl OutputSender {
    /// Queue one output line. Returns `false` if the console is gone.
    pub fn send(&self, line: impl Into<String>) -> bool {
        self.tx.send(Deferred::Line(line.into())).is_ok()
    }
}

/// Shared single-slot guard for in-flight background commands.
///
/// Clone it into handlers that want to run work off the frame thread.
#[derive(Clone)]
pub struct BackgroundSlot {
    tx: Sender<Deferred>,
    busy: Arc<AtomicBool>,
}

impl BackgroundSlot {
    /// Claim the slot. Fails with [`ConsoleError::Busy`] while another job
    /// holds it.
    pub fn try_begin(&self) -> Result<BackgroundJob> {
        if self
            .busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(ConsoleError::Busy(
                "a background command is already running".to_string(),
            ));
        }
        log::debug!("Background command started");
        Ok(BackgroundJob {
            tx: self.tx.clone(),
            busy: Arc::clone(&self.busy),
            finished: false,
        })
    }

    /// Whether a job currently holds the slot.
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }
}

/// Handle to the in-flight background command.
///
/// Can be moved to another thread. Output sent through it appears on the
/// next [`Console::update`]. Dropping the job releases the slot.
pub struct BackgroundJob {
    tx: Sender<Deferred>,
    busy: Arc<AtomicBool>,
    finished: bool,
}

impl BackgroundJob {
    /// Queue one output line.
    pub fn output(&self, line: impl Into<String>) {
        // The console may already be gone; its output has nowhere to go.
        let _ = self.tx.send(Deferred::Line(line.into()));
    }

    /// Release the slot. Equivalent to dropping the job.
    pub fn finish(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if self.finished {
            return;
        }
        self.finished = true;
        let _ = self.tx.send(Deferred::Done);
        self.busy.store(false, Ordering::Release);
    }
}

impl Drop for BackgroundJob {
    fn drop(&mut self) {
        self.release();
    }
}

/// An embeddable developer console.
pub struct Console {
    config: ConsoleConfig,
    interpreter: CommandInterpreter,
    output: ScrollbackBuffer,
    input: InputBuffer,
    slot: BackgroundSlot,
    rx: Receiver<Deferred>,
}

impl Console {
    /// Create a console with the built-in monospace measurer.
    pub fn new(config: ConsoleConfig) -> Result<Self> {
        config.validate()?;
        let output = ScrollbackBuffer::from_config(&config);
        Ok(Self::assemble(config, output))
    }

    /// Create a console that wraps text with the host's font metrics.
    pub fn with_measure(config: ConsoleConfig, measure: Box<dyn TextMeasure>) -> Result<Self> {
        config.validate()?;
        let output = ScrollbackBuffer::new(&config, measure);
        Ok(Self::assemble(config, output))
    }

    fn assemble(config: ConsoleConfig, output: ScrollbackBuffer) -> Self {
        let (tx, rx) = mpsc::channel();
        log::info!(
            "Console ready ({} rows, width {})",
            config.max_rows,
            config.available_width
        );
        Self {
            interpreter: CommandInterpreter::from_config(&config),
            output,
            input: InputBuffer::new(),
            slot: BackgroundSlot {
                tx,
                busy: Arc::new(AtomicBool::new(false)),
            },
            rx,
            config,
        }
    }

    pub fn config(&self) -> &ConsoleConfig {
        &self.config
    }

    pub fn interpreter(&self) -> &CommandInterpreter {
        &self.interpreter
    }

    pub fn interpreter_mut(&mut self) -> &mut CommandInterpreter {
        &mut self.interpreter
    }

    pub fn output(&self) -> &ScrollbackBuffer {
        &self.output
    }

    pub fn output_mut(&mut self) -> &mut ScrollbackBuffer {
        &mut self.output
    }

    pub fn input(&self) -> &InputBuffer {
        &self.input
    }

    pub fn input_mut(&mut self) -> &mut InputBuffer {
        &mut self.input
    }

    /// Register a command handler.
    pub fn register(&mut self, name: &str, handler: HandlerRef) -> Result<()> {
        self.interpreter.register(name, handler)
    }

    /// Stage the current input as a continuation line of a multi-line
    /// command and clear the input.
    pub fn continue_line(&mut self) {
        let line = self.input.take();
        self.output.add_command_entry(&line);
    }

    /// Submit the staged lines plus the current input.
    ///
    /// Each line is echoed to history next to the prompt and then executed.
    /// With interpreter echo enabled the interpreter's plain echo is used
    /// instead, so lines are not shown twice. While a background command is running, the input is kept and a
    /// notice is appended instead.
    pub fn submit(&mut self) {
        if self.slot.is_busy() {
            self.output
                .append("A command is still running. Please wait for it to finish.");
            return;
        }
        let line = self.input.take();
        self.output.add_command_entry(&line);
        let batch = self.output.dequeue_command_entry();

        let newline = self.config.newline_symbol.as_str();
        let mut lines: Vec<&str> = batch.split(newline).collect();
        // The batch always ends with the separator.
        lines.pop();
        let prompt_echo = !self.interpreter.echo_enabled();
        for line in lines {
            if prompt_echo {
                self.output.append_prefixed(line);
            }
            self.interpreter.execute(&mut self.output, line);
        }
    }

    /// Complete the input line forwards or backwards.
    pub fn tab(&mut self, forward: bool) {
        self.interpreter.autocomplete(&mut self.input, forward);
    }

    /// Handle for queueing output from other threads.
    pub fn output_sender(&self) -> OutputSender {
        OutputSender {
            tx: self.slot.tx.clone(),
        }
    }

    /// Handle for starting background commands.
    pub fn background_slot(&self) -> BackgroundSlot {
        self.slot.clone()
    }

    /// Claim the background slot directly.
    pub fn begin_background(&self) -> Result<BackgroundJob> {
        self.slot.try_begin()
    }

    /// Release the background slot held by `job`.
    pub fn finish_background(&self, job: BackgroundJob) {
        job.finish();
    }

    /// Whether a background command is in flight.
    pub fn is_busy(&self) -> bool {
        self.slot.is_busy()
    }

    /// Move queued background output onto the scrollback. Call once per
    /// frame. Returns the number of lines appended.
    pub fn update(&mut self) -> usize {
        let mut appended = 0;
        while let Ok(msg) = self.rx.try_recv() {
            match msg {
                Deferred::Line(line) => {
                    self.output.append(&line);
                    appended += 1;
                },
                Deferred::Done => log::debug!("Background command finished"),
            }
        }
        appended
    }

    /// Re-wrap the scrollback for a new available width.
    pub fn resize(&mut self, width: f32) {
        self.config.available_width = width;
        self.output.set_width(width);
    }

    /// Rows to draw this frame, oldest first.
    pub fn visible_rows(&self) -> Vec<VisibleRow<'_>> {
        self.output.visible_rows()
    }

    /// Drop all commands, output, and input.
    pub fn reset(&mut self) {
        self.interpreter.reset();
        self.output.clear();
        self.input.take();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    use crate::handler::{self, CommandResult};

    fn console() -> Console {
        let config = ConsoleConfig {
            max_rows: 10,
            available_width: 40.0,
            input_prefix: "> ".to_string(),
            ..ConsoleConfig::default()
        };
        let mut console = Console::new(config).unwrap();
        console
            .register("echo", handler::from_text(|args| args.join(" ")))
            .unwrap();
        console
    }

    fn type_line(console: &mut Console, text: &str) {
        for ch in text.chars() {
            console.input_mut().insert(ch);
        }
    }

    fn history(console: &Console) -> Vec<String> {
        console
            .output()
            .entries()
            .map(|e| e.value().to_string())
            .collect()
    }

    #[test]
    fn submit_echoes_prompt_line_then_output() {
        let mut c = console();
        type_line(&mut c, "echo hello world");
        c.submit();
        assert_eq!(history(&c), vec!["echo hello world", "hello world"]);
        assert!(c.output().entries().next().unwrap().is_prefixed());
        assert_eq!(c.input().value(), "");
        assert_eq!(c.output().staged_len(), 0);
    }

    #[test]
    fn submit_unknown_command() {
        let mut c = console();
        type_line(&mut c, "nope");
        c.submit();
        assert_eq!(history(&c), vec!["nope", "Command 'nope' not found."]);
    }

    #[test]
    fn continuation_lines_run_in_order() {
        let mut c = console();
        type_line(&mut c, "echo one");
        c.continue_line();
        assert_eq!(c.output().staged_len(), 1);
        type_line(&mut c, "echo two");
        c.submit();
        assert_eq!(history(&c), vec!["echo one", "one", "echo two", "two"]);
    }

    #[test]
    fn interpreter_echo_replaces_prompt_echo() {
        let mut c = console();
        c.interpreter_mut().set_echo_enabled(true);
        type_line(&mut c, "echo hi");
        c.submit();
        assert_eq!(history(&c), vec!["echo hi", "hi"]);
        assert!(!c.output().entries().next().unwrap().is_prefixed());
    }

    #[test]
    fn blank_submit_only_shows_prompt() {
        let mut c = console();
        c.submit();
        assert_eq!(history(&c), vec![""]);
    }

    #[test]
    fn tab_completes_input() {
        let mut c = console();
        c.register("exit", handler::from_result(|_| CommandResult::ok()))
            .unwrap();
        type_line(&mut c, "e");
        c.tab(true);
        assert_eq!(c.input().value(), "echo");
        c.tab(true);
        assert_eq!(c.input().value(), "exit");
        c.tab(false);
        assert_eq!(c.input().value(), "echo");
    }

    #[test]
    fn only_one_background_job_at_a_time() {
        let c = console();
        let job = c.begin_background().unwrap();
        assert!(c.is_busy());
        assert!(matches!(c.begin_background(), Err(ConsoleError::Busy(_))));
        c.finish_background(job);
        assert!(!c.is_busy());
        assert!(c.begin_background().is_ok());
    }

    #[test]
    fn dropping_job_releases_slot() {
        let c = console();
        drop(c.begin_background().unwrap());
        assert!(!c.is_busy());
    }

    #[test]
    fn submit_refused_while_busy() {
        let mut c = console();
        let job = c.begin_background().unwrap();
        type_line(&mut c, "echo later");
        c.submit();
        assert_eq!(
            history(&c),
            vec!["A command is still running. Please wait for it to finish."]
        );
        assert_eq!(c.input().value(), "echo later");
        drop(job);
        c.submit();
        assert_eq!(history(&c).last().map(String::as_str), Some("later"));
    }

    #[test]
    fn background_output_arrives_on_update() {
        let mut c = console();
        let job = c.begin_background().unwrap();
        let worker = thread::spawn(move || {
            job.output("from worker");
            job.output("done");
        });
        worker.join().unwrap();
        assert!(history(&c).is_empty());
        assert_eq!(c.update(), 2);
        assert_eq!(history(&c), vec!["from worker", "done"]);
        assert!(!c.is_busy());
        assert_eq!(c.update(), 0);
    }

    #[test]
    fn output_sender_queues_until_update() {
        let mut c = console();
        let sender = c.output_sender();
        let worker = {
            let sender = sender.clone();
            thread::spawn(move || sender.send("async line"))
        };
        assert!(worker.join().unwrap());
        assert!(sender.send("second"));
        assert!(history(&c).is_empty());
        assert_eq!(c.update(), 2);
        assert_eq!(history(&c), vec!["async line", "second"]);
        assert!(!c.is_busy());
        drop(c);
        assert!(!sender.send("nobody listening"));
    }

    #[test]
    fn handler_can_start_background_work() {
        let mut c = console();
        let slot = c.background_slot();
        c.register(
            "slow",
            handler::from_fn(move |_| {
                let job = slot.try_begin()?;
                thread::spawn(move || job.output("slow result"))
                    .join()
                    .map_err(|_| ConsoleError::Command("worker panicked".into()))?;
                Ok(CommandResult::text("started"))
            }),
        )
        .unwrap();
        type_line(&mut c, "slow");
        c.submit();
        assert_eq!(history(&c), vec!["slow", "started"]);
        c.update();
        assert_eq!(history(&c), vec!["slow", "started", "slow result"]);
    }

    #[test]
    fn resize_rewraps() {
        let mut c = console();
        c.output_mut().append("abcdefghij");
        assert_eq!(c.output().num_rows(), 1);
        c.resize(5.0);
        assert_eq!(c.output().num_rows(), 2);
        assert_eq!(c.config().available_width, 5.0);
    }

    #[test]
    fn visible_rows_mark_prompt_lines() {
        let mut c = console();
        type_line(&mut c, "echo hi");
        c.submit();
        let rows = c.visible_rows();
        assert_eq!(rows.len(), 2);
        assert!(rows[0].prompt);
        assert!(!rows[1].prompt);
    }

    #[test]
    fn invalid_config_rejected() {
        let config = ConsoleConfig {
            max_rows: 0,
            ..ConsoleConfig::default()
        };
        assert!(matches!(Console::new(config), Err(ConsoleError::Config(_))));
    }

    #[test]
    fn reset_clears_everything() {
        let mut c = console();
        type_line(&mut c, "echo x");
        c.submit();
        type_line(&mut c, "pending");
        c.reset();
        assert!(c.output().is_empty());
        assert!(c.interpreter().registry().is_empty());
        assert_eq!(c.input().value(), "");
    }
}

//! Render loop and terminal management (impure shell).
//!
//! [`PagerApp`] owns everything the loop touches: the screen, the pager, the
//! transcript source and the receiving end of the input channel. Each
//! [`tick`](PagerApp::tick) runs the whole cycle once and reports how long to
//! idle, so the loop itself is just `tick` and `sleep`.

pub mod screen;
pub mod status;

pub use screen::{paint_frame, paint_placeholder, ScreenGuard};
pub use status::render_status;

use crate::config::ResolvedConfig;
use crate::input::{InputEvent, InputReader};
use crate::integration;
use crate::model::{AppError, UsageSummary};
use crate::pager::{geometry, reinit_geometry, Pager, ScrollEvent};
use crate::render::{RenderOptions, Renderer, SyntaxHighlighter};
use crate::source::{ProcessWatch, TranscriptSource};
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Idle after a tick that applied scroll events.
pub const ACTIVE_IDLE: Duration = Duration::from_millis(16);
/// Idle after a quiet tick.
pub const QUIET_IDLE: Duration = Duration::from_millis(50);
/// Idle after the transcript could not be stat'ed.
pub const RETRY_IDLE: Duration = Duration::from_millis(16);
/// Liveness check interval while showing the placeholder.
pub const PLACEHOLDER_WAIT: Duration = Duration::from_secs(2);

/// Flags raised asynchronously by signal handlers.
///
/// Handlers only store `true`; the render loop does the work on its next
/// tick.
#[derive(Debug, Clone, Default)]
pub struct SignalFlags {
    resize: Arc<AtomicBool>,
    terminate: Arc<AtomicBool>,
}

impl SignalFlags {
    /// Register SIGWINCH as resize and SIGTERM/SIGINT/SIGHUP as terminate.
    ///
    /// # Errors
    ///
    /// Returns the error from handler registration.
    pub fn register() -> io::Result<Self> {
        use signal_hook::consts::{SIGHUP, SIGINT, SIGTERM, SIGWINCH};
        use signal_hook::flag;

        let flags = Self::default();
        flag::register(SIGWINCH, Arc::clone(&flags.resize))?;
        for signal in [SIGTERM, SIGINT, SIGHUP] {
            flag::register(signal, Arc::clone(&flags.terminate))?;
        }
        Ok(flags)
    }

    /// Flag a resize.
    pub fn raise_resize(&self) {
        self.resize.store(true, Ordering::SeqCst);
    }

    /// Flag termination.
    pub fn raise_terminate(&self) {
        self.terminate.store(true, Ordering::SeqCst);
    }

    fn take_resize(&self) -> bool {
        self.resize.swap(false, Ordering::SeqCst)
    }

    fn terminated(&self) -> bool {
        self.terminate.load(Ordering::SeqCst)
    }
}

/// Why the pager stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitReason {
    /// SIGTERM, SIGINT or SIGHUP.
    Terminated,
    /// The quit key.
    Quit,
    /// The watched editor process is gone.
    EditorExited,
    /// There was no transcript to show.
    NoTranscript,
}

/// Result of one loop iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// Keep going after idling this long.
    Continue(Duration),
    /// Leave the loop.
    Exit(ExitReason),
}

/// Build the renderer described by `config`.
pub fn renderer_for(config: &ResolvedConfig) -> Renderer {
    let options = RenderOptions {
        human_max_lines: config.human_max_lines,
        result_max_lines: config.result_max_lines,
    };
    let highlighter = config
        .syntax_highlight
        .then(|| SyntaxHighlighter::new(&config.theme));
    Renderer::new(options, highlighter)
}

/// The render loop's state.
pub struct PagerApp<W: Write> {
    screen: ScreenGuard<W>,
    pager: Pager,
    source: TranscriptSource,
    renderer: Renderer,
    ctx_limit: u64,
    max_columns: usize,
    editor: Option<ProcessWatch>,
    events: Receiver<InputEvent>,
    signals: SignalFlags,
    usage: Option<UsageSummary>,
    loaded: bool,
    full_redraw: bool,
}

impl<W: Write> PagerApp<W> {
    /// Assemble the loop. The first drawn frame clears the screen.
    pub fn new(
        screen: ScreenGuard<W>,
        source: TranscriptSource,
        config: &ResolvedConfig,
        events: Receiver<InputEvent>,
        signals: SignalFlags,
    ) -> Self {
        Self {
            screen,
            pager: Pager::new(),
            source,
            renderer: renderer_for(config),
            ctx_limit: config.ctx_limit,
            max_columns: config.max_columns,
            editor: None,
            events,
            signals,
            usage: None,
            loaded: false,
            full_redraw: true,
        }
    }

    /// Exit once `editor` is gone.
    pub fn with_editor(mut self, editor: Option<ProcessWatch>) -> Self {
        self.editor = editor;
        self
    }

    /// The viewport.
    pub fn pager(&self) -> &Pager {
        &self.pager
    }

    /// The screen the frames are written to.
    pub fn screen(&self) -> &ScreenGuard<W> {
        &self.screen
    }

    /// Usage from the last successful load.
    pub fn usage(&self) -> Option<&UsageSummary> {
        self.usage.as_ref()
    }

    /// Tick until something ends the session.
    pub fn run(&mut self) -> ExitReason {
        loop {
            match self.tick() {
                Tick::Continue(idle) => thread::sleep(idle),
                Tick::Exit(reason) => return reason,
            }
        }
    }

    /// Run one iteration of the loop.
    ///
    /// Content-update and draw failures are logged; the last good viewport
    /// stays on screen.
    pub fn tick(&mut self) -> Tick {
        if self.signals.terminated() {
            info!("Termination signal received");
            return Tick::Exit(ExitReason::Terminated);
        }

        if let Some(editor) = self.editor {
            if !editor.is_alive() {
                info!(pid = editor.pid(), "Editor process exited");
                return Tick::Exit(ExitReason::EditorExited);
            }
        }

        if self.signals.take_resize() {
            let geo = reinit_geometry(self.max_columns);
            debug!(columns = geo.columns, rows = geo.rows, "Resized");
            self.full_redraw = true;
            if self.loaded {
                self.rebuild();
            }
        }

        let content_changed = match self.source.poll_changed() {
            Ok(true) => self.rebuild(),
            Ok(false) => false,
            Err(e) => {
                debug!(error = %e, "Transcript not stat-able, retrying");
                return Tick::Continue(RETRY_IDLE);
            }
        };

        let mut scrolls: Vec<ScrollEvent> = Vec::new();
        for event in self.events.try_iter() {
            match event {
                InputEvent::Scroll(scroll) => scrolls.push(scroll),
                InputEvent::Quit => {
                    info!("Quit key pressed");
                    return Tick::Exit(ExitReason::Quit);
                }
            }
        }
        let scrolled = self.pager.apply_all(scrolls);

        if content_changed || scrolled || self.full_redraw {
            self.draw();
        }

        Tick::Continue(if scrolled { ACTIVE_IDLE } else { QUIET_IDLE })
    }

    /// Re-run parse, render and wrap at the current width.
    ///
    /// Returns whether new content was installed.
    fn rebuild(&mut self) -> bool {
        let columns = geometry().columns;
        match integration::load_rows(&self.source, &self.renderer, self.ctx_limit, columns) {
            Ok((transcript, rows)) => {
                self.usage = transcript.usage;
                self.pager.replace_content(rows);
                self.loaded = true;
                true
            }
            Err(e) => {
                warn!(error = %e, path = ?self.source.path(), "Content update failed");
                self.source.invalidate();
                false
            }
        }
    }

    fn draw(&mut self) {
        let started = Instant::now();
        let geo = geometry();
        let status = render_status(self.usage.as_ref(), self.ctx_limit, geo.columns);
        let frame = paint_frame(&self.pager.snapshot(), geo, &status, self.full_redraw);
        match self.screen.draw(&frame) {
            Ok(()) => {
                self.full_redraw = false;
                debug!(elapsed_us = started.elapsed().as_micros() as u64, "Frame drawn");
            }
            Err(e) => warn!(error = %e, "Draw failed"),
        }
    }
}

/// Show the placeholder and wait for the editor to go away.
fn wait_without_transcript<W: Write>(
    screen: &mut ScreenGuard<W>,
    config: &ResolvedConfig,
    editor: Option<ProcessWatch>,
    signals: &SignalFlags,
) -> io::Result<ExitReason> {
    let geo = geometry();
    let status = render_status(None, config.ctx_limit, geo.columns);
    screen.draw(&paint_placeholder(geo, &status))?;

    while let Some(editor) = editor {
        if signals.terminated() {
            return Ok(ExitReason::Terminated);
        }
        if !editor.is_alive() {
            break;
        }
        thread::sleep(PLACEHOLDER_WAIT);
    }
    Ok(ExitReason::NoTranscript)
}

/// Run the pager on the controlling terminal until it exits.
///
/// Logging must be initialized by the caller.
///
/// # Errors
///
/// Returns `AppError::Terminal` if signal handlers cannot be installed or
/// the screen cannot be written at startup. A terminal that cannot be opened
/// for input only disables scrolling.
pub fn run(
    config: &ResolvedConfig,
    transcript: Option<PathBuf>,
    editor_pid: Option<u32>,
) -> Result<ExitReason, AppError> {
    let signals = SignalFlags::register()?;
    let geo = reinit_geometry(config.max_columns);
    let editor = editor_pid.and_then(ProcessWatch::new);
    info!(
        transcript = ?transcript,
        editor = ?editor.map(|e| e.pid()),
        columns = geo.columns,
        rows = geo.rows,
        "Starting pager"
    );

    let mut screen = ScreenGuard::new(io::stdout())?;

    let source = match transcript.map(TranscriptSource::new) {
        Some(source) if source.exists() => source,
        other => {
            warn!(path = ?other.as_ref().map(TranscriptSource::path), "Transcript not found");
            return Ok(wait_without_transcript(&mut screen, config, editor, &signals)?);
        }
    };

    let (sender, receiver) = mpsc::channel();
    let mut app = PagerApp::new(screen, source, config, receiver, signals).with_editor(editor);
    let _reader = match InputReader::spawn(sender) {
        Ok(reader) => Some(reader),
        Err(e) => {
            warn!(error = %e, "Scrolling disabled");
            None
        }
    };

    let reason = app.run();
    info!(?reason, "Pager stopped");
    Ok(reason)
}

#[cfg(test)]
#[path = "view_tests.rs"]
mod tests;

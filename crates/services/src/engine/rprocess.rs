use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use lesson_core::model::Bitmap;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines};
use tokio::process::{Child, ChildStdin, ChildStdout, Command};
use tokio::sync::{Mutex, mpsc};

use super::{CanvasEvent, Engine, EngineMessage, EvalValue};
use crate::error::EngineError;

const FRAME_PREFIX: &str = "<<rzero:";
const FAULT_PREFIX: &str = "<<rzero-fault>>";

struct RProcess {
    // Held so the child is killed when the engine is dropped.
    _child: Child,
    stdin: ChildStdin,
    stdout: Lines<BufReader<ChildStdout>>,
}

/// Engine backed by a long-lived `R` subprocess.
///
/// Every evaluation is written to R's stdin followed by a unique frame line;
/// stdout is read up to that line. The canvas is R's `png()` device writing
/// to a temporary file that is decoded and emitted when the canvas closes.
pub struct RProcessEngine {
    binary: PathBuf,
    plot_path: PathBuf,
    process: Mutex<Option<RProcess>>,
    frame: AtomicU64,
    sender: mpsc::UnboundedSender<EngineMessage>,
    receiver: Mutex<mpsc::UnboundedReceiver<EngineMessage>>,
}

impl RProcessEngine {
    #[must_use]
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        let plot_path =
            std::env::temp_dir().join(format!("rzero-plot-{}.png", std::process::id()));
        let (sender, receiver) = mpsc::unbounded_channel();
        Self {
            binary: binary.into(),
            plot_path,
            process: Mutex::new(None),
            frame: AtomicU64::new(0),
            sender,
            receiver: Mutex::new(receiver),
        }
    }

    #[must_use]
    pub fn binary(&self) -> &Path {
        &self.binary
    }

    fn spawn_process(&self) -> Result<RProcess, EngineError> {
        let mut child = Command::new(&self.binary)
            .args(["--no-echo", "--no-save", "--no-restore", "--interactive"])
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|err| {
                EngineError::Init(format!("cannot launch {}: {err}", self.binary.display()))
            })?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| EngineError::Init("R stdin unavailable".into()))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| EngineError::Init("R stdout unavailable".into()))?;
        if let Some(stderr) = child.stderr.take() {
            let sender = self.sender.clone();
            tokio::spawn(async move {
                let mut lines = BufReader::new(stderr).lines();
                while let Ok(Some(line)) = lines.next_line().await {
                    if sender.send(EngineMessage::Stderr(line)).is_err() {
                        break;
                    }
                }
            });
        }

        Ok(RProcess {
            _child: child,
            stdin,
            stdout: BufReader::new(stdout).lines(),
        })
    }

    async fn run_framed(&self, code: &str) -> Result<String, EngineError> {
        let mut guard = self.process.lock().await;
        let process = guard.as_mut().ok_or(EngineError::NotReady)?;

        let frame = self.frame.fetch_add(1, Ordering::Relaxed);
        let marker = format!("{FRAME_PREFIX}{frame}>>");
        let script = frame_script(code, &marker);

        process.stdin.write_all(script.as_bytes()).await?;
        process.stdin.flush().await?;

        let mut frame = FrameCollector::new(&marker);
        loop {
            let Some(line) = process.stdout.next_line().await? else {
                guard.take();
                return Err(EngineError::Closed);
            };
            if frame.push(line) {
                break;
            }
        }
        frame.finish()
    }

    async fn emit_plot(&self) {
        let bytes = match tokio::fs::read(&self.plot_path).await {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return,
            Err(err) => {
                tracing::warn!(error = %err, "failed to read plot file");
                return;
            }
        };
        let _ = tokio::fs::remove_file(&self.plot_path).await;

        let image = match image::load_from_memory(&bytes) {
            Ok(image) => image.to_rgba8(),
            Err(err) => {
                tracing::warn!(error = %err, "failed to decode plot image");
                return;
            }
        };
        let (width, height) = image.dimensions();
        let Some(bitmap) = Bitmap::from_rgba(width, height, image.into_raw()) else {
            return;
        };
        let _ = self.sender.send(EngineMessage::Canvas(CanvasEvent::NewPage));
        let _ = self
            .sender
            .send(EngineMessage::Canvas(CanvasEvent::ImageReady(bitmap)));
    }
}

/// Gathers stdout lines for one evaluation until its frame marker shows up.
struct FrameCollector<'a> {
    marker: &'a str,
    lines: Vec<String>,
}

impl<'a> FrameCollector<'a> {
    fn new(marker: &'a str) -> Self {
        Self {
            marker,
            lines: Vec::new(),
        }
    }

    /// Returns true once `line` is this frame's marker.
    fn push(&mut self, line: String) -> bool {
        if line == self.marker {
            return true;
        }
        if line.starts_with(FRAME_PREFIX) {
            // Tail of an evaluation that timed out earlier.
            self.lines.clear();
        } else {
            self.lines.push(line);
        }
        false
    }

    fn finish(mut self) -> Result<String, EngineError> {
        if let Some(fault) = self
            .lines
            .iter()
            .find_map(|line| line.strip_prefix(FAULT_PREFIX))
        {
            return Err(EngineError::Evaluation(fault.trim().to_string()));
        }
        // The frame line is preceded by a newline, which leaves one empty line.
        if self.lines.last().is_some_and(String::is_empty) {
            self.lines.pop();
        }
        Ok(self.lines.join("\n"))
    }
}

/// Wrap `code` so engine-level errors print a fault line instead of reaching
/// R's top level, character results are printed, and the frame marker ends
/// the output.
fn frame_script(code: &str, marker: &str) -> String {
    format!(
        r#".rzero_value <- tryCatch({{
{code}
}}, error = function(e) structure(conditionMessage(e), class = "rzero_fault"))
if (inherits(.rzero_value, "rzero_fault")) {{
  cat("{FAULT_PREFIX}", unclass(.rzero_value), "\n", sep = "")
}} else if (is.character(.rzero_value)) {{
  cat(.rzero_value, sep = "\n")
}}
cat("\n{marker}\n")
"#
    )
}

fn r_string(value: &str) -> String {
    serde_json::Value::String(value.to_owned()).to_string()
}

#[async_trait]
impl Engine for RProcessEngine {
    async fn init(&self) -> Result<(), EngineError> {
        let process = self.spawn_process()?;
        *self.process.lock().await = Some(process);

        let banner = self
            .run_framed("R.version.string")
            .await
            .map_err(|err| EngineError::Init(err.to_string()))?;
        tracing::info!(version = %banner, binary = %self.binary.display(), "R engine started");
        Ok(())
    }

    async fn eval(&self, code: &str) -> Result<EvalValue, EngineError> {
        let text = self.run_framed(code).await?;
        Ok(EvalValue::text(text))
    }

    async fn open_canvas(&self, width: u32, height: u32) -> Result<(), EngineError> {
        let _ = tokio::fs::remove_file(&self.plot_path).await;
        let path = r_string(&self.plot_path.to_string_lossy());
        self.run_framed(&format!(
            "invisible(png(filename = {path}, width = {width}, height = {height}))"
        ))
        .await
        .map(|_| ())
    }

    async fn close_canvas(&self) -> Result<(), EngineError> {
        self.run_framed("if (dev.cur() > 1) invisible(dev.off())")
            .await?;
        self.emit_plot().await;
        Ok(())
    }

    async fn read(&self) -> Option<EngineMessage> {
        self.receiver.lock().await.recv().await
    }
}

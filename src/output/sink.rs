//! Output sink
//!
//! Decides where a message goes and writes it:
//! - stream mode writes to the wrapped writer (stdout in the binary) and
//!   flushes after every message
//! - file modes expand a path, materialize its parent directory, apply the
//!   node suffix and then append to or truncate the file
//!
//! Failures are per message. `on_message` reports them and returns, so the
//! next delivery gets a fresh attempt. A file that cannot be opened is never
//! replaced by stream output.

use std::ffi::OsString;
use std::fs::OpenOptions;
use std::io::{self, Stdout, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, error};

use crate::config::{OutputMode, TemplateConfig};
use crate::message::Message;
use crate::output::dirs::ensure_dir;
use crate::template::{Clock, FormatExpander, PassTime, SystemClock, expand_mask};
use crate::utils::{OutputError, Result};

pub struct OutputSink<W: Write> {
    cfg: TemplateConfig,
    clock: Box<dyn Clock + Send>,
    stream: W,
}

impl OutputSink<Stdout> {
    /// A sink writing stream output to stdout, timed by the system clock.
    pub fn stdout(cfg: TemplateConfig) -> Self {
        Self::new(cfg, Box::new(SystemClock), io::stdout())
    }
}

impl<W: Write> OutputSink<W> {
    pub fn new(cfg: TemplateConfig, clock: Box<dyn Clock + Send>, stream: W) -> Self {
        Self { cfg, clock, stream }
    }

    pub fn stream(&self) -> &W {
        &self.stream
    }

    /// Handles one delivery, reporting any failure instead of returning it.
    pub fn on_message(&mut self, msg: &Message<'_>) {
        if let Err(e) = self.handle(msg) {
            error!(topic = msg.topic, "Skipping message: {e}");
        }
    }

    /// Formats and writes one message.
    pub fn handle(&mut self, msg: &Message<'_>) -> Result<()> {
        if msg.retain && self.cfg.skip_retained {
            debug!(topic = msg.topic, "Ignoring retained message");
            return Ok(());
        }

        let mut time = PassTime::new(self.clock.as_ref());
        let mut buf = Vec::new();

        match &self.cfg.mode {
            OutputMode::Stream { format: Some(template) } => {
                FormatExpander::new(template, self.cfg.eol).expand(msg, &mut time, &mut buf)?;
                emit(&mut self.stream, &buf)
            }
            OutputMode::Stream { format: None } => {
                write_plain(&self.cfg, msg, &mut buf)?;
                emit(&mut self.stream, &buf)
            }
            OutputMode::MaskFile { mask } => {
                let path = expand_mask(mask, msg, &self.cfg, &mut time)?;
                if self.cfg.verbose {
                    debug!(mask = %mask, path = %path, "Resolved output path");
                }
                self.write_file(PathBuf::from(path), msg)
            }
            OutputMode::FormatFile { template } => {
                FormatExpander::new(template, self.cfg.eol).expand(msg, &mut time, &mut buf)?;
                let path = path_from_format_output(buf);
                if self.cfg.verbose {
                    debug!(template = %template, path = %path.display(), "Resolved output path");
                }
                self.write_file(path, msg)
            }
        }
    }

    fn write_file(&self, path: PathBuf, msg: &Message<'_>) -> Result<()> {
        if let Some(parent) = path.parent() {
            ensure_dir(parent)?;
        }

        let path = match &self.cfg.node_suffix {
            Some(suffix) => with_node_suffix(&path, suffix),
            None => path,
        };

        let mut options = OpenOptions::new();
        if self.cfg.overwrite {
            options.write(true).create(true).truncate(true);
        } else {
            options.append(true).create(true);
        }
        let mut file = options
            .open(&path)
            .map_err(|source| OutputError::FileOpenFailed {
                path: path.clone(),
                source,
            })?;

        let mut body = Vec::new();
        write_plain(&self.cfg, msg, &mut body)?;
        file.write_all(&body)?;
        Ok(())
    }
}

fn emit<W: Write>(stream: &mut W, bytes: &[u8]) -> Result<()> {
    stream.write_all(bytes)?;
    stream.flush()?;
    Ok(())
}

/// Renders a message without a format template.
///
/// Non-verbose output is the payload alone; verbose output prefixes the
/// topic. An empty payload prints nothing, or `<topic> (null)` when verbose
/// with end-of-line enabled.
pub fn write_plain<W: Write + ?Sized>(cfg: &TemplateConfig, msg: &Message<'_>, out: &mut W) -> io::Result<()> {
    if msg.payload.is_empty() {
        if cfg.verbose && cfg.eol {
            writeln!(out, "{} (null)", msg.topic)?;
        }
        return Ok(());
    }

    if cfg.verbose {
        write!(out, "{} ", msg.topic)?;
    }
    out.write_all(msg.payload)?;
    if cfg.eol {
        out.write_all(b"\n")?;
    }
    Ok(())
}

/// Appends `.suffix` to the last path segment.
pub fn with_node_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".");
    name.push(suffix);
    path.with_file_name(name)
}

/// Turns rendered format output into an absolute path: a leading `/` is
/// added when missing, trailing newlines and separators are trimmed.
pub fn path_from_format_output(mut rendered: Vec<u8>) -> PathBuf {
    while matches!(rendered.last(), Some(&(b'\n' | b'/'))) {
        rendered.pop();
    }

    let mut bytes = Vec::with_capacity(rendered.len() + 1);
    if rendered.first() != Some(&b'/') {
        bytes.push(b'/');
    }
    bytes.extend_from_slice(&rendered);
    path_from_bytes(bytes)
}

#[cfg(unix)]
fn path_from_bytes(bytes: Vec<u8>) -> PathBuf {
    use std::os::unix::ffi::OsStringExt;
    PathBuf::from(OsString::from_vec(bytes))
}

#[cfg(not(unix))]
fn path_from_bytes(bytes: Vec<u8>) -> PathBuf {
    PathBuf::from(OsString::from(String::from_utf8_lossy(&bytes).into_owned()))
}

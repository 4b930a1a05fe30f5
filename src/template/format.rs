//! The `%` / `@` / `\` output format language.
//!
//! The template is scanned once, left to right, with a single character of
//! lookahead:
//!
//! - `%x` directives describe the message: `%t` topic, `%p` payload, `%l`
//!   payload length, `%m` message id, `%q` QoS, `%r` retain flag, `%x`/`%X`
//!   hex payload, `%j`/`%J` JSON object, `%I` ISO-8601 time, `%U` epoch with
//!   nanoseconds, `%%` a literal percent.
//! - `@c` is a strftime directive (`@N` is nanoseconds, `@@` a literal `@`).
//! - `\c` is a control character escape.
//!
//! Unknown `%` and `\` directives are dropped, as is a directive character
//! with nothing after it.

use std::io::Write;

use crate::message::Message;
use crate::template::encoding;
use crate::template::time::PassTime;
use crate::utils::Result;

const ISO_8601: &str = "%FT%T%z";

#[derive(Debug, Clone, Copy)]
pub struct FormatExpander<'t> {
    template: &'t str,
    eol: bool,
}

impl<'t> FormatExpander<'t> {
    pub fn new(template: &'t str, eol: bool) -> Self {
        Self { template, eol }
    }

    /// Expands the template for `msg` into `out`.
    pub fn expand<W: Write + ?Sized>(
        &self,
        msg: &Message<'_>,
        time: &mut PassTime<'_>,
        out: &mut W,
    ) -> Result<()> {
        let mut chars = self.template.chars();

        while let Some(c) = chars.next() {
            match c {
                '%' => {
                    let Some(directive) = chars.next() else { break };
                    write_percent(directive, msg, time, out)?;
                }
                '@' => {
                    let Some(directive) = chars.next() else { break };
                    write_at(directive, time, out)?;
                }
                '\\' => {
                    let Some(escape) = chars.next() else { break };
                    if let Some(byte) = control_escape(escape) {
                        out.write_all(&[byte])?;
                    }
                }
                _ => {
                    let mut buf = [0u8; 4];
                    out.write_all(c.encode_utf8(&mut buf).as_bytes())?;
                }
            }
        }

        if self.eol {
            out.write_all(b"\n")?;
        }
        Ok(())
    }
}

fn write_percent<W: Write + ?Sized>(
    directive: char,
    msg: &Message<'_>,
    time: &mut PassTime<'_>,
    out: &mut W,
) -> Result<()> {
    match directive {
        '%' => out.write_all(b"%")?,
        't' => out.write_all(msg.topic.as_bytes())?,
        'p' => out.write_all(msg.payload)?,
        'l' => write!(out, "{}", msg.payload.len())?,
        'm' => write!(out, "{}", msg.mid)?,
        'q' => write!(out, "{}", msg.qos)?,
        'r' => out.write_all(if msg.retain { b"1" } else { b"0" })?,
        'x' => encoding::write_hex(msg.payload, false, out)?,
        'X' => encoding::write_hex(msg.payload, true, out)?,
        'j' => encoding::write_json(msg, time.get()?.epoch(), true, out)?,
        'J' => encoding::write_json(msg, time.get()?.epoch(), false, out)?,
        'I' => {
            if let Some(stamp) = time.get()?.strftime(ISO_8601) {
                out.write_all(stamp.as_bytes())?;
            }
        }
        'U' => {
            let t = time.get()?;
            write!(out, "{}.{:09}", t.epoch(), t.nanos())?;
        }
        _ => {}
    }
    Ok(())
}

fn write_at<W: Write + ?Sized>(directive: char, time: &mut PassTime<'_>, out: &mut W) -> Result<()> {
    if directive == '@' {
        out.write_all(b"@")?;
        return Ok(());
    }

    let t = time.get()?;
    if directive == 'N' {
        write!(out, "{:09}", t.nanos())?;
    } else if let Some(text) = t.strftime(&format!("%{directive}")) {
        out.write_all(text.as_bytes())?;
    }
    Ok(())
}

fn control_escape(c: char) -> Option<u8> {
    match c {
        '\\' => Some(b'\\'),
        '0' => Some(0),
        'a' => Some(0x07),
        'e' => Some(0x1b),
        'n' => Some(b'\n'),
        'r' => Some(b'\r'),
        't' => Some(b'\t'),
        'v' => Some(0x0b),
        _ => None,
    }
}

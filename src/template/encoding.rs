//! Payload encoders used by the `%x`, `%X`, `%j` and `%J` directives.

use std::io::{self, Write};

use crate::message::Message;

pub fn write_hex<W: Write + ?Sized>(payload: &[u8], upper: bool, out: &mut W) -> io::Result<()> {
    let encoded = if upper {
        hex::encode_upper(payload)
    } else {
        hex::encode(payload)
    };
    out.write_all(encoded.as_bytes())
}

/// Writes the payload as the body of a JSON string.
///
/// Quote and backslash get their short escapes, other bytes below 0x20
/// become `\u00XX`. Everything else, including non-ASCII bytes, is copied.
pub fn write_json_escaped<W: Write + ?Sized>(payload: &[u8], out: &mut W) -> io::Result<()> {
    let mut start = 0;
    for (i, &byte) in payload.iter().enumerate() {
        if byte != b'"' && byte != b'\\' && byte >= 0x20 {
            continue;
        }
        out.write_all(&payload[start..i])?;
        match byte {
            b'"' => out.write_all(b"\\\"")?,
            b'\\' => out.write_all(b"\\\\")?,
            _ => write!(out, "\\u{byte:04x}")?,
        }
        start = i + 1;
    }
    out.write_all(&payload[start..])
}

/// Writes the message as a JSON object.
///
/// With `escaped` the payload is a JSON string; otherwise the raw payload
/// bytes follow the `"payload":` key and the caller vouches that they are
/// valid JSON.
pub fn write_json<W: Write + ?Sized>(
    msg: &Message<'_>,
    epoch: i64,
    escaped: bool,
    out: &mut W,
) -> io::Result<()> {
    write!(out, "{{\"tst\":{epoch},\"topic\":")?;
    serde_json::to_writer(&mut *out, msg.topic).map_err(io::Error::from)?;
    write!(
        out,
        ",\"qos\":{},\"retain\":{},\"payloadlen\":{},",
        msg.qos,
        u8::from(msg.retain),
        msg.payload.len()
    )?;
    if msg.qos > 0 {
        write!(out, "\"mid\":{},", msg.mid)?;
    }
    if escaped {
        out.write_all(b"\"payload\":\"")?;
        write_json_escaped(msg.payload, out)?;
        out.write_all(b"\"}")
    } else {
        out.write_all(b"\"payload\":")?;
        out.write_all(msg.payload)?;
        out.write_all(b"}")
    }
}

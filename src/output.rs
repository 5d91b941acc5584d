//! JSON rendering of the flattened environment.
//!
//! Output is indented by four spaces and restricted to printable ASCII:
//! anything else inside a string is written as a `\uXXXX` escape, so the
//! document survives shells and CI log scrapers unchanged.

use serde::Serialize;
use serde_json::ser::{Formatter, PrettyFormatter, Serializer};
use std::io::{self, Write};

use crate::error::EnvSetupError;
use crate::transform::FlatEnv;

const INDENT: &[u8] = b"    ";

/// [`PrettyFormatter`] that escapes every character outside `' '..='~'`.
struct AsciiPrettyFormatter {
    inner: PrettyFormatter<'static>,
}

impl AsciiPrettyFormatter {
    fn new() -> Self {
        Self {
            inner: PrettyFormatter::with_indent(INDENT),
        }
    }
}

impl Formatter for AsciiPrettyFormatter {
    fn begin_array<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.begin_array(writer)
    }

    fn end_array<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.end_array(writer)
    }

    fn begin_array_value<W: ?Sized + Write>(
        &mut self,
        writer: &mut W,
        first: bool,
    ) -> io::Result<()> {
        self.inner.begin_array_value(writer, first)
    }

    fn end_array_value<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.end_array_value(writer)
    }

    fn begin_object<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.begin_object(writer)
    }

    fn end_object<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.end_object(writer)
    }

    fn begin_object_key<W: ?Sized + Write>(
        &mut self,
        writer: &mut W,
        first: bool,
    ) -> io::Result<()> {
        self.inner.begin_object_key(writer, first)
    }

    fn begin_object_value<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.begin_object_value(writer)
    }

    fn end_object_value<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.end_object_value(writer)
    }

    // Quotes, backslashes and C0 controls arrive via `write_char_escape`;
    // fragments hold everything else, including DEL and non-ASCII.
    fn write_string_fragment<W: ?Sized + Write>(
        &mut self,
        writer: &mut W,
        fragment: &str,
    ) -> io::Result<()> {
        let mut start = 0;
        for (i, ch) in fragment.char_indices() {
            if (' '..='~').contains(&ch) {
                continue;
            }
            writer.write_all(&fragment.as_bytes()[start..i])?;
            let mut units = [0u16; 2];
            for unit in ch.encode_utf16(&mut units) {
                write!(writer, "\\u{:04x}", unit)?;
            }
            start = i + ch.len_utf8();
        }
        writer.write_all(&fragment.as_bytes()[start..])
    }
}

/// Serializes `value` as four-space indented, ASCII-only JSON.
///
/// The result has no trailing newline.
pub fn to_json_pretty<T: Serialize + ?Sized>(value: &T) -> Result<String, EnvSetupError> {
    let mut buffer = Vec::new();
    let mut serializer = Serializer::with_formatter(&mut buffer, AsciiPrettyFormatter::new());
    value
        .serialize(&mut serializer)
        .map_err(EnvSetupError::Serialize)?;

    String::from_utf8(buffer).map_err(|e| EnvSetupError::Serialize(serde::ser::Error::custom(e)))
}

/// Writes `env` to `writer` as one JSON document followed by a newline.
///
/// The document is fully encoded before anything is written, so an
/// encoding failure leaves `writer` untouched.
pub fn write_env<W: Write>(writer: &mut W, env: &FlatEnv) -> Result<(), EnvSetupError> {
    let json = to_json_pretty(env)?;
    writeln!(writer, "{json}").map_err(EnvSetupError::Write)?;
    writer.flush().map_err(EnvSetupError::Write)
}

use std::io::{self, Write};

use oilprice_core::Envelope;
use serde_json::Value;

use crate::error::CliError;

pub fn render(envelope: &Envelope<Value>, pretty: bool) -> Result<(), CliError> {
    let stdout = io::stdout();
    render_to(&mut stdout.lock(), envelope, pretty)
}

/// Writes one JSON document followed by a newline.
pub fn render_to<W: Write>(
    writer: &mut W,
    envelope: &Envelope<Value>,
    pretty: bool,
) -> Result<(), CliError> {
    let payload = if pretty {
        serde_json::to_string_pretty(envelope)?
    } else {
        serde_json::to_string(envelope)?
    };
    writeln!(writer, "{payload}")?;
    writer.flush()?;
    Ok(())
}

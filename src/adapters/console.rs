//! Line console: the config surface over a text stream.
//!
//! On the board the stream is the UART console (`stdin`/`stdout` through
//! ESP-IDF's VFS).  Each line is handed to the controller as one config
//! write; a line reading `read` dumps the status text instead.
//!
//! ```text
//! > co2time 7
//! ok co2time 7
//! > read
//! Mode: co2
//! ...
//! ```

use std::io::{self, BufRead, Write};

use log::{debug, info};

use crate::app::service::Controller;
use crate::app::variant::Variant;

/// Line that requests the status text.
pub const READ_COMMAND: &str = "read";

/// Chunk size used when copying the status text out.
const READ_CHUNK: usize = 64;

/// Serve lines from `input` until it ends.
pub fn run<V: Variant>(
    controller: &Controller<V>,
    input: impl BufRead,
    mut out: impl Write,
) -> io::Result<()> {
    info!("console: ready ({} | <name> <value>)", READ_COMMAND);
    for line in input.lines() {
        handle_line(controller, &line?, &mut out)?;
    }
    debug!("console: input closed");
    Ok(())
}

/// Handle one console line.  Blank lines are skipped.
pub fn handle_line<V: Variant>(
    controller: &Controller<V>,
    line: &str,
    out: &mut impl Write,
) -> io::Result<()> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(());
    }

    if line == READ_COMMAND {
        let reader = controller.open_status();
        let mut buf = [0u8; READ_CHUNK];
        let mut offset = 0;
        loop {
            let n = reader.read(offset, &mut buf);
            if n == 0 {
                break;
            }
            out.write_all(&buf[..n])?;
            offset += n;
        }
    } else {
        match controller.apply_command(line.as_bytes()) {
            Some((which, value)) => writeln!(out, "ok {} {}", which.name(), value)?,
            None => {
                debug!("console: ignored {:?}", line);
                writeln!(out, "ignored")?;
            }
        }
    }
    out.flush()
}

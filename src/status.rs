//! Status/config text surface.
//!
//! Reads render a line-oriented snapshot into a fixed-capacity string.
//! Writes carry one `<name> <integer>` command; anything that does not
//! parse into a known, in-domain tunable is dropped without an error, so
//! a caller can never wedge the controller with bad input.

use core::fmt;

use log::debug;

use crate::config::Tunable;

/// Capacity of the rendered status text.
pub const STATUS_CAP: usize = 512;

/// Longest accepted command, in bytes.
pub const MAX_COMMAND_LEN: usize = 31;

/// Fixed-capacity status text.
pub type StatusText = heapless::String<STATUS_CAP>;

/// Parse one config write.
///
/// Accepts `"<name> <value>"` for every name in `allowed`, and a bare
/// `"<value>"` for `bare` if given.  Surrounding whitespace and trailing
/// NULs are ignored.  Returns `None` for anything else, including values
/// outside the tunable's domain.
pub fn parse_command(
    input: &[u8],
    allowed: &[Tunable],
    bare: Option<Tunable>,
) -> Option<(Tunable, u32)> {
    if input.len() > MAX_COMMAND_LEN {
        debug!("command too long ({} bytes)", input.len());
        return None;
    }
    let text = core::str::from_utf8(input).ok()?;
    let text = text.trim_matches(|c: char| c.is_whitespace() || c == '\0');

    let mut words = text.split_whitespace();
    let (which, value) = match (words.next(), words.next(), words.next()) {
        (Some(name), Some(value), None) => (Tunable::from_name(name)?, value),
        (Some(value), None, None) => (bare?, value),
        _ => return None,
    };

    if !allowed.contains(&which) {
        return None;
    }
    let value: u32 = value.parse().ok()?;
    which.accepts(value).then_some((which, value))
}

/// Copy `text[offset..]` into `buf`.  Returns the number of bytes copied;
/// 0 once `offset` reaches the end.
pub fn read_at(text: &str, offset: usize, buf: &mut [u8]) -> usize {
    let bytes = text.as_bytes();
    if offset >= bytes.len() {
        return 0;
    }
    let n = buf.len().min(bytes.len() - offset);
    buf[..n].copy_from_slice(&bytes[offset..offset + n]);
    n
}

/// One read session over a single rendered snapshot.
///
/// Every offset is served from the same text, so a caller that needs
/// several reads never sees two controller states spliced together.
/// Open a fresh reader to observe newer state.
#[derive(Debug, Clone)]
pub struct StatusReader {
    text: StatusText,
}

impl StatusReader {
    pub fn new(text: StatusText) -> Self {
        Self { text }
    }

    /// Copy the text from `offset` on into `buf`.  Returns 0 at end of text.
    pub fn read(&self, offset: usize, buf: &mut [u8]) -> usize {
        read_at(&self.text, offset, buf)
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }
}

pub(crate) fn on_off(level: bool) -> &'static str {
    if level { "on" } else { "off" }
}

pub(crate) fn yes_no(flag: bool) -> &'static str {
    if flag { "yes" } else { "no" }
}

/// Render with `f` into a fresh [`StatusText`].  Output that does not fit
/// is cut at the last complete line.
pub fn render(f: impl FnOnce(&mut StatusText) -> fmt::Result) -> StatusText {
    let mut out = StatusText::new();
    if f(&mut out).is_err() {
        let keep = out.rfind('\n').map_or(0, |i| i + 1);
        out.truncate(keep);
    }
    out
}

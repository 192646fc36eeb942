pub mod handle;
pub mod validate;

use anyhow::{Context as _, Result};
use lifecycle::Event;
use std::fs;
use std::io::{self, Read};

/// Read an event from a file, or from stdin when `source` is `-`.
pub fn read_event(source: &str) -> Result<Event> {
    let payload = if source == "-" {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .context("Could not read event from stdin")?;
        buf
    } else {
        fs::read_to_string(source).with_context(|| format!("Could not read {source}"))?
    };
    parse_event(&payload)
}

fn parse_event(payload: &str) -> Result<Event> {
    Event::from_json(payload).context("Could not parse event")
}

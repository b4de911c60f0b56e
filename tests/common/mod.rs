//! Shared fixture builders for synthetic RIFF byte streams.

use std::cell::RefCell;
use std::rc::Rc;

use riffpull::DiagSink;

/// Build a chunk: id, little-endian size, data, pad byte if odd.
pub fn chunk(id: &[u8; 4], data: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(id);
    out.extend_from_slice(&(data.len() as u32).to_le_bytes());
    out.extend_from_slice(data);
    if data.len() % 2 == 1 {
        out.push(0); // pad byte
    }
    out
}

/// Build a list chunk (`LIST`, `RIFF`, ...) from already-built children.
pub fn list(id: &[u8; 4], form: &[u8; 4], children: &[Vec<u8>]) -> Vec<u8> {
    let mut payload = form.to_vec();
    for child in children {
        payload.extend_from_slice(child);
    }
    let mut out = Vec::new();
    out.extend_from_slice(id);
    out.extend_from_slice(&(payload.len() as u32).to_le_bytes());
    out.extend_from_slice(&payload);
    out
}

/// Build a whole RIFF file from already-built top-level chunks.
pub fn riff_file(form: &[u8; 4], children: &[Vec<u8>]) -> Vec<u8> {
    list(b"RIFF", form, children)
}

/// Build a RIFF file around a raw payload (form included), for fixtures
/// that need stray bytes or deliberate corruption.
pub fn riff_raw(payload: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(b"RIFF");
    out.extend_from_slice(&(payload.len() as u32).to_le_bytes());
    out.extend_from_slice(payload);
    out
}

/// Diagnostic log shared between a test and the sink it hands out.
#[derive(Clone, Default)]
pub struct SharedLog(pub Rc<RefCell<Vec<(u64, String)>>>);

impl SharedLog {
    pub fn sink(&self) -> Box<CollectSink> {
        Box::new(CollectSink(self.clone()))
    }

    pub fn entries(&self) -> Vec<(u64, String)> {
        self.0.borrow().clone()
    }
}

/// Sink that collects diagnostics into a [`SharedLog`].
pub struct CollectSink(SharedLog);

impl DiagSink for CollectSink {
    fn report(&mut self, pos: u64, msg: &str) {
        self.0 .0.borrow_mut().push((pos, msg.to_string()));
    }
}

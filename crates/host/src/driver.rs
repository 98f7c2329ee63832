//! Synchronous driver: feeds inbound commands and frame ticks to the
//! [`Session`], applies persistence effects, and encodes everything else as
//! outbound JSON lines.

use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use tracing::{debug, warn};

use crate::core::{Effect, MemoryPrefs, PrefStore, Session, SessionEvent, SessionSnapshot};
use crate::persist::JsonPrefs;
use crate::protocol::{
    create_effect, create_error, create_snapshot, extract_seq_best_effort, parse_message,
    ErrorCode, HostCommand, WireEffect,
};

/// A pref store whose writes can be committed to durable storage.
pub trait PrefSink: PrefStore {
    fn commit(&mut self) -> Result<()>;
}

impl PrefSink for JsonPrefs {
    fn commit(&mut self) -> Result<()> {
        self.flush()
    }
}

impl PrefSink for MemoryPrefs {
    fn commit(&mut self) -> Result<()> {
        Ok(())
    }
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

pub struct Driver<P> {
    session: Session,
    prefs: P,
    seq: u64,
    effects: Vec<Effect>,
    snapshot: SessionSnapshot,
    quit: bool,
}

impl<P: PrefSink> Driver<P> {
    pub fn new(session: Session, prefs: P) -> Self {
        Self {
            session,
            prefs,
            seq: 0,
            effects: Vec::with_capacity(32),
            snapshot: SessionSnapshot::default(),
            quit: false,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn prefs(&self) -> &P {
        &self.prefs
    }

    pub fn is_quit(&self) -> bool {
        self.quit
    }

    fn next_seq(&mut self) -> u64 {
        self.seq += 1;
        self.seq
    }

    /// Handle one raw inbound line. Malformed lines produce an error message.
    pub fn handle_line(&mut self, line: &str, out: &mut Vec<String>) -> Result<()> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(());
        }
        match parse_message(line) {
            Ok(msg) => self.handle_command(msg.body.into(), out),
            Err(e) => {
                let seq = extract_seq_best_effort(line).unwrap_or(0);
                warn!(seq, error = %e, "rejected inbound message");
                let err = create_error(seq, now_ms(), ErrorCode::InvalidMessage, &e.to_string());
                out.push(serde_json::to_string(&err).context("encoding error message")?);
                Ok(())
            }
        }
    }

    pub fn handle_command(&mut self, command: HostCommand, out: &mut Vec<String>) -> Result<()> {
        match command {
            HostCommand::Event(event) => self.dispatch(event, out),
            HostCommand::Snapshot => {
                self.session.snapshot_into(&mut self.snapshot);
                let seq = self.next_seq();
                let msg = create_snapshot(seq, now_ms(), &self.snapshot);
                out.push(serde_json::to_string(&msg).context("encoding snapshot")?);
                Ok(())
            }
            HostCommand::Quit => {
                debug!("quit requested");
                self.quit = true;
                Ok(())
            }
        }
    }

    /// Advance the session clock by one frame.
    pub fn tick(&mut self, elapsed_ms: u32, out: &mut Vec<String>) -> Result<()> {
        self.dispatch(SessionEvent::Tick { elapsed_ms }, out)
    }

    fn dispatch(&mut self, event: SessionEvent, out: &mut Vec<String>) -> Result<()> {
        let mut effects = std::mem::take(&mut self.effects);
        effects.clear();
        self.session.handle_into(event, &mut effects);

        let mut persisted = false;
        let ts = now_ms();
        let mut result = Ok(());
        for effect in &effects {
            if let Effect::Persist(write) = effect {
                write.apply(&mut self.prefs);
                persisted = true;
                continue;
            }
            if let Some(wire) = WireEffect::from_effect(effect) {
                let seq = self.next_seq();
                match serde_json::to_string(&create_effect(seq, ts, wire)) {
                    Ok(line) => out.push(line),
                    Err(e) => {
                        result = Err(e).context("encoding effect");
                        break;
                    }
                }
            }
        }
        self.effects = effects;

        if persisted {
            // A failed save costs progress, not the running game.
            if let Err(e) = self.prefs.commit() {
                warn!(error = %e, "failed to save prefs");
            }
        }
        result
    }
}

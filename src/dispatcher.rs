use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, RwLock};
use std::thread;

use regex::Regex;

use crate::bundle::Bundle;
use crate::errors::OscError;
use crate::message::Message;
use crate::packet::Packet;

/// Characters reserved for pattern syntax. A registration address may not
/// contain any of them; the lone `"*"` default registration is the one
/// exception.
const RESERVED_CHARS: &str = "*?,[]{}# ";

/// Translate an OSC address pattern into an anchored regular expression.
///
/// The substitutions run in this exact order: `.` `(` `)` are escaped first
/// so the dots introduced by `*` survive, then brace alternations become
/// regex groups and `?` becomes a single-character wildcard. The result is
/// anchored so the pattern must cover the whole address, not a substring.
pub(crate) fn pattern_to_regex(pattern: &str) -> Result<Regex, OscError> {
    let translated = pattern
        .replace('.', r"\.")
        .replace('(', r"\(")
        .replace(')', r"\)")
        .replace('*', ".*")
        .replace('{', "(")
        .replace(',', "|")
        .replace('}', ")")
        .replace('?', ".");
    Regex::new(&format!("^{translated}$")).map_err(|source| OscError::Pattern {
        pattern: pattern.to_string(),
        source,
    })
}

/// Receives every message whose registered pattern matched, together with
/// the sender's address when the transport knows it.
pub trait Handler: Send + Sync {
    fn handle(&self, msg: &Message, sender: Option<SocketAddr>);
}

impl<F> Handler for F
where
    F: Fn(&Message, Option<SocketAddr>) + Send + Sync,
{
    fn handle(&self, msg: &Message, sender: Option<SocketAddr>) {
        self(msg, sender)
    }
}

#[derive(Default)]
struct Registry {
    handlers: HashMap<String, Box<dyn Handler>>,
    default_handler: Option<Box<dyn Handler>>,
}

/// Routes decoded packets to registered handlers.
///
/// Cloning yields another handle onto the same registration table, so a
/// receive loop and a registering thread can share one dispatcher.
/// Registration takes the table's write lock, dispatch its read lock.
#[derive(Clone, Default)]
pub struct StandardDispatcher {
    registry: Arc<RwLock<Registry>>,
}

impl StandardDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` for a literal address, or for `"*"` to install
    /// the default handler that fires after every specific match.
    ///
    /// Fails if the address contains pattern metacharacters or is already
    /// registered; the table is untouched on failure.
    pub fn add_handler<H>(&self, addr: &str, handler: H) -> Result<(), OscError>
    where
        H: Handler + 'static,
    {
        let mut registry = self.registry.write().unwrap();
        if addr == "*" {
            registry.default_handler = Some(Box::new(handler));
            return Ok(());
        }
        if addr.chars().any(|c| RESERVED_CHARS.contains(c)) {
            return Err(OscError::InvalidAddressCharacter(addr.to_string()));
        }
        if registry.handlers.contains_key(addr) {
            return Err(OscError::AddressExists(addr.to_string()));
        }
        registry.handlers.insert(addr.to_string(), Box::new(handler));
        Ok(())
    }

    /// Route one decoded packet.
    ///
    /// A message is delivered synchronously: every handler whose pattern
    /// matches the message's address fires (invocation order across
    /// patterns is unspecified), then the default handler if one is
    /// installed. A bundle blocks the caller until its time tag is due and
    /// the whole delivery subtree has run. The first pattern that fails to
    /// compile, anywhere in the subtree, aborts the call with that error.
    pub fn dispatch(&self, packet: &Packet, sender: Option<SocketAddr>) -> Result<(), OscError> {
        match packet {
            Packet::Message(msg) => self.deliver_message(msg, sender),
            Packet::Bundle(bundle) => self.dispatch_bundle(bundle, sender),
        }
    }

    fn deliver_message(&self, msg: &Message, sender: Option<SocketAddr>) -> Result<(), OscError> {
        let registry = self.registry.read().unwrap();
        for (pattern, handler) in &registry.handlers {
            if pattern_to_regex(pattern)?.is_match(&msg.address) {
                handler.handle(msg, sender);
            }
        }
        if let Some(default) = &registry.default_handler {
            default.handle(msg, sender);
        }
        Ok(())
    }

    fn dispatch_bundle(&self, bundle: &Bundle, sender: Option<SocketAddr>) -> Result<(), OscError> {
        let remaining = bundle.timetag.expires_in();
        let dispatcher = self.clone();
        let bundle = bundle.clone();
        let (tx, rx) = crossbeam_channel::bounded(1);
        // Deferred delivery: a timer thread sleeps out the time tag, then
        // walks the subtree. The caller stays blocked on the result channel
        // until the whole subtree has been delivered or has failed; once
        // scheduled, a delivery cannot be cancelled.
        thread::spawn(move || {
            thread::sleep(remaining);
            let _ = tx.send(dispatcher.deliver_bundle(&bundle, sender));
        });
        rx.recv().unwrap()
    }

    /// Deliver direct child messages first, then recurse into child bundles
    /// in stored order, each after its own time tag elapses. Runs on the
    /// timer thread; the first error stops the walk.
    fn deliver_bundle(&self, bundle: &Bundle, sender: Option<SocketAddr>) -> Result<(), OscError> {
        for msg in &bundle.messages {
            self.deliver_message(msg, sender)?;
        }
        for child in &bundle.bundles {
            thread::sleep(child.timetag.expires_in());
            self.deliver_bundle(child, sender)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Registration validation rejects pattern syntax, so an uncompilable
    // registered pattern can only be produced by seeding the table directly.
    #[test]
    fn uncompilable_registered_pattern_aborts_dispatch() {
        let dispatcher = StandardDispatcher::new();
        dispatcher.registry.write().unwrap().handlers.insert(
            "}/ ".to_string(),
            Box::new(|_: &Message, _: Option<SocketAddr>| {}),
        );

        let packet = Packet::Message(Message::new("/message"));
        let err = dispatcher.dispatch(&packet, None).unwrap_err();
        assert!(matches!(err, OscError::Pattern { .. }));
    }

    #[test]
    fn pattern_translation_is_anchored() {
        let re = pattern_to_regex("/message").unwrap();
        assert!(re.is_match("/message"));
        assert!(!re.is_match("/message/01"));
        assert!(!re.is_match("prefix/message"));
    }
}

use crate::ValidatedCall;
use crosscall_params::{CallReturn, CallSignature, ResultCode};
use log::debug;

// Handler logic for one kind of call. It can read and write the call's parameters,
// fill the extended values of the return structure, and report a failure with a
// code of its choosing which is sent back as-is.
pub type CallHandler =
    dyn Fn(&mut ValidatedCall, &mut CallReturn) -> Result<(), ResultCode> + Send + Sync;

struct DispatchEntry {
    signature: CallSignature,
    handler: Box<CallHandler>,
}

// Table of handlers, filled before the broker starts serving calls and only read
// afterwards.
#[derive(Default)]
pub struct Dispatcher {
    entries: Vec<DispatchEntry>,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self { entries: vec![] }
    }

    // If two handlers are registered for the same signature, the first one always
    // wins and the second one is never called.
    pub fn register(&mut self, signature: CallSignature, handler: Box<CallHandler>) -> &mut Self {
        if self.entries.iter().any(|e| e.signature == signature) {
            debug!(
                "Handler registered for call tag {} shadowed by a previous one",
                signature.tag
            );
        }
        self.entries.push(DispatchEntry { signature, handler });
        self
    }

    pub fn find_handler(&self, signature: &CallSignature) -> Option<&CallHandler> {
        self.entries
            .iter()
            .find(|e| e.signature == *signature)
            .map(|e| e.handler.as_ref())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl core::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_list()
            .entries(self.entries.iter().map(|e| &e.signature))
            .finish()
    }
}

use crate::outcome::{set_call_error, set_call_success};
use crate::untrusted::UntrustedBuffer;
use crate::{ChannelConfig, Dispatcher};
use crosscall_params::{CallReturn, ResultCode};
use log::{debug, warn};

// What the transport has to send back once a call has been served
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServedCall {
    pub call_return: CallReturn,
    // Contents to write back into the channel buffer, for successful in/out calls
    pub copy_back: Option<Box<[u8]>>,
}

// Validates calls, routes them to their handler and encodes their outcome. Holds no
// mutable state, so calls received on different channels can be served concurrently.
#[derive(Debug)]
pub struct CallServer {
    config: ChannelConfig,
    dispatcher: Dispatcher,
}

impl CallServer {
    pub fn new(config: ChannelConfig, dispatcher: Dispatcher) -> Self {
        Self { config, dispatcher }
    }

    pub fn config(&self) -> &ChannelConfig {
        &self.config
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    pub fn invoke<S: UntrustedBuffer + ?Sized>(&self, buffer: &S, raw_size: usize) -> ServedCall {
        let mut call = match self.config.validate(buffer, raw_size) {
            Ok(call) => call,
            Err(_) => {
                // Already logged, the caller is not told why
                let mut call_return = CallReturn::new(0);
                set_call_error(ResultCode::MALFORMED_CALL, &mut call_return);
                return ServedCall {
                    call_return,
                    copy_back: None,
                };
            }
        };
        let mut call_return = CallReturn::new(call.tag());
        let signature = call.signature();
        let handler = match self.dispatcher.find_handler(&signature) {
            Some(handler) => handler,
            None => {
                warn!("No handler registered for call {:?}", signature);
                set_call_error(ResultCode::UNRECOGNIZED_CALL, &mut call_return);
                return ServedCall {
                    call_return,
                    copy_back: None,
                };
            }
        };
        debug!("Dispatching call {:?}", signature);
        match handler(&mut call, &mut call_return) {
            Ok(()) => {
                set_call_success(&mut call_return);
                let copy_back = if call.is_in_out() {
                    Some(call.into_bytes())
                } else {
                    None
                };
                ServedCall {
                    call_return,
                    copy_back,
                }
            }
            Err(code) => {
                debug!("Handler for call tag {} failed with {:?}", signature.tag, code);
                set_call_error(code, &mut call_return);
                ServedCall {
                    call_return,
                    copy_back: None,
                }
            }
        }
    }
}

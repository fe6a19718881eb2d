// Common modules

mod config;
mod dispatcher;
mod error;
mod outcome;
mod parameters;
mod server;
mod untrusted;
mod validated_call;

pub use config::ChannelConfig;
pub use dispatcher::{CallHandler, Dispatcher};
pub use error::{AccessViolation, BrokerError, CallRejection, ParameterError};
pub use outcome::{set_call_error, set_call_success};
pub use server::{CallServer, ServedCall};
pub use untrusted::{SharedMemoryView, UntrustedBuffer};
pub use validated_call::{validate, RawParameter, ValidatedCall};

// OS-specific modules

#[cfg_attr(target_os = "linux", path = "linux/mod.rs")]
#[cfg_attr(not(target_os = "linux"), path = "generic/mod.rs")]
mod os;

pub use os::fault_guard_available;

// Re-exported types from sub-crates
pub use crosscall_params::{
    ArgType, CallBuilder, CallReturn, CallSignature, ResultCode, IPC_CHANNEL_SIZE, MAX_PARAMS,
};

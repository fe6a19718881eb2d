// Common modules

mod arg_type;
mod builder;
mod call_return;
mod error;
mod layout;
mod signature;

pub use arg_type::ArgType;
pub use builder::CallBuilder;
pub use call_return::{CallReturn, ResultCode, EXTENDED_RETURN_COUNT};
pub use error::ParamsError;
pub use layout::{
    declared_size_offset, min_call_size, param_info_offset, read_u32, write_u32, ParamInfo,
    CALL_HEADER_SIZE, IS_IN_OUT_OFFSET, MIN_CALL_SIZE, PARAM_COUNT_OFFSET, PARAM_INFO_SIZE,
    TAG_OFFSET,
};
pub use signature::CallSignature;

// Capacity of the shared channel buffer a call is marshaled into. Both sides
// need to agree on it: the client refuses to build bigger calls, the broker
// refuses to validate them.
pub const IPC_CHANNEL_SIZE: usize = 1024;

// Maximum number of parameters in a single call
pub const MAX_PARAMS: usize = 9;

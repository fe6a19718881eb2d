use crosscall_params::{CallReturn, ResultCode};

// Both can be called multiple times, the last call wins. Sending the structure back
// exactly once is up to the transport.

pub fn set_call_error(error: ResultCode, call_return: &mut CallReturn) {
    call_return.call_outcome = error;
    call_return.extended_count = 0;
}

// Leaves extended values as the handler set them
pub fn set_call_success(call_return: &mut CallReturn) {
    call_return.call_outcome = ResultCode::ALL_OK;
}

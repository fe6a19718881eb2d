use common::{common_test_setup, craft_ulong_call, TEST_TAG};
use crosscall_broker::{
    set_call_error, set_call_success, validate, ArgType, CallBuilder, CallReturn, CallServer,
    CallSignature, ChannelConfig, Dispatcher, ResultCode, ValidatedCall,
};

const ECHO_TAG: u32 = 10;
const FAIL_TAG: u32 = 11;
const INOUT_TAG: u32 = 12;
const HANDLER_SPECIFIC_FAILURE: ResultCode = ResultCode(0xC000_0022);

fn test_server() -> CallServer {
    let mut dispatcher = Dispatcher::new();
    dispatcher
        .register(
            CallSignature::new(ECHO_TAG, &[ArgType::ULong, ArgType::VoidPtr]).unwrap(),
            Box::new(|call: &mut ValidatedCall, ret: &mut CallReturn| -> Result<(), ResultCode> {
                let value = call.get_u32(0).map_err(|_| ResultCode::MALFORMED_CALL)?;
                let pointer = call.get_pointer(1).map_err(|_| ResultCode::MALFORMED_CALL)?;
                ret.extended[0] = value as u64 + 1;
                ret.extended[1] = pointer as u64;
                ret.extended_count = 2;
                Ok(())
            }),
        )
        .register(
            CallSignature::new(FAIL_TAG, &[ArgType::ULong]).unwrap(),
            Box::new(|_call: &mut ValidatedCall, ret: &mut CallReturn| -> Result<(), ResultCode> {
                ret.extended_count = 3;
                Err(HANDLER_SPECIFIC_FAILURE)
            }),
        )
        .register(
            CallSignature::new(INOUT_TAG, &[ArgType::InOutPtr]).unwrap(),
            Box::new(|call: &mut ValidatedCall, _ret: &mut CallReturn| -> Result<(), ResultCode> {
                let region = call
                    .get_inout_buffer(0, 4)
                    .map_err(|_| ResultCode::MALFORMED_CALL)?;
                region.reverse();
                Ok(())
            }),
        );
    CallServer::new(ChannelConfig::new(), dispatcher)
}

#[test]
fn handler_success_reported() {
    common_test_setup();
    let server = test_server();
    let buffer = CallBuilder::new(ECHO_TAG)
        .push_u32(41)
        .push_pointer(0x1000)
        .build()
        .unwrap();
    let served = server.invoke(buffer.as_slice(), buffer.len());
    assert_eq!(served.call_return.call_outcome, ResultCode::ALL_OK);
    assert_eq!(served.call_return.tag, ECHO_TAG);
    assert_eq!(served.call_return.extended_values(), &[42, 0x1000]);
    assert_eq!(served.copy_back, None);
}

#[test]
fn malformed_call_reported() {
    common_test_setup();
    let server = test_server();
    let mut buffer = craft_ulong_call(1);
    buffer[8..12].copy_from_slice(&0u32.to_ne_bytes());
    let served = server.invoke(buffer.as_slice(), buffer.len());
    assert_eq!(served.call_return.call_outcome, ResultCode::MALFORMED_CALL);
    assert_eq!(served.call_return.extended_count, 0);
    assert_eq!(served.copy_back, None);
}

#[test]
fn unrecognized_call_reported() {
    common_test_setup();
    let server = test_server();
    let buffer = CallBuilder::new(TEST_TAG).push_u32(1).build().unwrap();
    let served = server.invoke(buffer.as_slice(), buffer.len());
    assert_eq!(served.call_return.call_outcome, ResultCode::UNRECOGNIZED_CALL);
    assert_eq!(served.call_return.tag, TEST_TAG);
    assert_eq!(served.call_return.extended_count, 0);
}

#[test]
fn handler_failure_transported_as_is() {
    common_test_setup();
    let server = test_server();
    let buffer = CallBuilder::new(FAIL_TAG).push_u32(1).build().unwrap();
    let served = server.invoke(buffer.as_slice(), buffer.len());
    assert_eq!(served.call_return.call_outcome, HANDLER_SPECIFIC_FAILURE);
    assert_eq!(served.call_return.extended_count, 0);
    assert_eq!(served.copy_back, None);
}

#[test]
fn inout_call_copied_back() {
    common_test_setup();
    let server = test_server();
    let buffer = CallBuilder::new(INOUT_TAG)
        .push_inout_buffer(&[1, 2, 3, 4])
        .build()
        .unwrap();
    let served = server.invoke(buffer.as_slice(), buffer.len());
    assert_eq!(served.call_return.call_outcome, ResultCode::ALL_OK);
    let copy_back = served.copy_back.expect("in/out call not copied back");
    assert_eq!(copy_back.len(), buffer.len());
    let mut returned = validate(&copy_back[..], copy_back.len()).unwrap();
    assert_eq!(returned.get_inout_buffer(0, 4).unwrap(), &[4, 3, 2, 1]);
}

#[test]
fn concurrent_calls_served() {
    common_test_setup();
    let server = test_server();
    std::thread::scope(|scope| {
        for i in 0..8u32 {
            let server = &server;
            scope.spawn(move || {
                let buffer = CallBuilder::new(ECHO_TAG)
                    .push_u32(i)
                    .push_pointer(i as usize)
                    .build()
                    .unwrap();
                for _ in 0..100 {
                    let served = server.invoke(buffer.as_slice(), buffer.len());
                    assert_eq!(served.call_return.extended_values(), &[i as u64 + 1, i as u64]);
                }
            });
        }
    });
}

#[test]
fn outcome_writer_overwrites() {
    common_test_setup();
    let mut call_return = CallReturn::new(TEST_TAG);
    call_return.extended_count = 5;
    set_call_success(&mut call_return);
    assert_eq!(call_return.call_outcome, ResultCode::ALL_OK);
    assert_eq!(call_return.extended_count, 5);
    set_call_error(ResultCode(77), &mut call_return);
    assert_eq!(call_return.call_outcome, ResultCode(77));
    assert_eq!(call_return.extended_count, 0);
    set_call_error(ResultCode::UNRECOGNIZED_CALL, &mut call_return);
    set_call_error(ResultCode::UNRECOGNIZED_CALL, &mut call_return);
    assert_eq!(call_return.call_outcome, ResultCode::UNRECOGNIZED_CALL);
    set_call_success(&mut call_return);
    assert!(call_return.call_outcome.is_ok());
    assert_eq!(call_return.tag, TEST_TAG);
}

#[test]
fn call_return_byte_image() {
    common_test_setup();
    let mut call_return = CallReturn::new(3);
    call_return.extended_count = 1;
    call_return.extended[0] = 0x0102_0304_0506_0708;
    set_call_error(ResultCode::MALFORMED_CALL, &mut call_return);
    let bytes = call_return.to_bytes();
    assert_eq!(bytes.len(), core::mem::size_of::<CallReturn>());
    assert_eq!(&bytes[0..4], &3u32.to_ne_bytes());
    assert_eq!(&bytes[4..8], &1u32.to_ne_bytes());
    assert_eq!(&bytes[8..12], &0u32.to_ne_bytes());
    assert_eq!(&bytes[16..24], &0x0102_0304_0506_0708u64.to_ne_bytes());
}

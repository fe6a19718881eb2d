use crosscall_params::ArgType;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BrokerError {
    InvalidChannelCapacity { requested: usize, min: usize, max: usize },
}

// Reason why a call buffer was refused. Only ever logged on the broker side: the
// caller is just told its call was malformed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallRejection {
    NullBuffer,
    BufferTooSmall {
        raw_size: usize,
        min: usize,
    },
    BufferTooLarge {
        raw_size: usize,
        max: usize,
    },
    InvalidParamCount {
        param_count: u32,
    },
    ParamInfoTruncated {
        raw_size: usize,
        min_size: usize,
    },
    InvalidDeclaredSize {
        declared_size: usize,
        raw_size: usize,
        min_size: usize,
    },
    AccessViolation {
        offset: usize,
        len: usize,
    },
    ParamCountChanged {
        before: u32,
        after: u32,
    },
    MalformedParameter {
        index: usize,
        description: &'static str,
    },
}

// The memory backing an untrusted buffer could not be read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccessViolation {
    pub offset: usize,
    pub len: usize,
}

impl From<AccessViolation> for CallRejection {
    fn from(e: AccessViolation) -> Self {
        Self::AccessViolation {
            offset: e.offset,
            len: e.len,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParameterError {
    NotPresent {
        index: usize,
        param_count: usize,
    },
    TypeMismatch {
        index: usize,
        expected: ArgType,
        found: ArgType,
    },
    SizeMismatch {
        index: usize,
        expected: usize,
        found: usize,
    },
    InvalidWideStringSize {
        index: usize,
        size: usize,
    },
}

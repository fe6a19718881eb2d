use crate::{ArgType, ParamsError, MAX_PARAMS};

// Shape of a call, used to route it to a handler: its tag and the type of each of
// its parameters. Unused parameter slots are Invalid, so two signatures with a
// different arity never match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CallSignature {
    pub tag: u32,
    pub args: [ArgType; MAX_PARAMS],
}

impl CallSignature {
    pub fn new(tag: u32, arg_types: &[ArgType]) -> Result<Self, ParamsError> {
        if arg_types.len() > MAX_PARAMS {
            return Err(ParamsError::TooManyParameters { max: MAX_PARAMS });
        }
        let mut args = [ArgType::Invalid; MAX_PARAMS];
        for (index, (slot, &arg_type)) in args.iter_mut().zip(arg_types).enumerate() {
            if matches!(arg_type, ArgType::Invalid | ArgType::Last) {
                return Err(ParamsError::InvalidSignatureType { index });
            }
            *slot = arg_type;
        }
        Ok(Self { tag, args })
    }

    pub fn arity(&self) -> usize {
        self.args
            .iter()
            .take_while(|&&t| t != ArgType::Invalid)
            .count()
    }
}

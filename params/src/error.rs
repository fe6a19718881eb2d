#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamsError {
    NoParameters,
    TooManyParameters { max: usize },
    CallTooLarge { size: usize, max: usize },
    InvalidSignatureType { index: usize },
}

use crate::BrokerError;
use crosscall_params::{IPC_CHANNEL_SIZE, MIN_CALL_SIZE};

// Limits of the channel calls are received from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelConfig {
    pub(crate) max_buffer_size: usize,
}

impl ChannelConfig {
    pub fn new() -> Self {
        Self {
            max_buffer_size: IPC_CHANNEL_SIZE,
        }
    }

    // Offsets and sizes in a call are 32-bit, a bigger channel could not be
    // addressed entirely.
    pub fn with_max_buffer_size(mut self, max_buffer_size: usize) -> Result<Self, BrokerError> {
        let max = u32::MAX as usize;
        if !(MIN_CALL_SIZE..=max).contains(&max_buffer_size) {
            return Err(BrokerError::InvalidChannelCapacity {
                requested: max_buffer_size,
                min: MIN_CALL_SIZE,
                max,
            });
        }
        self.max_buffer_size = max_buffer_size;
        Ok(self)
    }

    pub fn max_buffer_size(&self) -> usize {
        self.max_buffer_size
    }
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self::new()
    }
}

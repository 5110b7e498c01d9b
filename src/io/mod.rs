// Purpose - external interfaces, format conversions

pub mod converter;
pub mod midi;

/// Per-channel output buffers, allocated up front by the host side.
#[derive(Debug, Default, Clone)]
pub struct AudioOutput {
    pub buffers: Vec<Vec<f32>>,
}

impl AudioOutput {
    pub fn new(channels: usize, frames: usize) -> Self {
        Self {
            buffers: vec![vec![0.0; frames]; channels],
        }
    }

    pub fn channels(&self) -> usize {
        self.buffers.len()
    }

    /// Frames every channel can hold.
    pub fn frames(&self) -> usize {
        self.buffers.iter().map(Vec::len).min().unwrap_or(0)
    }
}

/// One bit per output channel, set when that channel is all zeros for the
/// block. Channels past 64 are never flagged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SilenceFlags(pub u64);

impl SilenceFlags {
    pub const NONE: SilenceFlags = SilenceFlags(0);

    /// Every channel of a `channels`-wide bus is silent.
    pub fn all(channels: usize) -> Self {
        if channels >= 64 {
            SilenceFlags(u64::MAX)
        } else {
            SilenceFlags((1u64 << channels) - 1)
        }
    }

    pub fn bits(self) -> u64 {
        self.0
    }

    pub fn is_silent(self, channel: usize) -> bool {
        channel < 64 && self.0 & (1u64 << channel) != 0
    }

    /// True if every one of `channels` channels is flagged.
    pub fn is_all(self, channels: usize) -> bool {
        self == Self::all(channels)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_mask_per_channel_count() {
        assert_eq!(SilenceFlags::all(0).bits(), 0);
        assert_eq!(SilenceFlags::all(2).bits(), 0b11);
        assert_eq!(SilenceFlags::all(64).bits(), u64::MAX);
        assert_eq!(SilenceFlags::all(100).bits(), u64::MAX);
    }

    #[test]
    fn per_channel_queries() {
        let flags = SilenceFlags::all(2);
        assert!(flags.is_silent(0) && flags.is_silent(1));
        assert!(!flags.is_silent(2));
        assert!(!SilenceFlags::NONE.is_silent(0));
        assert!(flags.is_all(2));
        assert!(!flags.is_all(3));
    }

    #[test]
    fn output_frames_is_shortest_channel() {
        let mut out = AudioOutput::new(2, 256);
        assert_eq!(out.frames(), 256);
        out.buffers[1].truncate(100);
        assert_eq!(out.frames(), 100);
        assert_eq!(AudioOutput::default().frames(), 0);
    }
}

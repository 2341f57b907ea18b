use crate::gas::Channel;

/// The acquisition routine behind the converter.
///
/// Returns the current raw code on the analog input wired to `channel`. Reads are synchronous
/// and are repeated on every conversion, three per concentration, so implementations should
/// be cheap and must not buffer across calls unless that is what the caller wants.
pub trait AdcSource {
    fn read(&mut self, channel: Channel) -> u16;
}

impl<F> AdcSource for F
where
    F: FnMut(Channel) -> u16,
{
    fn read(&mut self, channel: Channel) -> u16 {
        self(channel)
    }
}

/// Constant samples, one per lane
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FixedAdc {
    pub ammonia: u16,
    pub carbon_monoxide: u16,
    pub nitrogen_dioxide: u16,
}

impl FixedAdc {
    pub const fn new(ammonia: u16, carbon_monoxide: u16, nitrogen_dioxide: u16) -> Self {
        Self {
            ammonia,
            carbon_monoxide,
            nitrogen_dioxide,
        }
    }

    /// Every lane reports `sample`
    pub const fn uniform(sample: u16) -> Self {
        Self::new(sample, sample, sample)
    }

    pub fn set(&mut self, channel: Channel, sample: u16) {
        match channel {
            Channel::Ammonia => self.ammonia = sample,
            Channel::CarbonMonoxide => self.carbon_monoxide = sample,
            Channel::NitrogenDioxide => self.nitrogen_dioxide = sample,
        }
    }
}

impl AdcSource for FixedAdc {
    fn read(&mut self, channel: Channel) -> u16 {
        match channel {
            Channel::Ammonia => self.ammonia,
            Channel::CarbonMonoxide => self.carbon_monoxide,
            Channel::NitrogenDioxide => self.nitrogen_dioxide,
        }
    }
}

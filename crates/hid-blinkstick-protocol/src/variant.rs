//! BlinkStick product-line variants.

/// The BlinkStick hardware variants sharing one VID/PID.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlinkStickVariant {
    Basic,
    Pro,
    Square,
    Strip,
    Nano,
    Flex,
}

impl BlinkStickVariant {
    /// Identify the variant from USB descriptors.
    ///
    /// The serial number ends in a firmware version ("BS012345-2.1");
    /// the major version doubles as the variant code on early units,
    /// while later units carry the code in the BCD release number
    /// (0x0200 Square, 0x0201 Strip, …).
    pub fn identify(serial_number: Option<&str>, release_number: u16) -> Option<Self> {
        if let Some(serial) = serial_number {
            if let Some(code) = serial
                .rsplit('-')
                .next()
                .and_then(|version| version.split('.').next())
                .and_then(|major| major.parse::<u16>().ok())
            {
                if let Some(variant) = Self::from_code(code) {
                    return Some(variant);
                }
            }
        }
        Self::from_code(release_number)
    }

    fn from_code(code: u16) -> Option<Self> {
        match code {
            0x0001 => Some(BlinkStickVariant::Basic),
            0x0002 => Some(BlinkStickVariant::Pro),
            0x0200 => Some(BlinkStickVariant::Square),
            0x0201 => Some(BlinkStickVariant::Strip),
            0x0202 => Some(BlinkStickVariant::Nano),
            0x0203 => Some(BlinkStickVariant::Flex),
            _ => None,
        }
    }

    /// Number of addressable LEDs on this variant.
    pub fn led_count(self) -> u8 {
        match self {
            BlinkStickVariant::Basic => 1,
            BlinkStickVariant::Pro => 192,
            BlinkStickVariant::Square | BlinkStickVariant::Strip => 8,
            BlinkStickVariant::Nano => 2,
            BlinkStickVariant::Flex => 32,
        }
    }

    /// Marketing name.
    pub fn name(self) -> &'static str {
        match self {
            BlinkStickVariant::Basic => "BlinkStick",
            BlinkStickVariant::Pro => "BlinkStick Pro",
            BlinkStickVariant::Square => "BlinkStick Square",
            BlinkStickVariant::Strip => "BlinkStick Strip",
            BlinkStickVariant::Nano => "BlinkStick Nano",
            BlinkStickVariant::Flex => "BlinkStick Flex",
        }
    }
}

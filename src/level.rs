/// Discrete power levels of the heater dial, lowest first.
///
/// The value is the believed physical position of the dial, not a measured
/// temperature. Ordering follows the dial index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum TemperatureLevel {
    T120,
    T400,
    T800,
    T1000,
    T1300,
    T1600,
    T1800,
    T2000,
}

impl TemperatureLevel {
    /// Every level in dial order.
    pub const ALL: [TemperatureLevel; 8] = [
        TemperatureLevel::T120,
        TemperatureLevel::T400,
        TemperatureLevel::T800,
        TemperatureLevel::T1000,
        TemperatureLevel::T1300,
        TemperatureLevel::T1600,
        TemperatureLevel::T1800,
        TemperatureLevel::T2000,
    ];

    pub const LOWEST: TemperatureLevel = TemperatureLevel::T120;
    pub const HIGHEST: TemperatureLevel = TemperatureLevel::T2000;

    /// Position of the level on the dial, 0 for the lowest.
    pub const fn index(self) -> u8 {
        self as u8
    }

    pub fn from_index(index: u8) -> Option<Self> {
        Self::ALL.get(index as usize).copied()
    }

    /// Nominal wattage printed on the dial.
    pub const fn watts(self) -> u16 {
        match self {
            TemperatureLevel::T120 => 120,
            TemperatureLevel::T400 => 400,
            TemperatureLevel::T800 => 800,
            TemperatureLevel::T1000 => 1000,
            TemperatureLevel::T1300 => 1300,
            TemperatureLevel::T1600 => 1600,
            TemperatureLevel::T1800 => 1800,
            TemperatureLevel::T2000 => 2000,
        }
    }

    /// Fixed-width (5 column) label used on the status display.
    pub const fn label(self) -> &'static str {
        match self {
            TemperatureLevel::T120 => " 120w",
            TemperatureLevel::T400 => " 400w",
            TemperatureLevel::T800 => " 800w",
            TemperatureLevel::T1000 => "1000w",
            TemperatureLevel::T1300 => "1300w",
            TemperatureLevel::T1600 => "1600w",
            TemperatureLevel::T1800 => "1800w",
            TemperatureLevel::T2000 => "2000w",
        }
    }

    /// Signed number of dial steps from `self` to `target`.
    pub const fn steps_to(self, target: TemperatureLevel) -> i8 {
        target.index() as i8 - self.index() as i8
    }

    /// The next level up, saturating at the top of the dial.
    pub fn raised(self) -> Self {
        Self::from_index(self.index() + 1).unwrap_or(Self::HIGHEST)
    }

    /// The next level down, saturating at the bottom of the dial.
    pub fn lowered(self) -> Self {
        match self.index() {
            0 => Self::LOWEST,
            i => Self::from_index(i - 1).unwrap_or(Self::LOWEST),
        }
    }
}

/// Whether mains power to the heater is switched on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PowerStatus {
    #[default]
    Off,
    On,
}

impl PowerStatus {
    pub const fn is_on(self) -> bool {
        matches!(self, PowerStatus::On)
    }

    pub const fn toggled(self) -> Self {
        match self {
            PowerStatus::Off => PowerStatus::On,
            PowerStatus::On => PowerStatus::Off,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            PowerStatus::Off => "OFF",
            PowerStatus::On => "ON",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn levels_are_ordered_by_index() {
        for (i, level) in TemperatureLevel::ALL.iter().enumerate() {
            assert_eq!(level.index() as usize, i);
            assert_eq!(TemperatureLevel::from_index(i as u8), Some(*level));
        }
        assert!(TemperatureLevel::T120 < TemperatureLevel::T2000);
        assert_eq!(TemperatureLevel::from_index(8), None);
    }

    #[test]
    fn labels_are_five_columns_and_match_watts() {
        for level in TemperatureLevel::ALL {
            let label = level.label();
            assert_eq!(label.len(), 5);
            let watts = label.trim_start().trim_end_matches('w').parse::<u16>();
            assert_eq!(watts, Ok(level.watts()));
        }
    }

    #[test]
    fn steps_to_is_signed_distance() {
        assert_eq!(TemperatureLevel::T120.steps_to(TemperatureLevel::T2000), 7);
        assert_eq!(TemperatureLevel::T1800.steps_to(TemperatureLevel::T400), -5);
        assert_eq!(TemperatureLevel::T1300.steps_to(TemperatureLevel::T1300), 0);
    }

    #[test]
    fn raising_and_lowering_saturate() {
        assert_eq!(TemperatureLevel::T2000.raised(), TemperatureLevel::T2000);
        assert_eq!(TemperatureLevel::T120.lowered(), TemperatureLevel::T120);
        assert_eq!(TemperatureLevel::T800.raised(), TemperatureLevel::T1000);
        assert_eq!(TemperatureLevel::T800.lowered(), TemperatureLevel::T400);
    }

    #[test]
    fn power_status_flips() {
        assert_eq!(PowerStatus::default(), PowerStatus::Off);
        assert_eq!(PowerStatus::Off.toggled(), PowerStatus::On);
        assert_eq!(PowerStatus::On.toggled().label(), "OFF");
    }
}

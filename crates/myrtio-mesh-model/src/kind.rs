//! Kind tags selecting the variant of a state or request value
//!
//! Generic model kinds occupy `0x00..0x80`, lighting model kinds start at `0x80`.

use crate::error::CodecError;

macro_rules! kind_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $($(#[$vmeta:meta])* $variant:ident = $code:literal,)+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        #[repr(u8)]
        pub enum $name {
            $($(#[$vmeta])* $variant = $code,)+
        }

        impl $name {
            /// Wire code of the kind
            pub const fn as_u8(self) -> u8 {
                self as u8
            }

            /// Parse a wire code, `None` for unknown codes
            pub const fn from_u8(value: u8) -> Option<Self> {
                match value {
                    $($code => Some(Self::$variant),)+
                    _ => None,
                }
            }
        }

        impl TryFrom<u8> for $name {
            type Error = CodecError;

            fn try_from(value: u8) -> Result<Self, Self::Error> {
                Self::from_u8(value).ok_or(CodecError::InvalidParameter)
            }
        }

        impl From<$name> for u8 {
            fn from(kind: $name) -> Self {
                kind.as_u8()
            }
        }
    };
}

kind_enum! {
    /// State kind
    StateKind {
        OnOff = 0x00,
        OnPowerUp = 0x01,
        Level = 0x02,
        PowerLevelActual = 0x03,
        PowerLevelLast = 0x04,
        PowerLevelDefault = 0x05,
        PowerLevelRange = 0x06,
        PowerLevelRangeWithStatus = 0x07,
        TransitionTime = 0x08,
        Battery = 0x09,
        LocationGlobal = 0x0A,
        LocationLocal = 0x0B,
        PropertyUser = 0x0C,
        PropertyAdmin = 0x0D,
        PropertyManufacturer = 0x0E,
        PropertyListUser = 0x0F,
        PropertyListAdmin = 0x10,
        PropertyListManufacturer = 0x11,
        PropertyListClient = 0x12,
        LightnessActual = 0x80,
        LightnessLinear = 0x81,
        LightnessLast = 0x82,
        LightnessDefault = 0x83,
        LightnessRange = 0x84,
        LightnessRangeWithStatus = 0x85,
        Ctl = 0x86,
        CtlTemperature = 0x87,
        CtlDefault = 0x88,
        CtlTemperatureRange = 0x89,
        CtlTemperatureRangeWithStatus = 0x8A,
        CtlLightnessTemperature = 0x8B,
        Hsl = 0x8C,
        HslHue = 0x8D,
        HslSaturation = 0x8E,
        HslDefault = 0x8F,
        HslRange = 0x90,
        HslRangeWithStatus = 0x91,
        HslTarget = 0x92,
        LcMode = 0x93,
        LcOccupancyMode = 0x94,
        LcLightOnOff = 0x95,
        LcProperty = 0x96,
    }
}

kind_enum! {
    /// Request kind
    RequestKind {
        OnOff = 0x00,
        OnPowerUp = 0x01,
        TransitionTime = 0x02,
        Level = 0x03,
        LevelDelta = 0x04,
        LevelMove = 0x05,
        LevelHalt = 0x06,
        PowerLevelActual = 0x07,
        PowerLevelDefault = 0x08,
        PowerLevelRange = 0x09,
        LocationGlobal = 0x0A,
        LocationLocal = 0x0B,
        PropertyUser = 0x0C,
        PropertyAdmin = 0x0D,
        PropertyManufacturer = 0x0E,
        LightnessActual = 0x80,
        LightnessLinear = 0x81,
        LightnessDefault = 0x82,
        LightnessRange = 0x83,
        Ctl = 0x84,
        CtlTemperature = 0x85,
        CtlDefault = 0x86,
        CtlTemperatureRange = 0x87,
        Hsl = 0x88,
        HslHue = 0x89,
        HslSaturation = 0x8A,
        HslDefault = 0x8B,
        HslRange = 0x8C,
        LcMode = 0x8D,
        LcOccupancyMode = 0x8E,
        LcLightOnOff = 0x8F,
        LcPropertySet = 0x90,
    }
}

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{PriceDataError, Result};

/// Declares a closed string-backed enum with `ALL`, `as_str`, `Display` and
/// a `FromStr` that reports the given error variant.
macro_rules! closed_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $err:ident, $label:literal {
            $($variant:ident => $text:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $text)]
                $variant,
            )+
        }

        impl $name {
            /// Every variant, in declaration order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// The wire/database representation.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = PriceDataError;

            fn from_str(s: &str) -> Result<Self> {
                match s.trim() {
                    $($text => Ok($name::$variant),)+
                    other => Err(PriceDataError::$err(format!(
                        "{} '{}' (expected one of: {})",
                        $label,
                        other,
                        [$($text),+].join(", ")
                    ))),
                }
            }
        }
    };
}

// ---------------------------------------------------------------------------
// Request dimensions
// ---------------------------------------------------------------------------

closed_enum! {
    /// Countries with a modelled base price.
    CountryCode, InvalidArgument, "invalid country code" {
        Gb => "GB",
        Fr => "FR",
        Nl => "NL",
        De => "DE",
    }
}

closed_enum! {
    /// Sampling resolution of a price series.
    Granularity, InvalidGranularity, "unsupported granularity" {
        Hourly => "h",
        HalfHourly => "hh",
    }
}

impl Granularity {
    /// Number of samples drawn per wall-clock hour.
    pub fn samples_per_hour(&self) -> usize {
        match self {
            Granularity::Hourly => 1,
            Granularity::HalfHourly => 2,
        }
    }
}

closed_enum! {
    Commodity, InvalidArgument, "invalid commodity" {
        Power => "power",
        NaturalGas => "natural_gas",
        Crude => "crude",
    }
}

// ---------------------------------------------------------------------------
// Model dimensions
// ---------------------------------------------------------------------------

closed_enum! {
    /// Fixed calendar-day ranges (northern hemisphere).
    Season, InvalidArgument, "invalid season" {
        Spring => "spring",
        Summer => "summer",
        Autumn => "autumn",
        Winter => "winter",
    }
}

closed_enum! {
    /// Generation source contributing to a country's power mix.
    EnergySource, InvalidArgument, "invalid energy source" {
        Wind => "wind",
        Solar => "solar",
        Nuclear => "nuclear",
        Hydro => "hydro",
        Biofuel => "biofuel",
        NaturalGas => "natural_gas",
    }
}

closed_enum! {
    /// Random number generation strategies exposed next to the price model.
    Strategy, InvalidArgument, "invalid strategy" {
        Basic => "basic",
        Uniform => "uniform",
    }
}

use crate::error::{PipelineError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

pub const POLLUTANT_COUNT: usize = 7;

/// The seven pollutant species tracked by the Madrid network feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Pollutant {
    Benzene,
    CarbonMonoxide,
    NitrogenDioxide,
    SulphurDioxide,
    Ozone,
    Pm25,
    Pm10,
}

impl Pollutant {
    pub const ALL: [Pollutant; POLLUTANT_COUNT] = [
        Pollutant::Benzene,
        Pollutant::CarbonMonoxide,
        Pollutant::NitrogenDioxide,
        Pollutant::SulphurDioxide,
        Pollutant::Ozone,
        Pollutant::Pm25,
        Pollutant::Pm10,
    ];

    /// Column header used by the measurement files and every export.
    pub fn column_name(&self) -> &'static str {
        match self {
            Pollutant::Benzene => "BEN",
            Pollutant::CarbonMonoxide => "CO",
            Pollutant::NitrogenDioxide => "NO_2",
            Pollutant::SulphurDioxide => "SO_2",
            Pollutant::Ozone => "O_3",
            Pollutant::Pm25 => "PM25",
            Pollutant::Pm10 => "PM10",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "BEN" => Some(Pollutant::Benzene),
            "CO" => Some(Pollutant::CarbonMonoxide),
            "NO_2" => Some(Pollutant::NitrogenDioxide),
            "SO_2" => Some(Pollutant::SulphurDioxide),
            "O_3" => Some(Pollutant::Ozone),
            "PM25" => Some(Pollutant::Pm25),
            "PM10" => Some(Pollutant::Pm10),
            _ => None,
        }
    }

    pub fn from_arg(s: &str) -> Result<Self> {
        Self::parse(&s.to_uppercase()).ok_or_else(|| PipelineError::UnknownPollutant(s.to_string()))
    }

    /// Position in a `PollutantValues` array.
    pub fn index(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for Pollutant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column_name())
    }
}

/// One slot per pollutant, `None` where no measurement exists.
pub type PollutantValues = [Option<f64>; POLLUTANT_COUNT];

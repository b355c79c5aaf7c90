//! # Tide Type
//!
//! A moon-phase-only heuristic for the spring–neap cycle:
//! - **Spring**: new and full moon, Sun and Moon aligned, largest range
//! - **Neap**: first and third quarter, Sun and Moon at right angles
//! - **Normal**: everything between
//!
//! This is deliberately not a tide model. Local harmonics, lunitidal
//! interval and weather all shift real tides; none are considered here.

use crate::lunar::MoonTruePhase;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tide {
    Spring,
    Neap,
    Normal,
}

impl Tide {
    pub fn from_phase(phase: MoonTruePhase) -> Self {
        match phase {
            MoonTruePhase::New | MoonTruePhase::Full => Tide::Spring,
            MoonTruePhase::FirstQuarter | MoonTruePhase::ThirdQuarter => Tide::Neap,
            MoonTruePhase::WaxingCrescent
            | MoonTruePhase::WaxingGibbous
            | MoonTruePhase::WaningGibbous
            | MoonTruePhase::WaningCrescent => Tide::Normal,
        }
    }
}

impl From<MoonTruePhase> for Tide {
    fn from(phase: MoonTruePhase) -> Self {
        Tide::from_phase(phase)
    }
}

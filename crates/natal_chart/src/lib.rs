//! Chart computation on top of the time and ephemeris crates.
//!
//! This crate provides:
//! - [`HouseSolver`]: closed-form angles and iterative Placidus cusps
//! - [`AspectMatcher`]: nearest-aspect detection within configurable orbs
//! - [`ChartBuilder`]: the per-request pipeline producing a [`Chart`]
//! - Tropical sign placement, modern rulerships and lunar phase
//! - Serializable response shapes in [`contract`]

pub mod aspects;
pub mod chart;
pub mod contract;
pub mod error;
pub mod houses;
pub mod zodiac;

pub use aspects::{
    ALL_ASPECTS, Aspect, AspectConfig, AspectKind, AspectMatcher, ChartAngle, ChartPoint,
    PointPosition,
};
pub use chart::{Angles, Chart, ChartBuilder, ChartConfig, ChartRequest, Placement};
pub use contract::{PlanetsResponse, SunReport};
pub use error::{ChartError, ErrorKind, HouseError};
pub use houses::{
    HouseConfig, HouseCusp, HouseSet, HouseSolver, HouseSystem, PolarFallback, ascendant_deg,
    midheaven_deg,
};
pub use zodiac::{LunarPhase, MoonPhase, Sign, format_deg_min};

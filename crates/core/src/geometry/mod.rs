//! Perimeter geometry: synthesis from a spread radius and blending between
//! timeframes

pub mod interpolation;
pub mod synthesis;

pub use interpolation::interpolate;
pub use synthesis::{
    elongation_factor, random_wind_bearing, synthesize, PerimeterSynthesizer,
};

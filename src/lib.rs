#![doc = include_str!("../README.md")]

// Public modules (stable-ish surface)
pub mod builder;
pub mod config;
pub mod detector;
pub mod histogram;
pub mod image;
pub mod modes;

// Lower-level building blocks, public for tools and experiments.
pub mod angle;
pub mod gradient;

// --- High-level re-exports -------------------------------------------------

pub use crate::builder::{orientation_histogram, HistogramParams, Keypoint};
pub use crate::detector::{
    KeypointOrientations, ModeOrientation, OrientationDetector, OrientationParams,
};
pub use crate::gradient::GradientField;
pub use crate::histogram::{CircularHistogram, InvalidBinIndex};
pub use crate::modes::{detect_modes, find_peaks, interval_orientation, HistogramPeak, ModeInterval};

/// Small prelude for quick experiments.
pub mod prelude {
    pub use crate::image::ImageF32;
    pub use crate::{
        CircularHistogram, GradientField, Keypoint, OrientationDetector, OrientationParams,
    };
}

pub mod error;
pub mod params;
pub mod plotting;
pub mod report;
pub mod scenarios;
pub mod training;

pub use error::{Result, TrainErr};
pub use params::{DataPoint, ParamMap};
pub use training::{
    manual_gradient, FiniteDifference, GradientRule, ManualGradient, StepIter, StepState, Trainer,
};

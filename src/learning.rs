mod perceptron;
pub mod vectors;

pub use self::perceptron::{learn, phi, LearnError, LearnParams, TrainingOutcome};

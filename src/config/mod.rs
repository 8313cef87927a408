//! JSON configuration of the command-line tools.
pub mod impedance;

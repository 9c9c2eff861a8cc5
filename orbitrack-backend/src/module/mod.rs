pub mod propagation;
pub mod tracking;

//! Recursive filter bank.
//!
//! Each filter keeps its state in its own output series: the value at bar `i`
//! depends only on the input at `i` and on its own (and sibling) outputs at
//! `i-1..i-4`. Revising a bar means truncating the series and updating again.

pub mod fractal_energy;
pub mod gaussian;
pub mod laguerre;

pub use fractal_energy::FractalEnergy;
pub use gaussian::{gaussian_alpha, GaussianBank, GaussianCoefficients, GaussianFilter};
pub use laguerre::LaguerreCascade;

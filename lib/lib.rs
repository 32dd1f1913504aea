//! This package implements a small "quantum cellular neuron": three classical
//! state variables are encoded as single-qubit rotations, evolved by layers
//! of parameterized (multi-)controlled rotations standing in for a
//! discretized nonlinear ODE, and read out as per-qubit `⟨Z⟩` expectation
//! values after every layer.
//!
//! - [`circuit`] provides constructs for ordinary descriptions of quantum
//! circuits using the conventional [circuit notation][qcircuits].
//! - [`pauli`] describes the observables that can be read out.
//! - [`estimator`] turns circuits and observables into expectation values,
//! with an exact [state-vector][estimator::StatevectorEstimator] backend.
//! - [`neuron`] builds the layers and drives the layer-by-layer readout.
//!
//! [qcircuits]: https://en.wikipedia.org/wiki/Quantum_circuit
//!
//! # Example
//! ```
//! use qcel_neuron::{
//!     estimator::StatevectorEstimator,
//!     neuron::{ LayerParams, Mode, Neuron, Template },
//! };
//!
//! let mut neuron = Neuron::new(3, 3, StatevectorEstimator::new());
//! let evolution = neuron.evaluate_observable_evolution(
//!     &[0.5, 0.0, -0.5],
//!     &[0.5, 0.0, -0.5],
//!     &Template::identity(),
//!     &Template::zeros(),
//!     4,
//!     Mode::NonHybrid,
//!     &LayerParams::default(),
//! ).unwrap();
//! assert_eq!(evolution.len(), 4);
//! ```

pub mod circuit;
pub mod pauli;
pub mod estimator;
pub mod neuron;

pub extern crate num_complex;
/// Handy macro to create `num_complex::Complex64`s from more natural and
/// succinct syntax.
///
/// ```
/// use std::f64::consts::PI;
/// use num_complex::Complex64;
/// use qcel_neuron::c;
///
/// assert_eq!( c!(i (-1.0)),    Complex64::new(0.0, -1.0)      );
/// assert_eq!( c!(e PI),        Complex64::cis(PI)             );
/// assert_eq!( c!(1.0),         Complex64::new(1.0, 0.0)       );
/// assert_eq!( c!(1.0 + i 1.0), Complex64::new(1.0, 1.0)       );
/// assert_eq!( c!(1.0 - i 1.0), Complex64::new(1.0, -1.0)      );
/// assert_eq!( c!(1.0, 1.0),    Complex64::new(1.0, 1.0)       );
/// assert_eq!( c!(1.0, e PI),   Complex64::from_polar(1.0, PI) );
/// ```
#[macro_export]
macro_rules! c {
    ( i $im:expr )
        => { $crate::num_complex::Complex64::new(0.0, $im) };
    ( e $ph:expr )
        => { $crate::num_complex::Complex64::cis($ph) };
    ( $re:expr )
        => { $crate::num_complex::Complex64::new($re, 0.0) };
    ( $re:literal + i $im:literal )
        => { $crate::num_complex::Complex64::new($re, $im) };
    ( $re:literal - i $im:literal )
        => { $crate::num_complex::Complex64::new($re, -$im) };
    ( $r:expr, e $ph:expr )
        => { $crate::num_complex::Complex64::from_polar($r, $ph) };
    ( $re:expr, $im:expr )
        => { $crate::num_complex::Complex64::new($re, $im) };
}

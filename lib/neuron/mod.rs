//! The quantum cellular neuron.
//!
//! A [`Neuron`] owns a single [`Circuit`] and an [`Estimator`]. Each call to
//! [`Neuron::evaluate_observable_evolution`] encodes a set of classical inputs
//! as rotations, then repeatedly appends a [layer][layer::apply_layer] and
//! reads out `⟨Z⟩` on qubits 0, 1, and 2, producing an [`Evolution`].
//!
//! In [`Mode::Hybrid`], the values read out after each layer become the
//! classical state driving the next layer's [self-decay
//! stage][layer::apply_self_decay].

use std::{ fmt, ops::Index, str::FromStr };
use ndarray as nd;
use rustc_hash::FxHashMap as HashMap;
use thiserror::Error;
use tracing::debug;
use crate::{
    circuit::{ Circuit, CircuitError, DrawStyle },
    estimator::{ Estimator, EstimatorError },
    pauli::{ PauliError, PauliString },
};

#[derive(Debug, Error)]
pub enum NeuronError {
    #[error("input {index} = {value} is outside the encodable domain [-1, 1]")]
    Domain { index: usize, value: f64 },

    #[error("templates must be 3×3, but got {0}×{1}")]
    TemplateShape(usize, usize),

    #[error("expected {expected} input(s), but got {got}")]
    InputLength { expected: usize, got: usize },

    #[error("unknown mode {0:?}: expected \"hybrid\" or \"non-hybrid\"")]
    UnknownMode(String),

    #[error("circuit error: {0}")]
    Circuit(#[from] CircuitError),

    #[error("observable error: {0}")]
    Observable(#[from] PauliError),

    #[error("estimator error: {0}")]
    Estimator(#[from] EstimatorError),
}
pub type NeuronResult<T> = Result<T, NeuronError>;

pub mod layer;

/// Number of state variables, and therefore qubits, per neuron.
pub const NUM_AXES: usize = 3;

/// How each layer is built.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Mode {
    /// Templated layers with the classical readout fed back through a
    /// self-decay stage.
    Hybrid,
    /// Damped templated layers with the nonlinear cross terms folded in as
    /// multi-controlled rotations.
    NonHybrid,
}

impl FromStr for Mode {
    type Err = NeuronError;

    fn from_str(s: &str) -> NeuronResult<Self> {
        match s {
            "hybrid" => Ok(Self::Hybrid),
            "non-hybrid" => Ok(Self::NonHybrid),
            _ => Err(NeuronError::UnknownMode(s.to_string())),
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Hybrid => write!(f, "hybrid"),
            Self::NonHybrid => write!(f, "non-hybrid"),
        }
    }
}

/// A 3×3 coefficient template.
///
/// As a control template, entry `[i, j]` weights input `j` in the rotation
/// applied to qubit `i`. As a feedback template, off-diagonal entry `[i, j]`
/// weights the rotation controlled by qubit `i` onto qubit `j`, and diagonal
/// entry `[i, i]` weights a self-rotation on qubit `i`.
#[derive(Clone, Debug, PartialEq)]
pub struct Template(nd::Array2<f64>);

impl Template {
    /// Wrap a 2D array, checking that it is 3×3.
    pub fn new(array: nd::Array2<f64>) -> NeuronResult<Self> {
        let (r, c) = array.dim();
        if r != NUM_AXES || c != NUM_AXES {
            return Err(NeuronError::TemplateShape(r, c));
        }
        Ok(Self(array))
    }

    /// Create from rows.
    pub fn from_rows(rows: [[f64; NUM_AXES]; NUM_AXES]) -> Self {
        Self(
            nd::Array2::from_shape_fn((NUM_AXES, NUM_AXES), |(i, j)| rows[i][j])
        )
    }

    /// Create from a nested `Vec`, checking that it is 3×3.
    pub fn from_vecs(rows: &[Vec<f64>]) -> NeuronResult<Self> {
        let r = rows.len();
        if let Some(row) = rows.iter().find(|row| row.len() != NUM_AXES) {
            return Err(NeuronError::TemplateShape(r, row.len()));
        }
        let flat: Vec<f64> = rows.iter().flatten().copied().collect();
        let array = nd::Array2::from_shape_vec((r, NUM_AXES), flat)
            .map_err(|_| NeuronError::TemplateShape(r, NUM_AXES))?;
        Self::new(array)
    }

    /// The identity template.
    pub fn identity() -> Self { Self(nd::Array2::eye(NUM_AXES)) }

    /// The all-zero template.
    pub fn zeros() -> Self { Self(nd::Array2::zeros((NUM_AXES, NUM_AXES))) }

    /// Return the underlying array.
    pub fn as_array(&self) -> &nd::Array2<f64> { &self.0 }
}

impl Index<(usize, usize)> for Template {
    type Output = f64;

    fn index(&self, ij: (usize, usize)) -> &f64 { &self.0[ij] }
}

/// Per-layer numerical parameters.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LayerParams {
    /// Step size.
    pub dt: f64,
    /// Index of the neuron's first qubit in the circuit.
    pub first_qubit_index: usize,
    /// Whether the templated rotations carry the extra `(1 - dt)` factor.
    ///
    /// `None` applies it in [`Mode::NonHybrid`] only.
    pub damping: Option<bool>,
}

impl Default for LayerParams {
    fn default() -> Self {
        Self { dt: 0.01, first_qubit_index: 0, damping: None }
    }
}

impl LayerParams {
    /// Set the step size.
    pub fn with_dt(mut self, dt: f64) -> Self {
        self.dt = dt;
        self
    }

    /// Set the index of the neuron's first qubit.
    pub fn with_first_qubit_index(mut self, first_qubit_index: usize) -> Self {
        self.first_qubit_index = first_qubit_index;
        self
    }

    /// Force the `(1 - dt)` factor on or off regardless of mode.
    pub fn with_damping(mut self, damping: bool) -> Self {
        self.damping = Some(damping);
        self
    }

    /// Return the factor multiplying every templated rotation angle.
    pub fn damp_factor(&self, mode: Mode) -> f64 {
        let damped = self.damping.unwrap_or(mode == Mode::NonHybrid);
        if damped { 1.0 - self.dt } else { 1.0 }
    }
}

/// Label of a readout observable.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Label {
    X,
    Y,
    Z,
}

impl Label {
    /// All labels, in readout order.
    pub const ALL: [Self; NUM_AXES] = [Self::X, Self::Y, Self::Z];

    /// Return the qubit read out under this label.
    pub fn qubit(self) -> usize {
        match self {
            Self::X => 0,
            Self::Y => 1,
            Self::Z => 2,
        }
    }

    /// Return the lowercase name used for this series in printed output.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::X => "x",
            Self::Y => "y",
            Self::Z => "z",
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Per-label series of expectation values, one entry per layer.
#[derive(Clone, Debug, PartialEq)]
pub struct Evolution {
    series: HashMap<Label, Vec<f64>>,
}

impl Default for Evolution {
    fn default() -> Self { Self::new() }
}

impl Evolution {
    /// Create a new, empty series for every label.
    pub fn new() -> Self {
        Self {
            series: Label::ALL.into_iter().map(|l| (l, Vec::new())).collect(),
        }
    }

    fn push(&mut self, values: [f64; NUM_AXES]) {
        for (label, v) in Label::ALL.into_iter().zip(values) {
            self.series.entry(label).or_default().push(v);
        }
    }

    /// Return the series for a label.
    pub fn get(&self, label: Label) -> &[f64] {
        self.series.get(&label).map(|s| s.as_slice()).unwrap_or(&[])
    }

    /// Return the number of recorded layers.
    pub fn len(&self) -> usize { self.get(Label::X).len() }

    /// Return `true` if no layers have been recorded.
    pub fn is_empty(&self) -> bool { self.len() == 0 }

    /// Return the values recorded after layer `n` (0-indexed).
    pub fn at(&self, n: usize) -> Option<[f64; NUM_AXES]> {
        let [x, y, z] = Label::ALL.map(|l| self.get(l).get(n).copied());
        Some([x?, y?, z?])
    }

    /// Return the values recorded after the last layer.
    pub fn last(&self) -> Option<[f64; NUM_AXES]> {
        self.len().checked_sub(1).and_then(|n| self.at(n))
    }

    /// Iterate over all series in label order.
    pub fn iter(&self) -> impl Iterator<Item = (Label, &[f64])> + '_ {
        Label::ALL.into_iter().map(|l| (l, self.get(l)))
    }
}

/// A quantum cellular neuron.
///
/// The circuit is created once and grows with every evaluation; it is never
/// reset.
#[derive(Clone, Debug)]
pub struct Neuron<E> {
    circuit: Circuit,
    estimator: E,
}

impl<E> Neuron<E>
where E: Estimator
{
    /// Create a new neuron on a fresh circuit.
    pub fn new(num_qubits: usize, num_clbits: usize, estimator: E) -> Self {
        Self { circuit: Circuit::new(num_qubits, num_clbits), estimator }
    }

    /// Return the circuit built so far.
    pub fn circuit(&self) -> &Circuit { &self.circuit }

    /// Return the number of qubits.
    pub fn num_qubits(&self) -> usize { self.circuit.num_qubits() }

    /// Return the number of classical bits.
    pub fn num_clbits(&self) -> usize { self.circuit.num_clbits() }

    /// Return the estimator.
    pub fn estimator(&self) -> &E { &self.estimator }

    /// Return the estimator, mutably.
    pub fn estimator_mut(&mut self) -> &mut E { &mut self.estimator }

    /// Render the circuit built so far.
    pub fn draw(&self, style: DrawStyle) -> String { self.circuit.draw(style) }

    /// Encode `inputs`, then apply `total_layers` layers, reading out `⟨Z⟩` on
    /// qubits 0, 1, and 2 after each.
    ///
    /// `inputs` are encoded with [`layer::encode_inputs`] and, in
    /// [`Mode::Hybrid`], also seed the classical state, so hybrid runs need at
    /// least three of them. `inputs_normalized` drives the control template
    /// and must have at least three entries. The estimator is called exactly once per
    /// layer. Any error is returned as-is; gates appended before the failure
    /// remain in the circuit.
    #[allow(clippy::too_many_arguments)]
    pub fn evaluate_observable_evolution(
        &mut self,
        inputs: &[f64],
        inputs_normalized: &[f64],
        control: &Template,
        feedback: &Template,
        total_layers: usize,
        mode: Mode,
        params: &LayerParams,
    ) -> NeuronResult<Evolution>
    {
        debug!(
            %mode,
            total_layers,
            dt = params.dt,
            first_qubit_index = params.first_qubit_index,
            "evaluating observable evolution"
        );
        let n = self.circuit.num_qubits();
        let observables: Vec<PauliString> =
            Label::ALL.into_iter()
            .map(|l| PauliString::z(l.qubit(), n))
            .collect::<Result<_, _>>()?;

        // the hybrid classical state is seeded from the raw inputs
        let mut state: [f64; NUM_AXES] =
            match mode {
                Mode::NonHybrid => [0.0; NUM_AXES],
                Mode::Hybrid => inputs.get(..NUM_AXES)
                    .and_then(|head| head.try_into().ok())
                    .ok_or(NeuronError::InputLength {
                        expected: NUM_AXES,
                        got: inputs.len(),
                    })?,
            };

        layer::encode_inputs(&mut self.circuit, inputs)?;

        let mut evolution = Evolution::new();
        for n_layer in 1..=total_layers {
            match mode {
                Mode::NonHybrid => layer::apply_layer(
                    &mut self.circuit,
                    inputs_normalized,
                    control,
                    feedback,
                    mode,
                    params,
                )?,
                Mode::Hybrid => layer::apply_hybrid_layer(
                    &mut self.circuit,
                    inputs_normalized,
                    control,
                    feedback,
                    state,
                    params,
                )?,
            }

            let pubs: Vec<(&Circuit, &PauliString)> =
                observables.iter().map(|obs| (&self.circuit, obs)).collect();
            let values = self.estimator.run(&pubs)?;
            let values: [f64; NUM_AXES] =
                values.as_slice().try_into()
                .map_err(|_| EstimatorError::Backend(
                    format!(
                        "expected {} expectation value(s), but got {}",
                        NUM_AXES,
                        values.len(),
                    )
                ))?;
            debug!(layer = n_layer, ?values, "measured");
            if mode == Mode::Hybrid { state = values; }
            evolution.push(values);
        }
        Ok(evolution)
    }
}

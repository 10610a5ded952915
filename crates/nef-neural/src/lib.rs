// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # Neural numerics for ensemble networks
//!
//! Everything that turns a population description into numbers:
//! - **Models**: rate-mode neuron models (LIF, rectified linear, direct)
//! - **Tuning**: encoders, gains and biases of a population
//! - **Evaluation points**: samples of the represented space
//! - **Solver**: regularised least-squares decoders
//!
//! The graph layer (`nef-graph`) calls into this crate when it builds an
//! evaluator; nothing here knows about networks or connections.

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod eval_points;
pub mod models;
pub mod neurons;
pub mod rng;
pub mod solver;
pub mod tuning;
pub mod types;

pub use eval_points::{default_n_eval_points, sample_ball};
pub use models::{LIFParameters, NeuronType};
pub use neurons::Neurons;
pub use rng::{derive_seed, seeded_rng};
pub use solver::{solve_decoders, DecoderSolution, DEFAULT_REGULARIZATION};
pub use tuning::TuningCurves;
pub use types::{NeuralError, NeuralResult, UniformRange};

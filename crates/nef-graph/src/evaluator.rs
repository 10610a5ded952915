// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # Steady-state evaluation
//!
//! Computes the value every signal settles to for constant inputs.
//! Building the evaluator derives tuning curves for each neural ensemble
//! and solves one set of decoders per outgoing connection; evaluation then
//! walks the (acyclic) graph in topological order.
//!
//! Filters do not change steady-state values (unit DC gain), so filtered
//! and unfiltered connections evaluate identically here.

use std::collections::{HashMap, VecDeque};

use ndarray::{Array2, ArrayView1};
use nef_neural::{
    default_n_eval_points, derive_seed, sample_ball, seeded_rng, solve_decoders,
    DecoderSolution, TuningCurves,
};
use tracing::debug;

use crate::connection::{Connection, DecodedFunction};
use crate::error::{GraphError, GraphResult};
use crate::ids::{ConnectionId, EnsembleId, NodeId, ObjectId};
use crate::network::Network;
use crate::node::NodeOutput;

/// Built evaluator for one network
#[derive(Debug)]
pub struct Evaluator<'a> {
    network: &'a Network,
    order: Vec<ObjectId>,
    tuning: HashMap<EnsembleId, TuningCurves>,
    decoders: HashMap<ConnectionId, DecoderSolution>,
}

/// Steady-state value of every object
#[derive(Debug, Clone, Default)]
pub struct Values {
    values: HashMap<ObjectId, Vec<f64>>,
}

impl Values {
    /// Output of a node
    pub fn node(&self, id: NodeId) -> Option<&[f64]> {
        self.values.get(&ObjectId::Node(id)).map(Vec::as_slice)
    }

    /// Value represented by an ensemble
    pub fn ensemble(&self, id: EnsembleId) -> Option<&[f64]> {
        self.values.get(&ObjectId::Ensemble(id)).map(Vec::as_slice)
    }
}

impl<'a> Evaluator<'a> {
    /// Derive tuning curves and decoders for `network`
    ///
    /// # Errors
    /// `Cycle` for recurrent graphs, `Neural` for tuning or solver failures,
    /// `InvalidConnection` if a decoded function returns the wrong width
    pub fn build(network: &'a Network) -> GraphResult<Self> {
        let order = topological_order(network)?;

        let mut tuning = HashMap::new();
        let mut decoders = HashMap::new();
        for (id, ensemble) in network.ensembles() {
            let neuron_type = ensemble.neurons.neuron_type;
            if neuron_type.is_direct() {
                continue;
            }

            let options = &ensemble.options;
            let seed = options
                .seed
                .unwrap_or_else(|| derive_seed(network.seed, id.index() as u64));
            let mut rng = seeded_rng(seed);
            let n_neurons = ensemble.neurons.n_neurons;
            let dimensions = ensemble.dimensions;

            let curves = TuningCurves::generate(
                &mut rng,
                neuron_type,
                n_neurons,
                dimensions,
                options.encoders.as_ref().map(|e| e.view()),
                options.max_rates,
                options.intercepts,
                options.radius,
            )?;

            let n_eval_points = options
                .n_eval_points
                .unwrap_or_else(|| default_n_eval_points(n_neurons, dimensions));
            let points = sample_ball(&mut rng, n_eval_points, dimensions, options.radius);
            let activities = curves.activities(points.view())?;

            for (conn_id, conn) in network.connections_from(ObjectId::Ensemble(id)) {
                let mut targets = Array2::zeros((n_eval_points, conn.size_mid()));
                for (row, point) in points.rows().into_iter().enumerate() {
                    let selected: Vec<f64> = conn.source_indices.iter().map(|&i| point[i]).collect();
                    let value = match &conn.function {
                        Some(function) => call_checked(function, &selected)?,
                        None => selected,
                    };
                    targets.row_mut(row).assign(&ArrayView1::from(value.as_slice()));
                }

                let solution =
                    solve_decoders(activities.view(), targets.view(), options.regularization)?;
                debug!(
                    target: "nef-graph",
                    "Decoders for '{}' -> '{}': {} neurons, {} eval points, rmse={:.4}",
                    ensemble.label,
                    network.label_of(conn.target.object),
                    n_neurons,
                    n_eval_points,
                    solution.rmse
                );
                decoders.insert(conn_id, solution);
            }
            tuning.insert(id, curves);
        }

        Ok(Self {
            network,
            order,
            tuning,
            decoders,
        })
    }

    pub fn network(&self) -> &Network {
        self.network
    }

    pub fn tuning(&self, id: EnsembleId) -> Option<&TuningCurves> {
        self.tuning.get(&id)
    }

    /// Decoders solved for a connection (neural ensembles only)
    pub fn decoders(&self, id: ConnectionId) -> Option<&DecoderSolution> {
        self.decoders.get(&id)
    }

    /// Evaluate the network with `inputs` driving nodes
    ///
    /// A driven node emits the given vector instead of its own output.
    ///
    /// # Errors
    /// `InvalidInput` for unknown nodes or vectors of the wrong width
    pub fn evaluate(&self, inputs: &HashMap<NodeId, Vec<f64>>) -> GraphResult<Values> {
        for (&id, value) in inputs {
            let node = self
                .network
                .node(id)
                .map_err(|_| GraphError::InvalidInput(format!("unknown node {}", id.index())))?;
            if value.len() != node.size_out() {
                return Err(GraphError::InvalidInput(format!(
                    "node '{}' emits {} dimensions, got {}",
                    node.label,
                    node.size_out(),
                    value.len()
                )));
            }
        }

        let mut values = Values::default();
        for &object in &self.order {
            let value = match object {
                ObjectId::Node(id) => {
                    let node = self.network.node(id)?;
                    match (inputs.get(&id), &node.output) {
                        (Some(driven), _) => driven.clone(),
                        (None, NodeOutput::Constant(constant)) => constant.clone(),
                        (None, NodeOutput::Passthrough) => {
                            self.accumulate(object, node.size_in, &values)?
                        }
                    }
                }
                ObjectId::Ensemble(id) => {
                    let dimensions = self.network.ensemble(id)?.dimensions;
                    self.accumulate(object, dimensions, &values)?
                }
            };
            values.values.insert(object, value);
        }
        Ok(values)
    }

    fn accumulate(&self, object: ObjectId, size: usize, values: &Values) -> GraphResult<Vec<f64>> {
        let mut total = vec![0.0; size];
        for (conn_id, conn) in self.network.connections_into(object) {
            let source = values.values.get(&conn.source.object).ok_or_else(|| {
                GraphError::UnknownObject(format!("{} evaluated out of order", conn.source.object))
            })?;
            let signal = self.signal(conn_id, conn, source)?;
            for (&slot, value) in conn.target_indices.iter().zip(signal) {
                total[slot] += value;
            }
        }
        Ok(total)
    }

    /// Value a connection delivers to its target slots
    fn signal(&self, conn_id: ConnectionId, conn: &Connection, source: &[f64]) -> GraphResult<Vec<f64>> {
        let mid = match (conn.source.object, self.decoders.get(&conn_id)) {
            (ObjectId::Ensemble(id), Some(solution)) => {
                let curves = self.tuning.get(&id).ok_or_else(|| {
                    GraphError::UnknownObject(format!("no tuning curves for {}", conn.source.object))
                })?;
                let x = ArrayView1::from(source).insert_axis(ndarray::Axis(0));
                let activities = curves.activities(x)?;
                activities.dot(&solution.decoders).row(0).to_vec()
            }
            _ => {
                let selected: Vec<f64> = conn.source_indices.iter().map(|&i| source[i]).collect();
                match &conn.function {
                    Some(function) => call_checked(function, &selected)?,
                    None => selected,
                }
            }
        };
        Ok(conn.transform.apply(&mid))
    }
}

fn call_checked(function: &DecodedFunction, x: &[f64]) -> GraphResult<Vec<f64>> {
    let value = function.call(x);
    if value.len() != function.output_dims() {
        return Err(GraphError::InvalidConnection(format!(
            "decoded function returned {} values, declared {}",
            value.len(),
            function.output_dims()
        )));
    }
    Ok(value)
}

/// Kahn's algorithm over nodes and ensembles, insertion order for ties
fn topological_order(network: &Network) -> GraphResult<Vec<ObjectId>> {
    let objects: Vec<ObjectId> = network
        .nodes()
        .map(|(id, _)| ObjectId::Node(id))
        .chain(network.ensembles().map(|(id, _)| ObjectId::Ensemble(id)))
        .collect();

    let mut in_degree: HashMap<ObjectId, usize> = objects.iter().map(|&o| (o, 0)).collect();
    for (_, conn) in network.connections() {
        *in_degree.entry(conn.target.object).or_insert(0) += 1;
    }

    let mut ready: VecDeque<ObjectId> = objects
        .iter()
        .copied()
        .filter(|o| in_degree.get(o).copied().unwrap_or(0) == 0)
        .collect();
    let mut order = Vec::with_capacity(objects.len());
    while let Some(object) = ready.pop_front() {
        order.push(object);
        for (_, conn) in network.connections_from(object) {
            if let Some(degree) = in_degree.get_mut(&conn.target.object) {
                *degree -= 1;
                if *degree == 0 {
                    ready.push_back(conn.target.object);
                }
            }
        }
    }

    if order.len() < objects.len() {
        let stuck = objects
            .iter()
            .filter(|o| in_degree.get(o).copied().unwrap_or(0) > 0)
            .map(|&o| network.label_of(o).to_string())
            .collect::<Vec<_>>()
            .join(", ");
        return Err(GraphError::Cycle(stuck));
    }
    Ok(order)
}

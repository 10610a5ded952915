// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! End-to-end tests for the product network

use std::collections::HashMap;

use nef_graph::{
    ConnectionSpec, EnsembleOptions, Evaluator, GraphError, Network, Neurons, Node,
};
use nef_networks::{product_encoders, Product, DEFAULT_RADIUS};
use proptest::prelude::*;

fn evaluate_product(net: &Network, product: &Product, a: &[f64], b: &[f64]) -> Vec<f64> {
    let evaluator = Evaluator::build(net).expect("Failed to build evaluator");
    let inputs = HashMap::from([(product.a(), a.to_vec()), (product.b(), b.to_vec())]);
    let values = evaluator.evaluate(&inputs).expect("Failed to evaluate");
    values.node(product.output()).unwrap().to_vec()
}

#[test]
fn test_scalar_product_direct_is_exact() {
    let mut net = Network::new("direct");
    let product = Product::new(
        &mut net,
        Neurons::direct(4),
        1,
        DEFAULT_RADIUS,
        EnsembleOptions::default(),
    )
    .unwrap();

    let out = evaluate_product(&net, &product, &[0.6], &[0.4]);
    assert!((out[0] - 0.24).abs() < 1e-12);
}

#[test]
fn test_scalar_product_lif() {
    let mut net = Network::with_seed("lif", 17);
    let product = Product::new(
        &mut net,
        Neurons::lif(200),
        1,
        DEFAULT_RADIUS,
        EnsembleOptions::default(),
    )
    .unwrap();

    let out = evaluate_product(&net, &product, &[0.6], &[0.4]);
    assert!((out[0] - 0.24).abs() < 0.06, "decoded {}", out[0]);
}

#[test]
fn test_vector_product_direct_is_exact() {
    let mut net = Network::new("direct");
    let product =
        Product::new(&mut net, Neurons::direct(4), 3, 1.0, EnsembleOptions::default()).unwrap();

    let out = evaluate_product(&net, &product, &[1.0, 0.0, -1.0], &[1.0, 1.0, 1.0]);
    assert_eq!(out, vec![1.0, 0.0, -1.0]);
}

#[test]
fn test_vector_product_lif() {
    let mut net = Network::with_seed("lif", 5);
    let product =
        Product::new(&mut net, Neurons::lif(200), 3, 1.0, EnsembleOptions::default()).unwrap();

    let out = evaluate_product(&net, &product, &[1.0, 0.0, -1.0], &[1.0, 1.0, 1.0]);
    let expected = [1.0, 0.0, -1.0];
    for (got, want) in out.iter().zip(expected) {
        assert!((got - want).abs() < 0.2, "decoded {:?}", out);
    }
}

#[test]
fn test_larger_radius_keeps_product_in_range() {
    let mut net = Network::with_seed("radius", 2);
    let product =
        Product::new(&mut net, Neurons::lif(200), 1, 2.0, EnsembleOptions::default()).unwrap();

    let out = evaluate_product(&net, &product, &[1.2], &[-1.0]);
    assert!((out[0] + 1.2).abs() < 0.25, "decoded {}", out[0]);
}

#[test]
fn test_dot_product_through_transform() {
    let mut net = Network::new("dot");
    let product =
        Product::new(&mut net, Neurons::direct(4), 3, 1.0, EnsembleOptions::default()).unwrap();
    let dot = net.add_node(Node::passthrough("dot", 1));
    net.connect(
        ConnectionSpec::new(product.output(), dot)
            .transform(product.dot_product_transform(2.0))
            .filter(None),
    )
    .unwrap();

    let evaluator = Evaluator::build(&net).unwrap();
    let inputs = HashMap::from([
        (product.a(), vec![0.5, -0.2, 0.3]),
        (product.b(), vec![0.4, 0.5, -1.0]),
    ]);
    let values = evaluator.evaluate(&inputs).unwrap();
    assert!((values.node(dot).unwrap()[0] + 0.4).abs() < 1e-12);
}

#[test]
fn test_inputs_wired_from_upstream_nodes() {
    let mut net = Network::new("embedded");
    let product =
        Product::new(&mut net, Neurons::direct(4), 2, 1.0, EnsembleOptions::default()).unwrap();
    let stim_a = net.add_node(Node::constant("stim_a", vec![0.5, 0.25]));
    let stim_b = net.add_node(Node::constant("stim_b", vec![-0.5, 0.8]));
    net.connect(ConnectionSpec::new(stim_a, product.a())).unwrap();
    net.connect(ConnectionSpec::new(stim_b, product.b())).unwrap();

    let values = Evaluator::build(&net)
        .unwrap()
        .evaluate(&HashMap::new())
        .unwrap();
    let out = values.node(product.output()).unwrap();
    assert!((out[0] + 0.25).abs() < 1e-12);
    assert!((out[1] - 0.2).abs() < 1e-12);
}

#[test]
fn test_zero_dimensions_propagates_array_error() {
    let mut net = Network::new("bad");
    let result = Product::new(&mut net, Neurons::lif(10), 0, 1.0, EnsembleOptions::default());
    assert!(matches!(result, Err(GraphError::InvalidShape(_))));
}

#[test]
fn test_zero_neurons_propagates_ensemble_error() {
    let mut net = Network::new("bad");
    let result = Product::new(&mut net, Neurons::lif(0), 2, 1.0, EnsembleOptions::default());
    assert!(matches!(result, Err(GraphError::InvalidShape(_))));
}

#[test]
fn test_non_multiple_of_four_neurons_builds() {
    let mut net = Network::with_seed("odd", 1);
    let product =
        Product::new(&mut net, Neurons::lif(10), 1, 1.0, EnsembleOptions::default()).unwrap();
    let ens = product.product().ensembles()[0];
    assert_eq!(
        net.ensemble(ens).unwrap().options.encoders.as_ref().unwrap(),
        &product_encoders(10, 1.0)
    );
    assert!(Evaluator::build(&net).is_ok());
}

#[test]
fn test_tiny_populations_always_build() {
    // With one or two neurons some seeds leave a pair ensemble silent on
    // every evaluation point; it must still decode (to zero).
    for n_neurons in 1..=4 {
        for seed in 0..20 {
            let mut net = Network::with_seed("tiny", seed);
            let product = Product::new(
                &mut net,
                Neurons::lif(n_neurons),
                1,
                1.0,
                EnsembleOptions::default(),
            )
            .unwrap();
            let out = evaluate_product(&net, &product, &[0.5], &[0.5]);
            assert!(out[0].is_finite(), "n={} seed={} decoded {}", n_neurons, seed, out[0]);
        }
    }
}

proptest! {
    #[test]
    fn prop_dot_product_transform_is_constant(dimensions in 1usize..16, scale in -10.0f64..10.0) {
        let mut net = Network::new("prop");
        let product = Product::new(
            &mut net,
            Neurons::direct(1),
            dimensions,
            1.0,
            EnsembleOptions::default(),
        )
        .unwrap();
        let transform = product.dot_product_transform(scale);
        prop_assert_eq!(transform.dim(), (1, dimensions));
        prop_assert!(transform.iter().all(|&w| w == scale));
    }

    #[test]
    fn prop_encoder_shape_and_norm(n_neurons in 1usize..64, radius in 0.1f64..10.0) {
        let encoders = product_encoders(n_neurons, radius);
        prop_assert_eq!(encoders.dim(), (n_neurons, 2));
        for row in encoders.rows() {
            let norm = (row[0] * row[0] + row[1] * row[1]).sqrt();
            prop_assert!((norm - 1.0 / radius).abs() < 1e-9);
        }
    }
}

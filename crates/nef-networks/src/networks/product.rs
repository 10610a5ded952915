// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
Elementwise product of two vectors.

Each output dimension is computed by one two-dimensional ensemble that
represents the pair `(A_i, B_i)` and decodes `x0 * x1`:

```text
A ──[0::2]──┐
            ├──> product.input ──> ens[i] (2D) ──x0*x1──> product.product ──> output
B ──[1::2]──┘
```

All three connections are unfiltered. The ensembles use the four diagonal
encoders `(±1, ±1)`, which line up with the axes where `x0 * x1` changes
fastest, and a radius of `sqrt(2) * radius` so the corner
`(radius, radius)` is still inside the represented range.
*/

use ndarray::Array2;
use nef_graph::{
    ConnectionSpec, EnsembleArray, EnsembleOptions, GraphResult, Network, Node, NodeId, Neurons,
    Slice,
};
use tracing::debug;

/// Default magnitude bound of each input
pub const DEFAULT_RADIUS: f64 = 1.0;

/// Default weight of every term in the dot-product transform
pub const DEFAULT_DOT_PRODUCT_SCALE: f64 = 1.0;

/// Name of the decoded output registered on the ensemble array
pub const PRODUCT_OUTPUT: &str = "product";

const CORNERS: [[f64; 2]; 4] = [[1.0, 1.0], [1.0, -1.0], [-1.0, 1.0], [-1.0, -1.0]];

/// Diagonal encoders for a product ensemble
///
/// The four corners scaled by `1 / (sqrt(2) * radius)`, repeated
/// `n_neurons / 4 + 1` times and truncated to `n_neurons` rows. When
/// `n_neurons` is not a multiple of 4 the leading corners appear once more
/// than the trailing ones.
pub fn product_encoders(n_neurons: usize, radius: f64) -> Array2<f64> {
    let array_radius = std::f64::consts::SQRT_2 * radius;
    let tiles = n_neurons / 4 + 1;
    Array2::from_shape_fn((tiles * CORNERS.len(), 2), |(row, col)| {
        CORNERS[row % CORNERS.len()][col] / array_radius
    })
    .slice_move(ndarray::s![..n_neurons, ..])
}

/// Network computing `output_i = A_i * B_i`
#[derive(Debug, Clone)]
pub struct Product {
    a: NodeId,
    b: NodeId,
    output: NodeId,
    dimensions: usize,
    product: EnsembleArray,
}

impl Product {
    /// Build the product network into `net`
    ///
    /// `options` is forwarded to every sub-ensemble with its encoders and
    /// radius replaced.
    ///
    /// # Errors
    /// Propagates ensemble-array and connection errors unchanged, e.g. for
    /// zero `dimensions` or zero neurons
    pub fn new(
        net: &mut Network,
        neurons: Neurons,
        dimensions: usize,
        radius: f64,
        options: EnsembleOptions,
    ) -> GraphResult<Self> {
        let array_radius = std::f64::consts::SQRT_2 * radius;
        let encoders = product_encoders(neurons.n_neurons, radius);

        let mut product = EnsembleArray::new(
            net,
            PRODUCT_OUTPUT,
            neurons,
            dimensions,
            2,
            EnsembleOptions {
                encoders: Some(encoders),
                radius: array_radius,
                ..options
            },
        )?;

        let a = net.add_node(Node::passthrough("A", dimensions));
        let b = net.add_node(Node::passthrough("B", dimensions));
        let output = net.add_node(Node::passthrough("output", dimensions));

        net.connect(ConnectionSpec::new(a, product.input_slice(Slice::strided(0, 2))).filter(None))?;
        net.connect(ConnectionSpec::new(b, product.input_slice(Slice::strided(1, 2))).filter(None))?;

        let decoded = product.add_output(net, PRODUCT_OUTPUT, 1, |x| vec![x[0] * x[1]])?;
        net.connect(ConnectionSpec::new(decoded, output).filter(None))?;

        debug!(
            target: "nef-networks",
            "Built product network: {} dimensions, {} neurons per pair, radius {}",
            dimensions,
            neurons.n_neurons,
            radius
        );

        Ok(Self {
            a,
            b,
            output,
            dimensions,
            product,
        })
    }

    /// First input, `dimensions` wide
    pub fn a(&self) -> NodeId {
        self.a
    }

    /// Second input, `dimensions` wide
    pub fn b(&self) -> NodeId {
        self.b
    }

    /// Elementwise product, `dimensions` wide
    pub fn output(&self) -> NodeId {
        self.output
    }

    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    /// The underlying array of two-dimensional ensembles
    pub fn product(&self) -> &EnsembleArray {
        &self.product
    }

    /// `1 x dimensions` matrix of `scale`
    ///
    /// Used as the transform of a connection from [`output`](Self::output)
    /// into a one-dimensional target to compute `scale * Σ A_i B_i`.
    ///
    /// # Example
    /// ```
    /// use nef_graph::{EnsembleOptions, Network, Neurons};
    /// use nef_networks::Product;
    ///
    /// let mut net = Network::new("doc");
    /// let product = Product::new(&mut net, Neurons::lif(20), 3, 1.0, EnsembleOptions::default()).unwrap();
    /// let transform = product.dot_product_transform(0.5);
    /// assert_eq!(transform.dim(), (1, 3));
    /// assert!(transform.iter().all(|&w| w == 0.5));
    /// ```
    pub fn dot_product_transform(&self, scale: f64) -> Array2<f64> {
        Array2::from_elem((1, self.dimensions), scale)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nef_graph::ObjectId;

    #[test]
    fn test_encoders_tile_then_truncate() {
        let encoders = product_encoders(10, 1.0);
        assert_eq!(encoders.dim(), (10, 2));
        let scale = 1.0 / std::f64::consts::SQRT_2;
        for (i, row) in encoders.rows().into_iter().enumerate() {
            let corner = CORNERS[i % 4];
            assert!((row[0] - corner[0] * scale).abs() < 1e-12);
            assert!((row[1] - corner[1] * scale).abs() < 1e-12);
        }
    }

    #[test]
    fn test_encoder_rows_have_norm_inverse_radius() {
        for radius in [0.5, 1.0, 3.0] {
            for row in product_encoders(7, radius).rows() {
                let norm = (row[0] * row[0] + row[1] * row[1]).sqrt();
                assert!((norm - 1.0 / radius).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn test_empty_population_gives_empty_encoders() {
        assert_eq!(product_encoders(0, 1.0).dim(), (0, 2));
    }

    #[test]
    fn test_ports_and_wiring() {
        let mut net = Network::new("test");
        let product =
            Product::new(&mut net, Neurons::lif(16), 3, 1.0, EnsembleOptions::default()).unwrap();

        for port in [product.a(), product.b(), product.output()] {
            assert_eq!(net.node(port).unwrap().size_in, 3);
        }
        assert_eq!(net.node(product.a()).unwrap().label, "A");
        assert_eq!(net.node(product.b()).unwrap().label, "B");
        assert_eq!(net.node(product.output()).unwrap().label, "output");

        let from_a: Vec<_> = net.connections_from(ObjectId::Node(product.a())).collect();
        let from_b: Vec<_> = net.connections_from(ObjectId::Node(product.b())).collect();
        assert_eq!(from_a.len(), 1);
        assert_eq!(from_b.len(), 1);
        assert_eq!(from_a[0].1.target_indices, vec![0, 2, 4]);
        assert_eq!(from_b[0].1.target_indices, vec![1, 3, 5]);
        assert!(from_a[0].1.is_unfiltered());
        assert!(from_b[0].1.is_unfiltered());

        let decoded = product.product().output(PRODUCT_OUTPUT).unwrap();
        let into_output: Vec<_> = net
            .connections_into(ObjectId::Node(product.output()))
            .collect();
        assert_eq!(into_output.len(), 1);
        assert_eq!(into_output[0].1.source.object, ObjectId::Node(decoded));
        assert!(into_output[0].1.is_unfiltered());
    }

    #[test]
    fn test_sub_ensembles_get_product_encoders() {
        let mut net = Network::new("test");
        let product = Product::new(
            &mut net,
            Neurons::lif(10),
            2,
            2.0,
            EnsembleOptions::default().with_max_rates(100.0, 200.0),
        )
        .unwrap();

        let expected = product_encoders(10, 2.0);
        for &id in product.product().ensembles() {
            let ensemble = net.ensemble(id).unwrap();
            assert_eq!(ensemble.dimensions, 2);
            assert_eq!(ensemble.options.encoders.as_ref(), Some(&expected));
            assert!((ensemble.options.radius - 2.0 * std::f64::consts::SQRT_2).abs() < 1e-12);
            assert_eq!(ensemble.options.max_rates.high, 200.0);
        }
    }

    #[test]
    fn test_dot_product_transform_default_scale() {
        let mut net = Network::new("test");
        let product =
            Product::new(&mut net, Neurons::lif(8), 4, DEFAULT_RADIUS, EnsembleOptions::default())
                .unwrap();
        let transform = product.dot_product_transform(DEFAULT_DOT_PRODUCT_SCALE);
        assert_eq!(transform, Array2::ones((1, 4)));
    }
}

// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
Product Probe Tool

Builds a product network from `nef_configuration.toml` (or defaults), feeds it
two vectors and prints the decoded elementwise and dot products as JSON.

Usage:
  cargo run --bin product_probe -- <A> <B> [options]

  <A>, <B>            Comma-separated vectors of equal length, e.g. 0.5,-0.2
  --config <path>     Configuration file (default: search for nef_configuration.toml)
  --neurons <n>       Neurons per pair ensemble
  --neuron-type <t>   lif, rectified_linear or direct
  --radius <r>        Input radius
  --seed <s>          Network seed
  --scale <s>         Dot-product scale (default 1.0)
  --debug-<crate>     Debug logging for one crate (see --help)

Example:
  cargo run --bin product_probe -- 0.6,0.3 0.4,-0.5 --neurons 200 --seed 3
*/

use std::collections::HashMap;
use std::env;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use nef::prelude::*;
use nef_config::{apply_cli_overrides, apply_environment_overrides, validate_config, ConfigError};
use nef_networks::DEFAULT_DOT_PRODUCT_SCALE;
use nef_observability::debug_flags_help;
use serde_json::json;
use tracing::info;

struct ProbeArgs {
    a: Vec<f64>,
    b: Vec<f64>,
    config_path: Option<PathBuf>,
    scale: f64,
    overrides: HashMap<String, String>,
}

fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();
    if args.iter().any(|a| a == "--help" || a == "-h") {
        print_usage(&args[0]);
        return Ok(());
    }

    let probe = match parse_args(&args[1..]) {
        Ok(probe) => probe,
        Err(e) => {
            eprintln!("Error: {:#}\n", e);
            print_usage(&args[0]);
            std::process::exit(1);
        }
    };

    let config = resolve_config(probe.config_path.as_deref(), &probe.overrides)?;
    let _logging = init_logging(&parse_debug_flags(), &nef::logging_config(&config))?;

    let mut config = config;
    config.product.dimensions = probe.a.len();

    let mut net = nef::network_from_config("product_probe", &config);
    let product = nef::product_from_config(&mut net, &config)?;
    let dot = net.add_node(Node::passthrough("dot", 1));
    net.connect(
        ConnectionSpec::new(product.output(), dot)
            .transform(product.dot_product_transform(probe.scale))
            .filter(None),
    )?;

    info!(
        "Probing {}-D product with {} {} neurons per pair",
        config.product.dimensions, config.ensemble.n_neurons, config.ensemble.neuron_type
    );

    let evaluator = Evaluator::build(&net)?;
    let inputs = HashMap::from([(product.a(), probe.a.clone()), (product.b(), probe.b.clone())]);
    let values = evaluator.evaluate(&inputs)?;

    let decoded = values
        .node(product.output())
        .context("product output was not evaluated")?;
    let decoded_dot = values.node(dot).context("dot node was not evaluated")?[0];
    let expected: Vec<f64> = probe.a.iter().zip(&probe.b).map(|(x, y)| x * y).collect();
    let expected_dot = probe.scale * expected.iter().sum::<f64>();

    let report = json!({
        "a": probe.a,
        "b": probe.b,
        "neuron_type": config.ensemble.neuron_type,
        "n_neurons": config.ensemble.n_neurons,
        "radius": config.product.radius,
        "seed": config.system.seed,
        "product": decoded,
        "expected_product": expected,
        "dot_product": decoded_dot,
        "expected_dot_product": expected_dot,
    });
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn parse_args(args: &[String]) -> Result<ProbeArgs> {
    let mut positional = Vec::new();
    let mut config_path = None;
    let mut scale = DEFAULT_DOT_PRODUCT_SCALE;
    let mut overrides = HashMap::new();

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        let mut value = |flag: &str| {
            iter.next()
                .cloned()
                .with_context(|| format!("{} needs a value", flag))
        };
        match arg.as_str() {
            "--config" => config_path = Some(PathBuf::from(value(arg)?)),
            "--scale" => {
                scale = value(arg)?
                    .parse()
                    .with_context(|| format!("invalid {}", arg))?
            }
            "--neurons" => {
                overrides.insert("neurons".to_string(), value(arg)?);
            }
            "--neuron-type" => {
                overrides.insert("neuron_type".to_string(), value(arg)?);
            }
            "--radius" => {
                overrides.insert("radius".to_string(), value(arg)?);
            }
            "--seed" => {
                overrides.insert("seed".to_string(), value(arg)?);
            }
            flag if flag.starts_with("--debug-") => {}
            flag if flag.starts_with("--") => bail!("unknown option {}", flag),
            _ => positional.push(parse_vector(arg)?),
        }
    }

    let [a, b]: [Vec<f64>; 2] = positional
        .try_into()
        .map_err(|_| anyhow::anyhow!("expected exactly two vectors"))?;
    if a.len() != b.len() {
        bail!("vectors differ in length ({} vs {})", a.len(), b.len());
    }
    if a.is_empty() {
        bail!("vectors must not be empty");
    }
    Ok(ProbeArgs {
        a,
        b,
        config_path,
        scale,
        overrides,
    })
}

fn parse_vector(text: &str) -> Result<Vec<f64>> {
    text.split(',')
        .enumerate()
        .map(|(i, part)| {
            let part = part.trim();
            if part.is_empty() {
                bail!("empty component {} in '{}'", i, text);
            }
            part.parse::<f64>()
                .with_context(|| format!("invalid number '{}' in '{}'", part, text))
        })
        .collect()
}

/// Configuration file with overrides, or defaults with overrides when no file exists
fn resolve_config(
    path: Option<&std::path::Path>,
    overrides: &HashMap<String, String>,
) -> Result<NefConfig> {
    match load_config(path, Some(overrides)) {
        Ok(config) => Ok(config),
        Err(ConfigError::FileNotFound(_)) if path.is_none() => {
            let mut config = NefConfig::default();
            apply_environment_overrides(&mut config);
            apply_cli_overrides(&mut config, overrides);
            validate_config(&config)?;
            Ok(config)
        }
        Err(e) => Err(e.into()),
    }
}

fn print_usage(program: &str) {
    eprintln!("Usage: {} <A> <B> [options]", program);
    eprintln!();
    eprintln!("  <A>, <B>            Comma-separated vectors of equal length");
    eprintln!("  --config <path>     Configuration file");
    eprintln!("  --neurons <n>       Neurons per pair ensemble");
    eprintln!("  --neuron-type <t>   lif, rectified_linear or direct");
    eprintln!("  --radius <r>        Input radius");
    eprintln!("  --seed <s>          Network seed");
    eprintln!("  --scale <s>         Dot-product scale");
    eprintln!();
    eprintln!("{}", debug_flags_help());
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_vector() {
        assert_eq!(parse_vector("0.5, -0.2,1").unwrap(), vec![0.5, -0.2, 1.0]);
        assert!(parse_vector("0.5,x").is_err());
    }

    #[test]
    fn test_empty_components_rejected() {
        for text in ["0.5,,0.3", ",0.5", "0.5,", ""] {
            let err = parse_vector(text).unwrap_err();
            assert!(err.to_string().contains("empty component"), "{}: {}", text, err);
        }
    }

    #[test]
    fn test_parse_args() {
        let probe = parse_args(&args(&["0.6,0.3", "0.4,-0.5", "--neurons", "200", "--scale", "2"])).unwrap();
        assert_eq!(probe.a, vec![0.6, 0.3]);
        assert_eq!(probe.b, vec![0.4, -0.5]);
        assert_eq!(probe.scale, 2.0);
        assert_eq!(probe.overrides.get("neurons").map(String::as_str), Some("200"));

        assert!(parse_args(&args(&["0.5,,0.3", "0.1,0.2"])).is_err());
        assert!(parse_args(&args(&["0.5", "0.1,0.2"])).is_err());
        assert!(parse_args(&args(&["0.5"])).is_err());
    }
}

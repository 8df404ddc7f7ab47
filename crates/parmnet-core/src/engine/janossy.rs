//! Janossy pooling: per-kind symmetrized feed-forward stacks that turn tuples
//! of atom embeddings into named parameter arrays.
//!
//! Each kind runs its tuples through the hidden stack once per element of its
//! symmetry group and sums the branches, so tuples related by the group get
//! identical outputs:
//!
//! | kind     | branches                                   |
//! |----------|--------------------------------------------|
//! | bond     | `(0,1)`, `(1,0)`                           |
//! | angle    | `(0,1,2)`, `(2,1,0)`                       |
//! | proper   | `(0,1,2,3)` only                           |
//! | improper | [`IMPROPER_PERMUTATIONS`] (atom 0 central) |
//!
//! Branch sums are taken element-wise over the values sorted with
//! `f64::total_cmp`, which makes the result independent of branch order down
//! to the last bit.

use super::config::PoolingConfig;
use super::error::ParametrizationError;
use crate::core::graph::heterograph::{Heterograph, InteractionKind, InteractionTuples};
use crate::core::models::parameters::{KindParameters, ParameterSet};
use crate::core::nn::dense::{Dense, FeedForward};
use nalgebra::DMatrix;
use rand::Rng;
use std::collections::BTreeMap;
use tracing::{debug, instrument, trace};

/// Cyclic permutations of the three outer atoms of an improper torsion.
pub const IMPROPER_PERMUTATIONS: [[usize; 4]; 3] = [[0, 1, 2, 3], [0, 2, 3, 1], [0, 3, 1, 2]];

/// Initial bias of heads whose name contains `"coefficients"`.
pub const COEFFICIENT_BIAS_INIT: f64 = -5.0;

const BOND_GROUP: &[&[usize]] = &[&[0, 1], &[1, 0]];
const ANGLE_GROUP: &[&[usize]] = &[&[0, 1, 2], &[2, 1, 0]];
const PROPER_GROUP: &[&[usize]] = &[&[0, 1, 2, 3]];
const IMPROPER_GROUP: &[&[usize]] = &[&[0, 1, 2, 3], &[0, 2, 3, 1], &[0, 3, 1, 2]];

/// Orderings of a tuple that are summed before the parameter heads.
pub fn symmetry_group(kind: InteractionKind) -> &'static [&'static [usize]] {
    match kind {
        InteractionKind::Bond => BOND_GROUP,
        InteractionKind::Angle => ANGLE_GROUP,
        InteractionKind::Proper => PROPER_GROUP,
        InteractionKind::Improper => IMPROPER_GROUP,
    }
}

fn head_bias(name: &str) -> f64 {
    if name.contains("coefficients") {
        COEFFICIENT_BIAS_INIT
    } else {
        0.0
    }
}

/// Concatenated embeddings of every tuple, atoms taken in `permutation` order:
/// row `t` is `[h[a_p0], h[a_p1], ...]`.
fn gather_tuples(
    embeddings: &DMatrix<f64>,
    tuples: &InteractionTuples,
    permutation: &[usize],
) -> DMatrix<f64> {
    let width = embeddings.ncols();
    let arity = tuples.arity();
    let flat = tuples.as_flat();
    DMatrix::from_fn(tuples.len(), arity * width, |row, col| {
        let atom = flat[row * arity + permutation[col / width]];
        embeddings[(atom, col % width)]
    })
}

fn symmetric_sum(branches: &[DMatrix<f64>]) -> DMatrix<f64> {
    let Some(first) = branches.first() else {
        return DMatrix::zeros(0, 0);
    };
    if branches.len() == 1 {
        return first.clone();
    }
    let mut values = Vec::with_capacity(branches.len());
    DMatrix::from_fn(first.nrows(), first.ncols(), |row, col| {
        values.clear();
        values.extend(branches.iter().map(|b| b[(row, col)]));
        values.sort_by(f64::total_cmp);
        values.iter().sum()
    })
}

/// Hidden stack and parameter heads of one interaction kind.
#[derive(Debug, Clone, PartialEq)]
pub struct KindPooling {
    kind: InteractionKind,
    embedding_features: usize,
    hidden: FeedForward,
    heads: BTreeMap<String, Dense>,
}

impl KindPooling {
    pub fn new<R: Rng + ?Sized>(
        kind: InteractionKind,
        embedding_features: usize,
        config: &PoolingConfig,
        parameters: &BTreeMap<String, usize>,
        rng: &mut R,
    ) -> Self {
        let in_features = kind.arity() * embedding_features;
        let hidden = FeedForward::new(
            in_features,
            config.hidden_features,
            config.depth,
            config.activation,
            rng,
        );
        let hidden_out = hidden.out_features(in_features);
        let heads = parameters
            .iter()
            .map(|(name, &dim)| {
                (
                    name.clone(),
                    Dense::with_bias(hidden_out, dim, head_bias(name), rng),
                )
            })
            .collect();
        Self {
            kind,
            embedding_features,
            hidden,
            heads,
        }
    }

    /// Assembles a kind module from injected weights. The hidden stack must
    /// chain from `kind.arity() * embedding_features` columns and every head
    /// must take the stack's output width.
    pub fn from_parts(
        kind: InteractionKind,
        embedding_features: usize,
        hidden: FeedForward,
        heads: BTreeMap<String, Dense>,
    ) -> Result<Self, ParametrizationError> {
        let mut width = kind.arity() * embedding_features;
        let layers = hidden.layers().iter().chain(heads.values());
        for (idx, layer) in layers.enumerate() {
            if layer.in_features() != width {
                return Err(ParametrizationError::PoolingWidth {
                    kind,
                    expected: width,
                    found: layer.in_features(),
                });
            }
            if idx < hidden.layers().len() {
                width = layer.out_features();
            }
        }
        Ok(Self {
            kind,
            embedding_features,
            hidden,
            heads,
        })
    }

    pub fn kind(&self) -> InteractionKind {
        self.kind
    }

    pub fn embedding_features(&self) -> usize {
        self.embedding_features
    }

    pub fn hidden(&self) -> &FeedForward {
        &self.hidden
    }

    pub fn heads(&self) -> &BTreeMap<String, Dense> {
        &self.heads
    }

    pub fn forward(
        &self,
        embeddings: &DMatrix<f64>,
        tuples: InteractionTuples,
    ) -> Result<KindParameters, ParametrizationError> {
        if tuples.is_empty() {
            let values = self
                .heads
                .iter()
                .map(|(name, head)| (name.clone(), DMatrix::zeros(0, head.out_features())))
                .collect();
            return Ok(KindParameters::new(tuples, values));
        }

        let branches = symmetry_group(self.kind)
            .iter()
            .map(|permutation| {
                self.hidden
                    .forward(&gather_tuples(embeddings, &tuples, permutation))
            })
            .collect::<Result<Vec<_>, _>>()?;
        let pooled = symmetric_sum(&branches);

        let values = self
            .heads
            .iter()
            .map(|(name, head)| head.forward(&pooled).map(|v| (name.clone(), v)))
            .collect::<Result<BTreeMap<_, _>, _>>()?;
        Ok(KindParameters::new(tuples, values))
    }
}

/// Per-kind pooling modules, built once from the parameter schema.
#[derive(Debug, Clone, PartialEq)]
pub struct JanossyPooling {
    embedding_features: usize,
    kinds: BTreeMap<InteractionKind, KindPooling>,
}

impl JanossyPooling {
    pub fn new<R: Rng + ?Sized>(
        embedding_features: usize,
        config: &PoolingConfig,
        rng: &mut R,
    ) -> Self {
        let kinds = config
            .schema
            .iter()
            .map(|(kind, parameters)| {
                (
                    kind,
                    KindPooling::new(kind, embedding_features, config, parameters, rng),
                )
            })
            .collect();
        Self {
            embedding_features,
            kinds,
        }
    }

    /// Combines separately built kind modules. Each must be keyed by its own
    /// kind and read embeddings of width `embedding_features`.
    pub fn from_parts(
        embedding_features: usize,
        kinds: BTreeMap<InteractionKind, KindPooling>,
    ) -> Result<Self, ParametrizationError> {
        for (&key, module) in &kinds {
            if module.kind() != key {
                return Err(ParametrizationError::KindMismatch {
                    key,
                    found: module.kind(),
                });
            }
            if module.embedding_features() != embedding_features {
                return Err(ParametrizationError::EmbeddingWidth {
                    expected: embedding_features,
                    found: module.embedding_features(),
                });
            }
        }
        Ok(Self {
            embedding_features,
            kinds,
        })
    }

    pub fn embedding_features(&self) -> usize {
        self.embedding_features
    }

    pub fn get(&self, kind: InteractionKind) -> Option<&KindPooling> {
        self.kinds.get(&kind)
    }

    /// Predicts parameters for every kind in the schema.
    ///
    /// Schema kinds missing from the heterograph yield empty `[0, dim]`
    /// arrays. A heterograph kind with tuples but no schema entry is an error,
    /// as is any tuple atom index `>= N`.
    #[instrument(skip_all, name = "janossy_pooling")]
    pub fn pool(
        &self,
        heterograph: &Heterograph,
        embeddings: &DMatrix<f64>,
    ) -> Result<ParameterSet, ParametrizationError> {
        if embeddings.ncols() != self.embedding_features {
            return Err(ParametrizationError::EmbeddingWidth {
                expected: self.embedding_features,
                found: embeddings.ncols(),
            });
        }
        if let Some(kind) = heterograph
            .kinds()
            .find(|&k| heterograph.num_tuples(k) > 0 && !self.kinds.contains_key(&k))
        {
            return Err(ParametrizationError::SchemaMismatch(kind));
        }

        let num_atoms = embeddings.nrows();
        let mut parameters = ParameterSet::new();
        for (&kind, module) in &self.kinds {
            let tuples = heterograph
                .tuples(kind)
                .cloned()
                .unwrap_or_else(|| InteractionTuples::empty(kind));
            check_atoms(&tuples, num_atoms)?;

            trace!(%kind, tuples = tuples.len(), "Pooling interaction kind.");
            parameters.insert(kind, module.forward(embeddings, tuples)?);
        }
        debug!(kinds = self.kinds.len(), "Pooled parameters.");
        Ok(parameters)
    }
}

fn check_atoms(tuples: &InteractionTuples, num_atoms: usize) -> Result<(), ParametrizationError> {
    for (tuple, atoms) in tuples.iter().enumerate() {
        if let Some(&atom) = atoms.iter().find(|&&a| a >= num_atoms) {
            return Err(ParametrizationError::AtomOutOfRange {
                kind: tuples.kind(),
                tuple,
                atom,
                num_atoms,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::nn::activation::Activation;
    use crate::engine::config::ParameterSchema;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn pooling_config(schema: ParameterSchema) -> PoolingConfig {
        PoolingConfig {
            hidden_features: 6,
            depth: 2,
            activation: Activation::Elu,
            schema,
        }
    }

    fn embeddings(rows: usize, cols: usize) -> DMatrix<f64> {
        DMatrix::from_fn(rows, cols, |r, c| ((r * cols + c) as f64 * 0.37).sin())
    }

    #[test]
    fn improper_group_matches_cyclic_permutations() {
        let group: Vec<Vec<usize>> = symmetry_group(InteractionKind::Improper)
            .iter()
            .map(|p| p.to_vec())
            .collect();
        let expected: Vec<Vec<usize>> = IMPROPER_PERMUTATIONS.iter().map(|p| p.to_vec()).collect();
        assert_eq!(group, expected);
        assert_eq!(symmetry_group(InteractionKind::Proper).len(), 1);
    }

    #[test]
    fn gather_tuples_follows_permutation() {
        let h = DMatrix::from_row_slice(3, 1, &[10.0, 20.0, 30.0]);
        let tuples = InteractionTuples::from_tuples(InteractionKind::Angle, &[[0, 1, 2]]).unwrap();
        assert_eq!(
            gather_tuples(&h, &tuples, &[2, 1, 0]),
            DMatrix::from_row_slice(1, 3, &[30.0, 20.0, 10.0])
        );
    }

    #[test]
    fn symmetric_sum_ignores_branch_order() {
        let a = DMatrix::from_element(1, 1, 0.1);
        let b = DMatrix::from_element(1, 1, 1e16);
        let c = DMatrix::from_element(1, 1, -1e16);
        let forward = symmetric_sum(&[a.clone(), b.clone(), c.clone()]);
        let shuffled = symmetric_sum(&[b, c, a]);
        assert_eq!(forward[(0, 0)].to_bits(), shuffled[(0, 0)].to_bits());
    }

    #[test]
    fn coefficient_heads_start_with_negative_bias() {
        let mut rng = StdRng::seed_from_u64(1);
        let schema = ParameterSchema::empty()
            .with(InteractionKind::Bond, "coefficients", 2)
            .with(InteractionKind::Bond, "scale", 1);
        let pooling = JanossyPooling::new(4, &pooling_config(schema), &mut rng);
        let heads = pooling.get(InteractionKind::Bond).unwrap().heads();

        assert!(heads["coefficients"].bias().iter().all(|&b| b == -5.0));
        assert!(heads["scale"].bias().iter().all(|&b| b == 0.0));
        assert_eq!(heads["coefficients"].in_features(), 6);
    }

    #[test]
    fn missing_schema_kind_in_heterograph_is_empty() {
        let mut rng = StdRng::seed_from_u64(1);
        let pooling = JanossyPooling::new(3, &pooling_config(ParameterSchema::default()), &mut rng);
        let hetero = Heterograph::new().with_tuples(
            InteractionTuples::from_tuples(InteractionKind::Bond, &[[0, 1]]).unwrap(),
        );

        let params = pooling.pool(&hetero, &embeddings(2, 3)).unwrap();
        assert_eq!(params[InteractionKind::Bond]["coefficients"].shape(), (1, 2));
        assert_eq!(params[InteractionKind::Angle]["coefficients"].shape(), (0, 2));
        assert_eq!(params[InteractionKind::Proper]["k"].shape(), (0, 6));
        assert_eq!(params[InteractionKind::Improper]["k"].shape(), (0, 6));
    }

    #[test]
    fn tuples_without_schema_entry_are_rejected() {
        let mut rng = StdRng::seed_from_u64(1);
        let schema = ParameterSchema::default().without(InteractionKind::Improper);
        let pooling = JanossyPooling::new(3, &pooling_config(schema), &mut rng);
        let hetero = Heterograph::new().with_tuples(
            InteractionTuples::from_tuples(InteractionKind::Improper, &[[0, 1, 2, 3]]).unwrap(),
        );

        assert_eq!(
            pooling.pool(&hetero, &embeddings(4, 3)).unwrap_err(),
            ParametrizationError::SchemaMismatch(InteractionKind::Improper)
        );
    }

    #[test]
    fn empty_kind_without_schema_entry_is_accepted() {
        let mut rng = StdRng::seed_from_u64(1);
        let schema = ParameterSchema::empty().with(InteractionKind::Bond, "coefficients", 2);
        let pooling = JanossyPooling::new(3, &pooling_config(schema), &mut rng);
        let hetero = Heterograph::new()
            .with_tuples(InteractionTuples::from_tuples(InteractionKind::Bond, &[[0, 1]]).unwrap())
            .with_tuples(InteractionTuples::empty(InteractionKind::Proper));

        let params = pooling.pool(&hetero, &embeddings(2, 3)).unwrap();
        assert_eq!(params.kinds().collect::<Vec<_>>(), vec![InteractionKind::Bond]);
    }

    #[test]
    fn out_of_range_atoms_and_wrong_widths_are_rejected() {
        let mut rng = StdRng::seed_from_u64(1);
        let pooling = JanossyPooling::new(3, &pooling_config(ParameterSchema::default()), &mut rng);
        let hetero = Heterograph::new().with_tuples(
            InteractionTuples::from_tuples(InteractionKind::Bond, &[[0, 1], [1, 5]]).unwrap(),
        );

        assert_eq!(
            pooling.pool(&hetero, &embeddings(2, 3)).unwrap_err(),
            ParametrizationError::AtomOutOfRange {
                kind: InteractionKind::Bond,
                tuple: 1,
                atom: 5,
                num_atoms: 2
            }
        );
        assert_eq!(
            pooling.pool(&hetero, &embeddings(6, 4)).unwrap_err(),
            ParametrizationError::EmbeddingWidth {
                expected: 3,
                found: 4
            }
        );
    }

    #[test]
    fn proper_torsions_are_order_sensitive() {
        let mut rng = StdRng::seed_from_u64(9);
        let pooling = JanossyPooling::new(3, &pooling_config(ParameterSchema::default()), &mut rng);
        let hetero = Heterograph::new().with_tuples(
            InteractionTuples::from_tuples(InteractionKind::Proper, &[[0, 1, 2, 3], [3, 2, 1, 0]])
                .unwrap(),
        );

        let params = pooling.pool(&hetero, &embeddings(4, 3)).unwrap();
        let k = &params[InteractionKind::Proper]["k"];
        assert_ne!(k.row(0), k.row(1));
    }

    #[test]
    fn from_parts_rejects_module_under_another_kind() {
        let mut rng = StdRng::seed_from_u64(4);
        let config = pooling_config(ParameterSchema::default());
        let bond = KindPooling::new(
            InteractionKind::Bond,
            3,
            &config,
            config.schema.get(InteractionKind::Bond).unwrap(),
            &mut rng,
        );
        let mut kinds = BTreeMap::new();
        kinds.insert(InteractionKind::Proper, bond);

        assert_eq!(
            JanossyPooling::from_parts(3, kinds).unwrap_err(),
            ParametrizationError::KindMismatch {
                key: InteractionKind::Proper,
                found: InteractionKind::Bond
            }
        );
    }

    #[test]
    fn from_parts_rejects_module_for_other_embedding_width() {
        let mut rng = StdRng::seed_from_u64(4);
        let pooling = JanossyPooling::new(3, &pooling_config(ParameterSchema::default()), &mut rng);
        let angle = pooling.get(InteractionKind::Angle).unwrap().clone();
        let mut kinds = BTreeMap::new();
        kinds.insert(InteractionKind::Angle, angle);

        assert_eq!(
            JanossyPooling::from_parts(5, kinds).unwrap_err(),
            ParametrizationError::EmbeddingWidth {
                expected: 5,
                found: 3
            }
        );
    }

    #[test]
    fn kind_from_parts_checks_hidden_and_head_widths() {
        let mut rng = StdRng::seed_from_u64(4);
        // A bond stack reading 2 * 3 columns, reused for a four-atom kind.
        let hidden = FeedForward::new(6, 5, 2, Activation::Elu, &mut rng);
        let mut heads = BTreeMap::new();
        heads.insert("k".to_string(), Dense::new(5, 6, &mut rng));

        assert_eq!(
            KindPooling::from_parts(InteractionKind::Proper, 3, hidden.clone(), heads.clone())
                .unwrap_err(),
            ParametrizationError::PoolingWidth {
                kind: InteractionKind::Proper,
                expected: 12,
                found: 6
            }
        );

        let mut wide_head = BTreeMap::new();
        wide_head.insert("k".to_string(), Dense::new(7, 6, &mut rng));
        assert_eq!(
            KindPooling::from_parts(InteractionKind::Bond, 3, hidden.clone(), wide_head)
                .unwrap_err(),
            ParametrizationError::PoolingWidth {
                kind: InteractionKind::Bond,
                expected: 5,
                found: 7
            }
        );

        let module = KindPooling::from_parts(InteractionKind::Bond, 3, hidden, heads).unwrap();
        let mut kinds = BTreeMap::new();
        kinds.insert(InteractionKind::Bond, module);
        let pooling = JanossyPooling::from_parts(3, kinds).unwrap();
        let hetero = Heterograph::new().with_tuples(
            InteractionTuples::from_tuples(InteractionKind::Bond, &[[0, 1]]).unwrap(),
        );
        let params = pooling.pool(&hetero, &embeddings(2, 3)).unwrap();
        assert_eq!(params[InteractionKind::Bond]["k"].shape(), (1, 6));
    }
}

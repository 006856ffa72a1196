//! Fixed parameter schema for training configuration files

use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

/// Scalar kind a recognized parameter is coerced to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
    Integer,
    Float,
    String,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueKind::Integer => write!(f, "integer"),
            ValueKind::Float => write!(f, "float"),
            ValueKind::String => write!(f, "string"),
        }
    }
}

impl FromStr for ValueKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "integer" | "int" => Ok(ValueKind::Integer),
            "float" => Ok(ValueKind::Float),
            "string" | "str" => Ok(ValueKind::String),
            _ => Err(format!("Invalid value kind: {}", s)),
        }
    }
}

/// Result of classifying a parameter name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    Known(ValueKind),
    Unknown,
}

const INTEGER_PARAMS: &[&str] = &[
    "ntraining",
    "nvalidation",
    "nfeatures",
    "nclasses",
    "nchannels",
    "nlayers",
    "braid_cfactor",
    "braid_cfactor0",
    "braid_maxlevels",
    "braid_mincoarse",
    "braid_maxiter",
    "braid_printlevel",
    "braid_accesslevel",
    "braid_setskip",
    "braid_fmg",
    "braid_nrelax",
    "braid_nrelax0",
    "ls_maxiter",
    "lbfgs_stages",
    "nbatch",
    "validationlevel",
];

const FLOAT_PARAMS: &[&str] = &[
    "T",
    "braid_abstol",
    "braid_adjtol",
    "gamma_tik",
    "gamma_ddt",
    "gamma_class",
    "stepsize",
    "gtol",
    "ls_factor",
    "weights_open_init",
    "weights_init",
    "weights_class_init",
];

const STRING_PARAMS: &[&str] = &[
    "activation",
    "datafolder",
    "ftrain_ex",
    "ftrain_labels",
    "fval_ex",
    "fval_labels",
    "weightsopenfile",
    "weightsclassificationfile",
    "network_type",
    "type_openlayer",
    "batch_type",
    "stepsize_type",
    "optim_maxiter",
    "hessian_approx",
];

/// Name to kind lookup over the recognized training parameters.
///
/// The registry is immutable; [`SchemaRegistry::global`] hands out a shared
/// instance built on first use.
#[derive(Debug)]
pub struct SchemaRegistry {
    kinds: HashMap<&'static str, ValueKind>,
}

impl SchemaRegistry {
    pub fn new() -> Self {
        let mut kinds = HashMap::with_capacity(
            INTEGER_PARAMS.len() + FLOAT_PARAMS.len() + STRING_PARAMS.len(),
        );

        for (names, kind) in [
            (INTEGER_PARAMS, ValueKind::Integer),
            (FLOAT_PARAMS, ValueKind::Float),
            (STRING_PARAMS, ValueKind::String),
        ] {
            for name in names {
                kinds.insert(*name, kind);
            }
        }

        Self { kinds }
    }

    pub fn global() -> &'static SchemaRegistry {
        static REGISTRY: OnceLock<SchemaRegistry> = OnceLock::new();
        REGISTRY.get_or_init(SchemaRegistry::new)
    }

    /// Classify a parameter name. Matching is exact and case-sensitive.
    pub fn classify(&self, name: &str) -> Classification {
        match self.kinds.get(name) {
            Some(kind) => Classification::Known(*kind),
            None => Classification::Unknown,
        }
    }

    pub fn kind_of(&self, name: &str) -> Option<ValueKind> {
        self.kinds.get(name).copied()
    }

    pub fn is_known(&self, name: &str) -> bool {
        self.kinds.contains_key(name)
    }

    /// Recognized parameter names of one kind, in declaration order
    pub fn parameters(&self, kind: ValueKind) -> &'static [&'static str] {
        match kind {
            ValueKind::Integer => INTEGER_PARAMS,
            ValueKind::Float => FLOAT_PARAMS,
            ValueKind::String => STRING_PARAMS,
        }
    }

    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }
}

impl Default for SchemaRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_classify_each_kind() {
        let registry = SchemaRegistry::new();

        assert_eq!(registry.classify("nlayers"), Classification::Known(ValueKind::Integer));
        assert_eq!(registry.classify("gamma_tik"), Classification::Known(ValueKind::Float));
        assert_eq!(registry.classify("datafolder"), Classification::Known(ValueKind::String));
        assert_eq!(registry.classify("T"), Classification::Known(ValueKind::Float));
    }

    #[test]
    fn test_classify_unknown_and_case_sensitive() {
        let registry = SchemaRegistry::new();

        assert_eq!(registry.classify("mystery_key"), Classification::Unknown);
        assert_eq!(registry.classify(""), Classification::Unknown);
        assert_eq!(registry.classify("t"), Classification::Unknown);
        assert_eq!(registry.classify("NLAYERS"), Classification::Unknown);
    }

    #[test]
    fn test_optim_maxiter_is_a_string() {
        // The training driver treats it as a string option despite the name
        let registry = SchemaRegistry::global();
        assert_eq!(registry.kind_of("optim_maxiter"), Some(ValueKind::String));
    }

    #[test]
    fn test_kind_sets_are_disjoint() {
        let registry = SchemaRegistry::new();
        let total = INTEGER_PARAMS.len() + FLOAT_PARAMS.len() + STRING_PARAMS.len();

        let unique: HashSet<_> = INTEGER_PARAMS
            .iter()
            .chain(FLOAT_PARAMS)
            .chain(STRING_PARAMS)
            .collect();

        assert_eq!(unique.len(), total);
        assert_eq!(registry.len(), total);
    }

    #[test]
    fn test_value_kind_parsing() {
        assert_eq!(ValueKind::from_str("integer").unwrap(), ValueKind::Integer);
        assert_eq!(ValueKind::from_str("FLOAT").unwrap(), ValueKind::Float);
        assert_eq!(ValueKind::from_str("str").unwrap(), ValueKind::String);
        assert!(ValueKind::from_str("bool").is_err());
    }
}

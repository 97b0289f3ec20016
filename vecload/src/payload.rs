//! Request bodies posted to the vector endpoint.
//!
//! Every user draws two random vectors of [`VECTOR_LEN`] values once, and serializes three
//! prefixes of them. The resulting strings are reused for the lifetime of the user.
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use vecload_core::VECTOR_LEN;

/// Vector operation requested from the server.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Op {
    Dot,
    Sub,
    Add,
}

/// Owned form of a request body, mostly useful for decoding what was sent.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Payload {
    pub a: Vec<f64>,
    pub b: Vec<f64>,
    pub op: Op,
}

#[derive(Serialize)]
struct PayloadRef<'a> {
    a: &'a [f64],
    b: &'a [f64],
    op: Op,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PayloadSize {
    Small,
    Medium,
    Large,
}

impl PayloadSize {
    pub const ALL: [PayloadSize; 3] = [PayloadSize::Small, PayloadSize::Medium, PayloadSize::Large];

    /// Number of elements in each of the two vectors.
    pub fn len(self) -> usize {
        match self {
            PayloadSize::Small => 10,
            PayloadSize::Medium => 100,
            PayloadSize::Large => VECTOR_LEN,
        }
    }

    pub fn op(self) -> Op {
        match self {
            PayloadSize::Small => Op::Dot,
            PayloadSize::Medium => Op::Sub,
            PayloadSize::Large => Op::Add,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PayloadSize::Small => "small",
            PayloadSize::Medium => "medium",
            PayloadSize::Large => "large",
        }
    }
}

impl fmt::Display for PayloadSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The three serialized payloads of one user.
#[derive(Clone, Debug)]
pub struct PayloadSet {
    small: String,
    medium: String,
    large: String,
}

impl PayloadSet {
    pub fn generate<R: Rng + ?Sized>(rng: &mut R) -> Result<Self, serde_json::Error> {
        let a = random_vector(rng, VECTOR_LEN);
        let b = random_vector(rng, VECTOR_LEN);

        Ok(Self {
            small: serialize(&a, &b, PayloadSize::Small)?,
            medium: serialize(&a, &b, PayloadSize::Medium)?,
            large: serialize(&a, &b, PayloadSize::Large)?,
        })
    }

    pub fn get(&self, size: PayloadSize) -> &str {
        match size {
            PayloadSize::Small => &self.small,
            PayloadSize::Medium => &self.medium,
            PayloadSize::Large => &self.large,
        }
    }
}

fn random_vector<R: Rng + ?Sized>(rng: &mut R, len: usize) -> Vec<f64> {
    // `Standard` samples f64 from [0, 1)
    (0..len).map(|_| rng.gen::<f64>()).collect()
}

fn serialize(a: &[f64], b: &[f64], size: PayloadSize) -> Result<String, serde_json::Error> {
    let len = size.len();
    serde_json::to_string(&PayloadRef {
        a: &a[..len],
        b: &b[..len],
        op: size.op(),
    })
}

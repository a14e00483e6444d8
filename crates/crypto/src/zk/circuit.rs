//! Backend-agnostic circuit descriptions and input assignments.
//!
//! A [`CircuitDescription`] names the circuit's input slots, how each slot is
//! packed into field elements, and the relations that must hold between them.
//! Backends compile descriptions into constraint systems; callers never build
//! constraint systems directly.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use photoproof_core::{Error, Result};

/// How a byte slot is packed into public field elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FieldEncoding {
    /// 32 bytes as two 128-bit halves (hi, lo). Lossless.
    SplitHalves,
    /// The bytes reduced mod p, followed by a Poseidon commitment over
    /// lossless limbs of the same bytes.
    ScalarCommitment,
}

impl FieldEncoding {
    /// Number of field elements the slot occupies in the public witness.
    pub fn element_count(self) -> usize {
        2
    }

    fn tag(self) -> u8 {
        match self {
            FieldEncoding::SplitHalves => 1,
            FieldEncoding::ScalarCommitment => 2,
        }
    }
}

/// A named input of fixed byte length.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputSlot {
    pub name: String,
    pub len: usize,
    /// Packing for public slots; secret slots are carried as raw bytes.
    pub encoding: Option<FieldEncoding>,
}

impl InputSlot {
    pub fn public(name: impl Into<String>, len: usize, encoding: FieldEncoding) -> Self {
        Self {
            name: name.into(),
            len,
            encoding: Some(encoding),
        }
    }

    pub fn secret(name: impl Into<String>, len: usize) -> Self {
        Self {
            name: name.into(),
            len,
            encoding: None,
        }
    }
}

/// A relation between slots, referenced by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Constraint {
    /// Ed25519 signature over `message` under `public_key` is valid.
    SignatureValid {
        public_key: String,
        message: String,
        signature: String,
    },
    /// The value assigned to `slot` equals the bound parameter `parameter`.
    BoundEquals { slot: String, parameter: String },
}

impl Constraint {
    fn referenced_slots(&self) -> Vec<&str> {
        match self {
            Constraint::SignatureValid {
                public_key,
                message,
                signature,
            } => vec![public_key.as_str(), message.as_str(), signature.as_str()],
            Constraint::BoundEquals { slot, .. } => vec![slot.as_str()],
        }
    }

    fn tag(&self) -> u8 {
        match self {
            Constraint::SignatureValid { .. } => 1,
            Constraint::BoundEquals { .. } => 2,
        }
    }
}

/// Everything a backend needs to compile a circuit.
///
/// `bound_parameters` are constants fixed into the circuit itself (for
/// example the signer key of a per-authority circuit); they change the
/// circuit identity and therefore the keys produced by setup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CircuitDescription {
    pub label: String,
    pub public_inputs: Vec<InputSlot>,
    pub secret_inputs: Vec<InputSlot>,
    pub constraints: Vec<Constraint>,
    pub bound_parameters: BTreeMap<String, Vec<u8>>,
}

impl CircuitDescription {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            public_inputs: Vec::new(),
            secret_inputs: Vec::new(),
            constraints: Vec::new(),
            bound_parameters: BTreeMap::new(),
        }
    }

    pub fn with_public(mut self, name: &str, len: usize, encoding: FieldEncoding) -> Self {
        self.public_inputs.push(InputSlot::public(name, len, encoding));
        self
    }

    pub fn with_secret(mut self, name: &str, len: usize) -> Self {
        self.secret_inputs.push(InputSlot::secret(name, len));
        self
    }

    pub fn with_constraint(mut self, constraint: Constraint) -> Self {
        self.constraints.push(constraint);
        self
    }

    pub fn with_bound_parameter(mut self, name: &str, value: Vec<u8>) -> Self {
        self.bound_parameters.insert(name.to_string(), value);
        self
    }

    /// Look up a slot by name across public and secret inputs.
    pub fn slot(&self, name: &str) -> Option<&InputSlot> {
        self.public_inputs
            .iter()
            .chain(self.secret_inputs.iter())
            .find(|slot| slot.name == name)
    }

    /// Number of field elements in the public witness.
    pub fn public_len(&self) -> usize {
        self.public_inputs
            .iter()
            .filter_map(|slot| slot.encoding)
            .map(FieldEncoding::element_count)
            .sum()
    }

    /// Structural checks every backend applies before compiling.
    pub fn validate(&self) -> Result<()> {
        if self.label.is_empty() {
            return Err(Error::CircuitCompile("Circuit label is empty".to_string()));
        }
        if self.public_inputs.is_empty() {
            return Err(Error::CircuitCompile(format!(
                "Circuit '{}' declares no public inputs",
                self.label
            )));
        }

        let mut names = BTreeSet::new();
        for slot in &self.public_inputs {
            if slot.encoding.is_none() {
                return Err(Error::CircuitCompile(format!(
                    "Public slot '{}' has no field encoding",
                    slot.name
                )));
            }
            if slot.encoding == Some(FieldEncoding::SplitHalves) && slot.len != 32 {
                return Err(Error::CircuitCompile(format!(
                    "Slot '{}' uses split-halves packing but is {} bytes",
                    slot.name, slot.len
                )));
            }
        }
        for slot in self.public_inputs.iter().chain(self.secret_inputs.iter()) {
            if slot.len == 0 {
                return Err(Error::CircuitCompile(format!(
                    "Slot '{}' has zero length",
                    slot.name
                )));
            }
            if !names.insert(slot.name.as_str()) {
                return Err(Error::CircuitCompile(format!(
                    "Duplicate slot name '{}'",
                    slot.name
                )));
            }
        }

        for constraint in &self.constraints {
            for name in constraint.referenced_slots() {
                if !names.contains(name) {
                    return Err(Error::CircuitCompile(format!(
                        "Constraint references undeclared slot '{}'",
                        name
                    )));
                }
            }
            if let Constraint::BoundEquals { slot, parameter } = constraint {
                let value = self.bound_parameters.get(parameter).ok_or_else(|| {
                    Error::CircuitCompile(format!(
                        "Constraint references unbound parameter '{}'",
                        parameter
                    ))
                })?;
                if self.slot(slot).map(|s| s.len) != Some(value.len()) {
                    return Err(Error::CircuitCompile(format!(
                        "Parameter '{}' does not fit slot '{}'",
                        parameter, slot
                    )));
                }
            }
        }
        Ok(())
    }

    /// Unambiguous byte serialization used to identify the circuit.
    pub fn canonical_bytes(&self) -> Vec<u8> {
        let mut out = Vec::new();
        put_bytes(&mut out, self.label.as_bytes());

        for slots in [&self.public_inputs, &self.secret_inputs] {
            put_len(&mut out, slots.len());
            for slot in slots {
                put_bytes(&mut out, slot.name.as_bytes());
                put_len(&mut out, slot.len);
                out.push(slot.encoding.map_or(0, FieldEncoding::tag));
            }
        }

        put_len(&mut out, self.constraints.len());
        for constraint in &self.constraints {
            out.push(constraint.tag());
            for name in constraint.referenced_slots() {
                put_bytes(&mut out, name.as_bytes());
            }
            if let Constraint::BoundEquals { parameter, .. } = constraint {
                put_bytes(&mut out, parameter.as_bytes());
            }
        }

        put_len(&mut out, self.bound_parameters.len());
        for (name, value) in &self.bound_parameters {
            put_bytes(&mut out, name.as_bytes());
            put_bytes(&mut out, value);
        }
        out
    }
}

fn put_len(out: &mut Vec<u8>, len: usize) {
    out.extend_from_slice(&(len as u64).to_be_bytes());
}

fn put_bytes(out: &mut Vec<u8>, bytes: &[u8]) {
    put_len(out, bytes.len());
    out.extend_from_slice(bytes);
}

/// Concrete byte values for a circuit's slots.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    pub public: BTreeMap<String, Vec<u8>>,
    pub secret: BTreeMap<String, Vec<u8>>,
}

impl Assignment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_public(mut self, name: &str, value: Vec<u8>) -> Self {
        self.public.insert(name.to_string(), value);
        self
    }

    pub fn with_secret(mut self, name: &str, value: Vec<u8>) -> Self {
        self.secret.insert(name.to_string(), value);
        self
    }

    /// Value of a slot, public first.
    pub fn get(&self, name: &str) -> Option<&[u8]> {
        self.public
            .get(name)
            .or_else(|| self.secret.get(name))
            .map(Vec::as_slice)
    }

    /// Check the public side against `description`; secret slots are not required.
    pub fn check_public(&self, description: &CircuitDescription) -> Result<()> {
        check_slots(&description.public_inputs, &self.public, "public")
    }

    /// Check both sides against `description`.
    pub fn check_complete(&self, description: &CircuitDescription) -> Result<()> {
        self.check_public(description)?;
        check_slots(&description.secret_inputs, &self.secret, "secret")
    }
}

fn check_slots(
    slots: &[InputSlot],
    values: &BTreeMap<String, Vec<u8>>,
    side: &str,
) -> Result<()> {
    for slot in slots {
        let value = values.get(&slot.name).ok_or_else(|| {
            Error::Encoding(format!("Missing {} input '{}'", side, slot.name))
        })?;
        if value.len() != slot.len {
            return Err(Error::Encoding(format!(
                "Input '{}' is {} bytes (expected {})",
                slot.name,
                value.len(),
                slot.len
            )));
        }
    }
    for name in values.keys() {
        if !slots.iter().any(|slot| &slot.name == name) {
            return Err(Error::Encoding(format!(
                "Unexpected {} input '{}'",
                side, name
            )));
        }
    }
    Ok(())
}

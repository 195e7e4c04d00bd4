use ndarray::{Array1, Array2, ArrayView1};
use std::collections::HashSet;

use crate::error::{DqnError, Result};

/// Bidirectional mapping between action names and one-hot vectors.
///
/// Action `i` of the configured list encodes to row `i` of the identity
/// matrix of size `action_size`.
#[derive(Clone, Debug, PartialEq)]
pub struct ActionEncoder {
    names: Vec<String>,
    basis: Array2<f32>,
}

impl ActionEncoder {
    /// Create an encoder over an ordered set of unique action names.
    pub fn new<I, S>(actions: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = actions.into_iter().map(Into::into).collect();
        if names.is_empty() {
            return Err(DqnError::configuration("actions", "action set must not be empty"));
        }

        let mut seen = HashSet::with_capacity(names.len());
        if let Some(duplicate) = names.iter().find(|name| !seen.insert(name.as_str())) {
            return Err(DqnError::Configuration {
                name: "actions".to_string(),
                reason: format!("duplicate action '{}'", duplicate),
            });
        }

        let basis = Array2::eye(names.len());
        Ok(ActionEncoder { names, basis })
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Position of `name` in the action list.
    pub fn index_of(&self, name: &str) -> Result<usize> {
        self.names
            .iter()
            .position(|candidate| candidate == name)
            .ok_or_else(|| DqnError::invalid_action(name))
    }

    /// Action name at `index`.
    pub fn name(&self, index: usize) -> Result<&str> {
        self.names
            .get(index)
            .map(String::as_str)
            .ok_or_else(|| DqnError::invalid_action(format!("#{}", index)))
    }

    /// One-hot vector for `name`.
    pub fn encode(&self, name: &str) -> Result<Array1<f32>> {
        let index = self.index_of(name)?;
        Ok(self.basis.row(index).to_owned())
    }

    /// Inverse of [`ActionEncoder::encode`]; the vector must be exactly one-hot.
    pub fn decode(&self, one_hot: ArrayView1<f32>) -> Result<&str> {
        if one_hot.len() != self.len() {
            return Err(DqnError::dimension_mismatch(
                format!("one-hot vector of length {}", self.len()),
                format!("length {}", one_hot.len()),
            ));
        }

        let mut hot = None;
        for (index, &value) in one_hot.iter().enumerate() {
            if value == 1.0 && hot.is_none() {
                hot = Some(index);
            } else if value != 0.0 {
                return Err(DqnError::invalid_action(format!("{}", one_hot)));
            }
        }

        match hot {
            Some(index) => self.name(index),
            None => Err(DqnError::invalid_action(format!("{}", one_hot))),
        }
    }
}

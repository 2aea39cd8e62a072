//! Feature extraction: flow record → classifier input columns.

mod mapper;
mod mapping;

pub use mapper::{ColumnRule, FeatureMapper, TIME_SCALE, VARIANCE_COLUMN};
pub use mapping::{mapping_table, source_attribute};

use serde::Serialize;
use std::sync::Arc;

/// Ordered classifier input columns, fixed at load time.
/// The training label column is removed so it can never become an input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureSchema {
    columns: Arc<[String]>,
}

impl FeatureSchema {
    pub fn new<I, S>(names: I, label_column: &str) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let columns: Vec<String> = names
            .into_iter()
            .map(Into::into)
            .filter(|c| c != label_column)
            .collect();
        Self {
            columns: columns.into(),
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn position(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == column)
    }
}

/// One value per schema column, in schema order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureVector {
    #[serde(skip)]
    columns: Arc<[String]>,
    pub values: Vec<f64>,
}

impl FeatureVector {
    pub(crate) fn new(schema: &FeatureSchema, values: Vec<f64>) -> Self {
        debug_assert_eq!(schema.len(), values.len());
        Self {
            columns: Arc::clone(&schema.columns),
            values,
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn get(&self, column: &str) -> Option<f64> {
        self.columns
            .iter()
            .position(|c| c == column)
            .and_then(|i| self.values.get(i).copied())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.columns
            .iter()
            .map(String::as_str)
            .zip(self.values.iter().copied())
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }
}

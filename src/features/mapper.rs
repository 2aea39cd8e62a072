//! Feature mapper: flow record → schema-ordered feature vector.
//!
//! The per-column rule is resolved once when the mapper is built, so mapping a
//! flow is a single pass over the schema with no string lookups.

use super::{mapping, FeatureSchema, FeatureVector};
use crate::flow::{FlowAttribute, FlowRecord};

/// Derived column: the engine reports a standard deviation, the schema wants its square
pub const VARIANCE_COLUMN: &str = "Packet Length Variance";

/// Applied to every column whose name mentions `Duration` or `IAT`
pub const TIME_SCALE: f64 = 1000.0;

/// How one schema column is filled
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ColumnRule {
    /// No source attribute; always 0
    Unmapped,
    /// Source attribute times `scale`
    Direct { attr: FlowAttribute, scale: f64 },
    /// `bidirectional_stddev_ps` squared
    SquaredStddev,
}

impl ColumnRule {
    pub fn for_column(column: &str) -> Self {
        if column == VARIANCE_COLUMN {
            return ColumnRule::SquaredStddev;
        }
        match mapping::source_attribute(column) {
            Some(attr) => ColumnRule::Direct {
                attr,
                scale: if is_time_column(column) { TIME_SCALE } else { 1.0 },
            },
            None => ColumnRule::Unmapped,
        }
    }

    fn apply(self, flow: &FlowRecord) -> f64 {
        match self {
            ColumnRule::Unmapped => 0.0,
            ColumnRule::Direct { attr, scale } => flow.value(attr) * scale,
            ColumnRule::SquaredStddev => flow.value(FlowAttribute::BidirectionalStddevPs).powi(2),
        }
    }
}

fn is_time_column(column: &str) -> bool {
    column.contains("Duration") || column.contains("IAT")
}

pub struct FeatureMapper {
    schema: FeatureSchema,
    rules: Vec<ColumnRule>,
}

impl FeatureMapper {
    pub fn new(schema: FeatureSchema) -> Self {
        let rules = schema
            .columns()
            .iter()
            .map(|c| ColumnRule::for_column(c))
            .collect();
        Self { schema, rules }
    }

    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    /// Columns the model expects but the mapping table cannot fill
    pub fn unmapped_columns(&self) -> impl Iterator<Item = &str> + '_ {
        self.schema
            .columns()
            .iter()
            .zip(&self.rules)
            .filter(|(_, r)| matches!(r, ColumnRule::Unmapped))
            .map(|(c, _)| c.as_str())
    }

    /// Map one flow. Missing attributes read as 0; never fails.
    pub fn map(&self, flow: &FlowRecord) -> FeatureVector {
        let values = self.rules.iter().map(|r| r.apply(flow)).collect();
        FeatureVector::new(&self.schema, values)
    }
}

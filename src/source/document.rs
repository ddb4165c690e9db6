use serde_json::Value;

use crate::key::KeyPath;
use crate::value::RawValue;
use crate::walk::Lookup;

/// A decoded structured document. Nested structs map to nested objects.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    root: Value,
}

impl Document {
    pub fn new(root: Value) -> Self {
        Self { root }
    }

    /// The node at `path`, descending through objects one segment at a time.
    pub fn get(&self, path: &KeyPath) -> Option<&Value> {
        path.segments()
            .iter()
            .try_fold(&self.root, |node, segment| node.as_object()?.get(segment))
    }
}

impl Lookup for Document {
    fn lookup(&self, path: &KeyPath) -> Result<Option<RawValue>, String> {
        Ok(self.get(path).cloned().map(RawValue::Json))
    }
}

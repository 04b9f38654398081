//! Record instances and change tracking.
//!
//! A [`Record`] keeps the values it was loaded (or last saved) with next to
//! its current values. On save, each attribute's type decides whether the
//! attribute changed; serialized attributes always do.

use crate::error::Result;
use crate::record_type::RecordType;
use crate::types::AttributeType;
use crate::value::Value;
use crate::Row;
use std::collections::BTreeMap;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct Record {
    record_type: Arc<RecordType>,
    /// Values as of the last load or save; `None` for a new record.
    persisted: Option<BTreeMap<String, Value>>,
    values: BTreeMap<String, Value>,
}

impl Record {
    pub(crate) fn new(record_type: Arc<RecordType>, values: BTreeMap<String, Value>) -> Self {
        Self {
            record_type,
            persisted: None,
            values,
        }
    }

    pub(crate) fn loaded(record_type: Arc<RecordType>, values: BTreeMap<String, Value>) -> Self {
        Self {
            record_type,
            persisted: Some(values.clone()),
            values,
        }
    }

    pub fn record_type(&self) -> &Arc<RecordType> {
        &self.record_type
    }

    pub fn is_new_record(&self) -> bool {
        self.persisted.is_none()
    }

    pub fn get(&self, name: &str) -> Result<&Value> {
        self.record_type.require(name)?;
        Ok(self.values.get(name).unwrap_or(&Value::Null))
    }

    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> Result<()> {
        self.record_type.require(name)?;
        self.values.insert(name.to_string(), value.into());
        Ok(())
    }

    pub fn is_changed(&self, name: &str) -> Result<bool> {
        let ty = self.record_type.require(name)?;
        Ok(self.attribute_changed(name, ty))
    }

    /// Names of attributes a save would write, in attribute order.
    pub fn changed_attributes(&self) -> Vec<&str> {
        self.record_type
            .attributes()
            .filter(|(name, ty)| self.attribute_changed(name, ty))
            .map(|(name, _)| name)
            .collect()
    }

    fn attribute_changed(&self, name: &str, ty: &Arc<dyn AttributeType>) -> bool {
        let Some(persisted) = &self.persisted else {
            return true;
        };
        let old = persisted.get(name).unwrap_or(&Value::Null);
        let new = self.values.get(name).unwrap_or(&Value::Null);
        ty.changed(old, new)
    }

    /// Every attribute cast for the database.
    pub fn to_row(&self) -> Result<Row> {
        self.record_type
            .attribute_names()
            .map(|name| self.cast_attribute(name).map(|raw| (name.to_string(), raw)))
            .collect()
    }

    /// Cast the changed attributes for the database and mark the record clean.
    ///
    /// The returned row is what the storage layer should write.
    pub fn save(&mut self) -> Result<Row> {
        let mut row = Row::new();
        for name in self.changed_attributes() {
            row.insert(name.to_string(), self.cast_attribute(name)?);
        }
        tracing::debug!(
            record = self.record_type.name(),
            columns = row.len(),
            "saving record"
        );
        self.persisted = Some(self.values.clone());
        Ok(row)
    }

    fn cast_attribute(&self, name: &str) -> Result<Value> {
        let ty = self.record_type.require(name)?;
        let value = self.values.get(name).unwrap_or(&Value::Null);
        ty.cast_for_database(value)
    }
}

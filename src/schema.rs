//! Table and schema states: the numeric-array model both the user's answer
//! and the generated solutions are expressed in.

use crate::attribute::AttributeState;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    #[error("Schema has {found} tables, expected {expected}")]
    TableCount { expected: usize, found: usize },
    #[error("Table {table} has {found} attributes, expected {expected}")]
    SlotCount {
        table: usize,
        expected: usize,
        found: usize,
    },
    #[error("Table {table}, attribute {slot}: unknown bits in {bits:#x}")]
    UnknownBits { table: usize, slot: usize, bits: u16 },
    #[error("Table {table}, attribute {slot}: both optional and mandatory")]
    OptionalAndMandatory { table: usize, slot: usize },
    #[error("Table {table}, attribute {slot}: arrow without foreign key")]
    DanglingArrow { table: usize, slot: usize },
    #[error("Table {table}, attribute {slot}: references table {target} outside the schema")]
    ReferenceOutOfRange {
        table: usize,
        slot: usize,
        target: usize,
    },
    #[error("No table at index {0}")]
    NoSuchTable(usize),
    #[error("No attribute at index {slot} in table {table}")]
    NoSuchSlot { table: usize, slot: usize },
}

/// One relational table, or its absence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Option<Vec<AttributeState>>", into = "Option<Vec<AttributeState>>")]
pub enum TableState {
    Absent,
    Present(Vec<AttributeState>),
}

impl From<Option<Vec<AttributeState>>> for TableState {
    fn from(value: Option<Vec<AttributeState>>) -> Self {
        match value {
            Some(attrs) => Self::Present(attrs),
            None => Self::Absent,
        }
    }
}

impl From<TableState> for Option<Vec<AttributeState>> {
    fn from(table: TableState) -> Self {
        match table {
            TableState::Absent => None,
            TableState::Present(attrs) => Some(attrs),
        }
    }
}

impl TableState {
    /// A created table with `slots` empty attributes.
    pub fn empty(slots: usize) -> Self {
        Self::Present(vec![AttributeState::EMPTY; slots])
    }

    pub fn is_present(&self) -> bool {
        matches!(self, Self::Present(_))
    }

    pub fn attributes(&self) -> &[AttributeState] {
        match self {
            Self::Absent => &[],
            Self::Present(attrs) => attrs,
        }
    }

    pub fn attribute(&self, slot: usize) -> AttributeState {
        self.attributes().get(slot).copied().unwrap_or_default()
    }

    pub fn has_primary_key(&self) -> bool {
        self.attributes().iter().any(|a| a.is_primary_key())
    }

    /// Slots flagged as primary key.
    pub fn primary_key_slots(&self) -> Vec<usize> {
        self.attributes()
            .iter()
            .enumerate()
            .filter(|(_, a)| a.is_primary_key())
            .map(|(i, _)| i)
            .collect()
    }

    pub fn references(&self, target: usize) -> bool {
        self.attributes().iter().any(|a| a.references(target))
    }

    pub fn without_arrows(&self) -> Self {
        match self {
            Self::Absent => Self::Absent,
            Self::Present(attrs) => {
                Self::Present(attrs.iter().map(|a| a.without_arrows()).collect())
            }
        }
    }
}

/// Ordered list of tables: index 0 is the relation (junction) table,
/// 1..=N the entity tables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Schema {
    pub tables: Vec<TableState>,
}

impl Schema {
    /// Nothing created yet, sized for `entity_count` entities.
    pub fn empty(entity_count: usize) -> Self {
        Self {
            tables: vec![TableState::Absent; entity_count + 1],
        }
    }

    pub fn from_json(input: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(input)
    }

    pub fn entity_count(&self) -> usize {
        self.tables.len().saturating_sub(1)
    }

    /// Attribute slots per created table.
    pub fn slot_count(&self) -> usize {
        self.tables.len()
    }

    pub fn table(&self, index: usize) -> &TableState {
        self.tables.get(index).unwrap_or(&TableState::Absent)
    }

    pub fn is_blank(&self) -> bool {
        self.tables.iter().all(|t| !t.is_present())
    }

    pub fn create_table(&mut self, index: usize) -> Result<(), SchemaError> {
        let slots = self.slot_count();
        let table = self
            .tables
            .get_mut(index)
            .ok_or(SchemaError::NoSuchTable(index))?;
        if !table.is_present() {
            *table = TableState::empty(slots);
        }
        Ok(())
    }

    /// Drops the table and every reference pointing at it.
    pub fn remove_table(&mut self, index: usize) -> Result<(), SchemaError> {
        let table = self
            .tables
            .get_mut(index)
            .ok_or(SchemaError::NoSuchTable(index))?;
        *table = TableState::Absent;
        for table in &mut self.tables {
            if let TableState::Present(attrs) = table {
                for attr in attrs.iter_mut() {
                    attr.clear_foreign_key(index);
                }
            }
        }
        Ok(())
    }

    pub fn attribute_mut(
        &mut self,
        table: usize,
        slot: usize,
    ) -> Result<&mut AttributeState, SchemaError> {
        match self.tables.get_mut(table) {
            Some(TableState::Present(attrs)) => attrs
                .get_mut(slot)
                .ok_or(SchemaError::NoSuchSlot { table, slot }),
            _ => Err(SchemaError::NoSuchTable(table)),
        }
    }

    /// Copy with every arrow mirroring its foreign key.
    pub fn with_auto_arrows(&self) -> Self {
        let tables = self
            .tables
            .iter()
            .map(|t| match t {
                TableState::Absent => TableState::Absent,
                TableState::Present(attrs) => {
                    TableState::Present(attrs.iter().map(|a| a.with_auto_arrows()).collect())
                }
            })
            .collect();
        Self { tables }
    }

    pub fn without_arrows(&self) -> Self {
        Self {
            tables: self.tables.iter().map(|t| t.without_arrows()).collect(),
        }
    }

    /// Checks the structural contract for a schema over `entity_count`
    /// entities. Does not require primary keys: in-progress answers are fine.
    pub fn validate(&self, entity_count: usize) -> Result<(), SchemaError> {
        let expected = entity_count + 1;
        if self.tables.len() != expected {
            return Err(SchemaError::TableCount {
                expected,
                found: self.tables.len(),
            });
        }
        for (t, table) in self.tables.iter().enumerate() {
            let TableState::Present(attrs) = table else {
                continue;
            };
            if attrs.len() != expected {
                return Err(SchemaError::SlotCount {
                    table: t,
                    expected,
                    found: attrs.len(),
                });
            }
            for (slot, attr) in attrs.iter().enumerate() {
                if attr.has_unknown_bits() {
                    return Err(SchemaError::UnknownBits {
                        table: t,
                        slot,
                        bits: attr.bits(),
                    });
                }
                if attr.is_optional() && attr.is_mandatory() {
                    return Err(SchemaError::OptionalAndMandatory { table: t, slot });
                }
                if attr.dangling_arrows() != 0 {
                    return Err(SchemaError::DanglingArrow { table: t, slot });
                }
                if let Some(target) = attr.foreign_key_targets().find(|&x| x >= expected) {
                    return Err(SchemaError::ReferenceOutOfRange {
                        table: t,
                        slot,
                        target,
                    });
                }
            }
        }
        Ok(())
    }

    /// Number of attribute slots equal in both schemas. Absent tables
    /// match each other as a whole.
    pub fn similarity(&self, other: &Schema) -> usize {
        self.tables
            .iter()
            .zip(&other.tables)
            .map(|(a, b)| match (a, b) {
                (TableState::Absent, TableState::Absent) => 1,
                (TableState::Present(x), TableState::Present(y)) => {
                    1 + x.iter().zip(y).filter(|(p, q)| p == q).count()
                }
                _ => 0,
            })
            .sum()
    }
}

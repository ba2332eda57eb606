//! Per-column role flags, packed into the persisted bit layout.
//!
//! | bits  | meaning               |
//! |-------|-----------------------|
//! | 0     | optional (NULL)       |
//! | 1     | mandatory (NOT NULL)  |
//! | 2     | primary key           |
//! | 3     | alternate key         |
//! | 4..=8 | foreign key to table  |
//! | 9..=13| arrow set for table   |

use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of tables a foreign key can point at.
pub const MAX_TABLES: usize = 5;

const OPTIONAL: u16 = 1 << 0;
const MANDATORY: u16 = 1 << 1;
const PRIMARY_KEY: u16 = 1 << 2;
const ALTERNATE_KEY: u16 = 1 << 3;
const FK_SHIFT: u16 = 4;
const ARROW_SHIFT: u16 = 9;
const FK_MASK: u16 = 0b11111 << FK_SHIFT;
const ARROW_MASK: u16 = 0b11111 << ARROW_SHIFT;
const VALID_MASK: u16 = (1 << 14) - 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AttributeState(u16);

impl AttributeState {
    pub const EMPTY: Self = Self(0);

    pub fn from_bits(bits: u16) -> Self {
        Self(bits)
    }

    pub fn bits(self) -> u16 {
        self.0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Bits above the documented layout.
    pub fn has_unknown_bits(self) -> bool {
        self.0 & !VALID_MASK != 0
    }

    pub fn is_optional(self) -> bool {
        self.0 & OPTIONAL != 0
    }

    pub fn is_mandatory(self) -> bool {
        self.0 & MANDATORY != 0
    }

    pub fn is_primary_key(self) -> bool {
        self.0 & PRIMARY_KEY != 0
    }

    pub fn is_alternate_key(self) -> bool {
        self.0 & ALTERNATE_KEY != 0
    }

    pub fn references(self, table: usize) -> bool {
        table < MAX_TABLES && self.0 & (1 << (FK_SHIFT as usize + table)) != 0
    }

    pub fn has_arrow(self, table: usize) -> bool {
        table < MAX_TABLES && self.0 & (1 << (ARROW_SHIFT as usize + table)) != 0
    }

    pub fn is_foreign_key(self) -> bool {
        self.0 & FK_MASK != 0
    }

    /// Tables this column references, ascending.
    pub fn foreign_key_targets(self) -> impl Iterator<Item = usize> {
        (0..MAX_TABLES).filter(move |&t| self.references(t))
    }

    /// Sets `OPTIONAL` and clears `MANDATORY`.
    pub fn set_optional(&mut self) {
        self.0 = (self.0 | OPTIONAL) & !MANDATORY;
    }

    /// Sets `MANDATORY` and clears `OPTIONAL`.
    pub fn set_mandatory(&mut self) {
        self.0 = (self.0 | MANDATORY) & !OPTIONAL;
    }

    pub fn clear_optionality(&mut self) {
        self.0 &= !(OPTIONAL | MANDATORY);
    }

    pub fn toggle_primary_key(&mut self) {
        self.0 ^= PRIMARY_KEY;
    }

    pub fn toggle_alternate_key(&mut self) {
        self.0 ^= ALTERNATE_KEY;
    }

    pub fn set_foreign_key(&mut self, table: usize) {
        if table < MAX_TABLES {
            self.0 |= 1 << (FK_SHIFT as usize + table);
        }
    }

    /// Removes the reference and its arrow.
    pub fn clear_foreign_key(&mut self, table: usize) {
        if table < MAX_TABLES {
            self.0 &= !(1 << (FK_SHIFT as usize + table));
            self.0 &= !(1 << (ARROW_SHIFT as usize + table));
        }
    }

    /// Confirms the reference direction. Ignored without the foreign key.
    pub fn set_arrow(&mut self, table: usize) {
        if self.references(table) {
            self.0 |= 1 << (ARROW_SHIFT as usize + table);
        }
    }

    pub fn clear_arrow(&mut self, table: usize) {
        if table < MAX_TABLES {
            self.0 &= !(1 << (ARROW_SHIFT as usize + table));
        }
    }

    /// Copy with arrows mirroring the foreign keys.
    pub fn with_auto_arrows(self) -> Self {
        let fks = (self.0 & FK_MASK) >> FK_SHIFT;
        Self((self.0 & !ARROW_MASK) | (fks << ARROW_SHIFT))
    }

    pub fn without_arrows(self) -> Self {
        Self(self.0 & !ARROW_MASK)
    }

    /// Arrow bits that have no foreign key underneath.
    pub fn dangling_arrows(self) -> u16 {
        let arrows = (self.0 & ARROW_MASK) >> ARROW_SHIFT;
        let fks = (self.0 & FK_MASK) >> FK_SHIFT;
        arrows & !fks
    }

    /// Foreign keys whose direction has not been confirmed.
    pub fn unconfirmed_references(self) -> impl Iterator<Item = usize> {
        (0..MAX_TABLES).filter(move |&t| self.references(t) && !self.has_arrow(t))
    }

    // Builder-style helpers for solution tables.

    pub fn primary_key() -> Self {
        Self(PRIMARY_KEY)
    }

    pub fn foreign_key(table: usize) -> Self {
        let mut state = Self::EMPTY;
        state.set_foreign_key(table);
        state.set_arrow(table);
        state
    }

    pub fn with_primary_key(mut self) -> Self {
        self.0 |= PRIMARY_KEY;
        self
    }

    pub fn with_alternate_key(mut self) -> Self {
        self.0 |= ALTERNATE_KEY;
        self
    }

    pub fn with_optional(mut self) -> Self {
        self.set_optional();
        self
    }

    pub fn with_mandatory(mut self) -> Self {
        self.set_mandatory();
        self
    }
}

impl fmt::Display for AttributeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts: Vec<String> = Vec::new();
        if self.is_primary_key() {
            parts.push("PK".into());
        }
        if self.is_alternate_key() {
            parts.push("AK".into());
        }
        for t in self.foreign_key_targets() {
            let arrow = if self.has_arrow(t) { "->" } else { "-" };
            parts.push(format!("FK{}{}", arrow, t));
        }
        if self.is_optional() {
            parts.push("NULL".into());
        }
        if self.is_mandatory() {
            parts.push("NOT NULL".into());
        }
        if parts.is_empty() {
            write!(f, "-")
        } else {
            write!(f, "{}", parts.join(" "))
        }
    }
}

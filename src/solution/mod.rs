//! Solution generation: every accepted relational schema for a classified
//! relationship, main solution first.

mod binary;
mod chain;
mod hierarchy;
mod junction;

use crate::attribute::{AttributeState, MAX_TABLES};
use crate::classify::Classification;
use crate::phrase::Cardinality;
use crate::schema::{Schema, TableState};
use tracing::{debug, warn};

/// Builds the solution set for `classification`. Empty when the
/// relationship cannot be graded.
pub fn generate_solutions(classification: &Classification) -> Vec<Schema> {
    let entity_count = classification.entity_count();
    if entity_count < 2 || entity_count + 1 > MAX_TABLES {
        warn!(?classification, "no solutions for relationship");
        return Vec::new();
    }

    let solutions = match *classification {
        Classification::Binary { left, right } => pair(left, right, false),
        Classification::Recursive { left, right } => pair(left, right, true),
        Classification::NAryManyToMany { arity, .. } => junction::solutions(arity, false),
        Classification::OneToManyChain { single, .. } => chain::solutions(single),
        Classification::Hierarchy { subtype_count, .. } => hierarchy::solutions(subtype_count),
        Classification::Unclassifiable => Vec::new(),
    };

    let solutions = distinct(solutions);
    debug!(count = solutions.len(), ?classification, "generated solutions");
    solutions
}

fn pair(left: Cardinality, right: Cardinality, recursive: bool) -> Vec<Schema> {
    if left.is_multi() && right.is_multi() {
        junction::solutions(2, recursive)
    } else {
        binary::solutions(left, right, recursive)
    }
}

/// Keeps the first occurrence of each schema.
fn distinct(solutions: Vec<Schema>) -> Vec<Schema> {
    let mut out: Vec<Schema> = Vec::with_capacity(solutions.len());
    for s in solutions {
        if !out.contains(&s) {
            out.push(s);
        }
    }
    out
}

/// `NOT NULL` for mandatory participation, `NULL` otherwise.
fn with_nullability(attr: AttributeState, card: Cardinality) -> AttributeState {
    if card.is_mandatory() {
        attr.with_mandatory()
    } else {
        attr.with_optional()
    }
}

/// Assembles one solution schema.
///
/// Roles are 1-based entity positions. In a recursive relationship both
/// roles live in table 1; a column held by role `h` that references role `j`
/// sits in slot `j` of `h`'s table, so the direction stays visible.
struct SchemaBuilder {
    schema: Schema,
    recursive: bool,
}

impl SchemaBuilder {
    fn new(entity_count: usize, recursive: bool) -> Self {
        Self {
            schema: Schema::empty(entity_count),
            recursive,
        }
    }

    fn table_of(&self, role: usize) -> usize {
        if self.recursive && role > 0 { 1 } else { role }
    }

    /// Creates every entity table with its own primary key in slot 0.
    fn entity_tables(&mut self) -> &mut Self {
        for role in 1..=self.schema.entity_count() {
            let table = self.table_of(role);
            self.column(table, 0, AttributeState::primary_key());
        }
        self
    }

    /// Sets one column, creating the table on first use.
    fn column(&mut self, table: usize, slot: usize, attr: AttributeState) -> &mut Self {
        let slots = self.schema.slot_count();
        if let Some(t) = self.schema.tables.get_mut(table) {
            if let TableState::Absent = t {
                *t = TableState::empty(slots);
            }
            if let TableState::Present(attrs) = t {
                if let Some(a) = attrs.get_mut(slot) {
                    *a = attr;
                }
            }
        }
        self
    }

    /// Foreign key to the table holding `role`, arrow included.
    fn fk_to(&self, role: usize) -> AttributeState {
        AttributeState::foreign_key(self.table_of(role))
    }

    /// Column in `holder`'s table referencing `target`.
    fn reference(
        &mut self,
        holder: usize,
        target: usize,
        finish: impl FnOnce(AttributeState) -> AttributeState,
    ) -> &mut Self {
        let attr = finish(self.fk_to(target));
        let table = self.table_of(holder);
        self.column(table, target, attr)
    }

    /// Column in the relation table (0) referencing `target`.
    fn relation_reference(
        &mut self,
        target: usize,
        finish: impl FnOnce(AttributeState) -> AttributeState,
    ) -> &mut Self {
        let attr = finish(self.fk_to(target));
        self.column(0, target, attr)
    }

    fn build(&mut self) -> Schema {
        self.schema.clone()
    }
}

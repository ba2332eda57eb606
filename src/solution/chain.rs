//! Three entities where exactly one takes part exactly once.

use super::SchemaBuilder;
use crate::attribute::AttributeState;
use crate::schema::Schema;

/// Accepted shapes, in order:
///
/// 1. the single entity's table references both other entities directly;
/// 2. a relation table keyed by its reference to the single entity;
/// 3. a relation table with a surrogate key, the single-entity reference
///    as alternate key.
pub(super) fn solutions(single: usize) -> Vec<Schema> {
    let others: Vec<usize> = (1..=3).filter(|&r| r != single).collect();

    let mut direct = SchemaBuilder::new(3, false);
    direct.entity_tables();
    for &other in &others {
        direct.reference(single, other, AttributeState::with_mandatory);
    }

    let mut keyed = SchemaBuilder::new(3, false);
    keyed
        .entity_tables()
        .relation_reference(single, AttributeState::with_primary_key);
    for &other in &others {
        keyed.relation_reference(other, AttributeState::with_mandatory);
    }

    let mut surrogate = SchemaBuilder::new(3, false);
    surrogate
        .entity_tables()
        .column(0, 0, AttributeState::primary_key())
        .relation_reference(single, |fk| fk.with_alternate_key().with_mandatory());
    for &other in &others {
        surrogate.relation_reference(other, AttributeState::with_mandatory);
    }

    vec![direct.build(), keyed.build(), surrogate.build()]
}

//! Generalization/specialization: supertype is entity 1, subtypes follow.
//!
//! Completeness and disjointness have no relational counterpart, so they do
//! not change the accepted shapes.

use super::SchemaBuilder;
use crate::attribute::AttributeState;
use crate::schema::Schema;

pub(super) fn solutions(subtype_count: usize) -> Vec<Schema> {
    let entities = subtype_count + 1;

    // Subtype key is the supertype key.
    let mut identifying = SchemaBuilder::new(entities, false);
    identifying.column(1, 0, AttributeState::primary_key());
    for sub in 2..=entities {
        identifying.reference(sub, 1, AttributeState::with_primary_key);
    }

    // Own subtype key, supertype reference held unique.
    let mut surrogate = SchemaBuilder::new(entities, false);
    surrogate.entity_tables();
    for sub in 2..=entities {
        surrogate.reference(sub, 1, |fk| fk.with_alternate_key().with_mandatory());
    }

    vec![identifying.build(), surrogate.build()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifying_subtypes() {
        let s = solutions(2);
        assert_eq!(s.len(), 2);
        assert_eq!(s[0].table(1).primary_key_slots(), vec![0]);
        for sub in 2..=3 {
            let key = s[0].table(sub).attribute(1);
            assert!(key.is_primary_key() && key.references(1));
            assert_eq!(s[0].table(sub).primary_key_slots(), vec![1]);
        }
        assert!(!s[0].table(0).is_present());
    }

    #[test]
    fn test_surrogate_subtypes() {
        let s = solutions(3);
        for sub in 2..=4 {
            assert_eq!(s[1].table(sub).primary_key_slots(), vec![0]);
            let fk = s[1].table(sub).attribute(1);
            assert!(fk.references(1) && fk.is_alternate_key() && fk.is_mandatory());
        }
    }
}

//! Many-to-many of any arity, resolved through the relation table.

use super::SchemaBuilder;
use crate::attribute::AttributeState;
use crate::schema::Schema;

/// Relation table 0 holds one foreign key per role. Together they are
/// either the composite primary key, or a composite alternate key next to
/// a surrogate primary key. Entity tables keep only their own key.
pub(super) fn solutions(arity: usize, recursive: bool) -> Vec<Schema> {
    let mut composite = SchemaBuilder::new(arity, recursive);
    composite.entity_tables();
    for role in 1..=arity {
        composite.relation_reference(role, AttributeState::with_primary_key);
    }

    let mut surrogate = SchemaBuilder::new(arity, recursive);
    surrogate
        .entity_tables()
        .column(0, 0, AttributeState::primary_key());
    for role in 1..=arity {
        surrogate.relation_reference(role, |fk| fk.with_alternate_key().with_mandatory());
    }

    vec![composite.build(), surrogate.build()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_binary_junction() {
        let s = solutions(2, false);
        assert_eq!(s.len(), 2);

        let main = &s[0];
        assert_eq!(main.table(0).primary_key_slots(), vec![1, 2]);
        assert!(main.table(0).attribute(1).references(1));
        assert!(main.table(0).attribute(2).references(2));
        for t in 1..=2 {
            assert_eq!(main.table(t).primary_key_slots(), vec![0]);
            assert!(!main.table(t).attribute(0).is_foreign_key());
        }

        let alt = &s[1];
        assert_eq!(alt.table(0).primary_key_slots(), vec![0]);
        assert!(alt.table(0).attribute(1).is_alternate_key());
        assert!(alt.table(0).attribute(2).is_alternate_key());
    }

    #[test]
    fn test_ternary_junction() {
        let s = solutions(3, false);
        assert_eq!(s[0].table(0).primary_key_slots(), vec![1, 2, 3]);
        assert!(s[0].table(0).attribute(3).references(3));
    }

    #[test]
    fn test_recursive_junction_points_twice_at_one_table() {
        let s = solutions(2, true);
        assert!(s[0].table(0).attribute(1).references(1));
        assert!(s[0].table(0).attribute(2).references(1));
        assert!(!s[0].table(2).is_present());
    }
}

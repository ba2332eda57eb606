//! One-to-one and one-to-many between two roles (distinct or recursive).

use super::{SchemaBuilder, with_nullability};
use crate::phrase::Cardinality;
use crate::schema::Schema;

/// At least one of `left`/`right` is single.
///
/// The foreign key lives with a single side, pointing at the other role.
/// Its nullability follows the holder's own cardinality. In 1:1 it is also
/// an alternate key, otherwise the relationship degrades to 1:N.
pub(super) fn solutions(left: Cardinality, right: Cardinality, recursive: bool) -> Vec<Schema> {
    let one_to_one = left.is_single() && right.is_single();
    let cards = [left, right];

    // (holder, target) pairs, preferred placement first
    let placements: Vec<(usize, usize)> = if one_to_one {
        if left == right {
            vec![(1, 2), (2, 1)]
        } else if right == Cardinality::Cond {
            vec![(2, 1)]
        } else {
            vec![(1, 2)]
        }
    } else if left.is_single() {
        vec![(1, 2)]
    } else {
        vec![(2, 1)]
    };

    placements
        .into_iter()
        .map(|(holder, target)| {
            let card = cards[holder - 1];
            let mut b = SchemaBuilder::new(2, recursive);
            b.entity_tables().reference(holder, target, |fk| {
                let fk = with_nullability(fk, card);
                if one_to_one { fk.with_alternate_key() } else { fk }
            });
            b.build()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attribute::AttributeState;
    use crate::schema::TableState;

    fn pk_only(slots: usize) -> TableState {
        let mut attrs = vec![AttributeState::EMPTY; slots];
        attrs[0] = AttributeState::primary_key();
        TableState::Present(attrs)
    }

    #[test]
    fn test_one_to_cond_places_key_on_cond_side() {
        let s = solutions(Cardinality::One, Cardinality::Cond, false);
        assert_eq!(s.len(), 1);
        assert_eq!(s[0].table(1), &pk_only(3));
        let fk = s[0].table(2).attribute(1);
        assert!(fk.references(1));
        assert!(fk.is_alternate_key());
        assert!(fk.is_optional());
        assert!(!fk.is_primary_key());
    }

    #[test]
    fn test_one_to_one_both_directions() {
        let s = solutions(Cardinality::One, Cardinality::One, false);
        assert_eq!(s.len(), 2);
        let main = s[0].table(1).attribute(2);
        assert!(main.references(2) && main.is_alternate_key() && main.is_mandatory());
        let alt = s[1].table(2).attribute(1);
        assert!(alt.references(1) && alt.is_alternate_key() && alt.is_mandatory());
    }

    #[test]
    fn test_one_to_many_plain_foreign_key() {
        let s = solutions(Cardinality::CondMany, Cardinality::Cond, false);
        assert_eq!(s.len(), 1);
        assert_eq!(s[0].table(1), &pk_only(3));
        let fk = s[0].table(2).attribute(1);
        assert!(fk.references(1));
        assert!(!fk.is_alternate_key());
        assert!(fk.is_optional());
        assert!(!s[0].table(0).is_present());
    }

    #[test]
    fn test_recursive_direction_uses_slot() {
        // Employee (n) -- (1) Employee: each subordinate has one manager
        let s = solutions(Cardinality::Many, Cardinality::One, true);
        assert_eq!(s.len(), 1);
        let t = s[0].table(1);
        assert!(t.attribute(1).references(1));
        assert!(t.attribute(1).is_mandatory());
        assert!(t.attribute(2).is_empty());

        let reversed = solutions(Cardinality::One, Cardinality::Many, true);
        assert_ne!(s, reversed);
        assert!(reversed[0].table(1).attribute(2).references(1));
    }
}

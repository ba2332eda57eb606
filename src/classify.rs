//! Relationship classification: which relational shape a phrase calls for.

use crate::phrase::{Cardinality, Completeness, Disjointness, Phrase, PhraseSolution};
use serde::Serialize;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Classification {
    /// Two distinct entities, at least one side single (1:1 or 1:N).
    Binary { left: Cardinality, right: Cardinality },
    /// An entity related to itself.
    Recursive { left: Cardinality, right: Cardinality },
    /// Every side many, 2 to 4 distinct entities. `mandatory_many` is set
    /// when some side needs at least one partner (`n` rather than `cn`).
    NAryManyToMany { arity: usize, mandatory_many: bool },
    /// Three entities: one side exactly `1`, the other two many with at
    /// least one `n`. `single` is the 1-based entity position.
    OneToManyChain { single: usize, mandatory_many: bool },
    Hierarchy {
        completeness: Completeness,
        disjointness: Disjointness,
        subtype_count: usize,
    },
    /// Cardinality pattern with no known relational shape.
    Unclassifiable,
}

impl Classification {
    /// Entities taking part, i.e. schema length minus one.
    pub fn entity_count(&self) -> usize {
        match self {
            Self::Binary { .. } | Self::Recursive { .. } => 2,
            Self::NAryManyToMany { arity, .. } => *arity,
            Self::OneToManyChain { .. } => 3,
            Self::Hierarchy { subtype_count, .. } => subtype_count + 1,
            Self::Unclassifiable => 0,
        }
    }

    pub fn is_gradable(&self) -> bool {
        !matches!(self, Self::Unclassifiable)
    }
}

#[cfg(test)]
impl Classification {
    /// Every gradable shape the classifier can produce.
    pub(crate) fn all_gradable() -> Vec<Self> {
        let mut out = Vec::new();
        for left in Cardinality::ALL {
            for right in Cardinality::ALL {
                out.push(Self::Recursive { left, right });
                if left.is_single() || right.is_single() {
                    out.push(Self::Binary { left, right });
                }
            }
        }
        for arity in 2..=4 {
            for mandatory_many in [false, true] {
                out.push(Self::NAryManyToMany {
                    arity,
                    mandatory_many,
                });
            }
        }
        for single in 1..=3 {
            out.push(Self::OneToManyChain {
                single,
                mandatory_many: true,
            });
        }
        for completeness in [Completeness::Total, Completeness::Partial] {
            for disjointness in [Disjointness::Disjoint, Disjointness::NonDisjoint] {
                for subtype_count in 2..=3 {
                    out.push(Self::Hierarchy {
                        completeness,
                        disjointness,
                        subtype_count,
                    });
                }
            }
        }
        out
    }
}

pub fn classify(phrase: &Phrase) -> Classification {
    let result = match &phrase.solution {
        PhraseSolution::Hierarchy(spec) => {
            match phrase.entity_count().checked_sub(1) {
                Some(subtype_count @ 2..=3) => Classification::Hierarchy {
                    completeness: spec.completeness,
                    disjointness: spec.disjointness,
                    subtype_count,
                },
                _ => Classification::Unclassifiable,
            }
        }
        PhraseSolution::Cardinalities(cards) => classify_cardinalities(phrase, cards),
    };
    debug!(entities = ?phrase.entities, ?result, "classified phrase");
    result
}

fn classify_cardinalities(phrase: &Phrase, cards: &[Cardinality]) -> Classification {
    // Hand-built phrases can skip the data-contract checks.
    if phrase.relation.is_none() || cards.len() != phrase.entity_count() {
        return Classification::Unclassifiable;
    }

    if phrase.is_recursive() {
        return Classification::Recursive {
            left: cards[0],
            right: cards[1],
        };
    }

    let mandatory_many = cards.iter().any(|c| *c == Cardinality::Many);

    if cards.iter().all(|c| c.is_multi()) {
        return Classification::NAryManyToMany {
            arity: cards.len(),
            mandatory_many,
        };
    }

    match cards {
        [left, right] => Classification::Binary {
            left: *left,
            right: *right,
        },
        [_, _, _] => {
            let singles: Vec<usize> = cards
                .iter()
                .enumerate()
                .filter(|(_, c)| c.is_single())
                .map(|(i, _)| i)
                .collect();
            match singles.as_slice() {
                [only] if cards[*only] == Cardinality::One && mandatory_many => {
                    Classification::OneToManyChain {
                        single: only + 1,
                        mandatory_many,
                    }
                }
                _ => Classification::Unclassifiable,
            }
        }
        _ => Classification::Unclassifiable,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::phrase::HierarchySpec;

    fn phrase(json: &str) -> Phrase {
        Phrase::from_json(json).unwrap()
    }

    #[test]
    fn test_binary() {
        let p = phrase(r#"{"entities": ["Pot", "Lid"], "relation": "has", "solution": ["1", "c"]}"#);
        assert_eq!(
            classify(&p),
            Classification::Binary {
                left: Cardinality::One,
                right: Cardinality::Cond,
            }
        );
    }

    #[test]
    fn test_recursive_before_many_to_many() {
        let p = phrase(
            r#"{"entities": ["Part", "Part"], "relation": "contains", "solution": ["cn", "n"]}"#,
        );
        assert_eq!(
            classify(&p),
            Classification::Recursive {
                left: Cardinality::CondMany,
                right: Cardinality::Many,
            }
        );
    }

    #[test]
    fn test_many_to_many() {
        let p = phrase(
            r#"{"entities": ["Customer", "Product"], "relation": "buys", "solution": ["cn", "cn"]}"#,
        );
        assert_eq!(
            classify(&p),
            Classification::NAryManyToMany {
                arity: 2,
                mandatory_many: false,
            }
        );

        let p = phrase(
            r#"{"entities": ["A", "B", "C", "D"], "relation": "r", "solution": ["n", "cn", "n", "n"]}"#,
        );
        assert_eq!(
            classify(&p),
            Classification::NAryManyToMany {
                arity: 4,
                mandatory_many: true,
            }
        );
    }

    #[test]
    fn test_chain() {
        let p = phrase(
            r#"{"entities": ["Lecturer", "Course", "Room"], "relation": "holds",
                "solution": ["cn", "n", "1"]}"#,
        );
        assert_eq!(
            classify(&p),
            Classification::OneToManyChain {
                single: 3,
                mandatory_many: true,
            }
        );
    }

    #[test]
    fn test_unclassifiable() {
        let p = phrase(
            r#"{"entities": ["A", "B", "C"], "relation": "r", "solution": ["1", "c", "n"]}"#,
        );
        assert_eq!(classify(&p), Classification::Unclassifiable);

        let p = phrase(
            r#"{"entities": ["A", "B", "C", "D"], "relation": "r", "solution": ["1", "n", "n", "n"]}"#,
        );
        assert_eq!(classify(&p), Classification::Unclassifiable);
        assert!(!classify(&p).is_gradable());
    }

    #[test]
    fn test_three_entity_mix_outside_chain_pattern() {
        for cards in [r#"["cn", "cn", "c"]"#, r#"["n", "n", "c"]"#, r#"["cn", "cn", "1"]"#] {
            let p = phrase(&format!(
                r#"{{"entities": ["A", "B", "C"], "relation": "r", "solution": {}}}"#,
                cards
            ));
            assert_eq!(classify(&p), Classification::Unclassifiable, "{}", cards);
        }
    }

    #[test]
    fn test_hierarchy_without_entities() {
        let p = Phrase {
            entities: vec![],
            relation: None,
            roles: vec![],
            solution: PhraseSolution::Hierarchy(HierarchySpec {
                completeness: Completeness::Total,
                disjointness: Disjointness::Disjoint,
            }),
        };
        assert_eq!(classify(&p), Classification::Unclassifiable);
    }

    #[test]
    fn test_hierarchy() {
        let p = phrase(r#"{"entities": ["Vehicle", "Car", "Bike", "Boat"], "solution": ["p", "d"]}"#);
        let c = classify(&p);
        assert_eq!(
            c,
            Classification::Hierarchy {
                completeness: Completeness::Partial,
                disjointness: Disjointness::Disjoint,
                subtype_count: 3,
            }
        );
        assert_eq!(c.entity_count(), 4);
    }

    #[test]
    fn test_serialize_tagged() {
        let c = Classification::NAryManyToMany {
            arity: 3,
            mandatory_many: false,
        };
        assert_eq!(
            serde_json::to_string(&c).unwrap(),
            r#"{"kind":"n_ary_many_to_many","arity":3,"mandatory_many":false}"#
        );
    }
}

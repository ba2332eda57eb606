//! Feedback selection: which guidance messages an answer earns.
//!
//! Errors are diagnosed against the solution closest to the answer, so a
//! student working towards an accepted alternate is not pushed back to the
//! main shape. Notices about constraints the relational model cannot carry
//! are added whenever they apply to the phrase.

use crate::classify::Classification;
use crate::phrase::{Cardinality, Completeness, Disjointness};
use crate::schema::{Schema, TableState};
use crate::verify::{ArrowMode, Verdict, normalize};
use serde::Serialize;
use std::collections::BTreeSet;

/// Message vocabulary. Variant order is display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Feedback {
    Correct,
    AlternateSolutionFound,
    MissingEntityTable,
    MissingNmTable,
    UnnecessaryTable,
    MissingPk,
    WrongPk,
    MissingHierarchyFk,
    MissingFk,
    WrongFk,
    MissingFkDirection,
    MissingAk,
    UnnecessaryAk,
    WrongOptionality,
    MandatoryNotRepresentable,
    TotalNotRepresentable,
    DisjointNotRepresentable,
}

impl Feedback {
    pub fn key(self) -> &'static str {
        match self {
            Self::Correct => "correct",
            Self::AlternateSolutionFound => "alternate_solution_found",
            Self::MissingEntityTable => "missing_entity_table",
            Self::MissingNmTable => "missing_nm_table",
            Self::UnnecessaryTable => "unnecessary_table",
            Self::MissingPk => "missing_pk",
            Self::WrongPk => "wrong_pk",
            Self::MissingHierarchyFk => "missing_hierarchy_fk",
            Self::MissingFk => "missing_fk",
            Self::WrongFk => "wrong_fk",
            Self::MissingFkDirection => "missing_fk_direction",
            Self::MissingAk => "missing_ak",
            Self::UnnecessaryAk => "unnecessary_ak",
            Self::WrongOptionality => "wrong_optionality",
            Self::MandatoryNotRepresentable => "mandatory_not_representable",
            Self::TotalNotRepresentable => "total_not_representable",
            Self::DisjointNotRepresentable => "disjoint_not_representable",
        }
    }
}

pub fn feedback_keys(
    classification: &Classification,
    answer: &Schema,
    solutions: &[Schema],
    verdict: &Verdict,
) -> Vec<Feedback> {
    let Some(main) = solutions.first() else {
        return Vec::new();
    };
    let mut keys = BTreeSet::new();

    match verdict.matched {
        Some(0) => {
            keys.insert(Feedback::Correct);
        }
        Some(_) => {
            keys.insert(Feedback::AlternateSolutionFound);
        }
        None => {
            let target = closest(answer, solutions, verdict.arrow_mode);
            diagnose(classification, answer, target, verdict.arrow_mode, &mut keys);
        }
    }

    if mandatory_not_representable(classification, main) {
        keys.insert(Feedback::MandatoryNotRepresentable);
    }
    if let Classification::Hierarchy {
        completeness,
        disjointness,
        ..
    } = *classification
    {
        if completeness == Completeness::Total {
            keys.insert(Feedback::TotalNotRepresentable);
        }
        if disjointness == Disjointness::Disjoint {
            keys.insert(Feedback::DisjointNotRepresentable);
        }
    }

    keys.into_iter().collect()
}

/// Solution sharing the most attribute slots with the answer; ties go to
/// the earlier solution.
fn closest<'a>(answer: &Schema, solutions: &'a [Schema], mode: ArrowMode) -> &'a Schema {
    let answer = normalize(answer, mode);
    let mut best = &solutions[0];
    let mut best_score = 0;
    for (i, candidate) in solutions.iter().enumerate() {
        let score = normalize(candidate, mode).similarity(&answer);
        if i == 0 || score > best_score {
            best = candidate;
            best_score = score;
        }
    }
    best
}

fn diagnose(
    classification: &Classification,
    answer: &Schema,
    target: &Schema,
    mode: ArrowMode,
    keys: &mut BTreeSet<Feedback>,
) {
    let hierarchy = matches!(classification, Classification::Hierarchy { .. });

    if mode == ArrowMode::Manual
        && answer
            .tables
            .iter()
            .flat_map(|t| t.attributes())
            .any(|a| a.unconfirmed_references().next().is_some())
    {
        keys.insert(Feedback::MissingFkDirection);
    }

    for (index, expected) in target.tables.iter().enumerate() {
        let given = answer.table(index);
        match (expected, given) {
            (TableState::Present(_), TableState::Absent) => {
                keys.insert(if index == 0 {
                    Feedback::MissingNmTable
                } else {
                    Feedback::MissingEntityTable
                });
            }
            (TableState::Absent, TableState::Present(_)) => {
                keys.insert(Feedback::UnnecessaryTable);
            }
            (TableState::Present(_), TableState::Present(_)) => {
                compare_table(hierarchy && index >= 2, expected, given, keys);
            }
            (TableState::Absent, TableState::Absent) => {}
        }
    }
}

fn compare_table(
    subtype: bool,
    expected: &TableState,
    given: &TableState,
    keys: &mut BTreeSet<Feedback>,
) {
    if !given.has_primary_key() {
        keys.insert(Feedback::MissingPk);
    } else if given.primary_key_slots() != expected.primary_key_slots() {
        keys.insert(Feedback::WrongPk);
    }

    for (slot, want) in expected.attributes().iter().enumerate() {
        let want = want.without_arrows();
        let have = given.attribute(slot).without_arrows();

        match (want.is_foreign_key(), have.is_foreign_key()) {
            (true, false) => {
                keys.insert(if subtype {
                    Feedback::MissingHierarchyFk
                } else {
                    Feedback::MissingFk
                });
            }
            (false, true) => {
                keys.insert(Feedback::WrongFk);
            }
            (true, true) if !want.foreign_key_targets().eq(have.foreign_key_targets()) => {
                keys.insert(Feedback::WrongFk);
            }
            (true, true) => {
                if want.is_optional() != have.is_optional()
                    || want.is_mandatory() != have.is_mandatory()
                {
                    keys.insert(Feedback::WrongOptionality);
                }
            }
            (false, false) => {}
        }

        match (want.is_alternate_key(), have.is_alternate_key()) {
            (true, false) => {
                keys.insert(Feedback::MissingAk);
            }
            (false, true) => {
                keys.insert(Feedback::UnnecessaryAk);
            }
            _ => {}
        }
    }
}

/// Some side needs at least one partner, but no NOT NULL foreign key held by
/// that side enforces it in the main solution.
fn mandatory_not_representable(classification: &Classification, main: &Schema) -> bool {
    match *classification {
        Classification::Binary { left, right } => unenforced(main, [left, right], false),
        Classification::Recursive { left, right } => unenforced(main, [left, right], true),
        Classification::NAryManyToMany { mandatory_many, .. }
        | Classification::OneToManyChain { mandatory_many, .. } => mandatory_many,
        Classification::Hierarchy { .. } | Classification::Unclassifiable => false,
    }
}

fn unenforced(main: &Schema, cards: [Cardinality; 2], recursive: bool) -> bool {
    cards.iter().enumerate().any(|(i, card)| {
        let role = i + 1;
        let table = if recursive { 1 } else { role };
        let enforced = main
            .table(table)
            .attributes()
            .iter()
            .enumerate()
            .any(|(slot, a)| slot != 0 && slot != role && a.is_foreign_key() && a.is_mandatory());
        card.is_mandatory() && !enforced
    })
}

//! Answer verification: exact structural match against the solution set.

use crate::schema::{Schema, SchemaError};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Who owns the reference arrows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArrowMode {
    /// Arrows follow the foreign keys; they are ignored when comparing.
    #[default]
    Auto,
    /// The user sets arrows explicitly; they must match too.
    Manual,
}

impl ArrowMode {
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "auto" => Some(Self::Auto),
            "manual" => Some(Self::Manual),
            _ => None,
        }
    }
}

/// Outcome of grading one answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Verdict {
    /// Index of the matched solution.
    pub matched: Option<usize>,
    pub is_alternate: bool,
    pub arrow_mode: ArrowMode,
}

impl Verdict {
    pub fn is_correct(&self) -> bool {
        self.matched.is_some()
    }

    pub fn matched_schema<'a>(&self, solutions: &'a [Schema]) -> Option<&'a Schema> {
        self.matched.and_then(|i| solutions.get(i))
    }
}

/// Compares `answer` with each solution in order; the first exact match
/// wins. An empty solution set never matches.
pub fn verify(
    answer: &Schema,
    solutions: &[Schema],
    mode: ArrowMode,
) -> Result<Verdict, SchemaError> {
    let Some(main) = solutions.first() else {
        warn!("verification requested without solutions");
        return Ok(Verdict {
            matched: None,
            is_alternate: false,
            arrow_mode: mode,
        });
    };

    if let Err(err) = answer.validate(main.entity_count()) {
        warn!(%err, "rejected malformed answer");
        return Err(err);
    }

    let answer = normalize(answer, mode);
    let matched = solutions
        .iter()
        .position(|candidate| normalize(candidate, mode) == answer);

    debug!(?matched, ?mode, "verified answer");
    Ok(Verdict {
        matched,
        is_alternate: matches!(matched, Some(i) if i > 0),
        arrow_mode: mode,
    })
}

pub(crate) fn normalize(schema: &Schema, mode: ArrowMode) -> Schema {
    match mode {
        ArrowMode::Auto => schema.without_arrows(),
        ArrowMode::Manual => schema.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::{Classification, classify};
    use crate::phrase::Phrase;
    use crate::solution::generate_solutions;

    fn solutions_for(json: &str) -> Vec<Schema> {
        generate_solutions(&classify(&Phrase::from_json(json).unwrap()))
    }

    #[test]
    fn test_main_solution_verifies() {
        for c in Classification::all_gradable() {
            let solutions = generate_solutions(&c);
            for mode in [ArrowMode::Auto, ArrowMode::Manual] {
                let v = verify(&solutions[0], &solutions, mode).unwrap();
                assert_eq!(v.matched, Some(0), "{:?}", c);
                assert!(!v.is_alternate);
            }
        }
    }

    #[test]
    fn test_alternates_verify_as_alternate() {
        for c in Classification::all_gradable() {
            let solutions = generate_solutions(&c);
            for (i, s) in solutions.iter().enumerate().skip(1) {
                let v = verify(s, &solutions, ArrowMode::Auto).unwrap();
                assert_eq!(v.matched, Some(i), "{:?}", c);
                assert!(v.is_alternate);
                assert_eq!(v.matched_schema(&solutions), Some(s));
            }
        }
    }

    #[test]
    fn test_empty_schema_never_matches() {
        for c in Classification::all_gradable() {
            let solutions = generate_solutions(&c);
            let blank = Schema::empty(c.entity_count());
            let v = verify(&blank, &solutions, ArrowMode::Auto).unwrap();
            assert!(!v.is_correct(), "{:?}", c);
        }
    }

    #[test]
    fn test_pot_lid_reverse_placement_fails() {
        let solutions =
            solutions_for(r#"{"entities": ["Pot", "Lid"], "relation": "has", "solution": ["1", "c"]}"#);
        // Lid holds FK -> Pot with AK and NULL
        let lid_fk = 1 | 8 | (1 << 5) | (1 << 10);
        let main = Schema::from_json(&format!("[null, [4, 0, 0], [4, {}, 0]]", lid_fk)).unwrap();
        let v = verify(&main, &solutions, ArrowMode::Manual).unwrap();
        assert_eq!(v.matched, Some(0));

        let pot_fk = 1 | 8 | (1 << 6) | (1 << 11);
        let reverse = Schema::from_json(&format!("[null, [4, 0, {}], [4, 0, 0]]", pot_fk)).unwrap();
        let v = verify(&reverse, &solutions, ArrowMode::Manual).unwrap();
        assert_eq!(v.matched, None);
    }

    #[test]
    fn test_recursive_reversed_direction_fails() {
        let solutions = solutions_for(
            r#"{"entities": ["Employee", "Employee"], "relation": "reports to", "solution": ["n", "1"]}"#,
        );
        assert_eq!(solutions.len(), 1);
        let fk = 2 | (1 << 5);
        let right = Schema::from_json(&format!("[null, [4, {}, 0], null]", fk)).unwrap();
        assert_eq!(verify(&right, &solutions, ArrowMode::Auto).unwrap().matched, Some(0));

        let reversed = Schema::from_json(&format!("[null, [4, 0, {}], null]", fk)).unwrap();
        assert_eq!(verify(&reversed, &solutions, ArrowMode::Auto).unwrap().matched, None);
    }

    #[test]
    fn test_manual_mode_compares_arrows() {
        let solutions = solutions_for(
            r#"{"entities": ["Customer", "Order"], "relation": "places", "solution": ["cn", "1"]}"#,
        );
        let unconfirmed = solutions[0].without_arrows();
        assert_eq!(
            verify(&unconfirmed, &solutions, ArrowMode::Auto).unwrap().matched,
            Some(0)
        );
        assert_eq!(
            verify(&unconfirmed, &solutions, ArrowMode::Manual).unwrap().matched,
            None
        );
    }

    #[test]
    fn test_malformed_answer_rejected() {
        let solutions = solutions_for(
            r#"{"entities": ["Customer", "Product"], "relation": "buys", "solution": ["cn", "cn"]}"#,
        );
        let short = Schema::empty(3);
        assert!(matches!(
            verify(&short, &solutions, ArrowMode::Auto),
            Err(SchemaError::TableCount { expected: 3, found: 4 })
        ));
    }

    #[test]
    fn test_no_solutions_no_match() {
        let v = verify(&Schema::empty(2), &[], ArrowMode::Auto).unwrap();
        assert_eq!(v.matched, None);
        assert!(!v.is_alternate);
    }

    #[test]
    fn test_arrow_mode_from_str() {
        assert_eq!(ArrowMode::from_str("auto"), Some(ArrowMode::Auto));
        assert_eq!(ArrowMode::from_str("manual"), Some(ArrowMode::Manual));
        assert_eq!(ArrowMode::from_str("sideways"), None);
    }
}

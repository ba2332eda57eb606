//! Phrase data contract: the static input the trainer grades against.

use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
pub enum PhraseError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Expected 2 to 4 entities, found {0}")]
    EntityCount(usize),
    #[error("Unknown cardinality code: {0:?}")]
    UnknownCardinality(String),
    #[error("Unknown hierarchy code: {0:?}")]
    UnknownHierarchy(String),
    #[error("Expected {expected} cardinalities, found {found}")]
    CardinalityCount { expected: usize, found: usize },
    #[error("Hierarchy needs a supertype and 2 or 3 subtypes, found {0} entities")]
    HierarchyEntities(usize),
    #[error("Hierarchy solution must be [completeness, disjointness], found {0} codes")]
    HierarchyArity(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cardinality {
    #[serde(rename = "1")]
    One,
    #[serde(rename = "c")]
    Cond,
    #[serde(rename = "n")]
    Many,
    #[serde(rename = "cn")]
    CondMany,
}

impl Cardinality {
    pub const ALL: [Self; 4] = [Self::One, Self::Cond, Self::Many, Self::CondMany];

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "1" => Some(Self::One),
            "c" => Some(Self::Cond),
            "n" => Some(Self::Many),
            "cn" => Some(Self::CondMany),
            _ => None,
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            Self::One => "1",
            Self::Cond => "c",
            Self::Many => "n",
            Self::CondMany => "cn",
        }
    }

    /// At most one partner.
    pub fn is_single(self) -> bool {
        matches!(self, Self::One | Self::Cond)
    }

    pub fn is_multi(self) -> bool {
        !self.is_single()
    }

    /// Minimum participation is one.
    pub fn is_mandatory(self) -> bool {
        matches!(self, Self::One | Self::Many)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Completeness {
    Total,
    Partial,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Disjointness {
    Disjoint,
    NonDisjoint,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HierarchySpec {
    pub completeness: Completeness,
    pub disjointness: Disjointness,
}

impl HierarchySpec {
    pub fn from_codes(completeness: &str, disjointness: &str) -> Result<Self, PhraseError> {
        let completeness = match completeness {
            "t" => Completeness::Total,
            "p" => Completeness::Partial,
            other => return Err(PhraseError::UnknownHierarchy(other.to_string())),
        };
        let disjointness = match disjointness {
            "d" => Disjointness::Disjoint,
            "n" => Disjointness::NonDisjoint,
            other => return Err(PhraseError::UnknownHierarchy(other.to_string())),
        };
        Ok(Self {
            completeness,
            disjointness,
        })
    }

    pub fn codes(self) -> [&'static str; 2] {
        let c = match self.completeness {
            Completeness::Total => "t",
            Completeness::Partial => "p",
        };
        let d = match self.disjointness {
            Disjointness::Disjoint => "d",
            Disjointness::NonDisjoint => "n",
        };
        [c, d]
    }
}

/// What the phrase says about how its entities relate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PhraseSolution {
    Cardinalities(Vec<Cardinality>),
    Hierarchy(HierarchySpec),
}

/// Wire shape of a phrase as stored in the datasets.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhraseData {
    pub entities: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roles: Option<Vec<String>>,
    pub solution: Vec<String>,
}

/// A validated phrase. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "PhraseData", into = "PhraseData")]
pub struct Phrase {
    pub entities: Vec<String>,
    pub relation: Option<String>,
    pub roles: Vec<String>,
    pub solution: PhraseSolution,
}

impl TryFrom<PhraseData> for Phrase {
    type Error = PhraseError;

    fn try_from(data: PhraseData) -> Result<Self, Self::Error> {
        let count = data.entities.len();
        if !(2..=4).contains(&count) {
            return Err(PhraseError::EntityCount(count));
        }

        // The solution codes are read differently depending on whether
        // the phrase names a relation: "n" is MANY there, non-disjoint here.
        let solution = match data.relation {
            Some(_) => {
                if data.solution.len() != count {
                    return Err(PhraseError::CardinalityCount {
                        expected: count,
                        found: data.solution.len(),
                    });
                }
                let cards = data
                    .solution
                    .iter()
                    .map(|code| {
                        Cardinality::from_code(code)
                            .ok_or_else(|| PhraseError::UnknownCardinality(code.clone()))
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                PhraseSolution::Cardinalities(cards)
            }
            None => {
                if count < 3 {
                    return Err(PhraseError::HierarchyEntities(count));
                }
                match data.solution.as_slice() {
                    [c, d] => PhraseSolution::Hierarchy(HierarchySpec::from_codes(c, d)?),
                    other => return Err(PhraseError::HierarchyArity(other.len())),
                }
            }
        };

        Ok(Phrase {
            entities: data.entities,
            relation: data.relation,
            roles: data.roles.unwrap_or_default(),
            solution,
        })
    }
}

impl From<Phrase> for PhraseData {
    fn from(phrase: Phrase) -> Self {
        let solution = match &phrase.solution {
            PhraseSolution::Cardinalities(cards) => {
                cards.iter().map(|c| c.code().to_string()).collect()
            }
            PhraseSolution::Hierarchy(spec) => {
                spec.codes().iter().map(|c| c.to_string()).collect()
            }
        };
        PhraseData {
            entities: phrase.entities,
            relation: phrase.relation,
            roles: if phrase.roles.is_empty() {
                None
            } else {
                Some(phrase.roles)
            },
            solution,
        }
    }
}

impl Phrase {
    pub fn from_json(input: &str) -> Result<Self, PhraseError> {
        let data: PhraseData = serde_json::from_str(input)?;
        Self::try_from(data)
    }

    /// Parses a dataset: a JSON array of phrases.
    pub fn list_from_json(input: &str) -> Result<Vec<Self>, PhraseError> {
        let data: Vec<PhraseData> = serde_json::from_str(input)?;
        data.into_iter().map(Self::try_from).collect()
    }

    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// First two entities share a name: a self-relation.
    pub fn is_recursive(&self) -> bool {
        self.entities.len() == 2 && self.entities[0] == self.entities[1]
    }

    /// Display name for the table at `index` (0 is the relation table).
    pub fn table_name(&self, index: usize) -> String {
        if index == 0 {
            return match &self.relation {
                Some(rel) => rel.clone(),
                None => "relation".to_string(),
            };
        }
        self.entities
            .get(index - 1)
            .cloned()
            .unwrap_or_else(|| format!("table{}", index))
    }

    /// Column name for a slot referencing role `index`: the role if given,
    /// otherwise the entity name.
    pub fn column_name(&self, index: usize) -> String {
        if index == 0 {
            return "id".to_string();
        }
        self.roles
            .get(index - 1)
            .filter(|r| !r.is_empty())
            .cloned()
            .unwrap_or_else(|| self.table_name(index).to_lowercase())
    }
}

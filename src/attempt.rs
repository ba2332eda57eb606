//! One student attempt at one phrase.

use crate::classify::{Classification, classify};
use crate::feedback::{Feedback, feedback_keys};
use crate::phrase::Phrase;
use crate::schema::{Schema, SchemaError};
use crate::solution::generate_solutions;
use crate::verify::{ArrowMode, Verdict, verify};

/// A phrase together with its classification and accepted solutions,
/// computed once when the attempt starts.
#[derive(Debug, Clone)]
pub struct PhraseAttempt {
    phrase: Phrase,
    classification: Classification,
    solutions: Vec<Schema>,
}

impl PhraseAttempt {
    pub fn new(phrase: Phrase) -> Self {
        let classification = classify(&phrase);
        let solutions = generate_solutions(&classification);
        Self {
            phrase,
            classification,
            solutions,
        }
    }

    pub fn phrase(&self) -> &Phrase {
        &self.phrase
    }

    pub fn classification(&self) -> &Classification {
        &self.classification
    }

    pub fn solutions(&self) -> &[Schema] {
        &self.solutions
    }

    /// The answer shown as correct.
    pub fn main_solution(&self) -> Option<&Schema> {
        self.solutions.first()
    }

    /// Whether submission makes sense at all.
    pub fn is_gradable(&self) -> bool {
        !self.solutions.is_empty()
    }

    /// A fresh, empty answer sized for this phrase.
    pub fn blank_answer(&self) -> Schema {
        Schema::empty(self.phrase.entity_count())
    }

    pub fn verify(&self, answer: &Schema, mode: ArrowMode) -> Result<Verdict, SchemaError> {
        verify(answer, &self.solutions, mode)
    }

    pub fn feedback(&self, answer: &Schema, verdict: &Verdict) -> Vec<Feedback> {
        feedback_keys(&self.classification, answer, &self.solutions, verdict)
    }

    /// Verifies and selects feedback in one go.
    pub fn grade(
        &self,
        answer: &Schema,
        mode: ArrowMode,
    ) -> Result<(Verdict, Vec<Feedback>), SchemaError> {
        let verdict = self.verify(answer, mode)?;
        let keys = self.feedback(answer, &verdict);
        Ok((verdict, keys))
    }
}

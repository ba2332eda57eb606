pub mod attempt;
pub mod attribute;
pub mod classify;
pub mod feedback;
pub mod phrase;
pub mod render;
pub mod schema;
pub mod solution;
pub mod verify;

use wasm_bindgen::prelude::*;

use attempt::PhraseAttempt;
use phrase::Phrase;
use schema::Schema;
use verify::ArrowMode;

/// Initialize panic hook for better error messages in WASM
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(target_arch = "wasm32")]
    console_error_panic_hook::set_once();
}

fn arrow_mode(mode: Option<String>) -> Result<ArrowMode, String> {
    match mode.as_deref() {
        None => Ok(ArrowMode::default()),
        Some(s) => ArrowMode::from_str(s).ok_or_else(|| format!("Invalid arrow mode: {}", s)),
    }
}

fn load_attempt(phrase: &str) -> Result<PhraseAttempt, String> {
    let phrase = Phrase::from_json(phrase).map_err(|e| e.to_string())?;
    Ok(PhraseAttempt::new(phrase))
}

/// Classify a phrase; returns the classification as JSON
#[wasm_bindgen(js_name = "classify")]
pub fn classify_phrase(phrase: &str) -> Result<String, String> {
    let attempt = load_attempt(phrase)?;
    serde_json::to_string(attempt.classification()).map_err(|e| e.to_string())
}

/// All accepted schemas for a phrase, main first, as JSON
#[wasm_bindgen(js_name = "generateSolutions")]
pub fn generate_solutions(phrase: &str) -> Result<String, String> {
    let attempt = load_attempt(phrase)?;
    serde_json::to_string(attempt.solutions()).map_err(|e| e.to_string())
}

/// Grade an answer against a solution set; returns the verdict as JSON
#[wasm_bindgen(js_name = "verify")]
pub fn verify_answer(
    answer: &str,
    solutions: &str,
    arrows: Option<String>,
) -> Result<String, String> {
    let mode = arrow_mode(arrows)?;
    let answer = Schema::from_json(answer).map_err(|e| e.to_string())?;
    let solutions: Vec<Schema> = serde_json::from_str(solutions).map_err(|e| e.to_string())?;
    let verdict = verify::verify(&answer, &solutions, mode).map_err(|e| e.to_string())?;
    serde_json::to_string(&verdict).map_err(|e| e.to_string())
}

/// Feedback message keys for an answer to a phrase
#[wasm_bindgen(js_name = "feedbackKeys")]
pub fn feedback_keys(
    phrase: &str,
    answer: &str,
    arrows: Option<String>,
) -> Result<js_sys::Array, String> {
    let mode = arrow_mode(arrows)?;
    let attempt = load_attempt(phrase)?;
    let answer = Schema::from_json(answer).map_err(|e| e.to_string())?;
    let (_, keys) = attempt.grade(&answer, mode).map_err(|e| e.to_string())?;
    Ok(keys
        .into_iter()
        .map(|k| JsValue::from_str(k.key()))
        .collect())
}

/// Main solution in relational notation
#[wasm_bindgen(js_name = "renderSolution")]
pub fn render_solution(phrase: &str) -> Result<String, String> {
    let attempt = load_attempt(phrase)?;
    let main = attempt
        .main_solution()
        .ok_or_else(|| "Phrase cannot be graded".to_string())?;
    Ok(render::render_schema(main, attempt.phrase()))
}

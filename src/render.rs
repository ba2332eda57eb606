//! Plain-text relational notation for schemas.
//!
//! ```text
//! Pot  (PK id)
//! Lid  (PK id, pot -> Pot [AK, NULL])
//! ```

use crate::attribute::AttributeState;
use crate::phrase::Phrase;
use crate::schema::{Schema, TableState};
use unicode_width::UnicodeWidthStr;

/// Terminal columns taken by `text`; wide characters count double.
pub fn text_width(text: &str) -> usize {
    UnicodeWidthStr::width(text)
}

fn pad(text: &str, width: usize) -> String {
    let mut out = text.to_string();
    for _ in text_width(text)..width {
        out.push(' ');
    }
    out
}

/// One line per created table, names aligned. Relation table comes last,
/// after the entity tables it references.
pub fn render_schema(schema: &Schema, phrase: &Phrase) -> String {
    let order: Vec<usize> = (1..schema.tables.len()).chain(std::iter::once(0)).collect();
    let names: Vec<(usize, String)> = order
        .into_iter()
        .filter(|&i| schema.table(i).is_present())
        .map(|i| (i, phrase.table_name(i)))
        .collect();
    let width = names.iter().map(|(_, n)| text_width(n)).max().unwrap_or(0);

    let mut out = String::new();
    for (index, name) in &names {
        let columns = render_columns(schema.table(*index), phrase);
        out.push_str(&format!("{}  ({})\n", pad(name, width), columns.join(", ")));
    }
    out
}

fn render_columns(table: &TableState, phrase: &Phrase) -> Vec<String> {
    table
        .attributes()
        .iter()
        .enumerate()
        .filter(|(_, a)| !a.is_empty())
        .map(|(slot, a)| render_column(phrase.column_name(slot), *a, phrase))
        .collect()
}

fn render_column(name: String, attr: AttributeState, phrase: &Phrase) -> String {
    let mut col = String::new();
    if attr.is_primary_key() {
        col.push_str("PK ");
    }
    col.push_str(&name);
    for target in attr.foreign_key_targets() {
        let arrow = if attr.has_arrow(target) { "->" } else { "-" };
        col.push_str(&format!(" {} {}", arrow, phrase.table_name(target)));
    }

    let mut tags = Vec::new();
    if attr.is_alternate_key() {
        tags.push("AK");
    }
    if attr.is_optional() {
        tags.push("NULL");
    }
    if attr.is_mandatory() {
        tags.push("NOT NULL");
    }
    if !tags.is_empty() {
        col.push_str(&format!(" [{}]", tags.join(", ")));
    }
    col
}

/// Every accepted solution, main first.
pub fn render_solutions(solutions: &[Schema], phrase: &Phrase) -> String {
    let mut out = String::new();
    for (i, s) in solutions.iter().enumerate() {
        let label = if i == 0 { "main" } else { "alternate" };
        out.push_str(&format!("Solution {} ({}):\n", i + 1, label));
        for line in render_schema(s, phrase).lines() {
            out.push_str(&format!("  {}\n", line));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attempt::PhraseAttempt;

    fn attempt(json: &str) -> PhraseAttempt {
        PhraseAttempt::new(Phrase::from_json(json).unwrap())
    }

    #[test]
    fn test_ascii_width() {
        assert_eq!(text_width("User"), 4);
    }

    #[test]
    fn test_unicode_width() {
        // 全角文字は幅2
        assert_eq!(text_width("ユーザー"), 8);
        assert_eq!(pad("鍋", 4), "鍋  ");
    }

    #[test]
    fn test_render_one_to_one() {
        let a = attempt(r#"{"entities": ["Pot", "Lid"], "relation": "has", "solution": ["1", "c"]}"#);
        let text = render_schema(a.main_solution().unwrap(), a.phrase());
        assert_eq!(text, "Pot  (PK id)\nLid  (PK id, pot -> Pot [AK, NULL])\n");
    }

    #[test]
    fn test_render_junction_last() {
        let a = attempt(
            r#"{"entities": ["Customer", "Product"], "relation": "buys", "solution": ["cn", "cn"]}"#,
        );
        let text = render_schema(a.main_solution().unwrap(), a.phrase());
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("Customer  (PK id)"));
        assert_eq!(
            lines[2],
            "buys      (PK customer -> Customer, PK product -> Product)"
        );
    }

    #[test]
    fn test_render_roles_and_unconfirmed_arrow() {
        let a = attempt(
            r#"{"entities": ["Employee", "Employee"], "relation": "reports to",
                "roles": ["manager", "subordinate"], "solution": ["n", "1"]}"#,
        );
        let text = render_schema(&a.main_solution().unwrap().without_arrows(), a.phrase());
        assert_eq!(text, "Employee  (PK id, manager - Employee [NOT NULL])\n");
    }

    #[test]
    fn test_render_solutions_labels() {
        let a = attempt(r#"{"entities": ["Pot", "Lid"], "relation": "has", "solution": ["1", "1"]}"#);
        let text = render_solutions(a.solutions(), a.phrase());
        assert!(text.contains("Solution 1 (main):"));
        assert!(text.contains("Solution 2 (alternate):"));
    }
}

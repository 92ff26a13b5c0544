use tabled::{settings::Style, Table, Tabled};

use crate::language::LanguageDef;

#[derive(Tabled)]
pub struct LanguageRow {
    #[tabled(rename = "Language")]
    pub name: String,
    #[tabled(rename = "Type")]
    pub category: String,
    #[tabled(rename = "Service ID")]
    pub service_id: String,
    #[tabled(rename = "Extensions")]
    pub extensions: String,
}

impl From<&LanguageDef> for LanguageRow {
    fn from(def: &LanguageDef) -> Self {
        Self {
            name: def.name.to_string(),
            category: def.category.to_string(),
            service_id: def.service_id.to_string(),
            extensions: def
                .extensions
                .iter()
                .map(|e| format!(".{}", e))
                .collect::<Vec<_>>()
                .join(" "),
        }
    }
}

#[derive(Default)]
pub struct TableBuilder {
    rows: Vec<LanguageRow>,
}

impl TableBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_row(&mut self, row: LanguageRow) {
        self.rows.push(row);
    }

    pub fn build(&self) -> String {
        if self.rows.is_empty() {
            return String::new();
        }

        Table::new(&self.rows).with(Style::rounded()).to_string()
    }
}

pub fn languages_table(languages: &[LanguageDef]) -> String {
    let mut builder = TableBuilder::new();
    for def in languages {
        builder.add_row(LanguageRow::from(def));
    }
    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::language::LANGUAGES;

    #[test]
    fn test_languages_table_lists_every_language() {
        let table = languages_table(LANGUAGES);
        for lang in LANGUAGES {
            assert!(table.contains(lang.name), "{}", lang.name);
        }
        assert!(table.contains(".py .pyw .pyi"));
    }

    #[test]
    fn test_empty_table() {
        assert!(TableBuilder::new().build().is_empty());
    }
}

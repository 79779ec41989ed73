use tabled::{settings::Style, Table, Tabled};
use crate::chain::CognateChain;

#[derive(Tabled)]
pub struct TableRow {
    #[tabled(rename = "Metric")]
    pub metric: String,
    #[tabled(rename = "Value")]
    pub value: String,
}

#[derive(Default)]
pub struct TableBuilder {
    rows: Vec<TableRow>,
}

impl TableBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_row(&mut self, label: &str, value: &str) {
        self.rows.push(TableRow {
            metric: label.to_string(),
            value: value.to_string(),
        });
    }

    pub fn build(&self) -> String {
        if self.rows.is_empty() {
            return String::new();
        }

        Table::new(&self.rows).with(Style::rounded()).to_string()
    }
}

pub fn stats_table(stats: &[(&str, &str)]) -> String {
    let mut builder = TableBuilder::new();
    for (label, value) in stats {
        builder.add_row(label, value);
    }
    builder.build()
}

#[derive(Tabled)]
struct ChainRow {
    #[tabled(rename = "#")]
    position: usize,
    #[tabled(rename = "Word")]
    word: String,
    #[tabled(rename = "Translit")]
    transliteration: String,
    #[tabled(rename = "Language")]
    language: String,
    #[tabled(rename = "Placed at")]
    coordinates: String,
}

/// Render one chain, one row per word in visitation order
pub fn chain_table(chain: &CognateChain) -> String {
    let rows: Vec<ChainRow> = chain
        .iter()
        .enumerate()
        .map(|(i, w)| ChainRow {
            position: i + 1,
            word: w.word.clone(),
            transliteration: w.transliteration.clone(),
            language: format!("{} ({})", w.language.name, w.language.code),
            coordinates: match w.language.coordinates.as_slice() {
                [lat, lng, ..] => format!("{:.2}, {:.2}", lat, lng),
                _ => "-".to_string(),
            },
        })
        .collect();

    Table::new(&rows).with(Style::rounded()).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::ChainWord;
    use crate::language::LanguageInfo;

    #[test]
    fn test_stats_table_renders_rows() {
        let table = stats_table(&[("Concepts", "3")]);
        assert!(table.contains("Concepts"));
        assert!(TableBuilder::new().build().is_empty());
    }

    #[test]
    fn test_chain_table() {
        let chain = CognateChain {
            words: vec![ChainWord {
                word: "мать".into(),
                transliteration: "mat'".into(),
                language: LanguageInfo::new("rus", "Russian", 55.75, 37.62),
            }],
        };
        let table = chain_table(&chain);
        assert!(table.contains("Russian (rus)"));
        assert!(table.contains("55.75, 37.62"));
    }
}

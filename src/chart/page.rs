use tracing::debug;

use super::footer::parse_trainers_footer;
use super::header::{Surface, parse_race_conditions, parse_race_header};
use super::row::{HorseEntry, parse_horse_row};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultRow {
    pub date: String,
    pub race_number: String,
    pub surface: Option<Surface>,
    pub distance: Option<String>,
    pub jockey: String,
    pub trainer: String,
    pub win: u8,
    pub place: u8,
    pub show: u8,
}

pub fn extract_table(pages: &[String]) -> Vec<ResultRow> {
    let mut rows = Vec::new();
    for page in pages {
        rows.extend(extract_page_rows(page));
    }
    rows
}

pub fn extract_page_rows(text: &str) -> Vec<ResultRow> {
    // No recognizable header means the page carries no race results at all.
    let Some(header) = parse_race_header(text) else {
        return Vec::new();
    };

    let conditions = parse_race_conditions(text);
    let trainers = parse_trainers_footer(text);

    let entries: Vec<HorseEntry> = text.split('\n').filter_map(parse_horse_row).collect();
    debug!(
        track = %header.track,
        race = %header.race_number,
        entries = entries.len(),
        "recognized race page"
    );

    entries
        .into_iter()
        .enumerate()
        .map(|(index, entry)| {
            // Source rows are listed by finish position; rank is 1-based.
            let rank = index + 1;
            ResultRow {
                date: header.date.clone(),
                race_number: header.race_number.clone(),
                surface: conditions.as_ref().map(|c| c.surface),
                distance: conditions.as_ref().map(|c| c.distance.clone()),
                jockey: entry.jockey,
                trainer: trainers
                    .get(&entry.program_number)
                    .cloned()
                    .unwrap_or_default(),
                win: u8::from(rank == 1),
                place: u8::from(rank == 2),
                show: u8::from(rank == 3),
            }
        })
        .collect()
}

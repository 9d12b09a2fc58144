use super::names::{space_after_commas, split_case_transitions};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HorseEntry {
    pub program_number: String,
    pub jockey: String,
}

pub fn extract_jockey_and_horse(token: &str) -> Option<(String, String)> {
    if !token.ends_with(')') {
        return None;
    }

    // Right-to-left depth scan finds the last balanced group, so a horse name
    // carrying its own parenthesized suffix stays on the horse side.
    let characters: Vec<char> = token.chars().collect();
    let mut balance = 0i32;
    let mut open_index = None;

    for (index, character) in characters.iter().enumerate().rev() {
        match character {
            ')' => balance += 1,
            '(' => {
                balance -= 1;
                if balance == 0 {
                    open_index = Some(index);
                    break;
                }
            }
            _ => {}
        }
    }

    let open_index = open_index?;
    let horse = characters[..open_index]
        .iter()
        .collect::<String>()
        .trim()
        .to_string();
    let jockey_raw = characters[open_index + 1..characters.len() - 1]
        .iter()
        .collect::<String>();

    Some((horse, clean_jockey(jockey_raw.trim())))
}

fn clean_jockey(raw: &str) -> String {
    let mut jockey = space_after_commas(raw);
    jockey = split_case_transitions(&jockey);
    if jockey.contains('(') && !jockey.contains(" (") {
        jockey = jockey.replace('(', " (");
    }
    jockey
}

pub fn parse_horse_row(line: &str) -> Option<HorseEntry> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    if line.starts_with('$')
        || line.contains("Pick")
        || line.contains("Double")
        || line.contains("Exacta")
    {
        return None;
    }

    let parts: Vec<&str> = line.split_whitespace().collect();
    let (anchor_index, program_number) = parts.iter().enumerate().find_map(|(index, part)| {
        if !part.chars().next().is_some_and(|c| c.is_ascii_digit()) {
            return None;
        }
        if is_date_shaped(part) {
            return None;
        }
        is_program_number(part).then_some((index, *part))
    })?;

    if let Some(candidate) = parts.get(anchor_index + 1) {
        if candidate.contains('(') && candidate.contains(')') {
            if let Some(entry) = accept_name_pair(program_number, candidate) {
                return Some(entry);
            }
        }
    }

    for part in &parts[anchor_index + 1..] {
        if part.contains('(') && part.ends_with(')') {
            if let Some(entry) = accept_name_pair(program_number, part) {
                return Some(entry);
            }
        }
    }

    None
}

fn accept_name_pair(program_number: &str, token: &str) -> Option<HorseEntry> {
    let (horse, jockey) = extract_jockey_and_horse(token)?;
    if horse.is_empty() || jockey.is_empty() || !jockey.contains(',') {
        return None;
    }

    Some(HorseEntry {
        program_number: program_number.to_string(),
        jockey,
    })
}

fn is_program_number(token: &str) -> bool {
    let digits = token.chars().take_while(|c| c.is_ascii_digit()).count();
    digits > 0
        && token
            .chars()
            .skip(digits)
            .all(|c| c.is_ascii_alphabetic())
}

// Past-performance dates print as digits + 3-letter month + digits (18Dec22)
// and would otherwise pass for a program number.
fn is_date_shaped(token: &str) -> bool {
    let characters: Vec<char> = token.chars().collect();
    characters.windows(5).any(|window| {
        window[0].is_ascii_digit()
            && window[1..4].iter().all(|c| c.is_ascii_alphabetic())
            && window[4].is_ascii_digit()
    })
}

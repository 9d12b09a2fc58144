use regex::Regex;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RaceHeader {
    pub track: String,
    pub date: String,
    pub race_number: String,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Surface {
    Dirt,
    Turf,
    AllWeather,
    Tapeta,
    Unknown,
}

impl Surface {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Dirt => "Dirt",
            Self::Turf => "Turf",
            Self::AllWeather => "All Weather",
            Self::Tapeta => "Tapeta",
            Self::Unknown => "Unknown",
        }
    }

    fn classify(raw: &str) -> Self {
        let candidates = [
            Self::Dirt,
            Self::Turf,
            Self::AllWeather,
            Self::Tapeta,
        ];
        let lowered = raw.to_lowercase();

        candidates
            .into_iter()
            .find(|surface| lowered.contains(&surface.as_str().to_lowercase()))
            .unwrap_or(Self::Unknown)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RaceConditions {
    pub distance: String,
    pub surface: Surface,
}

pub fn parse_race_header(text: &str) -> Option<RaceHeader> {
    let pattern = Regex::new(r"([A-Z\s.]+?)\s*-\s*(.*?)\s*-\s*(?i:Race)\s*([0-9]+)").ok()?;
    let captures = pattern.captures(text)?;

    Some(RaceHeader {
        track: captures.get(1)?.as_str().trim().to_string(),
        date: format_race_date(captures.get(2)?.as_str().trim()),
        race_number: captures.get(3)?.as_str().trim().to_string(),
    })
}

pub fn format_race_date(raw: &str) -> String {
    let Ok(month_day) = Regex::new(r"([A-Za-z]+)([0-9]+)") else {
        return raw.to_string();
    };
    let Ok(comma_year) = Regex::new(r"([0-9]+),([0-9]+)") else {
        return raw.to_string();
    };

    let spaced = month_day.replace_all(raw, "${1} ${2}");
    comma_year.replace_all(&spaced, "${1}, ${2}").into_owned()
}

pub fn parse_race_conditions(text: &str) -> Option<RaceConditions> {
    let pattern = Regex::new(r"(?i)Distance:\s*(.*?)\s*On\s*The\s*(.*)").ok()?;
    let captures = pattern.captures(text)?;

    Some(RaceConditions {
        distance: respace_distance(captures.get(1)?.as_str().trim()),
        surface: Surface::classify(captures.get(2)?.as_str().trim()),
    })
}

fn respace_distance(distance: &str) -> String {
    if distance.contains(' ') || distance.chars().count() <= 3 {
        return distance.to_string();
    }

    let mut respaced = String::with_capacity(distance.len());
    for (index, character) in distance.chars().enumerate() {
        if index > 0 && character.is_ascii_uppercase() {
            respaced.push(' ');
        }
        respaced.push(character);
    }

    respaced
}

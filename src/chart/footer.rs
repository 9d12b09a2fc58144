use std::collections::HashMap;

use regex::Regex;

use super::names::segment_name;

pub fn parse_trainers_footer(text: &str) -> HashMap<String, String> {
    let mut directory = HashMap::new();

    let Some(section) = footer_section(text) else {
        return directory;
    };

    // Entries wrap across lines, so the section is flattened before splitting.
    let flattened = section.replace('\n', " ");
    for entry in flattened.split(';') {
        let entry = entry.trim();
        if entry.is_empty() {
            continue;
        }

        let Some((program_number, name)) = split_directory_entry(entry) else {
            continue;
        };

        let name = name.strip_suffix('.').unwrap_or(name);
        directory.insert(program_number.to_string(), segment_name(name));
    }

    directory
}

fn footer_section(text: &str) -> Option<&str> {
    let trainers_marker = Regex::new(r"(?i)Trainers:").ok()?;
    let owners_marker = Regex::new(r"(?i)Owners:").ok()?;

    let start = trainers_marker.find(text)?.end();
    let section = &text[start..];
    let end = owners_marker
        .find(section)
        .map(|found| found.start())
        .unwrap_or(section.len());

    Some(&section[..end])
}

fn split_directory_entry(entry: &str) -> Option<(&str, &str)> {
    let digits = entry.chars().take_while(|c| c.is_ascii_digit()).count();
    if digits == 0 {
        return None;
    }

    let letters = entry[digits..]
        .chars()
        .take_while(|c| c.is_ascii_alphabetic())
        .count();
    let program_number = &entry[..digits + letters];

    let remainder = entry[digits + letters..].trim_start();
    let name = remainder.strip_prefix('-')?.trim_start();

    Some((program_number, name))
}

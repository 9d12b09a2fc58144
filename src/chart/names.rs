use regex::Regex;

pub fn segment_name(raw: &str) -> String {
    let mut name = space_after_commas(raw);
    name = split_case_transitions(&name);
    name = rejoin_name_prefixes(&name);
    space_after_periods(&name)
}

pub(crate) fn space_after_commas(name: &str) -> String {
    if name.contains(',') && !name.contains(", ") {
        name.replace(',', ", ")
    } else {
        name.to_string()
    }
}

pub(crate) fn split_case_transitions(name: &str) -> String {
    let mut split = String::with_capacity(name.len());
    let mut previous: Option<char> = None;

    for character in name.chars() {
        if character.is_ascii_uppercase()
            && previous.is_some_and(|prior| prior.is_ascii_lowercase())
        {
            split.push(' ');
        }
        split.push(character);
        previous = Some(character);
    }

    split
}

fn rejoin_name_prefixes(name: &str) -> String {
    let Ok(pattern) = Regex::new(r"\b(De|Mc|Mac|O)\s+([A-Z])") else {
        return name.to_string();
    };

    pattern.replace_all(name, "${1}${2}").into_owned()
}

fn space_after_periods(name: &str) -> String {
    let mut spaced = String::with_capacity(name.len());
    let mut characters = name.chars().peekable();

    while let Some(character) = characters.next() {
        spaced.push(character);
        if character == '.'
            && characters
                .peek()
                .is_some_and(|next| next.is_ascii_uppercase())
        {
            spaced.push(' ');
        }
    }

    spaced
}

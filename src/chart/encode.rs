use super::page::ResultRow;

pub const CSV_COLUMNS: [&str; 9] = [
    "Date", "Race #", "Surface", "Distance", "Jockey", "Trainer", "WIN", "PLACE", "SHOW",
];

pub fn encode_csv(rows: &[ResultRow]) -> Vec<u8> {
    let mut encoded = String::new();

    append_record(&mut encoded, &CSV_COLUMNS.map(String::from));
    for row in rows {
        append_record(
            &mut encoded,
            &[
                row.date.clone(),
                row.race_number.clone(),
                row.surface
                    .map(|surface| surface.as_str().to_string())
                    .unwrap_or_default(),
                row.distance.clone().unwrap_or_default(),
                row.jockey.clone(),
                row.trainer.clone(),
                row.win.to_string(),
                row.place.to_string(),
                row.show.to_string(),
            ],
        );
    }

    encoded.into_bytes()
}

fn append_record(encoded: &mut String, fields: &[String]) {
    for (index, field) in fields.iter().enumerate() {
        if index > 0 {
            encoded.push(',');
        }
        encoded.push('"');
        encoded.push_str(&field.replace('"', "\"\""));
        encoded.push('"');
    }
    encoded.push_str("\r\n");
}

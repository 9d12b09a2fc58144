use super::*;

#[test]
fn parse_race_header_reads_spaced_headers() {
    let header = parse_race_header("AQUEDUCT - January 1, 2025 - Race 3").expect("header");
    assert_eq!(header.track, "AQUEDUCT");
    assert_eq!(header.date, "January 1, 2025");
    assert_eq!(header.race_number, "3");
}

#[test]
fn parse_race_header_recovers_compressed_headers() {
    let header = parse_race_header("AQUEDUCT-January1,2025-Race1").expect("header");
    assert_eq!(header.track, "AQUEDUCT");
    assert_eq!(header.date, "January 1, 2025");
    assert_eq!(header.race_number, "1");
}

#[test]
fn parse_race_header_accepts_lowercase_race_keyword_and_spaced_tracks() {
    let header = parse_race_header("FINGER LAKES - June 10, 2024 - race 5").expect("header");
    assert_eq!(header.track, "FINGER LAKES");
    assert_eq!(header.race_number, "5");
}

#[test]
fn parse_race_header_without_race_keyword_is_none() {
    assert!(parse_race_header("AQUEDUCT - January 1, 2025 - Event 3").is_none());
    assert!(parse_race_header("no racing content on this page").is_none());
}

#[test]
fn format_race_date_inserts_missing_spaces() {
    assert_eq!(format_race_date("January1,2023"), "January 1, 2023");
    assert_eq!(format_race_date("January 1, 2025"), "January 1, 2025");
}

#[test]
fn parse_race_conditions_reads_spaced_text() {
    let conditions = parse_race_conditions("Distance: About One Mile On The Turf").expect("conditions");
    assert_eq!(conditions.distance, "About One Mile");
    assert_eq!(conditions.surface, Surface::Turf);
}

#[test]
fn parse_race_conditions_respaces_compressed_distance() {
    let conditions = parse_race_conditions("Distance:SixFurlongsOnTheDirt").expect("conditions");
    assert_eq!(conditions.distance, "Six Furlongs");
    assert_eq!(conditions.surface, Surface::Dirt);
}

#[test]
fn parse_race_conditions_compressed_all_weather_stays_unknown() {
    // The surface literal keeps its space, so "AllWeather" has no substring hit.
    let conditions = parse_race_conditions("Distance:FiveFurlongsOnTheAllWeather").expect("conditions");
    assert_eq!(conditions.distance, "Five Furlongs");
    assert_eq!(conditions.surface, Surface::Unknown);

    let spaced = parse_race_conditions("Distance: Five Furlongs On The All Weather").expect("conditions");
    assert_eq!(spaced.surface, Surface::AllWeather);
}

#[test]
fn parse_race_conditions_without_marker_is_none() {
    assert!(parse_race_conditions("Six Furlongs On The Dirt").is_none());
}

#[test]
fn segment_name_cleans_compressed_names() {
    assert_eq!(segment_name("Jones,Eduardo"), "Jones, Eduardo");
    assert_eq!(segment_name("SmithJohn"), "Smith John");
    assert_eq!(segment_name("BarreraIII"), "Barrera III");
    assert_eq!(segment_name("Bond,H.James"), "Bond, H. James");
}

#[test]
fn segment_name_keeps_surname_prefixes_joined() {
    assert_eq!(segment_name("McCormack,Kevin"), "McCormack, Kevin");
    assert_eq!(segment_name("DeLauro,Anthony"), "DeLauro, Anthony");
    assert_eq!(segment_name("MacDonaldGrant"), "MacDonald Grant");
}

#[test]
fn segment_name_is_idempotent() {
    let samples = [
        "Jones,Eduardo",
        "SmithJohn",
        "BarreraIII",
        "Bond,H.James",
        "McCormack,Kevin",
        "DeLauro,Anthony",
        "Brown, William",
    ];

    for sample in samples {
        let once = segment_name(sample);
        assert_eq!(segment_name(&once), once, "not idempotent for {sample}");
    }
}

#[test]
fn extract_jockey_and_horse_splits_simple_pairs() {
    let (horse, jockey) = extract_jockey_and_horse("Rozzyroo(Elliott,Christopher)").expect("pair");
    assert_eq!(horse, "Rozzyroo");
    assert_eq!(jockey, "Elliott, Christopher");
}

#[test]
fn extract_jockey_and_horse_handles_nested_parens() {
    let (horse, jockey) =
        extract_jockey_and_horse("Ghostlyprince(Huayas,Gherson(Jason))").expect("pair");
    assert_eq!(horse, "Ghostlyprince");
    assert_eq!(jockey, "Huayas, Gherson (Jason)");
}

#[test]
fn extract_jockey_and_horse_keeps_country_code_with_horse() {
    let (horse, jockey) = extract_jockey_and_horse("Caribbean(AUS)(Olver,Madison)").expect("pair");
    assert_eq!(horse, "Caribbean(AUS)");
    assert_eq!(jockey, "Olver, Madison");
}

#[test]
fn extract_jockey_and_horse_splits_compressed_jockey_names() {
    let (_, jockey) = extract_jockey_and_horse("Banker(RodriguezCastro,Orlando)").expect("pair");
    assert_eq!(jockey, "Rodriguez Castro, Orlando");
}

#[test]
fn extract_jockey_and_horse_without_group_is_none() {
    assert!(extract_jockey_and_horse("HorseName").is_none());
    assert!(extract_jockey_and_horse("Horse(Smith").is_none());
}

#[test]
fn parse_horse_row_reads_program_number_and_jockey() {
    let entry = parse_horse_row("1 Rozzyroo(Elliott,Christopher) 118 3.50").expect("entry");
    assert_eq!(entry.program_number, "1");
    assert_eq!(entry.jockey, "Elliott, Christopher");
}

#[test]
fn parse_horse_row_accepts_coupled_entries() {
    let entry = parse_horse_row("1A Mudlark(Castellano,Javier) 120 6.40").expect("entry");
    assert_eq!(entry.program_number, "1A");
}

#[test]
fn parse_horse_row_skips_date_shaped_tokens() {
    let entry = parse_horse_row("18Dec22 3 Fasthorse(Ortiz,Jose) 117").expect("entry");
    assert_eq!(entry.program_number, "3");
    assert_eq!(entry.jockey, "Ortiz, Jose");
}

#[test]
fn parse_horse_row_falls_back_to_later_tokens() {
    let entry = parse_horse_row("6 118 Longshot(Davis,Katie) 22.10").expect("entry");
    assert_eq!(entry.program_number, "6");
    assert_eq!(entry.jockey, "Davis, Katie");
}

#[test]
fn parse_horse_row_rejects_wager_lines() {
    assert!(parse_horse_row("$2 Daily Double (3-7) 45.20").is_none());
    assert!(parse_horse_row("10 Pick 3 (2-7-1) 120.50").is_none());
    assert!(parse_horse_row("1 Exacta (1-5) 12.00").is_none());
}

#[test]
fn parse_horse_row_rejects_lines_without_comma_jockey() {
    assert!(parse_horse_row("4 Solo(Smith) 120").is_none());
    assert!(parse_horse_row("").is_none());
    assert!(parse_horse_row("Scratched: Foggy Morning").is_none());
}

fn sample_page() -> String {
    [
        "AQUEDUCT - January 1, 2025 - Race 3",
        "Distance: Six Furlongs On The Dirt",
        "1 Rozzyroo(Elliott,Christopher) 123 3.50",
        "5 Ghostlyprince(Huayas,Gherson) 120 4.10",
        "2 Caribbean(AUS)(Olver,Madison) 118 9.80",
        "7 Lastplacer(Brown,Tom) 115 22.00",
        "$2 Exacta (1-5) 45.00",
        "Trainers: 1 - Jones, Eduardo; 5 - SmithJohn.; 2 - Brown, William",
        "Owners: 1 - Nobody Stables",
    ]
    .join("\n")
}

#[test]
fn extract_table_assigns_win_place_show_by_row_order() {
    let rows = extract_table(&[sample_page()]);
    assert_eq!(rows.len(), 4);

    assert_eq!(rows[0].race_number, "3");
    assert_eq!(rows[0].date, "January 1, 2025");
    assert_eq!(rows[0].surface, Some(Surface::Dirt));
    assert_eq!(rows[0].distance.as_deref(), Some("Six Furlongs"));

    assert_eq!((rows[0].win, rows[0].place, rows[0].show), (1, 0, 0));
    assert_eq!((rows[1].win, rows[1].place, rows[1].show), (0, 1, 0));
    assert_eq!((rows[2].win, rows[2].place, rows[2].show), (0, 0, 1));
    assert_eq!((rows[3].win, rows[3].place, rows[3].show), (0, 0, 0));
}

#[test]
fn extract_table_merges_trainer_directory_by_program_number() {
    let rows = extract_table(&[sample_page()]);

    assert_eq!(rows[0].trainer, "Jones, Eduardo");
    assert_eq!(rows[1].trainer, "Smith John");
    assert_eq!(rows[2].trainer, "Brown, William");
    // Program number 7 has no footer entry; the field stays empty.
    assert_eq!(rows[3].trainer, "");
}

#[test]
fn extract_table_skips_pages_without_header() {
    let pages = vec![sample_page(), "no racing content here".to_string()];
    assert_eq!(extract_table(&pages).len(), 4);
    assert!(extract_table(&["Distance: Six Furlongs On The Dirt".to_string()]).is_empty());
}

#[test]
fn parse_trainers_footer_reads_multiline_entries() {
    let directory = parse_trainers_footer("Trainers: 1 - Jones, Eduardo; 2 - \nBrown, William");
    assert_eq!(directory.get("1").map(String::as_str), Some("Jones, Eduardo"));
    assert_eq!(directory.get("2").map(String::as_str), Some("Brown, William"));
}

#[test]
fn parse_trainers_footer_stops_at_owners_marker() {
    let directory =
        parse_trainers_footer("Trainers: 1 - Jones, Eduardo\nOwners: 2 - Brown, William");
    assert_eq!(directory.len(), 1);
    assert!(directory.contains_key("1"));
}

#[test]
fn parse_trainers_footer_cleans_entry_names() {
    let directory = parse_trainers_footer("Trainers: 3 - DeLauro,Anthony; 4 - McPeek,Ken.; 5B - BarreraIII");
    assert_eq!(directory.get("3").map(String::as_str), Some("DeLauro, Anthony"));
    assert_eq!(directory.get("4").map(String::as_str), Some("McPeek, Ken"));
    assert_eq!(directory.get("5B").map(String::as_str), Some("Barrera III"));
}

#[test]
fn parse_trainers_footer_without_marker_is_empty() {
    assert!(parse_trainers_footer("Owners: 1 - Brown, William").is_empty());
    assert!(parse_trainers_footer("").is_empty());
}

#[test]
fn encode_csv_writes_quoted_header_and_rows() {
    let rows = extract_table(&[sample_page()]);
    let encoded = encode_csv(&rows);
    let text = String::from_utf8(encoded).expect("utf8");

    let mut lines = text.split("\r\n");
    assert_eq!(
        lines.next(),
        Some(r#""Date","Race #","Surface","Distance","Jockey","Trainer","WIN","PLACE","SHOW""#)
    );
    assert_eq!(
        lines.next(),
        Some(
            r#""January 1, 2025","3","Dirt","Six Furlongs","Elliott, Christopher","Jones, Eduardo","1","0","0""#
        )
    );
}

#[test]
fn encode_csv_is_deterministic() {
    let rows = extract_table(&[sample_page()]);
    assert_eq!(encode_csv(&rows), encode_csv(&rows));
}

#[test]
fn encode_csv_doubles_embedded_quotes() {
    let row = ResultRow {
        date: "January 1, 2025".to_string(),
        race_number: "1".to_string(),
        surface: None,
        distance: None,
        jockey: "Smith, Joe".to_string(),
        trainer: "Team \"Lucky\" Stable".to_string(),
        win: 1,
        place: 0,
        show: 0,
    };

    let text = String::from_utf8(encode_csv(&[row])).expect("utf8");
    assert!(text.contains(r#""Team ""Lucky"" Stable""#));
    assert!(text.contains(r#""","","Smith, Joe""#));
}

#[test]
fn encode_csv_of_empty_input_is_header_only() {
    let text = String::from_utf8(encode_csv(&[])).expect("utf8");
    assert_eq!(text.matches("\r\n").count(), 1);
}

use anyhow::Result;
use merch_etl::config::build_rng;
use merch_etl::{run_mode, CliConfig, ConvertConfig, EtlError, LocalStorage, Mode};
use std::collections::HashMap;
use tempfile::TempDir;

/// Writes a VOA export using the real form headers, including the
/// multi-line free-text questions.
fn write_voa_form(dir: &TempDir, rows: &[HashMap<&str, &str>]) -> Result<String> {
    let voa = ConvertConfig::default().voa;
    let mut header: Vec<String> = vec![
        "Timestamp".to_string(),
        voa.email[0].clone(),
        voa.name.clone(),
        voa.contact.clone(),
        voa.residency.clone(),
        voa.aesthetics.clone(),
    ];
    header.extend(voa.quantity_columns.iter().map(|c| c.column.clone()));
    header.extend(voa.text_columns.iter().map(|c| c.column.clone()));

    let key_for = |column: &str| -> String {
        if let Some(q) = voa.quantity_columns.iter().find(|q| q.column == column) {
            return format!("qty:{}", q.size);
        }
        if let Some(t) = voa.text_columns.iter().find(|t| t.column == column) {
            return format!("text:{}", t.design);
        }
        match column {
            c if c == voa.name => "name".to_string(),
            c if c == voa.contact => "contact".to_string(),
            c if c == voa.residency => "residency".to_string(),
            c if c == voa.aesthetics => "aesthetics".to_string(),
            c if c == voa.email[0] => "email".to_string(),
            other => other.to_string(),
        }
    };

    let path = dir.path().join("voa.csv");
    let mut writer = csv::Writer::from_path(&path)?;
    writer.write_record(&header)?;
    for row in rows {
        let record: Vec<&str> = header
            .iter()
            .map(|column| row.get(key_for(column).as_str()).copied().unwrap_or(""))
            .collect();
        writer.write_record(&record)?;
    }
    writer.flush()?;
    Ok(path.to_str().unwrap().to_string())
}

fn run(mode: Mode, input: &str, output: &str) -> merch_etl::Result<String> {
    run_mode(
        mode,
        LocalStorage::default(),
        CliConfig::new(mode, input, Some(output)),
        ConvertConfig::default(),
        build_rng(Some(1)),
    )
}

#[test]
fn test_voa_orders_then_printing_summary() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let input = write_voa_form(
        &temp_dir,
        &[
            // 7 x M over three designs: 3/2/2, plus 1 x XL to the first design.
            HashMap::from([
                ("name", "Asha"),
                ("email", "asha@x.in"),
                ("contact", "98450"),
                ("residency", "Hostel"),
                ("aesthetics", "Technocracy Blending, Dharma Warrior, Conquering The Abyss"),
                ("qty:M", "7"),
                ("qty:XL", "1.0"),
            ]),
            // No quantities: free-text columns are used.
            HashMap::from([
                ("name", "Ravi"),
                ("contact", "98860"),
                ("residency", "Day Scholar"),
                ("text:Dharma", "M,M,S"),
                ("text:Jacket", "1 L"),
                ("text:Abyss", "None"),
            ]),
            // Nothing ordered.
            HashMap::from([
                ("name", "Kiran"),
                ("contact", "1"),
                ("residency", "Hostel"),
                ("text:Technocracy", "none"),
            ]),
            // No name.
            HashMap::from([("contact", "2"), ("residency", "Hostel"), ("qty:S", "2")]),
            // Quantity without design choice defaults to Technocracy.
            HashMap::from([
                ("name", "Meera"),
                ("contact", "3"),
                ("residency", "Hostel"),
                ("qty:S", "2"),
            ]),
        ],
    )?;

    let orders = temp_dir.path().join("voa_orders.csv");
    run(Mode::Voa, &input, orders.to_str().unwrap())?;

    let mut reader = csv::Reader::from_path(&orders)?;
    let header: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    assert_eq!(
        header,
        ["name", "email", "contact", "residency", "design", "size"]
    );
    let rows: Vec<csv::StringRecord> = reader.records().collect::<std::result::Result<_, _>>()?;
    let items: Vec<(&str, &str, &str)> = rows.iter().map(|r| (&r[0], &r[4], &r[5])).collect();

    let asha: Vec<(&str, &str)> = items
        .iter()
        .filter(|(name, _, _)| *name == "Asha")
        .map(|(_, design, size)| (*design, *size))
        .collect();
    assert_eq!(
        asha,
        vec![
            ("Technocracy", "M"),
            ("Technocracy", "M"),
            ("Technocracy", "M"),
            ("Dharma", "M"),
            ("Dharma", "M"),
            ("Abyss", "M"),
            ("Abyss", "M"),
            ("Technocracy", "XL"),
        ]
    );
    assert_eq!(&rows[0][1], "asha@x.in");

    let ravi: Vec<(&str, &str)> = items
        .iter()
        .filter(|(name, _, _)| *name == "Ravi")
        .map(|(_, design, size)| (*design, *size))
        .collect();
    assert_eq!(
        ravi,
        vec![("Dharma", "M"), ("Dharma", "M"), ("Dharma", "S"), ("Jacket", "L")]
    );

    assert!(items.iter().all(|(name, _, _)| *name != "Kiran"));
    assert_eq!(
        items.iter().filter(|(name, _, _)| *name == "Meera").count(),
        2
    );
    assert!(items
        .iter()
        .filter(|(name, _, _)| *name == "Meera")
        .all(|(_, design, size)| *design == "Technocracy" && *size == "S"));

    let summary = temp_dir.path().join("printing_summary.csv");
    run(Mode::Summary, orders.to_str().unwrap(), summary.to_str().unwrap())?;
    assert_eq!(
        std::fs::read_to_string(&summary)?,
        "design,size,quantity\n\
         Abyss,M,2\n\
         Dharma,S,1\n\
         Dharma,M,4\n\
         Jacket,L,1\n\
         Technocracy,S,2\n\
         Technocracy,M,3\n\
         Technocracy,XL,1\n"
    );

    Ok(())
}

#[test]
fn test_voa_without_any_orders_is_empty_result() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let input = write_voa_form(
        &temp_dir,
        &[HashMap::from([
            ("name", "Kiran"),
            ("contact", "1"),
            ("residency", "Hostel"),
            ("text:Dharma", "None"),
        ])],
    )?;
    let orders = temp_dir.path().join("voa_orders.csv");

    let err = run(Mode::Voa, &input, orders.to_str().unwrap()).unwrap_err();

    assert!(matches!(err, EtlError::EmptyResult { .. }));
    assert_eq!(err.severity(), merch_etl::utils::error::ErrorSeverity::Low);
    assert!(!orders.exists());
    Ok(())
}

#[test]
fn test_summary_orders_sizes_and_requires_columns() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let input = temp_dir.path().join("orders.csv");
    std::fs::write(
        &input,
        "name,design,size\nA,Dharma,XXL\nB,Dharma,XS\nC,Dharma,S\nD,Dharma,XXL\nE,,M\n",
    )?;
    let summary = temp_dir.path().join("summary.csv");

    run(Mode::Summary, input.to_str().unwrap(), summary.to_str().unwrap())?;
    assert_eq!(
        std::fs::read_to_string(&summary)?,
        "design,size,quantity\nDharma,S,1\nDharma,XXL,2\nDharma,XS,1\n"
    );

    std::fs::write(&input, "name,size\nA,M\n")?;
    let err = run(Mode::Summary, input.to_str().unwrap(), summary.to_str().unwrap()).unwrap_err();
    assert!(matches!(err, EtlError::MissingColumnError { ref column } if column == "design"));
    Ok(())
}

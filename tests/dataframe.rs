use std::{
    error::Error,
    io::{BufWriter, Cursor, Write},
};
use tempfile::NamedTempFile;

use svggloo::csv::{DataFrame, Record};

fn write_csv(contents: &str) -> Result<NamedTempFile, Box<dyn Error>> {
    let mut file = NamedTempFile::new()?;
    {
        let mut writer = BufWriter::new(file.as_file_mut());
        writer.write_all(contents.as_bytes())?;
    }
    Ok(file)
}

#[test]
fn test_dataframe_new() {
    let df = DataFrame::new("test".to_string());
    assert_eq!(df.name, "test");
    assert!(df.headers.is_empty());
    assert!(df.header_indices.is_empty());
    assert!(df.records.is_empty());
}

#[test]
fn test_read_headers() -> Result<(), Box<dyn Error>> {
    let file = write_csv("header1,header2,header3\nvalue1,value2,value3\n")?;

    let mut df = DataFrame::new("test".to_string());
    df.read_headers(file.path())?;

    assert_eq!(df.headers, vec!["header1", "header2", "header3"]);
    assert_eq!(df.header_indices.len(), 3);
    assert_eq!(df.header_indices["header1"], 0);
    assert_eq!(df.header_indices["header2"], 1);
    assert_eq!(df.header_indices["header3"], 2);
    assert!(df.records.is_empty());

    Ok(())
}

#[test]
fn test_load() -> Result<(), Box<dyn Error>> {
    let file = write_csv("country,state,city\nUSA,TX,Austin\nUSA,\"CO\",\"Fort Collins, North\"\n")?;

    let df = DataFrame::load(file.path())?;

    assert_eq!(df.records.len(), 2);
    assert_eq!(
        df.records[1],
        Record::new(
            2,
            vec![
                ("country".to_string(), "USA".to_string()),
                ("state".to_string(), "CO".to_string()),
                ("city".to_string(), "Fort Collins, North".to_string()),
            ]
        )
    );
    assert_eq!(df.records[0].first_value(), Some("USA"));
    Ok(())
}

#[test]
fn test_header_only_file_has_no_records() -> Result<(), Box<dyn Error>> {
    let file = write_csv("name,score\n")?;
    let df = DataFrame::load(file.path())?;
    assert_eq!(df.headers, vec!["name", "score"]);
    assert!(df.records.is_empty());
    Ok(())
}

#[test]
fn test_process_rows() -> Result<(), Box<dyn Error>> {
    let df = DataFrame::new("test".to_string());
    let input = Cursor::new("value1,value2,value3\nvalue4,value5,value6");
    let mut result = Vec::new();

    df.process_rows(input, |row| {
        result.push(row.to_vec());
        Ok(())
    })?;

    assert_eq!(result.len(), 2);
    assert_eq!(result[0], vec!["value1", "value2", "value3"]);
    assert_eq!(result[1], vec!["value4", "value5", "value6"]);
    Ok(())
}

#[test]
fn test_missing_columns() -> Result<(), Box<dyn Error>> {
    let mut df = DataFrame::new("test".to_string());
    df.read_records(Cursor::new("id,name\n1,Alice\n"))?;

    assert!(df.has_column("name"));
    assert_eq!(
        df.missing_columns(["zip", "name", "age"]),
        vec!["zip".to_string(), "age".to_string()]
    );
    assert!(df.column("age").is_none());
    Ok(())
}

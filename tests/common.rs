#![cfg(feature = "std")]

use std::path::Path;

use csv::ReaderBuilder;
use vedirect::{
    avec::reader::{Error, IoSource, Reader},
    sans::typecast::TypedRecord,
};

const PATH: &str = "fixtures/charger-and-monitor.ved";

#[test]
fn decode_slice_charger_and_monitor() {
    let data = std::fs::read(PATH).unwrap();
    let mut validator = Validator::new(PATH);

    let count = vedirect::avec::decode_slice(&data, &mut |r| validator.validate(r));

    assert_eq!(count, 4);
    validator.finish();
}

#[test]
fn decode_reader_charger_and_monitor() {
    let file = std::fs::File::open(PATH).unwrap();
    let mut reader = Reader::new(IoSource::new(file));
    let mut validator = Validator::new(PATH);

    let result = reader.read_many(&mut |r| validator.validate(r), None);

    assert!(matches!(result, Err(Error::Closed)));
    validator.finish();
}

#[test]
fn decode_reader_bounded() {
    let file = std::fs::File::open(PATH).unwrap();
    let mut reader = Reader::new(IoSource::new(file));
    let mut validator = Validator::new(PATH);

    let count = reader
        .read_many(&mut |r| validator.validate(r), Some(2))
        .unwrap();

    assert_eq!(count, 2);
    assert_eq!(validator.0.len(), 2);

    // The reader resumes where it stopped.
    let record = reader.read_one(false).unwrap();
    validator.validate(record);
    assert_eq!(validator.0.len(), 1);
}

#[test]
fn iterate_reader_charger_and_monitor() {
    let file = std::fs::File::open(PATH).unwrap();
    let mut reader = Reader::new(IoSource::new(file));
    let mut validator = Validator::new(PATH);

    for record in reader.records() {
        validator.validate(record.unwrap());
    }

    validator.finish();
}

/// Expected records, one row each, as `name, value, unit` triples in name
/// order.
struct Validator(Vec<Vec<String>>);

impl Validator {
    fn new(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().with_extension("csv");

        let mut reader = ReaderBuilder::new()
            .flexible(true)
            .has_headers(false)
            .from_path(path)
            .unwrap();

        let expected: Vec<Vec<String>> = reader
            .records()
            .map(|r| r.unwrap().iter().map(|f| f.to_string()).collect())
            .collect();

        Self(expected)
    }

    fn validate(&mut self, record: TypedRecord) {
        let found: Vec<String> = record
            .iter()
            .flat_map(|(name, field)| {
                [
                    name.to_string(),
                    field.value.to_string(),
                    field.unit.unwrap_or_default().to_string(),
                ]
            })
            .collect();

        assert_eq!(found, self.0.remove(0));
    }

    fn finish(&self) {
        assert!(self.0.is_empty(), "{} records not received", self.0.len());
    }
}

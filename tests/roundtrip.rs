//! Round trips of the sample streams and dialog files.
//!
//! Every sample must decode and re-encode to the identical bytes, and the decoded structure must
//! match what the sample was built from.

use std::path::PathBuf;

use udlg::{prelude::*, ReferenceTable};

fn sample(name: &str) -> Vec<u8> {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/samples")
        .join(name);
    std::fs::read(path).unwrap()
}

#[test]
fn every_sample_round_trips() -> Result<()> {
    for name in [
        "string.dat",
        "uint32_array.dat",
        "string_array.dat",
        "simpleclass.dat",
        "dialog.dat",
    ] {
        let data = sample(name);
        let document = Document::parse(&data)?;
        assert!(document.is_terminated(), "{name}");
        assert_eq!(document.to_bytes()?, data, "{name}");
    }

    let data = sample("dialog.udlg");
    assert_eq!(Udlg::parse(&data)?.to_bytes()?, data);
    Ok(())
}

#[test]
fn single_string() -> Result<()> {
    let document = Document::parse(&sample("string.dat"))?;

    assert_eq!(document.header().root_id, 1);
    assert_eq!(document.len(), 2);
    assert_eq!(
        document.records()[0].as_str(),
        Some("String should be serialized")
    );
    Ok(())
}

#[test]
fn primitive_array() -> Result<()> {
    let document = Document::parse(&sample("uint32_array.dat"))?;

    let Record::ArraySinglePrimitive(array) = document.resolve(1)? else {
        panic!("expected a primitive array");
    };
    assert_eq!(array.primitive_type, PrimitiveType::UInt32);
    for (i, value) in array.values.iter().enumerate() {
        let i = i as u32;
        assert_eq!(*value, PrimitiveValue::UInt32(i * i * 1000 + i));
    }
    Ok(())
}

#[test]
fn string_array_elements_are_top_level() -> Result<()> {
    let data = sample("string_array.dat");
    let document = Document::parse_with_config(&data, ParserConfig::strict())?;

    let types: Vec<RecordType> = document.records().iter().map(Record::record_type).collect();
    assert_eq!(
        types,
        vec![
            RecordType::ArraySingleString,
            RecordType::BinaryObjectString,
            RecordType::BinaryObjectString,
            RecordType::MemberReference,
            RecordType::ObjectNull,
            RecordType::BinaryObjectString,
            RecordType::MessageEnd,
        ]
    );

    // The second string needs a two byte length prefix
    assert_eq!(document.resolve(3)?.as_str().map(str::len), Some(130));
    assert_eq!(document.resolve(4)?.as_str(), Some("Омега"));
    Ok(())
}

#[test]
fn class_members() -> Result<()> {
    let document = Document::parse(&sample("simpleclass.dat"))?;
    let record = &document.records()[1];

    let schema = record.schema().unwrap();
    assert_eq!(schema.name(), "Sample.Dialog");
    let names: Vec<&str> = schema.members().map(|(name, _)| name).collect();
    assert_eq!(
        names,
        vec!["Name", "Alias", "Parent", "Title", "Count", "Enabled", "Scores", "Tags"]
    );

    let types: Vec<&MemberType> = schema.members().map(|(_, kind)| kind).collect();
    assert_eq!(*types[0], MemberType::String);
    assert_eq!(*types[4], MemberType::Primitive(PrimitiveType::Int32));
    assert_eq!(*types[6], MemberType::PrimitiveArray(PrimitiveType::Double));
    assert!(matches!(types[2], MemberType::Class(info) if info.library_id == 2));
    assert!(matches!(types[7], MemberType::SystemClass(name) if name.starts_with("System.")));

    let members = record.members().unwrap();
    assert_eq!(members[0].as_record().and_then(Record::as_str), Some("Root"));
    assert_eq!(members[4].as_primitive(), Some(&PrimitiveValue::Int32(42)));
    assert_eq!(members[5].as_primitive(), Some(&PrimitiveValue::Boolean(true)));
    assert_eq!(members[3].as_record(), Some(&Record::ObjectNull));
    Ok(())
}

#[test]
fn shared_class_schemas() -> Result<()> {
    let document = Document::parse(&sample("dialog.dat"))?;

    let definition = document.records()[1].schema().unwrap();
    for index in [2, 3, 5] {
        let Record::ClassWithId(instance) = &document.records()[index] else {
            panic!("record {index} should reuse the class definition");
        };
        assert_eq!(instance.metadata_id, 1);
        assert!(std::sync::Arc::ptr_eq(&instance.schema, definition));
    }

    // ClassWithId nested in record 2 reuses the schema of the class nested in record 1
    let Some(Record::ClassWithId(link)) = document.records()[2].members().unwrap()[3].as_record()
    else {
        panic!("expected a nested instance");
    };
    assert_eq!(link.schema.name(), "Dialog.Link");
    Ok(())
}

#[test]
fn references_cover_nested_records() -> Result<()> {
    let document = Document::parse(&sample("dialog.dat"))?;
    let references: &ReferenceTable = document.references();

    for id in [1, 10, 11, 20, 21, 30, 31, 32, 33, 40, 41, 42, 50, 60, 61, 70] {
        assert!(references.contains(id), "object id {id}");
    }
    assert_eq!(references.resolve(33)?, 2);

    let location = references.locate(33)?;
    assert_eq!(location.path, vec![3, 0]);
    assert_eq!(document.record_at(location).and_then(Record::as_str), Some("line-3"));

    assert_eq!(document.resolve(10)?.as_str(), Some("Narrator"));
    document.check_references()?;
    Ok(())
}

#[test]
fn tree_dump() -> Result<()> {
    let document = Document::parse(&sample("dialog.dat"))?;
    let tree = document.to_tree();

    let line = &tree["records"][1];
    assert_eq!(line["class"], "Dialog.Line");
    assert_eq!(line["members"]["Speaker"]["value"], "Narrator");
    assert_eq!(line["members"]["Next"]["class"], "Dialog.Link");
    assert_eq!(line["members"]["Next"]["members"]["Weight"], 0.5);

    assert_eq!(tree["records"][2]["members"]["Speaker"]["$ref"], 10);
    assert!(tree["records"][3]["members"]["Next"].is_null());
    assert_eq!(tree["records"][4]["values"][3], -1);
    Ok(())
}

//! Structural dump of a document as nested JSON values.
//!
//! The tree is informational: it shows record kinds, ids, class and member names and values,
//! but drops the wire details needed to rebuild the stream. References are rendered as
//! `{"$ref": id}` and left unresolved, so cyclic graphs stay finite.

use serde_json::{json, Map, Value};

use crate::binaryformat::{Document, MemberValue, PrimitiveValue, Record};

impl Document {
    /// Render the document as a JSON tree with the header and one entry per record.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use udlg::Document;
    ///
    /// let document = Document::parse(&std::fs::read("tests/samples/string.dat")?)?;
    /// let tree = document.to_tree();
    /// assert_eq!(tree["records"][0]["value"], "String should be serialized");
    /// # Ok::<(), udlg::Error>(())
    /// ```
    #[must_use]
    pub fn to_tree(&self) -> Value {
        let header = self.header();
        json!({
            "header": {
                "root_id": header.root_id,
                "header_id": header.header_id,
                "major_version": header.major_version,
                "minor_version": header.minor_version,
            },
            "records": self.records().iter().map(record_tree).collect::<Vec<_>>(),
        })
    }
}

fn record_tree(record: &Record) -> Value {
    let kind = format!("{:?}", record.record_type());

    match record {
        Record::ClassWithId(class) => json!({
            "type": kind,
            "object_id": class.object_id,
            "metadata_id": class.metadata_id,
            "class": class.schema.name(),
            "members": members_tree(class.schema.class_info.member_names.iter(), &class.values),
        }),
        Record::ClassWithMembersAndTypes(class) => json!({
            "type": kind,
            "object_id": class.schema.class_info.object_id,
            "class": class.schema.name(),
            "library_id": class.library_id,
            "members": members_tree(class.schema.class_info.member_names.iter(), &class.values),
        }),
        Record::BinaryObjectString(string) => json!({
            "type": kind,
            "object_id": string.object_id,
            "value": string.value,
        }),
        Record::BinaryArray(array) => json!({
            "type": kind,
            "object_id": array.object_id,
            "array_type": format!("{:?}", array.array_type),
            "lengths": array.lengths,
            "lower_bounds": array.lower_bounds,
            "element_type": format!("{:?}", array.element_type.binary_type()),
            "values": values_tree(&array.values),
        }),
        Record::MemberReference(reference) => json!({ "$ref": reference.id_ref }),
        Record::ObjectNull => Value::Null,
        Record::MessageEnd => json!({ "type": kind }),
        Record::BinaryLibrary(library) => json!({
            "type": kind,
            "library_id": library.library_id,
            "name": library.name,
        }),
        Record::ArraySinglePrimitive(array) => json!({
            "type": kind,
            "object_id": array.object_id,
            "primitive_type": format!("{:?}", array.primitive_type),
            "values": values_tree(&array.values),
        }),
        Record::ArraySingleString(array) => json!({
            "type": kind,
            "object_id": array.object_id,
            "length": array.length,
        }),
    }
}

fn members_tree<'a>(names: impl Iterator<Item = &'a String>, values: &[MemberValue]) -> Value {
    let mut members = Map::new();
    for (name, value) in names.zip(values) {
        let value = match value {
            MemberValue::Primitive(primitive) => primitive.to_json(),
            MemberValue::Record(record) => record_tree(record),
        };
        members.insert(name.clone(), value);
    }
    Value::Object(members)
}

fn values_tree(values: &[PrimitiveValue]) -> Value {
    Value::Array(values.iter().map(PrimitiveValue::to_json).collect())
}

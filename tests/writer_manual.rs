//! Hand-driven `Writer` sessions: exact output bytes, stack enforcement, and
//! reading the emitted document back with a `Reader`.

use rstest::rstest;

use gamejson::{Error, Reader, Token, Writer};

fn write_document() -> gamejson::Result<String> {
    let mut writer = Writer::new();
    writer.begin_object();
    writer.write_double_property("numberField", 142.01)?;
    writer.write_property("stringField", "142.010")?;
    writer.write_bool_property("flagA", true)?;
    writer.write_bool_property("flagB", false)?;

    writer.begin_property("intArray");
    writer.begin_array();
    for value in [1i64, 2, 3, 4, 5, 78, 9] {
        writer.write_long_array_value(value)?;
    }
    writer.end_array()?;
    writer.end_property()?;

    writer.begin_property("nested");
    writer.begin_object();
    writer.write_bool_property("inner", true)?;
    writer.end_object()?;
    writer.end_property()?;

    writer.begin_property("nothing");
    writer.raw_write_str("null");
    writer.end_property()?;
    writer.end_object()?;
    writer.finish()
}

#[rstest]
fn emits_tab_indented_document() {
    let text = write_document().unwrap();
    let expected = "{\n\
\t\"numberField\": 142.01,\n\
\t\"stringField\": \"142.010\",\n\
\t\"flagA\": true,\n\
\t\"flagB\": false,\n\
\t\"intArray\": [\n\
\t\t1,\n\
\t\t2,\n\
\t\t3,\n\
\t\t4,\n\
\t\t5,\n\
\t\t78,\n\
\t\t9\n\
\t],\n\
\t\"nested\": {\n\
\t\t\"inner\": true\n\
\t},\n\
\t\"nothing\": null\n\
}";
    assert_eq!(text, expected);
}

#[rstest]
fn emitted_document_reads_back() {
    let text = write_document().unwrap();
    let mut reader = Reader::new(&text);

    reader.expect_object_start().unwrap();
    assert!(reader.try_consume_property("numberField").unwrap());
    assert_eq!(reader.consume_double_value().unwrap(), 142.01);
    assert!(reader.try_consume_property("stringField").unwrap());
    assert_eq!(
        reader.consume_string_value().unwrap().as_deref(),
        Some("142.010")
    );
    assert!(reader.try_consume_property("flagA").unwrap());
    assert!(reader.consume_bool_value().unwrap());
    assert!(reader.try_consume_property("flagB").unwrap());
    assert!(!reader.consume_bool_value().unwrap());

    assert!(reader.try_consume_property("intArray").unwrap());
    reader.expect_array_start().unwrap();
    let mut values = Vec::new();
    while !reader.is_at_array_end() {
        values.push(reader.consume_long_value().unwrap());
    }
    reader.expect_array_end().unwrap();
    assert_eq!(values, vec![1, 2, 3, 4, 5, 78, 9]);

    assert!(reader.try_consume_property("nested").unwrap());
    reader.expect_object_start().unwrap();
    assert!(reader.try_consume_property("inner").unwrap());
    assert!(reader.consume_bool_value().unwrap());
    reader.expect_object_end().unwrap();

    assert!(reader.try_consume_property("nothing").unwrap());
    assert!(reader.is_null_token());
    reader.consume_null().unwrap();

    reader.expect_object_end().unwrap();
    assert!(reader.is_done());
}

#[rstest]
fn closing_an_array_as_an_object_is_rejected() {
    let mut writer = Writer::new();
    writer.begin_object();
    writer.begin_property("list");
    writer.begin_array();
    let err = writer.end_object().unwrap_err();
    assert_eq!(
        err,
        Error::TokenMismatch {
            requested: Token::EndObject,
            pending: Some(Token::EndArray),
        }
    );
}

#[rstest]
fn finish_rejects_unclosed_constructs() {
    let mut writer = Writer::new();
    writer.begin_object();
    writer.begin_property("open");
    let err = writer.finish().unwrap_err();
    assert_eq!(err, Error::UnclosedConstructs { pending: 2 });
}

#[rstest]
fn escaped_string_survives_a_round_trip() {
    let original = "tab\there \"quoted\" back\\slash /slash \x08 \x0C\r\nend";
    let mut writer = Writer::new();
    writer.raw_write_escaped_string(original);
    let text = writer.finish().unwrap();

    let mut reader = Reader::new(&text);
    let decoded = reader.consume_string_value().unwrap();
    assert_eq!(decoded.as_deref(), Some(original));
}

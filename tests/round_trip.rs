//! Derived serialization round trips: plain records, nesting, collections,
//! options, generics, and tolerance for unknown or reordered fields.

use rstest::rstest;

use gamejson::{from_str, to_string, JsonDeserialize, JsonSerialize};

#[derive(Debug, Default, PartialEq, JsonSerialize, JsonDeserialize)]
struct Nested {
    pub inner: bool,
}

#[derive(Debug, Default, PartialEq, JsonSerialize, JsonDeserialize)]
struct Record {
    pub number_field: f64,
    pub string_field: String,
    pub flag_a: bool,
    pub flag_b: bool,
    pub int_array: Vec<i32>,
    pub nested: Nested,
}

fn sample_record() -> Record {
    Record {
        number_field: 142.010,
        string_field: "142.010".to_owned(),
        flag_a: true,
        flag_b: false,
        int_array: vec![1, 2, 3, 4, 5, 78, 9],
        nested: Nested { inner: true },
    }
}

#[rstest]
fn record_round_trips() {
    let text = to_string(&sample_record()).unwrap();
    let back: Record = from_str(&text).unwrap();
    assert_eq!(back, sample_record());
}

#[rstest]
fn fields_may_arrive_in_any_order() {
    let text = "{
\t\"nested\": { \"inner\": true },
\t\"flag_b\": false,
\t\"int_array\": [1, 2, 3, 4, 5, 78, 9],
\t\"string_field\": \"142.010\",
\t\"flag_a\": TrUe,
\t\"number_field\": 142.010
}";
    let back: Record = from_str(text).unwrap();
    assert_eq!(back, sample_record());
}

#[rstest]
fn unknown_fields_are_skipped() {
    let text = "{
\t\"number_field\": 142.010,
\t\"TotalUnknown\": [ { \"deep\": [null, \"x\"] }, 1e4 ],
\t\"flag_a\": true,
\t\"AnotherUnknown\": \"esc\\\"aped\",
\t\"string_field\": \"142.010\"
}";
    let back: Record = from_str(text).unwrap();
    assert_eq!(back.number_field, 142.010);
    assert!(back.flag_a);
    assert_eq!(back.string_field, "142.010");
    assert_eq!(back.int_array, Vec::<i32>::new());
}

#[rstest]
fn null_object_becomes_default() {
    let back: Record = from_str("null").unwrap();
    assert_eq!(back, Record::default());
}

#[rstest]
fn escaped_strings_round_trip() {
    let record = Record {
        string_field: "line\nbreak \"quote\" \\slash\\ /fwd \ttab \x08\x0C\rdone".to_owned(),
        ..Record::default()
    };
    let text = to_string(&record).unwrap();
    let back: Record = from_str(&text).unwrap();
    assert_eq!(back.string_field, record.string_field);
}

#[derive(Debug, Default, PartialEq, JsonSerialize, JsonDeserialize)]
struct Holder<T> {
    pub instance: T,
}

#[rstest]
fn generic_holder_round_trips() {
    let holder = Holder {
        instance: sample_record(),
    };
    let text = to_string(&holder).unwrap();
    let back: Holder<Record> = from_str(&text).unwrap();
    assert_eq!(back, holder);
}

#[derive(Debug, Default, PartialEq, JsonSerialize, JsonDeserialize)]
struct Collections {
    pub records: Vec<Nested>,
    pub maybe: Option<Nested>,
    pub nothing: Option<f64>,
    pub sparse: Vec<Option<Nested>>,
    pub fixed: [i64; 3],
    pub boxed: Box<[u16]>,
}

#[rstest]
fn collections_round_trip() {
    let value = Collections {
        records: vec![Nested { inner: true }, Nested { inner: false }],
        maybe: Some(Nested { inner: true }),
        nothing: None,
        sparse: vec![None, Some(Nested { inner: true }), None],
        fixed: [9, -3, 1 << 40],
        boxed: vec![1, 2, 3].into_boxed_slice(),
    };
    let text = to_string(&value).unwrap();
    let back: Collections = from_str(&text).unwrap();
    assert_eq!(back, value);
}

#[rstest]
fn nulls_in_arrays_deserialize_to_none() {
    let text = "{ \"sparse\": [null, { \"inner\": true }, NULL] }";
    let back: Collections = from_str(text).unwrap();
    assert_eq!(
        back.sparse,
        vec![None, Some(Nested { inner: true }), None]
    );
}

#[rstest]
fn large_integers_are_exact() {
    #[derive(Debug, Default, PartialEq, JsonSerialize, JsonDeserialize)]
    struct Wide {
        pub signed: i64,
        pub unsigned: u64,
    }

    let value = Wide {
        signed: (1 << 53) + 1,
        unsigned: u64::MAX,
    };
    let text = to_string(&value).unwrap();
    let back: Wide = from_str(&text).unwrap();
    assert_eq!(back, value);
}

#[rstest]
fn truncated_document_is_an_error() {
    let err = from_str::<Record>("{ \"flag_a\": tr").unwrap_err();
    assert_eq!(err, gamejson::Error::UnexpectedEnd { offset: 14 });

    let err = from_str::<Record>("{ \"string_field\": \"cut of").unwrap_err();
    assert_eq!(err, gamejson::Error::UnexpectedEnd { offset: 25 });
}

#[rstest]
fn malformed_number_is_an_error() {
    let err = from_str::<Record>("{ \"number_field\": 1.2.3 }").unwrap_err();
    assert_eq!(
        err,
        gamejson::Error::MalformedNumber {
            found: '.',
            offset: 21
        }
    );
}

#[rstest]
fn trailing_commas_are_tolerated() {
    let text = "{ \"int_array\": [1, 2, 3,], \"flag_a\": true, }";
    let back: Record = from_str(text).unwrap();
    assert_eq!(back.int_array, vec![1, 2, 3]);
    assert!(back.flag_a);
}

use crate::{NumberCategory, NumberSize, NumberValue};

fn names(sizes: &[NumberSize]) -> Vec<&'static str> {
    sizes.iter().map(|s| s.name()).collect()
}

#[test]
fn catalogue_properties() {
    assert_eq!(NumberSize::Int16.category(), NumberCategory::Int);
    assert_eq!(NumberSize::UInt64.bits(), 64);
    assert_eq!(NumberSize::Dec32.bits(), 32);
    assert_eq!(NumberSize::from_name("uint8"), Some(NumberSize::UInt8));
    assert_eq!(NumberSize::from_name("int128"), None);
}

#[test]
fn widening_stays_in_category() {
    assert!(NumberSize::Int8.widens_to(NumberSize::Int32));
    assert!(NumberSize::Int32.widens_to(NumberSize::Int32));
    assert!(!NumberSize::Int64.widens_to(NumberSize::Int32));
    assert!(!NumberSize::UInt8.widens_to(NumberSize::Int16));
    assert!(!NumberSize::Dec32.widens_to(NumberSize::Int64));
}

#[test]
fn small_integer_fits_everywhere() {
    let value = NumberValue::parse("1").unwrap();

    assert_eq!(value.possible_sizes(), NumberSize::ALL.to_vec());
}

#[test]
fn integer_range_filters_sizes() {
    let value = NumberValue::parse("300").unwrap();

    assert_eq!(
        names(&value.possible_sizes()),
        ["int16", "int32", "int64", "uint16", "uint32", "uint64", "dec32", "dec64"]
    );
}

#[test]
fn large_integer_only_fits_wide_sizes() {
    let value = NumberValue::parse("18_446_744_073_709_551_615").unwrap();

    assert_eq!(names(&value.possible_sizes()), ["uint64"]);
}

#[test]
fn decimal_only_fits_decimal_sizes() {
    let value = NumberValue::parse("2.5").unwrap();

    assert_eq!(names(&value.possible_sizes()), ["dec32", "dec64"]);
}

#[test]
fn malformed_digits() {
    assert_eq!(NumberValue::parse(""), None);
    assert_eq!(NumberValue::parse("_"), None);
    assert_eq!(NumberValue::parse("1.2.3"), None);
    assert_eq!(NumberValue::parse("999999999999999999999999999999999999999999"), None);
}

#[test]
fn sizes_serialize_lowercase() {
    let json = serde_json::to_string(&[NumberSize::Int8, NumberSize::Dec64]).unwrap();

    assert_eq!(json, r#"["int8","dec64"]"#);
}

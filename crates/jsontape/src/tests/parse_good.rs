use alloc::string::String;
use alloc::vec::Vec;

use crate::{Json, Options, ParsedType, TokenType};

#[test]
fn object_with_nested_array() {
    let mut json = Json::from_string(r#"{"a":1,"b":[true,null]}"#, Options::default()).unwrap();
    assert_eq!(json.tokens().len(), 7);
    {
        let root = json.root();
        assert_eq!(root.token_type(), TokenType::Object);
        assert_eq!(root.child_count(), 6);
    }

    json.parse_literals(0).unwrap();
    json.parse_unsigned_ints(0).unwrap();
    assert_eq!(json.tokens()[2].as_unsigned_int(), 1);
    assert!(json.tokens()[5].as_bool());
    json.tokens()[6].as_null();
    assert!(json.tokens()[6].is_parsed());
}

#[test]
fn array_of_numbers_parsed_on_the_root() {
    let mut json = Json::from_string("[1,2,3]", Options::default()).unwrap();
    json.parse_unsigned_ints(0).unwrap();

    let root = json.root();
    assert_eq!(root.token_type(), TokenType::Array);
    assert_eq!(root.child_count(), 3);
    let first = root.first_child().unwrap();
    assert_eq!(first.as_unsigned_int(), 1);
    assert_eq!(first.next().unwrap().as_unsigned_int(), 2);
    assert_eq!(first.next().unwrap().next().unwrap().as_unsigned_int(), 3);
    assert!(first.next().unwrap().next().unwrap().next().is_none());
}

#[test]
fn top_level_string_with_parse_strings() {
    let options = Options {
        parse_strings: true,
        ..Options::default()
    };
    let json = Json::from_string("\"hi\\nthere\"", options).unwrap();
    assert_eq!(json.tokens().len(), 1);
    assert_eq!(json.root().as_str(), "hi\nthere");
    assert_eq!(json.root().as_str().len(), 8);
}

#[test]
fn duplicate_keys_are_preserved_in_order() {
    let options = Options {
        parse_string_keys: true,
        ..Options::default()
    };
    let mut json = Json::from_string(r#"{"k":1,"k":2}"#, options).unwrap();
    json.parse_unsigned_ints(0).unwrap();

    let root = json.root();
    let mut keys = Vec::new();
    let mut values = Vec::new();
    let mut key = root.first_child();
    while let Some(current) = key {
        keys.push(current.as_str());
        values.push(current.first_child().unwrap().as_unsigned_int());
        key = current.next();
    }
    assert_eq!(keys, ["k", "k"]);
    assert_eq!(values, [1, 2]);
}

#[test]
fn empty_containers_have_one_token() {
    for source in ["{}", "[]"] {
        let json = Json::from_string(source, Options::default()).unwrap();
        assert_eq!(json.tokens().len(), 1);
        assert_eq!(json.root().child_count(), 0);
        assert!(json.root().first_child().is_none());
        assert!(json.root().is_parsed());
        assert_eq!(json.root().data(), source);
    }
}

#[test]
fn global_strings_keep_the_static_lifetime() {
    static DOC: &str = r#"["plain", "esc\nape"]"#;
    let mut json = Json::from_static(DOC, Options::default()).unwrap();
    json.parse_strings(0).unwrap();

    let plain = json.token(1);
    assert!(plain.is_string_global());
    let view: &'static str = plain.as_global_str().unwrap();
    assert_eq!(view, "plain");
    let doc_range = DOC.as_ptr() as usize..DOC.as_ptr() as usize + DOC.len();
    assert!(doc_range.contains(&(view.as_ptr() as usize)));

    let escaped = json.token(2);
    assert!(escaped.is_string_escaped());
    assert!(!escaped.is_string_global());
    assert!(escaped.as_global_str().is_none());
    assert_eq!(escaped.as_str(), "esc\nape");
}

#[test]
fn unescaped_views_point_into_the_input_buffer() {
    let mut json = Json::from_string(r#"["abcdef"]"#, Options::default()).unwrap();
    json.parse_strings(0).unwrap();
    let source_range = json.root().data().as_ptr() as usize
        ..json.root().data().as_ptr() as usize + json.root().data().len();
    let view = json.token(1).as_str();
    assert!(source_range.contains(&(view.as_ptr() as usize)));
    // a copied input is not global, even without escapes
    assert!(!json.token(1).is_string_global());
    assert!(json.token(1).as_global_str().is_none());
}

#[test]
fn surrogate_pairs_decode_to_one_code_point() {
    let options = Options {
        parse_strings: true,
        ..Options::default()
    };
    let json = Json::from_string("\"\\uD834\\uDD1E\"", options).unwrap();
    assert_eq!(json.root().as_str(), "\u{1D11E}");
    assert_eq!(json.root().as_str().len(), 4);
}

#[test]
fn double_spellings() {
    let mut json = Json::from_string("[-0, 0.0, 1e0]", Options::default()).unwrap();
    json.parse_doubles(0).unwrap();
    let values: Vec<f64> = json.tokens()[1..].iter().map(|t| t.as_double()).collect();
    assert_eq!(values, [0.0, 0.0, 1.0]);
    assert!(json.tokens()[1].as_double().is_sign_negative());
}

#[test]
fn unsigned_long_covers_the_exact_json_range() {
    let mut json = Json::from_string("4503599627370496", Options::default()).unwrap();
    json.parse_unsigned_longs(0).unwrap();
    assert_eq!(json.root().as_unsigned_long(), 1 << 52);
    assert_eq!(json.root().parsed_type(), ParsedType::UnsignedLong);
    // on 64-bit hosts the size representation is the very same cache
    #[cfg(target_pointer_width = "64")]
    {
        assert_eq!(json.root().as_size(), 1 << 52);
        assert_eq!(json.root().parsed_type(), ParsedType::SIZE);
    }
}

#[test]
fn switching_parsers_reparses_from_the_lexeme() {
    let mut json = Json::from_string("[1,2]", Options::default()).unwrap();
    json.parse_doubles(0).unwrap();
    assert_eq!(json.tokens()[1].as_double(), 1.0);

    json.parse_unsigned_ints(0).unwrap();
    for (token, expected) in json.tokens()[1..].iter().zip([1u32, 2]) {
        assert_eq!(token.parsed_type(), ParsedType::UnsignedInt);
        assert_eq!(token.as_unsigned_int(), expected);
    }
}

#[test]
fn parse_passes_are_idempotent() {
    let source = r#"{"a":[1,2.5,"x\ty"],"b":null}"#;
    let mut json = Json::from_string(source, Options::default()).unwrap();
    json.parse_literals(0).unwrap();
    json.parse_doubles(0).unwrap();
    json.parse_strings(0).unwrap();
    let snapshot = json.tokens().to_vec();

    json.parse_literals(0).unwrap();
    json.parse_doubles(0).unwrap();
    json.parse_strings(0).unwrap();
    assert_eq!(json.tokens(), &snapshot[..]);
}

#[test]
fn string_keys_pass_is_a_subset_of_strings() {
    let options = Options {
        parse_string_keys: true,
        ..Options::default()
    };
    let mut json = Json::from_string("{\"k\\u0041\":\"vB\"}", options).unwrap();
    let key = json.token(1);
    assert!(key.is_parsed());
    assert_eq!(key.as_str(), "kA");
    assert!(!json.token(2).is_parsed());

    // the follow-up full pass touches only the value; the parsed key is a
    // no-op and keeps its unescape buffer
    let key_buffer = json.token(1).as_str().as_ptr();
    json.parse_strings(0).unwrap();
    assert_eq!(json.token(1).as_str().as_ptr(), key_buffer);
    assert_eq!(json.token(2).as_str(), "vB");
}

#[test]
fn options_apply_to_the_whole_document() {
    let options = Options {
        parse_literals: true,
        parse_doubles: true,
        parse_floats: true,
        parse_strings: true,
        ..Options::default()
    };
    let json = Json::from_string(r#"{"x":[1.5,true,"s"]}"#, options).unwrap();
    // doubles win over floats when both are requested
    assert_eq!(json.tokens()[3].parsed_type(), ParsedType::Double);
    assert_eq!(json.tokens()[3].as_double(), 1.5);
    assert!(json.tokens()[4].as_bool());
    assert_eq!(json.token(5).as_str(), "s");
}

#[test]
fn floats_narrow_the_double_value() {
    let mut json = Json::from_string("[1.5, 16777217]", Options::default()).unwrap();
    json.parse_floats(0).unwrap();
    assert_eq!(json.tokens()[1].as_float(), 1.5);
    // one past the exactly-representable integer range of an f32
    assert_eq!(json.tokens()[2].as_float(), 16_777_216.0);
}

#[test]
fn per_token_parsers_decode_without_caching() {
    let json = Json::from_string(r#"{"a":[1.5, 7, true, null, "x\ny"]}"#, Options::default())
        .unwrap();
    let array = json.token(2);
    let half = array.first_child().unwrap();
    let seven = half.next().unwrap();
    let flag = seven.next().unwrap();
    let nothing = flag.next().unwrap();
    let text = nothing.next().unwrap();

    assert_eq!(half.parse_double(), Some(1.5));
    assert_eq!(half.parse_float(), Some(1.5));
    assert_eq!(half.parse_unsigned_int(), None);
    assert_eq!(seven.parse_unsigned_int(), Some(7));
    assert_eq!(seven.parse_int(), Some(7));
    assert_eq!(seven.parse_unsigned_long(), Some(7));
    assert_eq!(seven.parse_long(), Some(7));
    assert_eq!(seven.parse_size(), Some(7));
    assert_eq!(flag.parse_bool(), Some(true));
    assert_eq!(nothing.parse_null(), Some(()));
    assert_eq!(text.parse_string(), Some(String::from("x\ny")));

    // type mismatches answer with None instead of failing
    assert_eq!(half.parse_bool(), None);
    assert_eq!(flag.parse_double(), None);
    assert_eq!(text.parse_null(), None);
    assert_eq!(array.parse_string(), None);

    // nothing was cached along the way
    assert!(!json.tokens()[3].is_parsed());
    assert!(!json.tokens()[5].is_parsed());
}

#[test]
fn per_token_parse_returns_cached_values() {
    let mut json = Json::from_string("[42]", Options::default()).unwrap();
    json.parse_unsigned_ints(0).unwrap();
    let token = json.token(1);
    assert_eq!(token.parse_unsigned_int(), Some(42));
    // a different width reparses from the lexeme without disturbing the cache
    assert_eq!(token.parse_double(), Some(42.0));
    assert_eq!(token.parsed_type(), ParsedType::UnsignedInt);
}

#[test]
fn navigation_through_a_nested_document() {
    let json = Json::from_string(r#"{"a":{"x":1},"b":2}"#, Options::default()).unwrap();
    assert_eq!(json.tokens().len(), 7);

    let root = json.root();
    assert_eq!(root.child_count(), 6);
    assert_eq!(root.children().len(), 6);
    assert!(root.parent().is_none());

    let key_a = root.first_child().unwrap();
    assert_eq!(key_a.index(), 1);
    assert!(key_a.is_object_key());
    // a key's subtree is its whole value
    assert_eq!(key_a.child_count(), 3);
    assert_eq!(key_a.data(), "\"a\"");

    let key_b = key_a.next().unwrap();
    assert_eq!(key_b.index(), 5);
    assert_eq!(key_b.child_count(), 1);

    let inner_value = json.token(4);
    assert_eq!(inner_value.parent().unwrap().index(), 3);
    assert_eq!(json.token(3).parent().unwrap().index(), 2);
    assert_eq!(json.token(2).parent().unwrap().index(), 1);
    assert_eq!(key_a.parent().unwrap().index(), 0);
}

#[test]
fn container_data_spans_nested_tokens() {
    let source = r#"{"list": [1, 2]}"#;
    let json = Json::from_string(source, Options::default()).unwrap();
    assert_eq!(json.root().data(), source);
    assert_eq!(json.token(2).data(), "[1, 2]");
    // key data ends at its closing quote even though the value is its child
    assert_eq!(json.token(1).data(), "\"list\"");
}

#[test]
fn sizes_alias_the_host_width() {
    let mut json = Json::from_string("[0, 100, 4096]", Options::default()).unwrap();
    json.parse_sizes(0).unwrap();
    let sizes: Vec<usize> = json.tokens()[1..].iter().map(|t| t.as_size()).collect();
    assert_eq!(sizes, [0, 100, 4096]);
}

#[cfg(target_pointer_width = "64")]
#[test]
fn longs_cache_on_64_bit_hosts() {
    let mut json = Json::from_string("[-9007199254740992, 12]", Options::default()).unwrap();
    json.parse_longs(0).unwrap();
    assert_eq!(json.tokens()[1].as_long(), -(1 << 53));
    assert_eq!(json.tokens()[1].parsed_type(), ParsedType::Long);
    assert_eq!(json.tokens()[2].as_long(), 12);
}

#[test]
fn tokens_survive_a_move_of_the_reader() {
    let mut json = Json::from_string(r#"{"k":[1]}"#, Options::default()).unwrap();
    json.parse_unsigned_ints(0).unwrap();
    let moved = json;
    assert_eq!(moved.token(3).as_unsigned_int(), 1);
    assert_eq!(moved.root().data(), r#"{"k":[1]}"#);
}

#[cfg(feature = "std")]
#[test]
fn from_file_reads_and_reports_the_path() {
    use std::fs;

    let path = std::env::temp_dir().join("jsontape_from_file_good.json");
    fs::write(&path, r#"{"n": 3}"#).unwrap();
    let mut json = Json::from_file(&path, Options::default()).unwrap();
    json.parse_unsigned_ints(0).unwrap();
    assert_eq!(json.token(2).as_unsigned_int(), 3);

    let err = json.parse_ints(0).err();
    assert!(err.is_none());
    // a failing pass reports the file name it came from
    fs::write(&path, r#"{"n": 3.5}"#).unwrap();
    let mut json = Json::from_file(&path, Options::default()).unwrap();
    let err = json.parse_unsigned_ints(0).unwrap_err();
    assert_eq!(err.filename(), Some(path.to_str().unwrap()));
    let _ = fs::remove_file(&path);
}

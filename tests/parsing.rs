//! Unit tests for tokenizing, value codecs and document edits.

use inf_parser::quoted::{index_of_unquoted, quote, split_ignoring_quoted, unquote};
use inf_parser::{
    AddRegEntry, Architecture, Directive, KeyValuesLine, RegistryRoot, RegistryValue,
    RegistryValueKind, TargetPlatform, TextDocument, TextEncoding,
};
use proptest::prelude::*;

#[test]
fn test_quoted_comma_splitting() {
    assert_eq!(
        split_ignoring_quoted(r#"a,"b,c",d"#, ','),
        vec!["a", "\"b,c\"", "d"]
    );
}

#[test]
fn test_unquote_leaves_unquoted_input() {
    assert_eq!(unquote("\""), "\"");
    assert_eq!(unquote("abc"), "abc");
    assert_eq!(unquote("\"abc"), "\"abc");
    assert_eq!(unquote("\"\""), "");
}

#[test]
fn test_repeated_sections_merge() {
    let doc = TextDocument::from_text("[Foo]\nA=1\n[Bar]\n[Foo]\nB=2", TextEncoding::Ascii);
    assert_eq!(doc.get_section("Foo"), vec!["A=1", "B=2"]);
}

#[test]
fn test_dword_hex_parsing() {
    assert_eq!(
        RegistryValue::decode("10", RegistryValueKind::DWord).unwrap(),
        RegistryValue::DWord(16)
    );
    assert_eq!(
        RegistryValue::decode("\"10\"", RegistryValueKind::DWord).unwrap(),
        RegistryValue::DWord(16)
    );
}

#[test]
fn test_broken_line_join() {
    let doc = TextDocument::from_text(
        "[S]\r\nKey = a,\\\r\n      b,\\\r\n   c\r\nNext = d\r\n",
        TextEncoding::Ascii,
    );
    let found = doc.get_line_index("S", |line| line.starts_with("Key"), true).unwrap();
    assert_eq!(found.index, 1);
    assert_eq!(found.line, "Key = a,b,c");
    assert_eq!(doc.get_line_index_by_key("S", "Next").unwrap().index, 4);
}

#[test]
fn test_section_priority_ordering() {
    let platform = TargetPlatform::new(Architecture::X86, 2, 1);
    let candidates = platform.models_section_candidates("Net");
    assert_eq!(candidates[0], "Net.ntx86.5.2.1");
    assert_eq!(candidates[1], "Net.ntx86.5.2");
    assert_eq!(candidates[2], "Net.ntx86.5.1.1");
}

#[test]
fn test_eof_marker_stripped_on_append() {
    let mut doc = TextDocument::from_text("[S]\r\nA=1\r\n\u{1A}", TextEncoding::Ascii);
    doc.append_line("B=2");
    doc.append_line("C=3");
    assert!(!doc.text().contains('\u{1A}'));
    assert_eq!(doc.get_section("S"), vec!["A=1", "B=2", "C=3"]);
}

#[test]
fn test_qword_has_no_addreg_line() {
    let err = AddRegEntry::new(RegistryRoot::LocalMachine, "Key", "Value", &RegistryValue::QWord(7))
        .unwrap_err();
    assert!(err.is_decode_error());
    assert!(RegistryValueKind::QWord.type_flags_hex().is_err());
}

#[test]
fn test_directive_keys() {
    let line = KeyValuesLine::parse("addservice = E1000, 2, E1000.Service");
    assert_eq!(Directive::parse(&line.key), Some(Directive::AddService));
    assert_eq!(line.value(2), "E1000.Service");
}

fn multi_string_strategy() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("[a-zA-Z0-9 ,;%\\\\\"]{0,12}", 0..5)
        // a single empty string is written exactly like an empty list
        .prop_filter("lone empty string", |v| !(v.len() == 1 && v[0].is_empty()))
}

proptest! {
    #[test]
    fn prop_split_rejoins(s in "[a-z\",]{0,24}") {
        let fields = split_ignoring_quoted(&s, ',');
        prop_assert_eq!(fields.join(","), s.clone());
    }

    #[test]
    fn prop_unquoted_index_is_outside_quotes(s in "[a-z\";]{0,24}") {
        if let Some(index) = index_of_unquoted(&s, ';', 0) {
            let quotes = s[..index].matches('"').count();
            prop_assert_eq!(quotes % 2, 0);
        }
    }

    #[test]
    fn prop_quote_unquote(s in "[^\r\n]{0,16}") {
        let quoted = quote(&s);
        prop_assert_eq!(unquote(&quoted), s.as_str());
    }

    #[test]
    fn prop_string_round_trip(s in "[^\r\n]{0,24}") {
        for value in [RegistryValue::String(s.clone()), RegistryValue::ExpandString(s.clone())] {
            let kind = value.kind();
            let data = value.encode(kind).unwrap();
            prop_assert_eq!(RegistryValue::decode(&data, kind).unwrap(), value);
        }
    }

    #[test]
    fn prop_multi_string_round_trip(strings in multi_string_strategy()) {
        let value = RegistryValue::MultiString(strings);
        let data = value.encode(RegistryValueKind::MultiString).unwrap();
        prop_assert_eq!(RegistryValue::decode(&data, RegistryValueKind::MultiString).unwrap(), value);
    }

    #[test]
    fn prop_dword_round_trip(n in any::<i32>()) {
        let value = RegistryValue::DWord(n);
        let data = value.encode(RegistryValueKind::DWord).unwrap();
        prop_assert_eq!(RegistryValue::decode(&data, RegistryValueKind::DWord).unwrap(), value);
    }

    #[test]
    fn prop_binary_round_trip(bytes in prop::collection::vec(any::<u8>(), 0..32)) {
        let value = RegistryValue::Binary(bytes);
        let data = value.encode(RegistryValueKind::Binary).unwrap();
        prop_assert_eq!(RegistryValue::decode(&data, RegistryValueKind::Binary).unwrap(), value);
    }

    #[test]
    fn prop_addreg_line_round_trip(name in "[A-Za-z0-9 ]{1,12}", n in any::<i32>()) {
        let entry = AddRegEntry::new(RegistryRoot::Relative, r"Ndi\Params", &name, &RegistryValue::DWord(n)).unwrap();
        let parsed = AddRegEntry::parse(&entry.to_line()).unwrap();
        prop_assert_eq!(parsed.value().unwrap(), RegistryValue::DWord(n));
        prop_assert_eq!(parsed, entry);
    }

    #[test]
    fn prop_untouched_section_survives_edits(
        values in prop::collection::vec("[A-Za-z0-9]{1,8}", 1..6),
        replacement in "[A-Za-z0-9]{1,8}",
    ) {
        let mut text = String::from("[Keep]\r\n");
        for (i, value) in values.iter().enumerate() {
            text.push_str(&format!("K{} = {}\r\n", i, value));
        }
        text.push_str("\r\n[Edit]\r\nX = 1\r\n");

        let mut doc = TextDocument::from_text(text, TextEncoding::Ascii);
        let before = doc.get_section("Keep");

        let index = doc.get_line_index_by_key("Edit", "X").unwrap().index;
        doc.update_line(index, Some(&format!("X = {}", replacement)), false).unwrap();
        doc.append_line(&format!("Y = {}", replacement));

        prop_assert_eq!(doc.get_section("Keep"), before);
        prop_assert_eq!(doc.get_section("Edit").len(), 2);
    }
}

//! # Parser 测试

use super::*;
use crate::apply_type::APPLY_NONE;
use crate::table::{BlendEntry, BonusRecord};

/// 测试用属性映射：X → 7，Y → 3
fn test_lookup(token: &str) -> i32 {
    match token {
        "X" => 7,
        "Y" => 3,
        _ => APPLY_NONE,
    }
}

fn parser() -> BlendParser<fn(&str) -> i32> {
    BlendParser::with_lookup(test_lookup as fn(&str) -> i32)
}

const ONE_SECTION: &str = "\
section
    item_vnum 100
    apply_type X
    apply_value 1 2 3 4 5
    apply_duration 10 20 30 40 50
end
";

// -------------------------------------------------------------------------
// 辅助函数测试
// -------------------------------------------------------------------------

#[test]
fn test_tokenize_mixed_delimiters() {
    let tokens: Vec<&str> = helpers::tokenize("  apply_value\t1  2\t3 4 5\r\n").collect();
    assert_eq!(tokens, vec!["apply_value", "1", "2", "3", "4", "5"]);
    assert_eq!(helpers::tokenize(" \t \r").count(), 0);
}

#[test]
fn test_is_comment() {
    assert!(helpers::is_comment("# header"));
    assert!(helpers::is_comment("   #indented"));
    assert!(!helpers::is_comment("section # trailing"));
}

#[test]
fn test_take_tiers_ignores_extra_values() {
    let tiers = helpers::take_tiers("apply_value", &["1", "2", "3", "4", "5", "6"], 1).unwrap();
    assert_eq!(tiers, [1, 2, 3, 4, 5]);
}

#[test]
fn test_take_tiers_negative_values() {
    let tiers = helpers::take_tiers("apply_value", &["-1", "0", "1", "2", "3"], 1).unwrap();
    assert_eq!(tiers, [-1, 0, 1, 2, 3]);
}

// -------------------------------------------------------------------------
// 正常解析
// -------------------------------------------------------------------------

#[test]
fn test_parse_single_section() {
    let tables = parser().parse(ONE_SECTION).unwrap();
    assert_eq!(
        tables.blends,
        vec![BlendEntry {
            item_vnum: 100,
            apply_type: 7,
            apply_values: [1, 2, 3, 4, 5],
            apply_durations: [10, 20, 30, 40, 50],
        }]
    );
    assert!(tables.bonuses.is_empty());
}

#[test]
fn test_parse_bonus_record() {
    let text = "\
energy_crystal_bonus
bonus_index 0
apply_type Y
apply_value 1 1 1 1 1
apply_duration 2 2 2 2 2
end
";
    let tables = parser().parse(text).unwrap();
    assert!(tables.blends.is_empty());
    assert_eq!(
        tables.bonuses,
        vec![BonusRecord {
            bonus_index: 0,
            apply_type: 3,
            apply_values: [1; 5],
            apply_durations: [2; 5],
        }]
    );
}

#[test]
fn test_parse_mixed_file_keeps_order() {
    let text = "\
# blend table
section
item_vnum 200
apply_type X
apply_value 1 2 3 4 5
apply_duration 1 2 3 4 5
end

energy_crystal_bonus
bonus_index 5
apply_type Y
apply_value 9 9 9 9 9
apply_duration 8 8 8 8 8
end

section
item_vnum 100
apply_type Y
apply_value 5 4 3 2 1
apply_duration 5 4 3 2 1
end

energy_crystal_bonus
bonus_index 6
apply_type X
apply_value 7 7 7 7 7
apply_duration 6 6 6 6 6
end
";
    let tables = parser().parse(text).unwrap();
    let vnums: Vec<u32> = tables.blends.iter().map(|e| e.item_vnum).collect();
    let indices: Vec<i32> = tables.bonuses.iter().map(|b| b.bonus_index).collect();
    assert_eq!(vnums, vec![200, 100]);
    assert_eq!(indices, vec![5, 6]);
}

#[test]
fn test_parse_crlf_and_tabs() {
    let text = "section\r\n\titem_vnum\t100\r\n\tapply_type\tX\r\n\tapply_value\t1\t2\t3\t4\t5\r\n\tapply_duration\t10\t20\t30\t40\t50\r\nend\r\n";
    let tables = parser().parse(text).unwrap();
    assert_eq!(tables.blends.len(), 1);
    assert_eq!(tables.blends[0].apply_durations, [10, 20, 30, 40, 50]);
}

#[test]
fn test_later_field_overwrites_earlier() {
    let text = "\
section
item_vnum 100
item_vnum 101
apply_type X
apply_value 1 2 3 4 5
apply_value 6 7 8 9 10
apply_duration 1 1 1 1 1
end
";
    let tables = parser().parse(text).unwrap();
    assert_eq!(tables.blends[0].item_vnum, 101);
    assert_eq!(tables.blends[0].apply_values, [6, 7, 8, 9, 10]);
}

#[test]
fn test_unknown_keys_are_ignored_with_warning() {
    let text = "\
version 2
section
item_vnum 100
apply_type X
rarity legendary
apply_value 1 2 3 4 5
apply_duration 10 20 30 40 50
end
";
    let mut parser = parser();
    let tables = parser.parse(text).unwrap();
    assert_eq!(tables.blends.len(), 1);
    assert_eq!(parser.warnings().len(), 2);
    assert!(parser.warnings()[1].contains("rarity"));

    // 下一次解析会清空旧警告
    parser.parse(ONE_SECTION).unwrap();
    assert!(parser.warnings().is_empty());
}

#[test]
fn test_standard_lookup() {
    let text = "\
section
item_vnum 50821
apply_type APPLY_ATT_SPEED
apply_value 1 2 3 4 5
apply_duration 60 120 180 240 300
end
";
    let tables = BlendParser::new().parse(text).unwrap();
    assert_eq!(tables.blends[0].apply_type, 7);
}

#[test]
fn test_empty_text() {
    let tables = parser().parse("").unwrap();
    assert!(tables.is_empty());

    let tables = parser().parse("# only comments\n\n   \n").unwrap();
    assert!(tables.is_empty());
}

// -------------------------------------------------------------------------
// 错误处理
// -------------------------------------------------------------------------

#[test]
fn test_short_apply_value_fails() {
    let text = "\
section
item_vnum 100
apply_type X
apply_value 1 2 3
apply_duration 10 20 30 40 50
end
";
    let err = parser().parse(text).unwrap_err();
    assert_eq!(
        err,
        ParseError::MissingValue {
            line: 4,
            key: "apply_value".to_string(),
            expected: 5,
            found: 3,
        }
    );
    insta::assert_snapshot!(err.to_string(), @"第 4 行：'apply_value' 需要 5 个值，实际只有 3 个");
}

#[test]
fn test_earlier_records_are_discarded_on_error() {
    let text = format!("{ONE_SECTION}section\nitem_vnum\n");
    let err = parser().parse(&text).unwrap_err();
    assert!(matches!(
        err,
        ParseError::MissingValue { line: 8, expected: 1, found: 0, .. }
    ));
}

#[test]
fn test_missing_apply_type_token() {
    let text = "section\nitem_vnum 1\napply_type\n";
    let err = parser().parse(text).unwrap_err();
    assert!(matches!(err, ParseError::MissingValue { line: 3, .. }));
}

#[test]
fn test_invalid_number() {
    let text = "section\nitem_vnum abc\n";
    let err = parser().parse(text).unwrap_err();
    insta::assert_snapshot!(err.to_string(), @"第 2 行：'item_vnum' 的值 'abc' 不是有效数字");
}

#[test]
fn test_key_outside_record() {
    let err = parser().parse("apply_type X\n").unwrap_err();
    assert_eq!(
        err,
        ParseError::KeyOutsideRecord {
            line: 1,
            key: "apply_type".to_string(),
        }
    );
}

#[test]
fn test_key_in_wrong_record() {
    let err = parser()
        .parse("energy_crystal_bonus\nitem_vnum 100\n")
        .unwrap_err();
    assert_eq!(
        err,
        ParseError::KeyNotAllowed {
            line: 2,
            key: "item_vnum".to_string(),
            record: "energy_crystal_bonus",
        }
    );

    let err = parser().parse("section\nbonus_index 1\n").unwrap_err();
    assert!(matches!(
        err,
        ParseError::KeyNotAllowed { record: "section", .. }
    ));
}

#[test]
fn test_nested_section_is_rejected() {
    let err = parser()
        .parse("section\nitem_vnum 1\nenergy_crystal_bonus\n")
        .unwrap_err();
    assert_eq!(
        err,
        ParseError::UnterminatedRecord {
            line: 3,
            record: "section",
        }
    );
}

#[test]
fn test_unterminated_at_eof() {
    let err = parser()
        .parse("energy_crystal_bonus\nbonus_index 1\n")
        .unwrap_err();
    assert_eq!(
        err,
        ParseError::UnterminatedRecord {
            line: 2,
            record: "energy_crystal_bonus",
        }
    );
}

#[test]
fn test_stray_end() {
    let err = parser().parse("# x\nend\n").unwrap_err();
    assert_eq!(err, ParseError::UnexpectedEnd { line: 2 });
}

#[test]
fn test_missing_field_at_end() {
    let text = "\
section
item_vnum 100
apply_type X
apply_value 1 2 3 4 5
end
";
    let err = parser().parse(text).unwrap_err();
    assert_eq!(
        err,
        ParseError::MissingField {
            line: 5,
            field: "apply_duration",
            record: "section",
        }
    );

    let err = parser()
        .parse("energy_crystal_bonus\napply_type X\nend\n")
        .unwrap_err();
    assert!(matches!(
        err,
        ParseError::MissingField { field: "bonus_index", .. }
    ));
}

// -------------------------------------------------------------------------
// 文件加载
// -------------------------------------------------------------------------

#[test]
fn test_load_empty_path() {
    let err = parser().load("").unwrap_err();
    assert_eq!(err, LoadError::EmptyPath);
}

#[test]
fn test_load_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = parser().load(dir.path().join("blend.txt")).unwrap_err();
    assert!(matches!(err, LoadError::Io { .. }));
}

#[test]
fn test_load_from_file_is_repeatable() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("blend.txt");
    std::fs::write(&path, ONE_SECTION).unwrap();

    let mut parser = parser();
    let first = parser.load(&path).unwrap();
    let second = parser.load(&path).unwrap();
    assert_eq!(first, second);
    assert_eq!(first.blends.len(), 1);
}

//! 配置验证模块
//!
//! 按字段类型描述符逐字段校验原始文档，一次收集全部字段错误

use std::fmt;

use super::types::{FieldSpec, FieldType};

/// 位置路径中的一段
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum LocSegment {
    /// 映射键
    Key(String),
    /// 列表下标
    Index(usize),
}

impl From<&str> for LocSegment {
    fn from(key: &str) -> Self {
        LocSegment::Key(key.to_string())
    }
}

impl From<usize> for LocSegment {
    fn from(index: usize) -> Self {
        LocSegment::Index(index)
    }
}

impl fmt::Display for LocSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LocSegment::Key(key) => f.write_str(key),
            LocSegment::Index(index) => write!(f, "{index}"),
        }
    }
}

/// 字段错误类别
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// 类型不符
    Type,
    /// 枚举成员名无效
    EnumName,
    /// 值不满足约束
    Value,
}

impl ErrorKind {
    /// 错误代码
    pub fn code(&self) -> &'static str {
        match self {
            ErrorKind::Type => "type_error",
            ErrorKind::EnumName => "type_error.enum",
            ErrorKind::Value => "value_error",
        }
    }
}

/// 单个字段的校验失败
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SingleFieldError {
    /// 出错字段在文档中的位置
    pub loc: Vec<LocSegment>,
    /// 错误类别
    pub kind: ErrorKind,
    /// 错误信息
    pub msg: String,
}

impl SingleFieldError {
    /// 创建字段错误
    pub fn new(loc: Vec<LocSegment>, kind: ErrorKind, msg: impl Into<String>) -> Self {
        Self {
            loc,
            kind,
            msg: msg.into(),
        }
    }

    /// 位置路径
    pub fn location(&self) -> &[LocSegment] {
        &self.loc
    }

    /// 以 ` -> ` 连接的位置路径
    pub fn location_string(&self) -> String {
        self.loc
            .iter()
            .map(|segment| segment.to_string())
            .collect::<Vec<_>>()
            .join(" -> ")
    }
}

/// 一次校验产生的全部字段错误
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    model: String,
    errors: Vec<SingleFieldError>,
}

impl ValidationError {
    /// 创建校验错误
    pub fn new(model: impl Into<String>, errors: Vec<SingleFieldError>) -> Self {
        Self {
            model: model.into(),
            errors,
        }
    }

    /// 按产生顺序排列的字段错误
    pub fn errors(&self) -> &[SingleFieldError] {
        &self.errors
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let count = self.errors.len();
        write!(
            f,
            "{count} validation error{} for {}",
            if count == 1 { "" } else { "s" },
            self.model
        )?;
        for error in &self.errors {
            write!(
                f,
                "\n{}\n  {} (type={})",
                error.location_string(),
                error.msg,
                error.kind.code()
            )?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

/// 校验通过后的规范化值
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Coerced {
    /// 布尔
    Bool(bool),
    /// 整数
    Int(i64),
    /// 字符串
    Str(String),
    /// 枚举成员下标
    Enum(usize),
    /// 列表
    List(Vec<Coerced>),
    /// 有序映射
    Map(Vec<(String, Coerced)>),
}

/// 校验文档中声明过的字段
///
/// 返回值与 `fields` 顺序一致；键缺失的字段为 `None`，由调用方取默认值。
/// 未声明的键被忽略。
pub fn validate_fields(
    doc: &toml::Table,
    fields: &[FieldSpec],
    model: &str,
) -> Result<Vec<(&'static str, Option<Coerced>)>, ValidationError> {
    let mut errors = Vec::new();
    let mut values = Vec::with_capacity(fields.len());

    for field in fields {
        let coerced = match doc.get(field.key) {
            Some(raw) => {
                let mut loc = vec![LocSegment::from(field.key)];
                coerce(raw, &field.ty, &mut loc, &mut errors)
            }
            None => None,
        };
        values.push((field.key, coerced));
    }

    if errors.is_empty() {
        Ok(values)
    } else {
        Err(ValidationError::new(model, errors))
    }
}

/// 按类型描述符转换单个值，失败时把错误追加到 `errors`
pub fn coerce(
    value: &toml::Value,
    ty: &FieldType,
    loc: &mut Vec<LocSegment>,
    errors: &mut Vec<SingleFieldError>,
) -> Option<Coerced> {
    match ty {
        FieldType::Bool => match lenient_bool(value) {
            Some(b) => Some(Coerced::Bool(b)),
            None => fail(loc, errors, ErrorKind::Type, "value could not be parsed to a boolean"),
        },
        FieldType::Int => match lenient_int(value) {
            Some(i) => Some(Coerced::Int(i)),
            None => fail(loc, errors, ErrorKind::Type, "value is not a valid integer"),
        },
        FieldType::Str => match value {
            toml::Value::String(s) => Some(Coerced::Str(s.clone())),
            toml::Value::Integer(i) => Some(Coerced::Str(i.to_string())),
            toml::Value::Float(_) => Some(Coerced::Str(value.to_string())),
            _ => fail(loc, errors, ErrorKind::Type, "str type expected"),
        },
        FieldType::Enum(descriptor) => {
            let index = value.as_str().and_then(|name| descriptor.position(name));
            match index {
                Some(index) => Some(Coerced::Enum(index)),
                None => {
                    let shown = match value {
                        toml::Value::String(s) => s.clone(),
                        other => other.to_string(),
                    };
                    fail(
                        loc,
                        errors,
                        ErrorKind::EnumName,
                        format!("\"{shown}\" is not a valid enum name"),
                    )
                }
            }
        }
        FieldType::OneOf(options) => {
            for option in options.iter() {
                let mut scratch = Vec::new();
                let mut scratch_loc = loc.clone();
                if let Some(coerced) = coerce(value, option, &mut scratch_loc, &mut scratch) {
                    if scratch.is_empty() {
                        return Some(coerced);
                    }
                }
            }
            fail(loc, errors, ErrorKind::Type, format!("value is not a valid {ty}"))
        }
        FieldType::ListOf(inner) => {
            let Some(items) = value.as_array() else {
                return fail(loc, errors, ErrorKind::Type, "value is not a valid list");
            };
            if items.is_empty() {
                return fail(
                    loc,
                    errors,
                    ErrorKind::Value,
                    "ensure this value has at least 1 items",
                );
            }
            let before = errors.len();
            let mut out = Vec::with_capacity(items.len());
            for (index, item) in items.iter().enumerate() {
                loc.push(LocSegment::Index(index));
                if let Some(coerced) = coerce(item, inner, loc, errors) {
                    out.push(coerced);
                }
                loc.pop();
            }
            (errors.len() == before).then_some(Coerced::List(out))
        }
        FieldType::MapOf(inner) => {
            let Some(table) = value.as_table() else {
                return fail(loc, errors, ErrorKind::Type, "value is not a valid dict");
            };
            let before = errors.len();
            let mut out = Vec::with_capacity(table.len());
            for (key, item) in table {
                loc.push(LocSegment::Key(key.clone()));
                if let Some(coerced) = coerce(item, inner, loc, errors) {
                    out.push((key.clone(), coerced));
                }
                loc.pop();
            }
            (errors.len() == before).then_some(Coerced::Map(out))
        }
        // 键存在时按内部类型校验；留空由键缺失表示
        FieldType::Blankable(inner) => coerce(value, inner, loc, errors),
    }
}

/// 布尔：接受 0/1 及常见的真假单词（不区分大小写）
fn lenient_bool(value: &toml::Value) -> Option<bool> {
    match value {
        toml::Value::Boolean(b) => Some(*b),
        toml::Value::Integer(0) => Some(false),
        toml::Value::Integer(1) => Some(true),
        toml::Value::Float(f) if *f == 0.0 => Some(false),
        toml::Value::Float(f) if *f == 1.0 => Some(true),
        toml::Value::String(s) => match s.to_lowercase().as_str() {
            "0" | "off" | "f" | "false" | "n" | "no" => Some(false),
            "1" | "on" | "t" | "true" | "y" | "yes" => Some(true),
            _ => None,
        },
        _ => None,
    }
}

/// 整数：接受布尔、数字字符串和没有小数部分的浮点数
fn lenient_int(value: &toml::Value) -> Option<i64> {
    match value {
        toml::Value::Integer(i) => Some(*i),
        toml::Value::Boolean(b) => Some(i64::from(*b)),
        toml::Value::String(s) => s.trim().parse().ok(),
        toml::Value::Float(f) if f.fract() == 0.0 && f.abs() < i64::MAX as f64 => {
            Some(*f as i64)
        }
        _ => None,
    }
}

fn fail(
    loc: &[LocSegment],
    errors: &mut Vec<SingleFieldError>,
    kind: ErrorKind,
    msg: impl Into<String>,
) -> Option<Coerced> {
    errors.push(SingleFieldError::new(loc.to_vec(), kind, msg));
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::config::types::{EnumDescriptor, FieldSpec};

    static COLOR: EnumDescriptor = EnumDescriptor {
        name: "Color",
        members: &["red", "green"],
    };

    static FIELDS: &[FieldSpec] = &[
        FieldSpec {
            key: "color",
            ty: FieldType::Enum(&COLOR),
        },
        FieldSpec {
            key: "names",
            ty: FieldType::ListOf(&FieldType::Str),
        },
        FieldSpec {
            key: "limits",
            ty: FieldType::MapOf(&FieldType::Int),
        },
        FieldSpec {
            key: "flag",
            ty: FieldType::Blankable(&FieldType::Bool),
        },
    ];

    fn table(text: &str) -> toml::Table {
        text.parse::<toml::Table>().unwrap()
    }

    #[test]
    fn test_valid_document_coerces_every_field() {
        let doc = table(
            r#"
color = "green"
names = ["a", "b"]
limits = { x = 1 }
flag = true
"#,
        );
        let values = validate_fields(&doc, FIELDS, "Test").unwrap();
        assert_eq!(values[0], ("color", Some(Coerced::Enum(1))));
        assert_eq!(
            values[1].1,
            Some(Coerced::List(vec![
                Coerced::Str("a".into()),
                Coerced::Str("b".into())
            ]))
        );
        assert_eq!(
            values[2].1,
            Some(Coerced::Map(vec![("x".into(), Coerced::Int(1))]))
        );
        assert_eq!(values[3].1, Some(Coerced::Bool(true)));
    }

    #[test]
    fn test_missing_keys_are_none() {
        let values = validate_fields(&toml::Table::new(), FIELDS, "Test").unwrap();
        assert!(values.iter().all(|(_, v)| v.is_none()));
    }

    #[test]
    fn test_enum_name_mismatch_reports_template_message() {
        let err = validate_fields(&table(r#"color = "Red""#), FIELDS, "Test").unwrap_err();
        assert_eq!(err.errors().len(), 1);
        let first = &err.errors()[0];
        assert_eq!(first.loc, vec![LocSegment::from("color")]);
        assert_eq!(first.kind, ErrorKind::EnumName);
        assert_eq!(first.msg, "\"Red\" is not a valid enum name");
    }

    #[test]
    fn test_nested_errors_carry_full_location() {
        let doc = table(
            r#"
names = ["a", true]
limits = { x = "high", y = 2 }
flag = "maybe"
"#,
        );
        let err = validate_fields(&doc, FIELDS, "Test").unwrap_err();
        let locations: Vec<String> = err.errors().iter().map(|e| e.location_string()).collect();
        assert_eq!(locations, vec!["names -> 1", "limits -> x", "flag"]);
        assert!(err.to_string().starts_with("3 validation errors for Test"));
    }

    #[test]
    fn test_empty_list_is_value_error() {
        let err = validate_fields(&table("names = []"), FIELDS, "Test").unwrap_err();
        assert_eq!(err.errors()[0].kind, ErrorKind::Value);
    }

    #[test]
    fn test_one_of_reports_single_error_at_field() {
        static UNION: FieldType =
            FieldType::OneOf(&[FieldType::Str, FieldType::ListOf(&FieldType::Str)]);
        let mut errors = Vec::new();
        let mut loc = vec![LocSegment::from("prefix")];
        let value = toml::Value::Boolean(true);
        assert!(coerce(&value, &UNION, &mut loc, &mut errors).is_none());
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].loc, vec![LocSegment::from("prefix")]);
        assert_eq!(loc.len(), 1);
    }

    #[test]
    fn test_scalar_values_are_coerced_leniently() {
        let doc = table(
            r#"
names = [5, 1.5, "x"]
limits = { a = "4", b = " 7 ", c = 2.0, d = true }
flag = "Yes"
"#,
        );
        let values = validate_fields(&doc, FIELDS, "Test").unwrap();
        assert_eq!(
            values[1].1,
            Some(Coerced::List(vec![
                Coerced::Str("5".into()),
                Coerced::Str("1.5".into()),
                Coerced::Str("x".into())
            ]))
        );
        assert_eq!(
            values[2].1,
            Some(Coerced::Map(vec![
                ("a".into(), Coerced::Int(4)),
                ("b".into(), Coerced::Int(7)),
                ("c".into(), Coerced::Int(2)),
                ("d".into(), Coerced::Int(1))
            ]))
        );
        assert_eq!(values[3].1, Some(Coerced::Bool(true)));
    }

    #[test]
    fn test_bool_accepts_common_words_and_digits() {
        for (raw, expected) in [
            ("1", true),
            ("0", false),
            (r#""on""#, true),
            (r#""OFF""#, false),
            (r#""t""#, true),
            (r#""N""#, false),
            (r#""False""#, false),
        ] {
            let doc = table(&format!("flag = {raw}"));
            let values = validate_fields(&doc, FIELDS, "Test").unwrap();
            assert_eq!(values[3].1, Some(Coerced::Bool(expected)), "input: {raw}");
        }
        for raw in ["2", r#""maybe""#, "[]"] {
            let doc = table(&format!("flag = {raw}"));
            assert!(validate_fields(&doc, FIELDS, "Test").is_err(), "input: {raw}");
        }
    }

    #[test]
    fn test_int_rejects_fractional_and_non_numeric_values() {
        for raw in ["1.5", r#""4.0""#, r#""high""#, "[1]"] {
            let doc = table(&format!("limits = {{ x = {raw} }}"));
            let err = validate_fields(&doc, FIELDS, "Test").unwrap_err();
            assert_eq!(err.errors()[0].location_string(), "limits -> x", "input: {raw}");
            assert_eq!(err.errors()[0].kind, ErrorKind::Type);
        }
    }
}

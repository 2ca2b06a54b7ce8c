//! 位置路径辅助函数

use crate::app::config::schema::Mapping;
use crate::app::config::validator::LocSegment;
use crate::app::error::types::{ConfigError, Result};

/// 沿位置路径在序列化映射中取值
///
/// 任一步遇到非映射节点、缺失的键或留空字段时返回 `None`，不会 panic。
pub fn lookup<'a>(data: &'a Mapping, path: &[LocSegment]) -> Option<&'a toml::Value> {
    let (first, rest) = path.split_first()?;
    let LocSegment::Key(key) = first else {
        return None;
    };
    let value = data.get(key)?.as_ref()?;
    lookup_value(value, rest)
}

/// 沿位置路径在嵌套值中取值
pub fn lookup_value<'a>(data: &'a toml::Value, path: &[LocSegment]) -> Option<&'a toml::Value> {
    let mut current = data;
    for segment in path {
        current = match (current, segment) {
            (toml::Value::Table(table), LocSegment::Key(key)) => table.get(key)?,
            (toml::Value::Array(items), LocSegment::Index(index)) => items.get(*index)?,
            _ => return None,
        };
    }
    Some(current)
}

/// 在文档中写入或删除位置路径处的值
///
/// `value` 为 `None` 时删除该位置。中间节点不是表或数组时返回结构错误。
pub fn set_path(
    doc: &mut toml::Table,
    path: &[LocSegment],
    value: Option<toml::Value>,
) -> Result<()> {
    let Some((last, parents)) = path.split_last() else {
        return Err(ConfigError::structural("empty location path"));
    };

    let mut node = Node::Table(doc);
    for segment in parents {
        node = node.descend(segment)?;
    }
    node.assign(last, value)
}

enum Node<'a> {
    Table(&'a mut toml::Table),
    Array(&'a mut Vec<toml::Value>),
}

impl<'a> Node<'a> {
    fn descend(self, segment: &LocSegment) -> Result<Node<'a>> {
        let child = match (self, segment) {
            (Node::Table(table), LocSegment::Key(key)) => table.get_mut(key),
            (Node::Array(items), LocSegment::Index(index)) => items.get_mut(*index),
            _ => None,
        };
        match child {
            Some(toml::Value::Table(table)) => Ok(Node::Table(table)),
            Some(toml::Value::Array(items)) => Ok(Node::Array(items)),
            _ => Err(ConfigError::structural(format!(
                "cannot descend into \"{segment}\""
            ))),
        }
    }

    fn assign(self, segment: &LocSegment, value: Option<toml::Value>) -> Result<()> {
        match (self, segment, value) {
            (Node::Table(table), LocSegment::Key(key), Some(value)) => {
                table.insert(key.clone(), value);
                Ok(())
            }
            (Node::Table(table), LocSegment::Key(key), None) => {
                table.remove(key);
                Ok(())
            }
            (Node::Array(items), LocSegment::Index(index), Some(value)) if *index < items.len() => {
                items[*index] = value;
                Ok(())
            }
            (Node::Array(items), LocSegment::Index(index), None) if *index < items.len() => {
                items.remove(*index);
                Ok(())
            }
            (_, segment, _) => Err(ConfigError::structural(format!(
                "cannot assign to \"{segment}\""
            ))),
        }
    }
}

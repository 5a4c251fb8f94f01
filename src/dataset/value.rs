//! Значения ячеек и тип колонки

use std::cmp::Ordering;
use std::fmt;

use serde::{Serialize, Serializer};

/// Одна ячейка таблицы
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Missing,
    Number(f64),
    Text(String),
    Bool(bool),
}

impl Value {
    /// NaN никогда не хранится как число, -0.0 хранится как 0.0
    pub fn number(x: f64) -> Self {
        if x.is_nan() {
            Value::Missing
        } else if x == 0.0 {
            Value::Number(0.0)
        } else {
            Value::Number(x)
        }
    }

    pub fn text(s: impl Into<String>) -> Self {
        Value::Text(s.into())
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Value::Missing)
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(x) => Some(*x),
            _ => None,
        }
    }

    fn type_rank(&self) -> u8 {
        match self {
            Value::Missing => 0,
            Value::Bool(_) => 1,
            Value::Number(_) => 2,
            Value::Text(_) => 3,
        }
    }

    /// Порядок категорий: числа по значению, строки лексикографически, false < true
    pub fn category_cmp(&self, other: &Value) -> Ordering {
        match (self, other) {
            (Value::Number(a), Value::Number(b)) => {
                a.partial_cmp(b).unwrap_or_else(|| a.total_cmp(b))
            }
            (Value::Text(a), Value::Text(b)) => a.cmp(b),
            (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
            _ => self.type_rank().cmp(&other.type_rank()),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Missing => Ok(()),
            Value::Number(x) if *x == 0.0 => f.write_str("0"),
            Value::Number(x) => write!(f, "{}", x),
            Value::Text(s) => f.write_str(s),
            Value::Bool(b) => write!(f, "{}", b),
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Missing => serializer.serialize_none(),
            Value::Number(x) => serializer.serialize_f64(*x),
            Value::Text(s) => serializer.serialize_str(s),
            Value::Bool(b) => serializer.serialize_bool(*b),
        }
    }
}

/// Ключ для группировки значений (упорядочен по `category_cmp`)
#[derive(Debug, Clone, Copy)]
pub struct Category<'a>(pub &'a Value);

impl PartialEq for Category<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Category<'_> {}

impl PartialOrd for Category<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Category<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.category_cmp(other.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnKind {
    Numeric,
    Categorical,
}

impl ColumnKind {
    /// Числовая, если все непропущенные значения - числа
    pub fn of(values: &[Value]) -> Self {
        let numeric = values
            .iter()
            .all(|v| matches!(v, Value::Missing | Value::Number(_)));
        if numeric {
            ColumnKind::Numeric
        } else {
            ColumnKind::Categorical
        }
    }
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnKind::Numeric => f.write_str("numeric"),
            ColumnKind::Categorical => f.write_str("categorical"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nan_becomes_missing() {
        assert_eq!(Value::number(f64::NAN), Value::Missing);
        assert_eq!(Value::number(1.5), Value::Number(1.5));
    }

    #[test]
    fn signed_zero_is_one_category() {
        assert_eq!(Value::number(-0.0), Value::Number(0.0));
        assert_eq!(Value::Number(-0.0).to_string(), "0");
        assert_eq!(
            Value::Number(-0.0).category_cmp(&Value::Number(0.0)),
            Ordering::Equal
        );
        assert_eq!(Category(&Value::Number(-0.0)), Category(&Value::Number(0.0)));
    }

    #[test]
    fn integral_numbers_print_without_fraction() {
        assert_eq!(Value::Number(3.0).to_string(), "3");
        assert_eq!(Value::Number(2.5).to_string(), "2.5");
        assert_eq!(Value::Missing.to_string(), "");
    }

    #[test]
    fn kind_ignores_missing_cells() {
        let values = vec![Value::Number(1.0), Value::Missing];
        assert_eq!(ColumnKind::of(&values), ColumnKind::Numeric);
        assert_eq!(ColumnKind::of(&[Value::Missing]), ColumnKind::Numeric);

        let mixed = vec![Value::Number(1.0), Value::text("a")];
        assert_eq!(ColumnKind::of(&mixed), ColumnKind::Categorical);
        assert_eq!(ColumnKind::of(&[Value::Bool(true)]), ColumnKind::Categorical);
    }

    #[test]
    fn categories_sort_numerically_and_lexically() {
        let mut values = vec![Value::Number(10.0), Value::Number(2.0), Value::Number(-1.0)];
        values.sort_by(Value::category_cmp);
        assert_eq!(values, vec![Value::Number(-1.0), Value::Number(2.0), Value::Number(10.0)]);

        let mut words = vec![Value::text("red"), Value::text("blue"), Value::text("green")];
        words.sort_by(Value::category_cmp);
        assert_eq!(words[0], Value::text("blue"));
        assert_eq!(words[2], Value::text("red"));
    }

    #[test]
    fn serializes_missing_as_null() {
        let json = serde_json::to_string(&vec![
            Value::Missing,
            Value::Number(1.5),
            Value::text("x"),
            Value::Bool(false),
        ])
        .unwrap();
        assert_eq!(json, r#"[null,1.5,"x",false]"#);
    }
}

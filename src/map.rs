use crate::types::RowValues;

/// An ordered column-name/value list used for conditions and insert/update
/// data.
///
/// Iteration order is insertion order by construction, which fixes both the
/// generated column/clause order and the positional parameter order; the two
/// stay in lock-step.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColumnMap(Vec<(String, RowValues)>);

impl ColumnMap {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Append a column/value pair, builder style.
    #[must_use]
    pub fn set(mut self, column: impl Into<String>, value: impl Into<RowValues>) -> Self {
        self.push(column, value);
        self
    }

    pub fn push(&mut self, column: impl Into<String>, value: impl Into<RowValues>) {
        self.0.push((column.into(), value.into()));
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(k, _)| k.as_str())
    }

    /// Values cloned out in insertion order.
    pub fn values(&self) -> Vec<RowValues> {
        self.0.iter().map(|(_, v)| v.clone()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &RowValues)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<RowValues>> FromIterator<(K, V)> for ColumnMap {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl<K: Into<String>, V: Into<RowValues>, const N: usize> From<[(K, V); N]> for ColumnMap {
    fn from(pairs: [(K, V); N]) -> Self {
        pairs.into_iter().collect()
    }
}

/// The field projection of a select: either a single SQL fragment or an
/// ordered list of fields joined with `, `.
///
/// The fragment is trusted verbatim; no identifier escaping is applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldList(String);

impl FieldList {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for FieldList {
    fn from(fragment: &str) -> Self {
        Self(fragment.to_string())
    }
}

impl From<String> for FieldList {
    fn from(fragment: String) -> Self {
        Self(fragment)
    }
}

impl From<&[&str]> for FieldList {
    fn from(fields: &[&str]) -> Self {
        Self(fields.join(", "))
    }
}

impl From<Vec<&str>> for FieldList {
    fn from(fields: Vec<&str>) -> Self {
        Self(fields.join(", "))
    }
}

impl From<Vec<String>> for FieldList {
    fn from(fields: Vec<String>) -> Self {
        Self(fields.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preserves_insertion_order() {
        let map = ColumnMap::new()
            .set("z", 1)
            .set("a", 2)
            .set("m", 3);
        let keys: Vec<&str> = map.keys().collect();
        assert_eq!(keys, ["z", "a", "m"]);
        assert_eq!(
            map.values(),
            vec![RowValues::Int(1), RowValues::Int(2), RowValues::Int(3)]
        );
    }

    #[test]
    fn builds_from_pair_array() {
        let map = ColumnMap::from([("name", "a"), ("email", "x@y.com")]);
        assert_eq!(map.len(), 2);
        assert_eq!(map.values()[1], RowValues::Text("x@y.com".into()));
    }

    #[test]
    fn field_list_joins_with_comma() {
        assert_eq!(FieldList::from(vec!["id", "name"]).as_str(), "id, name");
        assert_eq!(FieldList::from("count(*) as cnt").as_str(), "count(*) as cnt");
    }
}

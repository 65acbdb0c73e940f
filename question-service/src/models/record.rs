use serde::ser::{Serialize, SerializeMap, Serializer};

/// One CSV row as column/value pairs, in header order.
///
/// Datasets carry no fixed schema, so every column is passed through.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    fields: Vec<(String, String)>,
}

impl Record {
    pub fn new(fields: Vec<(String, String)>) -> Self {
        Self { fields }
    }

    pub fn get(&self, column: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value.as_str())
    }

    /// Key used to match a requested question number: `question_id` when it
    /// is present and non-empty, otherwise `question_number`.
    pub fn match_key(&self) -> Option<&str> {
        match self.get("question_id") {
            Some(id) if !id.is_empty() => Some(id),
            _ => self.get("question_number"),
        }
    }
}

impl FromIterator<(String, String)> for Record {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(pairs: &[(&str, &str)]) -> Record {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn match_key_prefers_question_id() {
        let r = record(&[("question_number", "7"), ("question_id", "q7")]);
        assert_eq!(r.match_key(), Some("q7"));
    }

    #[test]
    fn match_key_falls_back_when_question_id_empty() {
        let r = record(&[("question_id", ""), ("question_number", "3")]);
        assert_eq!(r.match_key(), Some("3"));
    }

    #[test]
    fn match_key_absent_without_either_column() {
        let r = record(&[("text", "Age?")]);
        assert_eq!(r.match_key(), None);
    }

    #[test]
    fn serializes_as_flat_object_in_column_order() {
        let r = record(&[("text", "Name?"), ("question_id", "2")]);
        let json = serde_json::to_string(&r).unwrap();
        assert_eq!(json, r#"{"text":"Name?","question_id":"2"}"#);
    }
}

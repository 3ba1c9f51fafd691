use serde::Serialize;
use indexmap::IndexMap;

///
/// ErrorMap
///
/// Flat mapping from (possibly qualified) attribute key to messages.
/// Keys keep the order they were first reported in, so a node's own
/// errors come before its children's; messages under one key keep their
/// reporting order too.
///

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ErrorMap(IndexMap<String, Vec<String>>);

impl ErrorMap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, key: impl Into<String>, message: impl Into<String>) {
        self.0.entry(key.into()).or_default().push(message.into());
    }

    /// Merge another map's keys as-is. Keys are already qualified by the
    /// node that produced them.
    pub fn merge(&mut self, other: &Self) {
        for (key, messages) in &other.0 {
            self.0
                .entry(key.clone())
                .or_default()
                .extend(messages.iter().cloned());
        }
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&[String]> {
        self.0.get(key).map(Vec::as_slice)
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of keys with at least one message.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Total number of messages across all keys.
    #[must_use]
    pub fn message_count(&self) -> usize {
        self.0.values().map(Vec::len).sum()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// `"<key> <message>"` lines, the way forms usually print them.
    #[must_use]
    pub fn full_messages(&self) -> Vec<String> {
        self.iter()
            .flat_map(|(key, messages)| messages.iter().map(move |m| format!("{key} {m}")))
            .collect()
    }

    #[must_use]
    pub fn into_inner(self) -> IndexMap<String, Vec<String>> {
        self.0
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_keeps_keys_and_appends_messages() {
        let mut left = ErrorMap::new();
        left.add("name", "can't be blank");

        let mut right = ErrorMap::new();
        right.add("name", "is too short");
        right.add("tasks.name", "can't be blank");

        left.merge(&right);

        assert_eq!(
            left.get("name"),
            Some(&["can't be blank".to_string(), "is too short".to_string()][..])
        );
        assert!(left.contains_key("tasks.name"));
        assert_eq!(left.len(), 2);
        assert_eq!(left.message_count(), 3);
    }

    #[test]
    fn full_messages_join_key_and_message() {
        let mut errors = ErrorMap::new();
        errors.add("owner.name", "can't be blank");

        assert_eq!(errors.full_messages(), vec!["owner.name can't be blank"]);
    }

    #[test]
    fn keys_keep_reporting_order() {
        let mut errors = ErrorMap::new();
        errors.add("title", "can't be blank");
        errors.add("budget", "is not a number");

        let mut child = ErrorMap::new();
        child.add("tasks.name", "can't be blank");
        errors.merge(&child);
        errors.add("budget", "must be positive");

        assert_eq!(
            errors.keys().collect::<Vec<_>>(),
            vec!["title", "budget", "tasks.name"]
        );
        assert_eq!(
            errors.full_messages(),
            vec![
                "title can't be blank",
                "budget is not a number",
                "budget must be positive",
                "tasks.name can't be blank",
            ]
        );
    }
}

use serde::{Deserialize, Serialize};

use crate::KeyValue;

/// Environment overrides applied to the launched container.
///
/// Stored as an ordered list; later entries win when the same key appears twice.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskEnv(Vec<KeyValue>);

impl TaskEnv {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn single(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self(vec![KeyValue::new(key, value)])
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn push(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.push(KeyValue::new(key, value));
    }

    /// Last value recorded for `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .rev()
            .find(|kv| kv.key() == key)
            .map(|kv| kv.value())
    }

    /// Entries with duplicates collapsed, keeping the position of the first
    /// occurrence and the value of the last one.
    ///
    /// This is what gets sent to the platform, which rejects repeated names.
    pub fn resolved(&self) -> Vec<KeyValue> {
        let mut out: Vec<KeyValue> = Vec::with_capacity(self.0.len());
        for kv in &self.0 {
            match out.iter_mut().find(|seen| seen.key() == kv.key()) {
                Some(seen) => *seen = kv.clone(),
                None => out.push(kv.clone()),
            }
        }
        out
    }

    /// `other` is appended, so its values override ours.
    pub fn merged(&self, other: &TaskEnv) -> TaskEnv {
        let mut out = self.0.clone();
        out.extend(other.0.iter().cloned());
        TaskEnv(out)
    }
}

impl FromIterator<KeyValue> for TaskEnv {
    fn from_iter<I: IntoIterator<Item = KeyValue>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::TaskEnv;
    use crate::KeyValue;

    #[test]
    fn last_push_wins_on_get() {
        let mut env = TaskEnv::new();
        env.push("HUB_PATCH", "2");
        env.push("OTHER", "x");
        env.push("HUB_PATCH", "4");

        assert_eq!(env.get("HUB_PATCH"), Some("4"));
        assert_eq!(env.get("OTHER"), Some("x"));
        assert!(env.get("MISSING").is_none());
    }

    #[test]
    fn resolved_collapses_duplicates_in_first_position() {
        let mut env = TaskEnv::single("A", "1");
        env.push("B", "2");
        env.push("A", "3");

        let resolved = env.resolved();
        assert_eq!(resolved, vec![KeyValue::new("A", "3"), KeyValue::new("B", "2")]);
    }

    #[test]
    fn merged_lets_other_override() {
        let base = TaskEnv::single("HUB_PATCH", "2");
        let extra: TaskEnv = vec![KeyValue::new("HUB_PATCH", "0"), KeyValue::new("X", "y")]
            .into_iter()
            .collect();

        let merged = base.merged(&extra);
        assert_eq!(merged.get("HUB_PATCH"), Some("0"));
        assert_eq!(merged.get("X"), Some("y"));
        assert_eq!(merged.len(), 3);
    }

    #[test]
    fn serializes_as_plain_array() {
        let env = TaskEnv::single("HUB_PATCH", "3");
        let json = serde_json::to_string(&env).unwrap();
        assert_eq!(json, r#"[{"key":"HUB_PATCH","value":"3"}]"#);
    }
}

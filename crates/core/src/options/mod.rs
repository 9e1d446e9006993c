use std::{
    collections::{BTreeMap, HashMap, HashSet},
    path::Path,
};

use crate::{MultitypeError, Result, StoreConfig, Value};

/// Registry of named option values.
///
/// Options are usually loaded from `key = value` text where each value goes
/// through [`Value::parse`], so unrecognised values are kept as `None`
/// rather than rejected. Only the line structure itself is validated.
#[derive(Debug, Default, Clone)]
pub struct OptionStore {
    config: StoreConfig,
    options: HashMap<String, Value>,
}

impl OptionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: StoreConfig) -> Self {
        Self {
            config,
            options: HashMap::new(),
        }
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Inserts or replaces an option, returning the previous value.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.options.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.options.get(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.options.remove(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.options.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    /// Option names in sorted order.
    pub fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.options.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }

    /// Entries in sorted key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.sorted().into_iter().map(|(key, value)| (key.as_str(), value))
    }

    pub fn int_or(&self, key: &str, default: i64) -> i64 {
        match self.get(key) {
            Some(Value::Int(v)) => *v,
            _ => default,
        }
    }

    pub fn double_or(&self, key: &str, default: f64) -> f64 {
        match self.get(key) {
            Some(Value::Double(v)) => *v,
            _ => default,
        }
    }

    pub fn bool_or(&self, key: &str, default: bool) -> bool {
        match self.get(key) {
            Some(Value::Boolean(v)) => *v,
            _ => default,
        }
    }

    pub fn string_or<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        match self.get(key) {
            Some(Value::String(v)) => v,
            _ => default,
        }
    }

    /// Loads `key = value` lines, returning how many options were read.
    ///
    /// Keys already in the store are overwritten. A key that appears twice
    /// in `text` itself is an error unless redefinition is allowed. The load
    /// is all-or-nothing: on error the store keeps its previous contents.
    pub fn load_str(&mut self, text: &str) -> Result<usize> {
        let mut staged = self.options.clone();
        let mut seen = HashSet::new();
        let mut loaded = 0;

        for (index, raw) in text.lines().enumerate() {
            let line = index + 1;
            let trimmed = raw.trim();
            if trimmed.is_empty() || self.is_comment(trimmed) {
                continue;
            }

            let (key, value_text) = trimmed
                .split_once(self.config.separator)
                .map(|(key, value)| (key.trim(), value))
                .filter(|(key, _)| !key.is_empty())
                .ok_or_else(|| MultitypeError::InvalidLine {
                    line,
                    content: trimmed.to_string(),
                })?;

            let value = Value::parse(value_text);
            tracing::trace!(line, key, tag = %value.tag(), "read option");
            if value.is_null() {
                tracing::debug!(line, key, text = value_text.trim(), "option value parsed as null");
            }

            if !seen.insert(key) {
                if !self.config.allow_redefinition {
                    return Err(MultitypeError::DuplicateKey {
                        line,
                        key: key.to_string(),
                    });
                }
                tracing::warn!(line, key, "option redefined");
            }

            staged.insert(key.to_string(), value);
            loaded += 1;
        }

        self.options = staged;
        Ok(loaded)
    }

    pub fn load_file(&mut self, path: impl AsRef<Path>) -> Result<usize> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let loaded = self.load_str(&text)?;
        tracing::info!(path = %path.display(), loaded, "loaded option file");
        Ok(loaded)
    }

    /// Writes every option as a `key = value` line in sorted key order.
    ///
    /// The output loads back into the same values. Options the format
    /// cannot carry fail with [`MultitypeError::Unrepresentable`]: keys that
    /// would be split, trimmed or read as comments, strings with line breaks
    /// or with both quote characters, non-finite doubles, and maps.
    pub fn to_text(&self) -> Result<String> {
        let mut out = String::new();
        for (key, value) in self.iter() {
            self.check_key(key)?;
            let rendered = write_literal(key, value)?;
            out.push_str(&format!("{key} {} {rendered}\n", self.config.separator));
        }
        Ok(out)
    }

    pub fn to_json(&self) -> Result<String> {
        let ordered: BTreeMap<&String, &Value> = self.options.iter().collect();
        Ok(serde_json::to_string_pretty(&ordered)?)
    }

    /// Builds a store from a JSON object whose members become options.
    pub fn from_json(text: &str) -> Result<Self> {
        let options: HashMap<String, Value> = serde_json::from_str(text)?;
        Ok(Self {
            config: StoreConfig::default(),
            options,
        })
    }

    fn is_comment(&self, line: &str) -> bool {
        let prefix = self.config.comment_prefix.as_str();
        !prefix.is_empty() && line.starts_with(prefix)
    }

    fn check_key(&self, key: &str) -> Result<()> {
        let reason = if key.is_empty() {
            "empty key"
        } else if key.trim() != key {
            "key has surrounding whitespace"
        } else if key.contains(self.config.separator) {
            "key contains the separator"
        } else if key.contains(['\n', '\r']) {
            "key contains a line break"
        } else if self.is_comment(key) {
            "key starts with the comment prefix"
        } else {
            return Ok(());
        };
        Err(unrepresentable(key, reason))
    }

    fn sorted(&self) -> Vec<(&String, &Value)> {
        let mut entries: Vec<_> = self.options.iter().collect();
        entries.sort_unstable_by(|a, b| a.0.cmp(b.0));
        entries
    }
}

/// Text literal for an option value that [`Value::parse`] reads back
/// unchanged. Doubles use the shortest exact decimal form rather than the
/// six-decimal display form.
fn write_literal(key: &str, value: &Value) -> Result<String> {
    let literal = match value {
        Value::None | Value::Int(_) | Value::Boolean(_) => value.to_string(),
        Value::Double(v) if !v.is_finite() => {
            return Err(unrepresentable(key, "non-finite double"));
        }
        Value::Double(v) => {
            let exact = v.to_string();
            if exact.contains('.') {
                exact
            } else {
                format!("{exact}.0")
            }
        }
        Value::String(v) if v.contains(['\n', '\r']) => {
            return Err(unrepresentable(key, "string contains a line break"));
        }
        Value::String(v) if !v.contains('"') => format!("\"{v}\""),
        Value::String(v) if !v.contains('\'') => format!("'{v}'"),
        Value::String(_) => {
            return Err(unrepresentable(key, "string contains both quote characters"));
        }
        Value::List(items) => {
            let parts = items
                .iter()
                .map(|item| write_literal(key, item))
                .collect::<Result<Vec<_>>>()?;
            format!("[{}]", parts.join(", "))
        }
        Value::Map(_) => return Err(unrepresentable(key, "maps have no text literal")),
    };
    Ok(literal)
}

fn unrepresentable(key: &str, reason: &'static str) -> MultitypeError {
    MultitypeError::Unrepresentable {
        key: key.to_string(),
        reason,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
# window settings
title = "Demo Window"
width = 1280
scale = 1.5
vsync = true
layers = [1, 2, "hud"]

  # indented comment
fallback = something odd
"#;

    #[test]
    fn loads_options_from_text() {
        let mut store = OptionStore::new();
        let loaded = store.load_str(SAMPLE).unwrap();

        assert_eq!(loaded, 6);
        assert_eq!(store.get("title"), Some(&Value::from("Demo Window")));
        assert_eq!(store.get("width"), Some(&Value::from(1280)));
        assert_eq!(store.get("scale"), Some(&Value::from(1.5)));
        assert_eq!(store.get("vsync"), Some(&Value::from(true)));
        assert_eq!(store.get("layers").map(Value::len), Some(3));
        assert_eq!(store.get("fallback"), Some(&Value::NULL));
        assert_eq!(
            store.keys(),
            vec!["fallback", "layers", "scale", "title", "vsync", "width"]
        );
    }

    #[test]
    fn typed_getters_fall_back_on_missing_or_mismatched_options() {
        let mut store = OptionStore::new();
        store.set("width", 0);
        store.set("ratio", 0.75);
        store.set("name", "main");
        store.set("fullscreen", false);

        assert_eq!(store.int_or("width", 800), 0);
        assert_eq!(store.int_or("height", 600), 600);
        assert_eq!(store.int_or("ratio", 3), 3);
        assert_eq!(store.double_or("ratio", 1.0), 0.75);
        assert_eq!(store.double_or("width", 1.0), 1.0);
        assert!(!store.bool_or("fullscreen", true));
        assert!(store.bool_or("name", true));
        assert_eq!(store.string_or("name", "default"), "main");
        assert_eq!(store.string_or("missing", "default"), "default");
    }

    #[test]
    fn set_and_remove_report_previous_values() {
        let mut store = OptionStore::new();
        assert_eq!(store.set("volume", 3), None);
        assert_eq!(store.set("volume", 5), Some(Value::from(3)));
        assert!(store.contains("volume"));
        assert_eq!(store.remove("volume"), Some(Value::from(5)));
        assert!(store.is_empty());
    }

    #[test]
    fn rejects_lines_without_separator() {
        let mut store = OptionStore::new();
        store.set("kept", 1);

        let err = store.load_str("a = 1\n\njust words\n").unwrap_err();
        match err {
            MultitypeError::InvalidLine { line, content } => {
                assert_eq!(line, 3);
                assert_eq!(content, "just words");
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(store.keys(), vec!["kept"]);
    }

    #[test]
    fn rejects_empty_keys() {
        let mut store = OptionStore::new();
        let err = store.load_str("= 5").unwrap_err();
        assert!(matches!(err, MultitypeError::InvalidLine { line: 1, .. }));
    }

    #[test]
    fn duplicate_keys_fail_unless_redefinition_is_allowed() {
        let text = "speed = 1\nspeed = 2\n";

        let mut strict = OptionStore::new();
        let err = strict.load_str(text).unwrap_err();
        assert!(matches!(
            err,
            MultitypeError::DuplicateKey { line: 2, ref key } if key == "speed"
        ));
        assert!(strict.is_empty());

        let mut relaxed = OptionStore::with_config(StoreConfig::permissive());
        assert_eq!(relaxed.load_str(text).unwrap(), 2);
        assert_eq!(relaxed.int_or("speed", 0), 2);
    }

    #[test]
    fn loading_overrides_options_already_in_the_store() {
        let mut store = OptionStore::new();
        store.set("width", 800);
        store.set("height", 600);

        assert_eq!(store.load_str("width = 1024\n").unwrap(), 1);
        assert_eq!(store.int_or("width", 0), 1024);
        assert_eq!(store.int_or("height", 0), 600);
    }

    #[test]
    fn honours_custom_separator_and_comment_prefix() {
        let config = StoreConfig {
            comment_prefix: "//".to_string(),
            separator: ':',
            allow_redefinition: false,
        };
        let mut store = OptionStore::with_config(config);
        store
            .load_str("// header\nurl: \"http://localhost:80\"\nretries: 3\n")
            .unwrap();

        assert_eq!(store.string_or("url", ""), "http://localhost:80");
        assert_eq!(store.int_or("retries", 0), 3);
        assert_eq!(
            store.to_text().unwrap(),
            "retries : 3\nurl : \"http://localhost:80\"\n"
        );
    }

    #[test]
    fn text_output_loads_back() {
        let mut store = OptionStore::new();
        store.set("name", "say \"hi\"");
        store.set("count", 4);
        store.set("weights", vec![0.5, 0.25]);
        store.set("tags", vec!["a", "b"]);
        store.set("nothing", Value::NULL);

        let text = store.to_text().unwrap();
        assert_eq!(
            text,
            concat!(
                "count = 4\n",
                "name = 'say \"hi\"'\n",
                "nothing = null\n",
                "tags = [\"a\", \"b\"]\n",
                "weights = [0.5, 0.25]\n",
            )
        );

        let mut reloaded = OptionStore::new();
        reloaded.load_str(&text).unwrap();
        for key in store.keys() {
            assert_eq!(reloaded.get(key), store.get(key), "option {key}");
        }
    }

    #[test]
    fn text_output_keeps_full_double_precision() {
        let mut store = OptionStore::new();
        store.set("precise", 0.1234567);
        store.set("tiny", 1e-9);
        store.set("whole", 3.0);
        store.set("negative_zero", -0.0);
        store.set("huge", 1e20);
        store.set("series", vec![0.1 + 0.2, 2.0]);

        let text = store.to_text().unwrap();
        assert!(text.contains("precise = 0.1234567\n"));
        assert!(text.contains("tiny = 0.000000001\n"));
        assert!(text.contains("whole = 3.0\n"));
        assert!(text.contains("huge = 100000000000000000000.0\n"));

        let mut reloaded = OptionStore::new();
        reloaded.load_str(&text).unwrap();
        for key in store.keys() {
            assert_eq!(reloaded.get(key), store.get(key), "option {key}");
        }
        assert_eq!(reloaded.double_or("precise", 0.0), 0.1234567);
        assert_eq!(reloaded.double_or("tiny", 0.0), 1e-9);
        assert!(reloaded.double_or("negative_zero", 1.0).is_sign_negative());
    }

    fn unwritable_reason(store: &OptionStore) -> &'static str {
        match store.to_text().unwrap_err() {
            MultitypeError::Unrepresentable { reason, .. } => reason,
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn text_output_rejects_values_it_cannot_express() {
        let mut store = OptionStore::new();
        store.set("note", "a\nb");
        assert_eq!(unwritable_reason(&store), "string contains a line break");

        let mut store = OptionStore::new();
        store.set("quotes", "it's \"both\"");
        assert_eq!(unwritable_reason(&store), "string contains both quote characters");

        let mut store = OptionStore::new();
        store.set("ratio", f64::INFINITY);
        assert_eq!(unwritable_reason(&store), "non-finite double");

        let mut store = OptionStore::new();
        store.set("samples", vec![1.0, f64::NAN]);
        assert_eq!(unwritable_reason(&store), "non-finite double");

        let mut store = OptionStore::new();
        store.set("nested", HashMap::from([("k", 1)]));
        assert_eq!(unwritable_reason(&store), "maps have no text literal");
    }

    #[test]
    fn text_output_rejects_keys_that_would_not_load_back() {
        let cases = [
            ("a=b", "key contains the separator"),
            ("# hidden", "key starts with the comment prefix"),
            (" padded", "key has surrounding whitespace"),
            ("two\nlines", "key contains a line break"),
            ("", "empty key"),
        ];
        for (key, expected) in cases {
            let mut store = OptionStore::new();
            store.set(key, 1);
            assert_eq!(unwritable_reason(&store), expected, "key {key:?}");
        }
    }

    #[test]
    fn json_bridge_keeps_tags() {
        let store = OptionStore::from_json(
            r#"{
                "count": 3,
                "ratio": 0.5,
                "on": true,
                "name": "x",
                "list": [1, "a"],
                "nested": { "k": null }
            }"#,
        )
        .unwrap();

        assert_eq!(store.get("count"), Some(&Value::Int(3)));
        assert_eq!(store.get("ratio"), Some(&Value::Double(0.5)));
        assert_eq!(store.get("on"), Some(&Value::Boolean(true)));
        assert_eq!(store.get("name"), Some(&Value::from("x")));
        assert_eq!(
            store.get("list"),
            Some(&Value::from(vec![Value::from(1), Value::from("a")]))
        );
        assert_eq!(
            store.get("nested").and_then(|nested| nested.get("k")),
            Some(&Value::NULL)
        );

        let json = store.to_json().unwrap();
        let again = OptionStore::from_json(&json).unwrap();
        for key in store.keys() {
            assert_eq!(again.get(key), store.get(key), "option {key}");
        }
    }

    #[test]
    fn json_errors_propagate() {
        let err = OptionStore::from_json("[1, 2]").unwrap_err();
        assert!(matches!(err, MultitypeError::Json(_)));
    }

    #[test]
    fn missing_files_report_io_errors() {
        let mut store = OptionStore::new();
        let err = store
            .load_file("/definitely/not/a/real/path/options.cfg")
            .unwrap_err();
        assert!(matches!(err, MultitypeError::Io(_)));
    }
}

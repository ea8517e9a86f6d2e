use serde::Deserialize;

/// One generatable dispatch entry: a Vulkan command and the field it loads into.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "EntryDef")]
pub struct Entry {
    name: String,
    alias: String,
    /// Guard predicates, `None` when the entry is unconditional (never `Some(vec![])`)
    requires: Option<Vec<String>>,
}

impl Entry {
    /// Create an unguarded entry whose field is named after the command
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            alias: name.clone(),
            name,
            requires: None,
        }
    }

    /// Name the generated field differently from the command
    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = alias.into();
        self
    }

    /// Gate the entry on guard predicates, ANDed in declared order
    pub fn with_requires<I, S>(mut self, predicates: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let predicates: Vec<String> = predicates.into_iter().map(Into::into).collect();
        self.requires = if predicates.is_empty() {
            None
        } else {
            Some(predicates)
        };
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn alias(&self) -> &str {
        &self.alias
    }

    pub fn requires(&self) -> Option<&[String]> {
        self.requires.as_deref()
    }

    /// Compound preprocessor condition for this entry, if it is guarded
    pub fn condition(&self) -> Option<String> {
        self.requires.as_ref().map(|predicates| {
            predicates
                .iter()
                .map(|p| wrap_predicate(p))
                .collect::<Vec<_>>()
                .join(" && ")
        })
    }
}

/// Wrap a bare token as `defined(TOKEN)`. Anything mentioning `defined` in any
/// spelling (`defined X`, `!defined (X)`) is already a full predicate and passes through.
pub fn wrap_predicate(predicate: &str) -> String {
    if predicate.contains("defined") {
        predicate.to_string()
    } else {
        format!("defined({})", predicate)
    }
}

/// Entry sequence element. Separators only group output with a blank line.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "Option<Entry>")]
pub enum Item {
    Entry(Entry),
    Separator,
}

impl Item {
    pub fn entry(&self) -> Option<&Entry> {
        match self {
            Item::Entry(entry) => Some(entry),
            Item::Separator => None,
        }
    }
}

impl From<Entry> for Item {
    fn from(entry: Entry) -> Self {
        Item::Entry(entry)
    }
}

impl From<Option<Entry>> for Item {
    fn from(entry: Option<Entry>) -> Self {
        entry.map_or(Item::Separator, Item::Entry)
    }
}

/// Wire shape of an entry in a tables file
#[derive(Deserialize)]
struct EntryDef {
    name: String,
    #[serde(default)]
    alias: Option<String>,
    #[serde(default)]
    requires: Option<Vec<String>>,
}

impl From<EntryDef> for Entry {
    fn from(def: EntryDef) -> Self {
        let mut entry = Entry::new(def.name);
        if let Some(alias) = def.alias {
            entry = entry.with_alias(alias);
        }
        entry.with_requires(def.requires.unwrap_or_default())
    }
}

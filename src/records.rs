use serde::Deserialize;

/// What a column of a registered record type may hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    /// Ordinary value, never a file path.
    Scalar,
    /// Path to a file under the media root.
    File,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FieldDef {
    pub name: String,
    pub kind: FieldKind,
}

impl FieldDef {
    pub fn scalar(name: &str) -> FieldDef {
        FieldDef {
            name: name.to_string(),
            kind: FieldKind::Scalar,
        }
    }

    pub fn file(name: &str) -> FieldDef {
        FieldDef {
            name: name.to_string(),
            kind: FieldKind::File,
        }
    }
}

/// A record type the collector knows how to read: a table name plus its
/// declared fields. There is no runtime reflection; a table whose files
/// should survive a clean must be registered here.
#[derive(Debug, Clone, Deserialize)]
pub struct RecordTypeDef {
    pub table: String,
    pub fields: Vec<FieldDef>,
}

impl RecordTypeDef {
    pub fn new(table: &str, fields: Vec<FieldDef>) -> RecordTypeDef {
        RecordTypeDef {
            table: table.to_string(),
            fields,
        }
    }

    /// Names of the file-reference fields, in declaration order.
    pub fn file_fields(&self) -> Vec<&str> {
        self.fields
            .iter()
            .filter(|field| field.kind == FieldKind::File)
            .map(|field| field.name.as_str())
            .collect()
    }
}

/// Ordered set of all registered record types.
#[derive(Debug, Clone, Default)]
pub struct RecordRegistry {
    types: Vec<RecordTypeDef>,
}

impl RecordRegistry {
    pub fn new() -> RecordRegistry {
        RecordRegistry::default()
    }

    /// Registry pre-populated with the cleaner's own run table, whose log
    /// and backup columns are file references like any other.
    pub fn with_own_tables() -> RecordRegistry {
        let mut registry = RecordRegistry::new();
        registry.register(RecordTypeDef::new(
            "clean_run",
            vec![
                FieldDef::scalar("id"),
                FieldDef::scalar("timestamp"),
                FieldDef::scalar("dry_run"),
                FieldDef::file("log_file"),
                FieldDef::file("backup_file"),
            ],
        ));
        registry
    }

    pub fn register(&mut self, def: RecordTypeDef) {
        self.types.push(def);
    }

    pub fn extend_from(&mut self, defs: &[RecordTypeDef]) {
        self.types.extend(defs.iter().cloned());
    }

    pub fn types(&self) -> &[RecordTypeDef] {
        &self.types
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_fields_empty_without_file_kind() {
        let def = RecordTypeDef::new(
            "account",
            vec![FieldDef::scalar("id"), FieldDef::scalar("name")],
        );
        assert!(def.file_fields().is_empty());
    }

    #[test]
    fn file_fields_in_declaration_order() {
        let def = RecordTypeDef::new(
            "document",
            vec![
                FieldDef::scalar("id"),
                FieldDef::file("file"),
                FieldDef::scalar("title"),
                FieldDef::file("image"),
            ],
        );
        assert_eq!(vec!["file", "image"], def.file_fields());
    }

    #[test]
    fn registry_knows_its_own_run_table() {
        let registry = RecordRegistry::with_own_tables();
        let def = registry
            .types()
            .iter()
            .find(|def| def.table == "clean_run")
            .expect("clean_run not registered");
        assert_eq!(vec!["log_file", "backup_file"], def.file_fields());
    }
}

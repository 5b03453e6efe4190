//! Configuration structs. Every field has a default, so partial TOML or
//! JSON documents deserialize.

use docmap_bson::TextMode;
use serde::{Deserialize, Serialize};

use crate::naming::{to_camel_case, to_title_case};

/// Options for [`UpdateTranslator`](crate::update::UpdateTranslator).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TranslatorOptions {
    /// Include rendered documents in log events. When `false` (default)
    /// payloads are logged as `?`.
    pub log_sensitive_data: bool,
    /// Text mode used to render logged documents.
    pub log_text_mode: TextMode,
}

/// How element names are derived from property names that do not set one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementNaming {
    #[default]
    AsIs,
    CamelCase,
    TitleCase,
}

impl ElementNaming {
    pub fn apply(self, name: &str) -> String {
        match self {
            ElementNaming::AsIs => name.to_owned(),
            ElementNaming::CamelCase => to_camel_case(name),
            ElementNaming::TitleCase => to_title_case(name),
        }
    }
}

/// Options for [`EntityTypeBuilder`](crate::metadata::EntityTypeBuilder).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelOptions {
    pub element_naming: ElementNaming,
    /// Look for `_id`, `Id` or `<Type>Id` when no key is declared.
    pub discover_primary_key: bool,
}

impl Default for ModelOptions {
    fn default() -> Self {
        Self {
            element_naming: ElementNaming::AsIs,
            discover_primary_key: true,
        }
    }
}

/// All options, as loaded from one configuration file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapperOptions {
    pub model: ModelOptions,
    pub translator: TranslatorOptions,
}

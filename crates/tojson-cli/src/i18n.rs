// crates/tojson-cli/src/i18n.rs
// ============================================================================
// Module: Tojson CLI Messages
// Description: English and Catalan message catalogs with placeholder filling.
// Purpose: Keep every user-facing CLI string behind a stable key.
// Dependencies: std
// ============================================================================

//! ## Overview
//! Messages printed by the `tojson` binary, including `::error::` text, are
//! looked up by key through [`t!`](crate::t). A key missing from the active
//! catalog falls back to English, then to the key itself. The locale is
//! chosen once per process from `--lang` or `TOJSON_LANG`.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::HashMap;
use std::sync::OnceLock;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Output language.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Locale {
    /// English (default).
    En,
    /// Catalan.
    Ca,
}

impl Locale {
    /// Returns the language tag.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Ca => "ca",
        }
    }

    /// Parses `en`, `ca`, or a region-tagged form such as `ca-ES` or `en_US`.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        let language = value.trim().split(['-', '_']).next()?;
        [Self::En, Self::Ca].into_iter().find(|locale| language.eq_ignore_ascii_case(locale.as_str()))
    }
}

/// One `{key}` substitution for [`translate`].
#[derive(Clone)]
pub struct MessageArg {
    /// Placeholder name without braces.
    pub key: &'static str,
    /// Replacement text.
    pub value: String,
}

impl MessageArg {
    /// Pairs a placeholder with its replacement.
    pub fn new(key: &'static str, value: impl Into<String>) -> Self {
        Self {
            key,
            value: value.into(),
        }
    }
}

// ============================================================================
// SECTION: Locale Selection
// ============================================================================

/// Process-wide output language.
static ACTIVE_LOCALE: OnceLock<Locale> = OnceLock::new();

/// Selects the output language; later calls are ignored.
pub fn set_locale(locale: Locale) {
    let _ = ACTIVE_LOCALE.set(locale);
}

/// Returns the selected output language, English when none was set.
#[must_use]
pub fn current_locale() -> Locale {
    ACTIVE_LOCALE.get().copied().unwrap_or(Locale::En)
}

// ============================================================================
// SECTION: Catalog
// ============================================================================

/// English catalog entries.
const CATALOG_EN: &[(&str, &str)] = &[
    ("main.version", "tojson {version}"),
    ("output.stream.stdout", "stdout"),
    ("output.stream.stderr", "stderr"),
    ("output.stream.unknown", "output"),
    ("output.write_failed", "Failed to write to {stream}: {error}"),
    ("input.read_failed", "Failed to read {path}: {error}"),
    (
        "input.read_too_large",
        "Refusing to read {path} because it exceeds the {limit} byte input limit.",
    ),
    ("config.load_failed", "Failed to load config: {error}"),
    ("config.validate.ok", "Config validated successfully."),
    ("context.invalid", "Invalid GitHub context: {error}"),
    ("run.wiring_failed", "Failed to initialize action: {error}"),
    ("run.failed", "{error}"),
    ("run.task_failed", "Action task failed: {error}"),
    ("convert.failed", "Conversion failed: {error}"),
    ("i18n.lang.invalid_env", "Invalid value for {env}: {value}. Expected 'en' or 'ca'."),
    (
        "i18n.disclaimer.machine_translated",
        "Note: non-English output is machine-translated and may be inaccurate.",
    ),
];

/// Catalan catalog entries.
const CATALOG_CA: &[(&str, &str)] = &[
    ("main.version", "tojson {version}"),
    ("output.stream.stdout", "sortida estàndard"),
    ("output.stream.stderr", "sortida d'errors"),
    ("output.stream.unknown", "sortida"),
    ("output.write_failed", "No s'ha pogut escriure a {stream}: {error}"),
    ("input.read_failed", "No s'ha pogut llegir {path}: {error}"),
    (
        "input.read_too_large",
        "Es refusa llegir {path} perquè supera el límit d'entrada de {limit} bytes.",
    ),
    ("config.load_failed", "No s'ha pogut carregar la configuració: {error}"),
    ("config.validate.ok", "La configuració s'ha validat correctament."),
    ("context.invalid", "Context de GitHub no vàlid: {error}"),
    ("run.wiring_failed", "No s'ha pogut inicialitzar l'acció: {error}"),
    ("run.failed", "{error}"),
    ("run.task_failed", "La tasca de l'acció ha fallat: {error}"),
    ("convert.failed", "La conversió ha fallat: {error}"),
    ("i18n.lang.invalid_env", "Valor no vàlid per a {env}: {value}. S'esperava 'en' o 'ca'."),
    (
        "i18n.disclaimer.machine_translated",
        "Nota: la sortida que no és en anglès està traduïda automàticament i pot ser inexacta.",
    ),
];

/// Key to template lookup table.
type Catalog = HashMap<&'static str, &'static str>;

/// Returns the lookup table for `locale`, built on first use.
fn catalog_for(locale: Locale) -> &'static Catalog {
    static ENGLISH: OnceLock<Catalog> = OnceLock::new();
    static CATALAN: OnceLock<Catalog> = OnceLock::new();
    let (cell, entries) = match locale {
        Locale::En => (&ENGLISH, CATALOG_EN),
        Locale::Ca => (&CATALAN, CATALOG_CA),
    };
    cell.get_or_init(|| entries.iter().copied().collect())
}

// ============================================================================
// SECTION: Translation
// ============================================================================

/// Renders `key` in the selected language.
#[must_use]
pub fn translate(key: &str, args: Vec<MessageArg>) -> String {
    translate_for(current_locale(), key, args)
}

/// Renders `key` in `locale`, filling `{placeholder}` slots from `args`.
#[must_use]
pub fn translate_for(locale: Locale, key: &str, args: Vec<MessageArg>) -> String {
    let template = [locale, Locale::En]
        .into_iter()
        .find_map(|candidate| catalog_for(candidate).get(key).copied())
        .unwrap_or(key);
    args.into_iter().fold(template.to_string(), |message, arg| {
        message.replace(&format!("{{{}}}", arg.key), &arg.value)
    })
}

// ============================================================================
// SECTION: Macro
// ============================================================================

/// Renders a catalog message: `t!("run.failed", error = err)`.
#[macro_export]
macro_rules! t {
    ($key:literal $(, $name:ident = $value:expr )* $(,)?) => {{
        let args = ::std::vec![
            $(
                $crate::i18n::MessageArg::new(stringify!($name), $value.to_string()),
            )*
        ];
        $crate::i18n::translate($key, args)
    }};
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::CATALOG_CA;
    use super::CATALOG_EN;

    #[test]
    fn catalogs_define_the_same_keys() {
        let mut en: Vec<&str> = CATALOG_EN.iter().map(|(key, _)| *key).collect();
        let mut ca: Vec<&str> = CATALOG_CA.iter().map(|(key, _)| *key).collect();
        en.sort_unstable();
        ca.sort_unstable();
        assert_eq!(en, ca);
    }
}

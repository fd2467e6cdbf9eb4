//! Per-locale values of a single model property, e.g. a product name that
//! exists in English and Hungarian.

use serde::{Deserialize, Serialize};

/// Locale preferred by [`TranslatableProperty::default_value`].
pub const DEFAULT_TRANSLATION_LOCALE: &str = "en";

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
pub struct PropertyTranslation {
    pub locale: String,
    #[serde(default)]
    pub value: String,
}

impl PropertyTranslation {
    pub fn new(locale: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            locale: locale.into(),
            value: value.into(),
        }
    }
}

/// Shape a translatable field can arrive in: a translation list, or a plain
/// string meaning the default locale.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum TranslationsResponse {
    List(Vec<PropertyTranslation>),
    Single(String),
}

/// Translations in insertion order. Serializes as the translation list.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(transparent)]
pub struct TranslatableProperty {
    translations: Vec<PropertyTranslation>,
}

impl TranslatableProperty {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, locale: &str) -> Option<&str> {
        self.translations
            .iter()
            .find(|t| t.locale == locale)
            .map(|t| t.value.as_str())
    }

    /// Replaces the value for `locale`, or appends a new translation.
    pub fn set(&mut self, locale: &str, value: impl Into<String>) {
        let value = value.into();
        match self.translations.iter_mut().find(|t| t.locale == locale) {
            Some(existing) => existing.value = value,
            None => self.translations.push(PropertyTranslation::new(locale, value)),
        }
    }

    pub fn get_all(&self) -> &[PropertyTranslation] {
        &self.translations
    }

    /// The English value, else the first one.
    pub fn default_value(&self) -> Option<&str> {
        self.get(DEFAULT_TRANSLATION_LOCALE)
            .or_else(|| self.translations.first().map(|t| t.value.as_str()))
    }

    /// Replaces all translations. A single string is taken as English; an
    /// empty string leaves the property untouched.
    pub fn load_translations(&mut self, response: TranslationsResponse) {
        match response {
            TranslationsResponse::List(list) => self.translations = list,
            TranslationsResponse::Single(value) if !value.is_empty() => {
                self.translations = vec![PropertyTranslation::new(DEFAULT_TRANSLATION_LOCALE, value)];
            }
            TranslationsResponse::Single(_) => {}
        }
    }

    /// Translations with a value, ready to send.
    pub fn to_request(&self) -> Vec<PropertyTranslation> {
        self.translations
            .iter()
            .filter(|t| !t.value.is_empty())
            .cloned()
            .collect()
    }

    /// Form fields `{namespace}[i][locale]` and `{namespace}[i][value]`.
    pub fn fill_form_data(&self, namespace: &str) -> Vec<(String, String)> {
        self.translations
            .iter()
            .enumerate()
            .flat_map(|(i, t)| {
                [
                    (format!("{}[{}][locale]", namespace, i), t.locale.clone()),
                    (format!("{}[{}][value]", namespace, i), t.value.clone()),
                ]
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name() -> TranslatableProperty {
        let mut p = TranslatableProperty::new();
        p.set("hu", "Alma");
        p.set("en", "Apple");
        p
    }

    #[test]
    fn test_set_replaces_existing_locale() {
        let mut p = name();
        p.set("hu", "Körte");
        assert_eq!(p.get("hu"), Some("Körte"));
        assert_eq!(p.get_all().len(), 2);
        assert_eq!(p.get("de"), None);
    }

    #[test]
    fn test_default_prefers_english_then_first() {
        assert_eq!(name().default_value(), Some("Apple"));

        let mut p = TranslatableProperty::new();
        p.set("de", "Apfel");
        p.set("hu", "Alma");
        assert_eq!(p.default_value(), Some("Apfel"));
        assert_eq!(TranslatableProperty::new().default_value(), None);
    }

    #[test]
    fn test_load_translations_accepts_list_or_string() {
        let list: TranslationsResponse =
            serde_json::from_str(r#"[{"locale":"hu","value":"Alma"}]"#).unwrap();
        let mut p = TranslatableProperty::new();
        p.load_translations(list);
        assert_eq!(p.get("hu"), Some("Alma"));

        let single: TranslationsResponse = serde_json::from_str(r#""Apple""#).unwrap();
        p.load_translations(single);
        assert_eq!(p.get_all(), &[PropertyTranslation::new("en", "Apple")]);
    }

    #[test]
    fn test_request_and_form_data() {
        let mut p = name();
        p.set("de", "");

        let request = p.to_request();
        assert_eq!(request.len(), 2);

        let form = p.fill_form_data("name");
        assert_eq!(form.len(), 6);
        assert_eq!(form[0], ("name[0][locale]".to_string(), "hu".to_string()));
        assert_eq!(form[5], ("name[2][value]".to_string(), String::new()));
    }
}

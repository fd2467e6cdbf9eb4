//! Small string helpers: slugs, truncation and file names.

use crate::translatable::TranslatableProperty;

const ACCENTED: &str = "ãàáäâẽèéëêìíïîõòóöôùúüûñç·/_,:;";
const FOLDED: &str = "aaaaaeeeeeiiiiooooouuuunc------";

/// Default character limit of [`truncate`].
pub const DEFAULT_TRUNCATE_LIMIT: usize = 100;

/// URL slug of `input`. Returns `None` for empty input.
///
/// Accents are folded, separators and whitespace become `-`, `&` becomes
/// `-y-`, anything else outside `[a-z0-9_-]` is dropped and dash runs are
/// collapsed.
pub fn slugify(input: &str) -> Option<String> {
    if input.is_empty() {
        return None;
    }

    let folded: String = input
        .to_lowercase()
        .chars()
        .map(|c| match ACCENTED.chars().position(|a| a == c) {
            Some(i) => FOLDED.chars().nth(i).unwrap_or(c),
            None => c,
        })
        .collect();

    let mut dashed = String::with_capacity(folded.len());
    let mut in_space = false;
    for c in folded.trim().chars() {
        if c.is_whitespace() {
            if !in_space {
                dashed.push('-');
            }
            in_space = true;
            continue;
        }
        in_space = false;
        if c == '&' {
            dashed.push_str("-y-");
        } else if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
            dashed.push(c);
        }
    }

    let mut slug = String::with_capacity(dashed.len());
    for c in dashed.chars() {
        if c == '-' && slug.ends_with('-') {
            continue;
        }
        slug.push(c);
    }
    Some(slug)
}

/// Slug of the property's value in `locale`.
pub fn slugify_translatable(property: &TranslatableProperty, locale: &str) -> Option<String> {
    property.get(locale).and_then(slugify)
}

/// First `limit` characters of `value`, with `...` appended when cut.
pub fn truncate(value: &str, limit: usize) -> String {
    match value.char_indices().nth(limit) {
        Some((end, _)) => format!("{}...", &value[..end]),
        None => value.to_string(),
    }
}

/// Last component of a POSIX or Windows path.
pub fn filename(path: &str) -> &str {
    path.rsplit(['/', '\\']).next().unwrap_or(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Crème Brûlée & Café").as_deref(), Some("creme-brulee-y-cafe"));
        assert_eq!(slugify("  Hello,   World: 2024  ").as_deref(), Some("hello-world-2024"));
        assert_eq!(slugify("snake_case/path").as_deref(), Some("snake-case-path"));
        assert_eq!(slugify(""), None);
    }

    #[test]
    fn test_slugify_translatable_uses_locale() {
        let mut name = TranslatableProperty::new();
        name.set("hu", "Új termék");
        name.set("en", "New product");
        assert_eq!(slugify_translatable(&name, "en").as_deref(), Some("new-product"));
        assert_eq!(slugify_translatable(&name, "de"), None);
    }

    #[test]
    fn test_truncate() {
        let short = "A".repeat(99);
        assert_eq!(truncate(&short, DEFAULT_TRUNCATE_LIMIT), short);

        let long = "A".repeat(101);
        let cut = truncate(&long, DEFAULT_TRUNCATE_LIMIT);
        assert!(cut.ends_with("..."));
        assert_eq!(cut.len(), 103);

        assert_eq!(truncate("árvíztűrő", 3), "árv...");
    }

    #[test]
    fn test_filename() {
        assert_eq!(filename("file.pdf"), "file.pdf");
        assert_eq!(filename("C:\\Folder\\file.pdf"), "file.pdf");
        assert_eq!(filename("/home/Folder/file.pdf"), "file.pdf");
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Derive a URL slug from a category name.
///
/// Lowercases, turns each run of whitespace into one hyphen, then drops every
/// character outside `[A-Za-z0-9_-]`. Accented letters are dropped rather
/// than transliterated.
pub fn slugify(name: &str) -> String {
    let lowered = name.to_lowercase();

    let mut hyphenated = String::with_capacity(lowered.len());
    let mut in_space = false;
    for ch in lowered.chars() {
        if ch.is_whitespace() {
            if !in_space {
                hyphenated.push('-');
            }
            in_space = true;
        } else {
            hyphenated.push(ch);
            in_space = false;
        }
    }

    hyphenated
        .chars()
        .filter(|ch| ch.is_ascii_alphanumeric() || *ch == '_' || *ch == '-')
        .collect()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Category {
    /// Build a category. A non-blank `slug` overrides the derived one.
    pub fn new(name: impl Into<String>, slug: Option<String>, description: Option<String>) -> Result<Self, CategoryError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(CategoryError::Invalid("name is required".to_string()));
        }

        let slug = match slug {
            Some(s) if !s.trim().is_empty() => s.trim().to_string(),
            _ => slugify(&name),
        };
        if slug.is_empty() {
            return Err(CategoryError::Invalid(format!("cannot derive a slug from {:?}", name)));
        }

        Ok(Self {
            id: Uuid::new_v4(),
            name,
            slug,
            description,
            created_at: Utc::now(),
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CategoryError {
    #[error("Invalid category: {0}")]
    Invalid(String),

    #[error("Slug already in use: {0}")]
    DuplicateSlug(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify_spaces_and_case() {
        assert_eq!(slugify("Comunicação Visual"), "comunicao-visual");
        assert_eq!(slugify("Banner   Lona 440g"), "banner-lona-440g");
        assert_eq!(slugify("Placas\tPVC"), "placas-pvc");
    }

    #[test]
    fn test_slugify_strips_accents_and_symbols() {
        assert_eq!(slugify("Impressão Digital"), "impresso-digital");
        assert_eq!(slugify("Cartões & Papelaria!"), "cartes--papelaria");
        assert_eq!(slugify("already-a_slug"), "already-a_slug");
    }

    #[test]
    fn test_category_slug_override() {
        let derived = Category::new("Impressão Gráfica", None, None).unwrap();
        assert_eq!(derived.slug, "impresso-grfica");

        let manual = Category::new("Impressão Gráfica", Some("impressao-grafica".to_string()), None).unwrap();
        assert_eq!(manual.slug, "impressao-grafica");

        let blank = Category::new("Adesivos", Some("   ".to_string()), None).unwrap();
        assert_eq!(blank.slug, "adesivos");
    }

    #[test]
    fn test_category_requires_name() {
        assert!(Category::new(" ", None, None).is_err());
        assert!(Category::new("ããã", None, None).is_err());
    }
}

//! Style resolution
//!
//! The three Pages default paragraph styles and the fixed mapping from
//! block [`Role`] to style. The table is an immutable value: build it once
//! with [`StyleTable::pages_default`] and pass it to the builder.

use pagesdoc_ast::{check_level, Role};

use crate::error::Result;

/// Font weight of a style
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontWeight {
    /// Regular weight
    Regular,
    /// Bold weight
    Bold,
}

/// Rendering attributes of a paragraph style
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StyleDefinition {
    /// Pages default style name
    pub name: &'static str,
    /// PostScript font name
    pub font_family: &'static str,
    /// Point size
    pub font_size: u32,
    /// Weight
    pub weight: FontWeight,
}

/// Title: Helvetica-Bold 24pt
pub const TITLE_STYLE: StyleDefinition = StyleDefinition {
    name: "Title",
    font_family: "Helvetica-Bold",
    font_size: 24,
    weight: FontWeight::Bold,
};

/// Heading: Helvetica-Bold 18pt
pub const HEADING_STYLE: StyleDefinition = StyleDefinition {
    name: "Heading",
    font_family: "Helvetica-Bold",
    font_size: 18,
    weight: FontWeight::Bold,
};

/// Body: Helvetica 12pt
pub const BODY_STYLE: StyleDefinition = StyleDefinition {
    name: "Body",
    font_family: "Helvetica",
    font_size: 12,
    weight: FontWeight::Regular,
};

/// Catalog order of styles; also fixes each role's style ID
const CATALOG_ORDER: [Role; 3] = [Role::Body, Role::Heading, Role::Title];

/// Catalog identifier of a role's style (`paragraph-style-N`)
pub fn style_id(role: Role) -> &'static str {
    match role {
        Role::Body => "paragraph-style-0",
        Role::Heading => "paragraph-style-1",
        Role::Title => "paragraph-style-2",
    }
}

/// Immutable role to style mapping
#[derive(Debug, Clone)]
pub struct StyleTable {
    title: StyleDefinition,
    heading: StyleDefinition,
    body: StyleDefinition,
}

impl Default for StyleTable {
    fn default() -> Self {
        Self::pages_default()
    }
}

impl StyleTable {
    /// The Pages default styles
    pub fn pages_default() -> Self {
        Self {
            title: TITLE_STYLE,
            heading: HEADING_STYLE,
            body: BODY_STYLE,
        }
    }

    /// Style for a role
    pub fn get(&self, role: Role) -> &StyleDefinition {
        match role {
            Role::Title => &self.title,
            Role::Heading => &self.heading,
            Role::Body => &self.body,
        }
    }

    /// Resolve a role and optional level to its style
    ///
    /// Heading levels 2 and 3 share one style. A level the role does not
    /// accept fails with `InvalidRole`.
    pub fn resolve(&self, role: Role, level: Option<u8>) -> Result<&StyleDefinition> {
        check_level(role, level)?;
        Ok(self.get(role))
    }

    /// Roles in catalog order, restricted to those in `used`
    pub fn catalog_roles(used: &[Role]) -> impl Iterator<Item = Role> + '_ {
        CATALOG_ORDER.into_iter().filter(move |r| used.contains(r))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BundleError;

    #[test]
    fn test_fixed_table() {
        let table = StyleTable::pages_default();

        let title = table.resolve(Role::Title, None).unwrap();
        assert_eq!(title.name, "Title");
        assert_eq!(title.font_family, "Helvetica-Bold");
        assert_eq!(title.font_size, 24);
        assert_eq!(title.weight, FontWeight::Bold);

        let heading = table.resolve(Role::Heading, Some(2)).unwrap();
        assert_eq!(heading.name, "Heading");
        assert_eq!(heading.font_size, 18);

        let body = table.resolve(Role::Body, None).unwrap();
        assert_eq!(body.name, "Body");
        assert_eq!(body.font_family, "Helvetica");
        assert_eq!(body.font_size, 12);
        assert_eq!(body.weight, FontWeight::Regular);
    }

    #[test]
    fn test_heading_levels_share_style() {
        let table = StyleTable::pages_default();
        assert_eq!(
            table.resolve(Role::Heading, Some(2)).unwrap(),
            table.resolve(Role::Heading, Some(3)).unwrap()
        );
    }

    #[test]
    fn test_invalid_level_is_invalid_role() {
        let table = StyleTable::pages_default();
        for (role, level) in [
            (Role::Heading, Some(4)),
            (Role::Title, Some(2)),
            (Role::Body, Some(1)),
        ] {
            let err = table.resolve(role, level).unwrap_err();
            assert!(matches!(err, BundleError::InvalidRole(_)));
        }
    }

    #[test]
    fn test_style_ids_are_distinct() {
        let mut ids: Vec<_> = Role::ALL.iter().map(|&r| style_id(r)).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 3);
    }

    #[test]
    fn test_catalog_roles_order() {
        let used = [Role::Title, Role::Body];
        let roles: Vec<_> = StyleTable::catalog_roles(&used).collect();
        assert_eq!(roles, vec![Role::Body, Role::Title]);
        assert_eq!(StyleTable::catalog_roles(&[]).count(), 0);
    }

    #[test]
    fn test_table_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<StyleTable>();
    }
}

#![forbid(unsafe_code)]

//! Product sub-navigation: link table, slugs and click scroll targets.

use scrollnav_core::Document;

/// Height of the fixed navigation bar, subtracted from click targets.
pub const NAV_HEIGHT_PX: f64 = 96.0;

/// One entry of the product sub-navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProductLink {
    /// Display name, also the label the dispatcher publishes.
    pub name: &'static str,
    /// Element id stem: the section is `"{slug}-section"`.
    pub slug: &'static str,
}

impl ProductLink {
    /// Element id of this product's section.
    pub fn section_id(&self) -> String {
        section_element_id(self.slug)
    }

    /// `href` of the link.
    pub fn href(&self) -> String {
        format!("#{}", self.section_id())
    }
}

/// Products in display order.
pub const PRODUCTS: &[ProductLink] = &[
    ProductLink {
        name: "Genetic Screening",
        slug: "genetic-screening",
    },
    ProductLink {
        name: "AI Diagnostics",
        slug: "diagnostic-ai",
    },
];

/// Slug for a product name.
///
/// Known products use the table; anything else is lower-cased with its
/// first space replaced by `-`.
pub fn product_slug(product: &str) -> String {
    PRODUCTS
        .iter()
        .find(|p| p.name == product)
        .map(|p| p.slug.to_owned())
        .unwrap_or_else(|| product.to_lowercase().replacen(' ', "-", 1))
}

/// Element id for a slug.
pub fn section_element_id(slug: &str) -> String {
    format!("{slug}-section")
}

/// Document offset to scroll to when a product link is clicked: the
/// section's top minus the fixed nav height, never above the page top.
///
/// `None` when the section is not on the page.
pub fn scroll_target_for(document: &dyn Document, product: &str, nav_height: f64) -> Option<f64> {
    let id = section_element_id(&product_slug(product));
    let node = document.element_by_id(&id)?;
    let top = document.document_top(node)?;
    Some((top - nav_height).max(0.0))
}

/// Whether a product link is highlighted for the dispatcher's label.
#[inline]
pub fn is_product_active(product: &str, current_label: &str) -> bool {
    !current_label.is_empty() && product == current_label
}

#[cfg(test)]
mod tests {
    use super::*;
    use scrollnav_core::{ClientRect, NodeId};

    struct OnePage;

    impl Document for OnePage {
        fn element_by_id(&self, id: &str) -> Option<NodeId> {
            match id {
                "genetic-screening-section" => Some(NodeId(1)),
                "diagnostic-ai-section" => Some(NodeId(2)),
                _ => None,
            }
        }

        fn element_ids(&self) -> Vec<String> {
            vec![
                "genetic-screening-section".into(),
                "diagnostic-ai-section".into(),
            ]
        }

        fn bounding_client_rect(&self, _node: NodeId) -> Option<ClientRect> {
            None
        }

        fn document_top(&self, node: NodeId) -> Option<f64> {
            match node.get() {
                1 => Some(900.0),
                2 => Some(40.0),
                _ => None,
            }
        }
    }

    #[test]
    fn slugs_follow_table_then_fallback() {
        assert_eq!(product_slug("AI Diagnostics"), "diagnostic-ai");
        assert_eq!(product_slug("Genetic Screening"), "genetic-screening");
        assert_eq!(product_slug("Cloud Lab Suite"), "cloud-lab suite");
        assert_eq!(PRODUCTS[1].href(), "#diagnostic-ai-section");
    }

    #[test]
    fn scroll_target_subtracts_nav_height() {
        assert_eq!(
            scroll_target_for(&OnePage, "Genetic Screening", NAV_HEIGHT_PX),
            Some(804.0)
        );
    }

    #[test]
    fn scroll_target_floors_at_page_top() {
        assert_eq!(
            scroll_target_for(&OnePage, "AI Diagnostics", NAV_HEIGHT_PX),
            Some(0.0)
        );
    }

    #[test]
    fn missing_section_has_no_target() {
        assert_eq!(scroll_target_for(&OnePage, "Imaging", NAV_HEIGHT_PX), None);
    }

    #[test]
    fn active_requires_exact_label() {
        assert!(is_product_active("AI Diagnostics", "AI Diagnostics"));
        assert!(!is_product_active("AI Diagnostics", "Diagnostic"));
        assert!(!is_product_active("", ""));
    }
}

#![forbid(unsafe_code)]

//! Primary navigation entries and their highlight rule.

use scrollnav_core::SectionId;

/// A primary navigation link.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavItem {
    pub text: &'static str,
    pub href: &'static str,
}

/// Links shown in the desktop and mobile menus, in display order.
pub const NAV_ITEMS: &[NavItem] = &[
    NavItem {
        text: "Home",
        href: "#home",
    },
    NavItem {
        text: "Platform",
        href: "#platform",
    },
    NavItem {
        text: "About",
        href: "#mission",
    },
];

/// Anchor owned by the contact button rather than a menu link.
pub const CONTACT_ANCHOR: &str = "#contact";

/// Section ids the home page tracks, in document order.
pub const HOME_SECTION_IDS: &[&str] = &["home", "platform", "mission", "contact"];

/// Whether a menu link is highlighted for the tracker's active anchor.
///
/// `href` may be given with or without `#`. The contact section never
/// highlights a menu link.
pub fn is_nav_item_active(href: &str, active_anchor: &str) -> bool {
    if active_anchor.is_empty() || active_anchor == CONTACT_ANCHOR {
        return false;
    }
    SectionId::new(href).anchor() == active_anchor
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matching_anchor_highlights() {
        assert!(is_nav_item_active("#platform", "#platform"));
        assert!(is_nav_item_active("platform", "#platform"));
        assert!(!is_nav_item_active("#home", "#platform"));
    }

    #[test]
    fn contact_and_empty_never_highlight() {
        assert!(!is_nav_item_active("#contact", CONTACT_ANCHOR));
        assert!(NAV_ITEMS.iter().all(|i| !is_nav_item_active(i.href, "")));
    }

    #[test]
    fn about_links_to_mission() {
        let about = NAV_ITEMS.iter().find(|i| i.text == "About");
        assert_eq!(about.map(|i| i.href), Some("#mission"));
    }
}

#![forbid(unsafe_code)]

//! The facade prelude is enough to wire a tracker to a page.

use pretty_assertions::assert_eq;
use scrollnav::TrackerConfig;
use scrollnav::prelude::*;

#[test]
fn prelude_drives_a_home_page_session() -> Result<()> {
    let ids = ["home", "platform", "mission", "contact"];
    let page = SimulatedPage::stacked(&ids, 800.0, 1280.0, 800.0)?;
    let observer = page.observer();
    let mut tracker = SectionActivationTracker::new(observer.clone(), TrackerConfig::default());
    assert_eq!(tracker.register(Some(&page), ids), 4);

    tracker.on_batch(&page.take_records(&observer));
    assert_eq!(tracker.active_anchor(), "#home");

    page.scroll_to(700.0);
    tracker.on_batch(&page.take_records(&observer));
    assert_eq!(tracker.active_anchor(), "#platform");

    tracker.teardown();
    assert!(page.observed(&observer).is_empty());
    Ok(())
}

#[test]
fn policy_errors_convert_into_facade_error() {
    let mut policy = NavPolicyConfig::default();
    policy.style.scroll_end = -1.0;
    let err: Error = match policy.to_style_interpolator() {
        Ok(_) => panic!("inverted range accepted"),
        Err(e) => e.into(),
    };
    assert!(err.to_string().contains("style:"));
    assert!(std::error::Error::source(&err).is_some());
}

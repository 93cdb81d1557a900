use crate::conf::{GroupConfig, Rgb, Viewport};
use crate::summary::{SummaryGroups, display_path};
use pretty_assertions::assert_eq;

fn titles(groups: &SummaryGroups) -> Vec<String> {
    groups.iter().map(|g| g.title().to_string()).collect()
}

#[test]
fn default_groups_with_catch_all() {
    let groups = SummaryGroups::new(&[], Viewport::default(), 16.0, 5.0);

    assert_eq!(titles(&groups), vec!["CSS", "Script", "Images", "Misc"]);
}

#[test]
fn paths_route_to_first_matching_group() {
    let groups = SummaryGroups::new(&[], Viewport::default(), 16.0, 5.0);

    assert_eq!(groups.route("/site/style.css"), Some(0));
    assert_eq!(groups.route("/bundle.js?v=2"), Some(1));
    assert_eq!(groups.route("/images/banner"), Some(2));
    assert_eq!(groups.route("/photo.JPG"), Some(3));
    assert_eq!(groups.route("/index.html"), Some(3));
}

#[test]
fn bands_are_stacked_without_overlap() {
    let groups = SummaryGroups::new(&[], Viewport::default(), 16.0, 5.0);

    let bands: Vec<_> = groups.iter().map(|g| g.band()).collect();
    for pair in bands.windows(2) {
        assert_eq!(pair[0].bottom, pair[1].top);
    }

    // 728px of usable height: 15% -> 109px
    assert_eq!(bands[0].top, 2.0);
    assert_eq!(bands[0].bottom, 111.0);
}

#[test]
fn group_exceeding_remaining_space_is_rejected() {
    let configs = vec![
        GroupConfig::new("API", "^/api/", 80),
        GroupConfig::new("Docs", "^/docs/", 30),
    ];

    let groups = SummaryGroups::new(&configs, Viewport::default(), 16.0, 5.0);

    assert_eq!(titles(&groups), vec!["API", "Misc"]);
}

#[test]
fn zero_percent_claims_the_rest() {
    let configs = vec![GroupConfig::new("Everything", ".*", 0)];

    let groups = SummaryGroups::new(&configs, Viewport::default(), 16.0, 5.0);

    // nothing left for a catch-all
    assert_eq!(titles(&groups), vec!["Everything"]);
}

#[test]
fn catch_all_is_untitled_when_no_group_fits() {
    let configs = vec![GroupConfig::new("Huge", ".*", 150)];

    let groups = SummaryGroups::new(&configs, Viewport::default(), 16.0, 5.0);

    assert_eq!(titles(&groups), vec![""]);
}

#[test]
fn group_colour_is_kept() {
    let mut api = GroupConfig::new("API", "^/api/", 50);
    api.colour = Some(Rgb::new(1, 2, 3));

    let groups = SummaryGroups::new(&[api], Viewport::default(), 16.0, 5.0);

    assert_eq!(groups.get(0).and_then(|g| g.colour()), Some(Rgb::new(1, 2, 3)));
    assert!(!groups.get(1).unwrap().is_coloured());
}

#[test]
fn relayout_scales_bands_to_new_viewport() {
    let mut groups = SummaryGroups::new(&[], Viewport::default(), 16.0, 5.0);
    let before = groups.get(0).unwrap().capacity();

    groups.relayout(Viewport {
        width: 1024,
        height: 1540,
    });

    assert!(groups.get(0).unwrap().capacity() > before);
}

#[test]
fn absolute_urls_lose_their_host() {
    assert_eq!(display_path("http://example.com/a/b"), "/a/b");
    assert_eq!(display_path("https://example.com/x?y"), "/x?y");
    assert_eq!(display_path("/plain"), "/plain");
}

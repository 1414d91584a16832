use crate::filter::{FilterState, SelectControl};
use crate::loader::Directory;
use crate::view::{UiEvent, ViewModel};

fn sample() -> Directory {
    let long = "o".repeat(201);
    let raw = serde_json::json!([
        {"Name": "Climate Action Now", "Abbreviation": "CAN", "Operational Domain": "Policy",
         "Region": ["Europe", "Global"], "Focus": ["Climate", "Energy"], "Country": "Belgium"},
        {"Name": "Ocean Watch", "Scope": "Research", "Region": "Global",
         "Focus": ["Oceans"], "Overview": long},
        {"Name": "acting locally", "Operational Domain": "Community", "Region": "Europe",
         "Flagged for Review": "true", "Flag Reason": "Duplicate entry"},
        {"Name": "Data Commons", "Operational Domain": "Policy", "Region": "North America",
         "Key Activities": "Open data advocacy", "Flagged for Review": true},
        {"Name": "Bright Futures", "Focus": ["Education"], "Country": "Kenya",
         "Flagged for Review": false}
    ])
    .to_string();
    Directory::from_json(&raw).unwrap()
}

fn names(directory: &Directory, visible: &[usize]) -> Vec<String> {
    visible
        .iter()
        .filter_map(|&i| directory.get(i))
        .map(|o| o.name().unwrap_or_default().to_string())
        .collect()
}

#[test]
fn visible_set_is_intersection_of_active_predicates() {
    let directory = sample();
    let searches = ["", "a", "OPEN", "climate"];
    let domains = ["", "Policy", "Research"];
    let regions = ["", "Europe", "Global"];
    let focuses = ["", "Energy", "Oceans"];

    for search in searches {
        for domain in domains {
            for region in regions {
                for focus in focuses {
                    for show_flagged in [false, true] {
                        let state = FilterState {
                            search: search.to_string(),
                            domain: domain.to_string(),
                            region: region.to_string(),
                            focus: focus.to_string(),
                            show_flagged,
                        };
                        let needle = search.to_lowercase();
                        let expected: Vec<usize> = directory
                            .iter()
                            .filter(|(_, org)| {
                                let text_hit = ["Name", "Overview", "Key Activities"]
                                    .into_iter()
                                    .filter_map(|key| org.text(key))
                                    .any(|t| t.to_lowercase().contains(&needle));
                                (show_flagged || !org.is_flagged())
                                    && (search.is_empty() || text_hit)
                                    && (domain.is_empty() || org.operational_domain() == Some(domain))
                                    && (region.is_empty() || org.regions().contains(&region))
                                    && (focus.is_empty() || org.focus().contains(&focus))
                            })
                            .map(|(i, _)| i)
                            .collect();
                        let visible = state.apply(&directory);
                        assert_eq!(visible, expected, "state {state:?}");
                        assert!(visible.windows(2).all(|w| w[0] < w[1]));
                    }
                }
            }
        }
    }
}

#[test]
fn reapplying_a_state_is_idempotent() {
    let directory = sample();
    let state = FilterState {
        search: "a".to_string(),
        region: "Europe".to_string(),
        show_flagged: true,
        ..FilterState::default()
    };
    let first = state.apply(&directory);
    let second = state.apply(&directory);
    assert_eq!(first, second);

    let mut view = ViewModel::with_filters(directory, state);
    let before = view.frame();
    view.recompute();
    view.recompute();
    assert_eq!(view.frame(), before);
}

#[test]
fn flagged_records_hidden_until_toggled() {
    let directory = sample();
    let hidden = names(&directory, &FilterState::default().apply(&directory));
    assert!(!hidden.contains(&"acting locally".to_string()));
    assert!(!hidden.contains(&"Data Commons".to_string()));
    assert!(hidden.contains(&"Bright Futures".to_string()));

    let shown = FilterState {
        show_flagged: true,
        ..FilterState::default()
    };
    let shown = names(&directory, &shown.apply(&directory));
    assert!(shown.contains(&"acting locally".to_string()));
    assert!(shown.contains(&"Data Commons".to_string()));
}

#[test]
fn search_is_case_insensitive_substring() {
    let directory = sample();
    let state = FilterState {
        search: "action".to_string(),
        ..FilterState::default()
    };
    assert_eq!(
        names(&directory, &state.apply(&directory)),
        vec!["Climate Action Now"]
    );
}

#[test]
fn region_matches_list_and_scalar_values() {
    let directory = sample();
    let state = FilterState {
        region: "Global".to_string(),
        ..FilterState::default()
    };
    assert_eq!(
        names(&directory, &state.apply(&directory)),
        vec!["Climate Action Now", "Ocean Watch"]
    );
}

#[test]
fn long_overview_reads_more_then_less() {
    let mut view = ViewModel::new(sample());
    let ocean = view
        .directory()
        .iter()
        .find(|(_, o)| o.name() == Some("Ocean Watch"))
        .map(|(i, _)| i)
        .unwrap();

    let collapsed = view.frame().cards;
    assert!(collapsed.contains(&format!("{}...", "o".repeat(200))));
    assert!(!collapsed.contains(&"o".repeat(201)));
    assert!(collapsed.contains(">Read more</button>"));

    view.handle(UiEvent::ToggleOverview(ocean));
    let expanded = view.frame().cards;
    assert!(expanded.contains(&"o".repeat(201)));
    assert!(expanded.contains(">Read less</button>"));
}

#[test]
fn empty_state_copy_depends_on_filters() {
    let empty = ViewModel::new(Directory::from_json("[]").unwrap());
    assert!(empty.frame().cards.contains("No organizations available."));

    let mut view = ViewModel::new(sample());
    view.handle(UiEvent::Select(
        SelectControl::Focus,
        "Astronomy".to_string(),
    ));
    view.recompute();
    let cards = view.frame().cards;
    assert!(cards.contains("No organizations found matching your criteria."));
    assert!(!cards.contains("No organizations available."));
}

#[test]
fn flagged_first_record_scenario() {
    let directory = Directory::from_json(
        r#"[
            {"Name":"B Org","Region":["EU"],"Flagged for Review":false},
            {"Name":"A Org","Region":"US","Flagged for Review":true}
        ]"#,
    )
    .unwrap();
    let all: Vec<usize> = directory.iter().map(|(i, _)| i).collect();
    assert_eq!(names(&directory, &all), vec!["A Org", "B Org"]);

    let view = ViewModel::new(directory);
    assert_eq!(names(view.directory(), view.visible()), vec!["B Org"]);
    assert_eq!(view.frame().stats, "Showing 1 of 2 organizations");
}

#[test]
fn registry_ignores_flag_state() {
    let view = ViewModel::new(sample());
    let domains = view.registry().options(SelectControl::Domain);
    assert!(domains.iter().any(|d| d == "Community"));
    assert!(domains.iter().any(|d| d == "Policy"));
    assert!(!domains.iter().any(|d| d == "Research"));
}

//! Property-based tests for the scrape-config merge.
//!
//! Uses `proptest` to verify ordering and preservation across many random
//! documents and targets.

#![allow(clippy::expect_used)]

use promctl_cli::domain::{ConfigDocument, MergeOutcome, ScrapeTarget, merge_target};
use proptest::prelude::*;

fn target_strategy() -> impl Strategy<Value = ScrapeTarget> {
    (any::<[u8; 4]>(), 1u16..=u16::MAX).prop_map(|(ip, port)| {
        format!("{}.{}.{}.{}:{port}", ip[0], ip[1], ip[2], ip[3])
            .parse()
            .expect("generated target is valid")
    })
}

fn hostname_target_strategy() -> impl Strategy<Value = ScrapeTarget> {
    ("[a-z]([a-z0-9-]{0,8}[a-z0-9])?(\\.[a-z][a-z0-9]{0,6}){0,2}", 1u16..=u16::MAX).prop_map(
        |(host, port)| format!("{host}:{port}").parse().expect("generated target is valid"),
    )
}

fn doc_with_job(job: &str, targets: &[ScrapeTarget]) -> ConfigDocument {
    let list: Vec<String> = targets.iter().map(|t| format!("      - '{t}'")).collect();
    let body = if list.is_empty() {
        "      []".to_string()
    } else {
        list.join("\n")
    };
    let yaml = format!(
        "global:\n  scrape_interval: 15s\nrule_files:\n  - alerts.yml\nscrape_configs:\n  - job_name: other\n    static_configs:\n      - targets: ['x:1']\n  - job_name: {job}\n    scrape_interval: 5s\n    static_configs:\n    - targets:\n{body}\n"
    );
    ConfigDocument::parse(yaml.as_bytes()).expect("fixture parses")
}

proptest! {
    /// The new target lands last and every existing target keeps its order.
    #[test]
    fn prop_merge_appends_in_order(
        existing in prop::collection::vec(target_strategy(), 0..8),
        new in target_strategy(),
    ) {
        let doc = doc_with_job("node", &existing);
        let (merged, outcome) = merge_target(doc, "node", &new).expect("merge");
        prop_assert_eq!(outcome, MergeOutcome::AppendedToStaticConfig);

        let mut expected: Vec<String> = existing.iter().map(ToString::to_string).collect();
        expected.push(new.to_string());
        let actual: Vec<String> = merged.job_targets("node").iter().map(|s| (*s).to_string()).collect();
        prop_assert_eq!(actual, expected);
    }

    /// Sections and jobs the merge does not touch are unchanged.
    #[test]
    fn prop_merge_preserves_untouched_parts(
        existing in prop::collection::vec(target_strategy(), 0..4),
        new in hostname_target_strategy(),
        job in "[a-z_][a-z0-9_]{0,12}",
    ) {
        let doc = doc_with_job("node", &existing);
        let before = doc.clone();
        let (merged, _) = merge_target(doc, &job, &new).expect("merge");

        prop_assert_eq!(merged.section("global"), before.section("global"));
        prop_assert_eq!(merged.section("rule_files"), before.section("rule_files"));
        if job != "other" {
            prop_assert_eq!(merged.job_targets("other"), vec!["x:1"]);
        }
        prop_assert!(merged.job_targets(&job).contains(&new.to_string().as_str()));
    }

    /// Serializing the merged document and parsing it again is lossless.
    #[test]
    fn prop_merge_result_round_trips(
        existing in prop::collection::vec(target_strategy(), 0..4),
        new in target_strategy(),
    ) {
        let (merged, _) = merge_target(doc_with_job("node", &existing), "node", &new).expect("merge");
        let yaml = merged.to_yaml().expect("serialize");
        let reparsed = ConfigDocument::parse(yaml.as_bytes()).expect("reparse");
        prop_assert_eq!(reparsed, merged);
    }

    /// Any `host:port` accepted by the parser displays back to the same text.
    #[test]
    fn prop_target_display_round_trips(t in hostname_target_strategy()) {
        let text = t.to_string();
        let again: ScrapeTarget = text.parse().expect("reparse");
        prop_assert_eq!(again, t);
    }
}

// Unit tests for the scanner glue that does not need a browser

use pretty_assertions::assert_eq;
use serde_json::json;

use super::aslint;
use super::wave::{self, WaveOptions};

#[test]
fn test_wave_request_url() {
    let options = WaveOptions {
        report_type: 2,
        key: Some("secret".to_string()),
        rules: vec![],
    };
    let url = wave::request_url("https://example.com/page?a=b", &options).unwrap();

    assert_eq!(url.host_str(), Some("wave.webaim.org"));
    assert_eq!(url.path(), "/api/request");
    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    assert_eq!(
        pairs,
        vec![
            ("key".to_string(), "secret".to_string()),
            ("url".to_string(), "https://example.com/page?a=b".to_string()),
            ("reporttype".to_string(), "2".to_string()),
        ]
    );
}

#[test]
fn test_wave_request_url_without_key() {
    let options = WaveOptions {
        report_type: 1,
        key: None,
        rules: vec![],
    };
    let url = wave::request_url("https://example.com", &options).unwrap();
    assert!(!url.query().unwrap_or("").contains("key="));
}

#[test]
fn test_wave_prunes_non_violation_categories() {
    let mut categories = json!({
        "error": { "count": 3, "items": {} },
        "contrast": { "count": 1, "items": {} },
        "alert": { "count": 2, "items": {} },
        "feature": { "count": 9, "items": {} },
        "structure": { "count": 4, "items": {} },
        "aria": { "count": 7, "items": {} }
    });
    wave::prune_categories(&mut categories);

    let keys: Vec<&String> = categories.as_object().unwrap().keys().collect();
    assert_eq!(keys, vec!["alert", "contrast", "error"]);
}

#[test]
fn test_wave_rule_filter_adjusts_counts() {
    let mut categories = json!({
        "error": {
            "count": 5,
            "items": {
                "alt_missing": { "count": 3 },
                "label_missing": { "count": 2 }
            }
        },
        "alert": {
            "count": 1,
            "items": {
                "noscript": { "count": 1 }
            }
        }
    });
    wave::filter_rules(&mut categories, &["alt_missing".to_string()]);

    assert_eq!(categories["error"]["count"], 2);
    assert!(categories["error"]["items"].get("label_missing").is_none());
    assert!(categories["error"]["items"].get("alt_missing").is_some());
    // Whole category filtered away leaves an empty item map, count 0
    assert_eq!(categories["alert"]["count"], 0);
    assert!(categories["alert"]["items"].as_object().unwrap().is_empty());
}

#[test]
fn test_wave_statistics_extraction() {
    let result = json!({
        "statistics": {
            "pagetitle": "Example",
            "pageurl": "https://example.com",
            "time": 2.25,
            "creditsremaining": 40,
            "allitemcount": 12,
            "totalelements": 310
        }
    });
    let stats = wave::extract_statistics(&result);

    assert_eq!(stats.page_title, "Example");
    assert_eq!(stats.page_url, "https://example.com");
    assert_eq!(stats.time, Some(2.25));
    assert_eq!(stats.credits_remaining, Some(40));
    assert_eq!(stats.all_item_count, Some(12));
    assert_eq!(stats.total_elements, Some(310));
}

#[test]
fn test_wave_statistics_missing() {
    let stats = wave::extract_statistics(&json!({}));
    assert_eq!(stats.page_title, "");
    assert_eq!(stats.time, None);
}

#[test]
fn test_aslint_prunes_passed_and_skipped_rules() {
    let mut rules = json!({
        "img_alt": { "status": { "type": "failed" } },
        "heading_order": { "status": { "type": "passed" } },
        "lang_attr": { "status": { "type": "skipped" } },
        "odd_rule": { "status": {} }
    });
    let dropped = aslint::prune_rules(&mut rules);

    assert_eq!(dropped, 2);
    let keys: Vec<&String> = rules.as_object().unwrap().keys().collect();
    assert_eq!(keys, vec!["img_alt", "odd_rule"]);
}

#[test]
fn test_aslint_prune_tolerates_non_object() {
    let mut rules = json!(null);
    assert_eq!(aslint::prune_rules(&mut rules), 0);
}

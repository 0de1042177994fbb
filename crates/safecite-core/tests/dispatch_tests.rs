//! End-to-end tool behaviour against the sample knowledge files.

use std::sync::Arc;

use pretty_assertions::assert_eq;
use serde_json::json;

use safecite_config::ServerMode;
use safecite_core::engine::format::CORRECTIVE_ACTION;
use safecite_core::engine::search::WINDOW_SEPARATOR;
use safecite_core::engine::{MANUAL_HEADING, NO_MATCH_MESSAGE};
use safecite_core::tools::{
    MISSING_CITATION_MESSAGE, MISSING_SCENARIO_MESSAGE, MISSING_VIOLATIONS_MESSAGE,
    UNKNOWN_TOOL_MESSAGE,
};
use safecite_core::{ToolDispatcher, init};
use safecite_test_utils::fixtures::TestData;
use safecite_test_utils::tracing_setup::init_test_tracing;

async fn sample_dispatcher() -> (TestData, Arc<ToolDispatcher>) {
    let data = TestData::sample().await;
    let dispatcher = init(&data.config()).await.expect("init failed");
    (data, dispatcher)
}

fn manual_windows(text: &str) -> Vec<&str> {
    text.strip_prefix(MANUAL_HEADING)
        .expect("manual heading")
        .trim_start_matches('\n')
        .split(WINDOW_SEPARATOR)
        .collect()
}

#[test_log::test(tokio::test)]
async fn guardrail_query_hits_first_table_record() {
    let (_data, d) = sample_dispatcher().await;
    let text = d
        .dispatch("compliance_check", &json!({"scenario": "Guardrail 40 inches"}))
        .await;
    assert!(text.starts_with("⛔ NOT COMPLIANT: Section 1910.28(b)(1)(i)\n• "));
    assert!(text.contains("• Penalty: $1,000 - $16,131 per serious violation"));
    assert!(text.ends_with(CORRECTIVE_ACTION));
}

#[tokio::test]
async fn compliant_record_has_no_corrective_action() {
    let (_data, d) = sample_dispatcher().await;
    let text = d
        .dispatch(
            "compliance_check",
            &json!({"scenario": "can a trained operator drive the forklift"}),
        )
        .await;
    assert_eq!(
        text,
        "✅ COMPLIANT: Section 1910.178(l)(1)(i)\n\
         • A trained and evaluated operator may operate a powered industrial truck."
    );
}

#[tokio::test]
async fn prohibited_record_gets_corrective_action() {
    let (_data, d) = sample_dispatcher().await;
    let text = d
        .dispatch(
            "compliance_check",
            &json!({"scenario": "supervisor limits restroom breaks"}),
        )
        .await;
    assert!(text.starts_with("🚫 PROHIBITED: Section 1910.141(c)(1)(i)"));
    assert!(text.ends_with(CORRECTIVE_ACTION));
}

#[tokio::test]
async fn id_in_query_is_a_fallback_match() {
    let (_data, d) = sample_dispatcher().await;
    let text = d
        .dispatch("compliance_check", &json!({"scenario": "what does 1910.157 say"}))
        .await;
    assert!(text.starts_with("⚠️ REVIEW REQUIRED: Section 1910.157(e)(3)"));
    assert!(!text.contains("Corrective action"));
}

#[tokio::test]
async fn detailed_request_reads_the_manual() {
    let (_data, d) = sample_dispatcher().await;
    let text = d
        .dispatch(
            "compliance_check",
            &json!({"scenario": "guardrail", "detail_level": "detailed"}),
        )
        .await;
    let windows = manual_windows(&text);
    assert_eq!(windows.len(), 1);
    assert!(windows[0].contains("Guardrail systems, safety net systems"));
}

#[tokio::test]
async fn long_query_without_trigger_reads_the_manual() {
    let (_data, d) = sample_dispatcher().await;
    let scenario = "our night shift keeps stacking pallets of product across the \
                    corridor that leads outside during inventory week";
    assert!(scenario.split_whitespace().count() >= 12);
    let text = d
        .dispatch("compliance_check", &json!({ "scenario": scenario }))
        .await;
    let windows = manual_windows(&text);
    assert!(windows.len() <= 3);
    for w in &windows {
        assert!(w.lines().count() <= 11, "window too long: {w}");
    }
}

#[tokio::test]
async fn nothing_matches_anywhere() {
    let (_data, d) = sample_dispatcher().await;
    let text = d
        .dispatch(
            "compliance_check",
            &json!({"scenario": "xyzzy", "detail_level": "detailed"}),
        )
        .await;
    assert_eq!(text, NO_MATCH_MESSAGE);
}

#[tokio::test]
async fn citation_lookup_is_case_insensitive_substring() {
    let (_data, d) = sample_dispatcher().await;
    let text = d
        .dispatch("citation_search", &json!({"citation": "1910.147"}))
        .await;
    assert!(text.starts_with("⛔ NOT COMPLIANT: Section 1910.147(c)(4)(i)"));

    // 1910.147 is the first id in table order containing "1910.1".
    let partial = d
        .dispatch("citation_search", &json!({"citation": "1910.1"}))
        .await;
    assert_eq!(partial, text);
}

#[tokio::test]
async fn citation_miss_falls_back_to_manual() {
    let (_data, d) = sample_dispatcher().await;
    let text = d
        .dispatch("citation_search", &json!({"citation": "1910.212"}))
        .await;
    assert!(text.starts_with(MANUAL_HEADING));
    assert!(text.contains("machine guarding shall be provided"));
}

#[tokio::test]
async fn fines_follow_the_range_table() {
    let (_data, d) = sample_dispatcher().await;
    let text = d
        .dispatch(
            "fine_calculator",
            &json!({"violations": ["a", "b"], "violation_type": "willful"}),
        )
        .await;
    assert!(text.contains("• Violations: 2"));
    assert!(text.contains("• Total range: $20,000 - $322,620"));

    let empty = d
        .dispatch("fine_calculator", &json!({"violations": []}))
        .await;
    assert!(empty.contains("(serious)"));
    assert!(empty.contains("• Total range: $0 - $0"));
}

#[tokio::test]
async fn fixed_messages_for_bad_calls() {
    init_test_tracing();
    let (_data, d) = sample_dispatcher().await;
    assert_eq!(d.dispatch("not_a_tool", &json!({})).await, UNKNOWN_TOOL_MESSAGE);
    assert_eq!(
        d.dispatch("compliance_check", &json!({})).await,
        MISSING_SCENARIO_MESSAGE
    );
    assert_eq!(
        d.dispatch("citation_search", &json!({"citation": "  "})).await,
        MISSING_CITATION_MESSAGE
    );
    assert_eq!(
        d.dispatch("fine_calculator", &json!({"violation_type": "repeat"})).await,
        MISSING_VIOLATIONS_MESSAGE
    );
}

#[tokio::test]
async fn missing_files_degrade_to_no_match() {
    let data = TestData::with_contents(None, None).await;
    let d = init(&data.config()).await.unwrap();
    assert_eq!(
        d.dispatch("compliance_check", &json!({"scenario": "guardrail"})).await,
        NO_MATCH_MESSAGE
    );
    let cite = d
        .dispatch("citation_search", &json!({"citation": "1910.28"}))
        .await;
    assert!(cite.starts_with("No regulation found for citation \"1910.28\""));
}

#[tokio::test]
async fn smaller_window_settings_apply() {
    let data = TestData::sample().await;
    let config = data.config_builder().context_lines(0).max_windows(1).build();
    let d = init(&config).await.unwrap();
    let text = d
        .dispatch(
            "compliance_check",
            &json!({"scenario": "exit", "detail_level": "detailed"}),
        )
        .await;
    let windows = manual_windows(&text);
    assert_eq!(windows.len(), 1);
    assert_eq!(windows[0].lines().count(), 1);
}

#[tokio::test]
async fn proxy_mode_without_key_reports_it() {
    let data = TestData::sample().await;
    let config = data
        .config_builder()
        .mode(ServerMode::Proxy)
        .api_url("http://127.0.0.1:9/api/compliance_check")
        .build();
    let d = init(&config).await.unwrap();
    assert_eq!(
        d.dispatch("compliance_check", &json!({"scenario": "guardrail"})).await,
        "❌ OSHA_API_KEY not set."
    );
    // Other tools stay local.
    let cite = d
        .dispatch("citation_search", &json!({"citation": "1910.28"}))
        .await;
    assert!(cite.contains("1910.28(b)(1)(i)"));
}

#[tokio::test]
async fn word_threshold_setting_routes_short_query_to_manual() {
    let data = TestData::sample().await;
    let scenario = json!({"scenario": "trained operator"});

    let d = init(&data.config()).await.unwrap();
    let text = d.dispatch("compliance_check", &scenario).await;
    assert!(text.starts_with("✅ COMPLIANT: Section 1910.178(l)(1)(i)"));

    let d = init(&data.config_builder().word_threshold(1).build())
        .await
        .unwrap();
    let text = d.dispatch("compliance_check", &scenario).await;
    assert!(text.starts_with(MANUAL_HEADING), "got {text}");
    assert!(text.contains("Only trained and authorized operators"));
}

#[tokio::test]
async fn proxy_mode_with_key_validates_scenario_then_forwards() {
    let data = TestData::sample().await;
    let config = data
        .config_builder()
        .mode(ServerMode::Proxy)
        .api_url("http://127.0.0.1:9/api/compliance_check")
        .api_key("test-key")
        .timeout_secs(2)
        .build();
    let d = init(&config).await.unwrap();
    assert_eq!(
        d.dispatch("compliance_check", &json!({"scenario": "  "})).await,
        MISSING_SCENARIO_MESSAGE
    );
    // Nothing listens on the discard port, so the call fails fast.
    let text = d.dispatch("compliance_check", &json!({"scenario": "guardrail"})).await;
    assert!(text.starts_with("❌ "), "got {text}");
    assert_ne!(text, "❌ OSHA_API_KEY not set.");
}

#[tokio::test]
async fn proxy_mode_without_key_reports_it_before_arguments() {
    let data = TestData::sample().await;
    let config = data.config_builder().mode(ServerMode::Proxy).build();
    let d = init(&config).await.unwrap();
    assert_eq!(
        d.dispatch("compliance_check", &json!({})).await,
        "❌ OSHA_API_KEY not set."
    );
}

#[tokio::test]
async fn concurrent_calls_share_the_knowledge_base() {
    let (_data, d) = sample_dispatcher().await;
    let mut handles = Vec::new();
    for i in 0..16 {
        let d = Arc::clone(&d);
        handles.push(tokio::spawn(async move {
            let args = if i % 2 == 0 {
                json!({"scenario": "lockout on the conveyor"})
            } else {
                json!({"citation": "1910.147"})
            };
            let tool = if i % 2 == 0 { "compliance_check" } else { "citation_search" };
            d.dispatch_isolated(tool.to_string(), args).await
        }));
    }
    for h in handles {
        let text = h.await.unwrap();
        assert!(text.starts_with("⛔ NOT COMPLIANT: Section 1910.147(c)(4)(i)"));
    }
}

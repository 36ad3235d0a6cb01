use super::assets::{INDEX_HTML, STATIC_HTML, STYLE};
use crate::sync::ChartOption;
use crate::view::escape_html;

/// Page served to the browser in interactive mode.
pub fn index_page() -> String {
    INDEX_HTML.replace("__STYLE__", STYLE)
}

/// Self-contained page with the option embedded, for offline viewing.
pub fn generate_static_html(option: &ChartOption) -> Result<String, serde_json::Error> {
    // "</" would end the script element early
    let json = option.to_json()?.replace("</", "<\\/");
    Ok(STATIC_HTML
        .replace("__STYLE__", STYLE)
        .replace("__TITLE__", &escape_html(&option.base_option.title.text))
        .replace("__OPTION__", &json))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::dataset::Dataset;
    use crate::model::ScenarioMetadata;
    use crate::sync::ViewSyncController;

    #[test]
    fn test_static_html_embeds_option() {
        let mut scenario = ScenarioMetadata::default();
        scenario.scenario_name = "Pulp & Paper".to_string();
        let dataset = Dataset::from_json(
            r#"{"2000": {"node_index_to_data": {"0": {"process_id": "</script>"}}}}"#,
            scenario,
        )
        .unwrap();
        let option = ViewSyncController::new(dataset, Config::default()).option();

        let html = generate_static_html(&option).unwrap();
        assert!(html.contains("<title>Pulp &amp; Paper</title>"));
        assert!(html.contains("\"baseOption\""));
        assert!(!html.contains("__OPTION__"));
        assert!(!html.contains("__STYLE__"));
        assert_eq!(html.matches("</script>").count(), 2);
    }

    #[test]
    fn test_index_page_has_styles() {
        let page = index_page();
        assert!(page.contains(".tooltip-table"));
        assert!(page.contains("/api/event"));
    }
}

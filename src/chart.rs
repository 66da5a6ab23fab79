//! Chart View Model
//!
//! Turns the stored language results into the payload a line-chart frontend
//! renders: one dataset per language plus a toggle button per language,
//! with exactly one dataset visible at a time.
//!
//! Rendering itself (canvas, styling, tooltips) belongs to whatever consumes
//! this; the view model is the whole contract.

use std::collections::HashMap;

use serde::Serialize;

use crate::collector::LanguageResult;

/// One selectable line dataset: x-axis month labels, y-axis counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LineDataset {
    pub language: String,
    /// Display label, capitalized for the legend.
    pub label: String,
    pub month_labels: Vec<String>,
    pub counts: Vec<u64>,
    pub visible: bool,
}

/// A language toggle button; `active` mirrors the visible dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToggleButton {
    pub language: String,
    pub label: String,
    pub active: bool,
}

/// The full chart view: datasets and buttons in configured language order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChartView {
    pub selected: String,
    pub datasets: Vec<LineDataset>,
    pub buttons: Vec<ToggleButton>,
}

impl ChartView {
    /// Build the view from stored results, in `languages` order. The caller
    /// gates on session readiness, so every language is expected to have a
    /// result; any gap is skipped with a warning rather than rendered empty.
    ///
    /// The first configured language starts out selected.
    pub fn build(results: &HashMap<String, LanguageResult>, languages: &[String]) -> Self {
        let selected = languages.first().cloned().unwrap_or_default();

        let mut view = Self {
            selected: selected.clone(),
            datasets: Vec::with_capacity(languages.len()),
            buttons: Vec::with_capacity(languages.len()),
        };

        for language in languages {
            let Some(result) = results.get(language) else {
                tracing::warn!(language = %language, "no stored result for configured language");
                continue;
            };

            let label = capitalize(language);
            view.datasets.push(LineDataset {
                language: language.clone(),
                label: label.clone(),
                month_labels: result.month_labels.clone(),
                counts: result.counts.clone(),
                visible: *language == selected,
            });
            view.buttons.push(ToggleButton {
                language: language.clone(),
                label,
                active: *language == selected,
            });
        }

        view
    }

    /// Switch the visible dataset. Only visibility and button state change;
    /// the underlying series are untouched. Returns false for a language the
    /// view doesn't know, leaving the selection as it was.
    pub fn select(&mut self, language: &str) -> bool {
        if !self.datasets.iter().any(|d| d.language == language) {
            return false;
        }

        self.selected = language.to_string();
        for dataset in &mut self.datasets {
            dataset.visible = dataset.language == language;
        }
        for button in &mut self.buttons {
            button.active = button.language == language;
        }
        true
    }
}

/// Capitalize the first letter, for button and legend labels.
fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collector::LanguageResult;
    use crate::window::MonthWindow;
    use chrono::{TimeZone, Utc};

    fn results() -> (HashMap<String, LanguageResult>, Vec<String>) {
        let reference = Utc.with_ymd_and_hms(2023, 7, 1, 0, 0, 0).unwrap();
        let window = MonthWindow::from_reference(reference);
        let languages: Vec<String> = ["python", "javascript", "java", "cpp"]
            .iter()
            .map(|s| s.to_string())
            .collect();

        let mut results = HashMap::new();
        for (i, language) in languages.iter().enumerate() {
            results.insert(
                language.clone(),
                LanguageResult {
                    language: language.clone(),
                    month_labels: window.display_months().to_vec(),
                    counts: vec![i as u64 + 1; 12],
                },
            );
        }
        (results, languages)
    }

    #[test]
    fn first_language_is_selected_by_default() {
        let (results, languages) = results();
        let view = ChartView::build(&results, &languages);

        assert_eq!(view.selected, "python");
        assert_eq!(view.datasets.len(), 4);
        assert_eq!(view.buttons.len(), 4);
        assert!(view.datasets[0].visible);
        assert!(view.datasets[1..].iter().all(|d| !d.visible));
        assert!(view.buttons[0].active);
    }

    #[test]
    fn labels_are_capitalized() {
        let (results, languages) = results();
        let view = ChartView::build(&results, &languages);

        assert_eq!(view.buttons[0].label, "Python");
        assert_eq!(view.datasets[3].label, "Cpp");
    }

    #[test]
    fn select_changes_only_visibility() {
        let (results, languages) = results();
        let mut view = ChartView::build(&results, &languages);
        let before: Vec<(Vec<String>, Vec<u64>)> = view
            .datasets
            .iter()
            .map(|d| (d.month_labels.clone(), d.counts.clone()))
            .collect();

        assert!(view.select("java"));

        assert_eq!(view.selected, "java");
        for (dataset, (labels, counts)) in view.datasets.iter().zip(&before) {
            assert_eq!(&dataset.month_labels, labels);
            assert_eq!(&dataset.counts, counts);
            assert_eq!(dataset.visible, dataset.language == "java");
        }
        for button in &view.buttons {
            assert_eq!(button.active, button.language == "java");
        }
    }

    #[test]
    fn selecting_unknown_language_is_rejected() {
        let (results, languages) = results();
        let mut view = ChartView::build(&results, &languages);

        assert!(!view.select("rust"));
        assert_eq!(view.selected, "python");
        assert!(view.datasets[0].visible);
    }
}

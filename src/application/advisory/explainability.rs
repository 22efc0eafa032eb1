use std::path::{Path, PathBuf};

pub const CAPTION: &str = "SHAP analysis: impact of each feature on the forecast";

/// How to read the feature attribution chart
pub const LEGEND: &[&str] = &[
    "Top feature: the factor that influences the decision the most.",
    "Colours: red = high feature value, blue = low feature value.",
    "Direction: spread to the right raises the forecast, to the left lowers it.",
];

/// A pre-rendered chart produced by offline evaluation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExplainabilityChart {
    Available(PathBuf),
    Missing(PathBuf),
}

impl ExplainabilityChart {
    pub fn locate(path: &Path) -> Self {
        if path.is_file() {
            ExplainabilityChart::Available(path.to_path_buf())
        } else {
            ExplainabilityChart::Missing(path.to_path_buf())
        }
    }

    pub fn warning(&self) -> Option<String> {
        match self {
            ExplainabilityChart::Available(_) => None,
            ExplainabilityChart::Missing(path) => Some(format!(
                "Explainability chart not found at {}. Run the offline evaluation to generate it.",
                path.display()
            )),
        }
    }
}

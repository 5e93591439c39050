use anyhow::{anyhow, Context, Result};
use road_core::CaseConfig;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

const BUILTIN_CASES_JSON: &str = include_str!("../../test-fixtures/road-cases.json");

/// On-disk layout: case name -> case parameters.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CaseFile {
    pub cases: BTreeMap<String, CaseConfig>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NamedCase {
    pub name: String,
    pub config: CaseConfig,
}

pub fn builtin_cases() -> Result<Vec<NamedCase>> {
    parse_case_file(BUILTIN_CASES_JSON).context("built-in case fixtures are malformed")
}

pub fn parse_case_file(raw: &str) -> Result<Vec<NamedCase>> {
    let file: CaseFile = serde_json::from_str(raw).context("failed to parse case json")?;
    if file.cases.is_empty() {
        return Err(anyhow!("case file contains no cases"));
    }
    Ok(file
        .cases
        .into_iter()
        .map(|(name, config)| NamedCase { name, config })
        .collect())
}

pub fn load_case_file(path: &Path) -> Result<Vec<NamedCase>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed reading case file {}", path.display()))?;
    parse_case_file(&raw).with_context(|| format!("invalid case file {}", path.display()))
}

pub fn load_cases(path: Option<&Path>) -> Result<Vec<NamedCase>> {
    match path {
        Some(path) => load_case_file(path),
        None => builtin_cases(),
    }
}

/// Looks up exactly one case by name.
pub fn find_case(mut all: Vec<NamedCase>, name: &str) -> Result<NamedCase> {
    let name = name.trim();
    if let Some(idx) = all.iter().position(|case| case.name == name) {
        return Ok(all.swap_remove(idx));
    }
    let available: Vec<&str> = all.iter().map(|case| case.name.as_str()).collect();
    Err(anyhow!(
        "unknown case '{name}'. available: {}",
        available.join(", ")
    ))
}

/// Keeps the cases named in a comma-separated `selection`, in selection order.
pub fn select_cases(all: Vec<NamedCase>, selection: Option<&str>) -> Result<Vec<NamedCase>> {
    let Some(raw) = selection else {
        return Ok(all);
    };

    let mut selected = Vec::new();
    for token in raw.split(',') {
        let token = token.trim();
        if token.is_empty() {
            continue;
        }
        let case = all.iter().find(|case| case.name == token).ok_or_else(|| {
            let available: Vec<&str> = all.iter().map(|case| case.name.as_str()).collect();
            anyhow!(
                "unknown case '{token}'. available: {}",
                available.join(", ")
            )
        })?;
        selected.push(case.clone());
    }

    if selected.is_empty() {
        return Err(anyhow!("--cases resolved to empty list"));
    }
    Ok(selected)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_cases_are_all_present_in_name_order() {
        let cases = builtin_cases().unwrap();
        let names: Vec<&str> = cases.iter().map(|case| case.name.as_str()).collect();
        assert_eq!(
            names,
            [
                "01-one_lonely_hole",
                "02-chained_jumps_increasing_length",
                "03-chained_jumps_decreasing_length",
                "04-chained_jumps_equal_length",
                "05-diagonial-columns",
                "06-scatter-pits",
                "11-mandatory-sacrifice",
                "12-well-worn-road",
            ]
        );
    }

    #[test]
    fn builtin_cases_pass_validation() {
        for case in builtin_cases().unwrap() {
            assert!(
                road_core::GameState::new(&case.config).is_ok(),
                "{} failed validation",
                case.name
            );
        }
    }

    #[test]
    fn selection_keeps_requested_order() {
        let selected = select_cases(
            builtin_cases().unwrap(),
            Some("12-well-worn-road, 01-one_lonely_hole"),
        )
        .unwrap();
        assert_eq!(selected.len(), 2);
        assert_eq!(selected[0].name, "12-well-worn-road");
        assert_eq!(selected[1].name, "01-one_lonely_hole");
    }

    #[test]
    fn selection_rejects_unknown_names() {
        let err = select_cases(builtin_cases().unwrap(), Some("99-missing")).unwrap_err();
        assert!(err.to_string().contains("unknown case '99-missing'"));
    }

    #[test]
    fn find_case_matches_one_exact_name() {
        let case = find_case(builtin_cases().unwrap(), " 06-scatter-pits ").unwrap();
        assert_eq!(case.name, "06-scatter-pits");
    }

    #[test]
    fn find_case_rejects_lists_and_unknown_names() {
        let err = find_case(
            builtin_cases().unwrap(),
            "01-one_lonely_hole,06-scatter-pits",
        )
        .unwrap_err();
        assert!(err.to_string().starts_with("unknown case"));
        assert!(find_case(builtin_cases().unwrap(), "99-missing").is_err());
    }

    #[test]
    fn selection_rejects_blank_lists() {
        assert!(select_cases(builtin_cases().unwrap(), Some(" , ")).is_err());
    }

    #[test]
    fn empty_case_file_is_rejected() {
        assert!(parse_case_file(r#"{"cases": {}}"#).is_err());
    }
}

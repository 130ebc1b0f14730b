//! openFDA drug-label client.

use async_trait::async_trait;
use serde::Deserialize;

use super::ports::{DrugInfo, DrugLabelPort, DrugLookupError};

const DEFAULT_BASE_URL: &str = "https://api.fda.gov/drug/label.json";

pub struct OpenFdaClient {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Debug, Deserialize, Default)]
struct LabelResponse {
    #[serde(default)]
    results: Vec<LabelResult>,
}

#[derive(Debug, Deserialize, Default)]
struct LabelResult {
    #[serde(default)]
    openfda: OpenFdaSection,
    #[serde(default)]
    indications_and_usage: Vec<String>,
    #[serde(default)]
    adverse_reactions: Vec<String>,
    #[serde(default)]
    warnings_and_cautions: Vec<String>,
    #[serde(default)]
    precautions: Vec<String>,
    #[serde(default)]
    drug_interactions: Vec<String>,
    #[serde(default)]
    dosage_and_administration: Vec<String>,
    #[serde(default)]
    clinical_pharmacology: Vec<String>,
}

#[derive(Debug, Deserialize, Default)]
struct OpenFdaSection {
    #[serde(default)]
    brand_name: Vec<String>,
    #[serde(default)]
    generic_name: Vec<String>,
}

impl OpenFdaClient {
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }
}

impl Default for OpenFdaClient {
    fn default() -> Self {
        Self::new()
    }
}

fn first(values: &[String]) -> String {
    values.first().cloned().unwrap_or_default()
}

fn map_result(name: &str, result: LabelResult) -> DrugInfo {
    let brand = first(&result.openfda.brand_name);
    let generic = first(&result.openfda.generic_name);
    DrugInfo {
        name: if brand.is_empty() {
            if generic.is_empty() {
                name.to_string()
            } else {
                generic.clone()
            }
        } else {
            brand
        },
        generic_name: generic,
        usages: result.indications_and_usage,
        common_side_effects: result.adverse_reactions,
        serious_side_effects: result.warnings_and_cautions,
        precautions: result.precautions,
        interactions: result.drug_interactions,
        dosage_info: result.dosage_and_administration.join(" "),
        how_it_works: result.clinical_pharmacology.join(" "),
    }
}

#[async_trait]
impl DrugLabelPort for OpenFdaClient {
    async fn fetch(&self, name: &str) -> Result<Option<DrugInfo>, DrugLookupError> {
        let search = format!(
            "openfda.brand_name:\"{name}\"+openfda.generic_name:\"{name}\""
        );
        let response = self
            .client
            .get(&self.base_url)
            .query(&[("search", search.as_str()), ("limit", "1")])
            .send()
            .await
            .map_err(|e| DrugLookupError::RequestFailed(e.to_string()))?;

        // openFDA answers 404 for zero matches.
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(DrugLookupError::RequestFailed(format!(
                "openFDA returned {}",
                response.status()
            )));
        }

        let body: LabelResponse = response
            .json()
            .await
            .map_err(|e| DrugLookupError::InvalidResponse(e.to_string()))?;
        Ok(body
            .results
            .into_iter()
            .next()
            .map(|result| map_result(name, result)))
    }
}

use crate::domain::model::{AnalyzeRequest, BuildRequest};
use crate::utils::error::{AdvisorError, Result};
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(AdvisorError::InvalidConfigValueError {
            field: field_name.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(AdvisorError::InvalidConfigValueError {
                field: field_name.to_string(),
                reason: format!("Unsupported URL scheme: {}", scheme),
            }),
        },
        Err(e) => Err(AdvisorError::InvalidConfigValueError {
            field: field_name.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(AdvisorError::InvalidConfigValueError {
            field: field_name.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

pub fn validate_positive_number(field_name: &str, value: u64, min_value: u64) -> Result<()> {
    if value < min_value {
        return Err(AdvisorError::InvalidConfigValueError {
            field: field_name.to_string(),
            reason: format!("Value must be at least {}", min_value),
        });
    }
    Ok(())
}

// Boundary checks for incoming requests. The analyzer itself never rejects;
// these run at the CLI/API edge before a request enters the engine.

impl Validate for AnalyzeRequest {
    fn validate(&self) -> Result<()> {
        for (index, card) in self.deck.cards.iter().enumerate() {
            if card.quantity < 1 {
                return Err(AdvisorError::ValidationError {
                    message: format!(
                        "deck.cards[{}] (product {}) must have quantity >= 1",
                        index, card.product_id
                    ),
                });
            }
        }
        Ok(())
    }
}

impl Validate for BuildRequest {
    fn validate(&self) -> Result<()> {
        if let Some(target) = self.target_main_size {
            validate_positive_number("targetMainSize", u64::from(target), 1)?;
        }
        for (index, holding) in self.holdings.iter().flatten().enumerate() {
            if holding.name.trim().is_empty() {
                return Err(AdvisorError::ValidationError {
                    message: format!("holdings[{}] must have a non-empty name", index),
                });
            }
        }
        Ok(())
    }
}
